//! Timer settings form.
//!
//! The editor holds one minute field per mode as raw text, exactly as typed.
//! Raw text is read with integer-prefix semantics ("12abc" is 12) and
//! anything that yields no positive number counts as 1. On submit every
//! value is clamped to its mode's bounds and handed to the engine.

use std::ops::RangeInclusive;

use tracing::debug;

use crate::timer::TimerEngine;
use crate::types::{DurationConfig, TimerMode};

/// Smallest accepted value for every field, in minutes.
pub const MIN_MINUTES: u32 = 1;
/// Upper bound of the focus field, in minutes.
pub const FOCUS_MAX_MINUTES: u32 = 90;
/// Upper bound of the short break field, in minutes.
pub const SHORT_BREAK_MAX_MINUTES: u32 = 30;
/// Upper bound of the long break field, in minutes.
pub const LONG_BREAK_MAX_MINUTES: u32 = 60;

/// Longest raw input a field accepts.
const MAX_INPUT_LEN: usize = 3;

/// Accepted minute range for `mode`.
pub fn minute_bounds(mode: TimerMode) -> RangeInclusive<u32> {
    let max = match mode {
        TimerMode::Focus => FOCUS_MAX_MINUTES,
        TimerMode::ShortBreak => SHORT_BREAK_MAX_MINUTES,
        TimerMode::LongBreak => LONG_BREAK_MAX_MINUTES,
    };
    MIN_MINUTES..=max
}

/// Reads minutes from raw input.
///
/// Leading whitespace and a sign are skipped, then the leading run of
/// digits is taken. No digits, zero or a negative number all give 1.
pub fn parse_minutes(raw: &str) -> u32 {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return MIN_MINUTES;
    }

    let value = rest[..digits]
        .bytes()
        .fold(0u32, |acc, b| acc.saturating_mul(10).saturating_add(u32::from(b - b'0')));

    if negative || value == 0 {
        MIN_MINUTES
    } else {
        value
    }
}

/// Clamps parsed minutes into the bounds of `mode`.
pub fn clamp_minutes(mode: TimerMode, minutes: u32) -> u32 {
    let bounds = minute_bounds(mode);
    minutes.clamp(*bounds.start(), *bounds.end())
}

// ============================================================================
// MinuteField
// ============================================================================

/// One editable minute field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinuteField {
    mode: TimerMode,
    input: String,
}

impl MinuteField {
    fn new(mode: TimerMode, minutes: u32) -> Self {
        Self {
            mode,
            input: minutes.to_string(),
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Raw text as typed.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Parsed value, before clamping.
    pub fn value(&self) -> u32 {
        parse_minutes(&self.input)
    }

    pub fn bounds(&self) -> RangeInclusive<u32> {
        minute_bounds(self.mode)
    }

    /// Value clamped to this field's bounds.
    pub fn clamped(&self) -> u32 {
        clamp_minutes(self.mode, self.value())
    }

    fn set(&mut self, minutes: u32) {
        self.input = minutes.to_string();
    }
}

// ============================================================================
// SettingsEditor
// ============================================================================

/// Settings form for the three mode durations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsEditor {
    fields: [MinuteField; 3],
    selected: usize,
}

impl SettingsEditor {
    /// Opens the form, seeding each field with whole minutes from `durations`.
    pub fn open(durations: &DurationConfig) -> Self {
        Self {
            fields: TimerMode::ALL.map(|mode| MinuteField::new(mode, durations.minutes(mode))),
            selected: 0,
        }
    }

    pub fn fields(&self) -> &[MinuteField] {
        &self.fields
    }

    pub fn field(&self, mode: TimerMode) -> &MinuteField {
        &self.fields[mode.index()]
    }

    pub fn selected(&self) -> TimerMode {
        self.fields[self.selected].mode
    }

    pub fn focus_next(&mut self) {
        self.selected = (self.selected + 1) % self.fields.len();
    }

    pub fn focus_previous(&mut self) {
        self.selected = (self.selected + self.fields.len() - 1) % self.fields.len();
    }

    /// Appends a digit to the selected field. Other characters are ignored.
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected];
        if c.is_ascii_digit() && field.input.len() < MAX_INPUT_LEN {
            field.input.push(c);
        }
    }

    /// Deletes the last character of the selected field.
    pub fn backspace(&mut self) {
        self.fields[self.selected].input.pop();
    }

    /// Replaces the raw text of the field for `mode`.
    pub fn set_input(&mut self, mode: TimerMode, raw: impl Into<String>) {
        self.fields[mode.index()].input = raw.into();
    }

    /// Adds one minute to the selected field, staying within bounds.
    pub fn increment(&mut self) {
        let field = &mut self.fields[self.selected];
        let next = clamp_minutes(field.mode, field.clamped().saturating_add(1));
        field.set(next);
    }

    /// Removes one minute from the selected field, staying within bounds.
    pub fn decrement(&mut self) {
        let field = &mut self.fields[self.selected];
        let next = clamp_minutes(field.mode, field.clamped().saturating_sub(1));
        field.set(next);
    }

    /// Converts the form to a duration configuration, clamping every field.
    pub fn submit(&self) -> DurationConfig {
        DurationConfig::from_minutes(
            self.field(TimerMode::Focus).clamped(),
            self.field(TimerMode::ShortBreak).clamped(),
            self.field(TimerMode::LongBreak).clamped(),
        )
    }

    /// Submits the form to `engine` and closes it.
    pub fn apply(self, engine: &mut TimerEngine) -> DurationConfig {
        let durations = self.submit();
        debug!(
            focus = durations.minutes(TimerMode::Focus),
            short_break = durations.minutes(TimerMode::ShortBreak),
            long_break = durations.minutes(TimerMode::LongBreak),
            "Settings submitted"
        );
        engine.update_durations(durations);
        durations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_plain_numbers() {
            assert_eq!(parse_minutes("25"), 25);
            assert_eq!(parse_minutes("  7"), 7);
            assert_eq!(parse_minutes("+3"), 3);
        }

        #[test]
        fn test_integer_prefix() {
            assert_eq!(parse_minutes("12abc"), 12);
            assert_eq!(parse_minutes("4.9"), 4);
        }

        #[test]
        fn test_fallback_to_one() {
            assert_eq!(parse_minutes(""), 1);
            assert_eq!(parse_minutes("abc"), 1);
            assert_eq!(parse_minutes("0"), 1);
            assert_eq!(parse_minutes("-5"), 1);
        }

        #[test]
        fn test_huge_values_saturate() {
            assert_eq!(parse_minutes("99999999999999"), u32::MAX);
            assert_eq!(clamp_minutes(TimerMode::Focus, u32::MAX), 90);
        }

        #[test]
        fn test_bounds() {
            assert_eq!(minute_bounds(TimerMode::Focus), 1..=90);
            assert_eq!(minute_bounds(TimerMode::ShortBreak), 1..=30);
            assert_eq!(minute_bounds(TimerMode::LongBreak), 1..=60);
        }
    }

    mod editor_tests {
        use super::*;

        #[test]
        fn test_open_uses_whole_minutes() {
            let editor = SettingsEditor::open(&DurationConfig::from_seconds(1500, 330, 900));
            assert_eq!(editor.field(TimerMode::Focus).input(), "25");
            assert_eq!(editor.field(TimerMode::ShortBreak).input(), "5");
            assert_eq!(editor.field(TimerMode::LongBreak).input(), "15");
            assert_eq!(editor.selected(), TimerMode::Focus);
        }

        #[test]
        fn test_typing_and_backspace() {
            let mut editor = SettingsEditor::open(&DurationConfig::default());
            editor.backspace();
            editor.backspace();
            editor.input_char('4');
            editor.input_char('x');
            editor.input_char('0');
            assert_eq!(editor.field(TimerMode::Focus).input(), "40");

            editor.input_char('1');
            editor.input_char('2');
            assert_eq!(editor.field(TimerMode::Focus).input(), "401");
        }

        #[test]
        fn test_focus_cycles() {
            let mut editor = SettingsEditor::open(&DurationConfig::default());
            editor.focus_previous();
            assert_eq!(editor.selected(), TimerMode::LongBreak);
            editor.focus_next();
            editor.focus_next();
            assert_eq!(editor.selected(), TimerMode::ShortBreak);
        }

        #[test]
        fn test_step_stays_in_bounds() {
            let mut editor = SettingsEditor::open(&DurationConfig::from_minutes(90, 1, 15));
            editor.increment();
            assert_eq!(editor.field(TimerMode::Focus).input(), "90");

            editor.focus_next();
            editor.decrement();
            assert_eq!(editor.field(TimerMode::ShortBreak).input(), "1");
            editor.increment();
            assert_eq!(editor.field(TimerMode::ShortBreak).input(), "2");
        }

        #[test]
        fn test_submit_clamps() {
            let mut editor = SettingsEditor::open(&DurationConfig::default());
            editor.set_input(TimerMode::Focus, "120");
            editor.set_input(TimerMode::ShortBreak, "abc");
            editor.set_input(TimerMode::LongBreak, "0");

            let durations = editor.submit();

            assert_eq!(durations.get(TimerMode::Focus), 90 * 60);
            assert_eq!(durations.get(TimerMode::ShortBreak), 60);
            assert_eq!(durations.get(TimerMode::LongBreak), 60);
        }

        #[test]
        fn test_submit_converts_to_seconds() {
            let mut editor = SettingsEditor::open(&DurationConfig::default());
            editor.set_input(TimerMode::Focus, "50");
            assert_eq!(editor.submit(), DurationConfig::from_seconds(3000, 300, 900));
        }
    }
}
