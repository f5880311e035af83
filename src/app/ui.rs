//! Rendering.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs},
    Frame,
};

use super::big_text::{BigText, GLYPH_HEIGHT};
use super::{App, InputMode, Route};
use crate::settings::SettingsEditor;
use crate::types::TimerMode;

/// Shown in place of the task list when there are no tasks.
pub const EMPTY_TASKS_HINT: &str = "No tasks yet. Add one to get started!";

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    match app.route() {
        Route::Landing => draw_landing(f, area),
        Route::Timer if app.fullscreen().is_active() => draw_focus_view(f, app, area),
        Route::Timer => draw_timer_view(f, app, area),
    }

    if let Some(editor) = app.settings() {
        draw_settings_modal(f, editor);
    }
}

fn key_hint<'a>(key: &'a str, label: &'a str) -> Vec<Span<'a>> {
    vec![
        Span::styled(key, Style::default().fg(Color::Yellow)),
        Span::raw(label),
        Span::raw("  "),
    ]
}

fn clock_style(running: bool) -> Style {
    let color = if running { Color::Green } else { Color::White };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

// ============================================================================
// Landing
// ============================================================================

fn draw_landing(f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(GLYPH_HEIGHT),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let title = BigText::new("LOCK IN").style(Style::default().fg(Color::Cyan));
    let title_area = title.centered_in(chunks[1]);
    f.render_widget(title, title_area);

    let cta = Paragraph::new(Line::from(Span::styled(
        " LOCK IN NOW ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(cta, chunks[3]);

    let mut hints = key_hint("[Enter]", " Start");
    hints.extend(key_hint("[q]", " Quit"));
    f.render_widget(
        Paragraph::new(Line::from(hints)).alignment(Alignment::Center),
        chunks[5],
    );
}

// ============================================================================
// Timer
// ============================================================================

fn draw_timer_view(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(GLYPH_HEIGHT + 2),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    draw_mode_tabs(f, app, chunks[0]);
    draw_clock(f, app, chunks[1]);
    draw_controls(f, app, chunks[2]);
    draw_tasks(f, app, chunks[3]);
    draw_status_bar(f, app, chunks[4]);
}

fn draw_mode_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = TimerMode::ALL
        .iter()
        .map(|mode| Line::from(format!(" {} ", mode.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" LOCK IN "))
        .select(app.engine().state().mode.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );
    f.render_widget(tabs, area);
}

fn draw_clock(f: &mut Frame, app: &App, area: Rect) {
    let state = app.engine().state();
    let display = state.display();
    let clock = BigText::new(&display).style(clock_style(state.running));
    let clock_area = clock.centered_in(area);
    f.render_widget(clock, clock_area);
}

fn draw_controls(f: &mut Frame, app: &App, area: Rect) {
    let start_pause = if app.engine().state().running {
        " Pause"
    } else {
        " Start"
    };

    let mut spans = key_hint("[Space]", start_pause);
    spans.extend(key_hint("[r]", " Reset"));
    spans.extend(key_hint("[f]", " Fullscreen"));
    spans.extend(key_hint("[o]", " Settings"));
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn draw_tasks(f: &mut Frame, app: &App, area: Rect) {
    let tasks = app.tasks();
    let title = format!(" Tasks ({}/{}) ", tasks.completed_count(), tasks.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(" [a]Add [Enter]Toggle [d]Delete [j/k]Nav ")
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let (list_area, input_area) = if app.input_mode() == InputMode::AddTask {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);
        (split[0], Some(split[1]))
    } else {
        (inner, None)
    };

    if tasks.is_empty() {
        let hint = Paragraph::new(EMPTY_TASKS_HINT)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint, list_area);
    } else {
        let items: Vec<ListItem> = tasks
            .tasks()
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let selected = i == app.selected_task();
                let checkbox = if task.completed { "[x]" } else { "[ ]" };
                let prefix = if selected { "→ " } else { "  " };

                let mut style = Style::default();
                if task.completed {
                    style = style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
                }
                if selected {
                    style = style.add_modifier(Modifier::BOLD);
                }
                ListItem::new(format!("{prefix}{checkbox} {}", task.text)).style(style)
            })
            .collect();
        f.render_widget(List::new(items), list_area);
    }

    if let Some(input_area) = input_area {
        let line = Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::raw(app.task_input()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]);
        f.render_widget(Paragraph::new(line), input_area);
    }
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let line = match (app.status(), app.input_mode()) {
        (_, InputMode::AddTask) => Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
            Span::raw(" Add  "),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" Cancel"),
        ]),
        (Some(status), _) => Line::from(Span::styled(
            status,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        (None, _) => {
            let mut spans = key_hint("[Tab]", " Mode");
            spans.extend(key_hint("[Esc]", " Home"));
            spans.extend(key_hint("[q]", " Quit"));
            Line::from(spans)
        }
    };
    f.render_widget(Paragraph::new(line), area);
}

// ============================================================================
// Focus view
// ============================================================================

fn draw_focus_view(f: &mut Frame, app: &App, area: Rect) {
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(GLYPH_HEIGHT),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    draw_clock(f, app, chunks[1]);

    if app.fullscreen().cursor_visible() {
        let start_pause = if app.engine().state().running {
            " Pause"
        } else {
            " Start"
        };
        let mut spans = key_hint("[Space]", start_pause);
        spans.extend(key_hint("[Esc]", " Exit Fullscreen"));
        f.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            chunks[3],
        );
    }
}

// ============================================================================
// Settings
// ============================================================================

fn draw_settings_modal(f: &mut Frame, editor: &SettingsEditor) {
    let frame_area = f.area();
    let area = centered_rect(frame_area, 44, 9);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Timer Settings ")
        .title_bottom(" [Enter]Save [Esc]Cancel ")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = vec![Line::from("")];
    for field in editor.fields() {
        let selected = field.mode() == editor.selected();
        let bounds = field.bounds();
        let style = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let marker = if selected { "→ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<12}", field.mode().label()), style),
            Span::styled(format!("[{:>3}]", field.input()), style),
            Span::styled(
                format!(" min ({}-{})", bounds.start(), bounds.end()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }
    f.render_widget(Paragraph::new(lines), inner);
}
