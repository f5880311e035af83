//! Block-letter text widget for the clock and the landing title.
//!
//! Glyphs are 5 rows tall and drawn with full blocks. Only the characters
//! the app renders have glyphs; anything else draws as blank space.

use ratatui::prelude::*;
use ratatui::widgets::Widget;

/// Height of every glyph, in rows.
pub const GLYPH_HEIGHT: u16 = 5;

const SPACING: u16 = 1;

/// Large text made of block glyphs.
pub struct BigText<'a> {
    text: &'a str,
    style: Style,
}

impl<'a> BigText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Width in columns when rendered, including letter spacing.
    pub fn width(&self) -> u16 {
        let glyphs: u16 = self.text.chars().map(|ch| glyph(ch)[0].len() as u16).sum();
        let gaps = (self.text.chars().count() as u16).saturating_sub(1) * SPACING;
        glyphs + gaps
    }

    /// Rect of the rendered text centered in `area`.
    pub fn centered_in(&self, area: Rect) -> Rect {
        let width = self.width().min(area.width);
        let height = GLYPH_HEIGHT.min(area.height);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }
}

impl Widget for BigText<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut x_offset = 0u16;

        for ch in self.text.chars() {
            let rows = glyph(ch);
            let width = rows[0].len() as u16;
            if x_offset + width > area.width {
                break;
            }

            for (y, row) in rows.iter().enumerate().take(area.height as usize) {
                for (x, mark) in row.bytes().enumerate() {
                    if mark != b'#' {
                        continue;
                    }
                    let position = (area.left() + x_offset + x as u16, area.top() + y as u16);
                    if let Some(cell) = buf.cell_mut(position) {
                        cell.set_style(self.style).set_symbol("█");
                    }
                }
            }
            x_offset += width + SPACING;
        }
    }
}

fn glyph(ch: char) -> [&'static str; 5] {
    match ch.to_ascii_uppercase() {
        '0' => ["###", "# #", "# #", "# #", "###"],
        '1' => [" # ", "## ", " # ", " # ", "###"],
        '2' => ["###", "  #", "###", "#  ", "###"],
        '3' => ["###", "  #", "###", "  #", "###"],
        '4' => ["# #", "# #", "###", "  #", "  #"],
        '5' => ["###", "#  ", "###", "  #", "###"],
        '6' => ["###", "#  ", "###", "# #", "###"],
        '7' => ["###", "  #", "  #", "  #", "  #"],
        '8' => ["###", "# #", "###", "# #", "###"],
        '9' => ["###", "# #", "###", "  #", "###"],
        ':' => [" ", "#", " ", "#", " "],
        'C' => ["###", "#  ", "#  ", "#  ", "###"],
        'I' => ["###", " # ", " # ", " # ", "###"],
        'K' => ["# #", "## ", "#  ", "## ", "# #"],
        'L' => ["#  ", "#  ", "#  ", "#  ", "###"],
        'N' => ["#  #", "## #", "# ##", "#  #", "#  #"],
        'O' => ["###", "# #", "# #", "# #", "###"],
        _ => ["  ", "  ", "  ", "  ", "  "],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width() {
        assert_eq!(BigText::new("25:00").width(), 3 + 1 + 3 + 1 + 1 + 1 + 3 + 1 + 3);
        assert_eq!(BigText::new("").width(), 0);
        assert_eq!(BigText::new("LOCK IN").width(), 3 + 3 + 3 + 3 + 2 + 3 + 4 + 6);
    }

    #[test]
    fn test_glyphs_are_rectangular() {
        for ch in "0123456789:CIKLNO ".chars() {
            let rows = glyph(ch);
            assert!(rows.iter().all(|r| r.len() == rows[0].len()), "glyph {ch:?}");
        }
    }

    #[test]
    fn test_render_marks_cells() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);

        BigText::new("1").render(area, &mut buf);

        assert_eq!(buf[(1, 0)].symbol(), "█");
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(0, 4)].symbol(), "█");
    }

    #[test]
    fn test_render_truncates_to_area() {
        let area = Rect::new(0, 0, 5, 5);
        let mut buf = Buffer::empty(area);

        BigText::new("88").render(area, &mut buf);

        assert_eq!(buf[(4, 0)].symbol(), " ");
    }

    #[test]
    fn test_centered_in() {
        let text = BigText::new("00");
        let rect = text.centered_in(Rect::new(0, 0, 17, 11));
        assert_eq!(rect, Rect::new(5, 3, 7, 5));
    }
}
