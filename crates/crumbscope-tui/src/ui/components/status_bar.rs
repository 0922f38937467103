use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::app::Screen;
use crate::ui::Theme;

/// Status bar showing keyboard shortcuts
pub struct StatusBar<'a> {
    hints: Vec<(&'a str, &'a str)>,
    right: Vec<Span<'a>>,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self {
            hints: Vec::new(),
            right: Vec::new(),
        }
    }

    /// Add keyboard hints as (key, description) pairs
    pub fn hints<I>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.hints = hints.into_iter().collect();
        self
    }

    /// Append a span to the right-aligned section
    pub fn right<S: Into<String>>(mut self, text: S, style: Style) -> Self {
        self.right.push(Span::styled(text.into(), style));
        self
    }
}

impl StatusBar<'static> {
    /// Default hints for a screen
    pub fn for_screen(screen: Screen) -> Self {
        let hints: &'static [(&'static str, &'static str)] = match screen {
            Screen::Breadcrumbs => &[
                ("/", "Search"),
                ("1-5", "Levels"),
                ("t", "Time"),
                ("Tab", "Repositories"),
                ("?", "Help"),
                ("q", "Quit"),
            ],
            Screen::Repositories => &[
                ("a", "Add"),
                ("e", "Edit"),
                ("d", "Delete"),
                ("r", "Refresh"),
                ("Tab", "Breadcrumbs"),
                ("?", "Help"),
            ],
        };
        Self::new().hints(hints.iter().copied())
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        buf.set_style(area, Theme::status_bar());

        let mut spans = Vec::new();
        for (i, (key, desc)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Theme::status_bar()));
            }
            spans.push(Span::styled(format!("[{}]", key), Theme::status_bar_key()));
            spans.push(Span::styled(format!(" {}", desc), Theme::status_bar()));
        }

        let line = Line::from(spans);
        let line_width = line.width() as u16;
        buf.set_line(area.x + 1, area.y, &line, area.width.saturating_sub(2));

        if self.right.is_empty() {
            return;
        }
        let right_width: usize = self.right.iter().map(|s| s.content.width()).sum();
        let right_width = right_width as u16;
        let right_x = area.x + area.width.saturating_sub(right_width + 1);
        // Only draw when it doesn't overlap the hints
        if right_x > area.x + line_width + 2 {
            let right = Line::from(self.right);
            buf.set_line(right_x, area.y, &right, right_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_hints_and_right_text() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .hints([("q", "Quit")])
            .right("3 of 7", Theme::status_bar())
            .render(area, &mut buf);

        let text = row_text(&buf, 60);
        assert!(text.starts_with(" [q] Quit"));
        assert!(text.trim_end().ends_with("3 of 7"));
    }

    #[test]
    fn test_right_text_dropped_when_crowded() {
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .hints([("q", "Quit")])
            .right("a long right side", Theme::status_bar())
            .render(area, &mut buf);

        assert!(!row_text(&buf, 12).contains("right"));
    }
}
