use ratatui::{
    Frame,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::app::AppState;
use crate::ui::{Layout, Theme};

use super::truncate_to_width;

const MAX_WIDTH: u16 = 60;

/// Success and error notifications, newest at the bottom
pub struct Toasts;

impl Toasts {
    pub fn render(frame: &mut Frame, state: &AppState) {
        let area = frame.area();

        for (slot, toast) in state.toasts.iter().rev().enumerate() {
            let notification = &toast.notification;
            let (icon, style) = if notification.is_error() {
                ("✗ ", Theme::error())
            } else {
                ("✓ ", Theme::success())
            };

            let width = (notification.text().width() as u16 + 6).min(MAX_WIDTH);
            let Some(toast_area) = Layout::toast(area, slot as u16, width) else {
                break;
            };

            let text = truncate_to_width(notification.text(), width.saturating_sub(6) as usize);
            let body = Paragraph::new(Line::from(vec![
                Span::styled(icon, style),
                Span::styled(text, Theme::text()),
            ]))
            .block(Block::default().borders(Borders::ALL).border_style(style));

            frame.render_widget(Clear, toast_area);
            frame.render_widget(body, toast_area);
        }
    }
}
