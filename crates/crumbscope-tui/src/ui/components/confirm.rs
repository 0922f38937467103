use ratatui::{
    Frame,
    layout::Alignment,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::AppState;
use crate::ui::{Layout, Theme};

/// Delete confirmation for the repository list
pub struct ConfirmPopup;

impl ConfirmPopup {
    pub fn render(frame: &mut Frame, state: &AppState) {
        let Some(id) = &state.confirm_delete else {
            return;
        };
        let name = state
            .repositories
            .iter()
            .find(|r| &r.id == id)
            .map(|r| r.name.as_str())
            .unwrap_or(id.as_str());

        let popup_area = Layout::popup(frame.area(), 56, 6);
        frame.render_widget(Clear, popup_area);

        let lines = vec![
            Line::from(vec![
                Span::styled("Remove ", Theme::text()),
                Span::styled(name, Theme::text_highlight()),
                Span::styled("?", Theme::text()),
            ]),
            Line::from(""),
            Line::from(Span::styled("[y] Remove  [n] Cancel", Theme::text_dim())),
        ];

        let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::error())
                .title(Span::styled(" Remove Repository ", Theme::error())),
        );
        frame.render_widget(widget, popup_area);
    }
}
