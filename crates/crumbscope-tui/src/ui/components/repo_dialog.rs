use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{AppState, DialogField, DialogState};
use crate::ui::{Layout, Theme};

/// Form for adding or editing a repository
pub struct RepoDialog;

impl RepoDialog {
    pub fn render(frame: &mut Frame, state: &AppState) {
        let Some(dialog) = &state.dialog else {
            return;
        };

        let popup_area = Layout::popup(frame.area(), 64, 11);
        frame.render_widget(Clear, popup_area);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Type: ", Theme::text_dim()),
                Span::styled(dialog.kind().label(), Theme::text()),
            ]),
            Line::from(""),
            Self::field_line(dialog, DialogField::Name, "Name", &dialog.name),
            Self::field_line(
                dialog,
                DialogField::Locator,
                dialog.kind().locator_label(),
                &dialog.locator,
            ),
            Line::from(""),
        ];

        match &dialog.error {
            Some(err) => lines.push(Line::from(Span::styled(format!("⚠ {}", err), Theme::error()))),
            None => lines.push(Line::from("")),
        }
        lines.push(Line::from(Span::styled(
            "[Tab] Next field  [Enter] Save  [Esc] Cancel",
            Theme::text_dim(),
        )));

        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border_focused())
                .title(Span::styled(format!(" {} ", dialog.title()), Theme::title())),
        );
        frame.render_widget(widget, popup_area);
    }

    fn field_line<'a>(
        dialog: &DialogState,
        field: DialogField,
        label: &'a str,
        value: &'a str,
    ) -> Line<'a> {
        let focused = dialog.focus == field;
        let label_style = if focused {
            Theme::text_highlight()
        } else {
            Theme::text_dim()
        };

        let mut spans = vec![
            Span::styled(format!("{:>8}: ", label), label_style),
            Span::styled(value, Theme::text()),
        ];
        if focused {
            spans.push(Span::styled(
                "█",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        }
        Line::from(spans)
    }
}
