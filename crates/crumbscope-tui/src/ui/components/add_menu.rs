use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::AppState;
use crate::ui::{Layout, Theme};

/// "Add Repository" dropdown with a search field
pub struct AddMenu;

impl AddMenu {
    pub fn render(frame: &mut Frame, state: &AppState) {
        let Some(menu) = &state.menu else {
            return;
        };
        let items = state.menu_items();

        let height = (items.len() as u16).max(1) + 5;
        let popup_area = Layout::popup(frame.area(), 44, height);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(" Add Repository ", Theme::title()));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let input_area = Rect::new(inner.x, inner.y, inner.width, 1);
        let list_area = Rect::new(
            inner.x,
            inner.y + 2,
            inner.width,
            inner.height.saturating_sub(2),
        );

        let input = Line::from(vec![
            Span::styled(" > ", Theme::text_highlight()),
            if menu.query.is_empty() {
                Span::styled("Filter repository types", Theme::text_dim())
            } else {
                Span::styled(menu.query.clone(), Theme::text())
            },
            Span::styled(
                "█",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ]);
        frame.render_widget(Paragraph::new(input), input_area);

        if items.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" No matching repository types", Theme::text_dim())),
                list_area,
            );
            return;
        }

        let list_items: Vec<ListItem> = items
            .iter()
            .map(|item| {
                let style = if item.disabled {
                    Theme::list_item_disabled()
                } else {
                    Theme::list_item()
                };
                ListItem::new(Line::from(Span::styled(format!(" {}", item.label), style)))
            })
            .collect();

        let list = List::new(list_items).highlight_style(Theme::list_item_selected());
        let mut list_state = ListState::default().with_selected(Some(menu.selected));
        frame.render_stateful_widget(list, list_area, &mut list_state);
    }
}
