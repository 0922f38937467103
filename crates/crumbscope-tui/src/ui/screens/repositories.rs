use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crumbscope_repos::FEATURE_CUSTOM_SYMBOL_SOURCES;

use crate::app::{AppState, ControlState, Screen};
use crate::ui::{
    Layout, Theme,
    components::{AddMenu, ConfirmPopup, RepoDialog, StatusBar, pad_to_width},
};

const NAME_WIDTH: usize = 24;
const KIND_WIDTH: usize = 22;

/// Custom repository list with its add menu and dialogs
pub struct RepositoriesScreen;

impl RepositoriesScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header_area, content_area, status_area) = Layout::main(frame.area());

        Self::render_header(frame, header_area, state);
        Self::render_list(frame, content_area, state);
        Self::render_status_bar(frame, status_area, state);

        AddMenu::render(frame, state);
        RepoDialog::render(frame, state);
        ConfirmPopup::render(frame, state);
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let project = if state.project.is_empty() {
            "project"
        } else {
            state.project.as_str()
        };

        let add_style = if state.access.can_add(state.loading) {
            Theme::text_highlight()
        } else {
            Theme::text_dim()
        };

        let title = Line::from(vec![
            Span::styled("crumbscope", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(project.to_string(), Theme::text_highlight()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(Screen::Repositories.title(), Theme::text()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled("[a] Add Repository", add_style),
        ]);

        let header = Paragraph::new(title).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title(Span::styled(
                format!(" Repositories ({}) ", state.repositories.len()),
                Theme::title(),
            ));

        let mut notice = Vec::new();
        if !state.access.has_feature(FEATURE_CUSTOM_SYMBOL_SOURCES) {
            notice.push(Line::from(Span::styled(
                " This feature is not enabled on your installation.",
                Theme::error(),
            )));
        }

        if state.loading || state.repositories.is_empty() {
            let text = if state.loading {
                " Loading…"
            } else {
                " No custom repositories configured"
            };
            notice.push(Line::from(Span::styled(text, Theme::text_dim())));
            frame.render_widget(Paragraph::new(notice).block(block), area);
            return;
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let notice_height = notice.len() as u16;
        if notice_height > 0 {
            let notice_area = Rect::new(inner.x, inner.y, inner.width, notice_height);
            frame.render_widget(Paragraph::new(notice), notice_area);
        }
        let list_area = Rect::new(
            inner.x,
            inner.y + notice_height,
            inner.width,
            inner.height.saturating_sub(notice_height),
        );

        let items: Vec<ListItem> = state
            .repositories
            .iter()
            .map(|repo| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {}", pad_to_width(&repo.name, NAME_WIDTH)), Theme::text()),
                    Span::styled(pad_to_width(repo.kind().label(), KIND_WIDTH), Theme::text_dim()),
                    Span::styled(repo.source.details(), Theme::text_dim()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Theme::list_item_selected())
            .highlight_symbol("▶");
        frame.render_stateful_widget(list, list_area, &mut state.repo_list);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let mut status = StatusBar::for_screen(Screen::Repositories);

        if let Some(err) = &state.error_message {
            status = status.right(err.clone(), Theme::error());
        } else if let Some(label) = state.control.label() {
            let style = match state.control {
                ControlState::Error(_) => Theme::error(),
                ControlState::Saved => Theme::success(),
                _ => Theme::status_bar(),
            };
            status = status.right(label, style);
        }

        frame.render_widget(status, area);
    }
}
