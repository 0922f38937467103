use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use crumbscope_crumbs::{CrumbRow, RenderedCrumbs, render_crumbs};
use crumbscope_types::BreadcrumbLevel;

use crate::app::{AppState, Screen};
use crate::ui::{
    Layout, Theme,
    components::{StatusBar, fit_highlighted, highlighted_spans},
};

const CATEGORY_WIDTH: usize = 16;
const LEVEL_WIDTH: usize = 8;
const TIME_WIDTH: usize = 13;
/// Icon, separators and scrollbar
const FIXED_WIDTH: usize = 2 + 3 + 2;

/// Breadcrumb list with search bar
pub struct BreadcrumbsScreen;

impl BreadcrumbsScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header_area, content_area, status_area) = Layout::main(frame.area());
        let (search_area, list_area) = Layout::breadcrumbs(content_area);

        Self::render_header(frame, header_area, state);
        Self::render_search_bar(frame, search_area, state);
        Self::render_list(frame, list_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let event = state
            .snapshot
            .title
            .as_deref()
            .or(state.snapshot.event_id.as_deref())
            .unwrap_or("event");

        let title = Line::from(vec![
            Span::styled("crumbscope", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(event.to_string(), Theme::text_highlight()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(Screen::Breadcrumbs.title(), Theme::text()),
        ]);

        let header = Paragraph::new(title).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_search_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let term = state.filter.search_term();
        let mut spans = vec![Span::styled(
            " / ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )];

        if term.is_empty() && !state.search_active {
            spans.push(Span::styled("Search breadcrumbs", Theme::text_dim()));
        } else {
            spans.push(Span::styled(term.to_string(), Theme::text_highlight()));
        }

        if state.search_active {
            spans.push(Span::styled(
                "█",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        let mut levels: Vec<BreadcrumbLevel> = state.filter.levels().iter().copied().collect();
        if !levels.is_empty() {
            levels.sort_by_key(|l| std::cmp::Reverse(l.severity()));
            spans.push(Span::styled("  levels: ", Theme::text_dim()));
            for (i, level) in levels.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled(", ", Theme::text_dim()));
                }
                spans.push(Span::styled(level.label(), Style::default().fg(level.color())));
            }
        }

        if let Some(kind) = state.filter.kinds().iter().next() {
            spans.push(Span::styled("  type: ", Theme::text_dim()));
            spans.push(Span::styled(kind.label(), Style::default().fg(kind.color())));
        }

        if state.search_active {
            spans.push(Span::styled("  [Enter] Done  [Esc] Clear", Theme::text_dim()));
        } else if state.filter.is_active() {
            spans.push(Span::styled("  [n] Clear  [/] Edit", Theme::text_dim()));
        }

        let border = if state.search_active {
            Theme::border_focused()
        } else {
            Theme::border()
        };
        let bar = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border),
        );

        frame.render_widget(bar, area);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let visible = state.filter.visible_indices(&state.store).to_vec();
        let rendered = render_crumbs(
            &state.store,
            &visible,
            state.filter.filter(),
            &state.snapshot,
            state.relative_time,
        );

        let inner_width = area.width.saturating_sub(2) as usize;
        let lines = Self::build_lines(&rendered, state.show_data, inner_width);

        let inner_height = area.height.saturating_sub(2) as usize;
        let max_scroll = lines.len().saturating_sub(inner_height);
        state.scroll = state.scroll.min(max_scroll);

        let visible_lines: Vec<Line> = lines
            .into_iter()
            .skip(state.scroll)
            .take(inner_height)
            .collect();

        let title = if state.filter.is_active() {
            format!(" Breadcrumbs ({} of {}) ", rendered.rows.len(), rendered.total)
        } else {
            format!(" Breadcrumbs ({}) ", rendered.total)
        };

        let list = Paragraph::new(visible_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(title, Theme::title())),
        );
        frame.render_widget(list, area);

        if max_scroll > 0 {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"));
            let mut scrollbar_state = ScrollbarState::default()
                .content_length(max_scroll)
                .position(state.scroll);

            frame.render_stateful_widget(
                scrollbar,
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
    }

    /// All lines of the list: rows, the empty indicator, then the last crumb
    fn build_lines(rendered: &RenderedCrumbs, show_data: bool, width: usize) -> Vec<Line<'static>> {
        let message_width = width.saturating_sub(FIXED_WIDTH + CATEGORY_WIDTH + LEVEL_WIDTH + TIME_WIDTH);
        let mut lines = Vec::new();

        for row in &rendered.rows {
            lines.push(Self::row_line(row, message_width));
            if !show_data {
                continue;
            }
            if let Some(data) = &row.data {
                let mut spans = vec![Span::raw("    ")];
                spans.extend(highlighted_spans(data, Theme::text_dim()));
                lines.push(Line::from(spans));
            }
        }

        if let Some(empty) = &rendered.empty {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  {}", empty.message()),
                Theme::text_dim(),
            )));
            lines.push(Line::from(""));
        }

        lines.push(Self::row_line(&rendered.last_crumb, message_width).patch_style(Theme::last_crumb()));

        lines
    }

    fn row_line(row: &CrumbRow, message_width: usize) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!("{} ", row.crumb_type.icon()),
            Style::default().fg(row.crumb_type.color()),
        )];

        spans.extend(fit_highlighted(&row.category, Theme::text_highlight(), CATEGORY_WIDTH));
        spans.push(Span::raw(" "));
        spans.extend(fit_highlighted(&row.message, Theme::text(), message_width));
        spans.push(Span::raw(" "));
        spans.extend(fit_highlighted(
            &row.level_label,
            Style::default().fg(row.level.color()),
            LEVEL_WIDTH,
        ));
        spans.push(Span::raw(" "));

        match &row.time_display {
            Some(time) => spans.extend(fit_highlighted(time, Theme::text_dim(), TIME_WIDTH)),
            None => spans.push(Span::raw(" ".repeat(TIME_WIDTH))),
        }

        Line::from(spans)
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let counts = state.store.level_counts();
        let mut status = StatusBar::for_screen(Screen::Breadcrumbs);

        if let Some(err) = &state.error_message {
            status = status.right(err.clone(), Theme::error());
        } else {
            let time_mode = if state.relative_time {
                "relative"
            } else {
                "absolute"
            };
            status = status.right(
                format!(
                    "E:{} W:{} I:{} | {} | {} crumbs",
                    counts.error + counts.fatal,
                    counts.warning,
                    counts.info,
                    time_mode,
                    counts.total()
                ),
                Theme::status_bar(),
            );
        }

        frame.render_widget(status, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumbscope_crumbs::{BreadcrumbStore, CrumbFilter};
    use crumbscope_types::{Breadcrumb, EventSnapshot};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn store() -> BreadcrumbStore {
        BreadcrumbStore::new(vec![
            Breadcrumb::new("sup", BreadcrumbLevel::Info).with_category("ui"),
            Breadcrumb::new("hey", BreadcrumbLevel::Warning).with_category("console"),
        ])
    }

    #[test]
    fn test_last_crumb_is_always_last() {
        let store = store();
        let filter = CrumbFilter::new("nothing matches this");
        let visible = filter.apply(store.all());
        let rendered = render_crumbs(&store, &visible, &filter, &EventSnapshot::default(), false);

        let lines = BreadcrumbsScreen::build_lines(&rendered, true, 100);
        assert!(
            lines
                .iter()
                .any(|l| line_text(l).contains("Sorry, no breadcrumbs match your search query"))
        );
        assert!(line_text(lines.last().unwrap()).contains("message"));
    }

    #[test]
    fn test_rows_fill_width() {
        let store = store();
        let filter = CrumbFilter::default();
        let visible = filter.apply(store.all());
        let rendered = render_crumbs(&store, &visible, &filter, &EventSnapshot::default(), false);

        let lines = BreadcrumbsScreen::build_lines(&rendered, false, 100);
        assert_eq!(lines.len(), 3);
        assert!(line_text(&lines[0]).contains("sup"));
        assert!(line_text(&lines[1]).contains("Warning"));
    }
}
