use ratatui::{style::Style, text::Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crumbscope_crumbs::Highlighted;

use crate::ui::Theme;

/// Control characters would break the terminal line
fn printable(c: char) -> char {
    if c.is_control() { ' ' } else { c }
}

/// Spans for a highlighted cell, matches drawn with the search style
pub fn highlighted_spans(cell: &Highlighted, base: Style) -> Vec<Span<'static>> {
    cell.segments()
        .into_iter()
        .filter(|(text, _)| !text.is_empty())
        .map(|(text, is_match)| {
            let style = if is_match {
                Theme::search_match()
            } else {
                base
            };
            Span::styled(text.chars().map(printable).collect::<String>(), style)
        })
        .collect()
}

/// Highlighted spans fitted to exactly `width` columns.
///
/// Control characters are drawn as spaces; an ellipsis marks a cut.
pub fn fit_highlighted(cell: &Highlighted, base: Style, width: usize) -> Vec<Span<'static>> {
    let total = cell.text.width();
    let limit = if total > width {
        width.saturating_sub(1)
    } else {
        width
    };

    let mut spans = Vec::new();
    let mut used = 0;
    for (text, is_match) in cell.segments() {
        let mut piece = String::new();
        for c in text.chars() {
            let c = printable(c);
            let w = c.width().unwrap_or(0);
            if used + w > limit {
                break;
            }
            piece.push(c);
            used += w;
        }
        if !piece.is_empty() {
            let style = if is_match {
                Theme::search_match()
            } else {
                base
            };
            spans.push(Span::styled(piece, style));
        }
        if used >= limit {
            break;
        }
    }

    if total > width && width > 0 {
        spans.push(Span::styled("…", base));
        used += 1;
    }
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
    spans
}

/// Cut `text` to at most `width` columns, ending in an ellipsis when cut
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Truncate or pad `text` to exactly `width` columns
pub fn pad_to_width(text: &str, width: usize) -> String {
    let mut out = truncate_to_width(text, width);
    let used = out.width();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumbscope_crumbs::CrumbFilter;

    #[test]
    fn test_match_segments_styled() {
        let cell = Highlighted::new("hey sup there", &CrumbFilter::new("sup"));
        let spans = highlighted_spans(&cell, Theme::text());

        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].content, "sup");
        assert_eq!(spans[1].style, Theme::search_match());
        assert_eq!(spans[0].style, Theme::text());
    }

    #[test]
    fn test_spans_blank_control_characters() {
        let cell = Highlighted::new("{\"query\":\"a\n\tsup\"}", &CrumbFilter::new("sup"));
        let spans = highlighted_spans(&cell, Theme::text());

        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "{\"query\":\"a  sup\"}");
        assert!(spans.iter().all(|s| !s.content.chars().any(char::is_control)));
    }

    #[test]
    fn test_fit_keeps_highlight_when_cut() {
        let cell = Highlighted::new("sup sup sup", &CrumbFilter::new("sup"));
        let spans = fit_highlighted(&cell, Theme::text(), 6);

        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "sup s…");
        assert_eq!(spans[0].style, Theme::search_match());
    }

    #[test]
    fn test_fit_pads_short_text() {
        let cell = Highlighted::plain("ui\nclick");
        let spans = fit_highlighted(&cell, Theme::text(), 10);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "ui click  ");
    }

    #[test]
    fn test_truncate_counts_columns() {
        assert_eq!(truncate_to_width("navigation", 20), "navigation");
        assert_eq!(truncate_to_width("navigation", 5), "navi…");
        // Wide glyphs take two columns each
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad_to_width("ui", 4), "ui  ");
        assert_eq!(pad_to_width("console", 4).width(), 4);
    }
}
