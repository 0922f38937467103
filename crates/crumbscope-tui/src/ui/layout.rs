use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Layout helper for consistent screen layouts
pub struct Layout;

impl Layout {
    /// Create the main layout with header, content, and status bar
    pub fn main(area: Rect) -> (Rect, Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        (chunks[0], chunks[1], chunks[2])
    }

    /// Split breadcrumb content into search bar and list
    pub fn breadcrumbs(area: Rect) -> (Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        (chunks[0], chunks[1])
    }

    /// A popup of at most `width` x `height`, centered in `area`
    pub fn popup(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width.saturating_sub(4));
        let height = height.min(area.height.saturating_sub(2));
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width, height)
    }

    /// Slot `index` of the toast stack in the bottom right corner
    pub fn toast(area: Rect, index: u16, width: u16) -> Option<Rect> {
        const HEIGHT: u16 = 3;
        let width = width.min(area.width);
        // Keep the status bar visible
        let bottom = area.y + area.height.saturating_sub(1);
        let offset = HEIGHT * (index + 1);
        if offset > bottom.saturating_sub(area.y) {
            return None;
        }
        Some(Rect::new(
            area.x + area.width - width,
            bottom - offset,
            width,
            HEIGHT,
        ))
    }
}
