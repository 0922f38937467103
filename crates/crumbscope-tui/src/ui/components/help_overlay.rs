use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::Screen;
use crate::ui::Layout;

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame, screen: Screen) {
        let mut help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        match screen {
            Screen::Breadcrumbs => {
                help_text.push(Self::section("Navigation"));
                help_text.push(Self::key_line("j/↓", "Scroll down"));
                help_text.push(Self::key_line("k/↑", "Scroll up"));
                help_text.push(Self::key_line("Ctrl+d", "Page down"));
                help_text.push(Self::key_line("Ctrl+u", "Page up"));
                help_text.push(Self::key_line("g / G", "Top / bottom"));
                help_text.push(Line::from(""));
                help_text.push(Self::section("Filter"));
                help_text.push(Self::key_line("/", "Search breadcrumbs"));
                help_text.push(Self::key_line("n", "Clear search"));
                help_text.push(Self::key_line("1-5", "Toggle level fatal..debug"));
                help_text.push(Self::key_line("e / w", "Errors only / warnings and above"));
                help_text.push(Self::key_line("c", "Cycle breadcrumb type"));
                help_text.push(Self::key_line("0", "Clear level and type filters"));
                help_text.push(Line::from(""));
                help_text.push(Self::section("Display"));
                help_text.push(Self::key_line("t", "Relative / absolute time"));
                help_text.push(Self::key_line("d", "Toggle data"));
            }
            Screen::Repositories => {
                help_text.push(Self::section("Repositories"));
                help_text.push(Self::key_line("j/k", "Move selection"));
                help_text.push(Self::key_line("a", "Add repository"));
                help_text.push(Self::key_line("e/Enter", "Edit repository"));
                help_text.push(Self::key_line("d", "Delete repository"));
                help_text.push(Self::key_line("r", "Reload from server"));
                help_text.push(Line::from(""));
                help_text.push(Self::section("Dialog"));
                help_text.push(Self::key_line("Tab", "Next field"));
                help_text.push(Self::key_line("Enter", "Save"));
                help_text.push(Self::key_line("Esc", "Cancel"));
            }
        }

        help_text.push(Line::from(""));
        help_text.push(Self::section("General"));
        help_text.push(Self::key_line("Tab", "Switch screen"));
        help_text.push(Self::key_line("x", "Dismiss notification"));
        help_text.push(Self::key_line("?", "Toggle this help"));
        help_text.push(Self::key_line("q", "Quit"));

        let height = help_text.len() as u16 + 2;
        let popup_area = Layout::popup(frame.area(), 50, height);
        frame.render_widget(Clear, popup_area);

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .title(Span::styled(
                    " Help ",
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn section(title: &str) -> Line<'_> {
        Line::from(Span::styled(title, Style::default().fg(Color::Yellow)))
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {:>8}", key), Style::default().fg(Color::Green)),
            Span::styled(format!("  {}", desc), Style::default().fg(Color::White)),
        ])
    }
}
