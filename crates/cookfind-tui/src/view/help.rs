use std::path::Path;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme, log_dir: Option<&Path>) {
    let area = f.area();
    let popup = centered_rect(56, 26, area);

    let paragraph = Paragraph::new(help_lines(theme, log_dir))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn help_lines<'a>(theme: &Theme, log_dir: Option<&Path>) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("Search", theme),
        key_line("Enter", "Search for the typed recipe name", theme),
        key_line("Ctrl+s", "Stop searching, keep results", theme),
        key_line("Ctrl+l", "Stop searching and clear results", theme),
        Line::from(""),
        section_header("Results", theme),
        key_line("Tab", "Cycle input / exact / fuzzy", theme),
        key_line("j / ↓", "Move down", theme),
        key_line("k / ↑", "Move up", theme),
        key_line("g / G", "Go to top / bottom", theme),
        key_line("c / Enter", "Copy recipe link (HTML)", theme),
        key_line("o", "Open recipe in browser", theme),
        key_line("Esc or /", "Back to the input box", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q", "Quit (from results)", theme),
        key_line("Ctrl+c", "Quit", theme),
    ];
    if let Some(dir) = log_dir {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  Logs: {}", dir.display()),
            Style::default().fg(theme.dim),
        )));
    }
    lines
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<12}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}

/// Create a centered rectangle of the given width (columns) and height (rows).
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn log_dir_listed_when_known() {
        let theme = Theme::kitchen();
        let with = text(&help_lines(&theme, Some(Path::new("/tmp/cookfind/logs"))));
        assert!(with.contains("Logs: /tmp/cookfind/logs"));
        let without = text(&help_lines(&theme, None));
        assert!(!without.contains("Logs:"));
        assert!(without.contains("Ctrl+s"));
    }
}
