use ratatui::style::{Color, Modifier, Style};

use cookfind_core::{Classification, SearchStatus};

/// Color theme for the TUI.
pub struct Theme {
    pub exact: Color,
    pub fuzzy: Color,
    pub failed: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub focused_border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub spinner: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Warm theme with green exact and amber fuzzy matches.
    pub fn kitchen() -> Self {
        Self {
            exact: Color::Green,
            fuzzy: Color::Yellow,
            failed: Color::Red,

            header_fg: Color::Black,
            header_bg: Color::LightRed,
            border: Color::DarkGray,
            focused_border: Color::Cyan,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(50, 40, 30),
            active: Color::Cyan,
            spinner: Color::Cyan,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    pub fn classification_color(&self, classification: Classification) -> Color {
        match classification {
            Classification::Exact => self.exact,
            Classification::Fuzzy => self.fuzzy,
            Classification::None => self.dim,
        }
    }

    pub fn status_color(&self, status: SearchStatus) -> Color {
        match status {
            SearchStatus::Idle => self.dim,
            SearchStatus::Running => self.active,
            SearchStatus::Stopped => self.fuzzy,
            SearchStatus::Completed => self.exact,
            SearchStatus::Failed => self.failed,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.header_bg).add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default().bg(self.highlight_bg).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focused_border)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
