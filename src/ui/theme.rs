//! Colors used by the screen

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub error: Color,
    pub border: Color,
    colored: bool,
}

impl Theme {
    pub fn new(enable_color: bool) -> Self {
        Self {
            accent: Color::Cyan,
            error: Color::Red,
            border: Color::DarkGray,
            colored: enable_color,
        }
    }

    fn fg(&self, color: Color) -> Style {
        if self.colored {
            Style::default().fg(color)
        } else {
            Style::default()
        }
    }

    pub fn latency_style(&self) -> Style {
        self.fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn button_style(&self, focused: bool) -> Style {
        if focused {
            self.fg(self.accent).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default()
        }
    }

    pub fn button_border_style(&self, focused: bool) -> Style {
        if focused {
            self.fg(self.accent).add_modifier(Modifier::BOLD)
        } else {
            self.fg(self.border)
        }
    }

    pub fn error_style(&self) -> Style {
        self.fg(self.error)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().add_modifier(Modifier::DIM)
    }

    pub fn status_style(&self, status_code: Option<u16>) -> Style {
        match status_code {
            Some(code) if (200..300).contains(&code) => self.fg(Color::Green),
            Some(code) if (300..400).contains(&code) => self.fg(Color::Yellow),
            _ => self.fg(self.error),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(true)
    }
}
