// Colours for the TUI
//
// Bar and point colours come from the scene (`Rgb`); everything around
// them comes from here.

use crate::coordinator::color::Rgb;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Complete theme definition with all UI colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_type: BorderType,
    /// Border of the focused panel
    pub highlight: Color,
    pub title: Color,
    pub selection: Color,
    pub selection_fg: Color,
    /// Bars the user has clicked
    pub clicked: Color,
    /// Brushed region of a density strip
    pub brush: Color,
    pub cursor: Color,
    pub status_bar: Color,
    pub error: Color,
    pub warn: Color,
    pub info: Color,
    pub debug: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::Gray,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_type: BorderType::Rounded,
            highlight: Color::Cyan,
            title: Color::Cyan,
            selection: Color::Rgb(0x3a, 0x3f, 0x4b),
            selection_fg: Color::White,
            clicked: Color::Rgb(0xfd, 0xae, 0x61),
            brush: Color::Rgb(0x5e, 0x81, 0xac),
            cursor: Color::Yellow,
            status_bar: Color::Gray,
            error: Color::Red,
            warn: Color::Yellow,
            info: Color::Green,
            debug: Color::DarkGray,
        }
    }
}

impl Theme {
    /// Border style for a panel
    pub fn panel_border(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.border)
        }
    }
}

/// Terminal colour for a scene colour
pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}
