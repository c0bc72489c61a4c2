//! Colors and styles for the terminal user interface.

use ratatui::style::{Color, Modifier, Style};

pub const GREEN: Color = Color::Rgb(0x25, 0xA0, 0x65);
pub const PURPLE: Color = Color::Rgb(0xAD, 0x58, 0xB4);
pub const MINT: Color = Color::Rgb(0x04, 0xB5, 0x75);
pub const RED: Color = Color::Rgb(0xFF, 0x55, 0x55);
/// Focused input border.
pub const GOLD: Color = Color::Rgb(255, 215, 0);

/// Every style the renderer uses. Passed in; the app state never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub header: Style,
    pub selected: Style,
    pub done: Style,
    pub dim: Style,
    pub overdue: Style,
    pub focused: Style,
    pub info: Style,
    pub error: Style,
    pub key: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header: Style::default()
                .fg(Color::White)
                .bg(GREEN)
                .add_modifier(Modifier::BOLD),
            selected: Style::default().fg(PURPLE).add_modifier(Modifier::BOLD),
            done: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
            dim: Style::default().fg(Color::Gray),
            overdue: Style::default().fg(RED),
            focused: Style::default().fg(GOLD),
            info: Style::default().fg(MINT),
            error: Style::default().fg(RED).add_modifier(Modifier::BOLD),
            key: Style::default().fg(PURPLE).add_modifier(Modifier::BOLD),
        }
    }
}

impl Theme {
    /// No colors, for terminals that cannot show them.
    pub fn plain() -> Self {
        let plain = Style::default();
        Self {
            header: plain.add_modifier(Modifier::BOLD),
            selected: plain.add_modifier(Modifier::REVERSED),
            done: plain.add_modifier(Modifier::CROSSED_OUT),
            dim: plain,
            overdue: plain.add_modifier(Modifier::BOLD),
            focused: plain.add_modifier(Modifier::BOLD),
            info: plain,
            error: plain.add_modifier(Modifier::BOLD),
            key: plain.add_modifier(Modifier::BOLD),
        }
    }
}
