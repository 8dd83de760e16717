use gimme_core::Level;
use ratatui::style::{Color, Modifier, Style};

/// Colors for everything we draw, in one of two flavors.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// Page background
    pub background: Color,

    /// Panel and toast background
    pub surface: Color,

    /// Normal text
    pub text: Color,

    /// Dimmed text, like line numbers and disabled controls
    pub muted: Color,

    /// Titles, focused borders, the share button
    pub accent: Color,

    /// The load button
    pub secondary: Color,

    /// Success toasts
    pub success: Color,

    /// Error toasts
    pub error: Color,
}

/// Warm dark colors
pub const DARK: Palette = Palette {
    background: Color::Rgb(0x1D, 0x20, 0x21),
    surface: Color::Rgb(0x3C, 0x38, 0x36),
    text: Color::Rgb(0xD4, 0xBE, 0x98),
    muted: Color::Rgb(0x7C, 0x6F, 0x64),
    accent: Color::Rgb(0xD8, 0xA6, 0x57),
    secondary: Color::Rgb(0x7D, 0xAE, 0xA3),
    success: Color::Rgb(0xA9, 0xB6, 0x65),
    error: Color::Rgb(0xEA, 0x69, 0x62),
};

/// Warm light colors
pub const LIGHT: Palette = Palette {
    background: Color::Rgb(0xF9, 0xF5, 0xD7),
    surface: Color::Rgb(0xEB, 0xDB, 0xB2),
    text: Color::Rgb(0x3C, 0x38, 0x36),
    muted: Color::Rgb(0x92, 0x83, 0x74),
    accent: Color::Rgb(0x9D, 0x00, 0x06),
    secondary: Color::Rgb(0x45, 0x85, 0x88),
    success: Color::Rgb(0x79, 0x74, 0x0E),
    error: Color::Rgb(0xCC, 0x24, 0x1D),
};

impl Palette {
    /// Pick a palette
    pub fn for_mode(dark_mode: bool) -> &'static Palette {
        if dark_mode {
            &DARK
        } else {
            &LIGHT
        }
    }

    /// The base style for the whole screen
    pub fn base(&self) -> Style {
        Style::new().fg(self.text).bg(self.background)
    }

    /// Style for a border, depending on whether the thing inside has focus
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::new().fg(self.accent)
        } else {
            Style::new().fg(self.muted)
        }
    }

    /// Style for a button
    pub fn button(&self, color: Color, enabled: bool) -> Style {
        if enabled {
            Style::new()
                .fg(self.background)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(self.muted).bg(self.surface)
        }
    }

    /// The color that marks a toast of a given level
    pub fn level(&self, level: Level) -> Color {
        match level {
            Level::Pending => self.accent,
            Level::Success => self.success,
            Level::Error => self.error,
        }
    }
}
