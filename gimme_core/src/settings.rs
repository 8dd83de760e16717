use std::ops::RangeInclusive;

/// Smallest font size the controls allow
pub const MIN_FONT_SIZE: u8 = 10;

/// Largest font size the controls allow
pub const MAX_FONT_SIZE: u8 = 24;

/// Font size before anyone touches it
pub const DEFAULT_FONT_SIZE: u8 = 14;

/// The range `font_size` is kept in.
pub const FONT_SIZES: RangeInclusive<u8> = MIN_FONT_SIZE..=MAX_FONT_SIZE;

/// Cosmetic editor preferences. None of these affect what gets shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Dark or light palette
    pub dark_mode: bool,

    /// Soft-wrap long lines at the edge of the editor
    pub word_wrap: bool,

    /// Editor font size, in pixels. Always within `FONT_SIZES`.
    font_size: u8,
}

impl Settings {
    /// The current font size
    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    /// Set the font size, clamped to the allowed range.
    pub fn set_font_size(&mut self, size: u8) {
        self.font_size = size.clamp(*FONT_SIZES.start(), *FONT_SIZES.end());
    }

    /// One step bigger, if we can go that far.
    pub fn grow_font(&mut self) {
        self.set_font_size(self.font_size.saturating_add(1));
    }

    /// One step smaller, if we can go that far.
    pub fn shrink_font(&mut self) {
        self.set_font_size(self.font_size.saturating_sub(1));
    }

    /// Flip between dark and light.
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    /// Flip soft wrapping.
    pub fn toggle_word_wrap(&mut self) {
        self.word_wrap = !self.word_wrap;
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            word_wrap: true,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}
