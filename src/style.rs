//! Styling primitives and the tagged content item.
//!
//! Content callbacks hand back [`Item`]s. A plain item is written as-is (it
//! may already carry its own escape sequences); a styled item is wrapped in
//! the SGR sequences for its [`Style`] and followed by a reset.

use bitflags::bitflags;
use std::fmt::Write as _;

/// True-color RGB representation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// # Example
    /// ```
    /// use casement::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::UNDERLINE;
    /// assert!(style.contains(Modifiers::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Reversed colors (fg/bg swapped)
        const REVERSED = 0b0010_0000;
        /// Strikethrough text
        const STRIKETHROUGH = 0b1000_0000;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// Foreground, background and modifiers applied to a styled item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    /// Foreground color (terminal default when `None`).
    pub fg: Option<Rgb>,
    /// Background color (terminal default when `None`).
    pub bg: Option<Rgb>,
    /// Text modifiers.
    pub modifiers: Modifiers,
}

impl Style {
    /// Style with no attributes.
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            modifiers: Modifiers::empty(),
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, color: Rgb) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, color: Rgb) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add modifiers.
    #[must_use]
    pub fn add(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    /// Check whether this style changes anything.
    pub fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.modifiers.is_empty()
    }

    /// Append the SGR sequences selecting this style.
    pub fn write_sgr(&self, out: &mut String) {
        const CODES: [(Modifiers, u8); 6] = [
            (Modifiers::BOLD, 1),
            (Modifiers::DIM, 2),
            (Modifiers::ITALIC, 3),
            (Modifiers::UNDERLINE, 4),
            (Modifiers::REVERSED, 7),
            (Modifiers::STRIKETHROUGH, 9),
        ];
        for (flag, code) in CODES {
            if self.modifiers.contains(flag) {
                let _ = write!(out, "\x1b[{code}m");
            }
        }
        if let Some(c) = self.fg {
            let _ = write!(out, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b);
        }
        if let Some(c) = self.bg {
            let _ = write!(out, "\x1b[48;2;{};{};{}m", c.r, c.g, c.b);
        }
    }
}

/// SGR reset sequence.
pub const RESET: &str = "\x1b[0m";

/// One line of content handed back by a render callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// Opaque text, possibly carrying its own escape sequences.
    Plain(String),
    /// Text drawn with the given style.
    Styled(String, Style),
}

impl Item {
    /// Plain item.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    /// Styled item.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self::Styled(text.into(), style)
    }

    /// The text without styling.
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Styled(text, _) => text,
        }
    }

    /// The style, if any.
    pub const fn style(&self) -> Option<&Style> {
        match self {
            Self::Plain(_) => None,
            Self::Styled(_, style) => Some(style),
        }
    }
}

impl From<&str> for Item {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_string())
    }
}

impl From<String> for Item {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}
