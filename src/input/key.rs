//! Key events and bindings.

use crate::terminal::TerminalSize;
use bitflags::bitflags;
use std::borrow::Cow;

/// Key codes for keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Function key (F1-F12).
    F(u8),
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Tab key.
    Tab,
    /// Backtab (Shift+Tab).
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
}

bitflags! {
    /// Modifier keys held during a keypress.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        /// Shift key held.
        const SHIFT = 0b0001;
        /// Control key held.
        const CONTROL = 0b0010;
        /// Alt/Option key held.
        const ALT = 0b0100;
        /// Super/Command/Windows key held.
        const SUPER = 0b1000;
    }
}

/// One physical keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key.
    pub code: KeyCode,
    /// Modifiers held with it.
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// Create a key event.
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Key without modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Character key without modifiers.
    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    /// Control + character.
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Logical key name (`"up"`, `"return"`, `"a"`, `"f5"`).
    pub fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(match self.code {
            KeyCode::Char(' ') => "space",
            KeyCode::Char(c) => return Cow::Owned(c.to_lowercase().collect()),
            KeyCode::F(n) => return Cow::Owned(format!("f{n}")),
            KeyCode::Backspace => "backspace",
            KeyCode::Enter => "return",
            KeyCode::Left => "left",
            KeyCode::Right => "right",
            KeyCode::Up => "up",
            KeyCode::Down => "down",
            KeyCode::Home => "home",
            KeyCode::End => "end",
            KeyCode::PageUp => "pageup",
            KeyCode::PageDown => "pagedown",
            KeyCode::Tab => "tab",
            KeyCode::BackTab => "backtab",
            KeyCode::Delete => "delete",
            KeyCode::Insert => "insert",
            KeyCode::Esc => "escape",
        })
    }

    /// The printable character, if this key produces one.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c)
                if !c.is_control()
                    && !self
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        }
    }

    /// Ctrl+C, treated everywhere as an interrupt.
    pub fn is_interrupt(&self) -> bool {
        self.code == KeyCode::Char('c') && self.modifiers.contains(KeyModifiers::CONTROL)
    }
}

/// A key combination a window or dialog reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    /// Key code.
    pub code: KeyCode,
    /// Required modifiers.
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Binding for a key without modifiers.
    pub const fn key(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    /// Binding for a character without modifiers.
    pub const fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }

    /// Binding for Control + character.
    pub const fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
        }
    }

    /// Whether `event` triggers this binding.
    ///
    /// Shift is ignored for characters since it is already folded into the
    /// character itself.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if self.code != event.code {
            return false;
        }
        let significant = if matches!(self.code, KeyCode::Char(_)) {
            KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER
        } else {
            KeyModifiers::all()
        };
        event.modifiers & significant == self.modifiers & significant
    }
}

/// Whether any binding in `bindings` matches `event`.
pub fn any_matches(bindings: &[KeyBinding], event: &KeyEvent) -> bool {
    bindings.iter().any(|b| b.matches(event))
}

/// Events produced by an input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(TerminalSize),
}
