//! Input event types (§3 Data Model).
//!
//! These are the framework's own types, decoded by the ANSI tokenizer
//! ([`crate::ansi::tokenizer`]) from raw TTY bytes — not `crossterm::event`
//! (see DESIGN.md: the tokenizer is THE CORE, not a wrapper).

use std::fmt;

/// Keyboard modifier flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Control key held.
    pub ctrl: bool,
    /// Shift key held.
    pub shift: bool,
    /// Alt/Meta key held.
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
    };

    /// Just Ctrl.
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
        alt: false,
    };

    /// Just Shift.
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
        alt: false,
    };

    /// Just Alt.
    pub const ALT: Self = Self {
        ctrl: false,
        shift: false,
        alt: true,
    };
}

/// A key identity, independent of modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Key {
    /// A character key (case carried in the char itself).
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    /// Function key F1-F12.
    F(u8),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Delete => write!(f, "Delete"),
            Key::Escape => write!(f, "Escape"),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Home => write!(f, "Home"),
            Key::End => write!(f, "End"),
            Key::PageUp => write!(f, "PageUp"),
            Key::PageDown => write!(f, "PageDown"),
            Key::Insert => write!(f, "Insert"),
            Key::F(n) => write!(f, "F{n}"),
        }
    }
}

/// A keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Which key.
    pub key: Key,
    /// A resolved character, if this key produces printable text
    /// (`Some` only for `Key::Char`).
    pub ch: Option<char>,
    /// Active modifiers.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    pub fn plain(key: Key) -> Self {
        let ch = match key {
            Key::Char(c) => Some(c),
            _ => None,
        };
        Self {
            key,
            ch,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a key event with the given modifiers.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        let ch = match key {
            Key::Char(c) => Some(c),
            _ => None,
        };
        Self { key, ch, modifiers }
    }
}

/// Which mouse button (or none, for pure movement) an event concerns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button.
    Left,
    /// Right button.
    Right,
    /// Middle button.
    Middle,
    /// No button (a move event).
    None,
    /// Scroll wheel up.
    ScrollUp,
    /// Scroll wheel down.
    ScrollDown,
}

/// The action a mouse event represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// Button pressed.
    Down,
    /// Button released.
    Up,
    /// Pointer moved (button may or may not be held).
    Move,
}

/// A mouse event (§3 Data Model).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// Which button.
    pub button: MouseButton,
    /// Press/release/move.
    pub action: MouseAction,
    /// Column, 0-based.
    pub x: u16,
    /// Row, 0-based.
    pub y: u16,
    /// Active modifiers.
    pub modifiers: Modifiers,
    /// Consecutive-click count, set by the tokenizer's double-click window
    /// (1 for a first click, 2 for a double-click, etc).
    pub click_count: u8,
}

/// A terminal resize notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResizeEvent {
    /// New width in columns.
    pub w: u16,
    /// New height in rows.
    pub h: u16,
}

/// The union of input events the router dispatches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(ResizeEvent),
    /// Terminal gained input focus.
    FocusIn,
    /// Terminal lost input focus.
    FocusOut,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key_has_no_modifiers() {
        let k = KeyEvent::plain(Key::Char('a'));
        assert_eq!(k.ch, Some('a'));
        assert!(!k.modifiers.ctrl);
    }

    #[test]
    fn modifiers_equality_mask() {
        let ctrl_k = KeyEvent::new(Key::Char('k'), Modifiers::CTRL);
        let plain_k = KeyEvent::plain(Key::Char('k'));
        assert_ne!(ctrl_k.modifiers, plain_k.modifiers);
    }

    #[test]
    fn key_display() {
        assert_eq!(format!("{}", Key::F(5)), "F5");
        assert_eq!(format!("{}", Key::Enter), "Enter");
    }
}
