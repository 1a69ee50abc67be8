//! Typed tokens shared by the input tokenizer and the output emitter.

use crate::input::event::{KeyEvent, MouseEvent};

/// A token produced by tokenizing a byte stream from the TTY, or consumed
/// on the output path by the presentation adapter.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Token {
    /// Printable text (a run of graphemes with no intervening escape
    /// sequence).
    Text(String),
    /// Absolute cursor placement, 1-based row/col per ANSI `CUP`.
    CursorPosition {
        /// 1-based row.
        row: u16,
        /// 1-based column.
        col: u16,
    },
    /// An SGR attribute-setting sequence.
    Sgr(SgrParams),
    /// A raw CSI sequence not otherwise modeled (final byte + params),
    /// passed through unchanged.
    Csi {
        /// Numeric parameters, in order.
        params: Vec<u16>,
        /// The final byte identifying the sequence (e.g. `'h'`, `'l'`).
        finalizer: char,
    },
    /// A raw OSC sequence (e.g. hyperlinks, window title).
    Osc(String),
    /// A decoded keyboard input event.
    Key(KeyEvent),
    /// A decoded mouse input event (SGR mouse protocol).
    Mouse(MouseEvent),
    /// A terminal resize notification (out-of-band, injected by the
    /// presentation adapter rather than parsed from bytes).
    Resize(u16, u16),
    /// Terminal gained input focus.
    FocusIn,
    /// Terminal lost input focus.
    FocusOut,
    /// A byte sequence that could not be decoded; the tokenizer recovers by
    /// emitting exactly one of these and resynchronizing on the next byte.
    Malformed,
}

/// The resolved `(fg, bg, attrs)` triple an SGR token sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SgrParams {
    /// Foreground color, if changed.
    pub fg: Option<crate::color::Color>,
    /// Background color, if changed.
    pub bg: Option<crate::color::Color>,
    /// Attribute bits to set.
    pub attrs: crate::color::Attrs,
    /// Whether this token carries a full reset (SGR 0) before applying the
    /// above.
    pub reset: bool,
}
