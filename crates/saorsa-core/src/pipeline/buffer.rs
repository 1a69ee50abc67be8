//! The terminal's in-memory buffer.
//!
//! Mirrors exactly what the emitted token stream would paint onto a real
//! terminal: it tracks a running cursor position and SGR state and
//! replays [`Token::CursorPosition`]/[`Token::Sgr`]/[`Token::Text`] tokens
//! against an internal [`Surface`], the same way a real terminal
//! interprets the bytes [`crate::ansi::emitter::serialize`] would produce.
//! This is what every [`Snapshot`](super::Snapshot) is taken from, so
//! headless tests see identical results to a real TTY session.

use crate::ansi::Token;
use crate::color::{Attrs, Color};
use crate::geometry::Size;
use crate::surface::Surface;

/// The terminal's committed cell grid, kept in sync with the output token
/// stream.
pub struct TerminalBuffer {
    surface: Surface,
    cursor: (u16, u16),
    fg: Option<Color>,
    bg: Option<Color>,
    attrs: Attrs,
}

impl TerminalBuffer {
    /// A blank buffer of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            surface: Surface::new(size),
            cursor: (0, 0),
            fg: None,
            bg: None,
            attrs: Attrs::NONE,
        }
    }

    /// The current size.
    pub fn size(&self) -> Size {
        self.surface.size()
    }

    /// Resize the buffer, discarding its previous contents (a real
    /// terminal's scrollback/resize behavior is not modeled; callers
    /// promote to blank exactly as the diff's equal-dimensions precondition
    /// requires when dimensions change).
    pub fn resize(&mut self, size: Size) {
        self.surface = Surface::new(size);
        self.cursor = (0, 0);
    }

    /// Apply a batch of output tokens, updating cursor and SGR state as a
    /// real terminal would.
    pub fn apply(&mut self, tokens: &[Token]) {
        for token in tokens {
            match token {
                Token::CursorPosition { row, col } => {
                    self.cursor = (col.saturating_sub(1), row.saturating_sub(1));
                }
                Token::Sgr(params) => {
                    // `params` always carries the complete target style (see
                    // ansi::emitter::emit); `reset` only describes how the
                    // bytes get there on the wire, not a partial update here.
                    self.fg = params.fg;
                    self.bg = params.bg;
                    self.attrs = params.attrs;
                }
                Token::Text(text) => {
                    let (x, y) = self.cursor;
                    let written = self.surface.write_text(i32::from(x), y, text, self.fg, self.bg, self.attrs);
                    self.cursor = (x.saturating_add(written), y);
                }
                Token::Resize(w, h) => self.resize(Size::new(*w, *h)),
                _ => {}
            }
        }
    }

    /// A read-only view of the current grid.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}
