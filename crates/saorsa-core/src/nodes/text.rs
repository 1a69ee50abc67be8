//! Text block node.

/// A block of text, optionally wrapped to the available width.
pub struct TextNode {
    /// The text to render.
    pub text: String,
    /// When true, `measure` wraps at `max_w` instead of reporting the full
    /// unwrapped width.
    pub wrap: bool,
}

impl TextNode {
    /// A non-wrapping text node.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            wrap: false,
        }
    }

    /// A text node that wraps at the available width.
    pub fn wrapped(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            wrap: true,
        }
    }
}
