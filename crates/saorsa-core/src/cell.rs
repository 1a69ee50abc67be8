//! The terminal cell: a single grid position's grapheme, colors, attributes
//! and display width (§3 Data Model).

use crate::color::{Attrs, Color};

/// A single cell in a [`Surface`](crate::surface::Surface).
///
/// `display_width == 0` marks the right-hand continuation of a wide
/// grapheme written at the preceding column; its `char` is empty and it
/// carries no independent content. A cell with both `fg` and `bg` set to
/// `None` is *transparent*: compositing lets an underlying layer's colors
/// show through (see [`crate::compositor`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// The grapheme cluster occupying this cell (empty for continuation
    /// cells and the space character for blanks).
    pub grapheme: String,
    /// Foreground color, or `None` for "let it show through".
    pub fg: Option<Color>,
    /// Background color, or `None` for "let it show through".
    pub bg: Option<Color>,
    /// Active SGR attributes.
    pub attrs: Attrs,
    /// Display width: 0 (continuation), 1, or 2.
    pub display_width: u8,
    /// OSC 8 hyperlink id, if this cell is part of a hyperlink span.
    pub hyperlink: Option<u64>,
}

impl Cell {
    /// A single blank space cell with no styling.
    pub fn blank() -> Self {
        Self {
            grapheme: " ".to_string(),
            fg: None,
            bg: None,
            attrs: Attrs::NONE,
            display_width: 1,
            hyperlink: None,
        }
    }

    /// The zero-width continuation half of a wide grapheme.
    pub fn continuation() -> Self {
        Self {
            grapheme: String::new(),
            fg: None,
            bg: None,
            attrs: Attrs::NONE,
            display_width: 0,
            hyperlink: None,
        }
    }

    /// Build a styled cell from a single grapheme cluster.
    ///
    /// `width` must be the grapheme's display width (1 or 2); callers get
    /// this from [`crate::width::grapheme_width`].
    pub fn new(grapheme: impl Into<String>, width: u8, fg: Option<Color>, bg: Option<Color>, attrs: Attrs) -> Self {
        Self {
            grapheme: grapheme.into(),
            fg,
            bg,
            attrs,
            display_width: width,
            hyperlink: None,
        }
    }

    /// True if neither color is set (transparent cell).
    pub fn is_transparent(&self) -> bool {
        self.fg.is_none() && self.bg.is_none()
    }

    /// True if this is an untouched blank cell (space, no styling, no
    /// hyperlink).
    pub fn is_blank(&self) -> bool {
        self.grapheme == " "
            && self.fg.is_none()
            && self.bg.is_none()
            && self.attrs.is_empty()
            && self.hyperlink.is_none()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cell_is_space_width_one() {
        let c = Cell::blank();
        assert_eq!(c.grapheme, " ");
        assert_eq!(c.display_width, 1);
        assert!(c.is_transparent());
        assert!(c.is_blank());
    }

    #[test]
    fn continuation_cell_is_zero_width_empty() {
        let c = Cell::continuation();
        assert_eq!(c.grapheme, "");
        assert_eq!(c.display_width, 0);
    }

    #[test]
    fn colored_cell_is_not_transparent() {
        let c = Cell::new("x", 1, Some(Color::RED), None, Attrs::NONE);
        assert!(!c.is_transparent());
    }
}
