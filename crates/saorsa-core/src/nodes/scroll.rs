//! Scroll viewport node, with scrollbar rendering.

use crate::nodes::Axis;
use crate::width::string_display_width;

/// Free-standing clip-window predicate, reused by [`crate::render`] to test
/// visibility for content it renders outside of a concrete `ScrollNode`
/// (e.g. a scrolled child's own line index).
pub fn in_window(offset: u16, viewport_size: u16, idx: u16) -> bool {
    let end = offset.saturating_add(viewport_size);
    idx >= offset && idx < end
}

/// A single-child scrollable viewport along one axis.
pub struct ScrollNode {
    /// The axis scrolling happens along.
    pub axis: Axis,
    /// Current scroll position, always within `[0, max_offset()]`.
    pub scroll_offset: u16,
    /// Whether a 1-cell scrollbar column/row is reserved and drawn when the
    /// content exceeds the viewport.
    pub show_scrollbar: bool,
    /// The child's measured size along the scroll axis, set by `measure`.
    pub content_size: u16,
    /// The committed viewport size along the scroll axis, set by `arrange`.
    pub viewport_size: u16,
}

impl ScrollNode {
    /// A vertical scroll viewport with the scrollbar shown.
    pub fn vertical() -> Self {
        Self {
            axis: Axis::Vertical,
            scroll_offset: 0,
            show_scrollbar: true,
            content_size: 0,
            viewport_size: 0,
        }
    }

    /// A horizontal scroll viewport with the scrollbar shown.
    pub fn horizontal() -> Self {
        Self {
            axis: Axis::Horizontal,
            scroll_offset: 0,
            show_scrollbar: true,
            content_size: 0,
            viewport_size: 0,
        }
    }

    /// Disable the scrollbar gutter.
    #[must_use]
    pub fn without_scrollbar(mut self) -> Self {
        self.show_scrollbar = false;
        self
    }

    /// The largest offset that still leaves the viewport full of content.
    pub fn max_offset(&self) -> u16 {
        self.content_size.saturating_sub(self.viewport_size)
    }

    /// Set the scroll offset, clamping to `[0, max_offset()]`.
    pub fn set_offset(&mut self, offset: u16) {
        self.scroll_offset = offset.min(self.max_offset());
    }

    /// Scroll by a signed delta, clamping as in [`Self::set_offset`].
    pub fn scroll_by(&mut self, delta: i32) {
        let current = i32::from(self.scroll_offset);
        let next = (current + delta).max(0) as u16;
        self.set_offset(next);
    }

    /// Whether the scrollbar gutter should actually be reserved this frame:
    /// requested *and* content overflows the viewport.
    pub fn scrollbar_active(&self) -> bool {
        self.show_scrollbar && self.content_size > self.viewport_size
    }

    /// Clip-contract predicate: is row/column index `along_axis`
    /// (0-based, relative to the viewport's own origin) currently within
    /// the visible window?
    pub fn should_render_at(&self, along_axis: u16) -> bool {
        in_window(self.scroll_offset, self.viewport_size, along_axis)
    }

    /// Clip-contract text trim: for a horizontal scroll, trim
    /// leading off-screen graphemes from `text` starting at column `x` and
    /// return the adjusted `(x, text)`. Vertical scrolls pass text through
    /// unchanged since clipping is row-granular there.
    pub fn clip_string<'a>(&self, x: u16, text: &'a str) -> (u16, std::borrow::Cow<'a, str>) {
        if self.axis != Axis::Horizontal {
            return (x, std::borrow::Cow::Borrowed(text));
        }
        let visible_start = self.scroll_offset;
        if x >= visible_start {
            return (x - visible_start, std::borrow::Cow::Borrowed(text));
        }
        let hidden = visible_start - x;
        let mut consumed = 0u16;
        let mut byte_idx = 0;
        for g in crate::width::graphemes(text) {
            if consumed >= hidden {
                break;
            }
            consumed += crate::width::grapheme_width(g).max(1);
            byte_idx += g.len();
        }
        let remainder = &text[byte_idx..];
        let _ = string_display_width(remainder);
        (0, std::borrow::Cow::Borrowed(remainder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_clamps_to_max() {
        let mut s = ScrollNode::vertical();
        s.content_size = 20;
        s.viewport_size = 10;
        s.set_offset(100);
        assert_eq!(s.scroll_offset, 10);
    }

    #[test]
    fn scrollbar_inactive_when_content_fits() {
        let mut s = ScrollNode::vertical();
        s.content_size = 5;
        s.viewport_size = 10;
        assert!(!s.scrollbar_active());
    }

    #[test]
    fn should_render_at_respects_window() {
        let mut s = ScrollNode::vertical();
        s.content_size = 20;
        s.viewport_size = 10;
        s.set_offset(5);
        assert!(!s.should_render_at(4));
        assert!(s.should_render_at(5));
        assert!(s.should_render_at(14));
        assert!(!s.should_render_at(15));
    }
}
