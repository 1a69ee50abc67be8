//! Theme-overlay scope node.

use crate::theme::Theme;

/// Pushes `overlay` onto the theme stack before descending into its child's
/// render and pops it on the way back out.
pub struct ThemingPanelNode {
    /// The overlay pushed for the duration of this node's subtree render.
    pub overlay: Theme,
}

impl ThemingPanelNode {
    /// A theming panel applying `overlay` to its subtree.
    pub fn new(overlay: Theme) -> Self {
        Self { overlay }
    }
}
