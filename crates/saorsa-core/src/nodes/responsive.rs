//! Breakpoint-selected single child.
//!
//! Selection happens during reconcile against the last known arrange
//! width, not during render, so measurement already reflects the chosen
//! variant. The chosen widget's reconciled node is this node's sole child
//! in [`crate::node::Node::children`].

/// One candidate in a responsive widget's breakpoint list: matches when the
/// available width is at least `min_width`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Breakpoint {
    pub min_width: u16,
}

/// Tracks which breakpoint was chosen on the last reconcile, purely for
/// introspection/debugging; the actual child selection is the single entry
/// in the node's `children` list.
pub struct ResponsiveNode {
    /// Index into the widget's breakpoint list that was selected, or `None`
    /// if the `otherwise` fallback was used.
    pub selected_index: Option<usize>,
}

impl ResponsiveNode {
    /// No selection made yet (before the first reconcile).
    pub fn new() -> Self {
        Self { selected_index: None }
    }

    /// Choose the first breakpoint whose `min_width` is satisfied by
    /// `available_width`, in list order; `None` means the `otherwise`
    /// branch applies.
    pub fn select(breakpoints: &[Breakpoint], available_width: u16) -> Option<usize> {
        breakpoints.iter().position(|b| available_width >= b.min_width)
    }
}

impl Default for ResponsiveNode {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_first_satisfied_breakpoint() {
        let bps = [Breakpoint { min_width: 150 }, Breakpoint { min_width: 80 }];
        assert_eq!(ResponsiveNode::select(&bps, 200), Some(0));
        assert_eq!(ResponsiveNode::select(&bps, 100), Some(1));
        assert_eq!(ResponsiveNode::select(&bps, 10), None);
    }
}
