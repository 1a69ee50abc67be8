//! Stack container node, shared by `VStack` and
//! `HStack`; the axis is carried by the [`crate::nodes::NodeKind`] variant
//! rather than duplicated here.

/// A stack container's own state. Per-child flex behavior lives on each
/// child [`crate::node::Node::fill_weight`], not here.
#[derive(Default)]
pub struct StackNode {
    /// Extra cells inserted between adjacent children along the stack axis.
    pub spacing: u16,
}

impl StackNode {
    /// A stack with no inter-child spacing.
    pub fn new() -> Self {
        Self::default()
    }

    /// A stack with the given spacing between children.
    pub fn with_spacing(spacing: u16) -> Self {
        Self { spacing }
    }
}
