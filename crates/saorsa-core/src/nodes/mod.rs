//! The concrete node-kind catalogue: a tagged enum of concrete node
//! variants in place of class-based dispatch.
//!
//! Each variant carries only the state the kind itself needs; the shared
//! fields every node has regardless of kind (`bounds`, focus, hints,
//! bindings) live on [`crate::node::Node`]. Behavior lives in the operation
//! tables that match on [`NodeKind`]: [`crate::layout`], [`crate::render`]
//! and [`crate::input::router`].

pub mod border;
pub mod button;
pub mod error_panel;
pub mod list;
pub mod padding;
pub mod responsive;
pub mod scroll;
pub mod splitter;
pub mod stack;
pub mod text;
pub mod theming_panel;

pub use border::BorderNode;
pub use button::ButtonNode;
pub use error_panel::ErrorPanelNode;
pub use list::ListNode;
pub use padding::PaddingNode;
pub use responsive::ResponsiveNode;
pub use scroll::ScrollNode;
pub use splitter::SplitterNode;
pub use stack::StackNode;
pub use text::TextNode;
pub use theming_panel::ThemingPanelNode;

/// The axis a stack, scroll viewport or splitter operates along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Top-to-bottom.
    Vertical,
    /// Left-to-right.
    Horizontal,
}

/// The concrete variant of a node. Matched by the layout, render and input
/// operation tables instead of dispatching through a trait object.
pub enum NodeKind {
    /// A block of text, optionally wrapped.
    Text(TextNode),
    /// A vertical stack container.
    VStack(StackNode),
    /// A horizontal stack container.
    HStack(StackNode),
    /// A single-child decorative border.
    Border(BorderNode),
    /// A single-child uniform padding box.
    Padding(PaddingNode),
    /// A selectable list of text items.
    List(ListNode),
    /// A single-child scrollable viewport.
    Scroll(ScrollNode),
    /// A two-pane divider.
    Splitter(SplitterNode),
    /// A single-child theme-overlay scope.
    ThemingPanel(ThemingPanelNode),
    /// A breakpoint-selected single child, chosen at reconcile time.
    Responsive(ResponsiveNode),
    /// A clickable, focusable label.
    Button(ButtonNode),
    /// The crash/error display shown on an unhandled panic.
    ErrorPanel(ErrorPanelNode),
}

impl NodeKind {
    /// Whether nodes of this kind participate in the focus ring.
    pub fn is_focusable(&self) -> bool {
        matches!(self, NodeKind::Button(_) | NodeKind::List(_) | NodeKind::ErrorPanel(_))
    }

    /// A short name used for debugging and error-panel phase labels; not
    /// used for dispatch.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeKind::Text(_) => "Text",
            NodeKind::VStack(_) => "VStack",
            NodeKind::HStack(_) => "HStack",
            NodeKind::Border(_) => "Border",
            NodeKind::Padding(_) => "Padding",
            NodeKind::List(_) => "List",
            NodeKind::Scroll(_) => "Scroll",
            NodeKind::Splitter(_) => "Splitter",
            NodeKind::ThemingPanel(_) => "ThemingPanel",
            NodeKind::Responsive(_) => "Responsive",
            NodeKind::Button(_) => "Button",
            NodeKind::ErrorPanel(_) => "ErrorPanel",
        }
    }
}
