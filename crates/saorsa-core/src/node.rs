//! The persistent node tree (§3 Data Model, §9 Design Notes).
//!
//! Nodes are polymorphic over a small capability set (measure, arrange,
//! render, focusable-enumeration, input-handling, child-enumeration). The
//! source's class-based dispatch becomes a **tagged enum** of concrete
//! node variants (`NodeKind`) plus the operation tables in
//! [`crate::layout`], [`crate::render`] and [`crate::input::router`] that
//! match on it — not a `dyn Trait` per node, so the tree stays a flat
//! arena with no trait-object indirection.
//!
//! Parent→child ownership is exclusive: a parent's `children` field is the
//! only thing that keeps a child alive. Focus-ring entries and hit-test
//! results hold plain [`NodeId`] values (arena indices), never anything
//! that could outlive the tree.

use crate::geometry::Rect;
use crate::nodes::NodeKind;

/// An arena index into a [`Tree`], paired with a generation counter so a
/// stale id (from a node that has since been freed and its slot recycled)
/// can be detected rather than silently aliasing a new node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// A key identifying a widget/node to the reconciler across frames,
/// independent of its position in the child list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Keyed by construction order (the default when no explicit key is
    /// given).
    Index(usize),
    /// An explicit application-chosen key.
    Named(String),
}

enum Slot {
    Occupied { generation: u32, node: Node },
    Free { generation: u32 },
}

/// The persistent, arena-backed node tree.
pub struct Tree {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    root: Option<NodeId>,
}

/// A single node's shared state, common to every [`NodeKind`].
pub struct Node {
    /// The variant-specific payload and its measure/arrange/render/input
    /// behavior.
    pub kind: NodeKind,
    /// Final committed rect from the last `arrange` pass.
    pub bounds: Rect,
    /// Whether this node currently has input focus.
    pub is_focused: bool,
    /// Whether the pointer is currently over this node.
    pub is_hovered: bool,
    /// The reconciler key this node was constructed/matched with.
    pub key: Key,
    /// Owned children, in widget-declaration order.
    pub children: Vec<NodeId>,
    /// Optional width hint applied by the framework after reconcile
    /// (common to every widget, §4.1).
    pub width_hint: Option<u16>,
    /// Optional height hint applied by the framework after reconcile.
    pub height_hint: Option<u16>,
    /// Flex weight used by stack containers to divide leftover space among
    /// children (§4.2); `None` means this child is sized to its fixed
    /// measured size.
    pub fill_weight: Option<u16>,
    /// Key/mouse bindings attached via the widget's bindings-configurator
    /// closure.
    pub bindings: crate::input::binding::BindingSet,
}

impl Node {
    /// Construct a node of the given kind with no children yet.
    pub fn new(kind: NodeKind, key: Key) -> Self {
        Self {
            kind,
            bounds: Rect::default(),
            is_focused: false,
            is_hovered: false,
            key,
            children: Vec::new(),
            width_hint: None,
            height_hint: None,
            fill_weight: None,
            bindings: crate::input::binding::BindingSet::new(),
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            root: None,
        }
    }

    /// Insert a node, returning its fresh [`NodeId`].
    pub fn insert(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free_list.pop() {
            let generation = match &self.slots[index as usize] {
                Slot::Free { generation } => *generation + 1,
                Slot::Occupied { .. } => unreachable!("free list pointed at occupied slot"),
            };
            self.slots[index as usize] = Slot::Occupied { generation, node };
            NodeId { index, generation }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot::Occupied { generation: 0, node });
            NodeId { index, generation: 0 }
        }
    }

    /// Remove a node and, recursively, every child it still owns.
    pub fn remove_subtree(&mut self, id: NodeId) {
        let children = self.get(id).map(|n| n.children.clone()).unwrap_or_default();
        for child in children {
            self.remove_subtree(child);
        }
        if let Some(slot) = self.slots.get_mut(id.index as usize) {
            if matches!(slot, Slot::Occupied { generation, .. } if *generation == id.generation) {
                let generation = id.generation;
                *slot = Slot::Free { generation };
                self.free_list.push(id.index);
            }
        }
    }

    /// Borrow a node, or `None` if `id` is stale or out of range.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        match self.slots.get(id.index as usize) {
            Some(Slot::Occupied { generation, node }) if *generation == id.generation => Some(node),
            _ => None,
        }
    }

    /// Mutably borrow a node, or `None` if `id` is stale or out of range.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        match self.slots.get_mut(id.index as usize) {
            Some(Slot::Occupied { generation, node }) if *generation == id.generation => Some(node),
            _ => None,
        }
    }

    /// The tree's root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Set the tree's root node.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Depth-first pre-order traversal starting at `id`, visiting `id`
    /// itself first.
    pub fn walk_pre_order(&self, id: NodeId, visit: &mut impl FnMut(NodeId, &Node)) {
        if let Some(node) = self.get(id) {
            visit(id, node);
            for &child in &node.children {
                self.walk_pre_order(child, visit);
            }
        }
    }

    /// Number of live nodes currently in the tree.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Occupied { .. }))
            .count()
    }

    /// True if the tree has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::text::TextNode;

    fn text_node(s: &str) -> Node {
        Node::new(NodeKind::Text(TextNode::new(s)), Key::Index(0))
    }

    #[test]
    fn insert_and_get_round_trips() {
        let mut tree = Tree::new();
        let id = tree.insert(text_node("hi"));
        assert!(tree.get(id).is_some());
    }

    #[test]
    fn stale_id_after_removal_returns_none() {
        let mut tree = Tree::new();
        let id = tree.insert(text_node("hi"));
        tree.remove_subtree(id);
        assert!(tree.get(id).is_none());
    }

    #[test]
    fn recycled_slot_gets_new_generation() {
        let mut tree = Tree::new();
        let id1 = tree.insert(text_node("a"));
        tree.remove_subtree(id1);
        let id2 = tree.insert(text_node("b"));
        assert_ne!(id1, id2);
        assert!(tree.get(id1).is_none());
        assert!(tree.get(id2).is_some());
    }

    #[test]
    fn remove_subtree_drops_children() {
        let mut tree = Tree::new();
        let child = tree.insert(text_node("child"));
        let mut parent_node = text_node("parent");
        parent_node.children.push(child);
        let parent = tree.insert(parent_node);
        tree.remove_subtree(parent);
        assert!(tree.get(child).is_none());
    }

    #[test]
    fn pre_order_visits_parent_before_children() {
        let mut tree = Tree::new();
        let child = tree.insert(text_node("child"));
        let mut parent_node = text_node("parent");
        parent_node.children.push(child);
        let parent = tree.insert(parent_node);

        let mut order = Vec::new();
        tree.walk_pre_order(parent, &mut |id, _| order.push(id));
        assert_eq!(order, vec![parent, child]);
    }
}
