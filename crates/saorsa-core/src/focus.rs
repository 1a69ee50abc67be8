//! Focus ring (§4.5): ordered focusable traversal, hit-test, cycle
//! navigation.
//!
//! Rebuilt from scratch every frame after arrange — there is no persistent
//! registration step to keep in sync, which sidesteps a whole class of
//! stale-registration bugs the source's id-registration-based manager was
//! prone to.

use crate::geometry::Rect;
use crate::node::{Key, NodeId, Tree};

/// The ordered list of focusable nodes built fresh each frame, plus the
/// currently focused index.
#[derive(Default)]
pub struct FocusRing {
    entries: Vec<NodeId>,
    current: Option<usize>,
}

impl FocusRing {
    /// An empty ring with nothing focused.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the ring by depth-first pre-order traversal from `root`,
    /// collecting every node whose kind reports `is_focusable`. Preserves
    /// focus by node identity if the previously-focused node is still
    /// present, falling back to matching its [`Key`], and finally to index
    /// 0.
    pub fn rebuild(&mut self, tree: &Tree, root: NodeId) {
        let previous_id = self.current.and_then(|i| self.entries.get(i)).copied();
        let previous_key = previous_id
            .and_then(|id| tree.get(id))
            .map(|n| n.key.clone());

        let mut entries = Vec::new();
        tree.walk_pre_order(root, &mut |id, node| {
            if node.kind.is_focusable() {
                entries.push(id);
            }
        });

        let current = previous_id
            .and_then(|id| entries.iter().position(|&e| e == id))
            .or_else(|| {
                previous_key.and_then(|key| {
                    entries
                        .iter()
                        .position(|&e| tree.get(e).map(|n| &n.key) == Some(&key))
                })
            })
            .or(if entries.is_empty() { None } else { Some(0) });

        self.entries = entries;
        self.current = current;
    }

    /// Focus the first entry if nothing is currently focused.
    pub fn ensure_focus(&mut self) {
        if self.current.is_none() && !self.entries.is_empty() {
            self.current = Some(0);
        }
    }

    /// The currently focused node, if any.
    pub fn current(&self) -> Option<NodeId> {
        self.current.and_then(|i| self.entries.get(i)).copied()
    }

    /// All focusable nodes in ring order.
    pub fn entries(&self) -> &[NodeId] {
        &self.entries
    }

    /// Advance focus to the next entry, wrapping around.
    pub fn focus_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.current = Some(match self.current {
            Some(i) => (i + 1) % self.entries.len(),
            None => 0,
        });
    }

    /// Move focus to the previous entry, wrapping around.
    pub fn focus_prev(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.current = Some(match self.current {
            Some(0) | None => self.entries.len() - 1,
            Some(i) => i - 1,
        });
    }

    /// Focus a specific node directly, if it is present in the ring.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if let Some(i) = self.entries.iter().position(|&e| e == id) {
            self.current = Some(i);
            true
        } else {
            false
        }
    }

    /// Hit-test `(x, y)` against the ring from topmost (last-added) to
    /// bottommost, returning the first whose bounds contain the point.
    pub fn hit_test(&self, tree: &Tree, x: u16, y: u16) -> Option<NodeId> {
        self.entries.iter().rev().copied().find(|&id| {
            tree.get(id)
                .map(|n| rect_contains(n.bounds, x, y))
                .unwrap_or(false)
        })
    }
}

fn rect_contains(rect: Rect, x: u16, y: u16) -> bool {
    rect.contains(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Key;
    use crate::nodes::{ButtonNode, NodeKind};

    fn button(tree: &mut Tree, label: &str) -> NodeId {
        tree.insert(crate::node::Node::new(
            NodeKind::Button(ButtonNode::new(label)),
            Key::Index(0),
        ))
    }

    #[test]
    fn rebuild_collects_focusable_nodes_in_order() {
        let mut tree = Tree::new();
        let a = button(&mut tree, "A");
        let b = button(&mut tree, "B");
        let c = button(&mut tree, "C");
        let mut root_node = crate::node::Node::new(
            NodeKind::VStack(crate::nodes::StackNode::new()),
            Key::Index(0),
        );
        root_node.children = vec![a, b, c];
        let root = tree.insert(root_node);

        let mut ring = FocusRing::new();
        ring.rebuild(&tree, root);
        assert_eq!(ring.entries(), &[a, b, c]);
    }

    #[test]
    fn focus_next_wraps_around() {
        let mut tree = Tree::new();
        let a = button(&mut tree, "A");
        let b = button(&mut tree, "B");
        let c = button(&mut tree, "C");
        let mut root_node = crate::node::Node::new(
            NodeKind::VStack(crate::nodes::StackNode::new()),
            Key::Index(0),
        );
        root_node.children = vec![a, b, c];
        let root = tree.insert(root_node);

        let mut ring = FocusRing::new();
        ring.rebuild(&tree, root);
        ring.ensure_focus();
        assert_eq!(ring.current(), Some(a));
        ring.focus_next();
        ring.focus_next();
        assert_eq!(ring.current(), Some(c));
        ring.focus_next();
        assert_eq!(ring.current(), Some(a));
    }

    #[test]
    fn hit_test_prefers_topmost_overlapping_entry() {
        let mut tree = Tree::new();
        let a = button(&mut tree, "A");
        let b = button(&mut tree, "B");
        if let Some(n) = tree.get_mut(a) {
            n.bounds = Rect::new(0, 0, 10, 1);
        }
        if let Some(n) = tree.get_mut(b) {
            n.bounds = Rect::new(0, 0, 10, 1);
        }
        let mut root_node = crate::node::Node::new(
            NodeKind::VStack(crate::nodes::StackNode::new()),
            Key::Index(0),
        );
        root_node.children = vec![a, b];
        let root = tree.insert(root_node);

        let mut ring = FocusRing::new();
        ring.rebuild(&tree, root);
        assert_eq!(ring.hit_test(&tree, 5, 0), Some(b));
    }
}
