//! Widget → node reconciliation (§4.1).
//!
//! Reuses an existing node when the widget's expected kind matches it,
//! mutating internal state in place (a list's selection, a scroll
//! viewport's offset) rather than rebuilding it from scratch; otherwise
//! replaces the node wholesale. Type mismatch with a non-null existing node
//! is not an error — per §7, the node is silently replaced.

use crate::node::{Key, Node, NodeId, Tree};
use crate::nodes::{
    Axis, BorderNode, ButtonNode, ErrorPanelNode, ListNode, NodeKind, PaddingNode, ResponsiveNode, ScrollNode,
    SplitterNode, StackNode, TextNode, ThemingPanelNode,
};
use crate::widget::{Widget, WidgetKind};

/// Reconcile `widget` against `existing` (if any) within `tree`, returning
/// the resulting node's id. `available_width` is the width the caller last
/// committed for this slot (e.g. the parent's last arrange width), used
/// only by `Responsive` widgets to pick a breakpoint before measurement.
pub fn reconcile(tree: &mut Tree, widget: Widget, existing: Option<NodeId>, available_width: u16) -> NodeId {
    let reused = existing.filter(|&id| {
        tree.get(id)
            .map(|n| kind_matches(&widget.kind, &n.kind))
            .unwrap_or(false)
    });

    if let Some(old_id) = existing {
        if reused.is_none() {
            tree.remove_subtree(old_id);
        }
    }

    let old_children: Vec<NodeId> = reused
        .and_then(|id| tree.get(id))
        .map(|n| n.children.clone())
        .unwrap_or_default();

    let key = widget.key.clone();
    let width_hint = widget.width_hint;
    let height_hint = widget.height_hint;
    let fill_weight = widget.fill_weight;
    let bindings_configurator = widget.bindings_configurator;

    let (widget_children, resolved_kind_update) = match widget.kind {
        WidgetKind::Responsive { breakpoints, children, otherwise } => {
            let selected_index = ResponsiveNode::select(&breakpoints, available_width);
            let chosen = match selected_index {
                Some(i) => children.into_iter().nth(i).unwrap_or(*otherwise),
                None => *otherwise,
            };
            (vec![chosen], KindUpdate::Responsive { selected_index })
        }
        other => (widget.children, KindUpdate::from(other)),
    };

    let id = match reused {
        Some(id) => {
            if let Some(node) = tree.get_mut(id) {
                resolved_kind_update.apply_existing(&mut node.kind);
            }
            id
        }
        None => tree.insert(Node::new(resolved_kind_update.build_fresh(), key.clone())),
    };

    reconcile_children(tree, id, old_children, widget_children);

    if let Some(node) = tree.get_mut(id) {
        node.key = key;
        node.width_hint = width_hint;
        node.height_hint = height_hint;
        node.fill_weight = fill_weight;
        if let Some(configure) = bindings_configurator {
            configure(&mut node.bindings);
        }
    }

    id
}

fn reconcile_children(tree: &mut Tree, parent: NodeId, old_children: Vec<NodeId>, widget_children: Vec<Widget>) {
    let matches = match_children(tree, &old_children, &widget_children);
    let matched_set: std::collections::HashSet<NodeId> = matches.iter().filter_map(|m| *m).collect();
    for old in &old_children {
        if !matched_set.contains(old) {
            tree.remove_subtree(*old);
        }
    }

    let mut new_children = Vec::with_capacity(widget_children.len());
    for (widget_child, matched_old) in widget_children.into_iter().zip(matches) {
        let child_available_width = matched_old
            .and_then(|id| tree.get(id))
            .map(|n| n.bounds.w)
            .unwrap_or(0);
        new_children.push(reconcile(tree, widget_child, matched_old, child_available_width));
    }

    if let Some(node) = tree.get_mut(parent) {
        node.children = new_children;
    }
}

/// Pair each widget child with an old child to reuse, if any. Uses
/// key-based matching when every widget and old child carries an explicit
/// `Named` key; otherwise falls back to positional matching.
fn match_children(tree: &Tree, old_children: &[NodeId], widget_children: &[Widget]) -> Vec<Option<NodeId>> {
    let all_named_old = old_children
        .iter()
        .all(|&id| matches!(tree.get(id).map(|n| &n.key), Some(Key::Named(_))));
    let all_named_new = widget_children.iter().all(|w| matches!(w.key, Key::Named(_)));

    if all_named_old && all_named_new && !old_children.is_empty() && !widget_children.is_empty() {
        widget_children
            .iter()
            .map(|w| {
                let Key::Named(name) = &w.key else { return None };
                old_children
                    .iter()
                    .copied()
                    .find(|&id| matches!(tree.get(id).map(|n| &n.key), Some(Key::Named(n)) if n == name))
            })
            .collect()
    } else {
        widget_children
            .iter()
            .enumerate()
            .map(|(i, _)| old_children.get(i).copied())
            .collect()
    }
}

fn kind_matches(widget_kind: &WidgetKind, node_kind: &NodeKind) -> bool {
    match (widget_kind, node_kind) {
        (WidgetKind::Text { .. }, NodeKind::Text(_)) => true,
        (WidgetKind::VStack { .. }, NodeKind::VStack(_)) => true,
        (WidgetKind::HStack { .. }, NodeKind::HStack(_)) => true,
        (WidgetKind::Border { .. }, NodeKind::Border(_)) => true,
        (WidgetKind::Padding { .. }, NodeKind::Padding(_)) => true,
        (WidgetKind::List { .. }, NodeKind::List(_)) => true,
        (WidgetKind::Scroll { axis, .. }, NodeKind::Scroll(s)) => *axis == s.axis,
        (WidgetKind::Splitter { axis, .. }, NodeKind::Splitter(s)) => *axis == s.axis,
        (WidgetKind::ThemingPanel { .. }, NodeKind::ThemingPanel(_)) => true,
        (WidgetKind::Responsive { .. }, NodeKind::Responsive(_)) => true,
        (WidgetKind::Button { .. }, NodeKind::Button(_)) => true,
        (WidgetKind::ErrorPanel { .. }, NodeKind::ErrorPanel(_)) => true,
        _ => false,
    }
}

/// A pending kind update: either build a fresh node payload or apply onto
/// an existing, reused one (preserving stateful fields like list selection
/// or scroll offset).
enum KindUpdate {
    Text { text: String, wrap: bool },
    Stack { axis: Axis, spacing: u16 },
    Border { title: Option<String>, glyphs: crate::nodes::border::BorderGlyphs },
    Padding(PaddingNode),
    List { items: Vec<String>, selected: Option<usize> },
    Scroll { axis: Axis, show_scrollbar: bool },
    Splitter { axis: Axis, pivot: crate::nodes::splitter::Pivot },
    ThemingPanel { overlay: crate::theme::Theme },
    Responsive { selected_index: Option<usize> },
    Button { label: String, on_click: Option<crate::widget::BoxedClick> },
    ErrorPanel { phase: crate::nodes::error_panel::Phase, message: String, details: Vec<String> },
}

impl From<WidgetKind> for KindUpdate {
    fn from(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Text { text, wrap } => KindUpdate::Text { text, wrap },
            WidgetKind::VStack { spacing } => KindUpdate::Stack { axis: Axis::Vertical, spacing },
            WidgetKind::HStack { spacing } => KindUpdate::Stack { axis: Axis::Horizontal, spacing },
            WidgetKind::Border { title, glyphs } => KindUpdate::Border { title, glyphs },
            WidgetKind::Padding { top, right, bottom, left } => {
                KindUpdate::Padding(PaddingNode::new(top, right, bottom, left))
            }
            WidgetKind::List { items, selected } => KindUpdate::List { items, selected },
            WidgetKind::Scroll { axis, show_scrollbar } => KindUpdate::Scroll { axis, show_scrollbar },
            WidgetKind::Splitter { axis, pivot } => KindUpdate::Splitter { axis, pivot },
            WidgetKind::ThemingPanel { overlay } => KindUpdate::ThemingPanel { overlay },
            WidgetKind::Responsive { .. } => unreachable!("Responsive resolved before conversion"),
            WidgetKind::Button { label, on_click } => KindUpdate::Button { label, on_click },
            WidgetKind::ErrorPanel { phase, message, details } => {
                KindUpdate::ErrorPanel { phase, message, details }
            }
        }
    }
}

impl KindUpdate {
    fn build_fresh(self) -> NodeKind {
        match self {
            KindUpdate::Text { text, wrap } => NodeKind::Text(TextNode { text, wrap }),
            KindUpdate::Stack { axis: Axis::Vertical, spacing } => {
                NodeKind::VStack(StackNode::with_spacing(spacing))
            }
            KindUpdate::Stack { axis: Axis::Horizontal, spacing } => {
                NodeKind::HStack(StackNode::with_spacing(spacing))
            }
            KindUpdate::Border { title, glyphs } => NodeKind::Border(BorderNode { title, glyphs }),
            KindUpdate::Padding(p) => NodeKind::Padding(p),
            KindUpdate::List { items, selected } => NodeKind::List(match selected {
                Some(s) => ListNode::with_selected(items, s),
                None => ListNode::new(items),
            }),
            KindUpdate::Scroll { axis: Axis::Vertical, show_scrollbar } => {
                let mut s = ScrollNode::vertical();
                s.show_scrollbar = show_scrollbar;
                NodeKind::Scroll(s)
            }
            KindUpdate::Scroll { axis: Axis::Horizontal, show_scrollbar } => {
                let mut s = ScrollNode::horizontal();
                s.show_scrollbar = show_scrollbar;
                NodeKind::Scroll(s)
            }
            KindUpdate::Splitter { axis, pivot } => NodeKind::Splitter(SplitterNode { axis, pivot }),
            KindUpdate::ThemingPanel { overlay } => NodeKind::ThemingPanel(ThemingPanelNode::new(overlay)),
            KindUpdate::Responsive { selected_index } => {
                let mut r = ResponsiveNode::new();
                r.selected_index = selected_index;
                NodeKind::Responsive(r)
            }
            KindUpdate::Button { label, on_click } => {
                let mut b = ButtonNode::new(label);
                b.on_click = on_click;
                NodeKind::Button(b)
            }
            KindUpdate::ErrorPanel { phase, message, details } => {
                NodeKind::ErrorPanel(ErrorPanelNode::new(phase, message, details))
            }
        }
    }

    fn apply_existing(self, kind: &mut NodeKind) {
        match (self, kind) {
            (KindUpdate::Text { text, wrap }, NodeKind::Text(t)) => {
                t.text = text;
                t.wrap = wrap;
            }
            (KindUpdate::Stack { spacing, .. }, NodeKind::VStack(s) | NodeKind::HStack(s)) => {
                s.spacing = spacing;
            }
            (KindUpdate::Border { title, glyphs }, NodeKind::Border(b)) => {
                b.title = title;
                b.glyphs = glyphs;
            }
            (KindUpdate::Padding(new), NodeKind::Padding(p)) => *p = new,
            (KindUpdate::List { items, selected }, NodeKind::List(l)) => {
                l.items = items;
                if let Some(s) = selected {
                    l.selected = Some(s);
                }
                if let Some(s) = l.selected {
                    if s >= l.items.len() && !l.items.is_empty() {
                        l.selected = Some(l.items.len() - 1);
                    }
                }
            }
            (KindUpdate::Scroll { show_scrollbar, .. }, NodeKind::Scroll(s)) => {
                s.show_scrollbar = show_scrollbar;
            }
            (KindUpdate::Splitter { axis, pivot }, NodeKind::Splitter(s)) => {
                s.axis = axis;
                s.pivot = pivot;
            }
            (KindUpdate::ThemingPanel { overlay }, NodeKind::ThemingPanel(t)) => {
                t.overlay = overlay;
            }
            (KindUpdate::Responsive { selected_index }, NodeKind::Responsive(r)) => {
                r.selected_index = selected_index;
            }
            (KindUpdate::Button { label, on_click }, NodeKind::Button(b)) => {
                b.label = label;
                b.on_click = on_click;
            }
            (KindUpdate::ErrorPanel { phase, message, details }, NodeKind::ErrorPanel(e)) => {
                e.phase = phase;
                e.message = message;
                e.details = details;
            }
            _ => unreachable!("kind_matches guarantees the variants line up"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::NodeKind;

    #[test]
    fn fresh_reconcile_builds_matching_node_kind() {
        let mut tree = Tree::new();
        let id = reconcile(&mut tree, Widget::text("hi"), None, 80);
        assert!(matches!(tree.get(id).unwrap().kind, NodeKind::Text(_)));
    }

    #[test]
    fn type_mismatch_replaces_node_with_new_identity() {
        let mut tree = Tree::new();
        let first = reconcile(&mut tree, Widget::text("hi"), None, 80);
        let second = reconcile(&mut tree, Widget::vstack(), Some(first), 80);
        assert_ne!(first, second);
        assert!(tree.get(first).is_none());
        assert!(matches!(tree.get(second).unwrap().kind, NodeKind::VStack(_)));
    }

    #[test]
    fn same_type_reuses_node_identity_and_preserves_list_selection() {
        let mut tree = Tree::new();
        let first = reconcile(
            &mut tree,
            Widget::list(vec!["a".into(), "b".into()], Some(1)),
            None,
            80,
        );
        if let NodeKind::List(l) = &mut tree.get_mut(first).unwrap().kind {
            l.select_next(); // selection becomes driven by user input, now "out of sync" with widget
        }
        let second = reconcile(
            &mut tree,
            Widget::list(vec!["a".into(), "b".into()], None),
            Some(first),
            80,
        );
        assert_eq!(first, second);
        if let NodeKind::List(l) = &tree.get(second).unwrap().kind {
            assert_eq!(l.selected, Some(1), "user-driven selection survives a widget with no forced selection");
        } else {
            panic!("expected list node");
        }
    }

    #[test]
    fn keyed_children_rematch_across_reorder() {
        let mut tree = Tree::new();
        let widget = Widget::vstack().with_children(vec![
            Widget::text("a").keyed("a"),
            Widget::text("b").keyed("b"),
        ]);
        let root = reconcile(&mut tree, widget, None, 80);
        let original_children = tree.get(root).unwrap().children.clone();

        let reordered = Widget::vstack().with_children(vec![
            Widget::text("b2").keyed("b"),
            Widget::text("a2").keyed("a"),
        ]);
        let root2 = reconcile(&mut tree, reordered, Some(root), 80);
        assert_eq!(root, root2);
        let new_children = tree.get(root2).unwrap().children.clone();
        assert_eq!(new_children[0], original_children[1]);
        assert_eq!(new_children[1], original_children[0]);
    }
}
