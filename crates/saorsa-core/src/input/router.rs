//! Input router (§4.7): event → binding → node → focus update.
//!
//! Resolution order for a key event: root bindings, then bindings walking
//! up from the focused node to the root (innermost first), then the
//! focused node's own built-in behavior, then framework defaults
//! (Tab/Shift+Tab, Ctrl+C). The first handler to claim the event wins.

use std::collections::HashMap;

use crate::focus::FocusRing;
use crate::input::binding::{dispatch_mouse, ChordOutcome, ChordState};
use crate::input::event::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseEvent};
use crate::node::{NodeId, Tree};
use crate::nodes::NodeKind;

/// The outcome of routing one event.
#[derive(Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Something handled the event (or claimed it as a pending chord step).
    Handled,
    /// Nothing handled the event.
    NotHandled,
    /// A binding or framework default requested the app exit (Ctrl+C).
    Exit,
}

/// Per-router state carried across events: one chord machine per binding
/// scope (keyed by the node whose `BindingSet` it belongs to; the root
/// counts as a scope too).
#[derive(Default)]
pub struct RouterState {
    chords: HashMap<NodeId, ChordState>,
}

impl RouterState {
    /// Fresh router state with no pending chords.
    pub fn new() -> Self {
        Self::default()
    }

    /// The nearest upcoming chord deadline across all scopes, if any is
    /// pending; the app loop's event-wait uses this to also service chord
    /// timeouts (§9 Design Notes).
    pub fn next_deadline(&self) -> Option<std::time::Instant> {
        self.chords.values().filter_map(ChordState::deadline).min()
    }

    /// Expire any chord prefixes whose deadline has passed.
    pub fn expire(&mut self, now: std::time::Instant) {
        for chord in self.chords.values_mut() {
            chord.expire_if_elapsed(now);
        }
    }
}

/// Route one input event against the tree rooted at `root`.
pub fn route(
    tree: &mut Tree,
    root: NodeId,
    event: &InputEvent,
    focus: &mut FocusRing,
    state: &mut RouterState,
    enable_default_ctrl_c_exit: bool,
) -> RouteOutcome {
    match event {
        InputEvent::Key(key_event) => route_key(tree, root, key_event, focus, state, enable_default_ctrl_c_exit),
        InputEvent::Mouse(mouse_event) => route_mouse(tree, root, *mouse_event, focus),
        InputEvent::Resize(_) | InputEvent::FocusIn | InputEvent::FocusOut => RouteOutcome::NotHandled,
    }
}

fn ancestor_chain(tree: &Tree, root: NodeId, target: NodeId) -> Vec<NodeId> {
    fn find_path(tree: &Tree, current: NodeId, target: NodeId, path: &mut Vec<NodeId>) -> bool {
        path.push(current);
        if current == target {
            return true;
        }
        let children = tree.get(current).map(|n| n.children.clone()).unwrap_or_default();
        for child in children {
            if find_path(tree, child, target, path) {
                return true;
            }
        }
        path.pop();
        false
    }
    let mut path = Vec::new();
    if find_path(tree, root, target, &mut path) {
        path.reverse();
        path
    } else {
        Vec::new()
    }
}

fn route_key(
    tree: &mut Tree,
    root: NodeId,
    event: &KeyEvent,
    focus: &mut FocusRing,
    state: &mut RouterState,
    enable_default_ctrl_c_exit: bool,
) -> RouteOutcome {
    let mut scopes = vec![root];
    if let Some(focused) = focus.current() {
        let mut chain = ancestor_chain(tree, root, focused);
        if !chain.is_empty() {
            chain.pop(); // drop root, already in `scopes`
        }
        scopes.extend(chain);
    }

    for scope in scopes {
        let Some(node) = tree.get_mut(scope) else { continue };
        if node.bindings.key_binding_count() == 0 {
            continue;
        }
        let chord = state.chords.entry(scope).or_insert_with(ChordState::new);
        match chord.evaluate(&mut node.bindings, event) {
            ChordOutcome::Handled | ChordOutcome::Pending => return RouteOutcome::Handled,
            ChordOutcome::NoMatch => {}
        }
    }

    if let Some(focused) = focus.current() {
        if handle_builtin(tree, focused, event) {
            return RouteOutcome::Handled;
        }
    }

    if event.key == Key::Tab && !event.modifiers.shift {
        focus.focus_next();
        return RouteOutcome::Handled;
    }
    if event.key == Key::Tab && event.modifiers.shift {
        focus.focus_prev();
        return RouteOutcome::Handled;
    }
    if enable_default_ctrl_c_exit
        && event.modifiers == Modifiers::CTRL
        && matches!(event.key, Key::Char('c') | Key::Char('C'))
    {
        return RouteOutcome::Exit;
    }

    RouteOutcome::NotHandled
}

fn handle_builtin(tree: &mut Tree, focused: NodeId, event: &KeyEvent) -> bool {
    let Some(node) = tree.get_mut(focused) else { return false };
    match &mut node.kind {
        NodeKind::List(list) => match event.key {
            Key::Down => {
                list.select_next();
                true
            }
            Key::Up => {
                list.select_prev();
                true
            }
            _ => false,
        },
        NodeKind::Button(button) => match event.key {
            Key::Enter | Key::Char(' ') => {
                button.activate();
                true
            }
            _ => false,
        },
        NodeKind::ErrorPanel(panel) => match event.key {
            Key::Down => {
                panel.scroll_offset = panel.scroll_offset.saturating_add(1);
                true
            }
            Key::Up => {
                panel.scroll_offset = panel.scroll_offset.saturating_sub(1);
                true
            }
            _ => false,
        },
        _ => false,
    }
}

fn route_mouse(tree: &mut Tree, root: NodeId, event: MouseEvent, focus: &mut FocusRing) -> RouteOutcome {
    let target = focus.hit_test(tree, event.x, event.y);

    if event.action == MouseAction::Down {
        if let Some(target) = target {
            focus.focus(target);
        }
    }

    let mut scopes = vec![root];
    if let Some(target) = target {
        let mut chain = ancestor_chain(tree, root, target);
        if !chain.is_empty() {
            chain.pop();
        }
        scopes.extend(chain);
    }

    for scope in scopes {
        if let Some(node) = tree.get_mut(scope) {
            if dispatch_mouse(&mut node.bindings, event) {
                return RouteOutcome::Handled;
            }
        }
    }

    RouteOutcome::NotHandled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::binding::ChordStep;
    use crate::node::{Key as NodeKey, Node};
    use crate::nodes::{ButtonNode, StackNode};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn button(tree: &mut Tree, label: &str) -> NodeId {
        tree.insert(Node::new(NodeKind::Button(ButtonNode::new(label)), NodeKey::Index(0)))
    }

    #[test]
    fn tab_advances_focus_by_default() {
        let mut tree = Tree::new();
        let a = button(&mut tree, "A");
        let b = button(&mut tree, "B");
        let mut root_node = Node::new(NodeKind::VStack(StackNode::new()), NodeKey::Index(0));
        root_node.children = vec![a, b];
        let root = tree.insert(root_node);

        let mut focus = FocusRing::new();
        focus.rebuild(&tree, root);
        focus.ensure_focus();
        let mut state = RouterState::new();

        let outcome = route_key(&mut tree, root, &KeyEvent::plain(Key::Tab), &mut focus, &mut state, false);
        assert_eq!(outcome, RouteOutcome::Handled);
        assert_eq!(focus.current(), Some(b));
    }

    #[test]
    fn root_binding_takes_priority_over_default_tab() {
        let mut tree = Tree::new();
        let a = button(&mut tree, "A");
        let mut root_node = Node::new(NodeKind::VStack(StackNode::new()), NodeKey::Index(0));
        root_node.children = vec![a];
        let fired = Rc::new(RefCell::new(false));
        let f = fired.clone();
        root_node
            .bindings
            .bind_key(vec![ChordStep::plain(Key::Tab)], move || *f.borrow_mut() = true);
        let root = tree.insert(root_node);

        let mut focus = FocusRing::new();
        focus.rebuild(&tree, root);
        focus.ensure_focus();
        let mut state = RouterState::new();

        route_key(&mut tree, root, &KeyEvent::plain(Key::Tab), &mut focus, &mut state, false);
        assert!(*fired.borrow());
        // Focus did not advance since the root binding claimed the event.
        assert_eq!(focus.current(), Some(a));
    }

    #[test]
    fn ctrl_c_exits_when_enabled() {
        let mut tree = Tree::new();
        let root = tree.insert(Node::new(NodeKind::VStack(StackNode::new()), NodeKey::Index(0)));
        let mut focus = FocusRing::new();
        focus.rebuild(&tree, root);
        let mut state = RouterState::new();

        let outcome = route_key(
            &mut tree,
            root,
            &KeyEvent::new(Key::Char('c'), Modifiers::CTRL),
            &mut focus,
            &mut state,
            true,
        );
        assert_eq!(outcome, RouteOutcome::Exit);
    }

    #[test]
    fn mouse_down_on_focusable_moves_focus() {
        let mut tree = Tree::new();
        let a = button(&mut tree, "A");
        let b = button(&mut tree, "B");
        if let Some(n) = tree.get_mut(b) {
            n.bounds = crate::geometry::Rect::new(0, 0, 5, 1);
        }
        let mut root_node = Node::new(NodeKind::VStack(StackNode::new()), NodeKey::Index(0));
        root_node.children = vec![a, b];
        let root = tree.insert(root_node);

        let mut focus = FocusRing::new();
        focus.rebuild(&tree, root);
        focus.ensure_focus();
        assert_eq!(focus.current(), Some(a));

        let event = MouseEvent {
            button: crate::input::event::MouseButton::Left,
            action: MouseAction::Down,
            x: 0,
            y: 0,
            modifiers: Modifiers::NONE,
            click_count: 1,
        };
        route_mouse(&mut tree, root, event, &mut focus);
        assert_eq!(focus.current(), Some(b));
    }
}
