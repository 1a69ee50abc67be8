//! Two-pass measure/arrange layout.
//!
//! `measure` is `&Tree`-only and pure, so it recurses freely. `arrange`
//! needs a three-phase shape to stay borrow-checker-safe over the arena:
//! (1) commit this node's own `bounds` and read off whatever `&Tree` data
//! is needed to compute each child's rect, letting that immutable borrow
//! end; (2) recurse into each child with a fresh `&mut Tree` borrow per
//! call; (3) re-borrow mutably only to commit kind-specific post-arrange
//! state (a scroll's clamped offset, a responsive panel's chosen index).
//! An arrange call never holds two overlapping borrows of the same arena
//! slot across a recursive step (§9 Design Notes).

use crate::geometry::{Constraints, Rect, Size, UNBOUNDED};
use crate::node::{NodeId, Tree};
use crate::nodes::splitter::Pivot;
use crate::nodes::{Axis, NodeKind};
use crate::width::{string_display_width, wrap};

fn fill_or_min(min: u16, max: u16) -> u16 {
    if max == UNBOUNDED {
        min
    } else {
        max
    }
}

/// Compute a node's intrinsic preferred size, clamped to `constraints`.
/// Pure: never mutates the tree.
pub fn measure(tree: &Tree, id: NodeId, constraints: Constraints) -> Size {
    let Some(node) = tree.get(id) else { return Size::ZERO };
    let size = match &node.kind {
        NodeKind::Text(t) => measure_text(&t.text, t.wrap, constraints),
        NodeKind::VStack(s) => measure_stack(tree, &node.children, Axis::Vertical, s.spacing, constraints),
        NodeKind::HStack(s) => measure_stack(tree, &node.children, Axis::Horizontal, s.spacing, constraints),
        NodeKind::Border(_) => measure_chrome(
            tree,
            &node.children,
            constraints,
            crate::nodes::BorderNode::CHROME_W,
            crate::nodes::BorderNode::CHROME_H,
        ),
        NodeKind::Padding(p) => measure_chrome(tree, &node.children, constraints, p.chrome_w(), p.chrome_h()),
        NodeKind::List(l) => {
            let max_item = l.items.iter().map(|s| string_display_width(s)).max().unwrap_or(0);
            Size::new(max_item + l.indicator_width, l.items.len() as u16)
        }
        NodeKind::Scroll(s) => measure_scroll(constraints, s.axis),
        NodeKind::Splitter(s) => measure_splitter(tree, &node.children, s.axis, constraints),
        NodeKind::ThemingPanel(_) | NodeKind::Responsive(_) => {
            measure_passthrough_child(tree, &node.children, constraints)
        }
        NodeKind::Button(b) => Size::new(string_display_width(&b.label), 1),
        NodeKind::ErrorPanel(_) => Size::new(
            fill_or_min(constraints.min_w, constraints.max_w),
            fill_or_min(constraints.min_h, constraints.max_h),
        ),
    };
    constraints.clamp(size)
}

fn measure_text(text: &str, wrap_enabled: bool, constraints: Constraints) -> Size {
    if !wrap_enabled || constraints.max_w == UNBOUNDED {
        return Size::new(string_display_width(text), 1);
    }
    let lines = wrap(text, constraints.max_w.max(1));
    let width = lines.iter().map(|l| string_display_width(l)).max().unwrap_or(0);
    Size::new(width, lines.len() as u16)
}

fn measure_stack(tree: &Tree, children: &[NodeId], axis: Axis, spacing: u16, constraints: Constraints) -> Size {
    let child_constraints = match axis {
        Axis::Vertical => Constraints {
            min_w: 0,
            max_w: constraints.max_w,
            min_h: 0,
            max_h: UNBOUNDED,
        },
        Axis::Horizontal => Constraints {
            min_w: 0,
            max_w: UNBOUNDED,
            min_h: 0,
            max_h: constraints.max_h,
        },
    };
    let mut stack_total: u32 = 0;
    let mut cross_max: u16 = 0;
    for &child in children {
        let size = measure(tree, child, child_constraints);
        match axis {
            Axis::Vertical => {
                stack_total += u32::from(size.h);
                cross_max = cross_max.max(size.w);
            }
            Axis::Horizontal => {
                stack_total += u32::from(size.w);
                cross_max = cross_max.max(size.h);
            }
        }
    }
    if !children.is_empty() {
        stack_total += u32::from(spacing) * (children.len() as u32 - 1);
    }
    let stack_total = stack_total.min(u32::from(u16::MAX)) as u16;
    match axis {
        Axis::Vertical => Size::new(cross_max, stack_total),
        Axis::Horizontal => Size::new(stack_total, cross_max),
    }
}

fn measure_chrome(tree: &Tree, children: &[NodeId], constraints: Constraints, chrome_w: u16, chrome_h: u16) -> Size {
    let Some(&child) = children.first() else {
        return Size::new(chrome_w, chrome_h);
    };
    let inner = Constraints {
        min_w: constraints.min_w.saturating_sub(chrome_w),
        max_w: if constraints.max_w == UNBOUNDED {
            UNBOUNDED
        } else {
            constraints.max_w.saturating_sub(chrome_w)
        },
        min_h: constraints.min_h.saturating_sub(chrome_h),
        max_h: if constraints.max_h == UNBOUNDED {
            UNBOUNDED
        } else {
            constraints.max_h.saturating_sub(chrome_h)
        },
    };
    let child_size = measure(tree, child, inner);
    Size::new(
        child_size.w.saturating_add(chrome_w),
        child_size.h.saturating_add(chrome_h),
    )
}

fn measure_scroll(constraints: Constraints, _axis: Axis) -> Size {
    Size::new(
        fill_or_min(constraints.min_w, constraints.max_w),
        fill_or_min(constraints.min_h, constraints.max_h),
    )
}

fn measure_splitter(tree: &Tree, children: &[NodeId], axis: Axis, constraints: Constraints) -> Size {
    let unbounded_axis = match axis {
        Axis::Vertical => Constraints {
            min_w: 0,
            max_w: constraints.max_w,
            min_h: 0,
            max_h: UNBOUNDED,
        },
        Axis::Horizontal => Constraints {
            min_w: 0,
            max_w: UNBOUNDED,
            min_h: 0,
            max_h: constraints.max_h,
        },
    };
    let mut total: u32 = u32::from(crate::nodes::SplitterNode::DIVIDER_WIDTH);
    let mut cross: u16 = 0;
    for &child in children.iter().take(2) {
        let size = measure(tree, child, unbounded_axis);
        match axis {
            Axis::Vertical => {
                total += u32::from(size.h);
                cross = cross.max(size.w);
            }
            Axis::Horizontal => {
                total += u32::from(size.w);
                cross = cross.max(size.h);
            }
        }
    }
    let total = total.min(u32::from(u16::MAX)) as u16;
    match axis {
        Axis::Vertical => Size::new(cross, total),
        Axis::Horizontal => Size::new(total, cross),
    }
}

fn measure_passthrough_child(tree: &Tree, children: &[NodeId], constraints: Constraints) -> Size {
    match children.first() {
        Some(&child) => measure(tree, child, constraints),
        None => Size::ZERO,
    }
}

/// Commit `rect` to `id` and cascade to its children.
pub fn arrange(tree: &mut Tree, id: NodeId, rect: Rect) {
    if let Some(node) = tree.get_mut(id) {
        node.bounds = rect;
    } else {
        return;
    }

    let Some(node) = tree.get(id) else { return };
    let children = node.children.clone();

    match &node.kind {
        NodeKind::Text(_) | NodeKind::List(_) | NodeKind::Button(_) => {}
        NodeKind::VStack(s) => arrange_stack(tree, &children, Axis::Vertical, s.spacing, rect),
        NodeKind::HStack(s) => arrange_stack(tree, &children, Axis::Horizontal, s.spacing, rect),
        NodeKind::Border(_) => arrange_single_child(tree, &children, rect.shrink(1)),
        NodeKind::Padding(p) => {
            let (top, right, bottom, left) = (p.top, p.right, p.bottom, p.left);
            let inner = Rect::new(
                rect.x.saturating_add(left),
                rect.y.saturating_add(top),
                rect.w.saturating_sub(left.saturating_add(right)),
                rect.h.saturating_sub(top.saturating_add(bottom)),
            );
            arrange_single_child(tree, &children, inner);
        }
        NodeKind::Scroll(s) => arrange_scroll(tree, id, &children, s.axis, rect),
        NodeKind::Splitter(s) => arrange_splitter(tree, &children, s.axis, s.pivot, rect),
        NodeKind::ThemingPanel(_) | NodeKind::Responsive(_) => arrange_single_child(tree, &children, rect),
        NodeKind::ErrorPanel(_) => arrange_error_panel(tree, &children, rect),
    }
}

fn arrange_single_child(tree: &mut Tree, children: &[NodeId], rect: Rect) {
    if let Some(&child) = children.first() {
        arrange(tree, child, rect);
    }
}

fn arrange_stack(tree: &mut Tree, children: &[NodeId], axis: Axis, spacing: u16, rect: Rect) {
    if children.is_empty() {
        return;
    }
    let stack_extent = match axis {
        Axis::Vertical => rect.h,
        Axis::Horizontal => rect.w,
    };

    let cross_constraints = match axis {
        Axis::Vertical => Constraints {
            min_w: 0,
            max_w: rect.w,
            min_h: 0,
            max_h: UNBOUNDED,
        },
        Axis::Horizontal => Constraints {
            min_w: 0,
            max_w: UNBOUNDED,
            min_h: 0,
            max_h: rect.h,
        },
    };

    let total_spacing = spacing.saturating_mul(children.len().saturating_sub(1) as u16);
    let available = stack_extent.saturating_sub(total_spacing);

    let mut fixed_sizes = vec![0u16; children.len()];
    let mut weights = vec![0u16; children.len()];
    let mut fixed_total: u32 = 0;
    let mut weight_total: u32 = 0;
    for (i, &child) in children.iter().enumerate() {
        let fill_weight = tree.get(child).and_then(|n| n.fill_weight);
        match fill_weight {
            Some(w) if w > 0 => {
                weights[i] = w;
                weight_total += u32::from(w);
            }
            _ => {
                let size = measure(tree, child, cross_constraints);
                let extent = match axis {
                    Axis::Vertical => size.h,
                    Axis::Horizontal => size.w,
                };
                fixed_sizes[i] = extent;
                fixed_total += u32::from(extent);
            }
        }
    }

    let remaining = u32::from(available).saturating_sub(fixed_total) as u16;
    let mut allocated = vec![0u16; children.len()];
    let mut distributed = 0u16;
    for i in 0..children.len() {
        if weights[i] > 0 {
            let share = if weight_total == 0 {
                0
            } else {
                ((u32::from(remaining) * u32::from(weights[i])) / weight_total) as u16
            };
            allocated[i] = share;
            distributed = distributed.saturating_add(share);
        } else {
            allocated[i] = fixed_sizes[i];
        }
    }
    // Give any leftover (rounding remainder) to the last flexible child, in
    // source order, so the stack fills its rect exactly.
    if let Some(last_flex) = (0..children.len()).rev().find(|&i| weights[i] > 0) {
        allocated[last_flex] = allocated[last_flex].saturating_add(remaining.saturating_sub(distributed));
    }

    let mut cursor = match axis {
        Axis::Vertical => rect.y,
        Axis::Horizontal => rect.x,
    };
    for (i, &child) in children.iter().enumerate() {
        let extent = allocated[i];
        let child_rect = match axis {
            Axis::Vertical => Rect::new(rect.x, cursor, rect.w, extent),
            Axis::Horizontal => Rect::new(cursor, rect.y, extent, rect.h),
        };
        arrange(tree, child, child_rect);
        cursor = cursor.saturating_add(extent).saturating_add(spacing);
    }
}

fn arrange_scroll(tree: &mut Tree, id: NodeId, children: &[NodeId], axis: Axis, rect: Rect) {
    let Some(&child) = children.first() else { return };

    let content_constraints = match axis {
        Axis::Vertical => Constraints {
            min_w: 0,
            max_w: rect.w,
            min_h: 0,
            max_h: UNBOUNDED,
        },
        Axis::Horizontal => Constraints {
            min_w: 0,
            max_w: UNBOUNDED,
            min_h: 0,
            max_h: rect.h,
        },
    };
    let content_size_full = measure(tree, child, content_constraints);
    let content_extent = match axis {
        Axis::Vertical => content_size_full.h,
        Axis::Horizontal => content_size_full.w,
    };
    let viewport_extent = match axis {
        Axis::Vertical => rect.h,
        Axis::Horizontal => rect.w,
    };

    let show_scrollbar = tree.get(id).map(|n| matches!(&n.kind, NodeKind::Scroll(s) if s.show_scrollbar)).unwrap_or(false);
    let scrollbar_active = show_scrollbar && content_extent > viewport_extent;

    let child_rect = match axis {
        Axis::Vertical => Rect::new(rect.x, rect.y, rect.w.saturating_sub(u16::from(scrollbar_active)), rect.h),
        Axis::Horizontal => Rect::new(rect.x, rect.y, rect.w, rect.h.saturating_sub(u16::from(scrollbar_active))),
    };

    if let Some(node) = tree.get_mut(id) {
        if let NodeKind::Scroll(s) = &mut node.kind {
            s.content_size = content_extent;
            s.viewport_size = viewport_extent;
            let max_offset = s.max_offset();
            s.scroll_offset = s.scroll_offset.min(max_offset);
        }
    }

    arrange(tree, child, child_rect);
}

fn arrange_splitter(tree: &mut Tree, children: &[NodeId], axis: Axis, pivot: Pivot, rect: Rect) {
    if children.len() < 2 {
        arrange_single_child(tree, children, rect);
        return;
    }
    let divider = crate::nodes::SplitterNode::DIVIDER_WIDTH;
    let total = match axis {
        Axis::Vertical => rect.h,
        Axis::Horizontal => rect.w,
    };
    let first_extent = pivot.resolve(total, divider);
    let second_extent = total.saturating_sub(first_extent).saturating_sub(divider);

    let (rect_a, rect_b) = match axis {
        Axis::Vertical => (
            Rect::new(rect.x, rect.y, rect.w, first_extent),
            Rect::new(rect.x, rect.y + first_extent + divider, rect.w, second_extent),
        ),
        Axis::Horizontal => (
            Rect::new(rect.x, rect.y, first_extent, rect.h),
            Rect::new(rect.x + first_extent + divider, rect.y, second_extent, rect.h),
        ),
    };

    arrange(tree, children[0], rect_a);
    arrange(tree, children[1], rect_b);
}

fn arrange_error_panel(tree: &mut Tree, children: &[NodeId], rect: Rect) {
    let inner = rect.shrink(1);
    if children.is_empty() || inner.is_empty() {
        return;
    }
    let button_row = Rect::new(inner.x, inner.bottom().saturating_sub(1), inner.w, 1.min(inner.h));
    let count = children.len() as u16;
    let each = if count == 0 { 0 } else { inner.w / count };
    let mut x = button_row.x;
    for &child in children {
        arrange(tree, child, Rect::new(x, button_row.y, each, button_row.h));
        x = x.saturating_add(each);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Key, Node};
    use crate::nodes::{BorderNode, ListNode, StackNode, TextNode};

    fn text(tree: &mut Tree, s: &str) -> NodeId {
        tree.insert(Node::new(NodeKind::Text(TextNode::new(s)), Key::Index(0)))
    }

    #[test]
    fn measure_text_reports_display_width_and_height_one() {
        let mut tree = Tree::new();
        let id = text(&mut tree, "hello");
        let size = measure(&tree, id, Constraints::unbounded());
        assert_eq!(size, Size::new(5, 1));
    }

    #[test]
    fn measure_wrapped_text_reports_multiple_lines() {
        let mut tree = Tree::new();
        let id = tree.insert(Node::new(NodeKind::Text(TextNode::wrapped("a b c d e")), Key::Index(0)));
        let size = measure(&tree, id, Constraints { min_w: 0, max_w: 3, min_h: 0, max_h: UNBOUNDED });
        assert!(size.h > 1);
    }

    #[test]
    fn vstack_sums_heights_and_takes_max_width() {
        let mut tree = Tree::new();
        let a = text(&mut tree, "aa");
        let b = text(&mut tree, "bbbb");
        let mut root_node = Node::new(NodeKind::VStack(StackNode::new()), Key::Index(0));
        root_node.children = vec![a, b];
        let root = tree.insert(root_node);
        let size = measure(&tree, root, Constraints::unbounded());
        assert_eq!(size, Size::new(4, 2));
    }

    #[test]
    fn arrange_stack_divides_flexible_children_by_weight() {
        let mut tree = Tree::new();
        let a = text(&mut tree, "a");
        let b = text(&mut tree, "b");
        if let Some(n) = tree.get_mut(a) {
            n.fill_weight = Some(1);
        }
        if let Some(n) = tree.get_mut(b) {
            n.fill_weight = Some(1);
        }
        let mut root_node = Node::new(NodeKind::VStack(StackNode::new()), Key::Index(0));
        root_node.children = vec![a, b];
        let root = tree.insert(root_node);
        arrange(&mut tree, root, Rect::new(0, 0, 10, 10));
        assert_eq!(tree.get(a).unwrap().bounds.h, 5);
        assert_eq!(tree.get(b).unwrap().bounds.h, 5);
    }

    #[test]
    fn border_chrome_shrinks_child_rect_by_one_on_each_side() {
        let mut tree = Tree::new();
        let child = text(&mut tree, "x");
        let mut root_node = Node::new(NodeKind::Border(BorderNode::new()), Key::Index(0));
        root_node.children = vec![child];
        let root = tree.insert(root_node);
        arrange(&mut tree, root, Rect::new(0, 0, 10, 10));
        assert_eq!(tree.get(child).unwrap().bounds, Rect::new(1, 1, 8, 8));
    }

    #[test]
    fn scroll_clamps_offset_to_max_after_arrange() {
        let mut tree = Tree::new();
        let list = tree.insert(Node::new(
            NodeKind::List(ListNode::new(vec!["x".into(); 20])),
            Key::Index(0),
        ));
        let mut scroll_node = crate::nodes::ScrollNode::vertical();
        scroll_node.scroll_offset = 999;
        let mut scroll = Node::new(NodeKind::Scroll(scroll_node), Key::Index(0));
        scroll.children = vec![list];
        let root = tree.insert(scroll);
        arrange(&mut tree, root, Rect::new(0, 0, 10, 10));
        if let NodeKind::Scroll(s) = &tree.get(root).unwrap().kind {
            assert_eq!(s.scroll_offset, s.max_offset());
            assert!(s.scroll_offset <= s.content_size.saturating_sub(s.viewport_size));
        } else {
            panic!("expected scroll node");
        }
    }

    #[test]
    fn layout_clamping_holds_for_constrained_text() {
        let mut tree = Tree::new();
        let id = text(&mut tree, "a very long line of text here");
        let c = Constraints { min_w: 2, max_w: 6, min_h: 1, max_h: 3 };
        let size = measure(&tree, id, c);
        assert!(size.w >= c.min_w && size.w <= c.max_w);
        assert!(size.h >= c.min_h && size.h <= c.max_h);
    }
}
