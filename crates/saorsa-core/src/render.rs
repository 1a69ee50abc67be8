//! Render dispatch: draws each committed node into a [`Surface`].
//!
//! `arrange` has already committed every node's `bounds`; render never
//! recomputes geometry, it only paints. The one piece of state threaded
//! through the recursion is the nearest enclosing scroll's clip window,
//! consulted by the leaf kinds that know how to virtualize themselves
//! (`Text`, `List`) — deeper descendants just inherit whatever clip is
//! active, per the "nearest ancestor clip provider" contract.

use crate::color::{Attrs, Color};
use crate::geometry::Rect;
use crate::node::{NodeId, Tree};
use crate::nodes::scroll::in_window;
use crate::nodes::{border::BorderGlyphs, Axis, NodeKind};
use crate::surface::Surface;
use crate::theme::{ThemeStack, TokenKey};
use crate::width::{string_display_width, wrap};

/// The nearest enclosing scroll viewport's clip window, if any.
#[derive(Clone, Copy)]
struct Clip {
    axis: Axis,
    offset: u16,
    viewport_size: u16,
}

/// Render `id` and its subtree into `surface`, resolving colors against
/// `themes`.
pub fn render(tree: &Tree, id: NodeId, surface: &mut Surface, themes: &mut ThemeStack) {
    render_inner(tree, id, surface, themes, None);
}

fn render_inner(tree: &Tree, id: NodeId, surface: &mut Surface, themes: &mut ThemeStack, clip: Option<Clip>) {
    let Some(node) = tree.get(id) else { return };
    let bounds = node.bounds;
    if bounds.is_empty() {
        return;
    }

    match &node.kind {
        NodeKind::Text(t) => render_text(&t.text, t.wrap, bounds, surface, themes, clip),
        NodeKind::List(l) => render_list(l, bounds, surface, themes, clip),
        NodeKind::Button(b) => render_button(b, node.is_focused, bounds, surface, themes),
        NodeKind::VStack(_) | NodeKind::HStack(_) => {
            for &child in &node.children {
                render_inner(tree, child, surface, themes, clip);
            }
        }
        NodeKind::Border(b) => {
            render_border(bounds, b.title.as_deref(), b.glyphs, surface, themes);
            for &child in &node.children {
                render_inner(tree, child, surface, themes, clip);
            }
        }
        NodeKind::Padding(_) => {
            for &child in &node.children {
                render_inner(tree, child, surface, themes, clip);
            }
        }
        NodeKind::Scroll(s) => {
            let child_clip = Some(Clip { axis: s.axis, offset: s.scroll_offset, viewport_size: s.viewport_size });
            for &child in &node.children {
                render_inner(tree, child, surface, themes, child_clip);
            }
            if s.scrollbar_active() {
                render_scrollbar(s, bounds, surface, themes);
            }
        }
        NodeKind::Splitter(s) => {
            render_divider(bounds, s.axis, &node.children, tree, surface, themes);
            for &child in &node.children {
                render_inner(tree, child, surface, themes, clip);
            }
        }
        NodeKind::ThemingPanel(t) => {
            let _scope = themes.scoped(t.overlay.clone());
            for &child in &node.children {
                render_inner(tree, child, surface, themes, clip);
            }
        }
        NodeKind::Responsive(_) => {
            for &child in &node.children {
                render_inner(tree, child, surface, themes, clip);
            }
        }
        NodeKind::ErrorPanel(e) => {
            render_error_panel(e, bounds, surface, themes);
            for &child in &node.children {
                render_inner(tree, child, surface, themes, clip);
            }
        }
    }
}

fn clipped_row(clip: Option<Clip>, bounds: Rect, index: u16) -> Option<u16> {
    match clip {
        Some(c) if c.axis == Axis::Vertical => {
            if !in_window(c.offset, c.viewport_size, index) {
                return None;
            }
            Some(bounds.y + (index - c.offset))
        }
        _ => {
            if index >= bounds.h {
                return None;
            }
            Some(bounds.y + index)
        }
    }
}

fn render_text(text: &str, wrap_enabled: bool, bounds: Rect, surface: &mut Surface, themes: &ThemeStack, clip: Option<Clip>) {
    let fg = themes.color(&TokenKey::Foreground, Color::WHITE);
    let lines: Vec<String> = if wrap_enabled { wrap(text, bounds.w.max(1)) } else { vec![text.to_string()] };
    for (i, line) in lines.iter().enumerate() {
        let Some(row) = clipped_row(clip, bounds, i as u16) else { continue };
        surface.write_text(i32::from(bounds.x), row, line, Some(fg), None, Attrs::NONE);
    }
}

fn render_list(
    list: &crate::nodes::ListNode,
    bounds: Rect,
    surface: &mut Surface,
    themes: &ThemeStack,
    clip: Option<Clip>,
) {
    let fg = themes.color(&TokenKey::Foreground, Color::WHITE);
    let accent = themes.color(&TokenKey::Accent, Color::CYAN);
    for (i, item) in list.items.iter().enumerate() {
        let Some(row) = clipped_row(clip, bounds, i as u16) else { continue };
        let selected = list.selected == Some(i);
        let indicator = if selected { "> " } else { "  " };
        let written = surface.write_text(i32::from(bounds.x), row, indicator, Some(accent), None, Attrs::NONE);
        let item_fg = if selected { accent } else { fg };
        let attrs = if selected { Attrs::BOLD } else { Attrs::NONE };
        surface.write_text(i32::from(bounds.x) + i32::from(written), row, item, Some(item_fg), None, attrs);
    }
}

fn render_button(
    button: &crate::nodes::ButtonNode,
    is_focused: bool,
    bounds: Rect,
    surface: &mut Surface,
    themes: &ThemeStack,
) {
    let accent = themes.color(&TokenKey::Accent, Color::CYAN);
    let fg = themes.color(&TokenKey::Foreground, Color::WHITE);
    let (color, attrs) = if is_focused { (accent, Attrs::REVERSE) } else { (fg, Attrs::NONE) };
    surface.write_text(i32::from(bounds.x), bounds.y, &button.label, Some(color), None, attrs);
}

fn render_border(bounds: Rect, title: Option<&str>, glyphs: BorderGlyphs, surface: &mut Surface, themes: &ThemeStack) {
    let border_color = themes.color(&TokenKey::Border, Color::GRAY);
    if bounds.w == 0 || bounds.h == 0 {
        return;
    }
    let top = bounds.y;
    let bottom = bounds.bottom().saturating_sub(1);
    let left = bounds.x;
    let right = bounds.right().saturating_sub(1);

    let horizontal: String = std::iter::repeat(glyphs.horizontal)
        .take(bounds.w.saturating_sub(2) as usize)
        .collect();
    surface.write_text(i32::from(left) + 1, top, &horizontal, Some(border_color), None, Attrs::NONE);
    if bottom != top {
        surface.write_text(i32::from(left) + 1, bottom, &horizontal, Some(border_color), None, Attrs::NONE);
    }
    for y in (top + 1)..bottom {
        surface.write_text(i32::from(left), y, &glyphs.vertical.to_string(), Some(border_color), None, Attrs::NONE);
        surface.write_text(i32::from(right), y, &glyphs.vertical.to_string(), Some(border_color), None, Attrs::NONE);
    }
    surface.write_text(i32::from(left), top, &glyphs.top_left.to_string(), Some(border_color), None, Attrs::NONE);
    surface.write_text(i32::from(right), top, &glyphs.top_right.to_string(), Some(border_color), None, Attrs::NONE);
    surface.write_text(i32::from(left), bottom, &glyphs.bottom_left.to_string(), Some(border_color), None, Attrs::NONE);
    surface.write_text(i32::from(right), bottom, &glyphs.bottom_right.to_string(), Some(border_color), None, Attrs::NONE);

    if let Some(title) = title {
        let titled = format!(" {title} ");
        surface.write_text(i32::from(left) + 2, top, &titled, Some(border_color), None, Attrs::BOLD);
    }
}

fn render_scrollbar(scroll: &crate::nodes::ScrollNode, bounds: Rect, surface: &mut Surface, themes: &ThemeStack) {
    let border_color = themes.color(&TokenKey::Border, Color::GRAY);
    match scroll.axis {
        Axis::Vertical => {
            let col = bounds.right().saturating_sub(1);
            if bounds.h < 2 {
                return;
            }
            surface.write_text(i32::from(col), bounds.y, "▲", Some(border_color), None, Attrs::NONE);
            surface.write_text(i32::from(col), bounds.bottom() - 1, "▼", Some(border_color), None, Attrs::NONE);
            let track_h = bounds.h.saturating_sub(2);
            if track_h == 0 || scroll.content_size == 0 {
                return;
            }
            let thumb_h = ((u32::from(scroll.viewport_size) * u32::from(track_h)) / u32::from(scroll.content_size.max(1)))
                .max(1)
                .min(u32::from(track_h)) as u16;
            let max_offset = scroll.max_offset().max(1);
            let thumb_pos = ((u32::from(scroll.scroll_offset) * u32::from(track_h.saturating_sub(thumb_h)))
                / u32::from(max_offset)) as u16;
            for i in 0..thumb_h {
                let row = bounds.y + 1 + thumb_pos + i;
                surface.write_text(i32::from(col), row, "█", Some(border_color), None, Attrs::NONE);
            }
        }
        Axis::Horizontal => {
            let row = bounds.bottom().saturating_sub(1);
            if bounds.w < 2 {
                return;
            }
            surface.write_text(i32::from(bounds.x), row, "◀", Some(border_color), None, Attrs::NONE);
            surface.write_text(i32::from(bounds.right()) - 1, row, "▶", Some(border_color), None, Attrs::NONE);
        }
    }
}

fn render_divider(bounds: Rect, axis: Axis, children: &[NodeId], tree: &Tree, surface: &mut Surface, themes: &ThemeStack) {
    let border_color = themes.color(&TokenKey::Border, Color::GRAY);
    let Some(&first) = children.first() else { return };
    let Some(first_bounds) = tree.get(first).map(|n| n.bounds) else { return };
    match axis {
        Axis::Vertical => {
            let row = first_bounds.bottom();
            let line: String = std::iter::repeat('─').take(bounds.w as usize).collect();
            surface.write_text(i32::from(bounds.x), row, &line, Some(border_color), None, Attrs::NONE);
        }
        Axis::Horizontal => {
            let col = first_bounds.right();
            for y in bounds.y..bounds.bottom() {
                surface.write_text(i32::from(col), y, "│", Some(border_color), None, Attrs::NONE);
            }
        }
    }
}

fn render_error_panel(panel: &crate::nodes::ErrorPanelNode, bounds: Rect, surface: &mut Surface, themes: &ThemeStack) {
    render_border(bounds, Some(&panel.title()), BorderGlyphs::SQUARE, surface, themes);
    let fg = themes.color(&TokenKey::Foreground, Color::WHITE);
    let inner = bounds.shrink(1);
    if inner.is_empty() {
        return;
    }
    surface.write_text(i32::from(inner.x), inner.y, &panel.message, Some(fg), None, Attrs::BOLD);
    let details_top = inner.y + 1;
    let details_height = inner.h.saturating_sub(2); // message line + button row
    for (i, line) in panel.details.iter().enumerate() {
        let idx = i as u16;
        if !in_window(panel.scroll_offset, details_height, idx) {
            continue;
        }
        let row = details_top + (idx - panel.scroll_offset);
        let clipped = if string_display_width(line) > inner.w {
            line.chars().take(inner.w as usize).collect::<String>()
        } else {
            line.clone()
        };
        surface.write_text(i32::from(inner.x), row, &clipped, Some(fg), None, Attrs::NONE);
    }
}
