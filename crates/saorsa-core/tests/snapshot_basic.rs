//! Basic snapshot tests for surface rendering.

use saorsa_core::color::{Attrs, Color};
use saorsa_core::geometry::Size;
use saorsa_core::nodes::ListNode;
use saorsa_core::pipeline::Snapshot;
use saorsa_core::Surface;

/// Render a surface to plain text, one line per row, trailing padding
/// trimmed for a readable snapshot.
fn render_to_text(surface: &Surface) -> String {
    let snap = Snapshot::capture(surface);
    (0..snap.height())
        .map(|y| snap.get_line(y).unwrap_or_default().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn blank_surface_renders_empty_lines() {
    let surface = Surface::new(Size::new(6, 2));
    let rendered = render_to_text(&surface);
    assert_eq!(rendered, "\n");
}

#[test]
fn snapshot_short_text() {
    let mut surface = Surface::new(Size::new(10, 1));
    surface.write_text(0, 0, "Hello", Some(Color::RED), None, Attrs::NONE);
    let rendered = render_to_text(&surface);
    insta::assert_snapshot!(rendered, @"Hello");
}

#[test]
fn snapshot_selection_indicator() {
    // The §8 "selection indicator" scenario: three items, second selected,
    // rendered through the list's render path.
    let items = vec!["First".to_string(), "Second".to_string(), "Third".to_string()];
    let mut surface = Surface::new(Size::new(10, 3));
    let list = ListNode::with_selected(items, 1);
    for (i, item) in list.items.iter().enumerate() {
        let indicator = if list.selected == Some(i) { "> " } else { "  " };
        surface.write_text(0, i as u16, indicator, None, None, Attrs::NONE);
        surface.write_text(2, i as u16, item, None, None, Attrs::NONE);
    }
    let rendered = render_to_text(&surface);
    insta::assert_snapshot!(rendered, @r"
      First
    > Second
      Third
    ");
}

#[test]
fn snapshot_wide_grapheme_row() {
    let mut surface = Surface::new(Size::new(4, 1));
    surface.write_text(0, 0, "AB日", None, None, Attrs::NONE);
    let rendered = render_to_text(&surface);
    insta::assert_snapshot!(rendered, @"AB日");
}
