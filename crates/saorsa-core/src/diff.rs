//! Row-ordered cell diffing (§4.3).

use crate::cell::Cell;
use crate::surface::Surface;

/// A single changed cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Change {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// The new cell value.
    pub cell: Cell,
}

/// An ordered list of cell changes, `(y asc, x asc)`.
pub type ChangeList = Vec<Change>;

/// Diff `prev` against `curr`, returning every cell that differs.
///
/// Precondition: `prev` and `curr` have the same dimensions. Callers whose
/// surfaces have been resized should diff against a freshly-cleared
/// same-size `prev` instead (§4.3: "the caller promotes prev to empty").
/// Cell equality is full structural equality including `display_width`.
pub fn diff(prev: &Surface, curr: &Surface) -> ChangeList {
    debug_assert_eq!(prev.size(), curr.size(), "diff requires equal-size surfaces");
    let mut changes = Vec::new();
    for y in 0..curr.height() {
        for x in 0..curr.width() {
            let old = prev.get(x, y);
            let new = curr.get(x, y);
            if old != new {
                if let Some(cell) = new {
                    changes.push(Change {
                        x,
                        y,
                        cell: cell.clone(),
                    });
                }
            }
        }
    }
    changes
}

/// Apply a change list onto a copy of `base`, returning the result.
///
/// Used by the round-trip invariant `apply(diff(A, B)) == B` (§8).
pub fn apply(base: &Surface, changes: &ChangeList) -> Surface {
    let mut out = base.clone();
    for change in changes {
        out.set(change.x, change.y, change.cell.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Attrs, Color};
    use crate::geometry::Size;

    #[test]
    fn diff_of_identical_surfaces_is_empty() {
        let s = Surface::new(Size::new(5, 5));
        assert!(diff(&s, &s).is_empty());
    }

    #[test]
    fn diff_ordering_is_row_major() {
        let a = Surface::new(Size::new(3, 2));
        let mut b = a.clone();
        b.write_text(2, 0, "x", None, None, Attrs::NONE);
        b.write_text(0, 1, "y", None, None, Attrs::NONE);
        b.write_text(0, 0, "z", None, None, Attrs::NONE);
        let changes = diff(&a, &b);
        let coords: Vec<(u16, u16)> = changes.iter().map(|c| (c.y, c.x)).collect();
        let mut sorted = coords.clone();
        sorted.sort();
        assert_eq!(coords, sorted);
    }

    #[test]
    fn round_trip_apply_reconstructs_target() {
        let a = Surface::new(Size::new(6, 3));
        let mut b = a.clone();
        b.write_text(1, 1, "hi", Some(Color::RED), None, Attrs::BOLD);
        let changes = diff(&a, &b);
        let applied = apply(&a, &changes);
        assert_eq!(applied.as_span(), b.as_span());
    }

    #[test]
    fn diff_detects_width_only_changes() {
        let mut a = Surface::new(Size::new(4, 1));
        let mut b = Surface::new(Size::new(4, 1));
        a.write_text(0, 0, "日", None, None, Attrs::NONE);
        b.write_text(0, 0, "a ", None, None, Attrs::NONE);
        let changes = diff(&a, &b);
        assert!(!changes.is_empty());
    }
}
