//! Property-based tests for the cell differ and emitter.
//!
//! Generates random surfaces and checks the round-trip invariant from §8:
//! `apply(diff(A, B)) == B`, regardless of what text and colors `A`/`B`
//! happen to contain.

use proptest::prelude::*;
use saorsa_core::color::{Attrs, Color};
use saorsa_core::diff::{apply, diff};
use saorsa_core::geometry::Size;
use saorsa_core::Surface;

const PALETTE: [Color; 4] = [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE];

fn surface_from_writes(size: Size, writes: &[(u16, u16, char, u8)]) -> Surface {
    let mut s = Surface::new(size);
    for &(x, y, ch, color_idx) in writes {
        if y >= size.h {
            continue;
        }
        let fg = PALETTE[usize::from(color_idx) % PALETTE.len()];
        s.write_text(i32::from(x), y, &ch.to_string(), Some(fg), None, Attrs::NONE);
    }
    s
}

proptest! {
    #[test]
    fn diff_apply_roundtrips_to_target(
        writes_a in prop::collection::vec((0u16..8, 0u16..4, prop::char::range('a', 'z'), 0u8..4), 0..12),
        writes_b in prop::collection::vec((0u16..8, 0u16..4, prop::char::range('a', 'z'), 0u8..4), 0..12),
    ) {
        let size = Size::new(8, 4);
        let a = surface_from_writes(size, &writes_a);
        let b = surface_from_writes(size, &writes_b);

        let changes = diff(&a, &b);
        let applied = apply(&a, &changes);
        prop_assert_eq!(applied.as_span(), b.as_span());
    }

    #[test]
    fn diff_of_equal_surfaces_is_always_empty(
        writes in prop::collection::vec((0u16..8, 0u16..4, prop::char::range('a', 'z'), 0u8..4), 0..12),
    ) {
        let size = Size::new(8, 4);
        let a = surface_from_writes(size, &writes);
        let b = a.clone();
        prop_assert!(diff(&a, &b).is_empty());
    }
}
