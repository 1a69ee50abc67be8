//! Two-pane splitter node.

use crate::nodes::Axis;

/// Where the divider sits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pivot {
    /// A fixed number of cells from the start edge.
    Absolute(u16),
    /// A fraction (`0.0..=1.0`) of the total extent.
    Relative(f32),
}

impl Pivot {
    /// Resolve to an absolute cell offset within `total` cells, reserving
    /// `divider_width` for the divider itself.
    pub fn resolve(&self, total: u16, divider_width: u16) -> u16 {
        let usable = total.saturating_sub(divider_width);
        match *self {
            Pivot::Absolute(cells) => cells.min(usable),
            Pivot::Relative(frac) => {
                let frac = frac.clamp(0.0, 1.0);
                ((f32::from(usable)) * frac).round() as u16
            }
        }
    }
}

/// Divides its two children along one axis at a pivot, reserving one
/// row/column for the divider itself.
pub struct SplitterNode {
    /// The axis the two panes are arranged along.
    pub axis: Axis,
    /// Where the divider sits.
    pub pivot: Pivot,
}

impl SplitterNode {
    /// Width (vertical split) or height (horizontal split) reserved for the
    /// divider itself.
    pub const DIVIDER_WIDTH: u16 = 1;

    /// A splitter at an absolute offset.
    pub fn at(axis: Axis, offset: u16) -> Self {
        Self {
            axis,
            pivot: Pivot::Absolute(offset),
        }
    }

    /// A splitter at a relative fraction of the total extent.
    pub fn relative(axis: Axis, fraction: f32) -> Self {
        Self {
            axis,
            pivot: Pivot::Relative(fraction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_pivot_splits_in_half() {
        let pivot = Pivot::Relative(0.5);
        assert_eq!(pivot.resolve(21, 1), 10);
    }

    #[test]
    fn absolute_pivot_clamps_to_usable_width() {
        let pivot = Pivot::Absolute(100);
        assert_eq!(pivot.resolve(20, 1), 19);
    }
}
