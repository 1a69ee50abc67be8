//! Composite surfaces: an ordered stack of static and computed layers
//! resolved on demand, memoized and cycle-guarded per flatten pass.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::cell::Cell;
use crate::geometry::Size;
use crate::surface::Surface;

/// Context passed to a [`ComputedLayer`]'s resolution function.
pub struct LayerContext<'a> {
    /// Column being resolved.
    pub x: u16,
    /// Row being resolved.
    pub y: u16,
    below: &'a dyn Fn(u16, u16) -> Cell,
    same_layer: &'a dyn Fn(i32, i32) -> Cell,
}

impl<'a> LayerContext<'a> {
    /// The composited result of every layer below this one at this point.
    pub fn get_below(&self) -> Cell {
        (self.below)(self.x, self.y)
    }

    /// The composited result of every layer below this one at an arbitrary
    /// point.
    pub fn get_below_at(&self, x: u16, y: u16) -> Cell {
        (self.below)(x, y)
    }

    /// The resolved cell at `(x + dx, y + dy)` within *this same* computed
    /// layer (may recurse into this layer's own function).
    pub fn get_adjacent(&self, dx: i32, dy: i32) -> Cell {
        (self.same_layer)(i32::from(self.x) + dx, i32::from(self.y) + dy)
    }
}

/// A pure per-cell resolution function for a computed layer.
pub type ComputeFn = dyn Fn(&LayerContext) -> Cell;

/// One layer in a [`CompositeSurface`].
pub enum Layer {
    /// A pre-rendered surface placed at a fixed offset.
    Static {
        /// The surface content.
        surface: Surface,
        /// Horizontal offset from the composite's origin.
        dx: i32,
        /// Vertical offset from the composite's origin.
        dy: i32,
    },
    /// A layer of the given size whose cells are computed on demand.
    Computed {
        /// Layer size.
        size: Size,
        /// The resolution function.
        compute: Box<ComputeFn>,
    },
}

impl Layer {
    /// Construct a static layer.
    pub fn static_at(surface: Surface, dx: i32, dy: i32) -> Self {
        Layer::Static { surface, dx, dy }
    }

    /// Construct a computed layer.
    pub fn computed(size: Size, compute: impl Fn(&LayerContext) -> Cell + 'static) -> Self {
        Layer::Computed {
            size,
            compute: Box::new(compute),
        }
    }

    fn size(&self) -> Size {
        match self {
            Layer::Static { surface, .. } => surface.size(),
            Layer::Computed { size, .. } => *size,
        }
    }

    fn offset(&self) -> (i32, i32) {
        match self {
            Layer::Static { dx, dy, .. } => (*dx, *dy),
            Layer::Computed { .. } => (0, 0),
        }
    }
}

/// An ordered stack of layers, later layers drawn on top, resolved into a
/// flat [`Surface`] by [`CompositeSurface::flatten`].
pub struct CompositeSurface {
    size: Size,
    layers: Vec<Layer>,
}

/// Per-flatten-pass memoization and cycle-guard state for one layer.
struct LayerResolutionState {
    memo: RefCell<HashMap<(i32, i32), Cell>>,
    visiting: RefCell<std::collections::HashSet<(i32, i32)>>,
}

impl LayerResolutionState {
    fn new() -> Self {
        Self {
            memo: RefCell::new(HashMap::new()),
            visiting: RefCell::new(std::collections::HashSet::new()),
        }
    }
}

impl CompositeSurface {
    /// Create an empty composite of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            layers: Vec::new(),
        }
    }

    /// Push a layer on top of the stack.
    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// The number of layers currently in the stack.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Resolve every layer into a single flat surface.
    ///
    /// Computed-layer resolution is memoized per `(layer index, x, y)`
    /// within this one pass and guards against cycles: if a computed
    /// layer's function recurses back into the same `(layer, x, y)` while
    /// still resolving it (directly via `get_below`/`get_adjacent` chains
    /// that loop, or transitively), the cycle resolves to an empty
    /// ([`Cell::blank`]) cell rather than recursing forever.
    pub fn flatten(&self) -> Surface {
        let mut out = Surface::new(self.size);
        let states: Vec<LayerResolutionState> =
            self.layers.iter().map(|_| LayerResolutionState::new()).collect();

        for (idx, layer) in self.layers.iter().enumerate() {
            match layer {
                Layer::Static { surface, dx, dy } => {
                    let clip = crate::geometry::Rect::from_size(self.size);
                    out.composite(surface, *dx, *dy, clip);
                }
                Layer::Computed { size, compute } => {
                    for y in 0..size.h {
                        for x in 0..size.w {
                            let cell = self.resolve_computed(idx, x as i32, y as i32, compute, &states);
                            if !cell.is_transparent() || !cell.grapheme.is_empty() {
                                out.set(x, y, cell);
                            }
                        }
                    }
                }
            }
        }
        out
    }

    fn resolve_computed(
        &self,
        idx: usize,
        x: i32,
        y: i32,
        compute: &ComputeFn,
        states: &[LayerResolutionState],
    ) -> Cell {
        let state = &states[idx];
        if x < 0 || y < 0 {
            return Cell::blank();
        }
        let key = (x, y);
        if let Some(cached) = state.memo.borrow().get(&key) {
            return cached.clone();
        }
        if !state.visiting.borrow_mut().insert(key) {
            // Cycle: this (layer, x, y) is already being resolved up the
            // call stack. Short-circuit to an empty cell.
            return Cell::blank();
        }

        let below = |bx: u16, by: u16| self.resolve_below(idx, bx, by, states);
        let same_layer = |sx: i32, sy: i32| {
            if sx < 0 || sy < 0 {
                Cell::blank()
            } else {
                self.resolve_computed(idx, sx, sy, compute, states)
            }
        };
        let ctx = LayerContext {
            x: x as u16,
            y: y as u16,
            below: &below,
            same_layer: &same_layer,
        };
        let cell = compute(&ctx);

        state.visiting.borrow_mut().remove(&key);
        state.memo.borrow_mut().insert(key, cell.clone());
        cell
    }

    fn resolve_below(&self, idx: usize, x: u16, y: u16, states: &[LayerResolutionState]) -> Cell {
        let mut result = Cell::blank();
        for (i, layer) in self.layers[..idx].iter().enumerate() {
            match layer {
                Layer::Static { surface, dx, dy } => {
                    let sx = i32::from(x) - dx;
                    let sy = i32::from(y) - dy;
                    if sx >= 0 && sy >= 0 {
                        if let Some(cell) = surface.get(sx as u16, sy as u16) {
                            if !cell.is_transparent() {
                                result = cell.clone();
                            }
                        }
                    }
                }
                Layer::Computed { compute, .. } => {
                    let cell = self.resolve_computed(i, i32::from(x), i32::from(y), compute, states);
                    if !cell.is_transparent() {
                        result = cell;
                    }
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn static_layer_composites_in_order() {
        let mut comp = CompositeSurface::new(Size::new(3, 1));
        let mut bottom = Surface::new(Size::new(3, 1));
        bottom.write_text(0, 0, "abc", Some(Color::RED), None, Default::default());
        comp.push(Layer::static_at(bottom, 0, 0));

        let mut top = Surface::new(Size::new(1, 1));
        top.write_text(0, 0, "X", Some(Color::BLUE), None, Default::default());
        comp.push(Layer::static_at(top, 1, 0));

        let flat = comp.flatten();
        assert_eq!(flat.get(0, 0).unwrap().grapheme, "a");
        assert_eq!(flat.get(1, 0).unwrap().grapheme, "X");
        assert_eq!(flat.get(2, 0).unwrap().grapheme, "c");
    }

    #[test]
    fn computed_layer_sees_below() {
        let mut comp = CompositeSurface::new(Size::new(2, 1));
        let mut bottom = Surface::new(Size::new(2, 1));
        bottom.write_text(0, 0, "ab", None, None, Default::default());
        comp.push(Layer::static_at(bottom, 0, 0));
        comp.push(Layer::computed(Size::new(2, 1), |ctx| {
            let mut c = ctx.get_below();
            c.fg = Some(Color::GREEN);
            c
        }));

        let flat = comp.flatten();
        assert_eq!(flat.get(0, 0).unwrap().grapheme, "a");
        assert_eq!(flat.get(0, 0).unwrap().fg, Some(Color::GREEN));
    }

    #[test]
    fn self_referential_computed_layer_resolves_via_cycle_guard() {
        let mut comp = CompositeSurface::new(Size::new(3, 1));
        // Each cell looks at its neighbor to the right, which looks at its
        // neighbor, eventually cycling back — must not stack overflow.
        comp.push(Layer::computed(Size::new(3, 1), |ctx| {
            if ctx.x == 2 {
                ctx.get_adjacent(-2, 0)
            } else {
                ctx.get_adjacent(1, 0)
            }
        }));
        let flat = comp.flatten();
        // All cells resolve to blank because the cycle breaks to empty.
        for x in 0..3 {
            assert!(flat.get(x, 0).unwrap().is_transparent() || flat.get(x, 0).unwrap().grapheme.is_empty());
        }
    }

    #[test]
    fn memoization_computes_each_cell_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = std::sync::Arc::new(AtomicUsize::new(0));
        let calls2 = calls.clone();
        let mut comp = CompositeSurface::new(Size::new(2, 1));
        comp.push(Layer::computed(Size::new(2, 1), move |ctx| {
            calls2.fetch_add(1, Ordering::SeqCst);
            if ctx.x == 1 {
                // Force a repeated lookup of the same (layer, 0, 0) cell.
                let _ = ctx.get_adjacent(-1, 0);
                let _ = ctx.get_adjacent(-1, 0);
            }
            Cell::blank()
        }));
        comp.flatten();
        // x=0 resolves once directly; x=1 resolves once directly and both
        // of its lookups hit the memoized x=0 result without re-entering
        // the compute closure: 2 calls total.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
