//! Rendering benchmarks — surface diff and ANSI emission.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use saorsa_core::ansi::{emit, SgrState};
use saorsa_core::color::{Attrs, Color};
use saorsa_core::diff::diff;
use saorsa_core::geometry::Size;
use saorsa_core::surface::Surface;

fn checkerboard(size: Size, glyph: &str, color: Color) -> Surface {
    let mut surface = Surface::new(size);
    for y in 0..size.h {
        for x in 0..size.w {
            if (x + y) % 2 == 0 {
                surface.write_text(i32::from(x), y, glyph, Some(color), None, Attrs::NONE);
            }
        }
    }
    surface
}

fn benchmark_diff(c: &mut Criterion, name: &str, size: Size) {
    let previous = Surface::new(size);
    let current = checkerboard(size, "X", Color::RED);
    c.bench_function(name, |b| {
        b.iter(|| black_box(diff(&previous, &current)));
    });
}

fn benchmark_diff_80x24(c: &mut Criterion) {
    benchmark_diff(c, "surface_diff_80x24", Size::new(80, 24));
}

fn benchmark_diff_120x40(c: &mut Criterion) {
    benchmark_diff(c, "surface_diff_120x40", Size::new(120, 40));
}

fn benchmark_diff_200x60(c: &mut Criterion) {
    benchmark_diff(c, "surface_diff_200x60", Size::new(200, 60));
}

fn benchmark_emit_80x24(c: &mut Criterion) {
    let previous = Surface::new(Size::new(80, 24));
    let current = checkerboard(Size::new(80, 24), "O", Color::GREEN);
    let changes = diff(&previous, &current);
    c.bench_function("emit_80x24", |b| {
        b.iter(|| {
            let mut state = SgrState::new();
            black_box(emit(&changes, &mut state))
        });
    });
}

fn benchmark_full_frame_cycle(c: &mut Criterion) {
    c.bench_function("full_frame_cycle_80x24", |b| {
        b.iter(|| {
            let previous = Surface::new(Size::new(80, 24));
            let current = checkerboard(Size::new(80, 24), "*", Color::BLUE);
            let changes = diff(&previous, &current);
            let mut state = SgrState::new();
            black_box(emit(&changes, &mut state))
        });
    });
}

criterion_group!(
    benches,
    benchmark_diff_80x24,
    benchmark_diff_120x40,
    benchmark_diff_200x60,
    benchmark_emit_80x24,
    benchmark_full_frame_cycle,
);
criterion_main!(benches);
