//! Layout benchmarks — measure/arrange over nested stack trees.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use saorsa_core::geometry::{Constraints, Rect, Size};
use saorsa_core::layout::{arrange, measure};
use saorsa_core::node::{Key, Node, Tree};
use saorsa_core::nodes::{NodeKind, StackNode, TextNode};

/// Build a VStack of `n` HStacks, each containing `m` text leaves, for a
/// layout tree wide and deep enough to exercise both measure's recursion
/// and arrange's flex-weight distribution.
fn build_tree(n: usize, m: usize) -> (Tree, saorsa_core::node::NodeId) {
    let mut tree = Tree::new();
    let mut rows = Vec::with_capacity(n);
    for r in 0..n {
        let mut cells = Vec::with_capacity(m);
        for col in 0..m {
            let leaf = tree.insert(Node::new(
                NodeKind::Text(TextNode::new(format!("r{r}c{col}"))),
                Key::Index(col),
            ));
            if let Some(node) = tree.get_mut(leaf) {
                node.fill_weight = Some(1);
            }
            cells.push(leaf);
        }
        let mut row = Node::new(NodeKind::HStack(StackNode::new()), Key::Index(r));
        row.children = cells;
        rows.push(tree.insert(row));
    }
    let mut root = Node::new(NodeKind::VStack(StackNode::new()), Key::Index(0));
    root.children = rows;
    let root_id = tree.insert(root);
    (tree, root_id)
}

fn benchmark_measure(c: &mut Criterion, name: &str, n: usize, m: usize) {
    let (tree, root) = build_tree(n, m);
    let constraints = Constraints::tight(Size::new(200, 60));
    c.bench_function(name, |b| {
        b.iter(|| black_box(measure(&tree, root, constraints)));
    });
}

fn benchmark_arrange(c: &mut Criterion, name: &str, n: usize, m: usize) {
    c.bench_function(name, |b| {
        b.iter(|| {
            let (mut tree, root) = build_tree(n, m);
            arrange(&mut tree, root, Rect::new(0, 0, 200, 60));
            black_box(&tree);
        });
    });
}

fn measure_small(c: &mut Criterion) {
    benchmark_measure(c, "measure_10x5", 10, 5);
}

fn measure_large(c: &mut Criterion) {
    benchmark_measure(c, "measure_60x10", 60, 10);
}

fn arrange_small(c: &mut Criterion) {
    benchmark_arrange(c, "arrange_10x5", 10, 5);
}

fn arrange_large(c: &mut Criterion) {
    benchmark_arrange(c, "arrange_60x10", 60, 10);
}

criterion_group!(benches, measure_small, measure_large, arrange_small, arrange_large);
criterion_main!(benches);
