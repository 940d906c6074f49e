//! Random trees for tests and benchmarks

use crate::algebra::{levels_from_children, Color, Tree};
use rand::Rng;

fn random_children<R: Rng + ?Sized>(order: usize, rng: &mut R) -> Vec<Vec<usize>> {
    let mut children = vec![Vec::new(); order];

    // Build tree by adding nodes one by one
    for node in 1..order {
        // Choose random parent from existing nodes
        let parent = rng.gen_range(0..node);
        children[parent].push(node);
    }
    children
}

fn build<C: Color>(children: &[Vec<usize>], colors: &[C]) -> Tree<C> {
    let (levels, colors) = levels_from_children(children, colors);
    let mut tree = Tree::from_raw(levels, colors, false);
    tree.canonicalize();
    tree
}

/// Generate a random canonical tree of given order.
///
/// Every vertex after the root attaches to a uniformly chosen earlier vertex.
/// Order 0 gives the empty tree.
pub fn random_tree<R: Rng + ?Sized>(order: usize, rng: &mut R) -> Tree {
    let children = random_children(order, rng);
    build(&children, &vec![(); order])
}

/// Generate a random canonical tree with a random boolean color per vertex
pub fn random_bicolored_tree<R: Rng + ?Sized>(order: usize, rng: &mut R) -> Tree<bool> {
    let children = random_children(order, rng);
    let colors: Vec<bool> = (0..order).map(|_| rng.gen()).collect();
    build(&children, &colors)
}
