//! Canonical level sequences
//!
//! A tree is canonical when the subtrees of every vertex appear in decreasing
//! order. Subtrees are canonicalized recursively and then sorted in place.
//! The sort is a bubble sort over variable-length blocks: two adjacent blocks
//! are exchanged by copying both through a scratch buffer. Blocks are few and
//! short for the tree sizes of interest, so this beats an allocating sort.

use super::color::{trivially_canonical_order, Color, Level};
use super::subtrees::subtree_end;
use super::tree::{compare_parts, RootedTree, Tree};
use crate::workspace::{Scratch, Workspace};
use std::cmp::Ordering;

/// Return the canonical representative of `tree` as a new owned tree
pub fn canonicalize<T: RootedTree + ?Sized>(tree: &T) -> Tree<T::Color> {
    let mut owned = tree.view().to_tree();
    owned.canonicalize();
    owned
}

/// Canonicalize `tree` in place, taking scratch from `workspace`
pub fn canonicalize_in<C: Color>(tree: &mut Tree<C>, workspace: &mut Workspace<C>) {
    if tree.is_canonical() {
        return;
    }
    let mut scratch = workspace.canonical_scratch(tree.order());
    tree.canonicalize_with(&mut scratch);
}

/// Canonicalize parallel level and color slices in place
pub(crate) fn canonicalize_parts<C: Color>(
    levels: &mut [Level],
    colors: &mut [C],
    scratch: &mut Scratch<C>,
) {
    debug_assert_eq!(levels.len(), colors.len());
    scratch.ensure_len(levels.len());
    canonicalize_range(levels, colors, scratch);
}

fn canonicalize_range<C: Color>(levels: &mut [Level], colors: &mut [C], scratch: &mut Scratch<C>) {
    let n = levels.len();
    if n <= trivially_canonical_order::<C>() {
        return;
    }

    let mut n_subtrees = 0;
    let mut start = 1;
    while start < n {
        let end = subtree_end(levels, start);
        canonicalize_range(&mut levels[start..end], &mut colors[start..end], scratch);
        n_subtrees += 1;
        start = end;
    }

    if n_subtrees > 1 {
        sort_subtrees(levels, colors, scratch);
    }
}

/// Bubble the root's subtree blocks into decreasing order
fn sort_subtrees<C: Color>(levels: &mut [Level], colors: &mut [C], scratch: &mut Scratch<C>) {
    // Blocks starting at or after `limit` are in their final place
    let mut limit = levels.len();

    loop {
        let mut last_swap = None;
        let mut left = 1;
        let mut mid = subtree_end(levels, left);

        while mid < limit {
            let end = subtree_end(levels, mid);
            let ordering = compare_parts(
                &levels[left..mid],
                &colors[left..mid],
                &levels[mid..end],
                &colors[mid..end],
            );

            if ordering == Ordering::Less {
                swap_blocks(levels, colors, left, mid, end, scratch);
                left += end - mid;
                last_swap = Some(left);
            } else {
                left = mid;
            }
            mid = end;
        }

        match last_swap {
            Some(position) => limit = position,
            None => break,
        }
    }
}

/// Exchange the adjacent blocks `left..mid` and `mid..end`
fn swap_blocks<C: Color>(
    levels: &mut [Level],
    colors: &mut [C],
    left: usize,
    mid: usize,
    end: usize,
    scratch: &mut Scratch<C>,
) {
    let right_len = end - mid;
    let total = end - left;

    let buffer = &mut scratch.levels[..total];
    buffer[..right_len].copy_from_slice(&levels[mid..end]);
    buffer[right_len..].copy_from_slice(&levels[left..mid]);
    levels[left..end].copy_from_slice(buffer);

    let buffer = &mut scratch.colors[..total];
    buffer[..right_len].copy_from_slice(&colors[mid..end]);
    buffer[right_len..].copy_from_slice(&colors[left..mid]);
    colors[left..end].copy_from_slice(buffer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{make_colored_tree, make_tree, Generator};

    fn raw(levels: Vec<Level>) -> Tree {
        let n = levels.len();
        Tree::from_raw(levels, vec![(); n], false)
    }

    #[test]
    fn test_small_trees_unchanged() {
        for levels in [vec![], vec![1], vec![1, 2], vec![1, 2, 2], vec![1, 2, 3]] {
            let tree = canonicalize(&raw(levels.clone()));
            assert_eq!(tree.levels(), levels.as_slice());
            assert!(tree.is_canonical());
        }
    }

    #[test]
    fn test_subtrees_sorted_decreasing() {
        let tree = canonicalize(&raw(vec![1, 2, 2, 3, 2, 3, 3]));
        assert_eq!(tree.levels(), &[1, 2, 3, 3, 2, 3, 2]);

        let nested = canonicalize(&raw(vec![1, 2, 3, 3, 4, 2]));
        assert_eq!(nested.levels(), &[1, 2, 3, 4, 3, 2]);
    }

    #[test]
    fn test_prefix_block_orders_first() {
        // [2, 3] is a prefix of [2, 3, 4] and therefore smaller
        let tree = canonicalize(&raw(vec![1, 2, 3, 2, 3, 4]));
        assert_eq!(tree.levels(), &[1, 2, 3, 4, 2, 3]);
    }

    #[test]
    fn test_independent_of_input_order() {
        let a = canonicalize(&raw(vec![1, 2, 3, 2, 2, 3, 4, 3]));
        let b = canonicalize(&raw(vec![1, 2, 2, 3, 3, 4, 2, 3]));
        let c = canonicalize(&raw(vec![1, 2, 3, 4, 3, 2, 3, 2]));
        assert_eq!(a.levels(), b.levels());
        assert_eq!(b.levels(), c.levels());
        assert_eq!(a.levels(), &[1, 2, 3, 4, 3, 2, 3, 2]);
    }

    #[test]
    fn test_idempotent_on_generated_trees() {
        let mut generator = Generator::new(7).unwrap();
        while let Some(tree) = generator.advance() {
            let again = canonicalize(&raw(tree.levels().to_vec()));
            assert_eq!(again.levels(), tree.levels());
        }
    }

    #[test]
    fn test_colors_travel_with_levels() {
        let tree = make_colored_tree(vec![1, 2, 2, 3], vec![0u8, 1, 2, 3]).unwrap();
        assert_eq!(tree.levels(), &[1, 2, 3, 2]);
        assert_eq!(tree.colors(), &[0, 2, 3, 1]);
    }

    #[test]
    fn test_colored_leaves_are_ordered() {
        let a = make_colored_tree(vec![1, 2, 2], vec![false, false, true]).unwrap();
        let b = make_colored_tree(vec![1, 2, 2], vec![false, true, false]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.colors(), &[false, true, false]);
    }

    #[test]
    fn test_shifted_root_level() {
        let tree = canonicalize(&raw(vec![4, 5, 5, 6]));
        assert_eq!(tree.levels(), &[4, 5, 6, 5]);
        assert_eq!(tree, make_tree(vec![1, 2, 3, 2]).unwrap());
    }
}
