//! Order, symmetry, density and labeling counts

use super::canonical::canonicalize;
use super::color::Color;
use super::subtrees::Subtrees;
use super::tree::{RootedTree, TreeView};

/// Largest order whose factorial fits in a `u128`
pub const MAX_EXACT_ORDER: usize = 34;

const FACTORIALS: [u128; MAX_EXACT_ORDER + 1] = {
    let mut table = [1u128; MAX_EXACT_ORDER + 1];
    let mut i = 1;
    while i <= MAX_EXACT_ORDER {
        table[i] = table[i - 1] * i as u128;
        i += 1;
    }
    table
};

/// `n!` for `n <= MAX_EXACT_ORDER`
///
/// # Panics
///
/// Panics if `n` exceeds [`MAX_EXACT_ORDER`].
pub fn factorial(n: usize) -> u128 {
    assert_exact(n);
    FACTORIALS[n]
}

fn assert_exact(order: usize) {
    assert!(
        order <= MAX_EXACT_ORDER,
        "order {} exceeds the exact integer range (max {})",
        order,
        MAX_EXACT_ORDER
    );
}

pub(crate) fn symmetry<C: Color>(tree: TreeView<'_, C>) -> u128 {
    assert_exact(tree.len());
    if tree.len() <= 2 {
        return 1;
    }
    if !tree.is_canonical() {
        let owned = canonicalize(&tree);
        return canonical_symmetry(owned.view());
    }
    canonical_symmetry(tree)
}

/// Product over runs of identical subtrees of `k! · σ^k`.
///
/// Canonical order places identical subtrees next to each other.
fn canonical_symmetry<C: Color>(tree: TreeView<'_, C>) -> u128 {
    if tree.len() <= 2 {
        return 1;
    }

    let mut result = 1u128;
    let mut children = Subtrees::new(tree).peekable();
    while let Some(first) = children.next() {
        let mut run = 1;
        while children.next_if(|other| *other == first).is_some() {
            run += 1;
        }
        result *= FACTORIALS[run] * canonical_symmetry(first).pow(run as u32);
    }
    result
}

pub(crate) fn density<C: Color>(tree: TreeView<'_, C>) -> u128 {
    assert_exact(tree.len());
    subtree_density(tree)
}

fn subtree_density<C: Color>(tree: TreeView<'_, C>) -> u128 {
    if tree.len() <= 1 {
        return 1;
    }
    Subtrees::new(tree).fold(tree.len() as u128, |product, child| {
        product * subtree_density(child)
    })
}

pub(crate) fn alpha<C: Color>(tree: TreeView<'_, C>) -> u128 {
    let denominator = symmetry(tree) * density(tree);
    let n_factorial = factorial(tree.len());
    debug_assert_eq!(n_factorial % denominator, 0);
    n_factorial / denominator
}

pub(crate) fn beta<C: Color>(tree: TreeView<'_, C>) -> u128 {
    let sigma = symmetry(tree);
    let n_factorial = factorial(tree.len());
    debug_assert_eq!(n_factorial % sigma, 0);
    n_factorial / sigma
}

#[cfg(test)]
mod tests {
    use crate::algebra::{
        canonicalize, make_colored_tree, make_tree, trees_of_order, BicoloredGenerator, RootedTree,
        Tree,
    };
    use std::collections::HashSet;
    use num_rational::Ratio;

    #[test]
    fn test_known_values() {
        let leaf = make_tree(vec![1]).unwrap();
        assert_eq!((leaf.order(), leaf.symmetry(), leaf.density()), (1, 1, 1));

        let cherry = make_tree(vec![1, 2, 2]).unwrap();
        assert_eq!((cherry.order(), cherry.symmetry(), cherry.density()), (3, 2, 3));

        let tree = make_tree(vec![1, 2, 3, 2, 3]).unwrap();
        assert_eq!((tree.order(), tree.symmetry(), tree.density()), (5, 2, 20));
    }

    #[test]
    fn test_star_and_path() {
        let star = make_tree(vec![1, 2, 2, 2, 2]).unwrap();
        assert_eq!(star.symmetry(), 24);
        assert_eq!(star.density(), 5);
        assert_eq!(star.alpha(), 1);

        let path = make_tree(vec![1, 2, 3, 4, 5]).unwrap();
        assert_eq!(path.symmetry(), 1);
        assert_eq!(path.density(), 120);
        assert_eq!(path.alpha(), 1);
        assert_eq!(path.beta(), 120);
    }

    #[test]
    fn test_nested_runs() {
        // Two copies of the cherry below the root: 2! · 2^2
        let tree = make_tree(vec![1, 2, 3, 3, 2, 3, 3]).unwrap();
        assert_eq!(tree.symmetry(), 8);
        assert_eq!(tree.density(), 7 * 3 * 3);
    }

    #[test]
    fn test_noncanonical_view() {
        let tree = Tree::from_raw(vec![1, 2, 2, 3, 2, 3], vec![(); 6], false);
        assert_eq!(tree.symmetry(), 2);
        assert_eq!(tree.density(), 6 * 2 * 2);
    }

    #[test]
    fn test_alpha_sums_to_labeled_trees() {
        // Monotone labelings of all trees of order n number (n-1)!
        for n in 1..=8 {
            let total: u128 = trees_of_order(n).unwrap().iter().map(|t| t.alpha()).sum();
            assert_eq!(total, super::factorial(n - 1));
        }
    }

    #[test]
    fn test_beta_sums_to_cayley() {
        // Labeled rooted trees on n vertices number n^(n-1)
        for n in 1..=7usize {
            let total: u128 = trees_of_order(n).unwrap().iter().map(|t| t.beta()).sum();
            assert_eq!(total, (n as u128).pow(n as u32 - 1));
        }
    }

    #[test]
    fn test_colored_symmetry() {
        let same = make_colored_tree(vec![1, 2, 2], vec![true, false, false]).unwrap();
        let mixed = make_colored_tree(vec![1, 2, 2], vec![true, false, true]).unwrap();
        assert_eq!(same.symmetry(), 2);
        assert_eq!(mixed.symmetry(), 1);
    }

    #[test]
    fn test_bicolored_beta_counts_colored_labelings() {
        // Labeled rooted trees with two colors per vertex number n^(n-1) · 2^n
        for n in 1..=6usize {
            let distinct: HashSet<Tree<bool>> = BicoloredGenerator::new(n)
                .unwrap()
                .map(|t| canonicalize(&t))
                .collect();
            let total: u128 = distinct.iter().map(|t| t.beta()).sum();
            assert_eq!(total, (n as u128).pow(n as u32 - 1) << n);
        }
    }

    #[test]
    fn test_colored_symmetry_of_nested_runs() {
        // Two equal colored cherries below the root
        let twins = make_colored_tree(vec![1, 2, 3, 3, 2, 3, 3], vec![0u8, 1, 2, 2, 1, 2, 2]).unwrap();
        assert_eq!(twins.symmetry(), 8);

        // Recoloring one cherry breaks the swap between them
        let split = make_colored_tree(vec![1, 2, 3, 3, 2, 3, 3], vec![0u8, 1, 2, 2, 3, 2, 2]).unwrap();
        assert_eq!(split.symmetry(), 4);

        // Distinct leaf colors inside each cherry leave only the swap of cherries
        let mixed = make_colored_tree(vec![1, 2, 3, 3, 2, 3, 3], vec![0u8, 1, 2, 4, 1, 2, 4]).unwrap();
        assert_eq!(mixed.symmetry(), 2);
    }

    #[test]
    fn test_exact_weight() {
        let tree = make_tree(vec![1, 2, 3, 2]).unwrap();
        assert_eq!(tree.exact_weight(), Ratio::new(1, 8));
    }

    #[test]
    #[should_panic(expected = "exceeds the exact integer range")]
    fn test_factorial_range() {
        super::factorial(super::MAX_EXACT_ORDER + 1);
    }
}
