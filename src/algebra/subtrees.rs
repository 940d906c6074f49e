//! Zero-copy decomposition of a tree into the subtrees of its root

use super::color::{Color, Level};
use super::tree::{RootedTree, Tree, TreeView};
use std::iter::FusedIterator;

/// End of the subtree rooted at `start`: the next index at or above its level
pub(crate) fn subtree_end(levels: &[Level], start: usize) -> usize {
    let level = levels[start];
    levels[start + 1..]
        .iter()
        .position(|&l| l <= level)
        .map_or(levels.len(), |offset| start + 1 + offset)
}

/// Iterator over the immediate child subtrees of a root, in pre-order.
///
/// Yields views into the parent's storage. Children of a canonical tree are
/// canonical. Clone the iterator, or call `subtrees()` again, to restart.
#[derive(Clone, Debug)]
pub struct Subtrees<'a, C: Color = ()> {
    levels: &'a [Level],
    colors: &'a [C],
    canonical: bool,
    position: usize,
}

impl<'a, C: Color> Subtrees<'a, C> {
    pub(crate) fn new(tree: TreeView<'a, C>) -> Self {
        Subtrees {
            levels: tree.levels(),
            colors: tree.colors(),
            canonical: tree.is_canonical(),
            position: 1,
        }
    }
}

impl<'a, C: Color> Iterator for Subtrees<'a, C> {
    type Item = TreeView<'a, C>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.levels.len() {
            return None;
        }
        let start = self.position;
        let end = subtree_end(self.levels, start);
        self.position = end;
        Some(TreeView::from_parts(
            &self.levels[start..end],
            &self.colors[start..end],
            self.canonical,
        ))
    }
}

impl<C: Color> FusedIterator for Subtrees<'_, C> {}

/// Owned copies of the immediate child subtrees
pub fn subtrees<T: RootedTree + ?Sized>(tree: &T) -> Vec<Tree<T::Color>> {
    tree.subtrees().map(|subtree| subtree.to_tree()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{make_colored_tree, make_tree};

    #[test]
    fn test_subtree_end() {
        let levels = [1, 2, 3, 3, 2, 3];
        assert_eq!(subtree_end(&levels, 0), 6);
        assert_eq!(subtree_end(&levels, 1), 4);
        assert_eq!(subtree_end(&levels, 2), 3);
        assert_eq!(subtree_end(&levels, 4), 6);
    }

    #[test]
    fn test_views_and_restart() {
        let tree = make_tree(vec![1, 2, 3, 3, 2, 3, 2]).unwrap();
        let iter = tree.subtrees();
        let levels: Vec<Vec<Level>> = iter.clone().map(|s| s.levels().to_vec()).collect();
        assert_eq!(levels, vec![vec![2, 3, 3], vec![2, 3], vec![2]]);
        assert_eq!(iter.count(), 3);
        assert_eq!(tree.subtrees().count(), 3);
        assert!(tree.subtrees().all(|s| s.is_canonical()));
    }

    #[test]
    fn test_leaf_and_empty() {
        assert_eq!(make_tree(vec![1]).unwrap().subtrees().next(), None);
        assert_eq!(Tree::<()>::empty().subtrees().next(), None);
    }

    #[test]
    fn test_owned_subtrees_carry_colors() {
        let tree = make_colored_tree(vec![1, 2, 3, 2], vec![1u8, 2, 3, 4]).unwrap();
        let owned = subtrees(&tree);
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[0].levels(), &[2, 3]);
        assert_eq!(owned[0].colors(), &[2, 3]);
        assert_eq!(owned[1], make_colored_tree(vec![1], vec![4u8]).unwrap());
    }
}
