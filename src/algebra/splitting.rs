//! Node splittings of a rooted tree
//!
//! A node selector marks every vertex kept (`true`) or removed (`false`). It
//! is valid when the removed vertices form a union of complete subtrees. The
//! removed subtrees make up the forest, and the kept vertices form a
//! connected tree around the root: the ordered subtree.

use super::color::{Color, Level};
use super::forest::Forest;
use super::subtrees::subtree_end;
use super::tree::{RootedTree, Tree, TreeView};
use crate::workspace::{BufferSlot, Scratch};
use crate::{Result, TreeError};
use log::debug;

#[derive(Clone, Debug)]
pub(crate) struct SplittingBuffers<C> {
    nodes: Vec<bool>,
    scratch: Scratch<C>,
}

impl<C: Color> SplittingBuffers<C> {
    pub(crate) fn with_len(len: usize) -> Self {
        SplittingBuffers {
            nodes: vec![false; len],
            scratch: Scratch::with_len(len),
        }
    }

    fn load(&mut self, order: usize, kept: impl Fn(usize) -> bool) {
        if self.nodes.len() < order {
            self.nodes.resize(order, false);
        }
        for (node, keep) in self.nodes[..order].iter_mut().enumerate() {
            *keep = kept(node);
        }
    }

    /// Split along the loaded selector, which must be valid
    fn split(&mut self, tree: TreeView<'_, C>) -> (Forest<C>, Tree<C>) {
        let n = tree.len();
        let levels = tree.levels();
        let colors = tree.colors();
        let nodes = &self.nodes[..n];

        let mut removed = Vec::new();
        let mut kept_levels = Vec::with_capacity(n);
        let mut kept_colors = Vec::with_capacity(n);
        let mut i = 0;
        while i < n {
            if nodes[i] {
                kept_levels.push(levels[i]);
                kept_colors.push(colors[i]);
                i += 1;
            } else {
                let end = subtree_end(levels, i);
                removed.push(canonical_copy(&levels[i..end], &colors[i..end], &mut self.scratch));
                i = end;
            }
        }

        let mut subtree = Tree::from_raw(kept_levels, kept_colors, false);
        subtree.canonicalize_with(&mut self.scratch);
        (Forest::from(removed), subtree)
    }
}

fn canonical_copy<C: Color>(levels: &[Level], colors: &[C], scratch: &mut Scratch<C>) -> Tree<C> {
    let mut tree = Tree::from_raw(levels.to_vec(), colors.to_vec(), false);
    tree.canonicalize_with(scratch);
    tree
}

/// Check that every removed vertex has all of its descendants removed
fn is_valid(levels: &[Level], nodes: &[bool]) -> bool {
    let mut cut_level: Option<Level> = None;
    for (&level, &keep) in levels.iter().zip(nodes) {
        match cut_level {
            Some(cut) if level > cut => {
                if keep {
                    return false;
                }
            }
            _ => cut_level = (!keep).then_some(level),
        }
    }
    true
}

/// Number of node selectors, `2^order`
fn selector_count(order: usize) -> Result<usize> {
    let max = usize::BITS as usize - 1;
    if order > max {
        return Err(TreeError::TooLarge { order, max });
    }
    Ok(1 << order)
}

/// Lazy, restartable enumeration of all valid splittings.
///
/// Node selectors are visited in binary counting order, bit `i` keeping
/// vertex `i`. Invalid selectors are skipped without allocating. The first
/// item, from the all-removed selector, is the whole tree as a forest and an
/// empty ordered subtree.
pub struct SplittingIterator<'a, C: Color = ()> {
    tree: TreeView<'a, C>,
    buffers: BufferSlot<'a, SplittingBuffers<C>>,
    selector: usize,
    n_selectors: usize,
}

impl<'a, C: Color> SplittingIterator<'a, C> {
    /// Create an iterator with buffers allocated once for this tree
    pub fn new<T: RootedTree<Color = C> + ?Sized>(tree: &'a T) -> Result<Self> {
        let view = tree.view();
        Self::with_buffers(view, BufferSlot::Owned(SplittingBuffers::with_len(view.len())))
    }

    pub(crate) fn with_buffers(
        tree: TreeView<'a, C>,
        buffers: BufferSlot<'a, SplittingBuffers<C>>,
    ) -> Result<Self> {
        let n_selectors = selector_count(tree.len())?;
        Ok(SplittingIterator {
            tree,
            buffers,
            selector: 0,
            n_selectors,
        })
    }

    /// Start again from the first selector
    pub fn reset(&mut self) {
        self.selector = 0;
    }
}

impl<C: Color> Iterator for SplittingIterator<'_, C> {
    type Item = (Forest<C>, Tree<C>);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.tree.len();
        while self.selector < self.n_selectors {
            let selector = self.selector;
            self.selector += 1;
            self.buffers.load(n, |node| (selector >> node) & 1 == 1);
            if is_valid(self.tree.levels(), &self.buffers.nodes[..n]) {
                return Some(self.buffers.split(self.tree));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.n_selectors - self.selector))
    }
}

impl<C: Color> std::iter::FusedIterator for SplittingIterator<'_, C> {}

/// Split `tree` along one node selector; `None` if the selector is invalid
pub fn split<T: RootedTree + ?Sized>(tree: &T, nodes: &[bool]) -> Result<Option<(Forest<T::Color>, Tree<T::Color>)>> {
    let view = tree.view();
    if nodes.len() != view.len() {
        return Err(TreeError::NodeSelectorLength {
            expected: view.len(),
            found: nodes.len(),
        });
    }
    if !is_valid(view.levels(), nodes) {
        return Ok(None);
    }
    let mut buffers = SplittingBuffers::with_len(view.len());
    buffers.load(view.len(), |node| nodes[node]);
    Ok(Some(buffers.split(view)))
}

/// All valid splittings as parallel vectors of forests and ordered subtrees
#[allow(clippy::type_complexity)]
pub fn all_splittings<T: RootedTree + ?Sized>(
    tree: &T,
) -> Result<(Vec<Forest<T::Color>>, Vec<Tree<T::Color>>)> {
    let view = tree.view();
    let splittings = SplittingIterator::new(&view)?;
    let (forests, subtrees): (Vec<_>, Vec<_>) = splittings.unzip();
    debug!(
        "found {} splittings of a tree of order {}",
        forests.len(),
        view.len()
    );
    Ok((forests, subtrees))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{make_colored_tree, make_tree, trees_of_order};

    #[test]
    fn test_validity() {
        let levels = [1, 2, 3, 2];
        assert!(is_valid(&levels, &[true, true, true, true]));
        assert!(is_valid(&levels, &[true, false, false, true]));
        assert!(is_valid(&levels, &[true, true, false, false]));
        assert!(is_valid(&levels, &[false, false, false, false]));
        assert!(!is_valid(&levels, &[true, false, true, true]));
        assert!(!is_valid(&levels, &[false, true, true, true]));
    }

    #[test]
    fn test_edge() {
        let t = make_tree(vec![1, 2]).unwrap();
        let (forests, subtrees) = all_splittings(&t).unwrap();
        assert_eq!(forests.len(), 3);

        assert_eq!(forests[0], Forest::single(t.clone()));
        assert!(subtrees[0].is_empty());

        assert_eq!(forests[1], Forest::single(make_tree(vec![1]).unwrap()));
        assert_eq!(subtrees[1].levels(), &[1]);

        assert!(forests[2].is_empty());
        assert_eq!(subtrees[2], t);
    }

    #[test]
    fn test_counts() {
        // Rooted subtrees containing the root, plus the empty one
        assert_eq!(all_splittings(&make_tree(vec![1, 2, 2]).unwrap()).unwrap().0.len(), 5);
        assert_eq!(all_splittings(&make_tree(vec![1, 2, 3]).unwrap()).unwrap().0.len(), 4);
        assert_eq!(all_splittings(&make_tree(vec![1, 2, 2, 2]).unwrap()).unwrap().0.len(), 9);
    }

    #[test]
    fn test_single_split() {
        let t = make_tree(vec![1, 2, 3, 3, 2]).unwrap();
        let (forest, subtree) = split(&t, &[true, true, false, true, false]).unwrap().unwrap();
        assert_eq!(forest, Forest::from(vec![make_tree(vec![1]).unwrap(), make_tree(vec![1]).unwrap()]));
        assert_eq!(subtree.levels(), &[1, 2, 3]);

        assert_eq!(split(&t, &[true, false, true, true, true]).unwrap(), None);
        assert_eq!(
            split(&t, &[true]),
            Err(TreeError::NodeSelectorLength { expected: 5, found: 1 })
        );
    }

    #[test]
    fn test_order_is_conserved() {
        for n in 1..=6 {
            for t in trees_of_order(n).unwrap() {
                for (forest, subtree) in SplittingIterator::new(&t).unwrap() {
                    assert_eq!(forest.order() + subtree.order(), n);
                    assert!(subtree.is_canonical());
                }
            }
        }
    }

    #[test]
    fn test_reset_and_empty_tree() {
        let t = make_tree(vec![1, 2, 3, 2]).unwrap();
        let mut splittings = SplittingIterator::new(&t).unwrap();
        let first: Vec<_> = splittings.by_ref().collect();
        assert!(splittings.next().is_none());
        splittings.reset();
        assert_eq!(first, splittings.collect::<Vec<_>>());

        let (forests, subtrees) = all_splittings(&Tree::<()>::empty()).unwrap();
        assert_eq!(forests, vec![Forest::empty()]);
        assert_eq!(subtrees, vec![Tree::empty()]);
    }

    #[test]
    fn test_colors_follow_vertices() {
        let t = make_colored_tree(vec![1, 2, 2], vec![0u8, 1, 2]).unwrap();
        let (forest, subtree) = split(&t, &[true, true, false]).unwrap().unwrap();
        assert_eq!(forest.trees()[0].colors(), &t.colors()[2..]);
        assert_eq!(subtree.colors(), &t.colors()[..2]);
    }
}
