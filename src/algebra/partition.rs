//! Edge partitions of a rooted tree
//!
//! An edge selector holds one entry per non-root vertex: entry `i` describes
//! the edge from vertex `i + 1` to its parent, `true` keeps it and `false`
//! cuts it. Cutting yields the partition forest. Contracting every kept edge
//! yields the partition skeleton, which has one vertex per forest component.

use super::canonical::canonicalize_parts;
use super::color::{Color, Level};
use super::forest::Forest;
use super::subtrees::subtree_end;
use super::tree::{RootedTree, Tree, TreeView};
use crate::config::Config;
use crate::workspace::{BufferSlot, Scratch};
use crate::{Result, TreeError};
use log::debug;
use rayon::prelude::*;
use std::iter::FusedIterator;

/// Working buffers for one partition at a time
#[derive(Clone, Debug)]
pub(crate) struct PartitionBuffers<C> {
    forest: Scratch<C>,
    edges: Vec<bool>,
    skeleton: Scratch<C>,
    scratch: Scratch<C>,
}

impl<C: Color> PartitionBuffers<C> {
    pub(crate) fn with_len(len: usize) -> Self {
        PartitionBuffers {
            forest: Scratch::with_len(len),
            edges: vec![false; len],
            skeleton: Scratch::with_len(len),
            scratch: Scratch::with_len(len),
        }
    }

    /// Partition `tree` by the selector `kept(edge)`, reusing these buffers
    fn load<'a>(&'a mut self, tree: TreeView<'_, C>, kept: impl Fn(usize) -> bool) -> Partition<'a, C> {
        let n = tree.len();
        let n_edges = n.saturating_sub(1);

        self.forest.load(tree.levels(), tree.colors());
        self.skeleton.load(tree.levels(), tree.colors());
        self.scratch.ensure_len(n);
        if self.edges.len() < n_edges {
            self.edges.resize(n_edges, false);
        }
        for (edge, keep) in self.edges[..n_edges].iter_mut().enumerate() {
            *keep = kept(edge);
        }

        let skeleton_len = contract_kept_edges(
            &mut self.skeleton.levels[..n],
            &mut self.skeleton.colors[..n],
            &self.edges[..n_edges],
        );
        canonicalize_parts(
            &mut self.skeleton.levels[..skeleton_len],
            &mut self.skeleton.colors[..skeleton_len],
            &mut self.scratch,
        );

        Partition {
            forest: PartitionForest {
                levels: &mut self.forest.levels[..n],
                colors: &mut self.forest.colors[..n],
                edges: &mut self.edges[..n_edges],
                scratch: &mut self.scratch,
            },
            skeleton: TreeView::from_parts(
                &self.skeleton.levels[..skeleton_len],
                &self.skeleton.colors[..skeleton_len],
                true,
            ),
        }
    }
}

/// Contract kept edges from the last one backwards; returns the new length.
///
/// The child of a contracted edge is deleted and its descendants move up one
/// level into its parent. Edges before it keep their indices.
fn contract_kept_edges<C: Color>(levels: &mut [Level], colors: &mut [C], kept: &[bool]) -> usize {
    let mut len = levels.len();
    let mut search_end = kept.len();

    while let Some(edge) = kept[..search_end].iter().rposition(|&keep| keep) {
        let child = edge + 1;
        let end = subtree_end(&levels[..len], child);
        for level in &mut levels[child + 1..end] {
            *level -= 1;
        }
        levels.copy_within(child + 1..len, child);
        colors.copy_within(child + 1..len, child);
        len -= 1;
        search_end = edge;
    }
    len
}

/// One partition: a lazy forest of components and the skeleton
pub struct Partition<'a, C: Color = ()> {
    /// Components cut apart by the selector, the root's component last
    pub forest: PartitionForest<'a, C>,
    /// Canonical tree obtained by contracting every kept edge
    pub skeleton: TreeView<'a, C>,
}

/// Lazy iterator over the components of a partition.
///
/// Each step moves the subtree below the last cut edge to the back of the
/// buffer, canonicalizes it there and yields a view of it. No allocation.
pub struct PartitionForest<'a, C: Color = ()> {
    levels: &'a mut [Level],
    colors: &'a mut [C],
    edges: &'a mut [bool],
    scratch: &'a mut Scratch<C>,
}

impl<'a, C: Color> Iterator for PartitionForest<'a, C> {
    type Item = TreeView<'a, C>;

    fn next(&mut self) -> Option<TreeView<'a, C>> {
        let len = self.levels.len();
        if len == 0 {
            return None;
        }

        let start = match self.edges.iter().rposition(|&keep| !keep) {
            Some(edge) => {
                let child = edge + 1;
                let block = subtree_end(self.levels, child) - child;
                self.levels[child..].rotate_left(block);
                self.colors[child..].rotate_left(block);
                self.edges[edge..].rotate_left(block);
                len - block
            }
            None => 0,
        };

        let (rest, component) = std::mem::take(&mut self.levels).split_at_mut(start);
        let (rest_colors, component_colors) = std::mem::take(&mut self.colors).split_at_mut(start);
        let edges = std::mem::take(&mut self.edges);
        self.edges = &mut edges[..start.saturating_sub(1)];
        self.levels = rest;
        self.colors = rest_colors;

        canonicalize_parts(component, component_colors, self.scratch);
        Some(TreeView::from_parts(component, component_colors, true))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.levels.is_empty() {
            0
        } else {
            1 + self.edges.iter().filter(|&&keep| !keep).count()
        };
        (remaining, Some(remaining))
    }
}

impl<C: Color> ExactSizeIterator for PartitionForest<'_, C> {}

impl<C: Color> FusedIterator for PartitionForest<'_, C> {}

/// Number of edge selectors, `2^(order - 1)`, and zero for the empty tree
fn selector_count(order: usize) -> Result<usize> {
    if order == 0 {
        return Ok(0);
    }
    let max = usize::BITS as usize;
    if order > max {
        return Err(TreeError::TooLarge { order, max });
    }
    Ok(1 << (order - 1))
}

fn check_edges(order: usize, edges: &[bool]) -> Result<()> {
    let expected = order.saturating_sub(1);
    if edges.len() != expected {
        return Err(TreeError::EdgeSelectorLength {
            expected,
            found: edges.len(),
        });
    }
    Ok(())
}

/// Restartable enumeration of all `2^(order - 1)` edge partitions.
///
/// Selectors are visited in binary counting order, bit `i` of the counter
/// keeping edge `i`. [`PartitionIterator::next_partition`] lends the result;
/// it is valid until the next call.
pub struct PartitionIterator<'a, C: Color = ()> {
    tree: TreeView<'a, C>,
    buffers: BufferSlot<'a, PartitionBuffers<C>>,
    selector: usize,
    n_selectors: usize,
}

impl<'a, C: Color> PartitionIterator<'a, C> {
    /// Create an iterator with buffers allocated once for this tree
    pub fn new<T: RootedTree<Color = C> + ?Sized>(tree: &'a T) -> Result<Self> {
        let view = tree.view();
        Self::with_buffers(view, BufferSlot::Owned(PartitionBuffers::with_len(view.len())))
    }

    pub(crate) fn with_buffers(
        tree: TreeView<'a, C>,
        buffers: BufferSlot<'a, PartitionBuffers<C>>,
    ) -> Result<Self> {
        let n_selectors = selector_count(tree.len())?;
        Ok(PartitionIterator {
            tree,
            buffers,
            selector: 0,
            n_selectors,
        })
    }

    /// Total number of partitions
    pub fn len(&self) -> usize {
        self.n_selectors
    }

    /// Check if there is nothing to enumerate (the empty tree)
    pub fn is_empty(&self) -> bool {
        self.n_selectors == 0
    }

    /// Start again from the first selector
    pub fn reset(&mut self) {
        self.selector = 0;
    }

    /// Advance to the next partition and borrow it
    pub fn next_partition(&mut self) -> Option<Partition<'_, C>> {
        if self.selector >= self.n_selectors {
            return None;
        }
        let selector = self.selector;
        self.selector += 1;
        Some(self.buffers.load(self.tree, |edge| (selector >> edge) & 1 == 1))
    }
}

fn into_owned<C: Color>(partition: Partition<'_, C>) -> (Forest<C>, Tree<C>) {
    let skeleton = partition.skeleton.to_tree();
    let forest = partition.forest.map(|component| component.to_tree()).collect();
    (forest, skeleton)
}

/// Components left after cutting every edge marked `false`
pub fn partition_forest<T: RootedTree + ?Sized>(tree: &T, edges: &[bool]) -> Result<Forest<T::Color>> {
    let view = tree.view();
    check_edges(view.len(), edges)?;
    let mut buffers = PartitionBuffers::with_len(view.len());
    let partition = buffers.load(view, |edge| edges[edge]);
    Ok(partition.forest.map(|component| component.to_tree()).collect())
}

/// Tree obtained by contracting every edge marked `true`
pub fn partition_skeleton<T: RootedTree + ?Sized>(tree: &T, edges: &[bool]) -> Result<Tree<T::Color>> {
    let view = tree.view();
    check_edges(view.len(), edges)?;
    let mut buffers = PartitionBuffers::with_len(view.len());
    let partition = buffers.load(view, |edge| edges[edge]);
    Ok(partition.skeleton.to_tree())
}

/// All partition forests and skeletons, in selector order
#[allow(clippy::type_complexity)]
pub fn all_partitions<T: RootedTree + ?Sized>(
    tree: &T,
) -> Result<(Vec<Forest<T::Color>>, Vec<Tree<T::Color>>)> {
    all_partitions_with(tree, &Config::default())
}

/// [`all_partitions`] with an explicit parallel threshold
#[allow(clippy::type_complexity)]
pub fn all_partitions_with<T: RootedTree + ?Sized>(
    tree: &T,
    config: &Config,
) -> Result<(Vec<Forest<T::Color>>, Vec<Tree<T::Color>>)> {
    config.validate()?;
    let view = tree.view();
    let n = view.len();
    let n_selectors = selector_count(n)?;
    debug!("enumerating {} partitions of a tree of order {}", n_selectors, n);

    // For large trees, parallelize the search
    if n.saturating_sub(1) > config.parallel_threshold {
        return Ok((0..n_selectors)
            .into_par_iter()
            .map_init(
                || PartitionBuffers::with_len(n),
                |buffers, selector| {
                    into_owned(buffers.load(view, |edge| (selector >> edge) & 1 == 1))
                },
            )
            .unzip());
    }

    let mut forests = Vec::with_capacity(n_selectors);
    let mut skeletons = Vec::with_capacity(n_selectors);
    let mut partitions = PartitionIterator::new(&view)?;
    while let Some(partition) = partitions.next_partition() {
        let (forest, skeleton) = into_owned(partition);
        forests.push(forest);
        skeletons.push(skeleton);
    }
    Ok((forests, skeletons))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{make_colored_tree, make_tree, trees_of_order};

    fn forest_of(levels: Vec<Vec<Level>>) -> Forest {
        levels.into_iter().map(|l| make_tree(l).unwrap()).collect()
    }

    #[test]
    fn test_concrete_partition() {
        let t = make_tree(vec![1, 2, 3, 4, 3]).unwrap();
        let edges = [true, true, false, false];

        let forest = partition_forest(&t, &edges).unwrap();
        assert_eq!(forest, forest_of(vec![vec![1, 2, 3], vec![4], vec![3]]));

        let skeleton = partition_skeleton(&t, &edges).unwrap();
        assert_eq!(skeleton.levels(), &[1, 2, 2]);
        assert!(skeleton.is_canonical());
    }

    #[test]
    fn test_lazy_forest_yields_root_component_last() {
        let t = make_tree(vec![1, 2, 3, 4, 3]).unwrap();
        let mut buffers = PartitionBuffers::with_len(5);
        let edges = [true, true, false, false];
        let partition = buffers.load(t.view(), |edge| edges[edge]);

        assert_eq!(partition.forest.len(), 3);
        let components: Vec<Vec<Level>> = partition
            .forest
            .map(|component| component.levels().to_vec())
            .collect();
        assert_eq!(components, vec![vec![3], vec![4], vec![1, 2, 3]]);
    }

    #[test]
    fn test_edge_selector_length() {
        let t = make_tree(vec![1, 2, 2]).unwrap();
        assert_eq!(
            partition_forest(&t, &[true]),
            Err(TreeError::EdgeSelectorLength { expected: 2, found: 1 })
        );
        assert!(partition_skeleton(&t, &[true, false, true]).is_err());
    }

    #[test]
    fn test_extreme_selectors() {
        let t = make_tree(vec![1, 2, 3, 3, 2]).unwrap();

        let all_cut = [false; 4];
        assert_eq!(partition_forest(&t, &all_cut).unwrap(), forest_of(vec![vec![1]; 5]));
        assert_eq!(partition_skeleton(&t, &all_cut).unwrap(), t);

        let all_kept = [true; 4];
        assert_eq!(partition_forest(&t, &all_kept).unwrap(), Forest::single(t.clone()));
        assert_eq!(partition_skeleton(&t, &all_kept).unwrap().levels(), &[1]);
    }

    #[test]
    fn test_contraction_recanonicalizes() {
        // Contracting [1, 2, 3, 3, 2] at its first edge gives [1, 2, 2, 2]
        let t = make_tree(vec![1, 2, 3, 3, 2]).unwrap();
        let skeleton = partition_skeleton(&t, &[true, false, false, false]).unwrap();
        assert_eq!(skeleton.levels(), &[1, 2, 2, 2]);

        let t = make_tree(vec![1, 2, 3, 2, 3, 4]).unwrap();
        assert_eq!(t.levels(), &[1, 2, 3, 4, 2, 3]);
        let skeleton = partition_skeleton(&t, &[false, false, false, true, false]).unwrap();
        assert_eq!(skeleton.levels(), &[1, 2, 3, 4, 2]);
    }

    #[test]
    fn test_reconstruction_laws() {
        for n in 1..=6 {
            for t in trees_of_order(n).unwrap() {
                let (forests, skeletons) = all_partitions(&t).unwrap();
                assert_eq!(forests.len(), 1 << (n - 1));
                for (forest, skeleton) in forests.iter().zip(&skeletons) {
                    assert_eq!(forest.order(), n);
                    assert_eq!(skeleton.order(), forest.len());
                }
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let t = make_tree(vec![1, 2, 3, 4, 3, 2, 3, 3, 2, 2]).unwrap();
        let parallel = all_partitions_with(
            &t,
            &Config {
                parallel_threshold: 0,
                ..Config::default()
            },
        )
        .unwrap();
        let sequential = all_partitions_with(&t, &Config::sequential()).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_iterator_reset() {
        let t = make_tree(vec![1, 2, 3, 2]).unwrap();
        let mut partitions = PartitionIterator::new(&t).unwrap();
        assert_eq!(partitions.len(), 8);

        let mut first = Vec::new();
        while let Some(partition) = partitions.next_partition() {
            first.push(partition.skeleton.to_tree());
        }
        assert!(partitions.next_partition().is_none());

        partitions.reset();
        let mut second = Vec::new();
        while let Some(partition) = partitions.next_partition() {
            second.push(partition.skeleton.to_tree());
        }
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_tree() {
        let (forests, skeletons) = all_partitions(&Tree::<()>::empty()).unwrap();
        assert!(forests.is_empty());
        assert!(skeletons.is_empty());
        assert!(partition_forest(&Tree::<()>::empty(), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_colors_follow_vertices() {
        let t = make_colored_tree(vec![1, 2, 3], vec![0u8, 1, 2]).unwrap();
        let edges = [true, false];

        let forest = partition_forest(&t, &edges).unwrap();
        let expected: Forest<u8> = vec![
            make_colored_tree(vec![1], vec![2u8]).unwrap(),
            make_colored_tree(vec![1, 2], vec![0u8, 1]).unwrap(),
        ]
        .into_iter()
        .collect();
        assert_eq!(forest, expected);

        let skeleton = partition_skeleton(&t, &edges).unwrap();
        assert_eq!(skeleton.levels(), &[1, 2]);
        assert_eq!(skeleton.colors(), &[0, 2]);
    }
}
