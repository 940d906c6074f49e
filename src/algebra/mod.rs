//! Rooted trees as level sequences and the operations on them

mod canonical;
mod color;
mod forest;
mod generator;
mod invariants;
mod partition;
mod splitting;
mod subtrees;
mod tree;

pub use canonical::{canonicalize, canonicalize_in};
pub use color::{Color, Level};
pub use forest::Forest;
pub use generator::{count_trees, trees_of_order, BicoloredGenerator, Generator};
pub use invariants::{factorial, MAX_EXACT_ORDER};
pub use partition::{
    all_partitions, all_partitions_with, partition_forest, partition_skeleton, Partition,
    PartitionForest, PartitionIterator,
};
pub use splitting::{all_splittings, split, SplittingIterator};
pub use subtrees::{subtrees, Subtrees};
pub use tree::{
    make_colored_tree, make_tree, BicoloredTree, ColoredTree, RootedTree, Tree, TreeBuilder,
    TreeView,
};

pub(crate) use partition::PartitionBuffers;
pub(crate) use splitting::SplittingBuffers;
pub(crate) use tree::levels_from_children;
