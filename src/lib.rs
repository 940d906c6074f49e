//! # Rooted Trees: level sequences for B-series
//!
//! This library represents rooted trees as integer level sequences (the depth
//! of every vertex in pre-order, root first), optionally paired with a color
//! per vertex. These trees index the terms of B-series expansions used to
//! analyse Runge-Kutta, additive Runge-Kutta and Rosenbrock methods.
//!
//! ## Features
//!
//! - **Canonical forms**: a unique representative per isomorphism class, up to
//!   a uniform shift of all levels
//! - **Enumeration**: the Beyer-Hedetniemi successor generator producing every
//!   tree of a fixed order in constant amortized time
//! - **Invariants**: order, symmetry, density and the derived labeling counts
//! - **Decompositions**: edge-subset partitions (forest and skeleton) and
//!   node-subset splittings (forest and ordered subtree)
//! - **Colored trees**: every operation is generic over the vertex color
//! - **Arenas**: explicit per-worker scratch buffers, no global state
//!
//! ```
//! use rooted_trees::prelude::*;
//!
//! let t = make_tree(vec![1, 2, 3, 2, 3]).unwrap();
//! assert_eq!(t.order(), 5);
//! assert_eq!(t.symmetry(), 2);
//! assert_eq!(t.density(), 20);
//! assert_eq!(count_trees(5).unwrap(), 9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Rooted trees, canonical forms, invariants and decompositions
pub mod algebra;

/// Process-wide tunables
pub mod config;

/// Per-worker scratch arenas
pub mod workspace;

/// Rayon drivers that give every worker its own arena
pub mod parallel;

/// Conversion to `petgraph` graphs
pub mod graph;

/// Random trees for tests and benchmarks
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use algebra::{
    all_partitions, all_splittings, canonicalize, canonicalize_in, count_trees, make_colored_tree,
    make_tree, partition_forest, partition_skeleton, split, subtrees, trees_of_order, BicoloredGenerator,
    BicoloredTree, Color, ColoredTree, Forest, Generator, Level, Partition, PartitionForest,
    PartitionIterator, RootedTree, SplittingIterator, Subtrees, Tree, TreeBuilder, TreeView,
};
pub use config::{Config, BUFFER_LENGTH};
pub use workspace::Workspace;

/// Error types for the library
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The level sequence does not encode a rooted tree
    #[error("invalid level sequence at index {index}: {reason}")]
    InvalidLevelSequence {
        /// Offending position
        index: usize,
        /// Violated rule
        reason: &'static str,
    },

    /// Level and color sequences differ in length
    #[error("level sequence has {levels} entries but color sequence has {colors}")]
    ColorLengthMismatch {
        /// Number of levels
        levels: usize,
        /// Number of colors
        colors: usize,
    },

    /// Edge selector does not have one entry per non-root vertex
    #[error("edge selector must have length {expected}, got {found}")]
    EdgeSelectorLength {
        /// `order - 1`
        expected: usize,
        /// Supplied length
        found: usize,
    },

    /// Node selector does not have one entry per vertex
    #[error("node selector must have length {expected}, got {found}")]
    NodeSelectorLength {
        /// `order`
        expected: usize,
        /// Supplied length
        found: usize,
    },

    /// Order-based operations need at least one vertex
    #[error("order must be positive, got {0}")]
    InvalidOrder(usize),

    /// Exhaustive enumeration would overflow the selector width
    #[error("tree of order {order} is too large, at most {max} is supported")]
    TooLarge {
        /// Requested order
        order: usize,
        /// Supported maximum
        max: usize,
    },

    /// Adjacency input does not form a rooted tree
    #[error("invalid tree: {0}")]
    InvalidTree(String),

    /// Configuration rejected by [`Config::validate`]
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, TreeError>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        algebra::{
            all_partitions, all_splittings, canonicalize, canonicalize_in, count_trees,
            make_colored_tree, make_tree, partition_forest, partition_skeleton, split, trees_of_order,
            BicoloredGenerator, BicoloredTree, ColoredTree, Forest, Generator, PartitionIterator,
            RootedTree, SplittingIterator, Tree, TreeBuilder, TreeView,
        },
        config::Config,
        workspace::Workspace,
        Result, TreeError,
    };
}
