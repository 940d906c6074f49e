//! Per-vertex color labels

use std::fmt::Debug;
use std::hash::Hash;

/// Depth of a vertex in a level sequence
pub type Level = i32;

/// A per-vertex label carried alongside the level sequence.
///
/// Plain trees use `()`, which is zero-sized: a `Vec<()>` never allocates, so
/// the generic algorithms cost nothing extra for uncolored trees.
pub trait Color: Copy + Ord + Hash + Default + Debug + Send + Sync + 'static {
    /// Whether the label carries information
    const COLORED: bool;
}

impl Color for () {
    const COLORED: bool = false;
}

impl Color for bool {
    const COLORED: bool = true;
}

impl Color for u8 {
    const COLORED: bool = true;
}

impl Color for u16 {
    const COLORED: bool = true;
}

impl Color for u32 {
    const COLORED: bool = true;
}

/// Largest order for which every tree is already canonical.
///
/// With at most one subtree below the root there is nothing to reorder. A
/// colored tree of order 3 may still need its two leaves swapped.
pub(crate) const fn trivially_canonical_order<C: Color>() -> usize {
    if C::COLORED {
        2
    } else {
        3
    }
}
