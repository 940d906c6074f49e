//! Rooted trees stored as level sequences

use super::canonical::canonicalize_parts;
use super::color::{Color, Level};
use super::invariants;
use super::subtrees::Subtrees;
use crate::workspace::Scratch;
use crate::{Result, TreeError};
use num_rational::Ratio;
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Trees up to this order hash through a single packed `u64`
const PACKED_HASH_ORDER: usize = 16;

/// A rooted tree encoded as a level sequence
///
/// - `levels[0]` is the depth of the root, every later entry is the depth of
///   the next vertex in pre-order
/// - `colors[i]` labels vertex `i`; plain trees use `()` and store nothing
/// - Trees compare, hash and canonicalize up to a uniform shift of all levels
///
/// Checked constructors always return the canonical representative.
#[derive(Clone)]
pub struct Tree<C: Color = ()> {
    levels: Vec<Level>,
    colors: Vec<C>,
    canonical: bool,
}

/// A tree with one label per vertex
pub type ColoredTree<C = u8> = Tree<C>;

/// A tree with a boolean label per vertex, as used for additive schemes
pub type BicoloredTree = Tree<bool>;

/// A borrowed, non-owning view into the storage of a tree or a larger buffer
#[derive(Clone, Copy)]
pub struct TreeView<'a, C: Color = ()> {
    levels: &'a [Level],
    colors: &'a [C],
    canonical: bool,
}

/// Operations shared by owned trees and views
pub trait RootedTree {
    /// Vertex label type
    type Color: Color;

    /// Borrow the tree as a view
    fn view(&self) -> TreeView<'_, Self::Color>;

    /// Number of vertices
    fn order(&self) -> usize {
        self.view().len()
    }

    /// Immediate child subtrees of the root, in pre-order
    fn subtrees(&self) -> Subtrees<'_, Self::Color> {
        Subtrees::new(self.view())
    }

    /// Parent index of every vertex, `None` for the root
    fn parents(&self) -> Vec<Option<usize>> {
        parents_of(self.view().levels())
    }

    /// Symmetry coefficient σ, the size of the automorphism group
    fn symmetry(&self) -> u128 {
        invariants::symmetry(self.view())
    }

    /// Density γ, the product of all subtree orders
    fn density(&self) -> u128 {
        invariants::density(self.view())
    }

    /// Number of monotone labelings, `order! / (σ γ)`
    fn alpha(&self) -> u128 {
        invariants::alpha(self.view())
    }

    /// Number of labelings, `order! / σ`
    fn beta(&self) -> u128 {
        invariants::beta(self.view())
    }

    /// Elementary weight of the exact flow, `1 / γ`
    fn exact_weight(&self) -> Ratio<u128> {
        Ratio::new(1, self.density())
    }
}

impl Tree {
    /// Create a plain tree from a level sequence, validated and canonicalized
    pub fn new(levels: Vec<Level>) -> Result<Self> {
        let n = levels.len();
        Self::with_colors(levels, vec![(); n])
    }

    /// Create a plain tree without validating the level sequence.
    ///
    /// The result is canonicalized. On a malformed sequence the outcome is
    /// unspecified.
    pub fn new_unchecked(levels: Vec<Level>) -> Self {
        let n = levels.len();
        let mut tree = Self::from_raw(levels, vec![(); n], false);
        tree.canonicalize();
        tree
    }
}

impl<C: Color> Tree<C> {
    /// Create a colored tree, validated and canonicalized
    pub fn with_colors(levels: Vec<Level>, colors: Vec<C>) -> Result<Self> {
        if levels.len() != colors.len() {
            return Err(TreeError::ColorLengthMismatch {
                levels: levels.len(),
                colors: colors.len(),
            });
        }
        validate_levels(&levels)?;

        let mut tree = Self::from_raw(levels, colors, false);
        tree.canonicalize();
        Ok(tree)
    }

    /// The empty tree, a valid sentinel with no vertices
    pub fn empty() -> Self {
        Self::from_raw(Vec::new(), Vec::new(), true)
    }

    pub(crate) fn from_raw(levels: Vec<Level>, colors: Vec<C>, canonical: bool) -> Self {
        debug_assert_eq!(levels.len(), colors.len());
        Tree {
            levels,
            colors,
            canonical,
        }
    }

    /// The level sequence
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// The color sequence
    pub fn colors(&self) -> &[C] {
        &self.colors
    }

    /// Whether the level sequence is known to be canonical
    pub fn is_canonical(&self) -> bool {
        self.canonical
    }

    /// Check if the tree has no vertices
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Bring the tree into canonical form, allocating scratch for this call
    pub fn canonicalize(&mut self) {
        if self.canonical {
            return;
        }
        let mut scratch = Scratch::with_len(self.levels.len());
        self.canonicalize_with(&mut scratch);
    }

    pub(crate) fn canonicalize_with(&mut self, scratch: &mut Scratch<C>) {
        if self.canonical {
            return;
        }
        canonicalize_parts(&mut self.levels, &mut self.colors, scratch);
        self.canonical = true;
    }

    /// The same tree with every level moved by `offset`
    pub fn shifted(&self, offset: Level) -> Self {
        Tree {
            levels: self.levels.iter().map(|&l| l + offset).collect(),
            colors: self.colors.clone(),
            canonical: self.canonical,
        }
    }

    /// Butcher product `self ∘ other`: graft `other` as a new child of the root.
    ///
    /// Grafting onto or from the empty tree returns the other operand.
    pub fn butcher_product(&self, other: &Self) -> Self {
        let (Some(&root), Some(&other_root)) = (self.levels.first(), other.levels.first()) else {
            return if self.is_empty() {
                other.clone()
            } else {
                self.clone()
            };
        };

        let offset = root + 1 - other_root;
        let mut levels = Vec::with_capacity(self.levels.len() + other.levels.len());
        levels.extend_from_slice(&self.levels);
        levels.extend(other.levels.iter().map(|&l| l + offset));

        let mut colors = Vec::with_capacity(levels.len());
        colors.extend_from_slice(&self.colors);
        colors.extend_from_slice(&other.colors);

        let mut tree = Self::from_raw(levels, colors, false);
        tree.canonicalize();
        tree
    }
}

impl<'a, C: Color> TreeView<'a, C> {
    pub(crate) fn from_parts(levels: &'a [Level], colors: &'a [C], canonical: bool) -> Self {
        debug_assert_eq!(levels.len(), colors.len());
        TreeView {
            levels,
            colors,
            canonical,
        }
    }

    /// The level sequence
    pub fn levels(&self) -> &'a [Level] {
        self.levels
    }

    /// The color sequence
    pub fn colors(&self) -> &'a [C] {
        self.colors
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if the view has no vertices
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Whether the viewed sequence is known to be canonical
    pub fn is_canonical(&self) -> bool {
        self.canonical
    }

    /// Copy the viewed sequences into an owned tree
    pub fn to_tree(&self) -> Tree<C> {
        Tree::from_raw(self.levels.to_vec(), self.colors.to_vec(), self.canonical)
    }
}

impl<C: Color> RootedTree for Tree<C> {
    type Color = C;

    fn view(&self) -> TreeView<'_, C> {
        TreeView::from_parts(&self.levels, &self.colors, self.canonical)
    }
}

impl<C: Color> RootedTree for TreeView<'_, C> {
    type Color = C;

    fn view(&self) -> TreeView<'_, C> {
        *self
    }
}

/// Create a canonical plain tree from a level sequence
pub fn make_tree(levels: Vec<Level>) -> Result<Tree> {
    Tree::new(levels)
}

/// Create a canonical colored tree from level and color sequences
pub fn make_colored_tree<C: Color>(levels: Vec<Level>, colors: Vec<C>) -> Result<Tree<C>> {
    Tree::with_colors(levels, colors)
}

/// Check that a level sequence is a pre-order walk of a rooted tree
pub(crate) fn validate_levels(levels: &[Level]) -> Result<()> {
    let Some(&root) = levels.first() else {
        return Ok(());
    };
    if root < 1 {
        return Err(TreeError::InvalidLevelSequence {
            index: 0,
            reason: "levels must be positive",
        });
    }

    for (index, pair) in levels.windows(2).enumerate() {
        let (previous, level) = (pair[0], pair[1]);
        if level <= root {
            return Err(TreeError::InvalidLevelSequence {
                index: index + 1,
                reason: "only the root may sit at the root level or above",
            });
        }
        if level > previous + 1 {
            return Err(TreeError::InvalidLevelSequence {
                index: index + 1,
                reason: "level increases by more than one",
            });
        }
    }
    Ok(())
}

/// Nearest preceding vertex one level up, for every vertex
pub(crate) fn parents_of(levels: &[Level]) -> Vec<Option<usize>> {
    let mut parents = Vec::with_capacity(levels.len());
    let mut path: Vec<usize> = Vec::new();

    for (i, &level) in levels.iter().enumerate() {
        while path.last().is_some_and(|&top| levels[top] >= level) {
            path.pop();
        }
        parents.push(path.last().copied());
        path.push(i);
    }
    parents
}

/// Lexicographic order on shift-normalized levels, shorter first on a tie
pub(crate) fn compare_levels(a: &[Level], b: &[Level]) -> Ordering {
    let (Some(&root_a), Some(&root_b)) = (a.first(), b.first()) else {
        return a.len().cmp(&b.len());
    };

    for (&x, &y) in a.iter().zip(b) {
        match (x - root_a).cmp(&(y - root_b)) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Tree order: levels first, colors positionally as a tie-break
pub(crate) fn compare_parts<C: Color>(
    levels_a: &[Level],
    colors_a: &[C],
    levels_b: &[Level],
    colors_b: &[C],
) -> Ordering {
    compare_levels(levels_a, levels_b).then_with(|| colors_a.cmp(colors_b))
}

pub(crate) fn equal_parts<C: Color>(
    levels_a: &[Level],
    colors_a: &[C],
    levels_b: &[Level],
    colors_b: &[C],
) -> bool {
    if levels_a.len() != levels_b.len() {
        return false;
    }
    let (Some(&root_a), Some(&root_b)) = (levels_a.first(), levels_b.first()) else {
        return true;
    };
    let shift = root_a - root_b;
    levels_a.iter().zip(levels_b).all(|(&x, &y)| x == y + shift) && colors_a == colors_b
}

/// Shift-invariant hash.
///
/// Between consecutive pre-order entries the level rises by at most one, so
/// the drop `previous + 1 - level` is non-negative and smaller than the order.
/// Small trees pack their drops four bits apiece into one word.
pub(crate) fn hash_parts<C: Color, H: Hasher>(levels: &[Level], colors: &[C], state: &mut H) {
    state.write_usize(levels.len());

    if let Some(&root) = levels.first() {
        if levels.len() <= PACKED_HASH_ORDER {
            let mut packed = 0u64;
            for pair in levels.windows(2) {
                let drop = (pair[0] + 1 - pair[1]) as u64 & 0xF;
                packed = (packed << 4) | drop;
            }
            state.write_u64(packed);
        } else {
            for &level in levels {
                state.write_i32(level - root);
            }
        }
    }

    if C::COLORED {
        colors.hash(state);
    }
}

impl<C: Color> PartialEq for Tree<C> {
    fn eq(&self, other: &Self) -> bool {
        equal_parts(&self.levels, &self.colors, &other.levels, &other.colors)
    }
}

impl<C: Color> Eq for Tree<C> {}

impl<C: Color> Ord for Tree<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_parts(&self.levels, &self.colors, &other.levels, &other.colors)
    }
}

impl<C: Color> PartialOrd for Tree<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Color> Hash for Tree<C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_parts(&self.levels, &self.colors, state);
    }
}

impl<C: Color> PartialEq for TreeView<'_, C> {
    fn eq(&self, other: &Self) -> bool {
        equal_parts(self.levels, self.colors, other.levels, other.colors)
    }
}

impl<C: Color> Eq for TreeView<'_, C> {}

impl<C: Color> Ord for TreeView<'_, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_parts(self.levels, self.colors, other.levels, other.colors)
    }
}

impl<C: Color> PartialOrd for TreeView<'_, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Color> Hash for TreeView<'_, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_parts(self.levels, self.colors, state);
    }
}

impl<'a, C: Color> PartialEq<TreeView<'a, C>> for Tree<C> {
    fn eq(&self, other: &TreeView<'a, C>) -> bool {
        equal_parts(&self.levels, &self.colors, other.levels, other.colors)
    }
}

impl<'a, C: Color> PartialEq<Tree<C>> for TreeView<'a, C> {
    fn eq(&self, other: &Tree<C>) -> bool {
        equal_parts(self.levels, self.colors, &other.levels, &other.colors)
    }
}

fn fmt_parts<C: Color>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    levels: &[Level],
    colors: &[C],
) -> fmt::Result {
    if C::COLORED {
        write!(f, "{name}({levels:?}, colors = {colors:?})")
    } else {
        write!(f, "{name}({levels:?})")
    }
}

impl<C: Color> fmt::Debug for Tree<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_parts(f, "Tree", &self.levels, &self.colors)
    }
}

impl<C: Color> fmt::Debug for TreeView<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_parts(f, "TreeView", self.levels, self.colors)
    }
}

impl<C: Color> fmt::Display for Tree<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.levels)?;
        if C::COLORED {
            write!(f, " {:?}", self.colors)?;
        }
        Ok(())
    }
}

impl<C: Color> Default for Tree<C> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Builder for constructing trees from parent/child edges
pub struct TreeBuilder<C: Color = ()> {
    children: Vec<Vec<usize>>,
    colors: Vec<C>,
}

impl TreeBuilder {
    /// Create a new builder starting with a root
    pub fn new() -> Self {
        Self::with_root_color(())
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Color> TreeBuilder<C> {
    /// Create a builder whose root carries `color`
    pub fn with_root_color(color: C) -> Self {
        TreeBuilder {
            children: vec![Vec::new()],
            colors: vec![color],
        }
    }

    fn grow(&mut self, node: usize) {
        if self.children.len() <= node {
            self.children.resize(node + 1, Vec::new());
            self.colors.resize(node + 1, C::default());
        }
    }

    /// Add a child to a parent node
    pub fn add_child(&mut self, parent: usize, child: usize) -> &mut Self {
        self.grow(parent.max(child));
        self.children[parent].push(child);
        self
    }

    /// Label a node
    pub fn set_color(&mut self, node: usize, color: C) -> &mut Self {
        self.grow(node);
        self.colors[node] = color;
        self
    }

    /// Build the canonical tree
    pub fn build(&self) -> Result<Tree<C>> {
        let n_nodes = self.children.len();
        let mut in_degree = vec![0usize; n_nodes];

        for (parent, child_list) in self.children.iter().enumerate() {
            for &child in child_list {
                if child == parent {
                    return Err(TreeError::InvalidTree("Self-loops not allowed".to_string()));
                }
                in_degree[child] += 1;
            }
        }
        if in_degree[0] != 0 {
            return Err(TreeError::InvalidTree("Root cannot have a parent".to_string()));
        }
        if let Some(node) = (1..n_nodes).find(|&node| in_degree[node] != 1) {
            return Err(TreeError::InvalidTree(format!(
                "Node {} has {} parents",
                node, in_degree[node]
            )));
        }

        // Check connectivity (BFS from root)
        let mut visited = vec![false; n_nodes];
        let mut queue = VecDeque::new();
        queue.push_back(0);
        visited[0] = true;

        while let Some(node) = queue.pop_front() {
            for &child in &self.children[node] {
                if !visited[child] {
                    visited[child] = true;
                    queue.push_back(child);
                }
            }
        }

        if visited.iter().any(|&v| !v) {
            return Err(TreeError::InvalidTree("Tree is not connected".to_string()));
        }

        let (levels, colors) = levels_from_children(&self.children, &self.colors);
        let mut tree = Tree::from_raw(levels, colors, false);
        tree.canonicalize();
        Ok(tree)
    }
}

/// Pre-order walk of an adjacency list rooted at node 0, root at level 1
pub(crate) fn levels_from_children<C: Color>(
    children: &[Vec<usize>],
    colors: &[C],
) -> (Vec<Level>, Vec<C>) {
    let mut levels = Vec::with_capacity(children.len());
    let mut ordered_colors = Vec::with_capacity(children.len());
    if children.is_empty() {
        return (levels, ordered_colors);
    }

    let mut stack: Vec<(usize, Level)> = vec![(0, 1)];
    while let Some((node, level)) = stack.pop() {
        levels.push(level);
        ordered_colors.push(colors[node]);
        for &child in children[node].iter().rev() {
            stack.push((child, level + 1));
        }
    }
    (levels, ordered_colors)
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{Color, Level, Tree};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct TreeRef<'a, C> {
        levels: &'a [Level],
        #[serde(skip_serializing_if = "Option::is_none")]
        colors: Option<&'a [C]>,
    }

    #[derive(Deserialize)]
    struct RawTree<C> {
        levels: Vec<Level>,
        #[serde(default)]
        colors: Option<Vec<C>>,
    }

    impl<C: Color + Serialize> Serialize for Tree<C> {
        fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            TreeRef {
                levels: &self.levels,
                colors: C::COLORED.then_some(self.colors.as_slice()),
            }
            .serialize(serializer)
        }
    }

    impl<'de, C: Color + Deserialize<'de>> Deserialize<'de> for Tree<C> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
            let raw = RawTree::<C>::deserialize(deserializer)?;
            let colors = match raw.colors {
                Some(colors) => colors,
                None if !C::COLORED => vec![C::default(); raw.levels.len()],
                None => return Err(D::Error::missing_field("colors")),
            };
            Tree::with_colors(raw.levels, colors).map_err(D::Error::custom)
        }
    }
}
