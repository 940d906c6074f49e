//! Forest: an unordered collection of rooted trees

use super::color::Color;
use super::tree::{RootedTree, Tree};
use std::fmt;
use std::hash::Hash;

/// An unordered collection of trees, stored as a sorted vector.
///
/// Sorting makes equality a multiset comparison and keeps output deterministic.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Forest<C: Color = ()> {
    trees: Vec<Tree<C>>,
}

impl<C: Color> Forest<C> {
    /// Create an empty forest
    pub fn empty() -> Self {
        Forest { trees: Vec::new() }
    }

    /// Create a forest from a vector of trees
    pub fn from(mut trees: Vec<Tree<C>>) -> Self {
        trees.sort();
        Forest { trees }
    }

    /// Create a forest with a single tree
    pub fn single(tree: Tree<C>) -> Self {
        Forest { trees: vec![tree] }
    }

    /// Check if forest is empty
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Get the number of trees
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Get the trees
    pub fn trees(&self) -> &[Tree<C>] {
        &self.trees
    }

    /// Get the total number of vertices across all trees
    pub fn order(&self) -> usize {
        self.trees.iter().map(|t| t.order()).sum()
    }

    /// Create iterator over trees
    pub fn iter(&self) -> std::slice::Iter<'_, Tree<C>> {
        self.trees.iter()
    }
}

impl<C: Color> fmt::Debug for Forest<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.trees.is_empty() {
            write!(f, "∅")
        } else {
            write!(f, "Forest[")?;
            for (i, tree) in self.trees.iter().enumerate() {
                if i > 0 {
                    write!(f, " × ")?;
                }
                write!(f, "{}", tree)?;
            }
            write!(f, "]")
        }
    }
}

impl<C: Color> Default for Forest<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C: Color> From<Tree<C>> for Forest<C> {
    fn from(tree: Tree<C>) -> Self {
        Forest::single(tree)
    }
}

impl<C: Color> FromIterator<Tree<C>> for Forest<C> {
    fn from_iter<I: IntoIterator<Item = Tree<C>>>(iter: I) -> Self {
        let trees: Vec<Tree<C>> = iter.into_iter().collect();
        Forest::from(trees)
    }
}

impl<C: Color> IntoIterator for Forest<C> {
    type Item = Tree<C>;
    type IntoIter = std::vec::IntoIter<Tree<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.into_iter()
    }
}

impl<'a, C: Color> IntoIterator for &'a Forest<C> {
    type Item = &'a Tree<C>;
    type IntoIter = std::slice::Iter<'a, Tree<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::make_tree;

    #[test]
    fn test_empty_forest() {
        let f: Forest = Forest::empty();
        assert!(f.is_empty());
        assert_eq!(f.len(), 0);
        assert_eq!(format!("{:?}", f), "∅");
    }

    #[test]
    fn test_order_and_collection() {
        let f: Forest = vec![make_tree(vec![1, 2]).unwrap(), make_tree(vec![1]).unwrap()]
            .into_iter()
            .collect();
        assert_eq!(f.len(), 2);
        assert_eq!(f.order(), 3);
        assert_eq!(f.trees()[0].levels(), &[1]);
        let single: Forest = make_tree(vec![1]).unwrap().into();
        assert_eq!(single, Forest::single(make_tree(vec![1]).unwrap()));
    }

    #[test]
    fn test_multiset_equality() {
        let a: Forest = vec![make_tree(vec![1, 2]).unwrap(), make_tree(vec![3]).unwrap()]
            .into_iter()
            .collect();
        let b = Forest::from(vec![make_tree(vec![1]).unwrap(), make_tree(vec![5, 6]).unwrap()]);
        assert_eq!(a, b);
        assert_eq!(format!("{:?}", a), "Forest[[3] × [1, 2]]");
    }
}
