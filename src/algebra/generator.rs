//! Enumeration of all rooted trees of a fixed order
//!
//! The Beyer-Hedetniemi successor rule walks the canonical level sequences of
//! a given order from the path `1, 2, ..., n` down to the star `1, 2, ..., 2`
//! in decreasing lexicographic order, mutating a single buffer in constant
//! amortized time per tree.

use super::color::Level;
use super::tree::{Tree, TreeView};
use crate::{Result, TreeError};
use log::debug;
use std::iter::FusedIterator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Fresh,
    Active,
    Exhausted,
}

/// Successor iterator over all canonical trees of one order.
///
/// [`Generator::advance`] lends a view into the internal buffer that is only
/// valid until the next call. The [`Iterator`] implementation copies each
/// tree instead.
#[derive(Clone, Debug)]
pub struct Generator {
    levels: Vec<Level>,
    units: Vec<()>,
    state: State,
}

impl Generator {
    /// Create a generator for trees with `order` vertices
    pub fn new(order: usize) -> Result<Self> {
        if order == 0 {
            return Err(TreeError::InvalidOrder(order));
        }
        Ok(Generator {
            levels: path(order),
            units: vec![(); order],
            state: State::Fresh,
        })
    }

    /// Number of vertices of every generated tree
    pub fn order(&self) -> usize {
        self.levels.len()
    }

    /// Restart from the path tree
    pub fn reset(&mut self) {
        self.levels = path(self.levels.len());
        self.state = State::Fresh;
    }

    /// Move to the next tree and borrow it
    pub fn advance(&mut self) -> Option<TreeView<'_>> {
        match self.state {
            State::Fresh => self.state = State::Active,
            State::Active => {
                if !self.successor() {
                    self.state = State::Exhausted;
                }
            }
            State::Exhausted => {}
        }
        if self.state == State::Exhausted {
            return None;
        }
        Some(self.current())
    }

    pub(crate) fn current(&self) -> TreeView<'_> {
        TreeView::from_parts(&self.levels, &self.units, true)
    }

    /// Overwrite the buffer with the next level sequence; false after the star
    fn successor(&mut self) -> bool {
        let root = self.levels[0];
        let Some(p) = self.levels.iter().rposition(|&l| l > root + 1) else {
            return false;
        };

        let target = self.levels[p] - 1;
        let Some(q) = self.levels[..p].iter().rposition(|&l| l == target) else {
            return false;
        };

        let period = p - q;
        for i in p..self.levels.len() {
            self.levels[i] = self.levels[i - period];
        }
        true
    }
}

impl Iterator for Generator {
    type Item = Tree;

    fn next(&mut self) -> Option<Tree> {
        self.advance().map(|tree| tree.to_tree())
    }
}

impl FusedIterator for Generator {}

fn path(order: usize) -> Vec<Level> {
    (1..=order as Level).collect()
}

/// Count the trees of a given order by running the generator to completion
pub fn count_trees(order: usize) -> Result<u64> {
    let mut generator = Generator::new(order)?;
    let mut count = 0u64;
    while generator.advance().is_some() {
        count += 1;
    }
    debug!("counted {} rooted trees of order {}", count, order);
    Ok(count)
}

/// All canonical trees of a given order, as owned copies
pub fn trees_of_order(order: usize) -> Result<Vec<Tree>> {
    Ok(Generator::new(order)?.collect())
}

/// Every tree shape combined with every boolean coloring.
///
/// This is a plain Cartesian product: colorings related by an automorphism
/// of the shape are emitted as separate trees, so order `n` yields
/// `count_trees(n) · 2^n` items. Emitted trees are not canonicalized.
#[derive(Clone, Debug)]
pub struct BicoloredGenerator {
    shapes: Generator,
    colors: Vec<bool>,
    coloring: usize,
    n_colorings: usize,
    has_shape: bool,
}

impl BicoloredGenerator {
    /// Create a generator for bicolored trees with `order` vertices
    pub fn new(order: usize) -> Result<Self> {
        let shapes = Generator::new(order)?;
        let max = usize::BITS as usize - 1;
        if order > max {
            return Err(TreeError::TooLarge { order, max });
        }
        Ok(BicoloredGenerator {
            shapes,
            colors: vec![false; order],
            coloring: 0,
            n_colorings: 1 << order,
            has_shape: false,
        })
    }

    /// Restart from the first shape and coloring
    pub fn reset(&mut self) {
        self.shapes.reset();
        self.coloring = 0;
        self.has_shape = false;
    }

    /// Move to the next colored tree and borrow it
    pub fn advance(&mut self) -> Option<TreeView<'_, bool>> {
        if !self.has_shape || self.coloring == self.n_colorings {
            if self.shapes.advance().is_none() {
                self.has_shape = false;
                return None;
            }
            self.has_shape = true;
            self.coloring = 0;
        }

        let coloring = self.coloring;
        self.coloring += 1;
        for (i, color) in self.colors.iter_mut().enumerate() {
            *color = (coloring >> i) & 1 == 1;
        }

        let shape = self.shapes.current();
        Some(TreeView::from_parts(shape.levels(), &self.colors, false))
    }
}

impl Iterator for BicoloredGenerator {
    type Item = Tree<bool>;

    fn next(&mut self) -> Option<Tree<bool>> {
        self.advance().map(|tree| tree.to_tree())
    }
}
