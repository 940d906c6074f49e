//! Mapping over every tree of an order on the rayon pool.
//!
//! Each rayon worker builds one [`Workspace`] when it joins the job and
//! hands it to every call it runs, so arenas are never shared.

use crate::algebra::{Color, Generator, RootedTree, Tree, TreeView};
use crate::config::Config;
use crate::workspace::Workspace;
use crate::Result;
use log::debug;
use rayon::prelude::*;

/// Apply `f` to every canonical tree of `order`, in generator order
pub fn par_map_trees<R, F>(order: usize, config: &Config, f: F) -> Result<Vec<R>>
where
    R: Send,
    F: Fn(&mut Workspace, TreeView<'_>) -> R + Sync + Send,
{
    let trees: Vec<Tree> = Generator::new(order)?.collect();
    par_map(&trees, config, f)
}

/// Apply `f` to each tree of a slice, one arena per worker
pub fn par_map<C, R, F>(trees: &[Tree<C>], config: &Config, f: F) -> Result<Vec<R>>
where
    C: Color,
    R: Send,
    F: Fn(&mut Workspace<C>, TreeView<'_, C>) -> R + Sync + Send,
{
    config.validate()?;
    debug!(
        "mapping over {} trees with arenas of length {}",
        trees.len(),
        config.buffer_length
    );

    let buffer_length = config.buffer_length;
    Ok(trees
        .par_iter()
        .map_init(
            || Workspace::new(buffer_length),
            |workspace, tree| f(workspace, tree.view()),
        )
        .collect())
}
