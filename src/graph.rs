//! Conversion of trees to `petgraph` graphs

use crate::algebra::RootedTree;
use petgraph::algo::is_isomorphic_matching;
use petgraph::graph::{DiGraph, NodeIndex};

/// Build a directed graph with one node per vertex, weighted by its color.
///
/// Node `i` is vertex `i` in pre-order. Edges point from parent to child.
pub fn to_graph<T: RootedTree + ?Sized>(tree: &T) -> DiGraph<T::Color, ()> {
    let view = tree.view();
    let mut graph = DiGraph::with_capacity(view.len(), view.len().saturating_sub(1));
    for &color in view.colors() {
        graph.add_node(color);
    }
    for (child, parent) in view.parents().into_iter().enumerate() {
        if let Some(parent) = parent {
            graph.add_edge(NodeIndex::new(parent), NodeIndex::new(child), ());
        }
    }
    graph
}

/// Rooted, color-preserving isomorphism test on the graph form
pub fn is_isomorphic<A, B>(a: &A, b: &B) -> bool
where
    A: RootedTree + ?Sized,
    B: RootedTree<Color = A::Color> + ?Sized,
{
    is_isomorphic_matching(&to_graph(a), &to_graph(b), |x, y| x == y, |_, _| true)
}
