//! Basic example of rooted tree operations

use rooted_trees::graph::to_graph;
use rooted_trees::parallel::par_map_trees;
use rooted_trees::prelude::*;
use std::time::Instant;

fn main() -> Result<()> {
    println!("=== Rooted Trees as Level Sequences ===\n");

    // Create some trees
    let leaf = make_tree(vec![1])?;
    let cherry = TreeBuilder::new().add_child(0, 1).add_child(0, 2).build()?;
    let tree = make_tree(vec![1, 2, 2, 3])?;

    println!("Leaf: {:?}", leaf);
    println!("Cherry: {:?}", cherry);
    println!("Canonical form of [1, 2, 2, 3]: {}", tree);

    // Invariants
    println!("\n--- Invariants ---");
    for t in [&leaf, &cherry, &tree] {
        println!(
            "  {}: order = {}, σ = {}, γ = {}, α = {}, β = {}, 1/γ = {}",
            t,
            t.order(),
            t.symmetry(),
            t.density(),
            t.alpha(),
            t.beta(),
            t.exact_weight()
        );
    }

    // Enumeration
    println!("\n--- Enumeration ---");
    for order in 1..=10 {
        let start = Instant::now();
        let count = count_trees(order)?;
        println!("  order {:2}: {:4} trees ({:?})", order, count, start.elapsed());
    }

    // Partitions
    println!("\n--- Partitions of {} ---", tree);
    let mut partitions = PartitionIterator::new(&tree)?;
    while let Some(partition) = partitions.next_partition() {
        let skeleton = partition.skeleton.to_tree();
        let forest: Forest = partition.forest.map(|component| component.to_tree()).collect();
        println!("  {:?} with skeleton {}", forest, skeleton);
    }

    // Splittings
    println!("\n--- Splittings of {} ---", tree);
    for (forest, subtree) in SplittingIterator::new(&tree)? {
        println!("  {:?} ⊗ {:?}", forest, subtree);
    }

    // Bicolored trees
    println!("\n--- Bicolored Trees ---");
    let bicolored = BicoloredGenerator::new(3)?.count();
    println!("  order 3: {} colored trees (shapes × colorings)", bicolored);

    // Parallel map with one arena per worker
    println!("\n--- Parallel Map ---");
    let start = Instant::now();
    let weights = par_map_trees(8, &Config::default(), |_, t| t.alpha())?;
    println!(
        "  Σ α over {} trees of order 8 = {} ({:?})",
        weights.len(),
        weights.iter().sum::<u128>(),
        start.elapsed()
    );

    // Graph conversion
    println!("\n--- Graph Conversion ---");
    let graph = to_graph(&tree);
    println!("  Nodes: {}", graph.node_count());
    println!("  Edges: {}", graph.edge_count());

    println!("\n=== Example Complete ===");
    Ok(())
}
