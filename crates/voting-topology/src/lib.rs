//! Voting Network Topology
//!
//! The social network a voting cascade runs over: an undirected simple graph
//! on dense node ids `0..n`.
//!
//! # Model
//!
//! - Nodes are people, edges are acquaintance (symmetric).
//! - No self-loops, no multi-edges.
//! - Neighbor lookup borrows a sorted slice, so its cost is O(degree) and does
//!   not grow with the size of the network.
//!
//! # Generation
//!
//! [`Topology::erdos_renyi`] draws a G(n, p) graph: every unordered pair is
//! connected independently with probability `p`. Pass a seeded RNG to get the
//! same network back on every run.

mod error;
mod graph;
mod node;

pub use error::{Result, TopologyError};
pub use graph::Topology;
pub use node::NodeId;

/// Count the neighbors of `node` for which `predicate` holds.
pub fn count_neighbors<F>(topology: &Topology, node: NodeId, predicate: F) -> Result<usize>
where
    F: Fn(NodeId) -> bool,
{
    Ok(topology
        .neighbors(node)?
        .iter()
        .filter(|&&n| predicate(n))
        .count())
}
