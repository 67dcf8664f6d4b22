//! Undirected adjacency-list graph.
//!
//! Every node keeps a sorted list of its neighbors. An edge `a - b` is stored
//! twice (in `a`'s list and in `b`'s list), which makes neighbor lookup a
//! slice borrow whose cost depends only on the node's degree.

use rand::Rng;

use crate::error::{Result, TopologyError};
use crate::NodeId;

/// An undirected simple graph over nodes `0..n`.
///
/// No self-loops, no multi-edges, adjacency always symmetric.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topology {
    adjacency: Vec<Vec<NodeId>>,
    edge_count: usize,
}

impl Topology {
    /// Create a graph with `node_count` isolated nodes.
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
            edge_count: 0,
        }
    }

    /// Generate a G(n, p) random graph.
    ///
    /// Pairs `{i, j}` with `i < j` are visited in lexicographic order and each
    /// is connected by an independent Bernoulli(`edge_prob`) draw.
    pub fn erdos_renyi<R: Rng + ?Sized>(
        node_count: usize,
        edge_prob: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&edge_prob) {
            return Err(TopologyError::InvalidEdgeProbability(edge_prob));
        }

        let mut topology = Self::with_nodes(node_count);
        for i in 0..node_count {
            for j in (i + 1)..node_count {
                if rng.gen_bool(edge_prob) {
                    // Visiting order keeps both lists sorted without a search.
                    topology.adjacency[i].push(NodeId(j));
                    topology.adjacency[j].push(NodeId(i));
                    topology.edge_count += 1;
                }
            }
        }
        Ok(topology)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Iterate over all node ids in ascending order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        (0..self.adjacency.len()).map(NodeId)
    }

    /// Whether `node` exists in this graph.
    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.adjacency.len()
    }

    /// Neighbors of `node`, sorted ascending.
    pub fn neighbors(&self, node: NodeId) -> Result<&[NodeId]> {
        self.check(node)?;
        Ok(&self.adjacency[node.0])
    }

    /// Degree of `node`.
    pub fn degree(&self, node: NodeId) -> Result<usize> {
        self.neighbors(node).map(<[NodeId]>::len)
    }

    /// Whether the edge `a - b` exists.
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> Result<bool> {
        self.check(b)?;
        Ok(self.neighbors(a)?.binary_search(&b).is_ok())
    }

    /// Insert the edge `a - b`.
    ///
    /// Returns `false` if the edge already existed.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(TopologyError::SelfLoop(a));
        }

        let Err(pos) = self.adjacency[a.0].binary_search(&b) else {
            return Ok(false);
        };
        self.adjacency[a.0].insert(pos, b);
        if let Err(pos) = self.adjacency[b.0].binary_search(&a) {
            self.adjacency[b.0].insert(pos, a);
        }
        self.edge_count += 1;
        Ok(true)
    }

    /// Remove the edge `a - b`.
    ///
    /// Idempotent: removing an absent edge is a no-op that returns `false`.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        self.check(a)?;
        self.check(b)?;

        let Ok(pos) = self.adjacency[a.0].binary_search(&b) else {
            return Ok(false);
        };
        self.adjacency[a.0].remove(pos);
        if let Ok(pos) = self.adjacency[b.0].binary_search(&a) {
            self.adjacency[b.0].remove(pos);
        }
        self.edge_count -= 1;
        Ok(true)
    }

    /// Iterate over every edge once, as `(low, high)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, neighbors)| {
            neighbors
                .iter()
                .filter(move |n| n.0 > i)
                .map(move |&n| (NodeId(i), n))
        })
    }

    fn check(&self, node: NodeId) -> Result<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(TopologyError::NodeOutOfRange {
                node,
                node_count: self.adjacency.len(),
            })
        }
    }
}
