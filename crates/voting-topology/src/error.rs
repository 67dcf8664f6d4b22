//! Error types for voting-topology.

use thiserror::Error;

use crate::NodeId;

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Errors raised while building or editing a topology.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    /// A node id does not exist in the graph.
    #[error("node {node} out of range (graph has {node_count} nodes)")]
    NodeOutOfRange { node: NodeId, node_count: usize },

    /// Edges from a node to itself are not part of the model.
    #[error("self-loop on node {0} is not allowed")]
    SelfLoop(NodeId),

    /// Edge probability must lie in [0, 1].
    #[error("edge probability {0} is outside [0, 1]")]
    InvalidEdgeProbability(f64),
}
