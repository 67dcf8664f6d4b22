//! Run reports for renderers and summaries.
//!
//! A renderer needs the snapshot timeline plus a few static facts per voter:
//! bias (drawn as size), whether it conceals (drawn as shape) and its public
//! opinion per round (drawn as colour). [`CascadeReport`] bundles all of it.

use serde::{Deserialize, Serialize};
use voting_topology::NodeId;

use crate::engine::{CascadeOutcome, RoundSummary};
use crate::network::Network;
use crate::opinion::Opinion;
use crate::recorder::Snapshot;

/// Head count per opinion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub undecided: usize,
    pub democrat: usize,
    pub republican: usize,
}

impl Tally {
    pub fn count(opinions: impl IntoIterator<Item = Opinion>) -> Self {
        let mut tally = Self::default();
        for opinion in opinions {
            match opinion {
                Opinion::Undecided => tally.undecided += 1,
                Opinion::Democrat => tally.democrat += 1,
                Opinion::Republican => tally.republican += 1,
            }
        }
        tally
    }

    pub fn decided(&self) -> usize {
        self.democrat + self.republican
    }

    pub fn total(&self) -> usize {
        self.undecided + self.decided()
    }
}

/// Static per-voter facts for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: NodeId,
    pub bias: f64,
    pub internal: Opinion,
    pub public: Opinion,
    pub concealing: bool,
    pub celebrity: bool,
    pub degree: usize,
}

impl NodeView {
    /// Views of every voter, in id order.
    pub fn collect(network: &Network) -> Vec<Self> {
        network
            .all_attributes()
            .iter()
            .enumerate()
            .map(|(i, attrs)| {
                let id = NodeId(i);
                Self {
                    id,
                    bias: attrs.bias(),
                    internal: attrs.internal(),
                    public: attrs.public(),
                    concealing: attrs.is_concealing(),
                    celebrity: network.is_celebrity(id),
                    degree: network.neighbors(id).len(),
                }
            })
            .collect()
    }
}

/// Everything produced by one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub seed: u64,
    pub threshold: f64,
    pub node_count: usize,
    pub edges: Vec<(NodeId, NodeId)>,
    pub snapshots: Vec<Snapshot>,
    pub rounds: Vec<RoundSummary>,
    pub nodes: Vec<NodeView>,
    /// Final public opinions.
    pub expressed: Tally,
    /// Final true beliefs.
    pub believed: Tally,
    pub adopted: usize,
}

impl CascadeReport {
    /// Build a report from a converged network and its outcome.
    pub fn new(seed: u64, threshold: f64, network: &Network, outcome: CascadeOutcome) -> Self {
        let nodes = NodeView::collect(network);
        let expressed = Tally::count(nodes.iter().map(|n| n.public));
        let believed = Tally::count(nodes.iter().map(|n| n.internal));

        Self {
            seed,
            threshold,
            node_count: network.node_count(),
            edges: network.topology().edges().collect(),
            snapshots: outcome.snapshots,
            rounds: outcome.rounds,
            nodes,
            expressed,
            believed,
            adopted: outcome.adopted,
        }
    }

    /// Voters whose public opinion differs from their belief.
    pub fn concealing_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.concealing).count()
    }

    /// Productive rounds before convergence.
    pub fn rounds_to_converge(&self) -> usize {
        self.rounds.len()
    }
}
