//! Per-round snapshots of public opinion.

use serde::{Deserialize, Serialize};
use voting_topology::NodeId;

use crate::network::Network;
use crate::opinion::Opinion;
use crate::report::Tally;

/// Public opinion of every node at one round boundary.
///
/// Owns its data: later changes to the network never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    round: usize,
    states: Box<[Opinion]>,
}

impl Snapshot {
    /// Copy the current public state of `network`.
    pub fn capture(round: usize, network: &Network) -> Self {
        Self {
            round,
            states: network.public_states().collect(),
        }
    }

    /// Round this snapshot closes (0 = right after initialization).
    pub fn round(&self) -> usize {
        self.round
    }

    /// Public opinion of `node`, if it exists.
    pub fn get(&self, node: NodeId) -> Option<Opinion> {
        self.states.get(node.index()).copied()
    }

    /// Public opinions indexed by node id.
    pub fn states(&self) -> &[Opinion] {
        &self.states
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (NodeId, Opinion)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, &opinion)| (NodeId(i), opinion))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn tally(&self) -> Tally {
        Tally::count(self.states.iter().copied())
    }
}

/// Accumulates snapshots in round order.
#[derive(Debug, Default)]
pub struct StateRecorder {
    snapshots: Vec<Snapshot>,
}

impl StateRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot `network` as the next round and return it.
    pub fn record(&mut self, network: &Network) -> &Snapshot {
        let round = self.snapshots.len();
        self.snapshots.push(Snapshot::capture(round, network));
        &self.snapshots[round]
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.snapshots
    }
}
