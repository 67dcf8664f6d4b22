//! The attributed social network a cascade runs on.
//!
//! A [`Network`] owns the [`Topology`] plus one [`NodeAttributes`] record per
//! node, stored in a table indexed by [`NodeId`]. Outside this crate the
//! table is read-only; the engine changes it only through
//! [`NodeAttributes::adopt`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use voting_topology::{NodeId, Topology};

use crate::error::{Error, Result};
use crate::opinion::{Opinion, Party};

/// Influence weight assigned to every celebrity.
pub const CELEBRITY_BIAS: f64 = 10.0;

/// A designated seed adopter with a fixed party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Celebrity {
    pub node: NodeId,
    pub party: Party,
}

impl Celebrity {
    pub const fn new(node: NodeId, party: Party) -> Self {
        Self { node, party }
    }
}

/// Per-node state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    bias: f64,
    internal: Opinion,
    public: Opinion,
    concealment_prob: f64,
}

impl NodeAttributes {
    /// An undecided voter.
    pub fn new(bias: f64, concealment_prob: f64) -> Self {
        Self {
            bias,
            internal: Opinion::Undecided,
            public: Opinion::Undecided,
            concealment_prob,
        }
    }

    /// A voter that already believes `internal` and says `public`.
    pub fn decided(bias: f64, concealment_prob: f64, internal: Party, public: Party) -> Self {
        Self {
            bias,
            internal: internal.into(),
            public: public.into(),
            concealment_prob,
        }
    }

    fn celebrity(party: Party) -> Self {
        Self::decided(CELEBRITY_BIAS, 0.0, party, party)
    }

    /// Influence this voter contributes to each neighbor once it speaks up.
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// What the voter truly believes.
    pub fn internal(&self) -> Opinion {
        self.internal
    }

    /// What the voter tells its neighbors.
    pub fn public(&self) -> Opinion {
        self.public
    }

    pub fn concealment_prob(&self) -> f64 {
        self.concealment_prob
    }

    /// Whether the voter says something other than what it believes.
    pub fn is_concealing(&self) -> bool {
        self.internal != self.public
    }

    /// Adopt `party` as the true belief and decide what to express.
    ///
    /// With probability `concealment_prob` the voter expresses the opposite
    /// party. Returns the expressed opinion.
    pub(crate) fn adopt<R: Rng + ?Sized>(&mut self, party: Party, rng: &mut R) -> Opinion {
        debug_assert!(self.internal.is_undecided(), "adoption is one-way");
        self.internal = party.into();
        self.public = if rng.gen_bool(self.concealment_prob) {
            party.opposite().into()
        } else {
            party.into()
        };
        self.public
    }

    fn validate(&self, node: NodeId) -> Result<()> {
        if !(self.bias.is_finite() && self.bias > 0.0) {
            return Err(Error::config(format!(
                "node {node}: bias {} must be positive and finite",
                self.bias
            )));
        }
        if !(0.0..=1.0).contains(&self.concealment_prob) {
            return Err(Error::config(format!(
                "node {node}: concealment probability {} is outside [0, 1]",
                self.concealment_prob
            )));
        }
        if self.internal.is_undecided() != self.public.is_undecided() {
            return Err(Error::config(format!(
                "node {node}: believes {} but expresses {}",
                self.internal, self.public
            )));
        }
        Ok(())
    }
}

/// Check a celebrity list against a network of `node_count` nodes.
///
/// At most two celebrities, distinct nodes in range, and when there are two
/// they must back different parties.
pub(crate) fn validate_celebrities(celebrities: &[Celebrity], node_count: usize) -> Result<()> {
    if celebrities.len() > 2 {
        return Err(Error::config(format!(
            "at most two celebrities are supported, got {}",
            celebrities.len()
        )));
    }
    for celebrity in celebrities {
        if celebrity.node.index() >= node_count {
            return Err(Error::config(format!(
                "celebrity node {} out of range (network has {node_count} nodes)",
                celebrity.node
            )));
        }
    }
    if let [a, b] = celebrities {
        if a.node == b.node {
            return Err(Error::config(format!(
                "node {} designated as celebrity twice",
                a.node
            )));
        }
        if a.party == b.party {
            return Err(Error::config(format!(
                "both celebrities back {}; two celebrities must back opposing parties",
                a.party
            )));
        }
    }
    Ok(())
}

/// A topology with voter attributes and designated celebrities.
#[derive(Debug, Clone)]
pub struct Network {
    topology: Topology,
    attributes: Vec<NodeAttributes>,
    /// Sorted by party, Democrat first.
    celebrities: Vec<Celebrity>,
}

impl Network {
    /// Assemble a network from explicit parts.
    ///
    /// Everything is validated before anything is changed. Celebrity records
    /// are then overwritten with celebrity attributes, and with two
    /// celebrities their shared edge (if any) is removed.
    pub fn from_parts(
        topology: Topology,
        attributes: Vec<NodeAttributes>,
        celebrities: Vec<Celebrity>,
    ) -> Result<Self> {
        if attributes.len() != topology.node_count() {
            return Err(Error::config(format!(
                "{} attribute records for {} nodes",
                attributes.len(),
                topology.node_count()
            )));
        }
        validate_celebrities(&celebrities, topology.node_count())?;
        for (index, attrs) in attributes.iter().enumerate() {
            attrs.validate(NodeId(index))?;
        }

        Ok(Self::assemble(topology, attributes, celebrities))
    }

    /// Apply celebrity overrides to already-validated parts.
    pub(crate) fn assemble(
        mut topology: Topology,
        mut attributes: Vec<NodeAttributes>,
        mut celebrities: Vec<Celebrity>,
    ) -> Self {
        celebrities.sort_by_key(|c| c.party);

        if let [a, b] = celebrities.as_slice() {
            if let Ok(true) = topology.remove_edge(a.node, b.node) {
                tracing::warn!(
                    "Removed edge between celebrities {} and {}",
                    a.node,
                    b.node
                );
            }
        }
        for celebrity in &celebrities {
            attributes[celebrity.node.index()] = NodeAttributes::celebrity(celebrity.party);
        }

        Self {
            topology,
            attributes,
            celebrities,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn node_count(&self) -> usize {
        self.attributes.len()
    }

    /// Celebrities, Democrat first.
    pub fn celebrities(&self) -> &[Celebrity] {
        &self.celebrities
    }

    pub fn is_celebrity(&self, node: NodeId) -> bool {
        self.celebrities.iter().any(|c| c.node == node)
    }

    /// Attributes of `node`, if it exists.
    pub fn attributes(&self, node: NodeId) -> Option<&NodeAttributes> {
        self.attributes.get(node.index())
    }

    /// All attribute records, indexed by node id.
    pub fn all_attributes(&self) -> &[NodeAttributes] {
        &self.attributes
    }

    /// Neighbors of `node`; empty for unknown nodes.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.topology.neighbors(node).unwrap_or(&[])
    }

    /// Public opinion of every node, indexed by node id.
    pub fn public_states(&self) -> impl ExactSizeIterator<Item = Opinion> + '_ {
        self.attributes.iter().map(NodeAttributes::public)
    }

    /// Number of nodes whose true belief is decided.
    pub fn decided_count(&self) -> usize {
        self.attributes
            .iter()
            .filter(|a| a.internal().is_decided())
            .count()
    }

    pub(crate) fn attributes_mut(&mut self, node: NodeId) -> Option<&mut NodeAttributes> {
        self.attributes.get_mut(node.index())
    }
}
