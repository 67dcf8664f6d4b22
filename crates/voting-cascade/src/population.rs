//! Building an attributed network from a population description.

use std::ops::Range;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;
use voting_topology::{NodeId, Topology};

use crate::error::{Error, Result};
use crate::network::{validate_celebrities, Celebrity, Network, NodeAttributes};
use crate::opinion::Party;

/// Range ordinary voters draw their bias from.
pub const BIAS_RANGE: Range<f64> = 0.5..1.5;

/// Everything needed to build the starting population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub node_count: usize,
    /// Probability that any given pair of voters knows each other.
    pub edge_prob: f64,
    /// Zero, one or two celebrities.
    pub celebrities: Vec<Celebrity>,
    /// Chance that an ordinary voter expresses the opposite of what it adopts.
    pub concealment_prob: f64,
    /// Ordinary voters that start with a random belief.
    pub preseed_count: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            node_count: 50,
            edge_prob: 0.2,
            celebrities: vec![Celebrity::new(NodeId(0), Party::Democrat)],
            concealment_prob: 0.0,
            preseed_count: 0,
        }
    }
}

impl PopulationConfig {
    /// Check every parameter without building anything.
    pub fn validate(&self) -> Result<()> {
        if self.node_count == 0 {
            return Err(Error::config("node count must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.edge_prob) {
            return Err(Error::config(format!(
                "edge probability {} is outside [0, 1]",
                self.edge_prob
            )));
        }
        if !(0.0..=1.0).contains(&self.concealment_prob) {
            return Err(Error::config(format!(
                "concealment probability {} is outside [0, 1]",
                self.concealment_prob
            )));
        }
        validate_celebrities(&self.celebrities, self.node_count)?;

        let available = self.node_count - self.celebrities.len();
        if self.preseed_count > available {
            return Err(Error::config(format!(
                "cannot preseed {} voters: only {available} non-celebrity nodes",
                self.preseed_count
            )));
        }
        Ok(())
    }
}

/// Produces a fully attributed network ready for a cascade.
#[derive(Debug, Clone)]
pub struct PopulationInitializer {
    config: PopulationConfig,
}

impl PopulationInitializer {
    /// Validate `config` up front; a returned initializer cannot fail on
    /// configuration grounds.
    pub fn new(config: PopulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    /// Build a network.
    ///
    /// Draw order from `rng`: graph edges, one bias per node, the preseed
    /// sample, then one party and one concealment coin per preseeded voter.
    pub fn initialize<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        let config = &self.config;
        let topology = Topology::erdos_renyi(config.node_count, config.edge_prob, rng)?;

        let attributes: Vec<_> = (0..config.node_count)
            .map(|_| NodeAttributes::new(rng.gen_range(BIAS_RANGE), config.concealment_prob))
            .collect();

        let mut network = Network::assemble(topology, attributes, config.celebrities.clone());

        let candidates: Vec<NodeId> = network
            .topology()
            .nodes()
            .filter(|&n| !network.is_celebrity(n))
            .collect();
        let seeded: Vec<NodeId> = candidates
            .choose_multiple(rng, config.preseed_count)
            .copied()
            .collect();

        let mut concealed = 0;
        for node in seeded {
            let party = if rng.gen_bool(0.5) {
                Party::Democrat
            } else {
                Party::Republican
            };
            let Some(attrs) = network.attributes_mut(node) else {
                continue;
            };
            if attrs.adopt(party, rng).party() != Some(party) {
                concealed += 1;
            }
        }

        info!(
            "Population ready: {} voters, {} edges, {} celebrities, {} preseeded ({} concealed)",
            network.node_count(),
            network.topology().edge_count(),
            network.celebrities().len(),
            config.preseed_count,
            concealed
        );
        Ok(network)
    }
}

/// Validate `config` and build a network in one step.
pub fn populate<R: Rng + ?Sized>(config: &PopulationConfig, rng: &mut R) -> Result<Network> {
    PopulationInitializer::new(config.clone())?.initialize(rng)
}
