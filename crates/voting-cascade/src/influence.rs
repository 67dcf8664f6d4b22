//! Peer influence and the adoption threshold.
//!
//! A voter feels the summed bias of every neighbor that publicly backs a
//! party:
//!
//! ```text
//! democrat_influence   = Σ bias(n)  for n ∈ neighbors, public(n) = democrat
//! republican_influence = Σ bias(n)  for n ∈ neighbors, public(n) = republican
//! ```
//!
//! Reaching the threshold is inclusive (`>=`). Democrat is tested first, so a
//! voter pushed past the threshold by both parties backs Democrat.

use serde::{Deserialize, Serialize};
use voting_topology::NodeId;

use crate::error::{Error, Result};
use crate::network::Network;
use crate::opinion::Party;

/// Summed neighbor bias per party.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InfluenceTally {
    pub democrat: f64,
    pub republican: f64,
}

impl InfluenceTally {
    /// Measure the influence on `node` from its neighbors' public opinions.
    pub fn measure(network: &Network, node: NodeId) -> Self {
        let mut tally = Self::default();
        for &neighbor in network.neighbors(node) {
            let Some(attrs) = network.attributes(neighbor) else {
                continue;
            };
            match attrs.public().party() {
                Some(Party::Democrat) => tally.democrat += attrs.bias(),
                Some(Party::Republican) => tally.republican += attrs.bias(),
                None => {}
            }
        }
        tally
    }

    /// Influence pushing toward `party`.
    pub fn toward(&self, party: Party) -> f64 {
        match party {
            Party::Democrat => self.democrat,
            Party::Republican => self.republican,
        }
    }

    /// The party this tally tips the voter toward, if any.
    pub fn resolve(&self, threshold: Threshold) -> Option<Party> {
        Party::ALL
            .into_iter()
            .find(|&party| threshold.is_met_by(self.toward(party)))
    }
}

/// Minimum summed bias needed to sway an undecided voter.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Threshold(f64);

impl Threshold {
    /// Create a threshold. Must be positive and finite.
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(Error::config(format!(
                "threshold {value} must be positive and finite"
            )))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether `influence` reaches the threshold.
    pub fn is_met_by(self, influence: f64) -> bool {
        influence >= self.0
    }

    /// How much more influence is needed to reach the threshold.
    pub fn shortfall(self, influence: f64) -> f64 {
        (self.0 - influence).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NodeAttributes;
    use voting_topology::Topology;

    /// Node 0 in the middle of a star; leaves carry the given attributes.
    fn star(leaves: Vec<NodeAttributes>) -> Network {
        let mut g = Topology::with_nodes(leaves.len() + 1);
        for i in 1..=leaves.len() {
            g.add_edge(NodeId(0), NodeId(i)).unwrap();
        }
        let mut attrs = vec![NodeAttributes::new(1.0, 0.0)];
        attrs.extend(leaves);
        Network::from_parts(g, attrs, vec![]).unwrap()
    }

    #[test]
    fn threshold_rejects_nonpositive() {
        assert!(Threshold::new(0.0).is_err());
        assert!(Threshold::new(-1.0).is_err());
        assert!(Threshold::new(f64::NAN).is_err());
        assert!(Threshold::new(f64::INFINITY).is_err());
        assert_eq!(Threshold::new(2.0).unwrap().value(), 2.0);
    }

    #[test]
    fn threshold_is_inclusive() {
        let t = Threshold::new(1.5).unwrap();
        assert!(t.is_met_by(1.5));
        assert!(t.is_met_by(2.0));
        assert!(!t.is_met_by(1.49));
        assert_eq!(t.shortfall(1.0), 0.5);
        assert_eq!(t.shortfall(3.0), 0.0);
    }

    #[test]
    fn tally_reads_public_state_only() {
        let net = star(vec![
            NodeAttributes::decided(0.75, 0.0, Party::Democrat, Party::Democrat),
            // Believes Democrat, says Republican: counts for Republican.
            NodeAttributes::decided(1.25, 1.0, Party::Democrat, Party::Republican),
            NodeAttributes::new(1.4, 0.0),
        ]);

        let tally = InfluenceTally::measure(&net, NodeId(0));
        assert_eq!(tally.democrat, 0.75);
        assert_eq!(tally.republican, 1.25);
    }

    #[test]
    fn democrat_wins_when_both_qualify() {
        let tally = InfluenceTally {
            democrat: 2.0,
            republican: 5.0,
        };
        let t = Threshold::new(2.0).unwrap();
        assert_eq!(tally.resolve(t), Some(Party::Democrat));
    }

    #[test]
    fn republican_when_only_republican_qualifies() {
        let tally = InfluenceTally {
            democrat: 1.9,
            republican: 2.0,
        };
        let t = Threshold::new(2.0).unwrap();
        assert_eq!(tally.resolve(t), Some(Party::Republican));
    }

    #[test]
    fn no_party_below_threshold() {
        let tally = InfluenceTally {
            democrat: 0.5,
            republican: 0.5,
        };
        assert_eq!(tally.resolve(Threshold::new(1.0).unwrap()), None);
    }
}
