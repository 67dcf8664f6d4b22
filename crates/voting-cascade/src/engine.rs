//! Synchronous-round cascade engine.
//!
//! # Round
//!
//! 1. Freeze the public state as it stands at round start.
//! 2. For every undecided voter, decide from the frozen state:
//!    - **Fan rule**: neighbor of a celebrity → adopt that celebrity's public
//!      party. Democrat celebrities are checked first, so a fan of both backs
//!      Democrat. That ordering is an arbitrary tie-break kept for
//!      compatibility, not a modeled preference.
//!    - **Threshold rule**: otherwise adopt the first party (Democrat, then
//!      Republican) whose summed neighbor bias reaches the threshold.
//! 3. Apply every decision at once, in ascending node order. Each adopter
//!    draws its concealment coin as it is applied.
//!
//! # Termination
//!
//! Adoption is one-way, so each productive round moves at least one voter out
//! of `Undecided` for good. The run stops at the first round with no
//! adoptions, after at most N productive rounds. The recorded sequence is
//! therefore at most N + 1 snapshots long; exceeding that is reported as
//! [`Error::RoundLimitExceeded`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use voting_topology::NodeId;

use crate::error::{Error, Result};
use crate::influence::{InfluenceTally, Threshold};
use crate::network::Network;
use crate::opinion::{Opinion, Party};
use crate::recorder::{Snapshot, StateRecorder};

/// Why a voter adopted a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum AdoptionRule {
    /// Direct neighbor of this celebrity.
    CelebrityFan { celebrity: NodeId },
    /// Summed neighbor bias reached the threshold.
    Threshold,
}

/// A decision taken from a round-start snapshot, not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adoption {
    pub node: NodeId,
    pub party: Party,
    pub rule: AdoptionRule,
}

/// What happened in one productive round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: usize,
    pub adoptions: usize,
    pub fan_adoptions: usize,
    pub threshold_adoptions: usize,
    /// Adopters whose true belief is Democrat.
    pub democrat: usize,
    /// Adopters whose true belief is Republican.
    pub republican: usize,
    /// Adopters that express the party they do not believe in.
    pub concealed: usize,
}

/// Result of running a cascade to its fixed point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeOutcome {
    /// Round 0 (post-initialization) through the fixed point.
    pub snapshots: Vec<Snapshot>,
    /// One entry per productive round, starting at round 1.
    pub rounds: Vec<RoundSummary>,
    /// Nodes whose true belief ended decided, celebrities included.
    pub adopted: usize,
}

impl CascadeOutcome {
    /// The converged snapshot.
    pub fn final_snapshot(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Number of productive rounds.
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }
}

/// Runs rounds of influence until nothing changes.
#[derive(Debug, Clone, Copy)]
pub struct CascadeEngine {
    threshold: Threshold,
}

impl CascadeEngine {
    /// Create an engine. `threshold` must be positive and finite.
    pub fn new(threshold: f64) -> Result<Self> {
        Ok(Self {
            threshold: Threshold::new(threshold)?,
        })
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Decide the adoptions for one round, without touching the network.
    ///
    /// Result is in ascending node order.
    pub fn plan_round(&self, network: &Network) -> Vec<Adoption> {
        network
            .topology()
            .nodes()
            .filter_map(|node| self.decide(network, node))
            .collect()
    }

    /// Whether another round would change nothing.
    pub fn is_fixed_point(&self, network: &Network) -> bool {
        network
            .topology()
            .nodes()
            .all(|node| self.decide(network, node).is_none())
    }

    fn decide(&self, network: &Network, node: NodeId) -> Option<Adoption> {
        let attrs = network.attributes(node)?;
        if attrs.internal().is_decided() {
            return None;
        }

        if let Some(adoption) = fan_adoption(network, node) {
            return Some(adoption);
        }

        InfluenceTally::measure(network, node)
            .resolve(self.threshold)
            .map(|party| Adoption {
                node,
                party,
                rule: AdoptionRule::Threshold,
            })
    }

    /// Apply a planned round.
    ///
    /// Decisions must come from [`plan_round`](Self::plan_round) on the same
    /// network state; voters that are already decided are skipped.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        network: &mut Network,
        round: usize,
        adoptions: &[Adoption],
        rng: &mut R,
    ) -> RoundSummary {
        let mut summary = RoundSummary {
            round,
            ..RoundSummary::default()
        };

        for adoption in adoptions {
            let Some(attrs) = network.attributes_mut(adoption.node) else {
                continue;
            };
            if attrs.internal().is_decided() {
                continue;
            }
            let expressed = attrs.adopt(adoption.party, rng);

            summary.adoptions += 1;
            match adoption.rule {
                AdoptionRule::CelebrityFan { .. } => summary.fan_adoptions += 1,
                AdoptionRule::Threshold => summary.threshold_adoptions += 1,
            }
            match adoption.party {
                Party::Democrat => summary.democrat += 1,
                Party::Republican => summary.republican += 1,
            }
            if expressed != Opinion::from(adoption.party) {
                summary.concealed += 1;
            }
        }

        summary
    }

    /// Run rounds on `network` until a fixed point, recording every round.
    ///
    /// `recorder` should be fresh; its first snapshot is taken here, before
    /// any round runs.
    pub fn run<R: Rng + ?Sized>(
        &self,
        network: &mut Network,
        mut recorder: StateRecorder,
        rng: &mut R,
    ) -> Result<CascadeOutcome> {
        let limit = network.node_count() + 1;
        let mut rounds = Vec::new();

        recorder.record(network);
        loop {
            let plan = self.plan_round(network);
            if plan.is_empty() {
                break;
            }
            if recorder.len() >= limit {
                return Err(Error::RoundLimitExceeded {
                    rounds: recorder.len() + 1,
                    limit,
                });
            }

            let round = recorder.len();
            let summary = self.apply(network, round, &plan, rng);
            debug!(
                round,
                adoptions = summary.adoptions,
                fans = summary.fan_adoptions,
                democrat = summary.democrat,
                republican = summary.republican,
                concealed = summary.concealed,
                "Round applied"
            );
            rounds.push(summary);
            recorder.record(network);
        }

        let adopted = network.decided_count();
        info!(
            "Cascade converged after {} rounds: {}/{} voters decided",
            rounds.len(),
            adopted,
            network.node_count()
        );

        Ok(CascadeOutcome {
            snapshots: recorder.into_snapshots(),
            rounds,
            adopted,
        })
    }

    /// Run with a fresh recorder.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        network: &mut Network,
        rng: &mut R,
    ) -> Result<CascadeOutcome> {
        self.run(network, StateRecorder::new(), rng)
    }
}

/// Fan rule: adopt the public party of the first adjacent celebrity.
fn fan_adoption(network: &Network, node: NodeId) -> Option<Adoption> {
    network.celebrities().iter().find_map(|celebrity| {
        let adjacent = network
            .topology()
            .has_edge(node, celebrity.node)
            .unwrap_or(false);
        if !adjacent {
            return None;
        }
        let party = network.attributes(celebrity.node)?.public().party()?;
        Some(Adoption {
            node,
            party,
            rule: AdoptionRule::CelebrityFan {
                celebrity: celebrity.node,
            },
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Celebrity, NodeAttributes};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use voting_topology::Topology;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn graph(n: usize, edges: &[(usize, usize)]) -> Topology {
        let mut g = Topology::with_nodes(n);
        for &(a, b) in edges {
            g.add_edge(NodeId(a), NodeId(b)).unwrap();
        }
        g
    }

    fn network(
        n: usize,
        edges: &[(usize, usize)],
        attrs: Vec<NodeAttributes>,
        celebrities: Vec<Celebrity>,
    ) -> Network {
        assert_eq!(attrs.len(), n);
        Network::from_parts(graph(n, edges), attrs, celebrities).unwrap()
    }

    fn undecided(n: usize) -> Vec<NodeAttributes> {
        vec![NodeAttributes::new(1.0, 0.0); n]
    }

    #[test]
    fn engine_rejects_bad_threshold() {
        assert!(matches!(
            CascadeEngine::new(0.0),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(CascadeEngine::new(-2.0).is_err());
    }

    #[test]
    fn chain_cascades_one_hop_per_round() {
        let mut net = network(
            4,
            &[(0, 1), (1, 2), (2, 3)],
            undecided(4),
            vec![Celebrity::new(NodeId(0), Party::Democrat)],
        );
        let engine = CascadeEngine::new(1.0).unwrap();
        let outcome = engine.simulate(&mut net, &mut rng()).unwrap();

        assert_eq!(outcome.snapshots.len(), 4);
        let newly_decided: Vec<_> = outcome
            .snapshots
            .windows(2)
            .map(|w| {
                w[1].iter()
                    .filter(|&(n, o)| o.is_decided() && w[0].get(n) == Some(Opinion::Undecided))
                    .map(|(n, _)| n)
                    .collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(
            newly_decided,
            vec![vec![NodeId(1)], vec![NodeId(2)], vec![NodeId(3)]]
        );
        assert_eq!(outcome.rounds[0].fan_adoptions, 1);
        assert_eq!(outcome.rounds[1].threshold_adoptions, 1);
        assert_eq!(outcome.adopted, 4);
        assert!(outcome
            .final_snapshot()
            .unwrap()
            .states()
            .iter()
            .all(|&o| o == Opinion::Democrat));
    }

    #[test]
    fn isolated_voter_stays_undecided() {
        let mut net = network(1, &[], undecided(1), vec![]);
        let engine = CascadeEngine::new(1.0).unwrap();
        let outcome = engine.simulate(&mut net, &mut rng()).unwrap();

        assert_eq!(outcome.snapshots.len(), 1);
        assert_eq!(outcome.round_count(), 0);
        assert_eq!(outcome.adopted, 0);
        assert_eq!(
            outcome.snapshots[0].get(NodeId(0)),
            Some(Opinion::Undecided)
        );
    }

    #[test]
    fn fan_rule_beats_threshold() {
        // Node 1 is a fan of the Republican celebrity but surrounded by
        // heavy Democrat voices.
        let mut attrs = undecided(5);
        attrs[2] = NodeAttributes::decided(1.5, 0.0, Party::Democrat, Party::Democrat);
        attrs[3] = NodeAttributes::decided(1.5, 0.0, Party::Democrat, Party::Democrat);
        attrs[4] = NodeAttributes::decided(1.5, 0.0, Party::Democrat, Party::Democrat);
        let net = network(
            5,
            &[(0, 1), (1, 2), (1, 3), (1, 4)],
            attrs,
            vec![Celebrity::new(NodeId(0), Party::Republican)],
        );

        let engine = CascadeEngine::new(1.0).unwrap();
        let plan = engine.plan_round(&net);
        assert_eq!(
            plan,
            vec![Adoption {
                node: NodeId(1),
                party: Party::Republican,
                rule: AdoptionRule::CelebrityFan {
                    celebrity: NodeId(0)
                },
            }]
        );
    }

    #[test]
    fn fan_of_both_celebrities_backs_democrat() {
        let net = network(
            3,
            &[(0, 2), (1, 2)],
            undecided(3),
            vec![
                Celebrity::new(NodeId(0), Party::Republican),
                Celebrity::new(NodeId(1), Party::Democrat),
            ],
        );
        let engine = CascadeEngine::new(1.0).unwrap();
        let plan = engine.plan_round(&net);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].party, Party::Democrat);
        assert_eq!(
            plan[0].rule,
            AdoptionRule::CelebrityFan {
                celebrity: NodeId(1)
            }
        );
    }

    #[test]
    fn round_uses_round_start_state() {
        // 0 (celebrity) - 1 - 2: node 2 must not see node 1's adoption in
        // the round where node 1 adopts.
        let net = network(
            3,
            &[(0, 1), (1, 2)],
            undecided(3),
            vec![Celebrity::new(NodeId(0), Party::Democrat)],
        );
        let engine = CascadeEngine::new(0.5).unwrap();
        let plan = engine.plan_round(&net);
        assert_eq!(plan.iter().map(|a| a.node).collect::<Vec<_>>(), vec![NodeId(1)]);
    }

    #[test]
    fn below_threshold_stays_undecided() {
        let mut attrs = undecided(3);
        attrs[1] = NodeAttributes::decided(0.6, 0.0, Party::Democrat, Party::Democrat);
        attrs[2] = NodeAttributes::decided(0.6, 0.0, Party::Republican, Party::Republican);
        let mut net = network(3, &[(0, 1), (0, 2)], attrs, vec![]);

        let engine = CascadeEngine::new(1.0).unwrap();
        let outcome = engine.simulate(&mut net, &mut rng()).unwrap();
        assert_eq!(outcome.snapshots.len(), 1);
        assert_eq!(
            net.attributes(NodeId(0)).unwrap().internal(),
            Opinion::Undecided
        );
    }

    #[test]
    fn threshold_tie_backs_democrat() {
        let mut attrs = undecided(3);
        attrs[1] = NodeAttributes::decided(1.0, 0.0, Party::Republican, Party::Republican);
        attrs[2] = NodeAttributes::decided(1.0, 0.0, Party::Democrat, Party::Democrat);
        let net = network(3, &[(0, 1), (0, 2)], attrs, vec![]);

        let plan = CascadeEngine::new(1.0).unwrap().plan_round(&net);
        assert_eq!(plan[0].party, Party::Democrat);
        assert_eq!(plan[0].rule, AdoptionRule::Threshold);
    }

    #[test]
    fn full_concealment_flips_expression() {
        let mut attrs = vec![NodeAttributes::new(1.0, 1.0); 3];
        attrs[0] = NodeAttributes::new(1.0, 0.0);
        let mut net = network(
            3,
            &[(0, 1), (0, 2)],
            attrs,
            vec![Celebrity::new(NodeId(0), Party::Democrat)],
        );

        let outcome = CascadeEngine::new(5.0)
            .unwrap()
            .simulate(&mut net, &mut rng())
            .unwrap();
        assert_eq!(outcome.rounds[0].concealed, 2);
        for node in [NodeId(1), NodeId(2)] {
            let attrs = net.attributes(node).unwrap();
            assert_eq!(attrs.internal(), Opinion::Democrat);
            assert_eq!(attrs.public(), Opinion::Republican);
        }
    }

    #[test]
    fn concealed_voices_feed_the_other_side() {
        // Fans of a Democrat celebrity all conceal; their Republican voices
        // then push node 3 to Republican.
        let mut attrs = vec![NodeAttributes::new(1.0, 1.0); 4];
        attrs[3] = NodeAttributes::new(1.0, 0.0);
        let mut net = network(
            4,
            &[(0, 1), (0, 2), (1, 3), (2, 3)],
            attrs,
            vec![Celebrity::new(NodeId(0), Party::Democrat)],
        );

        CascadeEngine::new(2.0)
            .unwrap()
            .simulate(&mut net, &mut rng())
            .unwrap();
        let attrs = net.attributes(NodeId(3)).unwrap();
        assert_eq!(attrs.internal(), Opinion::Republican);
        assert_eq!(attrs.public(), Opinion::Republican);
    }

    #[test]
    fn apply_skips_decided_voters() {
        let mut net = network(
            2,
            &[(0, 1)],
            undecided(2),
            vec![Celebrity::new(NodeId(0), Party::Democrat)],
        );
        let engine = CascadeEngine::new(1.0).unwrap();
        let bogus = [Adoption {
            node: NodeId(0),
            party: Party::Republican,
            rule: AdoptionRule::Threshold,
        }];
        let summary = engine.apply(&mut net, 1, &bogus, &mut rng());
        assert_eq!(summary.adoptions, 0);
        assert_eq!(
            net.attributes(NodeId(0)).unwrap().internal(),
            Opinion::Democrat
        );
    }

    #[test]
    fn converged_network_is_fixed_point() {
        let mut net = network(
            4,
            &[(0, 1), (1, 2), (2, 3)],
            undecided(4),
            vec![Celebrity::new(NodeId(0), Party::Democrat)],
        );
        let engine = CascadeEngine::new(1.0).unwrap();
        assert!(!engine.is_fixed_point(&net));
        engine.simulate(&mut net, &mut rng()).unwrap();
        assert!(engine.is_fixed_point(&net));
        assert!(engine.plan_round(&net).is_empty());
    }
}
