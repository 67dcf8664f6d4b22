//! Voting Cascade
//!
//! Opinion diffusion over a social network. Undecided voters are swayed
//! either by a celebrity they follow or by the summed bias of neighbors who
//! speak up for a party, and each new adopter may conceal its true belief
//! behind the opposite party.
//!
//! # Core Insight
//!
//! Influence reads only what people *say*. A voter that believes Democrat
//! but says Republican pushes its neighbors toward Republican, so
//! concealment can steer a cascade away from the beliefs that started it.
//!
//! # Rounds
//!
//! 1. Freeze everyone's public opinion
//! 2. Every undecided voter decides from the frozen picture
//! 3. All decisions land at once
//! 4. Repeat until a round changes nothing
//!
//! Adoption is one-way, so a network of N voters converges within N rounds.
//!
//! # Usage
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use voting_cascade::{populate, CascadeEngine, PopulationConfig};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut network = populate(&PopulationConfig::default(), &mut rng).unwrap();
//!
//! let engine = CascadeEngine::new(2.0).unwrap();
//! let outcome = engine.simulate(&mut network, &mut rng).unwrap();
//! assert!(outcome.snapshots.len() <= network.node_count() + 1);
//! ```

mod config;
mod engine;
mod error;
mod influence;
mod network;
mod opinion;
mod population;
mod recorder;
mod report;
mod simulation;

pub use config::{parse_celebrities, OutputFormat, SimulationConfig};
pub use engine::{Adoption, AdoptionRule, CascadeEngine, CascadeOutcome, RoundSummary};
pub use error::{Error, Result};
pub use influence::{InfluenceTally, Threshold};
pub use network::{Celebrity, Network, NodeAttributes, CELEBRITY_BIAS};
pub use opinion::{Opinion, Party};
pub use population::{populate, PopulationConfig, PopulationInitializer, BIAS_RANGE};
pub use recorder::{Snapshot, StateRecorder};
pub use report::{CascadeReport, NodeView, Tally};
pub use simulation::run_simulation;

pub use voting_topology::{NodeId, Topology};
