//! One complete run: population, cascade, report.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::SimulationConfig;
use crate::engine::CascadeEngine;
use crate::error::Result;
use crate::population::PopulationInitializer;
use crate::recorder::StateRecorder;
use crate::report::CascadeReport;

/// Build a population and cascade it to convergence.
///
/// All configuration is validated before anything is generated. Every random
/// draw comes from one `StdRng` seeded with `config.seed`, so equal configs
/// give equal reports.
pub fn run_simulation(config: &SimulationConfig) -> Result<CascadeReport> {
    let engine = CascadeEngine::new(config.threshold)?;
    let initializer = PopulationInitializer::new(config.population.clone())?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut network = initializer.initialize(&mut rng)?;

    info!(
        seed = config.seed,
        threshold = config.threshold,
        "Running cascade over {} voters",
        network.node_count()
    );
    let outcome = engine.run(&mut network, StateRecorder::new(), &mut rng)?;

    Ok(CascadeReport::new(
        config.seed,
        config.threshold,
        &network,
        outcome,
    ))
}
