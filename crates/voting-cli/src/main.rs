//! Voting Cascade runner
//!
//! Build a population, run the cascade to its fixed point and print either a
//! round table or the full JSON report for a renderer.
//!
//! ```text
//! voting-cascade [nodes] [seed]
//! ```
//!
//! Everything else comes from `VOTING_*` environment variables.

use std::env;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voting_cascade::{run_simulation, CascadeReport, OutputFormat, SimulationConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voting_cascade=info,voting_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = SimulationConfig::from_env()?;

    // Positional args override the environment
    let args: Vec<String> = env::args().collect();
    if let Some(nodes) = args.get(1) {
        config.population.node_count = nodes.parse()?;
    }
    if let Some(seed) = args.get(2) {
        config.seed = seed.parse()?;
    }
    config.validate()?;

    tracing::info!(
        nodes = config.population.node_count,
        edge_prob = config.population.edge_prob,
        celebrities = config.population.celebrities.len(),
        "Starting voting cascade"
    );
    let report = run_simulation(&config)?;

    match config.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Summary => print_summary(&config, &report),
    }

    Ok(())
}

fn print_summary(config: &SimulationConfig, report: &CascadeReport) {
    println!("Voting Cascade");
    println!("==============");
    println!();
    println!(
        "Network: {} voters, {} edges (p = {})",
        report.node_count,
        report.edges.len(),
        config.population.edge_prob
    );
    for celebrity in &config.population.celebrities {
        println!("  Celebrity: node {} ({})", celebrity.node, celebrity.party);
    }
    println!(
        "Threshold: {}  Concealment: {}  Preseeded: {}  Seed: {}",
        report.threshold,
        config.population.concealment_prob,
        config.population.preseed_count,
        report.seed
    );
    println!();

    println!("Round  Adopted  Fans  Threshold  Dem  Rep  Concealed");
    for round in &report.rounds {
        println!(
            "{:>5}  {:>7}  {:>4}  {:>9}  {:>3}  {:>3}  {:>9}",
            round.round,
            round.adoptions,
            round.fan_adoptions,
            round.threshold_adoptions,
            round.democrat,
            round.republican,
            round.concealed
        );
    }
    println!();

    println!(
        "Converged after {} rounds ({} snapshots)",
        report.rounds_to_converge(),
        report.snapshots.len()
    );
    println!("Total nodes that adopted: {}", report.adopted);
    println!(
        "  Believed:  {} democrat, {} republican, {} undecided",
        report.believed.democrat, report.believed.republican, report.believed.undecided
    );
    println!(
        "  Expressed: {} democrat, {} republican, {} undecided",
        report.expressed.democrat, report.expressed.republican, report.expressed.undecided
    );
    println!("  Concealing: {}", report.concealing_count());
}
