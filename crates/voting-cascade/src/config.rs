//! Simulation configuration.
//!
//! Values come from `VOTING_*` environment variables, falling back to the
//! defaults of the stock scenario (50 voters, p = 0.2, threshold 2.0, one
//! Democrat celebrity at node 0).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use voting_topology::NodeId;

use crate::error::{Error, Result};
use crate::influence::Threshold;
use crate::network::Celebrity;
use crate::opinion::Party;
use crate::population::PopulationConfig;

/// How the binary prints a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable round table and totals.
    #[default]
    Summary,
    /// The full [`CascadeReport`](crate::CascadeReport) as JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::config(format!("unknown output format '{other}'"))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Summary => f.write_str("summary"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Configuration for a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub population: PopulationConfig,
    /// Summed neighbor bias needed to sway an undecided voter.
    pub threshold: f64,
    /// Seed for every random draw in the run.
    pub seed: u64,
    pub output: OutputFormat,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population: PopulationConfig::default(),
            threshold: 2.0,
            seed: 42,
            output: OutputFormat::Summary,
        }
    }
}

impl SimulationConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any key lookup (environment, test map, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let population = PopulationConfig {
            node_count: parse_or(
                parse("VOTING_NODES"),
                "VOTING_NODES",
                defaults.population.node_count,
            )?,
            edge_prob: parse_or(
                parse("VOTING_EDGE_PROB"),
                "VOTING_EDGE_PROB",
                defaults.population.edge_prob,
            )?,
            // An explicitly empty list means "no celebrities".
            celebrities: match lookup("VOTING_CELEBRITIES") {
                Some(list) => parse_celebrities(&list)?,
                None => defaults.population.celebrities,
            },
            concealment_prob: parse_or(
                parse("VOTING_CONCEALMENT"),
                "VOTING_CONCEALMENT",
                defaults.population.concealment_prob,
            )?,
            preseed_count: parse_or(
                parse("VOTING_PRESEED"),
                "VOTING_PRESEED",
                defaults.population.preseed_count,
            )?,
        };

        Ok(Self {
            population,
            threshold: parse_or(
                parse("VOTING_THRESHOLD"),
                "VOTING_THRESHOLD",
                defaults.threshold,
            )?,
            seed: parse_or(parse("VOTING_SEED"), "VOTING_SEED", defaults.seed)?,
            output: match parse("VOTING_OUTPUT") {
                Some(value) => value.parse()?,
                None => defaults.output,
            },
        })
    }

    /// Check every parameter; nothing is built.
    pub fn validate(&self) -> Result<()> {
        Threshold::new(self.threshold)?;
        self.population.validate()
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::config(format!("{key}={raw}: {e}"))),
        None => Ok(default),
    }
}

/// Parse `id:party` pairs, e.g. `0:democrat,7:republican`.
pub fn parse_celebrities(list: &str) -> Result<Vec<Celebrity>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, party) = entry.split_once(':').ok_or_else(|| {
                Error::config(format!("celebrity '{entry}' is not of the form id:party"))
            })?;
            let id: usize = id
                .trim()
                .parse()
                .map_err(|e| Error::config(format!("celebrity id '{id}': {e}")))?;
            Ok(Celebrity::new(NodeId(id), party.parse::<Party>()?))
        })
        .collect()
}
