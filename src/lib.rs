//! Neuron Garden
//!
//! Simulation core of the Neuron Garden puzzle game:
//! - Activation propagation over player-built neuron networks
//! - Per-level success conditions (direct link, OR gate, AND gate, custom)
//! - Built-in campaign levels and progression tracking
//! - Puzzle files for running networks from the `garden` CLI

pub mod levels;
pub mod neurons;
pub mod puzzle;

pub use neurons::{
    evaluate, propagate, ActivationState, Connection, InputSet, NetworkSimulator, Neuron,
    NeuronId, NeuronKind, SimulationError, SimulatorConfig, SuccessCondition,
};

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub simulator: SimulatorConfig,
}

/// Resolved configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub simulator: SimulatorConfig,
}

impl Config {
    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "garden.yaml" in CWD. A missing or
    /// unparsable file falls back to defaults, and so does any setting outside
    /// its valid range.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);
        let defaults = yaml.simulator;

        Ok(Self {
            simulator: SimulatorConfig {
                max_iterations: env_or("GARDEN_MAX_ITERATIONS", defaults.max_iterations),
                convergence_tolerance: env_or(
                    "GARDEN_CONVERGENCE_TOLERANCE",
                    defaults.convergence_tolerance,
                ),
                firing_gate: env_or("GARDEN_FIRING_GATE", defaults.firing_gate),
            }
            .sanitized(),
        })
    }

    /// Simulator built from this configuration.
    pub fn simulator(&self) -> NetworkSimulator {
        NetworkSimulator::new(self.simulator)
    }

    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("garden.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

/// Parse `var` from the environment, keeping `fallback` when unset or invalid.
fn env_or<T: std::str::FromStr>(var: &str, fallback: T) -> T {
    match std::env::var(var) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring invalid {}={:?}", var, raw);
                fallback
            }
        },
        Err(_) => fallback,
    }
}

// ============================================================================
// Tests
// ============================================================================
