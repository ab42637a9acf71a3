//! Configuration for the network simulator.
//!
//! The defaults are the values every level is balanced against; overriding
//! them changes which networks solve which levels.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::{SimulationError, SimulationResult};

/// No run performs more passes than this, whatever the configuration says.
pub const MAX_PASSES: usize = 20;

/// Tuning parameters for activation propagation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Hard cap on full passes over the connection list.
    pub max_iterations: usize,

    /// A neuron whose activity moves by more than this within a pass keeps
    /// the simulation running for another pass.
    pub convergence_tolerance: f64,

    /// Sources at or below this activity emit no signal.
    pub firing_gate: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            convergence_tolerance: 0.01,
            firing_gate: 0.3,
        }
    }
}

impl SimulatorConfig {
    /// Check every setting against the range propagation is defined for:
    /// `1..=MAX_PASSES` passes, and a tolerance and gate that are finite
    /// activity levels in `[0, 1]`.
    pub fn validate(&self) -> SimulationResult<()> {
        check_passes(self.max_iterations)?;
        check_level("convergence_tolerance", self.convergence_tolerance)?;
        check_level("firing_gate", self.firing_gate)?;
        Ok(())
    }

    /// Replace each invalid setting with its default, logging a warning.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if let Err(e) = check_passes(self.max_iterations) {
            warn!("{}. Using {}.", e, defaults.max_iterations);
            self.max_iterations = defaults.max_iterations;
        }
        if let Err(e) = check_level("convergence_tolerance", self.convergence_tolerance) {
            warn!("{}. Using {}.", e, defaults.convergence_tolerance);
            self.convergence_tolerance = defaults.convergence_tolerance;
        }
        if let Err(e) = check_level("firing_gate", self.firing_gate) {
            warn!("{}. Using {}.", e, defaults.firing_gate);
            self.firing_gate = defaults.firing_gate;
        }

        self
    }
}

fn check_passes(max_iterations: usize) -> SimulationResult<()> {
    if (1..=MAX_PASSES).contains(&max_iterations) {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfig {
            field: "max_iterations",
            reason: format!("{} is outside 1..={}", max_iterations, MAX_PASSES),
        })
    }
}

fn check_level(field: &'static str, value: f64) -> SimulationResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfig {
            field,
            reason: format!("{} is not an activity level in [0, 1]", value),
        })
    }
}
