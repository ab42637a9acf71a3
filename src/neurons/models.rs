//! Network data models.
//!
//! ## Input types (graph snapshot)
//! - [`NeuronKind`] / [`Neuron`] — vertices placed by the player or the level
//! - [`Connection`] — directed, weighted, polarized links between neurons
//!
//! ## Output types (propagation)
//! - [`ActivationState`] — per-neuron activity and per-connection signal flags
//!
//! Positions and colours belong to the presentation layer and are not modelled
//! here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Identifier of a [`Neuron`].
pub type NeuronId = Uuid;

/// Identifier of a [`Connection`].
pub type ConnectionId = Uuid;

// ============================================================================
// Neurons
// ============================================================================

/// Role of a neuron in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuronKind {
    /// Externally driven input.
    Sensory,
    /// Output checked by the success conditions.
    Motor,
    /// Hidden relay.
    Intermediate,
    /// Reserved modulatory role; propagates like any other neuron.
    Modulator,
}

impl NeuronKind {
    pub const ALL: [NeuronKind; 4] = [
        NeuronKind::Sensory,
        NeuronKind::Motor,
        NeuronKind::Intermediate,
        NeuronKind::Modulator,
    ];

    /// Human readable name shown in level descriptions.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sensory => "Sensory",
            Self::Motor => "Motor",
            Self::Intermediate => "Intermediate",
            Self::Modulator => "Modulator",
        }
    }
}

impl std::fmt::Display for NeuronKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sensory => write!(f, "sensory"),
            Self::Motor => write!(f, "motor"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Modulator => write!(f, "modulator"),
        }
    }
}

impl std::str::FromStr for NeuronKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sensory" => Ok(Self::Sensory),
            "motor" => Ok(Self::Motor),
            "intermediate" => Ok(Self::Intermediate),
            "modulator" => Ok(Self::Modulator),
            other => Err(format!("unknown neuron kind: {other}")),
        }
    }
}

/// A neuron in the player's network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
    pub id: NeuronId,
    pub kind: NeuronKind,
    /// Activity at or above this level fires the neuron (0.0 - 1.0).
    pub activation_threshold: f64,
    /// Multiplier applied to every signal leaving this neuron (0.0 - 1.0).
    pub output_strength: f64,
    /// Recovery time after firing. Carried for the presentation layer only.
    pub recovery_time: f64,
    /// Set by the last propagation run.
    #[serde(default)]
    pub is_active: bool,
}

impl Neuron {
    pub const DEFAULT_THRESHOLD: f64 = 0.5;
    pub const DEFAULT_OUTPUT_STRENGTH: f64 = 1.0;
    pub const DEFAULT_RECOVERY_TIME: f64 = 0.5;

    /// Create a neuron with a fresh id and default parameters.
    pub fn new(kind: NeuronKind) -> Self {
        Self::with_id(Uuid::new_v4(), kind)
    }

    /// Create a neuron with a caller-chosen id and default parameters.
    pub fn with_id(id: NeuronId, kind: NeuronKind) -> Self {
        Self {
            id,
            kind,
            activation_threshold: Self::DEFAULT_THRESHOLD,
            output_strength: Self::DEFAULT_OUTPUT_STRENGTH,
            recovery_time: Self::DEFAULT_RECOVERY_TIME,
            is_active: false,
        }
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.activation_threshold = threshold;
        self
    }

    pub fn strength(mut self, strength: f64) -> Self {
        self.output_strength = strength;
        self
    }
}

// ============================================================================
// Connections
// ============================================================================

/// A directed link between two neurons.
///
/// Endpoints are fixed at creation; `delay` and `age` are stored for the game
/// but never read by the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    from: NeuronId,
    to: NeuronId,
    /// Connection strength (0.0 - 1.0)
    pub weight: f64,
    /// Excitatory connections add their signal, inhibitory ones subtract it.
    pub is_excitatory: bool,
    pub delay: f64,
    pub age: u32,
}

impl Connection {
    pub const DEFAULT_WEIGHT: f64 = 1.0;
    pub const DEFAULT_DELAY: f64 = 0.2;

    /// Create an excitatory connection with default weight.
    pub fn new(from: NeuronId, to: NeuronId) -> Self {
        Self::with_id(Uuid::new_v4(), from, to)
    }

    pub fn with_id(id: ConnectionId, from: NeuronId, to: NeuronId) -> Self {
        Self {
            id,
            from,
            to,
            weight: Self::DEFAULT_WEIGHT,
            is_excitatory: true,
            delay: Self::DEFAULT_DELAY,
            age: 0,
        }
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn inhibitory(mut self) -> Self {
        self.is_excitatory = false;
        self
    }

    /// Neuron the signal leaves from.
    pub fn source(&self) -> NeuronId {
        self.from
    }

    /// Neuron the signal arrives at.
    pub fn target(&self) -> NeuronId {
        self.to
    }
}

// ============================================================================
// Output types
// ============================================================================

/// Result of a single propagation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivationState {
    /// Final activity level per neuron (0.0 - 1.0).
    pub neuron_activity: HashMap<NeuronId, f64>,
    /// Whether each connection carried a signal during the final pass.
    pub connection_active: HashMap<ConnectionId, bool>,
    /// Number of passes executed.
    pub iterations: usize,
    /// False when the run stopped at the iteration cap.
    pub converged: bool,
}

impl ActivationState {
    pub fn activity(&self, id: &NeuronId) -> f64 {
        self.neuron_activity.get(id).copied().unwrap_or(0.0)
    }

    pub fn is_connection_active(&self, id: &ConnectionId) -> bool {
        self.connection_active.get(id).copied().unwrap_or(false)
    }
}
