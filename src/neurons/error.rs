//! Precondition failures surfaced by the simulator.

use thiserror::Error;

use super::models::{ConnectionId, NeuronId};

/// A graph snapshot the simulator refuses to run.
///
/// Callers normally translate these into a "not yet solvable" state; the
/// success evaluator never produces one for a merely unsolved network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// A connection points at a neuron that is not in the snapshot.
    #[error("connection {connection} references unknown neuron {neuron}")]
    MalformedGraph {
        connection: ConnectionId,
        neuron: NeuronId,
    },

    /// Two neurons in the snapshot share an id.
    #[error("neuron id {0} appears more than once")]
    DuplicateNeuron(NeuronId),

    /// A simulator setting outside the range propagation is defined for.
    #[error("invalid simulator setting {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

pub type SimulationResult<T> = std::result::Result<T, SimulationError>;
