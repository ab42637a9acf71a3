//! Network simulator.
//!
//! Neurons are vertices, connections are weighted excitatory or inhibitory
//! edges, and activation spreads from the player's active sensory inputs
//! until the network settles.
//!
//! ## Modules
//!
//! - [`models`] — `Neuron`, `Connection`, `ActivationState`
//! - [`activation`] — `NetworkSimulator::propagate`
//! - [`success`] — `SuccessCondition` and `NetworkSimulator::check_success`
//! - [`topology`] — petgraph view used for failure diagnostics
//! - [`config`] — `SimulatorConfig`
//! - [`error`] — `SimulationError`

pub mod activation;
pub mod config;
pub mod error;
pub mod models;
pub mod success;
pub mod topology;

pub use activation::{propagate, InputSet, NetworkSimulator};
pub use config::{SimulatorConfig, MAX_PASSES};
pub use error::{SimulationError, SimulationResult};
pub use models::{ActivationState, Connection, ConnectionId, Neuron, NeuronId, NeuronKind};
pub use success::{evaluate, ConditionKind, SuccessCondition, SuccessPredicate};
pub use topology::NetworkTopology;
