//! Activation propagation.
//!
//! Runs an iterative relaxation over the connection list:
//! 1. **Seeding**: active sensory neurons start at 1.0, everything else at 0.0
//! 2. **Passes**: every connection whose source cleared the firing gate at the
//!    start of the pass adds (or, if inhibitory, subtracts) its signal to the
//!    target; a target reaching its threshold saturates to 1.0
//! 3. **Settling**: repeat until no neuron moves by more than the tolerance or
//!    the pass cap is hit, then derive `is_active` from the final activity
//!
//! Activity is carried from pass to pass, never reset, so a persistent
//! excitatory path keeps pushing its target upward until it saturates.
//! Connections sharing a target accumulate in list order within a pass.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::config::SimulatorConfig;
use super::error::{SimulationError, SimulationResult};
use super::models::{ActivationState, Connection, Neuron, NeuronId, NeuronKind};

/// Neurons driven to full activity for a run.
pub type InputSet = BTreeSet<NeuronId>;

/// Stateless simulator over player-built networks.
///
/// Holds only its configuration; every call works on the snapshot it is given
/// and leaves the caller's neurons and connections untouched.
#[derive(Debug, Clone, Default)]
pub struct NetworkSimulator {
    config: SimulatorConfig,
}

impl NetworkSimulator {
    /// Settings outside their valid range fall back to the defaults.
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Propagate activation from the given sensory inputs through the network.
    ///
    /// Returns a copy of `neurons` with `is_active` set, plus the activity of
    /// every neuron and which connections carried signal in the final pass.
    ///
    /// # Errors
    /// [`SimulationError::MalformedGraph`] if a connection references a neuron
    /// missing from `neurons`, [`SimulationError::DuplicateNeuron`] if two
    /// neurons share an id.
    pub fn propagate(
        &self,
        neurons: &[Neuron],
        connections: &[Connection],
        inputs: &InputSet,
    ) -> SimulationResult<(Vec<Neuron>, ActivationState)> {
        let index = index_neurons(neurons)?;
        let endpoints = resolve_endpoints(connections, &index)?;

        let mut activity: Vec<f64> = neurons
            .iter()
            .map(|n| {
                if n.kind == NeuronKind::Sensory && inputs.contains(&n.id) {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        let mut carried = vec![false; connections.len()];

        let gate = self.config.firing_gate;
        let tolerance = self.config.convergence_tolerance;

        let mut changed = true;
        let mut iterations = 0;

        while changed && iterations < self.config.max_iterations {
            changed = false;
            iterations += 1;

            let mut working = activity.clone();

            for (i, (conn, &(src, dst))) in connections.iter().zip(&endpoints).enumerate() {
                // Gate on the level the source had when the pass began.
                let source_level = activity[src];
                if source_level <= gate {
                    carried[i] = false;
                    continue;
                }

                let signal = source_level * neurons[src].output_strength * conn.weight;
                let signal = if conn.is_excitatory { signal } else { -signal };
                carried[i] = true;

                let mut level = (working[dst] + signal).clamp(0.0, 1.0);
                if level >= neurons[dst].activation_threshold {
                    level = 1.0;
                }

                if (level - activity[dst]).abs() > tolerance {
                    changed = true;
                }
                working[dst] = level;
            }

            activity = working;
        }

        let converged = !changed;
        debug!(
            "Propagation over {} neurons / {} connections finished after {} passes (converged: {})",
            neurons.len(),
            connections.len(),
            iterations,
            converged
        );

        let updated: Vec<Neuron> = neurons
            .iter()
            .zip(&activity)
            .map(|(n, &level)| {
                let mut copy = n.clone();
                copy.is_active = level >= n.activation_threshold;
                copy
            })
            .collect();

        let state = ActivationState {
            neuron_activity: neurons.iter().map(|n| n.id).zip(activity).collect(),
            connection_active: connections.iter().map(|c| c.id).zip(carried).collect(),
            iterations,
            converged,
        };

        Ok((updated, state))
    }
}

/// Propagate with the default [`SimulatorConfig`].
pub fn propagate(
    neurons: &[Neuron],
    connections: &[Connection],
    inputs: &InputSet,
) -> SimulationResult<(Vec<Neuron>, ActivationState)> {
    NetworkSimulator::default().propagate(neurons, connections, inputs)
}

/// Build the id → position map used for every lookup during a run.
fn index_neurons(neurons: &[Neuron]) -> SimulationResult<HashMap<NeuronId, usize>> {
    let mut index = HashMap::with_capacity(neurons.len());
    for (i, n) in neurons.iter().enumerate() {
        if index.insert(n.id, i).is_some() {
            return Err(SimulationError::DuplicateNeuron(n.id));
        }
    }
    Ok(index)
}

fn resolve_endpoints(
    connections: &[Connection],
    index: &HashMap<NeuronId, usize>,
) -> SimulationResult<Vec<(usize, usize)>> {
    connections
        .iter()
        .map(|conn| {
            let lookup = |id: NeuronId| {
                index
                    .get(&id)
                    .copied()
                    .ok_or(SimulationError::MalformedGraph {
                        connection: conn.id,
                        neuron: id,
                    })
            };
            Ok((lookup(conn.source())?, lookup(conn.target())?))
        })
        .collect()
}
