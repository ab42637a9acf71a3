//! Level success conditions.
//!
//! Each condition re-runs the propagator on the player's network and decides
//! whether the level is solved. Only [`SuccessCondition::AndGate`] probes the
//! network with inputs of its own choosing; the others judge the caller's
//! inputs.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::activation::{InputSet, NetworkSimulator};
use super::error::SimulationResult;
use super::models::{Connection, Neuron, NeuronId, NeuronKind};

/// A level-specific verdict over a network that has already been propagated.
///
/// Implemented for plain closures, so a level can supply
/// `|neurons, connections, inputs| ...` directly.
pub trait SuccessPredicate: Send + Sync {
    fn check(&self, neurons: &[Neuron], connections: &[Connection], active_inputs: &[NeuronId]) -> bool;
}

impl<F> SuccessPredicate for F
where
    F: Fn(&[Neuron], &[Connection], &[NeuronId]) -> bool + Send + Sync,
{
    fn check(&self, neurons: &[Neuron], connections: &[Connection], active_inputs: &[NeuronId]) -> bool {
        self(neurons, connections, active_inputs)
    }
}

/// What a level asks of the player's network.
#[derive(Clone)]
pub enum SuccessCondition {
    /// A direct sensory → motor connection exists and a motor fires.
    ConnectAllToMotor,
    /// Some connection leads out of a sensory or intermediate neuron into a
    /// motor or intermediate one, and a motor fires.
    OrGate,
    /// The motor fires for the first two sensory neurons together but for
    /// neither alone.
    AndGate,
    /// Verdict delegated to a level-supplied predicate.
    Custom(Arc<dyn SuccessPredicate>),
}

impl SuccessCondition {
    pub fn custom<P>(predicate: P) -> Self
    where
        P: SuccessPredicate + 'static,
    {
        Self::Custom(Arc::new(predicate))
    }

    pub fn kind(&self) -> ConditionKind {
        match self {
            Self::ConnectAllToMotor => ConditionKind::ConnectAllToMotor,
            Self::OrGate => ConditionKind::OrGate,
            Self::AndGate => ConditionKind::AndGate,
            Self::Custom(_) => ConditionKind::Custom,
        }
    }
}

impl std::fmt::Debug for SuccessCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Custom(_) => f.write_str("Custom(..)"),
            other => write!(f, "{:?}", other.kind()),
        }
    }
}

/// Discriminant of a [`SuccessCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    ConnectAllToMotor,
    OrGate,
    AndGate,
    Custom,
}

impl std::fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectAllToMotor => write!(f, "connect_all_to_motor"),
            Self::OrGate => write!(f, "or_gate"),
            Self::AndGate => write!(f, "and_gate"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl NetworkSimulator {
    /// Decide whether the network satisfies `condition`.
    ///
    /// An unsolved network is `Ok(false)`; only a malformed snapshot is an
    /// error.
    pub fn check_success(
        &self,
        neurons: &[Neuron],
        connections: &[Connection],
        inputs: &InputSet,
        condition: &SuccessCondition,
    ) -> SimulationResult<bool> {
        let passed = match condition {
            SuccessCondition::ConnectAllToMotor => {
                let updated = self.settle(neurons, connections, inputs)?;
                let direct_link = has_link(neurons, connections, |from, to| {
                    from == NeuronKind::Sensory && to == NeuronKind::Motor
                });
                direct_link && any_motor_fires(&updated) && !inputs.is_empty()
            }
            SuccessCondition::OrGate => {
                let updated = self.settle(neurons, connections, inputs)?;
                let relay_link = has_link(neurons, connections, |from, to| {
                    matches!(from, NeuronKind::Sensory | NeuronKind::Intermediate)
                        && matches!(to, NeuronKind::Motor | NeuronKind::Intermediate)
                });
                relay_link && any_motor_fires(&updated) && !inputs.is_empty()
            }
            SuccessCondition::AndGate => self.check_and_gate(neurons, connections)?,
            SuccessCondition::Custom(predicate) => {
                let updated = self.settle(neurons, connections, inputs)?;
                let active: Vec<NeuronId> = inputs.iter().copied().collect();
                predicate.check(&updated, connections, &active)
            }
        };

        debug!("{} check: {}", condition.kind(), passed);
        Ok(passed)
    }

    fn settle(
        &self,
        neurons: &[Neuron],
        connections: &[Connection],
        inputs: &InputSet,
    ) -> SimulationResult<Vec<Neuron>> {
        self.propagate(neurons, connections, inputs)
            .map(|(updated, _)| updated)
    }

    /// Probe the first two sensory neurons alone and together.
    fn check_and_gate(&self, neurons: &[Neuron], connections: &[Connection]) -> SimulationResult<bool> {
        let sensory: Vec<NeuronId> = neurons
            .iter()
            .filter(|n| n.kind == NeuronKind::Sensory)
            .map(|n| n.id)
            .take(2)
            .collect();

        let &[a, b] = sensory.as_slice() else {
            debug!(
                "and_gate check: insufficient sensory neurons ({} found, 2 needed)",
                sensory.len()
            );
            return Ok(false);
        };

        let Some(motor) = neurons.iter().find(|n| n.kind == NeuronKind::Motor).map(|n| n.id) else {
            debug!("and_gate check: no motor neuron");
            return Ok(false);
        };

        let motor_fires = |probe: &[NeuronId]| -> SimulationResult<bool> {
            let inputs: InputSet = probe.iter().copied().collect();
            let (updated, _) = self.propagate(neurons, connections, &inputs)?;
            Ok(updated.iter().any(|n| n.id == motor && n.is_active))
        };

        let only_a = motor_fires(&[a])?;
        let only_b = motor_fires(&[b])?;
        let both = motor_fires(&[a, b])?;

        debug!(
            "and_gate check: only_a={}, only_b={}, both={}",
            only_a, only_b, both
        );
        Ok(both && !only_a && !only_b)
    }
}

/// Evaluate with the default simulator configuration.
pub fn evaluate(
    neurons: &[Neuron],
    connections: &[Connection],
    inputs: &InputSet,
    condition: &SuccessCondition,
) -> SimulationResult<bool> {
    NetworkSimulator::default().check_success(neurons, connections, inputs, condition)
}

fn any_motor_fires(neurons: &[Neuron]) -> bool {
    neurons
        .iter()
        .any(|n| n.kind == NeuronKind::Motor && n.is_active)
}

/// Adjacency test on kinds only; this is not a reachability search.
fn has_link<F>(neurons: &[Neuron], connections: &[Connection], accept: F) -> bool
where
    F: Fn(NeuronKind, NeuronKind) -> bool,
{
    let kinds: HashMap<NeuronId, NeuronKind> = neurons.iter().map(|n| (n.id, n.kind)).collect();
    connections.iter().any(|c| {
        match (kinds.get(&c.source()), kinds.get(&c.target())) {
            (Some(&from), Some(&to)) => accept(from, to),
            _ => false,
        }
    })
}
