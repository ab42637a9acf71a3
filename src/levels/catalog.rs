//! Built-in campaign levels.
//!
//! Each level fixes the starting neurons and the success condition; the player
//! supplies the connections.

use std::collections::HashMap;

use crate::neurons::{
    Connection, Neuron, NeuronId, NeuronKind, SuccessCondition, SuccessPredicate,
};

/// Starting neuron of a level. Unset parameters take the [`Neuron`] defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeuronSetup {
    pub kind: NeuronKind,
    pub activation_threshold: Option<f64>,
    pub output_strength: Option<f64>,
}

impl NeuronSetup {
    pub fn new(kind: NeuronKind) -> Self {
        Self {
            kind,
            activation_threshold: None,
            output_strength: None,
        }
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.activation_threshold = Some(threshold);
        self
    }

    pub fn strength(mut self, strength: f64) -> Self {
        self.output_strength = Some(strength);
        self
    }

    pub fn spawn(&self) -> Neuron {
        let mut neuron = Neuron::new(self.kind);
        if let Some(threshold) = self.activation_threshold {
            neuron.activation_threshold = threshold;
        }
        if let Some(strength) = self.output_strength {
            neuron.output_strength = strength;
        }
        neuron
    }
}

/// A campaign level definition.
#[derive(Debug, Clone)]
pub struct LevelConfig {
    pub level_number: u32,
    pub title: String,
    pub task_description: String,
    pub hint: String,
    pub neurons: Vec<NeuronSetup>,
    /// Kind pairs the player is expected to connect, when the level says so.
    pub required_connections: Option<Vec<(NeuronKind, NeuronKind)>>,
    pub success_condition: SuccessCondition,
}

impl LevelConfig {
    /// Look up a campaign level. Levels past the authored ones fall back to a
    /// generic two-input layout.
    pub fn for_level(level: u32) -> Self {
        use NeuronKind::*;

        match level {
            1 => Self::build(
                1,
                "First Connection",
                "Create a connection from any sensory neuron to the motor neuron. Tap a sensory neuron to give it input, then press Activate.",
                "Long press on a neuron, drag to another, release to connect.",
                vec![NeuronSetup::new(Sensory), NeuronSetup::new(Motor)],
                SuccessCondition::ConnectAllToMotor,
            ),
            2 => Self::build(
                2,
                "AND Gate",
                "Connect both sensory neurons to the motor. The motor must fire ONLY when BOTH inputs are active.",
                "Two connections: Sensory 1 → Motor and Sensory 2 → Motor. Test with one input, the motor should stay off.",
                vec![
                    NeuronSetup::new(Sensory).strength(0.5),
                    NeuronSetup::new(Sensory).strength(0.5),
                    NeuronSetup::new(Motor).threshold(0.8),
                ],
                SuccessCondition::AndGate,
            ),
            3 => Self::build(
                3,
                "AND Gate",
                "Build AND logic: motor fires ONLY when BOTH sensory neurons receive input. Use an intermediate neuron.",
                "Intermediate neurons process information. Both inputs must reach the motor.",
                vec![
                    NeuronSetup::new(Sensory).strength(0.5),
                    NeuronSetup::new(Sensory).strength(0.5),
                    NeuronSetup::new(Intermediate),
                    NeuronSetup::new(Motor).threshold(0.8),
                ],
                SuccessCondition::AndGate,
            ),
            4 => Self::build(
                4,
                "Choice",
                "Connect the sensory neuron to the motor. Try different connection paths.",
                "Sometimes the simplest path is the best.",
                vec![
                    NeuronSetup::new(Sensory),
                    NeuronSetup::new(Intermediate),
                    NeuronSetup::new(Motor),
                ],
                SuccessCondition::ConnectAllToMotor,
            ),
            5 => Self::build(
                5,
                "Network",
                "Create a network where the motor fires when any sensory neuron is active. Use 2 sensory, 1 intermediate, 1 motor.",
                "OR logic: either input can trigger the output.",
                vec![
                    NeuronSetup::new(Sensory),
                    NeuronSetup::new(Sensory),
                    NeuronSetup::new(Intermediate),
                    NeuronSetup::new(Motor),
                ],
                SuccessCondition::OrGate,
            ),
            n => Self::build(
                n,
                &format!("Level {n}"),
                "Connect neurons and complete the task.",
                "Long press and drag to create connections.",
                vec![
                    NeuronSetup::new(Sensory),
                    NeuronSetup::new(Sensory),
                    NeuronSetup::new(Motor),
                ],
                SuccessCondition::ConnectAllToMotor,
            ),
        }
    }

    fn build(
        level_number: u32,
        title: &str,
        task_description: &str,
        hint: &str,
        neurons: Vec<NeuronSetup>,
        success_condition: SuccessCondition,
    ) -> Self {
        Self {
            level_number,
            title: title.to_string(),
            task_description: task_description.to_string(),
            hint: hint.to_string(),
            neurons,
            required_connections: None,
            success_condition,
        }
    }

    /// Instantiate the starting neurons with fresh ids, in definition order.
    pub fn spawn_neurons(&self) -> Vec<Neuron> {
        self.neurons.iter().map(NeuronSetup::spawn).collect()
    }

    /// The condition to evaluate. When the level lists required connections
    /// they are checked in place of the level's own condition.
    pub fn effective_condition(&self) -> SuccessCondition {
        match &self.required_connections {
            Some(pairs) => SuccessCondition::custom(RequiredConnections::new(pairs.clone())),
            None => self.success_condition.clone(),
        }
    }
}

// ============================================================================
// Required connections
// ============================================================================

/// Passes when a motor fires under the player's inputs and every listed
/// `(from, to)` kind pair is realised by at least one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredConnections {
    pairs: Vec<(NeuronKind, NeuronKind)>,
}

impl RequiredConnections {
    pub fn new(pairs: Vec<(NeuronKind, NeuronKind)>) -> Self {
        Self { pairs }
    }
}

impl SuccessPredicate for RequiredConnections {
    fn check(&self, neurons: &[Neuron], connections: &[Connection], active_inputs: &[NeuronId]) -> bool {
        if active_inputs.is_empty() {
            return false;
        }
        let motor_fires = neurons
            .iter()
            .any(|n| n.kind == NeuronKind::Motor && n.is_active);
        if !motor_fires {
            return false;
        }

        let kinds: HashMap<NeuronId, NeuronKind> = neurons.iter().map(|n| (n.id, n.kind)).collect();
        self.pairs.iter().all(|&(from, to)| {
            connections.iter().any(|c| {
                kinds.get(&c.source()) == Some(&from) && kinds.get(&c.target()) == Some(&to)
            })
        })
    }
}
