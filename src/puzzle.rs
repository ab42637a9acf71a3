//! Puzzle files.
//!
//! A puzzle file describes a network by human-readable labels so it can be
//! written by hand and fed to the `garden` CLI. YAML and JSON are accepted;
//! the format is picked from the file extension.
//!
//! ```yaml
//! neurons:
//!   - { label: left, kind: sensory, strength: 0.5 }
//!   - { label: out, kind: motor, threshold: 0.8 }
//! connections:
//!   - { from: left, to: out, weight: 0.5 }
//! inputs: [left]
//! condition: connect_all_to_motor
//! ```
//!
//! Labels become deterministic UUID v5 ids, so the same file always yields
//! the same snapshot.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::levels::RequiredConnections;
use crate::neurons::{
    ConditionKind, Connection, InputSet, NetworkTopology, Neuron, NeuronId, NeuronKind,
    SimulationResult, SuccessCondition,
};

/// Built-in conditions that can be named in a puzzle file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleCondition {
    #[default]
    ConnectAllToMotor,
    OrGate,
    AndGate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuronEntry {
    pub label: String,
    pub kind: NeuronKind,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub strength: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionEntry {
    pub from: String,
    pub to: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_excitatory")]
    pub excitatory: bool,
    #[serde(default)]
    pub delay: Option<f64>,
}

fn default_weight() -> f64 {
    Connection::DEFAULT_WEIGHT
}

fn default_excitatory() -> bool {
    true
}

/// On-disk puzzle description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleFile {
    pub neurons: Vec<NeuronEntry>,
    #[serde(default)]
    pub connections: Vec<ConnectionEntry>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub condition: PuzzleCondition,
    /// When present, replaces `condition` with a required-connections check.
    #[serde(default)]
    pub required_connections: Option<Vec<(NeuronKind, NeuronKind)>>,
}

/// A resolved puzzle, ready for the simulator.
#[derive(Debug, Clone)]
pub struct Puzzle {
    pub neurons: Vec<Neuron>,
    pub connections: Vec<Connection>,
    pub inputs: InputSet,
    pub condition: SuccessCondition,
    labels: HashMap<NeuronId, String>,
}

impl Puzzle {
    /// Label a neuron was declared with, falling back to its id.
    pub fn label(&self, id: &NeuronId) -> String {
        self.labels
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    /// Structural reasons a failing network may not work: no active input,
    /// motors no input reaches, feedback loops.
    pub fn failure_hints(&self) -> SimulationResult<Vec<String>> {
        let topology = NetworkTopology::from_snapshot(&self.neurons, &self.connections)?;
        let mut hints = Vec::new();

        // AND checks drive their own inputs.
        if self.inputs.is_empty() && self.condition.kind() != ConditionKind::AndGate {
            hints.push("no sensory input is active".to_string());
        }
        for motor in topology.motors_unreachable_from(&self.inputs) {
            hints.push(format!(
                "motor '{}' is unreachable from the active inputs",
                self.label(&motor)
            ));
        }
        if topology.has_cycle() {
            hints.push("the network contains a feedback loop".to_string());
        }

        Ok(hints)
    }
}

impl PuzzleFile {
    /// Read and parse a puzzle file. `.json` files are parsed as JSON,
    /// everything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read puzzle file {}", path.display()))?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            serde_json::from_str(&contents)
                .with_context(|| format!("Invalid JSON puzzle {}", path.display()))
        } else {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Invalid YAML puzzle {}", path.display()))
        }
    }

    /// Resolve labels into a simulator snapshot.
    pub fn into_puzzle(self) -> Result<Puzzle> {
        let mut ids: HashMap<String, NeuronId> = HashMap::with_capacity(self.neurons.len());
        let mut labels = HashMap::with_capacity(self.neurons.len());
        let mut neurons = Vec::with_capacity(self.neurons.len());

        for entry in &self.neurons {
            let id = neuron_id(&entry.label);
            if ids.insert(entry.label.clone(), id).is_some() {
                bail!("Duplicate neuron label '{}'", entry.label);
            }
            labels.insert(id, entry.label.clone());

            let mut neuron = Neuron::with_id(id, entry.kind);
            if let Some(threshold) = entry.threshold {
                neuron.activation_threshold = threshold;
            }
            if let Some(strength) = entry.strength {
                neuron.output_strength = strength;
            }
            neurons.push(neuron);
        }

        let resolve = |label: &str| {
            ids.get(label)
                .copied()
                .with_context(|| format!("Unknown neuron label '{}'", label))
        };

        let mut connections = Vec::with_capacity(self.connections.len());
        for (position, entry) in self.connections.iter().enumerate() {
            let from = resolve(&entry.from)?;
            let to = resolve(&entry.to)?;
            let id = Uuid::new_v5(
                &Uuid::NAMESPACE_OID,
                format!("connection:{}:{}->{}", position, entry.from, entry.to).as_bytes(),
            );

            let mut connection = Connection::with_id(id, from, to).weight(entry.weight);
            connection.is_excitatory = entry.excitatory;
            if let Some(delay) = entry.delay {
                connection.delay = delay;
            }
            connections.push(connection);
        }

        let inputs = self
            .inputs
            .iter()
            .map(|label| resolve(label))
            .collect::<Result<InputSet>>()?;

        let condition = match self.required_connections {
            Some(pairs) => SuccessCondition::custom(RequiredConnections::new(pairs)),
            None => match self.condition {
                PuzzleCondition::ConnectAllToMotor => SuccessCondition::ConnectAllToMotor,
                PuzzleCondition::OrGate => SuccessCondition::OrGate,
                PuzzleCondition::AndGate => SuccessCondition::AndGate,
            },
        };

        Ok(Puzzle {
            neurons,
            connections,
            inputs,
            condition,
            labels,
        })
    }
}

fn neuron_id(label: &str) -> NeuronId {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("neuron:{}", label).as_bytes())
}
