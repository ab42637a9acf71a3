//! Structural view of a network for diagnostics.
//!
//! Wraps a `petgraph::DiGraph` with an id ↔ `NodeIndex` mapping so the CLI
//! can explain why a check failed ("the motor is unreachable from the active
//! inputs"). Nothing here feeds back into propagation or verdicts.

use std::collections::HashMap;

use petgraph::algo::{has_path_connecting, is_cyclic_directed};
use petgraph::graph::{DiGraph, NodeIndex};

use super::error::{SimulationError, SimulationResult};
use super::models::{Connection, ConnectionId, Neuron, NeuronId, NeuronKind};

#[derive(Debug, Clone)]
pub struct NetworkTopology {
    graph: DiGraph<(NeuronId, NeuronKind), ConnectionId>,
    id_to_index: HashMap<NeuronId, NodeIndex>,
}

impl NetworkTopology {
    /// Build the directed graph of a snapshot.
    pub fn from_snapshot(neurons: &[Neuron], connections: &[Connection]) -> SimulationResult<Self> {
        let mut graph = DiGraph::with_capacity(neurons.len(), connections.len());
        let mut id_to_index = HashMap::with_capacity(neurons.len());

        for n in neurons {
            let idx = graph.add_node((n.id, n.kind));
            if id_to_index.insert(n.id, idx).is_some() {
                return Err(SimulationError::DuplicateNeuron(n.id));
            }
        }

        for c in connections {
            let index_of = |id: NeuronId| {
                id_to_index
                    .get(&id)
                    .copied()
                    .ok_or(SimulationError::MalformedGraph {
                        connection: c.id,
                        neuron: id,
                    })
            };
            let from = index_of(c.source())?;
            let to = index_of(c.target())?;
            graph.add_edge(from, to, c.id);
        }

        Ok(Self { graph, id_to_index })
    }

    /// Whether a directed path leads from `from` to `to`. A neuron reaches
    /// itself.
    pub fn reaches(&self, from: NeuronId, to: NeuronId) -> bool {
        match (self.id_to_index.get(&from), self.id_to_index.get(&to)) {
            (Some(&a), Some(&b)) => has_path_connecting(&self.graph, a, b, None),
            _ => false,
        }
    }

    /// Motor neurons that no active input can reach, in snapshot order.
    pub fn motors_unreachable_from<'a, I>(&self, inputs: I) -> Vec<NeuronId>
    where
        I: IntoIterator<Item = &'a NeuronId>,
    {
        let inputs: Vec<NeuronId> = inputs.into_iter().copied().collect();
        self.graph
            .node_weights()
            .filter(|(_, kind)| *kind == NeuronKind::Motor)
            .map(|(id, _)| *id)
            .filter(|motor| !inputs.iter().any(|input| self.reaches(*input, *motor)))
            .collect()
    }

    /// Whether the network contains a feedback loop.
    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }
}
