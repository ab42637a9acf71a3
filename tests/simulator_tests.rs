//! Behavioural tests for the network simulator and success conditions.
//!
//! Run with: cargo test --test simulator_tests

use neuron_garden::levels::{record_attempt, InMemoryProgress, LevelConfig, ProgressStore};
use neuron_garden::neurons::{
    evaluate, propagate, ActivationState, Connection, InputSet, NetworkSimulator,
    NetworkTopology, Neuron, NeuronId, NeuronKind, SimulatorConfig, SuccessCondition, MAX_PASSES,
};

const EPS: f64 = 1e-9;

fn inputs(ids: &[NeuronId]) -> InputSet {
    ids.iter().copied().collect()
}

fn activity_of(state: &ActivationState, n: &Neuron) -> f64 {
    state.activity(&n.id)
}

fn is_active(updated: &[Neuron], id: NeuronId) -> bool {
    updated.iter().any(|n| n.id == id && n.is_active)
}

/// Sensory → motor over a single excitatory connection.
fn direct_link() -> (Neuron, Neuron, Vec<Connection>) {
    let s = Neuron::new(NeuronKind::Sensory).threshold(0.5).strength(1.0);
    let m = Neuron::new(NeuronKind::Motor).threshold(0.5);
    let connections = vec![Connection::new(s.id, m.id).weight(1.0)];
    (s, m, connections)
}

/// Level 3 neurons wired so the intermediate only clears the firing gate when
/// both inputs are on: each input first inhibits it, then excites it by
/// exactly the gate level.
fn gated_and_network() -> (Vec<Neuron>, Vec<Connection>) {
    let neurons = LevelConfig::for_level(3).spawn_neurons();
    let (s1, s2, i, m) = (neurons[0].id, neurons[1].id, neurons[2].id, neurons[3].id);
    let connections = vec![
        Connection::new(s1, i).inhibitory(),
        Connection::new(s2, i).inhibitory(),
        Connection::new(s1, i).weight(0.6),
        Connection::new(s2, i).weight(0.6),
        Connection::new(i, m),
    ];
    (neurons, connections)
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_propagation_is_deterministic() {
    let (neurons, mut connections) = gated_and_network();
    // Add a feedback loop and a competing inhibitory edge for a richer trajectory.
    connections.push(Connection::new(neurons[3].id, neurons[2].id).weight(0.4));
    connections.push(Connection::new(neurons[2].id, neurons[3].id).weight(0.7).inhibitory());
    let active = inputs(&[neurons[0].id, neurons[1].id]);

    let (first_neurons, first_state) = propagate(&neurons, &connections, &active).unwrap();
    for _ in 0..5 {
        let (again_neurons, again_state) = propagate(&neurons, &connections, &active).unwrap();
        assert_eq!(again_neurons, first_neurons);
        assert_eq!(again_state, first_state);
    }
}

#[test]
fn test_oscillating_network_stops_at_iteration_cap() {
    // Excitation then inhibition into the same target: every pass lifts it
    // and drops it again, so it never settles.
    let a = Neuron::new(NeuronKind::Sensory);
    let b = Neuron::new(NeuronKind::Sensory);
    let t = Neuron::new(NeuronKind::Intermediate).threshold(0.8);
    let connections = vec![
        Connection::new(a.id, t.id).weight(0.6),
        Connection::new(b.id, t.id).weight(0.6).inhibitory(),
    ];

    let (_, state) =
        propagate(&[a.clone(), b.clone(), t.clone()], &connections, &inputs(&[a.id, b.id])).unwrap();

    assert_eq!(state.iterations, 20);
    assert!(!state.converged);
    assert!(activity_of(&state, &t).abs() < EPS);
}

#[test]
fn test_out_of_range_settings_keep_pass_cap_and_gate() {
    let a = Neuron::new(NeuronKind::Sensory);
    let b = Neuron::new(NeuronKind::Sensory);
    let t = Neuron::new(NeuronKind::Intermediate).threshold(0.8);
    let connections = vec![
        Connection::new(a.id, t.id).weight(0.6),
        Connection::new(b.id, t.id).weight(0.6).inhibitory(),
    ];
    let neurons = [a.clone(), b.clone(), t];

    let simulator = NetworkSimulator::new(SimulatorConfig {
        max_iterations: 500,
        firing_gate: f64::NAN,
        ..Default::default()
    });
    assert_eq!(simulator.config(), &SimulatorConfig::default());

    let (_, state) = simulator
        .propagate(&neurons, &connections, &inputs(&[a.id, b.id]))
        .unwrap();
    assert_eq!(state.iterations, MAX_PASSES);

    // An idle source stays gated.
    let (_, state) = simulator.propagate(&neurons, &connections, &inputs(&[a.id])).unwrap();
    assert!(!state.is_connection_active(&connections[1].id));

    let none = NetworkSimulator::new(SimulatorConfig {
        max_iterations: 0,
        ..Default::default()
    });
    let (_, state) = none.propagate(&neurons, &connections, &inputs(&[a.id])).unwrap();
    assert!(state.iterations >= 1);
}

#[test]
fn test_firing_gate_boundary() {
    fn run(excitation: f64) -> (Neuron, Connection, Vec<Neuron>, ActivationState) {
        let s = Neuron::new(NeuronKind::Sensory);
        let relay = Neuron::new(NeuronKind::Intermediate).threshold(0.9);
        let m = Neuron::new(NeuronKind::Motor).threshold(0.5);
        let out = Connection::new(relay.id, m.id);
        let connections = vec![
            Connection::new(s.id, relay.id).weight(0.5).inhibitory(),
            Connection::new(s.id, relay.id).weight(excitation),
            out.clone(),
        ];
        let neurons = vec![s.clone(), relay.clone(), m.clone()];
        let (updated, state) = propagate(&neurons, &connections, &inputs(&[s.id])).unwrap();
        (m, out, updated, state)
    }

    // Relay settles at exactly 0.3: gated, the motor never hears from it.
    let (m, out, updated, state) = run(0.3);
    assert!(!state.is_connection_active(&out.id));
    assert!(activity_of(&state, &m).abs() < EPS);
    assert!(!is_active(&updated, m.id));

    // Relay settles just above the gate: its signal reaches the motor.
    let (m, out, updated, state) = run(0.30001);
    assert!(state.is_connection_active(&out.id));
    assert!((activity_of(&state, &m) - 1.0).abs() < EPS);
    assert!(is_active(&updated, m.id));
}

#[test]
fn test_saturation_forces_exactly_one() {
    let single_pass = NetworkSimulator::new(SimulatorConfig {
        max_iterations: 1,
        ..Default::default()
    });

    let s = Neuron::new(NeuronKind::Sensory);
    let low = Neuron::new(NeuronKind::Motor).threshold(0.5);
    let high = Neuron::new(NeuronKind::Motor).threshold(0.9);
    let connections = vec![
        Connection::new(s.id, low.id).weight(0.6),
        Connection::new(s.id, high.id).weight(0.6),
    ];

    let (_, state) = single_pass
        .propagate(&[s.clone(), low.clone(), high.clone()], &connections, &inputs(&[s.id]))
        .unwrap();

    assert_eq!(activity_of(&state, &low), 1.0);
    assert!((activity_of(&state, &high) - 0.6).abs() < EPS);
}

#[test]
fn test_isolated_neurons_stay_silent() {
    let (s, m, connections) = direct_link();
    let idle_sensory = Neuron::new(NeuronKind::Sensory);
    let orphan = Neuron::new(NeuronKind::Intermediate).threshold(0.0);
    let modulator = Neuron::new(NeuronKind::Modulator);
    let neurons = vec![s.clone(), m, idle_sensory.clone(), orphan.clone(), modulator.clone()];

    let (updated, state) = propagate(&neurons, &connections, &inputs(&[s.id])).unwrap();

    for n in [&idle_sensory, &orphan, &modulator] {
        assert_eq!(activity_of(&state, n), 0.0);
    }
    assert!(!is_active(&updated, idle_sensory.id));
    assert!(!is_active(&updated, modulator.id));
    // A zero threshold is met by zero activity.
    assert!(is_active(&updated, orphan.id));
}

#[test]
fn test_persistent_source_saturates_regardless_of_weight() {
    let s = Neuron::new(NeuronKind::Sensory);
    let m = Neuron::new(NeuronKind::Motor).threshold(0.95);
    let connections = vec![Connection::new(s.id, m.id).weight(0.1)];

    let (updated, state) = propagate(&[s.clone(), m.clone()], &connections, &inputs(&[s.id])).unwrap();

    assert_eq!(activity_of(&state, &m), 1.0);
    assert!(is_active(&updated, m.id));
    assert!(state.converged);
    assert!(state.iterations > 5);
}

#[test]
fn test_inactive_source_marks_connection_idle() {
    let (s, m, connections) = direct_link();
    let (_, state) = propagate(&[s, m], &connections, &InputSet::new()).unwrap();
    assert!(!state.is_connection_active(&connections[0].id));
    assert_eq!(state.connection_active.len(), 1);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_direct_link_fires_motor() {
    let (s, m, connections) = direct_link();
    let neurons = vec![s.clone(), m.clone()];
    let active = inputs(&[s.id]);

    let (updated, _) = propagate(&neurons, &connections, &active).unwrap();
    assert!(is_active(&updated, m.id));
    assert!(evaluate(&neurons, &connections, &active, &SuccessCondition::ConnectAllToMotor).unwrap());
}

#[test]
fn test_direct_link_without_input_fails() {
    let (s, m, connections) = direct_link();
    let neurons = vec![s, m.clone()];
    let active = InputSet::new();

    let (updated, _) = propagate(&neurons, &connections, &active).unwrap();
    assert!(!is_active(&updated, m.id));
    assert!(!evaluate(&neurons, &connections, &active, &SuccessCondition::ConnectAllToMotor).unwrap());
}

#[test]
fn test_direct_link_needs_an_active_input() {
    // A zero-threshold motor fires with no input at all; only the empty
    // input set fails the check.
    let s = Neuron::new(NeuronKind::Sensory);
    let m = Neuron::new(NeuronKind::Motor).threshold(0.0);
    let neurons = vec![s.clone(), m.clone()];
    let connections = vec![Connection::new(s.id, m.id)];
    let condition = SuccessCondition::ConnectAllToMotor;

    let (updated, _) = propagate(&neurons, &connections, &InputSet::new()).unwrap();
    assert!(is_active(&updated, m.id));
    assert!(!evaluate(&neurons, &connections, &InputSet::new(), &condition).unwrap());
    assert!(evaluate(&neurons, &connections, &inputs(&[s.id]), &condition).unwrap());
}

#[test]
fn test_or_gate_needs_an_active_input() {
    let s = Neuron::new(NeuronKind::Sensory);
    let i = Neuron::new(NeuronKind::Intermediate);
    let m = Neuron::new(NeuronKind::Motor).threshold(0.0);
    let neurons = vec![s.clone(), i, m.clone()];
    let connections = vec![Connection::new(s.id, neurons[1].id)];
    let condition = SuccessCondition::OrGate;

    let (updated, _) = propagate(&neurons, &connections, &InputSet::new()).unwrap();
    assert!(is_active(&updated, m.id));
    assert!(!evaluate(&neurons, &connections, &InputSet::new(), &condition).unwrap());
    assert!(evaluate(&neurons, &connections, &inputs(&[s.id]), &condition).unwrap());
}

#[test]
fn test_direct_and_wiring_saturates_on_one_input() {
    // Both inputs wired straight to a 0.8 motor. Carried-forward activity
    // keeps adding 0.5 per pass, so a single input saturates the motor too
    // and the AND check fails.
    let s1 = Neuron::new(NeuronKind::Sensory);
    let s2 = Neuron::new(NeuronKind::Sensory);
    let m = Neuron::new(NeuronKind::Motor).threshold(0.8);
    let neurons = vec![s1.clone(), s2.clone(), m.clone()];
    let connections = vec![
        Connection::new(s1.id, m.id).weight(0.5),
        Connection::new(s2.id, m.id).weight(0.5),
    ];

    let (both, state) = propagate(&neurons, &connections, &inputs(&[s1.id, s2.id])).unwrap();
    assert!(is_active(&both, m.id));
    assert_eq!(state.iterations, 2);

    let (only_first, state) = propagate(&neurons, &connections, &inputs(&[s1.id])).unwrap();
    assert!(is_active(&only_first, m.id));
    assert_eq!(state.iterations, 3);

    assert!(!evaluate(&neurons, &connections, &InputSet::new(), &SuccessCondition::AndGate).unwrap());
}

#[test]
fn test_or_gate_adjacency_without_motor_path() {
    let s = Neuron::new(NeuronKind::Sensory);
    let i = Neuron::new(NeuronKind::Intermediate);
    let m = Neuron::new(NeuronKind::Motor);
    let neurons = vec![s.clone(), i.clone(), m.clone()];
    let connections = vec![Connection::new(s.id, i.id)];
    let active = inputs(&[s.id]);

    let (updated, _) = propagate(&neurons, &connections, &active).unwrap();
    assert!(is_active(&updated, i.id));
    assert!(!is_active(&updated, m.id));
    assert!(!evaluate(&neurons, &connections, &active, &SuccessCondition::OrGate).unwrap());

    let topology = NetworkTopology::from_snapshot(&neurons, &connections).unwrap();
    assert_eq!(topology.motors_unreachable_from(&active), vec![m.id]);
}

#[test]
fn test_edge_order_changes_outcome() {
    let excite = Neuron::new(NeuronKind::Sensory);
    let inhibit = Neuron::new(NeuronKind::Sensory);
    let target = Neuron::new(NeuronKind::Intermediate).threshold(0.5);
    let neurons = vec![excite.clone(), inhibit.clone(), target.clone()];
    let active = inputs(&[excite.id, inhibit.id]);

    let up = Connection::new(excite.id, target.id).weight(0.6);
    let down = Connection::new(inhibit.id, target.id).weight(0.6).inhibitory();

    // Excitation first: 0.6 saturates to 1.0, then inhibition leaves 0.4.
    let (excite_first, state) =
        propagate(&neurons, &[up.clone(), down.clone()], &active).unwrap();
    assert!((activity_of(&state, &target) - 0.4).abs() < EPS);
    assert!(!is_active(&excite_first, target.id));

    // Inhibition first: 1.0 drops to 0.4, then excitation saturates again.
    let (inhibit_first, state) = propagate(&neurons, &[down, up], &active).unwrap();
    assert_eq!(activity_of(&state, &target), 1.0);
    assert!(is_active(&inhibit_first, target.id));
}

// ============================================================================
// Success conditions
// ============================================================================

#[test]
fn test_or_gate_either_input_fires() {
    let neurons = LevelConfig::for_level(5).spawn_neurons();
    let (s1, s2, i, m) = (neurons[0].id, neurons[1].id, neurons[2].id, neurons[3].id);
    let connections = vec![
        Connection::new(s1, i),
        Connection::new(s2, i),
        Connection::new(i, m),
    ];

    for active in [inputs(&[s1]), inputs(&[s2]), inputs(&[s1, s2])] {
        assert!(evaluate(&neurons, &connections, &active, &SuccessCondition::OrGate).unwrap());
    }
    assert!(!evaluate(&neurons, &connections, &InputSet::new(), &SuccessCondition::OrGate).unwrap());
}

#[test]
fn test_and_gate_solved_through_gated_relay() {
    let (neurons, connections) = gated_and_network();
    let (s1, s2, m) = (neurons[0].id, neurons[1].id, neurons[3].id);

    let (alone, _) = propagate(&neurons, &connections, &inputs(&[s1])).unwrap();
    assert!(!is_active(&alone, m));
    let (alone, _) = propagate(&neurons, &connections, &inputs(&[s2])).unwrap();
    assert!(!is_active(&alone, m));
    let (together, _) = propagate(&neurons, &connections, &inputs(&[s1, s2])).unwrap();
    assert!(is_active(&together, m));

    // Caller inputs are irrelevant to the AND probe.
    let condition = LevelConfig::for_level(3).success_condition;
    assert!(evaluate(&neurons, &connections, &InputSet::new(), &condition).unwrap());
    assert!(evaluate(&neurons, &connections, &inputs(&[s1]), &condition).unwrap());
}

#[test]
fn test_and_gate_probes_first_two_sensory_in_order() {
    let (mut neurons, mut connections) = gated_and_network();
    let motor = neurons[3].id;

    // An extra sensory neuron wired straight to the motor fires it alone.
    let extra = Neuron::new(NeuronKind::Sensory);
    connections.push(Connection::new(extra.id, motor));

    // Listed last it is never probed.
    neurons.push(extra.clone());
    assert!(evaluate(&neurons, &connections, &InputSet::new(), &SuccessCondition::AndGate).unwrap());

    // Listed first it becomes probe A and breaks the gate.
    neurons.pop();
    neurons.insert(0, extra);
    assert!(!evaluate(&neurons, &connections, &InputSet::new(), &SuccessCondition::AndGate).unwrap());
}

#[test]
fn test_malformed_graph_surfaces_from_evaluate() {
    let (s, m, mut connections) = direct_link();
    connections.push(Connection::new(m.id, uuid::Uuid::new_v4()));
    let result = evaluate(&[s.clone(), m], &connections, &inputs(&[s.id]), &SuccessCondition::OrGate);
    assert!(result.is_err());
}

#[test]
fn test_verdict_unlocks_next_level() {
    let level = LevelConfig::for_level(1);
    let neurons = level.spawn_neurons();
    let connections = vec![Connection::new(neurons[0].id, neurons[1].id)];
    let mut progress = InMemoryProgress::new();

    let failed = evaluate(&neurons, &connections, &InputSet::new(), &level.success_condition).unwrap();
    record_attempt(&mut progress, level.level_number, failed);
    assert!(!progress.is_unlocked(2));

    let passed = evaluate(&neurons, &connections, &inputs(&[neurons[0].id]), &level.success_condition).unwrap();
    assert!(record_attempt(&mut progress, level.level_number, passed));
    assert!(progress.is_unlocked(2));
}
