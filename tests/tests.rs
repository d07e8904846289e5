mod recognizer;

use sequence_automata::{Result, StateGraph};

/// The sequences of the worked scenario used across the integration tests:
/// an alphabet of four symbols and five registered sequences, yielding a
/// twelve state automaton.
const SCENARIO_SEQUENCES: &[&[usize]] = &[
    &[1, 3],
    &[2, 2, 2],
    &[2, 2, 1, 1],
    &[2, 2, 2, 2],
    &[2, 2, 2, 3],
];

fn scenario() -> Result<StateGraph> {
    StateGraph::new(4, SCENARIO_SEQUENCES)
}
