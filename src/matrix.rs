use alloc::{collections::VecDeque, vec, vec::Vec};

use crate::{
    automaton::Automaton,
    error::IncompleteGraphError,
    graph::{StateGraph, ROOT},
    id::{SequenceID, StateID},
};

/// The transitions of a [`StateGraph`], baked into a flat row-major table.
///
/// The table holds `alphabet_len * state_count` entries; the entry at
/// `state * alphabet_len + symbol` is the id of the state reached by
/// consuming `symbol` in `state`. A second table of `state_count` entries
/// records each state's sequence id, so the matrix alone can drive a
/// [`Recognizer`](crate::Recognizer) or a hand-rolled stepping loop with
/// one slice lookup per symbol and no graph traversal.
///
/// A matrix steps exactly like the graph it was flattened from: for every
/// input stream, the sequence of state ids and sequence ids observed
/// through either is identical.
#[derive(Clone, Debug)]
pub struct TransitionMatrix {
    alphabet_len: usize,
    table: Vec<StateID>,
    sequences: Vec<SequenceID>,
}

impl TransitionMatrix {
    /// Flatten the given graph.
    ///
    /// Walks the graph breadth first from the root, visiting every state
    /// exactly once, and records each state's outgoing edges into its row.
    /// Fails with an [`IncompleteGraphError`] when the graph has fewer
    /// states than its alphabet requires or when the walk reaches an edge
    /// that was never filled in; both indicate a graph that has not
    /// finished construction.
    pub fn from_graph(
        graph: &StateGraph,
    ) -> Result<TransitionMatrix, IncompleteGraphError> {
        let alphabet_len = graph.alphabet_len();
        let state_count = graph.state_count();
        if state_count < alphabet_len + 1 {
            return Err(IncompleteGraphError::underpopulated(
                state_count,
                alphabet_len,
            ));
        }
        let mut table = vec![StateID::ZERO; alphabet_len * state_count];
        let mut sequences = vec![SequenceID::ZERO; state_count];
        let mut queued = vec![false; state_count];
        let mut queue = VecDeque::new();
        queue.push_back(ROOT);
        queued[ROOT] = true;
        while let Some(id) = queue.pop_front() {
            sequences[id] = graph.sequence(id);
            let row = id.as_usize() * alphabet_len;
            for symbol in 0..alphabet_len {
                let target = match graph.transition(id, symbol) {
                    Some(target) => target,
                    None => {
                        return Err(IncompleteGraphError::missing_transition(
                            id, symbol,
                        ));
                    }
                };
                table[row + symbol] = target;
                if !queued[target] {
                    queued[target] = true;
                    queue.push_back(target);
                }
            }
        }
        trace!(
            "flattened {} states into a {} entry transition table",
            state_count,
            table.len(),
        );
        Ok(TransitionMatrix { alphabet_len, table, sequences })
    }

    /// Returns the number of symbols in this matrix's alphabet.
    pub fn alphabet_len(&self) -> usize {
        self.alphabet_len
    }

    /// Returns the total number of states in this matrix.
    pub fn state_count(&self) -> usize {
        self.sequences.len()
    }

    /// Returns the state reached by consuming `symbol` in state `current`.
    ///
    /// # Panics
    ///
    /// Panics if `current` does not identify a state of this matrix or if
    /// `symbol` is not within `[0, alphabet_len)`.
    #[inline]
    pub fn next_state(&self, current: StateID, symbol: usize) -> StateID {
        assert!(symbol < self.alphabet_len, "symbol outside the alphabet");
        self.table[current.as_usize() * self.alphabet_len + symbol]
    }

    /// Returns the sequence id recognized when the given state is current.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not identify a state of this matrix.
    #[inline]
    pub fn sequence(&self, id: StateID) -> SequenceID {
        self.sequences[id]
    }

    /// Returns the raw row-major transition table, with the entry for
    /// `(state, symbol)` at index `state * alphabet_len + symbol`.
    pub fn transitions(&self) -> &[StateID] {
        &self.table
    }

    /// Returns the sequence id table, indexed by state id.
    pub fn sequences(&self) -> &[SequenceID] {
        &self.sequences
    }

    /// Returns the heap memory usage, in bytes, of this matrix.
    pub fn memory_usage(&self) -> usize {
        self.table.len() * core::mem::size_of::<StateID>()
            + self.sequences.len() * core::mem::size_of::<SequenceID>()
    }
}

impl Automaton for TransitionMatrix {
    fn alphabet_len(&self) -> usize {
        TransitionMatrix::alphabet_len(self)
    }

    fn next_state(&self, current: StateID, symbol: usize) -> StateID {
        TransitionMatrix::next_state(self, current, symbol)
    }

    fn sequence(&self, id: StateID) -> SequenceID {
        TransitionMatrix::sequence(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underpopulated_graph() {
        // A graph that never ran its construction phases has only the
        // root state and must be rejected.
        let graph = StateGraph::with_root(3);
        assert!(TransitionMatrix::from_graph(&graph).is_err());
    }

    #[test]
    fn graph_missing_transitions() {
        let sequences: &[&[usize]] = &[&[0, 1]];
        let mut graph = StateGraph::with_root(2);
        crate::build::insert_sequences(&mut graph, sequences).unwrap();
        crate::build::resolve_sequences(&mut graph);
        // Completion never ran, so the walk hits an unfilled edge.
        assert!(TransitionMatrix::from_graph(&graph).is_err());
    }

    #[test]
    fn minimal_graph_matrices() {
        for alphabet_len in 1..100 {
            let graph = StateGraph::minimal(alphabet_len).unwrap();
            let matrix = graph.to_transition_matrix().unwrap();

            let entries = alphabet_len * (alphabet_len + 1);
            assert_eq!(entries, matrix.transitions().len());
            for (i, target) in matrix.transitions().iter().enumerate() {
                assert_eq!(i % alphabet_len + 1, target.as_usize());
            }
        }
    }

    #[test]
    fn matrix_mirrors_graph() {
        let sequences: &[&[usize]] = &[
            &[1, 3],
            &[2, 2, 2],
            &[2, 2, 1, 1],
            &[2, 2, 2, 2],
            &[2, 2, 2, 3],
        ];
        let graph = StateGraph::new(4, sequences).unwrap();
        let matrix = graph.to_transition_matrix().unwrap();

        assert_eq!(graph.alphabet_len(), matrix.alphabet_len());
        assert_eq!(graph.state_count(), matrix.state_count());
        for id in 0..graph.state_count() {
            let id = StateID::must(id);
            assert_eq!(graph.sequence(id), matrix.sequence(id));
            for symbol in 0..graph.alphabet_len() {
                assert_eq!(
                    graph.next_state(id, symbol),
                    matrix.next_state(id, symbol),
                );
            }
        }
    }

    #[test]
    fn memory_usage_is_nonzero() {
        let graph = StateGraph::minimal(2).unwrap();
        let matrix = graph.to_transition_matrix().unwrap();
        assert!(matrix.memory_usage() > 0);
    }
}
