use alloc::{vec, vec::Vec};

use crate::{
    error::{Error, Result},
    graph::{StateGraph, ROOT},
    id::{SequenceID, StateID},
};

/// A builder for constructing a [`StateGraph`] from a set of symbol
/// sequences.
///
/// The builder accumulates sequences and defers all validation to
/// [`Builder::build`], where the whole input is checked while the sequence
/// trie is inserted. Construction then runs two more phases over the trie:
/// resolution assigns a sequence id to every state that is not itself a
/// sequence terminus (the id of the longest known suffix of the path
/// leading there), and completion fills in every missing transition, turning
/// the trie into a total automaton. The phases are strictly ordered:
/// completion looks up targets through states that resolution must already
/// have finished.
///
/// # Example
///
/// ```
/// use sequence_automata::{Builder, SequenceID};
///
/// let graph = Builder::new(3)
///     .add(&[0, 1])
///     .add(&[1, 2, 2])
///     .build()?;
///
/// let mut recognizer = graph.recognizer();
/// recognizer.accept(0)?;
/// assert_eq!(SequenceID::must(4), recognizer.accept(1)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    alphabet_len: usize,
    sequences: Vec<Vec<usize>>,
}

impl Builder {
    /// Create a new builder for an automaton over symbols
    /// `0..alphabet_len`.
    pub fn new(alphabet_len: usize) -> Builder {
        Builder { alphabet_len, sequences: Vec::new() }
    }

    /// Register a sequence to recognize. Sequences are identified in
    /// registration order, starting at `alphabet_len + 1`.
    pub fn add(&mut self, sequence: &[usize]) -> &mut Builder {
        self.sequences.push(sequence.to_vec());
        self
    }

    /// Build the automaton.
    ///
    /// Fails if the alphabet is empty, if any sequence is empty, contains
    /// an out-of-range symbol or repeats an earlier sequence, or if any
    /// sequence has length 1 (those always collide with the implicit
    /// single-symbol sequences). A failed build returns only the error;
    /// there is no partially constructed graph to observe.
    pub fn build(&self) -> Result<StateGraph> {
        if self.alphabet_len < 1 {
            return Err(Error::empty_alphabet());
        }
        let mut graph = StateGraph::with_root(self.alphabet_len);
        insert_sequences(&mut graph, &self.sequences)?;
        trace!(
            "inserted {} sequences into a trie of {} states",
            self.sequences.len(),
            graph.state_count(),
        );
        resolve_sequences(&mut graph);
        complete_transitions(&mut graph);
        debug!(
            "built state graph: alphabet_len={} states={}",
            self.alphabet_len,
            graph.state_count(),
        );
        Ok(graph)
    }
}

/// Insert the implicit single-symbol states and then every registered
/// sequence into the trie rooted at `ROOT`, validating the input along the
/// way.
pub(crate) fn insert_sequences<S: AsRef<[usize]>>(
    graph: &mut StateGraph,
    sequences: &[S],
) -> Result<()> {
    let alphabet_len = graph.alphabet_len();
    for symbol in 0..alphabet_len {
        let id = graph.add_state()?;
        let sequence = SequenceID::new(symbol + 1)
            .map_err(|_| Error::too_many_sequences())?;
        graph.set_sequence(id, sequence);
        graph.set_transition(ROOT, symbol, id);
    }
    for (index, sequence) in sequences.iter().enumerate() {
        let sequence = sequence.as_ref();
        let sequence_id = SequenceID::new(alphabet_len + 1 + index)
            .map_err(|_| Error::too_many_sequences())?;
        if sequence.is_empty() {
            return Err(Error::empty_sequence(sequence_id));
        }
        let mut current = ROOT;
        for (position, &symbol) in sequence.iter().enumerate() {
            if symbol >= alphabet_len {
                return Err(Error::symbol_out_of_bounds(
                    sequence_id,
                    position,
                    symbol,
                ));
            }
            let next = match graph.transition(current, symbol) {
                Some(next) => next,
                None => {
                    let next = graph.add_state()?;
                    graph.set_transition(current, symbol, next);
                    next
                }
            };
            if position == sequence.len() - 1 {
                match graph.sequence_raw(next) {
                    Some(existing) => {
                        return Err(Error::duplicate_sequence(
                            sequence_id,
                            existing,
                        ));
                    }
                    None => graph.set_sequence(next, sequence_id),
                }
            }
            current = next;
        }
    }
    Ok(())
}

/// Assign a sequence id to every state the trie insertion left unresolved.
///
/// Walks the existing trie edges depth first, keeping the root-to-here
/// symbol path live, and sets each unresolved state to the id of the
/// deepest known suffix of its path. A state is resolved the moment it is
/// first reached, before any of its children: the lookups for a state's
/// descendants may walk through the state itself.
pub(crate) fn resolve_sequences(graph: &mut StateGraph) {
    let alphabet_len = graph.alphabet_len();
    let mut path: Vec<usize> = Vec::new();
    // Each frame is a state paired with the next symbol to descend on. An
    // explicit stack keeps the call stack flat no matter how long the
    // registered sequences are.
    let mut stack: Vec<(StateID, usize)> = vec![(ROOT, 0)];
    while let Some(frame) = stack.last_mut() {
        let (id, symbol) = *frame;
        if symbol >= alphabet_len {
            stack.pop();
            path.pop();
            continue;
        }
        frame.1 = symbol + 1;
        let next = match graph.transition(id, symbol) {
            Some(next) => next,
            None => continue,
        };
        path.push(symbol);
        if graph.sequence_raw(next).is_none() {
            let target = longest_suffix(graph, &path);
            let sequence = graph.sequence(target);
            graph.set_sequence(next, sequence);
        }
        stack.push((next, 0));
    }
}

/// Fill in every missing transition of every state, turning the trie into
/// a total automaton.
///
/// Must run strictly after [`resolve_sequences`]: the suffix lookups here
/// walk through states and require all of them to be resolved. Missing
/// edges resolve to the state of the deepest known suffix of the path plus
/// the missing symbol, which is how several states come to share a target
/// and the graph stops being a tree.
pub(crate) fn complete_transitions(graph: &mut StateGraph) {
    let alphabet_len = graph.alphabet_len();
    let mut path: Vec<usize> = Vec::new();
    let mut stack: Vec<(StateID, usize)> = vec![(ROOT, 0)];
    while let Some(frame) = stack.last_mut() {
        let (id, symbol) = *frame;
        if symbol >= alphabet_len {
            stack.pop();
            path.pop();
            continue;
        }
        frame.1 = symbol + 1;
        path.push(symbol);
        match graph.transition(id, symbol) {
            // An edge present when this state examines it is an original
            // trie edge: a state's own slots are only written while its
            // frame is on top, and always at symbols the frame has moved
            // past. Descending filled edges would revisit states.
            Some(next) => stack.push((next, 0)),
            None => {
                let target = longest_suffix(graph, &path);
                graph.set_transition(id, symbol, target);
                path.pop();
            }
        }
    }
}

/// Find the state of the deepest known suffix of `path`.
///
/// Candidate suffixes are tried from the longest (the whole path) down to
/// the final single symbol. A candidate's walk from the root is abandoned
/// as soon as an edge is missing or a state on the walk is unresolved; the
/// first walk that runs to completion yields the result.
///
/// # Panics
///
/// Panics when no candidate succeeds. The single-symbol states always
/// exist and are resolved before either caller runs, so exhausting the
/// candidates indicates a construction-order bug, never bad input.
pub(crate) fn longest_suffix(graph: &StateGraph, path: &[usize]) -> StateID {
    'candidates: for start in 0..path.len() {
        let mut current = ROOT;
        for &symbol in &path[start..] {
            current = match graph.transition(current, symbol) {
                Some(next) => next,
                None => continue 'candidates,
            };
            if graph.sequence_raw(current).is_none() {
                continue 'candidates;
            }
        }
        return current;
    }
    panic!("no suffix of the path leads to a resolved state")
}
