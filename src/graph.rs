use alloc::{
    collections::VecDeque,
    format,
    string::String,
    vec,
    vec::Vec,
};

use crate::{
    automaton::Automaton,
    error::{Error, IncompleteGraphError, Result},
    id::{SequenceID, StateID},
    matrix::TransitionMatrix,
    recognizer::Recognizer,
};

/// The identifier of the root state in every state graph.
///
/// The root is created before anything else and therefore always has id `0`.
/// Its sequence id is [`SequenceID::ZERO`], meaning nothing has been
/// consumed yet.
pub const ROOT: StateID = StateID::ZERO;

#[cfg(windows)]
const LINE_TERMINATOR: &str = "\r\n";
#[cfg(not(windows))]
const LINE_TERMINATOR: &str = "\n";

/// A single state in the arena.
///
/// Edges are indices into the owning graph's arena, never owning
/// references, so the reconvergent final graph needs no special ownership
/// treatment. A `None` transition is an edge that has not been created
/// (trie building) or not yet been completed (before the completion phase
/// runs). A `None` sequence marks an intermediate trie state that the
/// resolution phase has not visited yet.
#[derive(Clone, Debug)]
pub(crate) struct State {
    sequence: Option<SequenceID>,
    transitions: Vec<Option<StateID>>,
}

impl State {
    fn new(alphabet_len: usize) -> State {
        State { sequence: None, transitions: vec![None; alphabet_len] }
    }

    fn has_transitions(&self) -> bool {
        self.transitions.iter().any(|t| t.is_some())
    }
}

/// A deterministic automaton that recognizes which member of a fixed set of
/// symbol sequences the consumed input currently ends with.
///
/// A state graph is built once, through [`StateGraph::new`],
/// [`StateGraph::minimal`] or a [`Builder`](crate::Builder), and is
/// immutable afterwards. Every state has an outgoing edge for every symbol
/// and a resolved sequence id, so stepping through the graph can never
/// reach an undefined recognition state.
///
/// Stepping is done with a [`Recognizer`], any number of which may share
/// one graph, including from independent threads: all reads of a finished
/// graph are reads of immutable data.
///
/// # Example
///
/// ```
/// use sequence_automata::{SequenceID, StateGraph};
///
/// let sequences: &[&[usize]] = &[&[1, 3], &[2, 2, 2]];
/// let graph = StateGraph::new(4, sequences)?;
///
/// let mut recognizer = graph.recognizer();
/// recognizer.accept(2)?;
/// recognizer.accept(2)?;
/// // The third 2 completes the sequence registered second.
/// assert_eq!(SequenceID::must(6), recognizer.accept(2)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct StateGraph {
    alphabet_len: usize,
    states: Vec<State>,
}

impl StateGraph {
    /// Build a state graph over the given alphabet that recognizes the
    /// given sequences.
    ///
    /// Symbols are integers in `[0, alphabet_len)`. Each sequence must
    /// contain at least two symbols and must not repeat an earlier
    /// sequence; every single symbol is always recognized on its own, as
    /// if one sequence per symbol had been registered first.
    ///
    /// # Example
    ///
    /// ```
    /// use sequence_automata::{ErrorKind, StateGraph};
    ///
    /// let sequences: &[&[usize]] = &[&[0, 1], &[0, 1]];
    /// let err = StateGraph::new(2, sequences).unwrap_err();
    /// assert!(matches!(
    ///     err.kind(),
    ///     ErrorKind::DuplicateSequence { .. },
    /// ));
    /// ```
    pub fn new<S: AsRef<[usize]>>(
        alphabet_len: usize,
        sequences: &[S],
    ) -> Result<StateGraph> {
        let mut builder = crate::build::Builder::new(alphabet_len);
        for sequence in sequences {
            builder.add(sequence.as_ref());
        }
        builder.build()
    }

    /// Build a state graph with no explicit sequences.
    ///
    /// The result is the smallest possible graph for the alphabet: the
    /// root plus one state per symbol, `alphabet_len + 1` states in total,
    /// recognizing exactly the single-symbol sequences.
    pub fn minimal(alphabet_len: usize) -> Result<StateGraph> {
        crate::build::Builder::new(alphabet_len).build()
    }

    /// Create a graph containing only the root state. The caller is
    /// responsible for running the construction phases.
    pub(crate) fn with_root(alphabet_len: usize) -> StateGraph {
        let mut root = State::new(alphabet_len);
        root.sequence = Some(SequenceID::ZERO);
        StateGraph { alphabet_len, states: vec![root] }
    }

    /// Returns the number of symbols in this graph's alphabet.
    pub fn alphabet_len(&self) -> usize {
        self.alphabet_len
    }

    /// Returns the total number of states in this graph.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Returns the sequence id recognized when the given state is current.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not identify a state of this graph.
    pub fn sequence(&self, id: StateID) -> SequenceID {
        // Every state of a finished graph was resolved by the resolution
        // phase before the graph was handed out.
        self.states[id]
            .sequence
            .expect("state in a finished graph is resolved")
    }

    /// Returns the state reached by consuming `symbol` in state `current`.
    ///
    /// # Panics
    ///
    /// Panics if `current` does not identify a state of this graph or if
    /// `symbol` is not within `[0, alphabet_len)`. [`Recognizer::accept`]
    /// performs the symbol check and reports a recoverable error instead.
    pub fn next_state(&self, current: StateID, symbol: usize) -> StateID {
        self.states[current].transitions[symbol]
            .expect("state in a finished graph has every transition")
    }

    /// Create a recognizer that steps through this graph, positioned at
    /// the root.
    pub fn recognizer(&self) -> Recognizer<&StateGraph> {
        Recognizer::new(self)
    }

    /// Flatten this graph into a row-major transition matrix.
    ///
    /// The matrix drives the same transitions as the graph with a single
    /// slice lookup per symbol and no graph traversal, which is the
    /// representation of choice for embedding the automaton in a tight
    /// loop.
    ///
    /// Returns an error only when invoked on a graph that has not finished
    /// all construction phases, which cannot happen for graphs obtained
    /// through the public build entry points.
    pub fn to_transition_matrix(
        &self,
    ) -> core::result::Result<TransitionMatrix, IncompleteGraphError> {
        TransitionMatrix::from_graph(self)
    }

    /// Returns the heap memory usage, in bytes, of this graph.
    pub fn memory_usage(&self) -> usize {
        self.states.len() * core::mem::size_of::<State>()
            + self.states.len()
                * self.alphabet_len
                * core::mem::size_of::<Option<StateID>>()
    }

    /// Append a fresh unresolved state to the arena and return its id.
    pub(crate) fn add_state(&mut self) -> Result<StateID> {
        let id = StateID::new(self.states.len())
            .map_err(|_| Error::too_many_states())?;
        self.states.push(State::new(self.alphabet_len));
        Ok(id)
    }

    /// Returns the target of the edge for `symbol` out of `id`, if that
    /// edge exists.
    pub(crate) fn transition(
        &self,
        id: StateID,
        symbol: usize,
    ) -> Option<StateID> {
        self.states[id].transitions[symbol]
    }

    pub(crate) fn set_transition(
        &mut self,
        id: StateID,
        symbol: usize,
        target: StateID,
    ) {
        self.states[id].transitions[symbol] = Some(target);
    }

    /// Returns the sequence id of a state that may not be resolved yet.
    pub(crate) fn sequence_raw(&self, id: StateID) -> Option<SequenceID> {
        self.states[id].sequence
    }

    pub(crate) fn set_sequence(&mut self, id: StateID, sequence: SequenceID) {
        self.states[id].sequence = Some(sequence);
    }

    /// The `core` of a state in both debug formats: its sequence id (or
    /// `_` when unresolved) and its state id.
    fn core(&self, id: StateID) -> String {
        match self.states[id].sequence {
            Some(sequence) => {
                format!("{}@{}", sequence.as_usize(), id.as_usize())
            }
            None => format!("_@{}", id.as_usize()),
        }
    }

    /// Render this graph in expression notation.
    ///
    /// A state renders as `(` core `)`, with `>` and one `{symbol}'`
    /// segment per outgoing edge (symbols ascending) between core and the
    /// closing parenthesis, each segment followed by the rendering of its
    /// target. A state that was already rendered earlier in the traversal
    /// renders as `(~` core `)` without its edges; the completed graph has
    /// shared targets, so an unmemoized expansion would not terminate.
    pub fn to_expression(&self) -> String {
        let mut out = String::new();
        let mut rendered = vec![false; self.states.len()];
        // Each frame is a state whose edge list is being written, paired
        // with the next symbol to consider. The stack replaces the
        // recursion of a naive renderer, whose depth on a completed graph
        // is bounded only by the number of states.
        let mut stack: Vec<(StateID, usize)> = Vec::new();
        self.open_expression(ROOT, &mut out, &mut rendered, &mut stack);
        while let Some(frame) = stack.last_mut() {
            let (id, symbol) = *frame;
            if symbol >= self.alphabet_len {
                out.push(')');
                stack.pop();
                continue;
            }
            frame.1 = symbol + 1;
            if let Some(next) = self.transition(id, symbol) {
                out.push_str(&format!("{}'", symbol));
                self.open_expression(next, &mut out, &mut rendered, &mut stack);
            }
        }
        out
    }

    /// Write the opening of one state's rendering. A first visit pushes a
    /// frame so the main loop expands its edges; a repeat visit renders
    /// the abbreviated `(~core)` form and pushes nothing.
    fn open_expression(
        &self,
        id: StateID,
        out: &mut String,
        rendered: &mut Vec<bool>,
        stack: &mut Vec<(StateID, usize)>,
    ) {
        if rendered[id] {
            out.push_str(&format!("(~{})", self.core(id)));
            return;
        }
        rendered[id] = true;
        out.push_str(&format!("({}", self.core(id)));
        if self.states[id].has_transitions() {
            out.push('>');
        }
        stack.push((id, 0));
    }

    /// Render this graph in Trivial Graph Format, joining lines with the
    /// platform's line terminator.
    pub fn to_tgf(&self) -> String {
        self.to_tgf_with(LINE_TERMINATOR)
    }

    /// Render this graph in Trivial Graph Format with a caller-supplied
    /// line separator.
    ///
    /// Nodes appear once each as `{id} {core}` in breadth-first discovery
    /// order from the root, followed by a lone `#`, followed by one
    /// `{source} {target} {symbol}` line per edge in the order the
    /// traversal saw them, including edges leading back to states already
    /// discovered.
    pub fn to_tgf_with(&self, separator: &str) -> String {
        let mut lines: Vec<String> = Vec::new();
        let mut edges: Vec<String> = Vec::new();
        let mut queued = vec![false; self.states.len()];
        let mut queue = VecDeque::new();
        queue.push_back(ROOT);
        queued[ROOT] = true;
        while let Some(id) = queue.pop_front() {
            lines.push(format!("{} {}", id.as_usize(), self.core(id)));
            for symbol in 0..self.alphabet_len {
                let target = match self.transition(id, symbol) {
                    None => continue,
                    Some(target) => target,
                };
                edges.push(format!(
                    "{} {} {}",
                    id.as_usize(),
                    target.as_usize(),
                    symbol,
                ));
                if !queued[target] {
                    queued[target] = true;
                    queue.push_back(target);
                }
            }
        }
        lines.push(String::from("#"));
        lines.extend(edges);
        lines.join(separator)
    }
}

impl Automaton for StateGraph {
    fn alphabet_len(&self) -> usize {
        StateGraph::alphabet_len(self)
    }

    fn next_state(&self, current: StateID, symbol: usize) -> StateID {
        StateGraph::next_state(self, current, symbol)
    }

    fn sequence(&self, id: StateID) -> SequenceID {
        StateGraph::sequence(self, id)
    }
}
