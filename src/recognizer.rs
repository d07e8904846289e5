use core::fmt;

use crate::{
    automaton::Automaton,
    graph::ROOT,
    id::{SequenceID, StateID},
};

/// A cursor that steps through a finished automaton one symbol at a time.
///
/// A recognizer owns nothing but its position: the underlying automaton is
/// typically borrowed (`Recognizer<&StateGraph>` or
/// `Recognizer<&TransitionMatrix>`), and any number of recognizers may
/// walk the same automaton at the same time, each keeping its own cursor.
/// Stepping is a single table lookup; no allocation, no locking.
///
/// # Example
///
/// ```
/// use sequence_automata::{Recognizer, SequenceID, StateGraph};
///
/// let sequences: &[&[usize]] = &[&[0, 0, 1]];
/// let graph = StateGraph::new(2, sequences)?;
///
/// let mut recognizer = Recognizer::new(&graph);
/// recognizer.accept(0)?;
/// recognizer.accept(0)?;
/// assert_eq!(SequenceID::must(3), recognizer.accept(1)?);
///
/// // The matrix drives the identical trajectory.
/// let matrix = graph.to_transition_matrix()?;
/// let mut recognizer = Recognizer::new(&matrix);
/// recognizer.accept(0)?;
/// recognizer.accept(0)?;
/// assert_eq!(SequenceID::must(3), recognizer.accept(1)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Recognizer<A> {
    automaton: A,
    state: StateID,
    symbol: Option<usize>,
}

impl<A: Automaton> Recognizer<A> {
    /// Create a recognizer positioned at the root of the given automaton,
    /// with no symbol consumed.
    pub fn new(automaton: A) -> Recognizer<A> {
        Recognizer { automaton, state: ROOT, symbol: None }
    }

    /// Consume one symbol and return the sequence id now recognized.
    ///
    /// An out-of-range symbol leaves the cursor and the last consumed
    /// symbol untouched, so a caller may recover by retrying with a valid
    /// symbol.
    pub fn accept(
        &mut self,
        symbol: usize,
    ) -> Result<SequenceID, SymbolError> {
        let alphabet_len = self.automaton.alphabet_len();
        if symbol >= alphabet_len {
            return Err(SymbolError { symbol, alphabet_len });
        }
        self.state = self.automaton.next_state(self.state, symbol);
        self.symbol = Some(symbol);
        Ok(self.automaton.sequence(self.state))
    }

    /// Returns the id of the current state.
    pub fn state(&self) -> StateID {
        self.state
    }

    /// Returns the id of the sequence the consumed input currently ends
    /// with. At the root this is [`SequenceID::ZERO`].
    pub fn sequence(&self) -> SequenceID {
        self.automaton.sequence(self.state)
    }

    /// Returns the last symbol consumed, or `None` when nothing has been
    /// consumed since construction or the last reset.
    pub fn last_symbol(&self) -> Option<usize> {
        self.symbol
    }

    /// Return the cursor to the root with no symbol consumed, exactly the
    /// state of a freshly constructed recognizer.
    pub fn reset(&mut self) {
        self.state = ROOT;
        self.symbol = None;
    }
}

/// An error returned when a recognizer is fed a symbol outside its
/// automaton's alphabet.
///
/// This error is recoverable: the recognizer it came from is unchanged.
///
/// When the `std` feature is enabled, this implements the `Error` trait.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SymbolError {
    symbol: usize,
    alphabet_len: usize,
}

impl SymbolError {
    /// Returns the rejected symbol.
    pub fn symbol(&self) -> usize {
        self.symbol
    }

    /// Returns the size of the alphabet the symbol was checked against.
    pub fn alphabet_len(&self) -> usize {
        self.alphabet_len
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SymbolError {}

impl fmt::Display for SymbolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "symbol {} is outside the alphabet of {} symbols",
            self.symbol, self.alphabet_len,
        )
    }
}
