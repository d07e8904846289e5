use crate::id::{SequenceID, StateID};

/// A trait describing the stepping interface of a finished automaton.
///
/// This trait is the seam between the two representations this crate
/// builds, the [`StateGraph`](crate::StateGraph) and its flattened
/// [`TransitionMatrix`](crate::TransitionMatrix), and anything that steps
/// through one of them, most notably a
/// [`Recognizer`](crate::Recognizer). Both representations drive identical
/// state and sequence trajectories for any input stream; which one to step
/// through is purely a representation choice.
///
/// Every implementation describes a *total* automaton: `next_state` is
/// defined for every pair of a valid state id and an in-range symbol, and
/// `sequence` is defined for every valid state id. Out-of-range inputs may
/// panic; callers that need a recoverable check use a `Recognizer`.
pub trait Automaton {
    /// Returns the number of symbols in this automaton's alphabet.
    fn alphabet_len(&self) -> usize;

    /// Returns the state reached by consuming `symbol` in state `current`.
    fn next_state(&self, current: StateID, symbol: usize) -> StateID;

    /// Returns the sequence id recognized when the given state is current.
    fn sequence(&self, id: StateID) -> SequenceID;
}

impl<'a, A: Automaton + ?Sized> Automaton for &'a A {
    fn alphabet_len(&self) -> usize {
        (**self).alphabet_len()
    }

    fn next_state(&self, current: StateID, symbol: usize) -> StateID {
        (**self).next_state(current, symbol)
    }

    fn sequence(&self, id: StateID) -> SequenceID {
        (**self).sequence(id)
    }
}
