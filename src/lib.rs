/*!
Automata construction and matching for fixed sets of symbol sequences.

This crate builds a deterministic finite automaton that recognizes, one
symbol at a time, which member of a fixed set of symbol sequences over a
small integer alphabet the input currently ends with. Two properties
distinguish it from a general multi-pattern matcher:

* Every single symbol of the alphabet is itself an implicit, pre-registered
  sequence of length 1, so the machine is never in an undefined recognition
  state: after any prefix, the recognized id names the longest suffix of
  the consumed input that corresponds to a known sequence.
* After construction the automaton is *total*: every state has an outgoing
  edge for every symbol. The transitions can additionally be baked into a
  flat row-major table for stepping with one slice lookup per symbol.

The sequence set is fixed at construction time and the automaton is frozen
afterwards; there is no support for adding or removing sequences from a
live automaton.

# Example

```
use sequence_automata::{SequenceID, StateGraph};

let sequences: &[&[usize]] = &[
    &[1, 3],
    &[2, 2, 2],
    &[2, 2, 1, 1],
];
let graph = StateGraph::new(4, sequences)?;

// Sequences are numbered after the implicit single-symbol ones, so the
// first registered sequence has id 5 for an alphabet of 4 symbols.
let mut recognizer = graph.recognizer();
recognizer.accept(1)?;
assert_eq!(SequenceID::must(2), recognizer.sequence());
assert_eq!(SequenceID::must(5), recognizer.accept(3)?);

// A symbol that extends no registered sequence falls back to the longest
// suffix that is still known, here the single symbol 3.
assert_eq!(SequenceID::must(4), recognizer.accept(3)?);
# Ok::<(), Box<dyn std::error::Error>>(())
```

# Crate features

* **std** - Enabled by default. Implements the `std::error::Error` trait
  for this crate's error types. Without it, the crate is `no_std` and only
  depends on `alloc`.
* **logging** - Emits construction diagnostics through the `log` crate.
*/

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(any(
    target_pointer_width = "32",
    target_pointer_width = "64"
)))]
compile_error!("sequence-automata currently not supported on non-{32,64}");

extern crate alloc;

pub use crate::{
    automaton::Automaton,
    build::Builder,
    error::{Error, ErrorKind, IncompleteGraphError, Result},
    graph::{StateGraph, ROOT},
    id::{SequenceID, SequenceIDError, StateID, StateIDError},
    matrix::TransitionMatrix,
    recognizer::{Recognizer, SymbolError},
};

#[macro_use]
mod macros;

mod automaton;
mod build;
mod error;
mod graph;
mod id;
mod matrix;
mod recognizer;
