use sequence_automata::{SequenceID, StateGraph, StateID, ROOT};

use crate::{scenario, SCENARIO_SEQUENCES};

#[test]
fn each_sequence_lands_on_its_id_from_the_root() {
    let graph = scenario().unwrap();
    let mut recognizer = graph.recognizer();
    for (index, sequence) in SCENARIO_SEQUENCES.iter().enumerate() {
        assert_eq!(ROOT, recognizer.state());
        assert_eq!(SequenceID::ZERO, recognizer.sequence());
        assert_eq!(None, recognizer.last_symbol());

        for &symbol in *sequence {
            recognizer.accept(symbol).unwrap();
            assert_eq!(Some(symbol), recognizer.last_symbol());
        }
        assert_eq!(4 + 1 + index, recognizer.sequence().as_usize());

        recognizer.reset();
    }
}

#[test]
fn sequences_chain_without_resets() {
    // The suffix fallback keeps whatever prefix of the next sequence the
    // previous one ended with, so feeding all sequences back to back still
    // completes each one.
    let graph = scenario().unwrap();
    let mut recognizer = graph.recognizer();
    for (index, sequence) in SCENARIO_SEQUENCES.iter().enumerate() {
        for &symbol in *sequence {
            recognizer.accept(symbol).unwrap();
            assert_eq!(Some(symbol), recognizer.last_symbol());
        }
        assert_eq!(4 + 1 + index, recognizer.sequence().as_usize());
    }
}

#[test]
fn scenario_trajectory() {
    let graph = scenario().unwrap();
    let mut recognizer = graph.recognizer();

    // Three 2s complete the sequence 2 2 2.
    recognizer.accept(2).unwrap();
    assert_eq!(StateID::must(3), recognizer.state());
    assert_eq!(SequenceID::must(3), recognizer.sequence());
    recognizer.accept(2).unwrap();
    assert_eq!(StateID::must(6), recognizer.state());
    assert_eq!(SequenceID::must(3), recognizer.sequence());
    recognizer.accept(2).unwrap();
    assert_eq!(StateID::must(7), recognizer.state());
    assert_eq!(SequenceID::must(6), recognizer.sequence());

    // A fourth 2 completes 2 2 2 2, and the automaton stays there for
    // any number of further 2s.
    for _ in 0..123 {
        recognizer.accept(2).unwrap();
        assert_eq!(StateID::must(10), recognizer.state());
        assert_eq!(SequenceID::must(8), recognizer.sequence());
    }

    // One 3 completes 2 2 2 3.
    recognizer.accept(3).unwrap();
    assert_eq!(StateID::must(11), recognizer.state());
    assert_eq!(SequenceID::must(9), recognizer.sequence());

    // Further 3s extend no sequence and fall back to the single-symbol
    // state for 3.
    for _ in 0..123 {
        recognizer.accept(3).unwrap();
        assert_eq!(StateID::must(4), recognizer.state());
        assert_eq!(SequenceID::must(4), recognizer.sequence());
    }

    for _ in 0..123 {
        recognizer.accept(0).unwrap();
        assert_eq!(StateID::must(1), recognizer.state());
        assert_eq!(SequenceID::must(1), recognizer.sequence());
    }
}

#[test]
fn same_symbol_runs() {
    for alphabet_len in 2..10 {
        for run_len in 2..20 {
            let sequences: Vec<Vec<usize>> = (0..alphabet_len)
                .map(|symbol| vec![symbol; run_len])
                .collect();
            let graph = StateGraph::new(alphabet_len, &sequences).unwrap();
            let mut recognizer = graph.recognizer();

            assert_eq!(ROOT, recognizer.state());
            assert_eq!(SequenceID::ZERO, recognizer.sequence());
            assert_eq!(None, recognizer.last_symbol());

            for symbol in 0..alphabet_len {
                recognizer.accept(symbol).unwrap();
                assert_eq!(symbol + 1, recognizer.sequence().as_usize());

                // Overshooting the run length keeps the automaton parked
                // on the completed run.
                for _ in 0..run_len + 10 {
                    recognizer.accept(symbol).unwrap();
                }
                assert_eq!(
                    symbol + 1 + alphabet_len,
                    recognizer.sequence().as_usize(),
                );
            }
        }
    }
}

#[test]
fn out_of_range_symbols_are_recoverable() {
    let graph = scenario().unwrap();
    let mut recognizer = graph.recognizer();
    recognizer.accept(2).unwrap();
    recognizer.accept(2).unwrap();

    let err = recognizer.accept(4).unwrap_err();
    assert_eq!(4, err.symbol());
    assert_eq!(4, err.alphabet_len());
    assert_eq!(StateID::must(6), recognizer.state());
    assert_eq!(Some(2), recognizer.last_symbol());

    // Retrying with a valid symbol picks up where the cursor stopped.
    assert_eq!(SequenceID::must(6), recognizer.accept(2).unwrap());
}

#[test]
fn recognizers_share_one_graph_across_threads() {
    let graph = std::sync::Arc::new(scenario().unwrap());
    let mut handles = Vec::new();
    for symbol in 0..4 {
        let graph = std::sync::Arc::clone(&graph);
        handles.push(std::thread::spawn(move || {
            let mut recognizer = graph.recognizer();
            recognizer.accept(symbol).unwrap().as_usize()
        }));
    }
    for (symbol, handle) in handles.into_iter().enumerate() {
        assert_eq!(symbol + 1, handle.join().unwrap());
    }
}

#[test]
fn reset_restores_the_initial_state() {
    let graph = scenario().unwrap();
    let mut recognizer = graph.recognizer();
    for &symbol in SCENARIO_SEQUENCES[2] {
        recognizer.accept(symbol).unwrap();
    }
    recognizer.reset();
    assert_eq!(ROOT, recognizer.state());
    assert_eq!(SequenceID::ZERO, recognizer.sequence());
    assert_eq!(None, recognizer.last_symbol());
}
