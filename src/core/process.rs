use indexmap::IndexSet;
use tracing::debug;

use crate::core::automaton::Dfa;
use crate::core::symbols::{StateId, StateTable, Symbol, SymbolTable};

/// Input contract for a single process (`spec.md` §6, "ProcessDFA input
/// contract"): a DFA given as opaque strings, supplied by the producer
/// that derives it from a reachability/transition system. Need not be
/// total — the core totalizes it (§4.3). Initial and accepting sets may
/// both be empty for a degenerate process whose language is empty.
#[derive(Debug, Clone, Default)]
pub struct ProcessDfa {
    pub states: Vec<String>,
    pub alphabet: Vec<String>,
    pub transitions: Vec<(String, String, String)>,
    pub initial: Vec<String>,
    pub accepting: Vec<String>,
    pub error: Vec<String>,
}

/// A [`ProcessDfa`] after its states have been interned and it has been
/// totalized (C3). `local_alphabet` is the set of symbols the process
/// itself declared, interned against the *global* [`SymbolTable`] shared
/// across all processes and constraints — this is what the process
/// composer (C4) uses to decide when a symbol is foreign to a process and
/// should self-loop rather than follow a transition.
pub struct ProcessAutomaton {
    pub dfa: Dfa<StateId>,
    pub local_alphabet: IndexSet<Symbol>,
    pub states: StateTable,
}

/// Interns a single process's states and transitions against the shared
/// symbol table, then totalizes it (C3): adds a fresh `ERROR_SINK` state
/// and routes every `(state, symbol)` pair missing from the process's own
/// declared alphabet into it, with the sink self-looping on every symbol.
///
/// `spec.md` §4.3: "After totalization, invariant 2 holds" — but only
/// with respect to the process's *own* alphabet; composition (C4) is
/// responsible for the cross-process self-loop-on-foreign-symbol rule.
pub fn totalize(process: &ProcessDfa, symbols: &mut SymbolTable) -> ProcessAutomaton {
    let mut states = StateTable::new();
    let mut dfa: Dfa<StateId> = Dfa::new();
    let mut local_alphabet = IndexSet::new();

    for name in &process.states {
        let id = states.intern(name);
        dfa.add_state(id);
    }
    for label in &process.alphabet {
        let sym = symbols.intern(label);
        local_alphabet.insert(sym);
        dfa.alphabet.insert(sym);
    }
    for (from, label, to) in &process.transitions {
        let from_id = states.intern(from);
        let to_id = states.intern(to);
        let sym = symbols.intern(label);
        local_alphabet.insert(sym);
        dfa.alphabet.insert(sym);
        dfa.add_transition(from_id, sym, to_id);
    }
    for name in &process.initial {
        dfa.initial.insert(states.intern(name));
    }
    for name in &process.accepting {
        dfa.accepting.insert(states.intern(name));
    }
    for name in &process.error {
        dfa.error.insert(states.intern(name));
    }

    // `reserve`, not `intern`: a process may legitimately declare a state
    // literally named "ERROR_SINK", and it must not be aliased onto the
    // synthetic sink below.
    let sink = states.reserve("ERROR_SINK");
    dfa.add_state(sink);
    dfa.error.insert(sink);

    let existing_states: Vec<StateId> = dfa.states.iter().copied().collect();
    for &state in &existing_states {
        for &symbol in &local_alphabet {
            let has_transition = dfa
                .transitions
                .get(&state)
                .is_some_and(|row| row.contains_key(&symbol));
            if !has_transition {
                dfa.add_transition(state, symbol, sink);
            }
        }
    }

    debug!(
        states = dfa.states.len(),
        alphabet = local_alphabet.len(),
        "totalized process DFA"
    );

    ProcessAutomaton {
        dfa,
        local_alphabet,
        states,
    }
}
