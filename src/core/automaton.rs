use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use indexmap::IndexSet;

use crate::core::symbols::Symbol;

/// The universal container used at every construction stage (`spec.md`
/// §3): a single process DFA, a constraint-template DFA, the multi-process
/// DFA, or a hybrid DFA are all a `Dfa<S>` for the appropriate state type
/// `S` — a bare [`StateId`](crate::core::symbols::StateId) for the first
/// two, a [`Tuple`](crate::core::symbols::Tuple) for the latter two.
///
/// Mirrors the teacher's `Dfa` struct in `core/dfa.rs`, generalized from a
/// `char`-indexed transition matrix (fixed, small alphabet) to a sparse
/// `Symbol`-keyed map (alphabet built from an open set of activity
/// labels).
#[derive(Debug, Clone)]
pub struct Dfa<S: Clone + Eq + Hash> {
    pub states: IndexSet<S>,
    pub alphabet: IndexSet<Symbol>,
    pub transitions: HashMap<S, HashMap<Symbol, S>>,
    pub initial: HashSet<S>,
    pub accepting: HashSet<S>,
    pub error: HashSet<S>,
}

impl<S: Clone + Eq + Hash> Default for Dfa<S> {
    fn default() -> Self {
        Self {
            states: IndexSet::new(),
            alphabet: IndexSet::new(),
            transitions: HashMap::new(),
            initial: HashSet::new(),
            accepting: HashSet::new(),
            error: HashSet::new(),
        }
    }
}

impl<S: Clone + Eq + Hash> Dfa<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, state: S) {
        self.states.insert(state.clone());
        self.transitions.entry(state).or_default();
    }

    pub fn add_transition(&mut self, from: S, symbol: Symbol, to: S) {
        self.add_state(from.clone());
        self.add_state(to.clone());
        self.transitions.entry(from).or_default().insert(symbol, to);
    }

    #[must_use]
    pub fn successor(&self, from: &S, symbol: Symbol) -> Option<&S> {
        self.transitions.get(from).and_then(|row| row.get(&symbol))
    }

    /// `spec.md` §3 invariant 2: a totalized DFA has exactly one outgoing
    /// transition per `(state, symbol)` pair.
    #[must_use]
    pub fn is_total(&self) -> bool {
        self.states.iter().all(|s| {
            let row = self.transitions.get(s);
            self.alphabet
                .iter()
                .all(|a| row.is_some_and(|r| r.contains_key(a)))
        })
    }

    /// `spec.md` §3 invariants 1 and 4, checked eagerly rather than only
    /// in debug builds so callers composing hand-built `ProcessDfa`
    /// inputs get a clear signal instead of silent corruption downstream.
    #[must_use]
    pub fn check_basic_invariants(&self) -> bool {
        self.initial.iter().all(|s| self.states.contains(s))
            && self.accepting.iter().all(|s| self.states.contains(s))
            && self.error.iter().all(|s| self.states.contains(s))
            && self.accepting.is_disjoint(&self.error)
    }
}
