use tracing::debug;

use crate::core::automaton::Dfa;
use crate::core::symbols::Tuple;

/// C6: collapses every error-tagged state of `dfa` into a single fresh
/// absorbing sink (`spec.md` §4.6). Skipped when there is nothing to
/// collapse, or when `num_processes == 1` — a lone process's own error
/// structure from totalization (C3) is kept as-is, matching the source's
/// `if not self.error_states or num_processes == 1: return self` guard.
///
/// The sink is represented as the empty [`Tuple`]: every real product
/// tuple at the point this runs has at least two components (at least two
/// processes, since the `num_processes == 1` case already returned), so
/// the empty vector can never collide with a reachable state.
#[must_use]
pub fn rewire_errors(dfa: &Dfa<Tuple>, num_processes: usize) -> Dfa<Tuple> {
    if dfa.error.is_empty() || num_processes == 1 {
        return dfa.clone();
    }

    let sink: Tuple = Vec::new();
    let redirect = |state: &Tuple| -> Tuple {
        if dfa.error.contains(state) {
            sink.clone()
        } else {
            state.clone()
        }
    };

    let mut rewired: Dfa<Tuple> = Dfa::new();
    rewired.alphabet = dfa.alphabet.clone();

    for state in &dfa.states {
        if !dfa.error.contains(state) {
            rewired.add_state(state.clone());
        }
    }
    rewired.add_state(sink.clone());
    rewired.error.insert(sink.clone());

    for state in &dfa.states {
        if dfa.error.contains(state) {
            continue;
        }
        if let Some(row) = dfa.transitions.get(state) {
            for (&symbol, target) in row {
                rewired.add_transition(state.clone(), symbol, redirect(target));
            }
        }
    }
    for &symbol in &dfa.alphabet {
        rewired.add_transition(sink.clone(), symbol, sink.clone());
    }

    rewired.initial = dfa.initial.iter().map(redirect).collect();
    rewired.accepting = dfa
        .accepting
        .iter()
        .filter(|state| !dfa.error.contains(*state))
        .cloned()
        .collect();

    debug!(
        before = dfa.states.len(),
        after = rewired.states.len(),
        "rewired error states to a single sink"
    );

    rewired
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_dfa_with_error() -> Dfa<Tuple> {
        let mut dfa: Dfa<Tuple> = Dfa::new();
        dfa.alphabet.insert(0);
        let ok = vec![1, 1];
        let bad1 = vec![2, 1];
        let bad2 = vec![1, 2];
        dfa.add_transition(ok.clone(), 0, bad1.clone());
        dfa.add_transition(bad1.clone(), 0, bad2.clone());
        dfa.add_transition(bad2.clone(), 0, bad2.clone());
        dfa.initial.insert(ok.clone());
        dfa.accepting.insert(ok);
        dfa.error.insert(bad1);
        dfa.error.insert(bad2);
        dfa
    }

    #[test]
    fn rewire_collapses_to_single_sink() {
        let dfa = two_state_dfa_with_error();
        let rewired = rewire_errors(&dfa, 2);
        assert_eq!(rewired.error.len(), 1);
        let sink = rewired.error.iter().next().unwrap().clone();
        assert_eq!(rewired.successor(&sink, 0), Some(&sink));
    }

    #[test]
    fn rewire_skips_single_process() {
        let dfa = two_state_dfa_with_error();
        let rewired = rewire_errors(&dfa, 1);
        assert_eq!(rewired.error.len(), dfa.error.len());
    }

    #[test]
    fn rewire_is_noop_without_error_states() {
        let mut dfa: Dfa<Tuple> = Dfa::new();
        dfa.alphabet.insert(0);
        let only = vec![1];
        dfa.add_transition(only.clone(), 0, only.clone());
        dfa.initial.insert(only);
        let rewired = rewire_errors(&dfa, 2);
        assert!(rewired.error.is_empty());
        assert_eq!(rewired.states.len(), dfa.states.len());
    }
}
