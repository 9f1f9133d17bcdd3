use std::collections::VecDeque;

use indexmap::IndexSet;
use tracing::debug;

use crate::core::automaton::Dfa;
use crate::core::process::ProcessAutomaton;
use crate::core::symbols::{StateId, Symbol, Tuple};

/// Shared lazy BFS product construction (`spec.md` §4.4, §4.5: both the
/// process composer and the constraint composer are a "synchronous
/// product of two DFAs over a partially-shared alphabet", differing only
/// in how a step moves one tuple to the next). Grounded on the teacher's
/// `Determinizer` worklist-over-`IndexMap` pattern in `core/dfa.rs`,
/// generalized from "subsets of NFA states" to "tuples of component
/// states".
///
/// Only tuples reachable from `seed` are ever enumerated (§4.4: "construct
/// `M` lazily by BFS from the initial tuple... pruning unreachable
/// states").
fn bfs_product(
    seed: Vec<Tuple>,
    alphabet: &IndexSet<Symbol>,
    mut step: impl FnMut(&Tuple, Symbol) -> Tuple,
) -> Dfa<Tuple> {
    let mut dfa: Dfa<Tuple> = Dfa::new();
    dfa.alphabet = alphabet.clone();

    let mut seen: IndexSet<Tuple> = IndexSet::new();
    let mut queue: VecDeque<Tuple> = VecDeque::new();

    for tuple in seed {
        dfa.initial.insert(tuple.clone());
        if seen.insert(tuple.clone()) {
            dfa.add_state(tuple.clone());
            queue.push_back(tuple);
        }
    }

    while let Some(tuple) = queue.pop_front() {
        for &symbol in alphabet {
            let next = step(&tuple, symbol);
            dfa.add_transition(tuple.clone(), symbol, next.clone());
            if seen.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }

    dfa
}

fn cartesian_initial(automata: &[ProcessAutomaton]) -> Vec<Tuple> {
    let mut combos: Vec<Tuple> = vec![Vec::new()];
    for automaton in automata {
        let mut next = Vec::new();
        for combo in &combos {
            for &state in &automaton.dfa.initial {
                let mut extended = combo.clone();
                extended.push(state);
                next.push(extended);
            }
        }
        combos = next;
    }
    combos
}

/// C4: synchronous product of the totalized per-process DFAs (`spec.md`
/// §4.4). A tuple's `i`-th component follows `automata[i]`'s own
/// transition when the symbol is in that process's declared alphabet;
/// otherwise the component self-loops, so a process is unaffected by
/// activity labels that belong to sibling processes only.
#[must_use]
pub fn compose_processes(automata: &[ProcessAutomaton]) -> Dfa<Tuple> {
    let mut alphabet: IndexSet<Symbol> = IndexSet::new();
    for automaton in automata {
        alphabet.extend(automaton.local_alphabet.iter().copied());
    }

    let seed = cartesian_initial(automata);
    let mut product = bfs_product(seed, &alphabet, |tuple, symbol| {
        tuple
            .iter()
            .enumerate()
            .map(|(i, &state)| {
                let automaton = &automata[i];
                if automaton.local_alphabet.contains(&symbol) {
                    *automaton
                        .dfa
                        .successor(&state, symbol)
                        .expect("totalized process DFA is total over its own alphabet")
                } else {
                    state
                }
            })
            .collect()
    });

    let reachable: Vec<Tuple> = product.states.iter().cloned().collect();
    for tuple in reachable {
        let accepting = tuple
            .iter()
            .enumerate()
            .all(|(i, &state)| automata[i].dfa.accepting.contains(&state));
        let error = tuple
            .iter()
            .enumerate()
            .any(|(i, &state)| automata[i].dfa.error.contains(&state));
        if accepting {
            product.accepting.insert(tuple.clone());
        }
        if error {
            product.error.insert(tuple);
        }
    }

    debug!(
        processes = automata.len(),
        states = product.states.len(),
        "composed multi-process DFA"
    );

    product
}

/// C5: one worklist expansion step folding a single constraint DFA `K`
/// into the running hybrid DFA `H` (`spec.md` §4.5). `H`'s own alphabet
/// is used to drive the walk, since the constraint templates (C2) are
/// always built over the same shared alphabet as the processes — the
/// "`K.transitions[k]` empty" fallback and the "K self-loops on unknown
/// labels" case collapse to the same rule: if the template has no
/// transition for `(k, a)`, carry `k` forward unchanged.
#[must_use]
pub fn fold_constraint(hybrid: &Dfa<Tuple>, template: &Dfa<StateId>) -> Dfa<Tuple> {
    let seed: Vec<Tuple> = hybrid
        .initial
        .iter()
        .flat_map(|h| {
            template.initial.iter().map(move |&k| {
                let mut tuple = h.clone();
                tuple.push(k);
                tuple
            })
        })
        .collect();

    let mut alphabet = hybrid.alphabet.clone();
    alphabet.extend(template.alphabet.iter().copied());

    let mut folded = bfs_product(seed, &alphabet, |tuple, symbol| {
        let (k, h) = tuple.split_last().expect("folded tuple is never empty");
        let h = h.to_vec();
        let h_next = hybrid
            .successor(&h, symbol)
            .cloned()
            .unwrap_or_else(|| h.clone());
        let k_next = template.successor(k, symbol).copied().unwrap_or(*k);
        let mut next = h_next;
        next.push(k_next);
        next
    });

    let reachable: Vec<Tuple> = folded.states.iter().cloned().collect();
    for tuple in reachable {
        let (k, h) = tuple.split_last().expect("folded tuple is never empty");
        let h = h.to_vec();
        if hybrid.accepting.contains(&h) && template.accepting.contains(k) {
            folded.accepting.insert(tuple.clone());
        }
        if hybrid.error.contains(&h) {
            folded.error.insert(tuple);
        }
    }

    debug!(
        hybrid_states = hybrid.states.len(),
        template_states = template.states.len(),
        folded_states = folded.states.len(),
        "folded constraint into hybrid DFA"
    );

    folded
}
