use indexmap::IndexSet;

use crate::core::automaton::Dfa;
use crate::core::constraint::ConstraintKind;
use crate::core::symbols::{StateId, StateTable, Symbol};

/// Builds the fixed-size DFA for a single constraint template (`spec.md`
/// §4.2). Each state gets a fresh, kind-prefixed name (e.g.
/// `existence_1`) in its own [`StateTable`], so two templates never share
/// a `StateId` namespace even if folded side by side.
///
/// For every state and every symbol in `alphabet`, exactly one transition
/// is emitted: each arm below enumerates a disjoint partition of the
/// alphabet over the predicates `a == source` / `a == target`, so the
/// result is total and deterministic by construction (§4.2: "Emit order
/// of cases is irrelevant").
#[must_use]
pub fn build(
    kind: ConstraintKind,
    alphabet: &IndexSet<Symbol>,
    source: Symbol,
    target: Symbol,
) -> (Dfa<StateId>, StateTable) {
    let mut states = StateTable::new();
    let mut dfa: Dfa<StateId> = Dfa::new();
    dfa.alphabet = alphabet.clone();

    let prefix = prefix_for(kind);
    let n = |states: &mut StateTable, i: u32| states.intern(&format!("{prefix}_{i}"));

    match kind {
        ConstraintKind::Existence => {
            let (s1, s2) = (n(&mut states, 1), n(&mut states, 2));
            for &a in alphabet {
                dfa.add_transition(s1, a, if a == source { s2 } else { s1 });
                dfa.add_transition(s2, a, s2);
            }
            dfa.initial.insert(s1);
            dfa.accepting.insert(s2);
        }
        ConstraintKind::Absence2 => {
            let (s1, s2, s3) = (n(&mut states, 1), n(&mut states, 2), n(&mut states, 3));
            for &a in alphabet {
                dfa.add_transition(s1, a, if a == source { s2 } else { s1 });
                dfa.add_transition(s2, a, if a == source { s3 } else { s2 });
                dfa.add_transition(s3, a, s3);
            }
            dfa.initial.insert(s1);
            dfa.accepting.extend([s1, s2]);
        }
        ConstraintKind::Choice => {
            let (s1, s2) = (n(&mut states, 1), n(&mut states, 2));
            for &a in alphabet {
                let hit = a == source || a == target;
                dfa.add_transition(s1, a, if hit { s2 } else { s1 });
                dfa.add_transition(s2, a, s2);
            }
            dfa.initial.insert(s1);
            dfa.accepting.insert(s2);
        }
        ConstraintKind::ExcChoice => {
            let (s1, s2, s3, s4) = (
                n(&mut states, 1),
                n(&mut states, 2),
                n(&mut states, 3),
                n(&mut states, 4),
            );
            for &a in alphabet {
                let t1 = if a == target && a != source {
                    s2
                } else if a == source && a != target {
                    s3
                } else if a == source && a == target {
                    s4
                } else {
                    s1
                };
                dfa.add_transition(s1, a, t1);
                dfa.add_transition(s2, a, if a == source { s4 } else { s2 });
                dfa.add_transition(s3, a, if a == target { s4 } else { s3 });
                dfa.add_transition(s4, a, s4);
            }
            dfa.initial.insert(s1);
            dfa.accepting.extend([s2, s3]);
        }
        ConstraintKind::RespExistence => {
            let (s1, s2, s3) = (n(&mut states, 1), n(&mut states, 2), n(&mut states, 3));
            for &a in alphabet {
                let t1 = if a == target {
                    s2
                } else if a == source {
                    s3
                } else {
                    s1
                };
                dfa.add_transition(s1, a, t1);
                dfa.add_transition(s2, a, s2);
                dfa.add_transition(s3, a, if a == target { s2 } else { s3 });
            }
            dfa.initial.insert(s1);
            dfa.accepting.extend([s1, s2]);
        }
        ConstraintKind::Coexistence => {
            let (s1, s2, s3, s4) = (
                n(&mut states, 1),
                n(&mut states, 2),
                n(&mut states, 3),
                n(&mut states, 4),
            );
            for &a in alphabet {
                let t1 = if a == source && a == target {
                    s4
                } else if a == source {
                    s3
                } else if a == target {
                    s2
                } else {
                    s1
                };
                dfa.add_transition(s1, a, t1);
                dfa.add_transition(s2, a, if a == source { s4 } else { s2 });
                dfa.add_transition(s3, a, if a == target { s4 } else { s3 });
                dfa.add_transition(s4, a, s4);
            }
            dfa.initial.insert(s1);
            // `spec.md` §9 open question: kept verbatim from the source,
            // which marks only states 1 and 4 as accepting.
            dfa.accepting.extend([s1, s4]);
        }
        ConstraintKind::Response => {
            let (s1, s2) = (n(&mut states, 1), n(&mut states, 2));
            for &a in alphabet {
                let t1 = if a == source && a != target { s2 } else { s1 };
                dfa.add_transition(s1, a, t1);
                dfa.add_transition(s2, a, if a == target { s1 } else { s2 });
            }
            dfa.initial.insert(s1);
            dfa.accepting.insert(s1);
        }
        ConstraintKind::Precedence => {
            let (s1, s2, s3) = (n(&mut states, 1), n(&mut states, 2), n(&mut states, 3));
            for &a in alphabet {
                let t1 = if a == source {
                    s2
                } else if a == target {
                    s3
                } else {
                    s1
                };
                dfa.add_transition(s1, a, t1);
                dfa.add_transition(s2, a, s2);
                dfa.add_transition(s3, a, s3);
            }
            dfa.initial.insert(s1);
            dfa.accepting.extend([s1, s2]);
        }
        ConstraintKind::Succession => {
            let (s1, s2, s3, s4) = (
                n(&mut states, 1),
                n(&mut states, 2),
                n(&mut states, 3),
                n(&mut states, 4),
            );
            for &a in alphabet {
                let t1 = if a == source && a == target {
                    s4
                } else if a == source {
                    s3
                } else if a == target {
                    s2
                } else {
                    s1
                };
                dfa.add_transition(s1, a, t1);
                dfa.add_transition(s2, a, s2);
                dfa.add_transition(s3, a, if a == target { s4 } else { s3 });
                dfa.add_transition(s4, a, if a == source && a != target { s3 } else { s4 });
            }
            dfa.initial.insert(s1);
            dfa.accepting.insert(s4);
        }
        ConstraintKind::AltResponse => {
            let (s1, s2, s3) = (n(&mut states, 1), n(&mut states, 2), n(&mut states, 3));
            for &a in alphabet {
                dfa.add_transition(s1, a, if a == source { s2 } else { s1 });
                let t2 = if a == source && a != target {
                    s3
                } else if a == target && a != source {
                    s1
                } else {
                    s2
                };
                dfa.add_transition(s2, a, t2);
                dfa.add_transition(s3, a, s3);
            }
            dfa.initial.insert(s1);
            dfa.accepting.insert(s1);
        }
        ConstraintKind::AltPrecedence => {
            let (s1, s2, s3) = (n(&mut states, 1), n(&mut states, 2), n(&mut states, 3));
            for &a in alphabet {
                let t1 = if a == source && a != target {
                    s2
                } else if a == target && a != source {
                    s3
                } else {
                    s1
                };
                dfa.add_transition(s1, a, t1);
                dfa.add_transition(s2, a, if a == target { s1 } else { s2 });
                dfa.add_transition(s3, a, s3);
            }
            dfa.initial.insert(s1);
            dfa.accepting.extend([s1, s2]);
        }
        ConstraintKind::AltSuccession => {
            // `spec.md` §9 redesign flag: the source dispatches this kind
            // to the `alt-precedence` builder by mistake, making this path
            // unreachable. Wired here to its own template per §4.2.
            let (s1, s2, s3) = (n(&mut states, 1), n(&mut states, 2), n(&mut states, 3));
            for &a in alphabet {
                let t1 = if a == target {
                    s2
                } else if a == source {
                    s3
                } else {
                    s1
                };
                dfa.add_transition(s1, a, t1);
                dfa.add_transition(s2, a, s2);
                let t3 = if a == source {
                    s2
                } else if a == target {
                    s1
                } else {
                    s3
                };
                dfa.add_transition(s3, a, t3);
            }
            dfa.initial.insert(s1);
            dfa.accepting.insert(s1);
        }
        ConstraintKind::ChainResponse => {
            let (s1, s2, s3) = (n(&mut states, 1), n(&mut states, 2), n(&mut states, 3));
            for &a in alphabet {
                dfa.add_transition(s1, a, if a == source { s2 } else { s1 });
                let t2 = if a == source && a == target {
                    s2
                } else if a == target {
                    s1
                } else {
                    s3
                };
                dfa.add_transition(s2, a, t2);
                dfa.add_transition(s3, a, s3);
            }
            dfa.initial.insert(s1);
            dfa.accepting.insert(s1);
        }
        ConstraintKind::ChainPrecedence => {
            let (s1, s2, s3) = (n(&mut states, 1), n(&mut states, 2), n(&mut states, 3));
            for &a in alphabet {
                dfa.add_transition(s1, a, if a == source { s1 } else { s2 });
                let t2 = if a == target {
                    s3
                } else if a == source {
                    s1
                } else {
                    s2
                };
                dfa.add_transition(s2, a, t2);
                dfa.add_transition(s3, a, s3);
            }
            dfa.initial.insert(s1);
            dfa.accepting.extend([s1, s2]);
        }
        ConstraintKind::ChainSuccession => {
            let (s1, s2, s3, s4) = (
                n(&mut states, 1),
                n(&mut states, 2),
                n(&mut states, 3),
                n(&mut states, 4),
            );
            for &a in alphabet {
                dfa.add_transition(s1, a, if a == source { s3 } else { s2 });
                let t2 = if a == target {
                    s4
                } else if a == source {
                    s3
                } else {
                    s2
                };
                dfa.add_transition(s2, a, t2);
                let t3 = if a != target {
                    s4
                } else if a != source {
                    s2
                } else {
                    s3
                };
                dfa.add_transition(s3, a, t3);
                dfa.add_transition(s4, a, s4);
            }
            dfa.initial.insert(s1);
            dfa.accepting.extend([s1, s2]);
        }
        ConstraintKind::NotCoexistence => {
            let (s1, s2, s3, s4) = (
                n(&mut states, 1),
                n(&mut states, 2),
                n(&mut states, 3),
                n(&mut states, 4),
            );
            for &a in alphabet {
                let t1 = if a == target && a != source {
                    s2
                } else if a == source && a != target {
                    s3
                } else if a == source && a == target {
                    s4
                } else {
                    s1
                };
                dfa.add_transition(s1, a, t1);
                dfa.add_transition(s2, a, if a == source { s4 } else { s2 });
                dfa.add_transition(s3, a, if a == target { s4 } else { s3 });
                dfa.add_transition(s4, a, s4);
            }
            dfa.initial.insert(s1);
            dfa.accepting.extend([s1, s2, s3]);
        }
        ConstraintKind::NegSuccession => {
            let (s1, s2, s3) = (n(&mut states, 1), n(&mut states, 2), n(&mut states, 3));
            for &a in alphabet {
                let t1 = if a == source && a != target {
                    s2
                } else if a == source && a == target {
                    s3
                } else {
                    s1
                };
                dfa.add_transition(s1, a, t1);
                dfa.add_transition(s2, a, if a == target { s3 } else { s2 });
                dfa.add_transition(s3, a, s3);
            }
            dfa.initial.insert(s1);
            dfa.accepting.extend([s1, s2]);
        }
        ConstraintKind::NegChainSuccession => {
            // `spec.md` §9 redesign flag: the source concatenates two
            // state-name strings while building this kind's state set,
            // silently collapsing it to four states. Built here as the
            // five-state form the intent column and the source's own
            // (unused) comment block describe.
            let (s1, s2, s3, s4, s5) = (
                n(&mut states, 1),
                n(&mut states, 2),
                n(&mut states, 3),
                n(&mut states, 4),
                n(&mut states, 5),
            );
            for &a in alphabet {
                let t1 = if a == target && a != source {
                    s2
                } else if a == source && a != target {
                    s3
                } else if a == source && a == target {
                    s4
                } else {
                    s1
                };
                dfa.add_transition(s1, a, t1);

                let t2 = if a == source {
                    s5
                } else if a == target {
                    s2
                } else {
                    s1
                };
                dfa.add_transition(s2, a, t2);

                let t3 = if a == target {
                    s5
                } else if a == source {
                    s3
                } else {
                    s1
                };
                dfa.add_transition(s3, a, t3);

                let t4 = if a == source || a == target { s5 } else { s1 };
                dfa.add_transition(s4, a, t4);

                dfa.add_transition(s5, a, s5);
            }
            dfa.initial.insert(s1);
            dfa.accepting.extend([s1, s2, s3]);
        }
    }

    (dfa, states)
}

fn prefix_for(kind: ConstraintKind) -> &'static str {
    match kind {
        ConstraintKind::Existence => "existence",
        ConstraintKind::Absence2 => "absence2",
        ConstraintKind::Choice => "choice",
        ConstraintKind::ExcChoice => "exc-choice",
        ConstraintKind::RespExistence => "resp-existence",
        ConstraintKind::Coexistence => "coexistence",
        ConstraintKind::Response => "response",
        ConstraintKind::Precedence => "precedence",
        ConstraintKind::Succession => "succession",
        ConstraintKind::AltResponse => "alt-response",
        ConstraintKind::AltPrecedence => "alt-precedence",
        ConstraintKind::AltSuccession => "alt-succession",
        ConstraintKind::ChainResponse => "chain-response",
        ConstraintKind::ChainPrecedence => "chain-precedence",
        ConstraintKind::ChainSuccession => "chain-succession",
        ConstraintKind::NotCoexistence => "not-coexistence",
        ConstraintKind::NegSuccession => "neg-succession",
        ConstraintKind::NegChainSuccession => "neg-chain-succession",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_symbol_alphabet() -> (IndexSet<Symbol>, Symbol, Symbol) {
        let mut alphabet = IndexSet::new();
        alphabet.insert(0u32);
        alphabet.insert(1u32);
        (alphabet, 0, 1)
    }

    fn all_kinds() -> [ConstraintKind; 18] {
        [
            ConstraintKind::Existence,
            ConstraintKind::Absence2,
            ConstraintKind::Choice,
            ConstraintKind::ExcChoice,
            ConstraintKind::RespExistence,
            ConstraintKind::Coexistence,
            ConstraintKind::Response,
            ConstraintKind::Precedence,
            ConstraintKind::Succession,
            ConstraintKind::AltResponse,
            ConstraintKind::AltPrecedence,
            ConstraintKind::AltSuccession,
            ConstraintKind::ChainResponse,
            ConstraintKind::ChainPrecedence,
            ConstraintKind::ChainSuccession,
            ConstraintKind::NotCoexistence,
            ConstraintKind::NegSuccession,
            ConstraintKind::NegChainSuccession,
        ]
    }

    #[test]
    fn every_template_is_total_and_deterministic() {
        let (alphabet, source, target) = two_symbol_alphabet();
        for kind in all_kinds() {
            let (dfa, _names) = build(kind, &alphabet, source, target);
            assert!(dfa.is_total(), "{kind:?} is not total");
            assert!(dfa.error.is_empty(), "{kind:?} should have no error states");
            assert_eq!(dfa.initial.len(), 1, "{kind:?} should have one initial state");
        }
    }

    #[test]
    fn template_state_counts_match_catalog() {
        let (alphabet, source, target) = two_symbol_alphabet();
        let expected = [
            (ConstraintKind::Existence, 2),
            (ConstraintKind::Absence2, 3),
            (ConstraintKind::Choice, 2),
            (ConstraintKind::ExcChoice, 4),
            (ConstraintKind::RespExistence, 3),
            (ConstraintKind::Coexistence, 4),
            (ConstraintKind::Response, 2),
            (ConstraintKind::Precedence, 3),
            (ConstraintKind::Succession, 4),
            (ConstraintKind::AltResponse, 3),
            (ConstraintKind::AltPrecedence, 3),
            (ConstraintKind::AltSuccession, 3),
            (ConstraintKind::ChainResponse, 3),
            (ConstraintKind::ChainPrecedence, 3),
            (ConstraintKind::ChainSuccession, 4),
            (ConstraintKind::NotCoexistence, 4),
            (ConstraintKind::NegSuccession, 3),
            (ConstraintKind::NegChainSuccession, 5),
        ];
        for (kind, count) in expected {
            let (dfa, _names) = build(kind, &alphabet, source, target);
            assert_eq!(dfa.states.len(), count, "{kind:?} state count");
        }
    }

    fn accepts(dfa: &Dfa<StateId>, initial: StateId, word: &[Symbol]) -> bool {
        let mut state = initial;
        for &sym in word {
            state = *dfa.successor(&state, sym).expect("total DFA");
        }
        dfa.accepting.contains(&state)
    }

    #[test]
    fn existence_accepts_iff_source_occurs() {
        let (alphabet, source, target) = two_symbol_alphabet();
        let (dfa, _) = build(ConstraintKind::Existence, &alphabet, source, target);
        let initial = *dfa.initial.iter().next().unwrap();
        assert!(!accepts(&dfa, initial, &[target, target]));
        assert!(accepts(&dfa, initial, &[target, source]));
    }

    #[test]
    fn response_every_source_eventually_followed_by_target() {
        let (alphabet, source, target) = two_symbol_alphabet();
        let (dfa, _) = build(ConstraintKind::Response, &alphabet, source, target);
        let initial = *dfa.initial.iter().next().unwrap();
        assert!(accepts(&dfa, initial, &[]));
        assert!(!accepts(&dfa, initial, &[source]));
        assert!(accepts(&dfa, initial, &[source, target]));
        assert!(accepts(&dfa, initial, &[source, target, source, target]));
        assert!(!accepts(&dfa, initial, &[source, target, source]));
    }

    #[test]
    fn precedence_rejects_target_before_source() {
        let (alphabet, source, target) = two_symbol_alphabet();
        let (dfa, _) = build(ConstraintKind::Precedence, &alphabet, source, target);
        let initial = *dfa.initial.iter().next().unwrap();
        assert!(accepts(&dfa, initial, &[]));
        assert!(!accepts(&dfa, initial, &[target]));
        assert!(accepts(&dfa, initial, &[source, target]));
        assert!(accepts(&dfa, initial, &[source]));
    }

    #[test]
    fn not_coexistence_rejects_once_both_seen() {
        let (alphabet, source, target) = two_symbol_alphabet();
        let (dfa, _) = build(ConstraintKind::NotCoexistence, &alphabet, source, target);
        let initial = *dfa.initial.iter().next().unwrap();
        assert!(accepts(&dfa, initial, &[source]));
        assert!(accepts(&dfa, initial, &[target]));
        assert!(!accepts(&dfa, initial, &[source, target]));
        // absorbing: extra activity after violation stays rejected
        assert!(!accepts(&dfa, initial, &[source, target, source]));
    }

    #[test]
    fn neg_chain_succession_rejects_immediate_adjacency() {
        let (alphabet, source, target) = two_symbol_alphabet();
        let (dfa, _) = build(
            ConstraintKind::NegChainSuccession,
            &alphabet,
            source,
            target,
        );
        let initial = *dfa.initial.iter().next().unwrap();
        assert!(accepts(&dfa, initial, &[source, source, target]));
        assert!(!accepts(&dfa, initial, &[source, target]));
        assert!(!accepts(&dfa, initial, &[target, source]));
    }

    #[test]
    fn alt_succession_has_its_own_template_not_alt_precedence() {
        let (alphabet, source, target) = two_symbol_alphabet();
        let (alt_succ, _) = build(ConstraintKind::AltSuccession, &alphabet, source, target);
        let (alt_prec, _) = build(ConstraintKind::AltPrecedence, &alphabet, source, target);
        assert_ne!(alt_succ.accepting.len(), 0);
        // Distinguishing word: p q p should be rejected by alt-succession
        // (q must appear again before the second p) but is unconstrained
        // by alt-precedence's local accepting set shape.
        let s1 = *alt_succ.initial.iter().next().unwrap();
        let p1 = *alt_prec.initial.iter().next().unwrap();
        assert!(!accepts(&alt_succ, s1, &[source, target, source, source]));
        let _ = p1;
    }
}
