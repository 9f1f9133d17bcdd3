//! End-to-end scenarios, built entirely through the public
//! `constraint_automata` API: construct small process/constraint inputs
//! and assert on the resulting colored product's structure.

use constraint_automata::{generate, Color, Constraint, ConstraintKind, ProcessDfa};

fn always_accepting_process(labels: &[&str]) -> ProcessDfa {
    ProcessDfa {
        states: vec!["p0".into()],
        alphabet: labels.iter().map(|s| s.to_string()).collect(),
        transitions: labels
            .iter()
            .map(|s| ("p0".into(), s.to_string(), "p0".into()))
            .collect(),
        initial: vec!["p0".into()],
        accepting: vec!["p0".into()],
        error: vec![],
    }
}

/// Scenario 1: single process, `existence(A)` over `{A,B}`.
#[test]
fn scenario_single_process_existence() {
    let processes = vec![always_accepting_process(&["A", "B"])];
    let constraints = vec![Constraint {
        id: "c1".into(),
        source_ref: "A".into(),
        target_ref: String::new(),
        kind: ConstraintKind::Existence,
    }];
    let result = generate(&processes, &constraints).unwrap();

    let initial = result.current.expect("single initial state");
    assert_eq!(result.colors[&initial], vec![Color::TemporaryViolated]);

    let a = result.dictionaries.symbols.get("A").unwrap();
    let after_a = result.dfa.successor(&initial, a).unwrap().clone();
    assert_eq!(result.colors[&after_a], vec![Color::Satisfied]);
    assert!(result.dfa.accepting.contains(&after_a));
}

/// Scenario 2: single process, `response(A,B)` over `{A,B}`. `p0` always
/// self-loops, so the hybrid has exactly two reachable non-error states:
/// one paired with the template's accepting state (waiting for the next
/// `A`) and one paired with its non-accepting state (an `A` occurred and
/// `B` hasn't followed yet). The non-accepting one stays colored
/// `temporary_violated`, not `temporary_satisfied`: §4.7's local-status
/// formula keys strictly off constraint-template acceptance, and this is
/// the reading this crate follows (see `DESIGN.md`).
#[test]
fn scenario_response_tracks_pending_obligation() {
    let processes = vec![always_accepting_process(&["A", "B"])];
    let constraints = vec![Constraint {
        id: "c1".into(),
        source_ref: "A".into(),
        target_ref: "B".into(),
        kind: ConstraintKind::Response,
    }];
    let result = generate(&processes, &constraints).unwrap();

    let initial = result.current.expect("single initial state");
    assert_eq!(result.colors[&initial], vec![Color::Satisfied]);

    let a = result.dictionaries.symbols.get("A").unwrap();
    let b = result.dictionaries.symbols.get("B").unwrap();

    let after_a = result.dfa.successor(&initial, a).unwrap().clone();
    assert_eq!(result.colors[&after_a], vec![Color::TemporaryViolated]);

    let after_ab = result.dfa.successor(&after_a, b).unwrap().clone();
    assert_eq!(after_ab, initial);
    assert_eq!(result.colors[&after_ab], vec![Color::Satisfied]);
}

/// Scenario 3: two processes with disjoint alphabets `{A}` and `{X}`,
/// `coexistence(A,X)`. Four non-error states are reachable; the initial
/// one is colored `satisfied` since every path out of it eventually
/// passes back through an accepting configuration.
#[test]
fn scenario_coexistence_disjoint_processes() {
    let processes = vec![
        always_accepting_process(&["A"]),
        always_accepting_process(&["X"]),
    ];
    let constraints = vec![Constraint {
        id: "c1".into(),
        source_ref: "A".into(),
        target_ref: "X".into(),
        kind: ConstraintKind::Coexistence,
    }];
    let result = generate(&processes, &constraints).unwrap();

    let non_error: Vec<_> = result
        .dfa
        .states
        .iter()
        .filter(|s| !result.dfa.error.contains(*s))
        .collect();
    assert_eq!(non_error.len(), 4);

    let initial = result.current.expect("single initial state");
    assert_eq!(result.colors[&initial], vec![Color::Satisfied]);
}

/// Scenario 4: `not-coexistence(A,B)` over `{A,B}`, a single process that
/// allows any sequence. The state after both `A` and `B` have occurred is
/// absorbing, non-accepting, and colored `violated`.
#[test]
fn scenario_not_coexistence_absorbing_violation() {
    let processes = vec![always_accepting_process(&["A", "B"])];
    let constraints = vec![Constraint {
        id: "c1".into(),
        source_ref: "A".into(),
        target_ref: "B".into(),
        kind: ConstraintKind::NotCoexistence,
    }];
    let result = generate(&processes, &constraints).unwrap();

    let initial = result.current.expect("single initial state");
    let a = result.dictionaries.symbols.get("A").unwrap();
    let b = result.dictionaries.symbols.get("B").unwrap();

    let after_a = result.dfa.successor(&initial, a).unwrap().clone();
    let both_seen = result.dfa.successor(&after_a, b).unwrap().clone();

    assert!(!result.dfa.accepting.contains(&both_seen));
    assert_eq!(result.colors[&both_seen], vec![Color::Violated]);
    assert_eq!(result.dfa.successor(&both_seen, a), Some(&both_seen));
    assert_eq!(result.dfa.successor(&both_seen, b), Some(&both_seen));
}

/// Scenario 5: an unknown constraint kind tag. `spec.md` §4.2's closed
/// enum makes this unrepresentable inside `Constraint` itself; the error
/// is surfaced where an external string tag actually meets the type,
/// `ConstraintKind::parse`.
#[test]
fn scenario_unknown_constraint_kind() {
    let err = ConstraintKind::parse("banana").unwrap_err();
    assert_eq!(err.to_string(), "unknown constraint kind: banana");
}

/// Scenario 6: an empty process list is a valid degenerate input, not an
/// error.
#[test]
fn scenario_empty_process_list_is_degenerate() {
    let result = generate(&[], &[]).expect("empty input is not an error");
    assert_eq!(result.dfa.states.len(), 1);
    assert!(result.dfa.accepting.contains(result.current.as_ref().unwrap()));
    assert!(result.colors.is_empty());
}
