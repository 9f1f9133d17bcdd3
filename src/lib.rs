//! Builds a colored product automaton from a set of process DFAs and a
//! set of declarative inter-process constraints: totalize each process
//! (C3), fold them into a multi-process DFA (C4), rewire error states to
//! a single sink (C6), fold each constraint's template DFA in turn (C2 +
//! C5, rewiring after every fold), then color every non-error state of
//! the resulting hybrid DFA per constraint (C7).
//!
//! Parsing process models, network transport, rendering, and interchange
//! serialization are all external collaborators; this crate is the
//! automata algebra only.

pub mod core;
pub mod errors;

use std::collections::{HashMap, HashSet};

use tracing::info_span;

pub use crate::core::automaton::Dfa;
pub use crate::core::color::Color;
pub use crate::core::constraint::{Constraint, ConstraintKind};
pub use crate::core::process::ProcessDfa;
pub use crate::core::symbols::{Dictionaries, StateId, Symbol, Tuple};
pub use crate::errors::AutomataError;

use crate::core::process::ProcessAutomaton;
use crate::core::symbols::{StateTable, SymbolTable};
use crate::core::{color, compose, process, rewire, templates};

/// Output of [`generate`]: a hybrid DFA over product-state tuples plus a
/// per-constraint color for every non-error state (`spec.md` §6).
#[derive(Debug, Clone)]
pub struct ColoredProductDfa {
    pub dfa: Dfa<Tuple>,
    /// One entry per non-error state, a length-`constraints.len()` vector
    /// of colors in the order constraints were supplied.
    pub colors: HashMap<Tuple, Vec<Color>>,
    /// The single initial state, when the product has exactly one.
    pub current: Option<Tuple>,
    pub dictionaries: Dictionaries,
}

/// The single entry point (`spec.md` §6). An empty `processes` list is
/// the `EmptyInput` degenerate case (§7): it is not an error, it returns
/// a one-state trivially-accepting product with no colors.
pub fn generate(
    processes: &[ProcessDfa],
    constraints: &[Constraint],
) -> Result<ColoredProductDfa, AutomataError> {
    let span = info_span!(
        "generate",
        processes = processes.len(),
        constraints = constraints.len()
    );
    let _enter = span.enter();

    let mut seen_ids = HashSet::new();
    for constraint in constraints {
        if !seen_ids.insert(constraint.id.as_str()) {
            return Err(AutomataError::DuplicateConstraintId {
                id: constraint.id.clone(),
            });
        }
    }

    if processes.is_empty() {
        return Ok(empty_product());
    }

    let mut symbols = SymbolTable::new();
    let process_automata: Vec<ProcessAutomaton> = processes
        .iter()
        .map(|process| process::totalize(process, &mut symbols))
        .collect();
    let process_state_tables: Vec<StateTable> = process_automata
        .iter()
        .map(|automaton| automaton.states.clone())
        .collect();
    let num_processes = process_automata.len();

    let mut hybrid = compose::compose_processes(&process_automata);
    hybrid = rewire::rewire_errors(&hybrid, num_processes);

    let mut constraint_state_tables = Vec::with_capacity(constraints.len());
    let mut constraint_accepting = Vec::with_capacity(constraints.len());

    for constraint in constraints {
        let fold_span = info_span!("fold_constraint", id = %constraint.id);
        let _enter = fold_span.enter();

        let source = symbols.intern(&constraint.source_ref);
        let target = if constraint.target_ref.is_empty() {
            source
        } else {
            symbols.intern(&constraint.target_ref)
        };
        // A constraint may reference an activity label no process
        // declared; widening the running alphabet here keeps the
        // template total over the same symbols as `hybrid` (the fold's
        // own self-loop fallback in `compose::fold_constraint` handles
        // the resulting foreign symbol on the hybrid side).
        hybrid.alphabet.insert(source);
        hybrid.alphabet.insert(target);

        let (template, state_table) =
            templates::build(constraint.kind, &hybrid.alphabet, source, target);
        constraint_accepting.push(template.accepting.clone());
        constraint_state_tables.push(state_table);

        hybrid = compose::fold_constraint(&hybrid, &template);
        hybrid = rewire::rewire_errors(&hybrid, num_processes);
    }

    let expected_len = num_processes + constraints.len();
    let lengths_consistent = hybrid
        .states
        .iter()
        .all(|tuple| hybrid.error.contains(tuple) || tuple.len() == expected_len);
    if !lengths_consistent {
        return Err(AutomataError::InternalInvariantViolation {
            detail: "product tuple length does not match process and constraint count".into(),
        });
    }
    if !hybrid.check_basic_invariants() {
        return Err(AutomataError::InternalInvariantViolation {
            detail: "basic DFA invariants violated after construction".into(),
        });
    }

    let mut colors: HashMap<Tuple, Vec<Color>> = HashMap::new();
    for (idx, accepting_component) in constraint_accepting.iter().enumerate() {
        let component_index = num_processes + idx;
        let per_constraint = color::colorize(&hybrid, component_index, accepting_component);
        for (state, value) in per_constraint {
            colors
                .entry(state)
                .or_insert_with(|| vec![Color::Satisfied; constraints.len()])[idx] = value;
        }
    }

    let current = if hybrid.initial.len() == 1 {
        hybrid.initial.iter().next().cloned()
    } else {
        None
    };

    Ok(ColoredProductDfa {
        dfa: hybrid,
        colors,
        current,
        dictionaries: Dictionaries {
            symbols,
            process_states: process_state_tables,
            constraint_states: constraint_state_tables,
        },
    })
}

fn empty_product() -> ColoredProductDfa {
    let mut dfa: Dfa<Tuple> = Dfa::new();
    let only = vec![0u32];
    dfa.add_state(only.clone());
    dfa.initial.insert(only.clone());
    dfa.accepting.insert(only.clone());
    ColoredProductDfa {
        dfa,
        colors: HashMap::new(),
        current: Some(only),
        dictionaries: Dictionaries {
            symbols: SymbolTable::new(),
            process_states: Vec::new(),
            constraint_states: Vec::new(),
        },
    }
}
