use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::core::automaton::Dfa;
use crate::core::symbols::{StateId, Tuple};

/// One constraint's status at a single hybrid-DFA state (`spec.md` §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Satisfied,
    TemporarySatisfied,
    TemporaryViolated,
    Violated,
}

/// C7: colors every non-error state of `hybrid` with respect to a single
/// constraint, whose own accepting set (in the constraint template's
/// `StateId` space) is `accepting_component` and whose tuple position is
/// `component_index`.
///
/// Implemented as two multi-source backward BFS passes over the non-error
/// subgraph (`spec.md` §4.7's "reverse BFS from states of each local
/// status" option), never recursively — products routinely exceed 10^5
/// states (§9), and a recursive DFS like the source's `changeColours`
/// would blow the stack at that scale. Globally accepting states of
/// `hybrid` are treated as having no outgoing edges in this graph: their
/// local status is final and does not get refined by what lies beyond
/// them (§4.7: "Accepting states... terminate a path").
#[must_use]
pub fn colorize(
    hybrid: &Dfa<Tuple>,
    component_index: usize,
    accepting_component: &HashSet<StateId>,
) -> HashMap<Tuple, Color> {
    let local_satisfied = |state: &Tuple| -> bool {
        accepting_component.contains(&state[component_index])
    };

    let mut forward: HashMap<Tuple, Vec<Tuple>> = HashMap::new();
    for state in &hybrid.states {
        if hybrid.error.contains(state) {
            continue;
        }
        if hybrid.accepting.contains(state) {
            forward.entry(state.clone()).or_default();
            continue;
        }
        let targets: Vec<Tuple> = hybrid
            .transitions
            .get(state)
            .into_iter()
            .flat_map(|row| row.values())
            .filter(|target| !hybrid.error.contains(*target))
            .cloned()
            .collect();
        forward.insert(state.clone(), targets);
    }

    let mut predecessors: HashMap<Tuple, Vec<Tuple>> = HashMap::new();
    for (state, targets) in &forward {
        for target in targets {
            predecessors.entry(target.clone()).or_default().push(state.clone());
        }
    }

    let mut satisfied_seeds = Vec::new();
    let mut violated_seeds = Vec::new();
    for state in forward.keys() {
        if local_satisfied(state) {
            satisfied_seeds.push(state.clone());
        } else {
            violated_seeds.push(state.clone());
        }
    }

    let reaches_satisfied = reverse_reachable(&predecessors, satisfied_seeds);
    let reaches_violated = reverse_reachable(&predecessors, violated_seeds);

    let mut colors = HashMap::new();
    for state in forward.keys() {
        let color = if local_satisfied(state) {
            if reaches_violated.contains(state) {
                Color::TemporarySatisfied
            } else {
                Color::Satisfied
            }
        } else if reaches_satisfied.contains(state) {
            Color::TemporaryViolated
        } else {
            Color::Violated
        };
        colors.insert(state.clone(), color);
    }

    debug!(
        component_index,
        colored = colors.len(),
        "colored hybrid DFA for one constraint"
    );

    colors
}

fn reverse_reachable(predecessors: &HashMap<Tuple, Vec<Tuple>>, seeds: Vec<Tuple>) -> HashSet<Tuple> {
    let mut reached: HashSet<Tuple> = HashSet::new();
    let mut queue: VecDeque<Tuple> = VecDeque::new();
    for seed in seeds {
        if reached.insert(seed.clone()) {
            queue.push_back(seed);
        }
    }
    while let Some(state) = queue.pop_front() {
        if let Some(preds) = predecessors.get(&state) {
            for pred in preds {
                if reached.insert(pred.clone()) {
                    queue.push_back(pred.clone());
                }
            }
        }
    }
    reached
}
