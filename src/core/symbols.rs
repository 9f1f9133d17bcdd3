use indexmap::IndexSet;

/// Interned activity label, unique within a single [`generate`](crate::generate) call.
///
/// [`Symbol`] values are only ever compared for equality or used as map
/// keys; the mapping back to the original activity-label string lives in
/// [`SymbolTable`].
pub type Symbol = u32;

/// Interned state name, scoped to the DFA that produced it (a single
/// process DFA, a single constraint-template DFA, or one stage of a
/// product construction). Two [`StateId`] values from different DFAs are
/// not comparable on their own; a product [`Tuple`] disambiguates by
/// position.
pub type StateId = u32;

/// A product state: one interned component per folded process/constraint,
/// in construction order (`spec.md` §3, "ordering of components is fixed
/// by construction order and is part of state identity").
pub type Tuple = Vec<StateId>;

/// Bijection between activity-label strings and their interned [`Symbol`].
///
/// Built once per [`generate`](crate::generate) call from the union of
/// every process's alphabet plus every constraint's `source_ref`/
/// `target_ref`, the way the teacher's `Determinizer` in `core/dfa.rs`
/// builds a single alphabet before running subset construction.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    labels: IndexSet<String>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `label`, returning its existing [`Symbol`] if already known.
    pub fn intern(&mut self, label: &str) -> Symbol {
        if let Some(idx) = self.labels.get_index_of(label) {
            return idx as Symbol;
        }
        let (idx, _) = self.labels.insert_full(label.to_string());
        idx as Symbol
    }

    /// Looks up an already-interned label without inserting it.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<Symbol> {
        self.labels.get_index_of(label).map(|idx| idx as Symbol)
    }

    #[must_use]
    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.labels
            .get_index(symbol as usize)
            .map(String::as_str)
            .unwrap_or("<unknown-symbol>")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        0..self.labels.len() as Symbol
    }
}

/// Bijection between a single DFA's opaque state-name strings and their
/// interned [`StateId`], plus a namespace for synthesizing fresh names
/// (e.g. `existence_1`, `ERROR_SINK`) the way the template catalog and
/// the totalizer need to.
#[derive(Debug, Clone, Default)]
pub struct StateTable {
    names: IndexSet<String>,
}

impl StateTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> StateId {
        if let Some(idx) = self.names.get_index_of(name) {
            return idx as StateId;
        }
        let (idx, _) = self.names.insert_full(name.to_string());
        idx as StateId
    }

    /// Allocates a fresh [`StateId`] for a synthetic state (e.g. a
    /// totalizer's error sink) that must not alias a caller-supplied name.
    /// Tries `base` first, then `base#1`, `base#2`, ... until an unused
    /// name is found, so a process that happens to declare a state
    /// literally named `base` never gets silently reinterpreted.
    pub fn reserve(&mut self, base: &str) -> StateId {
        if !self.names.contains(base) {
            return self.intern(base);
        }
        let mut suffix = 1u32;
        loop {
            let candidate = format!("{base}#{suffix}");
            if !self.names.contains(&candidate) {
                return self.intern(&candidate);
            }
            suffix += 1;
        }
    }

    #[must_use]
    pub fn resolve(&self, id: StateId) -> &str {
        self.names
            .get_index(id as usize)
            .map(String::as_str)
            .unwrap_or("<unknown-state>")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Everything needed to render an interned [`Tuple`] or [`Symbol`] back to
/// the opaque strings `spec.md` §6 specifies as the wire representation.
///
/// This is the one place the core touches the wire format: it exposes a
/// [`std::fmt::Display`] rendering of a tuple as `(c1,c2,...,ck)` (no
/// intra-comma spaces, per §6) and leaves the actual interchange encoding
/// (JSON or otherwise) to the external collaborator described in `spec.md`
/// §1.
#[derive(Debug, Clone)]
pub struct Dictionaries {
    pub symbols: SymbolTable,
    /// One [`StateTable`] per process, in the order processes were supplied.
    pub process_states: Vec<StateTable>,
    /// One [`StateTable`] per constraint, in the order constraints were folded.
    pub constraint_states: Vec<StateTable>,
}

impl Dictionaries {
    #[must_use]
    pub fn render_tuple(&self, tuple: &Tuple) -> String {
        let mut out = String::from("(");
        for (i, &component) in tuple.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(self.resolve_component(i, component));
        }
        out.push(')');
        out
    }

    fn resolve_component(&self, position: usize, id: StateId) -> &str {
        if position < self.process_states.len() {
            self.process_states[position].resolve(id)
        } else {
            let constraint_idx = position - self.process_states.len();
            self.constraint_states
                .get(constraint_idx)
                .map(|t| t.resolve(id))
                .unwrap_or("<unknown-state>")
        }
    }
}
