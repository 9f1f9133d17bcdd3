use thiserror::Error;

/// Errors [`generate`](crate::generate) can return (`spec.md` §7).
///
/// An empty process list is *not* an error variant here: §7 treats it as
/// a valid degenerate input that produces a trivially-accepting product,
/// handled as an early-return branch in `generate` rather than a failure.
#[derive(Debug, Error, Clone)]
pub enum AutomataError {
    /// A constraint named a `kind` tag outside the closed catalog of 18
    /// templates (`spec.md` §4.2).
    #[error("unknown constraint kind: {kind}")]
    UnknownConstraintKind { kind: String },

    /// Two constraints in the input shared an `id` (`spec.md` §6:
    /// "ids are unique among the constraints of a single request").
    #[error("duplicate constraint id: {id}")]
    DuplicateConstraintId { id: String },

    /// A construction stage produced a DFA violating one of `spec.md`
    /// §3's basic invariants (e.g. accepting and error overlap, or a
    /// product state referenced a component never built). This should be
    /// unreachable given well-formed input; surfacing it as an error
    /// rather than panicking keeps a malformed `ProcessDfa` from taking
    /// down the caller.
    #[error("internal invariant violation: {detail}")]
    InternalInvariantViolation { detail: String },
}
