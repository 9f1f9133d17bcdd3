use crate::errors::AutomataError;

/// The closed catalog of 18 declarative constraint templates (`spec.md`
/// §4.2). Dispatch over this enum is a single `match`, not a method
/// table, per §9's "tagged variants" design note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Existence,
    Absence2,
    Choice,
    ExcChoice,
    RespExistence,
    Coexistence,
    Response,
    Precedence,
    Succession,
    AltResponse,
    AltPrecedence,
    AltSuccession,
    ChainResponse,
    ChainPrecedence,
    ChainSuccession,
    NotCoexistence,
    NegSuccession,
    NegChainSuccession,
}

impl ConstraintKind {
    /// Parses the wire-format tag (`spec.md` §4.2's table header column)
    /// into a [`ConstraintKind`]. This is the one place an external,
    /// untyped string tag becomes the closed enum; every other path in
    /// the crate carries a `ConstraintKind` directly.
    pub fn parse(kind: &str) -> Result<Self, AutomataError> {
        Ok(match kind {
            "existence" => Self::Existence,
            "absence2" => Self::Absence2,
            "choice" => Self::Choice,
            "exc-choice" => Self::ExcChoice,
            "resp-existence" => Self::RespExistence,
            "coexistence" => Self::Coexistence,
            "response" => Self::Response,
            "precedence" => Self::Precedence,
            "succession" => Self::Succession,
            "alt-response" => Self::AltResponse,
            "alt-precedence" => Self::AltPrecedence,
            "alt-succession" => Self::AltSuccession,
            "chain-response" => Self::ChainResponse,
            "chain-precedence" => Self::ChainPrecedence,
            "chain-succession" => Self::ChainSuccession,
            "not-coexistence" => Self::NotCoexistence,
            "neg-succession" => Self::NegSuccession,
            "neg-chain-succession" => Self::NegChainSuccession,
            other => {
                return Err(AutomataError::UnknownConstraintKind {
                    kind: other.to_string(),
                });
            }
        })
    }

    /// Whether the template takes a `target_ref` at all. `existence` and
    /// `absence2` are unary (`spec.md` §6: "targetRef: label (may be
    /// empty for unary constraints)").
    #[must_use]
    pub fn is_unary(self) -> bool {
        matches!(self, Self::Existence | Self::Absence2)
    }
}

/// A single declarative inter-process constraint (`spec.md` §6,
/// "Constraint input contract").
#[derive(Debug, Clone)]
pub struct Constraint {
    pub id: String,
    pub source_ref: String,
    pub target_ref: String,
    pub kind: ConstraintKind,
}
