use strum::EnumIs;
use thiserror::Error;

/// A located parser message. Offsets are character offsets in the parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub start: usize,
    pub end: usize,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.start, self.end)
    }
}

fn join(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, EnumIs, Error)]
pub enum ExprError {
    /// The definition does not follow `R<subscript>(<arg>, ...) <=> <expression>`.
    #[error("Malformed relation definition `{definition}`: {}", join(.diagnostics))]
    MalformedDefinition {
        definition: String,
        diagnostics: Vec<Diagnostic>,
    },

    /// The subscript written in the definition differs from the relation's own.
    #[error("Relation definition is written for R{found} but the relation has subscript {expected}.")]
    SubscriptMismatch { expected: u64, found: u64 },

    /// Argument names must be pairwise distinct.
    #[error("Argument `{0}` appears more than once in the relation definition.")]
    DuplicateArgument(String),

    /// Substitution received a different number of values than there are arguments.
    #[error("Relation definition takes {expected} argument(s), {found} value(s) were supplied.")]
    ArgumentCount { expected: usize, found: usize },

    /// The expression is not part of the evaluator's language.
    #[error("Syntax error in `{expression}`: {}", join(.diagnostics))]
    Syntax {
        expression: String,
        diagnostics: Vec<Diagnostic>,
    },

    /// An operator or function received operands it is not defined on.
    #[error("Operator `{operator}` is not defined on {operands}.")]
    TypeMismatch { operator: String, operands: String },

    #[error("Division by zero.")]
    DivisionByZero,

    #[error("Unknown function `{0}`.")]
    UnknownFunction(String),

    #[error("Function `{function}` expects {expected} argument(s), got {found}.")]
    FunctionArity {
        function: String,
        expected: String,
        found: usize,
    },

    /// A name remained in the expression after substitution.
    #[error("Unbound name `{0}` in expression; every relation argument must be substituted before evaluation.")]
    UnboundName(String),

    /// The expression evaluated to something other than a boolean.
    #[error("Expression must evaluate to a boolean, got `{0}`.")]
    NotBoolean(String),

    /// No evaluator of the chain accepted the expression.
    #[error("No evaluator could parse `{expression}` (tried: {}).", .tried.join(", "))]
    Unparseable {
        expression: String,
        tried: Vec<String>,
    },
}
