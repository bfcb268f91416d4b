use strum::EnumIs;
use thiserror::Error;
use vividexpr::ExprError;
use vividset::ValueSetError;

use crate::{
    rules::{Proviso, Rule},
    utils::budget::BudgetKind,
};

#[derive(Debug, EnumIs, Error)]
pub enum VividError {
    #[error(transparent)]
    ValueSet(#[from] ValueSetError),

    #[error(transparent)]
    Expr(#[from] ExprError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration file '{file}': {source}")]
    ConfigParse {
        source: toml::de::Error,
        file: String,
    },

    #[error("Failed to serialize configuration for '{file}': {source}")]
    ConfigSerialize {
        source: toml::ser::Error,
        file: String,
    },

    /// Operands built over different vocabularies. Vocabularies are compared by
    /// identity: two structurally equal vocabularies are still different.
    #[error("{operation} requires every operand to share one vocabulary.")]
    VocabularyMismatch { operation: &'static str },

    /// Operands built over different attribute systems.
    #[error("{operation} requires every operand to share one attribute system.")]
    SystemMismatch { operation: &'static str },

    #[error("Symbol '{name}' is already declared as a {kind} in the vocabulary.")]
    DuplicateSymbol { name: String, kind: &'static str },

    #[error("'{name}' is not a {kind} of the vocabulary.")]
    UnknownSymbol { name: String, kind: &'static str },

    #[error("Relation symbol '{symbol}' has arity {expected}, got {found} term(s).")]
    ArityMismatch {
        symbol: String,
        expected: usize,
        found: usize,
    },

    #[error("Object '{object}' would be assigned to both '{first}' and '{second}'; assignments must be injective.")]
    NonInjective {
        object: String,
        first: String,
        second: String,
    },

    #[error("'{symbol}' is already assigned to '{bound}', cannot rebind it to '{object}'.")]
    ConflictingBinding {
        symbol: String,
        bound: String,
        object: String,
    },

    #[error("Object '{0}' is not part of the attribute system.")]
    UnknownObject(String),

    #[error("Object '{0}' already exists in the attribute system.")]
    DuplicateObject(String),

    #[error("Attribute '{0}' is not part of the attribute structure.")]
    UnknownAttribute(String),

    #[error("Attribute '{0}' is already part of the attribute structure.")]
    DuplicateAttribute(String),

    #[error("Attribute '{label}' has no possible values.")]
    EmptyAttribute { label: String },

    #[error("Relation R{0} is not part of the attribute structure.")]
    UnknownRelation(u64),

    #[error("Relation R{0} is already part of the attribute structure.")]
    DuplicateRelation(u64),

    /// An attribute cannot be removed while a relation ranges over it.
    #[error("Attribute '{label}' is still referenced by the domain of relation R{subscript}.")]
    AttributeInUse { label: String, subscript: u64 },

    #[error("Relation R{subscript} is defined over {arguments} argument(s) but its domain lists {domain} attribute(s).")]
    RelationDomain {
        subscript: u64,
        arguments: usize,
        domain: usize,
    },

    #[error("Ascription of '{label}({object})' must not be empty.")]
    EmptyAscription { label: String, object: String },

    #[error("Ascription {values} of '{label}({object})' is not within the possible values of '{label}'.")]
    AscriptionOutOfRange {
        label: String,
        object: String,
        values: String,
    },

    #[error("Invalid profile for relation symbol '{symbol}': {reason}")]
    InvalidProfile { symbol: String, reason: String },

    #[error("Relation symbol '{0}' has no entry in the interpretation.")]
    UninterpretedSymbol(String),

    #[error("Term '{term}' of formula {formula} is bound neither by the constant nor by the variable assignment.")]
    UnboundTerm { formula: String, term: String },

    /// Alternate extensions are taken against at least one case.
    #[error("Alternate extensions require at least one case state.")]
    NoCases,

    #[error("Case state #{index} is not a strict extension of the state.")]
    NotStrictExtension { index: usize },

    #[error("Case state #{index} is not a named extension of the named state.")]
    NotNamedExtension { index: usize },

    #[error("The supplied assumption base is not part of the context's assumption base.")]
    NotSubAssumptionBase,

    #[error("{rule} requires an interpretation when an assumption base is supplied.")]
    MissingInterpretation { rule: Rule },

    /// A proviso of an inference rule does not hold; the rule cannot be applied.
    /// This is distinct from the rule applying and yielding `false`.
    #[error("{rule} is not applicable: {proviso}.")]
    RuleInapplicable { rule: Rule, proviso: Proviso },

    #[error("Enumeration exceeded the budget of {limit} {kind}.")]
    BudgetExhausted { kind: BudgetKind, limit: usize },
}

pub type VividResult<T> = Result<T, VividError>;
