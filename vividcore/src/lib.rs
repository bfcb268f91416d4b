//! Semantic engine of the vivid hybrid diagrammatic/sentential calculus.
//!
//! The crate decides three-valued truth of [`formula::Formula`]s in partial
//! diagrams ([`named_state::NamedState`]), enumerates the worlds a diagram
//! admits, computes the alternate extensions behind the non-monotonic rules
//! and checks the inference rules of [`rules`].
//!
//! Every entity over a vocabulary holds the same shared
//! [`vocabulary::VocabularyRef`]; operands built over different vocabulary
//! handles are rejected even when their contents match. Enumerations are lazy
//! and bounded by the budgets of an [`config::EngineConfig`].

pub mod assignment;
pub mod attribute;
pub mod config;
pub mod context;
pub mod formula;
pub mod interpretation;
pub mod magic;
pub mod named_state;
pub mod relation;
pub mod rules;
pub mod state;
pub mod structure;
pub mod system;
pub mod utils;
pub mod vocabulary;

pub use vividexpr;
pub use vividset;

pub use assignment::{ConstantAssignment, VariableAssignment};
pub use attribute::Attribute;
pub use config::{Budget, EngineConfig};
pub use context::Context;
pub use formula::{AssumptionBase, Formula, Truth};
pub use interpretation::Interpretation;
pub use named_state::NamedState;
pub use relation::Relation;
pub use rules::{Proviso, Rule};
pub use state::{AscriptionKey, State};
pub use structure::AttributeStructure;
pub use system::AttributeSystem;
pub use utils::error::{VividError, VividResult};
pub use vocabulary::{RelationSymbol, Vocabulary, VocabularyRef};
