//! Relation definitions and expression evaluation for the vivid reasoning engine.
//!
//! A relation is defined by a string `R<subscript>(<arg>, ...) <=> <expression>`.
//! To decide whether a tuple of values is in the relation, each argument name
//! of the expression is replaced by the literal form of a value and the
//! resulting text is handed to an [`EvaluatorChain`].
//!
//! ```
//! use vividexpr::{EvaluatorChain, RelationDefinition};
//!
//! let ahead = RelationDefinition::parse(
//!     "R1(h1, m1, h2, m2) <=> h1 > h2 or (h1 == h2 and m1 > m2)",
//!     1,
//! )
//! .unwrap();
//! let evaluators = EvaluatorChain::default();
//!
//! assert!(ahead.evaluate(&["6", "28", "5", "45"], &evaluators).unwrap());
//! assert!(!ahead.evaluate(&["5", "28", "5", "45"], &evaluators).unwrap());
//! ```

pub mod definition;
pub mod error;
pub mod eval;
pub mod evaluator;
mod parser;

pub use definition::{RelationDefinition, substitute};
pub use error::{Diagnostic, ExprError};
pub use eval::{ArithmeticEvaluator, Literal};
pub use evaluator::{Evaluator, EvaluatorChain};
