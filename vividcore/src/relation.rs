use vividexpr::{EvaluatorChain, RelationDefinition};
use vividset::Value;

use crate::utils::error::{VividError, VividResult};

/// A relation over attribute values, defined by a textual expression.
///
/// The `domain` lists, position by position, the attribute each argument of
/// the definition ranges over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    definition: RelationDefinition,
    domain: Vec<String>,
}

impl Relation {
    pub fn new<S: Into<String>>(
        definition: &str,
        subscript: u64,
        domain: impl IntoIterator<Item = S>,
    ) -> VividResult<Self> {
        let definition = RelationDefinition::parse(definition, subscript)?;
        let domain: Vec<String> = domain.into_iter().map(Into::into).collect();

        if domain.len() != definition.arity() {
            return Err(VividError::RelationDomain {
                subscript,
                arguments: definition.arity(),
                domain: domain.len(),
            });
        }

        Ok(Self { definition, domain })
    }

    #[inline]
    pub fn subscript(&self) -> u64 {
        self.definition.subscript()
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.definition.arity()
    }

    #[inline]
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    #[inline]
    pub fn definition(&self) -> &RelationDefinition {
        &self.definition
    }

    /// Decide whether `values` (one per argument) are in the relation.
    pub fn evaluate(&self, values: &[&Value], evaluators: &EvaluatorChain) -> VividResult<bool> {
        let literals: Vec<String> = values.iter().map(|value| value.literal()).collect();
        Ok(self.definition.evaluate(&literals, evaluators)?)
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} over ({})", self.definition, self.domain.join(", "))
    }
}
