//! Interpretations of relation symbols.
//!
//! An interpretation realizes every relation symbol of a vocabulary as a
//! relation of an attribute structure. The *profile* of a symbol says, for
//! each argument of the relation, which attribute of which formula term to
//! read: slot `(hour, 2)` reads the `hour` of the object denoted by the
//! second term.
use indexmap::IndexMap;
use smallvec::SmallVec;
use vividexpr::EvaluatorChain;

use crate::{
    assignment::{ConstantAssignment, VariableAssignment},
    relation::Relation,
    state::AscriptionKey,
    structure::AttributeStructure,
    utils::error::{VividError, VividResult},
    vocabulary::VocabularyRef,
};

/// One argument of a profile: an attribute label and a 1-based term index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileSlot {
    label: String,
    index: usize,
}

impl ProfileSlot {
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl std::fmt::Display for ProfileSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.label, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretedSymbol {
    relation: Relation,
    profile: SmallVec<ProfileSlot, 4>,
}

impl InterpretedSymbol {
    #[inline]
    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    #[inline]
    pub fn profile(&self) -> &[ProfileSlot] {
        &self.profile
    }

    /// The pair each slot reads for the given terms.
    ///
    /// Terms are resolved through the constants first, then the variables.
    /// Fails with the first term bound by neither.
    pub(crate) fn resolve<'t>(
        &self,
        terms: &'t [String],
        constants: &ConstantAssignment,
        variables: &VariableAssignment,
    ) -> Result<Vec<AscriptionKey>, &'t str> {
        self.profile
            .iter()
            .map(|slot| {
                let term = terms[slot.index - 1].as_str();
                constants
                    .get(term)
                    .or_else(|| variables.get(term))
                    .map(|object| AscriptionKey::new(slot.label.as_str(), object))
                    .ok_or(term)
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Interpretation {
    vocabulary: VocabularyRef,
    entries: IndexMap<String, InterpretedSymbol>,
    evaluators: EvaluatorChain,
}

impl Interpretation {
    /// An interpretation without entries, evaluating with the default evaluators.
    pub fn new(vocabulary: VocabularyRef) -> Self {
        Self {
            vocabulary,
            entries: IndexMap::new(),
            evaluators: EvaluatorChain::default(),
        }
    }

    pub fn with_evaluators(mut self, evaluators: EvaluatorChain) -> Self {
        self.evaluators = evaluators;
        self
    }

    /// Realize `symbol` as relation `R<subscript>` of `structure` through `profile`.
    pub fn insert<L: Into<String>>(
        &mut self,
        structure: &AttributeStructure,
        symbol: &str,
        subscript: u64,
        profile: impl IntoIterator<Item = (L, usize)>,
    ) -> VividResult<()> {
        let arity = self
            .vocabulary
            .read()
            .relation_symbol(symbol)
            .map(|symbol| symbol.arity())
            .ok_or_else(|| VividError::UnknownSymbol {
                name: symbol.to_string(),
                kind: "relation symbol",
            })?;
        if self.entries.contains_key(symbol) {
            return Err(VividError::DuplicateSymbol {
                name: symbol.to_string(),
                kind: "interpreted symbol",
            });
        }

        let relation = structure.relation(subscript)?;
        let profile: SmallVec<ProfileSlot, 4> = profile
            .into_iter()
            .map(|(label, index)| ProfileSlot {
                label: label.into(),
                index,
            })
            .collect();

        let invalid = |reason: String| VividError::InvalidProfile {
            symbol: symbol.to_string(),
            reason,
        };

        if profile.len() != relation.arity() {
            return Err(invalid(format!(
                "{} slot(s) for relation R{} of arity {}",
                profile.len(),
                subscript,
                relation.arity()
            )));
        }
        for (position, (slot, label)) in profile.iter().zip(relation.domain()).enumerate() {
            if slot.label != *label {
                return Err(invalid(format!(
                    "slot #{} reads '{}' but R{} expects '{}'",
                    position + 1,
                    slot.label,
                    subscript,
                    label
                )));
            }
            if slot.index == 0 || slot.index > arity {
                return Err(invalid(format!(
                    "slot #{} refers to term {} of a symbol of arity {}",
                    position + 1,
                    slot.index,
                    arity
                )));
            }
        }

        self.entries.insert(
            symbol.to_string(),
            InterpretedSymbol {
                relation: relation.clone(),
                profile,
            },
        );
        Ok(())
    }

    #[inline]
    pub fn vocabulary(&self) -> &VocabularyRef {
        &self.vocabulary
    }

    #[inline]
    pub fn evaluators(&self) -> &EvaluatorChain {
        &self.evaluators
    }

    pub fn entry(&self, symbol: &str) -> VividResult<&InterpretedSymbol> {
        self.entries
            .get(symbol)
            .ok_or_else(|| VividError::UninterpretedSymbol(symbol.to_string()))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &InterpretedSymbol)> {
        self.entries.iter().map(|(symbol, entry)| (symbol.as_str(), entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        attribute::Attribute,
        vocabulary::{RelationSymbol, Vocabulary},
    };
    use vividset::{Interval, Value};

    fn structure() -> AttributeStructure {
        AttributeStructure::new(
            [
                Attribute::new("hour", Value::from(Interval::int(1, 12).unwrap())).unwrap(),
                Attribute::new("minute", Value::from(Interval::int(0, 59).unwrap())).unwrap(),
            ],
            [Relation::new(
                "R1(h1, m1, h2, m2) <=> h1 > h2 or (h1 == h2 and m1 > m2)",
                1,
                ["hour", "minute", "hour", "minute"],
            )
            .unwrap()],
        )
        .unwrap()
    }

    fn vocabulary() -> VocabularyRef {
        Vocabulary::new(["c1", "c2"], [RelationSymbol::new("Ahead", 2)], ["x"])
            .unwrap()
            .into_shared()
    }

    const AHEAD: [(&str, usize); 4] = [("hour", 1), ("minute", 1), ("hour", 2), ("minute", 2)];

    #[test]
    fn profiles_are_validated() {
        let structure = structure();
        let mut interpretation = Interpretation::new(vocabulary());

        let err = interpretation
            .insert(&structure, "Behind", 1, AHEAD)
            .unwrap_err();
        assert!(err.is_unknown_symbol());

        let err = interpretation
            .insert(&structure, "Ahead", 2, AHEAD)
            .unwrap_err();
        assert!(err.is_unknown_relation());

        let err = interpretation
            .insert(&structure, "Ahead", 1, [("hour", 1), ("minute", 1)])
            .unwrap_err();
        assert!(err.is_invalid_profile());

        let err = interpretation
            .insert(&structure, "Ahead", 1, [("minute", 1), ("hour", 1), ("hour", 2), ("minute", 2)])
            .unwrap_err();
        assert!(err.is_invalid_profile());

        let err = interpretation
            .insert(&structure, "Ahead", 1, [("hour", 1), ("minute", 1), ("hour", 3), ("minute", 0)])
            .unwrap_err();
        assert!(err.is_invalid_profile());

        interpretation.insert(&structure, "Ahead", 1, AHEAD).unwrap();
        assert_eq!(interpretation.entry("Ahead").unwrap().profile().len(), 4);
        assert!(
            interpretation
                .insert(&structure, "Ahead", 1, AHEAD)
                .unwrap_err()
                .is_duplicate_symbol()
        );
    }

    #[test]
    fn slots_resolve_through_constants_then_variables() {
        let structure = structure();
        let vocabulary = vocabulary();
        let mut interpretation = Interpretation::new(vocabulary.clone());
        interpretation.insert(&structure, "Ahead", 1, AHEAD).unwrap();
        let entry = interpretation.entry("Ahead").unwrap();

        let constants = ConstantAssignment::new(vocabulary.clone(), [("c1", "s1")]).unwrap();
        let variables = VariableAssignment::new(vocabulary.clone(), [("x", "s2")]).unwrap();
        let terms = vec!["c1".to_string(), "x".to_string()];

        let keys = entry.resolve(&terms, &constants, &variables).unwrap();
        assert_eq!(
            keys,
            vec![
                AscriptionKey::new("hour", "s1"),
                AscriptionKey::new("minute", "s1"),
                AscriptionKey::new("hour", "s2"),
                AscriptionKey::new("minute", "s2"),
            ]
        );

        let unbound = vec!["c1".to_string(), "c2".to_string()];
        assert_eq!(entry.resolve(&unbound, &constants, &variables), Err("c2"));
        assert!(interpretation.entry("Behind").unwrap_err().is_uninterpreted_symbol());
    }
}
