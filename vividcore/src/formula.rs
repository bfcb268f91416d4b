//! Formulas, three-valued truth and assumption bases.
use std::{
    collections::BTreeSet,
    hash::{Hash, Hasher},
};

use indexmap::IndexSet;
use log::trace;
use strum::{Display, EnumIs};

use crate::{
    assignment::{ConstantAssignment, VariableAssignment},
    config::EngineConfig,
    interpretation::Interpretation,
    named_state::NamedState,
    state::AscriptionKey,
    utils::{
        budget::BudgetKind,
        error::{VividError, VividResult},
    },
    vocabulary::VocabularyRef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs)]
pub enum Truth {
    #[strum(serialize = "true")]
    True,
    #[strum(serialize = "false")]
    False,
    #[strum(serialize = "unknown")]
    Unknown,
}

impl From<bool> for Truth {
    fn from(value: bool) -> Self {
        if value { Truth::True } else { Truth::False }
    }
}

/// An atomic formula: a relation symbol applied to constants and variables.
///
/// Two formulas are equal when they share the vocabulary, the symbol and the
/// *set* of terms: `Ahead(c1, c2)` equals `Ahead(c2, c1)`. Evaluation on the
/// other hand is positional, so equal formulas may evaluate differently.
#[derive(Debug, Clone)]
pub struct Formula {
    vocabulary: VocabularyRef,
    name: String,
    terms: Vec<String>,
}

impl Formula {
    pub fn new<S: Into<String>>(
        vocabulary: VocabularyRef,
        name: impl Into<String>,
        terms: impl IntoIterator<Item = S>,
    ) -> VividResult<Self> {
        let name = name.into();
        let terms: Vec<String> = terms.into_iter().map(Into::into).collect();

        {
            let read = vocabulary.read();
            let symbol = read
                .relation_symbol(&name)
                .ok_or_else(|| VividError::UnknownSymbol {
                    name: name.clone(),
                    kind: "relation symbol",
                })?;
            if symbol.arity() != terms.len() {
                return Err(VividError::ArityMismatch {
                    symbol: name,
                    expected: symbol.arity(),
                    found: terms.len(),
                });
            }
            if let Some(term) = terms
                .iter()
                .find(|term| !read.is_constant(term) && !read.is_variable(term))
            {
                return Err(VividError::UnknownSymbol {
                    name: term.clone(),
                    kind: "constant or variable",
                });
            }
        }

        Ok(Self {
            vocabulary,
            name,
            terms,
        })
    }

    #[inline]
    pub fn vocabulary(&self) -> &VocabularyRef {
        &self.vocabulary
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    fn term_set(&self) -> BTreeSet<&str> {
        self.terms.iter().map(String::as_str).collect()
    }

    /// Three-valued truth of the formula in `named_state` under `variables`.
    ///
    /// `Unknown` when a term is bound by neither assignment, or when the
    /// worlds of the named state disagree. The relation only reads the pairs
    /// named by the profile, so only their valuations are enumerated.
    pub fn assign_truth_value(
        &self,
        interpretation: &Interpretation,
        named_state: &NamedState,
        variables: &VariableAssignment,
        config: &EngineConfig,
    ) -> VividResult<Truth> {
        self.vocabulary
            .ensure_same(interpretation.vocabulary(), "formula evaluation")?;
        self.vocabulary
            .ensure_same(named_state.vocabulary(), "formula evaluation")?;

        let entry = interpretation.entry(&self.name)?;
        let slots = match entry.resolve(&self.terms, named_state.assignment(), variables) {
            Ok(slots) => slots,
            Err(term) => {
                trace!("{self}: '{term}' is unbound");
                return Ok(Truth::Unknown);
            }
        };

        // A named state whose constants cannot all be placed has no world.
        if named_state.assignment().unbound_symbols().len() > named_state.free_objects().len() {
            return Ok(Truth::Unknown);
        }

        let mut keys: Vec<AscriptionKey> = Vec::with_capacity(slots.len());
        let positions: Vec<usize> = slots
            .into_iter()
            .map(|slot| match keys.iter().position(|key| *key == slot) {
                Some(position) => position,
                None => {
                    keys.push(slot);
                    keys.len() - 1
                }
            })
            .collect();

        let valuations = named_state
            .state()
            .valuations(&keys, &config.discretization)?;

        let (mut seen_true, mut seen_false) = (false, false);
        for valuation in config.budgeted(valuations, BudgetKind::Worlds) {
            let valuation = valuation?;
            let arguments: Vec<_> = positions.iter().map(|&p| &valuation[p]).collect();
            if entry.relation().evaluate(&arguments, interpretation.evaluators())? {
                seen_true = true;
            } else {
                seen_false = true;
            }
            if seen_true && seen_false {
                return Ok(Truth::Unknown);
            }
        }

        Ok(match (seen_true, seen_false) {
            (true, false) => Truth::True,
            (false, true) => Truth::False,
            _ => Truth::Unknown,
        })
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.vocabulary.same_as(&other.vocabulary)
            && self.name == other.name
            && self.term_set() == other.term_set()
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.term_set().hash(state);
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.terms.join(", "))
    }
}

/// The union of the pairs the `formulas` read under the given assignments.
///
/// Every term must be bound, unlike in evaluation where an unbound term
/// merely makes the formula unknown.
pub fn basis<'f>(
    formulas: impl IntoIterator<Item = &'f Formula>,
    interpretation: &Interpretation,
    constants: &ConstantAssignment,
    variables: &VariableAssignment,
) -> VividResult<BTreeSet<AscriptionKey>> {
    let mut keys = BTreeSet::new();
    for formula in formulas {
        let entry = interpretation.entry(formula.name())?;
        let resolved = entry
            .resolve(formula.terms(), constants, variables)
            .map_err(|term| VividError::UnboundTerm {
                formula: formula.to_string(),
                term: term.to_string(),
            })?;
        keys.extend(resolved);
    }
    Ok(keys)
}

/// A deduplicated, order-stable set of formulas over one vocabulary.
#[derive(Debug, Clone)]
pub struct AssumptionBase {
    vocabulary: VocabularyRef,
    formulas: IndexSet<Formula>,
}

impl AssumptionBase {
    pub fn new(
        vocabulary: VocabularyRef,
        formulas: impl IntoIterator<Item = Formula>,
    ) -> VividResult<Self> {
        let mut base = Self {
            vocabulary,
            formulas: IndexSet::new(),
        };
        for formula in formulas {
            base.insert(formula)?;
        }
        Ok(base)
    }

    pub fn empty(vocabulary: VocabularyRef) -> Self {
        Self {
            vocabulary,
            formulas: IndexSet::new(),
        }
    }

    /// Add a formula; returns `false` if an equal formula is already present.
    pub fn insert(&mut self, formula: Formula) -> VividResult<bool> {
        self.vocabulary
            .ensure_same(formula.vocabulary(), "assumption base")?;
        Ok(self.formulas.insert(formula))
    }

    /// Copy of this base with `formula` added.
    pub fn with(&self, formula: Formula) -> VividResult<Self> {
        let mut extended = self.clone();
        extended.insert(formula)?;
        Ok(extended)
    }

    pub fn union(&self, other: &AssumptionBase) -> VividResult<Self> {
        self.vocabulary
            .ensure_same(&other.vocabulary, "assumption base union")?;
        let mut union = self.clone();
        union.formulas.extend(other.formulas.iter().cloned());
        Ok(union)
    }

    /// `true` if both bases share the vocabulary and every formula of `self` is in `other`.
    pub fn is_subset_of(&self, other: &AssumptionBase) -> bool {
        self.vocabulary.same_as(&other.vocabulary)
            && self.formulas.iter().all(|formula| other.formulas.contains(formula))
    }

    #[inline]
    pub fn vocabulary(&self) -> &VocabularyRef {
        &self.vocabulary
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, Formula> {
        self.formulas.iter()
    }

    pub fn contains(&self, formula: &Formula) -> bool {
        self.formulas.contains(formula)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

impl<'a> IntoIterator for &'a AssumptionBase {
    type Item = &'a Formula;
    type IntoIter = indexmap::set::Iter<'a, Formula>;

    fn into_iter(self) -> Self::IntoIter {
        self.formulas.iter()
    }
}

impl PartialEq for AssumptionBase {
    fn eq(&self, other: &Self) -> bool {
        self.is_subset_of(other) && other.is_subset_of(self)
    }
}

impl Eq for AssumptionBase {}

impl std::fmt::Display for AssumptionBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (index, formula) in self.formulas.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{formula}")?;
        }
        write!(f, "}}")
    }
}
