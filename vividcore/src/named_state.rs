//! Named states: a state together with a partial constant assignment.
//!
//! Named states are the diagrams of the calculus. On top of the state-level
//! operations they enumerate the ways the unbound constants (and the
//! variables) may be assigned to the objects nobody names yet.
use std::collections::BTreeSet;

use auto_enums::auto_enum;
use log::{debug, trace};
use vividset::ValueSet;

use crate::{
    assignment::{ConstantAssignment, VariableAssignment},
    config::EngineConfig,
    formula::AssumptionBase,
    interpretation::Interpretation,
    state::{AlternateExtensions, AscriptionKey, State, Worlds},
    system::AttributeSystem,
    utils::{
        budget::BudgetKind,
        combinatorics::KPermutations,
        error::{VividError, VividResult},
    },
    vocabulary::VocabularyRef,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedState {
    state: State,
    assignment: ConstantAssignment,
}

impl NamedState {
    /// Pair `state` with `assignment`; every assigned object must exist in the state's system.
    pub fn new(state: State, assignment: ConstantAssignment) -> VividResult<Self> {
        if let Some(object) = assignment
            .objects()
            .into_iter()
            .find(|object| !state.system().contains_object(object))
        {
            return Err(VividError::UnknownObject(object.to_string()));
        }
        Ok(Self { state, assignment })
    }

    #[inline]
    pub fn state(&self) -> &State {
        &self.state
    }

    #[inline]
    pub fn assignment(&self) -> &ConstantAssignment {
        &self.assignment
    }

    #[inline]
    pub fn vocabulary(&self) -> &VocabularyRef {
        self.assignment.vocabulary()
    }

    #[inline]
    pub fn system(&self) -> &AttributeSystem {
        self.state.system()
    }

    pub fn ascription(&self, key: &AscriptionKey) -> VividResult<&ValueSet> {
        self.state.ascription(key)
    }

    /// Objects no constant denotes, in system order.
    pub fn free_objects(&self) -> Vec<String> {
        let bound = self.assignment.objects();
        self.system()
            .objects()
            .iter()
            .filter(|object| !bound.contains(object.as_str()))
            .cloned()
            .collect()
    }

    /// `true` if `self` carries at least the information of `other`.
    pub fn is_named_extension_of(&self, other: &NamedState) -> VividResult<bool> {
        self.vocabulary()
            .ensure_same(other.vocabulary(), "named state extension")?;
        Ok(self.state.is_extension_of(&other.state)?
            && self.assignment.is_superset_of(&other.assignment))
    }

    pub fn is_strict_named_extension_of(&self, other: &NamedState) -> VividResult<bool> {
        Ok(self.is_named_extension_of(other)? && self != other)
    }

    /// A world: every pair is a valuation and every constant is bound.
    pub fn is_world(&self) -> bool {
        self.state.is_world() && self.assignment.is_total()
    }

    /// Lazily enumerate the worlds extending this named state.
    ///
    /// The unbound constants are assigned injectively to the free objects; each
    /// such assignment is paired with every world of the state.
    pub fn worlds(&self, config: &EngineConfig) -> VividResult<impl Iterator<Item = NamedState>> {
        let worlds = if self.is_world() {
            None
        } else {
            Some(self.state.worlds(&config.discretization)?)
        };
        Ok(self.extend_worlds(worlds))
    }

    #[auto_enum(Iterator)]
    fn extend_worlds(&self, worlds: Option<Worlds<'_>>) -> impl Iterator<Item = NamedState> {
        match worlds {
            None => std::iter::once(self.clone()),
            Some(worlds) => {
                let unbound = self.assignment.unbound_symbols();
                let base = self.assignment.clone();
                trace!(
                    "extending {} unbound constant(s) over {} world(s)",
                    unbound.len(),
                    worlds.len_hint()
                );

                KPermutations::new(self.free_objects(), unbound.len()).flat_map(move |objects| {
                    let mut assignment = base.clone();
                    assignment.extend_unchecked(unbound.iter().cloned().zip(objects));
                    worlds.clone().map(move |state| NamedState {
                        state,
                        assignment: assignment.clone(),
                    })
                })
            }
        }
    }

    /// Every injective total map from the variables onto the free objects.
    ///
    /// Without variables, this is a single empty assignment.
    pub fn variable_assignments(&self) -> impl Iterator<Item = VariableAssignment> {
        let vocabulary = self.vocabulary().clone();
        let variables: Vec<String> = vocabulary.read().variables().iter().cloned().collect();

        KPermutations::new(self.free_objects(), variables.len()).map(move |objects| {
            let mut assignment = VariableAssignment::empty(vocabulary.clone());
            assignment.extend_unchecked(variables.iter().cloned().zip(objects));
            assignment
        })
    }

    fn check_cases(&self, cases: &[&NamedState]) -> VividResult<()> {
        if cases.is_empty() {
            return Err(VividError::NoCases);
        }
        for (index, case) in cases.iter().enumerate() {
            if !case.is_named_extension_of(self)? {
                return Err(VividError::NotNamedExtension { index });
            }
        }
        Ok(())
    }

    /// Lazily compute the named alternate extensions of `self` with respect to `cases`.
    ///
    /// Candidates extend the constant assignment to every constant the cases
    /// bind. For each candidate, the cases it does not conflict with are
    /// handed to [`State::alternate_extensions`]; when none remain, the
    /// candidate alone is an alternate extension.
    pub fn named_alternate_extensions(
        &self,
        cases: &[&NamedState],
    ) -> VividResult<NamedAlternateExtensions<'_>> {
        self.check_cases(cases)?;

        let mut constants: Vec<String> = Vec::new();
        for case in cases {
            for symbol in case.assignment.domain() {
                if !self.assignment.contains(symbol) && !constants.iter().any(|c| c == symbol) {
                    constants.push(symbol.to_string());
                }
            }
        }
        debug!(
            "named alternate extensions over {} case(s), {} constant(s) to place",
            cases.len(),
            constants.len()
        );

        Ok(NamedAlternateExtensions {
            base: self,
            cases: cases.iter().map(|&case| case.clone()).collect(),
            candidates: KPermutations::new(self.free_objects(), constants.len()),
            constants,
            current: None,
        })
    }

    /// `true` if `candidate` is one of the named alternate extensions of `self`.
    pub fn is_named_alternate_extension(
        &self,
        candidate: &NamedState,
        cases: &[&NamedState],
    ) -> VividResult<bool> {
        Ok(self
            .named_alternate_extensions(cases)?
            .any(|alternate| alternate == *candidate))
    }

    /// The proviso behind thinning and the diagrammatic compositions.
    ///
    /// Holds when every formula of `assumptions` is false in every named
    /// alternate extension of `cases`, under every variable assignment.
    pub fn is_named_entailment(
        &self,
        assumptions: &AssumptionBase,
        interpretation: &Interpretation,
        cases: &[&NamedState],
        config: &EngineConfig,
    ) -> VividResult<bool> {
        self.vocabulary()
            .ensure_same(assumptions.vocabulary(), "named entailment")?;
        self.vocabulary()
            .ensure_same(interpretation.vocabulary(), "named entailment")?;

        let alternates = self.named_alternate_extensions(cases)?;
        for alternate in config.budgeted(alternates, BudgetKind::Alternates) {
            let alternate = alternate?;
            for variables in config.budgeted(alternate.variable_assignments(), BudgetKind::Assignments) {
                let variables = variables?;
                for formula in assumptions.iter() {
                    let truth = formula.assign_truth_value(interpretation, &alternate, &variables, config)?;
                    if !truth.is_false() {
                        debug!("{formula} is {truth} in alternate extension {alternate}");
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }

    /// `true` if every valuation of the `basis` pairs allowed by `self` is
    /// allowed by one of the `cases`.
    pub fn is_exhaustive(
        &self,
        basis: &BTreeSet<AscriptionKey>,
        cases: &[&NamedState],
        config: &EngineConfig,
    ) -> VividResult<bool> {
        self.check_cases(cases)?;

        let keys: Vec<AscriptionKey> = basis.iter().cloned().collect();
        let valuations = self.state.valuations(&keys, &config.discretization)?;

        for valuation in config.budgeted(valuations, BudgetKind::Worlds) {
            let valuation = valuation?;
            let mut covered = false;
            for case in cases {
                let mut all = true;
                for (key, value) in keys.iter().zip(&valuation) {
                    if !case.ascription(key)?.contains(value) {
                        all = false;
                        break;
                    }
                }
                if all {
                    covered = true;
                    break;
                }
            }
            if !covered {
                debug!("cases miss the valuation {valuation:?} of the basis");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Grow the universe by one object, optionally named by a new constant.
    ///
    /// The constant is added to the shared vocabulary, so every holder of the
    /// vocabulary sees it.
    pub fn add_object(&mut self, object: impl Into<String>, constant: Option<&str>) -> VividResult<()> {
        let object = object.into();
        if let Some(constant) = constant {
            let vocabulary = self.vocabulary().read();
            if vocabulary.is_variable(constant) {
                return Err(VividError::DuplicateSymbol {
                    name: constant.to_string(),
                    kind: "variable",
                });
            }
            if let Some(bound) = self.assignment.get(constant) {
                return Err(VividError::ConflictingBinding {
                    symbol: constant.to_string(),
                    bound: bound.to_string(),
                    object,
                });
            }
        }

        self.state.add_object(object.clone())?;
        if let Some(constant) = constant {
            self.vocabulary().write().add_constant(constant)?;
            self.assignment.bind(constant, object)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for NamedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}; {}>", self.state, self.assignment)
    }
}

/// Lazy named alternate-extension computation, see [`NamedState::named_alternate_extensions`].
///
/// Alternates are deduplicated per candidate assignment only, so memory is
/// bounded by the largest [`AlternateExtensions`] run rather than the whole
/// enumeration.
#[derive(Debug)]
pub struct NamedAlternateExtensions<'a> {
    base: &'a NamedState,
    cases: Vec<NamedState>,
    constants: Vec<String>,
    candidates: KPermutations<String>,
    current: Option<(ConstantAssignment, AlternateExtensions<'a>)>,
}

impl NamedAlternateExtensions<'_> {
    fn candidate(&self, objects: Vec<String>) -> ConstantAssignment {
        let mut assignment = self.base.assignment.clone();
        assignment.extend_unchecked(self.constants.iter().cloned().zip(objects));
        assignment
    }
}

impl<'a> Iterator for NamedAlternateExtensions<'a> {
    type Item = NamedState;

    fn next(&mut self) -> Option<NamedState> {
        loop {
            if let Some((assignment, states)) = &mut self.current {
                if let Some(state) = states.next() {
                    return Some(NamedState {
                        state,
                        assignment: assignment.clone(),
                    });
                }
                self.current = None;
            }

            let objects = self.candidates.next()?;
            let candidate = self.candidate(objects);
            let named: &'a NamedState = self.base;
            let base = &named.state;

            let compatible: Vec<&State> = self
                .cases
                .iter()
                .filter(|case| !candidate.conflicts_with(&case.assignment))
                .map(|case| &case.state)
                .collect();

            if compatible.is_empty() {
                trace!("candidate {candidate} escapes every case");
                return Some(NamedState {
                    state: base.clone(),
                    assignment: candidate,
                });
            }
            if compatible.iter().any(|state| *state == base) {
                continue;
            }

            let factors = compatible
                .iter()
                .map(|state| base.narrowed_by(state))
                .collect();
            self.current = Some((candidate, base.alternates_unchecked(factors)));
        }
    }
}
