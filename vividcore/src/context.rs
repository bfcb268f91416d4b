//! Contexts: the current diagram, an assumption base with a named state.
use log::debug;

use crate::{
    assignment::VariableAssignment,
    config::EngineConfig,
    formula::{AssumptionBase, Formula, Truth},
    interpretation::Interpretation,
    named_state::NamedState,
    utils::{
        budget::BudgetKind,
        error::{VividError, VividResult},
    },
    vocabulary::VocabularyRef,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    assumptions: AssumptionBase,
    named_state: NamedState,
}

impl Context {
    pub fn new(assumptions: AssumptionBase, named_state: NamedState) -> VividResult<Self> {
        assumptions
            .vocabulary()
            .ensure_same(named_state.vocabulary(), "context")?;
        Ok(Self {
            assumptions,
            named_state,
        })
    }

    #[inline]
    pub fn assumptions(&self) -> &AssumptionBase {
        &self.assumptions
    }

    #[inline]
    pub fn named_state(&self) -> &NamedState {
        &self.named_state
    }

    #[inline]
    pub fn vocabulary(&self) -> &VocabularyRef {
        self.named_state.vocabulary()
    }

    /// `true` if `world` extends the named state and every assumption is true under `variables`.
    ///
    /// An unknown assumption does not satisfy the context.
    pub fn satisfies(
        &self,
        world: &NamedState,
        variables: &VariableAssignment,
        interpretation: &Interpretation,
        config: &EngineConfig,
    ) -> VividResult<bool> {
        if !world.is_named_extension_of(&self.named_state)? {
            return Ok(false);
        }
        for formula in &self.assumptions {
            if !formula
                .assign_truth_value(interpretation, world, variables, config)?
                .is_true()
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `true` if some variable assignment makes `world` satisfy the context.
    pub fn is_satisfied_by(
        &self,
        world: &NamedState,
        interpretation: &Interpretation,
        config: &EngineConfig,
    ) -> VividResult<bool> {
        for variables in config.budgeted(world.variable_assignments(), BudgetKind::Assignments) {
            if self.satisfies(world, &variables?, interpretation, config)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Run `check` on every world and variable assignment satisfying the context.
    ///
    /// Stops at, and returns `false` on, the first model `check` rejects.
    fn all_models(
        &self,
        interpretation: &Interpretation,
        config: &EngineConfig,
        mut check: impl FnMut(&NamedState, &VariableAssignment) -> VividResult<bool>,
    ) -> VividResult<bool> {
        self.vocabulary()
            .ensure_same(interpretation.vocabulary(), "entailment")?;

        for world in config.budgeted(self.named_state.worlds(config)?, BudgetKind::Worlds) {
            let world = world?;
            for variables in config.budgeted(world.variable_assignments(), BudgetKind::Assignments) {
                let variables = variables?;
                if self.satisfies(&world, &variables, interpretation, config)?
                    && !check(&world, &variables)?
                {
                    debug!("counter-model {world} under {variables}");
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// `true` if `formula` is true in every model of the context.
    pub fn entails_formula(
        &self,
        formula: &Formula,
        interpretation: &Interpretation,
        config: &EngineConfig,
    ) -> VividResult<bool> {
        self.vocabulary()
            .ensure_same(formula.vocabulary(), "formula entailment")?;
        self.all_models(interpretation, config, |world, variables| {
            Ok(formula.assign_truth_value(interpretation, world, variables, config)? == Truth::True)
        })
    }

    /// `true` if every model of the context extends `target`.
    pub fn entails_named_state(
        &self,
        target: &NamedState,
        interpretation: &Interpretation,
        config: &EngineConfig,
    ) -> VividResult<bool> {
        self.vocabulary()
            .ensure_same(target.vocabulary(), "named state entailment")?;
        self.all_models(interpretation, config, |world, _| {
            world.is_named_extension_of(target)
        })
    }

    /// `true` if one of `formulas` is true in every model of the context.
    pub fn entails_disjunction(
        &self,
        formulas: &[&Formula],
        interpretation: &Interpretation,
        config: &EngineConfig,
    ) -> VividResult<bool> {
        if formulas.is_empty() {
            return Err(VividError::NoCases);
        }
        for formula in formulas {
            self.vocabulary()
                .ensure_same(formula.vocabulary(), "disjunction entailment")?;
        }
        self.all_models(interpretation, config, |world, variables| {
            for formula in formulas {
                if formula
                    .assign_truth_value(interpretation, world, variables, config)?
                    .is_true()
                {
                    return Ok(true);
                }
            }
            Ok(false)
        })
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} |- {}", self.assumptions, self.named_state)
    }
}
