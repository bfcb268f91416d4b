//! Inference rules of the calculus.
//!
//! Every rule decides whether a conclusion follows from a context. A rule
//! returning `Ok(false)` applies and rejects the conclusion; a rule whose
//! proviso does not hold fails with [`VividError::RuleInapplicable`] instead,
//! so the two outcomes cannot be confused.
use log::debug;
use strum::{Display, EnumIter};

use crate::{
    assignment::VariableAssignment,
    config::EngineConfig,
    context::Context,
    formula::{AssumptionBase, Formula, basis},
    interpretation::Interpretation,
    named_state::NamedState,
    utils::error::{VividError, VividResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Rule {
    #[strum(serialize = "thinning")]
    Thinning,
    #[strum(serialize = "widening")]
    Widening,
    #[strum(serialize = "observe")]
    Observe,
    #[strum(serialize = "diagrammatic absurdity")]
    DiagrammaticAbsurdity,
    #[strum(serialize = "sentential absurdity")]
    SententialAbsurdity,
    #[strum(serialize = "diagram reiteration")]
    DiagramReiteration,
    #[strum(serialize = "diagrammatic-to-diagrammatic")]
    DiagrammaticToDiagrammatic,
    #[strum(serialize = "diagrammatic-to-sentential")]
    DiagrammaticToSentential,
    #[strum(serialize = "sentential-to-diagrammatic")]
    SententialToDiagrammatic,
    #[strum(serialize = "sentential-to-sentential")]
    SententialToSentential,
}

/// Side conditions a rule checks before deciding its conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Proviso {
    #[strum(serialize = "the cases are not exhaustive on their basis")]
    NonExhaustive,
    #[strum(serialize = "the assumptions are consistent with an alternate extension of the cases")]
    NamedEntailment,
    #[strum(serialize = "the context does not entail the disjunction of the cases")]
    Disjunction,
}

fn inapplicable(rule: Rule, proviso: Proviso) -> VividError {
    debug!("{rule}: {proviso}");
    VividError::RuleInapplicable { rule, proviso }
}

/// Refine the diagram to `target`.
///
/// `target` must be a named extension of the context's named state. With
/// `assumptions` (a part of the context's assumption base), the refinement
/// is further required to lose no model of those assumptions: they must be
/// false in every named alternate extension of the diagram with respect to
/// `target`.
pub fn thinning(
    context: &Context,
    target: &NamedState,
    assumptions: Option<&AssumptionBase>,
    interpretation: Option<&Interpretation>,
    config: &EngineConfig,
) -> VividResult<bool> {
    debug!("{}: {} => {}", Rule::Thinning, context, target);
    if !target.is_named_extension_of(context.named_state())? {
        return Ok(false);
    }

    let Some(assumptions) = assumptions else {
        return Ok(true);
    };
    let interpretation = interpretation.ok_or(VividError::MissingInterpretation {
        rule: Rule::Thinning,
    })?;
    context
        .vocabulary()
        .ensure_same(assumptions.vocabulary(), "thinning")?;
    if !assumptions.is_subset_of(context.assumptions()) {
        return Err(VividError::NotSubAssumptionBase);
    }

    context
        .named_state()
        .is_named_entailment(assumptions, interpretation, &[target], config)
}

/// Coarsen the diagram to `target`, of which the current named state is a named extension.
pub fn widening(context: &Context, target: &NamedState) -> VividResult<bool> {
    debug!("{}: {} => {}", Rule::Widening, context, target);
    context.named_state().is_named_extension_of(target)
}

/// Conclude `formula` when the context entails it.
pub fn observe(
    context: &Context,
    formula: &Formula,
    interpretation: &Interpretation,
    config: &EngineConfig,
) -> VividResult<bool> {
    debug!("{}: {} => {}", Rule::Observe, context, formula);
    context.entails_formula(formula, interpretation, config)
}

/// `true` if some assumption is false in the diagram under `variables`
/// (or the empty assignment).
fn absurd(
    context: &Context,
    interpretation: &Interpretation,
    variables: Option<&VariableAssignment>,
    config: &EngineConfig,
) -> VividResult<bool> {
    let empty;
    let variables = match variables {
        Some(variables) => variables,
        None => {
            empty = VariableAssignment::empty(context.vocabulary().clone());
            &empty
        }
    };

    for formula in context.assumptions() {
        let truth = formula.assign_truth_value(interpretation, context.named_state(), variables, config)?;
        if truth.is_false() {
            debug!("{formula} is false in the diagram");
            return Ok(true);
        }
    }
    Ok(false)
}

/// Conclude any named state from an absurd context.
pub fn diagrammatic_absurdity(
    context: &Context,
    target: &NamedState,
    interpretation: &Interpretation,
    variables: Option<&VariableAssignment>,
    config: &EngineConfig,
) -> VividResult<bool> {
    debug!("{}: {} => {}", Rule::DiagrammaticAbsurdity, context, target);
    context
        .vocabulary()
        .ensure_same(target.vocabulary(), "diagrammatic absurdity")?;
    absurd(context, interpretation, variables, config)
}

/// Conclude any formula from an absurd context.
pub fn sentential_absurdity(
    context: &Context,
    formula: &Formula,
    interpretation: &Interpretation,
    variables: Option<&VariableAssignment>,
    config: &EngineConfig,
) -> VividResult<bool> {
    debug!("{}: {} => {}", Rule::SententialAbsurdity, context, formula);
    context
        .vocabulary()
        .ensure_same(formula.vocabulary(), "sentential absurdity")?;
    absurd(context, interpretation, variables, config)
}

/// The diagram of the context, restated.
pub fn diagram_reiteration(context: &Context) -> NamedState {
    context.named_state().clone()
}

/// Provisos (a) and (b) shared by the diagrammatic compositions.
fn check_diagrammatic_cases(
    rule: Rule,
    context: &Context,
    cases: &[&NamedState],
    basis_formulas: Option<&[&Formula]>,
    interpretation: &Interpretation,
    config: &EngineConfig,
) -> VividResult<()> {
    let diagram = context.named_state();

    if let Some(formulas) = basis_formulas {
        let variables = VariableAssignment::empty(context.vocabulary().clone());
        let keys = basis(
            formulas.iter().copied(),
            interpretation,
            diagram.assignment(),
            &variables,
        )?;
        if !diagram.is_exhaustive(&keys, cases, config)? {
            return Err(inapplicable(rule, Proviso::NonExhaustive));
        }
    }

    if !diagram.is_named_entailment(context.assumptions(), interpretation, cases, config)? {
        return Err(inapplicable(rule, Proviso::NamedEntailment));
    }
    Ok(())
}

/// Case contexts of a diagrammatic split: the assumptions with each case diagram.
fn diagrammatic_cases(context: &Context, cases: &[&NamedState]) -> VividResult<Vec<Context>> {
    cases
        .iter()
        .map(|&case| Context::new(context.assumptions().clone(), case.clone()))
        .collect()
}

/// Case contexts of a sentential split: the diagram with each case formula assumed.
fn sentential_cases(
    rule: Rule,
    context: &Context,
    case_formulas: &[&Formula],
    interpretation: &Interpretation,
    config: &EngineConfig,
) -> VividResult<Vec<Context>> {
    if !context.entails_disjunction(case_formulas, interpretation, config)? {
        return Err(inapplicable(rule, Proviso::Disjunction));
    }
    case_formulas
        .iter()
        .map(|&formula| {
            let assumptions = context.assumptions().with(formula.clone())?;
            Context::new(assumptions, context.named_state().clone())
        })
        .collect()
}

/// Split the diagram into `cases` and conclude the named state `conclusion` from each.
pub fn diagrammatic_to_diagrammatic(
    context: &Context,
    cases: &[&NamedState],
    conclusion: &NamedState,
    basis_formulas: Option<&[&Formula]>,
    interpretation: &Interpretation,
    config: &EngineConfig,
) -> VividResult<bool> {
    let rule = Rule::DiagrammaticToDiagrammatic;
    debug!("{rule}: {context} => {conclusion} over {} case(s)", cases.len());
    check_diagrammatic_cases(rule, context, cases, basis_formulas, interpretation, config)?;

    for case in diagrammatic_cases(context, cases)? {
        if !case.entails_named_state(conclusion, interpretation, config)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Split the diagram into `cases` and conclude the formula `conclusion` from each.
pub fn diagrammatic_to_sentential(
    context: &Context,
    cases: &[&NamedState],
    conclusion: &Formula,
    basis_formulas: Option<&[&Formula]>,
    interpretation: &Interpretation,
    config: &EngineConfig,
) -> VividResult<bool> {
    let rule = Rule::DiagrammaticToSentential;
    debug!("{rule}: {context} => {conclusion} over {} case(s)", cases.len());
    check_diagrammatic_cases(rule, context, cases, basis_formulas, interpretation, config)?;

    for case in diagrammatic_cases(context, cases)? {
        if !case.entails_formula(conclusion, interpretation, config)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Split on the formulas `case_formulas` and conclude the named state `conclusion` from each.
pub fn sentential_to_diagrammatic(
    context: &Context,
    case_formulas: &[&Formula],
    conclusion: &NamedState,
    interpretation: &Interpretation,
    config: &EngineConfig,
) -> VividResult<bool> {
    let rule = Rule::SententialToDiagrammatic;
    debug!("{rule}: {context} => {conclusion} over {} case(s)", case_formulas.len());

    for case in sentential_cases(rule, context, case_formulas, interpretation, config)? {
        if !case.entails_named_state(conclusion, interpretation, config)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Split on the formulas `case_formulas` and conclude the formula `conclusion` from each.
pub fn sentential_to_sentential(
    context: &Context,
    case_formulas: &[&Formula],
    conclusion: &Formula,
    interpretation: &Interpretation,
    config: &EngineConfig,
) -> VividResult<bool> {
    let rule = Rule::SententialToSentential;
    debug!("{rule}: {context} => {conclusion} over {} case(s)", case_formulas.len());

    for case in sentential_cases(rule, context, case_formulas, interpretation, config)? {
        if !case.entails_formula(conclusion, interpretation, config)? {
            return Ok(false);
        }
    }
    Ok(true)
}
