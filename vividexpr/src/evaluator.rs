use std::sync::Arc;

use log::debug;

use crate::{error::ExprError, eval::ArithmeticEvaluator};

/// A language of boolean expressions over literals.
///
/// An evaluator that does not understand an expression must report
/// [`ExprError::Syntax`]; any other error means the expression was understood
/// but could not be evaluated.
pub trait Evaluator: std::fmt::Debug + Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    fn evaluate(&self, expression: &str) -> Result<bool, ExprError>;
}

/// An ordered list of evaluators. The first one able to parse an expression
/// decides its value.
#[derive(Debug, Clone)]
pub struct EvaluatorChain {
    evaluators: Vec<Arc<dyn Evaluator>>,
}

impl Default for EvaluatorChain {
    fn default() -> Self {
        Self::new().with(ArithmeticEvaluator)
    }
}

impl EvaluatorChain {
    /// An empty chain; it rejects every expression.
    pub fn new() -> Self {
        Self {
            evaluators: Vec::new(),
        }
    }

    /// Append an evaluator, tried after the ones already present.
    pub fn with(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluators.push(Arc::new(evaluator));
        self
    }

    pub fn push(&mut self, evaluator: Arc<dyn Evaluator>) {
        self.evaluators.push(evaluator);
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.evaluators.iter().map(|evaluator| evaluator.name())
    }

    /// Evaluate `expression` with the first evaluator that parses it.
    ///
    /// Fails with [`ExprError::Unparseable`] when no evaluator accepts it.
    pub fn evaluate(&self, expression: &str) -> Result<bool, ExprError> {
        for evaluator in &self.evaluators {
            match evaluator.evaluate(expression) {
                Err(ExprError::Syntax { diagnostics, .. }) => {
                    debug!(
                        "evaluator `{}` rejected `{}` ({} diagnostic(s))",
                        evaluator.name(),
                        expression,
                        diagnostics.len()
                    );
                }
                outcome => return outcome,
            }
        }

        Err(ExprError::Unparseable {
            expression: expression.to_string(),
            tried: self.names().map(str::to_string).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts exactly `yes` and `no`.
    #[derive(Debug)]
    struct Answers;

    impl Evaluator for Answers {
        fn name(&self) -> &str {
            "answers"
        }

        fn evaluate(&self, expression: &str) -> Result<bool, ExprError> {
            match expression.trim() {
                "yes" => Ok(true),
                "no" => Ok(false),
                _ => Err(ExprError::Syntax {
                    expression: expression.to_string(),
                    diagnostics: Vec::new(),
                }),
            }
        }
    }

    #[test]
    fn first_parsing_evaluator_wins() {
        let chain = EvaluatorChain::new().with(Answers).with(ArithmeticEvaluator);
        assert!(chain.evaluate("yes").unwrap());
        assert!(chain.evaluate("2 > 1").unwrap());
        assert_eq!(chain.names().collect::<Vec<_>>(), vec!["answers", "arithmetic"]);
    }

    #[test]
    fn evaluation_errors_do_not_fall_through() {
        let chain = EvaluatorChain::new().with(ArithmeticEvaluator).with(Answers);
        assert!(chain.evaluate("1 / 0 > 1").unwrap_err().is_division_by_zero());
    }

    #[test]
    fn unparseable_expressions_are_fatal() {
        let err = EvaluatorChain::default().evaluate("2 >").unwrap_err();
        let ExprError::Unparseable { tried, .. } = err else {
            panic!("expected an unparseable expression error");
        };
        assert_eq!(tried, vec!["arithmetic".to_string()]);

        assert!(EvaluatorChain::new().evaluate("true").unwrap_err().is_unparseable());
    }
}
