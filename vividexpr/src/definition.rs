//! Relation definitions of the form `R<subscript>(<arg>, ...) <=> <expression>`.
//!
//! Only the left-hand side is parsed. The right-hand side is kept as text and
//! instantiated by substituting each argument name with the literal form of a
//! value, longest names first.
use std::collections::HashSet;

use chumsky::prelude::*;
use log::trace;

use crate::{
    error::{Diagnostic, ExprError},
    evaluator::EvaluatorChain,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationDefinition {
    subscript: u64,
    arguments: Vec<String>,
    body: String,
}

fn definition_parser<'a>()
-> impl Parser<'a, &'a str, (u64, Vec<&'a str>, &'a str), extra::Err<Rich<'a, char>>> {
    let subscript = text::int(10).try_map(|s: &str, span| {
        s.parse::<u64>()
            .map_err(|e| Rich::custom(span, format!("invalid subscript '{s}': {e}")))
    });

    let arguments = text::ascii::ident()
        .padded()
        .separated_by(just(','))
        .at_least(1)
        .collect::<Vec<&str>>()
        .delimited_by(just('('), just(')'))
        .labelled("argument list");

    let body = any()
        .repeated()
        .to_slice()
        .try_map(|s: &str, span| {
            let s = s.trim();
            if s.is_empty() {
                Err(Rich::custom(span, "missing expression after '<=>'"))
            } else {
                Ok(s)
            }
        });

    text::whitespace()
        .ignore_then(just('R'))
        .ignore_then(subscript)
        .then(arguments.padded())
        .then_ignore(just("<=>"))
        .then(body)
        .map(|((subscript, arguments), body)| (subscript, arguments, body))
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace every whole-word occurrence of a binding's name in `body` with its value.
///
/// Names are tried longest first so that `h1` never matches inside `h10`.
/// Replaced text is never scanned again.
pub fn substitute<'a>(body: &str, bindings: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut bindings: Vec<(&str, &str)> = bindings.into_iter().collect();
    bindings.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    let mut previous: Option<char> = None;

    'scan: while let Some(c) = rest.chars().next() {
        if !previous.is_some_and(is_ident_char) {
            for (name, value) in &bindings {
                if name.is_empty() || !rest.starts_with(name) {
                    continue;
                }
                let boundary = rest[name.len()..]
                    .chars()
                    .next()
                    .is_none_or(|next| !is_ident_char(next));
                if boundary {
                    out.push_str(value);
                    previous = name.chars().last();
                    rest = &rest[name.len()..];
                    continue 'scan;
                }
            }
        }

        out.push(c);
        previous = Some(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

impl RelationDefinition {
    /// Parse `definition`, whose subscript must equal `subscript`.
    pub fn parse(definition: &str, subscript: u64) -> Result<Self, ExprError> {
        let (output, errors) = definition_parser()
            .then_ignore(end())
            .parse(definition)
            .into_output_errors();

        let Some((found, arguments, body)) = output.filter(|_| errors.is_empty()) else {
            return Err(ExprError::MalformedDefinition {
                definition: definition.to_string(),
                diagnostics: errors
                    .into_iter()
                    .map(|e| Diagnostic {
                        message: e.to_string(),
                        start: e.span().start,
                        end: e.span().end,
                    })
                    .collect(),
            });
        };

        if found != subscript {
            return Err(ExprError::SubscriptMismatch {
                expected: subscript,
                found,
            });
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = arguments.iter().find(|name| !seen.insert(**name)) {
            return Err(ExprError::DuplicateArgument(duplicate.to_string()));
        }

        Ok(Self {
            subscript,
            arguments: arguments.into_iter().map(str::to_string).collect(),
            body: body.to_string(),
        })
    }

    #[inline]
    pub fn subscript(&self) -> u64 {
        self.subscript
    }

    #[inline]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// The unparsed right-hand side.
    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Substitute `values` (already in literal form) for the arguments, positionally.
    pub fn instantiate<S: AsRef<str>>(&self, values: &[S]) -> Result<String, ExprError> {
        if values.len() != self.arguments.len() {
            return Err(ExprError::ArgumentCount {
                expected: self.arguments.len(),
                found: values.len(),
            });
        }

        Ok(substitute(
            &self.body,
            self.arguments
                .iter()
                .map(String::as_str)
                .zip(values.iter().map(AsRef::as_ref)),
        ))
    }

    /// Instantiate the definition and hand it to `evaluators`.
    pub fn evaluate<S: AsRef<str>>(
        &self,
        values: &[S],
        evaluators: &EvaluatorChain,
    ) -> Result<bool, ExprError> {
        let expression = self.instantiate(values)?;
        let truth = evaluators.evaluate(&expression)?;
        trace!("R{}: `{}` is {}", self.subscript, expression, truth);
        Ok(truth)
    }
}

impl std::fmt::Display for RelationDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "R{}({}) <=> {}",
            self.subscript,
            self.arguments.join(", "),
            self.body
        )
    }
}
