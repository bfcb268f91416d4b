//! Tree-walking evaluation of parsed expressions.
use std::cmp::Ordering;

use bigdecimal::BigDecimal;
use log::trace;
use smallvec::SmallVec;
use strum::EnumIs;

use crate::{
    error::ExprError,
    evaluator::Evaluator,
    parser::{self, Ast, BinOp},
};

/// A coordinate of a point literal; `None` is the `*` wildcard.
pub type Coordinate = Option<BigDecimal>;

/// Runtime values of the expression language.
#[derive(Debug, Clone, PartialEq, EnumIs)]
pub enum Literal {
    Bool(bool),
    Number(BigDecimal),
    Str(String),
    Point(SmallVec<Coordinate, 3>),
    Segment(SmallVec<Coordinate, 3>, SmallVec<Coordinate, 3>),
}

impl Literal {
    fn type_name(&self) -> &'static str {
        match self {
            Literal::Bool(_) => "boolean",
            Literal::Number(_) => "number",
            Literal::Str(_) => "string",
            Literal::Point(_) => "point",
            Literal::Segment(..) => "line segment",
        }
    }

    /// Equality as seen by `==`: numbers compare by value and wildcard
    /// coordinates match anything. Values of different types are never equal.
    fn matches(&self, other: &Literal) -> bool {
        fn same_point(a: &[Coordinate], b: &[Coordinate]) -> bool {
            a.len() == b.len()
                && a.iter().zip(b).all(|(x, y)| match (x, y) {
                    (Some(x), Some(y)) => x == y,
                    _ => true,
                })
        }

        match (self, other) {
            (Literal::Point(a), Literal::Point(b)) => same_point(a, b),
            (Literal::Segment(a0, a1), Literal::Segment(b0, b1)) => {
                same_point(a0, b0) && same_point(a1, b1)
            }
            _ => self == other,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn point(f: &mut std::fmt::Formatter<'_>, coordinates: &[Coordinate]) -> std::fmt::Result {
            write!(f, "P(")?;
            for (index, coordinate) in coordinates.iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                match coordinate {
                    Some(value) => write!(f, "{value}")?,
                    None => write!(f, "*")?,
                }
            }
            write!(f, ")")
        }

        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Str(s) => write!(f, "'{s}'"),
            Literal::Point(p) => point(f, p),
            Literal::Segment(a, b) => {
                write!(f, "L(")?;
                point(f, a)?;
                write!(f, ", ")?;
                point(f, b)?;
                write!(f, ")")
            }
        }
    }
}

fn mismatch(operator: impl ToString, operands: &[&Literal]) -> ExprError {
    ExprError::TypeMismatch {
        operator: operator.to_string(),
        operands: operands
            .iter()
            .map(|literal| literal.type_name())
            .collect::<Vec<_>>()
            .join(" and "),
    }
}

fn number(literal: Literal, function: &str) -> Result<BigDecimal, ExprError> {
    match literal {
        Literal::Number(n) => Ok(n),
        other => Err(mismatch(function, &[&other])),
    }
}

fn boolean(literal: Literal, operator: BinOp) -> Result<bool, ExprError> {
    match literal {
        Literal::Bool(b) => Ok(b),
        other => Err(mismatch(operator, &[&other])),
    }
}

fn coordinates(args: &[Ast]) -> Result<SmallVec<Coordinate, 3>, ExprError> {
    args.iter()
        .map(|arg| match arg {
            Ast::Wildcard => Ok(None),
            other => number(eval(other)?, "P").map(Some),
        })
        .collect()
}

fn call(name: &str, args: &[Ast]) -> Result<Literal, ExprError> {
    let arity = |expected: &str| ExprError::FunctionArity {
        function: name.to_string(),
        expected: expected.to_string(),
        found: args.len(),
    };

    match name {
        "P" => {
            if args.is_empty() {
                return Err(arity("at least 1"));
            }
            coordinates(args).map(Literal::Point)
        }
        "L" => {
            let [start, end] = args else {
                return Err(arity("2"));
            };
            match (eval(start)?, eval(end)?) {
                (Literal::Point(a), Literal::Point(b)) if a.len() == b.len() => {
                    Ok(Literal::Segment(a, b))
                }
                (a, b) => Err(mismatch("L", &[&a, &b])),
            }
        }
        "abs" => {
            let [value] = args else {
                return Err(arity("1"));
            };
            Ok(Literal::Number(number(eval(value)?, name)?.abs()))
        }
        "min" | "max" => {
            let mut values = args
                .iter()
                .map(|arg| eval(arg).and_then(|literal| number(literal, name)));
            let mut best = values.next().ok_or_else(|| arity("at least 1"))??;
            for value in values {
                let value = value?;
                let better = match name {
                    "min" => value < best,
                    _ => value > best,
                };
                if better {
                    best = value;
                }
            }
            Ok(Literal::Number(best))
        }
        _ => Err(ExprError::UnknownFunction(name.to_string())),
    }
}

fn compare(op: BinOp, lhs: &Literal, rhs: &Literal) -> Result<bool, ExprError> {
    let ordering = match (lhs, rhs) {
        (Literal::Number(a), Literal::Number(b)) => a.cmp(b),
        (Literal::Str(a), Literal::Str(b)) => a.cmp(b),
        _ => return Err(mismatch(op, &[lhs, rhs])),
    };

    Ok(match op {
        BinOp::Lt => ordering == Ordering::Less,
        BinOp::Le => ordering != Ordering::Greater,
        BinOp::Gt => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    })
}

fn arithmetic(op: BinOp, lhs: Literal, rhs: Literal) -> Result<Literal, ExprError> {
    let (a, b) = match (lhs, rhs) {
        (Literal::Number(a), Literal::Number(b)) => (a, b),
        (Literal::Str(a), Literal::Str(b)) if op == BinOp::Add => {
            return Ok(Literal::Str(a + &b));
        }
        (a, b) => return Err(mismatch(op, &[&a, &b])),
    };

    let zero = BigDecimal::from(0);
    Ok(Literal::Number(match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div if b == zero => return Err(ExprError::DivisionByZero),
        BinOp::Div => a / b,
        BinOp::Rem if b == zero => return Err(ExprError::DivisionByZero),
        _ => a % b,
    }))
}

pub(crate) fn eval(ast: &Ast) -> Result<Literal, ExprError> {
    match ast {
        Ast::Bool(b) => Ok(Literal::Bool(*b)),
        Ast::Number(n) => Ok(Literal::Number(n.clone())),
        Ast::Str(s) => Ok(Literal::Str(s.clone())),
        Ast::Name(name) => Err(ExprError::UnboundName(name.clone())),
        Ast::Wildcard => Err(ExprError::TypeMismatch {
            operator: "*".to_string(),
            operands: "nothing (wildcards only appear inside P(...))".to_string(),
        }),
        Ast::Neg(inner) => match eval(inner)? {
            Literal::Number(n) => Ok(Literal::Number(-n)),
            other => Err(mismatch("-", &[&other])),
        },
        Ast::Not(inner) => match eval(inner)? {
            Literal::Bool(b) => Ok(Literal::Bool(!b)),
            other => Err(mismatch("not", &[&other])),
        },
        Ast::Binary(op @ (BinOp::And | BinOp::Or), lhs, rhs) => {
            let lhs = boolean(eval(lhs)?, *op)?;
            // Short-circuit like the usual boolean operators
            if (*op == BinOp::And && !lhs) || (*op == BinOp::Or && lhs) {
                return Ok(Literal::Bool(lhs));
            }
            Ok(Literal::Bool(boolean(eval(rhs)?, *op)?))
        }
        Ast::Binary(op @ (BinOp::Eq | BinOp::Ne), lhs, rhs) => {
            let equal = eval(lhs)?.matches(&eval(rhs)?);
            Ok(Literal::Bool(equal == (*op == BinOp::Eq)))
        }
        Ast::Binary(op @ (BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge), lhs, rhs) => {
            compare(*op, &eval(lhs)?, &eval(rhs)?).map(Literal::Bool)
        }
        Ast::Binary(op, lhs, rhs) => arithmetic(*op, eval(lhs)?, eval(rhs)?),
        Ast::Call(name, args) => call(name, args),
    }
}

/// Evaluator for boolean, arithmetic and comparison expressions over
/// literals, with exact decimal arithmetic.
///
/// ```
/// use vividexpr::{ArithmeticEvaluator, Evaluator};
///
/// let evaluator = ArithmeticEvaluator;
/// assert!(evaluator.evaluate("6 > 5 or (6 == 5 and 28 > 45)").unwrap());
/// assert!(evaluator.evaluate("0.1 + 0.2 == 0.3").unwrap());
/// assert!(!evaluator.evaluate("P(1.0, *) != P(1, 7)").unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticEvaluator;

impl ArithmeticEvaluator {
    /// Evaluate `expression` to whatever value it denotes.
    pub fn value(&self, expression: &str) -> Result<Literal, ExprError> {
        let ast = parser::parse(expression)?;
        eval(&ast)
    }
}

impl Evaluator for ArithmeticEvaluator {
    fn name(&self) -> &str {
        "arithmetic"
    }

    fn evaluate(&self, expression: &str) -> Result<bool, ExprError> {
        let value = self.value(expression)?;
        trace!("`{}` evaluated to {}", expression, value);
        match value {
            Literal::Bool(b) => Ok(b),
            other => Err(ExprError::NotBoolean(other.to_string())),
        }
    }
}
