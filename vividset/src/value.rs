use num_bigint::BigInt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIs, EnumIter, EnumTryAs};

use crate::{
    error::ValueSetError,
    interval::Interval,
    numeric::{Numeric, Real},
    point::{LineSegment, Point},
};

/// Every kind of value an attribute can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueKind {
    #[strum(serialize = "int")]
    Int,
    #[strum(serialize = "float")]
    Float,
    #[strum(serialize = "bigint")]
    BigInt,
    #[strum(serialize = "string")]
    Str,
    #[strum(serialize = "bool")]
    Bool,
    #[strum(serialize = "interval")]
    Interval,
    #[strum(serialize = "point")]
    Point,
    #[strum(serialize = "line segment")]
    LineSegment,
}

/// A single value held by a [`ValueSet`](crate::ValueSet).
///
/// The ordering is only used to keep value sets canonical; it carries no
/// meaning across kinds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    Int(i64),
    Float(Real),
    BigInt(BigInt),
    Str(String),
    Bool(bool),
    Interval(Interval),
    Point(Point),
    LineSegment(LineSegment),
}

impl Value {
    /// Floating point value; rejects NaN and infinities.
    pub fn float(value: f64) -> Result<Self, ValueSetError> {
        Real::new(value).map(Value::Float)
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::BigInt(_) => ValueKind::BigInt,
            Value::Str(_) => ValueKind::Str,
            Value::Bool(_) => ValueKind::Bool,
            Value::Interval(_) => ValueKind::Interval,
            Value::Point(_) => ValueKind::Point,
            Value::LineSegment(_) => ValueKind::LineSegment,
        }
    }

    /// Numeric view of a scalar, `None` for every other kind (intervals included).
    pub fn numeric(&self) -> Option<Numeric> {
        match self {
            Value::Int(v) => Some(Numeric::Int(*v)),
            Value::Float(v) => Some(Numeric::Float(*v)),
            Value::BigInt(v) => Some(Numeric::BigInt(v.clone())),
            _ => None,
        }
    }

    /// Render the value the way relation expressions spell it.
    ///
    /// Strings are single-quoted with `\` and `'` escaped; every other kind
    /// renders as its display form.
    pub fn literal(&self) -> String {
        match self {
            Value::Str(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('\'');
                for c in s.chars() {
                    if c == '\'' || c == '\\' {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out.push('\'');
                out
            }
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::BigInt(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Interval(v) => write!(f, "{}", v),
            Value::Point(v) => write!(f, "{}", v),
            Value::LineSegment(v) => write!(f, "{}", v),
        }
    }
}

impl From<Numeric> for Value {
    fn from(value: Numeric) -> Self {
        match value {
            Numeric::Int(v) => Value::Int(v),
            Numeric::Float(v) => Value::Float(v),
            Numeric::BigInt(v) => Value::BigInt(v),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<Real> for Value {
    fn from(value: Real) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Interval> for Value {
    fn from(value: Interval) -> Self {
        Value::Interval(value)
    }
}

impl From<Point> for Value {
    fn from(value: Point) -> Self {
        Value::Point(value)
    }
}

impl From<LineSegment> for Value {
    fn from(value: LineSegment) -> Self {
        Value::LineSegment(value)
    }
}

impl TryFrom<f64> for Value {
    type Error = ValueSetError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Value::float(value)
    }
}
