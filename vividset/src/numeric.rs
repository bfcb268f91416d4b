//! Numeric scalars that can bound an interval.
//!
//! Three kinds are supported: fixed-width integers (`i64`), finite floating
//! point numbers and extended-precision integers ([`BigInt`]). Values of
//! different kinds never compare as equal, even when they denote the same
//! number.
use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use num_bigint::BigInt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIs, EnumIter};

use crate::error::ValueSetError;

/// Offset used to split floating point intervals around a removed value.
pub const SPLIT_EPSILON: f64 = 1e-9;

/// Numeric kinds an interval can range over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIs, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NumericKind {
    #[strum(serialize = "int")]
    Int,
    #[strum(serialize = "float")]
    Float,
    #[strum(serialize = "bigint")]
    BigInt,
}

impl NumericKind {
    /// Discrete kinds are split with a unit offset; continuous ones with [`SPLIT_EPSILON`].
    #[inline]
    pub const fn is_discrete(&self) -> bool {
        !matches!(self, NumericKind::Float)
    }
}

/// A finite `f64` with a total order, usable as a set member.
///
/// Negative zero is normalized to positive zero so that equality and hashing
/// agree with numeric equality.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
#[repr(transparent)]
pub struct Real(f64);

impl Real {
    pub fn new(value: f64) -> Result<Self, ValueSetError> {
        if value.is_finite() {
            Ok(Self(if value == 0.0 { 0.0 } else { value }))
        } else {
            Err(ValueSetError::NonFiniteFloat(value))
        }
    }

    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Smallest representable step away from `self` by at least `offset`.
    fn nudge(self, offset: f64) -> Option<Self> {
        let moved = self.0 + offset;
        let moved = if moved != self.0 {
            moved
        } else if offset > 0.0 {
            next_toward(self.0, f64::INFINITY)
        } else {
            next_toward(self.0, f64::NEG_INFINITY)
        };
        Real::new(moved).ok()
    }
}

fn next_toward(value: f64, target: f64) -> f64 {
    if value == 0.0 {
        let tiny = f64::from_bits(1);
        return if target > 0.0 { tiny } else { -tiny };
    }
    let bits = value.to_bits();
    let away_from_zero = (target > value) == (value > 0.0);
    f64::from_bits(if away_from_zero { bits + 1 } else { bits - 1 })
}

impl PartialEq for Real {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Real {}

impl PartialOrd for Real {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Real {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Real {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl TryFrom<f64> for Real {
    type Error = ValueSetError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Real::new(value)
    }
}

impl From<Real> for f64 {
    fn from(value: Real) -> Self {
        value.0
    }
}

impl std::fmt::Display for Real {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Debug formatting always keeps a fractional part or an exponent,
        // which keeps floats distinguishable from integers once rendered.
        write!(f, "{:?}", self.0)
    }
}

/// A numeric scalar of one of the [`NumericKind`]s.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Numeric {
    Int(i64),
    Float(Real),
    BigInt(BigInt),
}

impl Numeric {
    #[inline]
    pub fn kind(&self) -> NumericKind {
        match self {
            Numeric::Int(_) => NumericKind::Int,
            Numeric::Float(_) => NumericKind::Float,
            Numeric::BigInt(_) => NumericKind::BigInt,
        }
    }

    /// Compare two numerics of the same kind. Returns `None` across kinds.
    pub fn cmp_same_kind(&self, other: &Numeric) -> Option<Ordering> {
        match (self, other) {
            (Numeric::Int(a), Numeric::Int(b)) => Some(a.cmp(b)),
            (Numeric::Float(a), Numeric::Float(b)) => Some(a.cmp(b)),
            (Numeric::BigInt(a), Numeric::BigInt(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Next value used when splitting to the right of `self`.
    ///
    /// Unit successor for discrete kinds, `self + SPLIT_EPSILON` for floats.
    /// `None` when the successor is not representable.
    pub fn successor(&self) -> Option<Numeric> {
        match self {
            Numeric::Int(v) => v.checked_add(1).map(Numeric::Int),
            Numeric::Float(v) => v.nudge(SPLIT_EPSILON).map(Numeric::Float),
            Numeric::BigInt(v) => Some(Numeric::BigInt(v + 1)),
        }
    }

    /// Mirror of [`Numeric::successor`].
    pub fn predecessor(&self) -> Option<Numeric> {
        match self {
            Numeric::Int(v) => v.checked_sub(1).map(Numeric::Int),
            Numeric::Float(v) => v.nudge(-SPLIT_EPSILON).map(Numeric::Float),
            Numeric::BigInt(v) => Some(Numeric::BigInt(v - 1)),
        }
    }

    /// `true` when `self` is strictly greater than the zero of its kind.
    pub(crate) fn is_positive(&self) -> bool {
        match self {
            Numeric::Int(v) => *v > 0,
            Numeric::Float(v) => v.get() > 0.0,
            Numeric::BigInt(v) => *v > BigInt::ZERO,
        }
    }

    pub fn float(value: f64) -> Result<Self, ValueSetError> {
        Real::new(value).map(Numeric::Float)
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Int(value)
    }
}

impl From<i32> for Numeric {
    fn from(value: i32) -> Self {
        Numeric::Int(value as i64)
    }
}

impl From<Real> for Numeric {
    fn from(value: Real) -> Self {
        Numeric::Float(value)
    }
}

impl From<BigInt> for Numeric {
    fn from(value: BigInt) -> Self {
        Numeric::BigInt(value)
    }
}

impl TryFrom<f64> for Numeric {
    type Error = ValueSetError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Numeric::float(value)
    }
}

impl std::fmt::Display for Numeric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Numeric::Int(v) => write!(f, "{}", v),
            Numeric::Float(v) => write!(f, "{}", v),
            Numeric::BigInt(v) => write!(f, "{}", v),
        }
    }
}
