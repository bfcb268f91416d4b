//! Materialization of ranges into finite value sequences.
//!
//! Intervals are never expanded implicitly. Every consumer that needs the
//! individual values of a range (world enumeration, for instance) goes through
//! a [`Discretization`], which carries one step per numeric kind.
use std::collections::btree_set;

use num_bigint::BigInt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::ValueSetError,
    interval::Discrete,
    numeric::{Numeric, NumericKind, Real},
    value::Value,
};

/// Default step for fixed-width integer intervals.
pub const DEFAULT_INT_STEP: i64 = 1;

/// Default step for floating point intervals.
pub const DEFAULT_FLOAT_STEP: f64 = 0.1;

/// Per-kind discretization steps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Discretization {
    pub int_step: i64,
    pub float_step: f64,
    #[cfg_attr(feature = "serde", serde(with = "bigint_repr"))]
    pub bigint_step: BigInt,
}

/// Extended-precision steps are written as plain integers or decimal strings.
#[cfg(feature = "serde")]
mod bigint_repr {
    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Int(value) => Ok(BigInt::from(value)),
            Repr::Text(text) => text.parse().map_err(D::Error::custom),
        }
    }
}

impl Default for Discretization {
    fn default() -> Self {
        Self {
            int_step: DEFAULT_INT_STEP,
            float_step: DEFAULT_FLOAT_STEP,
            bigint_step: BigInt::from(DEFAULT_INT_STEP),
        }
    }
}

/// Steps of a [`Discretization`] once validated.
#[derive(Debug, Clone)]
pub(crate) struct Steps {
    int: Numeric,
    float: Numeric,
    bigint: Numeric,
}

impl Steps {
    pub(crate) fn get(&self, kind: NumericKind) -> &Numeric {
        match kind {
            NumericKind::Int => &self.int,
            NumericKind::Float => &self.float,
            NumericKind::BigInt => &self.bigint,
        }
    }
}

impl Discretization {
    /// Check that every step is strictly positive (and finite for floats).
    pub fn validate(&self) -> Result<(), ValueSetError> {
        self.steps().map(|_| ())
    }

    /// The step used for intervals of `kind`.
    pub fn step(&self, kind: NumericKind) -> Result<Numeric, ValueSetError> {
        Ok(self.steps()?.get(kind).clone())
    }

    pub(crate) fn steps(&self) -> Result<Steps, ValueSetError> {
        let steps = Steps {
            int: Numeric::Int(self.int_step),
            float: Numeric::Float(Real::new(self.float_step)?),
            bigint: Numeric::BigInt(self.bigint_step.clone()),
        };

        for kind in [NumericKind::Int, NumericKind::Float, NumericKind::BigInt] {
            let step = steps.get(kind);
            if !step.is_positive() {
                return Err(ValueSetError::InvalidStep {
                    kind,
                    step: step.to_string(),
                });
            }
        }

        Ok(steps)
    }
}

/// Lazy iterator over the materialized values of a value set.
///
/// Scalars, points and segments are yielded as they are; every interval is
/// expanded with the step of its kind.
#[derive(Debug, Clone)]
pub struct DiscreteValues<'a> {
    values: btree_set::Iter<'a, Value>,
    current: Option<Discrete>,
    steps: Steps,
}

impl<'a> DiscreteValues<'a> {
    pub(crate) fn new(values: btree_set::Iter<'a, Value>, steps: Steps) -> Self {
        Self {
            values,
            current: None,
            steps,
        }
    }
}

impl Iterator for DiscreteValues<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(current) = &mut self.current {
                if let Some(value) = current.next() {
                    return Some(value.into());
                }
                self.current = None;
            }

            match self.values.next()? {
                Value::Interval(interval) => {
                    let step = self.steps.get(interval.kind()).clone();
                    self.current = Some(Discrete::new_unchecked(interval.clone(), step));
                }
                value => return Some(value.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_steps_are_valid() {
        let discretization = Discretization::default();
        assert!(discretization.validate().is_ok());
        assert_eq!(
            discretization.step(NumericKind::Int).unwrap(),
            Numeric::Int(1)
        );
    }

    #[test]
    fn non_positive_steps_are_rejected() {
        let discretization = Discretization {
            float_step: 0.0,
            ..Default::default()
        };
        assert!(discretization.validate().unwrap_err().is_invalid_step());

        let discretization = Discretization {
            bigint_step: BigInt::from(-1),
            ..Default::default()
        };
        assert!(discretization.validate().is_err());

        let discretization = Discretization {
            float_step: f64::NAN,
            ..Default::default()
        };
        assert!(discretization.validate().unwrap_err().is_non_finite_float());
    }
}
