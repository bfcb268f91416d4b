//! Closed numeric intervals.
//!
//! An [`Interval`] is a range `[inf, sup]` with `inf < sup` over one
//! [`NumericKind`]. Both bounds are inclusive. Intervals of discrete kinds
//! (`Int`, `BigInt`) are split around removed values with a unit offset;
//! floating point intervals use [`SPLIT_EPSILON`](crate::numeric::SPLIT_EPSILON).
//!
//! A split may leave a fragment holding a single value. Such a fragment is not
//! an interval; it is reported as [`Piece::Single`] and becomes a plain scalar
//! once handed back to a [`ValueSet`](crate::ValueSet).
use std::cmp::Ordering;

use num_bigint::BigInt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::{EnumIs, EnumTryAs};

use crate::{
    error::ValueSetError,
    numeric::{Numeric, NumericKind, Real},
};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval {
    inf: Numeric,
    sup: Numeric,
}

/// A fragment left behind by interval arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, EnumTryAs)]
pub enum Piece {
    Range(Interval),
    Single(Numeric),
}

impl Piece {
    /// Build the fragment spanning `[inf, sup]`, or `None` when it is empty.
    pub(crate) fn spanning(inf: Numeric, sup: Numeric) -> Option<Piece> {
        match inf.cmp_same_kind(&sup)? {
            Ordering::Less => Some(Piece::Range(Interval { inf, sup })),
            Ordering::Equal => Some(Piece::Single(inf)),
            Ordering::Greater => None,
        }
    }

    #[inline]
    pub fn lower(&self) -> &Numeric {
        match self {
            Piece::Range(interval) => &interval.inf,
            Piece::Single(value) => value,
        }
    }

    #[inline]
    pub fn upper(&self) -> &Numeric {
        match self {
            Piece::Range(interval) => &interval.sup,
            Piece::Single(value) => value,
        }
    }

    /// Remove `[lo, hi]` from this fragment.
    pub(crate) fn without(self, lo: &Numeric, hi: &Numeric) -> SmallVec<Piece, 2> {
        match self {
            Piece::Range(interval) => interval.cut(lo, hi),
            Piece::Single(value) => {
                let covered = matches!(
                    value.cmp_same_kind(lo),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(
                    value.cmp_same_kind(hi),
                    Some(Ordering::Less | Ordering::Equal)
                );
                let mut out = SmallVec::new();
                if !covered {
                    out.push(Piece::Single(value));
                }
                out
            }
        }
    }
}

impl Interval {
    pub fn new(inf: impl Into<Numeric>, sup: impl Into<Numeric>) -> Result<Self, ValueSetError> {
        let inf = inf.into();
        let sup = sup.into();
        match inf.cmp_same_kind(&sup) {
            None => Err(ValueSetError::KindMismatch {
                inf: inf.kind(),
                sup: sup.kind(),
            }),
            Some(Ordering::Less) => Ok(Self { inf, sup }),
            Some(_) => Err(ValueSetError::EmptyInterval {
                inf: inf.to_string(),
                sup: sup.to_string(),
            }),
        }
    }

    /// Fixed-width integer interval.
    pub fn int(inf: i64, sup: i64) -> Result<Self, ValueSetError> {
        Self::new(inf, sup)
    }

    /// Floating point interval; both bounds must be finite.
    pub fn float(inf: f64, sup: f64) -> Result<Self, ValueSetError> {
        Self::new(Real::new(inf)?, Real::new(sup)?)
    }

    /// Extended-precision integer interval.
    pub fn bigint(inf: impl Into<BigInt>, sup: impl Into<BigInt>) -> Result<Self, ValueSetError> {
        Self::new(inf.into(), sup.into())
    }

    #[inline]
    pub fn inf(&self) -> &Numeric {
        &self.inf
    }

    #[inline]
    pub fn sup(&self) -> &Numeric {
        &self.sup
    }

    #[inline]
    pub fn kind(&self) -> NumericKind {
        self.inf.kind()
    }

    /// `true` if `value` is of this interval's kind and lies within its bounds.
    pub fn contains(&self, value: &Numeric) -> bool {
        matches!(
            self.inf.cmp_same_kind(value),
            Some(Ordering::Less | Ordering::Equal)
        ) && matches!(
            value.cmp_same_kind(&self.sup),
            Some(Ordering::Less | Ordering::Equal)
        )
    }

    /// `true` if `other` lies entirely within `self`.
    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.contains(&other.inf) && self.contains(&other.sup)
    }

    /// `true` if both intervals share at least one value.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.kind() == other.kind() && self.inf <= other.sup && other.inf <= self.sup
    }

    /// `true` if the intervals do not overlap but no value separates them.
    ///
    /// Only discrete kinds can be adjacent; touching floating point intervals
    /// already overlap since bounds are inclusive.
    pub fn is_adjacent(&self, other: &Interval) -> bool {
        if self.kind() != other.kind() || !self.kind().is_discrete() {
            return false;
        }
        self.sup.successor().as_ref() == Some(&other.inf)
            || other.sup.successor().as_ref() == Some(&self.inf)
    }

    /// Smallest interval covering both operands.
    pub fn union(&self, other: &Interval) -> Result<Interval, ValueSetError> {
        if !self.overlaps(other) && !self.is_adjacent(other) {
            return Err(ValueSetError::DisjointIntervals {
                left: self.to_string(),
                right: other.to_string(),
            });
        }

        Ok(Interval {
            inf: self.inf.clone().min(other.inf.clone()),
            sup: self.sup.clone().max(other.sup.clone()),
        })
    }

    /// Common part of both operands. A single shared bound yields [`Piece::Single`].
    pub fn intersection(&self, other: &Interval) -> Result<Piece, ValueSetError> {
        if !self.overlaps(other) {
            return Err(ValueSetError::DisjointIntervals {
                left: self.to_string(),
                right: other.to_string(),
            });
        }

        let inf = self.inf.clone().max(other.inf.clone());
        let sup = self.sup.clone().min(other.sup.clone());
        Piece::spanning(inf.clone(), sup.clone()).ok_or(ValueSetError::EmptyInterval {
            inf: inf.to_string(),
            sup: sup.to_string(),
        })
    }

    /// Remove every value of `other` from `self`, yielding zero, one or two fragments.
    pub fn subtract(&self, other: &Interval) -> SmallVec<Piece, 2> {
        if other.kind() != self.kind() {
            let mut out = SmallVec::new();
            out.push(Piece::Range(self.clone()));
            return out;
        }
        self.cut(&other.inf, &other.sup)
    }

    /// Remove a single value from `self`.
    pub fn remove(&self, value: &Numeric) -> SmallVec<Piece, 2> {
        self.cut(value, value)
    }

    fn cut(&self, lo: &Numeric, hi: &Numeric) -> SmallVec<Piece, 2> {
        let mut out = SmallVec::new();

        let disjoint = !matches!(
            lo.cmp_same_kind(&self.sup),
            Some(Ordering::Less | Ordering::Equal)
        ) || !matches!(
            self.inf.cmp_same_kind(hi),
            Some(Ordering::Less | Ordering::Equal)
        );
        if disjoint {
            out.push(Piece::Range(self.clone()));
            return out;
        }

        if *lo > self.inf {
            if let Some(piece) = lo
                .predecessor()
                .and_then(|end| Piece::spanning(self.inf.clone(), end))
            {
                out.push(piece);
            }
        }

        if *hi < self.sup {
            if let Some(piece) = hi
                .successor()
                .and_then(|start| Piece::spanning(start, self.sup.clone()))
            {
                out.push(piece);
            }
        }

        out
    }

    /// Materialize the values of this interval from `inf` to `sup` every `step`.
    ///
    /// The iterator is lazy: nothing is allocated per value beyond the value itself.
    /// Float steps too small to separate consecutive values within the interval
    /// are rejected.
    pub fn discretize(&self, step: &Numeric) -> Result<Discrete, ValueSetError> {
        self.check_step(step)?;
        Ok(Discrete::new_unchecked(self.clone(), step.clone()))
    }

    pub(crate) fn check_step(&self, step: &Numeric) -> Result<(), ValueSetError> {
        if step.kind() != self.kind() {
            return Err(ValueSetError::StepKindMismatch {
                interval: self.kind(),
                step: step.kind(),
            });
        }
        if !step.is_positive() {
            return Err(ValueSetError::InvalidStep {
                kind: step.kind(),
                step: step.to_string(),
            });
        }

        if let (Numeric::Float(inf), Numeric::Float(sup), Numeric::Float(step)) =
            (&self.inf, &self.sup, step)
        {
            let magnitude = inf.get().abs().max(sup.get().abs());
            let ulp = f64::from_bits(magnitude.to_bits() + 1) - magnitude;
            if step.get() < 4.0 * ulp {
                return Err(ValueSetError::StepBelowResolution {
                    step: step.to_string(),
                    interval: self.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Value at `index` of the float discretization of `[inf, sup]` every `step`,
/// `None` once past `sup`.
///
/// Values are computed from `inf` rather than accumulated, so floating point
/// error does not drift along the interval.
pub(crate) fn float_at(inf: f64, sup: f64, step: f64, index: u64) -> Option<f64> {
    let raw = inf + step * index as f64;
    // Absorb rounding noise on the last step.
    let raw = if raw > sup && raw - sup <= step * 1e-9 {
        sup
    } else {
        raw
    };
    (raw.is_finite() && raw <= sup).then_some(raw)
}

/// Number of values [`float_at`] yields, saturating at `u128::MAX`.
///
/// The step must pass [`Interval::check_step`], which keeps the values
/// strictly increasing; the estimate is then off by a few indices at most.
pub(crate) fn float_len(inf: f64, sup: f64, step: f64) -> u128 {
    let estimate = ((sup - inf) / step).floor();
    if !(estimate < u64::MAX as f64) {
        return u128::MAX;
    }

    let mut last = estimate.max(0.0) as u64;
    while last > 0 && float_at(inf, sup, step, last).is_none() {
        last -= 1;
    }
    while last < u64::MAX && float_at(inf, sup, step, last + 1).is_some() {
        last += 1;
    }
    last as u128 + 1
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.inf, self.sup)
    }
}

impl From<Piece> for crate::Value {
    fn from(piece: Piece) -> Self {
        match piece {
            Piece::Range(interval) => crate::Value::Interval(interval),
            Piece::Single(value) => value.into(),
        }
    }
}

/// Lazy iterator returned by [`Interval::discretize`].
#[derive(Debug, Clone)]
pub struct Discrete {
    interval: Interval,
    step: Numeric,
    index: u64,
    done: bool,
}

impl Discrete {
    /// The step must match the interval kind and be strictly positive.
    pub(crate) fn new_unchecked(interval: Interval, step: Numeric) -> Self {
        Self {
            interval,
            step,
            index: 0,
            done: false,
        }
    }
}

impl Iterator for Discrete {
    type Item = Numeric;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let value = match (&self.interval.inf, &self.step) {
            (Numeric::Int(inf), Numeric::Int(step)) => (self.index as i64)
                .checked_mul(*step)
                .and_then(|offset| inf.checked_add(offset))
                .map(Numeric::Int),
            (Numeric::BigInt(inf), Numeric::BigInt(step)) => {
                Some(Numeric::BigInt(inf + step * BigInt::from(self.index)))
            }
            (Numeric::Float(inf), Numeric::Float(step)) => {
                let sup = match &self.interval.sup {
                    Numeric::Float(sup) => sup.get(),
                    _ => unreachable!("interval bounds share a kind"),
                };
                float_at(inf.get(), sup, step.get(), self.index)
                    .and_then(|raw| Real::new(raw).ok())
                    .map(Numeric::Float)
            }
            _ => None,
        };

        match value {
            Some(value) if value <= self.interval.sup => {
                self.index += 1;
                Some(value)
            }
            _ => {
                self.done = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(pieces: &[Piece]) -> Vec<String> {
        pieces
            .iter()
            .map(|piece| match piece {
                Piece::Range(interval) => interval.to_string(),
                Piece::Single(value) => value.to_string(),
            })
            .collect()
    }

    #[test]
    fn construction_requires_ordered_bounds_of_one_kind() {
        assert!(Interval::int(0, 10).is_ok());
        assert!(Interval::int(3, 3).unwrap_err().is_empty_interval());
        assert!(Interval::int(5, 1).is_err());
        assert!(
            Interval::new(0i64, Real::new(1.0).unwrap())
                .unwrap_err()
                .is_kind_mismatch()
        );
        assert!(Interval::float(0.0, f64::NAN).is_err());
    }

    #[test]
    fn union_merges_overlapping_and_adjacent() {
        let a = Interval::int(0, 10).unwrap();
        let b = Interval::int(5, 15).unwrap();
        let c = Interval::int(11, 12).unwrap();
        let d = Interval::int(20, 25).unwrap();

        assert_eq!(a.union(&b).unwrap(), Interval::int(0, 15).unwrap());
        assert_eq!(a.union(&c).unwrap(), Interval::int(0, 12).unwrap());
        assert!(a.union(&d).unwrap_err().is_disjoint_intervals());
    }

    #[test]
    fn float_intervals_touching_overlap_but_are_not_adjacent() {
        let a = Interval::float(0.0, 1.0).unwrap();
        let b = Interval::float(1.0, 2.0).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.is_adjacent(&b));
        assert_eq!(a.intersection(&b).unwrap(), Piece::Single(Numeric::float(1.0).unwrap()));
    }

    #[test]
    fn removing_a_scalar_splits_with_unit_offset() {
        let interval = Interval::int(0, 10).unwrap();
        assert_eq!(ints(&interval.remove(&Numeric::Int(5))), vec!["[0, 4]", "[6, 10]"]);
        assert_eq!(ints(&interval.remove(&Numeric::Int(0))), vec!["[1, 10]"]);
        assert_eq!(ints(&interval.remove(&Numeric::Int(1))), vec!["0", "[2, 10]"]);
        assert_eq!(ints(&interval.remove(&Numeric::Int(42))), vec!["[0, 10]"]);
    }

    #[test]
    fn subtracting_intervals_leaves_dangling_bounds() {
        let interval = Interval::int(0, 10).unwrap();
        let hole = Interval::int(3, 7).unwrap();
        assert_eq!(ints(&interval.subtract(&hole)), vec!["[0, 2]", "[8, 10]"]);

        let cover = Interval::int(-5, 20).unwrap();
        assert!(interval.subtract(&cover).is_empty());

        let tail = Interval::int(9, 30).unwrap();
        assert_eq!(ints(&interval.subtract(&tail)), vec!["[0, 8]"]);
    }

    #[test]
    fn float_split_uses_epsilon() {
        let interval = Interval::float(0.0, 10.0).unwrap();
        let pieces = interval.remove(&Numeric::float(5.0).unwrap());
        assert_eq!(pieces.len(), 2);
        let Piece::Range(left) = &pieces[0] else {
            panic!("left fragment should be a range");
        };
        assert!(!left.contains(&Numeric::float(5.0).unwrap()));
        assert!(left.contains(&Numeric::float(4.999).unwrap()));
    }

    #[test]
    fn discretize_is_inclusive_and_ordered() {
        let values: Vec<_> = Interval::int(1, 5)
            .unwrap()
            .discretize(&Numeric::Int(2))
            .unwrap()
            .collect();
        assert_eq!(values, vec![Numeric::Int(1), Numeric::Int(3), Numeric::Int(5)]);

        let floats: Vec<_> = Interval::float(0.0, 1.0)
            .unwrap()
            .discretize(&Numeric::float(0.25).unwrap())
            .unwrap()
            .collect();
        assert_eq!(floats.len(), 5);
        assert_eq!(floats.last(), Some(&Numeric::float(1.0).unwrap()));

        let big: Vec<_> = Interval::bigint(10, 12)
            .unwrap()
            .discretize(&Numeric::BigInt(BigInt::from(1)))
            .unwrap()
            .collect();
        assert_eq!(big.len(), 3);
    }

    #[test]
    fn discretize_rejects_bad_steps() {
        let interval = Interval::int(0, 3).unwrap();
        assert!(interval.discretize(&Numeric::Int(0)).unwrap_err().is_invalid_step());
        assert!(
            interval
                .discretize(&Numeric::float(1.0).unwrap())
                .unwrap_err()
                .is_step_kind_mismatch()
        );
    }

    #[test]
    fn float_steps_must_separate_values() {
        let far = Interval::float(1e17, 1e17 + 1e3).unwrap();
        assert!(
            far.discretize(&Numeric::float(0.1).unwrap())
                .unwrap_err()
                .is_step_below_resolution()
        );

        let values: Vec<_> = far
            .discretize(&Numeric::float(100.0).unwrap())
            .unwrap()
            .collect();
        assert!(values.len() >= 10);
        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn float_len_matches_the_enumeration() {
        for (inf, sup, step) in [
            (0.0, 1.0, 0.1),
            (0.0, 0.3, 0.1),
            (0.0, 1.0, 0.25),
            (-3.5, 7.25, 0.3),
            (1.0, 1.000_000_1, 1e-8),
            (-1e6, 1e6, 1234.5),
        ] {
            let interval = Interval::float(inf, sup).unwrap();
            let count = interval
                .discretize(&Numeric::float(step).unwrap())
                .unwrap()
                .count();
            assert_eq!(float_len(inf, sup, step), count as u128, "[{inf}, {sup}] every {step}");
        }

        assert_eq!(float_len(0.0, 1e8, 0.1), 1_000_000_001);
    }
}
