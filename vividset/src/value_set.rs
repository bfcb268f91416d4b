//! The value-set algebra.
//!
//! A [`ValueSet`] is always kept in canonical form:
//!
//! - same-kind intervals never overlap nor touch (they are collapsed),
//! - a scalar covered by an interval, or adjacent to one of its bounds, is
//!   folded into it, and consecutive integer scalars form an interval,
//! - a concrete point covered by a generic point of the same dimension is
//!   dropped.
//!
//! With that form, structural equality and two-way subset coincide, which is
//! what makes the derived `Eq` and `Hash` sound.
use std::{
    collections::{BTreeMap, BTreeSet, btree_set},
    ops::{BitAnd, BitOr, Sub},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    discretize::{DiscreteValues, Discretization, Steps},
    error::ValueSetError,
    interval::{Interval, Piece, float_len},
    numeric::{Numeric, NumericKind},
    point::Point,
    value::Value,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Value>", into = "Vec<Value>"))]
pub struct ValueSet {
    values: BTreeSet<Value>,
}

/// A run of numeric pieces that touch one another once sorted.
struct Run {
    inf: Numeric,
    sup: Numeric,
    spans: bool,
}

impl Run {
    fn start(piece: Piece) -> Self {
        Run {
            inf: piece.lower().clone(),
            sup: piece.upper().clone(),
            spans: piece.is_range(),
        }
    }

    fn reaches(&self, next: &Numeric) -> bool {
        *next <= self.sup
            || (self.sup.kind().is_discrete() && self.sup.successor().as_ref() == Some(next))
    }

    fn absorb(&mut self, piece: Piece) {
        self.spans |= piece.is_range();
        if *piece.upper() > self.sup {
            self.sup = piece.upper().clone();
        }
    }

    fn flush(self, out: &mut BTreeSet<Value>) {
        if self.spans || self.inf != self.sup {
            if let Some(piece) = Piece::spanning(self.inf, self.sup) {
                out.insert(piece.into());
            }
        } else {
            out.insert(self.inf.into());
        }
    }
}

/// Sort the pieces of one numeric kind and merge every run of touching pieces.
///
/// A run covering more than one value becomes a single interval, so a chain of
/// consecutive integers is stored as the range it spans.
fn collapse(mut pieces: Vec<Piece>, out: &mut BTreeSet<Value>) {
    pieces.sort_by(|a, b| a.lower().cmp(b.lower()));

    let mut run: Option<Run> = None;
    for piece in pieces {
        match &mut run {
            Some(current) if current.reaches(piece.lower()) => current.absorb(piece),
            _ => {
                if let Some(done) = run.replace(Run::start(piece)) {
                    done.flush(out);
                }
            }
        }
    }

    if let Some(done) = run {
        done.flush(out);
    }
}

fn normalize(values: impl IntoIterator<Item = Value>) -> BTreeSet<Value> {
    let mut out = BTreeSet::new();
    let mut numeric: BTreeMap<NumericKind, Vec<Piece>> = BTreeMap::new();
    let mut points = Vec::new();

    for value in values {
        match value {
            Value::Interval(interval) => numeric
                .entry(interval.kind())
                .or_default()
                .push(Piece::Range(interval)),
            Value::Point(point) => points.push(point),
            other => match other.numeric() {
                Some(scalar) => numeric
                    .entry(scalar.kind())
                    .or_default()
                    .push(Piece::Single(scalar)),
                None => {
                    out.insert(other);
                }
            },
        }
    }

    for pieces in numeric.into_values() {
        collapse(pieces, &mut out);
    }

    let generic: BTreeSet<usize> = points
        .iter()
        .filter(|point| point.is_generic())
        .map(Point::dimension)
        .collect();
    out.extend(
        points
            .into_iter()
            .filter(|point| point.is_generic() || !generic.contains(&point.dimension()))
            .map(Value::Point),
    );

    out
}

impl ValueSet {
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            values: normalize(values),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Set holding exactly one value.
    pub fn single(value: impl Into<Value>) -> Self {
        Self::new([value.into()])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Value> {
        self.values.iter()
    }

    /// `true` if the set holds exactly one value and that value is not a range.
    pub fn is_singleton(&self) -> bool {
        self.single_value().is_some()
    }

    /// The only value of a singleton set.
    pub fn single_value(&self) -> Option<&Value> {
        let mut iter = self.values.iter();
        match (iter.next(), iter.next()) {
            (Some(value), None) if !value.is_interval() => Some(value),
            _ => None,
        }
    }

    /// `true` if `value` is denoted by this set.
    ///
    /// Scalars are found in covering intervals, intervals must lie within a
    /// single interval of the set and points may be matched by a generic point.
    pub fn contains(&self, value: &Value) -> bool {
        if self.values.contains(value) {
            return true;
        }

        match value {
            Value::Interval(needle) => self.intervals().any(|hay| hay.contains_interval(needle)),
            Value::Point(needle) => self.values.iter().any(|hay| match hay {
                Value::Point(hay) => hay.covers(needle),
                _ => false,
            }),
            other => match other.numeric() {
                Some(scalar) => self.intervals().any(|hay| hay.contains(&scalar)),
                None => false,
            },
        }
    }

    /// `true` if every value of `self` is denoted by `other`.
    pub fn is_subset(&self, other: &ValueSet) -> bool {
        self.values.iter().all(|value| other.contains(value))
    }

    #[inline]
    pub fn is_superset(&self, other: &ValueSet) -> bool {
        other.is_subset(self)
    }

    /// Strict subset with respect to the denoted values.
    pub fn is_proper_subset(&self, other: &ValueSet) -> bool {
        self.is_subset(other) && self != other
    }

    /// `true` if no value is denoted by both sets.
    pub fn is_disjoint(&self, other: &ValueSet) -> bool {
        self.intersection(other).is_empty()
    }

    pub fn union(&self, other: &ValueSet) -> ValueSet {
        ValueSet::new(self.values.iter().chain(other.values.iter()).cloned())
    }

    /// Every value of `self` that `other` does not denote.
    ///
    /// Intervals are split around the intervals and scalars of `other`; a
    /// fragment reduced to one value comes back as a scalar.
    pub fn difference(&self, other: &ValueSet) -> ValueSet {
        let mut cuts: BTreeMap<NumericKind, Vec<(Numeric, Numeric)>> = BTreeMap::new();
        for value in &other.values {
            let bounds = match value {
                Value::Interval(interval) => (interval.inf().clone(), interval.sup().clone()),
                other => match other.numeric() {
                    Some(scalar) => (scalar.clone(), scalar),
                    None => continue,
                },
            };
            cuts.entry(bounds.0.kind()).or_default().push(bounds);
        }

        let mut kept = Vec::with_capacity(self.values.len());
        for value in &self.values {
            match value {
                Value::Interval(interval) => {
                    let mut pieces = vec![Piece::Range(interval.clone())];
                    for (lo, hi) in cuts.get(&interval.kind()).into_iter().flatten() {
                        pieces = pieces
                            .into_iter()
                            .flat_map(|piece| piece.without(lo, hi))
                            .collect();
                    }
                    kept.extend(pieces.into_iter().map(Value::from));
                }
                // A generic point cannot be punctured by a concrete one.
                Value::Point(point) if point.is_generic() => {
                    if !other.values.contains(value) {
                        kept.push(value.clone());
                    }
                }
                other_value => {
                    if !other.contains(other_value) {
                        kept.push(other_value.clone());
                    }
                }
            }
        }

        ValueSet::new(kept)
    }

    pub fn intersection(&self, other: &ValueSet) -> ValueSet {
        let mut common = Vec::new();
        for left in &self.values {
            for right in &other.values {
                if let Some(value) = meet(left, right) {
                    common.push(value);
                }
            }
        }
        ValueSet::new(common)
    }

    /// Materialize every value of the set, expanding intervals with the steps
    /// of `discretization`.
    pub fn discretize(
        &self,
        discretization: &Discretization,
    ) -> Result<DiscreteValues<'_>, ValueSetError> {
        Ok(DiscreteValues::new(
            self.values.iter(),
            self.checked_steps(discretization)?,
        ))
    }

    /// Number of values [`ValueSet::discretize`] yields. Saturates at `u128::MAX`.
    pub fn discrete_len(&self, discretization: &Discretization) -> Result<u128, ValueSetError> {
        let steps = self.checked_steps(discretization)?;
        let mut total: u128 = 0;
        for value in &self.values {
            let count = match value {
                Value::Interval(interval) => interval_len(interval, steps.get(interval.kind())),
                _ => 1,
            };
            total = total.saturating_add(count);
        }
        Ok(total)
    }

    fn checked_steps(&self, discretization: &Discretization) -> Result<Steps, ValueSetError> {
        let steps = discretization.steps()?;
        for interval in self.intervals() {
            interval.check_step(steps.get(interval.kind()))?;
        }
        Ok(steps)
    }

    fn intervals(&self) -> impl Iterator<Item = &Interval> {
        self.values.iter().filter_map(|value| match value {
            Value::Interval(interval) => Some(interval),
            _ => None,
        })
    }
}

fn interval_len(interval: &Interval, step: &Numeric) -> u128 {
    match (interval.inf(), interval.sup(), step) {
        (Numeric::Int(inf), Numeric::Int(sup), Numeric::Int(step)) => {
            ((*sup as i128 - *inf as i128) / *step as i128 + 1) as u128
        }
        (Numeric::BigInt(inf), Numeric::BigInt(sup), Numeric::BigInt(step)) => {
            u128::try_from((sup - inf) / step + 1).unwrap_or(u128::MAX)
        }
        (Numeric::Float(inf), Numeric::Float(sup), Numeric::Float(step)) => {
            float_len(inf.get(), sup.get(), step.get())
        }
        _ => 0,
    }
}

/// Common part of two values, if any.
fn meet(left: &Value, right: &Value) -> Option<Value> {
    if left == right {
        return Some(left.clone());
    }

    match (left, right) {
        (Value::Interval(a), Value::Interval(b)) => {
            a.intersection(b).ok().map(Value::from)
        }
        (Value::Interval(interval), scalar) | (scalar, Value::Interval(interval)) => scalar
            .numeric()
            .filter(|value| interval.contains(value))
            .map(|_| scalar.clone()),
        (Value::Point(a), Value::Point(b)) if a.covers(b) => Some(right.clone()),
        (Value::Point(a), Value::Point(b)) if b.covers(a) => Some(left.clone()),
        _ => None,
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        ValueSet::new(iter)
    }
}

impl From<Value> for ValueSet {
    fn from(value: Value) -> Self {
        ValueSet::new([value])
    }
}

impl From<Vec<Value>> for ValueSet {
    fn from(values: Vec<Value>) -> Self {
        ValueSet::new(values)
    }
}

impl From<ValueSet> for Vec<Value> {
    fn from(set: ValueSet) -> Self {
        set.values.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = btree_set::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for ValueSet {
    type Item = Value;
    type IntoIter = btree_set::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl BitOr<&ValueSet> for &ValueSet {
    type Output = ValueSet;

    fn bitor(self, rhs: &ValueSet) -> ValueSet {
        self.union(rhs)
    }
}

impl Sub<&ValueSet> for &ValueSet {
    type Output = ValueSet;

    fn sub(self, rhs: &ValueSet) -> ValueSet {
        self.difference(rhs)
    }
}

impl BitAnd<&ValueSet> for &ValueSet {
    type Output = ValueSet;

    fn bitand(self, rhs: &ValueSet) -> ValueSet {
        self.intersection(rhs)
    }
}

impl std::fmt::Display for ValueSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (index, value) in self.values.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value.literal())?;
        }
        write!(f, "}}")
    }
}
