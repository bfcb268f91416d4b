use strum::EnumIs;
use thiserror::Error;

use crate::numeric::NumericKind;

#[derive(Debug, Clone, PartialEq, EnumIs, Error)]
pub enum ValueSetError {
    /// NaN and infinities have no place in a discretizable domain.
    #[error("Floating-point values must be finite, got `{0}`.")]
    NonFiniteFloat(f64),

    /// Both bounds of an interval must be of the same numeric kind.
    #[error("Interval bounds must share a numeric kind, got a {inf} lower bound and a {sup} upper bound.")]
    KindMismatch { inf: NumericKind, sup: NumericKind },

    /// An interval needs `inf < sup`; single values are plain scalars.
    #[error("Interval lower bound `{inf}` must be strictly below its upper bound `{sup}`.")]
    EmptyInterval { inf: String, sup: String },

    /// Union and intersection are only defined for overlapping (or adjacent) intervals.
    #[error("Intervals `{left}` and `{right}` neither overlap nor touch and cannot be combined.")]
    DisjointIntervals { left: String, right: String },

    /// Discretization needs a strictly positive step.
    #[error("Discretization step for {kind} intervals must be strictly positive, got `{step}`.")]
    InvalidStep { kind: NumericKind, step: String },

    /// Float steps must stay above the spacing of representable values within
    /// the interval, or consecutive values would collapse.
    #[error("Discretization step `{step}` is below the floating-point resolution of `{interval}`.")]
    StepBelowResolution { step: String, interval: String },

    /// The step handed to an interval must be of the interval's own kind.
    #[error("Cannot discretize a {interval} interval with a {step} step.")]
    StepKindMismatch {
        interval: NumericKind,
        step: NumericKind,
    },

    /// Points live in at least one dimension.
    #[error("Points must have at least one coordinate.")]
    ZeroDimension,

    /// Geometric values mixing dimensions.
    #[error("Expected a point of dimension {expected}, found dimension {found}.")]
    DimensionMismatch { expected: usize, found: usize },
}
