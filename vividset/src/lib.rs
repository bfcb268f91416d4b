//! Typed value sets for attribute ascriptions.
//!
//! A [`ValueSet`] mixes scalars (integers, floats, extended-precision
//! integers, strings, booleans), closed numeric [`Interval`]s and geometric
//! values ([`Point`], [`LineSegment`]) in one canonical container supporting
//! subset, union, difference and intersection. Ranges are only ever
//! materialized through an explicit [`Discretization`].
//!
//! ```
//! use vividset::{Interval, Value, ValueSet};
//!
//! let hours = ValueSet::new([Interval::int(1, 12).unwrap().into()]);
//! let six = ValueSet::single(6);
//! let rest = &hours - &six;
//!
//! assert_eq!(
//!     rest,
//!     ValueSet::new([
//!         Interval::int(1, 5).unwrap().into(),
//!         Interval::int(7, 12).unwrap().into(),
//!     ])
//! );
//! assert!(six.is_subset(&hours));
//! assert!(!hours.contains(&Value::from(13)));
//! ```

pub mod discretize;
pub mod error;
pub mod interval;
pub mod numeric;
pub mod point;
pub mod value;
pub mod value_set;

pub use discretize::{DiscreteValues, Discretization};
pub use error::ValueSetError;
pub use interval::{Interval, Piece};
pub use numeric::{Numeric, NumericKind, Real};
pub use point::{LineSegment, Point};
pub use value::{Value, ValueKind};
pub use value_set::ValueSet;
