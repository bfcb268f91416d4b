//! Geometric attribute values.
//!
//! These only ever appear as attribute values; the engine never does geometry
//! with them beyond equality and wildcard matching.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::ValueSetError, numeric::Real};

/// A point in `d` dimensions, or a generic point of dimension `d`.
///
/// A generic point leaves every coordinate unspecified and matches any point
/// of the same dimension.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Point {
    Generic { dimension: usize },
    Concrete(Vec<Real>),
}

impl Point {
    pub fn new(coordinates: impl IntoIterator<Item = f64>) -> Result<Self, ValueSetError> {
        let coordinates = coordinates
            .into_iter()
            .map(Real::new)
            .collect::<Result<Vec<_>, _>>()?;
        if coordinates.is_empty() {
            return Err(ValueSetError::ZeroDimension);
        }
        Ok(Point::Concrete(coordinates))
    }

    pub fn generic(dimension: usize) -> Result<Self, ValueSetError> {
        if dimension == 0 {
            return Err(ValueSetError::ZeroDimension);
        }
        Ok(Point::Generic { dimension })
    }

    pub fn dimension(&self) -> usize {
        match self {
            Point::Generic { dimension } => *dimension,
            Point::Concrete(coordinates) => coordinates.len(),
        }
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        matches!(self, Point::Generic { .. })
    }

    /// Coordinates of a concrete point.
    pub fn coordinates(&self) -> Option<&[Real]> {
        match self {
            Point::Generic { .. } => None,
            Point::Concrete(coordinates) => Some(coordinates),
        }
    }

    /// `true` if `self` equals `other` or is a generic point of the same dimension.
    pub fn covers(&self, other: &Point) -> bool {
        self == other || (self.is_generic() && self.dimension() == other.dimension())
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P(")?;
        match self {
            Point::Generic { dimension } => {
                for index in 0..*dimension {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "*")?;
                }
            }
            Point::Concrete(coordinates) => {
                for (index, coordinate) in coordinates.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", coordinate)?;
                }
            }
        }
        write!(f, ")")
    }
}

/// A segment between two points of the same dimension.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineSegment {
    start: Point,
    end: Point,
}

impl LineSegment {
    pub fn new(start: Point, end: Point) -> Result<Self, ValueSetError> {
        if start.dimension() != end.dimension() {
            return Err(ValueSetError::DimensionMismatch {
                expected: start.dimension(),
                found: end.dimension(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> &Point {
        &self.start
    }

    pub fn end(&self) -> &Point {
        &self.end
    }

    pub fn dimension(&self) -> usize {
        self.start.dimension()
    }
}

impl std::fmt::Display for LineSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L({}, {})", self.start, self.end)
    }
}
