//! Axis-aligned integer bounding boxes.

use crate::{
    error::{self, check_dimensions},
    point::Point,
};

/// Inclusive axis-aligned box in lattice space.
///
/// A box whose `min` exceeds its `max` on any axis is empty. Empty boxes are
/// legal values: they arise from intersecting disjoint regions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    /// Minimum corner (inclusive).
    pub min: Point,
    /// Maximum corner (inclusive).
    pub max: Point,
}

impl Bounds {
    /// Box spanning `min..=max`. Corners must share a dimensionality.
    pub fn new(min: impl Into<Point>, max: impl Into<Point>) -> error::Result<Self> {
        let (min, max) = (min.into(), max.into());
        check_dimensions(min.dimension(), max.dimension())?;
        Ok(Self { min, max })
    }

    /// Box containing exactly `point`.
    pub fn of_point(point: &[i64]) -> Self {
        Self {
            min: Point::from_slice(point),
            max: Point::from_slice(point),
        }
    }

    /// Dimensionality of the box.
    pub fn dimension(&self) -> usize {
        self.min.dimension()
    }

    /// True when no lattice point lies inside the box.
    pub fn is_empty(&self) -> bool {
        self.min.iter().zip(self.max.iter()).any(|(lo, hi)| lo > hi)
    }

    /// Membership test for a single coordinate.
    pub fn contains(&self, point: &[i64]) -> bool {
        point.len() == self.dimension()
            && point
                .iter()
                .zip(self.min.iter().zip(self.max.iter()))
                .all(|(p, (lo, hi))| lo <= p && p <= hi)
    }

    /// Smallest box containing both `self` and `other`.
    pub fn hull(&self, other: &Self) -> Self {
        debug_assert_eq!(self.dimension(), other.dimension());
        Self {
            min: Point(
                self.min
                    .iter()
                    .zip(other.min.iter())
                    .map(|(a, b)| *a.min(b))
                    .collect(),
            ),
            max: Point(
                self.max
                    .iter()
                    .zip(other.max.iter())
                    .map(|(a, b)| *a.max(b))
                    .collect(),
            ),
        }
    }

    /// Box shared by `self` and `other`; may be empty.
    pub fn overlap(&self, other: &Self) -> Self {
        debug_assert_eq!(self.dimension(), other.dimension());
        Self {
            min: Point(
                self.min
                    .iter()
                    .zip(other.min.iter())
                    .map(|(a, b)| *a.max(b))
                    .collect(),
            ),
            max: Point(
                self.max
                    .iter()
                    .zip(other.max.iter())
                    .map(|(a, b)| *a.min(b))
                    .collect(),
            ),
        }
    }

    /// The box shifted by `delta`.
    pub fn translated(&self, delta: &[i64]) -> error::Result<Self> {
        Ok(Self {
            min: self.min.offset_by(delta)?,
            max: self.max.offset_by(delta)?,
        })
    }

    /// Number of lattice positions along axis `d` (0 when empty on that axis),
    /// or `None` when the axis spans all `2^64` values.
    pub fn extent(&self, d: usize) -> Option<u64> {
        if self.min[d] > self.max[d] {
            Some(0)
        } else {
            self.max[d].abs_diff(self.min[d]).checked_add(1)
        }
    }

    /// Number of lattice points inside the box, or `None` when that count
    /// does not fit in a `u64`.
    pub fn volume(&self) -> Option<u64> {
        if self.is_empty() {
            return Some(0);
        }
        (0..self.dimension()).try_fold(1u64, |acc, d| acc.checked_mul(self.extent(d)?))
    }
}
