//! Lightweight N‑dimensional integer coordinate.

use std::{ops::Deref, vec::Vec};

use smallvec::{SmallVec, smallvec};

use crate::error::{self, Error, check_dimensions};

/// Compact N‑dimensional lattice coordinate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point(pub SmallVec<[i64; 8]>);

impl Point {
    /// Create a new `Point` from a backing vector.
    pub fn new(vec: impl Into<SmallVec<[i64; 8]>>) -> Self {
        Self(vec.into())
    }

    /// The all-zero coordinate in `dimension` dimensions.
    pub fn origin(dimension: usize) -> Self {
        Self(smallvec![0; dimension])
    }

    /// Copy a coordinate out of a slice.
    pub fn from_slice(coords: &[i64]) -> Self {
        Self(SmallVec::from_slice(coords))
    }

    /// Squared Euclidean distance to `other`, saturating at `i128::MAX`.
    ///
    /// Both points must share a dimensionality; in release builds the
    /// distance is computed over the shared prefix.
    pub fn distance_squared(&self, other: &[i64]) -> i128 {
        debug_assert_eq!(self.len(), other.len(), "distance between differing dimensions");
        self.iter()
            .zip(other)
            .map(|(a, b)| {
                let d = *a as i128 - *b as i128;
                d.saturating_mul(d)
            })
            .fold(0, i128::saturating_add)
    }

    /// Component-wise `self + delta`.
    ///
    /// Fails with [`Error::InvalidArgument`] when a coordinate leaves the
    /// `i64` range.
    pub fn offset_by(&self, delta: &[i64]) -> error::Result<Self> {
        check_dimensions(self.len(), delta.len())?;
        self.iter()
            .zip(delta)
            .map(|(a, d)| a.checked_add(*d))
            .collect::<Option<Self>>()
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "offsetting {:?} by {delta:?} overflows",
                    self.as_slice()
                ))
            })
    }

    /// Component-wise `self - other`.
    ///
    /// Fails with [`Error::InvalidArgument`] when a coordinate leaves the
    /// `i64` range.
    pub fn minus(&self, other: &[i64]) -> error::Result<Self> {
        check_dimensions(self.len(), other.len())?;
        self.iter()
            .zip(other)
            .map(|(a, b)| a.checked_sub(*b))
            .collect::<Option<Self>>()
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "subtracting {other:?} from {:?} overflows",
                    self.as_slice()
                ))
            })
    }

    /// Shift in place by `delta`; the caller guarantees matching dimensions
    /// and has checked the result stays in range.
    pub(crate) fn shift(&mut self, delta: &[i64]) {
        for (a, d) in self.0.iter_mut().zip(delta) {
            *a += d;
        }
    }

    /// Return the point's coordinates as a slice.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// Dimensionality of the point.
    pub fn dimension(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<i64>> for Point {
    fn from(val: Vec<i64>) -> Self {
        Self(SmallVec::from_vec(val))
    }
}

impl<const N: usize> From<[i64; N]> for Point {
    fn from(val: [i64; N]) -> Self {
        Self::from_slice(&val)
    }
}

impl From<&[i64]> for Point {
    fn from(val: &[i64]) -> Self {
        Self::from_slice(val)
    }
}

impl FromIterator<i64> for Point {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Point> for Vec<i64> {
    fn from(val: Point) -> Self {
        val.0.to_vec()
    }
}

impl Deref for Point {
    type Target = [i64];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point() {
        let v = Point::new(vec![2, -2]);
        assert_eq!(v.len(), 2);
        assert_eq!(v.dimension(), 2);
        assert_eq!(Point::origin(3).as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn distance_squared() {
        let a = Point::from([2, 2]);
        assert_eq!(a.distance_squared(&[2, 1]), 1);
        assert_eq!(a.distance_squared(&[-1, 6]), 25);
        assert_eq!(a.distance_squared(&[2, 2]), 0);

        let far = Point::from([i64::MIN, i64::MIN]);
        assert_eq!(far.distance_squared(&[i64::MAX, i64::MAX]), i128::MAX);
    }

    #[test]
    fn offsets() -> error::Result<()> {
        let a = Point::from([1, 2, 3]);
        assert_eq!(a.offset_by(&[1, -1, 0])?, Point::from([2, 1, 3]));
        assert_eq!(a.minus(&[1, 1, 1])?, Point::from([0, 1, 2]));
        assert_eq!(
            a.offset_by(&[1]),
            Err(Error::DimensionMismatch {
                expected: 3,
                actual: 1
            })
        );
        assert!(matches!(
            a.offset_by(&[i64::MAX, 0, 0]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Point::from([i64::MIN]).minus(&[1]),
            Err(Error::InvalidArgument(_))
        ));
        Ok(())
    }
}
