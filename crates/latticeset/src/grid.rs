//! The random-access grid capability consumed by neighborhood traversal.
//!
//! The storage layer is external to this crate; traversals only need an
//! accessor that can be repositioned, stepped along one axis, read, and
//! cloned into an independently positioned copy. Two accessors ship here:
//! [`PositionAccess`], whose value is its own coordinate, and
//! [`ArrayAccess`], a view into a dense in-memory [`ArrayGrid`].

use std::fmt;

use smallvec::SmallVec;

use crate::{
    bounds::Bounds,
    cursor::Localizable,
    error::{self, Error, check_dimensions},
    interval::IntervalCursor,
    point::Point,
};

/// Something whose position can be set.
pub trait Positionable {
    /// Move to `position`, which must hold `num_dimensions()` values.
    fn set_position(&mut self, position: &[i64]);

    /// Set the coordinate along dimension `d` only.
    fn set_position_dim(&mut self, value: i64, d: usize);

    /// Move one step forward along dimension `d`.
    fn fwd_dim(&mut self, d: usize);

    /// Move `distance` steps along dimension `d`.
    fn move_dim(&mut self, distance: i64, d: usize);
}

/// Repositionable read handle into a grid.
///
/// `Clone` yields an independently positioned accessor.
pub trait RandomAccess: Localizable + Positionable + Clone {
    /// Value read at the current position.
    type Value;

    /// Read the value at the current position.
    fn get(&self) -> Self::Value;

    /// Independently positioned copy of this accessor.
    fn copy_access(&self) -> Self {
        self.clone()
    }
}

/// A source of [`RandomAccess`] handles.
pub trait RandomAccessible {
    /// Accessor type handed out.
    type Access: RandomAccess;

    /// Dimensionality of the grid.
    fn num_dimensions(&self) -> usize;

    /// A fresh accessor, positioned at the origin.
    fn random_access(&self) -> Self::Access;
}

/// The unbounded integer lattice; the value at every coordinate is the
/// coordinate itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lattice {
    /// Dimensionality of the lattice.
    dimension: usize,
}

impl Lattice {
    /// Lattice of the given dimensionality.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl RandomAccessible for Lattice {
    type Access = PositionAccess;

    fn num_dimensions(&self) -> usize {
        self.dimension
    }

    fn random_access(&self) -> PositionAccess {
        PositionAccess::at(Point::origin(self.dimension))
    }
}

/// Accessor over a [`Lattice`]: reading yields the current coordinate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionAccess {
    /// Current coordinate.
    position: Point,
}

impl PositionAccess {
    /// Accessor placed at `position`.
    pub fn at(position: impl Into<Point>) -> Self {
        Self {
            position: position.into(),
        }
    }
}

impl Localizable for PositionAccess {
    fn num_dimensions(&self) -> usize {
        self.position.dimension()
    }

    fn position(&self, d: usize) -> i64 {
        self.position[d]
    }

    fn position_point(&self) -> Point {
        self.position.clone()
    }
}

impl Positionable for PositionAccess {
    fn set_position(&mut self, position: &[i64]) {
        debug_assert_eq!(position.len(), self.position.dimension());
        self.position.0.copy_from_slice(position);
    }

    fn set_position_dim(&mut self, value: i64, d: usize) {
        self.position.0[d] = value;
    }

    fn fwd_dim(&mut self, d: usize) {
        self.position.0[d] += 1;
    }

    fn move_dim(&mut self, distance: i64, d: usize) {
        self.position.0[d] += distance;
    }
}

impl RandomAccess for PositionAccess {
    type Value = Point;

    fn get(&self) -> Point {
        self.position.clone()
    }
}

/// Dense row-major grid anchored at the origin; dimension 0 varies fastest.
#[derive(Clone, PartialEq, Eq)]
pub struct ArrayGrid<T> {
    /// Size along each dimension.
    dims: SmallVec<[usize; 8]>,
    /// Flattened samples.
    data: Vec<T>,
}

impl<T> ArrayGrid<T> {
    /// Grid of the given size with every sample set to `fill`.
    pub fn new(dims: &[usize], fill: T) -> error::Result<Self>
    where
        T: Clone,
    {
        let len = Self::checked_len(dims)?;
        Ok(Self {
            dims: SmallVec::from_slice(dims),
            data: vec![fill; len],
        })
    }

    /// Grid of the given size over existing row-major `data`.
    pub fn from_vec(dims: &[usize], data: Vec<T>) -> error::Result<Self> {
        let len = Self::checked_len(dims)?;
        if data.len() != len {
            return Err(Error::InvalidArgument(format!(
                "grid of size {dims:?} needs {len} samples, got {}",
                data.len()
            )));
        }
        Ok(Self {
            dims: SmallVec::from_slice(dims),
            data,
        })
    }

    /// Sample count implied by `dims`.
    fn checked_len(dims: &[usize]) -> error::Result<usize> {
        if dims.is_empty() {
            return Err(Error::InvalidArgument(
                "grid needs at least one dimension".into(),
            ));
        }
        dims.iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| Error::InvalidArgument(format!("grid of size {dims:?} overflows")))
    }

    /// Size along each dimension.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the grid holds no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The flattened samples in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Inclusive bounds of the grid; empty when any dimension is zero.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min: Point::origin(self.dims.len()),
            max: Point(self.dims.iter().map(|&d| d as i64 - 1).collect()),
        }
    }

    /// Flat index of `position`, or `None` outside the grid.
    fn index_of(&self, position: &[i64]) -> Option<usize> {
        if position.len() != self.dims.len() {
            return None;
        }
        let mut index = 0usize;
        for (&p, &size) in position.iter().zip(self.dims.iter()).rev() {
            let p = usize::try_from(p).ok().filter(|&p| p < size)?;
            index = index * size + p;
        }
        Some(index)
    }

    /// Sample at `position`, or `None` outside the grid.
    pub fn get_at(&self, position: &[i64]) -> Option<&T> {
        self.index_of(position).map(|i| &self.data[i])
    }

    /// Overwrite the sample at `position`.
    pub fn set_at(&mut self, position: &[i64], value: T) -> error::Result<()> {
        check_dimensions(self.dims.len(), position.len())?;
        let index = self.index_of(position).ok_or_else(|| {
            Error::InvalidArgument(format!("position {position:?} lies outside the grid"))
        })?;
        self.data[index] = value;
        Ok(())
    }

    /// Accessor positioned at the origin.
    pub fn access(&self) -> ArrayAccess<'_, T> {
        ArrayAccess {
            grid: self,
            position: Point::origin(self.dims.len()),
        }
    }

    /// Raster-order cursor over every sample.
    pub fn cursor(&self) -> IntervalCursor<ArrayAccess<'_, T>> {
        IntervalCursor::with_size(self.bounds(), self.access(), self.data.len() as u64)
    }
}

impl<T> fmt::Debug for ArrayGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayGrid")
            .field("dims", &self.dims)
            .field("len", &self.data.len())
            .finish()
    }
}

impl<'a, T> RandomAccessible for &'a ArrayGrid<T> {
    type Access = ArrayAccess<'a, T>;

    fn num_dimensions(&self) -> usize {
        self.dims.len()
    }

    fn random_access(&self) -> ArrayAccess<'a, T> {
        ArrayAccess {
            grid: *self,
            position: Point::origin(self.dims.len()),
        }
    }
}

/// Accessor into an [`ArrayGrid`]; reads `None` outside the grid.
pub struct ArrayAccess<'a, T> {
    /// Grid being read.
    grid: &'a ArrayGrid<T>,
    /// Current coordinate.
    position: Point,
}

impl<T> Clone for ArrayAccess<'_, T> {
    fn clone(&self) -> Self {
        Self {
            grid: self.grid,
            position: self.position.clone(),
        }
    }
}

impl<T> fmt::Debug for ArrayAccess<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayAccess")
            .field("position", &self.position)
            .finish()
    }
}

impl<T> Localizable for ArrayAccess<'_, T> {
    fn num_dimensions(&self) -> usize {
        self.position.dimension()
    }

    fn position(&self, d: usize) -> i64 {
        self.position[d]
    }
}

impl<T> Positionable for ArrayAccess<'_, T> {
    fn set_position(&mut self, position: &[i64]) {
        debug_assert_eq!(position.len(), self.position.dimension());
        self.position.0.copy_from_slice(position);
    }

    fn set_position_dim(&mut self, value: i64, d: usize) {
        self.position.0[d] = value;
    }

    fn fwd_dim(&mut self, d: usize) {
        self.position.0[d] += 1;
    }

    fn move_dim(&mut self, distance: i64, d: usize) {
        self.position.0[d] += distance;
    }
}

impl<'a, T> RandomAccess for ArrayAccess<'a, T> {
    type Value = Option<&'a T>;

    fn get(&self) -> Option<&'a T> {
        self.grid.get_at(&self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_indexing() -> error::Result<()> {
        let grid = ArrayGrid::from_vec(&[3, 2], vec![0, 1, 2, 3, 4, 5])?;
        assert_eq!(grid.get_at(&[0, 0]), Some(&0));
        assert_eq!(grid.get_at(&[2, 0]), Some(&2));
        assert_eq!(grid.get_at(&[0, 1]), Some(&3));
        assert_eq!(grid.get_at(&[2, 1]), Some(&5));
        assert_eq!(grid.get_at(&[3, 0]), None);
        assert_eq!(grid.get_at(&[-1, 0]), None);
        assert_eq!(grid.get_at(&[0]), None);
        Ok(())
    }

    #[test]
    fn array_construction_errors() {
        assert!(ArrayGrid::from_vec(&[2, 2], vec![1, 2, 3]).is_err());
        assert!(ArrayGrid::new(&[], 0u8).is_err());
        assert!(ArrayGrid::new(&[usize::MAX, 2], 0u8).is_err());
    }

    #[test]
    fn set_at_rejects_outside() -> error::Result<()> {
        let mut grid = ArrayGrid::new(&[2, 2], 0)?;
        grid.set_at(&[1, 1], 7)?;
        assert_eq!(grid.get_at(&[1, 1]), Some(&7));
        assert!(matches!(
            grid.set_at(&[2, 0], 1),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            grid.set_at(&[0], 1),
            Err(Error::DimensionMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn access_copies_are_independent() -> error::Result<()> {
        let grid = ArrayGrid::from_vec(&[3], vec![10, 20, 30])?;
        let mut a = grid.access();
        a.fwd_dim(0);
        let mut b = a.copy_access();
        b.fwd_dim(0);
        assert_eq!(a.get(), Some(&20));
        assert_eq!(b.get(), Some(&30));
        b.move_dim(5, 0);
        assert_eq!(b.get(), None);
        assert_eq!(a.position(0), 1);
        Ok(())
    }

    #[test]
    fn lattice_reads_position() {
        let lattice = Lattice::new(2);
        let mut access = lattice.random_access();
        access.set_position(&[4, -3]);
        access.fwd_dim(1);
        assert_eq!(access.get(), Point::from([4, -2]));
        access.set_position_dim(9, 0);
        assert_eq!(access.position_point(), Point::from([9, -2]));
    }
}
