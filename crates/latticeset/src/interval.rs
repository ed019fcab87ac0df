//! Raster-order traversal of an axis-aligned box through a grid accessor.

use crate::{
    bounds::Bounds,
    cursor::{Cursor, Localizable},
    error::{self, Error},
    grid::RandomAccess,
};

/// Cursor visiting every coordinate of a [`Bounds`] with dimension 0 varying
/// fastest, reading values through a [`RandomAccess`].
#[derive(Clone, Debug)]
pub struct IntervalCursor<A> {
    /// Region walked by the cursor.
    bounds: Bounds,
    /// Accessor positioned on the current element.
    source: A,
    /// Number of elements in `bounds`.
    size: u64,
    /// Number of elements consumed so far.
    consumed: u64,
}

impl<A: RandomAccess> IntervalCursor<A> {
    /// Cursor over `bounds`; `source` is repositioned and owned by the cursor.
    ///
    /// Fails with [`Error::InvalidArgument`] when the box holds more than
    /// `u64::MAX` points.
    pub fn new(bounds: Bounds, source: A) -> error::Result<Self> {
        let size = bounds.volume().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "box {:?}..={:?} holds more than u64::MAX points",
                bounds.min.as_slice(),
                bounds.max.as_slice()
            ))
        })?;
        Ok(Self::with_size(bounds, source, size))
    }

    /// Cursor over `bounds` whose point count `size` is already known.
    pub(crate) fn with_size(bounds: Bounds, source: A, size: u64) -> Self {
        debug_assert_eq!(bounds.dimension(), source.num_dimensions());
        debug_assert_eq!(bounds.volume(), Some(size));
        let mut cursor = Self {
            bounds,
            source,
            size,
            consumed: 0,
        };
        cursor.reset();
        cursor
    }

    /// The region walked by this cursor.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Place the accessor on the element with zero-based raster `index`.
    fn seek(&mut self, mut index: u64) {
        for d in 0..self.bounds.dimension() {
            // Every extent of a non-empty box with a u64 volume fits in a u64.
            let extent = self.bounds.max[d].abs_diff(self.bounds.min[d]) + 1;
            let offset = index % extent;
            index /= extent;
            self.source
                .set_position_dim(self.bounds.min[d].wrapping_add_unsigned(offset), d);
        }
    }
}

impl<A: RandomAccess> Localizable for IntervalCursor<A> {
    fn num_dimensions(&self) -> usize {
        self.source.num_dimensions()
    }

    fn position(&self, d: usize) -> i64 {
        self.source.position(d)
    }
}

impl<A: RandomAccess> Cursor for IntervalCursor<A> {
    type Item = A::Value;

    fn has_next(&mut self) -> bool {
        self.consumed < self.size
    }

    fn fwd(&mut self) -> error::Result<()> {
        if self.consumed >= self.size {
            return Err(Error::ExhaustedIteration);
        }
        self.consumed += 1;
        if self.consumed == 1 {
            // Already parked on the first element.
            return Ok(());
        }
        for d in 0..self.bounds.dimension() {
            if self.source.position(d) < self.bounds.max[d] {
                self.source.fwd_dim(d);
                return Ok(());
            }
            self.source.set_position_dim(self.bounds.min[d], d);
        }
        Ok(())
    }

    /// Arithmetic skip; ends on the same element as `steps` calls to `fwd`.
    fn jump_fwd(&mut self, steps: u64) -> error::Result<()> {
        if steps == 0 {
            return Ok(());
        }
        let remaining = self.size - self.consumed;
        let taken = steps.min(remaining);
        if taken > 0 {
            self.consumed += taken;
            self.seek(self.consumed - 1);
        }
        if steps > remaining {
            return Err(Error::ExhaustedIteration);
        }
        Ok(())
    }

    fn get(&self) -> A::Value {
        self.source.get()
    }

    fn reset(&mut self) {
        self.consumed = 0;
        self.source.set_position(&self.bounds.min);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::{ArrayGrid, Lattice, RandomAccessible},
        point::Point,
    };

    #[test]
    fn raster_order() -> error::Result<()> {
        let bounds = Bounds::new([1, 5], [2, 6])?;
        let cursor = IntervalCursor::new(bounds, Lattice::new(2).random_access())?;
        let visited: Vec<Point> = cursor.items().collect();
        assert_eq!(
            visited,
            vec![
                Point::from([1, 5]),
                Point::from([2, 5]),
                Point::from([1, 6]),
                Point::from([2, 6]),
            ]
        );
        Ok(())
    }

    #[test]
    fn empty_bounds_yield_nothing() -> error::Result<()> {
        let bounds = Bounds::new([0, 3], [4, 2])?;
        let mut cursor = IntervalCursor::new(bounds, Lattice::new(2).random_access())?;
        assert!(!cursor.has_next());
        assert_eq!(cursor.fwd(), Err(Error::ExhaustedIteration));
        Ok(())
    }

    #[test]
    fn jump_matches_stepping() -> error::Result<()> {
        let grid = ArrayGrid::from_vec(&[7, 5, 3], (0..105).collect())?;
        let mut stepped = grid.cursor();
        let mut jumped = grid.cursor();

        stepped.fwd()?;
        jumped.fwd()?;
        assert_eq!(stepped.get(), jumped.get());

        for _ in 0..10 {
            stepped.fwd()?;
        }
        jumped.jump_fwd(10)?;
        assert_eq!(stepped.get(), jumped.get());
        assert_eq!(stepped.position_point(), jumped.position_point());

        stepped.jump_fwd(0)?;
        for _ in 0..71 {
            stepped.fwd()?;
        }
        jumped.jump_fwd(71)?;
        assert_eq!(jumped.get(), Some(&81));
        assert_eq!(stepped.get(), jumped.get());

        assert_eq!(jumped.jump_fwd(100), Err(Error::ExhaustedIteration));
        assert_eq!(jumped.get(), Some(&104));
        Ok(())
    }

    #[test]
    fn copies_between_grids() -> error::Result<()> {
        let src = ArrayGrid::from_vec(&[4, 3], (0..12).map(|v| v * 3).collect())?;
        let mut dst = ArrayGrid::new(&[4, 3], 0)?;
        let mut cursor = src.cursor();
        while cursor.has_next() {
            let value = cursor.next()?.copied().unwrap_or_default();
            dst.set_at(&cursor.position_point(), value)?;
        }
        assert_eq!(dst.as_slice(), src.as_slice());
        Ok(())
    }

    #[test]
    fn oversized_box_is_rejected() -> error::Result<()> {
        let bounds = Bounds::new([i64::MIN, 0], [i64::MAX, 0])?;
        assert!(matches!(
            IntervalCursor::new(bounds, Lattice::new(2).random_access()),
            Err(Error::InvalidArgument(_))
        ));
        Ok(())
    }

    #[test]
    fn box_at_the_coordinate_limits() -> error::Result<()> {
        let bounds = Bounds::new([i64::MIN, i64::MAX - 1], [i64::MAX - 1, i64::MAX])?;
        assert!(matches!(
            IntervalCursor::new(bounds, Lattice::new(2).random_access()),
            Err(Error::InvalidArgument(_))
        ));

        let bounds = Bounds::new([i64::MIN], [i64::MAX - 1])?;
        let mut cursor = IntervalCursor::new(bounds, Lattice::new(1).random_access())?;
        assert_eq!(cursor.next()?, Point::from([i64::MIN]));
        cursor.jump_fwd(u64::MAX - 2)?;
        assert_eq!(cursor.get(), Point::from([i64::MAX - 2]));
        assert_eq!(cursor.next()?, Point::from([i64::MAX - 1]));
        assert!(!cursor.has_next());
        assert!(cursor.fwd().is_err());
        cursor.reset();
        assert_eq!(cursor.next()?, Point::from([i64::MIN]));
        Ok(())
    }

    #[test]
    fn items_hand_back_the_cursor() -> error::Result<()> {
        let grid = ArrayGrid::from_vec(&[3, 2], vec![1, 2, 3, 4, 5, 6])?;
        let mut items = grid.cursor().items();
        let head: Vec<_> = items.by_ref().take(4).flatten().copied().collect();
        assert_eq!(head, vec![1, 2, 3, 4]);

        let mut cursor = items.into_cursor();
        assert_eq!(cursor.get(), Some(&4));
        assert_eq!(cursor.position_point(), Point::from([0, 1]));
        assert_eq!(cursor.drain_count(), 2);
        Ok(())
    }

    #[test]
    fn reset_restarts() -> error::Result<()> {
        let grid = ArrayGrid::from_vec(&[2, 2], vec!['a', 'b', 'c', 'd'])?;
        let mut cursor = grid.cursor();
        let first: Vec<_> = (0..4).map(|_| cursor.next()).collect::<error::Result<_>>()?;
        assert!(!cursor.has_next());
        cursor.reset();
        let again: Vec<_> = cursor.items().collect();
        assert_eq!(first, again);
        Ok(())
    }
}
