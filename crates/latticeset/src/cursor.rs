//! The cursor protocol shared by every traversal in the crate.
//!
//! A cursor starts positioned *before* its first element. Each successful
//! [`Cursor::fwd`] materialises the next element, which [`Cursor::get`] then
//! reads without side effects. [`Cursor::reset`] rewinds to the initial state
//! and re-enumerates in the same order. Coordinate accessors report
//! unspecified values until the first successful `fwd`.

use std::iter::FusedIterator;

use crate::{error, point::Point};

/// Something that has a position in n-dimensional lattice space.
pub trait Localizable {
    /// Dimensionality of the space.
    fn num_dimensions(&self) -> usize;

    /// Coordinate along dimension `d`.
    fn position(&self, d: usize) -> i64;

    /// Write the full coordinate into `out`, which must hold
    /// `num_dimensions()` values.
    fn localize(&self, out: &mut [i64]) {
        debug_assert_eq!(out.len(), self.num_dimensions());
        for (d, slot) in out.iter_mut().enumerate() {
            *slot = self.position(d);
        }
    }

    /// The full coordinate as a fresh [`Point`].
    fn position_point(&self) -> Point {
        Point((0..self.num_dimensions()).map(|d| self.position(d)).collect())
    }
}

/// Stateful, restartable, single-pass traversal.
///
/// `Clone` is the deep copy: a clone continues from the same logical position
/// and never shares mutable state with its source.
pub trait Cursor: Localizable + Clone {
    /// Element produced at each position.
    type Item;

    /// Whether at least one more element remains.
    ///
    /// Implementations may prefetch internally, but never change the
    /// position reported by [`Cursor::get`] or the coordinate accessors.
    fn has_next(&mut self) -> bool;

    /// Advance exactly one element.
    ///
    /// Fails with [`error::Error::ExhaustedIteration`] when nothing remains.
    fn fwd(&mut self) -> error::Result<()>;

    /// Advance `steps` elements; equivalent to `steps` calls to `fwd`.
    fn jump_fwd(&mut self, steps: u64) -> error::Result<()> {
        for _ in 0..steps {
            self.fwd()?;
        }
        Ok(())
    }

    /// The current element. Repeatable without side effects.
    fn get(&self) -> Self::Item;

    /// Advance, then read the new current element.
    fn next(&mut self) -> error::Result<Self::Item> {
        self.fwd()?;
        Ok(self.get())
    }

    /// Return to the state before the first element.
    fn reset(&mut self);

    /// Independent cursor at the same position.
    fn copy_cursor(&self) -> Self {
        self.clone()
    }

    /// Consume every remaining element, returning how many there were.
    fn drain_count(&mut self) -> u64 {
        let mut count = 0;
        while self.has_next() && self.fwd().is_ok() {
            count += 1;
        }
        count
    }

    /// Adapt the cursor into a standard [`Iterator`] over its remaining items.
    fn items(self) -> Items<Self>
    where
        Self: Sized,
    {
        Items { cursor: self }
    }
}

/// [`Iterator`] adapter over a [`Cursor`].
#[derive(Clone, Debug)]
pub struct Items<C> {
    /// The wrapped cursor.
    cursor: C,
}

impl<C> Items<C> {
    /// Recover the underlying cursor.
    pub fn into_cursor(self) -> C {
        self.cursor
    }
}

impl<C: Cursor> Iterator for Items<C> {
    type Item = C::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.has_next() {
            return None;
        }
        self.cursor.next().ok()
    }
}

impl<C: Cursor> FusedIterator for Items<C> {}
