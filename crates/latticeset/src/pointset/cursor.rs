//! Coordinate cursors handed out by [`PointSet::cursor`].

use std::sync::Arc;

use super::PointSet;
use crate::{
    cursor::{Cursor, Localizable},
    error::{self, Error},
    grid::PositionAccess,
    hypersphere::HyperSphereCursor,
    interval::IntervalCursor,
    point::Point,
};

/// Cursor over the members of a [`PointSet`], yielding each coordinate once.
///
/// Cursors are independent of each other and of later cursors over the same
/// set. Cloning yields a deep copy at the same position.
#[derive(Clone, Debug)]
pub struct PointSetCursor {
    /// Variant-specific traversal state.
    inner: Inner,
}

/// One traversal strategy per region variant.
#[derive(Clone, Debug)]
enum Inner {
    /// Recursive-radius scan of a ball.
    Ball(HyperSphereCursor<PositionAccess>),
    /// Raster scan of a block.
    Block(IntervalCursor<PositionAccess>),
    /// Walk of an explicit list.
    List(ListCursor),
    /// First child, then the second child's points not in the first.
    Union(Box<UnionCursor>),
    /// One child filtered through the other's membership.
    Filter(Box<FilterCursor>),
}

impl PointSetCursor {
    /// Cursor over a ball.
    pub(crate) fn ball(cursor: HyperSphereCursor<PositionAccess>) -> Self {
        Self {
            inner: Inner::Ball(cursor),
        }
    }

    /// Cursor over a block.
    pub(crate) fn block(cursor: IntervalCursor<PositionAccess>) -> Self {
        Self {
            inner: Inner::Block(cursor),
        }
    }

    /// Cursor over an explicit list anchored at `origin`.
    pub(crate) fn list(origin: Point, offsets: Arc<Vec<Point>>) -> Self {
        Self {
            inner: Inner::List(ListCursor {
                current: origin.clone(),
                origin,
                offsets,
                consumed: 0,
            }),
        }
    }

    /// Union cursor: all of `a`, then the points of `b` outside `first`.
    pub(crate) fn union(a: Self, b: Self, first: PointSet) -> Self {
        let current = Point::origin(first.num_dimensions());
        Self {
            inner: Inner::Union(Box::new(UnionCursor {
                a,
                b,
                first,
                current,
                pending: None,
            })),
        }
    }

    /// Points of `source` whose membership in `filter` equals `keep_members`.
    pub(crate) fn filter(source: Self, filter: PointSet, keep_members: bool) -> Self {
        let current = Point::origin(filter.num_dimensions());
        Self {
            inner: Inner::Filter(Box::new(FilterCursor {
                source,
                filter,
                keep_members,
                current,
                pending: None,
            })),
        }
    }
}

impl Localizable for PointSetCursor {
    fn num_dimensions(&self) -> usize {
        match &self.inner {
            Inner::Ball(c) => c.num_dimensions(),
            Inner::Block(c) => c.num_dimensions(),
            Inner::List(c) => c.current.dimension(),
            Inner::Union(c) => c.current.dimension(),
            Inner::Filter(c) => c.current.dimension(),
        }
    }

    fn position(&self, d: usize) -> i64 {
        match &self.inner {
            Inner::Ball(c) => c.position(d),
            Inner::Block(c) => c.position(d),
            Inner::List(c) => c.current[d],
            Inner::Union(c) => c.current[d],
            Inner::Filter(c) => c.current[d],
        }
    }
}

impl Cursor for PointSetCursor {
    type Item = Point;

    fn has_next(&mut self) -> bool {
        match &mut self.inner {
            Inner::Ball(c) => c.has_next(),
            Inner::Block(c) => c.has_next(),
            Inner::List(c) => c.consumed < c.offsets.len(),
            Inner::Union(c) => c.pending.is_some() || c.prefetch(),
            Inner::Filter(c) => c.pending.is_some() || c.prefetch(),
        }
    }

    fn fwd(&mut self) -> error::Result<()> {
        match &mut self.inner {
            Inner::Ball(c) => c.fwd(),
            Inner::Block(c) => c.fwd(),
            Inner::List(c) => c.fwd(),
            Inner::Union(c) => {
                if c.pending.is_none() && !c.prefetch() {
                    return Err(Error::ExhaustedIteration);
                }
                c.current = c.pending.take().ok_or(Error::ExhaustedIteration)?;
                Ok(())
            }
            Inner::Filter(c) => {
                if c.pending.is_none() && !c.prefetch() {
                    return Err(Error::ExhaustedIteration);
                }
                c.current = c.pending.take().ok_or(Error::ExhaustedIteration)?;
                Ok(())
            }
        }
    }

    fn jump_fwd(&mut self, steps: u64) -> error::Result<()> {
        if let Inner::Block(c) = &mut self.inner {
            return c.jump_fwd(steps);
        }
        for _ in 0..steps {
            self.fwd()?;
        }
        Ok(())
    }

    fn get(&self) -> Point {
        match &self.inner {
            Inner::Ball(c) => c.get(),
            Inner::Block(c) => c.get(),
            Inner::List(c) => c.current.clone(),
            Inner::Union(c) => c.current.clone(),
            Inner::Filter(c) => c.current.clone(),
        }
    }

    fn reset(&mut self) {
        match &mut self.inner {
            Inner::Ball(c) => c.reset(),
            Inner::Block(c) => c.reset(),
            Inner::List(c) => {
                c.consumed = 0;
                c.current = c.origin.clone();
            }
            Inner::Union(c) => {
                c.a.reset();
                c.b.reset();
                c.pending = None;
            }
            Inner::Filter(c) => {
                c.source.reset();
                c.pending = None;
            }
        }
    }
}

/// Walk over an explicit list of offsets.
#[derive(Clone, Debug)]
struct ListCursor {
    /// Anchor added to each offset.
    origin: Point,
    /// Shared, immutable offsets.
    offsets: Arc<Vec<Point>>,
    /// Number of offsets consumed.
    consumed: usize,
    /// Materialised current coordinate.
    current: Point,
}

impl ListCursor {
    /// Step to the next offset.
    fn fwd(&mut self) -> error::Result<()> {
        let offset = self
            .offsets
            .get(self.consumed)
            .ok_or(Error::ExhaustedIteration)?;
        self.current.0.copy_from_slice(&self.origin);
        self.current.shift(offset);
        self.consumed += 1;
        Ok(())
    }
}

/// State for enumerating `A ∪ B` without repeats.
#[derive(Clone, Debug)]
struct UnionCursor {
    /// Cursor over the first child.
    a: PointSetCursor,
    /// Cursor over the second child.
    b: PointSetCursor,
    /// The first child, consulted to skip points `a` already produced.
    first: PointSet,
    /// Materialised current coordinate.
    current: Point,
    /// Next coordinate, found by `has_next` but not yet consumed.
    pending: Option<Point>,
}

impl UnionCursor {
    /// Find the next element and park it in `pending`.
    fn prefetch(&mut self) -> bool {
        if self.a.has_next() {
            self.pending = self.a.next().ok();
            return self.pending.is_some();
        }
        while self.b.has_next() {
            match self.b.next() {
                Ok(p) if !self.first.contains(&p) => {
                    self.pending = Some(p);
                    return true;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
        false
    }
}

/// State for intersection and difference: a child filtered by membership.
#[derive(Clone, Debug)]
struct FilterCursor {
    /// Cursor producing candidates.
    source: PointSetCursor,
    /// Set whose membership decides each candidate.
    filter: PointSet,
    /// Keep candidates inside `filter` (intersection) or outside (difference).
    keep_members: bool,
    /// Materialised current coordinate.
    current: Point,
    /// Next coordinate, found by `has_next` but not yet consumed.
    pending: Option<Point>,
}

impl FilterCursor {
    /// Find the next accepted candidate and park it in `pending`.
    fn prefetch(&mut self) -> bool {
        while self.source.has_next() {
            match self.source.next() {
                Ok(p) if self.filter.contains(&p) == self.keep_members => {
                    self.pending = Some(p);
                    return true;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
        false
    }
}
