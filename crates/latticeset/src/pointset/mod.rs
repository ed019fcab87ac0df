//! Point sets: finite regions of the integer lattice and their set algebra.
//!
//! A [`PointSet`] is a cheap, cloneable handle to a shared node. Cloning the
//! handle shares the node, so a [`PointSet::translate`] through any holder is
//! seen by every other holder, including combinators built on top of it.
//! [`PointSet::copy`] is the only way to break that sharing.
//!
//! Combinators only ever use their children's membership test, cursors,
//! bounds and translation, so the algebra closes under composition: the
//! union of an intersection and a translated difference is just another
//! point set.

mod cursor;
mod region;

use std::{fmt, sync::Arc};

use parking_lot::RwLock;

pub use self::cursor::PointSetCursor;
use self::region::{Ball, PointList, Region};
use crate::{
    bounds::Bounds,
    cursor::{Cursor, Items},
    error::{self, Error, check_dimensions},
    grid::PositionAccess,
    hypersphere::{HyperSphereCursor, ball_bounds, ball_size, checked_ball},
    interval::IntervalCursor,
    point::Point,
};

/// Bounding box memoised against the subtree revision it was computed at.
#[derive(Clone, Debug)]
struct CachedBounds {
    /// Subtree revision stamp at computation time.
    stamp: u64,
    /// The computed box.
    bounds: Bounds,
}

/// Shared state behind a [`PointSet`] handle.
#[derive(Debug)]
struct Node {
    /// Dimensionality, fixed at construction.
    dimension: usize,
    /// Shape or combinator.
    region: Region,
    /// Bumped on every translate of this node.
    revision: u64,
    /// Lazily computed bounding box; cleared on translate.
    cached: Option<CachedBounds>,
}

/// A finite set of lattice coordinates.
#[derive(Clone)]
pub struct PointSet {
    /// Shared node; cloning the handle aliases it.
    node: Arc<RwLock<Node>>,
}

impl PointSet {
    /// Wrap a region in a fresh node.
    fn from_region(dimension: usize, region: Region) -> Self {
        Self {
            node: Arc::new(RwLock::new(Node {
                dimension,
                region,
                revision: 0,
                cached: None,
            })),
        }
    }

    /// Lattice ball of `radius` around `center`.
    ///
    /// Fails with [`Error::InvalidArgument`] for a negative radius or a
    /// zero-dimensional center.
    pub fn ball(center: impl Into<Point>, radius: i64) -> error::Result<Self> {
        let center = center.into();
        checked_ball(&center, radius)?;
        Ok(Self::from_region(
            center.dimension(),
            Region::Ball(Ball { center, radius }),
        ))
    }

    /// Every lattice point in the inclusive box `min..=max`.
    ///
    /// Fails with [`Error::InvalidArgument`] for an empty box or one holding
    /// more than `u64::MAX` points.
    pub fn block(min: impl Into<Point>, max: impl Into<Point>) -> error::Result<Self> {
        let bounds = Bounds::new(min, max)?;
        if bounds.dimension() == 0 {
            return Err(Error::InvalidArgument(
                "a block needs at least one dimension".into(),
            ));
        }
        if bounds.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "block minimum {:?} exceeds maximum {:?}",
                bounds.min.as_slice(),
                bounds.max.as_slice()
            )));
        }
        let volume = bounds.volume().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "block {:?}..={:?} holds more than u64::MAX points",
                bounds.min.as_slice(),
                bounds.max.as_slice()
            ))
        })?;
        Ok(Self::from_region(
            bounds.dimension(),
            Region::Block(bounds, volume),
        ))
    }

    /// An explicit set of points. Duplicates collapse; the first occurrence
    /// fixes the enumeration order.
    pub fn list<P: Into<Point>>(
        dimension: usize,
        points: impl IntoIterator<Item = P>,
    ) -> error::Result<Self> {
        if dimension == 0 {
            return Err(Error::InvalidArgument(
                "a point list needs at least one dimension".into(),
            ));
        }
        let points = points
            .into_iter()
            .map(|p| {
                let p = p.into();
                check_dimensions(dimension, p.dimension()).map(|()| p)
            })
            .collect::<error::Result<Vec<_>>>()?;
        Ok(Self::from_region(
            dimension,
            Region::List(PointList::new(dimension, points)),
        ))
    }

    /// Points in `a` or `b`. Children are shared, not copied.
    pub fn union(a: &Self, b: &Self) -> error::Result<Self> {
        Self::combine(a, b, Region::Union)
    }

    /// Points in both `a` and `b`. Children are shared, not copied.
    pub fn intersection(a: &Self, b: &Self) -> error::Result<Self> {
        Self::combine(a, b, Region::Intersection)
    }

    /// Points in `a` but not in `b`. Children are shared, not copied.
    pub fn difference(a: &Self, b: &Self) -> error::Result<Self> {
        Self::combine(a, b, Region::Difference)
    }

    /// Build a combinator after checking both children agree on `n`.
    fn combine(a: &Self, b: &Self, make: fn(Self, Self) -> Region) -> error::Result<Self> {
        let dimension = a.num_dimensions();
        check_dimensions(dimension, b.num_dimensions())?;
        Ok(Self::from_region(dimension, make(a.clone(), b.clone())))
    }

    /// Dimensionality of every member.
    pub fn num_dimensions(&self) -> usize {
        self.node.read().dimension
    }

    /// Anchor coordinate. Combinators report their first child's origin.
    pub fn origin(&self) -> Point {
        let node = self.node.read();
        match &node.region {
            Region::Ball(ball) => ball.center.clone(),
            Region::Block(bounds, _) => bounds.min.clone(),
            Region::List(list) => list.origin.clone(),
            Region::Union(a, _) | Region::Intersection(a, _) | Region::Difference(a, _) => {
                a.origin()
            }
        }
    }

    /// Membership test.
    ///
    /// Fails with [`Error::DimensionMismatch`] when `point` has the wrong
    /// number of coordinates.
    pub fn includes(&self, point: &[i64]) -> error::Result<bool> {
        check_dimensions(self.num_dimensions(), point.len())?;
        Ok(self.contains(point))
    }

    /// Membership test for a point already known to have the right `n`.
    pub(crate) fn contains(&self, point: &[i64]) -> bool {
        let node = self.node.read();
        match &node.region {
            Region::Ball(ball) => ball.contains(point),
            Region::Block(bounds, _) => bounds.contains(point),
            Region::List(list) => list.contains(point),
            Region::Union(a, b) => a.contains(point) || b.contains(point),
            Region::Intersection(a, b) => a.contains(point) && b.contains(point),
            Region::Difference(a, b) => a.contains(point) && !b.contains(point),
        }
    }

    /// A fresh cursor over the members, independent of every other cursor.
    pub fn cursor(&self) -> PointSetCursor {
        let node = self.node.read();
        match &node.region {
            Region::Ball(ball) => PointSetCursor::ball(HyperSphereCursor::new(
                &ball.center,
                ball.radius,
                PositionAccess::at(ball.center.clone()),
            )),
            Region::Block(bounds, volume) => PointSetCursor::block(IntervalCursor::with_size(
                bounds.clone(),
                PositionAccess::at(bounds.min.clone()),
                *volume,
            )),
            Region::List(list) => {
                PointSetCursor::list(list.origin.clone(), Arc::clone(&list.offsets))
            }
            Region::Union(a, b) => PointSetCursor::union(a.cursor(), b.cursor(), a.clone()),
            Region::Intersection(a, b) => PointSetCursor::filter(a.cursor(), b.clone(), true),
            Region::Difference(a, b) => PointSetCursor::filter(a.cursor(), b.clone(), false),
        }
    }

    /// The members as a standard iterator of [`Point`]s.
    pub fn iter(&self) -> Items<PointSetCursor> {
        self.cursor().items()
    }

    /// Shift every member by `deltas`.
    ///
    /// Every node reachable from this handle moves exactly once, even when
    /// it is reachable along several paths, and every holder of a shared
    /// node sees the move.
    ///
    /// Fails with [`Error::InvalidArgument`], leaving every node where it
    /// was, when a moved coordinate would leave the `i64` range or a moved
    /// ball would no longer be constructible.
    pub fn translate(&self, deltas: &[i64]) -> error::Result<()> {
        check_dimensions(self.num_dimensions(), deltas.len())?;
        let mut nodes = Vec::new();
        self.collect_nodes(&mut nodes);
        for set in &nodes {
            set.node.read().region.check_shift(deltas)?;
        }
        for set in nodes {
            let mut node = set.node.write();
            node.region.shift(deltas);
            node.revision += 1;
            node.cached = None;
        }
        Ok(())
    }

    /// Append every distinct node of this subtree to `out`.
    fn collect_nodes(&self, out: &mut Vec<Self>) {
        if out.iter().any(|seen| seen.shares_node_with(self)) {
            return;
        }
        out.push(self.clone());
        let node = self.node.read();
        if let Some((a, b)) = node.region.children() {
            a.collect_nodes(out);
            b.collect_nodes(out);
        }
    }

    /// Sum of revisions over the subtree; changes whenever any node in it
    /// is translated, whichever holder did the translating.
    ///
    /// Nodes do not know their parents, so this walks the whole subtree on
    /// every call.
    fn stamp(&self) -> u64 {
        let node = self.node.read();
        let children = node
            .region
            .children()
            .map_or(0, |(a, b)| a.stamp().wrapping_add(b.stamp()));
        node.revision.wrapping_add(children)
    }

    /// Bounding box of the members, recomputed only after a translate
    /// somewhere in the subtree.
    ///
    /// Tight for primitives; for combinators it may be loose but always
    /// contains every member. An intersection of disjoint boxes yields an
    /// empty box.
    ///
    /// Validating the cache costs one visit per node of the subtree; the
    /// cache saves re-folding child boxes, not the walk.
    pub fn bounds(&self) -> Bounds {
        let stamp = self.stamp();
        {
            let node = self.node.read();
            if let Some(cached) = node.cached.as_ref().filter(|c| c.stamp == stamp) {
                return cached.bounds.clone();
            }
        }
        let bounds = self.compute_bounds();
        self.node.write().cached = Some(CachedBounds {
            stamp,
            bounds: bounds.clone(),
        });
        bounds
    }

    /// Compute the bounding box from scratch.
    fn compute_bounds(&self) -> Bounds {
        let node = self.node.read();
        match &node.region {
            Region::Ball(ball) => ball_bounds(&ball.center, ball.radius),
            Region::Block(bounds, _) => bounds.clone(),
            Region::List(list) => list.bounds(),
            Region::Union(a, b) => {
                let (a, b) = (a.bounds(), b.bounds());
                match (a.is_empty(), b.is_empty()) {
                    (true, _) => b,
                    (_, true) => a,
                    _ => a.hull(&b),
                }
            }
            Region::Intersection(a, b) => a.bounds().overlap(&b.bounds()),
            Region::Difference(a, _) => a.bounds(),
        }
    }

    /// Minimum corner of [`PointSet::bounds`].
    pub fn bound_min(&self) -> Point {
        self.bounds().min
    }

    /// Maximum corner of [`PointSet::bounds`].
    pub fn bound_max(&self) -> Point {
        self.bounds().max
    }

    /// Exact number of members.
    ///
    /// Balls, blocks and lists answer directly; combinators enumerate.
    pub fn size(&self) -> u64 {
        let direct = {
            let node = self.node.read();
            match &node.region {
                Region::Ball(ball) => Some(ball_size(node.dimension, ball.radius * ball.radius)),
                Region::Block(_, volume) => Some(*volume),
                Region::List(list) => Some(list.offsets.len() as u64),
                Region::Union(..) | Region::Intersection(..) | Region::Difference(..) => None,
            }
        };
        direct.unwrap_or_else(|| self.cursor().drain_count())
    }

    /// True when the set has no members.
    pub fn is_empty(&self) -> bool {
        !self.cursor().has_next()
    }

    /// Deep copy: the result shares no node with `self`, so translating one
    /// never moves the other. Aliasing inside the subtree is preserved.
    pub fn copy(&self) -> Self {
        let mut copies = Vec::new();
        self.copy_with(&mut copies)
    }

    /// Deep copy, reusing copies of nodes already seen in this subtree.
    fn copy_with(&self, copies: &mut Vec<(Self, Self)>) -> Self {
        if let Some((_, copy)) = copies.iter().find(|(orig, _)| orig.shares_node_with(self)) {
            return copy.clone();
        }
        let node = self.node.read();
        let region = match &node.region {
            Region::Ball(ball) => Region::Ball(ball.clone()),
            Region::Block(bounds, volume) => Region::Block(bounds.clone(), *volume),
            Region::List(list) => Region::List(list.clone()),
            Region::Union(a, b) => Region::Union(a.copy_with(copies), b.copy_with(copies)),
            Region::Intersection(a, b) => {
                Region::Intersection(a.copy_with(copies), b.copy_with(copies))
            }
            Region::Difference(a, b) => {
                Region::Difference(a.copy_with(copies), b.copy_with(copies))
            }
        };
        let copy = Self::from_region(node.dimension, region);
        copies.push((self.clone(), copy.clone()));
        copy
    }

    /// True when both handles refer to the same shared node.
    pub fn shares_node_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl fmt::Debug for PointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.read();
        f.debug_struct("PointSet")
            .field("dimension", &node.dimension)
            .field("region", &node.region)
            .finish()
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = Point;
    type IntoIter = Items<PointSetCursor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, thread};

    use super::*;
    use crate::cursor::Localizable;

    /// Collect a set's enumeration, asserting nothing repeats.
    fn members(set: &PointSet) -> HashSet<Point> {
        let visited: Vec<Point> = set.iter().collect();
        let unique: HashSet<Point> = visited.iter().cloned().collect();
        assert_eq!(unique.len(), visited.len(), "duplicate in enumeration");
        unique
    }

    #[test]
    fn ball_membership_matches_enumeration() -> error::Result<()> {
        let ball = PointSet::ball([1, -1], 2)?;
        let seen = members(&ball);
        assert_eq!(seen.len(), 13);
        assert_eq!(ball.size(), 13);
        for x in -3..=4 {
            for y in -4..=3 {
                assert_eq!(ball.includes(&[x, y])?, seen.contains(&Point::from([x, y])));
            }
        }
        Ok(())
    }

    #[test]
    fn union_visits_a_then_new_points_of_b() -> error::Result<()> {
        let a = PointSet::list(1, [[3], [1]])?;
        let b = PointSet::list(1, [[1], [2], [3], [4]])?;
        let u = PointSet::union(&a, &b)?;
        let order: Vec<Point> = u.iter().collect();
        assert_eq!(
            order,
            vec![
                Point::from([3]),
                Point::from([1]),
                Point::from([2]),
                Point::from([4])
            ]
        );
        assert_eq!(u.size(), 4);
        assert_eq!(u.origin(), a.origin());
        Ok(())
    }

    #[test]
    fn intersection_and_difference() -> error::Result<()> {
        let a = PointSet::block([0, 0], [3, 3])?;
        let b = PointSet::block([2, 2], [5, 5])?;
        let i = PointSet::intersection(&a, &b)?;
        let d = PointSet::difference(&a, &b)?;
        assert_eq!(i.size(), 4);
        assert_eq!(d.size(), 12);
        assert_eq!(i.bounds(), Bounds::new([2, 2], [3, 3])?);
        assert_eq!(d.bounds(), a.bounds());
        assert!(i.includes(&[3, 2])?);
        assert!(!d.includes(&[3, 2])?);
        assert!(d.includes(&[0, 3])?);
        Ok(())
    }

    #[test]
    fn disjoint_intersection_is_empty() -> error::Result<()> {
        let a = PointSet::ball([0, 0], 1)?;
        let b = PointSet::ball([10, 0], 1)?;
        let i = PointSet::intersection(&a, &b)?;
        assert!(i.is_empty());
        assert_eq!(i.size(), 0);
        assert!(i.bounds().is_empty());
        let mut cursor = i.cursor();
        assert_eq!(cursor.fwd(), Err(Error::ExhaustedIteration));
        Ok(())
    }

    #[test]
    fn dimension_mismatch_fails_at_construction() -> error::Result<()> {
        let a = PointSet::ball([0, 0], 1)?;
        let b = PointSet::ball([0, 0, 0], 1)?;
        for result in [
            PointSet::union(&a, &b),
            PointSet::intersection(&a, &b),
            PointSet::difference(&b, &a),
        ] {
            assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
        }
        assert!(matches!(
            a.includes(&[0, 0, 0]),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
        assert!(a.translate(&[1]).is_err());
        assert!(PointSet::list(2, [vec![1, 2], vec![3]]).is_err());
        Ok(())
    }

    #[test]
    fn invalid_primitives() {
        assert!(matches!(
            PointSet::ball([0, 0], -2),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            PointSet::block([0, 5], [3, 4]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            PointSet::list::<Point>(0, []),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn oversized_block_is_rejected() {
        assert!(matches!(
            PointSet::block([i64::MIN], [i64::MAX]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            PointSet::block([0, 0, 0], [i64::MAX, i64::MAX, 1]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn huge_block_counts_without_enumerating() -> error::Result<()> {
        let line = PointSet::block([i64::MIN], [i64::MAX - 1])?;
        assert_eq!(line.size(), u64::MAX);
        assert!(line.includes(&[0])?);
        let mut cursor = line.cursor();
        cursor.jump_fwd(u64::MAX)?;
        assert_eq!(cursor.get(), Point::from([i64::MAX - 1]));
        assert!(!cursor.has_next());
        Ok(())
    }

    #[test]
    fn translate_out_of_range_leaves_set_unchanged() -> error::Result<()> {
        let ball = PointSet::ball([0], 2)?;
        assert!(matches!(
            ball.translate(&[i64::MIN + 1]),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(ball.origin(), Point::from([0]));
        assert_eq!(ball.cursor().drain_count(), 5);

        // A failure in one child must not move the other.
        let block = PointSet::block([0, 0], [3, 3])?;
        let edge = PointSet::ball([i64::MAX - 5, 0], 2)?;
        let u = PointSet::union(&block, &edge)?;
        let before = u.bounds();
        assert!(u.translate(&[4, 0]).is_err());
        assert_eq!(block.origin(), Point::from([0, 0]));
        assert_eq!(u.bounds(), before);
        u.translate(&[3, 0])?;
        assert_eq!(block.origin(), Point::from([3, 0]));

        let list = PointSet::list(1, [[i64::MAX - 1], [0]])?;
        assert!(list.translate(&[2]).is_err());
        assert!(list.includes(&[i64::MAX - 1])?);
        Ok(())
    }

    #[test]
    fn far_points_are_not_members() -> error::Result<()> {
        let list = PointSet::list(1, [[0]])?;
        list.translate(&[1])?;
        assert!(!list.includes(&[i64::MIN])?);
        assert!(list.includes(&[1])?);

        let ball = PointSet::ball([i64::MAX - 3, 0], 2)?;
        assert!(!ball.includes(&[i64::MIN, i64::MIN])?);
        Ok(())
    }

    #[test]
    fn translate_propagates_through_shared_children() -> error::Result<()> {
        let a = PointSet::ball([0, 0], 1)?;
        let b = PointSet::ball([4, 0], 1)?;
        let u = PointSet::union(&a, &b)?;
        assert_eq!(u.bounds(), Bounds::new([-1, -1], [5, 1])?);

        // Moving a child through its own handle invalidates the parent.
        a.translate(&[0, 10])?;
        assert_eq!(u.bounds(), Bounds::new([-1, -1], [5, 11])?);
        assert!(u.includes(&[0, 10])?);

        u.translate(&[1, 1])?;
        assert_eq!(a.origin(), Point::from([1, 11]));
        assert_eq!(b.origin(), Point::from([5, 1]));
        assert_eq!(u.bound_min(), Point::from([0, 0]));
        assert_eq!(u.bound_max(), Point::from([6, 12]));
        Ok(())
    }

    #[test]
    fn aliased_child_moves_once() -> error::Result<()> {
        let a = PointSet::block([0], [2])?;
        let u = PointSet::union(&a, &a)?;
        assert_eq!(u.size(), 3);
        u.translate(&[5])?;
        assert_eq!(a.bounds(), Bounds::new([5], [7])?);
        assert_eq!(u.iter().collect::<Vec<_>>().len(), 3);
        Ok(())
    }

    #[test]
    fn copy_is_independent() -> error::Result<()> {
        let a = PointSet::ball([0, 0], 2)?;
        let b = PointSet::block([1, 1], [3, 3])?;
        let d = PointSet::difference(&a, &b)?;
        let copy = d.copy();
        assert!(!copy.shares_node_with(&d));
        copy.translate(&[100, 0])?;
        assert!(d.includes(&[0, 0])?);
        assert!(!copy.includes(&[0, 0])?);
        assert!(copy.includes(&[100, 0])?);
        assert_eq!(a.origin(), Point::from([0, 0]));
        assert_eq!(copy.size(), d.size());

        let shared = PointSet::union(&a, &a)?.copy();
        shared.translate(&[1, 0])?;
        assert_eq!(shared.size(), 13);
        assert!(shared.includes(&[-1, 0])?);
        assert!(!shared.includes(&[4, 0])?);
        Ok(())
    }

    #[test]
    fn list_bounds_follow_translation() -> error::Result<()> {
        let l = PointSet::list(2, [[0, 5], [-3, 1], [0, 5]])?;
        assert_eq!(l.size(), 2);
        assert_eq!(l.bounds(), Bounds::new([-3, 1], [0, 5])?);
        l.translate(&[1, -1])?;
        assert_eq!(l.bounds(), Bounds::new([-2, 0], [1, 4])?);
        assert!(l.includes(&[-2, 0])?);
        assert!(!l.includes(&[-3, 1])?);
        Ok(())
    }

    #[test]
    fn cursors_run_on_separate_threads() -> error::Result<()> {
        let set = PointSet::union(
            &PointSet::ball([0, 0, 0], 3)?,
            &PointSet::block([2, 2, 2], [5, 5, 5])?,
        )?;
        let expected = set.size();
        let counts: Vec<u64> = thread::scope(|scope| {
            let workers: Vec<_> = (0..4)
                .map(|_| {
                    let set = set.clone();
                    scope.spawn(move || set.cursor().drain_count())
                })
                .collect();
            workers
                .into_iter()
                .map(|w| w.join().expect("worker panicked"))
                .collect()
        });
        assert!(counts.iter().all(|&c| c == expected));
        Ok(())
    }

    #[test]
    fn cursor_protocol() -> error::Result<()> {
        let b = PointSet::ball([0, 0], 1)?;
        let u = PointSet::union(&b, &PointSet::block([1, 1], [2, 1])?)?;
        let mut cursor = u.cursor();
        assert!(cursor.has_next());
        assert!(cursor.has_next());
        let first = cursor.next()?;
        assert_eq!(first, Point::from([0, -1]));
        assert_eq!(cursor.get(), first);
        let mut out = [0; 2];
        cursor.localize(&mut out);
        assert_eq!(out, [0, -1]);
        assert_eq!(cursor.drain_count(), 6);
        assert_eq!(cursor.fwd(), Err(Error::ExhaustedIteration));
        cursor.reset();
        assert_eq!(cursor.next()?, first);
        Ok(())
    }
}
