//! The closed set of region variants a [`PointSet`] node can hold.

use std::{collections::HashSet, iter, sync::Arc};

use super::PointSet;
use crate::{bounds::Bounds, error, hypersphere::checked_ball, point::Point};

/// Lattice ball `Σ (p_i - c_i)² ≤ radius²`.
#[derive(Clone, Debug)]
pub struct Ball {
    /// Center of the ball.
    pub center: Point,
    /// Radius in lattice units, validated non-negative.
    pub radius: i64,
}

impl Ball {
    /// Membership by squared distance.
    pub fn contains(&self, point: &[i64]) -> bool {
        self.center.distance_squared(point) <= (self.radius as i128) * (self.radius as i128)
    }
}

/// Explicit list of members stored relative to a movable origin.
#[derive(Clone, Debug)]
pub struct PointList {
    /// Anchor added to every offset.
    pub origin: Point,
    /// Offsets in insertion order, without duplicates.
    pub offsets: Arc<Vec<Point>>,
    /// The same offsets, for membership tests.
    pub index: Arc<HashSet<Point>>,
}

impl PointList {
    /// Build from absolute coordinates, keeping first occurrences only.
    pub fn new(dimension: usize, points: Vec<Point>) -> Self {
        let mut index = HashSet::with_capacity(points.len());
        let mut offsets = Vec::with_capacity(points.len());
        for p in points {
            if index.insert(p.clone()) {
                offsets.push(p);
            }
        }
        Self {
            origin: Point::origin(dimension),
            offsets: Arc::new(offsets),
            index: Arc::new(index),
        }
    }

    /// Membership relative to the current origin. A point whose offset from
    /// the origin leaves the `i64` range cannot be a member.
    pub fn contains(&self, point: &[i64]) -> bool {
        let relative: Option<Point> = self
            .origin
            .iter()
            .zip(point)
            .map(|(o, p)| p.checked_sub(*o))
            .collect();
        relative.is_some_and(|r| self.index.contains(&r))
    }

    /// Bounding box of the members; empty when there are none.
    pub fn bounds(&self) -> Bounds {
        let n = self.origin.dimension();
        let empty = Bounds {
            min: Point(iter::repeat_n(i64::MAX, n).collect()),
            max: Point(iter::repeat_n(i64::MIN, n).collect()),
        };
        self.offsets.iter().fold(empty, |acc, offset| {
            let mut p = offset.clone();
            p.shift(&self.origin);
            if acc.is_empty() {
                Bounds::of_point(&p)
            } else {
                acc.hull(&Bounds::of_point(&p))
            }
        })
    }
}

/// A primitive shape or a set-algebra combinator over two shared children.
#[derive(Debug)]
pub enum Region {
    /// Hyperball primitive.
    Ball(Ball),
    /// Axis-aligned hyper-volume primitive and its point count.
    Block(Bounds, u64),
    /// Explicit point list primitive.
    List(PointList),
    /// Members of either child.
    Union(PointSet, PointSet),
    /// Members of both children.
    Intersection(PointSet, PointSet),
    /// Members of the first child absent from the second.
    Difference(PointSet, PointSet),
}

impl Region {
    /// The two children of a combinator, or `None` for a primitive.
    pub fn children(&self) -> Option<(&PointSet, &PointSet)> {
        match self {
            Self::Union(a, b) | Self::Intersection(a, b) | Self::Difference(a, b) => Some((a, b)),
            Self::Ball(_) | Self::Block(..) | Self::List(_) => None,
        }
    }

    /// Fail unless [`Region::shift`] by `delta` keeps every coordinate the
    /// region stores or produces inside the `i64` range. A shifted ball must
    /// also still pass the construction checks.
    pub fn check_shift(&self, delta: &[i64]) -> error::Result<()> {
        match self {
            Self::Ball(ball) => {
                let center = ball.center.offset_by(delta)?;
                checked_ball(&center, ball.radius).map(|_| ())
            }
            Self::Block(bounds, _) => bounds.translated(delta).map(|_| ()),
            Self::List(list) => {
                let origin = list.origin.offset_by(delta)?;
                list.offsets
                    .iter()
                    .try_for_each(|offset| origin.offset_by(offset).map(|_| ()))
            }
            Self::Union(..) | Self::Intersection(..) | Self::Difference(..) => Ok(()),
        }
    }

    /// Move a primitive's anchor by `delta`, which [`Region::check_shift`]
    /// has accepted; combinators are untouched since their children are
    /// shifted as nodes of their own.
    pub fn shift(&mut self, delta: &[i64]) {
        match self {
            Self::Ball(ball) => ball.center.shift(delta),
            Self::Block(bounds, _) => {
                bounds.min.shift(delta);
                bounds.max.shift(delta);
            }
            Self::List(list) => list.origin.shift(delta),
            Self::Union(..) | Self::Intersection(..) | Self::Difference(..) => {}
        }
    }
}
