//! Hyperball neighborhoods traversed by recursive radius decomposition.
//!
//! The outermost dimension `n - 1` is scanned in `2R + 1` slabs. Each slab at
//! offset `Δ` cuts an `(n - 1)`-ball with squared radius `R² - Δ²`, which is
//! decomposed the same way, down to dimension 0 where the remaining ball is a
//! plain scanline walked with single `fwd_dim(0)` steps. The cursor carries,
//! per dimension, the scanline half-width, the steps left on it, and the
//! squared-radius budget left for that dimension and everything below it.
//! Scanline half-widths are integer square roots of exact budgets, so the
//! enumeration is the exact lattice ball `Σ (p_i - c_i)² ≤ R²` in any
//! dimensionality and no point is ever tested for membership.

use smallvec::{SmallVec, smallvec};

use crate::{
    bounds::Bounds,
    cursor::{Cursor, Localizable},
    error::{self, Error, check_dimensions},
    grid::RandomAccess,
    point::Point,
};

/// Validate a center/radius pair, returning the squared radius.
pub(crate) fn checked_ball(center: &[i64], radius: i64) -> error::Result<i64> {
    if center.is_empty() {
        return Err(Error::InvalidArgument(
            "a ball needs at least one dimension".into(),
        ));
    }
    if radius < 0 {
        return Err(Error::InvalidArgument(format!(
            "radius must be non-negative, got {radius}"
        )));
    }
    let in_range = center.iter().all(|c| {
        c.checked_sub(radius)
            .and_then(|lo| lo.checked_sub(1))
            .is_some()
            && c.checked_add(radius).is_some()
    });
    match radius.checked_mul(radius) {
        Some(squared) if in_range => Ok(squared),
        _ => Err(Error::InvalidArgument(format!(
            "radius {radius} overflows the coordinate range"
        ))),
    }
}

/// Number of lattice points `p` in `dims` dimensions with `Σ p_i² ≤ budget`.
///
/// Mirrors the cursor's slab decomposition, so it agrees with enumeration.
pub(crate) fn ball_size(dims: usize, budget: i64) -> u64 {
    let half_width = budget.isqrt();
    if dims <= 1 {
        return 2 * half_width as u64 + 1;
    }
    let center_slab = ball_size(dims - 1, budget);
    (1..=half_width).fold(center_slab, |acc, offset| {
        acc + 2 * ball_size(dims - 1, budget - offset * offset)
    })
}

/// Axis-aligned box `center ± radius`.
pub(crate) fn ball_bounds(center: &[i64], radius: i64) -> Bounds {
    Bounds {
        min: Point(center.iter().map(|c| c - radius).collect()),
        max: Point(center.iter().map(|c| c + radius).collect()),
    }
}

/// A ball of integer radius around a center, read through a grid accessor.
#[derive(Clone, Debug)]
pub struct HyperSphere<A> {
    /// Center of the ball.
    center: Point,
    /// Radius in lattice units.
    radius: i64,
    /// Prototype accessor; each cursor receives its own copy.
    source: A,
}

impl<A: RandomAccess> HyperSphere<A> {
    /// Ball of `radius` around `center`, reading values through `source`.
    pub fn new(center: impl Into<Point>, radius: i64, source: A) -> error::Result<Self> {
        let center = center.into();
        checked_ball(&center, radius)?;
        check_dimensions(center.dimension(), source.num_dimensions())?;
        Ok(Self {
            center,
            radius,
            source,
        })
    }

    /// Center of the neighborhood.
    pub fn center(&self) -> &Point {
        &self.center
    }

    /// Radius of the neighborhood.
    pub fn radius(&self) -> i64 {
        self.radius
    }

    /// Re-anchor the neighborhood at `center`.
    pub fn set_center(&mut self, center: impl Into<Point>) -> error::Result<()> {
        let center = center.into();
        check_dimensions(self.center.dimension(), center.dimension())?;
        checked_ball(&center, self.radius)?;
        self.center = center;
        Ok(())
    }

    /// Fresh cursor with an independently positioned accessor.
    pub fn cursor(&self) -> HyperSphereCursor<A> {
        HyperSphereCursor::new(&self.center, self.radius, self.source.copy_access())
    }

    /// Value at the first position the cursor visits.
    pub fn first_element(&self) -> error::Result<A::Value> {
        self.cursor().next()
    }

    /// Exact number of lattice points in the ball.
    pub fn size(&self) -> u64 {
        ball_size(self.center.dimension(), self.radius * self.radius)
    }

    /// Axis-aligned bounding box, `center ± radius` on every axis.
    pub fn bounds(&self) -> Bounds {
        ball_bounds(&self.center, self.radius)
    }

    /// Extent of the bounding box along any axis.
    pub fn dimension(&self, _d: usize) -> u64 {
        2 * self.radius as u64 + 1
    }
}

/// Creates [`HyperSphere`] neighborhoods of a fixed radius at arbitrary
/// positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HyperSphereFactory {
    /// Radius of every neighborhood produced.
    radius: i64,
}

impl HyperSphereFactory {
    /// Factory for balls of `radius`.
    pub fn new(radius: i64) -> error::Result<Self> {
        if radius < 0 {
            return Err(Error::InvalidArgument(format!(
                "radius must be non-negative, got {radius}"
            )));
        }
        Ok(Self { radius })
    }

    /// Neighborhood centered at `position` over `source`.
    pub fn create<A: RandomAccess>(
        &self,
        position: impl Into<Point>,
        source: A,
    ) -> error::Result<HyperSphere<A>> {
        HyperSphere::new(position, self.radius, source)
    }
}

/// Cursor over the lattice points of a ball.
#[derive(Clone, Debug)]
pub struct HyperSphereCursor<A> {
    /// Accessor tracking the current position.
    source: A,
    /// Center of the ball.
    center: Point,
    /// Radius of the ball.
    radius: i64,
    /// Current scanline half-width per dimension.
    extent: SmallVec<[i64; 8]>,
    /// Remaining steps on the current scanline per dimension.
    steps: SmallVec<[i64; 8]>,
    /// Squared-radius budget for dimensions `0..=d`.
    budget: SmallVec<[i64; 8]>,
}

impl<A: RandomAccess> HyperSphereCursor<A> {
    /// Cursor over the ball; `center` and `radius` are assumed validated.
    pub(crate) fn new(center: &Point, radius: i64, source: A) -> Self {
        let n = center.dimension();
        let mut cursor = Self {
            source,
            center: center.clone(),
            radius,
            extent: smallvec![0; n],
            steps: smallvec![0; n],
            budget: smallvec![0; n],
        };
        cursor.reset();
        cursor
    }

    /// Start every dimension below `d` on the first point of its scanline,
    /// given the current offset along dimension `d`.
    fn open_scanlines_below(&mut self, d: usize) {
        for e in (0..d).rev() {
            let offset = self.extent[e + 1] - self.steps[e + 1];
            let budget = self.budget[e + 1] - offset * offset;
            let half_width = budget.isqrt();
            self.budget[e] = budget;
            self.extent[e] = half_width;
            self.steps[e] = 2 * half_width;
            self.source
                .set_position_dim(self.center[e] - half_width, e);
        }
    }
}

impl<A: RandomAccess> Localizable for HyperSphereCursor<A> {
    fn num_dimensions(&self) -> usize {
        self.center.dimension()
    }

    fn position(&self, d: usize) -> i64 {
        self.source.position(d)
    }

    fn localize(&self, out: &mut [i64]) {
        self.source.localize(out);
    }
}

impl<A: RandomAccess> Cursor for HyperSphereCursor<A> {
    type Item = A::Value;

    fn has_next(&mut self) -> bool {
        self.steps.iter().any(|&s| s > 0)
    }

    fn fwd(&mut self) -> error::Result<()> {
        let Some(d) = self.steps.iter().position(|&s| s > 0) else {
            return Err(Error::ExhaustedIteration);
        };
        self.steps[d] -= 1;
        self.source.fwd_dim(d);
        self.open_scanlines_below(d);
        Ok(())
    }

    fn get(&self) -> A::Value {
        self.source.get()
    }

    fn reset(&mut self) {
        let max_dim = self.center.dimension() - 1;
        for d in 0..max_dim {
            self.extent[d] = 0;
            self.steps[d] = 0;
            self.budget[d] = 0;
            self.source.set_position_dim(self.center[d], d);
        }
        self.source
            .set_position_dim(self.center[max_dim] - self.radius - 1, max_dim);
        self.extent[max_dim] = self.radius;
        self.steps[max_dim] = 2 * self.radius + 1;
        self.budget[max_dim] = self.radius * self.radius;
    }
}
