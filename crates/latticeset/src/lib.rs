//! Regions of the N‑dimensional integer lattice and the cursors that walk
//! them.
//!
//! Masks, neighborhoods and structuring elements are all [`PointSet`]s;
//! algorithms consume them through the uniform [`Cursor`] protocol and use
//! the produced coordinates to address an external grid through the
//! [`grid::RandomAccess`] capability.
//!
//! # Regions
//!
//! - Hyperball (exact lattice ball, enumerated without membership tests)
//! - Block (axis-aligned hyper-volume)
//! - Explicit point list
//! - Union, intersection and difference of any two regions
//!
//! # Example
//!
//! ```
//! use latticeset::{PointSet, error};
//!
//! fn main() -> error::Result<()> {
//!     let left = PointSet::ball([0, 0], 2)?;
//!     let right = PointSet::ball([3, 0], 2)?;
//!     let both = PointSet::union(&left, &right)?;
//!     assert!(both.includes(&[5, 0])?);
//!     assert_eq!(both.size(), 24);
//!     Ok(())
//! }
//! ```

/// Axis-aligned bounding boxes.
pub mod bounds;
/// The cursor protocol.
pub mod cursor;
/// Error types used across the crate.
pub mod error;
/// The random-access grid capability and in-memory grids.
pub mod grid;
/// Hyperball neighborhoods and their cursor.
pub mod hypersphere;
/// Raster-order cursors over boxes.
pub mod interval;
/// N‑dimensional integer coordinates.
pub mod point;
/// Point sets and set algebra.
pub mod pointset;

pub use crate::{
    bounds::Bounds,
    cursor::{Cursor, Localizable},
    hypersphere::{HyperSphere, HyperSphereFactory},
    point::Point,
    pointset::{PointSet, PointSetCursor},
};
