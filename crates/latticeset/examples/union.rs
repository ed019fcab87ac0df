//! Two overlapping discs: build their union, count it, and walk it.

use std::error::Error;

use latticeset::{Cursor, Localizable, PointSet};

fn main() -> Result<(), Box<dyn Error>> {
    // snips-start: example
    let left = PointSet::ball([0, 0], 2)?;
    let right = PointSet::ball([3, 0], 2)?;
    let union = PointSet::union(&left, &right)?;
    println!(
        "{} + {} points, {} in the union",
        left.size(),
        right.size(),
        union.size()
    );

    let mut cursor = union.cursor();
    let mut position = [0i64; 2];
    while cursor.has_next() {
        cursor.fwd()?;
        cursor.localize(&mut position);
        println!("{position:?}");
    }

    // Moving a child moves every set built on it.
    left.translate(&[-10, 0])?;
    println!("after separating: {} points", union.size());
    assert_eq!(union.size(), 26);
    // snips-end: example

    Ok(())
}
