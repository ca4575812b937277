//! Lattice geometry
//!
//! The one geometric primitive everything else is built on: enumerate the
//! lattice cells inside a closed disk, clipped to the grid. Coverage checks,
//! overlap counts and the optimization model all call [`points_within_radius`],
//! so they agree on boundary cells by construction.

use crate::{Point, Radius};

/// Every in-grid lattice point `p` with `|p - center|² <= radius²`.
///
/// Only the bounding box `[c - floor(r), c + floor(r)]²` clipped to
/// `[0, side-1]²` is scanned, so the cost is `O(r²)` regardless of grid size.
///
/// Points come back in row-major order: ascending `y`, then ascending `x`
/// within a row. An in-grid center is always part of the result.
pub fn points_within_radius(center: Point, radius: Radius, side: u32) -> Vec<Point> {
    if side == 0 {
        return Vec::new();
    }
    let max = (i64::from(side) - 1).min(i64::from(i32::MAX));
    let reach = radius.reach();
    let (cx, cy) = (i64::from(center.x), i64::from(center.y));

    let x_lo = (cx - reach).max(0);
    let x_hi = (cx + reach).min(max);
    let y_lo = (cy - reach).max(0);
    let y_hi = (cy + reach).min(max);
    if x_lo > x_hi || y_lo > y_hi {
        return Vec::new();
    }

    let width = (x_hi - x_lo + 1) as usize;
    let mut points = Vec::with_capacity(width * (y_hi - y_lo + 1) as usize);
    for y in y_lo..=y_hi {
        let dy = y - cy;
        for x in x_lo..=x_hi {
            let dx = x - cx;
            if radius.contains_squared(dx * dx + dy * dy) {
                points.push(Point::new(x as i32, y as i32));
            }
        }
    }
    points
}
