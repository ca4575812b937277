//! Error types for the placement core
//!
//! Two families live here:
//!
//! - [`CoreError`] is raised while constructing an [`Instance`](crate::Instance)
//!   or a [`Radius`](crate::Radius). Instances are immutable, so these are the
//!   only failures an instance can ever produce.
//! - [`PlacementError`] is returned by the [`Placement`](crate::Placement)
//!   mutators. A failed edit never changes the placement, so callers can simply
//!   reject the move and carry on.

use crate::{Point, TowerId};
use thiserror::Error;

/// Errors raised while building instance data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Grid side length of zero
    #[error("Grid side length must be positive")]
    EmptyGrid,

    /// Side length past the `i32` coordinate range
    #[error("Grid side length {0} exceeds the coordinate range")]
    GridTooLarge(u32),

    /// A city coordinate outside `[0, D-1] x [0, D-1]`
    #[error("City {city} lies outside the {side}x{side} grid")]
    CityOutOfBounds { city: Point, side: u32 },

    /// The same city listed twice
    #[error("Duplicate city at {0}")]
    DuplicateCity(Point),

    /// Negative, NaN or infinite radius
    #[error("Invalid radius {0}: must be finite and non-negative")]
    InvalidRadius(f64),
}

/// Convenience type alias for instance construction results.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors returned by placement mutators.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// Target cell is off the grid
    #[error("({x}, {y}) lies outside the {side}x{side} grid")]
    OutOfBounds { x: i64, y: i64, side: u32 },

    /// Target cell already holds a tower
    #[error("Cell {point} is already occupied by tower {occupant}")]
    Occupied { point: Point, occupant: TowerId },

    /// Identifier not present in the placement
    #[error("No tower with id {0}")]
    UnknownTower(TowerId),
}
