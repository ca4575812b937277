//! # ppp-core: Grid Placement Core
//!
//! Data model and scoring oracle for the tower placement problem: a set of
//! cities on a `D x D` integer lattice must each have a tower within the
//! coverage radius, and towers that sit within the penalty radius of each
//! other make each other more expensive.
//!
//! ## Quick Start
//!
//! ```rust
//! use ppp_core::*;
//! use std::sync::Arc;
//!
//! let instance = Arc::new(Instance::new(
//!     10,
//!     vec![Point::new(5, 5)],
//!     Radius::from_steps(2),
//!     Radius::from_steps(1),
//! )?);
//!
//! let mut placement = Placement::new(Arc::clone(&instance));
//! let tower = placement.add_tower(Point::new(5, 5))?;
//! assert!(placement.is_valid());
//! assert_eq!(placement.penalty(), 170.0);
//!
//! placement.move_tower(tower, 0, 1)?;
//! assert!(placement.is_valid());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`lattice`] - lattice points inside a closed disk, clipped to the grid
//! - [`instance`] - immutable problem instances
//! - [`placement`] - towers, coverage validity and overlap penalty
//! - [`penalty`] - the ground-truth per-tower cost function
//! - [`error`] - construction and edit errors
//!
//! Everything in this crate is synchronous and free of shared mutable state.
//! Placements share their instance through an `Arc`, so independent
//! placements can be scored on different threads.

pub mod error;
pub mod instance;
pub mod lattice;
pub mod penalty;
pub mod placement;
pub mod point;
pub mod radius;

pub use error::{CoreError, CoreResult, PlacementError};
pub use instance::Instance;
pub use lattice::points_within_radius;
pub use penalty::{tower_penalty, tower_penalty_at, PENALTY_RATE, PENALTY_SCALE};
pub use placement::{Placement, TowerId};
pub use point::Point;
pub use radius::Radius;
