//! # ppp-algo: Placement Optimization
//!
//! Exact optimization of tower placements through a Mixed-Integer Linear
//! Program. The exponential overlap penalty is replaced by a
//! [`PenaltyApproximation`], the approximation is turned into linear cuts,
//! and the resulting MILP is handed to a `good_lp` backend.
//!
//! | Approximation | Cuts | Objective equals true penalty |
//! |---------------|------|-------------------------------|
//! | [`TaylorExpansion`] order 1 | 1 | only if every tower has `w0` neighbours |
//! | [`TaylorExpansion`] order 2 | one per integer overlap | same |
//! | [`ExactSecants`] | one per integer overlap | always |
//!
//! ## Example
//!
//! ```no_run
//! use ppp_algo::{solve_placement, ExpansionOrder, SolverConfig, TaylorExpansion};
//! use ppp_core::{Instance, Point, Radius};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let instance = Arc::new(Instance::new(
//!     10,
//!     vec![Point::new(2, 2), Point::new(7, 7)],
//!     Radius::from_steps(2),
//!     Radius::from_steps(3),
//! )?);
//!
//! let approximation = TaylorExpansion::new(ExpansionOrder::Quadratic, 2);
//! let config = SolverConfig {
//!     time_limit: Duration::from_secs(30),
//!     ..SolverConfig::default()
//! };
//! let solution = solve_placement(instance, &approximation, &config)?;
//! assert!(solution.placement.is_valid());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Solver backends are selected with cargo features:
//!
//! - default: `microlp`, pure Rust
//! - `solver-highs`: HiGHS, much faster on larger grids

pub mod linearize;
pub mod model;

pub use linearize::{
    expand, secant_cuts, ExactSecants, ExpansionOrder, LinearCut, PenaltyApproximation,
    TaylorExpansion, DEFAULT_REFERENCE_OVERLAP,
};
pub use model::{
    build_model, decode, solve_placement, CellAssignment, MipError, ModelStats, PlacementModel,
    PlacementSolution, SolverBackend, SolverConfig, BINARY_TOLERANCE,
};
