//! Tower placement as a Mixed-Integer Linear Program
//!
//! ## Problem Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  TOWER PLACEMENT                                                    │
//! │  ───────────────                                                    │
//! │                                                                     │
//! │  Given:                                                             │
//! │    • A D x D lattice and a set of city cells                        │
//! │    • Coverage radius R_s, penalty radius R_p                        │
//! │    • A linearizable stand-in g(w) for the cost 170·e^(0.17·w)       │
//! │                                                                     │
//! │  Decide:                                                            │
//! │    • Which cells get a tower (binary, one per cell)                 │
//! │                                                                     │
//! │  Minimize:                                                          │
//! │    Σ over towers of g(number of other towers within R_p)            │
//! │                                                                     │
//! │  Subject to:                                                        │
//! │    • Every city has a tower within R_s                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## MILP Formulation
//!
//! With `t_c ∈ {0,1}` per cell, `N(c)` the other cells within `R_p` of `c`,
//! `w_c = Σ_{n ∈ N(c)} t_n` and `g` given as cuts `a_j + b_j·w`:
//!
//! ```text
//! minimize    Σ_c q_c
//!
//! subject to:
//!   Σ_{c ∈ S(k)} t_c ≥ 1                          Coverage of city k
//!   q_c ≥ L · t_c                                  Penalty floor
//!   q_c ≥ a_j + b_j·w_c − M_cj·(1 − t_c)           Penalty cut j (Big-M)
//!   t_c ∈ {0,1}
//! ```
//!
//! `q_c` carries the product `t_c · g(w_c)`, which is not linear. Each cut is
//! enforced only where a tower stands: with `t_c = 1` the cut holds as
//! written, with `t_c = 0` it is relaxed by
//! `M_cj = max(0, a_j, a_j + b_j·|N(c)|)`, the largest value the cut can take
//! on the cell's attainable overlap range, and `q_c` falls to zero or to the
//! floor `L = min(0, min_w g(w))`.
//!
//! Because `g` must be convex on `0..=max |N(c)|`, the maximum over its cuts
//! equals `g` at every integer overlap, so minimizing `Σ q_c` minimizes the
//! approximate total cost exactly.

mod problem;
mod solution;
mod solver;

pub use problem::{build_model, ModelStats, PlacementModel};
pub use solution::{decode, solve_placement, PlacementSolution, BINARY_TOLERANCE};
pub use solver::{CellAssignment, MipError, SolverBackend, SolverConfig};
