//! MIP backends and the solve loop

use super::PlacementModel;
use good_lp::solvers::microlp::microlp;
use good_lp::{ResolutionError, Solution, SolverModel, Variable};
use ppp_core::{PlacementError, Point};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from building, solving or decoding a placement model.
#[derive(Error, Debug, Clone)]
pub enum MipError {
    /// The approximation's cuts are not convex
    #[error("approximation {name} is not convex over the overlap range")]
    NonConvexApproximation { name: String },

    /// No answer before the configured deadline
    #[error("solver did not finish within {0:?}")]
    TimeLimit(Duration),

    #[error("placement model is infeasible")]
    Infeasible,

    #[error("placement model is unbounded")]
    Unbounded,

    /// A placement variable came back neither 0 nor 1
    #[error("non-binary value {value} for the tower at {cell}")]
    Fractional { cell: Point, value: f64 },

    /// Assignment and instance disagree on the grid size
    #[error("assignment has {found} cells, instance has {expected}")]
    ShapeMismatch { expected: usize, found: usize },

    /// The decoded placement leaves cities without coverage
    #[error("solver returned a placement leaving {0} cities uncovered")]
    Uncovered(usize),

    #[error("decoded tower rejected: {0}")]
    Decode(#[from] PlacementError),

    #[error("unknown solver backend '{0}'")]
    UnknownBackend(String),

    /// Anything else reported by the backend
    #[error("solver failed: {0}")]
    Backend(String),
}

impl MipError {
    /// Failures where the solver ran but produced no usable optimum.
    pub fn is_non_convergence(&self) -> bool {
        matches!(
            self,
            MipError::TimeLimit(_) | MipError::Infeasible | MipError::Unbounded | MipError::Backend(_)
        )
    }
}

impl From<ResolutionError> for MipError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::Infeasible => MipError::Infeasible,
            ResolutionError::Unbounded => MipError::Unbounded,
            other => MipError::Backend(other.to_string()),
        }
    }
}

/// Which MIP engine to hand the model to.
///
/// The default is HiGHS when the `solver-highs` feature is compiled in, since
/// it honours the time limit itself, and microlp otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverBackend {
    /// Pure-Rust branch and bound, always available
    Microlp,
    /// HiGHS (requires the `solver-highs` feature)
    #[cfg(feature = "solver-highs")]
    Highs,
}

impl Default for SolverBackend {
    #[cfg(feature = "solver-highs")]
    fn default() -> Self {
        SolverBackend::Highs
    }

    #[cfg(not(feature = "solver-highs"))]
    fn default() -> Self {
        SolverBackend::Microlp
    }
}

impl SolverBackend {
    /// Whether the engine itself stops once the time limit is reached.
    pub fn enforces_time_limit(&self) -> bool {
        match self {
            SolverBackend::Microlp => false,
            #[cfg(feature = "solver-highs")]
            SolverBackend::Highs => true,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SolverBackend::Microlp => "microlp",
            #[cfg(feature = "solver-highs")]
            SolverBackend::Highs => "highs",
        }
    }

    /// Backends compiled into this build.
    pub fn available() -> Vec<SolverBackend> {
        #[allow(unused_mut)]
        let mut backends = vec![SolverBackend::Microlp];
        #[cfg(feature = "solver-highs")]
        backends.push(SolverBackend::Highs);
        backends
    }
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverBackend {
    type Err = MipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SolverBackend::available()
            .into_iter()
            .find(|b| b.name() == wanted)
            .ok_or_else(|| MipError::UnknownBackend(s.to_string()))
    }
}

/// Solver configuration
///
/// `time_limit` bounds how long [`PlacementModel::solve`] waits for an answer.
/// Only backends whose [`SolverBackend::enforces_time_limit`] is true also stop
/// searching at that point. microlp has no way to be interrupted: after a
/// [`MipError::TimeLimit`] its worker thread keeps one core busy until the
/// branch and bound finishes on its own, and retrying with a fresh config
/// starts another one next to it. Prefer HiGHS for large grids, or give
/// microlp a limit generous enough that it rarely fires.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Wall-clock budget the caller waits for
    pub time_limit: Duration,
    pub backend: SolverBackend,
    /// Let the backend print its own progress
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(300), // 5 minutes
            backend: SolverBackend::default(),
            verbose: false,
        }
    }
}

/// Raw per-cell values read back from a solved model.
#[derive(Debug, Clone, PartialEq)]
pub struct CellAssignment {
    side: u32,
    values: Vec<f64>,
    objective: f64,
}

impl CellAssignment {
    /// `values` holds one entry per cell in row-major order.
    pub fn new(side: u32, values: Vec<f64>, objective: f64) -> Self {
        Self {
            side,
            values,
            objective,
        }
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of the approximate objective at this assignment.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn value_at(&self, point: Point) -> Option<f64> {
        let side = i64::from(self.side);
        let (x, y) = (i64::from(point.x), i64::from(point.y));
        if x < 0 || y < 0 || x >= side || y >= side {
            return None;
        }
        self.values.get((y * side + x) as usize).copied()
    }
}

impl PlacementModel {
    /// Solve the model with the configured backend.
    ///
    /// The backend runs on its own thread. If it has not answered when
    /// `config.time_limit` runs out this returns [`MipError::TimeLimit`] and
    /// the thread is left to finish in the background. See [`SolverConfig`]
    /// for what that costs with a backend that ignores the limit.
    pub fn solve(self, config: &SolverConfig) -> Result<CellAssignment, MipError> {
        let limit = config.time_limit;
        let backend = config.backend;
        let verbose = config.verbose;
        let stats = self.stats();

        info!(
            %backend,
            cells = stats.cells,
            constraints = stats.total_constraints(),
            time_limit = ?limit,
            "solving placement model"
        );

        let start = Instant::now();
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("ppp-mip".into())
            .spawn(move || {
                // The receiver may have given up already
                let _ = tx.send(run_backend(self, backend, limit, verbose));
            })
            .map_err(|e| MipError::Backend(format!("could not start solver thread: {e}")))?;

        let result = match rx.recv_timeout(limit) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                if !backend.enforces_time_limit() {
                    warn!(%backend, "solver thread still running after the time limit");
                }
                Err(MipError::TimeLimit(limit))
            }
            Err(RecvTimeoutError::Disconnected) => Err(MipError::Backend(
                "solver thread exited without a result".into(),
            )),
        };

        match &result {
            Ok(assignment) => info!(
                objective = assignment.objective(),
                elapsed = ?start.elapsed(),
                "placement model solved"
            ),
            Err(e) if e.is_non_convergence() => warn!(error = %e, "solver did not converge"),
            Err(e) => warn!(error = %e, "solve failed"),
        }
        result
    }
}

fn run_backend(
    model: PlacementModel,
    backend: SolverBackend,
    limit: Duration,
    verbose: bool,
) -> Result<CellAssignment, MipError> {
    let side = model.side;
    let PlacementModel {
        vars,
        placement_vars,
        penalty_vars,
        constraints,
        objective,
        ..
    } = model;

    match backend {
        SolverBackend::Microlp => {
            debug!(?limit, verbose, "microlp ignores time limit and verbosity");
            let mut problem = vars.minimise(objective).using(microlp);
            for c in constraints {
                problem = problem.with(c);
            }
            let solution = problem.solve()?;
            Ok(read_assignment(&solution, side, &placement_vars, &penalty_vars))
        }
        #[cfg(feature = "solver-highs")]
        SolverBackend::Highs => {
            use good_lp::solvers::highs::highs;

            let mut problem = vars
                .minimise(objective)
                .using(highs)
                .set_time_limit(limit.as_secs_f64())
                .set_verbose(verbose);
            for c in constraints {
                problem = problem.with(c);
            }
            let solution = problem.solve()?;
            Ok(read_assignment(&solution, side, &placement_vars, &penalty_vars))
        }
    }
}

fn read_assignment(
    solution: &impl Solution,
    side: u32,
    placement_vars: &[Variable],
    penalty_vars: &[Variable],
) -> CellAssignment {
    let values = placement_vars.iter().map(|&t| solution.value(t)).collect();
    let objective = penalty_vars.iter().map(|&q| solution.value(q)).sum();
    CellAssignment::new(side, values, objective)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("microlp".parse::<SolverBackend>().unwrap(), SolverBackend::Microlp);
        assert_eq!(" MicroLP ".parse::<SolverBackend>().unwrap(), SolverBackend::Microlp);
        let err = "cplex".parse::<SolverBackend>().unwrap_err();
        assert!(matches!(err, MipError::UnknownBackend(ref s) if s == "cplex"));
        assert!(SolverBackend::available().contains(&SolverBackend::default()));
    }

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit, Duration::from_secs(300));
        assert_eq!(config.backend, SolverBackend::default());
        assert!(!config.verbose);
    }

    #[test]
    fn test_default_backend_prefers_native_time_limit() {
        let default = SolverBackend::default();
        assert!(SolverBackend::available().contains(&default));
        assert!(!SolverBackend::Microlp.enforces_time_limit());
        #[cfg(feature = "solver-highs")]
        {
            assert_eq!(default, SolverBackend::Highs);
            assert!(default.enforces_time_limit());
        }
        #[cfg(not(feature = "solver-highs"))]
        assert_eq!(default, SolverBackend::Microlp);
    }

    #[test]
    fn test_resolution_error_mapping() {
        assert!(matches!(MipError::from(ResolutionError::Infeasible), MipError::Infeasible));
        assert!(matches!(MipError::from(ResolutionError::Unbounded), MipError::Unbounded));
        let other = MipError::from(ResolutionError::Other("boom"));
        assert!(matches!(other, MipError::Backend(_)));
        assert!(other.is_non_convergence());
    }

    #[test]
    fn test_non_convergence_family() {
        assert!(MipError::TimeLimit(Duration::ZERO).is_non_convergence());
        assert!(!MipError::Uncovered(1).is_non_convergence());
        assert!(!MipError::NonConvexApproximation { name: "x".into() }.is_non_convergence());
    }

    #[test]
    fn test_value_at() {
        let a = CellAssignment::new(2, vec![0.0, 1.0, 0.0, 0.5], 170.0);
        assert_eq!(a.value_at(Point::new(1, 0)), Some(1.0));
        assert_eq!(a.value_at(Point::new(1, 1)), Some(0.5));
        assert_eq!(a.value_at(Point::new(2, 0)), None);
        assert_eq!(a.value_at(Point::new(-1, 0)), None);
        assert_eq!(a.objective(), 170.0);
    }
}
