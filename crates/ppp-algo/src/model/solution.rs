//! Decoding solver output back into placements

use super::{build_model, CellAssignment, MipError, ModelStats, SolverBackend, SolverConfig};
use crate::linearize::PenaltyApproximation;
use ppp_core::{Instance, Placement};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How far from 0 or 1 a placement variable may drift and still count as binary.
pub const BINARY_TOLERANCE: f64 = 1e-6;

/// Turn per-cell solver values into a [`Placement`].
///
/// Cells with value ≈1 get a tower, cells with value ≈0 stay empty. Towers
/// are added in row-major order, so ids follow the cell order. Any value
/// outside both tolerance bands is reported as [`MipError::Fractional`].
pub fn decode(instance: Arc<Instance>, assignment: &CellAssignment) -> Result<Placement, MipError> {
    let expected = instance.cell_count();
    let values = assignment.values();
    if assignment.side() != instance.side() || values.len() != expected {
        return Err(MipError::ShapeMismatch {
            expected,
            found: values.len(),
        });
    }

    let mut towers = Vec::new();
    for (index, &value) in values.iter().enumerate() {
        let Some(cell) = instance.cell_at(index) else {
            continue;
        };
        if (value - 1.0).abs() <= BINARY_TOLERANCE {
            towers.push(cell);
        } else if value.abs() > BINARY_TOLERANCE || value.is_nan() {
            return Err(MipError::Fractional { cell, value });
        }
    }

    Ok(Placement::from_points(instance, towers)?)
}

/// Result of a full build, solve and decode run.
#[derive(Debug, Clone)]
pub struct PlacementSolution {
    pub placement: Placement,
    /// Name of the approximation that was optimized
    pub approximation: String,
    /// Objective the solver reported, in approximated cost
    pub approximate_objective: f64,
    /// True cost of `placement`
    pub penalty: f64,
    pub stats: ModelStats,
    pub backend: SolverBackend,
    /// Wall time from model build to decoded placement
    pub solve_time: Duration,
}

impl PlacementSolution {
    pub fn towers(&self) -> usize {
        self.placement.len()
    }

    /// True cost minus approximated cost. Zero for exact approximations.
    pub fn approximation_gap(&self) -> f64 {
        self.penalty - self.approximate_objective
    }

    /// Format a human-readable summary
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Placement Solution Summary\n{}\n", "=".repeat(40)));
        s.push_str(&format!("Approximation: {}\n", self.approximation));
        s.push_str(&format!("Backend: {}\n", self.backend));
        s.push_str(&format!(
            "Model: {} binaries, {} constraints\n",
            self.stats.binary_vars,
            self.stats.total_constraints()
        ));
        s.push_str(&format!("Towers: {}\n", self.towers()));
        s.push_str(&format!("Approximate objective: {:.4}\n", self.approximate_objective));
        s.push_str(&format!("Penalty: {:.4}\n", self.penalty));
        s.push_str(&format!("Gap: {:.4}\n", self.approximation_gap()));
        s.push_str(&format!("Solve time: {:.2?}\n", self.solve_time));
        s
    }
}

/// Build, solve and decode in one call.
///
/// The returned placement is always valid: a decoded placement that misses a
/// city is reported as [`MipError::Uncovered`] rather than returned.
///
/// # Example
///
/// ```no_run
/// use ppp_algo::linearize::{ExpansionOrder, TaylorExpansion};
/// use ppp_algo::model::{solve_placement, SolverConfig};
/// use ppp_core::{Instance, Point, Radius};
/// use std::sync::Arc;
///
/// let instance = Arc::new(Instance::new(
///     8,
///     vec![Point::new(1, 1), Point::new(6, 5)],
///     Radius::from_steps(2),
///     Radius::from_steps(3),
/// )?);
/// let approximation = TaylorExpansion::new(ExpansionOrder::Quadratic, 0);
/// let solution = solve_placement(instance, &approximation, &SolverConfig::default())?;
/// println!("{}", solution.summary());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn solve_placement(
    instance: Arc<Instance>,
    approximation: &dyn PenaltyApproximation,
    config: &SolverConfig,
) -> Result<PlacementSolution, MipError> {
    let start = Instant::now();

    let model = build_model(&instance, approximation)?;
    let stats = model.stats();
    let assignment = model.solve(config)?;
    let placement = decode(Arc::clone(&instance), &assignment)?;

    let uncovered = placement.uncovered_cities();
    if !uncovered.is_empty() {
        warn!(count = uncovered.len(), "decoded placement misses cities");
        return Err(MipError::Uncovered(uncovered.len()));
    }

    let penalty = placement.penalty();
    let solution = PlacementSolution {
        placement,
        approximation: approximation.name(),
        approximate_objective: assignment.objective(),
        penalty,
        stats,
        backend: config.backend,
        solve_time: start.elapsed(),
    };
    info!(
        towers = solution.towers(),
        penalty,
        gap = solution.approximation_gap(),
        "placement decoded"
    );
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppp_core::{Point, Radius};

    fn grid(side: u32) -> Arc<Instance> {
        Arc::new(
            Instance::new(
                side,
                vec![Point::new(0, 0)],
                Radius::from_steps(1),
                Radius::from_steps(1),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_decode_row_major() {
        let values = vec![0.0, 1.0, 0.0, 1.0 - 1e-9];
        let placement = decode(grid(2), &CellAssignment::new(2, values, 0.0)).unwrap();
        let points: Vec<Point> = placement.points().collect();
        assert_eq!(points, vec![Point::new(1, 0), Point::new(1, 1)]);
        assert!(placement.is_valid());
    }

    #[test]
    fn test_decode_tolerates_noise() {
        let values = vec![1e-8, -1e-8, 1.0 + 1e-8, 0.0];
        let placement = decode(grid(2), &CellAssignment::new(2, values, 0.0)).unwrap();
        assert_eq!(placement.len(), 1);
    }

    #[test]
    fn test_decode_rejects_fractional() {
        let values = vec![0.0, 0.0, 0.5, 0.0];
        let err = decode(grid(2), &CellAssignment::new(2, values, 0.0)).unwrap_err();
        match err {
            MipError::Fractional { cell, value } => {
                assert_eq!(cell, Point::new(0, 1));
                assert_eq!(value, 0.5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_rejects_nan() {
        let values = vec![f64::NAN, 0.0, 0.0, 0.0];
        let err = decode(grid(2), &CellAssignment::new(2, values, 0.0)).unwrap_err();
        assert!(matches!(err, MipError::Fractional { .. }));
    }

    #[test]
    fn test_decode_shape_mismatch() {
        let err = decode(grid(3), &CellAssignment::new(2, vec![0.0; 4], 0.0)).unwrap_err();
        assert!(matches!(
            err,
            MipError::ShapeMismatch {
                expected: 9,
                found: 4
            }
        ));
    }

    #[test]
    fn test_decode_empty_assignment_is_invalid_placement() {
        let placement = decode(grid(2), &CellAssignment::new(2, vec![0.0; 4], 0.0)).unwrap();
        assert!(placement.is_empty());
        assert!(!placement.is_valid());
    }
}
