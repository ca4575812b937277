//! Model construction
//!
//! Turns an [`Instance`] plus a [`PenaltyApproximation`] into decision
//! variables, constraints and an objective ready for a MIP backend.

use super::MipError;
use crate::linearize::{LinearCut, PenaltyApproximation};
use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use ppp_core::Instance;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Relative slack allowed when checking that cut slopes never decrease.
const CONVEXITY_TOLERANCE: f64 = 1e-9;

/// Size of a built model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    /// Lattice cells, one binary each
    pub cells: usize,
    /// Binary placement variables
    pub binary_vars: usize,
    /// Continuous penalty variables
    pub continuous_vars: usize,
    /// One per city
    pub coverage_constraints: usize,
    /// Big-M cut rows plus penalty floors
    pub penalty_constraints: usize,
    /// Distinct cuts in the approximation
    pub cuts: usize,
    /// Largest neighbourhood within the penalty radius
    pub max_overlap: usize,
}

impl ModelStats {
    pub fn total_constraints(&self) -> usize {
        self.coverage_constraints + self.penalty_constraints
    }
}

/// A fully built but unsolved placement MILP.
///
/// Placement variables are stored in row-major cell order, the same order as
/// [`Instance::cell_index`].
pub struct PlacementModel {
    pub(super) vars: ProblemVariables,
    pub(super) placement_vars: Vec<Variable>,
    pub(super) penalty_vars: Vec<Variable>,
    pub(super) constraints: Vec<Constraint>,
    pub(super) objective: Expression,
    pub(super) side: u32,
    stats: ModelStats,
    approximation: String,
}

impl fmt::Debug for PlacementModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementModel")
            .field("side", &self.side)
            .field("approximation", &self.approximation)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl PlacementModel {
    pub fn stats(&self) -> ModelStats {
        self.stats
    }

    /// Name of the approximation the cuts were taken from.
    pub fn approximation(&self) -> &str {
        &self.approximation
    }

    pub fn side(&self) -> u32 {
        self.side
    }
}

/// Build the placement MILP for `instance` under `approximation`.
///
/// Fails with [`MipError::NonConvexApproximation`] if the approximation's cuts
/// do not describe a convex function, since the cut encoding would then
/// underestimate it.
pub fn build_model(
    instance: &Instance,
    approximation: &dyn PenaltyApproximation,
) -> Result<PlacementModel, MipError> {
    let cells: Vec<_> = instance.cells().collect();
    let n_cells = cells.len();

    // Neighbourhoods within the penalty radius, self excluded
    let neighbours: Vec<Vec<usize>> = cells
        .iter()
        .map(|&cell| {
            instance
                .penalty_area(cell)
                .into_iter()
                .filter(|&p| p != cell)
                .filter_map(|p| instance.cell_index(p))
                .collect()
        })
        .collect();
    let max_overlap = neighbours.iter().map(Vec::len).max().unwrap_or(0);

    let cuts = approximation.cuts(max_overlap);
    if cuts.is_empty() || !is_convex(&cuts) {
        return Err(MipError::NonConvexApproximation {
            name: approximation.name(),
        });
    }

    let floor = (0..=max_overlap)
        .map(|w| approximation.evaluate(w as f64))
        .fold(0.0_f64, f64::min);

    debug!(
        cells = n_cells,
        max_overlap,
        cuts = cuts.len(),
        floor,
        approximation = %approximation.name(),
        "building placement model"
    );

    // === Variables ===
    // t[c]: tower at cell c (binary)
    // q[c]: penalty carried by cell c (continuous, ≥ L)

    let mut vars = ProblemVariables::new();
    let mut placement_vars = Vec::with_capacity(n_cells);
    let mut penalty_vars = Vec::with_capacity(n_cells);
    for cell in &cells {
        placement_vars.push(vars.add(variable().binary().name(format!("t_{}_{}", cell.x, cell.y))));
        penalty_vars.push(vars.add(variable().min(floor).name(format!("q_{}_{}", cell.x, cell.y))));
    }

    let mut constraints = Vec::new();

    // === Coverage ===
    for &city in instance.cities() {
        let mut covered = Expression::with_capacity(8);
        for p in instance.coverage_area(city) {
            if let Some(c) = instance.cell_index(p) {
                covered += placement_vars[c];
            }
        }
        constraints.push(constraint!(covered >= 1.0));
    }
    let coverage_constraints = constraints.len();

    // === Penalty cuts ===
    for (c, near) in neighbours.iter().enumerate() {
        let t = placement_vars[c];
        let q = penalty_vars[c];

        if floor < 0.0 {
            let mut above_floor = Expression::from(q);
            above_floor -= floor * t;
            constraints.push(constraint!(above_floor >= 0.0));
        }

        let reach = near.len();
        for cut in cuts.iter().filter(|cut| cut.from < reach.max(1)) {
            let big_m = cut.at(0.0).max(cut.at(reach as f64)).max(0.0);

            // q − b·w − M·t ≥ a − M
            let mut lhs = Expression::with_capacity(reach + 2);
            lhs += q;
            if cut.slope != 0.0 {
                for &n in near {
                    lhs -= cut.slope * placement_vars[n];
                }
            }
            lhs -= big_m * t;
            constraints.push(constraint!(lhs >= cut.intercept - big_m));
        }
    }
    let penalty_constraints = constraints.len() - coverage_constraints;

    // === Objective ===
    let mut objective = Expression::with_capacity(n_cells);
    for &q in &penalty_vars {
        objective += q;
    }

    let stats = ModelStats {
        cells: n_cells,
        binary_vars: placement_vars.len(),
        continuous_vars: penalty_vars.len(),
        coverage_constraints,
        penalty_constraints,
        cuts: cuts.len(),
        max_overlap,
    };
    debug!(?stats, "placement model built");

    Ok(PlacementModel {
        vars,
        placement_vars,
        penalty_vars,
        constraints,
        objective,
        side: instance.side(),
        stats,
        approximation: approximation.name(),
    })
}

fn is_convex(cuts: &[LinearCut]) -> bool {
    cuts.iter().all(|c| c.slope.is_finite() && c.intercept.is_finite())
        && cuts.windows(2).all(|pair| {
            let tol = CONVEXITY_TOLERANCE * (1.0 + pair[0].slope.abs());
            pair[1].slope + tol >= pair[0].slope && pair[1].from > pair[0].from
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linearize::{ExactSecants, TaylorExpansion};
    use ppp_core::{Point, Radius};

    fn centre_city() -> Instance {
        Instance::new(
            3,
            vec![Point::new(1, 1)],
            Radius::from_steps(1),
            Radius::from_steps(1),
        )
        .unwrap()
    }

    #[derive(Debug)]
    struct Concave;

    impl PenaltyApproximation for Concave {
        fn name(&self) -> String {
            "sqrt".into()
        }

        fn evaluate(&self, overlap: f64) -> f64 {
            overlap.sqrt()
        }
    }

    #[test]
    fn test_linear_stats() {
        let model = build_model(&centre_city(), &TaylorExpansion::linear(0)).unwrap();
        let stats = model.stats();
        assert_eq!(stats.cells, 9);
        assert_eq!(stats.binary_vars, 9);
        assert_eq!(stats.continuous_vars, 9);
        assert_eq!(stats.coverage_constraints, 1);
        // One cut per cell, no floor rows while g stays positive
        assert_eq!(stats.penalty_constraints, 9);
        assert_eq!(stats.max_overlap, 4);
        assert_eq!(stats.cuts, 1);
        assert_eq!(model.approximation(), "taylor-1@w0=0");
    }

    #[test]
    fn test_secant_rows_follow_neighbourhood_size() {
        let model = build_model(&centre_city(), &TaylorExpansion::quadratic(0)).unwrap();
        let stats = model.stats();
        assert_eq!(stats.cuts, 4);
        // corners see 2 neighbours, edges 3, the centre 4
        assert_eq!(stats.penalty_constraints, 4 * 2 + 4 * 3 + 4);
        assert_eq!(stats.total_constraints(), 25);
    }

    #[test]
    fn test_negative_floor_adds_rows() {
        let model = build_model(&centre_city(), &TaylorExpansion::linear(6)).unwrap();
        assert_eq!(model.stats().penalty_constraints, 9 + 9);
    }

    #[test]
    fn test_isolated_cells_get_constant_cut() {
        let instance = Instance::new(
            2,
            vec![Point::new(0, 0)],
            Radius::from_steps(0),
            Radius::from_steps(0),
        )
        .unwrap();
        let model = build_model(&instance, &ExactSecants).unwrap();
        let stats = model.stats();
        assert_eq!(stats.max_overlap, 0);
        assert_eq!(stats.cuts, 1);
        assert_eq!(stats.penalty_constraints, 4);
    }

    #[test]
    fn test_rejects_concave_approximation() {
        let err = build_model(&centre_city(), &Concave).unwrap_err();
        assert!(matches!(err, MipError::NonConvexApproximation { ref name } if name == "sqrt"));
    }

    #[test]
    fn test_convexity_check() {
        let cut = |slope: f64, from| LinearCut {
            intercept: 0.0,
            slope,
            from,
        };
        assert!(is_convex(&[cut(1.0, 0), cut(2.0, 1), cut(2.0, 3)]));
        assert!(!is_convex(&[cut(2.0, 0), cut(1.0, 1)]));
        assert!(!is_convex(&[cut(f64::NAN, 0)]));
    }
}
