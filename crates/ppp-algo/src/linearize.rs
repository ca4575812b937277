//! Penalty linearization
//!
//! The true per-tower cost `f(w) = 170·e^(0.17·w)` cannot go into a
//! mixed-integer *linear* model as-is. A [`PenaltyApproximation`] stands in
//! for it: something that can be evaluated, and that can describe itself as a
//! family of [`LinearCut`]s whose upper envelope matches it on integer overlap
//! counts. The model builder only ever talks to this trait, so new
//! approximations plug in without touching the builder.
//!
//! Two strategies ship here:
//!
//! | Strategy | Shape | Fidelity |
//! |----------|-------|----------|
//! | [`TaylorExpansion`] (order 1) | tangent line at `w0` | exact only at `w0` |
//! | [`TaylorExpansion`] (order 2) | tangent parabola at `w0` | exact only at `w0`, error grows away from it |
//! | [`ExactSecants`] | secants of `f` between consecutive integers | exact on every integer `w` |
//!
//! ## Approximation risk
//!
//! A Taylor expansion is a *local* model. It neither bounds `f` from above nor
//! from below across the whole range: the tangent line undershoots
//! everywhere (it can even go negative far below `w0`), and the parabola
//! undershoots above `w0`. Solutions optimized against it are only as good as
//! the overlap counts they end up with are close to `w0`. Always re-score a
//! decoded placement with [`Placement::penalty`](ppp_core::Placement::penalty)
//! before trusting its cost.

use ppp_core::{tower_penalty_at, PENALTY_RATE};
use std::fmt;

/// Reference overlap count used when none is given.
pub const DEFAULT_REFERENCE_OVERLAP: u32 = 6;

/// One affine piece `intercept + slope·w`, valid from overlap `from` upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCut {
    pub intercept: f64,
    pub slope: f64,
    /// Smallest overlap count this piece is needed for.
    pub from: usize,
}

impl LinearCut {
    #[inline]
    pub fn at(&self, overlap: f64) -> f64 {
        self.intercept + self.slope * overlap
    }
}

/// A tractable stand-in for the exponential overlap penalty.
pub trait PenaltyApproximation: fmt::Debug + Send + Sync {
    /// Short label for logs and reports.
    fn name(&self) -> String;

    /// Approximate cost of one tower with `overlap` neighbours.
    fn evaluate(&self, overlap: f64) -> f64;

    /// Affine pieces whose pointwise maximum equals [`evaluate`](Self::evaluate)
    /// at every integer in `0..=max_overlap`.
    ///
    /// The default interpolates between consecutive integers, which is only
    /// correct for approximations that are convex on that range. The model
    /// builder checks the returned slopes and refuses anything else.
    fn cuts(&self, max_overlap: usize) -> Vec<LinearCut> {
        secant_cuts(|w| self.evaluate(w), max_overlap)
    }
}

/// Secants of `g` between consecutive integers in `0..=max_overlap`, with
/// collinear neighbours merged.
pub fn secant_cuts(g: impl Fn(f64) -> f64, max_overlap: usize) -> Vec<LinearCut> {
    if max_overlap == 0 {
        return vec![LinearCut {
            intercept: g(0.0),
            slope: 0.0,
            from: 0,
        }];
    }

    let mut cuts: Vec<LinearCut> = Vec::with_capacity(max_overlap);
    let mut lo = g(0.0);
    for k in 0..max_overlap {
        let hi = g((k + 1) as f64);
        let slope = hi - lo;
        let cut = LinearCut {
            intercept: lo - slope * k as f64,
            slope,
            from: k,
        };
        match cuts.last() {
            Some(prev) if same_line(prev, &cut) => {}
            _ => cuts.push(cut),
        }
        lo = hi;
    }
    cuts
}

fn same_line(a: &LinearCut, b: &LinearCut) -> bool {
    let tol = 1e-9 * (1.0 + a.intercept.abs().max(a.slope.abs()));
    (a.slope - b.slope).abs() <= tol && (a.intercept - b.intercept).abs() <= tol
}

/// Degree of a [`TaylorExpansion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpansionOrder {
    /// Tangent line
    Linear,
    /// Tangent parabola
    Quadratic,
}

impl ExpansionOrder {
    /// `1` or `2`; anything else has no expansion.
    pub fn from_degree(degree: u8) -> Option<Self> {
        match degree {
            1 => Some(ExpansionOrder::Linear),
            2 => Some(ExpansionOrder::Quadratic),
            _ => None,
        }
    }

    pub fn degree(&self) -> u8 {
        match self {
            ExpansionOrder::Linear => 1,
            ExpansionOrder::Quadratic => 2,
        }
    }
}

/// Taylor expansion of the penalty around a reference overlap `w0`.
///
/// ```text
/// f0 = 170·e^(0.17·w0)    f1 = 0.17·f0    f2 = 0.17·f1
///
/// order 1:  g(w) = f0 + f1·(w − w0)
/// order 2:  g(w) = f0 + f1·(w − w0) + ½·f2·(w − w0)²
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaylorExpansion {
    order: ExpansionOrder,
    reference: u32,
    f0: f64,
    f1: f64,
    f2: f64,
}

/// Expand the penalty to `order` around `reference`.
pub fn expand(order: ExpansionOrder, reference: u32) -> TaylorExpansion {
    TaylorExpansion::new(order, reference)
}

impl TaylorExpansion {
    pub fn new(order: ExpansionOrder, reference: u32) -> Self {
        let f0 = tower_penalty_at(f64::from(reference));
        let f1 = PENALTY_RATE * f0;
        let f2 = PENALTY_RATE * f1;
        TaylorExpansion {
            order,
            reference,
            f0,
            f1,
            f2,
        }
    }

    pub fn linear(reference: u32) -> Self {
        Self::new(ExpansionOrder::Linear, reference)
    }

    pub fn quadratic(reference: u32) -> Self {
        Self::new(ExpansionOrder::Quadratic, reference)
    }

    pub fn order(&self) -> ExpansionOrder {
        self.order
    }

    /// The reference overlap `w0`.
    pub fn reference(&self) -> u32 {
        self.reference
    }

    /// `f(w0)`
    pub fn value(&self) -> f64 {
        self.f0
    }

    /// `f'(w0)`
    pub fn slope(&self) -> f64 {
        self.f1
    }

    /// `f''(w0)` for order 2, zero for order 1.
    pub fn curvature(&self) -> f64 {
        match self.order {
            ExpansionOrder::Linear => 0.0,
            ExpansionOrder::Quadratic => self.f2,
        }
    }
}

impl Default for TaylorExpansion {
    fn default() -> Self {
        Self::linear(DEFAULT_REFERENCE_OVERLAP)
    }
}

impl PenaltyApproximation for TaylorExpansion {
    fn name(&self) -> String {
        let kind = match self.order {
            ExpansionOrder::Linear => "taylor-1",
            ExpansionOrder::Quadratic => "taylor-2",
        };
        format!("{kind}@w0={}", self.reference)
    }

    fn evaluate(&self, overlap: f64) -> f64 {
        let d = overlap - f64::from(self.reference);
        self.f0 + self.f1 * d + 0.5 * self.curvature() * d * d
    }

    fn cuts(&self, max_overlap: usize) -> Vec<LinearCut> {
        match self.order {
            // Already affine: one exact piece instead of re-deriving it from samples
            ExpansionOrder::Linear => vec![LinearCut {
                intercept: self.f0 - self.f1 * f64::from(self.reference),
                slope: self.f1,
                from: 0,
            }],
            ExpansionOrder::Quadratic => secant_cuts(|w| self.evaluate(w), max_overlap),
        }
    }
}

/// Piecewise-linear interpolation of the exact penalty between integers.
///
/// Overlap counts are integers and the exponential is convex, so the upper
/// envelope of these secants reproduces the true cost at every attainable
/// `w`. The price is one cut per integer up to the largest neighbourhood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactSecants;

impl PenaltyApproximation for ExactSecants {
    fn name(&self) -> String {
        "exact-secants".to_string()
    }

    fn evaluate(&self, overlap: f64) -> f64 {
        tower_penalty_at(overlap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppp_core::tower_penalty;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    fn envelope(cuts: &[LinearCut], w: f64) -> f64 {
        cuts.iter().map(|c| c.at(w)).fold(f64::NEG_INFINITY, f64::max)
    }

    #[test]
    fn test_expansion_is_exact_at_reference() {
        for w0 in [0u32, 3, 6, 10] {
            let expected = 170.0 * (0.17 * f64::from(w0)).exp();
            for order in [ExpansionOrder::Linear, ExpansionOrder::Quadratic] {
                let g = expand(order, w0);
                assert!(close(g.evaluate(f64::from(w0)), expected));
                assert!(close(g.value(), expected));
            }
        }
    }

    #[test]
    fn test_quadratic_adds_positive_curvature() {
        let lin = TaylorExpansion::linear(6);
        let quad = TaylorExpansion::quadratic(6);
        assert!(close(lin.slope(), quad.slope()));
        assert_eq!(lin.curvature(), 0.0);
        assert!(quad.curvature() > 0.0);
        for w in [0.0, 2.0, 5.0, 7.0, 12.0] {
            let extra = quad.evaluate(w) - lin.evaluate(w);
            let d = w - 6.0;
            assert!(extra > 0.0, "w = {w}");
            assert!(close(extra, 0.5 * quad.curvature() * d * d));
        }
    }

    #[test]
    fn test_derivatives_scale_by_rate() {
        let g = TaylorExpansion::quadratic(4);
        assert!(close(g.slope(), 0.17 * g.value()));
        assert!(close(g.curvature(), 0.17 * g.slope()));
    }

    #[test]
    fn test_linear_tangent_undershoots_away_from_reference() {
        let g = TaylorExpansion::default();
        assert_eq!(g.reference(), DEFAULT_REFERENCE_OVERLAP);
        // 1 - 6·0.17 < 0, so an isolated tower looks profitable
        assert!(g.evaluate(0.0) < 0.0);
        for w in [0usize, 3, 9, 15] {
            assert!(g.evaluate(w as f64) <= tower_penalty(w) + 1e-9);
        }
    }

    #[test]
    fn test_linear_expansion_is_a_single_cut() {
        let g = TaylorExpansion::linear(6);
        let cuts = g.cuts(20);
        assert_eq!(cuts.len(), 1);
        for w in 0..=20 {
            assert!(close(cuts[0].at(w as f64), g.evaluate(w as f64)));
        }
    }

    #[test]
    fn test_quadratic_secants_match_on_integers() {
        let g = TaylorExpansion::quadratic(3);
        let cuts = g.cuts(12);
        assert_eq!(cuts.len(), 12);
        for w in 0..=12 {
            assert!(close(envelope(&cuts, w as f64), g.evaluate(w as f64)));
        }
    }

    #[test]
    fn test_exact_secants_reproduce_penalty() {
        let cuts = ExactSecants.cuts(30);
        for w in 0..=30 {
            assert!(close(envelope(&cuts, w as f64), tower_penalty(w)));
        }
        let slopes: Vec<f64> = cuts.iter().map(|c| c.slope).collect();
        assert!(slopes.windows(2).all(|s| s[0] <= s[1]));
    }

    #[test]
    fn test_zero_range_collapses_to_constant() {
        let cuts = ExactSecants.cuts(0);
        assert_eq!(cuts.len(), 1);
        assert_eq!(cuts[0].slope, 0.0);
        assert!(close(cuts[0].intercept, 170.0));
    }

    #[test]
    fn test_collinear_secants_merge() {
        let cuts = secant_cuts(|w| 3.0 + 2.0 * w, 10);
        assert_eq!(cuts.len(), 1);
        assert!(close(cuts[0].intercept, 3.0));
        assert!(close(cuts[0].slope, 2.0));
    }

    #[test]
    fn test_order_degrees() {
        assert_eq!(ExpansionOrder::from_degree(1), Some(ExpansionOrder::Linear));
        assert_eq!(ExpansionOrder::from_degree(2), Some(ExpansionOrder::Quadratic));
        assert_eq!(ExpansionOrder::from_degree(3), None);
        assert_eq!(ExpansionOrder::Quadratic.degree(), 2);
    }

    #[test]
    fn test_names() {
        assert_eq!(TaylorExpansion::linear(6).name(), "taylor-1@w0=6");
        assert_eq!(TaylorExpansion::quadratic(2).name(), "taylor-2@w0=2");
        assert_eq!(ExactSecants.name(), "exact-secants");
    }
}
