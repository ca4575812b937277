//! Shared CLI argument types
//!
//! Reusable value enums so every subcommand spells its flags the same way.

use clap::ValueEnum;
use ppp_algo::{ExactSecants, ExpansionOrder, PenaltyApproximation, TaylorExpansion};

/// Output format for commands that report results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text and tables
    #[default]
    Plain,
    /// Single JSON object (pipe-friendly)
    Json,
}

/// Penalty approximation used by `solve`.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApproximationKind {
    /// First-order Taylor expansion around the reference overlap
    Linear,
    /// Second-order Taylor expansion around the reference overlap
    #[default]
    Quadratic,
    /// Secant interpolation of the true penalty (exact on integers, larger model)
    Exact,
}

impl ApproximationKind {
    /// The approximation strategy, expanded around `reference` where that applies.
    pub fn build(self, reference: u32) -> Box<dyn PenaltyApproximation> {
        match self {
            ApproximationKind::Linear => {
                Box::new(TaylorExpansion::new(ExpansionOrder::Linear, reference))
            }
            ApproximationKind::Quadratic => {
                Box::new(TaylorExpansion::new(ExpansionOrder::Quadratic, reference))
            }
            ApproximationKind::Exact => Box::new(ExactSecants),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_names() {
        assert_eq!(ApproximationKind::Linear.build(6).name(), "taylor-1@w0=6");
        assert_eq!(ApproximationKind::Quadratic.build(0).name(), "taylor-2@w0=0");
        assert_eq!(ApproximationKind::Exact.build(6).name(), "exact-secants");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
        assert_eq!(ApproximationKind::default(), ApproximationKind::Quadratic);
    }
}
