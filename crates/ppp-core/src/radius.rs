//! Coverage and penalty radii

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A finite, non-negative distance threshold.
///
/// Squared lattice distances are integers, so `d² <= r²` holds exactly when
/// `d² <= floor(r²)`. The radius keeps that integer bound (and the bounding-box
/// half extent `floor(r)`) alongside the given value, which keeps every
/// coverage and overlap test in integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Radius {
    value: f64,
    reach: i64,
    squared_bound: i64,
}

impl Radius {
    pub fn new(value: f64) -> CoreResult<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::InvalidRadius(value));
        }
        Ok(Radius {
            value,
            reach: value.floor() as i64,
            squared_bound: (value * value).floor() as i64,
        })
    }

    /// Radius from a whole number of lattice steps. Always valid.
    pub fn from_steps(steps: u32) -> Self {
        let reach = i64::from(steps);
        Radius {
            value: f64::from(steps),
            reach,
            squared_bound: reach * reach,
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Half extent of the axis-aligned bounding box, `floor(r)`.
    #[inline]
    pub fn reach(&self) -> i64 {
        self.reach
    }

    /// `floor(r²)`
    #[inline]
    pub fn squared_bound(&self) -> i64 {
        self.squared_bound
    }

    /// Whether a squared distance lies inside the closed disk.
    #[inline]
    pub fn contains_squared(&self, squared_distance: i64) -> bool {
        squared_distance <= self.squared_bound
    }
}

impl TryFrom<f64> for Radius {
    type Error = CoreError;

    fn try_from(value: f64) -> CoreResult<Self> {
        Radius::new(value)
    }
}

impl From<Radius> for f64 {
    fn from(radius: Radius) -> Self {
        radius.value
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_radius_bounds() {
        let r = Radius::from_steps(3);
        assert_eq!(r.reach(), 3);
        assert_eq!(r.squared_bound(), 9);
        assert!(r.contains_squared(9));
        assert!(!r.contains_squared(10));
        assert_eq!(Radius::new(3.0).unwrap(), r);
    }

    #[test]
    fn test_fractional_radius_bounds() {
        let r = Radius::new(2.5).unwrap();
        assert_eq!(r.reach(), 2);
        assert_eq!(r.squared_bound(), 6);
        assert!(r.contains_squared(5));
        assert!(!r.contains_squared(7));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(Radius::new(-1.0), Err(CoreError::InvalidRadius(_))));
        assert!(Radius::new(f64::NAN).is_err());
        assert!(Radius::new(f64::INFINITY).is_err());
        assert!(Radius::new(0.0).is_ok());
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let r: Radius = serde_json::from_str("1.5").unwrap();
        assert_eq!(r.squared_bound(), 2);
        assert!(serde_json::from_str::<Radius>("-2.0").is_err());
        assert_eq!(serde_json::to_string(&r).unwrap(), "1.5");
    }
}
