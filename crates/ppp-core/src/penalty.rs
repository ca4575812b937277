//! Ground-truth overlap penalty
//!
//! A tower that overlaps `w` other towers costs `170 · e^(0.17·w)`. The
//! function is convex and grows super-linearly, which is what makes the
//! placement problem hard to hand to a linear solver directly.

/// Cost of an isolated tower.
pub const PENALTY_SCALE: f64 = 170.0;

/// Exponential growth rate per overlapping neighbour.
pub const PENALTY_RATE: f64 = 0.17;

/// Contribution of one tower with `overlap` other towers in penalty range.
#[inline]
pub fn tower_penalty(overlap: usize) -> f64 {
    tower_penalty_at(overlap as f64)
}

/// [`tower_penalty`] extended to real-valued overlap counts.
#[inline]
pub fn tower_penalty_at(overlap: f64) -> f64 {
    PENALTY_SCALE * (PENALTY_RATE * overlap).exp()
}
