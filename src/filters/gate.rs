use crate::rounding::round_half_even;

/// Value-delta noise gate.
///
/// Compares a rounded candidate against the published value. Both sit on the
/// same decimal grid, so the delta is rounded to that grid too before comparing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseGate {
    value_delta: f64,
    precision: u32,
}

impl NoiseGate {
    pub const fn new(value_delta: f64, precision: u32) -> Self {
        Self {
            value_delta,
            precision,
        }
    }

    pub fn value_delta(&self) -> f64 {
        self.value_delta
    }

    /// Absolute difference between `candidate` and `published`, on the rounding grid.
    pub fn delta(&self, candidate: f64, published: f64) -> f64 {
        round_half_even(libm::fabs(candidate - published), self.precision)
    }

    /// True when the change is non-zero and at least `value_delta`.
    pub fn passes(&self, candidate: f64, published: f64) -> bool {
        let delta = self.delta(candidate, published);
        delta > 0.0 && delta >= self.value_delta
    }
}
