//! Decimal rounding with ties resolved to the even neighbour.
//!
//! Ties are decided on the exact binary value, not on a scaled copy of it:
//! `0.15` is stored just below the tie and rounds down, `20.05` just above it
//! and rounds up. Formatting with an explicit precision does exactly that
//! (half-to-even on the exact decimal expansion), so the digits come from
//! `core::fmt` and are parsed back to the nearest f64.

use alloc::format;

/// Magnitude from which every f64 is already an integer.
const INTEGRAL_LIMIT: f64 = 4_503_599_627_370_496.0; // 2^52

/// Round `value` to `precision` decimal digits, ties to even.
///
/// `2.5 -> 2`, `3.5 -> 4`, `-2.5 -> -2`. Non-finite input is returned as is.
pub fn round_half_even(value: f64, precision: u32) -> f64 {
    if !value.is_finite() || libm::fabs(value) >= INTEGRAL_LIMIT {
        return value;
    }

    let digits = format!("{:.*}", precision as usize, value);
    digits.parse::<f64>().unwrap_or(value)
}
