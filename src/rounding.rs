//! Decimal rounding shared by every calculator output.

/// Relative bias applied before flooring so that values such as `2.005`,
/// stored as `2.00499999...`, still round up.
const ROUNDING_BIAS: f64 = 4.0 * f64::EPSILON;

/// Upper bound on the absolute bias.
const MAX_BIAS: f64 = 1e-6;

/// From 2^52 on every f64 is an integer, so there is nothing to round.
const EXACT_INTEGER_LIMIT: f64 = 4_503_599_627_370_496.0;

/// Round half away from zero to `decimals` places.
///
/// For non-negative input this is `floor(value * 10^n + 0.5 + eps) / 10^n`,
/// with `eps` scaled to the magnitude of the value and capped at [`MAX_BIAS`].
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let scaled = value.abs() * factor;
    if scaled >= EXACT_INTEGER_LIMIT {
        return value;
    }
    let bias = (scaled * ROUNDING_BIAS).min(MAX_BIAS);
    let rounded = (scaled + 0.5 + bias).floor() / factor;
    rounded.copysign(value)
}
