//! Numeric primitives shared by the scoring tables.

/// Affine map of `value` from `[in_min, in_max]` onto `[out_min, out_max]`,
/// clamped to the output range.
///
/// A reversed input domain (`in_min > in_max`) yields a negative slope. `NaN`
/// inputs map to `out_min`. Never fails.
#[must_use]
pub fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let mapped = (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min;
    if mapped.is_nan() {
        return out_min;
    }
    let (lo, hi) = if out_min <= out_max {
        (out_min, out_max)
    } else {
        (out_max, out_min)
    };
    mapped.max(lo).min(hi)
}

/// Gaussian proximity of `value` to `optimal`, in `(0, 1]`.
///
/// Smaller `spread` is stricter. Far-off values decay towards zero rather than
/// failing; a `NaN` input yields `0.0`.
#[must_use]
pub fn bell_curve(value: f64, optimal: f64, spread: f64) -> f64 {
    let diff = value - optimal;
    let result = (-(diff * diff) / (2.0 * spread * spread)).exp();
    if result.is_nan() { 0.0 } else { result }
}

/// Round to the nearest integer and clamp into a `0..=100` score.
///
/// Halves round away from zero, matching the game's rounding for the
/// non-negative range scores live in.
#[must_use]
pub fn to_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
