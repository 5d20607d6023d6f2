/// Percentile of an ascending-sorted slice, linearly interpolated between the two
/// closest ranks (`rank = pct / 100 * (n - 1)`).
///
/// `pct` is clamped to `[0, 100]`. Returns NaN for an empty slice.
#[inline]
pub fn percentile_linear(sorted: &[f64], pct: f64) -> f64 {
    let Some(&first) = sorted.first() else {
        return f64::NAN;
    };
    if sorted.len() == 1 {
        return first;
    }

    let rank = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Rounds to a fixed number of decimal places (half away from zero).
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// +1 for a strictly positive move, -1 otherwise. A flat move counts as down.
#[inline]
pub fn direction_of(pct_move: f64) -> i8 {
    if pct_move > 0.0 { 1 } else { -1 }
}
