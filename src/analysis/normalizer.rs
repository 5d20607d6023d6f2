use super::AnalysisError;

/// Converts a price window into % change from its first price, so windows at
/// different price levels can be compared by shape alone.
///
/// `out[0]` is always `0.0`. Fails with [`AnalysisError::DegenerateAnchor`] when
/// the window is empty or starts at zero.
pub fn normalize_pattern(prices: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    let &anchor = prices.first().ok_or(AnalysisError::DegenerateAnchor)?;
    pct_change_from(anchor, prices)
}

/// % change of every price relative to an external `anchor` price.
pub fn pct_change_from(anchor: f64, prices: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    if anchor == 0.0 || !anchor.is_finite() {
        return Err(AnalysisError::DegenerateAnchor);
    }
    Ok(prices.iter().map(|&p| (p - anchor) / anchor * 100.0).collect())
}
