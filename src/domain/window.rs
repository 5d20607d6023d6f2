//! Bounds helpers for slicing a price series.
//!
//! Every window in the engine is a half-open index range `[start, end)`. These
//! helpers clamp at the series boundaries instead of panicking, and report the
//! cases the scanner and backtest need to skip on (short tail, not enough
//! lookback, an outcome window with no room before the reference).

/// Half-open index range `[start, end)` into a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub start: usize,
    pub end: usize,
}

impl WindowBounds {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end: end.max(start) }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Borrows the window out of `series`, clipped to its length.
    pub fn slice<'a>(&self, series: &'a [f64]) -> &'a [f64] {
        let end = self.end.min(series.len());
        let start = self.start.min(end);
        &series[start..end]
    }
}

/// The `len` values that end (exclusive) at `end`.
///
/// `None` when there are fewer than `len` values before `end`, or when `end`
/// lies past the end of the series.
pub fn lookback_window(series_len: usize, end: usize, len: usize) -> Option<WindowBounds> {
    if end > series_len {
        return None;
    }
    let start = end.checked_sub(len)?;
    Some(WindowBounds::new(start, end))
}

/// The `len` values that start at `start`.
///
/// `None` for a short tail, i.e. when the series ends before the window is full.
pub fn full_window(series_len: usize, start: usize, len: usize) -> Option<WindowBounds> {
    let end = start.checked_add(len)?;
    (end <= series_len).then(|| WindowBounds::new(start, end))
}

/// Last admissible candidate start (inclusive) for a reference window starting at
/// `reference_start`.
///
/// Candidates must start at least one pattern length before the reference, so a
/// candidate window ends no later than `reference_start`. `None` when the
/// reference sits too close to the start of the series for any candidate.
pub fn last_candidate_start(reference_start: usize, pattern_length: usize) -> Option<usize> {
    reference_start.checked_sub(pattern_length)
}

/// Outcome window following a candidate that ends at `candidate_end`.
///
/// Holds up to `horizon` values and is clipped at `barrier` (the reference start),
/// so no outcome ever overlaps the reference window. Empty when the candidate
/// already touches the barrier.
pub fn outcome_window(candidate_end: usize, horizon: usize, barrier: usize) -> WindowBounds {
    let end = candidate_end.saturating_add(horizon).min(barrier);
    WindowBounds::new(candidate_end, end)
}

/// Up to `horizon` values starting at `start`, stopping early at the series end.
pub fn forward_window(series_len: usize, start: usize, horizon: usize) -> WindowBounds {
    let start = start.min(series_len);
    let end = start.saturating_add(horizon).min(series_len);
    WindowBounds::new(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookback_requires_enough_history() {
        assert_eq!(lookback_window(100, 80, 10), Some(WindowBounds::new(70, 80)));
        assert_eq!(lookback_window(100, 10, 10), Some(WindowBounds::new(0, 10)));
        assert_eq!(lookback_window(100, 5, 20), None);
        assert_eq!(lookback_window(100, 101, 10), None);
    }

    #[test]
    fn full_window_rejects_short_tail() {
        assert_eq!(full_window(10, 5, 5), Some(WindowBounds::new(5, 10)));
        assert_eq!(full_window(10, 6, 5), None);
        assert_eq!(full_window(10, usize::MAX, 5), None);
    }

    #[test]
    fn outcome_window_is_clipped_at_barrier() {
        assert_eq!(outcome_window(20, 5, 70), WindowBounds::new(20, 25));
        assert_eq!(outcome_window(68, 5, 70), WindowBounds::new(68, 70));
        assert!(outcome_window(70, 5, 70).is_empty());
        assert!(outcome_window(75, 5, 70).is_empty());
    }

    #[test]
    fn forward_window_stops_at_series_end() {
        assert_eq!(forward_window(100, 95, 10), WindowBounds::new(95, 100));
        assert!(forward_window(100, 100, 10).is_empty());
        assert!(forward_window(100, 120, 10).is_empty());
    }

    #[test]
    fn slice_clamps_to_series() {
        let series = [1.0, 2.0, 3.0];
        assert_eq!(WindowBounds::new(1, 10).slice(&series), &[2.0, 3.0]);
        assert!(WindowBounds::new(5, 10).slice(&series).is_empty());
    }

    #[test]
    fn candidate_start_leaves_one_pattern_gap() {
        assert_eq!(last_candidate_start(70, 10), Some(60));
        assert_eq!(last_candidate_start(5, 10), None);
    }
}
