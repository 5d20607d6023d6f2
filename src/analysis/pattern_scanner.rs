use crate::config::{ANALYSIS, DF, MatchMethod};
use crate::domain::window::{
    full_window, last_candidate_start, lookback_window, outcome_window,
};
use crate::models::{Match, PatternMatchResult};

use super::{AnalysisError, DistanceMetric, metric_for, normalize_pattern, pct_change_from};

/// Parameters for one scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanParams {
    /// The model is blind from this index onwards
    pub selected_index: usize,
    pub pattern_length: usize,
    pub forecast_horizon: usize,
    pub top_k: usize,
    pub method: MatchMethod,
}

pub struct PatternScanner;

impl PatternScanner {
    /// Scans all history before the reference window for look-alike windows.
    ///
    /// The reference window is `closes[selected_index - pattern_length .. selected_index)`.
    /// Leakage rules:
    /// - candidate windows start no later than `reference_start - pattern_length`,
    ///   so each one ends at or before the reference start
    /// - each candidate's outcome window is clipped at `reference_start`
    ///
    /// Candidates with fewer than two outcome points are dropped. Results are sorted
    /// by ascending distance (ties keep scan order) and truncated to `top_k`.
    /// An empty match list is a valid result.
    pub fn find_similar_patterns(
        closes: &[f64],
        params: &ScanParams,
    ) -> Result<PatternMatchResult, AnalysisError> {
        // 1. Reference window
        let reference_bounds = lookback_window(
            closes.len(),
            params.selected_index,
            params.pattern_length,
        )
        .ok_or(AnalysisError::InsufficientHistory {
            selected_index: params.selected_index,
            pattern_length: params.pattern_length,
        })?;
        let reference_start = reference_bounds.start;
        let reference = normalize_pattern(reference_bounds.slice(closes))?;

        let metric = metric_for(params.method);

        // 2. Scan every admissible start, in order
        let mut results: Vec<Match> = crate::trace_time!("Pattern Scan", 20_000, {
            match last_candidate_start(reference_start, params.pattern_length) {
                Some(search_end) => (0..=search_end)
                    .filter_map(|start| {
                        Self::score_candidate(closes, start, &reference, metric, params, reference_start)
                    })
                    .collect(),
                None => Vec::new(),
            }
        });

        // 3. Rank. `sort_by` is stable, so the earlier window wins a tie.
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        let total_matches_scanned = results.len();
        results.truncate(params.top_k);

        log::debug!(
            "[scanner] selected={} ref=[{}, {}) method={} admissible={} kept={}",
            params.selected_index,
            reference_start,
            params.selected_index,
            params.method,
            total_matches_scanned,
            results.len(),
        );

        Ok(PatternMatchResult {
            reference_start,
            reference_end: params.selected_index,
            method: params.method,
            total_matches_scanned,
            matches: results,
        })
    }

    /// Scores one candidate window starting at `start`.
    /// Returns `None` for any candidate that has to be skipped.
    fn score_candidate(
        closes: &[f64],
        start: usize,
        reference: &[f64],
        metric: &dyn DistanceMetric,
        params: &ScanParams,
        reference_start: usize,
    ) -> Option<Match> {
        let window = full_window(closes.len(), start, params.pattern_length)?;

        let distance = match normalize_pattern(window.slice(closes))
            .and_then(|norm_window| metric.distance(reference, &norm_window))
        {
            Ok(d) => d,
            Err(e) => {
                if DF.log_scanner_skips {
                    log::debug!("[scanner] skip candidate {}: {}", start, e);
                }
                return None;
            }
        };

        // What happened AFTER this window, never reaching into the reference
        let outcome = outcome_window(window.end, params.forecast_horizon, reference_start);
        if outcome.len() < ANALYSIS.pattern.min_future_points {
            return None;
        }

        // % change from the candidate's last close
        let anchor = closes[window.end - 1];
        let future_trajectory = pct_change_from(anchor, outcome.slice(closes)).ok()?;

        Some(Match {
            start_index: window.start,
            end_index: window.end,
            distance,
            future_length: future_trajectory.len(),
            future_trajectory,
        })
    }
}
