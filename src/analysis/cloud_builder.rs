use itertools::Itertools;

use crate::models::{CloudStep, Match, PredictionCloud};
use crate::utils::percentile_linear;

use super::AnalysisError;

/// Aggregates matched outcomes into per-step distribution statistics.
///
/// Step `s` (1-indexed) summarises `future_trajectory[s - 1]` of every match whose
/// outcome is long enough. Steps with no contributing match are left out rather
/// than padded. Quartiles use linear interpolation between the closest ranks.
pub fn build_prediction_cloud(matches: &[Match]) -> Result<PredictionCloud, AnalysisError> {
    let max_len = matches
        .iter()
        .map(|m| m.future_trajectory.len())
        .max()
        .ok_or(AnalysisError::EmptyMatchSet)?;

    let cloud = (0..max_len)
        .filter_map(|s| {
            let values = matches
                .iter()
                .filter_map(|m| m.future_trajectory.get(s).copied())
                .sorted_by(|a, b| a.total_cmp(b))
                .collect_vec();

            let (&min, &max) = (values.first()?, values.last()?);

            Some(CloudStep {
                step: s + 1,
                min,
                max,
                median: percentile_linear(&values, 50.0),
                p25: percentile_linear(&values, 25.0),
                p75: percentile_linear(&values, 75.0),
                sample_count: values.len(),
            })
        })
        .collect();

    Ok(cloud)
}
