use serde::{Deserialize, Serialize};

use crate::config::MatchMethod;

/// Score for one test point that produced a usable cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRecord {
    pub test_index: usize,
    /// Date label of the test candle, when the input carried one
    pub date: Option<String>,
    pub matches_found: usize,
    /// Share of forecast steps whose actual move landed inside `[min, max]`, as a percentage
    pub range_accuracy: f64,
    pub direction_correct: bool,
}

/// Aggregate statistics for one completed backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    /// Number of scored test points (skipped points are not counted)
    pub total_tests: usize,
    pub avg_range_accuracy: f64,
    pub direction_accuracy: f64,
    pub method: MatchMethod,
    pub pattern_length: usize,
    pub forecast_horizon: usize,
    pub details: Vec<BacktestRecord>,
}
