//! Analysis and computation configuration

use crate::config::MatchMethod;

/// Defaults for a single pattern-match request.
/// Request payloads fall back to these when a field is omitted.
#[derive(Debug, Clone, Copy)]
pub struct PatternDefaults {
    /// Number of candles in the reference window (and in every candidate window)
    pub pattern_length: usize,
    /// How many candles after each candidate are collected as its outcome
    pub forecast_horizon: usize,
    /// How many of the best (lowest distance) candidates are returned
    pub top_k: usize,
    pub method: MatchMethod,
    /// A candidate outcome needs at least this many points to anchor a trajectory
    pub min_future_points: usize,
}

/// Defaults and fixed knobs for the backtest harness.
#[derive(Debug, Clone, Copy)]
pub struct BacktestDefaults {
    /// Stride through the eligible test points when neither `test_all` nor `num_tests` is set
    pub step_size: usize,
    /// First eligible test point is `pattern_length * min_start_multiplier`.
    /// Leaves enough history near the start of the series for a meaningful scan.
    pub min_start_multiplier: usize,
    /// Decimal places on the `progress` percentage
    pub progress_decimals: u32,
    /// Decimal places on every accuracy percentage
    pub score_decimals: u32,
}

/// The Master Analysis Configuration
#[derive(Debug, Clone, Copy)]
pub struct AnalysisConfig {
    pub pattern: PatternDefaults,
    pub backtest: BacktestDefaults,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    pattern: PatternDefaults {
        pattern_length: 20,
        forecast_horizon: 30,
        top_k: 5,
        method: MatchMethod::Rigid,
        min_future_points: 2,
    },

    backtest: BacktestDefaults {
        step_size: 10,
        min_start_multiplier: 3,
        progress_decimals: 1,
        score_decimals: 2,
    },
};
