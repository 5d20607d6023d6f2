mod backtest_report;
mod pattern_match;
mod prediction_cloud;

pub use {
    backtest_report::{BacktestRecord, BacktestSummary},
    pattern_match::{Match, PatternMatchResult},
    prediction_cloud::{CloudStep, PredictionCloud},
};
