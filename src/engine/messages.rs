use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::BacktestSummary;

/// One message in a backtest stream.
///
/// A stream is zero or more `Progress` events followed by exactly one terminal
/// event (`Error` or `Result`). Nothing follows the terminal event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BacktestEvent {
    Progress {
        /// Percentage of test points processed, 1 decimal
        progress: f64,
        current: usize,
        total: usize,
    },
    Error {
        message: String,
    },
    Result(BacktestSummary),
}

impl BacktestEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BacktestEvent::Progress { .. })
    }
}

/// Reasons a backtest ends without a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacktestFailure {
    /// No valid test points for the given parameters
    InsufficientBacktestRange,
    /// Every selected test point was skipped
    NoBacktestResults,
    /// The consumer asked the run to stop
    Cancelled,
}

impl fmt::Display for BacktestFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BacktestFailure::InsufficientBacktestRange => write!(f, "insufficient data"),
            BacktestFailure::NoBacktestResults => write!(f, "no results"),
            BacktestFailure::Cancelled => write!(f, "backtest cancelled"),
        }
    }
}

impl std::error::Error for BacktestFailure {}

impl From<BacktestFailure> for BacktestEvent {
    fn from(failure: BacktestFailure) -> Self {
        BacktestEvent::Error {
            message: failure.to_string(),
        }
    }
}
