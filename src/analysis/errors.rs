use std::fmt;

/// Failures raised by the pure analysis layer.
///
/// None of these cross a component boundary as a panic: the single-match
/// operation reports them to the caller, the backtest loop logs and skips.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The first price of a window is zero (or the window is empty), so no % change exists
    DegenerateAnchor,
    /// Not enough candles before `selected_index` to build the reference window
    InsufficientHistory {
        selected_index: usize,
        pattern_length: usize,
    },
    /// A point-wise metric was given sequences of different (or zero) length
    LengthMismatch { left: usize, right: usize },
    /// No candidate survived the leakage filters, so there is nothing to aggregate
    EmptyMatchSet,
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnalysisError::DegenerateAnchor => {
                write!(f, "Window starts at a zero price; cannot normalize")
            }
            AnalysisError::InsufficientHistory {
                selected_index,
                pattern_length,
            } => write!(
                f,
                "Not enough data before selected point (selected_index={}, pattern_length={})",
                selected_index, pattern_length
            ),
            AnalysisError::LengthMismatch { left, right } => {
                write!(f, "Sequence lengths do not match: {} vs {}", left, right)
            }
            AnalysisError::EmptyMatchSet => write!(f, "No matches to build cloud from"),
        }
    }
}

impl std::error::Error for AnalysisError {}
