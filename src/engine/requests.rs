//! Explicit request schemas for the two public operations.
//!
//! Optional fields fall back to the defaults in [`ANALYSIS`]. Required fields are
//! checked by `validate()` before any computation runs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{ANALYSIS, MatchMethod};
use crate::domain::Candle;

use super::BacktestConfig;

fn default_pattern_length() -> usize {
    ANALYSIS.pattern.pattern_length
}
fn default_forecast_horizon() -> usize {
    ANALYSIS.pattern.forecast_horizon
}
fn default_top_k() -> usize {
    ANALYSIS.pattern.top_k
}
fn default_method() -> MatchMethod {
    ANALYSIS.pattern.method
}
fn default_step_size() -> usize {
    ANALYSIS.backtest.step_size
}

/// Rejections raised before any computation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// A required field is absent (or, for `data`, empty)
    MissingInput(&'static str),
    /// A field is present but unusable (e.g. a zero length)
    InvalidParameter(&'static str),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RequestError::MissingInput(field) => write!(f, "Missing {}", field),
            RequestError::InvalidParameter(field) => {
                write!(f, "Invalid {}: must be greater than zero", field)
            }
        }
    }
}

impl std::error::Error for RequestError {}

fn require_positive(value: usize, field: &'static str) -> Result<(), RequestError> {
    if value == 0 {
        return Err(RequestError::InvalidParameter(field));
    }
    Ok(())
}

/// Pattern-match request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRequest {
    #[serde(default)]
    pub data: Vec<Candle>,
    #[serde(default)]
    pub selected_index: Option<usize>,
    #[serde(default = "default_pattern_length")]
    pub pattern_length: usize,
    #[serde(default = "default_forecast_horizon")]
    pub forecast_horizon: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_method")]
    pub method: MatchMethod,
}

impl PatternRequest {
    /// Request with default parameters for the window ending at `selected_index`.
    pub fn new(data: Vec<Candle>, selected_index: usize) -> Self {
        Self {
            data,
            selected_index: Some(selected_index),
            pattern_length: default_pattern_length(),
            forecast_horizon: default_forecast_horizon(),
            top_k: default_top_k(),
            method: default_method(),
        }
    }

    /// Returns the selected index once every required field is present and sane.
    pub fn validate(&self) -> Result<usize, RequestError> {
        if self.data.is_empty() {
            return Err(RequestError::MissingInput("data"));
        }
        let selected_index = self
            .selected_index
            .ok_or(RequestError::MissingInput("selected_index"))?;
        require_positive(self.pattern_length, "pattern_length")?;
        require_positive(self.forecast_horizon, "forecast_horizon")?;
        require_positive(self.top_k, "top_k")?;
        Ok(selected_index)
    }
}

/// Backtest request: the pattern parameters plus test-point selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    #[serde(default)]
    pub data: Vec<Candle>,
    #[serde(default = "default_pattern_length")]
    pub pattern_length: usize,
    #[serde(default = "default_forecast_horizon")]
    pub forecast_horizon: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_method")]
    pub method: MatchMethod,
    #[serde(default = "default_step_size")]
    pub step_size: usize,
    #[serde(default)]
    pub num_tests: Option<usize>,
    #[serde(default)]
    pub test_all: bool,
    /// Seed for `num_tests` sampling. Entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl BacktestRequest {
    pub fn new(data: Vec<Candle>) -> Self {
        Self {
            data,
            pattern_length: default_pattern_length(),
            forecast_horizon: default_forecast_horizon(),
            top_k: default_top_k(),
            method: default_method(),
            step_size: default_step_size(),
            num_tests: None,
            test_all: false,
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.data.is_empty() {
            return Err(RequestError::MissingInput("data"));
        }
        require_positive(self.pattern_length, "pattern_length")?;
        require_positive(self.forecast_horizon, "forecast_horizon")?;
        require_positive(self.top_k, "top_k")?;
        Ok(())
    }

    pub fn config(&self) -> BacktestConfig {
        BacktestConfig {
            pattern_length: self.pattern_length,
            forecast_horizon: self.forecast_horizon,
            top_k: self.top_k,
            method: self.method,
            step_size: self.step_size,
            num_tests: self.num_tests,
            test_all: self.test_all,
        }
    }
}
