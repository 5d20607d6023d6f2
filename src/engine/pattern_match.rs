use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::analysis::{AnalysisError, PatternScanner, ScanParams, build_prediction_cloud};
use crate::domain::close_prices;
use crate::models::{PatternMatchResult, PredictionCloud};

use super::{BacktestRequest, BacktestRunner, CancelToken, PatternRequest, RequestError};

/// Successful pattern-match response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternResponse {
    #[serde(flatten)]
    pub result: PatternMatchResult,
    /// Absent when the scan found no admissible matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud: Option<PredictionCloud>,
}

/// Why a pattern-match request produced no response.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchRequestError {
    Request(RequestError),
    Analysis(AnalysisError),
}

impl fmt::Display for MatchRequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchRequestError::Request(e) => write!(f, "{}", e),
            MatchRequestError::Analysis(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for MatchRequestError {}

impl From<RequestError> for MatchRequestError {
    fn from(e: RequestError) -> Self {
        MatchRequestError::Request(e)
    }
}

impl From<AnalysisError> for MatchRequestError {
    fn from(e: AnalysisError) -> Self {
        MatchRequestError::Analysis(e)
    }
}

/// Wire shape of a pattern-match reply: either the response or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PatternReply {
    Ok(PatternResponse),
    Err { error: String },
}

impl From<Result<PatternResponse, MatchRequestError>> for PatternReply {
    fn from(result: Result<PatternResponse, MatchRequestError>) -> Self {
        match result {
            Ok(response) => PatternReply::Ok(response),
            Err(e) => PatternReply::Err {
                error: e.to_string(),
            },
        }
    }
}

/// Pattern-match operation: scan, then aggregate the top matches into a cloud.
///
/// `InsufficientHistory` (and any other analysis failure on the reference
/// window) aborts the request. No admissible candidates is NOT an error: the
/// response carries an empty match list and no cloud.
pub fn run_pattern_match(request: &PatternRequest) -> Result<PatternResponse, MatchRequestError> {
    let selected_index = request.validate()?;

    let closes = close_prices(&request.data);
    let params = ScanParams {
        selected_index,
        pattern_length: request.pattern_length,
        forecast_horizon: request.forecast_horizon,
        top_k: request.top_k,
        method: request.method,
    };

    let result = PatternScanner::find_similar_patterns(&closes, &params)?;

    let cloud = match build_prediction_cloud(&result.matches) {
        Ok(cloud) => Some(cloud),
        Err(AnalysisError::EmptyMatchSet) => {
            log::info!(
                "[pattern] selected={}: no admissible matches in {} candles",
                selected_index,
                closes.len()
            );
            None
        }
        Err(e) => return Err(e.into()),
    };

    Ok(PatternResponse { result, cloud })
}

/// Backtest operation: validates the request and returns the event stream.
///
/// Nothing is computed until the caller pulls the first event.
pub fn run_backtest(
    request: &BacktestRequest,
    cancel: CancelToken,
) -> Result<BacktestRunner<'_, StdRng>, RequestError> {
    request.validate()?;

    let rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Ok(BacktestRunner::with_rng(&request.data, request.config(), rng).with_cancel(cancel))
}
