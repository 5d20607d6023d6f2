use common_test_utils::*;

use pattern_cast::engine::{MatchRequestError, RequestError};
use pattern_cast::{
    AnalysisError, BacktestEvent, BacktestRequest, CancelToken, MatchMethod, PatternReply,
    PatternRequest, run_backtest, run_pattern_match,
};

#[test]
fn test_pattern_request_defaults() {
    let request: PatternRequest =
        serde_json::from_str(r#"{"data":[{"close":1.0},{"close":2.0}],"selected_index":1}"#).unwrap();
    assert_eq!(request.pattern_length, 20);
    assert_eq!(request.forecast_horizon, 30);
    assert_eq!(request.top_k, 5);
    assert_eq!(request.method, MatchMethod::Rigid);
    assert_eq!(request.validate(), Ok(1));
}

#[test]
fn test_method_aliases_in_payload() {
    let request: PatternRequest =
        serde_json::from_str(r#"{"data":[{"close":1.0}],"selected_index":0,"method":"DTW"}"#).unwrap();
    assert_eq!(request.method, MatchMethod::Elastic);

    let bad = serde_json::from_str::<PatternRequest>(r#"{"selected_index":0,"method":"cosine"}"#);
    assert!(bad.is_err());
}

#[test]
fn test_missing_inputs_are_rejected_first() {
    let request: PatternRequest = serde_json::from_str(r#"{"selected_index":3}"#).unwrap();
    assert_eq!(request.validate(), Err(RequestError::MissingInput("data")));

    let request: PatternRequest = serde_json::from_str(r#"{"data":[{"close":1.0}]}"#).unwrap();
    assert_eq!(request.validate(), Err(RequestError::MissingInput("selected_index")));

    let err = run_pattern_match(&request).unwrap_err();
    assert_eq!(err, MatchRequestError::Request(RequestError::MissingInput("selected_index")));
}

#[test]
fn test_zero_parameters_are_invalid() {
    let mut request = PatternRequest::new(wave_candles(50), 40);
    request.top_k = 0;
    assert_eq!(request.validate(), Err(RequestError::InvalidParameter("top_k")));

    let mut backtest = BacktestRequest::new(wave_candles(50));
    backtest.pattern_length = 0;
    assert_eq!(backtest.validate(), Err(RequestError::InvalidParameter("pattern_length")));
    assert!(run_backtest(&backtest, CancelToken::new()).is_err());
}

#[test]
fn test_pattern_match_response_shape() {
    let mut request = PatternRequest::new(wave_candles(100), 80);
    request.pattern_length = 10;
    request.forecast_horizon = 5;
    request.top_k = 3;

    let response = run_pattern_match(&request).unwrap();
    assert_eq!(response.result.matches.len(), 3);
    let cloud = response.cloud.as_ref().unwrap();
    assert!(!cloud.is_empty() && cloud.len() <= 5);

    let json = serde_json::to_value(PatternReply::from(Ok::<_, MatchRequestError>(response))).unwrap();
    assert_eq!(json["reference_start"], 70);
    assert_eq!(json["reference_end"], 80);
    assert_eq!(json["method"], "rigid");
    assert!(json["total_matches_scanned"].as_u64().unwrap() >= 3);
    let first = &json["matches"][0];
    for key in ["match_start", "match_end", "distance", "future", "future_length"] {
        assert!(first.get(key).is_some(), "missing {}", key);
    }
    assert!(json["cloud"].is_array());
    assert!(json.get("error").is_none());
}

#[test]
fn test_no_matches_omits_cloud() {
    let mut request = PatternRequest::new(wave_candles(40), 20);
    request.pattern_length = 10;
    request.forecast_horizon = 5;

    let response = run_pattern_match(&request).unwrap();
    assert!(response.result.matches.is_empty());
    assert!(response.cloud.is_none());

    let json = serde_json::to_value(PatternReply::from(Ok::<_, MatchRequestError>(response))).unwrap();
    assert_eq!(json["matches"], serde_json::json!([]));
    assert!(json.get("cloud").is_none());
}

#[test]
fn test_insufficient_history_reply() {
    let mut request = PatternRequest::new(wave_candles(100), 5);
    request.pattern_length = 10;

    let result = run_pattern_match(&request);
    assert!(matches!(
        result,
        Err(MatchRequestError::Analysis(AnalysisError::InsufficientHistory { .. }))
    ));

    let json = serde_json::to_value(PatternReply::from(result)).unwrap();
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("Not enough data before selected point")
    );
    assert!(json.get("matches").is_none());
}

#[test]
fn test_backtest_request_defaults() {
    let request: BacktestRequest = serde_json::from_str(r#"{"data":[{"close":1.0}]}"#).unwrap();
    let config = request.config();
    assert_eq!(config.step_size, 10);
    assert_eq!(config.num_tests, None);
    assert!(!config.test_all);
    assert_eq!(request.seed, None);
}

#[test]
fn test_run_backtest_with_seed() {
    let mut request = BacktestRequest::new(wave_candles(200));
    request.pattern_length = 10;
    request.forecast_horizon = 5;
    request.num_tests = Some(8);
    request.seed = Some(11);

    let first: Vec<_> = run_backtest(&request, CancelToken::new()).unwrap().collect();
    let second: Vec<_> = run_backtest(&request, CancelToken::new()).unwrap().collect();
    assert_eq!(first, second);
    assert!(matches!(first.last(), Some(BacktestEvent::Result(_))));
}
