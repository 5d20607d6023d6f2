mod backtest;
mod cancel;
mod messages;
mod pattern_match;
mod requests;

pub use backtest::{BacktestConfig, BacktestRunner, score_forecast, select_test_points};
pub use cancel::CancelToken;
pub use messages::{BacktestEvent, BacktestFailure};
pub use pattern_match::{MatchRequestError, PatternReply, PatternResponse, run_backtest, run_pattern_match};
pub use requests::{BacktestRequest, PatternRequest, RequestError};
