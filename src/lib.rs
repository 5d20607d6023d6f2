// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod models;
pub mod utils;

// Re-export commonly used types outside of crate (for main.rs and tests)
pub use analysis::{AnalysisError, PatternScanner, ScanParams, build_prediction_cloud};
pub use config::MatchMethod;
pub use domain::Candle;
pub use engine::{
    BacktestConfig, BacktestEvent, BacktestRequest, BacktestRunner, CancelToken, PatternReply,
    PatternRequest, run_backtest, run_pattern_match,
};

// CLI argument parsing
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Find look-alike price patterns and backtest the analog forecast", long_about = None)]
pub struct Cli {
    /// Candle file: delimited text (csv/tsv/semicolon) or a JSON candle array
    #[arg(long, short, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Find historical analogs of the window ending at `selected_index` and print the cloud
    Match {
        #[arg(long)]
        selected_index: usize,

        #[command(flatten)]
        pattern: PatternArgs,
    },

    /// Stream a backtest of the analog forecast over historical test points
    Backtest {
        #[command(flatten)]
        pattern: PatternArgs,

        #[arg(long, default_value_t = config::ANALYSIS.backtest.step_size)]
        step_size: usize,

        /// Randomly sample this many test points instead of striding
        #[arg(long)]
        num_tests: Option<usize>,

        /// Test every eligible point
        #[arg(long, default_value_t = false)]
        test_all: bool,

        /// Seed for `--num-tests` sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Print the per-test details as a table after the stream
        #[arg(long, default_value_t = false)]
        table: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PatternArgs {
    #[arg(long, default_value_t = config::ANALYSIS.pattern.pattern_length)]
    pub pattern_length: usize,

    #[arg(long, default_value_t = config::ANALYSIS.pattern.forecast_horizon)]
    pub forecast_horizon: usize,

    #[arg(long, default_value_t = config::ANALYSIS.pattern.top_k)]
    pub top_k: usize,

    /// rigid (euclidean) or elastic (dtw)
    #[arg(long, default_value_t = config::ANALYSIS.pattern.method)]
    pub method: MatchMethod,
}
