use anyhow::{Context, Result};
use clap::Parser;
use tabled::{Table, Tabled};

use pattern_cast::data::{CandleSource, FileSource};
use pattern_cast::models::BacktestRecord;
use pattern_cast::{
    BacktestEvent, BacktestRequest, CancelToken, Cli, Command, PatternReply, PatternRequest,
    run_backtest, run_pattern_match,
};

#[derive(Tabled)]
struct DetailRow {
    #[tabled(rename = "Test")]
    test_index: usize,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Matches")]
    matches_found: usize,
    #[tabled(rename = "Range Acc %")]
    range_accuracy: String,
    #[tabled(rename = "Direction")]
    direction: &'static str,
}

impl From<&BacktestRecord> for DetailRow {
    fn from(r: &BacktestRecord) -> Self {
        Self {
            test_index: r.test_index,
            date: r.date.clone().unwrap_or_else(|| "-".to_string()),
            matches_found: r.matches_found,
            range_accuracy: format!("{:.2}", r.range_accuracy),
            direction: if r.direction_correct { "hit" } else { "miss" },
        }
    }
}

fn main() -> Result<()> {
    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Warn)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("pattern_cast"), my_code_level)
        .parse_default_env()
        .init();

    let args = Cli::parse();
    let path = args.file.context("--file is required")?;
    let series = FileSource::new(path).load()?;

    match args.command {
        Command::Match {
            selected_index,
            pattern,
        } => {
            let request = PatternRequest {
                data: series.candles,
                selected_index: Some(selected_index),
                pattern_length: pattern.pattern_length,
                forecast_horizon: pattern.forecast_horizon,
                top_k: pattern.top_k,
                method: pattern.method,
            };
            let reply = PatternReply::from(run_pattern_match(&request));
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }

        Command::Backtest {
            pattern,
            step_size,
            num_tests,
            test_all,
            seed,
            table,
        } => {
            let request = BacktestRequest {
                data: series.candles,
                pattern_length: pattern.pattern_length,
                forecast_horizon: pattern.forecast_horizon,
                top_k: pattern.top_k,
                method: pattern.method,
                step_size,
                num_tests,
                test_all,
                seed,
            };
            let runner = run_backtest(&request, CancelToken::new())?;

            let mut summary = None;
            for event in runner {
                // Same framing the streaming endpoint uses
                println!("data: {}\n", serde_json::to_string(&event)?);
                if let BacktestEvent::Result(s) = event {
                    summary = Some(s);
                }
            }

            if let Some(summary) = summary.filter(|_| table) {
                let rows: Vec<DetailRow> = summary.details.iter().map(DetailRow::from).collect();
                println!("{}", Table::new(rows));
            }
        }
    }

    Ok(())
}
