use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::domain::Candle;

use super::{detect_timeframe, parse_delimited};

/// A candle sequence plus the timeframe label detected for it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub candles: Vec<Candle>,
    pub timeframe: String,
}

/// Abstract interface for anything that can hand the engine a candle sequence.
///
/// Network market-data providers live outside this crate; they only need to
/// implement this trait.
pub trait CandleSource {
    fn load(&self) -> Result<LoadedSeries>;
}

/// Reads candles from a local file.
///
/// `.json` files hold either a bare array of candles or a `{"data": [...]}`
/// payload; anything else goes through the delimited-text parser.
pub struct FileSource {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonCandles {
    Bare(Vec<Candle>),
    Payload { data: Vec<Candle> },
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

impl CandleSource for FileSource {
    fn load(&self) -> Result<LoadedSeries> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let series = if self.is_json() {
            let parsed: JsonCandles = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a candle array or payload", self.path.display()))?;
            let candles = match parsed {
                JsonCandles::Bare(candles) | JsonCandles::Payload { data: candles } => candles,
            };
            let dates: Vec<&str> = candles.iter().filter_map(|c| c.date.as_deref()).collect();
            let timeframe = detect_timeframe(&dates).to_string();
            LoadedSeries { candles, timeframe }
        } else {
            let upload = parse_delimited(&text)
                .with_context(|| format!("Failed to parse {}", self.path.display()))?;
            LoadedSeries {
                candles: upload.candles,
                timeframe: upload.timeframe,
            }
        };

        if series.candles.is_empty() {
            bail!("{} contains no usable candles", self.path.display());
        }

        log::info!(
            "Loaded {} candles ({}) from {}",
            series.candles.len(),
            series.timeframe,
            self.path.display()
        );
        Ok(series)
    }
}
