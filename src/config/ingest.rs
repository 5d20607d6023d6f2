//! Delimited-file ingestion configuration

/// Upper bound (average seconds between candles) for one timeframe label.
#[derive(Debug, Clone, Copy)]
pub struct TimeframeBucket {
    pub max_avg_secs: f64,
    pub label: &'static str,
}

pub struct IngestConfig {
    /// A first row containing any of these (case-insensitive) is treated as a header
    pub header_keywords: &'static [&'static str],
    /// Columns a file must provide, in the positional order used for headerless files
    pub required_columns: &'static [&'static str],
    /// Only the first few timestamps are used to guess the timeframe
    pub timeframe_sample: usize,
    /// Checked in order; the first bucket whose bound covers the average gap wins
    pub timeframes: &'static [TimeframeBucket],
    /// Used when the average gap is larger than every bucket
    pub fallback_timeframe: &'static str,
    pub unknown_timeframe: &'static str,
    /// chrono formats tried (after RFC 3339) when reading a date label
    pub date_formats: &'static [&'static str],
}

pub const INGEST: IngestConfig = IngestConfig {
    header_keywords: &["date", "open", "high", "low", "close", "time", "datetime"],
    required_columns: &["date", "open", "high", "low", "close"],
    timeframe_sample: 10,
    timeframes: &[
        TimeframeBucket { max_avg_secs: 90.0, label: "1m" },
        TimeframeBucket { max_avg_secs: 450.0, label: "5m" },
        TimeframeBucket { max_avg_secs: 1_200.0, label: "15m" },
        TimeframeBucket { max_avg_secs: 5_400.0, label: "1h" },
        TimeframeBucket { max_avg_secs: 14_400.0, label: "4h" },
        TimeframeBucket { max_avg_secs: 172_800.0, label: "1d" },
    ],
    fallback_timeframe: "1wk",
    unknown_timeframe: "unknown",
    date_formats: &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%d.%m.%Y %H:%M:%S",
    ],
};
