//! Debugging feature flags.

pub struct LogFlags {
    /// Activate trace_time macro (for cool scope-level timing)
    pub log_performance: bool,

    /// Log every candidate the scanner rejects (very noisy on long series)
    pub log_scanner_skips: bool,

    /// Log each backtest test point as it is scored
    pub log_backtest_points: bool,

    /// Log ingestion decisions (separator, header detection, dropped rows)
    pub log_ingest: bool,
}

pub const DF: LogFlags = LogFlags {
    log_performance: false,
    log_scanner_skips: false,
    log_backtest_points: false,
    log_ingest: true,
};

/// Read by the `trace_time!` macro.
pub const LOG_PERFORMANCE: bool = DF.log_performance;
