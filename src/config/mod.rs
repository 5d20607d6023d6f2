//! Configuration module for the pattern-cast engine.

// Can all be private now because we have a public re-export.
mod analysis;
mod debug;
mod ingest;
mod types;

// Re-export commonly used items
pub use analysis::{
    ANALYSIS,
    AnalysisConfig,
    BacktestDefaults,
    PatternDefaults,
};
pub use debug::{DF, LOG_PERFORMANCE, LogFlags};
pub use ingest::{INGEST, IngestConfig, TimeframeBucket};
pub use types::MatchMethod;
