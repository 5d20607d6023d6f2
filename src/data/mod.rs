// Ingestion adapters: turn files and uploads into a canonical candle sequence.
mod csv_upload;
mod provider;
mod timeframe;

pub use {
    csv_upload::{ParsedUpload, UploadError, detect_separator, parse_delimited},
    provider::{CandleSource, FileSource, LoadedSeries},
    timeframe::detect_timeframe,
};
