// Analysis algorithms: normalization, distances, scanning and aggregation
mod errors;
pub mod cloud_builder;
pub mod distance;
pub mod normalizer;
pub mod pattern_scanner;

pub use cloud_builder::build_prediction_cloud;
pub use distance::{DistanceMetric, Elastic, Rigid, metric_for};
pub use errors::AnalysisError;
pub use normalizer::{normalize_pattern, pct_change_from};
pub use pattern_scanner::{PatternScanner, ScanParams};
