use serde::{Deserialize, Serialize};

/// Distribution of matched outcomes at one forecast step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudStep {
    /// 1-indexed forecast step
    pub step: usize,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
    #[serde(rename = "num_samples")]
    pub sample_count: usize,
}

impl CloudStep {
    /// True when `value` falls inside the observed `[min, max]` band.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// One entry per forecast step that had at least one contributing match.
pub type PredictionCloud = Vec<CloudStep>;
