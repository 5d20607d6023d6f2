use serde::{Deserialize, Serialize};

use crate::config::MatchMethod;

/// A historical window that resembles the reference, plus what happened next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// First candle of the candidate window
    #[serde(rename = "match_start")]
    pub start_index: usize,
    /// One past the last candle of the candidate window
    #[serde(rename = "match_end")]
    pub end_index: usize,
    pub distance: f64,
    /// % change of each outcome candle relative to the candidate's last close
    #[serde(rename = "future")]
    pub future_trajectory: Vec<f64>,
    pub future_length: usize,
}

/// Everything one scan produces. `matches` is sorted by ascending distance and
/// already truncated to `top_k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatchResult {
    pub reference_start: usize,
    pub reference_end: usize,
    pub method: MatchMethod,
    /// Admissible candidates found before truncation to `top_k`
    pub total_matches_scanned: usize,
    pub matches: Vec<Match>,
}

impl PatternMatchResult {
    pub fn best(&self) -> Option<&Match> {
        self.matches.first()
    }
}
