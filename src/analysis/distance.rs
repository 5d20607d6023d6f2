//! Similarity measures between two normalized sequences.
//!
//! Lower is more similar. Both metrics return finite, non-negative values for
//! finite input.

use super::AnalysisError;
use crate::config::MatchMethod;

pub trait DistanceMetric {
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64, AnalysisError>;
}

/// Point-wise Euclidean distance. Lengths must match.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rigid;

/// Dynamic time warping over squared point differences.
///
/// Any monotonic, non-decreasing alignment of `a` onto `b` is allowed (steps
/// down, right, or diagonal through the cost matrix). The result is the square
/// root of the cheapest path's accumulated cost, which makes it agree with
/// [`Rigid`] whenever the diagonal is the optimal path.
#[derive(Debug, Clone, Copy, Default)]
pub struct Elastic;

impl DistanceMetric for Rigid {
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64, AnalysisError> {
        if a.len() != b.len() {
            return Err(AnalysisError::LengthMismatch {
                left: a.len(),
                right: b.len(),
            });
        }
        let sum_sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
        Ok(sum_sq.sqrt())
    }
}

impl DistanceMetric for Elastic {
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64, AnalysisError> {
        if a.is_empty() || b.is_empty() {
            return Err(AnalysisError::LengthMismatch {
                left: a.len(),
                right: b.len(),
            });
        }

        // Two rolling rows of the (n+1) x (m+1) cumulative cost matrix.
        let m = b.len();
        let mut prev = vec![f64::INFINITY; m + 1];
        let mut curr = vec![f64::INFINITY; m + 1];
        prev[0] = 0.0;

        for &x in a {
            curr[0] = f64::INFINITY;
            for j in 1..=m {
                let diff = x - b[j - 1];
                let best = prev[j].min(curr[j - 1]).min(prev[j - 1]);
                curr[j] = diff * diff + best;
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        Ok(prev[m].sqrt())
    }
}

/// The metric backing a [`MatchMethod`].
pub fn metric_for(method: MatchMethod) -> &'static dyn DistanceMetric {
    match method {
        MatchMethod::Rigid => &Rigid,
        MatchMethod::Elastic => &Elastic,
    }
}
