//! Backtest harness for the analog forecaster.
//!
//! Entry point: [`BacktestRunner`], a pull-based iterator of [`BacktestEvent`]s.
//!
//! # Approach
//! Given the full candle series, a set of historical test points `t` is chosen
//! from `[pattern_length * 3, total - forecast_horizon)`. For each test point, in
//! ascending order:
//!
//! 1. [`PatternScanner::find_similar_patterns`] runs with `selected_index = t`. The
//!    scanner's own leakage rules guarantee nothing at or after `t` is used.
//! 2. The top matches are aggregated into a prediction cloud.
//! 3. The cloud is scored against the real % moves from `closes[t - 1]` over the
//!    next `forecast_horizon` candles: how often the actual move lands inside the
//!    cloud's `[min, max]`, and whether the final median points the right way.
//! 4. A `Progress` event is emitted whether or not the point could be scored.
//!
//! After the last point a terminal `Result` (or `Error` when nothing was scored)
//! closes the stream. Work happens lazily inside `next()`, one test point per
//! call, so a consumer sees progress as it happens and can stop pulling (or set a
//! [`CancelToken`]) at any time.

use std::iter::FusedIterator;

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::statistics::Statistics;

use crate::analysis::{PatternScanner, ScanParams, build_prediction_cloud, pct_change_from};
use crate::config::{ANALYSIS, DF, MatchMethod};
use crate::domain::window::forward_window;
use crate::domain::{Candle, close_prices};
use crate::models::{BacktestRecord, BacktestSummary, CloudStep};
use crate::utils::{direction_of, round_to};

use super::{BacktestEvent, BacktestFailure, CancelToken};

// ─── Public config ────────────────────────────────────────────────────────────

/// Configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub pattern_length: usize,
    pub forecast_horizon: usize,
    pub top_k: usize,
    pub method: MatchMethod,
    /// Stride through the eligible points. Only used when neither `test_all` nor
    /// `num_tests` applies. Zero is treated as one.
    pub step_size: usize,
    /// Randomly sample this many eligible points (clamped to what exists)
    pub num_tests: Option<usize>,
    /// Test every eligible point. Wins over `num_tests` and `step_size`.
    pub test_all: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            pattern_length: ANALYSIS.pattern.pattern_length,
            forecast_horizon: ANALYSIS.pattern.forecast_horizon,
            top_k: ANALYSIS.pattern.top_k,
            method: ANALYSIS.pattern.method,
            step_size: ANALYSIS.backtest.step_size,
            num_tests: None,
            test_all: false,
        }
    }
}

impl BacktestConfig {
    fn scan_params(&self, selected_index: usize) -> ScanParams {
        ScanParams {
            selected_index,
            pattern_length: self.pattern_length,
            forecast_horizon: self.forecast_horizon,
            top_k: self.top_k,
            method: self.method,
        }
    }
}

// ─── Test-point selection ─────────────────────────────────────────────────────

/// Chooses the test points for a run over `total_candles` candles.
///
/// Eligible points are `[pattern_length * 3, total_candles - forecast_horizon)`.
/// With `test_all` every eligible point is used; with `num_tests > 0` that many
/// are sampled uniformly without replacement and then sorted; otherwise the
/// range is strided by `step_size`. The returned points are always ascending.
pub fn select_test_points<R: Rng + ?Sized>(
    total_candles: usize,
    config: &BacktestConfig,
    rng: &mut R,
) -> Result<Vec<usize>, BacktestFailure> {
    let min_start = config
        .pattern_length
        .saturating_mul(ANALYSIS.backtest.min_start_multiplier);
    let max_end = total_candles.saturating_sub(config.forecast_horizon);

    if min_start >= max_end {
        return Err(BacktestFailure::InsufficientBacktestRange);
    }
    let eligible = max_end - min_start;

    let points = if config.test_all {
        (min_start..max_end).collect_vec()
    } else if let Some(n) = config.num_tests.filter(|&n| n > 0) {
        let amount = n.min(eligible);
        rand::seq::index::sample(rng, eligible, amount)
            .into_iter()
            .map(|offset| min_start + offset)
            .sorted_unstable()
            .collect_vec()
    } else {
        (min_start..max_end)
            .step_by(config.step_size.max(1))
            .collect_vec()
    };

    if points.is_empty() {
        return Err(BacktestFailure::InsufficientBacktestRange);
    }
    Ok(points)
}

// ─── Scoring ──────────────────────────────────────────────────────────────────

/// Scores a cloud against the actual % moves that followed the test point.
///
/// Returns `(range_accuracy, direction_correct)`. `range_accuracy` is the
/// fraction (0..=1) of the first `min(|cloud|, |actual|)` steps whose actual
/// value falls inside that step's `[min, max]`, or 0 when there is nothing to
/// compare. Direction compares the last cloud median with the last actual move;
/// a flat move counts as down.
pub fn score_forecast(cloud: &[CloudStep], actual: &[f64]) -> (f64, bool) {
    let total_steps = cloud.len().min(actual.len());

    let range_accuracy = if total_steps > 0 {
        let hits = cloud
            .iter()
            .zip(actual)
            .filter(|(step, value)| step.contains(**value))
            .count();
        hits as f64 / total_steps as f64
    } else {
        0.0
    };

    let direction_correct = match (cloud.last(), actual.last()) {
        (Some(step), Some(&last)) => direction_of(step.median) == direction_of(last),
        _ => false,
    };

    (range_accuracy, direction_correct)
}

// ─── Runner ───────────────────────────────────────────────────────────────────

enum RunState {
    /// Test points not chosen yet; nothing has been emitted
    Pending,
    Running {
        points: Vec<usize>,
        next: usize,
        records: Vec<BacktestRecord>,
    },
    /// The terminal event has been emitted
    Finished,
}

/// Lazy, finite, non-restartable stream of backtest events.
///
/// Each call to `next()` does at most one scan. The iterator is fused: after the
/// terminal event it only returns `None`.
pub struct BacktestRunner<'a, R = StdRng> {
    candles: &'a [Candle],
    closes: Vec<f64>,
    config: BacktestConfig,
    rng: R,
    cancel: CancelToken,
    state: RunState,
}

impl<'a> BacktestRunner<'a, StdRng> {
    /// Runner whose sampling (if any) is seeded from OS entropy.
    pub fn new(candles: &'a [Candle], config: BacktestConfig) -> Self {
        Self::with_rng(candles, config, StdRng::from_entropy())
    }

    /// Runner whose sampling is reproducible for a given seed.
    pub fn seeded(candles: &'a [Candle], config: BacktestConfig, seed: u64) -> Self {
        Self::with_rng(candles, config, StdRng::seed_from_u64(seed))
    }
}

impl<'a, R: Rng> BacktestRunner<'a, R> {
    /// Runner with an injected random source (only used on the `num_tests` path).
    pub fn with_rng(candles: &'a [Candle], config: BacktestConfig, rng: R) -> Self {
        Self {
            candles,
            closes: close_prices(candles),
            config,
            rng,
            cancel: CancelToken::default(),
            state: RunState::Pending,
        }
    }

    /// Attach a cancellation signal, checked before each test point.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Runs the pipeline for one test point. `None` means "skip, don't score".
    fn evaluate_point(&self, test_index: usize) -> Option<BacktestRecord> {
        let params = self.config.scan_params(test_index);

        let scan = match PatternScanner::find_similar_patterns(&self.closes, &params) {
            Ok(scan) if !scan.matches.is_empty() => scan,
            Ok(_) => {
                log::debug!("[backtest] t={}: no admissible matches, skipping", test_index);
                return None;
            }
            Err(e) => {
                log::debug!("[backtest] t={}: scan failed ({}), skipping", test_index, e);
                return None;
            }
        };

        let cloud = build_prediction_cloud(&scan.matches).ok()?;
        if cloud.is_empty() {
            return None;
        }

        // Real outcome, as % change from the last candle the model could see
        let base_price = *self.closes.get(test_index.checked_sub(1)?)?;
        let future = forward_window(self.closes.len(), test_index, self.config.forecast_horizon);
        let actual_future = match pct_change_from(base_price, future.slice(&self.closes)) {
            Ok(moves) => moves,
            Err(e) => {
                log::debug!("[backtest] t={}: {}, skipping", test_index, e);
                return None;
            }
        };

        let (range_accuracy, direction_correct) = score_forecast(&cloud, &actual_future);

        if DF.log_backtest_points {
            log::info!(
                "[backtest] t={} | matches={} | range_acc={:.1}% | direction_ok={}",
                test_index,
                scan.matches.len(),
                range_accuracy * 100.0,
                direction_correct,
            );
        }

        Some(BacktestRecord {
            test_index,
            date: self.candles.get(test_index).and_then(|c| c.date.clone()),
            matches_found: scan.matches.len(),
            range_accuracy: round_to(range_accuracy * 100.0, ANALYSIS.backtest.score_decimals),
            direction_correct,
        })
    }

    fn summarize(&self, records: Vec<BacktestRecord>) -> BacktestSummary {
        let decimals = ANALYSIS.backtest.score_decimals;
        let avg_range_accuracy = records.iter().map(|r| r.range_accuracy).mean();
        let direction_accuracy = records
            .iter()
            .map(|r| if r.direction_correct { 100.0 } else { 0.0 })
            .mean();

        BacktestSummary {
            total_tests: records.len(),
            avg_range_accuracy: round_to(avg_range_accuracy, decimals),
            direction_accuracy: round_to(direction_accuracy, decimals),
            method: self.config.method,
            pattern_length: self.config.pattern_length,
            forecast_horizon: self.config.forecast_horizon,
            details: records,
        }
    }

    fn finish(&self, records: Vec<BacktestRecord>, total_points: usize) -> BacktestEvent {
        if records.is_empty() {
            log::warn!(
                "[backtest] all {} test points were skipped; no results",
                total_points
            );
            return BacktestFailure::NoBacktestResults.into();
        }

        let summary = self.summarize(records);
        log::info!(
            "[backtest] COMPLETE | method={} | scored={}/{} | avg_range_acc={:.2}% | direction_acc={:.2}%",
            summary.method,
            summary.total_tests,
            total_points,
            summary.avg_range_accuracy,
            summary.direction_accuracy,
        );
        BacktestEvent::Result(summary)
    }
}

impl<R: Rng> Iterator for BacktestRunner<'_, R> {
    type Item = BacktestEvent;

    fn next(&mut self) -> Option<Self::Item> {
        // Anything that returns early leaves the state as Finished.
        match std::mem::replace(&mut self.state, RunState::Finished) {
            RunState::Finished => None,

            RunState::Pending => {
                match select_test_points(self.closes.len(), &self.config, &mut self.rng) {
                    Ok(points) => {
                        log::info!(
                            "[backtest] {} candles | method={} | pattern={} | horizon={} | top_k={} | {} test points",
                            self.closes.len(),
                            self.config.method,
                            self.config.pattern_length,
                            self.config.forecast_horizon,
                            self.config.top_k,
                            points.len(),
                        );
                        self.state = RunState::Running {
                            points,
                            next: 0,
                            records: Vec::new(),
                        };
                        self.next()
                    }
                    Err(failure) => {
                        log::warn!(
                            "[backtest] {} candles, pattern={}, horizon={}: {}",
                            self.closes.len(),
                            self.config.pattern_length,
                            self.config.forecast_horizon,
                            failure,
                        );
                        Some(failure.into())
                    }
                }
            }

            RunState::Running {
                points,
                next,
                mut records,
            } => {
                let total = points.len();
                if next >= total {
                    return Some(self.finish(records, total));
                }
                if self.cancel.is_cancelled() {
                    log::info!("[backtest] cancelled after {}/{} test points", next, total);
                    return Some(BacktestFailure::Cancelled.into());
                }

                if let Some(record) = self.evaluate_point(points[next]) {
                    records.push(record);
                }

                let current = next + 1;
                let progress = round_to(
                    current as f64 / total as f64 * 100.0,
                    ANALYSIS.backtest.progress_decimals,
                );
                self.state = RunState::Running {
                    points,
                    next: current,
                    records,
                };
                Some(BacktestEvent::Progress {
                    progress,
                    current,
                    total,
                })
            }
        }
    }
}

impl<R: Rng> FusedIterator for BacktestRunner<'_, R> {}
