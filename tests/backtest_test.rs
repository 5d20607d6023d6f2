use common_test_utils::*;

use std::thread;

use rand::SeedableRng;
use rand::rngs::StdRng;

use pattern_cast::engine::{score_forecast, select_test_points};
use pattern_cast::models::CloudStep;
use pattern_cast::{BacktestConfig, BacktestEvent, BacktestRunner, CancelToken, MatchMethod};

fn config(pattern_length: usize, forecast_horizon: usize) -> BacktestConfig {
    BacktestConfig {
        pattern_length,
        forecast_horizon,
        top_k: 5,
        method: MatchMethod::Rigid,
        step_size: 10,
        num_tests: None,
        test_all: false,
    }
}

fn progress_count(events: &[BacktestEvent]) -> usize {
    events.iter().filter(|e| !e.is_terminal()).count()
}

fn assert_protocol(events: &[BacktestEvent]) {
    let (last, rest) = events.split_last().expect("stream is never empty");
    assert!(last.is_terminal());
    assert!(rest.iter().all(|e| !e.is_terminal()));
}

// ─── Test-point selection ─────────────────────────────────────────────────────

#[test]
fn test_select_all_points() {
    let mut cfg = config(20, 10);
    cfg.test_all = true;
    let points = select_test_points(200, &cfg, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(points, (60..190).collect::<Vec<_>>());
}

#[test]
fn test_sampled_points_clamp_to_eligible() {
    let mut cfg = config(20, 90);
    cfg.num_tests = Some(1_000);
    let points = select_test_points(200, &cfg, &mut StdRng::seed_from_u64(7)).unwrap();
    assert_eq!(points, (60..110).collect::<Vec<_>>());
}

#[test]
fn test_sampled_points_are_sorted_and_distinct() {
    let mut cfg = config(10, 5);
    cfg.num_tests = Some(15);
    let points = select_test_points(300, &cfg, &mut StdRng::seed_from_u64(3)).unwrap();
    assert_eq!(points.len(), 15);
    assert!(points.windows(2).all(|w| w[0] < w[1]));
    assert!(points.iter().all(|&t| (30..295).contains(&t)));
}

#[test]
fn test_sampling_is_reproducible_per_seed() {
    let mut cfg = config(10, 5);
    cfg.num_tests = Some(20);
    let a = select_test_points(500, &cfg, &mut StdRng::seed_from_u64(42)).unwrap();
    let b = select_test_points(500, &cfg, &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_stride_points() {
    let cfg = config(20, 10);
    let points = select_test_points(200, &cfg, &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(points, (60..190).step_by(10).collect::<Vec<_>>());

    let mut zero_step = cfg.clone();
    zero_step.step_size = 0;
    let points = select_test_points(200, &zero_step, &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(points.len(), 130);
}

#[test]
fn test_no_eligible_points() {
    let cfg = config(20, 10);
    assert!(select_test_points(70, &cfg, &mut StdRng::seed_from_u64(0)).is_err());
    assert!(select_test_points(5, &cfg, &mut StdRng::seed_from_u64(0)).is_err());
}

// ─── Scoring ──────────────────────────────────────────────────────────────────

fn step(step: usize, min: f64, median: f64, max: f64) -> CloudStep {
    CloudStep {
        step,
        min,
        max,
        median,
        p25: min,
        p75: max,
        sample_count: 3,
    }
}

#[test]
fn test_score_forecast() {
    let cloud = vec![step(1, -1.0, 0.0, 1.0), step(2, -2.0, 0.5, 2.0)];

    let (accuracy, direction) = score_forecast(&cloud, &[0.5, 3.0]);
    assert_eq!(accuracy, 0.5);
    assert!(direction);

    let (accuracy, direction) = score_forecast(&cloud, &[0.5, -1.0]);
    assert_eq!(accuracy, 1.0);
    assert!(!direction);

    // Only the overlapping prefix is scored
    let (accuracy, _) = score_forecast(&cloud, &[5.0]);
    assert_eq!(accuracy, 0.0);

    let (accuracy, direction) = score_forecast(&cloud, &[]);
    assert_eq!(accuracy, 0.0);
    assert!(!direction);
}

#[test]
fn test_flat_move_counts_as_down() {
    let cloud = vec![step(1, -1.0, -0.2, 1.0)];
    assert!(score_forecast(&cloud, &[0.0]).1);
}

// ─── Event stream ─────────────────────────────────────────────────────────────

#[test]
fn test_full_backtest_stream() {
    let candles = wave_candles(200);
    let mut cfg = config(20, 10);
    cfg.test_all = true;

    let events: Vec<_> = BacktestRunner::seeded(&candles, cfg, 1).collect();
    assert_protocol(&events);
    assert_eq!(progress_count(&events), 130);

    for (i, event) in events.iter().take(130).enumerate() {
        match event {
            BacktestEvent::Progress { current, total, progress } => {
                assert_eq!(*current, i + 1);
                assert_eq!(*total, 130);
                assert!(*progress > 0.0 && *progress <= 100.0);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
    assert!(matches!(events[129], BacktestEvent::Progress { progress, .. } if progress == 100.0));

    let BacktestEvent::Result(summary) = events.last().unwrap() else {
        panic!("expected a summary");
    };
    assert_eq!(summary.total_tests, summary.details.len());
    assert!(summary.total_tests > 0 && summary.total_tests <= 130);
    assert_eq!(summary.pattern_length, 20);
    assert_eq!(summary.forecast_horizon, 10);
    assert!((0.0..=100.0).contains(&summary.avg_range_accuracy));
    assert!((0.0..=100.0).contains(&summary.direction_accuracy));

    for record in &summary.details {
        assert!((60..190).contains(&record.test_index));
        assert!(record.matches_found >= 1 && record.matches_found <= 5);
        assert!(record.date.is_some());
        let hundredths = record.range_accuracy * 100.0;
        assert!((hundredths - hundredths.round()).abs() < 1e-6);
    }
    assert!(
        summary
            .details
            .windows(2)
            .all(|w| w[0].test_index < w[1].test_index)
    );
}

#[test]
fn test_sampled_backtest_clamps_to_eligible() {
    let candles = wave_candles(200);
    let mut cfg = config(20, 90);
    cfg.num_tests = Some(1_000);

    let events: Vec<_> = BacktestRunner::seeded(&candles, cfg, 9).collect();
    assert_protocol(&events);
    assert_eq!(progress_count(&events), 50);
    assert!(matches!(events[0], BacktestEvent::Progress { total: 50, .. }));
}

#[test]
fn test_every_point_skipped_reports_no_results() {
    let candles = wave_candles(120);
    // A one-candle horizon never leaves two outcome points, so every scan is empty
    let mut cfg = config(10, 1);
    cfg.test_all = true;

    let events: Vec<_> = BacktestRunner::seeded(&candles, cfg, 0).collect();
    assert_protocol(&events);
    assert_eq!(progress_count(&events), 89);
    assert_eq!(
        events.last(),
        Some(&BacktestEvent::Error {
            message: "no results".to_string()
        })
    );
}

#[test]
fn test_insufficient_data_is_the_only_event() {
    let candles = wave_candles(50);
    let events: Vec<_> = BacktestRunner::seeded(&candles, config(20, 10), 0).collect();
    assert_eq!(
        events,
        vec![BacktestEvent::Error {
            message: "insufficient data".to_string()
        }]
    );
}

#[test]
fn test_stream_is_fused() {
    let candles = wave_candles(50);
    let mut runner = BacktestRunner::seeded(&candles, config(20, 10), 0);
    assert!(runner.next().is_some());
    assert!(runner.next().is_none());
    assert!(runner.next().is_none());
}

#[test]
fn test_backtest_is_deterministic() {
    let candles = wave_candles(180);
    let mut cfg = config(12, 8);
    cfg.step_size = 3;
    cfg.method = MatchMethod::Elastic;

    let first: Vec<_> = BacktestRunner::seeded(&candles, cfg.clone(), 5).collect();
    let second: Vec<_> = BacktestRunner::seeded(&candles, cfg, 5).collect();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_seeded_sampling_is_reproducible() {
    let candles = wave_candles(250);
    let mut cfg = config(10, 5);
    cfg.num_tests = Some(12);

    let a: Vec<_> = BacktestRunner::seeded(&candles, cfg.clone(), 77).collect();
    let b: Vec<_> = BacktestRunner::with_rng(&candles, cfg, StdRng::seed_from_u64(77)).collect();
    assert_eq!(a, b);
    assert_eq!(progress_count(&a), 12);
}

#[test]
fn test_cancel_before_start() {
    let candles = wave_candles(200);
    let cancel = CancelToken::new();
    cancel.cancel();

    let events: Vec<_> = BacktestRunner::seeded(&candles, config(20, 10), 0)
        .with_cancel(cancel)
        .collect();
    assert_eq!(
        events,
        vec![BacktestEvent::Error {
            message: "backtest cancelled".to_string()
        }]
    );
}

#[test]
fn test_cancel_mid_stream() {
    let candles = wave_candles(200);
    let cancel = CancelToken::new();
    let mut runner = BacktestRunner::seeded(&candles, config(20, 10), 0).with_cancel(cancel.clone());

    for _ in 0..3 {
        assert!(matches!(runner.next(), Some(BacktestEvent::Progress { .. })));
    }

    // The token can be flipped from any thread
    thread::spawn(move || cancel.cancel()).join().unwrap();

    assert!(matches!(runner.next(), Some(BacktestEvent::Error { .. })));
    assert!(runner.next().is_none());
}

#[test]
fn test_events_serialize_tagged() {
    let progress = BacktestEvent::Progress {
        progress: 12.5,
        current: 1,
        total: 8,
    };
    let json = serde_json::to_value(&progress).unwrap();
    assert_eq!(json["type"], "progress");
    assert_eq!(json["current"], 1);

    let error = BacktestEvent::Error {
        message: "no results".into(),
    };
    assert_eq!(
        serde_json::to_string(&error).unwrap(),
        r#"{"type":"error","message":"no results"}"#
    );

    let candles = wave_candles(120);
    let mut cfg = config(10, 5);
    cfg.test_all = true;
    let last = BacktestRunner::seeded(&candles, cfg, 0).last().unwrap();
    let json = serde_json::to_value(&last).unwrap();
    assert_eq!(json["type"], "result");
    assert_eq!(json["method"], "rigid");
    assert!(json["details"].is_array());
}
