use crate::config::INGEST;
use crate::utils::parse_date_label;

/// Guesses the candle timeframe label (`1m`, `5m`, ..., `1wk`) from date labels.
///
/// Averages the positive gaps between the first few consecutive timestamps and
/// picks the first configured bucket that covers it. Labels that don't parse
/// are ignored. Returns `unknown` with fewer than two dates or no positive gap.
pub fn detect_timeframe<S: AsRef<str>>(dates: &[S]) -> &'static str {
    if dates.len() < 2 {
        return INGEST.unknown_timeframe;
    }

    let sample = &dates[..dates.len().min(INGEST.timeframe_sample)];
    let gaps: Vec<f64> = sample
        .windows(2)
        .filter_map(|pair| {
            let d0 = parse_date_label(pair[0].as_ref())?;
            let d1 = parse_date_label(pair[1].as_ref())?;
            let secs = (d1 - d0).num_milliseconds() as f64 / 1000.0;
            (secs > 0.0).then_some(secs)
        })
        .collect();

    if gaps.is_empty() {
        return INGEST.unknown_timeframe;
    }

    let avg = gaps.iter().sum::<f64>() / gaps.len() as f64;
    INGEST
        .timeframes
        .iter()
        .find(|bucket| avg <= bucket.max_avg_secs)
        .map(|bucket| bucket.label)
        .unwrap_or(INGEST.fallback_timeframe)
}
