use crate::models::WeatherDay;

/// Scale a reduction linearly with streak length.
///
/// `days = 0` gives `min`; streaks at or beyond `max_days` give `max`.
pub fn scale_reduction(min: f64, max: f64, days: f64, max_days: f64) -> f64 {
    if max_days <= 0.0 {
        return max;
    }
    let ratio = days.min(max_days) / max_days;
    min + (max - min) * ratio
}

/// Remove `percent` of the running yield.
pub fn compound_reduction(yield_estimate: f64, percent: f64) -> f64 {
    yield_estimate - (percent / 100.0) * yield_estimate
}

/// Yield after the same percentage is compounded over `days`.
pub fn apply_compounded_daily_reduction(base_yield: f64, percent_per_day: f64, days: u32) -> f64 {
    let daily_rate = percent_per_day / 100.0;
    base_yield * (1.0 - daily_rate).powi(days as i32)
}

/// Overall percent removed by compounding `percent_per_day` over `days`.
pub fn combined_percent(percent_per_day: f64, days: u32) -> f64 {
    100.0 - apply_compounded_daily_reduction(100.0, percent_per_day, days)
}

pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Length of the longest run of adjacent days matching `predicate`.
pub fn longest_streak<F>(days: &[&WeatherDay], predicate: F) -> usize
where
    F: Fn(&WeatherDay) -> bool,
{
    streaks(days, predicate).into_iter().max().unwrap_or(0)
}

/// Lengths of every maximal run of adjacent days matching `predicate`,
/// in order. A run still open at the end of the slice is included.
pub fn streaks<F>(days: &[&WeatherDay], predicate: F) -> Vec<usize>
where
    F: Fn(&WeatherDay) -> bool,
{
    let mut runs = Vec::new();
    let mut current = 0;

    for day in days {
        if predicate(day) {
            current += 1;
        } else if current > 0 {
            runs.push(current);
            current = 0;
        }
    }

    if current > 0 {
        runs.push(current);
    }

    runs
}
