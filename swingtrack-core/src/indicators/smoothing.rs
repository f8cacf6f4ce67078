//! Series smoothing kernels shared by the indicators.
//!
//! Every kernel returns a vector as long as its input, `NaN` until the first
//! full window.

/// Exponential smoothing with `alpha = 2 / (period + 1)`, seeded with the
/// mean of the first `period` values.
///
/// A NaN inside the seed window leaves the whole output NaN; a NaN after it
/// makes every later value NaN.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    exponential(values, period, 2.0 / (period as f64 + 1.0), SeedAt::Start)
}

/// Wilder smoothing (`alpha = 1 / period`), seeded with the mean of the first
/// run of `period` consecutive non-NaN values.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    exponential(values, period, 1.0 / period as f64, SeedAt::FirstCleanRun)
}

/// Mean of each trailing window of `period` values. A window containing NaN
/// yields NaN; windows are summed independently so a NaN does not outlive
/// them.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 {
        return out;
    }
    for (end, window) in (period - 1..).zip(values.windows(period)) {
        out[end] = window.iter().sum::<f64>() / period as f64;
    }
    out
}

enum SeedAt {
    Start,
    FirstCleanRun,
}

fn exponential(values: &[f64], period: usize, alpha: f64, seed_at: SeedAt) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < period {
        return out;
    }

    let clean = |start: usize| values[start..start + period].iter().all(|v| !v.is_nan());
    let start = match seed_at {
        SeedAt::Start => Some(0).filter(|&s| clean(s)),
        SeedAt::FirstCleanRun => (0..=n - period).find(|&s| clean(s)),
    };
    let Some(start) = start else {
        return out;
    };

    let seed_idx = start + period - 1;
    let mut prev = values[start..=seed_idx].iter().sum::<f64>() / period as f64;
    out[seed_idx] = prev;

    for (i, &v) in values.iter().enumerate().skip(seed_idx + 1) {
        if v.is_nan() {
            break;
        }
        prev = alpha * v + (1.0 - alpha) * prev;
        out[i] = prev;
    }
    out
}
