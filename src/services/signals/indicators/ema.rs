//! Exponential Moving Average (EMA) helpers.

/// EMA series seeded with the simple average of the first `period` values.
///
/// Returns one value per input from index `period - 1` onward, or an empty
/// vector if there are fewer than `period` values.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);

    // First EMA is SMA
    let sma = values.iter().take(period).sum::<f64>() / period as f64;

    let mut series = Vec::with_capacity(values.len() - period + 1);
    series.push(sma);

    let mut ema = sma;
    for value in values.iter().skip(period) {
        ema = (value - ema) * multiplier + ema;
        series.push(ema);
    }

    series
}

/// Latest EMA value.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    ema_series(values, period).last().copied()
}
