//! Percent change and exponential moving average over a [`PriceSeries`]

use crate::error::{Result, SignalError};
use crate::series::PriceSeries;

/// Day-over-day change of the latest close, in percent
///
/// `((latest - previous) / previous) * 100`. Needs at least two bars, and both
/// closes must be positive.
pub fn compute_change_percent(series: &PriceSeries) -> Result<f64> {
    let (Some(previous), Some(latest)) = (series.previous(), series.latest()) else {
        return Err(SignalError::DataInsufficient {
            symbol: series.symbol().to_string(),
            required: 2,
            available: series.len(),
        });
    };

    for price in [previous.close, latest.close] {
        if !is_positive_price(price) {
            return Err(SignalError::DivisionByZero {
                symbol: series.symbol().to_string(),
                price,
            });
        }
    }

    Ok((latest.close - previous.close) / previous.close * 100.0)
}

/// Reject a series holding any close that is zero, negative or not finite
///
/// Reports the first offending close in date order.
pub fn check_positive_closes(series: &PriceSeries) -> Result<()> {
    match series.bars().iter().find(|bar| !is_positive_price(bar.close)) {
        Some(bar) => Err(SignalError::DivisionByZero {
            symbol: series.symbol().to_string(),
            price: bar.close,
        }),
        None => Ok(()),
    }
}

/// EMA of the closes, aligned to the series' bars
///
/// The first `length - 1` entries are `None` (warm-up). The entry at
/// `length - 1` is the simple average of the first `length` closes, and every
/// later entry follows `ema = alpha * close + (1 - alpha) * ema_prev` with
/// `alpha = 2 / (length + 1)`. A series shorter than `length` yields all `None`.
pub fn compute_ema(series: &PriceSeries, length: usize) -> Result<Vec<Option<f64>>> {
    ema_of(&series.closes(), length)
}

/// [`compute_ema`] over a bare slice of closes
pub fn ema_of(closes: &[f64], length: usize) -> Result<Vec<Option<f64>>> {
    if length == 0 {
        return Err(SignalError::Configuration(
            "EMA length must be greater than 0".to_string(),
        ));
    }

    let mut values = vec![None; closes.len()];
    if closes.len() < length {
        return Ok(values);
    }

    let alpha = 2.0 / (length as f64 + 1.0);
    let seed = closes[..length].iter().sum::<f64>() / length as f64;
    values[length - 1] = Some(seed);

    let mut prev = seed;
    for (slot, &close) in values.iter_mut().zip(closes).skip(length) {
        prev = alpha * close + (1.0 - alpha) * prev;
        *slot = Some(prev);
    }

    Ok(values)
}

fn is_positive_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}
