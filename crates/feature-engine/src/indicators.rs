use curator_core::PriceBar;

use crate::series::{self, rolling_mean, rolling_std};

/// Simple Moving Average with shrink-to-available fallback.
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    rolling_mean(data, period)
}

/// Exponential Moving Average (adjust = false, seeded with the first value).
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    series::ema(data, span)
}

/// Relative Strength Index with Wilder's smoothing.
///
/// Guarded division: no losses but some gains -> 100; a flat window (no
/// gains and no losses) -> 0.0 by the substitution rule, not 100.
pub fn rsi(close: &[f64], period: usize) -> Vec<f64> {
    let n = close.len();
    let mut out = Vec::with_capacity(n);
    if n == 0 || period == 0 {
        return out;
    }
    out.push(0.0); // no change information at the first bar

    let mut gains = Vec::with_capacity(n.saturating_sub(1));
    let mut losses = Vec::with_capacity(n.saturating_sub(1));
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..n {
        let change = close[i] - close[i - 1];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));

        let k = gains.len();
        if k <= period {
            // Seed phase: simple average over the changes available so far.
            avg_gain = gains.iter().sum::<f64>() / k as f64;
            avg_loss = losses.iter().sum::<f64>() / k as f64;
        } else {
            avg_gain = (avg_gain * (period - 1) as f64 + gains[k - 1]) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + losses[k - 1]) / period as f64;
        }

        out.push(if avg_loss > 0.0 {
            let rs = avg_gain / avg_loss;
            100.0 - 100.0 / (1.0 + rs)
        } else if avg_gain > 0.0 {
            100.0
        } else {
            0.0
        });
    }
    out
}

/// MACD line, signal line and histogram, all aligned to the input length.
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(close: &[f64], fast: usize, slow: usize, signal_span: usize) -> MacdSeries {
    let ema_fast = ema(close, fast);
    let ema_slow = ema(close, slow);
    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema(&macd_line, signal_span);
    let histogram = macd_line
        .iter()
        .zip(&signal)
        .map(|(m, s)| m - s)
        .collect();
    MacdSeries {
        macd: macd_line,
        signal,
        histogram,
    }
}

/// Bollinger Bands: SMA(period) +/- k * sample stddev(period).
pub struct BollingerSeries {
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger(close: &[f64], period: usize, k: f64) -> BollingerSeries {
    let middle = rolling_mean(close, period);
    let std = rolling_std(close, period);
    let upper = middle.iter().zip(&std).map(|(m, s)| m + k * s).collect();
    let lower = middle.iter().zip(&std).map(|(m, s)| m - k * s).collect();
    BollingerSeries { middle, upper, lower }
}

/// Average True Range, Wilder-smoothed, aligned to the input length.
/// The first bar's true range is its high-low span.
pub fn atr(bars: &[PriceBar], period: usize) -> Vec<f64> {
    let n = bars.len();
    let mut out = Vec::with_capacity(n);
    if n == 0 || period == 0 {
        return out;
    }

    let mut tr = Vec::with_capacity(n);
    tr.push(bars[0].high - bars[0].low);
    for i in 1..n {
        let high_low = bars[i].high - bars[i].low;
        let high_close = (bars[i].high - bars[i - 1].close).abs();
        let low_close = (bars[i].low - bars[i - 1].close).abs();
        tr.push(high_low.max(high_close).max(low_close));
    }

    let mut atr_val = tr[0];
    out.push(atr_val);
    for i in 1..n {
        if i < period {
            // Seed phase: simple average of the true ranges seen so far.
            atr_val = tr[..=i].iter().sum::<f64>() / (i + 1) as f64;
        } else {
            atr_val = (atr_val * (period - 1) as f64 + tr[i]) / period as f64;
        }
        out.push(atr_val);
    }
    out
}

/// On-Balance Volume, cumulative over the whole supplied history. Starts at
/// zero; the running total never resets.
pub fn obv(bars: &[PriceBar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    let mut total = 0.0;
    for i in 0..bars.len() {
        if i > 0 {
            if bars[i].close > bars[i - 1].close {
                total += bars[i].volume;
            } else if bars[i].close < bars[i - 1].close {
                total -= bars[i].volume;
            }
        }
        out.push(total);
    }
    out
}

/// Volume-Price Trend: cumulative volume signed by the day's close-to-close
/// direction, over the whole supplied history.
pub fn volume_price_trend(bars: &[PriceBar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    let mut total = 0.0;
    for i in 0..bars.len() {
        if i > 0 {
            total += bars[i].volume * series::sign(bars[i].close - bars[i - 1].close);
        }
        out.push(total);
    }
    out
}

/// Hurst exponent of a close-price window via the lag-difference spread
/// method: the slope of ln(stddev of k-lag differences) against ln(k) for
/// k in 2..max_lag. Too short a window, or a degenerate spread, yields the
/// random-walk value 0.5.
pub fn hurst_exponent(window: &[f64], max_lag: usize) -> f64 {
    if max_lag < 3 || window.len() < max_lag {
        return 0.5;
    }
    let mut log_lags = Vec::with_capacity(max_lag - 2);
    let mut log_taus = Vec::with_capacity(max_lag - 2);
    for lag in 2..max_lag {
        let diffs: Vec<f64> = window[lag..]
            .iter()
            .zip(&window[..window.len() - lag])
            .map(|(a, b)| a - b)
            .collect();
        let tau = series::population_std(&diffs);
        if tau <= 0.0 {
            return 0.5;
        }
        log_lags.push((lag as f64).ln());
        log_taus.push(tau.ln());
    }
    series::least_squares_slope(&log_lags, &log_taus)
}
