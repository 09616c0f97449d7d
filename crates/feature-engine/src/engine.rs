use std::collections::HashMap;

use chrono::NaiveDate;
use curator_core::{CuratorError, CuratorResult, PriceBar};

use crate::indicators;
use crate::schema::{FeatureVector, FEATURE_COUNT};
use crate::series;

/// Bars needed for every indicator to run at its full window (the 50-day
/// SMA plus warm-up). Shorter histories still produce a complete vector,
/// just with degraded long-window accuracy.
pub const WINDOW_SIZE: usize = 60;

/// Close-price window and lag ceiling for the Hurst estimate.
const HURST_WINDOW: usize = 60;
const HURST_MAX_LAG: usize = 20;

/// Pure feature computation: an ordered OHLCV window (plus an optional
/// benchmark index series) in, a fixed-shape 47-value vector out.
///
/// Never fails on short history and never emits NaN: rolling windows shrink
/// to what is available and degenerate divisions substitute 0.0.
#[derive(Debug, Default)]
pub struct IndicatorEngine;

impl IndicatorEngine {
    pub fn new() -> Self {
        Self
    }

    /// Computes the feature vector as of the last (most recent) bar.
    /// `bars` must be sorted ascending by date. Errors only on empty input.
    pub fn compute(
        &self,
        bars: &[PriceBar],
        benchmark: Option<&[PriceBar]>,
    ) -> CuratorResult<FeatureVector> {
        if bars.is_empty() {
            return Err(CuratorError::InsufficientData(
                "no price bars supplied".to_string(),
            ));
        }
        let n = bars.len();
        if n < WINDOW_SIZE {
            tracing::warn!(
                bars = n,
                window = WINDOW_SIZE,
                "short history, long-window indicators fall back to available data"
            );
        }
        let t = n - 1;

        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let volume: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        // Trend
        let sma5 = series::rolling_mean(&close, 5);
        let sma10 = series::rolling_mean(&close, 10);
        let sma20 = series::rolling_mean(&close, 20);
        let sma50 = series::rolling_mean(&close, 50);
        let ema12 = indicators::ema(&close, 12);
        let ema26 = indicators::ema(&close, 26);
        let macd = indicators::macd(&close, 12, 26, 9);

        // Momentum and volatility
        let rsi = indicators::rsi(&close, 14);
        let bb = indicators::bollinger(&close, 20, 2.0);
        let daily_return: Vec<f64> = series::pct_change(&close, 1)
            .into_iter()
            .map(|r| r * 100.0)
            .collect();
        let vol5 = series::rolling_std(&daily_return, 5);
        let vol20 = series::rolling_std(&daily_return, 20);
        let momentum10 = series::diff(&close, 10);
        let momentum20 = series::diff(&close, 20);

        // Volume
        let volume_sma20 = series::rolling_mean(&volume, 20);
        let volume_ratio = guarded_div(volume[t], volume_sma20[t]);
        let obv = indicators::obv(bars);
        let vpt = indicators::volume_price_trend(bars);

        // Market context
        let (relative_strength, correlation, market_regime) =
            market_context(bars, &daily_return, benchmark);

        // Mean-reversion composites
        let rsi_divergence =
            series::sign(*series::diff(&rsi, 5).last().unwrap_or(&0.0))
                - series::sign(*series::pct_change(&close, 5).last().unwrap_or(&0.0));
        let macd_crossover = if t >= 1 {
            let above = macd.macd[t] > macd.signal[t];
            let was_above = macd.macd[t - 1] > macd.signal[t - 1];
            if above && !was_above {
                1.0
            } else if !above && was_above {
                -1.0
            } else {
                0.0
            }
        } else {
            0.0
        };
        let bb_squeeze = {
            let width: Vec<f64> = bb
                .upper
                .iter()
                .zip(&bb.lower)
                .zip(&bb.middle)
                .map(|((u, l), m)| guarded_div(u - l, *m))
                .collect();
            let w_min = series::rolling_min(&width, 20)[t];
            let w_max = series::rolling_max(&width, 20)[t];
            guarded_div(width[t] - w_min, w_max - w_min)
        };
        let price_vs_sma50 = guarded_div(close[t] - sma50[t], sma50[t]) * 100.0;
        let momentum_strength = series::diff(&momentum10, 5)[t];
        let sr_distance = {
            let high20 = series::rolling_max(&high, 20)[t];
            let low20 = series::rolling_min(&low, 20)[t];
            let up_day = t >= 1 && close[t] > close[t - 1];
            if up_day {
                guarded_div(high20 - close[t], close[t])
            } else {
                guarded_div(close[t] - low20, close[t])
            }
        };
        let volume_breakout = if volume[t] > 2.0 * volume_sma20[t] {
            1.0
        } else {
            0.0
        };

        // Statistical
        let skew20 = series::rolling_skew(&daily_return, 20)[t];
        let kurt20 = series::rolling_kurt(&daily_return, 20)[t];
        let hurst = {
            let start = n.saturating_sub(HURST_WINDOW);
            indicators::hurst_exponent(&close[start..], HURST_MAX_LAG)
        };

        let log_return = if t >= 1 && close[t - 1] > 0.0 && close[t] > 0.0 {
            (close[t] / close[t - 1]).ln() * 100.0
        } else {
            0.0
        };

        let raw: [f64; FEATURE_COUNT] = [
            bars[t].open,
            bars[t].high,
            bars[t].low,
            bars[t].close,
            bars[t].volume,
            bars[t].open_interest,
            sma5[t],
            sma10[t],
            sma20[t],
            sma50[t],
            ema12[t],
            ema26[t],
            macd.macd[t],
            macd.signal[t],
            macd.histogram[t],
            rsi[t],
            bb.middle[t],
            bb.upper[t],
            bb.lower[t],
            volume_sma20[t],
            volume_ratio,
            daily_return[t],
            bars[t].high - bars[t].low,
            bars[t].close - bars[t].open,
            series::pct_change(&close, 3)[t] * 100.0,
            series::pct_change(&close, 5)[t] * 100.0,
            series::pct_change(&close, 10)[t] * 100.0,
            log_return,
            vol5[t],
            vol20[t],
            momentum10[t],
            momentum20[t],
            relative_strength,
            correlation,
            market_regime,
            rsi_divergence,
            macd_crossover,
            bb_squeeze,
            price_vs_sma50,
            momentum_strength,
            sr_distance,
            vpt[t],
            obv[t],
            volume_breakout,
            skew20,
            kurt20,
            hurst,
        ];

        let mut values = [0.0; FEATURE_COUNT];
        for (i, v) in raw.iter().enumerate() {
            values[i] = finite_or_zero(*v);
        }
        FeatureVector::new(values)
    }
}

/// relative_strength_to_nifty50, correlation_to_nifty50_20d, market_regime.
/// All three are 0.0 when no benchmark series is supplied.
fn market_context(
    bars: &[PriceBar],
    daily_return: &[f64],
    benchmark: Option<&[PriceBar]>,
) -> (f64, f64, f64) {
    let bench = match benchmark {
        Some(b) if !b.is_empty() => b,
        _ => return (0.0, 0.0, 0.0),
    };

    let aligned = align_benchmark(bars, bench);
    let bench_return: Vec<f64> = series::pct_change(&aligned, 1)
        .into_iter()
        .map(|r| r * 100.0)
        .collect();
    let t = bars.len() - 1;

    let relative_strength = daily_return[t] - bench_return[t];
    let correlation = series::rolling_corr(daily_return, &bench_return, 20)[t];

    let bench_sma20 = series::rolling_mean(&aligned, 20);
    let bench_sma50 = series::rolling_mean(&aligned, 50);
    let regime = series::sign(bench_sma20[t] - bench_sma50[t]);

    (relative_strength, correlation, regime)
}

/// Aligns the benchmark closes onto the symbol's trading dates. Dates the
/// benchmark is missing carry the last known close forward; dates before
/// any benchmark data take the earliest close.
fn align_benchmark(bars: &[PriceBar], bench: &[PriceBar]) -> Vec<f64> {
    let by_date: HashMap<NaiveDate, f64> = bench.iter().map(|b| (b.date, b.close)).collect();
    let mut last = bench[0].close;
    bars.iter()
        .map(|b| {
            if let Some(close) = by_date.get(&b.date) {
                last = *close;
            }
            last
        })
        .collect()
}

fn guarded_div(num: f64, den: f64) -> f64 {
    if den != 0.0 {
        num / den
    } else {
        0.0
    }
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}
