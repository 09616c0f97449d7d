use curator_core::{CuratorError, CuratorResult};

/// Number of model features.
pub const FEATURE_COUNT: usize = 47;

/// Feature names in the exact order the frozen model was trained on.
/// This order is a model contract: reordering or renaming breaks
/// compatibility with the scaler and classifier artifacts.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    // Raw OHLCV (6)
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "OI",
    // Moving averages and MACD (9)
    "SMA_5",
    "SMA_10",
    "SMA_20",
    "SMA_50",
    "EMA_12",
    "EMA_26",
    "MACD",
    "MACD_Signal",
    "MACD_Hist",
    // RSI and Bollinger Bands (4)
    "RSI",
    "BB_Middle",
    "BB_Upper",
    "BB_Lower",
    // Volume (2)
    "Volume_SMA_20",
    "Volume_Ratio",
    // Price-based (10)
    "Daily_Return",
    "Price_Range",
    "Price_Change",
    "Return_3d",
    "Return_5d",
    "Return_10d",
    "Log_Return",
    "Volatility_5d",
    "Volatility_20d",
    "Momentum_10d",
    "Momentum_20d",
    // Market context (3)
    "relative_strength_to_nifty50",
    "correlation_to_nifty50_20d",
    "market_regime",
    // Momentum and mean reversion (6)
    "rsi_divergence",
    "macd_crossover_signal",
    "bb_squeeze",
    "price_vs_sma50_pct",
    "momentum_strength",
    "support_resistance_distance",
    // Volume and liquidity (3)
    "volume_price_trend",
    "on_balance_volume",
    "volume_breakout",
    // Statistical (3)
    "returns_skewness_20d",
    "returns_kurtosis_20d",
    "hurst_exponent",
];

/// Fixed-shape feature record for one symbol as of one trading day.
///
/// Represented as an ordered array rather than an open-ended map so that a
/// shape mismatch is impossible to construct: every vector has exactly the
/// 47 training-order values and every value is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Wraps a complete value array. Non-finite entries are rejected; the
    /// engine substitutes 0.0 before construction, so hitting this is a
    /// programming error in a new feature computation.
    pub fn new(values: [f64; FEATURE_COUNT]) -> CuratorResult<Self> {
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(CuratorError::ShapeMismatch {
                expected: "47 finite values".to_string(),
                actual: format!("non-finite value for {}", FEATURE_NAMES[idx]),
            });
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Value by feature name; None for a name outside the schema.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }

    /// (name, value) pairs in training order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}
