use async_trait::async_trait;

use crate::{CuratorError, PriceBar};

/// Source of historical daily candles.
///
/// Implementations own their authentication and rate limiting and raise a
/// typed `DataUnavailable` condition instead of returning malformed bars.
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// Daily bars for one symbol, ascending by date, ending at the most
    /// recent completed trading day.
    async fn fetch_bars(&self, symbol: &str, days: u32) -> Result<Vec<PriceBar>, CuratorError>;

    /// The market benchmark series for the same window.
    async fn fetch_benchmark(&self, days: u32) -> Result<Vec<PriceBar>, CuratorError>;
}
