//! Upstox historical-candle client: the price-history collaborator.
//!
//! Owns its authentication and retry policy. Exhausted retries or an empty
//! candle set surface as a typed `DataUnavailable` error so the pipeline
//! can skip the symbol and continue the run.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use curator_core::{CuratorError, CuratorResult, PriceBar, PriceHistorySource};
use serde::Deserialize;
use stock_master::StockMasterIndex;

const BASE_URL: &str = "https://api.upstox.com";
/// URL-encoded instrument key of the NIFTY 50 benchmark index.
const BENCHMARK_INSTRUMENT: &str = "NSE_INDEX%7CNifty%2050";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 500;

#[derive(Debug, Deserialize)]
struct CandleEnvelope {
    status: String,
    #[serde(default)]
    data: Option<CandleData>,
}

#[derive(Debug, Deserialize)]
struct CandleData {
    #[serde(default)]
    candles: Vec<Candle>,
}

/// One candle row: [timestamp, open, high, low, close, volume, oi].
type Candle = (String, f64, f64, f64, f64, f64, f64);

#[derive(Clone)]
pub struct UpstoxClient {
    client: reqwest::Client,
    access_token: String,
    master: Arc<StockMasterIndex>,
}

impl UpstoxClient {
    pub fn new(access_token: String, master: Arc<StockMasterIndex>) -> CuratorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CuratorError::DataUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            access_token,
            master,
        })
    }

    /// GET with bounded retries and exponential backoff on transient
    /// failures (connect/timeout errors, 5xx, 429).
    async fn get_with_retry(&self, url: &str) -> CuratorResult<CandleEnvelope> {
        let mut last_error = String::new();

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let wait = Duration::from_millis(BACKOFF_BASE_MS << (attempt - 1));
                tracing::warn!(url, attempt, wait_ms = wait.as_millis() as u64, "retrying candle fetch");
                tokio::time::sleep(wait).await;
            }

            let response = self
                .client
                .get(url)
                .header("Accept", "application/json")
                .bearer_auth(&self.access_token)
                .send()
                .await;

            match response {
                Err(e) => {
                    last_error = e.to_string();
                }
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_server_error() || status.as_u16() == 429 {
                        last_error = format!("HTTP {status}");
                    } else if !status.is_success() {
                        // Client errors will not heal on retry
                        return Err(CuratorError::DataUnavailable(format!("HTTP {status}")));
                    } else {
                        return resp
                            .json::<CandleEnvelope>()
                            .await
                            .map_err(|e| CuratorError::DataUnavailable(e.to_string()));
                    }
                }
            }
        }

        Err(CuratorError::DataUnavailable(format!(
            "{MAX_ATTEMPTS} attempts failed: {last_error}"
        )))
    }

    async fn fetch_instrument(&self, instrument_key: &str, days: u32) -> CuratorResult<Vec<PriceBar>> {
        let to = Utc::now().date_naive();
        let from = to - chrono::Duration::days(days as i64);
        let url = format!(
            "{BASE_URL}/v3/historical-candle/{instrument_key}/days/1/{to}/{from}",
        );

        let envelope = self.get_with_retry(&url).await?;
        parse_candles(envelope)
    }
}

/// Converts a candle envelope into ascending daily bars. An unsuccessful
/// status or an empty candle set is `DataUnavailable`.
fn parse_candles(envelope: CandleEnvelope) -> CuratorResult<Vec<PriceBar>> {
    if envelope.status != "success" {
        return Err(CuratorError::DataUnavailable(format!(
            "candle API status: {}",
            envelope.status
        )));
    }
    let candles = envelope.data.map(|d| d.candles).unwrap_or_default();
    if candles.is_empty() {
        return Err(CuratorError::DataUnavailable("no candles returned".to_string()));
    }

    let mut bars = Vec::with_capacity(candles.len());
    for (timestamp, open, high, low, close, volume, open_interest) in candles {
        let date = timestamp
            .get(..10)
            .and_then(|d| d.parse::<NaiveDate>().ok())
            .ok_or_else(|| {
                CuratorError::DataUnavailable(format!("malformed candle timestamp: {timestamp}"))
            })?;
        bars.push(PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume,
            open_interest,
        });
    }
    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

#[async_trait]
impl PriceHistorySource for UpstoxClient {
    async fn fetch_bars(&self, symbol: &str, days: u32) -> CuratorResult<Vec<PriceBar>> {
        let isin = self.master.lookup_isin(symbol).ok_or_else(|| {
            CuratorError::DataUnavailable(format!("no ISIN for symbol {symbol}"))
        })?;
        let instrument_key = format!("NSE_EQ%7C{isin}");
        let bars = self.fetch_instrument(&instrument_key, days).await?;
        tracing::debug!(symbol, bars = bars.len(), "fetched daily candles");
        Ok(bars)
    }

    async fn fetch_benchmark(&self, days: u32) -> CuratorResult<Vec<PriceBar>> {
        self.fetch_instrument(BENCHMARK_INSTRUMENT, days).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> CandleEnvelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn candles_parse_and_sort_ascending() {
        let parsed = parse_candles(envelope(
            r#"{
                "status": "success",
                "data": {
                    "candles": [
                        ["2024-06-03T00:00:00+05:30", 101.0, 103.0, 100.0, 102.5, 1200000.0, 0.0],
                        ["2024-05-31T00:00:00+05:30", 99.0, 101.5, 98.5, 101.0, 900000.0, 0.0]
                    ]
                }
            }"#,
        ))
        .unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].date, NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
        assert_eq!(parsed[1].date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(parsed[1].close, 102.5);
        assert_eq!(parsed[0].volume, 900000.0);
    }

    #[test]
    fn open_interest_is_carried_through() {
        let parsed = parse_candles(envelope(
            r#"{
                "status": "success",
                "data": {
                    "candles": [["2024-06-03T00:00:00+05:30", 1.0, 2.0, 0.5, 1.5, 10.0, 4200.0]]
                }
            }"#,
        ))
        .unwrap();
        assert_eq!(parsed[0].open_interest, 4200.0);
    }

    #[test]
    fn empty_candles_are_data_unavailable() {
        let err = parse_candles(envelope(
            r#"{"status": "success", "data": {"candles": []}}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, CuratorError::DataUnavailable(_)));
    }

    #[test]
    fn error_status_is_data_unavailable() {
        let err = parse_candles(envelope(r#"{"status": "error"}"#)).unwrap_err();
        assert!(matches!(err, CuratorError::DataUnavailable(_)));
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let err = parse_candles(envelope(
            r#"{"status": "success", "data": {"candles": [["bogus", 1.0, 2.0, 0.5, 1.5, 10.0, 0.0]]}}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, CuratorError::DataUnavailable(_)));
    }
}
