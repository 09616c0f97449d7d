use std::env;
use std::path::PathBuf;

use curator_core::{CuratorError, CuratorResult};

/// Historical window requested from the price source; generous enough that
/// 60 trading days survive weekends, holidays and listing gaps.
pub const HISTORY_DAYS: u32 = 250;

/// Runtime settings, collected from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub upstox_access_token: String,
    pub model_service_url: String,
    pub stock_master_path: PathBuf,
    pub scaler_path: PathBuf,
    pub results_dir: PathBuf,
    /// Recommendation flows trade cash equities only; derivative matches
    /// in the master list are rejected.
    pub equity_only: bool,
}

impl Settings {
    pub fn from_env() -> CuratorResult<Self> {
        let upstox_access_token = env::var("UPSTOX_ACCESS_TOKEN")
            .map_err(|_| CuratorError::Config("UPSTOX_ACCESS_TOKEN not set".to_string()))?;

        Ok(Self {
            upstox_access_token,
            model_service_url: env::var("MODEL_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8004".to_string()),
            stock_master_path: env::var("STOCK_MASTER_PATH")
                .unwrap_or_else(|_| "data/stock_master.json".to_string())
                .into(),
            scaler_path: env::var("SCALER_PATH")
                .unwrap_or_else(|_| "models/scaler.json".to_string())
                .into(),
            results_dir: env::var("RESULTS_DIR")
                .unwrap_or_else(|_| "data/daily_results".to_string())
                .into(),
            equity_only: env::var("EQUITY_ONLY")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
        })
    }
}
