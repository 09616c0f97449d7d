use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use curator_core::RawRecommendation;
use daily_pipeline::{Pipeline, RunOutcome, Settings};
use model_client::{DirectionalPredictor, HttpModelBackend, StandardScaler};
use result_store::ResultStore;
use stock_master::StockMasterIndex;
use tracing_subscriber::EnvFilter;
use upstox_client::UpstoxClient;

const MODEL_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,daily_pipeline=debug".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut date = Utc::now().date_naive();
    let mut input: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--date" if i + 1 < args.len() => {
                date = args[i + 1]
                    .parse::<NaiveDate>()
                    .with_context(|| format!("invalid --date: {}", args[i + 1]))?;
                i += 2;
            }
            "--input" if i + 1 < args.len() => {
                input = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--help" | "-h" => {
                println!("Usage: daily-pipeline [--date YYYY-MM-DD] [--input extractions.json]");
                return Ok(());
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    let input = input.unwrap_or_else(|| PathBuf::from(format!("data/extractions/{date}.json")));

    let settings = Settings::from_env()?;

    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("reading LLM extractions from {}", input.display()))?;
    let raw: Vec<RawRecommendation> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing LLM extractions from {}", input.display()))?;

    let master = Arc::new(StockMasterIndex::load(&settings.stock_master_path)?);
    let scaler = StandardScaler::load(&settings.scaler_path)?;
    let backend = HttpModelBackend::new(settings.model_service_url.clone(), MODEL_TIMEOUT)?;
    let predictor = DirectionalPredictor::new(scaler, Arc::new(backend));
    let price_source = Arc::new(UpstoxClient::new(
        settings.upstox_access_token.clone(),
        Arc::clone(&master),
    )?);
    let store = ResultStore::new(settings.results_dir.clone());

    let pipeline = Pipeline::new(master, predictor, price_source, store, settings.equity_only);

    match pipeline.run(date, &raw).await? {
        RunOutcome::Completed { path, metadata } => {
            tracing::info!(
                path = %path.display(),
                recommendations = metadata.recommendation_count,
                predictions = metadata.prediction_count,
                validation_rate = metadata.validation_rate,
                skipped = metadata.skipped_symbols.len(),
                "run complete"
            );
        }
        RunOutcome::SkippedExisting(path) => {
            tracing::info!(path = %path.display(), "nothing to do");
        }
    }
    Ok(())
}
