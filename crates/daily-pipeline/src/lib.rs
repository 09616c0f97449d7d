//! Daily pipeline orchestrator: validates the day's LLM extractions against
//! the stock master, fetches price history, computes features, scores the
//! frozen classifier, reconciles both signal streams, and persists one
//! atomic JSON artifact per calendar date.
//!
//! A single symbol failing upstream skips that symbol and the run continues.
//! Only a systemic failure (every symbol unusable) fails the run.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use curator_core::{
    CuratorError, CuratorResult, DailyResults, PriceBar, PriceHistorySource, RawRecommendation,
    Recommendation, RunMetadata,
};
use feature_engine::IndicatorEngine;
use model_client::DirectionalPredictor;
use result_store::{ResultStore, WriteOutcome};
use stock_master::StockMasterIndex;

pub mod config;

pub use config::{Settings, HISTORY_DAYS};


/// What a run produced, reported back to the caller.
#[derive(Debug)]
pub enum RunOutcome {
    Completed {
        path: PathBuf,
        metadata: RunMetadata,
    },
    /// An artifact for the date already existed; nothing was recomputed.
    SkippedExisting(PathBuf),
}

pub struct Pipeline {
    master: Arc<StockMasterIndex>,
    engine: IndicatorEngine,
    predictor: DirectionalPredictor,
    price_source: Arc<dyn PriceHistorySource>,
    store: ResultStore,
    equity_only: bool,
}

impl Pipeline {
    pub fn new(
        master: Arc<StockMasterIndex>,
        predictor: DirectionalPredictor,
        price_source: Arc<dyn PriceHistorySource>,
        store: ResultStore,
        equity_only: bool,
    ) -> Self {
        Self {
            master,
            engine: IndicatorEngine::new(),
            predictor,
            price_source,
            store,
            equity_only,
        }
    }

    /// Runs the full curation sequence for one date. Idempotent per date:
    /// if the artifact already exists the run is a no-op.
    pub async fn run(
        &self,
        date: NaiveDate,
        raw: &[RawRecommendation],
    ) -> CuratorResult<RunOutcome> {
        if self.store.exists(date) {
            let path = self.store.path_for(date);
            tracing::info!(%date, path = %path.display(), "results already exist, skipping run");
            return Ok(RunOutcome::SkippedExisting(path));
        }
        tracing::info!(%date, mentions = raw.len(), "starting daily pipeline run");

        let recommendations = self.master.validate(raw, self.equity_only);
        let resolved = recommendations
            .iter()
            .filter(|r| r.resolved_symbol.is_some())
            .count();
        let validation_rate = if recommendations.is_empty() {
            0.0
        } else {
            resolved as f64 / recommendations.len() as f64
        };
        tracing::info!(
            mentions = recommendations.len(),
            resolved,
            validation_rate,
            "symbol validation complete"
        );

        // The benchmark feeds the market-context features; without it they
        // degrade to neutral values, so its absence never fails the run.
        let benchmark = match self.price_source.fetch_benchmark(HISTORY_DAYS).await {
            Ok(bars) => Some(bars),
            Err(e) => {
                tracing::warn!(error = %e, "benchmark fetch failed, market context degrades");
                None
            }
        };

        let symbols = tradable_symbols(&recommendations);
        let mut predictions = Vec::new();
        let mut skipped_symbols = Vec::new();

        for symbol in &symbols {
            match self.predict_symbol(symbol, date, benchmark.as_deref()).await {
                Ok(prediction) => predictions.push(prediction),
                Err(e @ CuratorError::ShapeMismatch { .. }) => return Err(e),
                Err(e) => {
                    tracing::warn!(symbol, error = %e, "symbol skipped");
                    skipped_symbols.push(symbol.clone());
                }
            }
        }

        if !symbols.is_empty() && predictions.is_empty() {
            return Err(CuratorError::DataUnavailable(format!(
                "all {} symbols failed upstream",
                symbols.len()
            )));
        }

        let combined_signals = signal_reconciler::reconcile(&recommendations, &predictions);

        let metadata = RunMetadata {
            run_date: date,
            recommendation_count: recommendations.len(),
            prediction_count: predictions.len(),
            validation_rate,
            skipped_symbols,
        };
        let results = DailyResults {
            metadata: metadata.clone(),
            llm_recommendations: recommendations,
            ml_predictions: predictions,
            combined_signals,
        };

        match self.store.write(&results)? {
            WriteOutcome::Written(path) => {
                tracing::info!(%date, path = %path.display(), "daily pipeline run complete");
                Ok(RunOutcome::Completed { path, metadata })
            }
            // Lost a race with a concurrent run for the same date
            WriteOutcome::AlreadyExists(path) => Ok(RunOutcome::SkippedExisting(path)),
        }
    }

    async fn predict_symbol(
        &self,
        symbol: &str,
        date: NaiveDate,
        benchmark: Option<&[PriceBar]>,
    ) -> CuratorResult<curator_core::Prediction> {
        let bars = self.price_source.fetch_bars(symbol, HISTORY_DAYS).await?;
        let last_close = bars
            .last()
            .map(|b| b.close)
            .ok_or_else(|| CuratorError::DataUnavailable(format!("no bars for {symbol}")))?;

        let vector = self.engine.compute(&bars, benchmark)?;
        self.predictor.predict(symbol, date, &vector, last_close).await
    }
}

/// Unique resolved symbols worth pricing: IPO mentions have no history to
/// fetch and stay LLM-only. BTreeSet keeps processing order deterministic.
fn tradable_symbols(recommendations: &[Recommendation]) -> Vec<String> {
    recommendations
        .iter()
        .filter(|r| !r.is_ipo)
        .filter_map(|r| r.resolved_symbol.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
