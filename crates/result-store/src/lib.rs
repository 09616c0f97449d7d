//! Result Store: one JSON artifact per calendar date, the sole contract the
//! dashboard reads.
//!
//! Writes are atomic: the document is fully materialized to a temp file in
//! the same directory, then renamed into place, so a reader never observes
//! a half-written artifact. An existing artifact for a date is treated as
//! append-only history and never overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use curator_core::{CuratorError, CuratorResult, DailyResults};

pub struct ResultStore {
    dir: PathBuf,
}

/// Outcome of a write attempt for a date.
#[derive(Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// An artifact for this date already exists; the run should be skipped.
    AlreadyExists(PathBuf),
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{date}_signals.json"))
    }

    pub fn exists(&self, date: NaiveDate) -> bool {
        self.path_for(date).exists()
    }

    /// Serializes and atomically installs the daily artifact. Serialization
    /// or I/O failure here is fatal for the run; nothing partial is left at
    /// the final path.
    pub fn write(&self, results: &DailyResults) -> CuratorResult<WriteOutcome> {
        let final_path = self.path_for(results.metadata.run_date);
        if final_path.exists() {
            tracing::info!(path = %final_path.display(), "artifact already exists, not overwriting");
            return Ok(WriteOutcome::AlreadyExists(final_path));
        }

        fs::create_dir_all(&self.dir)?;
        let body = serde_json::to_vec_pretty(results)?;

        // Same-directory temp file so the rename is a single-filesystem move
        let tmp_path = final_path.with_extension("json.tmp");
        fs::write(&tmp_path, &body)?;
        if let Err(e) = fs::rename(&tmp_path, &final_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(CuratorError::Store(e));
        }

        tracing::info!(
            path = %final_path.display(),
            recommendations = results.llm_recommendations.len(),
            predictions = results.ml_predictions.len(),
            signals = results.combined_signals.len(),
            "daily results written"
        );
        Ok(WriteOutcome::Written(final_path))
    }

    pub fn read(&self, date: NaiveDate) -> CuratorResult<DailyResults> {
        Self::read_path(&self.path_for(date))
    }

    pub fn read_path(path: &Path) -> CuratorResult<DailyResults> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
