//! Stock Master Index: resolves free-text company mentions from the LLM
//! extraction stage against the static NSE symbol master list.
//!
//! Loaded once at startup and read-only afterwards. Not-found is a normal
//! outcome recorded as a null resolution, never an error.

use std::collections::HashMap;
use std::path::Path;

use curator_core::{
    CuratorResult, InstrumentType, RawRecommendation, Recommendation, ResolutionMethod,
    StockRecord,
};

pub mod matcher;

#[cfg(test)]
mod index_tests;

/// Minimum word-overlap score for a fuzzy match to count.
const FUZZY_THRESHOLD: f64 = 0.4;

/// Minimum score for the bank-priority pass to claim a mention.
const BANK_PRIORITY_THRESHOLD: f64 = 0.5;

pub struct StockMasterIndex {
    records: Vec<StockRecord>,
    /// Uppercased trading symbol -> record index.
    by_symbol: HashMap<String, usize>,
    /// Normalized company name (and its suffix-stripped variant) -> index.
    by_name: HashMap<String, usize>,
}

impl StockMasterIndex {
    /// Loads the static master list from a JSON array of records.
    pub fn load(path: &Path) -> CuratorResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let records: Vec<StockRecord> = serde_json::from_str(&raw)?;
        tracing::info!(count = records.len(), "loaded stock master list");
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<StockRecord>) -> Self {
        let mut by_symbol = HashMap::new();
        let mut by_name = HashMap::new();

        for (i, record) in records.iter().enumerate() {
            by_symbol.insert(record.trading_symbol.to_uppercase(), i);
            by_name.entry(record.company_name.to_lowercase().trim().to_string()).or_insert(i);
            by_name.entry(matcher::normalize(&record.company_name)).or_insert(i);
        }

        Self {
            records,
            by_symbol,
            by_name,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pure map lookup of a symbol's ISIN.
    pub fn lookup_isin(&self, symbol: &str) -> Option<&str> {
        self.by_symbol
            .get(&symbol.to_uppercase())
            .map(|&i| self.records[i].isin.as_str())
    }

    pub fn record(&self, symbol: &str) -> Option<&StockRecord> {
        self.by_symbol.get(&symbol.to_uppercase()).map(|&i| &self.records[i])
    }

    /// Resolves a free-text mention. The ladder runs from cheapest to
    /// loosest: exact symbol, exact normalized name, short name, acronym,
    /// word-overlap fuzzy match above the threshold.
    ///
    /// With `equity_only` set, derivative instruments never match — the
    /// recommendation flow only trades cash equities.
    pub fn resolve(
        &self,
        mention: &str,
        equity_only: bool,
    ) -> Option<(&StockRecord, ResolutionMethod)> {
        let mention = mention.trim();
        if mention.is_empty() {
            return None;
        }
        let allowed =
            |r: &StockRecord| !equity_only || r.instrument_type != InstrumentType::Derivative;

        if let Some(&i) = self.by_symbol.get(&mention.to_uppercase()) {
            if allowed(&self.records[i]) {
                return Some((&self.records[i], ResolutionMethod::SymbolMatch));
            }
        }

        if let Some(&i) = self
            .by_name
            .get(&mention.to_lowercase())
            .or_else(|| self.by_name.get(&matcher::normalize(mention)))
        {
            if allowed(&self.records[i]) {
                return Some((&self.records[i], ResolutionMethod::NameMatch));
            }
        }

        let normalized = matcher::normalize(mention);
        for record in self.records.iter().filter(|r| allowed(r)) {
            if let Some(short) = &record.short_name {
                if short.eq_ignore_ascii_case(mention)
                    || matcher::normalize(short) == normalized
                {
                    return Some((record, ResolutionMethod::ShortNameMatch));
                }
            }
        }

        if matcher::looks_like_acronym(mention) {
            for record in self.records.iter().filter(|r| allowed(r)) {
                if matcher::acronym_match(mention, &record.company_name) {
                    return Some((record, ResolutionMethod::AcronymMatch));
                }
            }
        }

        // Bank brands name fund houses, ETFs and insurance arms too; a bank
        // mention must land on the bank itself, not the loosest overlap.
        if matcher::is_bank_query(mention) {
            let mut best: Option<(&StockRecord, f64)> = None;
            for record in self.records.iter().filter(|r| allowed(r)) {
                if let Some(score) = matcher::bank_priority_score(
                    mention,
                    &record.company_name,
                    record.short_name.as_deref(),
                ) {
                    if score > best.map_or(BANK_PRIORITY_THRESHOLD, |(_, s)| s) {
                        best = Some((record, score));
                    }
                }
            }
            if let Some((record, score)) = best {
                tracing::debug!(mention, symbol = %record.trading_symbol, score, "bank priority match");
                return Some((record, ResolutionMethod::BankPriorityMatch));
            }
        }

        let mut best: Option<(&StockRecord, f64)> = None;
        for record in self.records.iter().filter(|r| allowed(r)) {
            let score = matcher::overlap_score(mention, &record.company_name);
            if score > best.map_or(FUZZY_THRESHOLD, |(_, s)| s) {
                best = Some((record, score));
            }
        }
        best.map(|(record, score)| {
            tracing::debug!(mention, symbol = %record.trading_symbol, score, "fuzzy match");
            (record, ResolutionMethod::FuzzyMatch)
        })
    }

    /// Enriches a batch of raw LLM extractions. Unresolved mentions stay in
    /// the output with a null symbol; IPO mentions are carried through
    /// unresolved so downstream feature computation skips them (no trading
    /// history exists yet). A mention resolving to an IPO-typed master
    /// record is flagged the same way even when the extraction missed it.
    pub fn validate(&self, raw: &[RawRecommendation], equity_only: bool) -> Vec<Recommendation> {
        let validated: Vec<Recommendation> = raw
            .iter()
            .map(|r| {
                let resolved = if r.is_ipo {
                    None
                } else {
                    self.resolve(&r.company_mention, equity_only)
                };
                let is_ipo = r.is_ipo
                    || matches!(resolved, Some((record, _)) if record.instrument_type == InstrumentType::Ipo);
                let (resolved_symbol, resolution_method) = match resolved {
                    Some((record, method)) => {
                        (Some(record.trading_symbol.clone()), Some(method))
                    }
                    None => (None, None),
                };
                Recommendation {
                    company_mention: r.company_mention.clone(),
                    resolved_symbol,
                    resolution_method,
                    action: r.action,
                    confidence: r.confidence,
                    reason: r.reason.clone(),
                    news_type: r.news_type.clone(),
                    source_url: r.source_url.clone(),
                    is_ipo,
                }
            })
            .collect();

        let resolved_count = validated.iter().filter(|r| r.resolved_symbol.is_some()).count();
        tracing::info!(
            total = validated.len(),
            resolved = resolved_count,
            "validated LLM recommendations"
        );
        validated
    }
}
