use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV candle for a single symbol.
///
/// Sequences are chronological; missing trading days are simply absent,
/// never zero-filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Open interest. The candle feed carries it for every instrument;
    /// zero where the instrument has none.
    #[serde(default)]
    pub open_interest: f64,
}

/// Instrument classification from the master list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentType {
    Equity,
    Ipo,
    Derivative,
    Other,
}

/// One entry of the static symbol master list. Loaded once at startup,
/// never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRecord {
    pub trading_symbol: String,
    pub company_name: String,
    /// Common abbreviated name used in news copy (e.g. "SBI").
    #[serde(default)]
    pub short_name: Option<String>,
    pub isin: String,
    pub exchange: String,
    pub instrument_type: InstrumentType,
}

/// Action extracted by the LLM from a news article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
    Watch,
    IpoWatch,
    Avoid,
}

/// Which strategy of the master index matched a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    SymbolMatch,
    NameMatch,
    ShortNameMatch,
    AcronymMatch,
    BankPriorityMatch,
    FuzzyMatch,
}

/// A raw recommendation candidate as handed over by the LLM extraction
/// stage, before symbol resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecommendation {
    pub company_mention: String,
    pub action: Action,
    pub confidence: f64,
    pub reason: String,
    pub news_type: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub is_ipo: bool,
}

/// An LLM-sourced recommendation after validation against the master list.
///
/// `resolved_symbol = None` is a normal outcome (the mention could not be
/// matched), not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub company_mention: String,
    pub resolved_symbol: Option<String>,
    #[serde(default)]
    pub resolution_method: Option<ResolutionMethod>,
    pub action: Action,
    pub confidence: f64,
    pub reason: String,
    pub news_type: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub is_ipo: bool,
}

/// Predicted direction of the frozen classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

/// ML directional forecast for one symbol as of one trading day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub symbol: String,
    pub as_of_date: NaiveDate,
    pub direction: Direction,
    pub probability_up: f64,
    pub probability_down: f64,
    pub last_close: f64,
}

/// How an LLM recommendation and an ML prediction relate for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Agreement {
    Agree,
    Disagree,
    LlmOnly,
    MlOnly,
}

/// Joined per-symbol record, recomputed every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedSignal {
    pub symbol: String,
    pub recommendation: Option<Recommendation>,
    pub prediction: Option<Prediction>,
    pub agreement: Agreement,
}

/// Run-level metadata persisted alongside the signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_date: NaiveDate,
    pub recommendation_count: usize,
    pub prediction_count: usize,
    /// Fraction of mentions resolved to a canonical symbol.
    pub validation_rate: f64,
    /// Symbols dropped after retry exhaustion or insufficient history.
    #[serde(default)]
    pub skipped_symbols: Vec<String>,
}

/// The daily artifact: the sole contract the dashboard depends on.
/// Field renames here are breaking changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyResults {
    pub metadata: RunMetadata,
    pub llm_recommendations: Vec<Recommendation>,
    pub ml_predictions: Vec<Prediction>,
    pub combined_signals: Vec<CombinedSignal>,
}
