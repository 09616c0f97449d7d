use curator_core::{Action, InstrumentType, RawRecommendation, ResolutionMethod, StockRecord};

use crate::StockMasterIndex;

fn record(
    symbol: &str,
    name: &str,
    short: Option<&str>,
    isin: &str,
    instrument_type: InstrumentType,
) -> StockRecord {
    StockRecord {
        trading_symbol: symbol.to_string(),
        company_name: name.to_string(),
        short_name: short.map(|s| s.to_string()),
        isin: isin.to_string(),
        exchange: "NSE".to_string(),
        instrument_type,
    }
}

fn sample_index() -> StockMasterIndex {
    StockMasterIndex::from_records(vec![
        record(
            "RELIANCE",
            "Reliance Industries Limited",
            None,
            "INE002A01018",
            InstrumentType::Equity,
        ),
        record(
            "TCS",
            "Tata Consultancy Services Limited",
            Some("TCS"),
            "INE467B01029",
            InstrumentType::Equity,
        ),
        record(
            "SBIN",
            "State Bank India",
            Some("SBI"),
            "INE062A01020",
            InstrumentType::Equity,
        ),
        record(
            "INFY",
            "Infosys Limited",
            None,
            "INE009A01021",
            InstrumentType::Equity,
        ),
        record(
            "NIFTYFUT",
            "Nifty Index Futures",
            None,
            "INE000000001",
            InstrumentType::Derivative,
        ),
        record(
            "HDFCBANK",
            "HDFC Bank Limited",
            Some("HDFC Bank"),
            "INE040A01034",
            InstrumentType::Equity,
        ),
        record(
            "HDFCAMC",
            "HDFC Asset Management Company Limited",
            None,
            "INE127D01025",
            InstrumentType::Equity,
        ),
        record(
            "HDFCLIFE",
            "HDFC Life Insurance Company Limited",
            None,
            "INE795G01014",
            InstrumentType::Equity,
        ),
        record(
            "NEWIPO",
            "Shiny New Listings Limited",
            None,
            "INE999Z01019",
            InstrumentType::Ipo,
        ),
    ])
}

fn raw(mention: &str, action: Action) -> RawRecommendation {
    RawRecommendation {
        company_mention: mention.to_string(),
        action,
        confidence: 0.8,
        reason: "test".to_string(),
        news_type: "earnings".to_string(),
        source_url: None,
        is_ipo: false,
    }
}

#[test]
fn symbol_and_name_resolve_to_the_same_record() {
    let index = sample_index();

    let (by_symbol, method) = index.resolve("RELIANCE", true).unwrap();
    assert_eq!(method, ResolutionMethod::SymbolMatch);

    let (by_name, method) = index.resolve("Reliance Industries Ltd", true).unwrap();
    assert_eq!(method, ResolutionMethod::NameMatch);

    assert_eq!(by_symbol.trading_symbol, by_name.trading_symbol);
    assert_eq!(by_symbol.isin, by_name.isin);
}

#[test]
fn symbol_match_is_case_insensitive() {
    let index = sample_index();
    let (record, _) = index.resolve("reliance", true).unwrap();
    assert_eq!(record.trading_symbol, "RELIANCE");
}

#[test]
fn short_name_and_acronym_resolve() {
    let index = sample_index();

    let (record, method) = index.resolve("SBI", true).unwrap();
    assert_eq!(record.trading_symbol, "SBIN");
    assert_eq!(method, ResolutionMethod::ShortNameMatch);

    let (record, method) = index.resolve("TCS", true).unwrap();
    assert_eq!(record.trading_symbol, "TCS");
    // Exact ticker wins before the looser strategies run
    assert_eq!(method, ResolutionMethod::SymbolMatch);
}

#[test]
fn fuzzy_match_survives_suffix_and_punctuation_noise() {
    let index = sample_index();

    let (record, _) = index.resolve("Tata Consultancy Services", true).unwrap();
    assert_eq!(record.trading_symbol, "TCS");

    let (record, _) = index.resolve("Infosys Ltd.", true).unwrap();
    assert_eq!(record.trading_symbol, "INFY");
}

#[test]
fn unknown_mention_is_not_found_not_an_error() {
    let index = sample_index();
    assert!(index.resolve("Acme Widgets International", true).is_none());
    assert!(index.resolve("", true).is_none());
}

#[test]
fn derivative_is_rejected_for_equity_only_flows() {
    let index = sample_index();

    assert!(index.resolve("NIFTYFUT", true).is_none());
    let (record, _) = index.resolve("NIFTYFUT", false).unwrap();
    assert_eq!(record.instrument_type, InstrumentType::Derivative);
}

#[test]
fn isin_lookup_is_exact() {
    let index = sample_index();
    assert_eq!(index.lookup_isin("RELIANCE"), Some("INE002A01018"));
    assert_eq!(index.lookup_isin("reliance"), Some("INE002A01018"));
    assert_eq!(index.lookup_isin("UNKNOWN"), None);
}

#[test]
fn validate_records_null_resolution_and_keeps_going() {
    let index = sample_index();
    let raws = vec![
        raw("Reliance Industries Ltd", Action::Buy),
        raw("Acme Widgets International", Action::Sell),
        raw("Infosys", Action::Watch),
    ];

    let validated = index.validate(&raws, true);
    assert_eq!(validated.len(), 3);
    assert_eq!(
        validated[0].resolved_symbol.as_deref(),
        Some("RELIANCE")
    );
    assert!(validated[1].resolved_symbol.is_none());
    assert!(validated[1].resolution_method.is_none());
    assert_eq!(validated[2].resolved_symbol.as_deref(), Some("INFY"));
}

#[test]
fn bank_mentions_prefer_the_bank_over_fund_houses() {
    let index = sample_index();

    let (record, method) = index.resolve("HDFC", true).unwrap();
    assert_eq!(record.trading_symbol, "HDFCBANK");
    assert_eq!(method, ResolutionMethod::BankPriorityMatch);
}

#[test]
fn insurance_mentions_bypass_the_bank_pass() {
    let index = sample_index();

    let (record, method) = index.resolve("HDFC Life Insurance", true).unwrap();
    assert_eq!(record.trading_symbol, "HDFCLIFE");
    assert_eq!(method, ResolutionMethod::FuzzyMatch);
}

#[test]
fn ipo_typed_master_records_are_flagged_on_resolution() {
    let index = sample_index();

    let validated = index.validate(&[raw("NEWIPO", Action::Buy)], true);
    assert_eq!(validated[0].resolved_symbol.as_deref(), Some("NEWIPO"));
    assert!(validated[0].is_ipo);
}

#[test]
fn ipo_mentions_stay_unresolved_but_flagged() {
    let index = sample_index();
    let mut ipo = raw("Shiny New Listings", Action::IpoWatch);
    ipo.is_ipo = true;

    let validated = index.validate(&[ipo], true);
    assert!(validated[0].resolved_symbol.is_none());
    assert!(validated[0].is_ipo);
}
