//! Signal Reconciler: joins LLM recommendations with ML predictions per
//! symbol and classifies their agreement.
//!
//! Only BUY and SELL carry directional semantics; HOLD/WATCH paired with
//! any prediction classifies as DISAGREE (a documented policy choice).
//! Recommendations are not deduplicated here — several mentions of one
//! symbol each join the same prediction by value.

use std::collections::{BTreeMap, HashSet};

use curator_core::{Action, Agreement, CombinedSignal, Direction, Prediction, Recommendation};

/// Full outer join on case-normalized trading symbol.
///
/// Output order follows the symbol join key, so the result is independent
/// of input ordering.
pub fn reconcile(
    recommendations: &[Recommendation],
    predictions: &[Prediction],
) -> Vec<CombinedSignal> {
    let prediction_by_symbol: BTreeMap<String, &Prediction> = predictions
        .iter()
        .map(|p| (p.symbol.to_uppercase(), p))
        .collect();

    let mut signals = Vec::new();
    let mut joined: HashSet<String> = HashSet::new();

    for rec in recommendations {
        match rec.resolved_symbol.as_deref() {
            Some(symbol) => {
                let key = symbol.to_uppercase();
                match prediction_by_symbol.get(&key) {
                    Some(prediction) => {
                        joined.insert(key.clone());
                        signals.push(CombinedSignal {
                            symbol: key,
                            agreement: classify(rec.action, prediction.direction),
                            recommendation: Some(rec.clone()),
                            prediction: Some((*prediction).clone()),
                        });
                    }
                    None => signals.push(CombinedSignal {
                        symbol: key,
                        recommendation: Some(rec.clone()),
                        prediction: None,
                        agreement: Agreement::LlmOnly,
                    }),
                }
            }
            // Unresolved mentions cannot join; they stay visible as LLM-only
            None => signals.push(CombinedSignal {
                symbol: rec.company_mention.clone(),
                recommendation: Some(rec.clone()),
                prediction: None,
                agreement: Agreement::LlmOnly,
            }),
        }
    }

    for (key, prediction) in &prediction_by_symbol {
        if !joined.contains(key) {
            signals.push(CombinedSignal {
                symbol: key.clone(),
                recommendation: None,
                prediction: Some((*prediction).clone()),
                agreement: Agreement::MlOnly,
            });
        }
    }

    tracing::debug!(
        recommendations = recommendations.len(),
        predictions = predictions.len(),
        signals = signals.len(),
        "reconciled signals"
    );
    signals
}

fn classify(action: Action, direction: Direction) -> Agreement {
    match (action, direction) {
        (Action::Buy, Direction::Up) | (Action::Sell, Direction::Down) => Agreement::Agree,
        _ => Agreement::Disagree,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(symbol: Option<&str>, mention: &str, action: Action) -> Recommendation {
        Recommendation {
            company_mention: mention.to_string(),
            resolved_symbol: symbol.map(|s| s.to_string()),
            resolution_method: None,
            action,
            confidence: 0.8,
            reason: "test".to_string(),
            news_type: "analyst_call".to_string(),
            source_url: None,
            is_ipo: false,
        }
    }

    fn pred(symbol: &str, direction: Direction) -> Prediction {
        let probability_up = match direction {
            Direction::Up => 0.7,
            Direction::Down => 0.3,
        };
        Prediction {
            symbol: symbol.to_string(),
            as_of_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            direction,
            probability_up,
            probability_down: 1.0 - probability_up,
            last_close: 100.0,
        }
    }

    fn agreement_of(signals: &[CombinedSignal], symbol: &str) -> Agreement {
        signals
            .iter()
            .find(|s| s.symbol == symbol)
            .map(|s| s.agreement)
            .unwrap()
    }

    #[test]
    fn join_examples_classify_correctly() {
        let recommendations = vec![
            rec(Some("RELIANCE"), "Reliance Industries", Action::Buy),
            rec(Some("TCS"), "TCS", Action::Sell),
            rec(Some("INFY"), "Infosys", Action::Watch),
        ];
        let predictions = vec![
            pred("RELIANCE", Direction::Up),
            pred("TCS", Direction::Up),
            pred("WIPRO", Direction::Down),
        ];

        let signals = reconcile(&recommendations, &predictions);
        assert_eq!(signals.len(), 4);
        assert_eq!(agreement_of(&signals, "RELIANCE"), Agreement::Agree);
        assert_eq!(agreement_of(&signals, "TCS"), Agreement::Disagree);
        assert_eq!(agreement_of(&signals, "INFY"), Agreement::LlmOnly);
        assert_eq!(agreement_of(&signals, "WIPRO"), Agreement::MlOnly);
    }

    #[test]
    fn sell_down_agrees_and_hold_disagrees() {
        let signals = reconcile(
            &[rec(Some("TCS"), "TCS", Action::Sell)],
            &[pred("TCS", Direction::Down)],
        );
        assert_eq!(agreement_of(&signals, "TCS"), Agreement::Agree);

        let signals = reconcile(
            &[rec(Some("TCS"), "TCS", Action::Hold)],
            &[pred("TCS", Direction::Up)],
        );
        assert_eq!(agreement_of(&signals, "TCS"), Agreement::Disagree);
    }

    #[test]
    fn join_key_is_case_normalized() {
        let signals = reconcile(
            &[rec(Some("reliance"), "Reliance", Action::Buy)],
            &[pred("RELIANCE", Direction::Up)],
        );
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].agreement, Agreement::Agree);
    }

    #[test]
    fn unresolved_mentions_stay_llm_only() {
        let signals = reconcile(
            &[rec(None, "Mystery Corp", Action::Buy)],
            &[pred("RELIANCE", Direction::Up)],
        );

        assert_eq!(signals.len(), 2);
        assert_eq!(agreement_of(&signals, "Mystery Corp"), Agreement::LlmOnly);
        assert_eq!(agreement_of(&signals, "RELIANCE"), Agreement::MlOnly);
    }

    #[test]
    fn duplicate_mentions_each_get_a_signal_sharing_one_prediction() {
        let recommendations = vec![
            rec(Some("RELIANCE"), "Reliance Industries", Action::Buy),
            rec(Some("RELIANCE"), "RIL", Action::Sell),
        ];
        let signals = reconcile(&recommendations, &[pred("RELIANCE", Direction::Up)]);

        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].agreement, Agreement::Agree);
        assert_eq!(signals[1].agreement, Agreement::Disagree);
        let p0 = signals[0].prediction.as_ref().unwrap();
        let p1 = signals[1].prediction.as_ref().unwrap();
        assert_eq!(p0.probability_up, p1.probability_up);
    }

    #[test]
    fn result_is_order_independent_as_a_set() {
        let mut recommendations = vec![
            rec(Some("RELIANCE"), "Reliance Industries", Action::Buy),
            rec(Some("TCS"), "TCS", Action::Sell),
            rec(None, "Mystery Corp", Action::Watch),
        ];
        let mut predictions = vec![
            pred("RELIANCE", Direction::Up),
            pred("WIPRO", Direction::Down),
        ];

        let forward = reconcile(&recommendations, &predictions);
        recommendations.reverse();
        predictions.reverse();
        let backward = reconcile(&recommendations, &predictions);

        let key = |s: &CombinedSignal| (s.symbol.clone(), format!("{:?}", s.agreement));
        let mut forward_keys: Vec<_> = forward.iter().map(key).collect();
        let mut backward_keys: Vec<_> = backward.iter().map(key).collect();
        forward_keys.sort();
        backward_keys.sort();
        assert_eq!(forward_keys, backward_keys);
    }
}
