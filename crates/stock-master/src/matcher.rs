//! Text normalization and fuzzy-matching helpers for mention resolution.

const SUFFIXES: &[&str] = &[
    "ltd.",
    "ltd",
    "limited",
    "pvt.",
    "pvt",
    "private",
    "inc.",
    "inc",
    "incorporated",
    "corp.",
    "corp",
    "corporation",
];

const STOP_WORDS: &[&str] = &["and", "the", "of", "a", "an", "in", "on", "at", "to", "for"];

/// Lowercases, strips trailing corporate suffixes, and replaces punctuation
/// with spaces so "Reliance Industries Ltd." and "reliance industries"
/// normalize identically.
pub fn normalize(text: &str) -> String {
    let mut cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '&' | '-' | '.' | ',' => ' ',
            _ => c,
        })
        .collect();

    loop {
        let trimmed = cleaned.trim_end().to_string();
        let mut stripped = false;
        for suffix in SUFFIXES {
            let bare = suffix.trim_end_matches('.');
            if let Some(rest) = trimmed.strip_suffix(bare) {
                if rest.ends_with(' ') || rest.is_empty() {
                    cleaned = rest.to_string();
                    stripped = true;
                    break;
                }
            }
        }
        if !stripped {
            break;
        }
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Significant words of a normalized mention: stop words and single
/// characters dropped.
pub fn key_words(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .filter(|w| w.len() > 1 && !STOP_WORDS.contains(w))
        .map(|w| w.to_string())
        .collect()
}

/// True when one word is a prefix of the other, or both share a 4-letter
/// stem ("infosys" vs "infy" style abbreviations).
pub fn abbreviation_match(a: &str, b: &str) -> bool {
    if a.starts_with(b) || b.starts_with(a) {
        return true;
    }
    if a.chars().count() < 4 || b.chars().count() < 4 {
        return false;
    }
    a.chars().take(4).eq(b.chars().take(4))
}

/// True when `acronym` is formed from the initials of the name's key words
/// ("SBI" against "State Bank of India").
pub fn acronym_match(acronym: &str, name: &str) -> bool {
    let words = key_words(name);
    let letters: Vec<char> = acronym.to_lowercase().chars().collect();
    if letters.is_empty() || letters.len() != words.len() {
        return false;
    }
    words
        .iter()
        .zip(&letters)
        .all(|(word, letter)| word.starts_with(*letter))
}

/// Word-overlap score of a mention against a candidate name, with
/// abbreviation support and a substring bonus. 1.0 means every mention
/// word found a counterpart.
pub fn overlap_score(mention: &str, candidate: &str) -> f64 {
    let mention_words = key_words(mention);
    let candidate_words = key_words(candidate);
    if mention_words.is_empty() || candidate_words.is_empty() {
        return 0.0;
    }

    let matches = mention_words
        .iter()
        .filter(|mw| candidate_words.iter().any(|cw| *mw == cw || abbreviation_match(mw, cw)))
        .count() as f64;

    let mut score = matches / mention_words.len() as f64;

    // Abbreviated listings: most of the candidate's words matched counts too
    score = score.max(matches / candidate_words.len() as f64);

    let norm_mention = normalize(mention);
    let norm_candidate = normalize(candidate);
    if !norm_mention.is_empty()
        && (norm_candidate.contains(&norm_mention) || norm_mention.contains(&norm_candidate))
    {
        score += 0.3;
    }

    score
}

const BANK_QUERY_WORDS: &[&str] = &["hdfc", "icici", "sbi", "axis", "kotak", "bank"];

/// True when the mention is plausibly about a bank, which switches
/// resolution to the bank-priority pass. Insurance arms share their
/// sponsor's brand, so a mention naming the insurance business is not a
/// bank query.
pub fn is_bank_query(mention: &str) -> bool {
    let normalized = normalize(mention);
    if normalized.contains("insurance") || normalized.contains("life") {
        return false;
    }
    BANK_QUERY_WORDS.iter().any(|w| normalized.contains(w))
}

/// Scores a candidate for a bank mention, or rejects it outright. Fund
/// houses and ETFs named after their sponsor bank never qualify, and the
/// candidate must itself be a bank.
pub fn bank_priority_score(
    mention: &str,
    candidate_name: &str,
    short_name: Option<&str>,
) -> Option<f64> {
    let name_lower = candidate_name.to_lowercase();
    if name_lower.contains("etf") || name_lower.contains("amc") || name_lower.contains("pramc") {
        return None;
    }
    if !name_lower.contains("bank") {
        return None;
    }

    let mention_words = key_words(mention);
    if mention_words.is_empty() {
        return None;
    }
    let candidate_words = key_words(candidate_name);

    let mut matches = mention_words
        .iter()
        .filter(|mw| candidate_words.iter().any(|cw| *mw == cw || abbreviation_match(mw, cw)))
        .count() as f64;

    // Short mentions like "HDFC" or "ICICI" lean on plain substring presence
    if mention_words.len() <= 2 {
        let normalized_candidate = normalize(candidate_name);
        matches += 2.0
            * mention_words
                .iter()
                .filter(|w| normalized_candidate.contains(w.as_str()))
                .count() as f64;
    }

    let mut score = matches / mention_words.len() as f64;

    let trimmed = mention.trim();
    if looks_like_acronym(trimmed) && acronym_match(trimmed, candidate_name) {
        score += 1.0;
    }
    if let Some(short) = short_name {
        let short_lower = short.to_lowercase();
        let normalized_mention = normalize(mention);
        if short_lower.contains(&normalized_mention) || normalized_mention.contains(&short_lower) {
            score += 0.8;
        }
    }
    // Listed banks carry the word in their registered name
    if name_lower.contains("bank ltd") || name_lower.contains("bank limited") {
        score += 0.5;
    }
    Some(score)
}

/// A short all-caps alphabetic mention is a plausible acronym or ticker.
pub fn looks_like_acronym(mention: &str) -> bool {
    let trimmed = mention.trim();
    (2..=5).contains(&trimmed.len())
        && trimmed.chars().all(|c| c.is_ascii_alphabetic() && c.is_ascii_uppercase())
}
