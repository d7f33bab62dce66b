// src/analysis/keywords.rs
use crate::analysis::clean_text;
use crate::analysis::stopwords::is_stop_word;
use crate::storage::RiskFactorRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\w+\b").expect("Failed to compile WORD_RE")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub filename: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermFrequency {
    pub term: String,
    pub count: usize,
}

/// Number of cleaned words in each filing's section, placeholders included.
pub fn word_counts(records: &[RiskFactorRecord]) -> Vec<WordCount> {
    records
        .iter()
        .map(|record| WordCount {
            filename: record.filename.clone(),
            word_count: clean_text(&record.risk_factors).split_whitespace().count(),
        })
        .collect()
}

/// The `n` most frequent cleaned words across all filings.
pub fn top_keywords(records: &[RiskFactorRecord], n: usize) -> Vec<TermFrequency> {
    let cleaned: Vec<String> = records.iter().map(|r| clean_text(&r.risk_factors)).collect();
    most_common(cleaned.iter().flat_map(|text| text.split_whitespace()), n)
}

/// The `top_n` most frequent non-stop-words of a single section.
pub fn word_frequencies(text: &str, top_n: usize) -> Vec<TermFrequency> {
    let lowered = text.to_lowercase();
    let words = WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| !is_stop_word(word));
    most_common(words, top_n)
}

/// Counts words, highest count first; equal counts keep first-seen order.
fn most_common<'a, I>(words: I, n: usize) -> Vec<TermFrequency>
where
    I: Iterator<Item = &'a str>,
{
    // word -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in words.enumerate() {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
        count_b.cmp(count_a).then(first_a.cmp(first_b))
    });

    ranked
        .into_iter()
        .take(n)
        .map(|(term, (count, _))| TermFrequency { term: term.to_string(), count })
        .collect()
}
