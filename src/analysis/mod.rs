// src/analysis/mod.rs
//! Exploratory statistics over the stored risk factor sections.

pub mod keywords;
pub mod similarity;
pub mod stopwords;

use crate::storage::RiskFactorRecord;
use crate::utils::error::AnalysisError;
use serde::Serialize;

pub use keywords::{top_keywords, word_counts, word_frequencies, TermFrequency, WordCount};
pub use similarity::{similarity_matrix, SimilarityMatrix};

/// Lowercases, turns newlines into spaces, keeps only `a-z` and whitespace,
/// then collapses whitespace runs.
pub fn clean_text(text: &str) -> String {
    let letters: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();

    letters.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub word_counts: Vec<WordCount>,
    pub top_keywords: Vec<TermFrequency>,
    pub similarity: SimilarityMatrix,
    pub generated_at: String,
}

/// Runs every corpus-level analysis over the table.
pub fn analyze(records: &[RiskFactorRecord], top_n: usize) -> Result<AnalysisReport, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::NoRecords);
    }

    let missing = records.iter().filter(|r| !r.is_found()).count();
    if missing > 0 {
        tracing::warn!("{} of {} filings have no extracted risk factors", missing, records.len());
    }

    Ok(AnalysisReport {
        word_counts: word_counts(records),
        top_keywords: top_keywords(records, top_n),
        similarity: similarity_matrix(records),
        generated_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// Looks up one filing's row by file name.
pub fn find_record<'a>(records: &'a [RiskFactorRecord], filename: &str) -> Result<&'a RiskFactorRecord, AnalysisError> {
    records
        .iter()
        .find(|r| r.filename == filename)
        .ok_or_else(|| AnalysisError::UnknownFiling(filename.to_string()))
}
