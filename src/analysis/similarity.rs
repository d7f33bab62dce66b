// src/analysis/similarity.rs
//! TF-IDF vectors over the cleaned sections and their pairwise cosine similarity.

use crate::analysis::clean_text;
use crate::analysis::stopwords::is_vectorizer_stop_word;
use crate::storage::RiskFactorRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

// Terms are runs of two or more word characters.
static TERM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\w\w+\b").expect("Failed to compile TERM_RE")
});

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityMatrix {
    pub filenames: Vec<String>,
    pub scores: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    pub fn score(&self, row: usize, col: usize) -> f64 {
        self.scores[row][col]
    }
}

impl fmt::Display for SimilarityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.filenames.iter().map(|name| name.len()).max().unwrap_or(0).max(4);

        write!(f, "{:width$}", "", width = width)?;
        for name in &self.filenames {
            write!(f, "  {:>width$}", name, width = width)?;
        }
        writeln!(f)?;

        for (row, name) in self.filenames.iter().enumerate() {
            write!(f, "{:width$}", name, width = width)?;
            for col in 0..self.filenames.len() {
                write!(f, "  {:>width$.2}", self.score(row, col), width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Builds L2-normalized TF-IDF vectors (smoothed idf) and returns the cosine
/// similarity of every pair of filings. A section with no terms left after
/// stop word removal scores 0 against everything, itself included.
pub fn similarity_matrix(records: &[RiskFactorRecord]) -> SimilarityMatrix {
    let cleaned: Vec<String> = records.iter().map(|r| clean_text(&r.risk_factors)).collect();
    let term_counts: Vec<HashMap<&str, f64>> = cleaned.iter().map(|text| count_terms(text)).collect();

    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for counts in &term_counts {
        for term in counts.keys() {
            *document_frequency.entry(*term).or_insert(0) += 1;
        }
    }

    let n_docs = records.len() as f64;
    let vectors: Vec<HashMap<&str, f64>> = term_counts
        .into_iter()
        .map(|counts| {
            let mut vector: HashMap<&str, f64> = counts
                .into_iter()
                .map(|(term, tf)| {
                    let df = document_frequency[term] as f64;
                    let idf = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
                    (term, tf * idf)
                })
                .collect();
            normalize(&mut vector);
            vector
        })
        .collect();

    let scores = vectors
        .iter()
        .map(|a| vectors.iter().map(|b| dot(a, b)).collect())
        .collect();

    tracing::debug!("Computed {}x{} similarity matrix over {} terms", records.len(), records.len(), document_frequency.len());

    SimilarityMatrix {
        filenames: records.iter().map(|r| r.filename.clone()).collect(),
        scores,
    }
}

fn count_terms(text: &str) -> HashMap<&str, f64> {
    let mut counts = HashMap::new();
    for term in TERM_RE.find_iter(text).map(|m| m.as_str()).filter(|t| !is_vectorizer_stop_word(t)) {
        *counts.entry(term).or_insert(0.0) += 1.0;
    }
    counts
}

fn normalize(vector: &mut HashMap<&str, f64>) {
    let norm = vector.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        vector.values_mut().for_each(|v| *v /= norm);
    }
}

fn dot(a: &HashMap<&str, f64>, b: &HashMap<&str, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, weight)| large.get(term).map(|other| weight * other))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(filename: &str, text: &str) -> RiskFactorRecord {
        RiskFactorRecord { filename: filename.to_string(), risk_factors: text.to_string() }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_sections_score_one() {
        let records = vec![
            record("a.html", "Cybersecurity incidents could harm operations."),
            record("b.html", "Cybersecurity incidents could harm operations."),
        ];
        let matrix = similarity_matrix(&records);
        assert!(approx(matrix.score(0, 1), 1.0));
        assert!(approx(matrix.score(0, 0), 1.0));
    }

    #[test]
    fn test_disjoint_sections_score_zero_and_matrix_is_symmetric() {
        let records = vec![
            record("a.html", "currency exchange volatility"),
            record("b.html", "litigation regulatory penalties"),
            record("c.html", "currency litigation"),
        ];
        let matrix = similarity_matrix(&records);
        assert!(approx(matrix.score(0, 1), 0.0));
        assert!(matrix.score(0, 2) > 0.0);
        for i in 0..3 {
            for j in 0..3 {
                assert!(approx(matrix.score(i, j), matrix.score(j, i)));
            }
        }
    }

    #[test]
    fn test_smoothed_idf_weights() {
        // "shared" appears in both documents, "alpha" only in the first.
        // idf(shared) = ln(3/3) + 1 = 1, idf(alpha) = ln(3/2) + 1.
        let records = vec![record("a.html", "shared alpha"), record("b.html", "shared")];
        let matrix = similarity_matrix(&records);

        let idf_alpha = (3.0f64 / 2.0).ln() + 1.0;
        let expected = 1.0 / (1.0 + idf_alpha * idf_alpha).sqrt();
        assert!(approx(matrix.score(0, 1), expected));
    }

    #[test]
    fn test_stop_word_only_section_scores_zero() {
        let records = vec![record("a.html", "the and of"), record("b.html", "market risk")];
        let matrix = similarity_matrix(&records);
        assert!(approx(matrix.score(0, 0), 0.0));
        assert!(approx(matrix.score(0, 1), 0.0));
        assert!(approx(matrix.score(1, 1), 1.0));
    }

    #[test]
    fn test_modal_only_sections_score_zero() {
        let records = vec![
            record("a.html", "may could also however"),
            record("b.html", "may could also however"),
        ];
        let matrix = similarity_matrix(&records);
        assert!(approx(matrix.score(0, 1), 0.0));
        assert!(approx(matrix.score(0, 0), 0.0));
    }

    #[test]
    fn test_display_rounds_to_two_decimals() {
        let records = vec![record("a.html", "market risk"), record("b.html", "market risk")];
        let rendered = similarity_matrix(&records).to_string();
        assert!(rendered.contains("a.html"));
        assert!(rendered.contains("1.00"));
    }
}
