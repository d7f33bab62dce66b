// src/extractors/section.rs

// --- Imports ---
use crate::extractors::text::Filing;
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder stored in place of the section text when extraction fails.
pub const NOT_FOUND_SENTINEL: &str = "⚠️ NOT FOUND";

// --- Regex Patterns for Line Matching (Lazy Static) ---
// Start marker: "Item 1A" anywhere on the line, whitespace between the two optional.
static ITEM_1A_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)item\s*1a").expect("Failed to compile ITEM_1A_RE")
});

// End markers must open the line: "Item 1B" (Unresolved Staff Comments) or "Item 2" (Properties).
static SECTION_END_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^item\s+1b",
        r"(?i)^item\s+2",
    ]
    .iter()
    .map(|pat| Regex::new(pat).expect("Failed to compile SECTION_END_RE"))
    .collect()
});

const RISK_FACTOR_PHRASE: &str = "risk factor";

// --- Data Structures ---

/// Line indices of a located section. `end` is exclusive; `None` means the
/// section runs to the last line of the filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBounds {
    pub start: usize,
    pub end: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Found(String),
    NotFound,
}

impl ExtractionResult {
    /// Renders the result the way the tabular store keeps it.
    pub fn into_stored_text(self) -> String {
        match self {
            ExtractionResult::Found(text) => text,
            ExtractionResult::NotFound => NOT_FOUND_SENTINEL.to_string(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ExtractionResult::Found(_))
    }
}

// --- Main Extractor Structure ---

/// Locates the "Item 1A. Risk Factors" section in a linearized filing.
///
/// The first line mentioning both "Item 1A" and "risk factor" opens the
/// section, even when it is a table of contents entry. The section closes at
/// the next line that *starts* with "Item 1B" or "Item 2".
#[derive(Debug, Default, Clone, Copy)]
pub struct SectionExtractor;

impl SectionExtractor {
    pub fn new() -> Self { Self }

    /// Finds the start and (optional) end line of the risk factor section.
    pub fn locate(&self, filing: &Filing) -> Option<SectionBounds> {
        let lines = filing.lines();

        let start = lines.iter().position(|line| is_section_start(line))?;
        tracing::debug!("Risk factor section starts at line {}: '{}'", start, lines[start]);

        let end = lines[start + 1..]
            .iter()
            .position(|line| is_section_end(line))
            .map(|offset| start + 1 + offset);

        match end {
            Some(end) => tracing::debug!("Risk factor section ends before line {}: '{}'", end, lines[end]),
            None => tracing::debug!("No end marker after line {}, taking the rest of the filing", start),
        }

        Some(SectionBounds { start, end })
    }

    /// Extracts the risk factor section text, lines joined with `\n`.
    pub fn extract_risk_factors(&self, filing: &Filing) -> ExtractionResult {
        let Some(bounds) = self.locate(filing) else {
            return ExtractionResult::NotFound;
        };

        let lines = filing.lines();
        let section = match bounds.end {
            Some(end) => &lines[bounds.start..end],
            None => &lines[bounds.start..],
        };

        ExtractionResult::Found(section.join("\n"))
    }
}

fn is_section_start(line: &str) -> bool {
    ITEM_1A_RE.is_match(line) && line.to_lowercase().contains(RISK_FACTOR_PHRASE)
}

fn is_section_end(line: &str) -> bool {
    SECTION_END_RE.iter().any(|re| re.is_match(line))
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn filing(lines: &[&str]) -> Filing {
        Filing::from_lines(lines.iter().map(|l| l.to_string()))
    }

    #[test]
    fn test_extracts_between_item_1a_and_item_1b() {
        let doc = filing(&[
            "Annual Report",
            "Item 1A. Risk Factors",
            "Our business is subject to many risks.",
            "Competition could harm us.",
            "Item 1B. Unresolved Staff Comments",
            "None.",
        ]);

        let result = SectionExtractor::new().extract_risk_factors(&doc);
        assert_eq!(
            result,
            ExtractionResult::Found(
                "Item 1A. Risk Factors\nOur business is subject to many risks.\nCompetition could harm us.".to_string()
            )
        );
    }

    #[test]
    fn test_not_found_without_both_markers_on_one_line() {
        let doc = filing(&[
            "Item 1A.",
            "Risk Factors",
            "We face risks.",
            "Item 1B. Unresolved Staff Comments",
        ]);
        assert_eq!(SectionExtractor::new().extract_risk_factors(&doc), ExtractionResult::NotFound);
        assert!(SectionExtractor::new().locate(&doc).is_none());
    }

    #[test]
    fn test_not_found_on_empty_filing() {
        let doc = filing(&[]);
        assert_eq!(SectionExtractor::new().extract_risk_factors(&doc), ExtractionResult::NotFound);
    }

    #[test]
    fn test_runs_to_end_of_document_without_end_marker() {
        let doc = filing(&[
            "Cover page",
            "Item 1A. Risk Factors",
            "Risk one.",
            "Risk two.",
        ]);

        let extractor = SectionExtractor::new();
        assert_eq!(extractor.locate(&doc), Some(SectionBounds { start: 1, end: None }));
        assert_eq!(
            extractor.extract_risk_factors(&doc),
            ExtractionResult::Found("Item 1A. Risk Factors\nRisk one.\nRisk two.".to_string())
        );
    }

    #[test]
    fn test_start_line_is_case_insensitive() {
        let doc = filing(&["ITEM 1A - RISK FACTORS", "Body.", "ITEM 2. PROPERTIES"]);
        assert_eq!(
            SectionExtractor::new().extract_risk_factors(&doc),
            ExtractionResult::Found("ITEM 1A - RISK FACTORS\nBody.".to_string())
        );
    }

    #[test]
    fn test_start_allows_no_space_between_item_and_number() {
        let doc = filing(&["Item1A Risk Factor Summary", "Body."]);
        assert_eq!(
            SectionExtractor::new().locate(&doc),
            Some(SectionBounds { start: 0, end: None })
        );
    }

    #[test]
    fn test_earliest_start_wins_even_in_table_of_contents() {
        let doc = filing(&[
            "Table of Contents",
            "Item 1A. Risk Factors 12",
            "Item 1B. Unresolved Staff Comments 25",
            "Item 1A. Risk Factors",
            "The real narrative.",
            "Item 1B. Unresolved Staff Comments",
        ]);

        let extractor = SectionExtractor::new();
        assert_eq!(extractor.locate(&doc), Some(SectionBounds { start: 1, end: Some(2) }));
        assert_eq!(
            extractor.extract_risk_factors(&doc),
            ExtractionResult::Found("Item 1A. Risk Factors 12".to_string())
        );
    }

    #[test]
    fn test_end_marker_must_open_the_line() {
        let doc = filing(&[
            "Item 1A. Risk Factors",
            "See the item 1b discussion below.",
            "Item 2 Properties and other matters",
            "We lease offices.",
        ]);

        assert_eq!(
            SectionExtractor::new().extract_risk_factors(&doc),
            ExtractionResult::Found("Item 1A. Risk Factors\nSee the item 1b discussion below.".to_string())
        );
    }

    #[test]
    fn test_end_marker_is_prefix_match_in_any_case() {
        let doc = filing(&["Item 1A. Risk Factors", "Body.", "iTeM 2"]);
        assert_eq!(
            SectionExtractor::new().locate(&doc),
            Some(SectionBounds { start: 0, end: Some(2) })
        );

        // "Item 20" still opens with "item 2"
        let doc = filing(&["Item 1A. Risk Factors", "Body.", "Item 20. Something"]);
        assert_eq!(
            SectionExtractor::new().locate(&doc),
            Some(SectionBounds { start: 0, end: Some(2) })
        );
    }

    #[test]
    fn test_end_marker_requires_whitespace() {
        let doc = filing(&["Item 1A. Risk Factors", "Item1B. Unresolved", "Item 2. Properties"]);
        assert_eq!(
            SectionExtractor::new().locate(&doc),
            Some(SectionBounds { start: 0, end: Some(2) })
        );
    }

    #[test]
    fn test_end_search_starts_after_start_line() {
        // The start line itself can never close the section.
        let doc = filing(&["Item 2 and Item 1A risk factors", "Body."]);
        assert_eq!(
            SectionExtractor::new().extract_risk_factors(&doc),
            ExtractionResult::Found("Item 2 and Item 1A risk factors\nBody.".to_string())
        );
    }

    #[test]
    fn test_not_found_renders_as_sentinel() {
        assert_eq!(ExtractionResult::NotFound.into_stored_text(), NOT_FOUND_SENTINEL);
        assert_eq!(ExtractionResult::Found("x".into()).into_stored_text(), "x");
    }
}
