// src/edgar/models.rs
use serde::Deserialize;

/// Structure representing the EDGAR company submission index.
/// Example: https://data.sec.gov/submissions/CIK0000789019.json
/// Only the fields the pipeline reads are modeled.
#[derive(Debug, Deserialize)]
pub struct CompanySubmission {
    #[serde(default)]
    pub cik: String,
    pub name: String,
    #[serde(default)]
    pub tickers: Vec<String>,
    pub filings: Filings,
}

#[derive(Debug, Deserialize)]
pub struct Filings {
    pub recent: FilingsList,
}

/// Column-oriented listing: index `i` of every vector describes the same filing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingsList {
    pub accession_number: Vec<String>,
    pub filing_date: Vec<String>,
    pub form: Vec<String>,
    pub primary_document: Vec<String>,
}

/// Simple struct representing a specific filing we want to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingInfo {
    pub accession_number: String,
    pub filing_date: String,
    pub form_type: String,
    pub ticker: String,
    pub company_name: String,
    pub cik: String,
    pub primary_doc: String,
    pub year: Option<u32>, // Year the filing was submitted
}

impl FilingInfo {
    /// Constructs the URL to access the primary document of this filing
    pub fn primary_doc_url(&self) -> String {
        let acc_no_dashes = self.accession_number.replace('-', "");
        let cik = self.cik.trim_start_matches('0');
        format!(
            "https://www.sec.gov/Archives/edgar/data/{}/{}/{}",
            cik, acc_no_dashes, self.primary_doc
        )
    }

    /// One-line description used in download logs.
    pub fn describe(&self) -> String {
        let year = self.year.map_or_else(|| "unknown year".to_string(), |y| y.to_string());
        format!(
            "{} {} ({}) filed {} [{}]",
            self.company_name, self.form_type, year, self.filing_date, self.accession_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msft_filing() -> FilingInfo {
        FilingInfo {
            accession_number: "0000950170-24-087843".to_string(),
            filing_date: "2024-07-30".to_string(),
            form_type: "10-K".to_string(),
            ticker: "MSFT".to_string(),
            company_name: "MICROSOFT CORP".to_string(),
            cik: "0000789019".to_string(),
            primary_doc: "msft-20240630.htm".to_string(),
            year: Some(2024),
        }
    }

    #[test]
    fn test_primary_doc_url_strips_padding_and_dashes() {
        let filing = msft_filing();
        assert_eq!(
            filing.primary_doc_url(),
            "https://www.sec.gov/Archives/edgar/data/789019/000095017024087843/msft-20240630.htm"
        );
    }

    #[test]
    fn test_describe_names_company_form_and_year() {
        let mut filing = msft_filing();
        assert_eq!(
            filing.describe(),
            "MICROSOFT CORP 10-K (2024) filed 2024-07-30 [0000950170-24-087843]"
        );

        filing.year = None;
        assert!(filing.describe().contains("(unknown year)"));
    }

    #[test]
    fn test_submission_deserializes_camel_case_columns() {
        let json = r#"{
            "cik": "789019",
            "name": "MICROSOFT CORP",
            "tickers": ["MSFT"],
            "sic": "7372",
            "filings": {
                "recent": {
                    "accessionNumber": ["0000950170-24-087843"],
                    "filingDate": ["2024-07-30"],
                    "reportDate": ["2024-06-30"],
                    "form": ["10-K"],
                    "primaryDocument": ["msft-20240630.htm"]
                },
                "files": []
            }
        }"#;

        let submission: CompanySubmission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.name, "MICROSOFT CORP");
        assert_eq!(submission.filings.recent.form, vec!["10-K"]);
        assert_eq!(submission.filings.recent.primary_document, vec!["msft-20240630.htm"]);
    }
}
