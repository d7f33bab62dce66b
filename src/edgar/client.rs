// src/edgar/client.rs
use crate::edgar::models::{CompanySubmission, FilingInfo};
use crate::utils::error::EdgarError;
use reqwest::header;
use std::time::Duration;

const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";
const SUBMISSIONS_BASE_URL: &str = "https://data.sec.gov/submissions";
const ANNUAL_REPORT_FORM: &str = "10-K";

/// EDGAR HTTP client. The SEC rejects requests without a descriptive
/// User-Agent and throttles clients above 10 requests/second, so every
/// request carries the configured agent and waits `request_delay` first.
pub struct EdgarClient {
    http: reqwest::Client,
    user_agent: String,
    request_delay: Duration,
}

impl EdgarClient {
    pub fn new(user_agent: &str, request_delay: Duration) -> Result<Self, EdgarError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent) // Set the required User-Agent
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            user_agent: user_agent.to_string(),
            request_delay,
        })
    }

    /// Sends a GET after the politeness delay and maps SEC error statuses.
    async fn get(&self, url: &str) -> Result<reqwest::Response, EdgarError> {
        tracing::debug!("GET {} (User-Agent: {})", url, self.user_agent);
        tokio::time::sleep(self.request_delay).await;

        let response = self.http.get(url)
            .header(header::ACCEPT, "application/json,text/html,text/plain,*/*")
            .send()
            .await?; // Propagates reqwest::Error as EdgarError::Network

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        match status {
            reqwest::StatusCode::FORBIDDEN | reqwest::StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!("Received {} - check User-Agent and rate limits.", status);
                Err(EdgarError::RateLimited)
            }
            reqwest::StatusCode::NOT_FOUND => Err(EdgarError::FilingDocNotFound(url.to_string())),
            _ => Err(EdgarError::Http(status)),
        }
    }

    /// Downloads a specific filing document from its URL.
    pub async fn download_filing_doc(&self, url: &str) -> Result<String, EdgarError> {
        tracing::info!("Downloading document from: {}", url);
        let body = self.get(url).await?.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// Gets the CIK (Central Index Key) for a ticker symbol
    pub async fn get_cik_from_ticker(&self, ticker: &str) -> Result<String, EdgarError> {
        let json: serde_json::Value = self.get(COMPANY_TICKERS_URL).await?.json().await?;
        find_cik_in_tickers(&json, ticker)
    }

    /// Fetches the company submission data for a given CIK
    pub async fn get_company_submissions(&self, cik: &str) -> Result<CompanySubmission, EdgarError> {
        let url = format!("{}/CIK{}.json", SUBMISSIONS_BASE_URL, cik);
        let submission: CompanySubmission = self.get(&url).await?.json().await?;
        Ok(submission)
    }

    /// Finds up to `limit` 10-K filings for a ticker, newest first.
    pub async fn find_10k_filings(
        &self,
        ticker: &str,
        start_year: Option<u32>,
        end_year: Option<u32>,
        limit: usize,
    ) -> Result<Vec<FilingInfo>, EdgarError> {
        let cik = self.get_cik_from_ticker(ticker).await?;
        tracing::info!("CIK for {} is {}", ticker.to_uppercase(), cik);

        let submissions = self.get_company_submissions(&cik).await?;
        tracing::debug!(
            "Loaded {} recent filings for {} (CIK {}, tickers {:?})",
            submissions.filings.recent.form.len(),
            submissions.name,
            submissions.cik,
            submissions.tickers
        );
        select_10k_filings(&submissions, ticker, &cik, start_year, end_year, limit)
    }
}

/// Looks a ticker up in the SEC `company_tickers.json` document and returns
/// its CIK zero-padded to 10 digits.
pub fn find_cik_in_tickers(json: &serde_json::Value, ticker: &str) -> Result<String, EdgarError> {
    let ticker = ticker.to_uppercase();
    let companies = json
        .as_object()
        .ok_or_else(|| EdgarError::Parse("Invalid JSON structure".to_string()))?;

    for company in companies.values() {
        let matches = company
            .get("ticker")
            .and_then(|t| t.as_str())
            .is_some_and(|t| t.to_uppercase() == ticker);
        if !matches {
            continue;
        }

        let cik_num = company
            .get("cik_str")
            .and_then(|cik| cik.as_u64())
            .ok_or_else(|| EdgarError::Parse("Invalid CIK format".to_string()))?;
        return Ok(format!("{:010}", cik_num));
    }

    Err(EdgarError::TickerNotFound(ticker))
}

/// Picks 10-K rows out of the recent filings listing, keeping EDGAR's order
/// (newest first), filtered to the inclusive year range and capped at `limit`.
pub fn select_10k_filings(
    submissions: &CompanySubmission,
    ticker: &str,
    cik: &str,
    start_year: Option<u32>,
    end_year: Option<u32>,
    limit: usize,
) -> Result<Vec<FilingInfo>, EdgarError> {
    let recent = &submissions.filings.recent;
    let mut filings = Vec::new();

    for (i, form) in recent.form.iter().enumerate() {
        if filings.len() >= limit {
            break;
        }
        if form != ANNUAL_REPORT_FORM {
            continue;
        }

        let filing_date = recent.filing_date.get(i)
            .ok_or_else(|| EdgarError::Parse("Missing filing date".to_string()))?;

        // Parse year from filing date (format: YYYY-MM-DD)
        let year = filing_date
            .get(0..4)
            .and_then(|y| y.parse::<u32>().ok())
            .ok_or_else(|| EdgarError::Parse(format!("Invalid date format: {}", filing_date)))?;

        if start_year.is_some_and(|start| year < start) || end_year.is_some_and(|end| year > end) {
            continue;
        }

        let acc_num = recent.accession_number.get(i)
            .ok_or_else(|| EdgarError::Parse("Missing accession number".to_string()))?;
        let primary_doc = recent.primary_document.get(i)
            .ok_or_else(|| EdgarError::Parse("Missing primary document".to_string()))?;

        filings.push(FilingInfo {
            accession_number: acc_num.clone(),
            filing_date: filing_date.clone(),
            form_type: form.clone(),
            ticker: ticker.to_uppercase(),
            company_name: submissions.name.clone(),
            cik: cik.to_string(),
            primary_doc: primary_doc.clone(),
            year: Some(year),
        });
    }

    Ok(filings)
}
