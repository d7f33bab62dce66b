// src/main.rs
mod analysis;
mod edgar;
mod extractors;
mod storage;
mod utils;

use clap::{Parser, Subcommand};
use edgar::EdgarClient;
use extractors::{linearize_html, ExtractionResult, SectionExtractor};
use std::path::Path;
use std::time::Duration;
use storage::{RiskFactorRecord, RunSummary, StorageManager};
use utils::AppError;

/// Command Line Interface for the 10-K Risk Factor pipeline
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root of the data directory (raw/10-K and processed/ live below it)
    #[arg(long, global = true, env = "RISK_FACTORS_DATA_DIR", default_value = "./data")]
    data_dir: String,

    /// Default log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download the most recent 10-K filings for a ticker from EDGAR
    Download {
        /// Ticker symbol of the company
        #[arg(short, long, default_value = "MSFT")]
        ticker: String,

        /// Number of filings to download, newest first
        #[arg(short, long, default_value_t = 3)]
        num_filings: usize,

        /// Earliest filing year to include (optional)
        #[arg(long)]
        start_year: Option<u32>,

        /// Latest filing year to include (optional)
        #[arg(long)]
        end_year: Option<u32>,

        /// User-Agent sent to the SEC (a name and contact email)
        #[arg(long, env = "SEC_USER_AGENT", default_value = "risk-factor-extractor admin@example.com")]
        user_agent: String,

        /// Delay before every EDGAR request, in milliseconds
        #[arg(long, default_value_t = 500)]
        request_delay_ms: u64,
    },

    /// Extract the Item 1A Risk Factors section from every downloaded filing
    Extract {
        /// Write numbered line dumps with the located boundaries marked
        #[arg(short, long)]
        debug: bool,
    },

    /// Word counts, top keywords and TF-IDF similarity across all filings
    Analyze {
        /// Number of keywords to report
        #[arg(long, default_value_t = 20)]
        top_n: usize,
    },

    /// Show one filing's risk factors and its most frequent words
    Explore {
        /// File name as stored in the risk factor table, e.g. MSFT_10K_1.html
        #[arg(short, long)]
        filename: String,

        /// Number of words to list
        #[arg(long, default_value_t = 20)]
        top_n: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(&args.log_level);
    tracing::info!("Starting with args: {:?}", args);

    // 3. Initialize storage
    let storage = StorageManager::new(&args.data_dir)?;

    match args.command {
        Command::Download { ticker, num_filings, start_year, end_year, user_agent, request_delay_ms } => {
            let client = EdgarClient::new(&user_agent, Duration::from_millis(request_delay_ms))?;
            download(&client, &storage, &ticker, num_filings, start_year, end_year).await
        }
        Command::Extract { debug } => extract(&storage, debug),
        Command::Analyze { top_n } => analyze(&storage, top_n),
        Command::Explore { filename, top_n } => explore(&storage, &filename, top_n),
    }
}

async fn download(
    client: &EdgarClient,
    storage: &StorageManager,
    ticker: &str,
    num_filings: usize,
    start_year: Option<u32>,
    end_year: Option<u32>,
) -> Result<(), AppError> {
    tracing::info!("Finding 10-K filings for ticker: {}", ticker);
    let filings = client.find_10k_filings(ticker, start_year, end_year, num_filings).await?;
    tracing::info!("Found {} 10-K filings", filings.len());

    if filings.is_empty() {
        return Err(AppError::Config(format!("No 10-K filings found for ticker {} in the specified date range", ticker)));
    }

    let mut success_count = 0;
    let mut failure_count = 0;

    for (i, filing) in filings.iter().enumerate() {
        tracing::info!("Processing {}", filing.describe());

        match client.download_filing_doc(&filing.primary_doc_url()).await {
            Ok(content) => match storage.save_raw_filing(&filing.ticker, i + 1, &content) {
                Ok(_) => success_count += 1,
                Err(e) => {
                    tracing::error!("Failed to save {}: {}", filing.primary_doc, e);
                    failure_count += 1;
                }
            },
            Err(e) => {
                tracing::error!("Failed to download filing document: {}", e);
                failure_count += 1;
            }
        }
    }

    tracing::info!("Download finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 {
        return Err(AppError::Processing(format!("Failed to download any of {} filings", failure_count)));
    }
    Ok(())
}

fn extract(storage: &StorageManager, debug: bool) -> Result<(), AppError> {
    let files = storage.list_raw_filings()?;
    if files.is_empty() {
        return Err(AppError::Config(format!("No .html filings in {}", storage.raw_dir().display())));
    }

    let extractor = SectionExtractor::new();
    let mut records = Vec::with_capacity(files.len());
    let mut summary = RunSummary { total_filings: files.len(), found: 0, not_found: 0, failed: 0 };

    for path in &files {
        let filename = file_name(path);

        // Filings are not always valid UTF-8; invalid bytes become U+FFFD.
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Failed to read {}: {}", path.display(), e);
                summary.failed += 1;
                records.push(RiskFactorRecord::from_result(filename, ExtractionResult::NotFound));
                continue;
            }
        };
        let html = String::from_utf8_lossy(&bytes);

        let filing = linearize_html(&html);
        if filing.is_empty() {
            tracing::warn!("{} has no visible text", filename);
        }

        if debug {
            let bounds = extractor.locate(&filing);
            let dump_path = storage
                .processed_dir()
                .join("debug")
                .join(format!("{}_lines.txt", file_stem(path)));
            if let Err(e) = utils::debug_dump::save_annotated_lines(&filing, bounds, &dump_path) {
                tracing::warn!("Failed to create debug dump: {}", e);
            }
        }

        let result = extractor.extract_risk_factors(&filing);
        if result.is_found() {
            tracing::info!("Extracted risk factors from {}", filename);
            summary.found += 1;
        } else {
            tracing::warn!("Risk factors not found in {}", filename);
            summary.not_found += 1;
        }

        records.push(RiskFactorRecord::from_result(filename, result));
    }

    storage.write_risk_factors(&records)?;
    storage.save_run_metadata(&summary)?;

    tracing::info!(
        "Saved {} records. Found: {}, Not found: {}, Unreadable: {}",
        records.len(), summary.found, summary.not_found, summary.failed
    );
    Ok(())
}

fn analyze(storage: &StorageManager, top_n: usize) -> Result<(), AppError> {
    let records = storage.read_risk_factors()?;
    let report = analysis::analyze(&records, top_n)?;

    println!("Word count per risk factor section:");
    for entry in &report.word_counts {
        println!("  {:<30} {:>8}", entry.filename, entry.word_count);
    }

    println!("\nTop keywords:");
    for keyword in &report.top_keywords {
        println!("  {}: {}", keyword.term, keyword.count);
    }

    println!("\nCosine similarity matrix:");
    print!("{}", report.similarity);

    storage.save_analysis_report(&report)?;
    Ok(())
}

fn explore(storage: &StorageManager, filename: &str, top_n: usize) -> Result<(), AppError> {
    let records = storage.read_risk_factors()?;
    let record = analysis::find_record(&records, filename)?;

    print!("{}", render_exploration(record, top_n));
    Ok(())
}

fn render_exploration(record: &RiskFactorRecord, top_n: usize) -> String {
    let mut out = format!("Risk factors for {}:\n\n{}\n\n", record.filename, record.risk_factors);

    if !record.is_found() {
        out.push_str("No word frequencies available.\n");
        return out;
    }

    out.push_str(&format!("Top {} words:\n", top_n));
    for freq in analysis::word_frequencies(&record.risk_factors, top_n) {
        out.push_str(&format!("  {:<20} {:>6}\n", freq.term, freq.count));
    }
    out
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
