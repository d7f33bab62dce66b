// src/storage/mod.rs
use crate::extractors::{ExtractionResult, NOT_FOUND_SENTINEL};
use crate::utils::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const RAW_SUBDIR: &str = "raw/10-K";
const PROCESSED_SUBDIR: &str = "processed";
const RISK_FACTORS_CSV: &str = "risk_factors.csv";
const RUN_METADATA_JSON: &str = "risk_factors_meta.json";
const ANALYSIS_REPORT_JSON: &str = "risk_factor_analysis.json";

// Marker shared by every failure placeholder written to the table.
const WARNING_MARKER: &str = "⚠️";

/// One row of the risk factor table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactorRecord {
    pub filename: String,
    pub risk_factors: String,
}

impl RiskFactorRecord {
    pub fn from_result(filename: impl Into<String>, result: ExtractionResult) -> Self {
        Self {
            filename: filename.into(),
            risk_factors: result.into_stored_text(),
        }
    }

    /// False for empty rows and for rows holding a failure placeholder.
    pub fn is_found(&self) -> bool {
        !self.risk_factors.is_empty() && !self.risk_factors.contains(WARNING_MARKER)
    }
}

/// Counts written next to the table after an extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total_filings: usize,
    pub found: usize,
    pub not_found: usize,
    pub failed: usize,
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.base_dir.join(RAW_SUBDIR)
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.base_dir.join(PROCESSED_SUBDIR)
    }

    pub fn risk_factors_csv(&self) -> PathBuf {
        self.processed_dir().join(RISK_FACTORS_CSV)
    }

    /// Saves a downloaded filing as `{TICKER}_10K_{index}.html`.
    pub fn save_raw_filing(&self, ticker: &str, index: usize, html: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.raw_dir();
        fs::create_dir_all(&target_dir)?;

        let file_path = target_dir.join(format!("{}_10K_{}.html", ticker.to_uppercase(), index));
        fs::write(&file_path, html)?;

        tracing::info!("Saved filing to {}", file_path.display());
        Ok(file_path)
    }

    /// Lists raw `.html` filings sorted by file name. A missing directory yields no filings.
    pub fn list_raw_filings(&self) -> Result<Vec<PathBuf>, StorageError> {
        let raw_dir = self.raw_dir();
        if !raw_dir.exists() {
            tracing::warn!("Raw filing directory {} does not exist", raw_dir.display());
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&raw_dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "html") {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        Ok(files)
    }

    /// Writes the risk factor table, replacing any previous one.
    pub fn write_risk_factors(&self, records: &[RiskFactorRecord]) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(self.processed_dir())?;
        let file_path = self.risk_factors_csv();

        let mut writer = csv::Writer::from_path(&file_path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        tracing::info!("Saved {} records to {}", records.len(), file_path.display());
        Ok(file_path)
    }

    pub fn read_risk_factors(&self) -> Result<Vec<RiskFactorRecord>, StorageError> {
        let file_path = self.risk_factors_csv();
        if !file_path.exists() {
            return Err(StorageError::NotFound(file_path.display().to_string()));
        }

        let mut reader = csv::Reader::from_path(&file_path)?;
        let records = reader
            .deserialize()
            .collect::<Result<Vec<RiskFactorRecord>, csv::Error>>()?;

        tracing::debug!("Loaded {} records from {}", records.len(), file_path.display());
        Ok(records)
    }

    /// Saves metadata about the extraction run in JSON format
    pub fn save_run_metadata(&self, summary: &RunSummary) -> Result<PathBuf, StorageError> {
        let metadata = serde_json::json!({
            "total_filings": summary.total_filings,
            "found": summary.found,
            "not_found": summary.not_found,
            "failed": summary.failed,
            "not_found_sentinel": NOT_FOUND_SENTINEL,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });
        self.write_json(RUN_METADATA_JSON, &metadata)
    }

    pub fn save_analysis_report<T: Serialize>(&self, report: &T) -> Result<PathBuf, StorageError> {
        self.write_json(ANALYSIS_REPORT_JSON, report)
    }

    fn write_json<T: Serialize>(&self, filename: &str, value: &T) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(self.processed_dir())?;
        let file_path = self.processed_dir().join(filename);

        let json = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, json)?;

        tracing::info!("Saved {}", file_path.display());
        Ok(file_path)
    }
}
