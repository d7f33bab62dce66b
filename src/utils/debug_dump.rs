// src/utils/debug_dump.rs
use crate::extractors::{Filing, SectionBounds};
use crate::utils::error::AppError;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const START_MARKER: &str = ">>> START";
const END_MARKER: &str = "<<< END";

/// Renders the linearized filing with line numbers, flagging the lines the
/// extractor picked as section boundaries.
pub fn render_annotated_lines(filing: &Filing, bounds: Option<SectionBounds>) -> String {
    let mut out = String::new();

    match bounds {
        Some(SectionBounds { start, end: Some(end) }) => {
            let _ = writeln!(out, "# section: lines {}..{}", start, end);
        }
        Some(SectionBounds { start, end: None }) => {
            let _ = writeln!(out, "# section: lines {}..EOF (no end marker)", start);
        }
        None => {
            let _ = writeln!(out, "# section: not found");
        }
    }

    let width = filing.len().to_string().len();
    for (i, line) in filing.lines().iter().enumerate() {
        let marker = match bounds {
            Some(b) if b.start == i => START_MARKER,
            Some(b) if b.end == Some(i) => END_MARKER,
            _ => "",
        };
        let _ = writeln!(out, "{:>9} {:>width$} | {}", marker, i, line, width = width);
    }

    out
}

/// Saves the annotated line dump to `filename`, creating parent directories.
pub fn save_annotated_lines(
    filing: &Filing,
    bounds: Option<SectionBounds>,
    filename: &Path,
) -> Result<(), AppError> {
    if let Some(parent) = filename.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(filename, render_annotated_lines(filing, bounds))?;

    tracing::info!("Saved debug line dump to {}", filename.display());
    Ok(())
}
