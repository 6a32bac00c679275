// CSV upload boundary

use crate::data::Dataset;
use std::io::{self, Read};
use thiserror::Error;
use tracing::debug;

/// Recoverable upload failures. No partial dataset is produced on any of these.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("the CSV file is empty")]
    Empty,
    #[error("no valid column found in the CSV header")]
    NoColumns,
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// Read CSV data from stdin
pub fn read_csv_from_stdin() -> Result<Dataset, UploadError> {
    let stdin = io::stdin();
    read_csv(stdin.lock())
}

/// Parse CSV text into a Dataset.
///
/// Blank or whitespace-only header names are dropped together with their
/// cells, and rows whose kept cells are all blank are skipped.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset, UploadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let kept: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.trim().is_empty())
        .map(|(idx, name)| (idx, name.to_string()))
        .collect();

    let mut rows = Vec::new();
    let mut total = 0usize;
    for result in csv_reader.records() {
        let record = result?;
        total += 1;
        let row: Vec<String> = kept
            .iter()
            .map(|(idx, _)| record.get(*idx).unwrap_or("").to_string())
            .collect();
        if row.iter().any(|cell| !cell.trim().is_empty()) {
            rows.push(row);
        }
    }

    if total == 0 {
        return Err(UploadError::Empty);
    }
    if kept.is_empty() {
        return Err(UploadError::NoColumns);
    }
    if rows.is_empty() {
        return Err(UploadError::Empty);
    }

    debug!(
        columns = kept.len(),
        rows = rows.len(),
        skipped = total - rows.len(),
        "csv upload parsed"
    );

    let columns = kept.into_iter().map(|(_, name)| name).collect();
    Ok(Dataset::new(columns, rows))
}
