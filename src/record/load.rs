//! CSV loading
//!
//! Reads a header-labeled table into [`RawRow`]s and normalizes them.
//! Only recognized columns are kept; blank lines are skipped.

use crate::constants::columns::RECOGNIZED;
use crate::error::Result;
use crate::record::{normalize_all, ProviderRecord, RawRow};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Read raw rows from any CSV source
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();

    let ignored: Vec<&str> = headers
        .iter()
        .map(String::as_str)
        .filter(|h| !h.is_empty() && !RECOGNIZED.contains(h))
        .collect();
    if !ignored.is_empty() {
        warn!("Ignoring unrecognized columns: {}", ignored.join(", "));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let row: RawRow = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| RECOGNIZED.contains(&h.as_str()))
            .filter_map(|(i, h)| record.get(i).map(|v| (h.clone(), v.to_owned())))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Load and normalize providers from a CSV reader
pub fn load_records<R: Read>(reader: R) -> Result<Vec<ProviderRecord>> {
    let rows = read_rows(reader)?;
    Ok(normalize_all(&rows))
}

/// Load and normalize providers from a CSV file
pub fn load_path(path: &Path) -> Result<Vec<ProviderRecord>> {
    let file = File::open(path)?;
    let records = load_records(file)?;
    info!("Loaded {} providers from {}", records.len(), path.display());
    Ok(records)
}
