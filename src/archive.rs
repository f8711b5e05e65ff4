//! Loading the combined results table from a zip archive.
//!
//! The archive's first entry is a semicolon-separated table using the
//! decimal-comma convention for numbers.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::error::{EvalError, Result};
use crate::table::{ResultsTable, RunRecord, Strategy};

/// Field separator of the results table.
const DELIMITER: u8 = b';';

/// Load the results table from a zip archive on disk.
pub fn load_results<P: AsRef<Path>>(path: P) -> Result<ResultsTable> {
    let file = File::open(path)?;
    read_results(file)
}

/// Read the results table from any seekable zip source.
///
/// The table is always the first entry of the archive; any further entries
/// are ignored.
pub fn read_results<R: Read + Seek>(reader: R) -> Result<ResultsTable> {
    let mut archive = zip::ZipArchive::new(reader)?;
    if archive.len() == 0 {
        return Err(EvalError::EmptyArchive);
    }
    let entry = archive.by_index(0)?;
    parse_table(entry)
}

/// Parse the delimited table itself.
fn parse_table<R: Read>(reader: R) -> Result<ResultsTable> {
    let mut csv = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| EvalError::MissingColumn {
                name: name.to_string(),
            })
    };

    let dataset_col = column("dataset")?;
    let strategy_col = column("strategy")?;
    let instance_col = column("instance")?;
    let smape_col = column("smape")?;
    let test_size_col = column("test_size")?;
    // The condition columns only exist for variation runs; tables without
    // them are still valid for the significance pipeline.
    let augment_col = headers.iter().position(|h| h.trim() == "augment");
    let preprocess_col = headers.iter().position(|h| h.trim() == "preprocess");
    let model_col = headers.iter().position(|h| h.trim() == "model");

    let mut records = Vec::new();
    for (i, row) in csv.records().enumerate() {
        let row = row?;
        let line = i + 2; // 1-based, after the header line

        let strategy_raw = row.get(strategy_col).unwrap_or("").trim();
        let strategy: Strategy =
            strategy_raw
                .parse()
                .map_err(|_| EvalError::UnknownStrategy {
                    value: strategy_raw.to_string(),
                    line,
                })?;

        let optional = |col: Option<usize>| {
            col.and_then(|c| row.get(c))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        records.push(RunRecord {
            dataset: row.get(dataset_col).unwrap_or("").trim().to_string(),
            strategy,
            instance: row.get(instance_col).unwrap_or("").trim().to_string(),
            smape: parse_decimal(row.get(smape_col).unwrap_or(""), "smape", line)?,
            test_size: parse_decimal(row.get(test_size_col).unwrap_or(""), "test_size", line)?,
            augment: optional(augment_col),
            preprocess: optional(preprocess_col),
            model: optional(model_col),
        });
    }

    Ok(ResultsTable::new(records))
}

/// Parse a decimal-comma number ("12,5" -> 12.5).
fn parse_decimal(raw: &str, field: &'static str, line: usize) -> Result<f64> {
    let trimmed = raw.trim();
    trimmed
        .replace(',', ".")
        .parse()
        .map_err(|_| EvalError::InvalidNumber {
            field,
            value: trimmed.to_string(),
            line,
        })
}
