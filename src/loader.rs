// Ledger Loader
// Parses a CSV or JSON statement into a validated, typed Ledger.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{AnalyzerError, Result};
use crate::model::{Ledger, Transaction};

// ============================================================================
// FORMAT DETECTION
// ============================================================================

/// Source file format, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

/// Detect the source format from the file extension (case-insensitive).
///
/// Anything other than `.csv` / `.json` is a `Format` error.
pub fn detect_format(path: &Path) -> Result<SourceFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("csv") => Ok(SourceFormat::Csv),
        Some("json") => Ok(SourceFormat::Json),
        _ => Err(AnalyzerError::Format(path.display().to_string())),
    }
}

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Parse a statement file into a `Ledger`.
///
/// Pure parse: no session I/O. A failure never yields a partial ledger.
///
/// # Errors
/// * `Format` - extension is neither CSV nor JSON, or content is undecodable
/// * `Schema` - one of `date`, `description`, `amount` is missing
/// * `Parse` - a field value cannot be normalized (bad date, bad amount)
pub fn load_file(path: &Path) -> Result<Ledger> {
    match detect_format(path)? {
        SourceFormat::Csv => load_csv(path),
        SourceFormat::Json => load_json(path),
    }
}

// ============================================================================
// CSV
// ============================================================================

const REQUIRED_COLUMNS: [&str; 3] = ["date", "description", "amount"];

fn load_csv(path: &Path) -> Result<Ledger> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let headers = reader.headers().map_err(csv_error)?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AnalyzerError::Schema(name.to_string()))
    };

    // Extra columns are ignored; only the three required ones are read.
    let date_idx = column(REQUIRED_COLUMNS[0])?;
    let description_idx = column(REQUIRED_COLUMNS[1])?;
    let amount_idx = column(REQUIRED_COLUMNS[2])?;

    let mut transactions = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let row = i + 1; // 1-based data row, header not counted

        let date = parse_timestamp(record.get(date_idx).unwrap_or_default(), row)?;
        let description = record.get(description_idx).unwrap_or_default().to_string();
        let amount = parse_amount(record.get(amount_idx).unwrap_or_default(), row)?;

        transactions.push(Transaction::new(date, description, amount));
    }

    Ok(Ledger::new(transactions))
}

/// Map csv crate failures into the taxonomy: I/O stays I/O, everything
/// else (ragged rows, bad UTF-8) means the content is not CSV tabular data.
fn csv_error(err: csv::Error) -> AnalyzerError {
    match err.into_kind() {
        csv::ErrorKind::Io(io) => AnalyzerError::Io(io),
        other => AnalyzerError::Format(format!("invalid CSV content: {:?}", other)),
    }
}

// ============================================================================
// JSON
// ============================================================================

fn load_json(path: &Path) -> Result<Ledger> {
    let text = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| AnalyzerError::Format(format!("invalid JSON content: {}", e)))?;

    let rows = value.as_array().ok_or_else(|| {
        AnalyzerError::Format("JSON source must be an array of records".to_string())
    })?;

    let mut transactions = Vec::with_capacity(rows.len());
    for (i, entry) in rows.iter().enumerate() {
        let row = i + 1;
        let record = entry.as_object().ok_or_else(|| {
            AnalyzerError::Format(format!("JSON record {} is not an object", row))
        })?;

        let field = |name: &str| -> Result<&Value> {
            record
                .get(name)
                .ok_or_else(|| AnalyzerError::Schema(name.to_string()))
        };

        let date_raw = field(REQUIRED_COLUMNS[0])?;
        let date = match date_raw.as_str() {
            Some(s) => parse_timestamp(s, row)?,
            None => {
                return Err(AnalyzerError::Parse {
                    row,
                    field: "date",
                    value: date_raw.to_string(),
                })
            }
        };

        let description_raw = field(REQUIRED_COLUMNS[1])?;
        let description = description_raw
            .as_str()
            .ok_or_else(|| AnalyzerError::Parse {
                row,
                field: "description",
                value: description_raw.to_string(),
            })?
            .to_string();

        // No coercion: a string amount in JSON is a parse failure, not a guess.
        let amount_raw = field(REQUIRED_COLUMNS[2])?;
        let amount = amount_raw.as_f64().ok_or_else(|| AnalyzerError::Parse {
            row,
            field: "amount",
            value: amount_raw.to_string(),
        })?;

        transactions.push(Transaction::new(date, description, amount));
    }

    Ok(Ledger::new(transactions))
}

// ============================================================================
// FIELD NORMALIZATION
// ============================================================================

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Normalize a raw date string to a timestamp.
///
/// Datetime formats are tried first; plain dates normalize to midnight.
fn parse_timestamp(raw: &str, row: usize) -> Result<NaiveDateTime> {
    let raw = raw.trim();

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt);
            }
        }
    }

    Err(AnalyzerError::Parse {
        row,
        field: "date",
        value: raw.to_string(),
    })
}

/// Parse a CSV amount. The source is expected to already be numeric;
/// non-finite values ("NaN", "inf") are rejected along with garbage.
fn parse_amount(raw: &str, row: usize) -> Result<f64> {
    let parsed = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());

    parsed.ok_or_else(|| AnalyzerError::Parse {
        row,
        field: "amount",
        value: raw.to_string(),
    })
}
