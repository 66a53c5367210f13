//! Historical seed loading.
//!
//! Reads the café's rating history from CSV. Required columns are
//! `usuario`, `plato` and `valoracion`; `fecha` is optional.

use crate::error::DataLoadError;
use crate::models::{HistoricalRecord, Rating};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

pub const CUSTOMER_COLUMN: &str = "usuario";
pub const ITEM_COLUMN: &str = "plato";
pub const RATING_COLUMN: &str = "valoracion";
pub const TIMESTAMP_COLUMN: &str = "fecha";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Column positions resolved from the header row.
struct Columns {
    customer: usize,
    item: usize,
    rating: usize,
    timestamp: Option<usize>,
}

impl Columns {
    fn resolve(headers: &[String], path: &Path) -> Result<Self, DataLoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = [CUSTOMER_COLUMN, ITEM_COLUMN, RATING_COLUMN]
            .iter()
            .filter(|name| find(**name).is_none())
            .map(|name| name.to_string())
            .collect();

        match (find(CUSTOMER_COLUMN), find(ITEM_COLUMN), find(RATING_COLUMN)) {
            (Some(customer), Some(item), Some(rating)) => Ok(Self {
                customer,
                item,
                rating,
                timestamp: find(TIMESTAMP_COLUMN),
            }),
            _ => Err(DataLoadError::MissingColumns {
                path: path.to_path_buf(),
                missing,
            }),
        }
    }
}

/// Load historical rating records from a CSV file.
pub fn load_history(path: &Path) -> Result<Vec<HistoricalRecord>, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }

    let unreadable = |source: csv::Error| DataLoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| unreadable(e.into()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(unreadable)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let columns = Columns::resolve(&headers, path)?;
    if columns.timestamp.is_none() {
        info!(
            "No '{}' column in {}; all historical events will use the load time",
            TIMESTAMP_COLUMN,
            path.display()
        );
    }

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(unreadable)?;
        // Header is row 1.
        let row = idx + 2;

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let cell = |col: usize| record.get(col).unwrap_or("").trim();

        let timestamp = match columns.timestamp.map(cell) {
            Some(raw) if !raw.is_empty() => Some(parse_timestamp(raw).ok_or_else(|| {
                DataLoadError::InvalidTimestamp {
                    row,
                    value: raw.to_string(),
                }
            })?),
            _ => None,
        };

        records.push(HistoricalRecord {
            customer: cell(columns.customer).to_string(),
            item: cell(columns.item).to_string(),
            rating: Rating::from_raw(cell(columns.rating)),
            timestamp,
        });
    }

    debug!("Read {} historical records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse a seed timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
