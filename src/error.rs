//! Error types for loading, aggregating, and collecting ratings.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to hydrate the event log from the historical seed.
///
/// Any of these aborts session start.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error(
        "historical data file not found: {} (pass --seed FILE or set general.seed)",
        .0.display()
    )]
    NotFound(PathBuf),

    #[error("failed to read historical data {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(
        "historical data {} is missing required columns: {}",
        .path.display(),
        .missing.join(", ")
    )]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("invalid timestamp on row {row}: {value:?}")]
    InvalidTimestamp { row: usize, value: String },
}

/// Aggregation found no numeric ratings to rank.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no data available")]
pub struct NoDataError;

/// Form input rejected before it reaches the event log.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("an item must be selected")]
    EmptyItem,

    #[error("unknown menu item: {0}")]
    UnknownItem(String),

    #[error("rating must be a whole number, got {0:?}")]
    InvalidRating(String),

    #[error("rating {value} is outside the scale {min}-{max}")]
    RatingOutOfRange { value: i64, min: i64, max: i64 },

    #[error("expected \"customer;item;rating\", got {0:?}")]
    Malformed(String),
}
