//! Data models for the rating dashboard.
//!
//! This module contains the core data structures used throughout
//! the application for representing rating events, aggregates, and
//! the rendered dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rating value as recorded in the event log.
///
/// Historical data may carry ratings that are not numbers. Those are kept
/// verbatim in the log and simply ignored when averaging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    /// A value that coerced to a finite number.
    Score(f64),
    /// The original text of a value that failed numeric coercion.
    Raw(String),
}

impl Rating {
    /// Builds a rating from raw text, coercing it to a number if possible.
    pub fn from_raw(raw: &str) -> Self {
        match coerce(raw) {
            Some(value) => Rating::Score(value),
            None => Rating::Raw(raw.to_string()),
        }
    }

    /// Returns the numeric value, or `None` if the rating is not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Rating::Score(value) if value.is_finite() => Some(*value),
            Rating::Score(_) => None,
            Rating::Raw(raw) => coerce(raw),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Score(value) if value.fract() == 0.0 => write!(f, "{}", *value as i64),
            Rating::Score(value) => write!(f, "{}", value),
            Rating::Raw(raw) => write!(f, "{}", raw),
        }
    }
}

/// Coerce text to a finite number; anything else is treated as missing.
fn coerce(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// One customer's rating of one menu item at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEvent {
    /// Name of the customer who submitted the rating.
    pub customer: String,
    /// Menu item being rated.
    pub item: String,
    /// The rating itself.
    pub rating: Rating,
    /// When the event entered the log.
    pub timestamp: DateTime<Utc>,
}

impl RatingEvent {
    /// Creates a new event.
    pub fn new(
        customer: impl Into<String>,
        item: impl Into<String>,
        rating: Rating,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            customer: customer.into(),
            item: item.into(),
            rating,
            timestamp,
        }
    }
}

/// A row read from the historical seed, before its timestamp is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRecord {
    pub customer: String,
    pub item: String,
    pub rating: Rating,
    /// `None` when the seed has no `fecha` column or the cell was empty.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Mean rating of a single menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// Menu item name.
    pub item: String,
    /// Arithmetic mean of all numeric ratings for the item.
    pub mean_rating: f64,
    /// Number of numeric ratings that contributed to the mean.
    pub ratings: usize,
}

/// Items ranked by mean rating, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// One row per item, sorted by mean rating descending.
    pub rows: Vec<AggregateRow>,
    /// The first row of `rows`.
    pub top: AggregateRow,
    /// Events left out because their rating was not numeric.
    pub skipped: usize,
}

/// Outcome of aggregating the log for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendations {
    Ranked(Ranking),
    NoData { message: String },
}

/// Everything shown after one interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    /// When this view was computed.
    pub generated_at: DateTime<Utc>,
    /// Number of events in the log.
    pub total_events: usize,
    /// Ranked items, or a notice that there is nothing to rank.
    pub recommendations: Recommendations,
    /// The most recent events, oldest first.
    pub recent_events: Vec<RatingEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_coercion() {
        assert_eq!(Rating::from_raw("4"), Rating::Score(4.0));
        assert_eq!(Rating::from_raw(" 3.5 "), Rating::Score(3.5));
        assert_eq!(Rating::from_raw("N/A"), Rating::Raw("N/A".to_string()));
        assert_eq!(Rating::from_raw(""), Rating::Raw(String::new()));
        assert_eq!(Rating::from_raw("4,5").as_number(), None);
        assert_eq!(Rating::from_raw("nan").as_number(), None);
        assert_eq!(Rating::from_raw("inf").as_number(), None);
    }

    #[test]
    fn test_rating_display() {
        assert_eq!(Rating::Score(5.0).to_string(), "5");
        assert_eq!(Rating::Score(4.5).to_string(), "4.5");
        assert_eq!(Rating::Raw("N/A".to_string()).to_string(), "N/A");
    }

    #[test]
    fn test_rating_json_shape() {
        let ratings = vec![Rating::Score(4.0), Rating::Raw("N/A".into())];
        let json = serde_json::to_string(&ratings).unwrap();
        assert_eq!(json, r#"[4.0,"N/A"]"#);
    }
}
