//! Rating aggregation and ranking.
//!
//! This module derives the per-item mean ratings from the event log.
//! Nothing here is cached: every call recomputes from the full log.

use crate::error::NoDataError;
use crate::models::{AggregateRow, Ranking, RatingEvent};
use crate::stream::EventLog;
use std::collections::HashMap;
use tracing::debug;

/// Running sum for one item.
struct Accumulator {
    item: String,
    sum: f64,
    count: usize,
}

/// Rank every item in the log by its mean rating.
///
/// Events whose rating is not numeric are skipped. Items are ordered by
/// mean descending; ties keep the order in which items first appeared.
pub fn aggregate(log: &EventLog) -> Result<Ranking, NoDataError> {
    aggregate_events(log.iter())
}

/// Rank an arbitrary sequence of events. See [`aggregate`].
pub fn aggregate_events<'a, I>(events: I) -> Result<Ranking, NoDataError>
where
    I: IntoIterator<Item = &'a RatingEvent>,
{
    let mut groups: Vec<Accumulator> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut skipped = 0usize;

    for event in events {
        let Some(value) = event.rating.as_number() else {
            skipped += 1;
            continue;
        };

        let slot = *index.entry(event.item.as_str()).or_insert_with(|| {
            groups.push(Accumulator {
                item: event.item.clone(),
                sum: 0.0,
                count: 0,
            });
            groups.len() - 1
        });

        groups[slot].sum += value;
        groups[slot].count += 1;
    }

    if skipped > 0 {
        debug!("Skipped {} events with non-numeric ratings", skipped);
    }

    let mut rows: Vec<AggregateRow> = groups
        .into_iter()
        .map(|acc| AggregateRow {
            mean_rating: acc.sum / acc.count as f64,
            ratings: acc.count,
            item: acc.item,
        })
        .collect();

    // sort_by is stable, so equal means keep first-seen order
    rows.sort_by(|a, b| b.mean_rating.total_cmp(&a.mean_rating));

    let top = rows.first().cloned().ok_or(NoDataError)?;

    Ok(Ranking { rows, top, skipped })
}
