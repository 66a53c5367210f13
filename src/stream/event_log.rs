//! Append-only log of rating events.
//!
//! The log is the single source of truth for a session. It is seeded once
//! from historical data and afterwards only grows at the end.

use crate::models::{HistoricalRecord, RatingEvent};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Ordered history of every rating seen in the current session.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<RatingEvent>,
}

impl EventLog {
    /// Hydrate the log from historical records.
    ///
    /// Records without a timestamp are stamped with `loaded_at`, the moment
    /// the session started, not the time the rating was originally given.
    pub fn initialize(history: Vec<HistoricalRecord>, loaded_at: DateTime<Utc>) -> Self {
        let mut defaulted = 0usize;

        let events: Vec<RatingEvent> = history
            .into_iter()
            .map(|record| {
                let timestamp = record.timestamp.unwrap_or_else(|| {
                    defaulted += 1;
                    loaded_at
                });
                RatingEvent {
                    customer: record.customer,
                    item: record.item,
                    rating: record.rating,
                    timestamp,
                }
            })
            .collect();

        debug!(
            "Event log seeded with {} events ({} stamped with load time)",
            events.len(),
            defaulted
        );

        Self { events }
    }

    /// Append an event at the end of the log. Never fails.
    pub fn append(&mut self, event: RatingEvent) {
        debug!(
            "Appending event #{}: {} rated {} by {}",
            self.events.len() + 1,
            event.item,
            event.rating,
            event.customer
        );
        self.events.push(event);
    }

    /// The last `n` events, oldest first.
    pub fn tail(&self, n: usize) -> &[RatingEvent] {
        let start = self.events.len().saturating_sub(n);
        &self.events[start..]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate over all events in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RatingEvent> {
        self.events.iter()
    }
}
