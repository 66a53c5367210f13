//! Session state.
//!
//! A [`Session`] owns one event log for the lifetime of the program and is
//! handed by reference to every interaction. The rating form's rules
//! (menu selection and rating scale) are enforced here, before events
//! reach the log.

pub mod batch;
pub mod interactive;

use crate::analysis::aggregate;
use crate::config::Config;
use crate::error::{DataLoadError, InputError};
use crate::models::{Dashboard, HistoricalRecord, Rating, RatingEvent, Recommendations};
use crate::stream::{load_history, EventLog};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Raw values as typed into the rating form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingForm {
    pub customer: String,
    pub item: String,
    pub rating: String,
}

impl RatingForm {
    /// Parse an inline `customer;item;rating` entry.
    pub fn parse_inline(line: &str) -> Result<Self, InputError> {
        let parts: Vec<&str> = line.split(';').collect();
        match parts.as_slice() {
            [customer, item, rating] => Ok(Self {
                customer: customer.trim().to_string(),
                item: item.trim().to_string(),
                rating: rating.trim().to_string(),
            }),
            _ => Err(InputError::Malformed(line.to_string())),
        }
    }
}

/// One user's dashboard session.
#[derive(Debug)]
pub struct Session {
    config: Config,
    log: EventLog,
}

impl Session {
    /// Start a session by loading the configured historical seed.
    pub fn start(config: Config) -> Result<Self, DataLoadError> {
        info!("Loading historical ratings from {}", config.general.seed.display());
        let history = load_history(&config.general.seed)?;
        let session = Self::from_history(config, history, Utc::now());
        if session.log.is_empty() {
            warn!("Historical data contains no events");
        }
        info!("Session started with {} historical events", session.log.len());
        Ok(session)
    }

    /// Start a session from records already in memory.
    pub fn from_history(
        config: Config,
        history: Vec<HistoricalRecord>,
        loaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            config,
            log: EventLog::initialize(history, loaded_at),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Validate a form submission and append it to the log.
    ///
    /// The event is stamped with the submission time. Nothing is appended
    /// if the form is rejected.
    pub fn submit(&mut self, form: &RatingForm) -> Result<RatingEvent, InputError> {
        let item = self.resolve_item(&form.item)?;
        let rating = self.resolve_rating(&form.rating)?;
        let customer = match form.customer.trim() {
            "" => self.config.general.default_customer.clone(),
            name => name.to_string(),
        };

        let event = RatingEvent::new(customer, item, Rating::Score(rating as f64), Utc::now());
        self.log.append(event.clone());
        info!("Recorded rating {} for {} by {}", rating, event.item, event.customer);

        Ok(event)
    }

    /// Submit an inline `customer;item;rating` entry.
    pub fn submit_inline(&mut self, line: &str) -> Result<RatingEvent, InputError> {
        let form = RatingForm::parse_inline(line)?;
        self.submit(&form)
    }

    /// Map form input to a menu item: a 1-based menu number or a name.
    pub fn resolve_item(&self, raw: &str) -> Result<String, InputError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(InputError::EmptyItem);
        }

        let menu = &self.config.menu.items;

        if let Ok(number) = raw.parse::<usize>() {
            if let Some(item) = number.checked_sub(1).and_then(|idx| menu.get(idx)) {
                return Ok(item.clone());
            }
        }

        if let Some(item) = menu.iter().find(|item| item.to_lowercase() == raw.to_lowercase()) {
            return Ok(item.clone());
        }

        if self.config.menu.allow_custom_items {
            debug!("Accepting off-menu item {:?}", raw);
            return Ok(raw.to_string());
        }

        Err(InputError::UnknownItem(raw.to_string()))
    }

    /// Map form input to a whole-number rating within the scale.
    pub fn resolve_rating(&self, raw: &str) -> Result<i64, InputError> {
        let scale = &self.config.scale;
        let raw = raw.trim();

        let value = if raw.is_empty() {
            scale.default
        } else {
            raw.parse::<i64>()
                .map_err(|_| InputError::InvalidRating(raw.to_string()))?
        };

        if !(scale.min..=scale.max).contains(&value) {
            return Err(InputError::RatingOutOfRange {
                value,
                min: scale.min,
                max: scale.max,
            });
        }

        Ok(value)
    }

    /// Recompute the dashboard from the current log.
    pub fn dashboard(&self) -> Dashboard {
        let recommendations = match aggregate(&self.log) {
            Ok(ranking) => {
                debug!(
                    "Ranked {} items, top is {} ({:.2})",
                    ranking.rows.len(),
                    ranking.top.item,
                    ranking.top.mean_rating
                );
                Recommendations::Ranked(ranking)
            }
            Err(e) => {
                info!("Nothing to rank: {}", e);
                Recommendations::NoData {
                    message: e.to_string(),
                }
            }
        };

        Dashboard {
            generated_at: Utc::now(),
            total_events: self.log.len(),
            recommendations,
            recent_events: self.log.tail(self.config.dashboard.tail_size).to_vec(),
        }
    }
}
