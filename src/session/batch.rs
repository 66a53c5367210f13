//! Non-interactive mode: record `--event` entries, then render once.

use super::interactive::render;
use super::Session;
use crate::cli::OutputFormat;
use crate::error::InputError;
use anyhow::Result;
use std::io::Write;
use tracing::{info, warn};

/// An `--event` entry that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub entry: String,
    pub error: InputError,
}

/// Submit each entry in order and write the resulting dashboard to `out`.
///
/// A rejected entry does not stop the ones after it.
pub fn run<W: Write>(
    session: &mut Session,
    entries: &[String],
    out: &mut W,
    format: OutputFormat,
) -> Result<Vec<Rejected>> {
    let mut rejected = Vec::new();

    for entry in entries {
        match session.submit_inline(entry) {
            Ok(event) => info!(
                "Added {} rated {} by {}",
                event.item, event.rating, event.customer
            ),
            Err(error) => {
                warn!("Skipping event {:?}: {}", entry, error);
                rejected.push(Rejected {
                    entry: entry.clone(),
                    error,
                });
            }
        }
    }

    if !rejected.is_empty() {
        warn!("{} of {} events were rejected", rejected.len(), entries.len());
    }

    writeln!(out, "{}", render(session, format)?)?;

    Ok(rejected)
}
