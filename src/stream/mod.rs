//! The rating event stream: historical seed loading and the session's
//! append-only event log.

pub mod event_log;
pub mod loader;

pub use event_log::EventLog;
pub use loader::load_history;
