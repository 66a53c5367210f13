//! Dashboard output.

pub mod generator;

pub use generator::{generate_json_dashboard, generate_markdown_dashboard};
