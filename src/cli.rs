//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// cafe-ratings - live menu recommendations from customer ratings
///
/// Loads the café's rating history, lets you record new ratings, and
/// re-ranks the menu by average rating after every entry.
///
/// Examples:
///   cafe-ratings --seed fixtures/historico_cafeteria_2025.csv
///   cafe-ratings --event "Ana;Latte;5" --event "Luis;Croissant;3"
///   cafe-ratings --event "Ana;Latte;5" --format json
///   cafe-ratings --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Historical ratings CSV to seed the session with
    ///
    /// Must contain the columns usuario, plato and valoracion; fecha is optional.
    /// Defaults to the config file setting or fixtures/historico_cafeteria_2025.csv.
    #[arg(short, long, value_name = "FILE", env = "CAFE_RATINGS_SEED")]
    pub seed: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .cafe-ratings.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Record a rating and print the dashboard without prompting
    ///
    /// Format: "customer;item;rating". Repeat to record several ratings.
    /// Item may be a menu name or its number in the menu.
    #[arg(short, long, value_name = "EVENT")]
    pub event: Vec<String>,

    /// Output format for the dashboard (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Number of recent events to show
    #[arg(long, value_name = "COUNT")]
    pub tail: Option<usize>,

    /// Accept item names that are not on the menu
    #[arg(long)]
    pub allow_custom_items: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .cafe-ratings.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.tail == Some(0) {
            return Err("Tail must be at least 1".to_string());
        }

        if let Some(ref seed) = self.seed {
            if seed.is_dir() {
                return Err(format!("Seed path is a directory: {}", seed.display()));
            }
        }

        Ok(())
    }

    /// Whether ratings come from --event flags instead of the prompt.
    pub fn is_batch(&self) -> bool {
        !self.event.is_empty()
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `verbose_by_default` comes from `general.verbose`; `--quiet` still wins.
    pub fn log_level(&self, verbose_by_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_by_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            seed: None,
            config: None,
            event: Vec::new(),
            format: OutputFormat::Markdown,
            tail: None,
            allow_custom_items: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_repeated_events() {
        let args = Args::try_parse_from([
            "cafe-ratings",
            "--event",
            "Ana;Latte;5",
            "-e",
            "Luis;Croissant;3",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.event, vec!["Ana;Latte;5", "Luis;Croissant;3"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.is_batch());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_tail() {
        let mut args = make_args();
        args.tail = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_level_follows_config_verbose() {
        let mut args = make_args();
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }
}
