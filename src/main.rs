//! cafe-ratings - live menu recommendations for a café
//!
//! Seeds an in-memory event log from the café's rating history, accepts
//! new ratings from a prompt (or `--event` flags), and re-ranks the menu by
//! average rating after each one.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid config, historical data could not be loaded, etc.)

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod session;
mod stream;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use session::interactive::SessionEnd;
use session::{batch, interactive, Session};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so `general.verbose` can apply
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("cafe-ratings v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    if let Err(e) = run_session(config, &args).await {
        error!("Session failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .cafe-ratings.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the menu, rating scale, and seed file.");
    Ok(())
}

/// Initialize logging at the given level.
///
/// Logs go to stderr so they never interleave with the dashboard on stdout.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load the session and drive it from flags or the prompt.
async fn run_session(config: Config, args: &Args) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let mut session = Session::start(config).context("Could not start the session")?;
    let mut stdout = std::io::stdout();

    if args.is_batch() {
        let rejected = batch::run(&mut session, &args.event, &mut stdout, args.format)?;
        for r in &rejected {
            eprintln!("❌ {}: {}", r.entry, r.error);
        }
        return Ok(());
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let end = interactive::run(&mut session, stdin, &mut stdout, args.format, shutdown).await?;

    if end == SessionEnd::Interrupted {
        info!("Interrupted, ending session with {} events", session.log().len());
        // tokio reads stdin on a blocking thread that cannot be cancelled, so
        // waiting for runtime shutdown would hang until the next line arrives.
        std::process::exit(0);
    }

    Ok(())
}

/// Where the configuration came from, reported once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    Fallback(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigSource::Builtin => debug!("No config file found, using defaults"),
            ConfigSource::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::Builtin)),
        Err(e) => Ok((Config::default(), ConfigSource::Fallback(e))),
    }
}
