//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.cafe-ratings.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".cafe-ratings.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Menu settings.
    #[serde(default)]
    pub menu: MenuConfig,

    /// Rating scale settings.
    #[serde(default)]
    pub scale: ScaleConfig,

    /// Dashboard settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Historical ratings CSV loaded at session start.
    #[serde(default = "default_seed")]
    pub seed: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Customer name used when the form is left blank.
    #[serde(default = "default_customer")]
    pub default_customer: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            verbose: false,
            default_customer: default_customer(),
        }
    }
}

fn default_seed() -> PathBuf {
    PathBuf::from("fixtures/historico_cafeteria_2025.csv")
}

fn default_customer() -> String {
    "Cliente_nuevo".to_string()
}

/// The fixed menu offered by the rating form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Items offered for selection.
    #[serde(default = "default_menu_items")]
    pub items: Vec<String>,

    /// Accept item names that are not on the menu.
    #[serde(default)]
    pub allow_custom_items: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            items: default_menu_items(),
            allow_custom_items: false,
        }
    }
}

fn default_menu_items() -> Vec<String> {
    vec![
        "Capuccino",
        "Latte",
        "Mocaccino",
        "Cheesecake",
        "Croissant",
        "Sandwich de Jamón",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Rating scale enforced by the rating form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Lowest accepted rating.
    #[serde(default = "default_scale_min")]
    pub min: i64,

    /// Highest accepted rating.
    #[serde(default = "default_scale_max")]
    pub max: i64,

    /// Rating used when the form is left blank.
    #[serde(default = "default_scale_default")]
    pub default: i64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            min: default_scale_min(),
            max: default_scale_max(),
            default: default_scale_default(),
        }
    }
}

fn default_scale_min() -> i64 {
    1
}

fn default_scale_max() -> i64 {
    5
}

fn default_scale_default() -> i64 {
    4
}

/// Dashboard rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of recent events shown under the chart.
    #[serde(default = "default_tail_size")]
    pub tail_size: usize,

    /// Width of the longest bar in the chart, in characters.
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tail_size: default_tail_size(),
            chart_width: default_chart_width(),
        }
    }
}

fn default_tail_size() -> usize {
    10
}

fn default_chart_width() -> usize {
    30
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref seed) = args.seed {
            self.general.seed = seed.clone();
        }

        if let Some(tail) = args.tail {
            self.dashboard.tail_size = tail;
        }

        if args.allow_custom_items {
            self.menu.allow_custom_items = true;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check that the settings describe a usable form.
    pub fn validate(&self) -> Result<()> {
        if self.menu.items.is_empty() {
            bail!("The menu must list at least one item");
        }
        if self.menu.items.iter().any(|item| item.trim().is_empty()) {
            bail!("Menu items must not be blank");
        }
        if self.scale.min > self.scale.max {
            bail!(
                "Rating scale minimum ({}) is above its maximum ({})",
                self.scale.min,
                self.scale.max
            );
        }
        if !(self.scale.min..=self.scale.max).contains(&self.scale.default) {
            bail!(
                "Default rating {} is outside the scale {}-{}",
                self.scale.default,
                self.scale.min,
                self.scale.max
            );
        }
        if self.dashboard.tail_size == 0 {
            bail!("Dashboard tail size must be at least 1");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
