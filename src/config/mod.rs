//! Configuration management.
//!
//! Settings come from an optional TOML file, then `AER_SCRAPER_*` environment
//! variables, then command-line flags.
//!
//! ```toml
//! [scraper]
//! base_url = "https://www.britishecologicalsociety.org/applied-ecology-resources/search/"
//! user_agent = "Magic Browser"
//! timeout_secs = 30
//!
//! [output]
//! directory = "."
//! file_prefix = "bes_aer_projects_data"
//! format = "tsv"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Nested keys map to environment variables with a double underscore, e.g.
//! `AER_SCRAPER_SCRAPER__USER_AGENT` or `AER_SCRAPER_OUTPUT__DIRECTORY`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;
use crate::sources::DEFAULT_BASE_URL;
use crate::utils::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

pub use config::ConfigError;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "AER_SCRAPER";

/// Config file name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "aer-scraper.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Fetching settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how pages are fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Listing URL; pages are fetched from `{base_url}/page/{n}`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Output file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the output file is written to
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// File name before the page-range suffix and extension
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            file_prefix: default_file_prefix(),
            format: OutputFormat::default(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_prefix() -> String {
    "bes_aer_projects_data".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level used when no `-v`/`-q` flag or `RUST_LOG` is given
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a config file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("aer-scraper").join("config.toml"))
        .filter(|path| path.is_file())
}
