//! Application Configuration
//!
//! Built-in defaults, then a YAML file, then `TRANSIT_ALERTS__*` environment
//! variables. Later sources win.

use alert_monitor::MonitorConfig;
use config::{Config, ConfigError, Environment, File, FileFormat};
use gtfs_feed::FeedConfig;
use notify::{Subscriber, TelegramConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TRANSIT_ALERTS";

const CONFIG_FILE: &str = "config.yaml";
const APP_DIR: &str = "transit-alerts";

/// Full application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub monitor: MonitorConfig,
    pub telegram: TelegramConfig,
    /// Notification subscribers
    pub users: Vec<Subscriber>,
}

impl AppConfig {
    /// Load configuration from `path`, or from the first config file found
    /// in the standard locations.
    ///
    /// A missing explicit path is an error; no file in the standard
    /// locations means defaults plus environment. Out-of-range monitor
    /// timing is rejected.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => search_paths().into_iter().find(|p| p.is_file()),
        };
        Self::load_from(file.as_deref(), environment())
    }

    /// Load from an optional file and an environment source
    pub fn load_from(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        match file {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(true));
            }
            None => debug!("No configuration file found, using defaults"),
        }

        let config: AppConfig = builder.add_source(env).build()?.try_deserialize()?;
        config
            .monitor
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        debug!(
            users = config.users.len(),
            telegram = config.telegram.bot_token.is_some(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Standard config file locations, in priority order
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join(APP_DIR).join(CONFIG_FILE));
    }
    paths.push(Path::new("/etc").join(APP_DIR).join(CONFIG_FILE));
    paths
}

/// Environment source for `TRANSIT_ALERTS__SECTION__KEY` variables
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
