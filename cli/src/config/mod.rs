use config::{Config, Environment, File};
use log::LevelFilter;
use serde::Deserialize;
use std::path::Path;

pub mod app;
pub mod setup;
pub mod validation;

pub use app::{AppConfig, ConfigOverrides};
pub use validation::{ConfigLoadResult, ConfigValidationError};

/// Prefix of environment variables read as configuration, e.g.
/// `MARQUEE_THEME` or `MARQUEE_LOGGING__LEVEL`.
pub const ENV_PREFIX: &str = "MARQUEE";

/// Load configuration from an explicit file, or from the discovered
/// `marquee.toml` when `path` is `None`, with environment entries on top.
pub fn load_config(path: Option<&Path>) -> ConfigLoadResult {
    dotenv::dotenv().ok();

    let mut builder = Config::builder();
    match path {
        Some(path) => {
            builder = builder.add_source(File::from(path).required(true));
        }
        None => {
            if let Some(found) = setup::find_config_file() {
                builder = builder.add_source(File::from(found).required(false));
            }
        }
    }

    let env_source = Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__");

    // Environment entries override file values when present
    let config = match builder.add_source(env_source).build() {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. Please check your marquee.toml file and environment variables."
            ));
        }
    };

    match config.try_deserialize::<AppConfig>() {
        Ok(app_config) => ConfigLoadResult::Success(Box::new(app_config)),
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

/// Additional logging configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("warn")
    }

    /// Parsed level, `None` for unknown names.
    pub fn level_filter(&self) -> Option<LevelFilter> {
        self.level().parse().ok()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
