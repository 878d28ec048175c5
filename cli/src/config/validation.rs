use super::app::AppConfig;
use crate::error::AppError;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid theme: '{configured}' ({reason})")]
    Theme { configured: String, reason: String },
    #[error("Invalid {field}: '{configured}' ({reason})")]
    LanguageCode {
        field: &'static str,
        configured: String,
        reason: String,
    },
    #[error("Invalid logging.level: '{configured}'")]
    LogLevel { configured: String },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::Theme { configured, reason } => {
                format!(
                    "Configured theme is not a valid theme name!\n\n\
                    Your configured value: '{configured}'\n\
                    Reason: {reason}\n\n\
                    Please update theme in marquee.toml or MARQUEE_THEME."
                )
            }
            ConfigValidationError::LanguageCode {
                field,
                configured,
                reason,
            } => {
                format!(
                    "Configured {field} is not a valid language code!\n\n\
                    Your configured value: '{configured}'\n\
                    Reason: {reason}\n\n\
                    Please update {field} in marquee.toml."
                )
            }
            ConfigValidationError::LogLevel { configured } => {
                format!(
                    "Unknown log level!\n\n\
                    Your configured value: '{configured}'\n\
                    Valid levels: off, error, warn, info, debug, trace\n\n\
                    Please update logging.level in marquee.toml."
                )
            }
        }
    }
}

impl From<Vec<ConfigValidationError>> for AppError {
    fn from(errors: Vec<ConfigValidationError>) -> Self {
        let messages: Vec<String> = errors.iter().map(|e| e.user_message()).collect();
        AppError::Config(format!(
            "Configuration validation failed:\n{}",
            messages.join("\n\n")
        ))
    }
}

/// Configuration loading result
#[derive(Debug)]
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
}

impl ConfigLoadResult {
    pub fn into_result(self) -> Result<AppConfig, AppError> {
        match self {
            ConfigLoadResult::Success(config) => Ok(*config),
            ConfigLoadResult::LoadError(msg) | ConfigLoadResult::DeserializeError(msg) => {
                Err(AppError::Config(msg))
            }
        }
    }
}
