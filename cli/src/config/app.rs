use super::{LoggingConfig, setup, validation::ConfigValidationError};
use crate::validation::{InputValidationError, LanguageCodeValidator, ThemeNameValidator, Validator};
use engine::ThemeSettings;
use serde::Deserialize;
use std::path::PathBuf;

/// Theme selected when neither config nor flags name one.
pub const DEFAULT_THEME: &str = "default";

/// Values given on the command line, which win over config and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub themes_dir: Option<PathBuf>,
    pub theme: Option<String>,
    pub language: Option<String>,
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    themes_dir: Option<PathBuf>,
    theme: Option<String>,
    language: Option<String>,
    system_language: Option<String>,
    #[serde(default)]
    logging: LoggingConfig,
}

impl AppConfig {
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(themes_dir) = overrides.themes_dir {
            self.themes_dir = Some(themes_dir);
        }
        if let Some(theme) = overrides.theme {
            self.theme = Some(theme);
        }
        if let Some(language) = overrides.language {
            self.language = Some(language);
        }
    }

    /// Validate names and levels before they reach the engine
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        if let Err(InputValidationError::InvalidThemeName { reason, .. }) =
            ThemeNameValidator.validate(self.theme())
        {
            errors.push(ConfigValidationError::Theme {
                configured: self.theme().to_string(),
                reason,
            });
        }

        let languages = [
            ("language", self.language.as_deref()),
            ("system_language", self.system_language.as_deref()),
        ];
        for (field, value) in languages {
            let Some(code) = value.filter(|code| !code.is_empty()) else {
                continue;
            };
            if let Err(InputValidationError::InvalidLanguageCode { reason, .. }) =
                LanguageCodeValidator.validate(code)
            {
                errors.push(ConfigValidationError::LanguageCode {
                    field,
                    configured: code.to_string(),
                    reason,
                });
            }
        }

        if self.logging.level_filter().is_none() {
            errors.push(ConfigValidationError::LogLevel {
                configured: self.logging.level().to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn themes_dir(&self) -> PathBuf {
        self.themes_dir
            .clone()
            .unwrap_or_else(setup::default_themes_dir)
    }

    pub fn theme(&self) -> &str {
        self.theme.as_deref().unwrap_or(DEFAULT_THEME)
    }

    /// Explicitly requested language, empty for the theme's default.
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or_default()
    }

    /// Configured system language, else the one derived from `LANG`.
    pub fn system_language(&self) -> Option<String> {
        self.system_language
            .clone()
            .filter(|code| !code.is_empty())
            .or_else(setup::system_language_from_env)
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub fn theme_settings(&self) -> ThemeSettings {
        let settings = ThemeSettings::new(self.themes_dir());
        match self.system_language() {
            Some(language) => settings.with_system_language(language),
            None => settings,
        }
    }
}
