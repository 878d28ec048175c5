use std::path::PathBuf;
use thiserror::Error;

use crate::category::ElementCategory;

/// Errors produced while resolving themes, metrics and element paths.
///
/// Every variant that stems from theme authoring carries enough context to
/// locate the mistake: the theme or language requested, the class and key or
/// element, and the fallback chain that was searched. Generic "not found"
/// messages are never produced.
///
/// # Error Categories
///
/// ## Switch Errors
/// - [`ThemeNotFound`](ThemeError::ThemeNotFound) - the requested theme (or a
///   declared fallback) is not installed
/// - [`LanguageNotFound`](ThemeError::LanguageNotFound) - no theme in the new
///   chain ships the requested language overlay
/// - [`FallbackCycle`](ThemeError::FallbackCycle) - the declared fallbacks loop
///
/// A failed switch leaves the previously active theme and language in effect.
///
/// ## Resolution Errors
/// - [`MetricNotFound`](ThemeError::MetricNotFound) - the metric exists nowhere
///   in the chain
/// - [`PathNotFound`](ThemeError::PathNotFound) - a required element is missing
/// - [`RedirectCycle`](ThemeError::RedirectCycle) - `.redir` files point at
///   each other
/// - [`NoActiveTheme`](ThemeError::NoActiveTheme) - nothing was switched to yet
///
/// Callers may substitute a hardcoded default for resolution errors or
/// propagate them further.
///
/// # Examples
///
/// ```no_run
/// use engine::{ThemeError, ThemeManager};
///
/// fn banner_speed(themes: &ThemeManager) -> f32 {
///     match themes.get_metric_float("ScreenTitleMenu", "BannerSpeed") {
///         Ok(speed) => speed,
///         Err(ThemeError::MetricNotFound { .. }) => 1.0,
///         Err(e) => {
///             log::error!("{e}");
///             1.0
///         }
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The requested theme is not present in the catalog.
    #[error("Theme '{theme}' not found. Check the themes directory for a folder with this name.")]
    ThemeNotFound { theme: String },

    /// No theme in the chain has an overlay for the requested language.
    #[error("Language '{language}' not found in any theme of chain [{}]", joined(.chain))]
    LanguageNotFound { language: String, chain: Vec<String> },

    /// The declared fallback themes form a loop.
    #[error("Fallback cycle detected: {}", joined(.chain))]
    FallbackCycle { chain: Vec<String> },

    /// A metric lookup exhausted the entire chain.
    #[error(
        "Metric [{class}] {key} not found (language: {}) in themes [{}]",
        language_label(.language),
        joined(.chain)
    )]
    MetricNotFound {
        class: String,
        key: String,
        language: Option<String>,
        chain: Vec<String>,
    },

    /// A required element path lookup exhausted the entire chain.
    #[error(
        "{category} element '{}' not found for class '{class}' in themes [{}]",
        element_label(.class, .element),
        joined(.chain)
    )]
    PathNotFound {
        category: ElementCategory,
        class: String,
        element: String,
        chain: Vec<String>,
    },

    /// Redirect files reference each other.
    #[error("Redirect cycle in {category}: {}", joined(.stems))]
    RedirectCycle {
        category: ElementCategory,
        stems: Vec<String>,
    },

    /// A resolution was requested before any theme was made active.
    #[error("No theme is active. Switch to a theme before resolving metrics or paths.")]
    NoActiveTheme,

    /// A theme file could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ThemeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ThemeError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by theme content rather than by the caller or
    /// the file system.
    pub fn is_authoring_error(&self) -> bool {
        matches!(
            self,
            ThemeError::FallbackCycle { .. }
                | ThemeError::MetricNotFound { .. }
                | ThemeError::PathNotFound { .. }
                | ThemeError::RedirectCycle { .. }
        )
    }
}

fn joined(names: &[String]) -> String {
    names.join(" -> ")
}

fn language_label(language: &Option<String>) -> &str {
    language.as_deref().unwrap_or("none")
}

fn element_label<'a>(class: &'a str, element: &'a str) -> &'a str {
    if element.is_empty() { class } else { element }
}

pub type ThemeResult<T> = Result<T, ThemeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_cycle_display() {
        let err = ThemeError::FallbackCycle {
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "Fallback cycle detected: a -> b -> a");
    }

    #[test]
    fn test_metric_not_found_names_everything() {
        let err = ThemeError::MetricNotFound {
            class: "ScreenTitleMenu".into(),
            key: "ScrollerX".into(),
            language: Some("en".into()),
            chain: vec!["neon".into(), "default".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("ScreenTitleMenu"));
        assert!(msg.contains("ScrollerX"));
        assert!(msg.contains("en"));
        assert!(msg.contains("neon -> default"));
        assert!(err.is_authoring_error());
    }

    #[test]
    fn test_path_not_found_uses_class_when_element_empty() {
        let err = ThemeError::PathNotFound {
            category: ElementCategory::Graphics,
            class: "ScreenLogo".into(),
            element: String::new(),
            chain: vec!["default".into()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Graphics element 'ScreenLogo'"));
    }

    #[test]
    fn test_no_active_theme_is_not_authoring_error() {
        assert!(!ThemeError::NoActiveTheme.is_authoring_error());
    }
}
