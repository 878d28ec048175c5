use engine::ThemeError;
use std::fmt::Display;

/// Errors surfaced by the `marquee` command line tool.
///
/// # Error Categories
///
/// - [`Theme`](AppError::Theme) - resolution or switching failed inside the engine
/// - [`Config`](AppError::Config) - configuration could not be loaded or is invalid
/// - [`Validation`](AppError::Validation) - a command line argument was rejected
/// - [`Io`](AppError::Io) - writing output failed
///
/// Every variant is reported on stderr through [`AppError::user_message`] and
/// makes the process exit with status 1.
#[derive(Debug)]
pub enum AppError {
    /// Theme engine failures, carrying the full resolution context.
    Theme(ThemeError),

    /// Configuration loading and validation errors.
    Config(String),

    /// Rejected user input such as a malformed theme name or language code.
    Validation(String),

    /// Output stream failures.
    Io(String),
}

impl AppError {
    /// Message shown to the user. Theme authoring errors get a hint on where
    /// to look.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Theme(e) if e.is_authoring_error() => {
                format!("{self}\n\nCheck the metrics.ini and element files of the themes listed above.")
            }
            AppError::Theme(ThemeError::ThemeNotFound { .. }) => {
                format!("{self}\n\nRun `marquee themes` to list installed themes.")
            }
            _ => self.to_string(),
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Theme(e) => write!(f, "Theme Error: {e}"),
            AppError::Config(msg) => write!(f, "Configuration Error: {msg}"),
            AppError::Validation(msg) => write!(f, "Validation Error: {msg}"),
            AppError::Io(msg) => write!(f, "I/O Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Theme(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ThemeError> for AppError {
    fn from(err: ThemeError) -> Self {
        AppError::Theme(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
