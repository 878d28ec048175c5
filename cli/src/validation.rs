use crate::error::AppError;

/// Core validation trait that all validators must implement.
///
/// # Type Parameters
///
/// * `T` - The type of data being validated (can be unsized like `str`)
///
/// # Examples
///
/// ```
/// use marquee::validation::Validator;
///
/// struct NotEmpty;
/// impl Validator<str> for NotEmpty {
///     type Error = String;
///
///     fn validate(&self, input: &str) -> Result<(), Self::Error> {
///         if input.is_empty() {
///             Err("Input cannot be empty".to_string())
///         } else {
///             Ok(())
///         }
///     }
/// }
/// ```
pub trait Validator<T: ?Sized> {
    type Error;

    /// Validate the input and return Ok(()) if valid, or Err with validation error
    fn validate(&self, input: &T) -> Result<(), Self::Error>;
}

/// Rejected theme or language input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputValidationError {
    #[error("Invalid theme name '{name}': {reason}")]
    InvalidThemeName { name: String, reason: String },
    #[error("Invalid language code '{code}': {reason}")]
    InvalidLanguageCode { code: String, reason: String },
}

impl InputValidationError {
    pub fn user_message(&self) -> String {
        match self {
            InputValidationError::InvalidThemeName { name, reason } => {
                format!(
                    "Invalid theme name: '{name}'\n\n\
                    Reason: {reason}\n\n\
                    Theme names are directory names inside the themes directory."
                )
            }
            InputValidationError::InvalidLanguageCode { code, reason } => {
                format!(
                    "Invalid language code: '{code}'\n\n\
                    Reason: {reason}\n\n\
                    Use a code such as 'en', 'ja' or 'pt-BR', matching a file in the theme's Languages directory."
                )
            }
        }
    }
}

impl From<InputValidationError> for AppError {
    fn from(error: InputValidationError) -> Self {
        AppError::Validation(error.user_message())
    }
}

const MAX_THEME_NAME_LEN: usize = 64;

/// Validator for theme names given on the command line or in config.
///
/// Theme names are directory names, so anything that could step outside the
/// themes directory is rejected.
pub struct ThemeNameValidator;

impl Validator<str> for ThemeNameValidator {
    type Error = InputValidationError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        let reject = |reason: &str| {
            Err(InputValidationError::InvalidThemeName {
                name: input.to_string(),
                reason: reason.to_string(),
            })
        };

        if input.trim().is_empty() {
            return reject("Name cannot be empty");
        }
        if input.chars().count() > MAX_THEME_NAME_LEN {
            return reject("Name too long (max 64 characters)");
        }
        if input.contains(['/', '\\']) || input == ".." {
            return reject("Name cannot contain path separators");
        }
        if input.starts_with('.') {
            return reject("Name cannot start with a dot");
        }
        if input.chars().any(char::is_control) {
            return reject("Name contains control characters");
        }
        if input.trim() != input {
            return reject("Name cannot start or end with whitespace");
        }

        Ok(())
    }
}

/// Validator for language codes such as `en`, `ja` or `pt-BR`.
pub struct LanguageCodeValidator;

impl Validator<str> for LanguageCodeValidator {
    type Error = InputValidationError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        let reject = |reason: &str| {
            Err(InputValidationError::InvalidLanguageCode {
                code: input.to_string(),
                reason: reason.to_string(),
            })
        };

        let (primary, region) = match input.split_once(['-', '_']) {
            Some((primary, region)) => (primary, Some(region)),
            None => (input, None),
        };

        if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
            return reject("Expected a two or three letter language code");
        }
        if let Some(region) = region {
            if !(2..=4).contains(&region.len()) || !region.chars().all(|c| c.is_ascii_alphanumeric()) {
                return reject("Region must be two to four letters or digits");
            }
        }

        Ok(())
    }
}
