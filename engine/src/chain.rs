//! Fallback chain construction.
//!
//! A theme may declare the theme it inherits from. Following those
//! declarations from the selected theme yields the ordered list of themes a
//! lookup searches, most specific first:
//!
//! ```text
//! neon-ja  ->  neon  ->  default
//! ```
//!
//! The last theme is expected to be self-contained. This is not enforced;
//! a lookup that misses everywhere reports the chain it searched instead.

use std::fmt;

use crate::error::{ThemeError, ThemeResult};

/// Where the chain builder learns about themes and their declared fallbacks.
pub trait FallbackSource {
    /// Canonical spelling of an installed theme, `None` if not installed.
    fn canonical_name(&self, theme: &str) -> Option<String>;

    /// The fallback declared by an installed theme, if any.
    fn declared_fallback(&mut self, theme: &str) -> ThemeResult<Option<String>>;
}

/// Ordered theme names, head first. No name appears twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain {
    themes: Vec<String>,
}

impl FallbackChain {
    /// Follow declared fallbacks starting at `start`.
    ///
    /// Fails with [`ThemeError::ThemeNotFound`] when `start` or any declared
    /// fallback is not installed, and with [`ThemeError::FallbackCycle`] when
    /// a theme is reached twice. The cycle error lists the chain including
    /// the repeated theme.
    pub fn build<S>(start: &str, source: &mut S) -> ThemeResult<Self>
    where
        S: FallbackSource + ?Sized,
    {
        let head = source
            .canonical_name(start)
            .ok_or_else(|| ThemeError::ThemeNotFound {
                theme: start.to_string(),
            })?;
        let mut themes = vec![head];

        loop {
            let current = &themes[themes.len() - 1];
            let Some(fallback) = source.declared_fallback(current)? else {
                break;
            };

            let fallback = source
                .canonical_name(&fallback)
                .ok_or(ThemeError::ThemeNotFound { theme: fallback })?;

            if themes.iter().any(|t| t.eq_ignore_ascii_case(&fallback)) {
                themes.push(fallback);
                return Err(ThemeError::FallbackCycle { chain: themes });
            }
            themes.push(fallback);
        }

        log::debug!("Built fallback chain {}", themes.join(" -> "));
        Ok(Self { themes })
    }

    pub fn head(&self) -> &str {
        &self.themes[0]
    }

    pub fn root(&self) -> &str {
        &self.themes[self.themes.len() - 1]
    }

    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn contains(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t.eq_ignore_ascii_case(theme))
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.themes.clone()
    }
}

impl fmt::Display for FallbackChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.themes.join(" -> "))
    }
}
