//! # Marquee Engine
//!
//! Cascading theme resolution for metric values and asset paths. A theme
//! names the theme it falls back to; lookups walk that chain, most specific
//! theme first, with an optional per-language overlay on top of each theme.
//!
//! ## Modules
//!
//! - [`manager`] - The resolution context: active theme, language and caches
//! - [`catalog`] - Discovery of installed themes and their languages
//! - [`chain`] - Fallback chain construction with cycle detection
//! - [`metrics`] - Metric lookup with class degradation
//! - [`coerce`] - Lenient typed views of raw metric strings
//! - [`paths`] - Element path probing and redirects
//! - [`category`] - Element categories and their file extensions
//! - [`cached`] - Long-lived typed metric handles
//! - [`ini`] - The sectioned key/value store format
//! - [`error`] - Error types

pub mod cached;
pub mod catalog;
pub mod category;
pub mod chain;
pub mod coerce;
pub mod error;
pub mod ini;
pub mod manager;
pub mod metrics;
pub mod paths;

pub use cached::{
    CachedMetric, CachedMetricBool, CachedMetricColor, CachedMetricFloat, CachedMetricInt,
    CachedMetricString,
};
pub use catalog::{ThemeCatalog, ThemeEntry};
pub use category::{ElementCategory, ParseCategoryError};
pub use chain::FallbackChain;
pub use coerce::{Color, MalformedMetricValue, MetricValue, ValueKind};
pub use error::{ThemeError, ThemeResult};
pub use ini::IniFile;
pub use manager::{ThemeManager, ThemeSettings};
pub use paths::PathRequest;
