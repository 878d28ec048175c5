//! Long-lived handles to a single metric.
//!
//! Screens usually read the same metric every frame. A [`CachedMetric`]
//! resolves it once and keeps the typed value until the owner refreshes it,
//! typically after noticing the theme changed through [`CachedMetric::is_stale`].
//!
//! ```no_run
//! use engine::{CachedMetricFloat, ThemeManager};
//!
//! fn on_theme_changed(themes: &ThemeManager, speed: &mut CachedMetricFloat) {
//!     if speed.is_stale(themes) {
//!         if let Err(e) = speed.refresh(themes) {
//!             log::error!("{e}");
//!         }
//!     }
//! }
//! ```

use crate::coerce::{Color, MetricValue};
use crate::error::ThemeResult;
use crate::manager::ThemeManager;

#[derive(Debug, Clone)]
struct Resolved<T> {
    raw: String,
    value: T,
    generation: u64,
}

/// A (class, key) pair and, once refreshed, its resolved value.
#[derive(Debug, Clone)]
pub struct CachedMetric<T: MetricValue> {
    class: String,
    key: String,
    resolved: Option<Resolved<T>>,
}

pub type CachedMetricString = CachedMetric<String>;
pub type CachedMetricInt = CachedMetric<i32>;
pub type CachedMetricFloat = CachedMetric<f32>;
pub type CachedMetricBool = CachedMetric<bool>;
pub type CachedMetricColor = CachedMetric<Color>;

impl<T: MetricValue> CachedMetric<T> {
    /// An unresolved handle. Reading it before [`refresh`](Self::refresh)
    /// panics.
    pub fn new(class: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            key: key.into(),
            resolved: None,
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_refreshed(&self) -> bool {
        self.resolved.is_some()
    }

    /// Resolve against the active theme. On error the handle keeps whatever
    /// it held before.
    pub fn refresh(&mut self, themes: &ThemeManager) -> ThemeResult<()> {
        let class = self.class.clone();
        self.refresh_as(themes, &class)
    }

    /// Like [`refresh`](Self::refresh) but looks the key up under `class`
    /// instead of the handle's own class. Screens sharing a layout use this
    /// to read metrics under their own name.
    pub fn refresh_as(&mut self, themes: &ThemeManager, class: &str) -> ThemeResult<()> {
        let raw = themes.get_metric(class, &self.key)?;
        let value = themes.coerce_metric::<T>(class, &self.key, &raw);
        self.resolved = Some(Resolved {
            raw,
            value,
            generation: themes.generation(),
        });
        Ok(())
    }

    /// The typed value.
    ///
    /// # Panics
    ///
    /// Panics if the handle was never refreshed.
    pub fn value(&self) -> &T {
        &self.expect_resolved().value
    }

    /// The string the value was read from, with `::` already turned into
    /// line breaks.
    ///
    /// # Panics
    ///
    /// Panics if the handle was never refreshed.
    pub fn raw(&self) -> &str {
        &self.expect_resolved().raw
    }

    /// True when unrefreshed or when the theme changed since the last
    /// refresh.
    pub fn is_stale(&self, themes: &ThemeManager) -> bool {
        self.resolved
            .as_ref()
            .is_none_or(|r| r.generation != themes.generation())
    }

    fn expect_resolved(&self) -> &Resolved<T> {
        match &self.resolved {
            Some(resolved) => resolved,
            None => panic!(
                "metric [{}] {} read before refresh",
                self.class, self.key
            ),
        }
    }
}
