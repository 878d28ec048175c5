//! Metric lookup across the fallback chain.
//!
//! Each theme in the chain contributes a [`ThemeLayer`]: its base
//! `metrics.ini` and, when a language is selected and the theme ships it, a
//! language overlay. For a (class, key) pair the search order is:
//!
//! 1. for each theme, most specific first:
//!    1. overlay, exact class, then each degraded class
//!    2. base, exact class, then each degraded class
//! 2. first hit wins; nothing is merged across themes.
//!
//! Degradation strips trailing `::segment` parts, so `ScreenGameplay::P1::Life`
//! is tried as `ScreenGameplay::P1` and then `ScreenGameplay`. It never
//! crosses into the next theme before the current one is exhausted.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::catalog::{FALLBACK_THEME_KEY, GLOBAL_SECTION};
use crate::ini::IniFile;

/// Section listing player option names.
pub const OPTION_NAMES_SECTION: &str = "OptionNames";

/// Separator between class name segments.
pub const CLASS_SEPARATOR: &str = "::";

/// `class`, then `class` with trailing segments stripped one at a time.
pub fn degraded_classes(class: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(class), |&current| {
        current.rfind(CLASS_SEPARATOR).map(|idx| &current[..idx])
    })
}

/// Which store of a theme produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSource {
    Overlay,
    Base,
}

/// A successful metric lookup and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricHit<'a> {
    pub value: &'a str,
    pub theme: &'a str,
    pub class: &'a str,
    pub source: MetricSource,
}

/// The stores one theme contributes to a lookup.
#[derive(Debug, Clone)]
pub struct ThemeLayer {
    pub name: String,
    pub dir: PathBuf,
    pub base: IniFile,
    pub overlay: Option<IniFile>,
}

impl ThemeLayer {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>, base: IniFile) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            base,
            overlay: None,
        }
    }

    pub fn with_overlay(mut self, overlay: IniFile) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn declared_fallback(&self) -> Option<&str> {
        declared_fallback(&self.base)
    }

    /// Search this theme only, overlay before base.
    pub fn lookup<'a>(&'a self, class: &'a str, key: &str) -> Option<MetricHit<'a>> {
        let stores = self
            .overlay
            .iter()
            .map(|ini| (ini, MetricSource::Overlay))
            .chain(std::iter::once((&self.base, MetricSource::Base)));

        for (store, source) in stores {
            for candidate in degraded_classes(class) {
                if let Some(value) = store.get(candidate, key) {
                    return Some(MetricHit {
                        value,
                        theme: &self.name,
                        class: candidate,
                        source,
                    });
                }
            }
        }
        None
    }
}

/// `[Global] FallbackTheme` of a base store, ignoring empty values.
pub fn declared_fallback(base: &IniFile) -> Option<&str> {
    base.get(GLOBAL_SECTION, FALLBACK_THEME_KEY)
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// The layers of an active fallback chain, head first.
#[derive(Debug, Clone, Default)]
pub struct MetricStack {
    layers: Vec<ThemeLayer>,
}

impl MetricStack {
    pub fn new(layers: Vec<ThemeLayer>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[ThemeLayer] {
        &self.layers
    }

    pub fn lookup<'a>(&'a self, class: &'a str, key: &str) -> Option<MetricHit<'a>> {
        let hit = self.layers.iter().find_map(|layer| layer.lookup(class, key));
        match &hit {
            Some(hit) => log::trace!(
                "[{class}] {key} = '{}' from {} ({:?}, class {})",
                hit.value,
                hit.theme,
                hit.source,
                hit.class
            ),
            None => log::trace!("[{class}] {key} not found"),
        }
        hit
    }

    /// Keys of every `[OptionNames]` section in the chain's base stores.
    pub fn option_names(&self) -> BTreeSet<String> {
        self.layers
            .iter()
            .flat_map(|layer| layer.base.section(OPTION_NAMES_SECTION))
            .map(|(key, _)| key.to_string())
            .collect()
    }

    pub fn theme_names(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(name: &str, base: &str, overlay: Option<&str>) -> ThemeLayer {
        let layer = ThemeLayer::new(name, format!("/themes/{name}"), IniFile::parse(base));
        match overlay {
            Some(text) => layer.with_overlay(IniFile::parse(text)),
            None => layer,
        }
    }

    #[test]
    fn test_degraded_classes() {
        let classes: Vec<_> = degraded_classes("A::B::C").collect();
        assert_eq!(classes, vec!["A::B::C", "A::B", "A"]);
        assert_eq!(degraded_classes("Plain").collect::<Vec<_>>(), vec!["Plain"]);
    }

    #[test]
    fn test_overlay_degraded_beats_base_exact() {
        let theme = layer("t", "[Foo::Bar]\nX=base-exact\n", Some("[Foo]\nX=overlay-degraded\n"));
        let hit = theme.lookup("Foo::Bar", "X").unwrap();
        assert_eq!(hit.value, "overlay-degraded");
        assert_eq!(hit.source, MetricSource::Overlay);
        assert_eq!(hit.class, "Foo");
    }

    #[test]
    fn test_degradation_exhausts_theme_before_next() {
        let stack = MetricStack::new(vec![
            layer("child", "[Foo]\nX=child-degraded\n", None),
            layer("root", "[Foo::Bar]\nX=root-exact\n", None),
        ]);
        let hit = stack.lookup("Foo::Bar", "X").unwrap();
        assert_eq!(hit.value, "child-degraded");
        assert_eq!(hit.theme, "child");
    }

    #[test]
    fn test_falls_through_to_root() {
        let stack = MetricStack::new(vec![
            layer("child", "[Global]\nFallbackTheme=root\n", Some("")),
            layer("root", "[Foo]\nX=1\n", None),
        ]);
        let hit = stack.lookup("Foo", "X").unwrap();
        assert_eq!((hit.value, hit.theme), ("1", "root"));
        assert!(stack.lookup("Foo", "Y").is_none());
    }

    #[test]
    fn test_option_names_union() {
        let stack = MetricStack::new(vec![
            layer("child", "[OptionNames]\nBoost=1\n", None),
            layer("root", "[OptionNames]\nBoost=1\nDark=1\n", None),
        ]);
        let names: Vec<_> = stack.option_names().into_iter().collect();
        assert_eq!(names, vec!["Boost", "Dark"]);
    }

    #[test]
    fn test_declared_fallback_ignores_blank() {
        assert_eq!(declared_fallback(&IniFile::parse("[Global]\nFallbackTheme=\n")), None);
        assert_eq!(
            declared_fallback(&IniFile::parse("[Global]\nFallbackTheme=default\n")),
            Some("default")
        );
    }
}
