//! The resolution context applications hold on to.
//!
//! [`ThemeManager`] owns the theme catalog, the active fallback chain with
//! its loaded stores, and the memo caches for metrics and element paths.
//! Resolution takes `&self`; switching and reloading take `&mut self`, so no
//! lookup can observe a half-finished switch.

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::catalog::{DEFAULT_LANGUAGE_KEY, GLOBAL_SECTION, ThemeCatalog};
use crate::category::ElementCategory;
use crate::chain::{FallbackChain, FallbackSource};
use crate::coerce::{Color, MetricValue};
use crate::error::{ThemeError, ThemeResult};
use crate::ini::IniFile;
use crate::metrics::{MetricStack, ThemeLayer, declared_fallback};
use crate::paths::{PathRequest, PathResolver};

/// Where themes live and which language the host system prefers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSettings {
    pub themes_dir: PathBuf,
    pub system_language: Option<String>,
}

impl ThemeSettings {
    pub fn new(themes_dir: impl Into<PathBuf>) -> Self {
        Self {
            themes_dir: themes_dir.into(),
            system_language: None,
        }
    }

    pub fn with_system_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.system_language = (!language.is_empty()).then_some(language);
        self
    }
}

/// Loads base stores on demand while a chain is being built, so each
/// `metrics.ini` is read once per switch.
struct StoreLoader<'a> {
    catalog: &'a ThemeCatalog,
    loaded: HashMap<String, IniFile>,
}

impl<'a> StoreLoader<'a> {
    fn new(catalog: &'a ThemeCatalog) -> Self {
        Self {
            catalog,
            loaded: HashMap::new(),
        }
    }

    fn base(&mut self, theme: &str) -> ThemeResult<&IniFile> {
        let catalog = self.catalog;
        let entry = catalog.entry(theme).ok_or_else(|| ThemeError::ThemeNotFound {
            theme: theme.to_string(),
        })?;
        match self.loaded.entry(entry.name.clone()) {
            Entry::Occupied(slot) => Ok(slot.into_mut()),
            Entry::Vacant(slot) => Ok(slot.insert(catalog.load_metrics(entry)?)),
        }
    }

    fn take(&mut self, theme: &str) -> ThemeResult<IniFile> {
        self.base(theme)?;
        Ok(self.loaded.remove(theme).unwrap_or_default())
    }
}

impl FallbackSource for StoreLoader<'_> {
    fn canonical_name(&self, theme: &str) -> Option<String> {
        self.catalog.canonical_name(theme).map(str::to_string)
    }

    fn declared_fallback(&mut self, theme: &str) -> ThemeResult<Option<String>> {
        Ok(declared_fallback(self.base(theme)?).map(str::to_string))
    }
}

/// Everything loaded for one (theme, language) pair.
#[derive(Debug)]
struct ActiveTheme {
    chain: FallbackChain,
    requested_language: String,
    language: Option<String>,
    stack: MetricStack,
}

impl ActiveTheme {
    fn load(
        catalog: &ThemeCatalog,
        theme: &str,
        language: &str,
        system_language: Option<&str>,
    ) -> ThemeResult<Self> {
        let mut loader = StoreLoader::new(catalog);
        let chain = FallbackChain::build(theme, &mut loader)?;
        let selected = select_language(catalog, &chain, &mut loader, language, system_language)?;

        let mut layers = Vec::with_capacity(chain.len());
        for name in chain.iter() {
            let entry = catalog.entry(name).ok_or_else(|| ThemeError::ThemeNotFound {
                theme: name.to_string(),
            })?;
            let mut layer = ThemeLayer::new(name, entry.dir.clone(), loader.take(name)?);

            if let Some(language) = selected.as_deref() {
                match entry.find_language(language) {
                    Some(code) => {
                        layer = layer.with_overlay(IniFile::read_file(&entry.language_path(code))?);
                    }
                    None => log::debug!("Theme {name} has no '{language}' overlay"),
                }
            }
            layers.push(layer);
        }

        Ok(Self {
            chain,
            requested_language: language.trim().to_string(),
            language: selected,
            stack: MetricStack::new(layers),
        })
    }

    fn metric_not_found(&self, class: &str, key: &str) -> ThemeError {
        ThemeError::MetricNotFound {
            class: class.to_string(),
            key: key.to_string(),
            language: self.language.clone(),
            chain: self.chain.to_vec(),
        }
    }
}

/// Pick the overlay language for a freshly built chain.
///
/// An explicit language must be shipped by at least one theme of the chain.
/// The system language and the head theme's `DefaultLanguage` are only used
/// when some theme of the chain ships them.
fn select_language(
    catalog: &ThemeCatalog,
    chain: &FallbackChain,
    loader: &mut StoreLoader<'_>,
    requested: &str,
    system_language: Option<&str>,
) -> ThemeResult<Option<String>> {
    let shipped = |language: &str| {
        chain
            .iter()
            .filter_map(|theme| catalog.entry(theme))
            .find_map(|entry| entry.find_language(language))
            .map(str::to_string)
    };

    let requested = requested.trim();
    if !requested.is_empty() {
        return shipped(requested).map(Some).ok_or_else(|| ThemeError::LanguageNotFound {
            language: requested.to_string(),
            chain: chain.to_vec(),
        });
    }

    if let Some(language) = system_language.filter(|l| !l.is_empty()) {
        match shipped(language) {
            Some(found) => return Ok(Some(found)),
            None => log::debug!("System language '{language}' not shipped by {chain}"),
        }
    }

    let default = loader
        .base(chain.head())?
        .get(GLOBAL_SECTION, DEFAULT_LANGUAGE_KEY)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string);
    if let Some(language) = default {
        match shipped(&language) {
            Some(found) => return Ok(Some(found)),
            None => log::warn!(
                "Default language '{language}' of theme {} not shipped by {chain}",
                chain.head()
            ),
        }
    }

    Ok(None)
}

/// Theme resolution context.
///
/// Starts with no active theme; every resolution fails with
/// [`ThemeError::NoActiveTheme`] until a switch succeeds.
///
/// # Examples
///
/// ```no_run
/// use engine::{ThemeManager, ThemeSettings};
///
/// let mut themes = ThemeManager::new(ThemeSettings::new("Themes"));
/// themes.switch_theme_and_language("default", "en")?;
/// let x = themes.get_metric_float("ScreenTitleMenu", "ScrollerX")?;
/// let logo = themes.get_path_g("ScreenTitleMenu", "logo")?;
/// # Ok::<(), engine::ThemeError>(())
/// ```
#[derive(Debug)]
pub struct ThemeManager {
    settings: ThemeSettings,
    catalog: ThemeCatalog,
    active: Option<ActiveTheme>,
    generation: u64,
    metric_cache: RefCell<HashMap<(String, String), Option<String>>>,
    path_cache: RefCell<HashMap<(ElementCategory, String, String), Option<PathBuf>>>,
}

impl ThemeManager {
    /// Scan the themes directory. No theme is active afterwards.
    pub fn new(settings: ThemeSettings) -> Self {
        let catalog = ThemeCatalog::scan(&settings.themes_dir);
        Self {
            settings,
            catalog,
            active: None,
            generation: 0,
            metric_cache: RefCell::new(HashMap::new()),
            path_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &ThemeSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn theme_names(&self) -> Vec<&str> {
        self.catalog.list_themes()
    }

    pub fn theme_exists(&self, theme: &str) -> bool {
        self.catalog.theme_exists(theme)
    }

    /// Languages selectable for the active theme: every overlay shipped by
    /// a theme of the active chain.
    pub fn languages(&self) -> Vec<&str> {
        let Some(active) = &self.active else {
            return Vec::new();
        };
        let mut seen = BTreeSet::new();
        let mut languages = Vec::new();
        for theme in active.chain.iter() {
            for language in self.catalog.list_languages(theme) {
                if seen.insert(language.to_lowercase()) {
                    languages.push(language);
                }
            }
        }
        languages.sort_by_key(|l| l.to_lowercase());
        languages
    }

    pub fn language_exists(&self, language: &str) -> bool {
        self.languages()
            .iter()
            .any(|l| l.eq_ignore_ascii_case(language))
    }

    /// Make `theme` active with `language` as its overlay.
    ///
    /// An empty language selects the system language, then the theme's
    /// default language, then no overlay. Requesting the active pair again
    /// does nothing. On failure the previous theme and language stay active.
    pub fn switch_theme_and_language(&mut self, theme: &str, language: &str) -> ThemeResult<()> {
        if let Some(active) = &self.active {
            if active.chain.head().eq_ignore_ascii_case(theme)
                && active.requested_language.eq_ignore_ascii_case(language.trim())
            {
                log::debug!("Theme {theme} with language '{language}' already active");
                return Ok(());
            }
        }

        let active = ActiveTheme::load(
            &self.catalog,
            theme,
            language,
            self.settings.system_language.as_deref(),
        )?;
        self.install(active);
        Ok(())
    }

    /// Switch to the theme after the active one in catalog order, wrapping
    /// around. The current language is kept when the new chain ships it.
    pub fn next_theme(&mut self) -> ThemeResult<()> {
        let current = self.current_theme().unwrap_or_default();
        let next = self
            .catalog
            .next_theme(current)
            .map(str::to_string)
            .ok_or_else(|| ThemeError::ThemeNotFound {
                theme: format!("next after '{current}'"),
            })?;
        let language = self.current_language().unwrap_or_default().to_string();

        match self.switch_theme_and_language(&next, &language) {
            Err(ThemeError::LanguageNotFound { language, .. }) => {
                log::info!("Theme {next} does not ship '{language}', using its default language");
                self.switch_theme_and_language(&next, "")
            }
            result => result,
        }
    }

    /// Re-read every store of the active pair from disk.
    pub fn reload_metrics(&mut self) -> ThemeResult<()> {
        let active = self.active.as_ref().ok_or(ThemeError::NoActiveTheme)?;
        let reloaded = ActiveTheme::load(
            &self.catalog,
            active.chain.head(),
            &active.requested_language,
            self.settings.system_language.as_deref(),
        )?;
        self.install(reloaded);
        Ok(())
    }

    /// Scan the themes directory again and reload the active pair against
    /// it. Nothing changes if the active pair no longer loads.
    pub fn rescan(&mut self) -> ThemeResult<()> {
        let catalog = ThemeCatalog::scan(&self.settings.themes_dir);
        let reloaded = match &self.active {
            Some(active) => Some(ActiveTheme::load(
                &catalog,
                active.chain.head(),
                &active.requested_language,
                self.settings.system_language.as_deref(),
            )?),
            None => None,
        };

        self.catalog = catalog;
        match reloaded {
            Some(active) => self.install(active),
            None => self.bump_generation(),
        }
        Ok(())
    }

    fn install(&mut self, active: ActiveTheme) {
        log::info!(
            "Active theme {} (language: {}), chain {}",
            active.chain.head(),
            active.language.as_deref().unwrap_or("none"),
            active.chain
        );
        self.active = Some(active);
        self.bump_generation();
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
        self.metric_cache.borrow_mut().clear();
        self.path_cache.borrow_mut().clear();
    }

    /// Counter bumped by every successful switch, reload or rescan.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_theme(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.chain.head())
    }

    pub fn current_language(&self) -> Option<&str> {
        self.active.as_ref().and_then(|a| a.language.as_deref())
    }

    pub fn current_theme_dir(&self) -> Option<&Path> {
        self.current_theme().and_then(|theme| self.catalog.theme_dir(theme))
    }

    pub fn chain(&self) -> Option<&FallbackChain> {
        self.active.as_ref().map(|a| &a.chain)
    }

    fn active(&self) -> ThemeResult<&ActiveTheme> {
        self.active.as_ref().ok_or(ThemeError::NoActiveTheme)
    }

    pub fn has_metric(&self, class: &str, key: &str) -> bool {
        self.get_metric_raw(class, key).is_ok()
    }

    /// The value exactly as written in the winning store.
    pub fn get_metric_raw(&self, class: &str, key: &str) -> ThemeResult<String> {
        let active = self.active()?;
        let cache_key = (class.to_string(), key.to_string());

        let cached = self.metric_cache.borrow().get(&cache_key).cloned();
        let value = match cached {
            Some(value) => value,
            None => {
                let value = active.stack.lookup(class, key).map(|hit| hit.value.to_string());
                self.metric_cache.borrow_mut().insert(cache_key, value.clone());
                value
            }
        };

        value.ok_or_else(|| active.metric_not_found(class, key))
    }

    /// String metric with `::` turned into line breaks.
    pub fn get_metric(&self, class: &str, key: &str) -> ThemeResult<String> {
        self.get_metric_as::<String>(class, key)
    }

    pub fn get_metric_int(&self, class: &str, key: &str) -> ThemeResult<i32> {
        self.get_metric_as::<i32>(class, key)
    }

    pub fn get_metric_float(&self, class: &str, key: &str) -> ThemeResult<f32> {
        self.get_metric_as::<f32>(class, key)
    }

    pub fn get_metric_bool(&self, class: &str, key: &str) -> ThemeResult<bool> {
        self.get_metric_as::<bool>(class, key)
    }

    pub fn get_metric_color(&self, class: &str, key: &str) -> ThemeResult<Color> {
        self.get_metric_as::<Color>(class, key)
    }

    /// Read a metric as any [`MetricValue`]. Malformed values are logged
    /// and replaced, never returned as errors.
    pub fn get_metric_as<T: MetricValue>(&self, class: &str, key: &str) -> ThemeResult<T> {
        let raw = self.get_metric_raw(class, key)?;
        Ok(self.coerce_metric::<T>(class, key, &raw))
    }

    pub(crate) fn coerce_metric<T: MetricValue>(&self, class: &str, key: &str, raw: &str) -> T {
        let coerced = T::coerce(raw);
        if let Some(malformed) = coerced.malformed {
            let chain = self.chain().map(ToString::to_string).unwrap_or_default();
            log::warn!("Metric [{class}] {key} in themes [{chain}]: {malformed}");
        }
        coerced.value
    }

    /// Keys of every `[OptionNames]` section in the active chain, sorted.
    pub fn option_names(&self) -> ThemeResult<Vec<String>> {
        Ok(self.active()?.stack.option_names().into_iter().collect())
    }

    /// Resolve an element path. Misses are `Ok(None)` for optional requests
    /// and [`ThemeError::PathNotFound`] otherwise.
    pub fn resolve_path(&self, request: &PathRequest) -> ThemeResult<Option<PathBuf>> {
        let active = self.active()?;
        let cache_key = (
            request.category,
            request.class.to_lowercase(),
            request.element.to_lowercase(),
        );

        let cached = self.path_cache.borrow().get(&cache_key).cloned();
        let found = match cached {
            Some(found) => found,
            None => {
                let found = PathResolver::new(active.stack.layers()).find(request)?;
                self.path_cache.borrow_mut().insert(cache_key, found.clone());
                found
            }
        };

        match found {
            Some(path) => Ok(Some(path)),
            None if request.optional => Ok(None),
            None => Err(request.not_found(active.chain.to_vec())),
        }
    }

    pub fn get_path(&self, category: ElementCategory, class: &str, element: &str) -> ThemeResult<PathBuf> {
        let request = PathRequest::new(category, class, element);
        match self.resolve_path(&request)? {
            Some(path) => Ok(path),
            None => Err(request.not_found(self.chain().map(FallbackChain::to_vec).unwrap_or_default())),
        }
    }

    pub fn get_path_optional(
        &self,
        category: ElementCategory,
        class: &str,
        element: &str,
    ) -> ThemeResult<Option<PathBuf>> {
        self.resolve_path(&PathRequest::new(category, class, element).optional(true))
    }

    /// Resolve a bare `"Class element"` file name.
    #[deprecated(note = "pass the class and element separately to `resolve_path`")]
    pub fn get_path_to(
        &self,
        category: ElementCategory,
        file_name: &str,
        optional: bool,
    ) -> ThemeResult<Option<PathBuf>> {
        self.resolve_path(&PathRequest::from_file_name(category, file_name).optional(optional))
    }
}

// Per-category shorthands for `get_path`.
macro_rules! category_path {
    ($method:ident, $category:expr) => {
        impl ThemeManager {
            pub fn $method(&self, class: &str, element: &str) -> ThemeResult<PathBuf> {
                self.get_path($category, class, element)
            }
        }
    };
}

// Per-category shorthands for the bare file name lookup.
macro_rules! legacy_category_path {
    ($method:ident, $category:expr) => {
        impl ThemeManager {
            #[deprecated(note = "pass the class and element separately to `resolve_path`")]
            #[allow(deprecated)]
            pub fn $method(&self, file_name: &str, optional: bool) -> ThemeResult<Option<PathBuf>> {
                self.get_path_to($category, file_name, optional)
            }
        }
    };
}

category_path!(get_path_b, ElementCategory::BGAnimations);
category_path!(get_path_f, ElementCategory::Fonts);
category_path!(get_path_g, ElementCategory::Graphics);
category_path!(get_path_n, ElementCategory::Numbers);
category_path!(get_path_s, ElementCategory::Sounds);
category_path!(get_path_o, ElementCategory::Other);

legacy_category_path!(get_path_to_b, ElementCategory::BGAnimations);
legacy_category_path!(get_path_to_f, ElementCategory::Fonts);
legacy_category_path!(get_path_to_g, ElementCategory::Graphics);
legacy_category_path!(get_path_to_s, ElementCategory::Sounds);
legacy_category_path!(get_path_to_o, ElementCategory::Other);
