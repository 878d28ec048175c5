//! Installed themes found under the themes directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ThemeResult;
use crate::ini::IniFile;

/// Base metrics file inside every theme directory.
pub const METRICS_FILE: &str = "metrics.ini";
/// Directory inside a theme holding `<code>.ini` language overlays.
pub const LANGUAGES_DIR: &str = "Languages";
/// Section of `metrics.ini` holding theme-wide settings.
pub const GLOBAL_SECTION: &str = "Global";
pub const FALLBACK_THEME_KEY: &str = "FallbackTheme";
pub const DEFAULT_LANGUAGE_KEY: &str = "DefaultLanguage";
pub const DISPLAY_NAME_KEY: &str = "DisplayName";

/// One installed theme as found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeEntry {
    pub name: String,
    pub display_name: String,
    pub dir: PathBuf,
    pub languages: Vec<String>,
}

impl ThemeEntry {
    pub fn metrics_path(&self) -> PathBuf {
        self.dir.join(METRICS_FILE)
    }

    pub fn language_path(&self, language: &str) -> PathBuf {
        self.dir.join(LANGUAGES_DIR).join(format!("{language}.ini"))
    }

    /// Canonical spelling of `language` if this theme ships it.
    pub fn find_language(&self, language: &str) -> Option<&str> {
        self.languages
            .iter()
            .find(|l| l.eq_ignore_ascii_case(language))
            .map(String::as_str)
    }
}

/// Installed themes under a themes root directory.
///
/// The catalog is a snapshot: it does not notice themes added or removed on
/// disk until [`ThemeCatalog::scan`] runs again.
#[derive(Debug, Clone, Default)]
pub struct ThemeCatalog {
    root: PathBuf,
    themes: Vec<ThemeEntry>,
}

impl ThemeCatalog {
    /// Scan `root` for theme directories.
    ///
    /// An unreadable or missing root is logged and yields an empty catalog.
    pub fn scan(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut themes = Vec::new();

        let entries = match fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Failed to read themes directory '{}': {e}", root.display());
                return Self { root, themes };
            }
        };

        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }

            let languages = Self::discover_languages(&path);
            let display_name = Self::read_display_name(&path).unwrap_or_else(|| name.to_string());
            themes.push(ThemeEntry {
                name: name.to_string(),
                display_name,
                dir: path.clone(),
                languages,
            });
        }

        themes.sort_by_key(|t| t.name.to_lowercase());
        log::info!("Found {} theme(s) in {}", themes.len(), root.display());
        Self { root, themes }
    }

    fn discover_languages(theme_dir: &Path) -> Vec<String> {
        let Ok(entries) = fs::read_dir(theme_dir.join(LANGUAGES_DIR)) else {
            return Vec::new();
        };

        let mut languages: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| {
                p.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("ini"))
            })
            .filter_map(|p| p.file_stem().and_then(|n| n.to_str()).map(str::to_string))
            .collect();

        languages.sort_by_key(|l| l.to_lowercase());
        languages
    }

    fn read_display_name(theme_dir: &Path) -> Option<String> {
        let metrics = theme_dir.join(METRICS_FILE);
        if !metrics.is_file() {
            return None;
        }
        match IniFile::read_file(&metrics) {
            Ok(ini) => ini
                .get(GLOBAL_SECTION, DISPLAY_NAME_KEY)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn list_themes(&self) -> Vec<&str> {
        self.themes.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn entries(&self) -> &[ThemeEntry] {
        &self.themes
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn entry(&self, name: &str) -> Option<&ThemeEntry> {
        self.themes.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn theme_exists(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Directory spelling of a theme name.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.entry(name).map(|t| t.name.as_str())
    }

    pub fn theme_dir(&self, name: &str) -> Option<&Path> {
        self.entry(name).map(|t| t.dir.as_path())
    }

    /// Language overlays of one theme. Empty for unknown themes.
    pub fn list_languages(&self, theme: &str) -> Vec<&str> {
        self.entry(theme)
            .map(|t| t.languages.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn language_exists(&self, theme: &str, language: &str) -> bool {
        self.entry(theme)
            .is_some_and(|t| t.find_language(language).is_some())
    }

    /// The theme after `current` in catalog order, wrapping around. Falls
    /// back to the first theme when `current` is unknown.
    pub fn next_theme(&self, current: &str) -> Option<&str> {
        let next = match self
            .themes
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(current))
        {
            Some(index) => self.themes.get((index + 1) % self.themes.len()),
            None => self.themes.first(),
        };
        next.map(|t| t.name.as_str())
    }

    /// Read the base metrics of an installed theme. A theme without a
    /// metrics file has an empty store.
    pub fn load_metrics(&self, entry: &ThemeEntry) -> ThemeResult<IniFile> {
        let path = entry.metrics_path();
        if !path.exists() {
            log::debug!("Theme '{}' has no {METRICS_FILE}", entry.name);
            return Ok(IniFile::new());
        }
        IniFile::read_file(&path)
    }
}
