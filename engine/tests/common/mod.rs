//! Theme trees on disk for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use engine::{ThemeManager, ThemeSettings};
use tempfile::TempDir;

/// A themes directory that lives as long as the value.
pub struct ThemeTree {
    dir: TempDir,
}

impl ThemeTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp themes dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().expect("file has a parent")).expect("create parent dirs");
        fs::write(&path, contents).expect("write theme file");
        path
    }

    pub fn theme(&self, name: &str, metrics: &str) -> &Self {
        self.file(&format!("{name}/metrics.ini"), metrics);
        self
    }

    pub fn language(&self, theme: &str, language: &str, metrics: &str) -> &Self {
        self.file(&format!("{theme}/Languages/{language}.ini"), metrics);
        self
    }

    pub fn element(&self, theme: &str, relative: &str) -> PathBuf {
        self.file(&format!("{theme}/{relative}"), "")
    }

    pub fn manager(&self) -> ThemeManager {
        ThemeManager::new(ThemeSettings::new(self.root()))
    }

    pub fn manager_with(&self, theme: &str, language: &str) -> ThemeManager {
        let mut manager = self.manager();
        manager
            .switch_theme_and_language(theme, language)
            .expect("switch to test theme");
        manager
    }
}

/// `child -> middle -> root` with a language overlay on `middle`.
pub fn three_level_tree() -> ThemeTree {
    let tree = ThemeTree::new();
    tree.theme(
        "root",
        "[Global]\nDefaultLanguage=en\n\
         [ScreenTitleMenu]\nTitle=Root\nOnlyRoot=root-value\nScrollerX=10\n\
         [ScreenGameplay]\nLifeWidth=200\n\
         [OptionNames]\nBoost=1\n",
    )
    .theme(
        "middle",
        "[Global]\nFallbackTheme=root\n\
         [ScreenTitleMenu]\nTitle=Middle\nScrollerX=20\n\
         [OptionNames]\nHidden=1\n",
    )
    .theme(
        "child",
        "[Global]\nFallbackTheme=middle\n\
         [ScreenTitleMenu]\nScrollerX=30\n",
    )
    .language("root", "en", "[ScreenTitleMenu]\nHelp=Press START\n")
    .language("middle", "ja", "[ScreenTitleMenu]\nTitle=Chuukan\n");
    tree
}
