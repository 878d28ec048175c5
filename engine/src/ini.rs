//! Sectioned `key=value` store used for theme metrics and language overlays.
//!
//! Only the subset of the format the resolver relies on is understood:
//!
//! ```text
//! ; comment
//! [ScreenTitleMenu]
//! ScrollerX=320
//! HelpText=Press START::to begin
//! ```
//!
//! Section headers and keys keep file order. Lookups are exact.

use std::convert::Infallible;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ThemeError, ThemeResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

/// Read-only, ordered (section, key) → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniFile {
    sections: Vec<Section>,
}

impl IniFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse ini text. Malformed lines are skipped with a debug log, since a
    /// theme with one stray line should still load.
    pub fn parse(text: &str) -> Self {
        let mut ini = IniFile::new();
        let mut current = String::new();

        for (number, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') || line.starts_with("//") {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                match header.strip_suffix(']') {
                    Some(name) => {
                        current = name.trim().to_string();
                        ini.section_mut(&current);
                    }
                    None => log::debug!("ini line {}: unterminated section header", number + 1),
                }
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => ini.set(&current, key.trim(), value.trim()),
                None => log::debug!("ini line {}: expected key=value", number + 1),
            }
        }

        ini
    }

    /// Load and parse a file from disk.
    pub fn read_file(path: &Path) -> ThemeResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| ThemeError::io(path, e))?;
        Ok(Self::parse(&text))
    }

    /// Insert or replace a value. A replaced key keeps its original position.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let section = self.section_mut(section);
        match section.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => section.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.find_section(section)?
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.find_section(section).is_some()
    }

    /// Entries of one section in file order. Empty when the section is absent.
    pub fn section(&self, section: &str) -> impl Iterator<Item = (&str, &str)> {
        self.find_section(section)
            .into_iter()
            .flat_map(|s| s.entries.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.entries.is_empty())
    }

    fn find_section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    fn section_mut(&mut self, name: &str) -> &mut Section {
        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }
}

impl FromStr for IniFile {
    type Err = Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(text))
    }
}
