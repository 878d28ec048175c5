//! Element categories and the files each one accepts.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Kind of element a path request looks for.
///
/// The category decides which subdirectory of a theme is probed and which
/// file extensions are acceptable, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementCategory {
    BGAnimations,
    Fonts,
    Graphics,
    Numbers,
    Sounds,
    Other,
}

const BGANIMATION_EXTENSIONS: &[&str] = &["xml", "png", "jpg", "jpeg", "gif", "bmp", "avi", "mpg", "mpeg"];
const FONT_EXTENSIONS: &[&str] = &["ini", "png", "jpg", "bmp"];
const GRAPHIC_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "avi", "mpg", "mpeg", "xml"];
const NUMBER_EXTENSIONS: &[&str] = &["ini", "png", "jpg", "bmp"];
const SOUND_EXTENSIONS: &[&str] = &["ogg", "wav", "mp3"];

/// Extension of redirect files, accepted in every category.
pub const REDIRECT_EXTENSION: &str = "redir";

impl ElementCategory {
    pub const ALL: [ElementCategory; 6] = [
        ElementCategory::BGAnimations,
        ElementCategory::Fonts,
        ElementCategory::Graphics,
        ElementCategory::Numbers,
        ElementCategory::Sounds,
        ElementCategory::Other,
    ];

    /// Subdirectory of a theme holding elements of this category.
    pub fn dir_name(self) -> &'static str {
        match self {
            ElementCategory::BGAnimations => "BGAnimations",
            ElementCategory::Fonts => "Fonts",
            ElementCategory::Graphics => "Graphics",
            ElementCategory::Numbers => "Numbers",
            ElementCategory::Sounds => "Sounds",
            ElementCategory::Other => "Other",
        }
    }

    /// Acceptable extensions, most preferred first. Empty means any
    /// extension is acceptable.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ElementCategory::BGAnimations => BGANIMATION_EXTENSIONS,
            ElementCategory::Fonts => FONT_EXTENSIONS,
            ElementCategory::Graphics => GRAPHIC_EXTENSIONS,
            ElementCategory::Numbers => NUMBER_EXTENSIONS,
            ElementCategory::Sounds => SOUND_EXTENSIONS,
            ElementCategory::Other => &[],
        }
    }

    /// Background animations may be whole directories.
    pub fn allows_directories(self) -> bool {
        self == ElementCategory::BGAnimations
    }

    /// Font-like categories store texture pages as `"<stem> 16x16.png"`.
    pub fn allows_page_suffix(self) -> bool {
        matches!(self, ElementCategory::Fonts | ElementCategory::Numbers)
    }

    /// Rank of an extension, lower is better. `None` when not acceptable.
    pub fn extension_rank(self, extension: &str) -> Option<usize> {
        let extensions = self.extensions();
        if extensions.is_empty() {
            return Some(0);
        }
        extensions
            .iter()
            .position(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Unknown element category '{0}' (expected one of: bganimations, fonts, graphics, numbers, sounds, other)"
)]
pub struct ParseCategoryError(pub String);

impl FromStr for ElementCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s.to_ascii_lowercase().as_str() {
            "b" | "bganimations" | "bganimation" | "background-animation" => ElementCategory::BGAnimations,
            "f" | "fonts" | "font" => ElementCategory::Fonts,
            "g" | "graphics" | "graphic" => ElementCategory::Graphics,
            "n" | "numbers" | "number" | "number-display" => ElementCategory::Numbers,
            "s" | "sounds" | "sound" => ElementCategory::Sounds,
            "o" | "other" => ElementCategory::Other,
            _ => return Err(ParseCategoryError(s.to_string())),
        };
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("G".parse::<ElementCategory>(), Ok(ElementCategory::Graphics));
        assert_eq!("background-animation".parse::<ElementCategory>(), Ok(ElementCategory::BGAnimations));
        assert_eq!("number-display".parse::<ElementCategory>(), Ok(ElementCategory::Numbers));
        assert_eq!("Sounds".parse::<ElementCategory>(), Ok(ElementCategory::Sounds));
        assert!("textures".parse::<ElementCategory>().is_err());
    }

    #[test]
    fn test_graphics_prefer_images_over_actor_files() {
        let graphics = ElementCategory::Graphics;
        assert!(graphics.extension_rank("png") < graphics.extension_rank("xml"));
        assert_eq!(graphics.extension_rank("PNG"), Some(0));
        assert_eq!(graphics.extension_rank("ogg"), None);
    }

    #[test]
    fn test_other_accepts_anything() {
        assert_eq!(ElementCategory::Other.extension_rank("txt"), Some(0));
        assert_eq!(ElementCategory::Other.extension_rank("lua"), Some(0));
    }

    #[test]
    fn test_display_is_directory_name() {
        for category in ElementCategory::ALL {
            assert_eq!(category.to_string(), category.dir_name());
        }
    }
}
