use std::path::{Path, PathBuf};

/// Name of the configuration file looked up when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "marquee.toml";

/// Themes directory name used both in the working directory and in the
/// platform data directory.
pub const THEMES_DIR_NAME: &str = "Themes";

/// Get the standard configuration directory for the current platform
pub fn get_config_dir() -> Option<PathBuf> {
    // Prefer ~/.config/marquee on Unix-like systems, fall back to platform defaults
    if cfg!(unix) {
        if let Some(mut home_path) = dirs::home_dir() {
            home_path.push(".config");
            home_path.push("marquee");
            return Some(home_path);
        }
    }

    dirs::config_dir().map(|mut path| {
        path.push("marquee");
        path
    })
}

/// Get the standard configuration file path
pub fn get_config_file_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Find config file using discovery priority
pub fn find_config_file() -> Option<PathBuf> {
    // Priority order:
    // 1. ./marquee.toml
    // 2. Standard OS config directory
    let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
    if current_dir_config.exists() {
        return Some(current_dir_config);
    }

    get_config_file_path().filter(|path| path.exists())
}

/// `./Themes` when it exists, otherwise the per-user data directory.
pub fn default_themes_dir() -> PathBuf {
    default_themes_dir_from(Path::new("."), dirs::data_dir())
}

fn default_themes_dir_from(working_dir: &Path, data_dir: Option<PathBuf>) -> PathBuf {
    let local = working_dir.join(THEMES_DIR_NAME);
    if local.is_dir() {
        return local;
    }

    match data_dir {
        Some(dir) => dir.join("marquee").join(THEMES_DIR_NAME),
        None => local,
    }
}

/// Language code from a POSIX locale string, `en_US.UTF-8` becomes `en`.
/// `C` and `POSIX` carry no language.
pub fn language_from_locale(locale: &str) -> Option<String> {
    let language = locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .split(['_', '-'])
        .next()
        .unwrap_or_default();

    let valid = (2..=3).contains(&language.len()) && language.chars().all(|c| c.is_ascii_alphabetic());
    valid.then(|| language.to_ascii_lowercase())
}

/// System language taken from `LANG`, if set to a usable locale.
pub fn system_language_from_env() -> Option<String> {
    std::env::var("LANG").ok().as_deref().and_then(language_from_locale)
}
