//! Subcommand execution. Output is written to any [`Write`] so commands can
//! be exercised without a terminal.

use crate::args::{Cli, Command, MetricFormat};
use crate::config::{self, AppConfig};
use crate::error::AppResult;
use crate::logger;
use crate::validation::{LanguageCodeValidator, ThemeNameValidator, Validator};
use engine::{ElementCategory, PathRequest, ThemeManager};
use std::io::Write;
use std::path::PathBuf;

/// Load configuration, install logging and run the selected subcommand.
pub fn execute(cli: &Cli, out: &mut impl Write) -> AppResult<()> {
    let mut config = config::load_config(cli.config.as_deref()).into_result()?;
    config.apply_overrides(cli.overrides());

    if let Err(e) = logger::setup_logger(config.logging()) {
        eprintln!("Warning: Failed to initialize logger: {e}");
    }
    match config_source(cli) {
        Some(path) => log::debug!("Using configuration file {}", path.display()),
        None => log::debug!("No configuration file found, using defaults and environment"),
    }
    config.validate()?;

    run(&cli.command, &config, out)
}

/// File the configuration was read from: `--config`, else the discovered
/// `marquee.toml`.
fn config_source(cli: &Cli) -> Option<PathBuf> {
    cli.config.clone().or_else(config::setup::find_config_file)
}

/// Run one subcommand against already validated configuration.
pub fn run(command: &Command, config: &AppConfig, out: &mut impl Write) -> AppResult<()> {
    let mut themes = ThemeManager::new(config.theme_settings());

    match command {
        Command::Themes => list_themes(&themes, config, out),
        Command::Languages { theme: Some(theme) } => {
            ThemeNameValidator.validate(theme)?;
            list_theme_languages(&themes, theme, out)
        }
        Command::Languages { theme: None } => {
            activate(&mut themes, config)?;
            let current = themes.current_language().unwrap_or_default();
            for language in themes.languages() {
                let marker = if language.eq_ignore_ascii_case(current) { '*' } else { ' ' };
                writeln!(out, "{marker} {language}")?;
            }
            Ok(())
        }
        Command::Chain => {
            activate(&mut themes, config)?;
            if let Some(chain) = themes.chain() {
                writeln!(out, "{chain}")?;
            }
            Ok(())
        }
        Command::Metric { class, key, format } => {
            activate(&mut themes, config)?;
            let value = format_metric(&themes, class, key, *format)?;
            writeln!(out, "{value}")?;
            Ok(())
        }
        Command::Path {
            category,
            class,
            element,
            optional,
        } => {
            activate(&mut themes, config)?;
            print_path(&themes, *category, class, element, *optional, out)
        }
        Command::Options => {
            activate(&mut themes, config)?;
            for name in themes.option_names()? {
                writeln!(out, "{name}")?;
            }
            Ok(())
        }
    }
}

fn activate(themes: &mut ThemeManager, config: &AppConfig) -> AppResult<()> {
    ThemeNameValidator.validate(config.theme())?;
    if !config.language().is_empty() {
        LanguageCodeValidator.validate(config.language())?;
    }
    themes.switch_theme_and_language(config.theme(), config.language())?;
    Ok(())
}

fn list_themes(themes: &ThemeManager, config: &AppConfig, out: &mut impl Write) -> AppResult<()> {
    if themes.catalog().is_empty() {
        log::warn!("No themes found in {}", themes.catalog().root().display());
    }

    for entry in themes.catalog().entries() {
        let marker = if entry.name.eq_ignore_ascii_case(config.theme()) { '*' } else { ' ' };
        if entry.display_name == entry.name {
            writeln!(out, "{marker} {}", entry.name)?;
        } else {
            writeln!(out, "{marker} {} ({})", entry.name, entry.display_name)?;
        }
    }
    Ok(())
}

fn list_theme_languages(themes: &ThemeManager, theme: &str, out: &mut impl Write) -> AppResult<()> {
    if !themes.theme_exists(theme) {
        return Err(engine::ThemeError::ThemeNotFound {
            theme: theme.to_string(),
        }
        .into());
    }
    for language in themes.catalog().list_languages(theme) {
        writeln!(out, "  {language}")?;
    }
    Ok(())
}

fn format_metric(themes: &ThemeManager, class: &str, key: &str, format: MetricFormat) -> AppResult<String> {
    let value = match format {
        MetricFormat::Raw => themes.get_metric_raw(class, key)?,
        MetricFormat::String => themes.get_metric(class, key)?,
        MetricFormat::Int => themes.get_metric_int(class, key)?.to_string(),
        MetricFormat::Float => themes.get_metric_float(class, key)?.to_string(),
        MetricFormat::Bool => themes.get_metric_bool(class, key)?.to_string(),
        MetricFormat::Color => themes.get_metric_color(class, key)?.to_string(),
    };
    Ok(value)
}

fn print_path(
    themes: &ThemeManager,
    category: ElementCategory,
    class: &str,
    element: &str,
    optional: bool,
    out: &mut impl Write,
) -> AppResult<()> {
    let request = PathRequest::new(category, class, element).optional(optional);
    match themes.resolve_path(&request)? {
        Some(path) => writeln!(out, "{}", path.display())?,
        None => writeln!(out, "(not found)")?,
    }
    Ok(())
}
