use crate::config::ConfigOverrides;
use clap::{Parser, Subcommand, ValueEnum};
use engine::ElementCategory;
use std::path::PathBuf;

/// Inspect theme metrics, fallback chains and element paths.
#[derive(Debug, Parser)]
#[command(name = "marquee", version)]
pub struct Cli {
    /// Configuration file to load instead of the discovered marquee.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding one subdirectory per theme
    #[arg(long, global = true, value_name = "DIR")]
    pub themes_dir: Option<PathBuf>,

    /// Theme to activate
    #[arg(long, global = true)]
    pub theme: Option<String>,

    /// Language overlay to activate
    #[arg(long, global = true, value_name = "CODE")]
    pub language: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            themes_dir: self.themes_dir.clone(),
            theme: self.theme.clone(),
            language: self.language.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List installed themes, marking the active one
    Themes,

    /// List language overlays of a theme, or of the active chain
    Languages {
        /// Theme to inspect instead of the active one
        theme: Option<String>,
    },

    /// Print the active fallback chain
    Chain,

    /// Resolve a metric value
    Metric {
        class: String,
        key: String,

        /// How to read the value
        #[arg(long = "as", value_enum, default_value_t = MetricFormat::String)]
        format: MetricFormat,
    },

    /// Resolve an element path
    Path {
        /// bganimations, fonts, graphics, numbers, sounds or other
        category: ElementCategory,
        class: String,
        #[arg(default_value = "")]
        element: String,

        /// Print "(not found)" instead of failing when nothing matches
        #[arg(long)]
        optional: bool,
    },

    /// List option names declared across the active chain
    Options,
}

/// Typed view requested with `metric --as`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricFormat {
    Raw,
    String,
    Int,
    Float,
    Bool,
    Color,
}
