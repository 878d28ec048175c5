use claims::*;
use marquee::args::{Cli, Command, MetricFormat};
use marquee::commands;
use marquee::config::{self, AppConfig};
use marquee::AppError;
use clap::Parser;
use engine::{ElementCategory, ThemeError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Helper module building a themes directory and matching configuration
mod cli_helpers {
    use super::*;

    pub struct Workspace {
        pub dir: TempDir,
    }

    impl Workspace {
        pub fn themes_dir(&self) -> PathBuf {
            self.dir.path().join("Themes")
        }

        pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
            let path = self.themes_dir().join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, contents).unwrap();
            path
        }

        /// Config file selecting `theme` and `language` in this workspace.
        pub fn config_file(&self, theme: &str, language: &str) -> PathBuf {
            let path = self.dir.path().join("marquee.toml");
            let themes_dir = self.themes_dir().display().to_string().replace('\\', "/");
            fs::write(
                &path,
                format!(
                    "themes_dir = \"{themes_dir}\"\ntheme = \"{theme}\"\nlanguage = \"{language}\"\nsystem_language = \"xx\"\n"
                ),
            )
            .unwrap();
            path
        }

        pub fn config(&self, theme: &str, language: &str) -> AppConfig {
            let path = self.config_file(theme, language);
            assert_ok!(config::load_config(Some(&path)).into_result())
        }
    }

    pub fn workspace() -> Workspace {
        let ws = Workspace {
            dir: TempDir::new().unwrap(),
        };
        ws.write(
            "default/metrics.ini",
            "[Global]\nDisplayName=Default Theme\nDefaultLanguage=en\n\
             [ScreenTitleMenu]\nScrollerX=320\nHelp=Press START::to begin\nTint=1,0\n\
             [OptionNames]\nBoost=1\n",
        );
        ws.write("default/Languages/en.ini", "[ScreenTitleMenu]\nGreeting=Hello\n");
        ws.write("default/Languages/ja.ini", "[ScreenTitleMenu]\nGreeting=Konnichiwa\n");
        ws.write("default/Graphics/ScreenTitleMenu logo.png", "");
        ws.write(
            "neon/metrics.ini",
            "[Global]\nFallbackTheme=default\n[ScreenTitleMenu]\nScrollerX=400\n[OptionNames]\nGlow=1\n",
        );
        ws
    }

    pub fn run(command: Command, config: &AppConfig) -> Result<String, AppError> {
        let mut out = Vec::new();
        commands::run(&command, config, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }
}

use cli_helpers::*;

mod listing {
    use super::*;

    #[test]
    fn test_themes_marks_configured_theme() {
        let ws = workspace();
        let output = assert_ok!(run(Command::Themes, &ws.config("neon", "")));
        assert_eq!(output, "  default (Default Theme)\n* neon\n");
    }

    #[test]
    fn test_languages_of_named_theme() {
        let ws = workspace();
        let output = assert_ok!(run(
            Command::Languages {
                theme: Some("default".to_string())
            },
            &ws.config("neon", "")
        ));
        assert_eq!(output, "  en\n  ja\n");
    }

    #[test]
    fn test_languages_of_active_chain_marks_current() {
        let ws = workspace();
        let output = assert_ok!(run(Command::Languages { theme: None }, &ws.config("neon", "ja")));
        assert_eq!(output, "  en\n* ja\n");
    }

    #[test]
    fn test_languages_of_unknown_theme() {
        let ws = workspace();
        let err = assert_err!(run(
            Command::Languages {
                theme: Some("ghost".to_string())
            },
            &ws.config("neon", "")
        ));
        assert!(matches!(err, AppError::Theme(ThemeError::ThemeNotFound { .. })));
    }

    #[test]
    fn test_chain_and_options() {
        let ws = workspace();
        let config = ws.config("neon", "");
        assert_eq!(assert_ok!(run(Command::Chain, &config)), "neon -> default\n");
        assert_eq!(assert_ok!(run(Command::Options, &config)), "Boost\nGlow\n");
    }
}

mod resolving {
    use super::*;

    fn metric(class: &str, key: &str, format: MetricFormat) -> Command {
        Command::Metric {
            class: class.to_string(),
            key: key.to_string(),
            format,
        }
    }

    #[test]
    fn test_metric_from_child_and_root() {
        let ws = workspace();
        let config = ws.config("neon", "");
        assert_eq!(
            assert_ok!(run(metric("ScreenTitleMenu", "ScrollerX", MetricFormat::Int), &config)),
            "400\n"
        );
        assert_eq!(
            assert_ok!(run(metric("ScreenTitleMenu", "Help", MetricFormat::String), &config)),
            "Press START\nto begin\n"
        );
        assert_eq!(
            assert_ok!(run(metric("ScreenTitleMenu", "Tint", MetricFormat::Color), &config)),
            "1,0,1,1\n"
        );
    }

    #[test]
    fn test_default_language_overlay_applies() {
        let ws = workspace();
        let output = assert_ok!(run(
            metric("ScreenTitleMenu", "Greeting", MetricFormat::Raw),
            &ws.config("default", "")
        ));
        assert_eq!(output, "Hello\n");
    }

    #[test]
    fn test_missing_metric_is_theme_error() {
        let ws = workspace();
        let err = assert_err!(run(
            metric("ScreenTitleMenu", "Nope", MetricFormat::Raw),
            &ws.config("neon", "")
        ));
        assert!(err.user_message().contains("neon -> default"));
    }

    #[test]
    fn test_path_required_and_optional() {
        let ws = workspace();
        let config = ws.config("neon", "");
        let found = assert_ok!(run(
            Command::Path {
                category: ElementCategory::Graphics,
                class: "ScreenTitleMenu".to_string(),
                element: "logo".to_string(),
                optional: false,
            },
            &config
        ));
        assert!(Path::new(found.trim_end()).ends_with("ScreenTitleMenu logo.png"));

        let missing = Command::Path {
            category: ElementCategory::Sounds,
            class: "ScreenTitleMenu".to_string(),
            element: "music".to_string(),
            optional: true,
        };
        assert_eq!(assert_ok!(run(missing, &config)), "(not found)\n");

        let required = Command::Path {
            category: ElementCategory::Sounds,
            class: "ScreenTitleMenu".to_string(),
            element: "music".to_string(),
            optional: false,
        };
        assert!(matches!(
            assert_err!(run(required, &config)),
            AppError::Theme(ThemeError::PathNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_language_rejected_before_engine() {
        let ws = workspace();
        let err = assert_err!(run(Command::Chain, &ws.config("neon", "english")));
        assert!(matches!(err, AppError::Validation(_)));
    }
}

mod end_to_end {
    use super::*;

    #[test]
    fn test_execute_with_flags_overriding_config() {
        let ws = workspace();
        let config_path = ws.config_file("default", "");
        let cli = Cli::try_parse_from([
            "marquee",
            "--config",
            config_path.to_str().unwrap(),
            "--theme",
            "neon",
            "metric",
            "ScreenTitleMenu",
            "ScrollerX",
        ])
        .unwrap();

        let mut out = Vec::new();
        assert_ok!(commands::execute(&cli, &mut out));
        assert_eq!(String::from_utf8(out).unwrap(), "400\n");
    }

    #[test]
    fn test_execute_rejects_invalid_config() {
        let ws = workspace();
        let config_path = ws.config_file("../outside", "");
        let cli = Cli::try_parse_from(["marquee", "--config", config_path.to_str().unwrap(), "chain"]).unwrap();

        let mut out = Vec::new();
        let err = assert_err!(commands::execute(&cli, &mut out));
        assert!(matches!(err, AppError::Config(_)));
        assert!(out.is_empty());
    }
}
