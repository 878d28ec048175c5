//! # Marquee CLI Library
//!
//! Command line front end for the theme engine: lists themes and languages,
//! prints fallback chains and resolves metrics and element paths.
//!
//! ## Modules
//!
//! - [`args`] - Command line arguments
//! - [`commands`] - Subcommand execution
//! - [`config`] - Configuration loading, defaults and validation
//! - [`error`] - Error types and user facing messages
//! - [`logger`] - Logging setup
//! - [`validation`] - Input validation for theme names and language codes
//!
//! This library interface enables integration testing by providing access to internal modules.

pub mod args;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResult};
pub use validation::Validator;
