//! Clubhouse CLI library.
//!
//! Configuration loading, command execution and output formatting for the
//! `clubhouse` binary.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::{OutputFormat, Settings};
pub use error::{CliError, Result};
pub use output::Formatter;
