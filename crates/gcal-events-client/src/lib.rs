//! CLI, configuration and command implementations
//!
//! This crate provides the `gcal-events` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
