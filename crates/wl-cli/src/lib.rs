//! Work log CLI library.
//!
//! This crate provides the command-line interface for the work log.

mod cli;
pub mod commands;
mod config;
pub mod prompt;

pub use cli::{Cli, Commands};
pub use config::Config;
