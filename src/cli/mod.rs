//! CLI module
//!
//! Command-line front end that plays the part of a list screen.
//!
//! # Commands
//!
//! - `list` - Page through the plain listing
//! - `search` - Page through search results
//! - `watch` - Debounce search input from stdin and load results as it settles

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
