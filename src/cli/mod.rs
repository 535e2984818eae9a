//! Command-line interface
//!
//! - `serve`: open the store and run the HTTP API
//! - `check`: open the store, print the diagnostic report and exit

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, ConfigArgs};
pub use commands::{check, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
