//! Command Line Interface (CLI) layer for geostretch.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that dispatches each subcommand to
//! the library API exposed via `geostretch::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
