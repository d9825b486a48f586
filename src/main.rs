//! fastpass — a small random password generator with saved preferences.
//!
//! This file is the application entry point. It is responsible only for:
//!
//! - Setting up logging
//! - Parsing CLI arguments
//! - Dispatching subcommands
//! - Exiting with appropriate status codes
//!
//! Command implementations live in `commands/` and terminal helpers live in
//! `ui.rs`.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod constants;
mod generator;
mod login;
mod settings;
mod startup;
mod store;
mod ui;

fn main() -> ExitCode {
    // Quiet by default so stdout carries only the password; `RUST_LOG` overrides.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
