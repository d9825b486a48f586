//! Command dispatch layer for fastpass.
//!
//! This module maps parsed CLI commands to their implementations. Each
//! command lives in its own file and exposes a single `run()` function.

use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::config::Context;

pub mod gen_pw;
pub mod launch;
pub mod set;
pub mod show;

pub fn dispatch(cli: Cli) -> Result<()> {
    let mut ctx = Context::from_cli(&cli)?;

    match cli.command {
        Commands::Gen { copy, clear_after } => gen_pw::run(&ctx, copy, clear_after),
        Commands::Show { json } => show::run(&ctx, json),
        Commands::Set { setting, value } => set::run(&mut ctx, setting, &value),
        Commands::Launch => launch::run(&mut ctx),
    }
}
