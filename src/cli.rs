//! Command-line interface definitions for fastpass.
//!
//! This module defines the public CLI surface using `clap`. It contains no
//! application logic.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::constants::config::STORE_ENV;
use crate::settings::Setting;

#[derive(Parser)]
#[command(
    name = "fastpass",
    version,
    about = "Generate random passwords from saved preferences",
    long_about = r#"
fastpass generates random passwords from a small set of saved preferences:
the password length and which character classes (lower case, upper case,
numbers, special symbols) to draw from.

Preferences are stored in a JSON file in the user's config directory and
are applied to every generated password until changed.

Typical usage:
  fastpass gen
  fastpass gen --copy
  fastpass set length 64
  fastpass set symbols on
  fastpass show
"#
)]
pub struct Cli {
    /// Preferences file to use instead of the platform default
    #[arg(long, global = true, env = STORE_ENV, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Keep preferences in memory only; nothing is read from or written to disk
    #[arg(long, global = true, conflicts_with = "store")]
    pub ephemeral: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new password
    ///
    /// Uses the saved length and character classes. With every class
    /// turned off the result is an empty line.
    Gen {
        /// Copy the password to the clipboard
        #[arg(short, long)]
        copy: bool,

        /// Clear the clipboard after this many seconds (0 keeps it)
        #[arg(long, value_name = "SECS", default_value_t = 0, requires = "copy")]
        clear_after: u64,
    },

    /// Show the current settings
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a setting
    ///
    /// Switches accept on/off, true/false, yes/no or 1/0. Length must be
    /// between 16 and 128.
    Set {
        /// Setting to change
        #[arg(value_enum)]
        setting: Setting,

        /// New value
        value: String,
    },

    /// Run the start-up routine
    ///
    /// On the very first launch this registers fastpass to start at login.
    /// If "window-on-start" is on, a fresh password is printed.
    Launch,
}
