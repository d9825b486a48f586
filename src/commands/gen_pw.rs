//! Generate a password from the saved preferences.

use std::time::Duration;

use anyhow::Result;
use tracing::warn;

use crate::{config::Context, ui};

pub fn run(ctx: &Context, copy: bool, clear_after: u64) -> Result<()> {
    let pwd = ctx.generator.generate();
    if pwd.is_empty() {
        warn!("every character class is disabled, generated an empty password");
    }

    println!("{}", pwd);

    if copy {
        if let Err(e) = ui::copy_to_clipboard(&pwd, Some(Duration::from_secs(clear_after))) {
            eprintln!("Failed to copy to clipboard: {}", e);
        }
    }

    Ok(())
}
