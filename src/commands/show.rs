//! Print the current settings.

use anyhow::Result;
use serde_json::json;

use crate::{config::Context, ui};

pub fn run(ctx: &Context, as_json: bool) -> Result<()> {
    let config = ctx.settings.generator_config();
    let flags = ctx.settings.flags();

    if as_json {
        let doc = json!({
            "store": ctx.store_path.as_ref().map(|p| p.display().to_string()),
            "generator": config,
            "application": flags,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    ui::print_settings(&config, &flags);
    match &ctx.store_path {
        Some(path) => println!("\nStored in {}", path.display()),
        None => println!("\nNot persisted (ephemeral)"),
    }
    Ok(())
}
