//! Change a single setting.

use anyhow::{Context as _, Result};

use crate::{config::Context, settings::Setting, ui};

pub fn run(ctx: &mut Context, setting: Setting, value: &str) -> Result<()> {
    ctx.settings.subscribe(ui::print_change);

    ctx.settings
        .apply(setting, value)
        .with_context(|| format!("Failed to update {}", setting))?;

    Ok(())
}
