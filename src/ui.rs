//! Terminal output and clipboard helpers.
//!
//! No generation or persistence logic lives here.

use std::time::Duration;

use clipboard::{ClipboardContext, ClipboardProvider};
use tracing::debug;

use crate::generator::GeneratorConfig;
use crate::settings::{ApplicationFlags, SettingChange};

/// Put `text` on the system clipboard. With a non-zero `clear_after`, block
/// for that long and then clear the clipboard if it still holds `text`.
pub fn copy_to_clipboard(text: &str, clear_after: Option<Duration>) -> Result<(), String> {
    let mut ctx: ClipboardContext =
        ClipboardProvider::new().map_err(|e| format!("Clipboard init error: {}", e))?;

    ctx.set_contents(text.to_string())
        .map_err(|e| format!("Clipboard set error: {}", e))?;

    let Some(delay) = clear_after.filter(|d| !d.is_zero()) else {
        return Ok(());
    };

    eprintln!("Clipboard will be cleared in {}s", delay.as_secs());
    std::thread::sleep(delay);

    let current: Result<String, _> = ctx.get_contents();
    if current.ok().as_deref() == Some(text) {
        ctx.set_contents(String::new())
            .map_err(|e| format!("Clipboard clear error: {}", e))?;
        debug!("cleared clipboard");
    }

    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

pub fn print_settings(config: &GeneratorConfig, flags: &ApplicationFlags) {
    println!("Generator");
    println!("  length           {}", config.length);
    println!("  lower            {}", on_off(config.lower));
    println!("  upper            {}", on_off(config.upper));
    println!("  numbers          {}", on_off(config.numbers));
    println!("  symbols          {}", on_off(config.symbols));
    println!("Application");
    println!("  start-at-login   {}", on_off(flags.start_at_login));
    println!("  window-on-start  {}", on_off(flags.show_window_on_start));
}

/// Echo a change back to the user, the way a bound control would update.
pub fn print_change(change: &SettingChange) {
    println!("{} = {}", change.name(), change.value);
}
