//! Launch-time routine.

use std::time::Instant;

use tracing::{info, warn};

use crate::config::Context;
use crate::settings::SettingsError;

/// What happened during [`run`].
#[derive(Debug, PartialEq, Eq)]
pub struct Launch {
    /// This launch wrote the one-time guard and tried to enable the login item.
    pub first_launch: bool,
    /// Set when the user asked to be shown a password on start.
    pub password: Option<String>,
}

/// On first launch the app registers itself to start at login, exactly once.
/// Afterwards the user's own choice is left alone.
///
/// The guard is written before the login item is touched, and a failed
/// registration does not stop the rest of start-up.
pub fn run(ctx: &mut Context) -> Result<Launch, SettingsError> {
    let started = Instant::now();

    let first_launch = ctx.settings.mark_login_initialized()?;
    if first_launch {
        if let Err(e) = ctx.settings.set_start_at_login(true) {
            warn!(error = %e, "could not enable start at login");
        }
    }

    let password = ctx
        .settings
        .flags()
        .show_window_on_start
        .then(|| ctx.generator.generate());

    info!(
        first_launch,
        elapsed_secs = started.elapsed().as_secs_f64(),
        "fastpass started"
    );

    Ok(Launch {
        first_launch,
        password,
    })
}
