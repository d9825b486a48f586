//! Start-at-login registration.
//!
//! The rest of the program only sees the [`LoginItem`] trait: a boolean that
//! can be read and written. [`AutostartEntry`] backs it with a per-user
//! autostart file that runs `fastpass launch` when the user logs in.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::constants::{APP_ID, APP_NAME};

#[derive(Debug, Error)]
pub enum LoginItemError {
    #[error("could not determine the per-user autostart directory")]
    NoAutostartDir,

    #[error("could not determine the path of the running executable")]
    CurrentExe(#[source] std::io::Error),

    #[error("I/O error accessing login item at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Registration of the application as a login item.
pub trait LoginItem {
    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool) -> Result<(), LoginItemError>;
}

/// Autostart file for the current user.
///
/// On macOS this is a launchd agent in `~/Library/LaunchAgents`; elsewhere it
/// is an XDG `.desktop` entry in `$XDG_CONFIG_HOME/autostart`. The item is
/// enabled exactly when the file exists.
#[derive(Debug, Clone)]
pub struct AutostartEntry {
    path: PathBuf,
    program: PathBuf,
}

impl AutostartEntry {
    pub fn new(path: impl Into<PathBuf>, program: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            program: program.into(),
        }
    }

    /// Entry for the running executable in the platform's autostart location.
    pub fn for_current_user() -> Result<Self, LoginItemError> {
        let program = std::env::current_exe().map_err(LoginItemError::CurrentExe)?;
        Ok(Self::new(Self::default_path()?, program))
    }

    fn default_path() -> Result<PathBuf, LoginItemError> {
        let path = if cfg!(target_os = "macos") {
            dirs::home_dir().map(|home| {
                home.join("Library")
                    .join("LaunchAgents")
                    .join(format!("{APP_ID}.LaunchAtLogin.plist"))
            })
        } else {
            dirs::config_dir().map(|config| {
                config
                    .join("autostart")
                    .join(format!("{APP_NAME}.desktop"))
            })
        };
        path.ok_or(LoginItemError::NoAutostartDir)
    }

    fn contents(&self) -> String {
        if cfg!(target_os = "macos") {
            self.launchd_plist()
        } else {
            self.desktop_entry()
        }
    }

    fn launchd_plist(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{APP_ID}.LaunchAtLogin</string>
    <key>ProgramArguments</key>
    <array>
        <string>{}</string>
        <string>launch</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#,
            xml_escape(&self.program.to_string_lossy())
        )
    }

    fn desktop_entry(&self) -> String {
        format!(
            "[Desktop Entry]\nType=Application\nName={APP_NAME}\nX-Id={APP_ID}\nExec=\"{}\" launch\nX-GNOME-Autostart-enabled=true\n",
            exec_quote(&self.program.to_string_lossy())
        )
    }
}

fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape for a double-quoted argument in a desktop entry `Exec` key.
fn exec_quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl LoginItem for AutostartEntry {
    fn is_enabled(&self) -> bool {
        self.path.is_file()
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), LoginItemError> {
        let io_err = |source| LoginItemError::Io {
            path: self.path.clone(),
            source,
        };

        if enabled {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
            fs::write(&self.path, self.contents()).map_err(io_err)?;
            info!(path = %self.path.display(), "registered login item");
        } else {
            match fs::remove_file(&self.path) {
                Ok(()) => info!(path = %self.path.display(), "removed login item"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %self.path.display(), "login item already absent");
                }
                Err(e) => return Err(io_err(e)),
            }
        }
        Ok(())
    }
}

/// Login item that only remembers its state in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoginItem {
    enabled: bool,
}

impl LoginItem for MemoryLoginItem {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), LoginItemError> {
        self.enabled = enabled;
        Ok(())
    }
}
