//! Where preferences live, and wiring of the components that use them.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context as _, Result};
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::constants::config::{APP_DIR, FILENAME};
use crate::generator::Generator;
use crate::login::{AutostartEntry, LoginItem, LoginItemError, MemoryLoginItem};
use crate::settings::Settings;
use crate::store::{FileStore, MemoryStore, PreferenceStore};

/// Platform default: `<config dir>/fastpass/preferences.json`, or the
/// working directory when no config dir is known.
pub fn default_store_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push(FILENAME);
    path
}

/// Commands that never touch the login item must not fail because it cannot
/// be located, so fall back to one that lives in memory.
fn login_item_or_memory(entry: Result<AutostartEntry, LoginItemError>) -> Box<dyn LoginItem> {
    match entry {
        Ok(entry) => Box::new(entry),
        Err(e) => {
            warn!(error = %e, "login item unavailable, start at login will not persist");
            Box::new(MemoryLoginItem::default())
        }
    }
}

/// Components built for one invocation, all sharing a single store handle.
pub struct Context {
    pub settings: Settings,
    pub generator: Generator,
    /// `None` when running without persistence.
    pub store_path: Option<PathBuf>,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.ephemeral {
            debug!("using in-memory preferences");
            return Ok(Self::assemble(
                Rc::new(MemoryStore::new()),
                Box::new(MemoryLoginItem::default()),
                None,
            ));
        }

        let path = cli.store.clone().unwrap_or_else(default_store_path);
        let store = FileStore::open(&path)
            .with_context(|| format!("Failed to open preferences at {}", path.display()))?;
        let login_item = login_item_or_memory(AutostartEntry::for_current_user());

        Ok(Self::assemble(Rc::new(store), login_item, Some(path)))
    }

    pub fn assemble(
        store: Rc<dyn PreferenceStore>,
        login_item: Box<dyn LoginItem>,
        store_path: Option<PathBuf>,
    ) -> Self {
        Self {
            generator: Generator::new(store.clone()),
            settings: Settings::new(store, login_item),
            store_path,
        }
    }
}
