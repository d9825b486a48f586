//! Durable key/value preferences.
//!
//! The store holds scalar values (booleans and integers) under string keys.
//! Reads never fail: an absent key yields the caller's default, and the
//! default is not written back. Every write is persisted before it returns.
//!
//! Access is single-threaded, so implementations use `RefCell` rather than
//! locks and take `&self` for writes. That lets one store handle be shared
//! through an `Rc` by the generator and the settings component.

use std::cell::RefCell;
use std::fs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading or persisting a file-backed store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error accessing preferences at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize preferences")]
    Serialize(#[from] serde_json::Error),
}

/// Persisted scalar preferences.
pub trait PreferenceStore {
    /// Whether a value has ever been written for `key`.
    fn exists(&self, key: &str) -> bool;

    fn get_bool(&self, key: &str, default: bool) -> bool;

    fn get_int(&self, key: &str, default: i64) -> i64;

    fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError>;

    fn set_int(&self, key: &str, value: i64) -> Result<(), StoreError>;
}

/// Interpret a raw stored value as a boolean.
///
/// Integers coerce the way user-defaults do (non-zero is true).
fn value_as_bool(key: &str, value: Option<&Value>, default: bool) -> bool {
    match value {
        None => default,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(default),
        Some(other) => {
            warn!(key, value = %other, "stored preference is not a boolean, using default");
            default
        }
    }
}

fn value_as_int(key: &str, value: Option<&Value>, default: i64) -> i64 {
    match value {
        None => default,
        Some(Value::Bool(b)) => i64::from(*b),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(default),
        Some(other) => {
            warn!(key, value = %other, "stored preference is not an integer, using default");
            default
        }
    }
}

/// `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Preferences kept in a single JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RefCell<Map<String, Value>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; the file
    /// is only created by the first write.
    ///
    /// A file that is not a JSON object is moved aside to `<path>.bak` and
    /// the store starts from defaults.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let values = match fs::read_to_string(&path) {
            Ok(data) if data.trim().is_empty() => Map::new(),
            Ok(data) => match serde_json::from_str::<Map<String, Value>>(&data) {
                Ok(values) => values,
                Err(e) => {
                    let backup = sibling(&path, ".bak");
                    warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        error = %e,
                        "preferences are unreadable, starting from defaults"
                    );
                    if let Err(e) = fs::rename(&path, &backup) {
                        warn!(error = %e, "could not move unreadable preferences aside");
                    }
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no preferences file yet");
                Map::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        debug!(path = %path.display(), entries = values.len(), "opened preferences");

        Ok(Self {
            path,
            values: RefCell::new(values),
        })
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        debug!(key, %value, "writing preference");
        self.values.borrow_mut().insert(key.to_string(), value);
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&*self.values.borrow())?;

        // Replace atomically so an interrupted write never truncates the file.
        let tmp = sibling(&self.path, ".tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl PreferenceStore for FileStore {
    fn exists(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        value_as_bool(key, self.values.borrow().get(key), default)
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        value_as_int(key, self.values.borrow().get(key), default)
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.set(key, Value::Bool(value))
    }

    fn set_int(&self, key: &str, value: i64) -> Result<(), StoreError> {
        self.set(key, Value::from(value))
    }
}

/// Preferences that live only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn exists(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        value_as_bool(key, self.values.borrow().get(key), default)
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        value_as_int(key, self.values.borrow().get(key), default)
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), Value::Bool(value));
        Ok(())
    }

    fn set_int(&self, key: &str, value: i64) -> Result<(), StoreError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), Value::from(value));
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Fresh, empty directory under the system temp dir.
    pub(crate) fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "fastpass-{}-{}-{}",
            name,
            std::process::id(),
            rand::random::<u32>()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn int_round_trip_ignores_default() {
        let store = MemoryStore::new();
        store.set_int("length", 64).unwrap();
        assert_eq!(store.get_int("length", 32), 64);
        assert_eq!(store.get_int("length", 0), 64);
    }

    #[test]
    fn default_is_not_written_back() {
        let store = MemoryStore::new();
        assert!(store.get_bool("never", true));
        assert!(!store.get_bool("never", false));
        assert!(!store.exists("never"));
    }

    #[test]
    fn cross_type_reads_coerce() {
        let store = MemoryStore::new();
        store.set_int("n", 0).unwrap();
        store.set_int("m", 7).unwrap();
        store.set_bool("b", true).unwrap();

        assert!(!store.get_bool("n", true));
        assert!(store.get_bool("m", false));
        assert_eq!(store.get_int("b", 42), 1);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = scratch_dir("reopen");
        let path = dir.join("nested").join("prefs.json");

        let store = FileStore::open(&path).unwrap();
        assert!(!store.exists("length"));
        store.set_int("length", 100).unwrap();
        store.set_bool("symbols", true).unwrap();
        assert!(path.exists());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_int("length", 32), 100);
        assert!(reopened.get_bool("symbols", false));
        assert!(reopened.exists("symbols"));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn file_store_read_does_not_create_file() {
        let dir = scratch_dir("lazy");
        let path = dir.join("prefs.json");

        let store = FileStore::open(&path).unwrap();
        assert!(store.get_bool("lower", true));
        assert!(!path.exists());
    }

    #[test]
    fn non_object_file_is_moved_aside() {
        let dir = scratch_dir("garbage");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("prefs.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(!store.exists("length"));
        assert!(!path.exists());
        assert_eq!(
            fs::read_to_string(dir.join("prefs.json.bak")).unwrap(),
            "[1, 2, 3]"
        );

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn truncated_file_still_generates_and_can_be_repaired() {
        let dir = scratch_dir("truncated");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("prefs.json");
        fs::write(&path, r#"{"length": 6"#).unwrap();

        let store = std::rc::Rc::new(FileStore::open(&path).unwrap());
        let generator = crate::generator::Generator::new(store.clone());
        assert_eq!(generator.generate().chars().count(), 32);

        store.set_int("length", 64).unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_int("length", 32), 64);
        assert!(!sibling(&path, ".tmp").exists());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn io_error_message_leaves_cause_to_source_chain() {
        let err = StoreError::Io {
            path: PathBuf::from("/nowhere/prefs.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied by test"),
        };
        assert_eq!(err.to_string(), "I/O error accessing preferences at /nowhere/prefs.json");
        let cause = std::error::Error::source(&err).map(|e| e.to_string());
        assert_eq!(cause.as_deref(), Some("denied by test"));
    }

    #[test]
    fn wrong_type_falls_back_to_default() {
        let dir = scratch_dir("wrongtype");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("prefs.json");
        fs::write(&path, r#"{"lower": "yes", "length": 40.9}"#).unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(!store.get_bool("lower", false));
        assert_eq!(store.get_int("length", 32), 40);

        let _ = fs::remove_dir_all(dir);
    }
}
