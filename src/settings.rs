//! Settings mutation and change notification.
//!
//! [`Settings`] is the single write path for generator options and
//! application flags. Every setter persists the new value first and then
//! hands a [`SettingChange`] to each registered observer, synchronously,
//! before returning.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::constants::{defaults, keys, LENGTH_RANGE};
use crate::generator::GeneratorConfig;
use crate::login::{LoginItem, LoginItemError};
use crate::store::{PreferenceStore, StoreError};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    LoginItem(#[from] LoginItemError),

    #[error("invalid value {value:?} for {setting}: expected {expected}")]
    InvalidValue {
        setting: Setting,
        value: String,
        expected: &'static str,
    },

    #[error("length {length} is outside the allowed range {min}..={max}")]
    OutOfRange { length: i64, min: i64, max: i64 },
}

/// Which part of the settings surface a change belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Group {
    Generator,
    Application,
}

/// A user-editable setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Setting {
    Length,
    Lower,
    Upper,
    Numbers,
    Symbols,
    StartAtLogin,
    WindowOnStart,
}

impl Setting {
    pub fn group(self) -> Group {
        match self {
            Setting::StartAtLogin | Setting::WindowOnStart => Group::Application,
            _ => Group::Generator,
        }
    }

    /// Name carried in change notifications.
    pub fn name(self) -> &'static str {
        match self {
            Setting::Length => "length",
            Setting::Lower => "lower",
            Setting::Upper => "upper",
            Setting::Numbers => "numbers",
            Setting::Symbols => "symbols",
            Setting::StartAtLogin => "startAtLogin",
            Setting::WindowOnStart => "windowOnStart",
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(true) => f.write_str("on"),
            SettingValue::Bool(false) => f.write_str("off"),
            SettingValue::Int(n) => write!(f, "{n}"),
        }
    }
}

/// Broadcast to observers after a setting has been persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettingChange {
    pub group: Group,
    pub setting: Setting,
    pub value: SettingValue,
}

impl SettingChange {
    pub fn name(&self) -> &'static str {
        self.setting.name()
    }
}

/// Application-level switches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ApplicationFlags {
    pub start_at_login: bool,
    pub show_window_on_start: bool,
    pub run_at_login_initialized: bool,
}

type Observer = Box<dyn FnMut(&SettingChange)>;

pub struct Settings {
    store: Rc<dyn PreferenceStore>,
    login_item: Box<dyn LoginItem>,
    observers: Vec<Observer>,
}

impl Settings {
    pub fn new(store: Rc<dyn PreferenceStore>, login_item: Box<dyn LoginItem>) -> Self {
        Self {
            store,
            login_item,
            observers: Vec::new(),
        }
    }

    /// Register a callback invoked after every successful change.
    pub fn subscribe(&mut self, observer: impl FnMut(&SettingChange) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::load(self.store.as_ref())
    }

    pub fn flags(&self) -> ApplicationFlags {
        ApplicationFlags {
            start_at_login: self.login_item.is_enabled(),
            show_window_on_start: self
                .store
                .get_bool(keys::WINDOW_ON_START, defaults::WINDOW_ON_START),
            run_at_login_initialized: self.store.exists(keys::RUN_AT_LOGIN_INITIALIZED),
        }
    }

    pub fn set_length(&mut self, length: i64) -> Result<(), SettingsError> {
        self.store.set_int(keys::LENGTH, length)?;
        self.notify(Setting::Length, SettingValue::Int(length));
        Ok(())
    }

    pub fn set_lower(&mut self, enabled: bool) -> Result<(), SettingsError> {
        self.set_flag(Setting::Lower, keys::LOWER, enabled)
    }

    pub fn set_upper(&mut self, enabled: bool) -> Result<(), SettingsError> {
        self.set_flag(Setting::Upper, keys::UPPER, enabled)
    }

    pub fn set_numbers(&mut self, enabled: bool) -> Result<(), SettingsError> {
        self.set_flag(Setting::Numbers, keys::NUMBERS, enabled)
    }

    pub fn set_symbols(&mut self, enabled: bool) -> Result<(), SettingsError> {
        self.set_flag(Setting::Symbols, keys::SYMBOLS, enabled)
    }

    pub fn set_show_window_on_start(&mut self, enabled: bool) -> Result<(), SettingsError> {
        self.set_flag(Setting::WindowOnStart, keys::WINDOW_ON_START, enabled)
    }

    /// Toggle the login item. Once the user has chosen explicitly, the
    /// first-launch default is never applied again.
    pub fn set_start_at_login(&mut self, enabled: bool) -> Result<(), SettingsError> {
        self.login_item.set_enabled(enabled)?;
        self.mark_login_initialized()?;
        self.notify(Setting::StartAtLogin, SettingValue::Bool(enabled));
        Ok(())
    }

    /// Write the one-time login guard if it is not there yet. Returns whether
    /// this call was the one that wrote it.
    pub fn mark_login_initialized(&mut self) -> Result<bool, SettingsError> {
        if self.store.exists(keys::RUN_AT_LOGIN_INITIALIZED) {
            return Ok(false);
        }
        self.store.set_bool(keys::RUN_AT_LOGIN_INITIALIZED, true)?;
        Ok(true)
    }

    /// Set `setting` from its textual form.
    pub fn apply(&mut self, setting: Setting, raw: &str) -> Result<SettingValue, SettingsError> {
        let setter: fn(&mut Self, bool) -> Result<(), SettingsError> = match setting {
            Setting::Length => {
                let length = parse_length(raw)?;
                self.set_length(length)?;
                return Ok(SettingValue::Int(length));
            }
            Setting::Lower => Self::set_lower,
            Setting::Upper => Self::set_upper,
            Setting::Numbers => Self::set_numbers,
            Setting::Symbols => Self::set_symbols,
            Setting::StartAtLogin => Self::set_start_at_login,
            Setting::WindowOnStart => Self::set_show_window_on_start,
        };

        let enabled = parse_switch(raw).ok_or_else(|| SettingsError::InvalidValue {
            setting,
            value: raw.to_string(),
            expected: "on or off",
        })?;
        setter(self, enabled)?;
        Ok(SettingValue::Bool(enabled))
    }

    fn set_flag(&mut self, setting: Setting, key: &str, enabled: bool) -> Result<(), SettingsError> {
        self.store.set_bool(key, enabled)?;
        self.notify(setting, SettingValue::Bool(enabled));
        Ok(())
    }

    fn notify(&mut self, setting: Setting, value: SettingValue) {
        let change = SettingChange {
            group: setting.group(),
            setting,
            value,
        };
        info!(group = ?change.group, setting = change.name(), %value, "setting changed");
        for observer in &mut self.observers {
            observer(&change);
        }
    }
}

/// Lengths typed by the user must fall inside [`LENGTH_RANGE`].
fn parse_length(raw: &str) -> Result<i64, SettingsError> {
    let length = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| SettingsError::InvalidValue {
            setting: Setting::Length,
            value: raw.to_string(),
            expected: "an integer",
        })?;

    if !LENGTH_RANGE.contains(&length) {
        return Err(SettingsError::OutOfRange {
            length,
            min: *LENGTH_RANGE.start(),
            max: *LENGTH_RANGE.end(),
        });
    }
    Ok(length)
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "y" | "1" => Some(true),
        "off" | "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::login::MemoryLoginItem;
    use crate::store::MemoryStore;
    use std::cell::RefCell;

    fn settings() -> (Rc<MemoryStore>, Settings) {
        let store = Rc::new(MemoryStore::new());
        let settings = Settings::new(store.clone(), Box::new(MemoryLoginItem::default()));
        (store, settings)
    }

    #[test]
    fn setters_persist_before_notifying() {
        let (store, mut settings) = settings();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let observed_store = store.clone();
        let sink = seen.clone();
        settings.subscribe(move |change| {
            // The new value must already be readable from the store.
            assert_eq!(observed_store.get_int(keys::LENGTH, 0), 64);
            sink.borrow_mut().push(*change);
        });

        settings.set_length(64).unwrap();

        assert_eq!(store.get_int(keys::LENGTH, 32), 64);
        assert_eq!(
            *seen.borrow(),
            vec![SettingChange {
                group: Group::Generator,
                setting: Setting::Length,
                value: SettingValue::Int(64),
            }]
        );
    }

    #[test]
    fn every_observer_fires() {
        let (_store, mut settings) = settings();
        let count = Rc::new(RefCell::new(0));

        for _ in 0..3 {
            let count = count.clone();
            settings.subscribe(move |change| {
                assert_eq!(change.name(), "symbols");
                assert_eq!(change.group, Group::Generator);
                *count.borrow_mut() += 1;
            });
        }

        settings.set_symbols(true).unwrap();
        assert_eq!(*count.borrow(), 3);
    }

    #[test]
    fn generator_config_reflects_changes() {
        let (_store, mut settings) = settings();
        assert_eq!(settings.generator_config(), GeneratorConfig::default());

        settings.set_lower(false).unwrap();
        settings.set_numbers(false).unwrap();
        settings.set_symbols(true).unwrap();

        let config = settings.generator_config();
        assert!(!config.lower);
        assert!(config.upper);
        assert!(!config.numbers);
        assert!(config.symbols);
    }

    #[test]
    fn start_at_login_sets_guard_once() {
        let (store, mut settings) = settings();
        let groups = Rc::new(RefCell::new(Vec::new()));
        let sink = groups.clone();
        settings.subscribe(move |change| sink.borrow_mut().push((change.group, change.value)));

        assert!(!settings.flags().run_at_login_initialized);

        settings.set_start_at_login(false).unwrap();
        assert!(store.exists(keys::RUN_AT_LOGIN_INITIALIZED));
        assert!(!settings.flags().start_at_login);
        assert!(!settings.mark_login_initialized().unwrap());

        settings.set_start_at_login(true).unwrap();
        assert!(settings.flags().start_at_login);

        assert_eq!(
            *groups.borrow(),
            vec![
                (Group::Application, SettingValue::Bool(false)),
                (Group::Application, SettingValue::Bool(true)),
            ]
        );
    }

    #[test]
    fn apply_parses_values() {
        let (_store, mut settings) = settings();

        assert_eq!(settings.apply(Setting::Length, "100").unwrap(), SettingValue::Int(100));
        assert_eq!(settings.apply(Setting::Upper, "off").unwrap(), SettingValue::Bool(false));
        assert_eq!(
            settings.apply(Setting::WindowOnStart, "Yes").unwrap(),
            SettingValue::Bool(true)
        );

        assert_eq!(settings.generator_config().length, 100);
        assert!(!settings.generator_config().upper);
        assert!(settings.flags().show_window_on_start);
    }

    #[test]
    fn apply_rejects_bad_input_without_writing() {
        let (store, mut settings) = settings();

        assert!(matches!(
            settings.apply(Setting::Length, "12"),
            Err(SettingsError::OutOfRange { length: 12, .. })
        ));
        assert!(matches!(
            settings.apply(Setting::Length, "long"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            settings.apply(Setting::Lower, "maybe"),
            Err(SettingsError::InvalidValue { .. })
        ));

        assert!(!store.exists(keys::LENGTH));
        assert!(!store.exists(keys::LOWER));
    }

    #[test]
    fn direct_setter_accepts_any_length() {
        let (_store, mut settings) = settings();
        settings.set_length(4).unwrap();
        assert_eq!(settings.generator_config().length, 4);
    }
}
