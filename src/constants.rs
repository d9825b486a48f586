//! Fixed names and defaults shared across fastpass.

use std::ops::RangeInclusive;

pub const APP_NAME: &str = "fastpass";

/// Reverse-DNS identifier used for the login item.
pub const APP_ID: &str = "eu.fastpass.FastPassword";

/// Lengths offered to the user. The generator itself accepts any length.
pub const LENGTH_RANGE: RangeInclusive<i64> = 16..=128;

pub mod keys {
    pub const LENGTH: &str = "length";
    pub const LOWER: &str = "lower";
    pub const UPPER: &str = "upper";
    pub const NUMBERS: &str = "numbers";
    pub const SYMBOLS: &str = "symbols";
    pub const WINDOW_ON_START: &str = "windowOnStart";
    pub const RUN_AT_LOGIN_INITIALIZED: &str = "runAtLoginInitialized";
}

pub mod defaults {
    pub const LENGTH: i64 = 32;
    pub const LOWER: bool = true;
    pub const UPPER: bool = true;
    pub const NUMBERS: bool = true;
    pub const SYMBOLS: bool = false;
    pub const WINDOW_ON_START: bool = false;
}

pub mod config {
    pub const APP_DIR: &str = "fastpass";
    pub const FILENAME: &str = "preferences.json";
    pub const STORE_ENV: &str = "FASTPASS_STORE";
}
