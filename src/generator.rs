//! Random password generation.
//!
//! A password is built from the alphabet formed by the enabled character
//! classes. Each position is drawn independently and uniformly from that
//! alphabet. Generation cannot fail: with every class disabled the result
//! is simply empty.

use std::rc::Rc;

use rand::Rng;
use serde::Serialize;

use crate::constants::{defaults, keys};
use crate::store::PreferenceStore;

/// A fixed group of characters that can be switched on or off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Lower,
    Upper,
    Numbers,
    Symbols,
}

impl CharClass {
    /// Order in which enabled classes are concatenated into the alphabet.
    pub const ALL: [CharClass; 4] = [
        CharClass::Lower,
        CharClass::Upper,
        CharClass::Numbers,
        CharClass::Symbols,
    ];

    pub fn charset(self) -> &'static str {
        match self {
            CharClass::Lower => "abcdefghijklmnopqrstuvwxyz",
            CharClass::Upper => "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            CharClass::Numbers => "0123456789",
            CharClass::Symbols => ".!?;,&%$@#^*~",
        }
    }
}

/// Options controlling what a generated password looks like.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeneratorConfig {
    pub length: i64,
    pub lower: bool,
    pub upper: bool,
    pub numbers: bool,
    pub symbols: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            length: defaults::LENGTH,
            lower: defaults::LOWER,
            upper: defaults::UPPER,
            numbers: defaults::NUMBERS,
            symbols: defaults::SYMBOLS,
        }
    }
}

impl GeneratorConfig {
    /// Read the current configuration, falling back to defaults for any
    /// setting that was never stored.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        Self {
            length: store.get_int(keys::LENGTH, defaults::LENGTH),
            lower: store.get_bool(keys::LOWER, defaults::LOWER),
            upper: store.get_bool(keys::UPPER, defaults::UPPER),
            numbers: store.get_bool(keys::NUMBERS, defaults::NUMBERS),
            symbols: store.get_bool(keys::SYMBOLS, defaults::SYMBOLS),
        }
    }

    pub fn is_enabled(&self, class: CharClass) -> bool {
        match class {
            CharClass::Lower => self.lower,
            CharClass::Upper => self.upper,
            CharClass::Numbers => self.numbers,
            CharClass::Symbols => self.symbols,
        }
    }
}

/// Characters a password may be drawn from under `config`.
pub fn alphabet(config: &GeneratorConfig) -> Vec<char> {
    CharClass::ALL
        .iter()
        .filter(|class| config.is_enabled(**class))
        .flat_map(|class| class.charset().chars())
        .collect()
}

/// Generate a password from `config` using the supplied random source.
///
/// Negative lengths are treated as zero.
pub fn generate_with<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> String {
    let chars = alphabet(config);
    if chars.is_empty() {
        return String::new();
    }

    let length = usize::try_from(config.length).unwrap_or(0);
    (0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect()
}

/// Password generator bound to a preference store.
///
/// The configuration is re-read on every call so changes made through
/// [`crate::settings::Settings`] take effect immediately.
pub struct Generator {
    store: Rc<dyn PreferenceStore>,
}

impl Generator {
    pub fn new(store: Rc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig::load(self.store.as_ref())
    }

    pub fn generate(&self) -> String {
        generate_with(&self.config(), &mut rand::rngs::OsRng)
    }
}
