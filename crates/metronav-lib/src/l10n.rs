use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Language code preferred when rendering localized text.
pub const PREFERRED_LANG: &str = "zh";

/// A bundle of translations keyed by language code.
///
/// Rendering picks the preferred language when present and otherwise falls
/// back to the first entry in key order, with a warning. Ingestion rejects
/// empty bundles, so a decoded map always renders something.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bundle with one translation.
    pub fn single(lang: &str, text: &str) -> Self {
        let mut map = BTreeMap::new();
        map.insert(lang.to_string(), text.to_string());
        Self(map)
    }

    pub fn insert(&mut self, lang: &str, text: &str) {
        self.0.insert(lang.to_string(), text.to_string());
    }

    /// Translation for exactly `lang`, no fallback.
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(lang).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All translations, in language-code order.
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    /// Translation in `lang`, else the first available one.
    ///
    /// Returns `None` only for an empty bundle.
    pub fn preferred(&self, lang: &str) -> Option<&str> {
        if let Some(text) = self.0.get(lang) {
            return Some(text.as_str());
        }
        let (fallback, text) = self.0.iter().next()?;
        warn!(missing = lang, fallback = %fallback, "translation missing, falling back");
        Some(text.as_str())
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.preferred(PREFERRED_LANG) {
            Some(text) => f.write_str(text),
            None => Ok(()),
        }
    }
}

impl From<BTreeMap<String, String>> for LocalizedText {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}
