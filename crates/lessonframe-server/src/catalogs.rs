//! Translation catalogs served to the page script.
//!
//! Catalogs are loaded once at start-up from `<dir>/<lang>.json`. A request
//! for a language without a catalog gets the English one.

use std::{collections::BTreeMap, path::Path};

use lessonframe_core::{Catalog, config::DEFAULT_LOCALE};
use serde_json::Value;

use crate::error::ServerError;

/// Catalogs by language code.
#[derive(Debug, Clone, Default)]
pub struct TranslationStore {
    catalogs: BTreeMap<String, Value>,
}

impl TranslationStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.json` file in `dir`, keyed by file stem.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if the directory or a file cannot be
    /// read, `ServerError::Catalog` if a file is not a valid catalog.
    pub fn load_dir(dir: &Path) -> Result<Self, ServerError> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| ServerError::Config(format!("{}: {e}", dir.display())))?;

        let mut store = Self::new();
        for entry in entries {
            let path = entry.map_err(|e| ServerError::Config(e.to_string()))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(lang) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let text = std::fs::read_to_string(&path)
                .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
            store.insert(lang, &text)?;
            tracing::debug!(lang, path = %path.display(), "loaded catalog");
        }

        Ok(store)
    }

    /// Add the catalog for `lang` from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Catalog` if the text is not a valid catalog.
    pub fn insert(&mut self, lang: &str, json: &str) -> Result<(), ServerError> {
        Catalog::from_json(json)?;
        let value = serde_json::from_str(json)
            .map_err(|e| ServerError::Internal(format!("catalog {lang}: {e}")))?;
        self.catalogs.insert(lang.to_string(), value);
        Ok(())
    }

    /// Catalog for `lang`, falling back to English.
    ///
    /// Returns the language actually served along with its catalog.
    pub fn lookup(&self, lang: &str) -> Option<(&str, &Value)> {
        self.catalogs
            .get_key_value(lang)
            .or_else(|| self.catalogs.get_key_value(DEFAULT_LOCALE))
            .map(|(lang, catalog)| (lang.as_str(), catalog))
    }

    /// Languages with a catalog, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }

    /// Number of catalogs.
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    /// True when no catalog is loaded.
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}
