//! Translation lookup.
//!
//! Catalogs map English source strings to their translation. A missing entry
//! falls back to the source string, so an empty catalog renders English.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::CatalogError;

/// Source strings shown by the embedding UI.
pub mod msg {
    /// Heading of the configuration warning box.
    pub const WARNING_HEADING: &str = "Warning: ";
    /// Body of the configuration warning box.
    pub const MISSING_LESSON_ID: &str = concat!(
        "This Open Classroom lesson could not be loaded because no ",
        "openclassroom-id attribute was specified in the HTML tag.",
    );
    /// Label of the manual load button.
    pub const LOAD_LESSON: &str = "Load Lesson";
    /// Accessible title of the lesson frame.
    pub const FRAME_TITLE: &str = "Open Classroom lesson";
    /// Loading indicator text.
    pub const LOADING: &str = "Loading...";
    /// Loading indicator text after the load timeout.
    pub const LOAD_FAILED: &str = "This lesson could not be loaded.";
    /// Subtitle under [`LOAD_FAILED`].
    pub const LOAD_FAILED_SUBTITLE: &str = "Sorry about that.";
}

/// A translation catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

/// Catalog values are either a string or, for plural forms, a list whose
/// first element is the singular.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogEntry {
    Single(String),
    Plural(Vec<String>),
}

impl Catalog {
    /// Empty catalog (English).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from a flat JSON object.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidJson` if the text is not an object of
    /// strings or string lists.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: HashMap<String, CatalogEntry> = serde_json::from_str(json)
            .map_err(|e| CatalogError::InvalidJson { reason: e.to_string() })?;

        let entries = raw
            .into_iter()
            .filter_map(|(key, entry)| match entry {
                CatalogEntry::Single(text) => Some((key, text)),
                CatalogEntry::Plural(forms) => forms.into_iter().next().map(|text| (key, text)),
            })
            .collect();

        Ok(Self { entries })
    }

    /// Add or replace one translation.
    pub fn insert(&mut self, source: impl Into<String>, translation: impl Into<String>) {
        self.entries.insert(source.into(), translation.into());
    }

    /// Translate `source`, falling back to `source` itself.
    pub fn gettext<'a>(&'a self, source: &'a str) -> &'a str {
        self.entries.get(source).map_or(source, String::as_str)
    }

    /// Number of translated strings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is translated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
