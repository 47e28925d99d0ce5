//! In-memory model of a parsed `ext_config.ini` dump.
//!
//! Sections are kept twice: once as raw occurrences in document order, so
//! repeated `[LIGHT_...]` headers stay distinct, and once merged by tag for
//! direct lookups, where a later duplicate overrides earlier keys.

use std::collections::HashMap;

use crate::pattern::{TagPattern, ellipsis_base};

/// Ordered key/value pairs of one section. Keys are case-sensitive.
///
/// A key may be present without a value (a bare `FLAG` line). Such a key
/// reads as absent through [`Fields::get`], so no entry condition can match
/// it, while [`Fields::has_key`] still reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, Option<String>)>,
}

impl Fields {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set a key, replacing an existing value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key.into(), Some(value.into()));
    }

    /// Declare a key that carries no value.
    pub fn insert_valueless(&mut self, key: impl Into<String>) {
        self.set(key.into(), None);
    }

    fn set(&mut self, key: String, value: Option<String>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Whether the key is declared, with or without a value.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Mutable access to the value of a key, used for continuation lines.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut String> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_mut())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            self.set(key.clone(), value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

/// A tagged section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    tag: String,
    fields: Fields,
}

impl Section {
    #[must_use]
    pub const fn new(tag: String, fields: Fields) -> Self {
        Self { tag, fields }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub const fn fields(&self) -> &Fields {
        &self.fields
    }
}

/// The parsed configuration, read-only during evaluation.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    raw: Vec<Section>,
    merged: Vec<Section>,
    index: HashMap<String, usize>,
}

impl ConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section occurrence.
    ///
    /// A tag seen before is merged into the lookup view key by key.
    pub fn push_section(&mut self, tag: impl Into<String>, fields: Fields) {
        let tag = tag.into();
        if let Some(&position) = self.index.get(&tag) {
            self.merged[position].fields.merge(&fields);
        } else {
            self.index.insert(tag.clone(), self.merged.len());
            self.merged.push(Section::new(tag.clone(), fields.clone()));
        }
        self.raw.push(Section::new(tag, fields));
    }

    /// Merged fields of a tag.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&Fields> {
        self.index
            .get(tag)
            .map(|&position| &self.merged[position].fields)
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    /// Every section occurrence in document order, duplicates included.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.raw.iter()
    }

    /// Raw occurrences belonging to the ellipsis family `base`, in document order.
    pub fn occurrences<'a, 'b>(
        &'a self,
        base: &'b str,
    ) -> impl Iterator<Item = &'a Section> + use<'a, 'b> {
        self.raw
            .iter()
            .filter(move |section| ellipsis_base(&section.tag) == base)
    }

    /// Fields addressed by a pattern.
    ///
    /// Ellipsis patterns resolve to the first occurrence of their family.
    #[must_use]
    pub fn resolve(&self, pattern: &TagPattern) -> Option<&Fields> {
        if pattern.is_ellipsis() {
            self.occurrences(pattern.base())
                .next()
                .map(Section::fields)
        } else {
            self.get(pattern.base())
        }
    }

    /// Number of distinct tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.merged.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// Number of section headers including duplicates.
    #[must_use]
    pub fn occurrence_count(&self) -> usize {
        self.raw.len()
    }
}

impl<T: Into<String>> FromIterator<(T, Fields)> for ConfigStore {
    fn from_iter<I: IntoIterator<Item = (T, Fields)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (tag, fields) in iter {
            store.push_section(tag, fields);
        }
        store
    }
}
