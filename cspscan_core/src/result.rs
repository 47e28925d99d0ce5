//! The report produced by an evaluation.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Value recorded for a category or sub-category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Presence or match marker.
    Flag(bool),
    /// A single extracted field value.
    Value(String),
    /// Several extracted fields, keyed by lower-cased field name.
    Fields(BTreeMap<String, String>),
    /// Members of a tag family, keyed by index.
    Family(BTreeMap<usize, Outcome>),
    /// Nested sub-categories.
    Group(ResultTree),
}

impl Outcome {
    /// `false`, empty strings and empty maps are falsy and get pruned by
    /// the enclosing category.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Value(value) => !value.is_empty(),
            Self::Fields(fields) => !fields.is_empty(),
            Self::Family(members) => !members.is_empty(),
            Self::Group(tree) => !tree.is_empty(),
        }
    }

    #[must_use]
    pub const fn as_group(&self) -> Option<&ResultTree> {
        match self {
            Self::Group(tree) => Some(tree),
            _ => None,
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flag(flag) => serializer.serialize_bool(*flag),
            Self::Value(value) => serializer.serialize_str(value),
            Self::Fields(fields) => fields.serialize(serializer),
            Self::Family(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (index, member) in members {
                    map.serialize_entry(&index.to_string(), member)?;
                }
                map.end()
            }
            Self::Group(tree) => tree.serialize(serializer),
        }
    }
}

/// Category name to outcome, in template declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTree {
    entries: Vec<(String, Outcome)>,
}

impl ResultTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record an outcome, replacing an earlier one under the same name.
    pub fn insert(&mut self, name: impl Into<String>, outcome: Outcome) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = outcome,
            None => self.entries.push((name, outcome)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, outcome)| outcome)
    }

    /// Drop every falsy outcome.
    pub fn retain_truthy(&mut self) {
        self.entries.retain(|(_, outcome)| outcome.is_truthy());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.entries.iter().map(|(n, o)| (n.as_str(), o))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ResultTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, outcome) in &self.entries {
            map.serialize_entry(name, outcome)?;
        }
        map.end()
    }
}
