//! Field conditions attached to a tag.
//!
//! A template expresses the expected value of a field as a short string:
//!
//! - `LED` requires the value to be exactly `LED` (surrounding whitespace of
//!   the expectation is ignored),
//! - `LED | HALOGEN` accepts any of the alternatives,
//! - `glass!` accepts any value that contains `glass`.

use std::fmt;

use tracing::trace;

use crate::pattern::TagPattern;
use crate::store::{ConfigStore, Fields};

const CONTAINS_SUFFIX: char = '!';
const ALTERNATION: char = '|';

/// Expected value of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// The value must contain the needle.
    Contains(String),
    /// The value must equal one of the alternatives.
    AnyOf(Vec<String>),
}

impl Expectation {
    #[must_use]
    pub fn parse(expr: &str) -> Self {
        expr.strip_suffix(CONTAINS_SUFFIX).map_or_else(
            || {
                Self::AnyOf(
                    expr.split(ALTERNATION)
                        .map(|alternative| alternative.trim().to_string())
                        .collect(),
                )
            },
            |needle| Self::Contains(needle.to_string()),
        )
    }

    #[must_use]
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            Self::Contains(needle) => actual.contains(needle.as_str()),
            Self::AnyOf(alternatives) => alternatives.iter().any(|alt| alt == actual),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(needle) => write!(f, "{needle}{CONTAINS_SUFFIX}"),
            Self::AnyOf(alternatives) => f.write_str(&alternatives.join("|")),
        }
    }
}

/// All conditions declared by a leaf's `entries`, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntriesFilter {
    conditions: Vec<(String, Expectation)>,
}

impl EntriesFilter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Add a condition on `field`.
    #[must_use]
    pub fn with_condition(mut self, field: impl Into<String>, expr: &str) -> Self {
        self.conditions.push((field.into(), Expectation::parse(expr)));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Whether a section satisfies every condition.
    ///
    /// A missing field fails its condition. An empty filter always passes.
    #[must_use]
    pub fn matches(&self, fields: &Fields) -> bool {
        self.conditions.iter().all(|(field, expectation)| {
            let satisfied = fields
                .get(field)
                .is_some_and(|actual| expectation.matches(actual));
            if !satisfied {
                trace!(
                    "Entry '{}' does not satisfy '{}' (found {:?})",
                    field,
                    expectation,
                    fields.get(field)
                );
            }
            satisfied
        })
    }
}

impl<K: Into<String>, V: AsRef<str>> FromIterator<(K, V)> for EntriesFilter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |filter, (field, expr)| {
                filter.with_condition(field, expr.as_ref())
            })
    }
}

/// Flat lookup: does any of `patterns` name a present tag whose fields pass `filter`?
///
/// Patterns are tried in order. With an empty filter this is a plain
/// presence check.
#[must_use]
pub fn check_entries(store: &ConfigStore, patterns: &[TagPattern], filter: &EntriesFilter) -> bool {
    patterns.iter().any(|pattern| match store.resolve(pattern) {
        Some(fields) => filter.matches(fields),
        None => {
            trace!("Tag '{}' not found", pattern.base());
            false
        }
    })
}
