//! Typed feature templates.
//!
//! A template is a JSON object of categories. A category either groups
//! sub-categories under `childs` or is a leaf describing which tags to look up:
//!
//! ```json
//! {
//!   "Lights": {
//!     "childs": {
//!       "Headlights": { "tags": ["LIGHT_N"], "foreach": true, "entries": { "TYPE": "LED|HALOGEN" } },
//!       "Emissive":   { "tag": "[EMISSIVE_0]", "entry": "COLOR", "return_value": true }
//!     }
//!   }
//! }
//! ```
//!
//! The shape of every node is decided once here; the evaluator never looks
//! at raw JSON.

use serde_json::{Map, Value};

use crate::entries::EntriesFilter;
use crate::error::TemplateError;
use crate::pattern::TagPattern;

const ROOT: &str = "<root>";

/// Field(s) to extract when a leaf has `return_value` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Field(String),
    Fields(Vec<String>),
}

/// A leaf category: which tags to look up and what to record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafSpec {
    pub patterns: Vec<TagPattern>,
    pub entries: EntriesFilter,
    pub entry: Option<Entry>,
    pub foreach: bool,
    pub only_one: bool,
    pub return_value: bool,
}

impl LeafSpec {
    /// Field(s) to extract, if extraction is enabled.
    #[must_use]
    pub const fn extraction(&self) -> Option<&Entry> {
        if self.return_value {
            self.entry.as_ref()
        } else {
            None
        }
    }

    fn from_object(object: &Map<String, Value>, path: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            patterns: patterns(object, path)?,
            entries: entries(object, path)?,
            entry: entry(object, path)?,
            foreach: flag(object, "foreach", path)?,
            only_one: flag(object, "only_one", path)?,
            return_value: flag(object, "return_value", path)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySpec {
    Container { children: Vec<(String, CategorySpec)> },
    Leaf(LeafSpec),
}

impl CategorySpec {
    /// Build a node from JSON. `path` names the node in error messages.
    pub fn from_value(value: &Value, path: &str) -> Result<Self, TemplateError> {
        let object = value
            .as_object()
            .ok_or_else(|| TemplateError::malformed(path, "category must be an object"))?;

        match object.get("childs") {
            Some(Value::Object(childs)) => Ok(Self::Container {
                children: children(childs, path)?,
            }),
            Some(_) => Err(TemplateError::malformed(path, "`childs` must be an object")),
            None => LeafSpec::from_object(object, path).map(Self::Leaf),
        }
    }
}

/// Top-level categories in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTree {
    categories: Vec<(String, CategorySpec)>,
}

impl TemplateTree {
    #[must_use]
    pub const fn new(categories: Vec<(String, CategorySpec)>) -> Self {
        Self { categories }
    }

    pub fn from_value(value: &Value) -> Result<Self, TemplateError> {
        let object = value
            .as_object()
            .ok_or_else(|| TemplateError::malformed(ROOT, "template must be an object"))?;

        object
            .iter()
            .map(|(name, spec)| {
                CategorySpec::from_value(spec, name).map(|spec| (name.clone(), spec))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &CategorySpec)> {
        self.categories.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Dotted path of a child category.
pub(crate) fn child_path(parent: &str, name: &str) -> String {
    format!("{parent}.{name}")
}

fn children(
    childs: &Map<String, Value>,
    path: &str,
) -> Result<Vec<(String, CategorySpec)>, TemplateError> {
    childs
        .iter()
        .map(|(name, spec)| {
            CategorySpec::from_value(spec, &child_path(path, name)).map(|spec| (name.clone(), spec))
        })
        .collect()
}

/// `tags` wins when non-empty, otherwise `tag` is lifted into a one-element list.
fn patterns(object: &Map<String, Value>, path: &str) -> Result<Vec<TagPattern>, TemplateError> {
    let tags = match object.get("tags") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(TagPattern::parse)
                    .ok_or_else(|| TemplateError::malformed(path, "`tags` must only hold strings"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(TemplateError::malformed(path, "`tags` must be a list")),
    };
    if !tags.is_empty() {
        return Ok(tags);
    }

    match object.get("tag") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(tag)) if tag.is_empty() => Ok(Vec::new()),
        Some(Value::String(tag)) => Ok(vec![TagPattern::parse(tag)]),
        Some(_) => Err(TemplateError::malformed(path, "`tag` must be a string")),
    }
}

fn entries(object: &Map<String, Value>, path: &str) -> Result<EntriesFilter, TemplateError> {
    match object.get("entries") {
        None | Some(Value::Null) => Ok(EntriesFilter::new()),
        Some(Value::Object(conditions)) => {
            let mut filter = EntriesFilter::new();
            for (field, expr) in conditions {
                let expr = expr.as_str().ok_or_else(|| {
                    TemplateError::malformed(
                        path,
                        format!("expected value of entry `{field}` must be a string"),
                    )
                })?;
                filter = filter.with_condition(field.as_str(), expr);
            }
            Ok(filter)
        }
        Some(_) => Err(TemplateError::malformed(path, "`entries` must be an object")),
    }
}

/// An empty `entry` string or list disables extraction.
fn entry(object: &Map<String, Value>, path: &str) -> Result<Option<Entry>, TemplateError> {
    match object.get("entry") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(field)) if field.is_empty() => Ok(None),
        Some(Value::String(field)) => Ok(Some(Entry::Field(field.clone()))),
        Some(Value::Array(items)) if items.is_empty() => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| TemplateError::malformed(path, "`entry` list must only hold strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|fields| Some(Entry::Fields(fields))),
        Some(_) => Err(TemplateError::malformed(
            path,
            "`entry` must be a string or a list of strings",
        )),
    }
}

fn flag(object: &Map<String, Value>, key: &str, path: &str) -> Result<bool, TemplateError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(value)) => Ok(*value),
        Some(_) => Err(TemplateError::malformed(path, format!("`{key}` must be a boolean"))),
    }
}
