//! Lenient reader for CSP `ext_config.ini` files.
//!
//! The dialect follows what these files look like in the wild:
//!
//! - `[SECTION]` headers may repeat; every occurrence is kept,
//! - `KEY = value` and `KEY: value` both work, key case is preserved,
//! - a key without a delimiter is declared but carries no value,
//! - `;` and `#` start full-line comments,
//! - a line indented deeper than its key line continues that value; a blank
//!   or comment line ends it,
//! - `[DEFAULT]` keys are inherited by every other section.
//!
//! Interpolation (`%(name)s`) is not performed.

use cspscan_core::{ConfigStore, Fields};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

const DEFAULT_SECTION: &str = "DEFAULT";
const COMMENT_PREFIXES: [char; 2] = [';', '#'];
const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IniOptions {
    /// Drop ` ; trailing comments` from values. Off by default because
    /// values are taken verbatim otherwise.
    #[serde(default)]
    pub strip_inline_comments: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

struct OpenSection {
    tag: String,
    fields: Fields,
    last_key: Option<String>,
    /// Indentation of the line that set `last_key`.
    key_indent: usize,
}

/// Parse INI text into a [`ConfigStore`].
pub fn parse_ini(text: &str, options: &IniOptions) -> Result<ConfigStore, SyntaxError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut sections: Vec<(String, Fields)> = Vec::new();
    let mut defaults = Fields::new();
    let mut current: Option<OpenSection> = None;

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIXES) {
            if let Some(section) = current.as_mut() {
                section.last_key = None;
            }
            continue;
        }

        let indent = indentation(raw);
        if let Some(section) = current.as_mut() {
            if let Some(key) = section.last_key.as_deref() {
                if indent > section.key_indent {
                    let continuation = value_text(trimmed, options);
                    if let Some(value) = section.fields.get_mut(key) {
                        value.push('\n');
                        value.push_str(continuation);
                    }
                    continue;
                }
            }
        }

        if let Some(header) = trimmed.strip_prefix('[') {
            let end = header
                .rfind(']')
                .ok_or_else(|| SyntaxError::new(line, "unterminated section header"))?;
            let tag = &header[..end];
            if tag.is_empty() {
                return Err(SyntaxError::new(line, "empty section header"));
            }
            if let Some(done) = current.take() {
                sections.push((done.tag, done.fields));
            }
            current = Some(OpenSection {
                tag: tag.to_string(),
                fields: Fields::new(),
                last_key: None,
                key_indent: 0,
            });
            continue;
        }

        let section = current
            .as_mut()
            .ok_or_else(|| SyntaxError::new(line, "key/value line before any section header"))?;
        let (key, value) = split_option(trimmed, options);
        if key.is_empty() {
            return Err(SyntaxError::new(line, "empty key"));
        }
        match value {
            Some(value) => section.fields.insert(key, value),
            None => section.fields.insert_valueless(key),
        }
        section.last_key = Some(key.to_string());
        section.key_indent = indent;
    }
    if let Some(done) = current.take() {
        sections.push((done.tag, done.fields));
    }

    let mut store = ConfigStore::new();
    for (tag, fields) in sections {
        if tag == DEFAULT_SECTION {
            defaults.merge(&fields);
        } else {
            store.push_section(tag, fields);
        }
    }
    if defaults.is_empty() {
        return Ok(store);
    }

    trace!("Applying {} DEFAULT keys", defaults.len());
    Ok(apply_defaults(&store, &defaults))
}

fn apply_defaults(store: &ConfigStore, defaults: &Fields) -> ConfigStore {
    let mut merged = ConfigStore::new();
    for section in store.sections() {
        let mut fields = defaults.clone();
        fields.merge(section.fields());
        merged.push_section(section.tag(), fields);
    }
    merged
}

/// Split `key = value` / `key: value` at the first delimiter.
///
/// A line without a delimiter is a bare key with no value.
fn split_option<'a>(line: &'a str, options: &IniOptions) -> (&'a str, Option<&'a str>) {
    line.find(['=', ':']).map_or((line, None), |at| {
        (line[..at].trim(), Some(value_text(&line[at + 1..], options)))
    })
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn value_text<'a>(value: &'a str, options: &IniOptions) -> &'a str {
    let value = value.trim();
    if !options.strip_inline_comments {
        return value;
    }
    inline_comment_start(value).map_or(value, |at| value[..at].trim_end())
}

/// An inline comment prefix only counts after whitespace.
fn inline_comment_start(value: &str) -> Option<usize> {
    value
        .char_indices()
        .zip(value.chars().skip(1))
        .find(|((_, c), next)| c.is_whitespace() && COMMENT_PREFIXES.contains(next))
        .map(|((at, _), _)| at)
}
