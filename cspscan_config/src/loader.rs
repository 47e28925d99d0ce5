//! File-level loaders for the two engine inputs.

use std::fs;
use std::path::Path;

use cspscan_core::{ConfigStore, TemplateTree};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{InputError, Result};
use crate::ini::{IniOptions, parse_ini};

/// Read and parse an `ext_config.ini` file.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; these
/// files are frequently saved in legacy code pages.
pub fn load_store(path: &Path, options: &IniOptions) -> Result<ConfigStore> {
    let bytes = fs::read(path).map_err(|e| InputError::io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);

    let store = parse_ini(&text, options).map_err(|e| InputError::Ini {
        path: path.to_path_buf(),
        line: e.line,
        message: e.message,
    })?;

    info!(
        "Loaded {} tags ({} sections) from {}",
        store.len(),
        store.occurrence_count(),
        path.display()
    );
    Ok(store)
}

/// Read a JSON feature template and build its typed tree.
pub fn load_template(path: &Path) -> Result<TemplateTree> {
    let content = fs::read_to_string(path).map_err(|e| InputError::io(path, e))?;
    let template = parse_template(&content, path)?;

    info!(
        "Loaded template with {} categories from {}",
        template.len(),
        path.display()
    );
    Ok(template)
}

/// Parse template text. `origin` is only used in error messages.
pub fn parse_template(content: &str, origin: &Path) -> Result<TemplateTree> {
    let value: Value = serde_json::from_str(content).map_err(|source| InputError::Json {
        path: origin.to_path_buf(),
        source,
    })?;
    debug!("Template JSON parsed, building category tree");

    TemplateTree::from_value(&value).map_err(|source| InputError::Template {
        path: origin.to_path_buf(),
        source,
    })
}
