use std::path::PathBuf;

use cspscan_core::TemplateError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, InputError>;

/// Failures while reading inputs. All of them abort the invocation.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid INI in {} at line {line}: {message}", .path.display())]
    Ini {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Invalid template {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },
}

impl InputError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
