use thiserror::Error;

/// Problems found in a feature template.
///
/// `Malformed` is raised while converting JSON into a [`crate::TemplateTree`];
/// `InvalidTemplateSpec` is raised during evaluation for a leaf that cannot be
/// resolved, and only aborts that leaf.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Malformed template at `{path}`: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Invalid template spec at `{path}`: {reason}")]
    InvalidTemplateSpec { path: String, reason: String },
}

impl TemplateError {
    pub(crate) fn malformed(path: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTemplateSpec {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Dotted category path the error refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Malformed { path, .. } | Self::InvalidTemplateSpec { path, .. } => path,
        }
    }
}
