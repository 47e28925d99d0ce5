//! Tag patterns as written in templates.
//!
//! Templates decorate tags the way they appear in the INI file: `[CAR_N]`,
//! `LIGHT_...`, `[SHADER_REPLACEMENT_...]`. Brackets are cosmetic. A trailing
//! `...` selects ellipsis addressing, and `_N` is the index placeholder for
//! numbered families.

use std::fmt;

const ELLIPSIS: &str = "...";
const PLACEHOLDER: &str = "_N";

/// A normalized tag pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    raw: String,
    base: String,
    ellipsis: bool,
}

impl TagPattern {
    /// Parse a template tag, stripping its decoration.
    ///
    /// `[LIGHT_...]` yields base `LIGHT_` in ellipsis mode, `[CAR_N]` yields
    /// base `CAR_N`, `SECTION` is kept as is.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let unbracketed = raw.trim().trim_matches(is_bracket);
        let ellipsis = unbracketed.ends_with(ELLIPSIS);
        let base = if ellipsis {
            unbracketed.trim_matches(|c: char| is_bracket(c) || c == '.')
        } else {
            unbracketed
        };

        Self {
            raw: raw.to_string(),
            base: base.to_string(),
            ellipsis,
        }
    }

    /// The tag name with decoration removed.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub const fn is_ellipsis(&self) -> bool {
        self.ellipsis
    }

    /// Whether the base contains at least one `_N` index placeholder.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.base.contains(PLACEHOLDER)
    }

    /// Concrete tag for one member of a numbered family.
    ///
    /// Every `_N` occurrence is substituted, so `LIGHT_N` becomes `LIGHT_3`
    /// for index 3.
    #[must_use]
    pub fn indexed(&self, index: usize) -> String {
        self.base.replace(PLACEHOLDER, &format!("_{index}"))
    }
}

impl fmt::Display for TagPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for TagPattern {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Section name as an ellipsis family member would be compared.
///
/// CSP writes auto-numbered sections literally as `[LIGHT_...]`; those
/// headers compare equal to the pattern base `LIGHT_`.
pub(crate) fn ellipsis_base(tag: &str) -> &str {
    if tag.ends_with(ELLIPSIS) {
        tag.trim_end_matches('.')
    } else {
        tag
    }
}

const fn is_bracket(c: char) -> bool {
    matches!(c, '[' | ']')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brackets_are_stripped() {
        let pattern = TagPattern::parse("[CAR_N]");
        assert_eq!(pattern.base(), "CAR_N");
        assert!(!pattern.is_ellipsis());
        assert!(pattern.has_placeholder());
        assert_eq!(pattern.to_string(), "[CAR_N]");
    }

    #[test]
    fn ellipsis_is_detected_inside_brackets() {
        let pattern = TagPattern::parse("[LIGHT_...]");
        assert_eq!(pattern.base(), "LIGHT_");
        assert!(pattern.is_ellipsis());

        let bare = TagPattern::parse("LIGHT_...");
        assert_eq!(bare, TagPattern { raw: "LIGHT_...".into(), ..pattern });
    }

    #[test]
    fn placeholder_substitution() {
        let pattern = TagPattern::parse("EMISSIVE_N");
        assert_eq!(pattern.indexed(0), "EMISSIVE_0");
        assert_eq!(pattern.indexed(12), "EMISSIVE_12");
    }

    #[test]
    fn plain_tag_has_no_placeholder() {
        let pattern = TagPattern::parse(" [SHADER] ");
        assert_eq!(pattern.base(), "SHADER");
        assert!(!pattern.has_placeholder());
        assert_eq!(pattern.indexed(4), "SHADER");
    }

    #[test]
    fn ellipsis_base_only_trims_full_marker() {
        assert_eq!(ellipsis_base("LIGHT_..."), "LIGHT_");
        assert_eq!(ellipsis_base("LIGHT_"), "LIGHT_");
        assert_eq!(ellipsis_base("VERSION.1."), "VERSION.1.");
    }
}
