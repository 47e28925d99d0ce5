//! Single-match resolution: the first pattern that hits wins.

use tracing::trace;

use super::match_section;
use crate::result::Outcome;
use crate::store::ConfigStore;
use crate::template::LeafSpec;

/// Try each pattern in declaration order and stop at the first present tag
/// whose fields pass the entries filter.
///
/// Returns `None` when no pattern matches. A rejected tag never lends its
/// data to the next pattern.
#[must_use]
pub fn resolve(store: &ConfigStore, leaf: &LeafSpec) -> Option<Outcome> {
    leaf.patterns.iter().find_map(|pattern| {
        let Some(fields) = store.resolve(pattern) else {
            trace!("Tag '{}' not found", pattern.base());
            return None;
        };
        let outcome = match_section(fields, leaf);
        if outcome.is_none() {
            trace!("Tag '{}' rejected by entries", pattern.base());
        }
        outcome
    })
}
