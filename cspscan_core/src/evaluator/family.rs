//! Family resolution for `foreach` leaves.
//!
//! A family is backed by an unknown number of sections. Only the first
//! pattern of the leaf is used. Two addressing modes exist:
//!
//! - numbered: `LIGHT_N` tries `LIGHT_0`, `LIGHT_1`, ... and gives up after
//!   two consecutive missing indices, so a single gap is tolerated;
//! - ellipsis: `LIGHT_...` visits every raw `[LIGHT_...]` occurrence in
//!   document order, numbering them from zero.
//!
//! With `only_one` the scan stops at the first member passing the entries
//! filter and the family collapses to a flag; a family with no passing
//! member is an explicit `false`. Otherwise the family is a map from index
//! to member outcome where rejected members are simply missing.

use std::collections::BTreeMap;

use tracing::trace;

use super::match_section;
use crate::error::TemplateError;
use crate::pattern::TagPattern;
use crate::result::Outcome;
use crate::store::{ConfigStore, Fields};
use crate::template::LeafSpec;

const MAX_CONSECUTIVE_MISSES: usize = 2;

/// Resolve a `foreach` leaf located at `path`.
pub fn resolve(store: &ConfigStore, leaf: &LeafSpec, path: &str) -> Result<Outcome, TemplateError> {
    let pattern = leaf
        .patterns
        .first()
        .ok_or_else(|| TemplateError::invalid(path, "foreach leaf has no tag pattern"))?;

    let mut collector = Collector::new(leaf);
    if pattern.is_ellipsis() {
        scan_occurrences(store, pattern, &mut collector);
    } else if pattern.has_placeholder() {
        scan_indexed(store, pattern, &mut collector);
    } else {
        return Err(TemplateError::invalid(
            path,
            format!("foreach pattern `{pattern}` has neither an `_N` placeholder nor an ellipsis"),
        ));
    }

    Ok(collector.finish())
}

fn scan_indexed(store: &ConfigStore, pattern: &TagPattern, collector: &mut Collector<'_>) {
    let mut misses = 0;
    let mut index = 0;
    while misses < MAX_CONSECUTIVE_MISSES {
        let tag = pattern.indexed(index);
        if let Some(fields) = store.get(&tag) {
            misses = 0;
            if collector.offer(index, fields) {
                return;
            }
        } else {
            trace!("Tag '{}' not found", tag);
            misses += 1;
        }
        index += 1;
    }
}

fn scan_occurrences(store: &ConfigStore, pattern: &TagPattern, collector: &mut Collector<'_>) {
    for (index, section) in store.occurrences(pattern.base()).enumerate() {
        if collector.offer(index, section.fields()) {
            return;
        }
    }
}

/// Accumulates family members under the leaf's `only_one` policy.
struct Collector<'l> {
    leaf: &'l LeafSpec,
    members: BTreeMap<usize, Outcome>,
}

impl<'l> Collector<'l> {
    const fn new(leaf: &'l LeafSpec) -> Self {
        Self {
            leaf,
            members: BTreeMap::new(),
        }
    }

    /// Record one member. Returns `true` when scanning should stop.
    fn offer(&mut self, index: usize, fields: &Fields) -> bool {
        let Some(outcome) = match_section(fields, self.leaf) else {
            trace!("Member {} rejected by entries", index);
            return false;
        };
        self.members.insert(index, outcome);
        self.leaf.only_one
    }

    fn finish(self) -> Outcome {
        if self.leaf.only_one {
            Outcome::Flag(!self.members.is_empty())
        } else {
            Outcome::Family(self.members)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EntriesFilter;
    use crate::template::Entry;

    fn foreach(pattern: &str) -> LeafSpec {
        LeafSpec {
            patterns: vec![TagPattern::parse(pattern)],
            foreach: true,
            ..LeafSpec::default()
        }
    }

    fn typed(tag: &str, kind: &str) -> (String, Fields) {
        (tag.to_string(), [("TYPE", kind)].into_iter().collect())
    }

    fn indices(outcome: &Outcome) -> Vec<usize> {
        match outcome {
            Outcome::Family(members) => members.keys().copied().collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn one_gap_is_tolerated() -> Result<(), TemplateError> {
        let store: ConfigStore = [
            typed("FOO_0", "a"),
            typed("FOO_1", "a"),
            typed("FOO_3", "a"),
        ]
        .into_iter()
        .collect();

        let outcome = resolve(&store, &foreach("FOO_N"), "Foo")?;
        assert_eq!(indices(&outcome), [0, 1, 3]);
        Ok(())
    }

    #[test]
    fn two_consecutive_gaps_end_the_scan() -> Result<(), TemplateError> {
        let store: ConfigStore = [typed("FOO_0", "a"), typed("FOO_3", "a")]
            .into_iter()
            .collect();

        let outcome = resolve(&store, &foreach("[FOO_N]"), "Foo")?;
        assert_eq!(indices(&outcome), [0]);
        Ok(())
    }

    #[test]
    fn family_may_start_at_one() -> Result<(), TemplateError> {
        let store: ConfigStore = [typed("FOO_1", "a"), typed("FOO_2", "a")]
            .into_iter()
            .collect();

        let outcome = resolve(&store, &foreach("FOO_N"), "Foo")?;
        assert_eq!(indices(&outcome), [1, 2]);
        Ok(())
    }

    #[test]
    fn rejected_members_are_absent_not_false() -> Result<(), TemplateError> {
        let store: ConfigStore = [typed("LIGHT_0", "LED"), typed("LIGHT_1", "XENON")]
            .into_iter()
            .collect();
        let leaf = LeafSpec {
            entries: EntriesFilter::new().with_condition("TYPE", "LED|HALOGEN"),
            ..foreach("LIGHT_N")
        };

        let outcome = resolve(&store, &leaf, "Lights.Headlights")?;
        assert_eq!(
            outcome,
            Outcome::Family(BTreeMap::from([(0, Outcome::Flag(true))]))
        );
        Ok(())
    }

    #[test]
    fn rejected_member_still_resets_the_miss_counter() -> Result<(), TemplateError> {
        let store: ConfigStore = [
            typed("LIGHT_0", "XENON"),
            typed("LIGHT_2", "XENON"),
            typed("LIGHT_4", "LED"),
        ]
        .into_iter()
        .collect();
        let leaf = LeafSpec {
            entries: EntriesFilter::new().with_condition("TYPE", "LED"),
            ..foreach("LIGHT_N")
        };

        let outcome = resolve(&store, &leaf, "Lights")?;
        assert_eq!(indices(&outcome), [4]);
        Ok(())
    }

    #[test]
    fn empty_family_is_an_empty_map() -> Result<(), TemplateError> {
        let outcome = resolve(&ConfigStore::new(), &foreach("FOO_N"), "Foo")?;
        assert_eq!(outcome, Outcome::Family(BTreeMap::new()));
        assert!(!outcome.is_truthy());
        Ok(())
    }

    #[test]
    fn only_one_without_match_is_false() -> Result<(), TemplateError> {
        let store: ConfigStore = [typed("LIGHT_0", "XENON")].into_iter().collect();
        let leaf = LeafSpec {
            entries: EntriesFilter::new().with_condition("TYPE", "LED"),
            only_one: true,
            ..foreach("LIGHT_N")
        };

        assert_eq!(resolve(&store, &leaf, "Lights")?, Outcome::Flag(false));
        assert_eq!(
            resolve(&ConfigStore::new(), &leaf, "Lights")?,
            Outcome::Flag(false)
        );
        Ok(())
    }

    #[test]
    fn only_one_stops_at_first_match() -> Result<(), TemplateError> {
        let store: ConfigStore = [
            typed("LIGHT_0", "XENON"),
            typed("LIGHT_1", "LED"),
            typed("LIGHT_2", "LED"),
        ]
        .into_iter()
        .collect();
        let leaf = LeafSpec {
            entries: EntriesFilter::new().with_condition("TYPE", "LED"),
            only_one: true,
            ..foreach("LIGHT_N")
        };

        assert_eq!(resolve(&store, &leaf, "Lights")?, Outcome::Flag(true));
        Ok(())
    }

    #[test]
    fn ellipsis_numbers_every_occurrence() -> Result<(), TemplateError> {
        let store: ConfigStore = [
            typed("SHADER_REPLACEMENT_...", "glass"),
            typed("LIGHT_0", "LED"),
            typed("SHADER_REPLACEMENT_...", "paint"),
            typed("SHADER_REPLACEMENT_...", "glass_tinted"),
        ]
        .into_iter()
        .collect();
        let leaf = LeafSpec {
            entries: EntriesFilter::new().with_condition("TYPE", "glass!"),
            entry: Some(Entry::Field("TYPE".into())),
            return_value: true,
            ..foreach("[SHADER_REPLACEMENT_...]")
        };

        let outcome = resolve(&store, &leaf, "Shaders")?;
        assert_eq!(
            outcome,
            Outcome::Family(BTreeMap::from([
                (0, Outcome::Value("glass".into())),
                (2, Outcome::Value("glass_tinted".into())),
            ]))
        );
        Ok(())
    }

    #[test]
    fn ellipsis_with_only_one_collapses_to_true() -> Result<(), TemplateError> {
        let store: ConfigStore = [typed("LIGHT_...", "LED"), typed("LIGHT_...", "LED")]
            .into_iter()
            .collect();
        let leaf = LeafSpec {
            only_one: true,
            ..foreach("LIGHT_...")
        };

        assert_eq!(resolve(&store, &leaf, "Lights")?, Outcome::Flag(true));
        Ok(())
    }

    #[test]
    fn only_first_pattern_is_used() -> Result<(), TemplateError> {
        let store: ConfigStore = [typed("B_0", "x")].into_iter().collect();
        let leaf = LeafSpec {
            patterns: vec![TagPattern::parse("A_N"), TagPattern::parse("B_N")],
            ..foreach("A_N")
        };

        assert_eq!(indices(&resolve(&store, &leaf, "AB")?), Vec::<usize>::new());
        Ok(())
    }

    #[test]
    fn invalid_leaves_are_errors() {
        let empty = LeafSpec {
            patterns: Vec::new(),
            ..foreach("unused")
        };
        assert!(matches!(
            resolve(&ConfigStore::new(), &empty, "Lights.Broken"),
            Err(TemplateError::InvalidTemplateSpec { ref path, .. }) if path == "Lights.Broken"
        ));

        assert!(matches!(
            resolve(&ConfigStore::new(), &foreach("[HORN]"), "Audio.Horn"),
            Err(TemplateError::InvalidTemplateSpec { .. })
        ));
    }
}
