//! Template evaluation.
//!
//! Containers recurse into their children. A leaf child is dispatched to the
//! single-match resolver or, when it declares `foreach`, to the family
//! resolver. A leaf at the top level of the template is a bare presence
//! check. Falsy outcomes are pruned by the enclosing container.

pub mod family;
pub mod single;

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::TemplateError;
use crate::result::{Outcome, ResultTree};
use crate::store::{ConfigStore, Fields};
use crate::template::{CategorySpec, Entry, LeafSpec, TemplateTree, child_path};

/// Result tree plus the template errors met on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub results: ResultTree,
    pub errors: Vec<TemplateError>,
}

/// Evaluate `template` against `store`.
///
/// Invalid leaves are skipped and reported through `tracing`.
#[must_use]
pub fn process(store: &ConfigStore, template: &TemplateTree) -> ResultTree {
    let evaluation = process_checked(store, template);
    for error in &evaluation.errors {
        warn!("{error}");
    }
    evaluation.results
}

/// Evaluate `template` against `store`, returning template errors to the caller.
#[must_use]
pub fn process_checked(store: &ConfigStore, template: &TemplateTree) -> Evaluation {
    debug!(
        "Starting template evaluation: {} categories, {} tags",
        template.len(),
        store.len()
    );

    let mut evaluator = Evaluator::new(store);
    let mut results = ResultTree::new();
    for (name, spec) in template.categories() {
        debug!("Processing category: {}", name);
        let outcome = evaluator.evaluate(name, spec);
        if outcome.is_truthy() {
            results.insert(name, outcome);
        }
    }

    debug!("Evaluation completed: {} categories matched", results.len());
    Evaluation {
        results,
        errors: evaluator.into_errors(),
    }
}

/// Walks categories against one store, collecting template errors.
#[derive(Debug)]
pub struct Evaluator<'a> {
    store: &'a ConfigStore,
    errors: Vec<TemplateError>,
}

impl<'a> Evaluator<'a> {
    #[must_use]
    pub const fn new(store: &'a ConfigStore) -> Self {
        Self {
            store,
            errors: Vec::new(),
        }
    }

    /// Evaluate a category named by `path`.
    ///
    /// A container yields a pruned [`Outcome::Group`]. A bare leaf yields
    /// `Flag(true)` when any of its tags is present, an empty group otherwise.
    pub fn evaluate(&mut self, path: &str, spec: &CategorySpec) -> Outcome {
        match spec {
            CategorySpec::Container { children } => Outcome::Group(self.children(path, children)),
            CategorySpec::Leaf(leaf) => {
                if leaf
                    .patterns
                    .iter()
                    .any(|pattern| self.store.resolve(pattern).is_some())
                {
                    Outcome::Flag(true)
                } else {
                    Outcome::Group(ResultTree::new())
                }
            }
        }
    }

    /// Resolve a leaf sub-category.
    ///
    /// `Ok(None)` means the sub-category is absent and must be omitted.
    pub fn dispatch(&self, path: &str, leaf: &LeafSpec) -> Result<Option<Outcome>, TemplateError> {
        if leaf.foreach {
            family::resolve(self.store, leaf, path).map(Some)
        } else {
            Ok(single::resolve(self.store, leaf))
        }
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<TemplateError> {
        self.errors
    }

    fn children(&mut self, path: &str, children: &[(String, CategorySpec)]) -> ResultTree {
        let mut group = ResultTree::new();
        for (name, child) in children {
            let child_path = child_path(path, name);
            debug!("Processing sub-category: {}", child_path);
            match child {
                CategorySpec::Container { .. } => {
                    let outcome = self.evaluate(&child_path, child);
                    if outcome.is_truthy() {
                        group.insert(name.as_str(), outcome);
                    }
                }
                CategorySpec::Leaf(leaf) => match self.dispatch(&child_path, leaf) {
                    Ok(Some(outcome)) => group.insert(name.as_str(), outcome),
                    Ok(None) => {}
                    Err(error) => {
                        warn!("Skipping sub-category: {}", error);
                        self.errors.push(error);
                    }
                },
            }
        }
        group.retain_truthy();
        group
    }
}

/// Apply a leaf's entries filter and extraction to one section.
///
/// `None` when the filter rejects the section.
pub(crate) fn match_section(fields: &Fields, leaf: &LeafSpec) -> Option<Outcome> {
    if !leaf.entries.matches(fields) {
        return None;
    }

    let outcome = match leaf.extraction() {
        Some(Entry::Field(field)) => Outcome::Value(fields.get(field).unwrap_or_default().to_string()),
        Some(Entry::Fields(names)) => Outcome::Fields(
            names
                .iter()
                .map(|name| {
                    (
                        name.to_lowercase(),
                        fields.get(name).unwrap_or_default().to_string(),
                    )
                })
                .collect::<BTreeMap<_, _>>(),
        ),
        None => Outcome::Flag(true),
    };
    Some(outcome)
}
