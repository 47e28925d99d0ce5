#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

//! Template-driven feature detection over `ext_config.ini` dumps.
//!
//! The engine walks a [`TemplateTree`] against a [`ConfigStore`] and folds
//! every category it can prove present into a [`ResultTree`]. Evaluation is
//! a pure function of its two inputs; diagnostics go through `tracing` and
//! are silent unless the caller installs a subscriber.

pub mod entries;
pub mod error;
pub mod evaluator;
pub mod pattern;
pub mod result;
pub mod store;
pub mod template;

pub use entries::{EntriesFilter, Expectation, check_entries};
pub use error::TemplateError;
pub use evaluator::{Evaluation, Evaluator, process, process_checked};
pub use pattern::TagPattern;
pub use result::{Outcome, ResultTree};
pub use store::{ConfigStore, Fields, Section};
pub use template::{CategorySpec, Entry, LeafSpec, TemplateTree};
