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
    clippy::missing_errors_doc
)]

//! Input loading for cspscan: `ext_config.ini` dumps, JSON feature
//! templates and the user settings file.

pub mod error;
pub mod ini;
pub mod loader;
pub mod schema;

pub use error::{InputError, Result};
pub use ini::{IniOptions, parse_ini};
pub use loader::{load_store, load_template, parse_template};
pub use schema::{OutputConfig, Preset, Settings};
