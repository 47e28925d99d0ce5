use std::path::PathBuf;
use std::process::ExitCode;

use cspscan_config::{Settings, load_store};
use cspscan_core::{EntriesFilter, TagPattern, check_entries};
use tracing::info;

/// Input for the check strategy.
#[derive(Debug, Clone)]
pub struct CheckInput {
    pub ini: PathBuf,
    pub tags: Vec<String>,
    pub entries: Vec<(String, String)>,
}

/// Strategy for a one-off tag lookup without a template.
///
/// Prints `true` or `false`; the exit code is 1 when nothing matched so the
/// command composes in shell scripts.
#[derive(Debug, Clone, Copy)]
pub struct CheckStrategy;

impl super::CommandStrategy for CheckStrategy {
    type Input = CheckInput;

    fn execute(&self, input: Self::Input) -> anyhow::Result<ExitCode> {
        let settings = Settings::load_or_default()?;
        let store = load_store(&input.ini, &settings.ini)?;

        let patterns: Vec<TagPattern> = input
            .tags
            .iter()
            .map(|tag| TagPattern::parse(tag))
            .collect();
        let filter: EntriesFilter = input.entries.into_iter().collect();
        info!(
            "Checking {} tag(s) with {} entry condition(s)",
            patterns.len(),
            filter.len()
        );

        let found = check_entries(&store, &patterns, &filter);
        println!("{found}");

        Ok(if found {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}
