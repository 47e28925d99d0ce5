use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use cspscan_config::{Settings, load_store, load_template};
use cspscan_core::{ResultTree, process_checked};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, info, warn};

/// Input for the scan strategy.
#[derive(Debug, Clone)]
pub struct ScanInput {
    pub preset: Option<String>,
    pub ini: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub compact: bool,
}

/// Strategy for evaluating a template against an INI file.
///
/// Loading errors abort the command. Template errors found during
/// evaluation only skip the affected sub-category and are reported on
/// stderr next to the report.
#[derive(Debug, Clone, Copy)]
pub struct ScanStrategy;

impl super::CommandStrategy for ScanStrategy {
    type Input = ScanInput;

    fn execute(&self, input: Self::Input) -> anyhow::Result<ExitCode> {
        let settings = Settings::load_or_default()?;
        let (ini_path, template_path) =
            resolve_inputs(&settings, input.preset, input.ini, input.template)?;

        let store = load_store(&ini_path, &settings.ini)?;
        let template = load_template(&template_path)?;

        let evaluation = process_checked(&store, &template);
        for error in &evaluation.errors {
            warn!("{error}");
            eprintln!("⚠️  {error}");
        }
        info!(
            "Matched {} of {} categories",
            evaluation.results.len(),
            template.len()
        );
        debug!("Matched categories: {}", matched_categories(&evaluation.results).join(", "));

        let indent = if input.compact {
            None
        } else {
            Some(settings.output.indent)
        };
        let report = render(&evaluation.results, indent)?;

        if let Some(path) = input.output {
            std::fs::write(&path, format!("{report}\n"))
                .with_context(|| format!("Cannot write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        } else {
            println!("{report}");
        }

        Ok(ExitCode::SUCCESS)
    }
}

fn resolve_inputs(
    settings: &Settings,
    preset: Option<String>,
    ini: Option<PathBuf>,
    template: Option<PathBuf>,
) -> anyhow::Result<(PathBuf, PathBuf)> {
    match (preset, ini, template) {
        (Some(name), None, None) => {
            let preset = settings.preset(&name)?;
            info!("Using preset '{}'", name);
            Ok((preset.ini.clone(), preset.template.clone()))
        }
        (None, Some(ini), Some(template)) => Ok((ini, template)),
        _ => anyhow::bail!("Pass either --preset or both --ini and --template"),
    }
}

fn matched_categories(results: &ResultTree) -> Vec<&str> {
    results.iter().map(|(name, _)| name).collect()
}

/// Render the report as JSON, pretty-printed with `indent` spaces when given.
fn render(results: &ResultTree, indent: Option<usize>) -> anyhow::Result<String> {
    let Some(indent) = indent else {
        return Ok(serde_json::to_string(results)?);
    };

    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    results.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}
