use std::process::ExitCode;

use cspscan_config::Settings;
use tracing::info;

/// Strategy for displaying configuration information.
///
/// This strategy outputs:
/// - Config file location and whether it exists
/// - Presets with their INI and template paths (and whether those exist)
/// - INI reader options
/// - Output options
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    fn execute(&self, _input: Self::Input) -> anyhow::Result<ExitCode> {
        let config_path = Settings::config_path()?;
        let settings = Settings::load_or_default()?;
        info!("Effective settings resolved");

        println!("=== cspscan Configuration ===\n");

        println!("Config File:");
        println!("  Path: {}", config_path.display());
        if config_path.exists() {
            println!("  Status: Loaded");
        } else {
            println!("  Status: Not found (using defaults, run 'cspscan init')");
        }
        println!();

        println!("Presets:");
        if settings.presets.is_empty() {
            println!("  (none)");
        }
        for (name, preset) in &settings.presets {
            println!("  {name}:");
            println!("    INI: {}", describe_path(&preset.ini));
            println!("    Template: {}", describe_path(&preset.template));
        }
        println!();

        println!("INI Reader:");
        println!(
            "  Strip Inline Comments: {}",
            settings.ini.strip_inline_comments
        );
        println!();

        println!("Output:");
        println!("  Indent: {}", settings.output.indent);

        Ok(ExitCode::SUCCESS)
    }
}

fn describe_path(path: &std::path::Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (missing)", path.display())
    }
}
