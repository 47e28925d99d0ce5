use std::process::ExitCode;

use cspscan_config::Settings;

/// Strategy for initializing the configuration.
///
/// This strategy creates the default configuration file at `~/cspscan/config.json`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    fn execute(&self, _input: Self::Input) -> anyhow::Result<ExitCode> {
        Settings::create_config()?;
        Ok(ExitCode::SUCCESS)
    }
}
