//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type, dispatched
//! statically from `main`.

use std::process::ExitCode;

mod check;
mod info;
mod init;
mod scan;
mod version;

pub use check::{CheckInput, CheckStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use scan::{ScanInput, ScanStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// # Example
/// ```rust,ignore
/// struct MyStrategy;
///
/// impl CommandStrategy for MyStrategy {
///     type Input = MyInput;
///
///     fn execute(&self, input: Self::Input) -> anyhow::Result<ExitCode> {
///         // Command logic here
///         Ok(ExitCode::SUCCESS)
///     }
/// }
/// ```
pub trait CommandStrategy {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    fn execute(&self, input: Self::Input) -> anyhow::Result<ExitCode>;
}
