pub mod check;
mod config;
pub mod error;
pub mod rules;
pub mod sources;

pub use check::{CheckOptions, Checker, FileReport};
pub use config::{Config, Settings};
pub use sources::DataSource;

/// Exit status and message of a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdExit {
    pub code: exitcode::ExitCode,
    pub message: Option<String>,
}
