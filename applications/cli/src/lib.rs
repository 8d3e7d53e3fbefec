/// Encore terminal player
///
/// Configuration, persisted player flags and the interactive prompt used
/// by the `encore` binary.
pub mod commands;
pub mod config;
pub mod error;
pub mod repl;
pub mod settings;

pub use commands::{Command, CommandError};
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use repl::{Flow, Repl};
pub use settings::{JsonSettingsStore, SettingsStore};
