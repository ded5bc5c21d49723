//! The `ts-catalog` command line interface.
/// Argument definitions
mod args;
/// Command implementations
mod commands;
/// Error and outcome types
mod types;

use std::io::Write;

pub use args::{
    Cli,
    Command,
    OutputFormat,
};
pub use types::{
    CliError,
    Outcome,
};

use crate::catalog::LookupMode;
use crate::config::{
    ConfigManager,
    SettingsOverrides,
};
use crate::export::ExportOptions;

/// Settings given on the command line.
fn overrides(cli: &Cli) -> SettingsOverrides {
    let permissive = matches!(cli.command, Command::Lookup { permissive: true, .. });
    SettingsOverrides {
        lookup_mode: permissive.then_some(LookupMode::Permissive),
        num_threads: cli.threads,
    }
}

/// Runs a parsed command line, writing results to `out`.
///
/// Logging is left to the caller. `Err` means the command could not run at all,
/// problems found in catalogs are reported through [`Outcome::Failure`].
pub async fn run(cli: Cli, out: &mut dyn Write) -> Result<Outcome, CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(&cli.workspace)?;
    config_manager.apply_overrides(overrides(&cli))?;
    let workspace = cli.workspace.as_path();

    match cli.command {
        Command::Check { paths, format, deny_warnings } => {
            commands::check(out, &config_manager, workspace, paths, format, deny_warnings).await
        }
        Command::Lookup { file, context, source, comment, status, .. } => {
            let message = commands::MessageQuery {
                context: &context,
                source: &source,
                comment: comment.as_deref(),
            };
            commands::lookup(out, &config_manager, &file, &message, status)
        }
        Command::Stats { paths, format } => {
            commands::stats(out, &config_manager, workspace, paths, format).await
        }
        Command::Export { file, include_obsolete, include_blank, full, output } => {
            let options = ExportOptions { include_obsolete, include_blank };
            commands::export(out, &file, options, full, output.as_deref()).await
        }
        Command::Fmt { paths, check } => {
            commands::fmt(out, &config_manager, workspace, paths, check).await
        }
    }
}
