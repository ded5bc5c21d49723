//! Entry point for the `ts-catalog` command line tool.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use ts_catalog::cli::{
    Cli,
    run,
};

/// Installs the tracing subscriber. The returned guard flushes the log file on drop.
fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let Some(log_file) = &cli.log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        return None;
    };

    let directory =
        log_file.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = log_file.file_name().unwrap_or(log_file.as_os_str());
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
    Some(guard)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_logging(&cli);

    let mut stdout = std::io::stdout().lock();
    match run(cli, &mut stdout).await {
        Ok(outcome) => outcome.exit_code(),
        Err(error) => {
            tracing::error!("{error}");
            tracing::debug!(?error, "Command failed");
            ExitCode::from(2)
        }
    }
}
