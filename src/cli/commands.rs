//! Command implementations.

use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};

use serde::Serialize;

use super::args::OutputFormat;
use super::types::{
    CliError,
    Outcome,
};
use crate::catalog::{
    Catalog,
    CatalogStats,
    Translator,
    load_catalog,
    parse_catalog,
    write_catalog,
};
use crate::config::ConfigManager;
use crate::export::{
    ExportOptions,
    export_json,
};
use crate::indexer::{
    LoadFailure,
    WorkspaceIndex,
    WorkspaceIndexer,
};
use crate::lint::{
    Diagnostic,
    Severity,
    lint_catalog,
};

/// Loads the named catalogs, or discovers them in the workspace when none are named.
async fn load_catalogs(
    paths: Vec<PathBuf>,
    workspace: &Path,
    config_manager: &ConfigManager,
) -> Result<WorkspaceIndex, CliError> {
    let indexer = WorkspaceIndexer::new(config_manager.get_settings().indexing.effective_threads());
    let index = if paths.is_empty() {
        indexer.index_workspace(workspace, config_manager).await?
    } else {
        indexer.load_paths(paths).await?
    };
    Ok(index)
}

/// Loads a single catalog named on the command line.
fn load_file(path: &Path) -> Result<Catalog, CliError> {
    load_catalog(path).map_err(|source| CliError::Catalog { path: path.to_path_buf(), source })
}

/// Writes one line per failed file.
fn report_failures(out: &mut dyn Write, failures: &[LoadFailure]) -> Result<(), CliError> {
    for failure in failures {
        writeln!(out, "{}: error: {}", failure.path.display(), failure.error)?;
    }
    Ok(())
}

/// Lint findings of one file, for JSON output.
#[derive(Serialize)]
struct FileDiagnostics<'a> {
    /// Catalog path
    path: &'a Path,
    /// Findings in document order
    diagnostics: Vec<Diagnostic>,
}

/// A file that could not be loaded, for JSON output.
#[derive(Serialize)]
struct FailureReport<'a> {
    /// Catalog path
    path: &'a Path,
    /// Rendered load error
    error: String,
}

impl<'a> From<&'a LoadFailure> for FailureReport<'a> {
    fn from(failure: &'a LoadFailure) -> Self {
        Self { path: &failure.path, error: failure.error.to_string() }
    }
}

/// Full `check --format json` document.
#[derive(Serialize)]
struct CheckReport<'a> {
    /// Per-file findings
    files: Vec<FileDiagnostics<'a>>,
    /// Files that failed to load
    failures: Vec<FailureReport<'a>>,
}

/// `check`: lints catalogs and fails on errors or load failures.
pub(super) async fn check(
    out: &mut dyn Write,
    config_manager: &ConfigManager,
    workspace: &Path,
    paths: Vec<PathBuf>,
    format: OutputFormat,
    deny_warnings: bool,
) -> Result<Outcome, CliError> {
    let index = load_catalogs(paths, workspace, config_manager).await?;
    let lint_config = &config_manager.get_settings().lint;

    let files: Vec<FileDiagnostics<'_>> = index
        .catalogs
        .iter()
        .map(|loaded| FileDiagnostics {
            path: &loaded.path,
            diagnostics: lint_catalog(&loaded.catalog, lint_config),
        })
        .collect();

    let count = |severity: Severity| {
        files
            .iter()
            .flat_map(|file| &file.diagnostics)
            .filter(|diagnostic| diagnostic.severity == severity)
            .count()
    };
    let errors = count(Severity::Error);
    let warnings = count(Severity::Warning);
    let outcome = Outcome::failure_if(
        errors > 0 || (deny_warnings && warnings > 0) || !index.failures.is_empty(),
    );

    match format {
        OutputFormat::Text => {
            report_failures(out, &index.failures)?;
            for file in &files {
                for diagnostic in &file.diagnostics {
                    writeln!(
                        out,
                        "{}:{}: {}[{}] {}: {}",
                        file.path.display(),
                        diagnostic.range.start,
                        diagnostic.severity,
                        diagnostic.rule,
                        diagnostic.context,
                        diagnostic.message
                    )?;
                }
            }
            writeln!(
                out,
                "{} file(s) checked: {errors} error(s), {warnings} warning(s), {} failed to load",
                files.len(),
                index.failures.len()
            )?;
        }
        OutputFormat::Json => {
            let report = CheckReport {
                failures: index.failures.iter().map(FailureReport::from).collect(),
                files,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
    }

    Ok(outcome)
}

/// The message a `lookup` asks for.
#[derive(Debug, Clone, Copy)]
pub(super) struct MessageQuery<'a> {
    /// Context name
    pub context: &'a str,
    /// Source text
    pub source: &'a str,
    /// Disambiguating comment
    pub comment: Option<&'a str>,
}

/// `lookup`: prints the translation of one message, falling back to the source.
///
/// The lookup mode comes from the settings, where `--permissive` has already been applied.
pub(super) fn lookup(
    out: &mut dyn Write,
    config_manager: &ConfigManager,
    file: &Path,
    message: &MessageQuery<'_>,
    show_status: bool,
) -> Result<Outcome, CliError> {
    let catalog = load_file(file)?;
    let translator = Translator::from_catalog(&catalog, config_manager.get_settings().lookup_mode);
    let MessageQuery { context, source, comment } = *message;

    writeln!(out, "{}", translator.translate(context, source, comment))?;
    if show_status {
        match translator.find(context, source, comment) {
            Some(entry) => writeln!(out, "status: {}", entry.status)?,
            None => writeln!(out, "status: missing")?,
        }
    }

    Ok(Outcome::Success)
}

/// Statistics of one file, for JSON output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport<'a> {
    /// Catalog path
    path: &'a Path,
    /// Detected target language
    language: Option<&'a str>,
    /// Message counts
    #[serde(flatten)]
    stats: CatalogStats,
    /// Share of active messages that are complete
    completion_percent: usize,
}

/// `stats`: prints translation progress per file.
pub(super) async fn stats(
    out: &mut dyn Write,
    config_manager: &ConfigManager,
    workspace: &Path,
    paths: Vec<PathBuf>,
    format: OutputFormat,
) -> Result<Outcome, CliError> {
    let index = load_catalogs(paths, workspace, config_manager).await?;

    let reports: Vec<StatsReport<'_>> = index
        .catalogs
        .iter()
        .map(|loaded| {
            let stats = CatalogStats::collect(&loaded.catalog);
            StatsReport {
                path: &loaded.path,
                language: loaded.language.as_deref(),
                completion_percent: stats.completion_percent(),
                stats,
            }
        })
        .collect();

    match format {
        OutputFormat::Text => {
            report_failures(out, &index.failures)?;
            for report in &reports {
                writeln!(
                    out,
                    "{} [{}]: {}% complete ({}/{} active), {} unfinished, {} blank, {} obsolete",
                    report.path.display(),
                    report.language.unwrap_or("?"),
                    report.completion_percent,
                    report.stats.complete,
                    report.stats.active(),
                    report.stats.unfinished,
                    report.stats.blank,
                    report.stats.obsolete
                )?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
        }
    }

    Ok(Outcome::failure_if(!index.failures.is_empty()))
}

/// `export`: writes the catalog as JSON to `output` or `out`.
pub(super) async fn export(
    out: &mut dyn Write,
    file: &Path,
    options: ExportOptions,
    full: bool,
    output: Option<&Path>,
) -> Result<Outcome, CliError> {
    let catalog = load_file(file)?;
    let value = if full { serde_json::to_value(&catalog)? } else { export_json(&catalog, &options) };
    let rendered = serde_json::to_string_pretty(&value)?;

    match output {
        Some(path) => {
            tokio::fs::write(path, format!("{rendered}\n")).await?;
            tracing::debug!(path = %path.display(), "Export written");
        }
        None => writeln!(out, "{rendered}")?,
    }

    Ok(Outcome::Success)
}

/// `fmt`: rewrites catalogs whose layout differs from the canonical one.
///
/// A file is only rewritten when the new text parses back to an equivalent catalog.
pub(super) async fn fmt(
    out: &mut dyn Write,
    config_manager: &ConfigManager,
    workspace: &Path,
    paths: Vec<PathBuf>,
    check_only: bool,
) -> Result<Outcome, CliError> {
    let index = load_catalogs(paths, workspace, config_manager).await?;
    report_failures(out, &index.failures)?;
    let mut failed = !index.failures.is_empty();

    for loaded in &index.catalogs {
        let original = tokio::fs::read_to_string(&loaded.path).await?;
        let formatted = write_catalog(&loaded.catalog);
        if original == formatted {
            continue;
        }

        let equivalent = parse_catalog(&formatted)
            .is_ok_and(|reparsed| reparsed.is_equivalent(&loaded.catalog));
        if !equivalent {
            tracing::warn!(path = %loaded.path.display(), "Formatted output is not equivalent");
            writeln!(
                out,
                "{}: error: cannot be formatted without changing its messages",
                loaded.path.display()
            )?;
            failed = true;
            continue;
        }

        if check_only {
            writeln!(out, "{}: would reformat", loaded.path.display())?;
            failed = true;
        } else {
            tokio::fs::write(&loaded.path, formatted).await?;
            writeln!(out, "{}: formatted", loaded.path.display())?;
        }
    }

    Ok(Outcome::failure_if(failed))
}
