//! Command line arguments.

use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
    ValueEnum,
};

#[derive(Parser, Debug)]
#[command(name = "ts-catalog")]
#[command(version)]
#[command(about = "Load, check and query Qt Linguist .ts translation catalogs")]
pub struct Cli {
    /// Workspace root, used for `.ts-catalog.json` and catalog discovery
    #[arg(long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    /// Log debug messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to the given file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Catalogs loaded in parallel (overrides `indexing.numThreads`)
    #[arg(long, global = true, value_name = "N")]
    pub threads: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lint catalogs and report problems
    Check {
        /// Catalog files (default: discover in the workspace)
        #[arg(value_name = "PATHS")]
        paths: Vec<PathBuf>,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,

        /// Fail on warnings as well as errors
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Translate a single message
    Lookup {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Context name, e.g. the UI class
        #[arg(long)]
        context: String,

        /// Source text
        #[arg(long)]
        source: String,

        /// Disambiguating comment
        #[arg(long)]
        comment: Option<String>,

        /// Keep obsolete messages in the lookup map
        #[arg(long)]
        permissive: bool,

        /// Also print the status of the matched message
        #[arg(long)]
        status: bool,
    },

    /// Show translation progress per catalog
    Stats {
        #[arg(value_name = "PATHS")]
        paths: Vec<PathBuf>,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Export a catalog as JSON
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Include obsolete and vanished messages
        #[arg(long)]
        include_obsolete: bool,

        /// Include messages without translated text
        #[arg(long)]
        include_blank: bool,

        /// Dump the whole document model instead of the translation map
        #[arg(long)]
        full: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rewrite catalogs in the canonical lupdate layout
    Fmt {
        #[arg(value_name = "PATHS")]
        paths: Vec<PathBuf>,

        /// Only report files that would change
        #[arg(long)]
        check: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
