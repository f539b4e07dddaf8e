//! CLI command definitions for layout-presets
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod import;

use clap::{Parser, Subcommand, ValueEnum};
use import::ImportArgs;
use std::path::PathBuf;

use crate::format::OutputFormat;

/// Output format for `show` and `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    /// Stored JSON form
    #[default]
    Json,
    /// Markdown summary of every property
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

/// Manage stored plot layout presets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to layout store file (overrides config)
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stored layout names
    List,

    /// Print a stored layout (the default layout if NAME is omitted or unknown)
    Show {
        /// Layout name (case-insensitive)
        name: Option<String>,

        #[arg(short, long, value_enum, default_value_t)]
        format: FormatArg,
    },

    /// Print the built-in default layout
    Default {
        #[arg(short, long, value_enum, default_value_t)]
        format: FormatArg,
    },

    /// Print the store file in effect and the candidate locations
    Path,

    /// Import layouts from a JSON file
    Import(ImportArgs),

    /// Apply a layout to an in-memory figure and print the writes it causes
    Preview {
        /// Layout name (case-insensitive); the default layout if omitted
        name: Option<String>,

        /// Number of axes in the preview figure
        #[arg(long, default_value_t = 1)]
        axes: usize,

        /// Number of lines per axes in the preview figure
        #[arg(long, default_value_t = 1)]
        lines: usize,
    },
}
