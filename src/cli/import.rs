//! Import subcommand for the layout-presets CLI
//!
//! Reads layouts from a JSON file (a single layout object or an array) and
//! inserts or replaces them by name in the store.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the import subcommand
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to the layout file to import
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Report what would be imported without modifying the store
    #[arg(long)]
    pub dry_run: bool,

    /// Only import the layouts with these names (comma-separated)
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub only: Option<Vec<String>>,
}

impl ImportArgs {
    /// Whether a layout named `name` passes the `--only` filter.
    pub fn selects(&self, name: &str) -> bool {
        match self.only {
            Some(ref names) => names.iter().any(|n| n.eq_ignore_ascii_case(name.trim())),
            None => true,
        }
    }
}
