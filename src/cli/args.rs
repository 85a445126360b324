//! Command line argument parsing for the Searchlight CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Searchlight - query builder and driver toolkit for full-text search
#[derive(Parser, Debug, Clone)]
#[command(name = "searchlight")]
#[command(about = "Search JSON documents and validate search configurations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SearchlightArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SearchlightArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load documents into the in-memory driver and search them
    Search(SearchArgs),

    /// Load a driver configuration file and report its drivers
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Document file (JSON array or JSONL)
    #[arg(value_name = "DOCUMENT_FILE")]
    pub document_file: PathBuf,

    /// Query string; every document matches when omitted
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Category the documents are indexed under
    #[arg(short = 't', long = "type", default_value = "documents")]
    pub category: String,

    /// Attribute holding the document id (default: position in the file)
    #[arg(long)]
    pub id_field: Option<String>,

    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Results per page
    #[arg(long, default_value = "10")]
    pub per_page: usize,

    /// Disable stemming during analysis
    #[arg(long)]
    pub no_stemming: bool,
}

/// Arguments for configuration validation
#[derive(Parser, Debug, Clone)]
pub struct ValidateConfigArgs {
    /// Configuration file (JSON)
    #[arg(value_name = "CONFIG_FILE")]
    pub config_file: PathBuf,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity() {
        let args = SearchlightArgs::try_parse_from(["searchlight", "search", "docs.json"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args =
            SearchlightArgs::try_parse_from(["searchlight", "-vv", "search", "docs.json"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args =
            SearchlightArgs::try_parse_from(["searchlight", "--quiet", "search", "docs.json"])
                .unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_search_args() {
        let args = SearchlightArgs::try_parse_from([
            "searchlight",
            "--format",
            "json",
            "search",
            "docs.jsonl",
            "+title:rust",
            "--type",
            "books",
            "--page",
            "2",
            "--per-page",
            "5",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        match args.command {
            Command::Search(search) => {
                assert_eq!(search.query.as_deref(), Some("+title:rust"));
                assert_eq!(search.category, "books");
                assert_eq!(search.page, 2);
                assert_eq!(search.per_page, 5);
                assert!(!search.no_stemming);
            }
            other => panic!("Expected Search command, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_config_args() {
        let args =
            SearchlightArgs::try_parse_from(["searchlight", "validate-config", "search.json"])
                .unwrap();
        assert!(matches!(args.command, Command::ValidateConfig(_)));
    }
}
