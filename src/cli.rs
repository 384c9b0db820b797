use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Import and browse a podcast directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bulk import podcasts from a CSV file into a catalog
    Import(ImportArgs),
    /// Show which podcast field each CSV header maps to
    Headers(HeadersArgs),
    /// List podcasts in a catalog with optional search and filters
    List(ListArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV file to import (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Catalog JSON file (created when missing)
    #[arg(short = 's', long = "store")]
    pub store: PathBuf,
    /// Update podcasts that already exist instead of skipping them
    #[arg(long, conflicts_with = "no_overwrite")]
    pub overwrite: bool,
    /// Skip podcasts that already exist, even if the config enables overwrite
    #[arg(long = "no-overwrite")]
    pub no_overwrite: bool,
    /// YAML file with defaults and extra header aliases
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Maximum number of error messages kept in the report
    #[arg(long = "max-errors")]
    pub max_errors: Option<usize>,
    /// Validate and report without writing the catalog
    #[arg(long = "dry-run")]
    pub dry_run: bool,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct HeadersArgs {
    /// CSV file whose header row should be inspected (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// YAML file with extra header aliases
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Catalog JSON file
    #[arg(short = 's', long = "store")]
    pub store: PathBuf,
    /// Case-insensitive text matched against title, host and description
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub language: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Maximum number of podcasts to print
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() || !first.is_ascii() {
                return Err(format!("Unsupported delimiter '{other}'"));
            }
            Ok(first as u8)
        }
    }
}
