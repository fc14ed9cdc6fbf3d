//! CLI definitions.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quantfolio")]
#[command(author, version, about = "Price-series ingestion for the quantum portfolio showcase")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level, overriding the configuration
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load every symbol from static CSV sources
    Load(LoadArgs),
    /// Load user-supplied CSV files
    Upload(UploadArgs),
    /// Show generated sample data
    Fallback(FallbackArgs),
    /// Load static sources and print return statistics
    Stats(StatsArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(clap::Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the table to a file (CSV with --output csv, JSON otherwise)
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SourceArgs {
    /// Directory holding the static CSV files
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// HTTP origin serving the static CSV files
    #[arg(long, conflicts_with = "dir")]
    pub base_url: Option<String>,

    /// Load symbols concurrently
    #[arg(long)]
    pub parallel: bool,
}

#[derive(clap::Args)]
pub struct LoadArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(clap::Args)]
pub struct UploadArgs {
    /// Uploaded file as SYMBOL=PATH (repeatable)
    #[arg(short, long = "file", value_parser = parse_upload, required = true)]
    pub files: Vec<(String, PathBuf)>,

    /// Load files concurrently
    #[arg(long)]
    pub parallel: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(clap::Args)]
pub struct FallbackArgs {
    /// Seed for reproducible data
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(clap::Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Compute statistics on sample data even when real data loaded
    #[arg(long)]
    pub sample: bool,

    /// Output format (csv prints the covariance matrix)
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the report as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,
}

fn parse_upload(s: &str) -> Result<(String, PathBuf), String> {
    let (symbol, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SYMBOL=PATH, got '{}'", s))?;
    let symbol = symbol.trim();
    if symbol.is_empty() || path.trim().is_empty() {
        return Err(format!("expected SYMBOL=PATH, got '{}'", s));
    }
    Ok((symbol.to_uppercase(), PathBuf::from(path.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload() {
        assert_eq!(
            parse_upload("nvda=data/NVDA.csv").unwrap(),
            ("NVDA".to_string(), PathBuf::from("data/NVDA.csv"))
        );
        assert!(parse_upload("NVDA").is_err());
        assert!(parse_upload("=x.csv").is_err());
    }

    #[test]
    fn test_cli_parses_upload_command() {
        let cli = Cli::try_parse_from([
            "quantfolio",
            "upload",
            "--file",
            "AAPL=a.csv",
            "-f",
            "MSFT=m.csv",
            "--output",
            "csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(args.files.len(), 2);
                assert!(args.output.output == OutputFormat::Csv);
            }
            _ => panic!("expected upload"),
        }
    }

    #[test]
    fn test_dir_conflicts_with_base_url() {
        let result = Cli::try_parse_from([
            "quantfolio",
            "load",
            "--dir",
            "data",
            "--base-url",
            "http://localhost/data",
        ]);
        assert!(result.is_err());
    }
}
