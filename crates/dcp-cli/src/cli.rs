use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dcp",
    about = "Deployment content ingestion: store content, rewrite operations to hashes",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store deployment content and print the rewritten operation
    Upload(UploadArgs),
    /// Print stored content
    Cat(CatArgs),
    /// Check whether content is stored
    Has(HasArgs),
}

#[derive(Args)]
pub struct UploadArgs {
    /// Content repository directory
    #[arg(long)]
    pub repo: Option<PathBuf>,
    #[command(flatten)]
    pub source: SourceArgs,
    /// Operation name
    #[arg(long, default_value = "add")]
    pub operation: String,
    /// Address element, repeatable
    #[arg(long = "address", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub address: Vec<(String, String)>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Inline content as hex
    #[arg(long)]
    pub bytes: Option<String>,
    /// Local file, attached as input stream 0
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Remote content location
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Args)]
pub struct CatArgs {
    #[arg(long)]
    pub repo: Option<PathBuf>,
    pub hash: String,
    /// Only print the content size
    #[arg(long)]
    pub size: bool,
}

#[derive(Args)]
pub struct HasArgs {
    #[arg(long)]
    pub repo: Option<PathBuf>,
    pub hash: String,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}
