use std::fs::File;
use std::io::Write;

use anyhow::{bail, Context};
use colored::Colorize;
use dcp_deploy::{ContentUploader, ExecutionContext, UnitOfWork};
use dcp_store::{ContentRepository, FsContentRepository};
use dcp_types::{fields, ContentHash, ModelNode};
use serde_json::json;
use tracing::debug;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Upload(args) => cmd_upload(args, &config, &cli.format),
        Command::Cat(args) => cmd_cat(args, &config, &cli.format),
        Command::Has(args) => cmd_has(args, &config, &cli.format),
    }
}

fn cmd_upload(args: UploadArgs, config: &CliConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let root = config.repository(args.repo.clone());
    debug!(repo = %root.display(), "opening content repository");
    let repo = FsContentRepository::open(&root)
        .with_context(|| format!("opening repository {}", root.display()))?;

    let mut context = UnitOfWork::new();
    let operation = build_operation(&args, &mut context)?;
    let uploader = ContentUploader::new(config.fetch.clone());
    let hash = uploader.store_content_and_transform(&operation, &mut context, &repo)?;

    let forwarded = match context.transformers() {
        Some(queue) => queue.apply(&operation),
        None => operation,
    };
    match format {
        OutputFormat::Json => {
            let out = json!({ "hash": hash.to_hex(), "operation": forwarded.to_json() });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{} Stored content {}", "✓".green().bold(), hash.to_hex().yellow());
            println!("  Repository: {}", root.display());
            println!("  Operation: {}", forwarded.to_string().cyan());
        }
    }
    Ok(())
}

/// The operation described by `args`; a `--file` is attached to `context`.
fn build_operation(args: &UploadArgs, context: &mut UnitOfWork) -> anyhow::Result<ModelNode> {
    let descriptor = if let Some(encoded) = &args.source.bytes {
        let data = hex::decode(encoded).context("--bytes must be hex encoded")?;
        ModelNode::object().with(fields::BYTES, data)
    } else if let Some(path) = &args.source.file {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let index = context.attach_stream(file);
        ModelNode::object().with(fields::INPUT_STREAM_INDEX, index as i64)
    } else if let Some(url) = &args.source.url {
        ModelNode::object().with(fields::URL, url.as_str())
    } else {
        bail!("one of --bytes, --file or --url is required");
    };

    let address: Vec<(&str, &str)> = args
        .address
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    Ok(ModelNode::operation(&args.operation, &address).with(fields::CONTENT, vec![descriptor]))
}

fn cmd_cat(args: CatArgs, config: &CliConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let repo = FsContentRepository::open_read_only(config.repository(args.repo));
    let hash = ContentHash::from_hex(&args.hash)?;
    let Some(data) = repo.read_content(&hash)? else {
        bail!("content {} not found", hash.short_hex());
    };
    match (format, args.size) {
        (OutputFormat::Json, true) => {
            println!("{}", json!({ "hash": hash.to_hex(), "size": data.len() }));
        }
        (OutputFormat::Json, false) => {
            let out = json!({ "hash": hash.to_hex(), "size": data.len(), "content": hex::encode(&data) });
            println!("{out}");
        }
        (OutputFormat::Text, true) => println!("{} bytes", data.len()),
        (OutputFormat::Text, false) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn cmd_has(args: HasArgs, config: &CliConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let repo = FsContentRepository::open_read_only(config.repository(args.repo));
    let hash = ContentHash::from_hex(&args.hash)?;
    let present = repo.has_content(&hash)?;
    match format {
        OutputFormat::Json => println!("{}", json!({ "hash": hash.to_hex(), "present": present })),
        OutputFormat::Text if present => println!("{} {}", "✓".green().bold(), hash.to_hex()),
        OutputFormat::Text => println!("{} {} not stored", "✗".red().bold(), hash.to_hex()),
    }
    Ok(())
}
