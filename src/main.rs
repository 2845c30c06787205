//! docscout - Main Entry Point
//!
//! CLI wrapper around the extraction pipeline: discovers source files,
//! extracts scoped records, and prints them as a listing or as JSON.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docscout::{ExtractConfig, ExtractError, Pipeline, ScopedNode};

#[derive(Parser, Debug)]
#[command(name = "docscout", version, about = "Extract documented entities from Python source trees")]
struct Cli {
    /// Root directory to scan.
    root: PathBuf,

    /// Include glob pattern, matched against root-relative paths
    /// [default: **/*.py].
    #[arg(long)]
    include: Option<String>,

    /// Exclusion glob pattern (repeatable). Defaults cover caches,
    /// virtualenvs, and build output.
    #[arg(long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Emit records as JSON instead of a listing.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FileRecords<'a> {
    file: &'a Path,
    records: &'a [ScopedNode],
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "docscout=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ExtractConfig::from_env(cli.root);
    if let Some(include) = cli.include {
        config.include = include;
    }
    if !cli.exclude.is_empty() {
        config.exclude = cli.exclude;
    }

    info!("docscout v{}", env!("CARGO_PKG_VERSION"));

    let pipeline = Pipeline::from_config(&config)?;
    let files = pipeline.run_files(&config.root)?;

    // One bad file should not kill the run; parse failures are
    // reported and skipped at this layer.
    let mut extracted: Vec<(PathBuf, Vec<ScopedNode>)> = Vec::new();
    for file in files {
        match pipeline.extract_file(&file) {
            Ok(records) => extracted.push((file, records)),
            Err(err @ ExtractError::Parse { .. }) => {
                warn!("skipping unparseable file: {}", err);
            }
            Err(err) => return Err(err.into()),
        }
    }

    if cli.json {
        let out: Vec<FileRecords> = extracted
            .iter()
            .map(|(file, records)| FileRecords { file, records })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (_, records) in &extracted {
            for tree in records {
                for node in tree.flatten() {
                    println!("{:<15} {}", node.kind.to_string(), node.dotted_path());
                    if let Some(doc) = &node.docstring {
                        if let Some(summary) = doc.lines().next() {
                            println!("{:<15} {}", "", summary);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
