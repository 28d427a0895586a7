// ==============================================================================
// main.rs - Sanger Trace Processor Entry Point
// ==============================================================================
// Description: Normalizes one tracy decompose JSON record from the command line
// Author: Matt Barham
// Created: 2026-01-19
// Modified: 2026-02-02
// Version: 1.0.0
// ==============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sanger_processor::models::{AnnotationConfig, RawAlignment};
use sanger_processor::normalizer;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raw alignment JSON produced by the external alignment tool
    #[arg(short, long)]
    input: PathBuf,

    /// Output path for the normalized record (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reference accession the alignment positions refer to
    #[arg(short, long)]
    source_accession: Option<String>,

    /// Preferred transcript accession for canonical HGVS selection
    #[arg(short, long)]
    transcript: Option<String>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sanger_processor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Sanger Trace Processor starting...");

    let args = Args::parse();

    let raw_json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file {:?}", args.input))?;

    let raw: RawAlignment = serde_json::from_str(&raw_json)
        .context("Failed to parse alignment tool JSON")?;

    info!(
        "Normalizing alignment ({} orientation, window start {} 0-based)",
        raw.orientation().as_str(),
        raw.reference_start()
    );

    let normalized = normalizer::normalize(raw);

    // Coordinate resolution needs a live mapping capability; the CLI runs
    // without one, so variant rows keep an empty hgvs column
    if args.source_accession.is_some() {
        let config = AnnotationConfig {
            transcript: args.transcript.clone(),
            ..Default::default()
        };
        warn!(
            "No mapping capability configured, skipping coordinate resolution \
             (preferred transcript: {})",
            config.transcript.as_deref().unwrap_or("none")
        );
    }

    let serialized = serde_json::to_string_pretty(&normalized)
        .context("Failed to serialize normalized record")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, serialized)
                .with_context(|| format!("Failed to write output file {:?}", path))?;
            info!("Normalized record written to {:?}", path);
        }
        None => println!("{}", serialized),
    }

    Ok(())
}
