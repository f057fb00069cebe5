//! Command-line interface
//!
//! One-shot execution: load a snapshot file, run a pipeline file against a
//! collection, print the result rows as JSON on stdout. Diagnostics are
//! logged to stderr by the engine.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde_json::Value;
use thiserror::Error;

use crate::engine::{AggregationEngine, EngineError};
use crate::observability::Logger;
use crate::snapshot::JsonSnapshot;

/// statpipe - run an aggregation pipeline over a record snapshot
#[derive(Parser, Debug)]
#[command(name = "statpipe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the snapshot file ({"collection": [records…]})
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Path to the pipeline file (JSON array of stages)
    #[arg(long)]
    pub pipeline: PathBuf,

    /// Collection to aggregate
    #[arg(long, default_value = "records")]
    pub collection: String,
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors; all fatal.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read pipeline file: {0}")]
    PipelineFile(#[from] std::io::Error),

    #[error("pipeline file is not valid JSON: {0}")]
    PipelineJson(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Parses arguments, runs the pipeline, prints rows to stdout.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse();
    run_with(&cli)
}

fn run_with(cli: &Cli) -> CliResult<()> {
    let raw = fs::read_to_string(&cli.pipeline)?;
    let pipeline: Value = serde_json::from_str(&raw)?;

    let engine = AggregationEngine::new(JsonSnapshot::new(&cli.snapshot));
    let result = engine.aggregate_json(&cli.collection, &pipeline)?;

    Logger::info(
        "aggregate_complete",
        &[
            ("collection", &cli.collection),
            ("rows", &result.len().to_string()),
            ("scanned", &result.scanned_count.to_string()),
        ],
    );

    let rows: Vec<Value> = result.rows.into_iter().map(|r| r.into_value()).collect();
    println!("{}", Value::Array(rows));
    Ok(())
}
