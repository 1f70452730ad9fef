//! pipeprune - Pipeline Deletion Driver
//!
//! Loads a scene file, deletes the named nodes (or the scene's selection, or
//! everything), and prints what happened as JSON.

use anyhow::{bail, Context, Result};
use clap::Parser;
use pipeprune_rs::config::{EngineConfig, LoggingSettings};
use pipeprune_rs::deletion::{CandidateSet, DeletionReport, ResetReport};
use pipeprune_rs::undo::UndoStack;
use pipeprune_rs::SceneFile;
use serde::Serialize;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ==================== CLI arguments ====================

#[derive(Parser)]
#[command(name = "pipeprune")]
#[command(version, about = "Delete nodes from a pipeline scene", long_about = None)]
struct Args {
    /// Scene file (JSON)
    scene: PathBuf,

    /// Config file (TOML); the platform config directory is used otherwise
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Remove every node and clear undo history
    #[arg(long, conflicts_with_all = ["selected", "nodes"])]
    reset: bool,

    /// Delete the scene's selection instead of named nodes
    #[arg(long, conflicts_with = "nodes")]
    selected: bool,

    /// Names of nodes to delete, in order
    nodes: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Deleted(DeletionReport),
    Reset(ResetReport),
}

#[derive(Serialize)]
struct Output {
    outcome: Outcome,
    remaining: Vec<String>,
    undo_depth: usize,
}

// ==================== Logging ====================

fn init_logging(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(file) = &settings.file else {
        tracing_subscriber::registry().with(filter).with(stderr_layer).init();
        return Ok(None);
    };

    let dir = file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(std::path::Path::new("."));
    let name = file.file_name().context("Log file path has no file name")?;
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create log directory {:?}", dir))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
    let file_layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(Some(guard))
}

// ==================== Main ====================

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, load_error) = match &args.config {
        Some(path) => (EngineConfig::load_from(path)?, None),
        None => EngineConfig::load_or_fallback(),
    };
    let _guard = init_logging(&config.logging)?;
    if let Some(e) = load_error {
        tracing::warn!("Failed to load config, using defaults: {}", e);
    }

    let scene = SceneFile::load(&args.scene)?;
    let mut ws = scene.build(config)?;
    tracing::info!("Loaded scene {:?} with {} node(s)", args.scene, ws.graph.len());

    let outcome = if args.reset {
        Outcome::Reset(ws.run_full_reset())
    } else if args.selected {
        Outcome::Deleted(ws.delete_selected()?)
    } else {
        let mut candidates = CandidateSet::new();
        for name in &args.nodes {
            let Some(id) = ws.graph.find_by_name(name) else {
                bail!("Unknown node '{}'", name);
            };
            candidates.push(id);
        }
        Outcome::Deleted(ws.run_deletion(&candidates)?)
    };

    let output = Output {
        outcome,
        remaining: ws.graph.iter().map(|node| node.name().to_string()).collect(),
        undo_depth: ws.undo.depth(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
