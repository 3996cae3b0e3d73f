//! argmap-replay: run an interaction script against an argument map and
//! print what the user would see, as JSON.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use argmap::{parse_lines, replay};
use argmap_graph::{GraphSnapshot, GraphStore, MapConfig, MapController};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "argmap-replay", version = env!("CARGO_PKG_VERSION"), about = "Replay argument-map interactions headlessly")]
struct Cli {
    /// Map config (TOML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed the map from a JSON snapshot instead of the config's seed
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    /// Start from the built-in two-claim example map
    #[arg(long, global = true, default_value_t = false)]
    example: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a JSON-lines script and print the final report
    Replay {
        /// Script path; `-` or omitted reads stdin
        script: Option<PathBuf>,

        /// Stop before running anything if a line fails to parse
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Print the initial scene without running anything
    Render,
    /// Print the effective config as TOML
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = match &cli.config {
        Some(path) => MapConfig::try_load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MapConfig::default(),
    };
    if cli.example {
        config.seed.example_graph = true;
    }

    match cli.command {
        Commands::Config => {
            print!("{}", config.to_toml());
        }
        Commands::Render => {
            let map = build_map(config, cli.seed.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&map.render())?);
        }
        Commands::Replay { script, strict } => {
            let content = read_script(script.as_deref())?;
            let parsed = parse_lines(&content);
            for err in &parsed.errors {
                warn!(line = err.line, "unparseable step: {}", err.message);
            }
            if strict && !parsed.errors.is_empty() {
                bail!("{} script line(s) failed to parse", parsed.errors.len());
            }

            let mut map = build_map(config, cli.seed.as_deref())?;
            let report = replay(&mut map, &parsed.steps);
            info!(
                applied = report.applied,
                rejected = report.rejected.len(),
                "replay finished"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "argmap=info,argmap_graph=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_map(config: MapConfig, seed: Option<&Path>) -> anyhow::Result<MapController> {
    let Some(path) = seed else {
        return Ok(MapController::new(config)?);
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed {}", path.display()))?;
    let snapshot: GraphSnapshot =
        serde_json::from_str(&raw).with_context(|| format!("parsing seed {}", path.display()))?;
    let store = GraphStore::from_snapshot(snapshot)?;
    Ok(MapController::with_store(config, store))
}

fn read_script(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("reading script {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
