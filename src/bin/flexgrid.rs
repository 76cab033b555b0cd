use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use flexgrid::actor::reactor::{self, Record};
use flexgrid::common::config::{Config, config_file, placement_file};
use flexgrid::common::log;
use flexgrid::model::PlacementMemory;
use tracing::info;

#[derive(Parser)]
struct Cli {
    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Check whether the configuration file can be loaded and exit.
    #[arg(long)]
    validate: bool,

    /// Placement memory to load and update (overrides default).
    #[arg(long, value_name = "PATH")]
    memory: Option<PathBuf>,

    /// Record the session to the specified file path. Overwrites the file if
    /// it exists.
    #[arg(long)]
    record: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded session against a headless host and print the
    /// resulting window frames.
    Replay { file: PathBuf },
    /// Print the configured key bindings as JSON, for the host to register.
    Bindings,
}

fn main() {
    sigpipe::reset();
    let opt = Cli::parse();
    log::init_logging();

    let config_path = opt.config.clone().unwrap_or_else(config_file);
    if opt.validate {
        match Config::read(&config_path) {
            Ok(_) => println!("Config validation passed"),
            Err(e) => {
                eprintln!("{}: {e:#}", config_path.display());
                process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = run(opt, config_path) {
        eprintln!("{e:#}");
        process::exit(1);
    }
}

fn run(opt: Cli, config_path: PathBuf) -> anyhow::Result<()> {
    let config = if config_path.exists() {
        Config::read(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?
    } else {
        info!("no config at {}, using defaults", config_path.display());
        Config::default()
    };

    match opt.command {
        Some(Commands::Bindings) => {
            println!("{}", serde_json::to_string_pretty(&config.keys)?);
        }
        Some(Commands::Replay { file }) => {
            let memory_path = opt.memory.unwrap_or_else(placement_file);
            let memory = PlacementMemory::load(&memory_path)?;
            let record = Record::new(opt.record.as_deref())?;
            if let Some(path) = opt.record.as_deref().filter(|_| record.is_recording()) {
                info!("recording session to {}", path.display());
            }

            let reactor = reactor::replay(&file, &config, memory, record)?;
            for (wid, frame) in reactor.host().frames() {
                let state = if reactor.is_tiled(wid) { "tiled" } else { "free" };
                println!(
                    "{wid} {} {} {} {} {state}",
                    frame.x, frame.y, frame.width, frame.height
                );
            }
            let (_, memory) = reactor.into_parts();
            memory.save(&memory_path)?;
        }
        None => {
            println!(
                "{} layouts, {} key bindings loaded from {}",
                config.layouts.len(),
                config.keys.len(),
                config_path.display()
            );
        }
    }
    Ok(())
}
