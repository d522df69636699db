// main.rs

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chaincalc::calculator::Calculator;
use chaincalc::config::Config;
use chaincalc::history::History;
use chaincalc::repl::{run_line, start_repl};
use chaincalc::storage::{FileStore, KeyValueStore, MemoryStore};
use chaincalc::timer::AutoClear;

/// Chain calculator with memory and a persisted history.
#[derive(Parser)]
#[command(name = "chaincalc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to <config dir>/chaincalc/config.toml)
    #[arg(short, long, env = "CHAINCALC_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the history file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep history in memory only
    #[arg(long)]
    no_persist: bool,

    /// Evaluate one line of keys, print the display and exit
    #[arg(short, long, value_name = "KEYS", allow_hyphen_values = true)]
    eval: Option<String>,

    /// Log debug events to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "chaincalc=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("CHAINCALC_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_store(config: &Config) -> Box<dyn KeyValueStore> {
    if !config.persist {
        return Box::new(MemoryStore::new());
    }
    match config.data_dir() {
        Some(dir) => {
            tracing::debug!(dir = %dir.display(), "history directory");
            Box::new(FileStore::new(dir))
        }
        None => {
            tracing::warn!("no data directory available, history will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir;
    }
    if cli.no_persist {
        config.persist = false;
    }

    let history = History::load(open_store(&config));
    let mut calc = Calculator::with_options(
        history,
        config.formatter(),
        AutoClear::new(config.error_reset_delay()),
    );

    if let Some(keys) = cli.eval {
        let (_, out) = run_line(&mut calc, &keys, Instant::now());
        print!("{}", out);
        return Ok(if calc.is_error() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    start_repl(&mut calc)?;
    Ok(ExitCode::SUCCESS)
}
