//! mosaicsh - interactive command shell

use std::env;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{debug, error, info, warn};

use mosaicsh::{ConfigLoader, ConfigStore, HistoryRecorder, RustylineReader, Shell};

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "mosaicsh", version, about = mosaicsh::DESCRIPTION)]
struct Args {
    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// History file
    #[arg(long, value_name = "PATH", conflicts_with = "no_history")]
    history: Option<PathBuf>,

    /// Do not record history
    #[arg(long)]
    no_history: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Run one command line and exit with its status
    #[arg(short = 'c', value_name = "COMMAND")]
    command: Option<String>,
}

fn init_logging(debug: bool) {
    let debug = debug
        || env::var("MOSAICSH_DEBUG").map_or(false, |v| v == "1" || v.to_lowercase() == "true");
    let log_level = if debug { "debug" } else { "warn" };

    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Keep the shell alive on Ctrl-C. The terminal delivers SIGINT to the
/// whole foreground process group, so a direct-mode child still gets it;
/// the shell itself just notes it.
fn install_interrupt_listener() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::interrupt()) {
        Ok(mut interrupts) => {
            tokio::spawn(async move {
                while interrupts.recv().await.is_some() {
                    debug!("Interrupt received");
                }
            });
        }
        Err(e) => warn!("Can't install interrupt handler: {}", e),
    }
}

fn open_config(path: Option<PathBuf>) -> ConfigStore {
    let (store, warnings) = match path {
        Some(path) => ConfigStore::open(ConfigLoader::new(path)),
        None => ConfigStore::open_default(),
    };
    for warning in warnings {
        eprintln!("{}: warning: {}", mosaicsh::NAME, warning);
    }
    store
}

fn open_history(args: &Args) -> Option<HistoryRecorder> {
    if args.no_history {
        return None;
    }
    match &args.history {
        Some(path) => Some(HistoryRecorder::with_path(path.clone())),
        None => HistoryRecorder::new(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    info!("Starting {} v{}", mosaicsh::NAME, mosaicsh::VERSION);
    install_interrupt_listener();

    let config = open_config(args.config.clone());
    let history_size = config.config().history_size;
    let history = open_history(&args);

    if let Some(line) = &args.command {
        let mut shell = Shell::new(config, None);
        let code = shell.run_command(line).await;
        process::exit(code);
    }

    let mut reader = RustylineReader::new(history_size)?;
    if let Some(history) = &history {
        match history.recent(history_size) {
            Ok(entries) => reader.seed(entries),
            Err(e) => warn!("Can't read history: {}", e),
        }
    }

    let mut shell = Shell::new(config, history);
    let code = shell.run(&mut reader).await;
    if code != 0 {
        error!("Shell exiting with status {}", code);
    }
    info!("Goodbye");
    process::exit(code);
}
