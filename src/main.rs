use braillepad::config::Config;
use braillepad::error::PadResult;
use braillepad::store::{CalibrationStore, JsonFileStore, MemoryStore};
use clap::{Parser, Subcommand};
use std::process;
use tracing::{error, info};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON settings file; replaces the settings flags when given.
    #[arg(global = true, long)]
    config: Option<String>,

    /// JSON calibration store. Without it calibration is kept in memory.
    #[arg(global = true, long)]
    store: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the key positions for a viewport.
    Layout(cmd::layout::LayoutArgs),
    /// Show the swipe code table.
    Gestures(cmd::gestures::GesturesArgs),
    /// Run a recorded touch trace through an input session.
    Replay(cmd::replay::ReplayArgs),
}

fn resolve_config(path: Option<&str>, flags: &Config) -> PadResult<Config> {
    match path {
        Some(path) => {
            info!("Loading settings from {}", path);
            Config::load_from_file(path)
        }
        None => {
            flags.validate()?;
            Ok(flags.clone())
        }
    }
}

fn open_store(path: Option<&str>) -> PadResult<Box<dyn CalibrationStore>> {
    match path {
        Some(path) => Ok(Box::new(JsonFileStore::open(path)?)),
        None => Ok(Box::new(MemoryStore::new())),
    }
}

fn run(cli: Cli) -> PadResult<()> {
    match cli.command {
        Commands::Gestures(args) => {
            cmd::gestures::run(args);
            Ok(())
        }
        Commands::Layout(args) => {
            let config = resolve_config(cli.config.as_deref(), &args.config)?;
            let store = open_store(cli.store.as_deref())?;
            cmd::layout::run(args, config, store)
        }
        Commands::Replay(args) => {
            let config = resolve_config(cli.config.as_deref(), &args.config)?;
            let store = open_store(cli.store.as_deref())?;
            cmd::replay::run(args, config, store)
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("❌ {}", e);
        process::exit(1);
    }
}
