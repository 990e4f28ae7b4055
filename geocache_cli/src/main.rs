// CLI entry point for the headless geocache front end.
//
// Stands in for the browser UI: it loads the saved game from a directory,
// performs one player action through `GameState`, prints what happened, and
// exits. The durable store is a `FileStore`, so state carries over between
// invocations exactly as it would across page reloads.
//
// Usage:
//   geocache [-v] [--data-dir DIR] [--config FILE] <COMMAND>
//     status | scan | move <DIR> | goto <LAT> <LNG>
//     collect <I> <J> | deposit <I> <J> | reset --yes

mod args;
mod commands;

use args::{Cli, Commands};
use clap::Parser;
use geocache_core::GameState;
use geocache_core::config::GameConfig;
use geocache_core::error::{GeocacheError, GeocacheResult};
use geocache_core::persistence::FileStore;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 0 = warn, 1 = info, 2+ = debug
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "geocache_core={level},geocache_cli={level}"
        )))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> GeocacheResult<()> {
    let config = load_config(cli.config.as_deref())?;
    let store = FileStore::open(&cli.data_dir)?;
    debug!(data_dir = %store.dir().display(), "opened save directory");
    let mut game = GameState::load(config, store)?;

    match cli.command {
        Commands::Status => commands::status(&game),
        Commands::Scan => commands::scan(&mut game),
        Commands::Move { direction } => commands::step(&mut game, direction.into()),
        Commands::Goto { lat, lng } => commands::goto(&mut game, lat, lng),
        Commands::Collect { i, j } => commands::collect(&mut game, i, j),
        Commands::Deposit { i, j } => commands::deposit(&mut game, i, j),
        Commands::Reset { yes } => commands::reset(&mut game, yes),
    }
}

fn load_config(path: Option<&Path>) -> GeocacheResult<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| GeocacheError::io(format!("reading config {}", path.display()), e))?;
    GameConfig::from_json(&json)
}
