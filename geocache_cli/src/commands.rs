// Subcommand handlers. Each drives `GameState` through a `PlayerAction` (or a
// read-only query) and prints the outcome for a human.

use geocache_core::GameState;
use geocache_core::command::{ActionOutcome, PlayerAction};
use geocache_core::error::{GeocacheError, GeocacheResult};
use geocache_core::persistence::Persistence;
use geocache_core::player::Direction;
use geocache_core::types::{Cell, LatLng};
use tracing::debug;

pub fn status<P: Persistence>(game: &GameState<P>) -> GeocacheResult<()> {
    let trail = game.trail();
    println!("Position: {} in cell {}", trail.position, game.player_cell());
    println!("Score:    {}", game.score());
    println!("Caches discovered: {}", game.caches().discovered_cells().len());
    let inventory = game.inventory();
    if inventory.is_empty() {
        println!("Inventory: empty");
    } else {
        let labels: Vec<String> = inventory.tokens().iter().map(|t| t.label()).collect();
        println!("Inventory ({}): {}", inventory.len(), labels.join(" "));
    }
    Ok(())
}

pub fn scan<P: Persistence>(game: &mut GameState<P>) -> GeocacheResult<()> {
    let caches = game.materialize_nearby();
    log_events(game);
    if caches.is_empty() {
        println!("No caches nearby.");
        return Ok(());
    }
    for cache in caches {
        let labels = cache.token_labels();
        if labels.is_empty() {
            println!("Cache {}: empty", cache.cell);
        } else {
            println!("Cache {}: {}", cache.cell, labels.join(" "));
        }
    }
    Ok(())
}

pub fn step<P: Persistence>(game: &mut GameState<P>, direction: Direction) -> GeocacheResult<()> {
    let outcome = game.apply(&PlayerAction::Move { direction });
    report(game, outcome)
}

pub fn goto<P: Persistence>(game: &mut GameState<P>, lat: f64, lng: f64) -> GeocacheResult<()> {
    if !(lat.is_finite() && lng.is_finite()) {
        return Err(GeocacheError::Config(format!(
            "position must be finite, got ({lat}, {lng})"
        )));
    }
    let outcome = game.apply(&PlayerAction::MoveTo {
        position: LatLng::new(lat, lng),
    });
    report(game, outcome)
}

pub fn collect<P: Persistence>(game: &mut GameState<P>, i: i32, j: i32) -> GeocacheResult<()> {
    let outcome = game.apply(&PlayerAction::Collect {
        cell: Cell::new(i, j),
    });
    report(game, outcome)
}

pub fn deposit<P: Persistence>(game: &mut GameState<P>, i: i32, j: i32) -> GeocacheResult<()> {
    let outcome = game.apply(&PlayerAction::Deposit {
        cell: Cell::new(i, j),
    });
    report(game, outcome)
}

pub fn reset<P: Persistence>(game: &mut GameState<P>, confirmed: bool) -> GeocacheResult<()> {
    if !confirmed {
        return Err(GeocacheError::Config(
            "refusing to erase the saved game without --yes".to_string(),
        ));
    }
    let outcome = game.apply(&PlayerAction::Reset);
    report(game, outcome)
}

fn report<P: Persistence>(game: &mut GameState<P>, outcome: ActionOutcome) -> GeocacheResult<()> {
    log_events(game);
    match outcome {
        ActionOutcome::Moved { position, cell } => {
            println!("Moved to {position} (cell {cell})");
        }
        ActionOutcome::Transferred { cell, token } => {
            println!("Moved token {token} at cache {cell}. Score: {}", game.score());
        }
        ActionOutcome::NothingToTransfer { cell } => {
            println!("Nothing to move at cache {cell}.");
        }
        ActionOutcome::NoCache { cell } => {
            println!("There is no cache at cell {cell}.");
        }
        ActionOutcome::Reset => {
            println!("Saved game erased.");
        }
    }
    Ok(())
}

fn log_events<P: Persistence>(game: &mut GameState<P>) {
    for event in game.drain_events() {
        match event.cell() {
            Some(cell) => debug!(%cell, ?event, "cell changed"),
            None => debug!(?event, "game event"),
        }
    }
}
