// geocache_core: cache state core for a location-based collectible game.
//
// The player walks a grid laid over a real map. Some cells hold caches of
// collectible tokens; the player moves tokens between caches and a personal
// inventory to build up a score. This crate holds all of that state and
// nothing about how it is drawn: map tiles, popups, buttons and geolocation
// polling are the front end's job.
//
// Module overview:
// - `types.rs`:       LatLng, Cell (+ canonical key), Token (+ identity).
// - `grid.rs`:        Grid addressing: position -> cell, cell bounds, neighborhood scan.
// - `config.rs`:      GameConfig: tile size, radius, spawn probability, yield cap, start.
// - `cache.rs`:       Cache entity, token spawning, memento encode/decode.
// - `store.rs`:       CacheStore: flyweight + memento manager (exists_at/get/commit/reset).
// - `inventory.rs`:   Inventory and the collect/deposit transfer primitives.
// - `player.rs`:      PlayerTrail: position and movement history.
// - `persistence.rs`: Persistence trait, MemoryStore, FileStore, saved-state keys.
// - `event.rs`:       GameEvent change notifications drained by the UI.
// - `command.rs`:     PlayerAction / ActionOutcome for front ends.
// - `game.rs`:        GameState: owns everything above, writes through on change.
// - `error.rs`:       GeocacheError / GeocacheResult.
// - `prng`:           Re-exported from `geocache_prng`: the luck function.
//
// **Critical constraint: determinism.** Which cells hold caches and what
// they spawn with is a pure function of the cell coordinate and the config.
// Collections that reach the durable store are `BTreeMap`s so saved output
// is byte-stable.

pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod game;
pub mod grid;
pub mod inventory;
pub mod persistence;
pub mod player;
pub use geocache_prng as prng;
pub mod store;
pub mod types;

pub use error::{GeocacheError, GeocacheResult};
pub use game::GameState;
