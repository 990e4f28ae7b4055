// Data-driven game configuration.
//
// All tunable parameters of the cache core live in `GameConfig`, loaded from
// JSON at startup. The core never uses magic numbers; it reads from the
// config. Missing fields fall back to the reference values, so a config file
// only needs to name what it changes.
//
// See also: `grid.rs` (tile size, neighborhood radius), `cache.rs` (token
// yield), `store.rs` (spawn probability), `player.rs` (start position).
//
// **Critical constraint: determinism.** `tile_degrees`, `spawn_probability`
// and `max_tokens_per_cache` decide which cells hold caches and what they
// spawn with. Changing them after a save exists moves caches the player has
// not yet visited; visited caches keep their mementos.

use crate::error::{GeocacheError, GeocacheResult};
use crate::types::{LatLng, MAX_LNG};
use serde::{Deserialize, Serialize};

/// Smallest tile that keeps every on-map cell index inside `i32`
/// (`180 / 1e-7 = 1.8e9 < i32::MAX`).
pub const MIN_TILE_DEGREES: f64 = 1e-7;

/// Top-level game configuration. Loaded from JSON, never mutated at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Edge length of one grid cell, in degrees of latitude/longitude.
    pub tile_degrees: f64,

    /// Half-width (in cells) of the square neighborhood scanned around the
    /// player. The scan covers `(2 * radius)^2` cells.
    pub neighborhood_radius: u32,

    /// Probability that a given cell holds a cache.
    pub spawn_probability: f64,

    /// Upper bound (exclusive) on the number of tokens a cache spawns with.
    pub max_tokens_per_cache: u32,

    /// Where the player stands on a fresh save or after a reset.
    pub start_position: LatLng,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_degrees: 1e-4,
            neighborhood_radius: 8,
            spawn_probability: 0.1,
            max_tokens_per_cache: 10,
            start_position: LatLng::new(36.98949379578401, -122.06277128548504),
        }
    }
}

impl GameConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> GeocacheResult<Self> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| GeocacheError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the grid and generator cannot work with.
    pub fn validate(&self) -> GeocacheResult<()> {
        if !(self.tile_degrees.is_finite() && self.tile_degrees >= MIN_TILE_DEGREES) {
            return Err(GeocacheError::Config(format!(
                "tile_degrees must be a number >= {MIN_TILE_DEGREES}, got {}",
                self.tile_degrees
            )));
        }
        if self.tile_degrees > MAX_LNG {
            return Err(GeocacheError::Config(format!(
                "tile_degrees must not exceed {MAX_LNG}, got {}",
                self.tile_degrees
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(GeocacheError::Config(format!(
                "spawn_probability must be within [0, 1], got {}",
                self.spawn_probability
            )));
        }
        if !self.start_position.is_on_map() {
            return Err(GeocacheError::Config(format!(
                "start_position must lie within [-90, 90] x [-180, 180], got {}",
                self.start_position
            )));
        }
        Ok(())
    }
}
