// Top-level game state: the object a front end holds.
//
// `GameState` owns the cache store (memento map), the inventory, the score,
// the player trail, and the injected durable store. It is the only code path
// that mutates any of them, and it writes each piece back to the durable
// store as soon as it changes:
//
//   get (first discovery)  -> momentos
//   commit / collect / deposit -> momentos, coinInventory, playerPoints
//   move_player / set_player_position -> tempMarker, movement
//   reset -> removes all five keys
//
// ## Ordering
//
// The in-memory memento map is updated before the durable write is issued,
// and `get` always reads the in-memory map. A collect followed immediately by
// a re-render therefore never sees the pre-collect token list, even if the
// write is slow or fails.
//
// ## Failure policy
//
// Nothing here fails outward once the state is loaded. Empty transfers are
// no-ops, a transfer or commit against a cell with no cache is a logged
// no-op, a transfer reloads its cache from the memento map first, corrupt
// mementos regenerate (see `store.rs`), and durable-write errors are logged
// at `error` and otherwise ignored. Only `load` returns a `Result`, for I/O
// errors reading the store; unreadable values in it fall back to defaults
// with a warning.
//
// See also: `store.rs` for the memento map, `inventory.rs` for the transfer
// primitives, `persistence.rs` for key names and encodings, `event.rs` for
// the change notifications drained by the UI.

use crate::cache::Cache;
use crate::command::{ActionOutcome, PlayerAction};
use crate::config::GameConfig;
use crate::error::GeocacheResult;
use crate::event::GameEvent;
use crate::grid::Grid;
use crate::inventory::{self, Inventory};
use crate::persistence::{
    ALL_KEYS, INVENTORY_KEY, MEMENTOS_KEY, MOVEMENT_KEY, POSITION_KEY, Persistence, SCORE_KEY,
};
use crate::player::{Direction, PlayerTrail};
use crate::store::CacheStore;
use crate::types::{Cell, LatLng, Token};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

pub struct GameState<P: Persistence> {
    config: GameConfig,
    grid: Grid,
    caches: CacheStore,
    inventory: Inventory,
    score: i64,
    trail: PlayerTrail,
    persistence: P,
    events: Vec<GameEvent>,
}

impl<P: Persistence> GameState<P> {
    /// Load saved state from `persistence`, or start fresh where nothing is
    /// saved.
    pub fn load(config: GameConfig, persistence: P) -> GeocacheResult<Self> {
        config.validate()?;

        let mementos: BTreeMap<String, String> =
            load_json(&persistence, MEMENTOS_KEY)?.unwrap_or_default();
        let inventory: Inventory = load_json(&persistence, INVENTORY_KEY)?.unwrap_or_default();
        let score = match persistence.load(SCORE_KEY)? {
            Some(raw) => raw.trim().parse::<i64>().unwrap_or_else(|e| {
                warn!(key = SCORE_KEY, value = %raw, error = %e, "unreadable score, starting from 0");
                0
            }),
            None => 0,
        };
        let position: Option<LatLng> = load_json(&persistence, POSITION_KEY)?;
        let history: Vec<LatLng> = load_json(&persistence, MOVEMENT_KEY)?.unwrap_or_default();
        let trail = match position {
            Some(pos) => PlayerTrail::restore(pos, history),
            None => PlayerTrail::new(config.start_position),
        };

        info!(
            discovered = mementos.len(),
            inventory = inventory.len(),
            score,
            position = %trail.position,
            "loaded game state"
        );

        Ok(Self {
            grid: Grid::new(config.tile_degrees),
            caches: CacheStore::with_mementos(
                config.spawn_probability,
                config.max_tokens_per_cache,
                mementos,
            ),
            config,
            inventory,
            score,
            trail,
            persistence,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn caches(&self) -> &CacheStore {
        &self.caches
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn trail(&self) -> &PlayerTrail {
        &self.trail
    }

    pub fn player_cell(&self) -> Cell {
        self.grid.to_cell(self.trail.position)
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Give back the durable store, e.g. to reopen it in a fresh state.
    pub fn into_persistence(self) -> P {
        self.persistence
    }

    /// Take all events emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Cache store operations
    // -----------------------------------------------------------------------

    /// Whether `cell` holds a cache.
    pub fn exists_at(&self, cell: Cell) -> bool {
        self.caches.exists_at(cell)
    }

    /// Materialize the cache at `cell`, or `None` if there is none.
    pub fn get(&mut self, cell: Cell) -> Option<Cache> {
        let (cache, changed) = self.materialize(cell)?;
        if changed {
            self.persist_mementos();
        }
        Some(cache)
    }

    /// `get` minus the durable write. Reports whether the memento map
    /// changed so callers can batch the write.
    fn materialize(&mut self, cell: Cell) -> Option<(Cache, bool)> {
        let (cache, how) = self.caches.get(cell)?;
        let changed = how.changed_mementos();
        if changed {
            self.events.push(GameEvent::CacheSpawned {
                cell,
                token_count: cache.len(),
            });
        }
        Some((cache, changed))
    }

    /// Record `cache` as the current state of its cell and write it out.
    /// Returns `false`, and records nothing, if no cache exists at that cell.
    pub fn commit(&mut self, cache: &Cache) -> bool {
        if !self.caches.exists_at(cache.cell) {
            warn!(cell = %cache.cell, "ignoring commit for a cell with no cache");
            return false;
        }
        self.record(cache);
        true
    }

    fn record(&mut self, cache: &Cache) {
        self.caches.commit(cache);
        self.persist_mementos();
        self.events.push(GameEvent::CacheChanged {
            cell: cache.cell,
            token_count: cache.len(),
        });
    }

    /// Cells in the player's neighborhood that hold a cache, row-major.
    pub fn nearby_caches(&self) -> Vec<Cell> {
        self.grid
            .neighborhood(self.player_cell(), self.config.neighborhood_radius)
            .filter(|&cell| self.caches.exists_at(cell))
            .collect()
    }

    /// Materialize every cache in the player's neighborhood, as the map does
    /// when it redraws markers. Newly discovered caches are written out in a
    /// single memento write for the whole scan.
    pub fn materialize_nearby(&mut self) -> Vec<Cache> {
        let mut changed = false;
        let caches = self
            .nearby_caches()
            .into_iter()
            .filter_map(|cell| {
                let (cache, spawned) = self.materialize(cell)?;
                changed |= spawned;
                Some(cache)
            })
            .collect();
        if changed {
            self.persist_mementos();
        }
        caches
    }

    // -----------------------------------------------------------------------
    // Transfers
    // -----------------------------------------------------------------------

    /// Move the top token of the cache at `cache.cell` into the inventory.
    /// Returns the token, or `None` if the cache was empty (nothing changes).
    ///
    /// `cache` is first reloaded from the memento map, so a handle taken
    /// before an earlier transfer cannot move the same token twice.
    pub fn collect(&mut self, cache: &mut Cache) -> Option<Token> {
        self.refresh(cache)?;
        let token = inventory::collect(cache, &mut self.inventory, &mut self.score)?;
        debug!(cell = %cache.cell, token = %token, score = self.score, "collected token");
        self.after_transfer(cache);
        Some(token)
    }

    /// Move the top inventory token into the cache at `cache.cell`. Returns
    /// the token, or `None` if the inventory was empty (nothing changes).
    /// Reloads `cache` first, like `collect`.
    pub fn deposit(&mut self, cache: &mut Cache) -> Option<Token> {
        self.refresh(cache)?;
        let token = inventory::deposit(cache, &mut self.inventory, &mut self.score)?;
        debug!(cell = %cache.cell, token = %token, score = self.score, "deposited token");
        self.after_transfer(cache);
        Some(token)
    }

    /// Overwrite `cache` with the store's current state for its cell.
    fn refresh(&mut self, cache: &mut Cache) -> Option<()> {
        let Some(current) = self.get(cache.cell) else {
            warn!(cell = %cache.cell, "ignoring transfer against a cell with no cache");
            return None;
        };
        *cache = current;
        Some(())
    }

    fn after_transfer(&mut self, cache: &Cache) {
        self.record(cache);
        self.persist_player_holdings();
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    /// Step the player one tile in `dir`.
    pub fn move_player(&mut self, dir: Direction) -> LatLng {
        let pos = self.trail.step(dir, self.grid.tile_degrees());
        self.after_move(pos);
        pos
    }

    /// Move the player to a geolocation fix, pinned to the map edges.
    /// A non-finite fix is ignored and the player stays put.
    pub fn set_player_position(&mut self, pos: LatLng) -> LatLng {
        if !(pos.lat.is_finite() && pos.lng.is_finite()) {
            warn!(position = %pos, "ignoring non-finite position fix");
            return self.trail.position;
        }
        let pos = self.trail.move_to(pos);
        self.after_move(pos);
        pos
    }

    fn after_move(&mut self, pos: LatLng) {
        let cell = self.grid.to_cell(pos);
        debug!(position = %pos, %cell, "player moved");
        if let Some(json) = encode_json(POSITION_KEY, &self.trail.position) {
            self.persist(POSITION_KEY, &json);
        }
        if let Some(json) = encode_json(MOVEMENT_KEY, &self.trail.history) {
            self.persist(MOVEMENT_KEY, &json);
        }
        self.events.push(GameEvent::PlayerMoved {
            position: pos,
            cell,
        });
    }

    // -----------------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------------

    /// Wipe every memento, the inventory, the score and the movement
    /// history, and remove them from the durable store. The next `get` on
    /// any cell behaves as a first discovery.
    pub fn reset(&mut self) {
        self.caches.reset();
        self.inventory.clear();
        self.score = 0;
        self.trail = PlayerTrail::new(self.config.start_position);
        for key in ALL_KEYS {
            if let Err(e) = self.persistence.remove(key) {
                error!(key, error = %e, "failed to clear saved state");
            }
        }
        self.events.push(GameEvent::Reset);
        info!("game state reset");
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Apply one player action.
    pub fn apply(&mut self, action: &PlayerAction) -> ActionOutcome {
        match *action {
            PlayerAction::Move { direction } => {
                let position = self.move_player(direction);
                ActionOutcome::Moved {
                    position,
                    cell: self.grid.to_cell(position),
                }
            }
            PlayerAction::MoveTo { position } => {
                let position = self.set_player_position(position);
                ActionOutcome::Moved {
                    position,
                    cell: self.grid.to_cell(position),
                }
            }
            PlayerAction::Collect { cell } => self.transfer_at(cell, Self::collect),
            PlayerAction::Deposit { cell } => self.transfer_at(cell, Self::deposit),
            PlayerAction::Reset => {
                self.reset();
                ActionOutcome::Reset
            }
        }
    }

    fn transfer_at(
        &mut self,
        cell: Cell,
        transfer: fn(&mut Self, &mut Cache) -> Option<Token>,
    ) -> ActionOutcome {
        let Some(mut cache) = self.get(cell) else {
            return ActionOutcome::NoCache { cell };
        };
        match transfer(self, &mut cache) {
            Some(token) => ActionOutcome::Transferred {
                cell,
                token: token.identity(),
            },
            None => ActionOutcome::NothingToTransfer { cell },
        }
    }

    // -----------------------------------------------------------------------
    // Durable writes
    // -----------------------------------------------------------------------

    fn persist_mementos(&mut self) {
        if let Some(json) = encode_json(MEMENTOS_KEY, self.caches.mementos()) {
            self.persist(MEMENTOS_KEY, &json);
        }
    }

    fn persist_player_holdings(&mut self) {
        if let Some(json) = encode_json(INVENTORY_KEY, &self.inventory) {
            self.persist(INVENTORY_KEY, &json);
        }
        self.persist(SCORE_KEY, &self.score.to_string());
    }

    fn persist(&mut self, key: &str, value: &str) {
        if let Err(e) = self.persistence.save(key, value) {
            error!(key, error = %e, "failed to write saved state");
        }
    }
}

fn encode_json<T: Serialize + ?Sized>(key: &str, value: &T) -> Option<String> {
    serde_json::to_string(value)
        .inspect_err(|e| error!(key, error = %e, "failed to encode saved state"))
        .ok()
}

/// Read and decode a JSON value. Missing keys are `None`; values that do not
/// decode are logged and also treated as `None`.
fn load_json<T: DeserializeOwned>(
    persistence: &impl Persistence,
    key: &str,
) -> GeocacheResult<Option<T>> {
    let Some(raw) = persistence.load(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, error = %e, "discarding unreadable saved state");
            Ok(None)
        }
    }
}
