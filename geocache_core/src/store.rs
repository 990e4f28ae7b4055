// Cache store: flyweight + memento manager.
//
// `CacheStore` is the single authority on whether a cell holds a cache and
// what that cache contains. It owns the memento map (cell key to memento
// string) and nothing else. Caches are not kept resident: `get` projects a
// `Cache` out of the map on demand, and `commit` folds a mutated cache back
// in. A cache scrolled out of view costs one map entry.
//
// Per-cell lifecycle as seen by the store:
//
//   UNKNOWN --exists_at--> NOT-SPAWNED   (terminal, no cache ever)
//                     \--> DISCOVERED    (get: memento created on first visit)
//
// Whether a discovered cache is currently drawn on screen is the UI's
// business; the store only distinguishes "has a memento" from "not yet".
//
// This type is pure in-memory state. Writing the map to the durable store
// is done by `GameState` (see `game.rs`) right after every call that changes
// it, so the in-memory map is always at least as new as the durable copy and
// `get` is always served from the newest state.
//
// **Critical constraint: determinism.** `exists_at` reads only the cell
// coordinate, never cache contents, so re-evaluating it is idempotent: a
// cell that ever held a cache always reports one.

use crate::cache::{self, Cache};
use crate::types::Cell;
use geocache_prng::luck;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// How `get` produced the returned cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Materialized {
    /// Rebuilt from an existing memento.
    Restored,
    /// First discovery; a fresh memento was recorded.
    Spawned,
    /// The memento was unreadable and has been replaced by a fresh spawn.
    Regenerated,
}

impl Materialized {
    /// Whether the memento map changed and needs writing out.
    pub fn changed_mementos(self) -> bool {
        !matches!(self, Materialized::Restored)
    }
}

/// Owner of the memento map.
#[derive(Clone, Debug, Default)]
pub struct CacheStore {
    spawn_probability: f64,
    max_tokens_per_cache: u32,
    mementos: BTreeMap<String, String>,
}

impl CacheStore {
    pub fn new(spawn_probability: f64, max_tokens_per_cache: u32) -> Self {
        Self {
            spawn_probability,
            max_tokens_per_cache,
            mementos: BTreeMap::new(),
        }
    }

    /// Rebuild a store around a memento map loaded from the durable store.
    /// Entries are not validated here; a bad entry is caught by `get`.
    pub fn with_mementos(
        spawn_probability: f64,
        max_tokens_per_cache: u32,
        mementos: BTreeMap<String, String>,
    ) -> Self {
        Self {
            spawn_probability,
            max_tokens_per_cache,
            mementos,
        }
    }

    /// Whether `cell` holds a cache. Depends only on the coordinate.
    pub fn exists_at(&self, cell: Cell) -> bool {
        luck(&cell.key()) < self.spawn_probability
    }

    /// Materialize the cache at `cell`.
    ///
    /// Returns `None` if no cache exists there. Otherwise restores it from
    /// its memento, or spawns it and records the initial memento on first
    /// discovery. A memento that fails to parse is logged and replaced by a
    /// fresh spawn.
    pub fn get(&mut self, cell: Cell) -> Option<(Cache, Materialized)> {
        if !self.exists_at(cell) {
            return None;
        }
        let key = cell.key();
        let mut how = Materialized::Spawned;
        if let Some(memento) = self.mementos.get(&key) {
            match cache::from_memento(cell, memento) {
                Ok(restored) => {
                    debug!(%cell, tokens = restored.len(), "restored cache from memento");
                    return Some((restored, Materialized::Restored));
                }
                Err(e) => {
                    warn!(%cell, error = %e, "discarding corrupt memento, regenerating cache");
                    how = Materialized::Regenerated;
                }
            }
        }
        let fresh = Cache::new(cell, cache::spawn_tokens(cell, self.max_tokens_per_cache));
        debug!(%cell, tokens = fresh.len(), "spawned cache");
        self.mementos.insert(key, cache::to_memento(&fresh));
        Some((fresh, how))
    }

    /// Record the current state of `cache` as its cell's memento.
    pub fn commit(&mut self, cache: &Cache) {
        let memento = cache::to_memento(cache);
        debug!(cell = %cache.cell, %memento, "committed cache");
        self.mementos.insert(cache.cell.key(), memento);
    }

    /// Forget every memento.
    pub fn reset(&mut self) {
        self.mementos.clear();
    }

    /// The memento map, for writing to the durable store.
    pub fn mementos(&self) -> &BTreeMap<String, String> {
        &self.mementos
    }

    /// Cells with a memento, in key order. Keys that do not parse as cells
    /// are skipped.
    pub fn discovered_cells(&self) -> Vec<Cell> {
        self.mementos
            .keys()
            .filter_map(|key| Cell::from_key(key).ok())
            .collect()
    }

    /// Total tokens held across all discovered caches. Entries with corrupt
    /// mementos count as empty.
    pub fn total_cached_tokens(&self) -> usize {
        self.mementos
            .iter()
            .filter_map(|(key, memento)| {
                let cell = Cell::from_key(key).ok()?;
                cache::from_memento(cell, memento).ok()
            })
            .map(|c| c.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Token;

    fn always_spawning() -> CacheStore {
        CacheStore::new(1.0, 10)
    }

    #[test]
    fn exists_at_is_stable() {
        let store = CacheStore::new(0.1, 10);
        for i in -20..20 {
            for j in -20..20 {
                let cell = Cell::new(i, j);
                assert_eq!(store.exists_at(cell), store.exists_at(cell));
            }
        }
    }

    #[test]
    fn exists_at_agrees_across_independent_stores() {
        let a = CacheStore::new(0.1, 10);
        let b = CacheStore::new(0.1, 10);
        assert_eq!(a.exists_at(Cell::new(0, 0)), b.exists_at(Cell::new(0, 0)));
    }

    #[test]
    fn spawn_probability_bounds() {
        let never = CacheStore::new(0.0, 10);
        let always = CacheStore::new(1.0, 10);
        for i in 0..50 {
            assert!(!never.exists_at(Cell::new(i, i)));
            assert!(always.exists_at(Cell::new(i, i)));
        }
    }

    #[test]
    fn get_nonexistent_returns_none_without_memento() {
        let mut store = CacheStore::new(0.0, 10);
        assert!(store.get(Cell::new(3, 3)).is_none());
        assert!(store.mementos().is_empty());
    }

    #[test]
    fn first_get_spawns_and_records_memento() {
        let mut store = always_spawning();
        let cell = Cell::new(5, 5);
        let (cache, how) = store.get(cell).unwrap();
        assert_eq!(how, Materialized::Spawned);
        assert_eq!(cache.tokens, cache::spawn_tokens(cell, 10));
        assert_eq!(store.mementos()[&cell.key()], cache::to_memento(&cache));
        assert!(store.mementos().contains_key(&cell.key()));
    }

    #[test]
    fn repeated_get_is_bit_exact() {
        let mut store = always_spawning();
        let cell = Cell::new(-2, 9);
        let (first, _) = store.get(cell).unwrap();
        let memento = store.mementos()[&cell.key()].clone();
        let (second, how) = store.get(cell).unwrap();
        assert_eq!(how, Materialized::Restored);
        assert_eq!(first, second);
        assert_eq!(store.mementos()[&cell.key()], memento);
    }

    #[test]
    fn commit_overwrites_memento() {
        let mut store = always_spawning();
        let cell = Cell::new(1, 1);
        let (mut cache, _) = store.get(cell).unwrap();
        cache.tokens.push(Token::new(Cell::new(7, 7), 3));
        store.commit(&cache);
        let (restored, _) = store.get(cell).unwrap();
        assert_eq!(restored, cache);
        assert_eq!(restored.tokens.last().unwrap().identity(), "7_7_3");
    }

    #[test]
    fn corrupt_memento_regenerates() {
        let cell = Cell::new(4, 4);
        let mut mementos = BTreeMap::new();
        mementos.insert(cell.key(), "{{ not json".to_string());
        let mut store = CacheStore::with_mementos(1.0, 10, mementos);
        let (cache, how) = store.get(cell).unwrap();
        assert_eq!(how, Materialized::Regenerated);
        assert!(how.changed_mementos());
        assert_eq!(cache.tokens, cache::spawn_tokens(cell, 10));
        assert_eq!(store.mementos()[&cell.key()], cache::to_memento(&cache));
    }

    #[test]
    fn reset_forgets_everything() {
        let mut store = always_spawning();
        let cell = Cell::new(0, 3);
        let (mut cache, _) = store.get(cell).unwrap();
        cache.tokens.clear();
        store.commit(&cache);
        store.reset();
        assert!(store.mementos().is_empty());
        let (fresh, how) = store.get(cell).unwrap();
        assert_eq!(how, Materialized::Spawned);
        assert_eq!(fresh.tokens, cache::spawn_tokens(cell, 10));
    }

    #[test]
    fn discovered_cells_and_totals() {
        let mut store = always_spawning();
        let cells = [Cell::new(0, 0), Cell::new(-1, 2), Cell::new(3, -4)];
        let mut expected = 0;
        for cell in cells {
            let (cache, _) = store.get(cell).unwrap();
            expected += cache.len();
        }
        let mut found = store.discovered_cells();
        found.sort();
        let mut want = cells.to_vec();
        want.sort();
        assert_eq!(found, want);
        assert_eq!(store.total_cached_tokens(), expected);
    }
}
