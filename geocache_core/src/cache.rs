// Cache entity model: spawn, serialize, deserialize.
//
// A `Cache` is plain data: the cell it sits on and the stack of tokens it
// currently holds (last element is the top). Behavior lives in free
// functions here and in `store.rs` / `game.rs`, not on the entity.
//
// Spawning is driven by the luck generator with a yield seed distinct from
// the existence seed (`"{i},{j},initialValue"` vs `"{i},{j}"`). With a shared
// seed every spawned cache would hold `floor(v * K)` tokens for some
// `v < spawn_probability`, i.e. zero at the reference constants.
//
// A memento is the JSON array of token identities in stack order. It is the
// system of record; a `Cache` in memory is a projection of it.

use crate::error::{GeocacheError, GeocacheResult};
use crate::types::{Cell, Token};
use geocache_prng::luck_parts;
use serde::{Deserialize, Serialize};

/// Tag mixed into the yield seed.
const YIELD_SEED_TAG: &str = "initialValue";

/// A cache and the tokens it currently holds, bottom to top.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cache {
    pub cell: Cell,
    pub tokens: Vec<Token>,
}

impl Cache {
    pub fn new(cell: Cell, tokens: Vec<Token>) -> Self {
        Self { cell, tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Identities of the held tokens, bottom to top. What a popup lists.
    pub fn token_labels(&self) -> Vec<String> {
        self.tokens.iter().map(Token::label).collect()
    }
}

/// Luck value deciding how many tokens `cell` spawns with.
pub fn yield_luck(cell: Cell) -> f64 {
    luck_parts(&[&cell.i, &cell.j, &YIELD_SEED_TAG])
}

/// Number of tokens a fresh cache at `cell` spawns with:
/// `floor(yield_luck * max_tokens)`, always below `max_tokens`.
pub fn spawn_count(cell: Cell, max_tokens: u32) -> u32 {
    let count = (yield_luck(cell) * f64::from(max_tokens)).floor() as u32;
    count.min(max_tokens.saturating_sub(1))
}

/// Fresh tokens for a first discovery at `cell`, serials `0..count`.
pub fn spawn_tokens(cell: Cell, max_tokens: u32) -> Vec<Token> {
    (0..spawn_count(cell, max_tokens))
        .map(|serial| Token::new(cell, serial))
        .collect()
}

/// Lossless encoding of the cache's token stack.
pub fn to_memento(cache: &Cache) -> String {
    let ids: Vec<String> = cache.tokens.iter().map(Token::identity).collect();
    // A Vec<String> always serializes.
    serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
}

/// Rebuild a cache from its memento. Malformed JSON or an unparseable token
/// identity comes back as `CorruptState` keyed by the cell; the caller
/// decides how to recover.
pub fn from_memento(cell: Cell, memento: &str) -> GeocacheResult<Cache> {
    let corrupt = |reason: String| GeocacheError::CorruptState {
        key: cell.key(),
        reason,
    };
    let ids: Vec<String> = serde_json::from_str(memento).map_err(|e| corrupt(e.to_string()))?;
    let tokens = ids
        .iter()
        .map(|id| Token::from_identity(id).map_err(|e| corrupt(e.to_string())))
        .collect::<GeocacheResult<Vec<_>>>()?;
    Ok(Cache::new(cell, tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_count_is_deterministic_and_bounded() {
        for i in -30..30 {
            for j in -30..30 {
                let cell = Cell::new(i, j);
                let n = spawn_count(cell, 10);
                assert!(n < 10);
                assert_eq!(n, spawn_count(cell, 10));
            }
        }
    }

    #[test]
    fn spawn_count_matches_floor_formula() {
        let cell = Cell::new(5, 5);
        let expected = (yield_luck(cell) * 10.0).floor() as u32;
        assert_eq!(spawn_count(cell, 10), expected);
    }

    #[test]
    fn spawn_count_zero_max_is_zero() {
        assert_eq!(spawn_count(Cell::new(1, 1), 0), 0);
    }

    #[test]
    fn spawned_tokens_have_sequential_identities() {
        // Find a cell that spawns with at least two tokens.
        let cell = (0..)
            .map(|i| Cell::new(i, 7))
            .find(|&c| spawn_count(c, 10) >= 2)
            .unwrap();
        let tokens = spawn_tokens(cell, 10);
        for (serial, token) in tokens.iter().enumerate() {
            assert_eq!(token.origin(), cell);
            assert_eq!(token.identity(), format!("{}_{}_{serial}", cell.i, cell.j));
        }
    }

    #[test]
    fn yields_vary_across_cells() {
        let counts: std::collections::BTreeSet<u32> =
            (0..200).map(|i| spawn_count(Cell::new(i, -i), 10)).collect();
        assert!(counts.len() > 5, "suspiciously few distinct yields: {counts:?}");
    }

    #[test]
    fn memento_is_json_array_of_identities() {
        let cell = Cell::new(2, -3);
        let cache = Cache::new(cell, vec![Token::new(cell, 0), Token::new(Cell::new(9, 9), 4)]);
        assert_eq!(to_memento(&cache), r#"["2_-3_0","9_9_4"]"#);
    }

    #[test]
    fn memento_roundtrip_preserves_order() {
        let cell = Cell::new(-1, 8);
        let cache = Cache::new(
            cell,
            vec![
                Token::new(cell, 3),
                Token::new(Cell::new(0, 0), 1),
                Token::new(cell, 0),
            ],
        );
        let restored = from_memento(cell, &to_memento(&cache)).unwrap();
        assert_eq!(restored, cache);
    }

    #[test]
    fn empty_cache_roundtrip() {
        let cache = Cache::new(Cell::new(4, 4), Vec::new());
        assert_eq!(to_memento(&cache), "[]");
        assert_eq!(from_memento(cache.cell, "[]").unwrap(), cache);
    }

    #[test]
    fn from_memento_rejects_corruption() {
        let cell = Cell::new(0, 0);
        assert!(from_memento(cell, "not json").is_err());
        assert!(from_memento(cell, r#"{"a":1}"#).is_err());
        assert!(from_memento(cell, r#"["0_0_0","bogus"]"#).is_err());
    }

    #[test]
    fn corrupt_memento_error_names_the_cell() {
        let cell = Cell::new(-3, 12);
        for memento in ["not json", r#"["-3_12_0","bogus"]"#] {
            match from_memento(cell, memento) {
                Err(GeocacheError::CorruptState { key, reason }) => {
                    assert_eq!(key, "-3,12");
                    assert!(!reason.is_empty());
                }
                other => panic!("expected CorruptState, got {other:?}"),
            }
        }
    }
}
