// Player inventory and the token transfers between it and a cache.
//
// Both sides are stacks: `collect` moves the top token of a cache onto the
// inventory, `deposit` moves the top of the inventory onto a cache. A token
// is held by exactly one container at a time, and transfers never create or
// destroy tokens, so `|inventory| + sum(|cache|)` is invariant under any
// sequence of transfers. Empty-source transfers are no-ops, not errors.
//
// The functions here are pure. `GameState::collect` / `deposit` (game.rs)
// wrap them with the memento commit, durable writes and change events.

use crate::cache::Cache;
use crate::types::Token;
use serde::{Deserialize, Serialize};

/// Tokens held by the player, bottom to top.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    tokens: Vec<Token>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }
}

/// Move the top token of `cache` onto `inventory` and bump `score`.
/// Returns the moved token, or `None` (changing nothing) if the cache is empty.
pub fn collect(cache: &mut Cache, inventory: &mut Inventory, score: &mut i64) -> Option<Token> {
    let token = cache.tokens.pop()?;
    inventory.tokens.push(token.clone());
    *score += 1;
    Some(token)
}

/// Move the top token of `inventory` onto `cache` and drop `score` by one.
/// Returns the moved token, or `None` (changing nothing) if the inventory is
/// empty.
pub fn deposit(cache: &mut Cache, inventory: &mut Inventory, score: &mut i64) -> Option<Token> {
    let token = inventory.tokens.pop()?;
    cache.tokens.push(token.clone());
    *score -= 1;
    Some(token)
}
