// Change notifications emitted by `GameState`.
//
// The UI does not subscribe to anything. Operations on `GameState` push
// `GameEvent`s onto a queue and the UI pulls them with `drain_events()`
// after each call it makes. A popup open on cell X refreshes when it sees
// `CacheChanged { cell: X, .. }`; the map redraws markers on `PlayerMoved`
// and clears everything on `Reset`.

use crate::types::{Cell, LatLng};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A cache was discovered for the first time (or regenerated after its
    /// memento turned out to be unreadable).
    CacheSpawned { cell: Cell, token_count: usize },
    /// A cache's contents changed through a transfer.
    CacheChanged { cell: Cell, token_count: usize },
    /// The player's position changed.
    PlayerMoved { position: LatLng, cell: Cell },
    /// All saved state was wiped.
    Reset,
}

impl GameEvent {
    /// The cell this event concerns, if any.
    pub fn cell(&self) -> Option<Cell> {
        match self {
            GameEvent::CacheSpawned { cell, .. }
            | GameEvent::CacheChanged { cell, .. }
            | GameEvent::PlayerMoved { cell, .. } => Some(*cell),
            GameEvent::Reset => None,
        }
    }
}
