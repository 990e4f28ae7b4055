// Player actions: the inputs a front end feeds into `GameState::apply`.
//
// A button press or a geolocation fix becomes one `PlayerAction`. Applying it
// goes through the same `GameState` methods a front end could call directly;
// this enum just gives front ends (the CLI, a scripted test) a single entry
// point and a serializable form.

use crate::player::Direction;
use crate::types::{Cell, LatLng};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Step one tile.
    Move { direction: Direction },
    /// Jump to a position (geolocation update).
    MoveTo { position: LatLng },
    /// Take the top token of the cache at `cell`.
    Collect { cell: Cell },
    /// Put the top inventory token into the cache at `cell`.
    Deposit { cell: Cell },
    /// Wipe all saved state.
    Reset,
}

/// What applying a `PlayerAction` did.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Moved { position: LatLng, cell: Cell },
    /// A token moved between the cache at `cell` and the inventory.
    Transferred { cell: Cell, token: String },
    /// The source was empty; nothing changed.
    NothingToTransfer { cell: Cell },
    /// There is no cache at `cell`.
    NoCache { cell: Cell },
    Reset,
}
