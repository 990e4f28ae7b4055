// Player position and movement history.
//
// The trail is what the map draws as the player's marker and path. It moves
// either one tile at a time (on-screen arrow buttons) or by jumping to a
// geolocation fix. Every position the player has occupied, including the
// starting one, is kept in `history` in visit order.

use crate::types::LatLng;
use serde::{Deserialize, Serialize};

/// One-tile step directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// `(dlat, dlng)` in tiles.
    pub fn delta(self) -> (f64, f64) {
        match self {
            Direction::North => (1.0, 0.0),
            Direction::South => (-1.0, 0.0),
            Direction::East => (0.0, 1.0),
            Direction::West => (0.0, -1.0),
        }
    }
}

/// Current position plus everywhere the player has been.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerTrail {
    pub position: LatLng,
    pub history: Vec<LatLng>,
}

impl PlayerTrail {
    /// A fresh trail standing at `start`.
    pub fn new(start: LatLng) -> Self {
        Self {
            position: start,
            history: vec![start],
        }
    }

    /// Restore a trail from saved values. An empty history is seeded with
    /// the position so the path always starts somewhere.
    pub fn restore(position: LatLng, mut history: Vec<LatLng>) -> Self {
        if history.is_empty() {
            history.push(position);
        }
        Self { position, history }
    }

    /// Step one tile in `dir`.
    pub fn step(&mut self, dir: Direction, tile_degrees: f64) -> LatLng {
        let (dlat, dlng) = dir.delta();
        let next = LatLng::new(
            self.position.lat + dlat * tile_degrees,
            self.position.lng + dlng * tile_degrees,
        );
        self.move_to(next)
    }

    /// Jump to `pos` (a geolocation fix), pinned to the map edges. Returns
    /// where the player actually ended up.
    pub fn move_to(&mut self, pos: LatLng) -> LatLng {
        let pos = pos.clamped_to_map();
        self.position = pos;
        self.history.push(pos);
        pos
    }
}
