// Core value types shared across the cache core.
//
// Defines `LatLng` (continuous world position), `Cell` (discrete grid
// square), and `Token` (a collectible with a stable identity). All derive
// `Serialize`/`Deserialize` for the durable store.
//
// Canonical string forms are part of the save-file format:
// - cell key:       `"{i},{j}"`         (memento map key, generator seed)
// - token identity: `"{i}_{j}_{serial}"` (memento entries, inventory records)
// Both parsers reject non-canonical spellings (`"05,5"`, `"+1_2_3"`) so the
// string forms stay injective.

use crate::error::{GeocacheError, GeocacheResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

pub const MAX_LAT: f64 = 90.0;
pub const MAX_LNG: f64 = 180.0;

/// A world position in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether the position is finite and within `[-90, 90] x [-180, 180]`.
    pub fn is_on_map(self) -> bool {
        (-MAX_LAT..=MAX_LAT).contains(&self.lat) && (-MAX_LNG..=MAX_LNG).contains(&self.lng)
    }

    /// This position pinned to the edges of the map. Players walking off the
    /// top stop at the pole rather than wandering into unrepresentable cells.
    pub fn clamped_to_map(self) -> Self {
        Self {
            lat: self.lat.clamp(-MAX_LAT, MAX_LAT),
            lng: self.lng.clamp(-MAX_LNG, MAX_LNG),
        }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// One square of the grid overlaid on the map.
///
/// `i` grows with latitude (north), `j` grows with longitude (east). The
/// coordinate space is unbounded in both axes; equality is the literal pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub i: i32,
    pub j: i32,
}

impl Cell {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Canonical key: `"{i},{j}"`.
    pub fn key(self) -> String {
        format!("{},{}", self.i, self.j)
    }

    /// Parse a canonical cell key back into a cell.
    pub fn from_key(key: &str) -> GeocacheResult<Self> {
        let invalid = || GeocacheError::InvalidCellKey(key.to_string());
        let (i, j) = key.split_once(',').ok_or_else(invalid)?;
        let cell = Self::new(i.parse().map_err(|_| invalid())?, j.parse().map_err(|_| invalid())?);
        if cell.key() != key {
            return Err(invalid());
        }
        Ok(cell)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// A collectible unit. Identity is fixed at spawn time from the originating
/// cell and the token's sequence number within that cache, and never changes
/// as the token moves between caches and the inventory.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "TokenRecord", try_from = "TokenRecord")]
pub struct Token {
    origin: Cell,
    serial: u32,
}

impl Token {
    pub const fn new(origin: Cell, serial: u32) -> Self {
        Self { origin, serial }
    }

    pub fn origin(&self) -> Cell {
        self.origin
    }

    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// Stable identity string, `"{i}_{j}_{serial}"`.
    pub fn identity(&self) -> String {
        format!("{}_{}_{}", self.origin.i, self.origin.j, self.serial)
    }

    /// Human-readable label. Same as the identity.
    pub fn label(&self) -> String {
        self.identity()
    }

    /// Parse a token from its identity string.
    pub fn from_identity(identity: &str) -> GeocacheResult<Self> {
        let invalid = || GeocacheError::InvalidTokenId(identity.to_string());
        // Split from the right: the row index may carry a leading '-'.
        let mut parts = identity.rsplitn(3, '_');
        let serial = parts.next().ok_or_else(invalid)?;
        let j = parts.next().ok_or_else(invalid)?;
        let i = parts.next().ok_or_else(invalid)?;
        let token = Self::new(
            Cell::new(i.parse().map_err(|_| invalid())?, j.parse().map_err(|_| invalid())?),
            serial.parse().map_err(|_| invalid())?,
        );
        if token.identity() != identity {
            return Err(invalid());
        }
        Ok(token)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.origin.i, self.origin.j, self.serial)
    }
}

/// On-disk shape of a token: `{"identity": "...", "originCell": {"i":..,"j":..}}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct TokenRecord {
    identity: String,
    #[serde(rename = "originCell")]
    origin_cell: Cell,
}

impl From<Token> for TokenRecord {
    fn from(token: Token) -> Self {
        Self {
            identity: token.identity(),
            origin_cell: token.origin,
        }
    }
}

impl TryFrom<TokenRecord> for Token {
    type Error = GeocacheError;

    fn try_from(record: TokenRecord) -> GeocacheResult<Self> {
        let token = Token::from_identity(&record.identity)?;
        if token.origin != record.origin_cell {
            return Err(GeocacheError::InvalidTokenId(format!(
                "{} (record claims origin {})",
                record.identity, record.origin_cell
            )));
        }
        Ok(token)
    }
}
