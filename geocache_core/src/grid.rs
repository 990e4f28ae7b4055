// Grid addressing: continuous world positions to discrete cells and back.
//
// A cell `(i, j)` covers latitudes `[i * tile, (i + 1) * tile)` and
// longitudes `[j * tile, (j + 1) * tile)`. `to_cell` floors, so negative
// coordinates land in negative cells and there is no double-width cell at
// the origin.
//
// Neighborhood enumeration uses the symmetric half-open range
// `[center - radius, center + radius)` on both axes: exactly
// `(2 * radius)^2` cells, visited row-major (i outer, j inner). The range
// is one cell wider to the south/west than to the north/east of the center.
//
// Cell indices are `i32`. `GameConfig::validate` keeps the tile large enough
// that every on-map position has a representable cell; positions beyond that
// saturate to the edge index, and a neighborhood touching the edge of the
// index space is clipped rather than wrapped.
//
// See also: `types.rs` for `Cell` and its canonical key, `store.rs` which
// decides which enumerated cells hold caches.

use crate::types::{Cell, LatLng};
use std::ops::Range;

/// South-west and north-east corners of a cell, for drawing its rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl CellBounds {
    /// Whether `pos` lies inside the half-open rectangle.
    pub fn contains(&self, pos: LatLng) -> bool {
        pos.lat >= self.south_west.lat
            && pos.lat < self.north_east.lat
            && pos.lng >= self.south_west.lng
            && pos.lng < self.north_east.lng
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

/// Fixed-size grid over the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    tile_degrees: f64,
}

impl Grid {
    /// `tile_degrees` must be positive; `GameConfig::validate` enforces this
    /// for configs loaded from disk.
    pub fn new(tile_degrees: f64) -> Self {
        debug_assert!(tile_degrees > 0.0, "tile_degrees must be positive");
        Self { tile_degrees }
    }

    pub fn tile_degrees(&self) -> f64 {
        self.tile_degrees
    }

    /// The cell containing `pos`. Saturates at the ends of the `i32` range.
    pub fn to_cell(&self, pos: LatLng) -> Cell {
        Cell::new(
            axis_index(pos.lat, self.tile_degrees),
            axis_index(pos.lng, self.tile_degrees),
        )
    }

    /// Corner pair of `cell`.
    pub fn cell_bounds(&self, cell: Cell) -> CellBounds {
        let t = self.tile_degrees;
        CellBounds {
            south_west: LatLng::new(f64::from(cell.i) * t, f64::from(cell.j) * t),
            north_east: LatLng::new(
                (f64::from(cell.i) + 1.0) * t,
                (f64::from(cell.j) + 1.0) * t,
            ),
        }
    }

    /// Center point of `cell`. Always maps back to `cell` under `to_cell`.
    pub fn cell_center(&self, cell: Cell) -> LatLng {
        let t = self.tile_degrees;
        LatLng::new(
            (f64::from(cell.i) + 0.5) * t,
            (f64::from(cell.j) + 0.5) * t,
        )
    }

    /// Cells of the `(2 * radius)^2` square around `center`, row-major.
    pub fn neighborhood(&self, center: Cell, radius: u32) -> impl Iterator<Item = Cell> + use<> {
        neighborhood(center, radius)
    }
}

/// Cells of the `(2 * radius)^2` square around `center`, row-major. Clipped
/// where the square runs past the ends of the index space.
pub fn neighborhood(center: Cell, radius: u32) -> impl Iterator<Item = Cell> {
    let rows = axis_span(center.i, radius);
    let cols = axis_span(center.j, radius);
    rows.flat_map(move |i| cols.clone().map(move |j| Cell::new(i, j)))
}

fn axis_index(degrees: f64, tile_degrees: f64) -> i32 {
    let index = (degrees / tile_degrees).floor();
    if index.is_nan() {
        return 0;
    }
    index.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// `[c - radius, c + radius)`, computed in `i64` and clipped to `i32`.
fn axis_span(c: i32, radius: u32) -> Range<i32> {
    let r = i64::from(radius);
    let lo = i32::try_from(i64::from(c) - r).unwrap_or(i32::MIN);
    let hi = i32::try_from(i64::from(c) + r).unwrap_or(i32::MAX);
    lo..hi
}
