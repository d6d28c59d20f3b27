use anyhow::{ensure, Result};

use super::key::{Level, FINEST_TILE, MAX_TILE_COORD};

/// Canonical pixels per degree.
pub const DEFAULT_SCALE: u32 = 32;

/// Equirectangular mapping from degrees to the integer pixel grid the tiles are cut from.
///
/// The grid is `360 * scale` pixels wide and `180 * scale` tall, with the
/// origin at (90°N, 180°W).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Projection {
    scale: u32,
}

impl Default for Projection {
    fn default() -> Self { Self { scale: DEFAULT_SCALE } }
}

impl Projection {
    /// Build a projection, rejecting scales the tile hierarchy cannot cover.
    pub fn new(scale: u32) -> Result<Self> {
        ensure!(scale > 0, "[tile::coord] scale must be positive");
        let projection = Self { scale };
        ensure!(
            projection.width() % FINEST_TILE == 0 && projection.height() % FINEST_TILE == 0,
            "[tile::coord] scale {scale} gives a {}x{} grid that is not a multiple of {FINEST_TILE} px",
            projection.width(),
            projection.height()
        );
        ensure!(
            projection.width() / FINEST_TILE <= MAX_TILE_COORD + 1,
            "[tile::coord] scale {scale} needs more than 14 bits of tile coordinate"
        );
        Ok(projection)
    }

    #[inline] pub fn scale(&self) -> u32 { self.scale }

    #[inline] pub fn width(&self) -> u32 { 360 * self.scale }

    #[inline] pub fn height(&self) -> u32 { 180 * self.scale }

    /// Number of tiles along each axis at `level`, counting the partial
    /// tiles that overhang the right and bottom edges.
    #[inline]
    pub fn tiles(&self, level: Level) -> (u32, u32) {
        let side = level.tile_side();
        (self.width().div_ceil(side), self.height().div_ceil(side))
    }

    /// Continuous pixel-space position of a (longitude, latitude) vertex.
    #[inline]
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let s = f64::from(self.scale);
        ((lon + 180.0) * s, (90.0 - lat) * s)
    }

    /// Pixel containing `(lat, lon)`.
    ///
    /// Points on the southern or eastern edge of the world are clamped into the
    /// last row/column. Returns `None` for non-finite or out-of-range input.
    pub fn pixel(&self, lat: f64, lon: f64) -> Option<(u32, u32)> {
        let in_range = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon);
        debug_assert!(in_range, "coordinate out of range: ({lat}, {lon})");
        if !in_range { return None }

        let (x, y) = self.project(lon, lat);
        let px = (x.floor() as u32).min(self.width() - 1);
        let py = (y.floor() as u32).min(self.height() - 1);
        Some((px, py))
    }
}
