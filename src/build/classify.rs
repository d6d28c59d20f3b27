//! Hierarchical tile classification over the occupancy grid.

use anyhow::{bail, Result};
use smallvec::SmallVec;
use tracing::debug;

use crate::tile::{Level, TileKey, LEVELS};

use super::color::Rgb;
use super::occupancy::OccupancyGrid;

/// Outcome of scanning one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileClass {
    /// No zone pixel at all.
    Empty,
    /// A single zone. Empty pixels are tolerated except at the finest level.
    Uniform(Rgb),
    /// Needs a finer level (or stays unresolved at the finest).
    Mixed,
}

/// Per-level tile counts from one classification pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelStats {
    /// Tiles already covered by a coarser uniform or empty tile.
    pub skipped: usize,
    pub empty: usize,
    pub uniform: usize,
    pub mixed: usize,
}

/// Uniform tiles found at each level, indexed by `Level::index()`, in row-major scan order.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub tiles: [Vec<(TileKey, Rgb)>; LEVELS],
    pub stats: [LevelStats; LEVELS],
}

impl Classification {
    #[inline]
    pub fn tiles_at(&self, level: Level) -> &[(TileKey, Rgb)] { &self.tiles[level.index()] }

    #[inline]
    pub fn stats_at(&self, level: Level) -> &LevelStats { &self.stats[level.index()] }

    /// Every recorded tile, coarsest level first.
    pub fn iter(&self) -> impl Iterator<Item = &(TileKey, Rgb)> + '_ {
        Level::coarse_to_fine().flat_map(|level| self.tiles_at(level).iter())
    }
}

/// Classify every tile of `grid`, coarsest level first.
///
/// Uniform and empty tiles are erased from the grid so that finer levels skip
/// them; mixed tiles are left for the next level down. Tiles overhanging the
/// right or bottom edge are classified over their in-grid pixels.
pub fn classify(grid: &mut OccupancyGrid) -> Result<Classification> {
    let mut out = Classification::default();

    for level in Level::coarse_to_fine() {
        let side = level.tile_side();
        let (cols, rows) = (grid.width().div_ceil(side), grid.height().div_ceil(side));
        let stats = &mut out.stats[level.index()];
        let tiles = &mut out.tiles[level.index()];

        for ty in 0..rows {
            for tx in 0..cols {
                let (x0, y0) = (tx * side, ty * side);
                if grid.get(x0, y0).is_erased() {
                    stats.skipped += 1;
                    continue;
                }

                let class = classify_tile(grid, level, x0, y0)?;
                match class {
                    TileClass::Empty => stats.empty += 1,
                    TileClass::Uniform(color) => {
                        stats.uniform += 1;
                        tiles.push((TileKey::new(level, tx, ty), color));
                    }
                    TileClass::Mixed => {
                        stats.mixed += 1;
                        continue;
                    }
                }
                grid.erase(x0, y0, x0 + side, y0 + side);
            }
        }

        debug!(
            "{level}: skipped {}, empty {}, uniform {}, mixed {}",
            stats.skipped, stats.empty, stats.uniform, stats.mixed
        );
    }

    Ok(out)
}

/// Scan the tile at `level` whose top-left pixel is `(x0, y0)`.
///
/// The tile must not have been erased; finding an erased pixel inside it means
/// the erasure footprints of two levels disagree.
pub fn classify_tile(grid: &OccupancyGrid, level: Level, x0: u32, y0: u32) -> Result<TileClass> {
    let side = level.tile_side();
    let mut colors: SmallVec<[Rgb; 2]> = SmallVec::new();
    let mut saw_empty = false;

    let (x1, y1) = ((x0 + side).min(grid.width()), (y0 + side).min(grid.height()));

    for y in y0..y1 {
        for x in x0..x1 {
            let sample = grid.get(x, y);
            if sample.is_empty() {
                saw_empty = true;
                continue;
            }
            let Some(color) = sample.zone_color() else {
                bail!("[build::classify] erased pixel ({x}, {y}) inside unresolved tile at {level}");
            };
            if !colors.contains(&color) {
                colors.push(color);
                if colors.len() > 1 { return Ok(TileClass::Mixed) }
            }
        }
    }

    Ok(match colors.as_slice() {
        [] => TileClass::Empty,
        [color] if !(saw_empty && level.is_finest()) => TileClass::Uniform(*color),
        _ => TileClass::Mixed,
    })
}
