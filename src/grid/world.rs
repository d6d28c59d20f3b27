use std::path::Path;

use anyhow::{ensure, Context, Result};
use bytes::Bytes;

use crate::tile::{Level, Projection};

use super::format::IndexData;
use super::region::RegionTable;
use super::table::LevelTable;
use super::zone::ZoneLooker;

/// Read-only lat/long to zone index.
///
/// Built once from an [`IndexData`]; level tables decompress on first use and
/// are then shared by every caller. Safe to query from any number of threads.
#[derive(Debug)]
pub struct WorldGrid {
    projection: Projection,
    regions: RegionTable,
    /// Probed in order; coarsest level first.
    lookers: Vec<ZoneLooker>,
}

impl WorldGrid {
    /// Wrap a parsed index. Nothing is decompressed yet.
    pub fn new(data: IndexData) -> Result<Self> {
        let projection = Projection::new(data.scale)
            .context("[grid::world] index has an unusable scale")?;
        let regions = data.regions;
        let lookers = Level::coarse_to_fine()
            .map(|level| {
                let blob = data.levels[level.index()].clone();
                ZoneLooker::Tiles(LevelTable::new(level, blob, regions.len()))
            })
            .collect();
        Ok(Self { projection, regions, lookers })
    }

    /// Parse an index from its persisted bytes.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Result<Self> {
        Self::new(IndexData::from_bytes(bytes)?)
    }

    /// Open an index file.
    pub fn open(path: &Path) -> Result<Self> {
        Self::new(IndexData::read(path)?)
    }

    /// A grid that answers `zone` for every coordinate.
    pub fn single_zone(zone: &str) -> Self {
        Self {
            projection: Projection::default(),
            regions: RegionTable::from_names([zone]),
            lookers: vec![ZoneLooker::Static(0)],
        }
    }

    #[inline] pub fn projection(&self) -> &Projection { &self.projection }

    #[inline] pub fn regions(&self) -> &RegionTable { &self.regions }

    /// Per-level tables, coarsest first. Empty for a single-zone grid.
    pub fn levels(&self) -> impl Iterator<Item = &LevelTable> + '_ {
        self.lookers.iter().filter_map(|looker| match looker {
            ZoneLooker::Tiles(table) => Some(table),
            ZoneLooker::Static(_) => None,
        })
    }

    /// Zone at `(lat, lon)`, or `None` over open ocean and near borders too
    /// fine for the index.
    #[inline]
    pub fn lookup(&self, lat: f64, lon: f64) -> Option<&str> {
        self.lookup_with_level(lat, lon).map(|(zone, _)| zone)
    }

    /// Like [`lookup`](Self::lookup), also reporting the level that answered.
    pub fn lookup_with_level(&self, lat: f64, lon: f64) -> Option<(&str, Level)> {
        let (px, py) = self.projection.pixel(lat, lon)?;
        self.lookers.iter().find_map(|looker| {
            let region = looker.lookup(px, py)?;
            Some((self.regions.name(region)?, looker.level()))
        })
    }

    /// Decompress and check every level now.
    pub fn verify(&self) -> Result<()> {
        for table in self.levels() {
            let entries = table.try_entries()
                .with_context(|| format!("[grid::world] {} failed verification", table.level()))?;
            let (cols, rows) = self.projection.tiles(table.level());
            for entry in entries {
                ensure!(
                    entry.key.x() < cols && entry.key.y() < rows,
                    "[grid::world] {} lies outside the {cols}x{rows} tile grid",
                    entry.key
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::table::{encode_level, TileEntry};
    use crate::tile::{TileKey, LEVELS};

    fn level(l: u8) -> Level { Level::new(l).unwrap() }

    /// Scale 4 grid: 1440 x 720 px.
    fn handmade() -> WorldGrid {
        let mut levels: [Bytes; LEVELS] = Default::default();
        levels[5] = Bytes::from(encode_level(&[TileEntry::new(TileKey::new(level(5), 0, 0), 1)]).unwrap());
        levels[0] = Bytes::from(encode_level(&[TileEntry::new(TileKey::new(level(0), 40, 40), 0)]).unwrap());
        WorldGrid::new(IndexData {
            scale: 4,
            regions: RegionTable::from_names(["Asia/Tokyo", "Europe/Rome"]),
            levels,
        })
        .unwrap()
    }

    #[test]
    fn probes_coarse_to_fine() {
        let grid = handmade();
        // px (0..256, 0..256) is the level 5 tile.
        assert_eq!(grid.lookup_with_level(89.0, -179.0), Some(("Europe/Rome", level(5))));
        // px (320..328, 320..328) is the level 0 tile.
        assert_eq!(grid.lookup_with_level(90.0 - 81.0, -180.0 + 81.0), Some(("Asia/Tokyo", level(0))));
        assert_eq!(grid.lookup(0.0, 0.0), None);
    }

    #[test]
    fn levels_stay_compressed_until_needed() {
        let grid = handmade();
        assert!(grid.levels().all(|table| !table.is_decoded()));
        grid.lookup(89.0, -179.0);
        let decoded: Vec<bool> = grid.levels().map(LevelTable::is_decoded).collect();
        assert_eq!(decoded, vec![true, false, false, false, false, false]);
    }

    #[test]
    fn single_zone_answers_everywhere_at_the_coarsest_level() {
        let grid = WorldGrid::single_zone("Etc/UTC");
        for (lat, lon) in [(0.0, 0.0), (90.0, -180.0), (-90.0, 180.0), (51.5, -0.1)] {
            assert_eq!(grid.lookup_with_level(lat, lon), Some(("Etc/UTC", Level::COARSEST)));
        }
        assert_eq!(grid.levels().count(), 0);
        assert!(grid.verify().is_ok());
    }

    #[test]
    fn verify_flags_out_of_grid_tiles() {
        let mut levels: [Bytes; LEVELS] = Default::default();
        levels[5] = Bytes::from(encode_level(&[TileEntry::new(TileKey::new(level(5), 9, 0), 0)]).unwrap());
        let grid = WorldGrid::new(IndexData { scale: 4, regions: RegionTable::from_names(["UTC"]), levels }).unwrap();
        assert!(grid.verify().is_err());
        assert!(handmade().verify().is_ok());
    }

    #[test]
    fn verify_reports_corruption_already_hit_by_lookups() {
        let mut levels: [Bytes; LEVELS] = Default::default();
        levels[5] = Bytes::from_static(b"garbage");
        let grid = WorldGrid::new(IndexData { scale: 4, regions: RegionTable::from_names(["UTC"]), levels }).unwrap();
        assert_eq!(grid.lookup(89.0, -179.0), None);
        assert!(grid.verify().is_err());
    }
}
