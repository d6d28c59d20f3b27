use crate::tile::{Level, TileKey};

use super::table::LevelTable;

/// One stage of a lookup: turns a pixel into a region index.
#[derive(Debug)]
pub enum ZoneLooker {
    /// Every pixel belongs to the same region.
    Static(u16),
    /// Pixels resolve through one level's tile table; unrecorded tiles miss.
    Tiles(LevelTable),
}

impl ZoneLooker {
    /// The level a hit from this looker is reported at.
    #[inline]
    pub fn level(&self) -> Level {
        match self {
            Self::Static(_) => Level::COARSEST,
            Self::Tiles(table) => table.level(),
        }
    }

    /// Region index for pixel `(px, py)`, if this looker knows it.
    #[inline]
    pub fn lookup(&self, px: u32, py: u32) -> Option<u16> {
        match self {
            Self::Static(region) => Some(*region),
            Self::Tiles(table) => table.find(TileKey::containing(table.level(), px, py)),
        }
    }
}
