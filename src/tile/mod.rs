mod coord;
mod key;

pub use coord::{Projection, DEFAULT_SCALE};
pub use key::{Level, TileKey, FINEST_TILE, LEVELS, MAX_TILE_COORD};
