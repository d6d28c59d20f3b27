#![doc = "Tile-based latitude/longitude to timezone lookup"]
mod common;

pub mod build;
pub mod grid;
pub mod raster;
pub mod tile;

#[doc(inline)]
pub use build::{generate, read_boundaries, Boundary, GenerateConfig, GenerateReport};

#[doc(inline)]
pub use grid::{IndexData, RegionTable, WorldGrid};

#[cfg(feature = "embedded")]
#[doc(inline)]
pub use grid::lookup_zone_name;

#[doc(inline)]
pub use tile::{Level, Projection, TileKey};
