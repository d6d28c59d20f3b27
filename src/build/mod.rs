//! Index generation: rasterize zone boundaries, classify tiles, encode levels.

mod classify;
mod color;
mod config;
mod encode;
mod generate;
mod occupancy;
mod source;

pub use classify::{classify, classify_tile, Classification, LevelStats, TileClass};
pub use color::{ColorTable, Rgb};
pub use config::{GenerateConfig, UNINHABITED};
pub use encode::{encode, LevelSummary};
pub use generate::{build_index, generate, GenerateReport, LevelReport};
pub use occupancy::{GridPainter, OccupancyGrid, Sample};
pub use source::{read_boundaries, validate_zone, Boundary};
