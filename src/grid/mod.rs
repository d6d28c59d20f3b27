//! Runtime side: the persisted index and the read-only lookup structure.

#[cfg(feature = "embedded")]
mod embedded;
mod format;
mod region;
mod table;
mod world;
mod zone;

#[cfg(feature = "embedded")]
pub use embedded::lookup_zone_name;
pub use format::IndexData;
pub use region::RegionTable;
pub use table::{decode_level, encode_level, LevelTable, TileEntry, RECORD_LEN};
pub use world::WorldGrid;
pub use zone::ZoneLooker;
