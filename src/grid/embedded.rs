//! Index compiled into the binary. Build with `TZGRID_INDEX=/path/to/index cargo build --features embedded`.

use once_cell::sync::Lazy;
use tracing::error;

use super::world::WorldGrid;

static INDEX: &[u8] = include_bytes!(env!("TZGRID_INDEX"));

static GRID: Lazy<Option<WorldGrid>> = Lazy::new(|| {
    WorldGrid::from_bytes(INDEX)
        .inspect_err(|err| error!("{err:#}"))
        .ok()
});

/// Zone name at `(lat, lon)` from the embedded index, e.g. `"America/New_York"`.
///
/// Returns `None` over open ocean, near borders the index cannot resolve, or if
/// the embedded index is unreadable.
pub fn lookup_zone_name(lat: f64, lon: f64) -> Option<&'static str> {
    GRID.as_ref()?.lookup(lat, lon)
}
