//! Polygon scan conversion and the binary occupancy spans derived from it.

mod merge;
mod scan;
mod span;

pub use merge::SpanMerger;
pub use scan::Rasterizer;
pub use span::{Painter, Span, OPAQUE_THRESHOLD};
