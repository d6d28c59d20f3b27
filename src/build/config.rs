use anyhow::{ensure, Result};

use crate::tile::{Projection, DEFAULT_SCALE};

/// Zone name that marks a polygon as belonging to no zone.
pub const UNINHABITED: &str = "uninhabited";

/// Settings for one index generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Pixels per degree.
    pub scale: u32,
    /// Shapefile attribute holding the zone name.
    pub name_field: String,
    /// Reject zone names unknown to the IANA database.
    pub validate_zones: bool,
    /// Spans handed to the painter per rasterizer batch.
    pub span_buffer: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            name_field: "TZID".to_string(),
            validate_zones: true,
            span_buffer: 256,
        }
    }
}

impl GenerateConfig {
    /// Check the settings and return the projection they describe.
    pub fn validate(&self) -> Result<Projection> {
        ensure!(self.span_buffer > 0, "[build::config] span buffer must hold at least one span");
        ensure!(!self.name_field.is_empty(), "[build::config] name field must not be empty");
        Projection::new(self.scale)
    }
}
