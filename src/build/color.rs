//! Stable raster colors for zone names.

use std::fmt;

use ahash::AHashMap;
use anyhow::{bail, Result};

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Color derived from the CRC-32 of a zone name (top three bytes).
    pub fn for_zone(name: &str) -> Self {
        let hash = crc32fast::hash(name.as_bytes());
        Self::new((hash >> 24) as u8, (hash >> 16) as u8, (hash >> 8) as u8)
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Bijection between raster colors and the zone names painted with them.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    zones: AHashMap<Rgb, String>,
}

impl ColorTable {
    pub fn new() -> Self { Self::default() }

    /// Color for `name`, registering it on first use.
    /// Fails if a different zone already owns the same color.
    pub fn assign(&mut self, name: &str) -> Result<Rgb> {
        let color = Rgb::for_zone(name);
        self.insert(color, name)?;
        Ok(color)
    }

    /// Register an explicit color for `name`.
    pub fn insert(&mut self, color: Rgb, name: &str) -> Result<()> {
        if let Some(existing) = self.zones.get(&color) {
            if existing != name {
                bail!("[build::color] color {color} is shared by {existing:?} and {name:?}");
            }
            return Ok(());
        }
        self.zones.insert(color, name.to_string());
        Ok(())
    }

    /// Zone painted with `color`, if any.
    #[inline]
    pub fn zone(&self, color: Rgb) -> Option<&str> {
        self.zones.get(&color).map(String::as_str)
    }

    #[inline] pub fn len(&self) -> usize { self.zones.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.zones.is_empty() }
}
