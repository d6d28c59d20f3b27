//! Zone boundaries from a polygon shapefile.

use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use chrono_tz::Tz;
use geo::MultiPolygon;
use shapefile::{dbase::FieldValue, Shape};

use crate::common::{read_shapefile, shp_to_geo};

/// One zone polygon, in degrees (x = longitude, y = latitude).
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub name: String,
    pub shape: MultiPolygon<f64>,
}

impl Boundary {
    pub fn new(name: impl Into<String>, shape: impl Into<MultiPolygon<f64>>) -> Self {
        Self { name: name.into(), shape: shape.into() }
    }
}

/// Read every polygon of a shapefile, naming each by its `name_field` attribute.
pub fn read_boundaries(path: &Path, name_field: &str) -> Result<Vec<Boundary>> {
    let items = read_shapefile(path)?;

    items.into_iter()
        .enumerate()
        .map(|(i, (shape, record))| {
            let name = match record.get(name_field) {
                Some(FieldValue::Character(Some(name))) => name.trim().to_string(),
                Some(other) => bail!("[build::source] record {i}: field {name_field} is not text: {other:?}"),
                None => bail!("[build::source] record {i}: missing field {name_field}"),
            };
            let polygon = match shape {
                Shape::Polygon(polygon) => polygon,
                other => bail!("[build::source] record {i} ({name}): expected a polygon, found {:?}", other.shapetype()),
            };
            for ring in polygon.rings() {
                ensure!(
                    ring.points().len() >= 3,
                    "[build::source] record {i} ({name}): ring with {} points",
                    ring.points().len()
                );
            }
            Ok(Boundary::new(name, shp_to_geo(&polygon)))
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("[build::source] Malformed boundaries in {}", path.display()))
}

/// Fail unless `name` is a zone the IANA database knows.
pub fn validate_zone(name: &str) -> Result<()> {
    name.parse::<Tz>()
        .map(|_| ())
        .map_err(|err| anyhow!("[build::source] unknown zone {name:?}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_zones_validate() {
        assert!(validate_zone("America/Boise").is_ok());
        assert!(validate_zone("Europe/Rome").is_ok());
        assert!(validate_zone("Mars/Olympus_Mons").is_err());
    }
}
