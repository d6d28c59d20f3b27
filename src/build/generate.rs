//! End-to-end index generation: boundaries in, persisted index out.

use anyhow::{Context, Result};
use geo::{Coord, MapCoords};
use tracing::{debug, info, warn};

use crate::grid::IndexData;
use crate::raster::{Rasterizer, SpanMerger};
use crate::tile::{Level, Projection};

use super::classify::{classify, LevelStats};
use super::color::ColorTable;
use super::config::{GenerateConfig, UNINHABITED};
use super::encode::encode;
use super::occupancy::OccupancyGrid;
use super::source::{validate_zone, Boundary};

/// What one level contributed to a generated index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelReport {
    pub level: Level,
    pub stats: LevelStats,
    pub entries: usize,
    pub raw_bytes: usize,
    pub compressed_bytes: usize,
}

/// Summary of a generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Distinct zones painted into the grid.
    pub zones: usize,
    /// Boundaries left out as uninhabited.
    pub skipped: usize,
    /// One entry per level, coarsest first.
    pub levels: Vec<LevelReport>,
}

impl GenerateReport {
    /// Records over every level.
    pub fn entries(&self) -> usize {
        self.levels.iter().map(|level| level.entries).sum()
    }

    /// Compressed payload over every level.
    pub fn compressed_bytes(&self) -> usize {
        self.levels.iter().map(|level| level.compressed_bytes).sum()
    }
}

/// Build an index from zone boundaries given in degrees.
pub fn generate<I>(boundaries: I, config: &GenerateConfig) -> Result<(IndexData, GenerateReport)>
where
    I: IntoIterator<Item = Boundary>,
{
    let projection = config.validate()?;
    info!(
        "generating index at {} px/deg ({}x{} px)",
        projection.scale(), projection.width(), projection.height()
    );

    let mut grid = OccupancyGrid::for_projection(&projection);
    let mut colors = ColorTable::new();
    let skipped = rasterize_boundaries(boundaries, config, &projection, &mut grid, &mut colors)?;
    info!("painted {} zones ({skipped} uninhabited boundaries skipped)", colors.len());

    build_index(&mut grid, &colors, projection.scale()).map(|(data, mut report)| {
        report.skipped = skipped;
        (data, report)
    })
}

/// Classify and encode an already painted grid.
pub fn build_index(grid: &mut OccupancyGrid, colors: &ColorTable, scale: u32) -> Result<(IndexData, GenerateReport)> {
    let classification = classify(grid)?;
    let (data, summaries) = encode(&classification, colors, scale)?;

    let levels = summaries.into_iter()
        .map(|summary| LevelReport {
            level: summary.level,
            stats: *classification.stats_at(summary.level),
            entries: summary.entries,
            raw_bytes: summary.raw_bytes,
            compressed_bytes: summary.compressed_bytes,
        })
        .collect();

    Ok((data, GenerateReport { zones: colors.len(), skipped: 0, levels }))
}

/// Paint every inhabited boundary into `grid`. Returns how many were skipped.
fn rasterize_boundaries<I>(
    boundaries: I,
    config: &GenerateConfig,
    projection: &Projection,
    grid: &mut OccupancyGrid,
    colors: &mut ColorTable,
) -> Result<usize>
where
    I: IntoIterator<Item = Boundary>,
{
    let mut rasterizer = Rasterizer::new(grid.width(), grid.height(), config.span_buffer);
    let mut skipped = 0;

    for boundary in boundaries {
        if boundary.name == UNINHABITED {
            skipped += 1;
            continue;
        }
        if boundary.shape.0.is_empty() {
            warn!("zone {} has no polygons", boundary.name);
            continue;
        }
        if config.validate_zones {
            validate_zone(&boundary.name)?;
        }

        let color = colors.assign(&boundary.name)
            .with_context(|| format!("[build::generate] Failed to assign a color to {}", boundary.name))?;
        debug!("painting {} as {color}", boundary.name);

        let shape = boundary.shape.map_coords(|c| {
            let (x, y) = projection.project(c.x, c.y);
            Coord { x, y }
        });
        let mut painter = SpanMerger::new(grid.painter(color));
        rasterizer.rasterize(&shape, &mut painter);
    }

    Ok(skipped)
}
