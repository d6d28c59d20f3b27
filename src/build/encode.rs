use anyhow::{anyhow, bail, ensure, Result};
use bytes::Bytes;
use tracing::info;

use crate::grid::{encode_level, IndexData, RegionTable, TileEntry, RECORD_LEN};
use crate::tile::{Level, LEVELS};

use super::classify::Classification;
use super::color::{ColorTable, Rgb};

/// Size of one encoded level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelSummary {
    pub level: Level,
    pub entries: usize,
    pub raw_bytes: usize,
    pub compressed_bytes: usize,
}

/// Turn classified tiles into a persisted index.
///
/// The region table holds exactly the zones some recorded tile refers to. Each
/// level is sorted by key and compressed on its own.
pub fn encode(
    classification: &Classification,
    colors: &ColorTable,
    scale: u32,
) -> Result<(IndexData, Vec<LevelSummary>)> {
    let zone_of = |color: Rgb| {
        colors.zone(color)
            .ok_or_else(|| anyhow!("[build::encode] tile color {color} belongs to no zone"))
    };

    let names = classification.iter()
        .map(|&(_, color)| zone_of(color))
        .collect::<Result<Vec<_>>>()?;
    let regions = RegionTable::from_names(names);
    ensure!(
        regions.len() <= usize::from(u16::MAX),
        "[build::encode] {} zones exceed the 16-bit region index",
        regions.len()
    );
    info!("region table: {} zones", regions.len());

    let mut levels: [Bytes; LEVELS] = Default::default();
    let mut summaries = Vec::with_capacity(LEVELS);
    for level in Level::coarse_to_fine() {
        let tiles = classification.tiles_at(level);
        let mut entries = Vec::with_capacity(tiles.len());
        for &(key, color) in tiles {
            ensure!(key.level() == level, "[build::encode] {key} recorded at {level}");
            let zone = zone_of(color)?;
            let region = regions.index_of(zone)
                .ok_or_else(|| anyhow!("[build::encode] zone {zone:?} missing from the region table"))?;
            entries.push(TileEntry::new(key, region));
        }

        entries.sort_unstable_by_key(|entry| entry.key);
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].key >= pair[1].key) {
            bail!("[build::encode] {} recorded twice", pair[1].key);
        }

        let blob = encode_level(&entries)?;
        let summary = LevelSummary {
            level,
            entries: entries.len(),
            raw_bytes: entries.len() * RECORD_LEN,
            compressed_bytes: blob.len(),
        };
        info!(
            "{level}: {} entries, {} bytes ({} bytes compressed)",
            summary.entries, summary.raw_bytes, summary.compressed_bytes
        );
        levels[level.index()] = Bytes::from(blob);
        summaries.push(summary);
    }

    Ok((IndexData { scale, regions, levels }, summaries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::decode_level;
    use crate::tile::TileKey;

    fn level(l: u8) -> Level { Level::new(l).unwrap() }

    #[test]
    fn indexes_follow_sorted_names() {
        let mut colors = ColorTable::new();
        let rome = colors.assign("Europe/Rome").unwrap();
        let denver = colors.assign("America/Denver").unwrap();
        let boise = colors.assign("America/Boise").unwrap();
        colors.assign("Asia/Tokyo").unwrap();

        let mut classification = Classification::default();
        classification.tiles[5] = vec![
            (TileKey::new(level(5), 3, 0), rome),
            (TileKey::new(level(5), 0, 1), boise),
        ];
        // Out of scan order on purpose.
        classification.tiles[2] = vec![
            (TileKey::new(level(2), 9, 4), denver),
            (TileKey::new(level(2), 1, 4), rome),
        ];

        let (data, summaries) = encode(&classification, &colors, 32).unwrap();
        // Tokyo is painted nowhere, so it is not in the table.
        assert_eq!(data.regions.iter().collect::<Vec<_>>(), vec!["America/Boise", "America/Denver", "Europe/Rome"]);

        let coarse = decode_level(level(5), &data.levels[5], 3).unwrap();
        assert_eq!(coarse, vec![
            TileEntry::new(TileKey::new(level(5), 3, 0), 2),
            TileEntry::new(TileKey::new(level(5), 0, 1), 0),
        ]);
        let middle = decode_level(level(2), &data.levels[2], 3).unwrap();
        assert_eq!(middle, vec![
            TileEntry::new(TileKey::new(level(2), 1, 4), 2),
            TileEntry::new(TileKey::new(level(2), 9, 4), 1),
        ]);

        assert_eq!(summaries.len(), LEVELS);
        assert_eq!(summaries[0].level, Level::COARSEST);
        assert_eq!(summaries[0].raw_bytes, 12);
        assert_eq!(summaries[5].entries, 0);
    }

    #[test]
    fn unknown_color_is_fatal() {
        let mut classification = Classification::default();
        classification.tiles[0] = vec![(TileKey::new(Level::FINEST, 0, 0), Rgb::new(1, 2, 3))];
        assert!(encode(&classification, &ColorTable::new(), 32).is_err());
    }

    #[test]
    fn duplicate_tiles_are_fatal() {
        let mut colors = ColorTable::new();
        let utc = colors.assign("Etc/UTC").unwrap();
        let key = TileKey::new(level(1), 4, 4);
        let mut classification = Classification::default();
        classification.tiles[1] = vec![(key, utc), (key, utc)];
        assert!(encode(&classification, &colors, 32).is_err());
    }

    #[test]
    fn misfiled_tiles_are_fatal() {
        let mut colors = ColorTable::new();
        let utc = colors.assign("Etc/UTC").unwrap();
        let mut classification = Classification::default();
        classification.tiles[1] = vec![(TileKey::new(level(3), 0, 0), utc)];
        assert!(encode(&classification, &colors, 32).is_err());
    }
}
