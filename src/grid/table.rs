//! Per-level tile tables: fixed-width big-endian records in an independent gzip stream.

use std::io::{Read, Write};

use anyhow::{bail, ensure, Context, Result};
use bytes::Bytes;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression as Flate2Compression;
use once_cell::sync::OnceCell;
use tracing::error;

use crate::tile::{Level, TileKey};

/// Bytes per record: 4 for the tile key, 2 for the region index.
pub const RECORD_LEN: usize = 6;

/// One uniform tile and the zone it resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileEntry {
    pub key: TileKey,
    pub region: u16,
}

impl TileEntry {
    #[inline]
    pub fn new(key: TileKey, region: u16) -> Self { Self { key, region } }
}

/// Serialize and compress one level's entries. Entries must already be sorted by key.
pub fn encode_level(entries: &[TileEntry]) -> Result<Vec<u8>> {
    let mut raw = Vec::with_capacity(entries.len() * RECORD_LEN);
    for entry in entries {
        raw.extend_from_slice(&entry.key.raw().to_be_bytes());
        raw.extend_from_slice(&entry.region.to_be_bytes());
    }

    let mut encoder = GzEncoder::new(Vec::new(), Flate2Compression::best());
    encoder.write_all(&raw)
        .context("[grid::table] Failed to compress level records")?;
    encoder.finish()
        .context("[grid::table] Failed to finish compression")
}

/// Decompress and parse one level's entries, checking every persisted invariant:
/// whole records, keys at `level`, strictly increasing keys, region indices below `regions`.
pub fn decode_level(level: Level, blob: &[u8], regions: usize) -> Result<Vec<TileEntry>> {
    if blob.is_empty() { return Ok(Vec::new()) }

    let mut raw = Vec::new();
    GzDecoder::new(blob).read_to_end(&mut raw)
        .with_context(|| format!("[grid::table] Failed to decompress {level}"))?;
    ensure!(
        raw.len() % RECORD_LEN == 0,
        "[grid::table] {level}: {} bytes is not a whole number of records",
        raw.len()
    );

    let mut entries: Vec<TileEntry> = Vec::with_capacity(raw.len() / RECORD_LEN);
    for record in raw.chunks_exact(RECORD_LEN) {
        let key = TileKey::from_raw(u32::from_be_bytes([record[0], record[1], record[2], record[3]]));
        let region = u16::from_be_bytes([record[4], record[5]]);

        ensure!(key.level() == level, "[grid::table] {key} stored in {level}");
        ensure!(
            usize::from(region) < regions,
            "[grid::table] {key} refers to region {region} of {regions}"
        );
        if let Some(previous) = entries.last() {
            ensure!(previous.key < key, "[grid::table] {level}: {key} does not follow {}", previous.key);
        }
        entries.push(TileEntry::new(key, region));
    }
    Ok(entries)
}

/// One level's compressed records, decompressed on first use and cached.
///
/// Decoding happens at most once per table; concurrent first readers wait for
/// the winner and then all see the complete, immutable entry list.
#[derive(Debug)]
pub struct LevelTable {
    level: Level,
    regions: usize,
    blob: Bytes,
    /// `None` once the blob has failed to decode.
    entries: OnceCell<Option<Box<[TileEntry]>>>,
}

impl LevelTable {
    /// `regions` is the size of the region table the records index into.
    pub fn new(level: Level, blob: Bytes, regions: usize) -> Self {
        Self { level, regions, blob, entries: OnceCell::new() }
    }

    #[inline] pub fn level(&self) -> Level { self.level }

    #[inline] pub fn compressed(&self) -> &Bytes { &self.blob }

    #[inline] pub fn is_decoded(&self) -> bool { self.entries.get().is_some() }

    fn decoded(&self) -> Option<&[TileEntry]> {
        self.entries
            .get_or_init(|| match decode_level(self.level, &self.blob, self.regions) {
                Ok(entries) => Some(entries.into_boxed_slice()),
                Err(err) => {
                    error!("{:#}", err.context(format!("[grid::table] {} is unreadable", self.level)));
                    None
                }
            })
            .as_deref()
    }

    /// Decoded entries, failing loudly on corrupt data every time they are asked for.
    pub fn try_entries(&self) -> Result<&[TileEntry]> {
        if let Some(entries) = self.decoded() { return Ok(entries) }
        // Decode again for the error itself; only corrupt tables get here.
        decode_level(self.level, &self.blob, self.regions)?;
        bail!("[grid::table] {} is unreadable", self.level)
    }

    /// Decoded entries. A corrupt table is logged once and treated as empty.
    pub fn entries(&self) -> &[TileEntry] {
        self.decoded().unwrap_or(&[])
    }

    /// Region index of the tile `key`, if this level recorded it.
    #[inline]
    pub fn find(&self, key: TileKey) -> Option<u16> {
        let entries = self.entries();
        entries
            .binary_search_by_key(&key, |entry| entry.key)
            .ok()
            .map(|idx| entries[idx].region)
    }
}
