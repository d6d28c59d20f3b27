//! Persisted index container.
//!
//! ```text
//! "TZGI" | version u8 | scale u16 | regions u16 | (len u16, utf-8 name) * regions
//!        | (len u32, gzip blob) * 6 levels, finest first
//! ```
//! All integers are big-endian.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use bytes::Bytes;

use crate::common::ensure_dir_exists;
use crate::tile::LEVELS;

use super::region::RegionTable;

/// Magic bytes for the index format: "TZGI" (TZ Grid Index)
const MAGIC: &[u8] = b"TZGI";
/// Format version (currently 1)
const VERSION: u8 = 1;

/// A complete index in its persisted form: region names plus one compressed blob per level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexData {
    /// Pixels per degree the tiles were cut at.
    pub scale: u32,
    pub regions: RegionTable,
    /// Compressed records, indexed by `Level::index()`.
    pub levels: [Bytes; LEVELS],
}

impl IndexData {
    /// Serialize to the container format.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        write_index(&mut out, self)?;
        Ok(out)
    }

    /// Parse the container. Level blobs are sliced out of `bytes` without copying
    /// and are not decompressed here.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Result<Self> {
        read_index(bytes.into())
    }

    /// Write the index to `path`, creating the parent directory if needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir_exists(parent)?;
        }
        std::fs::write(path, self.to_bytes()?)
            .with_context(|| format!("[grid::format] Failed to write {}", path.display()))
    }

    /// Read an index file.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("[grid::format] Failed to read {}", path.display()))?;
        Self::from_bytes(bytes)
    }
}

fn write_index<W: Write>(writer: &mut W, data: &IndexData) -> Result<()> {
    let scale = u16::try_from(data.scale)
        .context("[grid::format] scale does not fit in 16 bits")?;
    let regions = u16::try_from(data.regions.len())
        .context("[grid::format] too many regions for 16-bit indices")?;

    // Header
    writer.write_all(MAGIC)
        .context("[grid::format] Failed to write magic bytes")?;
    writer.write_all(&[VERSION])
        .context("[grid::format] Failed to write version")?;
    writer.write_all(&scale.to_be_bytes())
        .context("[grid::format] Failed to write scale")?;
    writer.write_all(&regions.to_be_bytes())
        .context("[grid::format] Failed to write region count")?;

    // Region names
    for name in data.regions.iter() {
        let len = u16::try_from(name.len())
            .with_context(|| format!("[grid::format] region name too long: {name}"))?;
        writer.write_all(&len.to_be_bytes())
            .context("[grid::format] Failed to write region name length")?;
        writer.write_all(name.as_bytes())
            .context("[grid::format] Failed to write region name")?;
    }

    // Level blobs
    for blob in &data.levels {
        let len = u32::try_from(blob.len())
            .context("[grid::format] level blob larger than 4 GiB")?;
        writer.write_all(&len.to_be_bytes())
            .context("[grid::format] Failed to write level length")?;
        writer.write_all(blob)
            .context("[grid::format] Failed to write level data")?;
    }

    Ok(())
}

fn read_index(bytes: Bytes) -> Result<IndexData> {
    let mut reader = Cursor::new(&bytes[..]);

    // Header
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)
        .context("[grid::format] Failed to read magic bytes")?;
    ensure!(&magic[..] == MAGIC, "[grid::format] Invalid index magic: expected 'TZGI'");

    let mut b1 = [0u8; 1];
    reader.read_exact(&mut b1)
        .context("[grid::format] Failed to read version")?;
    ensure!(b1[0] == VERSION, "[grid::format] Unsupported index version {} (expected {VERSION})", b1[0]);

    let mut b2 = [0u8; 2];
    reader.read_exact(&mut b2)
        .context("[grid::format] Failed to read scale")?;
    let scale = u32::from(u16::from_be_bytes(b2));

    reader.read_exact(&mut b2)
        .context("[grid::format] Failed to read region count")?;
    let count = usize::from(u16::from_be_bytes(b2));

    // Region names
    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        reader.read_exact(&mut b2)
            .context("[grid::format] Failed to read region name length")?;
        let mut name = vec![0u8; usize::from(u16::from_be_bytes(b2))];
        reader.read_exact(&mut name)
            .context("[grid::format] Failed to read region name")?;
        names.push(String::from_utf8(name).context("[grid::format] region name is not UTF-8")?);
    }
    let regions = RegionTable::from_names(&names);
    ensure!(
        regions.iter().eq(names.iter().map(String::as_str)),
        "[grid::format] region names are not sorted and unique"
    );

    // Level blobs
    let mut levels: [Bytes; LEVELS] = Default::default();
    let mut b4 = [0u8; 4];
    for blob in &mut levels {
        reader.read_exact(&mut b4)
            .context("[grid::format] Failed to read level length")?;
        let len = u32::from_be_bytes(b4) as usize;
        let start = reader.position() as usize;
        ensure!(start + len <= bytes.len(), "[grid::format] level data truncated");
        *blob = bytes.slice(start..start + len);
        reader.set_position((start + len) as u64);
    }
    ensure!(reader.position() as usize == bytes.len(), "[grid::format] trailing bytes after index");

    Ok(IndexData { scale, regions, levels })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IndexData {
        let mut levels: [Bytes; LEVELS] = Default::default();
        levels[0] = Bytes::from_static(b"finest");
        levels[5] = Bytes::from_static(b"coarsest");
        IndexData {
            scale: 32,
            regions: RegionTable::from_names(["Europe/Rome", "America/Boise"]),
            levels,
        }
    }

    #[test]
    fn container_round_trip() {
        let data = sample();
        let bytes = data.to_bytes().unwrap();
        assert_eq!(&bytes[..5], b"TZGI\x01");
        assert_eq!(IndexData::from_bytes(bytes).unwrap(), data);
    }

    #[test]
    fn rejects_damaged_containers() {
        let bytes = sample().to_bytes().unwrap();

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(IndexData::from_bytes(bad_magic).is_err());

        let mut bad_version = bytes.clone();
        bad_version[4] = 9;
        assert!(IndexData::from_bytes(bad_version).is_err());

        assert!(IndexData::from_bytes(bytes[..bytes.len() - 1].to_vec()).is_err());

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(IndexData::from_bytes(trailing).is_err());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tz.idx");
        let data = sample();
        data.write(&path).unwrap();
        assert_eq!(IndexData::read(&path).unwrap(), data);
    }
}
