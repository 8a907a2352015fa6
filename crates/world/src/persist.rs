//! Grid snapshot persistence with zstd compression.
//!
//! A `.grid` file is a 14-byte header (magic, version, CRC32, payload
//! length) followed by a zstd-compressed bincode payload. The CRC covers the
//! compressed payload.

use crate::grid::Grid;
use anyhow::{Context, Result};
use crc32fast::Hasher;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Magic number for grid snapshot identification ("GFGD" = gridforge grid).
const GRID_MAGIC: u32 = 0x47464744;

/// Current snapshot format version.
const GRID_VERSION: u16 = 1;

/// zstd compression level for snapshots.
const COMPRESSION_LEVEL: i32 = 3;

#[derive(Debug, Clone)]
struct SnapshotHeader {
    magic: u32,
    version: u16,
    crc32: u32,
    payload_len: u32,
}

impl SnapshotHeader {
    fn new(crc32: u32, payload_len: u32) -> Self {
        Self {
            magic: GRID_MAGIC,
            version: GRID_VERSION,
            crc32,
            payload_len,
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(14);
        bytes.extend_from_slice(&self.magic.to_le_bytes());
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(&self.crc32.to_le_bytes());
        bytes.extend_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 14 {
            anyhow::bail!("Snapshot header too short");
        }
        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != GRID_MAGIC {
            anyhow::bail!(
                "Invalid snapshot magic: expected 0x{:08X}, got 0x{:08X}",
                GRID_MAGIC,
                magic
            );
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != GRID_VERSION {
            anyhow::bail!(
                "Unsupported snapshot version: expected {}, got {}",
                GRID_VERSION,
                version
            );
        }
        let crc32 = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
        let payload_len = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);
        Ok(Self {
            magic,
            version,
            crc32,
            payload_len,
        })
    }
}

/// Write a grid snapshot to `path`, creating parent directories as needed.
pub fn save_grid<P: AsRef<Path>>(path: P, grid: &Grid) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create snapshot directory {}", parent.display()))?;
    }

    let payload = bincode::serialize(grid).context("Failed to serialize grid")?;
    let compressed = zstd::encode_all(payload.as_slice(), COMPRESSION_LEVEL)
        .context("Failed to compress grid snapshot")?;

    let mut hasher = Hasher::new();
    hasher.update(&compressed);
    let header = SnapshotHeader::new(hasher.finalize(), compressed.len() as u32);

    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(&header.to_bytes())?;
    file.write_all(&compressed)?;
    debug!(
        path = %path.display(),
        raw = payload.len(),
        compressed = compressed.len(),
        "grid snapshot written"
    );
    Ok(())
}

/// Read a grid snapshot from `path`, validating the CRC before decoding.
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let path = path.as_ref();
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let mut header_bytes = [0u8; 14];
    file.read_exact(&mut header_bytes)
        .with_context(|| format!("Failed to read snapshot header from {}", path.display()))?;
    let header = SnapshotHeader::from_bytes(&header_bytes)?;

    let mut compressed = vec![0u8; header.payload_len as usize];
    file.read_exact(&mut compressed)
        .with_context(|| format!("Failed to read snapshot payload from {}", path.display()))?;

    let mut hasher = Hasher::new();
    hasher.update(&compressed);
    let crc = hasher.finalize();
    if crc != header.crc32 {
        anyhow::bail!(
            "Snapshot CRC mismatch: expected 0x{:08X}, got 0x{:08X}",
            header.crc32,
            crc
        );
    }

    let payload =
        zstd::decode_all(compressed.as_slice()).context("Failed to decompress grid snapshot")?;
    let grid: Grid =
        bincode::deserialize(&payload).context("Failed to deserialize grid snapshot")?;
    debug!(path = %path.display(), cells = grid.cells().len(), "grid snapshot loaded");
    Ok(grid)
}
