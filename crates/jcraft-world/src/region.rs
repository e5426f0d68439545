//! Anvil region-file loading, for world bootstrap.
//!
//! A region file packs up to 1024 chunks. The first 4 KiB is a location
//! table of big-endian u32 entries (3-byte sector offset, 1-byte sector
//! count); each chunk blob is a big-endian u32 length, a one-byte
//! compression tag, and a zlib-compressed NBT document.

use std::io::Read;
use std::path::Path;

use flate2::read::ZlibDecoder;
use tracing::warn;

use jcraft_nbt::{NbtReader, Payload, Tag};

use crate::block_state::BlockKind;
use crate::catalog::{Catalog, AIR_ID};
use crate::chunk::{Chunk, GenerationStatus};
use crate::error::WorldError;
use crate::section::ChunkSection;

/// DataVersion written by 1.18.2.
pub const DATA_VERSION_1_18_2: i32 = 2975;

const SECTOR_BYTES: usize = 4096;
const COMPRESSION_ZLIB: u8 = 2;

/// An in-memory region file.
pub struct RegionFile {
    data: Vec<u8>,
}

impl RegionFile {
    /// Read a region file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, WorldError> {
        if data.len() < 2 * SECTOR_BYTES {
            return Err(WorldError::MalformedRegion(format!(
                "file is {} bytes, shorter than its header",
                data.len()
            )));
        }
        Ok(Self { data })
    }

    /// Byte range of a chunk's blob, or `None` when the chunk is absent.
    fn location(&self, x: i32, z: i32) -> Option<(usize, usize)> {
        let index = (x.rem_euclid(32) + z.rem_euclid(32) * 32) as usize;
        let entry = u32::from_be_bytes(self.data[index * 4..index * 4 + 4].try_into().unwrap());
        let offset = ((entry >> 8) & 0xFF_FFFF) as usize * SECTOR_BYTES;
        let sectors = (entry & 0xFF) as usize;
        if sectors == 0 {
            None
        } else {
            Some((offset, sectors * SECTOR_BYTES))
        }
    }

    /// Load and materialize one chunk. `Ok(None)` when the region has no
    /// chunk at that position.
    pub fn read_chunk(
        &self,
        x: i32,
        z: i32,
        catalog: &Catalog,
    ) -> Result<Option<Chunk>, WorldError> {
        let Some((offset, max_len)) = self.location(x, z) else {
            return Ok(None);
        };
        if offset + 5 > self.data.len() {
            return Err(WorldError::MalformedRegion(format!(
                "chunk ({x}, {z}) points past the file"
            )));
        }
        let declared =
            u32::from_be_bytes(self.data[offset..offset + 4].try_into().unwrap()) as usize;
        if declared < 1 || declared > max_len || offset + 4 + declared > self.data.len() {
            return Err(WorldError::MalformedRegion(format!(
                "chunk ({x}, {z}) declares {declared} bytes"
            )));
        }
        let compression = self.data[offset + 4];
        if compression != COMPRESSION_ZLIB {
            return Err(WorldError::UnsupportedCompression(compression));
        }
        let compressed = &self.data[offset + 5..offset + 4 + declared];
        let mut nbt = Vec::new();
        ZlibDecoder::new(compressed)
            .read_to_end(&mut nbt)
            .map_err(|e| WorldError::MalformedChunk(format!("zlib: {e}")))?;
        parse_chunk(&nbt, catalog).map(Some)
    }
}

// ---------------------------------------------------------------------------
// Chunk NBT walk
// ---------------------------------------------------------------------------

/// Materialize a chunk from its decompressed NBT document.
pub fn parse_chunk(data: &[u8], catalog: &Catalog) -> Result<Chunk, WorldError> {
    let mut r = NbtReader::new(data);
    let root = r.next()?;
    if root.payload != Payload::Compound {
        return Err(WorldError::MalformedChunk("root is not a compound".into()));
    }

    let mut data_version = 0;
    let mut x = 0;
    let mut z = 0;
    let mut min_section_y = -4;
    let mut status = GenerationStatus::Full;
    let mut last_update = 0;
    let mut inhabited_time = 0;
    let mut raw_sections: Vec<(i32, ChunkSection)> = Vec::new();

    loop {
        let token = r.next()?;
        match (token.name, token.payload) {
            (None, Payload::End) => break,
            (Some("DataVersion"), Payload::Int(v)) => data_version = v,
            (Some("xPos"), Payload::Int(v)) => x = v,
            (Some("zPos"), Payload::Int(v)) => z = v,
            (Some("yPos"), Payload::Int(v)) => min_section_y = v,
            (Some("Status"), Payload::String(s)) => {
                status = GenerationStatus::from_name(s).unwrap_or_else(|| {
                    warn!("unknown generation status {s:?}, assuming full");
                    GenerationStatus::Full
                });
            }
            (Some("LastUpdate"), Payload::Long(v)) => last_update = v,
            (Some("InhabitedTime"), Payload::Long(v)) => inhabited_time = v,
            (Some("sections"), Payload::List { element, len }) => {
                if element == Tag::Compound {
                    for _ in 0..len.max(0) {
                        raw_sections.push(parse_section(&mut r, catalog)?);
                    }
                } else {
                    r.skip(&Payload::List { element, len })?;
                }
            }
            (_, payload) => r.skip(&payload)?,
        }
    }

    // Stack sections from low to high Y, filling holes with air.
    raw_sections.sort_by_key(|&(y, _)| y);
    let max_section_y = raw_sections.last().map(|&(y, _)| y).unwrap_or(min_section_y);
    let count = (max_section_y - min_section_y + 1).max(0) as usize;
    let mut sections: Vec<ChunkSection> =
        (0..count).map(|_| ChunkSection::uniform(AIR_ID)).collect();
    for (y, section) in raw_sections {
        if y < min_section_y {
            warn!("section y={y} below chunk floor {min_section_y}, dropped");
            continue;
        }
        sections[(y - min_section_y) as usize] = section;
    }

    Ok(Chunk {
        data_version,
        x,
        z,
        min_section_y,
        status,
        last_update,
        inhabited_time,
        sections,
    })
}

fn parse_section<'a>(
    r: &mut NbtReader<'a>,
    catalog: &Catalog,
) -> Result<(i32, ChunkSection), WorldError> {
    let mut y = 0;
    let mut section = None;
    loop {
        let token = r.next()?;
        match (token.name, token.payload) {
            (None, Payload::End) => break,
            (Some("Y"), Payload::Byte(v)) => y = v as i32,
            (Some("block_states"), Payload::Compound) => {
                section = Some(parse_block_states(r, catalog)?);
            }
            (_, payload) => r.skip(&payload)?,
        }
    }
    Ok((y, section.unwrap_or_else(|| ChunkSection::uniform(AIR_ID))))
}

fn parse_block_states<'a>(
    r: &mut NbtReader<'a>,
    catalog: &Catalog,
) -> Result<ChunkSection, WorldError> {
    let mut palette: Vec<u16> = Vec::new();
    let mut data: Vec<u64> = Vec::new();
    loop {
        let token = r.next()?;
        match (token.name, token.payload) {
            (None, Payload::End) => break,
            (Some("palette"), Payload::List { element, len }) => {
                if element != Tag::Compound {
                    return Err(WorldError::MalformedChunk(
                        "palette is not a list of compounds".into(),
                    ));
                }
                for _ in 0..len.max(0) {
                    palette.push(parse_palette_entry(r, catalog)?);
                }
            }
            (Some("data"), Payload::LongArray(view)) => {
                data = view.iter().map(|v| v as u64).collect();
            }
            (_, payload) => r.skip(&payload)?,
        }
    }
    ChunkSection::from_parts(palette, data)
}

/// Resolve one `{Name, Properties}` palette entry to a global state id,
/// substituting air (with a diagnostic) for unknown blocks.
fn parse_palette_entry<'a>(
    r: &mut NbtReader<'a>,
    catalog: &Catalog,
) -> Result<u16, WorldError> {
    let mut name: Option<&'a str> = None;
    let mut properties: Vec<(&'a str, &'a str)> = Vec::new();
    loop {
        let token = r.next()?;
        match (token.name, token.payload) {
            (None, Payload::End) => break,
            (Some("Name"), Payload::String(s)) => name = Some(s),
            (Some("Properties"), Payload::Compound) => loop {
                let prop = r.next()?;
                match (prop.name, prop.payload) {
                    (None, Payload::End) => break,
                    (Some(key), Payload::String(value)) => properties.push((key, value)),
                    (_, payload) => r.skip(&payload)?,
                }
            },
            (_, payload) => r.skip(&payload)?,
        }
    }

    let name = name.ok_or_else(|| {
        WorldError::MalformedChunk("palette entry without a Name".into())
    })?;
    let short = name.strip_prefix("minecraft:").unwrap_or(name);
    match BlockKind::from_name(short) {
        Some(kind) => {
            let state = catalog.state_from_property_list(kind, &properties);
            Ok(catalog.id_from_state(&state))
        }
        None => {
            warn!("unknown block {name:?} in region palette, substituting air");
            Ok(AIR_ID)
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_state::BlockState;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use jcraft_nbt::NbtWriter;
    use std::io::Write;

    /// Serialize a minimal 1.18-shaped chunk document.
    fn chunk_nbt(x: i32, z: i32, stone_packed: &ChunkSection) -> Vec<u8> {
        let mut w = NbtWriter::new();
        w.compound("");
        w.int("DataVersion", DATA_VERSION_1_18_2);
        w.int("xPos", x);
        w.int("zPos", z);
        w.int("yPos", -4);
        w.string("Status", "full");
        w.long("LastUpdate", 123);
        w.long("InhabitedTime", 456);
        w.list("sections", Tag::Compound, 1);
        {
            w.byte("Y", -4);
            w.compound("block_states");
            {
                w.list("palette", Tag::Compound, 2);
                {
                    w.string("Name", "minecraft:air");
                    w.end();
                    w.string("Name", "minecraft:grass_block");
                    w.compound("Properties");
                    w.string("snowy", "true");
                    w.end();
                    w.end();
                }
                let words: Vec<i64> = stone_packed
                    .packed_block_data()
                    .iter()
                    .map(|&v| v as i64)
                    .collect();
                w.long_array("data", &words);
            }
            w.end();
            // unrelated extra data the walker must skip
            w.compound("biomes");
            w.string("note", "skipped");
            w.end();
            w.end();
        }
        w.end();
        w.into_bytes()
    }

    fn build_region(x: i32, z: i32, nbt: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(6));
        encoder.write_all(nbt).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut file = vec![0u8; 2 * SECTOR_BYTES];
        let index = (x.rem_euclid(32) + z.rem_euclid(32) * 32) as usize;
        // Blob starts at sector 2 and occupies however many sectors it needs.
        let blob_len = 4 + 1 + compressed.len();
        let sectors = blob_len.div_ceil(SECTOR_BYTES).max(1);
        let entry = (2u32 << 8) | sectors as u32;
        file[index * 4..index * 4 + 4].copy_from_slice(&entry.to_be_bytes());

        file.resize(2 * SECTOR_BYTES + sectors * SECTOR_BYTES, 0);
        let offset = 2 * SECTOR_BYTES;
        file[offset..offset + 4]
            .copy_from_slice(&((compressed.len() + 1) as u32).to_be_bytes());
        file[offset + 4] = COMPRESSION_ZLIB;
        file[offset + 5..offset + 5 + compressed.len()].copy_from_slice(&compressed);
        file
    }

    /// A two-entry section whose packed data marks cell (0, 0, 0).
    fn sample_section() -> ChunkSection {
        let mut s = ChunkSection::uniform(0);
        s.change_block(0, 0, 0, 1);
        s
    }

    #[test]
    fn read_chunk_roundtrip() {
        let catalog = Catalog::new();
        let section = sample_section();
        let region =
            RegionFile::from_bytes(build_region(0, 0, &chunk_nbt(0, 0, &section))).unwrap();

        let chunk = region.read_chunk(0, 0, &catalog).unwrap().unwrap();
        assert_eq!(chunk.data_version, DATA_VERSION_1_18_2);
        assert_eq!((chunk.x, chunk.z), (0, 0));
        assert_eq!(chunk.min_section_y, -4);
        assert_eq!(chunk.status, GenerationStatus::Full);
        assert_eq!(chunk.last_update, 123);
        assert_eq!(chunk.inhabited_time, 456);
        assert_eq!(chunk.sections.len(), 1);

        let snowy_grass =
            catalog.id_from_state(&BlockState::GrassBlock { snowy: true });
        // Palette index 1 resolved through Name + Properties.
        assert_eq!(chunk.get_block(0, -64, 0), Some(snowy_grass));
        assert_eq!(chunk.get_block(1, -64, 0), Some(AIR_ID));
    }

    #[test]
    fn absent_chunk_is_none() {
        let catalog = Catalog::new();
        let section = sample_section();
        let region =
            RegionFile::from_bytes(build_region(0, 0, &chunk_nbt(0, 0, &section))).unwrap();
        assert!(region.read_chunk(1, 0, &catalog).unwrap().is_none());
    }

    #[test]
    fn negative_coordinates_use_euclidean_mod() {
        let catalog = Catalog::new();
        let section = sample_section();
        // Chunk (-1, -1) lands in table cell (31, 31).
        let region =
            RegionFile::from_bytes(build_region(-1, -1, &chunk_nbt(-1, -1, &section))).unwrap();
        let chunk = region.read_chunk(-1, -1, &catalog).unwrap().unwrap();
        assert_eq!((chunk.x, chunk.z), (-1, -1));
        assert!(region.read_chunk(31, 31, &catalog).unwrap().is_some());
    }

    #[test]
    fn unknown_block_falls_back_to_air() {
        let catalog = Catalog::new();
        let mut w = NbtWriter::new();
        w.compound("");
        w.int("xPos", 0);
        w.int("zPos", 0);
        w.int("yPos", -4);
        w.list("sections", Tag::Compound, 1);
        {
            w.byte("Y", -4);
            w.compound("block_states");
            w.list("palette", Tag::Compound, 1);
            {
                w.string("Name", "minecraft:budding_amethyst");
                w.end();
            }
            w.end();
            w.end();
        }
        w.end();
        let region = RegionFile::from_bytes(build_region(0, 0, &w.into_bytes())).unwrap();
        let chunk = region.read_chunk(0, 0, &catalog).unwrap().unwrap();
        assert_eq!(chunk.get_block(0, -64, 0), Some(AIR_ID));
    }

    #[test]
    fn non_zlib_compression_is_rejected() {
        let catalog = Catalog::new();
        let section = sample_section();
        let mut data = build_region(0, 0, &chunk_nbt(0, 0, &section));
        data[2 * SECTOR_BYTES + 4] = 1; // gzip tag
        let region = RegionFile::from_bytes(data).unwrap();
        assert!(matches!(
            region.read_chunk(0, 0, &catalog),
            Err(WorldError::UnsupportedCompression(1))
        ));
    }

    #[test]
    fn truncated_file_is_rejected() {
        assert!(RegionFile::from_bytes(vec![0u8; 100]).is_err());
    }
}
