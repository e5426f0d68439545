//! Paletted chunk-section storage.
//!
//! A section holds 4096 block cells as a palette of global state ids plus a
//! bit-packed index array, kept in the exact layout the wire format uses:
//! `bits_per_block` bits per entry, packed LSB-first into 64-bit words, with
//! entries never straddling a word boundary.

use bytes::BufMut;

use jcraft_proto::codec::ProtoEncode;
use jcraft_proto::types::VarInt;

use crate::catalog::AIR_ID;
use crate::error::WorldError;

/// Blocks per edge of a section.
pub const SECTION_WIDTH: usize = 16;
/// Total block cells in a section.
pub const SECTION_VOLUME: usize = 4096;

/// The wire floor for a non-uniform block palette.
const MIN_BITS_PER_BLOCK: u8 = 4;
/// A section-local palette can never need more than 16 bits.
const MAX_BITS_PER_BLOCK: u8 = 16;
/// Conservative non-air count emitted ahead of the block container.
const NON_AIR_COUNT: i16 = 4096;
/// Plains, the biome every section is seeded with.
const BIOME_PLAINS: u16 = 1;

/// A 16×16×16 cuboid of block cells plus its biome container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSection {
    bits_per_block: u8,
    block_palette: Vec<u16>,
    packed_block_data: Vec<u64>,
    biome_palette: Vec<u16>,
    packed_biome_data: Vec<u64>,
}

impl ChunkSection {
    /// An all-air section (empty palette reads as air).
    pub fn new() -> Self {
        Self {
            bits_per_block: 0,
            block_palette: Vec::new(),
            packed_block_data: Vec::new(),
            biome_palette: vec![BIOME_PLAINS],
            packed_biome_data: Vec::new(),
        }
    }

    /// A section uniformly filled with one state.
    pub fn uniform(state: u16) -> Self {
        Self {
            block_palette: vec![state],
            ..Self::new()
        }
    }

    /// Rebuild a section from a palette and packed data as they appear in a
    /// region file. A single-entry palette carries no data array.
    pub fn from_parts(palette: Vec<u16>, data: Vec<u64>) -> Result<Self, WorldError> {
        if palette.is_empty() {
            return Err(WorldError::MalformedChunk("empty section palette".into()));
        }
        let bits = Self::bits_for(palette.len());
        let expected = if bits == 0 {
            0
        } else {
            SECTION_VOLUME.div_ceil(64 / bits as usize)
        };
        if data.len() != expected {
            return Err(WorldError::MalformedChunk(format!(
                "section data holds {} words, expected {expected} for a {}-entry palette",
                data.len(),
                palette.len(),
            )));
        }
        Ok(Self {
            bits_per_block: bits,
            block_palette: palette,
            packed_block_data: data,
            ..Self::new()
        })
    }

    pub fn bits_per_block(&self) -> u8 {
        self.bits_per_block
    }

    pub fn block_palette(&self) -> &[u16] {
        &self.block_palette
    }

    pub fn packed_block_data(&self) -> &[u64] {
        &self.packed_block_data
    }

    /// `max(4, ceil(log2(len)))`, or 0 for a uniform section.
    fn bits_for(palette_len: usize) -> u8 {
        if palette_len <= 1 {
            return 0;
        }
        let needed = (usize::BITS - (palette_len - 1).leading_zeros()) as u8;
        needed.max(MIN_BITS_PER_BLOCK)
    }

    fn cell_index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < SECTION_WIDTH && y < SECTION_WIDTH && z < SECTION_WIDTH);
        x + z * 16 + y * 256
    }

    /// Read the state at local coordinates.
    pub fn get_block(&self, x: usize, y: usize, z: usize) -> u16 {
        if self.bits_per_block == 0 {
            return self.block_palette.first().copied().unwrap_or(AIR_ID);
        }
        self.block_palette[self.read_index(Self::cell_index(x, y, z))]
    }

    /// Write one cell, growing the palette (and repacking) as needed.
    pub fn change_block(&mut self, x: usize, y: usize, z: usize, new_state: u16) {
        if self.bits_per_block == 0 {
            let background = self.block_palette.first().copied().unwrap_or(AIR_ID);
            if background == new_state {
                return;
            }
            // The implicit background has to occupy palette index 0 before a
            // second entry can appear.
            if self.block_palette.is_empty() {
                self.block_palette.push(AIR_ID);
            }
        }

        let palette_index = match self.block_palette.iter().position(|&s| s == new_state) {
            Some(i) => i,
            None => {
                self.block_palette.push(new_state);
                self.block_palette.len() - 1
            }
        };

        let required = Self::bits_for(self.block_palette.len());
        assert!(
            required <= MAX_BITS_PER_BLOCK,
            "section palette grew past {MAX_BITS_PER_BLOCK} bits"
        );
        if required > self.bits_per_block {
            self.repack(required);
        }

        self.write_index(Self::cell_index(x, y, z), palette_index);
    }

    /// Unpack every index at the old width and re-pack at `new_bits`.
    fn repack(&mut self, new_bits: u8) {
        let mut scratch = [0u16; SECTION_VOLUME];
        if self.bits_per_block > 0 {
            for (i, slot) in scratch.iter_mut().enumerate() {
                *slot = self.read_index(i) as u16;
            }
        }
        self.bits_per_block = new_bits;
        let per_word = 64 / new_bits as usize;
        self.packed_block_data = vec![0u64; SECTION_VOLUME.div_ceil(per_word)];
        for (i, &index) in scratch.iter().enumerate() {
            self.write_index(i, index as usize);
        }
    }

    fn read_index(&self, cell: usize) -> usize {
        let bits = self.bits_per_block as usize;
        let per_word = 64 / bits;
        let word = self.packed_block_data[cell / per_word];
        let shift = (cell % per_word) * bits;
        ((word >> shift) & ((1u64 << bits) - 1)) as usize
    }

    fn write_index(&mut self, cell: usize, index: usize) {
        let bits = self.bits_per_block as usize;
        debug_assert!(index < (1 << bits));
        let per_word = 64 / bits;
        let shift = (cell % per_word) * bits;
        let mask = (1u64 << bits) - 1;
        let word = &mut self.packed_block_data[cell / per_word];
        *word = (*word & !(mask << shift)) | ((index as u64) << shift);
    }

    /// Wire encoding: i16 non-air count, block container, biome container.
    pub fn encode(&self, buf: &mut impl BufMut) {
        assert!(
            !self.block_palette.is_empty(),
            "cannot encode a section with an empty palette"
        );
        buf.put_i16(NON_AIR_COUNT);
        write_paletted(
            buf,
            self.bits_per_block,
            &self.block_palette,
            &self.packed_block_data,
        );
        write_paletted(buf, 0, &self.biome_palette, &self.packed_biome_data);
    }
}

impl Default for ChunkSection {
    fn default() -> Self {
        Self::new()
    }
}

/// `u8 bits · VarInt palette_len · VarInt entries[] · VarInt data_len · u64 words[]`.
fn write_paletted(buf: &mut impl BufMut, bits: u8, palette: &[u16], data: &[u64]) {
    buf.put_u8(bits);
    VarInt(palette.len() as i32).proto_encode(buf);
    for &entry in palette {
        VarInt(entry as i32).proto_encode(buf);
    }
    VarInt(data.len() as i32).proto_encode(buf);
    for &word in data {
        buf.put_u64(word);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{Buf, Bytes, BytesMut};
    use jcraft_proto::codec::ProtoDecode;

    /// Test-side decoder for one paletted container.
    fn read_paletted(buf: &mut Bytes) -> (u8, Vec<u16>, Vec<u64>) {
        let bits = buf.get_u8();
        let palette_len = VarInt::proto_decode(buf).unwrap().0 as usize;
        let palette = (0..palette_len)
            .map(|_| VarInt::proto_decode(buf).unwrap().0 as u16)
            .collect();
        let data_len = VarInt::proto_decode(buf).unwrap().0 as usize;
        let data = (0..data_len).map(|_| buf.get_u64()).collect();
        (bits, palette, data)
    }

    #[test]
    fn empty_section_reads_air() {
        let s = ChunkSection::new();
        assert_eq!(s.bits_per_block(), 0);
        assert_eq!(s.get_block(0, 0, 0), AIR_ID);
        assert_eq!(s.get_block(15, 15, 15), AIR_ID);
    }

    #[test]
    fn uniform_section() {
        let s = ChunkSection::uniform(7);
        assert_eq!(s.bits_per_block(), 0);
        assert_eq!(s.get_block(3, 9, 12), 7);
    }

    #[test]
    fn uniform_write_of_same_state_is_noop() {
        let mut s = ChunkSection::uniform(7);
        s.change_block(5, 5, 5, 7);
        assert_eq!(s.bits_per_block(), 0);
        assert_eq!(s.block_palette(), &[7]);
    }

    #[test]
    fn first_divergent_write_expands_to_four_bits() {
        let mut s = ChunkSection::new();
        s.change_block(0, 0, 0, 1);
        assert_eq!(s.bits_per_block(), 4);
        assert_eq!(s.block_palette(), &[AIR_ID, 1]);
        assert_eq!(s.get_block(0, 0, 0), 1);
        assert_eq!(s.get_block(1, 0, 0), AIR_ID);
    }

    #[test]
    fn change_then_get_roundtrip() {
        let mut s = ChunkSection::new();
        s.change_block(5, 10, 3, 200);
        assert_eq!(s.get_block(5, 10, 3), 200);
        assert_eq!(s.get_block(0, 0, 0), AIR_ID);
        s.change_block(5, 10, 3, 100);
        assert_eq!(s.get_block(5, 10, 3), 100);
    }

    #[test]
    fn neighbors_are_undisturbed() {
        let mut s = ChunkSection::uniform(1);
        let before: Vec<u16> = (0..SECTION_VOLUME)
            .map(|i| s.get_block(i % 16, i / 256, (i / 16) % 16))
            .collect();
        s.change_block(8, 8, 8, 99);
        for i in 0..SECTION_VOLUME {
            let (x, y, z) = (i % 16, i / 256, (i / 16) % 16);
            if (x, y, z) == (8, 8, 8) {
                assert_eq!(s.get_block(x, y, z), 99);
            } else {
                assert_eq!(s.get_block(x, y, z), before[i], "cell ({x},{y},{z})");
            }
        }
    }

    #[test]
    fn bits_track_palette_growth() {
        assert_eq!(ChunkSection::bits_for(0), 0);
        assert_eq!(ChunkSection::bits_for(1), 0);
        assert_eq!(ChunkSection::bits_for(2), 4);
        assert_eq!(ChunkSection::bits_for(16), 4);
        assert_eq!(ChunkSection::bits_for(17), 5);
        assert_eq!(ChunkSection::bits_for(32), 5);
        assert_eq!(ChunkSection::bits_for(33), 6);
        assert_eq!(ChunkSection::bits_for(256), 8);
        assert_eq!(ChunkSection::bits_for(257), 9);
    }

    #[test]
    fn seventeenth_entry_repacks_and_preserves_contents() {
        let mut s = ChunkSection::new();
        // 16 distinct states (air included) fit in 4 bits.
        for i in 0..15u16 {
            s.change_block(i as usize, 0, 0, 100 + i);
        }
        assert_eq!(s.bits_per_block(), 4);
        assert_eq!(s.block_palette().len(), 16);

        let before: Vec<u16> = (0..SECTION_VOLUME)
            .map(|i| s.get_block(i % 16, i / 256, (i / 16) % 16))
            .collect();

        // The 17th distinct state forces 5 bits.
        s.change_block(0, 15, 0, 999);
        assert_eq!(s.bits_per_block(), 5);
        assert_eq!(s.block_palette().len(), 17);
        assert_eq!(s.get_block(0, 15, 0), 999);

        for i in 0..SECTION_VOLUME {
            let (x, y, z) = (i % 16, i / 256, (i / 16) % 16);
            if (x, y, z) == (0, 15, 0) {
                continue;
            }
            assert_eq!(s.get_block(x, y, z), before[i], "cell ({x},{y},{z})");
        }
    }

    #[test]
    fn packed_entries_do_not_straddle_words() {
        let mut s = ChunkSection::new();
        for i in 0..15u16 {
            s.change_block(i as usize, 0, 0, 100 + i);
        }
        s.change_block(0, 15, 0, 999); // force 5 bits
        // 64 / 5 = 12 entries per word, 4096 / 12 rounds up to 342 words.
        assert_eq!(s.packed_block_data().len(), 342);
    }

    #[test]
    fn encode_uniform_short_form() {
        let s = ChunkSection::uniform(7);
        let mut buf = BytesMut::new();
        s.encode(&mut buf);
        let mut body = buf.freeze();

        assert_eq!(body.get_i16(), 4096); // conservative non-air count
        let (bits, palette, data) = read_paletted(&mut body);
        assert_eq!(bits, 0);
        assert_eq!(palette, vec![7]);
        assert!(data.is_empty());
        // Biome container: single plains entry, no data.
        let (bits, palette, data) = read_paletted(&mut body);
        assert_eq!(bits, 0);
        assert_eq!(palette, vec![1]);
        assert!(data.is_empty());
        assert!(!body.has_remaining());
    }

    #[test]
    fn encode_two_entry_palette_low_nibble() {
        // Stone at (0,0,0) over air: bpb 4, palette len 2, and the low 4
        // bits of word 0 must decode to palette index 1.
        let mut s = ChunkSection::uniform(0);
        s.change_block(0, 0, 0, 1);

        let mut buf = BytesMut::new();
        s.encode(&mut buf);
        let mut body = buf.freeze();
        body.get_i16();

        let (bits, palette, data) = read_paletted(&mut body);
        assert_eq!(bits, 4);
        assert_eq!(palette, vec![0, 1]);
        assert_eq!(data.len(), SECTION_VOLUME / 16);
        assert_eq!(data[0] & 0xF, 1);
    }

    #[test]
    fn encode_decode_reproduces_packed_data() {
        let mut s = ChunkSection::new();
        for x in 0..16 {
            for z in 0..16 {
                s.change_block(x, 0, z, ((x * z) % 5) as u16 + 1);
            }
        }
        let mut buf = BytesMut::new();
        s.encode(&mut buf);
        let mut body = buf.freeze();
        body.get_i16();
        let (bits, palette, data) = read_paletted(&mut body);
        assert_eq!(bits, s.bits_per_block());
        assert_eq!(palette, s.block_palette());
        assert_eq!(data, s.packed_block_data());
    }

    #[test]
    fn from_parts_roundtrip() {
        let mut s = ChunkSection::new();
        s.change_block(1, 2, 3, 42);
        let rebuilt = ChunkSection::from_parts(
            s.block_palette().to_vec(),
            s.packed_block_data().to_vec(),
        )
        .unwrap();
        assert_eq!(rebuilt.get_block(1, 2, 3), 42);
        assert_eq!(rebuilt.get_block(0, 0, 0), AIR_ID);
    }

    #[test]
    fn from_parts_rejects_bad_lengths() {
        assert!(ChunkSection::from_parts(vec![], vec![]).is_err());
        assert!(ChunkSection::from_parts(vec![1, 2], vec![0; 100]).is_err());
        assert!(ChunkSection::from_parts(vec![1], vec![0]).is_err());
    }
}
