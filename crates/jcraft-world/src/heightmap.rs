//! Heightmap synthesis for the chunk-data packet.

use jcraft_nbt::NbtWriter;

/// Bits per height entry.
const HEIGHT_BITS: usize = 9;
/// Entries packed per 64-bit word (no straddling).
const ENTRIES_PER_LONG: usize = 64 / HEIGHT_BITS;
/// Words needed for the 256 column heights.
pub const MOTION_BLOCKING_LONGS: usize = 256usize.div_ceil(ENTRIES_PER_LONG);

/// Pack 256 identical column heights, seven 9-bit entries per word.
pub fn pack_uniform_heights(height: u16) -> [i64; MOTION_BLOCKING_LONGS] {
    debug_assert!(height < (1 << HEIGHT_BITS));
    let mut words = [0i64; MOTION_BLOCKING_LONGS];
    for column in 0..256 {
        let shift = (column % ENTRIES_PER_LONG) * HEIGHT_BITS;
        words[column / ENTRIES_PER_LONG] |= (height as i64) << shift;
    }
    words
}

/// The `MOTION_BLOCKING` heightmap compound, parameterized by one height.
pub fn motion_blocking_nbt(height: u16) -> Vec<u8> {
    let mut w = NbtWriter::new();
    w.compound("");
    w.long_array("MOTION_BLOCKING", &pack_uniform_heights(height));
    w.end();
    w.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jcraft_nbt::{NbtReader, Payload};

    #[test]
    fn thirty_seven_words() {
        assert_eq!(MOTION_BLOCKING_LONGS, 37);
    }

    #[test]
    fn packed_heights_decode() {
        let words = pack_uniform_heights(129);
        for column in 0..256 {
            let word = words[column / ENTRIES_PER_LONG] as u64;
            let shift = (column % ENTRIES_PER_LONG) * HEIGHT_BITS;
            assert_eq!((word >> shift) & 0x1FF, 129, "column {column}");
        }
        // The 37th word holds only 256 - 36*7 = 4 entries.
        let tail = words[36] as u64;
        assert_eq!((tail >> (4 * HEIGHT_BITS)), 0, "tail padding is zero");
    }

    #[test]
    fn nbt_shape() {
        let data = motion_blocking_nbt(65);
        let mut r = NbtReader::new(&data);
        let root = r.next().unwrap();
        assert_eq!(root.name, Some(""));
        assert_eq!(root.payload, Payload::Compound);
        let map = r.next().unwrap();
        assert_eq!(map.name, Some("MOTION_BLOCKING"));
        match map.payload {
            Payload::LongArray(view) => assert_eq!(view.len(), MOTION_BLOCKING_LONGS),
            other => panic!("expected long array, got {other:?}"),
        }
        assert_eq!(r.next().unwrap().payload, Payload::End);
    }
}
