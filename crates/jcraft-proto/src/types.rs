//! Base data types used throughout the Java Edition protocol.

use std::fmt;

use bytes::{Buf, BufMut};

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

// ---------------------------------------------------------------------------
// VarInt (i32 — plain LEB128 over the two's-complement bits, NO ZigZag)
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarInt(pub i32);

impl VarInt {
    /// Maximum bytes a VarInt can occupy.
    pub const MAX_BYTES: usize = 5;

    /// Number of bytes `v` occupies on the wire (1..=5).
    pub fn encoded_size(v: i32) -> usize {
        let mut value = v as u32;
        let mut size = 1;
        while value & !0x7F != 0 {
            value >>= 7;
            size += 1;
        }
        size
    }
}

impl ProtoEncode for VarInt {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        let mut value = self.0 as u32;
        loop {
            if value & !0x7F == 0 {
                buf.put_u8(value as u8);
                return;
            }
            buf.put_u8((value & 0x7F | 0x80) as u8);
            value >>= 7;
        }
    }
}

impl ProtoDecode for VarInt {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let mut result: u32 = 0;
        for i in 0..Self::MAX_BYTES {
            if !buf.has_remaining() {
                return Err(ProtoError::BufferTooShort {
                    needed: 1,
                    remaining: 0,
                });
            }
            let byte = buf.get_u8();
            // Groups past bit 31 are discarded by the u32 shift, matching
            // Java's two's-complement truncation.
            result |= ((byte & 0x7F) as u32) << (7 * i as u32);
            if byte & 0x80 == 0 {
                return Ok(VarInt(result as i32));
            }
        }
        Err(ProtoError::VarIntTooBig)
    }
}

impl From<i32> for VarInt {
    fn from(v: i32) -> Self {
        VarInt(v)
    }
}

impl From<VarInt> for i32 {
    fn from(v: VarInt) -> Self {
        v.0
    }
}

impl fmt::Debug for VarInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarInt({})", self.0)
    }
}

impl fmt::Display for VarInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Position (packed 64-bit big-endian: X 26 bits, Z 26 bits, Y 12 bits)
// ---------------------------------------------------------------------------

/// A block position packed into a single i64 on the wire (1.14+ layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chunk coordinates containing this position.
    pub fn chunk(&self) -> (i32, i32) {
        (self.x >> 4, self.z >> 4)
    }

    /// Offset by one block along the given face normal.
    pub fn offset(&self, face: BlockFace) -> Position {
        let (dx, dy, dz) = face.normal();
        Position::new(self.x + dx, self.y + dy, self.z + dz)
    }

    fn pack(&self) -> u64 {
        ((self.x as u64 & 0x3FF_FFFF) << 38)
            | ((self.z as u64 & 0x3FF_FFFF) << 12)
            | (self.y as u64 & 0xFFF)
    }

    fn unpack(v: u64) -> Self {
        // Arithmetic shifts on i64 sign-extend each field explicitly.
        Self {
            x: ((v as i64) >> 38) as i32,
            z: (((v << 26) as i64) >> 38) as i32,
            y: (((v << 52) as i64) >> 52) as i32,
        }
    }
}

impl ProtoEncode for Position {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u64(self.pack());
    }
}

impl ProtoDecode for Position {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        if buf.remaining() < 8 {
            return Err(ProtoError::BufferTooShort {
                needed: 8,
                remaining: buf.remaining(),
            });
        }
        Ok(Self::unpack(buf.get_u64()))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// BlockFace
// ---------------------------------------------------------------------------

/// The six orthogonal block faces, as numbered by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFace {
    Bottom = 0,
    Top = 1,
    North = 2,
    South = 3,
    West = 4,
    East = 5,
}

impl BlockFace {
    pub fn from_i32(v: i32) -> Result<Self, ProtoError> {
        match v {
            0 => Ok(Self::Bottom),
            1 => Ok(Self::Top),
            2 => Ok(Self::North),
            3 => Ok(Self::South),
            4 => Ok(Self::West),
            5 => Ok(Self::East),
            other => Err(ProtoError::InvalidData(format!("invalid block face {other}"))),
        }
    }

    /// Unit normal of this face.
    pub fn normal(self) -> (i32, i32, i32) {
        match self {
            Self::Bottom => (0, -1, 0),
            Self::Top => (0, 1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::East => (1, 0, 0),
        }
    }
}

// ---------------------------------------------------------------------------
// Uuid (16 bytes big-endian)
// ---------------------------------------------------------------------------

/// 128-bit UUID, written as sixteen big-endian bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uuid(pub u128);

impl Uuid {
    pub const ZERO: Self = Self(0);
}

impl ProtoEncode for Uuid {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u128(self.0);
    }
}

impl ProtoDecode for Uuid {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        if buf.remaining() < 16 {
            return Err(ProtoError::BufferTooShort {
                needed: 16,
                remaining: buf.remaining(),
            });
        }
        Ok(Self(buf.get_u128()))
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0.to_be_bytes();
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            b[0], b[1], b[2], b[3],
            b[4], b[5],
            b[6], b[7],
            b[8], b[9],
            b[10], b[11], b[12], b[13], b[14], b[15],
        )
    }
}

// ---------------------------------------------------------------------------
// Slot (inventory slot: presence byte + item id + count + empty NBT)
// ---------------------------------------------------------------------------

/// An item occupying an inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotItem {
    pub item_id: i32,
    pub count: i8,
}

/// An optionally-filled inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub item: Option<SlotItem>,
}

impl Slot {
    pub const EMPTY: Self = Self { item: None };

    pub fn filled(item_id: i32, count: i8) -> Self {
        Self {
            item: Some(SlotItem { item_id, count }),
        }
    }
}

impl ProtoEncode for Slot {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        match self.item {
            Some(item) => {
                buf.put_u8(1);
                VarInt(item.item_id).proto_encode(buf);
                buf.put_i8(item.count);
                buf.put_u8(0x00); // TAG_End: no item NBT
            }
            None => buf.put_u8(0),
        }
    }
}

impl ProtoDecode for Slot {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        if !buf.has_remaining() {
            return Err(ProtoError::BufferTooShort {
                needed: 1,
                remaining: 0,
            });
        }
        if buf.get_u8() == 0 {
            return Ok(Self::EMPTY);
        }
        let item_id = VarInt::proto_decode(buf)?.0;
        if buf.remaining() < 2 {
            return Err(ProtoError::BufferTooShort {
                needed: 2,
                remaining: buf.remaining(),
            });
        }
        let count = buf.get_i8();
        // Item NBT is not modeled; only the empty tree is accepted.
        let tag = buf.get_u8();
        if tag != 0x00 {
            return Err(ProtoError::InvalidData(format!(
                "unsupported item NBT (tag 0x{tag:02X})"
            )));
        }
        Ok(Self::filled(item_id, count))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
