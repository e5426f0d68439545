//! Protocol encoding/decoding traits and string helpers.

use bytes::{Buf, BufMut};

use crate::error::ProtoError;
use crate::types::VarInt;

/// Longest string the protocol allows, in characters.
pub const MAX_STRING_LEN: usize = 32767;

/// Encode a value onto a buffer.
pub trait ProtoEncode {
    fn proto_encode(&self, buf: &mut impl BufMut);
}

/// Decode a value from a buffer.
pub trait ProtoDecode: Sized {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError>;
}

/// Number of bytes a string occupies on the wire (VarInt prefix + UTF-8).
pub fn string_encoded_size(s: &str) -> usize {
    VarInt::encoded_size(s.len() as i32) + s.len()
}

/// Write a protocol string (VarInt length + UTF-8).
pub fn write_string(buf: &mut impl BufMut, s: &str) {
    debug_assert!(s.chars().count() <= MAX_STRING_LEN);
    VarInt(s.len() as i32).proto_encode(buf);
    buf.put_slice(s.as_bytes());
}

/// Read a protocol string (VarInt length + UTF-8).
pub fn read_string(buf: &mut impl Buf) -> Result<String, ProtoError> {
    let len = VarInt::proto_decode(buf)?.0;
    if len < 0 {
        return Err(ProtoError::InvalidData(format!("negative string length {len}")));
    }
    let len = len as usize;
    // UTF-8 can use up to four bytes per character.
    if len > MAX_STRING_LEN * 4 {
        return Err(ProtoError::StringTooLong {
            len,
            max: MAX_STRING_LEN * 4,
        });
    }
    if buf.remaining() < len {
        return Err(ProtoError::BufferTooShort {
            needed: len,
            remaining: buf.remaining(),
        });
    }
    let data = buf.copy_to_bytes(len);
    let s = String::from_utf8(data.to_vec()).map_err(|_| ProtoError::InvalidUtf8)?;
    if s.chars().count() > MAX_STRING_LEN {
        return Err(ProtoError::StringTooLong {
            len: s.chars().count(),
            max: MAX_STRING_LEN,
        });
    }
    Ok(s)
}
