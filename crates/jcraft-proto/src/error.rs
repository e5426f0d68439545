//! Protocol-level errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("buffer too short: need {needed} more bytes, have {remaining}")]
    BufferTooShort { needed: usize, remaining: usize },

    #[error("VarInt is too big (more than 5 bytes)")]
    VarIntTooBig,

    #[error("string too long: {len} bytes, cap {max}")]
    StringTooLong { len: usize, max: usize },

    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    #[error("unknown packet id: 0x{0:02X}")]
    UnknownPacketId(i32),

    #[error("decompression error: {0}")]
    Decompress(String),

    #[error("compression error: {0}")]
    Compress(String),

    #[error("packet length mismatch: declared {declared}, got {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
