//! NBT error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NbtError {
    #[error("unexpected end of data")]
    UnexpectedEof,

    #[error("invalid tag type: {0}")]
    InvalidTag(u8),

    #[error("invalid UTF-8 in NBT string")]
    InvalidUtf8,

    #[error("negative length: {0}")]
    NegativeLength(i32),

    #[error("nesting too deep (limit: {limit})")]
    NestingTooDeep { limit: usize },
}
