//! World-layer errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("NBT error: {0}")]
    Nbt(#[from] jcraft_nbt::NbtError),

    #[error("unsupported region compression type: {0}")]
    UnsupportedCompression(u8),

    #[error("malformed region file: {0}")]
    MalformedRegion(String),

    #[error("malformed chunk: {0}")]
    MalformedChunk(String),
}
