//! Per-packet zlib compression.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::ProtoError;

/// Compress data with zlib at the given level (0-9).
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>, ProtoError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|e| ProtoError::Compress(e.to_string()))?;
    encoder.finish().map_err(|e| ProtoError::Compress(e.to_string()))
}

/// Decompress a zlib stream.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, ProtoError> {
    let mut decoder = ZlibDecoder::new(data);
    let mut output = Vec::new();
    decoder
        .read_to_end(&mut output)
        .map_err(|e| ProtoError::Decompress(e.to_string()))?;
    Ok(output)
}
