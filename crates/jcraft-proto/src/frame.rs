//! Packet framing: `VarInt(len) · VarInt(id) · payload`, with the optional
//! per-packet compression layer `VarInt(len) · VarInt(data_len) · payload`.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::compression;
use crate::error::ProtoError;
use crate::types::VarInt;

/// Hard cap on a single packet body; anything larger is a malformed frame.
pub const MAX_PACKET_LEN: usize = 1 << 21;

/// Frame a packet body (id + payload) for the wire.
///
/// `compress_threshold` of `None` emits the plain format. `Some(t)` emits the
/// post-negotiation format, zlib-compressing bodies of at least `t` bytes.
pub fn encode_frame(id: i32, payload: &[u8], compress_threshold: Option<usize>) -> Vec<u8> {
    let mut body = BytesMut::with_capacity(VarInt::encoded_size(id) + payload.len());
    VarInt(id).proto_encode(&mut body);
    body.put_slice(payload);

    let inner: Vec<u8> = match compress_threshold {
        None => body.to_vec(),
        Some(threshold) if body.len() >= threshold => {
            let compressed =
                compression::compress(&body, 6).expect("zlib compression of an in-memory buffer");
            let mut out = Vec::with_capacity(compressed.len() + VarInt::MAX_BYTES);
            VarInt(body.len() as i32).proto_encode(&mut out);
            out.extend_from_slice(&compressed);
            out
        }
        Some(_) => {
            let mut out = Vec::with_capacity(body.len() + 1);
            VarInt(0).proto_encode(&mut out);
            out.extend_from_slice(&body);
            out
        }
    };

    let mut frame = Vec::with_capacity(inner.len() + VarInt::MAX_BYTES);
    VarInt(inner.len() as i32).proto_encode(&mut frame);
    frame.extend_from_slice(&inner);
    frame
}

/// Decode a frame body (everything after the outer length prefix) into
/// `(packet_id, payload)`, undoing the compression layer when negotiated.
pub fn decode_frame_body(body: Bytes, compressed: bool) -> Result<(i32, Bytes), ProtoError> {
    let mut body = body;
    if compressed {
        let declared = VarInt::proto_decode(&mut body)?.0;
        if declared < 0 {
            return Err(ProtoError::InvalidData(format!(
                "negative uncompressed length {declared}"
            )));
        }
        if declared > 0 {
            let inflated = compression::decompress(&body)?;
            if inflated.len() != declared as usize {
                return Err(ProtoError::LengthMismatch {
                    declared: declared as usize,
                    actual: inflated.len(),
                });
            }
            body = Bytes::from(inflated);
        }
    }
    let id = VarInt::proto_decode(&mut body)?.0;
    Ok((id, body.copy_to_bytes(body.remaining())))
}
