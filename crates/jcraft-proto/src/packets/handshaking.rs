//! Handshaking phase — the single client-to-server packet that selects the
//! next protocol phase.

use bytes::Buf;

use crate::codec::{read_string, ProtoDecode};
use crate::error::ProtoError;
use crate::types::VarInt;

/// Handshake (0x00) — Client → Server.
#[derive(Debug, Clone, PartialEq)]
pub struct Handshake {
    pub protocol_version: i32,
    pub server_address: String,
    pub server_port: u16,
    /// 1 = status, 2 = login.
    pub next_state: i32,
}

impl Handshake {
    pub const ID: i32 = 0x00;
}

impl ProtoDecode for Handshake {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let protocol_version = VarInt::proto_decode(buf)?.0;
        let server_address = read_string(buf)?;
        if buf.remaining() < 2 {
            return Err(ProtoError::BufferTooShort {
                needed: 2,
                remaining: buf.remaining(),
            });
        }
        let server_port = buf.get_u16();
        let next_state = VarInt::proto_decode(buf)?.0;
        Ok(Self {
            protocol_version,
            server_address,
            server_port,
            next_state,
        })
    }
}

/// Serverbound handshaking-phase packets.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerboundHandshaking {
    Handshake(Handshake),
}

impl ServerboundHandshaking {
    pub fn decode(id: i32, buf: &mut impl Buf) -> Result<Self, ProtoError> {
        match id {
            Handshake::ID => Ok(Self::Handshake(Handshake::proto_decode(buf)?)),
            other => Err(ProtoError::UnknownPacketId(other)),
        }
    }
}
