//! Status phase — server-list ping.

use bytes::{Buf, BufMut};

use crate::codec::{read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

/// Status Request (0x00) — Client → Server. Empty payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRequest;

impl StatusRequest {
    pub const ID: i32 = 0x00;
}

/// Ping Request (0x01) — Client → Server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingRequest {
    pub payload: i64,
}

impl PingRequest {
    pub const ID: i32 = 0x01;
}

impl ProtoDecode for PingRequest {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        if buf.remaining() < 8 {
            return Err(ProtoError::BufferTooShort {
                needed: 8,
                remaining: buf.remaining(),
            });
        }
        Ok(Self {
            payload: buf.get_i64(),
        })
    }
}

/// Status Response (0x00) — Server → Client. The status JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusResponse {
    pub json: String,
}

impl StatusResponse {
    pub const ID: i32 = 0x00;
}

impl ProtoEncode for StatusResponse {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        write_string(buf, &self.json);
    }
}

/// Ping Response (0x01) — Server → Client. Echoes the request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingResponse {
    pub payload: i64,
}

impl PingResponse {
    pub const ID: i32 = 0x01;
}

impl ProtoEncode for PingResponse {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_i64(self.payload);
    }
}

/// Serverbound status-phase packets.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerboundStatus {
    StatusRequest(StatusRequest),
    PingRequest(PingRequest),
}

impl ServerboundStatus {
    pub fn decode(id: i32, buf: &mut impl Buf) -> Result<Self, ProtoError> {
        match id {
            StatusRequest::ID => Ok(Self::StatusRequest(StatusRequest)),
            PingRequest::ID => Ok(Self::PingRequest(PingRequest::proto_decode(buf)?)),
            other => Err(ProtoError::UnknownPacketId(other)),
        }
    }
}

/// Clientbound status-phase packets.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientboundStatus {
    StatusResponse(StatusResponse),
    PingResponse(PingResponse),
}

impl ClientboundStatus {
    pub fn id(&self) -> i32 {
        match self {
            Self::StatusResponse(_) => StatusResponse::ID,
            Self::PingResponse(_) => PingResponse::ID,
        }
    }
}

impl ProtoEncode for ClientboundStatus {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        match self {
            Self::StatusResponse(p) => p.proto_encode(buf),
            Self::PingResponse(p) => p.proto_encode(buf),
        }
    }
}
