//! Login phase — name in, UUID out. No authentication or encryption.

use bytes::{Buf, BufMut};

use crate::codec::{read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::types::Uuid;

/// Login Start (0x00) — Client → Server.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginStart {
    pub name: String,
}

impl LoginStart {
    pub const ID: i32 = 0x00;
}

impl ProtoDecode for LoginStart {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(Self {
            name: read_string(buf)?,
        })
    }
}

/// Login Success (0x02) — Server → Client.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub uuid: Uuid,
    pub username: String,
}

impl LoginSuccess {
    pub const ID: i32 = 0x02;
}

impl ProtoEncode for LoginSuccess {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        self.uuid.proto_encode(buf);
        write_string(buf, &self.username);
    }
}

/// Serverbound login-phase packets.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerboundLogin {
    LoginStart(LoginStart),
}

impl ServerboundLogin {
    pub fn decode(id: i32, buf: &mut impl Buf) -> Result<Self, ProtoError> {
        match id {
            LoginStart::ID => Ok(Self::LoginStart(LoginStart::proto_decode(buf)?)),
            other => Err(ProtoError::UnknownPacketId(other)),
        }
    }
}

/// Clientbound login-phase packets.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientboundLogin {
    LoginSuccess(LoginSuccess),
}

impl ClientboundLogin {
    pub fn id(&self) -> i32 {
        match self {
            Self::LoginSuccess(_) => LoginSuccess::ID,
        }
    }
}

impl ProtoEncode for ClientboundLogin {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        match self {
            Self::LoginSuccess(p) => p.proto_encode(buf),
        }
    }
}
