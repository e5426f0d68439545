//! Packet definitions for the four protocol phases, 1.18.2 wire ids.

pub mod handshaking;
pub mod login;
pub mod play;
pub mod status;

pub use handshaking::{Handshake, ServerboundHandshaking};
pub use login::{ClientboundLogin, LoginStart, LoginSuccess, ServerboundLogin};
pub use play::{
    BlockUpdate, ChunkDataAndUpdateLight, ClientInformation, ClientboundPlay,
    ConfirmTeleportation, JoinGame, KeepAlive, PlayerAbilities, PlayerAction, PlayerCommand,
    PlayerInfo, PlayerInfoEntry, ServerboundPlay, SetCreativeModeSlot, SetHeldItem,
    SetPlayerPosition, SetPlayerPositionAndRotation, SetPlayerRotation, SpawnPlayer, SwingArm,
    SynchronizePlayerPosition, UpdateEntityPosition, UseItemOn,
};
pub use status::{
    ClientboundStatus, PingRequest, PingResponse, ServerboundStatus, StatusRequest, StatusResponse,
};
