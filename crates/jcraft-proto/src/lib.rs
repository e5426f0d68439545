//! Minecraft Java Edition protocol types and packet definitions (1.18.2, protocol 758).

/// Protocol number spoken by this server (1.18.2).
pub const PROTOCOL_VERSION: i32 = 758;
/// Matching game version string.
pub const GAME_VERSION: &str = "1.18.2";

pub mod codec;
pub mod compression;
pub mod error;
pub mod frame;
pub mod packets;
pub mod types;
