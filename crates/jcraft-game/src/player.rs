//! Player records and the outbound connection handle.

use jcraft_proto::types::Uuid;
use tokio::sync::mpsc;

/// A message for a connection's writer task.
#[derive(Debug)]
pub enum Outbound {
    /// A fully framed packet, ready for the socket.
    Frame(Vec<u8>),
    /// Shut the socket down and stop the writer.
    Close,
}

/// Sending half of a connection's outbound channel.
pub type OutboundSender = mpsc::UnboundedSender<Outbound>;

/// Stable handle for a player across roster mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u32);

/// A double-precision position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// The dimensions a player can inhabit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionKind {
    Overworld,
    Nether,
    End,
}

impl DimensionKind {
    pub const ALL: [DimensionKind; 3] = [
        DimensionKind::Overworld,
        DimensionKind::Nether,
        DimensionKind::End,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Overworld => "minecraft:overworld",
            Self::Nether => "minecraft:the_nether",
            Self::End => "minecraft:the_end",
        }
    }
}

/// Per-player game state held by the roster.
#[derive(Debug)]
pub struct Player {
    pub outbound: OutboundSender,
    pub uuid: Uuid,
    pub name: String,
    pub pos: Vec3,
    /// Position as of the last broadcast, for relative-motion deltas.
    pub last_sent_pos: Vec3,
    pub dimension: DimensionKind,
    /// Active hotbar slot, 0..=8.
    pub held_slot: u8,
    /// Hotbar contents as block-state ids; 0 (air) means empty.
    pub hotbar: [u16; 9],
}

impl Player {
    pub fn new(outbound: OutboundSender, uuid: Uuid, name: String, spawn: Vec3) -> Self {
        Self {
            outbound,
            uuid,
            name,
            pos: spawn,
            last_sent_pos: spawn,
            dimension: DimensionKind::Overworld,
            held_slot: 0,
            hotbar: [0; 9],
        }
    }
}
