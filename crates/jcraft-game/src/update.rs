//! Updates produced by tick processing, consumed by the fan-out stage.

use jcraft_proto::types::Position;

use crate::player::PlayerId;

/// One world effect queued for broadcast at the end of the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldUpdate {
    /// A block changed — broadcast a block update.
    BlockChange { pos: Position, state_id: u16 },
    /// A player joined — tab-info for everyone else.
    PlayerJoin { player: PlayerId },
    /// A player became visible — spawn their entity for everyone else.
    PlayerVisible { player: PlayerId },
    /// A player moved — relative motion for everyone else.
    PlayerMove { player: PlayerId },
}
