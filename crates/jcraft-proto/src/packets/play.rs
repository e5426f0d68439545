//! Play phase — the serverbound packets the simulation consumes and the
//! clientbound packets the world fan-out emits.

use bytes::{Buf, BufMut};

use crate::codec::{read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::types::{Position, Slot, Uuid, VarInt};

fn ensure(buf: &impl Buf, needed: usize) -> Result<(), ProtoError> {
    if buf.remaining() < needed {
        Err(ProtoError::BufferTooShort {
            needed,
            remaining: buf.remaining(),
        })
    } else {
        Ok(())
    }
}

fn read_bool(buf: &mut impl Buf) -> Result<bool, ProtoError> {
    ensure(buf, 1)?;
    Ok(buf.get_u8() != 0)
}

// ---------------------------------------------------------------------------
// Serverbound
// ---------------------------------------------------------------------------

/// Confirm Teleportation (0x00) — Client → Server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmTeleportation {
    pub teleport_id: i32,
}

impl ConfirmTeleportation {
    pub const ID: i32 = 0x00;
}

impl ProtoDecode for ConfirmTeleportation {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(Self {
            teleport_id: VarInt::proto_decode(buf)?.0,
        })
    }
}

/// Client Information (0x05) — Client → Server.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientInformation {
    pub locale: String,
    pub view_distance: i8,
    pub chat_mode: i32,
    pub chat_colors: bool,
    pub displayed_skin_parts: u8,
    pub main_hand: i32,
    pub enable_text_filtering: bool,
    pub allow_server_listings: bool,
}

impl ClientInformation {
    pub const ID: i32 = 0x05;
}

impl ProtoDecode for ClientInformation {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let locale = read_string(buf)?;
        ensure(buf, 1)?;
        let view_distance = buf.get_i8();
        let chat_mode = VarInt::proto_decode(buf)?.0;
        let chat_colors = read_bool(buf)?;
        ensure(buf, 1)?;
        let displayed_skin_parts = buf.get_u8();
        let main_hand = VarInt::proto_decode(buf)?.0;
        let enable_text_filtering = read_bool(buf)?;
        let allow_server_listings = read_bool(buf)?;
        Ok(Self {
            locale,
            view_distance,
            chat_mode,
            chat_colors,
            displayed_skin_parts,
            main_hand,
            enable_text_filtering,
            allow_server_listings,
        })
    }
}

/// Keep Alive — serverbound 0x0F, clientbound 0x21. Same eight-byte payload
/// both ways; the id echoes the issue timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlive {
    pub id: i64,
}

impl KeepAlive {
    pub const SERVERBOUND_ID: i32 = 0x0F;
    pub const CLIENTBOUND_ID: i32 = 0x21;
}

impl ProtoEncode for KeepAlive {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_i64(self.id);
    }
}

impl ProtoDecode for KeepAlive {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure(buf, 8)?;
        Ok(Self { id: buf.get_i64() })
    }
}

/// Set Player Position (0x11) — Client → Server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetPlayerPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub on_ground: bool,
}

impl SetPlayerPosition {
    pub const ID: i32 = 0x11;
}

impl ProtoDecode for SetPlayerPosition {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure(buf, 24)?;
        let x = buf.get_f64();
        let y = buf.get_f64();
        let z = buf.get_f64();
        let on_ground = read_bool(buf)?;
        Ok(Self { x, y, z, on_ground })
    }
}

/// Set Player Position and Rotation (0x12) — Client → Server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetPlayerPositionAndRotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl SetPlayerPositionAndRotation {
    pub const ID: i32 = 0x12;
}

impl ProtoDecode for SetPlayerPositionAndRotation {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure(buf, 32)?;
        let x = buf.get_f64();
        let y = buf.get_f64();
        let z = buf.get_f64();
        let yaw = buf.get_f32();
        let pitch = buf.get_f32();
        let on_ground = read_bool(buf)?;
        Ok(Self {
            x,
            y,
            z,
            yaw,
            pitch,
            on_ground,
        })
    }
}

/// Set Player Rotation (0x13) — Client → Server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetPlayerRotation {
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl SetPlayerRotation {
    pub const ID: i32 = 0x13;
}

impl ProtoDecode for SetPlayerRotation {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure(buf, 8)?;
        let yaw = buf.get_f32();
        let pitch = buf.get_f32();
        let on_ground = read_bool(buf)?;
        Ok(Self {
            yaw,
            pitch,
            on_ground,
        })
    }
}

/// Player Abilities (0x19) — Client → Server. Only the flying flag travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAbilities {
    pub flags: u8,
}

impl PlayerAbilities {
    pub const ID: i32 = 0x19;
}

impl ProtoDecode for PlayerAbilities {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure(buf, 1)?;
        Ok(Self { flags: buf.get_u8() })
    }
}

/// Player Action (0x1A) — Client → Server. Digging and related actions.
///
/// Status 0 = start digging, 1 = cancel, 2 = finish; creative clients tear a
/// block out with a single status-0 action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAction {
    pub status: i32,
    pub location: Position,
    pub face: i8,
}

impl PlayerAction {
    pub const ID: i32 = 0x1A;
}

impl ProtoDecode for PlayerAction {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let status = VarInt::proto_decode(buf)?.0;
        let location = Position::proto_decode(buf)?;
        ensure(buf, 1)?;
        let face = buf.get_i8();
        Ok(Self {
            status,
            location,
            face,
        })
    }
}

/// Player Command (0x1B) — Client → Server. Sneak/sprint state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCommand {
    pub entity_id: i32,
    pub action: i32,
    pub jump_boost: i32,
}

impl PlayerCommand {
    pub const ID: i32 = 0x1B;
}

impl ProtoDecode for PlayerCommand {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(Self {
            entity_id: VarInt::proto_decode(buf)?.0,
            action: VarInt::proto_decode(buf)?.0,
            jump_boost: VarInt::proto_decode(buf)?.0,
        })
    }
}

/// Set Held Item (0x25) — Client → Server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetHeldItem {
    pub slot: i16,
}

impl SetHeldItem {
    pub const ID: i32 = 0x25;
}

impl ProtoDecode for SetHeldItem {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure(buf, 2)?;
        Ok(Self { slot: buf.get_i16() })
    }
}

/// Set Creative Mode Slot (0x28) — Client → Server.
///
/// Slot numbering is the player inventory window; the hotbar occupies 36..=44.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetCreativeModeSlot {
    pub slot: i16,
    pub clicked_item: Slot,
}

impl SetCreativeModeSlot {
    pub const ID: i32 = 0x28;
}

impl ProtoDecode for SetCreativeModeSlot {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure(buf, 2)?;
        let slot = buf.get_i16();
        let clicked_item = Slot::proto_decode(buf)?;
        Ok(Self { slot, clicked_item })
    }
}

/// Swing Arm (0x2C) — Client → Server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwingArm {
    pub hand: i32,
}

impl SwingArm {
    pub const ID: i32 = 0x2C;
}

impl ProtoDecode for SwingArm {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(Self {
            hand: VarInt::proto_decode(buf)?.0,
        })
    }
}

/// Use Item On (0x2E) — Client → Server. Block placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UseItemOn {
    pub hand: i32,
    pub location: Position,
    pub face: i32,
    pub cursor_x: f32,
    pub cursor_y: f32,
    pub cursor_z: f32,
    pub inside_block: bool,
}

impl UseItemOn {
    pub const ID: i32 = 0x2E;
}

impl ProtoDecode for UseItemOn {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let hand = VarInt::proto_decode(buf)?.0;
        let location = Position::proto_decode(buf)?;
        let face = VarInt::proto_decode(buf)?.0;
        ensure(buf, 12)?;
        let cursor_x = buf.get_f32();
        let cursor_y = buf.get_f32();
        let cursor_z = buf.get_f32();
        let inside_block = read_bool(buf)?;
        Ok(Self {
            hand,
            location,
            face,
            cursor_x,
            cursor_y,
            cursor_z,
            inside_block,
        })
    }
}

/// Serverbound play-phase packets.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerboundPlay {
    ConfirmTeleportation(ConfirmTeleportation),
    ClientInformation(ClientInformation),
    KeepAlive(KeepAlive),
    SetPlayerPosition(SetPlayerPosition),
    SetPlayerPositionAndRotation(SetPlayerPositionAndRotation),
    SetPlayerRotation(SetPlayerRotation),
    PlayerAbilities(PlayerAbilities),
    PlayerAction(PlayerAction),
    PlayerCommand(PlayerCommand),
    SetHeldItem(SetHeldItem),
    SetCreativeModeSlot(SetCreativeModeSlot),
    SwingArm(SwingArm),
    UseItemOn(UseItemOn),
}

impl ServerboundPlay {
    pub fn decode(id: i32, buf: &mut impl Buf) -> Result<Self, ProtoError> {
        match id {
            ConfirmTeleportation::ID => Ok(Self::ConfirmTeleportation(
                ConfirmTeleportation::proto_decode(buf)?,
            )),
            ClientInformation::ID => {
                Ok(Self::ClientInformation(ClientInformation::proto_decode(buf)?))
            }
            KeepAlive::SERVERBOUND_ID => Ok(Self::KeepAlive(KeepAlive::proto_decode(buf)?)),
            SetPlayerPosition::ID => {
                Ok(Self::SetPlayerPosition(SetPlayerPosition::proto_decode(buf)?))
            }
            SetPlayerPositionAndRotation::ID => Ok(Self::SetPlayerPositionAndRotation(
                SetPlayerPositionAndRotation::proto_decode(buf)?,
            )),
            SetPlayerRotation::ID => {
                Ok(Self::SetPlayerRotation(SetPlayerRotation::proto_decode(buf)?))
            }
            PlayerAbilities::ID => Ok(Self::PlayerAbilities(PlayerAbilities::proto_decode(buf)?)),
            PlayerAction::ID => Ok(Self::PlayerAction(PlayerAction::proto_decode(buf)?)),
            PlayerCommand::ID => Ok(Self::PlayerCommand(PlayerCommand::proto_decode(buf)?)),
            SetHeldItem::ID => Ok(Self::SetHeldItem(SetHeldItem::proto_decode(buf)?)),
            SetCreativeModeSlot::ID => Ok(Self::SetCreativeModeSlot(
                SetCreativeModeSlot::proto_decode(buf)?,
            )),
            SwingArm::ID => Ok(Self::SwingArm(SwingArm::proto_decode(buf)?)),
            UseItemOn::ID => Ok(Self::UseItemOn(UseItemOn::proto_decode(buf)?)),
            other => Err(ProtoError::UnknownPacketId(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Clientbound
// ---------------------------------------------------------------------------

/// Spawn Player (0x04) — Server → Client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlayer {
    pub entity_id: i32,
    pub uuid: Uuid,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Rotation as 1/256ths of a full turn.
    pub yaw: u8,
    pub pitch: u8,
}

impl SpawnPlayer {
    pub const ID: i32 = 0x04;
}

impl ProtoEncode for SpawnPlayer {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarInt(self.entity_id).proto_encode(buf);
        self.uuid.proto_encode(buf);
        buf.put_f64(self.x);
        buf.put_f64(self.y);
        buf.put_f64(self.z);
        buf.put_u8(self.yaw);
        buf.put_u8(self.pitch);
    }
}

/// Block Update (0x0C) — Server → Client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockUpdate {
    pub location: Position,
    pub block_id: i32,
}

impl BlockUpdate {
    pub const ID: i32 = 0x0C;
}

impl ProtoEncode for BlockUpdate {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        self.location.proto_encode(buf);
        VarInt(self.block_id).proto_encode(buf);
    }
}

impl ProtoDecode for BlockUpdate {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(Self {
            location: Position::proto_decode(buf)?,
            block_id: VarInt::proto_decode(buf)?.0,
        })
    }
}

/// Chunk Data and Update Light (0x22) — Server → Client.
///
/// `heightmaps` and `data` arrive pre-serialized: the heightmap NBT from the
/// world and the concatenated section encodings from the chunk store.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkDataAndUpdateLight {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub heightmaps: Vec<u8>,
    pub data: Vec<u8>,
}

impl ChunkDataAndUpdateLight {
    pub const ID: i32 = 0x22;
}

impl ProtoEncode for ChunkDataAndUpdateLight {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_i32(self.chunk_x);
        buf.put_i32(self.chunk_z);
        buf.put_slice(&self.heightmaps);
        VarInt(self.data.len() as i32).proto_encode(buf);
        buf.put_slice(&self.data);
        VarInt(0).proto_encode(buf); // no block entities
        buf.put_u8(1); // trust edges
        // Four empty light BitSets, then two empty light-array lists.
        for _ in 0..4 {
            VarInt(0).proto_encode(buf);
        }
        VarInt(0).proto_encode(buf);
        VarInt(0).proto_encode(buf);
    }
}

/// Join Game (0x26) — Server → Client.
///
/// `dimension_codec` and `dimension` are pre-serialized NBT blobs.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinGame {
    pub entity_id: i32,
    pub is_hardcore: bool,
    pub gamemode: u8,
    pub previous_gamemode: i8,
    pub world_names: Vec<String>,
    pub dimension_codec: Vec<u8>,
    pub dimension: Vec<u8>,
    pub world_name: String,
    pub hashed_seed: i64,
    pub max_players: i32,
    pub view_distance: i32,
    pub simulation_distance: i32,
    pub reduced_debug_info: bool,
    pub enable_respawn_screen: bool,
    pub is_debug: bool,
    pub is_flat: bool,
}

impl JoinGame {
    pub const ID: i32 = 0x26;
}

impl ProtoEncode for JoinGame {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_i32(self.entity_id);
        buf.put_u8(self.is_hardcore as u8);
        buf.put_u8(self.gamemode);
        buf.put_i8(self.previous_gamemode);
        VarInt(self.world_names.len() as i32).proto_encode(buf);
        for name in &self.world_names {
            write_string(buf, name);
        }
        buf.put_slice(&self.dimension_codec);
        buf.put_slice(&self.dimension);
        write_string(buf, &self.world_name);
        buf.put_i64(self.hashed_seed);
        VarInt(self.max_players).proto_encode(buf);
        VarInt(self.view_distance).proto_encode(buf);
        VarInt(self.simulation_distance).proto_encode(buf);
        buf.put_u8(self.reduced_debug_info as u8);
        buf.put_u8(self.enable_respawn_screen as u8);
        buf.put_u8(self.is_debug as u8);
        buf.put_u8(self.is_flat as u8);
    }
}

/// Update Entity Position (0x29) — Server → Client. Bounded relative motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateEntityPosition {
    pub entity_id: i32,
    pub delta_x: i16,
    pub delta_y: i16,
    pub delta_z: i16,
    pub on_ground: bool,
}

impl UpdateEntityPosition {
    pub const ID: i32 = 0x29;
}

impl ProtoEncode for UpdateEntityPosition {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarInt(self.entity_id).proto_encode(buf);
        buf.put_i16(self.delta_x);
        buf.put_i16(self.delta_y);
        buf.put_i16(self.delta_z);
        buf.put_u8(self.on_ground as u8);
    }
}

/// One tab-list entry carried by [`PlayerInfo`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInfoEntry {
    pub uuid: Uuid,
    pub name: String,
    pub gamemode: i32,
    pub ping_ms: i32,
}

/// Player Info (0x36) — Server → Client. Only the add-player action (0) is
/// emitted by this core.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInfo {
    pub entries: Vec<PlayerInfoEntry>,
}

impl PlayerInfo {
    pub const ID: i32 = 0x36;
    const ACTION_ADD_PLAYER: i32 = 0;
}

impl ProtoEncode for PlayerInfo {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarInt(Self::ACTION_ADD_PLAYER).proto_encode(buf);
        VarInt(self.entries.len() as i32).proto_encode(buf);
        for entry in &self.entries {
            entry.uuid.proto_encode(buf);
            write_string(buf, &entry.name);
            VarInt(0).proto_encode(buf); // no profile properties
            VarInt(entry.gamemode).proto_encode(buf);
            VarInt(entry.ping_ms).proto_encode(buf);
            buf.put_u8(0); // no display name
        }
    }
}

/// Synchronize Player Position (0x38) — Server → Client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynchronizePlayerPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    /// Relative-coordinate bitmask; 0 = all absolute.
    pub flags: u8,
    pub teleport_id: i32,
    pub dismount_vehicle: bool,
}

impl SynchronizePlayerPosition {
    pub const ID: i32 = 0x38;
}

impl ProtoEncode for SynchronizePlayerPosition {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_f64(self.x);
        buf.put_f64(self.y);
        buf.put_f64(self.z);
        buf.put_f32(self.yaw);
        buf.put_f32(self.pitch);
        buf.put_u8(self.flags);
        VarInt(self.teleport_id).proto_encode(buf);
        buf.put_u8(self.dismount_vehicle as u8);
    }
}

/// Clientbound play-phase packets.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientboundPlay {
    SpawnPlayer(SpawnPlayer),
    BlockUpdate(BlockUpdate),
    KeepAlive(KeepAlive),
    ChunkDataAndUpdateLight(ChunkDataAndUpdateLight),
    JoinGame(JoinGame),
    UpdateEntityPosition(UpdateEntityPosition),
    PlayerInfo(PlayerInfo),
    SynchronizePlayerPosition(SynchronizePlayerPosition),
}

impl ClientboundPlay {
    pub fn id(&self) -> i32 {
        match self {
            Self::SpawnPlayer(_) => SpawnPlayer::ID,
            Self::BlockUpdate(_) => BlockUpdate::ID,
            Self::KeepAlive(_) => KeepAlive::CLIENTBOUND_ID,
            Self::ChunkDataAndUpdateLight(_) => ChunkDataAndUpdateLight::ID,
            Self::JoinGame(_) => JoinGame::ID,
            Self::UpdateEntityPosition(_) => UpdateEntityPosition::ID,
            Self::PlayerInfo(_) => PlayerInfo::ID,
            Self::SynchronizePlayerPosition(_) => SynchronizePlayerPosition::ID,
        }
    }
}

impl ProtoEncode for ClientboundPlay {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        match self {
            Self::SpawnPlayer(p) => p.proto_encode(buf),
            Self::BlockUpdate(p) => p.proto_encode(buf),
            Self::KeepAlive(p) => p.proto_encode(buf),
            Self::ChunkDataAndUpdateLight(p) => p.proto_encode(buf),
            Self::JoinGame(p) => p.proto_encode(buf),
            Self::UpdateEntityPosition(p) => p.proto_encode(buf),
            Self::PlayerInfo(p) => p.proto_encode(buf),
            Self::SynchronizePlayerPosition(p) => p.proto_encode(buf),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn keep_alive_roundtrip() {
        let mut buf = BytesMut::new();
        KeepAlive { id: 1_654_000_123_456 }.proto_encode(&mut buf);
        assert_eq!(buf.len(), 8);
        let decoded = KeepAlive::proto_decode(&mut buf.freeze()).unwrap();
        assert_eq!(decoded.id, 1_654_000_123_456);
    }

    #[test]
    fn decode_use_item_on() {
        let mut buf = BytesMut::new();
        VarInt(0).proto_encode(&mut buf); // main hand
        Position::new(0, 64, 0).proto_encode(&mut buf);
        VarInt(1).proto_encode(&mut buf); // +Y face
        buf.put_f32(0.5);
        buf.put_f32(1.0);
        buf.put_f32(0.5);
        buf.put_u8(0);

        let pkt = match ServerboundPlay::decode(UseItemOn::ID, &mut buf.freeze()).unwrap() {
            ServerboundPlay::UseItemOn(p) => p,
            other => panic!("wrong variant: {other:?}"),
        };
        assert_eq!(pkt.location, Position::new(0, 64, 0));
        assert_eq!(pkt.face, 1);
        assert!(!pkt.inside_block);
    }

    #[test]
    fn decode_player_action() {
        let mut buf = BytesMut::new();
        VarInt(0).proto_encode(&mut buf); // start digging
        Position::new(0, 65, 0).proto_encode(&mut buf);
        buf.put_i8(1);

        let pkt = match ServerboundPlay::decode(PlayerAction::ID, &mut buf.freeze()).unwrap() {
            ServerboundPlay::PlayerAction(p) => p,
            other => panic!("wrong variant: {other:?}"),
        };
        assert_eq!(pkt.status, 0);
        assert_eq!(pkt.location, Position::new(0, 65, 0));
    }

    #[test]
    fn decode_set_creative_mode_slot() {
        let mut buf = BytesMut::new();
        buf.put_i16(36);
        Slot::filled(1, 1).proto_encode(&mut buf);

        let pkt =
            match ServerboundPlay::decode(SetCreativeModeSlot::ID, &mut buf.freeze()).unwrap() {
                ServerboundPlay::SetCreativeModeSlot(p) => p,
                other => panic!("wrong variant: {other:?}"),
            };
        assert_eq!(pkt.slot, 36);
        assert_eq!(pkt.clicked_item, Slot::filled(1, 1));
    }

    #[test]
    fn unknown_play_id() {
        let empty = bytes::Bytes::new();
        assert!(matches!(
            ServerboundPlay::decode(0x7F, &mut empty.clone()),
            Err(ProtoError::UnknownPacketId(0x7F))
        ));
    }

    #[test]
    fn block_update_roundtrip() {
        let pkt = BlockUpdate {
            location: Position::new(0, 65, 0),
            block_id: 1,
        };
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf);
        let decoded = BlockUpdate::proto_decode(&mut buf.freeze()).unwrap();
        assert_eq!(decoded, pkt);
    }

    #[test]
    fn chunk_data_tail_is_empty_light() {
        let pkt = ChunkDataAndUpdateLight {
            chunk_x: 0,
            chunk_z: 0,
            heightmaps: vec![0x0A, 0x00, 0x00, 0x00], // tiny stand-in blob
            data: vec![1, 2, 3],
        };
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf);
        // i32 x + i32 z + 4 heightmap bytes + VarInt(3) + 3 data bytes,
        // then: VarInt(0) block entities, trust-edges byte, 4 empty BitSets,
        // 2 empty light-array lists.
        let tail = &buf[8 + 4 + 1 + 3..];
        assert_eq!(tail, &[0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn player_info_single_entry() {
        let pkt = PlayerInfo {
            entries: vec![PlayerInfoEntry {
                uuid: Uuid(1),
                name: "tester".into(),
                gamemode: 1,
                ping_ms: 0,
            }],
        };
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf);
        // action 0, count 1
        assert_eq!(buf[0], 0x00);
        assert_eq!(buf[1], 0x01);
    }

    #[test]
    fn update_entity_position_layout() {
        let pkt = UpdateEntityPosition {
            entity_id: 2,
            delta_x: 4096, // one full block: 32 * 128
            delta_y: 0,
            delta_z: -4096,
            on_ground: true,
        };
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf);
        assert_eq!(buf.len(), 1 + 2 + 2 + 2 + 1);
        assert_eq!(&buf[1..3], &4096i16.to_be_bytes());
    }
}
