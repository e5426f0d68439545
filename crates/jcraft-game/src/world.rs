//! The world manager: dimensions, the player roster, the client-ingress
//! queue, the fixed-rate tick body, and the per-tick update fan-out.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;

use bytes::BytesMut;
use tracing::{debug, info, trace};

use jcraft_proto::codec::ProtoEncode;
use jcraft_proto::frame;
use jcraft_proto::packets::{
    BlockUpdate, ChunkDataAndUpdateLight, ClientboundPlay, JoinGame, PlayerInfo, PlayerInfoEntry,
    ServerboundPlay, SpawnPlayer, SynchronizePlayerPosition, UpdateEntityPosition,
};
use jcraft_proto::types::{BlockFace, Position};
use jcraft_world::block_tick::TickScheduler;
use jcraft_world::catalog::AIR_ID;
use jcraft_world::flat::FLAT_SURFACE_Y;
use jcraft_world::heightmap;
use jcraft_world::Chunk;

use crate::player::{DimensionKind, Outbound, OutboundSender, Player, PlayerId, Vec3};
use crate::registry_nbt;
use crate::update::WorldUpdate;

/// The six orthogonal neighbor offsets.
const NEIGHBOR_OFFSETS: [(i32, i32, i32); 6] = [
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
    (-1, 0, 0),
    (1, 0, 0),
];

const GAMEMODE_CREATIVE: u8 = 1;
const VIEW_DISTANCE: i32 = 10;

/// Per-dimension mutable state, guarded by one mutex each.
pub struct Dimension {
    pub kind: DimensionKind,
    /// Loaded chunks, in load order.
    pub chunks: Vec<Chunk>,
    /// Scheduled block updates.
    pub tick_queue: TickScheduler,
}

struct RosterEntry {
    id: PlayerId,
    player: Player,
}

/// Process-wide world state.
pub struct WorldManager {
    dimensions: Vec<Mutex<Dimension>>,
    players: Mutex<Vec<RosterEntry>>,
    ingress: Mutex<VecDeque<(PlayerId, ServerboundPlay)>>,
    updates: Mutex<Vec<WorldUpdate>>,
    tick_counter: AtomicU64,
    next_player_id: AtomicU32,
    max_players: i32,
    spawn_y: f64,
}

impl WorldManager {
    /// Build the manager with one bootstrap chunk loaded into the overworld.
    pub fn new(bootstrap: Chunk, max_players: i32, spawn_y: f64) -> Self {
        let dimensions = DimensionKind::ALL
            .into_iter()
            .map(|kind| {
                let chunks = if kind == DimensionKind::Overworld {
                    vec![bootstrap.clone()]
                } else {
                    Vec::new()
                };
                Mutex::new(Dimension {
                    kind,
                    chunks,
                    tick_queue: TickScheduler::new(),
                })
            })
            .collect();
        Self {
            dimensions,
            players: Mutex::new(Vec::new()),
            ingress: Mutex::new(VecDeque::new()),
            updates: Mutex::new(Vec::new()),
            tick_counter: AtomicU64::new(0),
            next_player_id: AtomicU32::new(0),
            max_players,
            spawn_y,
        }
    }

    /// Where new players appear.
    pub fn spawn_pos(&self) -> Vec3 {
        Vec3::new(0.0, self.spawn_y, 0.0)
    }

    pub fn online_count(&self) -> usize {
        self.players.lock().unwrap().len()
    }

    pub fn current_tick(&self) -> u64 {
        self.tick_counter.load(Ordering::Relaxed)
    }

    // -----------------------------------------------------------------
    // Ingress
    // -----------------------------------------------------------------

    /// Queue a play packet for the next tick. Thread-safe; callers are the
    /// per-connection session tasks.
    pub fn submit(&self, player: PlayerId, packet: ServerboundPlay) {
        self.ingress.lock().unwrap().push_back((player, packet));
    }

    // -----------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------

    /// Admit a player: send the join sequence and queue their announcement
    /// updates for the next tick's fan-out.
    pub fn add_player(&self, player: Player) -> PlayerId {
        let id = PlayerId(self.next_player_id.fetch_add(1, Ordering::Relaxed));
        let outbound = player.outbound.clone();
        let name = player.name.clone();
        let spawn = player.pos;

        let entity_id = {
            let mut players = self.players.lock().unwrap();
            players.push(RosterEntry { id, player });
            (players.len() - 1) as i32
        };

        send_to(
            &outbound,
            &ClientboundPlay::JoinGame(JoinGame {
                entity_id,
                is_hardcore: false,
                gamemode: GAMEMODE_CREATIVE,
                previous_gamemode: -1,
                world_names: vec![DimensionKind::Overworld.name().to_string()],
                dimension_codec: registry_nbt::dimension_codec().to_vec(),
                dimension: registry_nbt::overworld_dimension().to_vec(),
                world_name: DimensionKind::Overworld.name().to_string(),
                hashed_seed: 0,
                max_players: self.max_players,
                view_distance: VIEW_DISTANCE,
                simulation_distance: VIEW_DISTANCE,
                reduced_debug_info: false,
                enable_respawn_screen: true,
                is_debug: false,
                is_flat: true,
            }),
        );

        let chunk_packet = {
            let dim = self.dimension(DimensionKind::Overworld).lock().unwrap();
            let chunk = dim
                .chunks
                .iter()
                .find(|c| c.x == 0 && c.z == 0)
                .or_else(|| dim.chunks.first())
                .expect("overworld holds at least the bootstrap chunk");
            chunk_data_packet(chunk)
        };
        send_to(&outbound, &chunk_packet);

        send_to(
            &outbound,
            &ClientboundPlay::SynchronizePlayerPosition(SynchronizePlayerPosition {
                x: spawn.x,
                y: spawn.y,
                z: spawn.z,
                yaw: 0.0,
                pitch: 0.0,
                flags: 0,
                teleport_id: 1,
                dismount_vehicle: false,
            }),
        );

        {
            let mut updates = self.updates.lock().unwrap();
            updates.push(WorldUpdate::PlayerJoin { player: id });
            updates.push(WorldUpdate::PlayerVisible { player: id });
        }

        info!("{name} joined as entity {entity_id}");
        id
    }

    /// Drop a player from the roster; fan-out naturally skips them after.
    pub fn remove_player(&self, id: PlayerId) {
        let mut players = self.players.lock().unwrap();
        if let Some(index) = players.iter().position(|e| e.id == id) {
            let entry = players.remove(index);
            info!("{} left", entry.player.name);
        }
    }

    /// Update the active hotbar slot.
    pub fn set_held_slot(&self, id: PlayerId, slot: u8) {
        debug_assert!(slot <= 8);
        self.with_player(id, |p| p.held_slot = slot);
    }

    /// Put a block state into a hotbar slot.
    pub fn set_hotbar_slot(&self, id: PlayerId, index: usize, state: u16) {
        debug_assert!(index < 9);
        self.with_player(id, |p| p.hotbar[index] = state);
    }

    fn with_player<R>(&self, id: PlayerId, f: impl FnOnce(&mut Player) -> R) -> Option<R> {
        let mut players = self.players.lock().unwrap();
        players
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| f(&mut e.player))
    }

    fn dimension(&self, kind: DimensionKind) -> &Mutex<Dimension> {
        &self.dimensions[kind as usize]
    }

    // -----------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------

    /// One 50 ms tick: dimension simulation, ingress drain, fan-out.
    /// Everything a tick processes is observed in that tick's broadcasts.
    pub fn tick(&self) {
        let now = self.tick_counter.fetch_add(1, Ordering::Relaxed);

        for dim in &self.dimensions {
            let mut dim = dim.lock().unwrap();
            for chunk in &mut dim.chunks {
                chunk_tick(chunk);
            }
            for scheduled in dim.tick_queue.drain_ready(now) {
                for (dx, dy, dz) in NEIGHBOR_OFFSETS {
                    neighbor_update(&mut dim, scheduled.x + dx, scheduled.y + dy, scheduled.z + dz);
                }
            }
        }

        let drained = std::mem::take(&mut *self.ingress.lock().unwrap());
        for (player, packet) in drained {
            self.apply_packet(player, packet, now);
        }

        let updates = std::mem::take(&mut *self.updates.lock().unwrap());
        if !updates.is_empty() {
            self.fan_out(&updates);
        }
    }

    fn apply_packet(&self, id: PlayerId, packet: ServerboundPlay, now: u64) {
        match packet {
            ServerboundPlay::SetPlayerPosition(p) => self.move_player(id, p.x, p.y, p.z),
            ServerboundPlay::SetPlayerPositionAndRotation(p) => {
                self.move_player(id, p.x, p.y, p.z)
            }
            ServerboundPlay::PlayerAction(p) if p.status == 0 || p.status == 1 => {
                self.set_block(DimensionKind::Overworld, p.location, AIR_ID, now);
            }
            ServerboundPlay::UseItemOn(p) => {
                let Ok(face) = BlockFace::from_i32(p.face) else {
                    debug!("discarding placement with invalid face {}", p.face);
                    return;
                };
                let target = p.location.offset(face);
                let state = self
                    .with_player(id, |pl| pl.hotbar[pl.held_slot as usize])
                    .unwrap_or(AIR_ID);
                if state != AIR_ID {
                    self.set_block(DimensionKind::Overworld, target, state, now);
                }
            }
            other => trace!("accepted and ignored: {other:?}"),
        }
    }

    fn move_player(&self, id: PlayerId, x: f64, y: f64, z: f64) {
        let moved = self.with_player(id, |p| {
            p.last_sent_pos = p.pos;
            p.pos = Vec3::new(x, y, z);
        });
        if moved.is_some() {
            self.updates
                .lock()
                .unwrap()
                .push(WorldUpdate::PlayerMove { player: id });
        }
    }

    /// Mutate a block, schedule its neighbor tick, queue the broadcast.
    fn set_block(&self, dimension: DimensionKind, pos: Position, state: u16, now: u64) {
        let changed = {
            let mut dim = self.dimension(dimension).lock().unwrap();
            let (chunk_x, chunk_z) = pos.chunk();
            let Some(chunk) = dim
                .chunks
                .iter_mut()
                .find(|c| c.x == chunk_x && c.z == chunk_z)
            else {
                debug!("block change in unloaded chunk ({chunk_x}, {chunk_z})");
                return;
            };
            let changed = chunk.change_block(
                pos.x.rem_euclid(16) as usize,
                pos.y,
                pos.z.rem_euclid(16) as usize,
                state,
            );
            if changed {
                dim.tick_queue.schedule(pos.x, pos.y, pos.z, 1, now);
            }
            changed
        };
        if changed {
            self.updates
                .lock()
                .unwrap()
                .push(WorldUpdate::BlockChange { pos, state_id: state });
        } else {
            debug!("block change at {pos} out of world range");
        }
    }

    // -----------------------------------------------------------------
    // Fan-out
    // -----------------------------------------------------------------

    fn fan_out(&self, updates: &[WorldUpdate]) {
        let players = self.players.lock().unwrap();
        for update in updates {
            match *update {
                WorldUpdate::BlockChange { pos, state_id } => {
                    let packet = ClientboundPlay::BlockUpdate(BlockUpdate {
                        location: pos,
                        block_id: state_id as i32,
                    });
                    for entry in players.iter() {
                        send_to(&entry.player.outbound, &packet);
                    }
                }
                WorldUpdate::PlayerJoin { player } => {
                    let Some(subject) = players.iter().find(|e| e.id == player) else {
                        continue;
                    };
                    let packet = ClientboundPlay::PlayerInfo(PlayerInfo {
                        entries: vec![PlayerInfoEntry {
                            uuid: subject.player.uuid,
                            name: subject.player.name.clone(),
                            gamemode: GAMEMODE_CREATIVE as i32,
                            ping_ms: 0,
                        }],
                    });
                    for entry in players.iter().filter(|e| e.id != player) {
                        send_to(&entry.player.outbound, &packet);
                    }
                }
                WorldUpdate::PlayerVisible { player } => {
                    let Some((index, subject)) = players
                        .iter()
                        .enumerate()
                        .find(|(_, e)| e.id == player)
                    else {
                        continue;
                    };
                    let packet = ClientboundPlay::SpawnPlayer(SpawnPlayer {
                        entity_id: index as i32,
                        uuid: subject.player.uuid,
                        x: subject.player.pos.x,
                        y: subject.player.pos.y,
                        z: subject.player.pos.z,
                        yaw: 0,
                        pitch: 0,
                    });
                    for entry in players.iter().filter(|e| e.id != player) {
                        send_to(&entry.player.outbound, &packet);
                    }
                }
                WorldUpdate::PlayerMove { player } => {
                    let Some((index, subject)) = players
                        .iter()
                        .enumerate()
                        .find(|(_, e)| e.id == player)
                    else {
                        continue;
                    };
                    let p = &subject.player;
                    let packet = ClientboundPlay::UpdateEntityPosition(UpdateEntityPosition {
                        entity_id: index as i32,
                        delta_x: motion_delta(p.pos.x, p.last_sent_pos.x),
                        delta_y: motion_delta(p.pos.y, p.last_sent_pos.y),
                        delta_z: motion_delta(p.pos.z, p.last_sent_pos.z),
                        on_ground: true,
                    });
                    for entry in players.iter().filter(|e| e.id != player) {
                        send_to(&entry.player.outbound, &packet);
                    }
                }
            }
        }
    }
}

/// Per-chunk simulation hook, run every tick.
fn chunk_tick(_chunk: &mut Chunk) {
    // Chunk-local simulation (fluids, random ticks) slots in here.
}

/// React to a block change next to `(x, y, z)`.
fn neighbor_update(dim: &mut Dimension, x: i32, y: i32, z: i32) {
    let (chunk_x, chunk_z) = (x >> 4, z >> 4);
    let Some(chunk) = dim.chunks.iter().find(|c| c.x == chunk_x && c.z == chunk_z) else {
        return;
    };
    let state = chunk.get_block(x.rem_euclid(16) as usize, y, z.rem_euclid(16) as usize);
    trace!("neighbor update at ({x}, {y}, {z}): state {state:?}");
}

/// The protocol's bounded relative motion: `(cur·32 − prev·32)·128`.
fn motion_delta(current: f64, previous: f64) -> i16 {
    ((current * 32.0 - previous * 32.0) * 128.0) as i16
}

/// Frame a clientbound play packet and hand it to a connection's writer.
/// A closed channel means the session is gone; the roster catches up on the
/// next removal.
fn send_to(outbound: &OutboundSender, packet: &ClientboundPlay) {
    let mut payload = BytesMut::new();
    packet.proto_encode(&mut payload);
    let framed = frame::encode_frame(packet.id(), &payload, None);
    let _ = outbound.send(Outbound::Frame(framed));
}

/// Encode one chunk (with a synthesized heightmap) for the join sequence.
fn chunk_data_packet(chunk: &Chunk) -> ClientboundPlay {
    let mut data = BytesMut::new();
    chunk.encode(&mut data);
    let surface_height = (FLAT_SURFACE_Y + 1 - chunk.min_block_y()) as u16;
    ClientboundPlay::ChunkDataAndUpdateLight(ChunkDataAndUpdateLight {
        chunk_x: chunk.x,
        chunk_z: chunk.z,
        heightmaps: heightmap::motion_blocking_nbt(surface_height),
        data: data.to_vec(),
    })
}

// ===========================================================================
// Tests
// ===========================================================================
