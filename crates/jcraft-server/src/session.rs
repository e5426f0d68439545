//! Per-connection session: the protocol phase machine, the frame pump, the
//! keep-alive discipline, and the legacy-ping shim.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use bytes::{Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Notify};
use tracing::{debug, info, trace, warn};

use jcraft_game::{Outbound, OutboundSender, Player, PlayerId, WorldManager};
use jcraft_proto::codec::ProtoEncode;
use jcraft_proto::error::ProtoError;
use jcraft_proto::frame::{self, MAX_PACKET_LEN};
use jcraft_proto::packets::{
    ClientboundLogin, ClientboundStatus, KeepAlive, LoginSuccess, PingResponse,
    ServerboundHandshaking, ServerboundLogin, ServerboundPlay, ServerboundStatus, StatusResponse,
};
use jcraft_proto::types::Uuid;
use jcraft_world::catalog;

use crate::config::ServerConfig;
use crate::status;

/// First hotbar slot in the player-inventory window numbering.
const HOTBAR_SLOT_BASE: i16 = 36;

/// The fixed pre-Netty server-list-ping kick: `0xFF`, a big-endian UCS-2
/// char count, then `§1\0127\01.18\0` in UCS-2.
pub const LEGACY_KICK: [u8; 27] = [
    0xFF, 0x00, 0x0C, //
    0x00, 0xA7, 0x00, 0x31, 0x00, 0x00, //
    0x00, 0x31, 0x00, 0x32, 0x00, 0x37, 0x00, 0x00, //
    0x00, 0x31, 0x00, 0x2E, 0x00, 0x31, 0x00, 0x38, 0x00, 0x00,
];

/// Keep-alive cadence. Tests inject shorter values.
#[derive(Debug, Clone, Copy)]
pub struct KeepAliveTimings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for KeepAliveTimings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(20),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Protocol phases a session moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Handshaking,
    Status,
    Login,
    Play,
    CloseConnection,
}

#[derive(Debug, Clone, Copy)]
struct KeepAliveSlot {
    id: i64,
    issued: Instant,
}

/// Mutable session state shared between the ingress loop and the keep-alive
/// task.
pub struct SessionState {
    pub phase: Phase,
    /// Whether incoming frames carry the compression layer. Never negotiated
    /// by this server, but honored when set.
    pub compression: bool,
    keep_alive: [Option<KeepAliveSlot>; 2],
    pub timed_out: bool,
    pub player: Option<PlayerId>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            phase: Phase::Handshaking,
            compression: false,
            keep_alive: [None; 2],
            timed_out: false,
            player: None,
        }
    }
}

/// Server-wide context handed to every connection.
pub struct SessionContext {
    pub world: Arc<WorldManager>,
    pub config: Arc<ServerConfig>,
    pub timings: KeepAliveTimings,
}

#[derive(Debug, Error)]
enum SessionError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Proto(#[from] ProtoError),
}

/// Drive one connection to completion.
pub async fn run_connection(stream: TcpStream, ctx: Arc<SessionContext>) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".into());
    let (mut reader, writer) = stream.into_split();
    let (outbound, outbound_rx) = mpsc::unbounded_channel();
    tokio::spawn(writer_task(writer, outbound_rx));

    let state = Arc::new(Mutex::new(SessionState::new()));
    let close = Arc::new(Notify::new());
    let result = session_loop(&mut reader, &outbound, &state, &ctx, &close).await;

    let (player, timed_out) = {
        let mut s = state.lock().unwrap();
        s.phase = Phase::CloseConnection;
        (s.player.take(), s.timed_out)
    };
    if let Some(id) = player {
        ctx.world.remove_player(id);
    }
    let _ = outbound.send(Outbound::Close);

    match result {
        Ok(()) if timed_out => info!("session {peer} closed after keep-alive timeout"),
        Ok(()) => debug!("session {peer} closed"),
        Err(SessionError::Io(e)) => debug!("session {peer} ended: {e}"),
        Err(SessionError::Proto(e)) => debug!("session {peer} ended on bad input: {e}"),
    }
}

async fn writer_task(mut writer: OwnedWriteHalf, mut rx: mpsc::UnboundedReceiver<Outbound>) {
    while let Some(message) = rx.recv().await {
        match message {
            Outbound::Frame(frame) => {
                if writer.write_all(&frame).await.is_err() {
                    break;
                }
            }
            Outbound::Close => {
                let _ = writer.shutdown().await;
                break;
            }
        }
    }
}

async fn session_loop(
    reader: &mut OwnedReadHalf,
    outbound: &OutboundSender,
    state: &Arc<Mutex<SessionState>>,
    ctx: &Arc<SessionContext>,
    close: &Arc<Notify>,
) -> Result<(), SessionError> {
    // One-byte peek for the pre-Netty ping backdoor.
    let first = reader.read_u8().await?;
    if first == 0xFE {
        debug!("legacy ping, sending kick string");
        let _ = outbound.send(Outbound::Frame(LEGACY_KICK.to_vec()));
        let _ = outbound.send(Outbound::Close);
        state.lock().unwrap().phase = Phase::CloseConnection;
        return Ok(());
    }

    let mut pending_first = Some(first);
    loop {
        if state.lock().unwrap().phase == Phase::CloseConnection {
            return Ok(());
        }

        // The keep-alive task closes sessions from outside the read loop,
        // so a blocked read must also wake on the close signal.
        let body = tokio::select! {
            body = read_frame_bytes(reader, pending_first.take()) => body?,
            _ = close.notified() => return Ok(()),
        };

        let compressed = state.lock().unwrap().compression;
        let (id, payload) = frame::decode_frame_body(Bytes::from(body), compressed)?;

        match handle_packet(id, payload, outbound, state, ctx, close) {
            Ok(()) => {}
            // Well-framed but unknown: the frame is already consumed, keep
            // reading.
            Err(SessionError::Proto(ProtoError::UnknownPacketId(id))) => {
                debug!("skipping unknown packet 0x{id:02X}");
            }
            Err(other) => return Err(other),
        }
    }
}

/// Read one length-prefixed frame body off the socket.
async fn read_frame_bytes(
    reader: &mut OwnedReadHalf,
    pending_first: Option<u8>,
) -> Result<Vec<u8>, SessionError> {
    let length = read_varint(reader, pending_first).await?;
    if length <= 0 || length as usize > MAX_PACKET_LEN {
        return Err(ProtoError::InvalidData(format!("frame length {length}")).into());
    }
    let mut body = vec![0u8; length as usize];
    reader.read_exact(&mut body).await?;
    Ok(body)
}

fn handle_packet(
    id: i32,
    payload: Bytes,
    outbound: &OutboundSender,
    state: &Arc<Mutex<SessionState>>,
    ctx: &Arc<SessionContext>,
    close: &Arc<Notify>,
) -> Result<(), SessionError> {
    let phase = state.lock().unwrap().phase;
    let mut payload = payload;
    match phase {
        Phase::Handshaking => {
            let ServerboundHandshaking::Handshake(handshake) =
                ServerboundHandshaking::decode(id, &mut payload)?;
            let next = match handshake.next_state {
                1 => Phase::Status,
                2 => Phase::Login,
                other => {
                    return Err(
                        ProtoError::InvalidData(format!("handshake next_state {other}")).into(),
                    )
                }
            };
            trace!(
                "handshake: protocol {} to {}:{}",
                handshake.protocol_version,
                handshake.server_address,
                handshake.server_port
            );
            state.lock().unwrap().phase = next;
            Ok(())
        }

        Phase::Status => match ServerboundStatus::decode(id, &mut payload)? {
            ServerboundStatus::StatusRequest(_) => {
                let json = status::build_status_json(&ctx.config, ctx.world.online_count());
                send_status(outbound, &ClientboundStatus::StatusResponse(StatusResponse { json }));
                Ok(())
            }
            ServerboundStatus::PingRequest(ping) => {
                send_status(
                    outbound,
                    &ClientboundStatus::PingResponse(PingResponse {
                        payload: ping.payload,
                    }),
                );
                state.lock().unwrap().phase = Phase::CloseConnection;
                let _ = outbound.send(Outbound::Close);
                Ok(())
            }
        },

        Phase::Login => match ServerboundLogin::decode(id, &mut payload)? {
            ServerboundLogin::LoginStart(login) => {
                let uuid = if ctx.config.server.online_mode {
                    Uuid(rand::random())
                } else {
                    Uuid::ZERO
                };
                send_login(
                    outbound,
                    &ClientboundLogin::LoginSuccess(LoginSuccess {
                        uuid,
                        username: login.name.clone(),
                    }),
                );

                let player = Player::new(
                    outbound.clone(),
                    uuid,
                    login.name,
                    ctx.world.spawn_pos(),
                );
                let player_id = ctx.world.add_player(player);
                {
                    let mut s = state.lock().unwrap();
                    s.phase = Phase::Play;
                    s.player = Some(player_id);
                }
                tokio::spawn(keep_alive_loop(
                    Arc::clone(state),
                    outbound.clone(),
                    ctx.timings,
                    Arc::clone(close),
                ));
                Ok(())
            }
        },

        Phase::Play => {
            let packet = ServerboundPlay::decode(id, &mut payload)?;
            let player = state.lock().unwrap().player;
            let Some(player) = player else {
                return Ok(());
            };
            match packet {
                ServerboundPlay::ConfirmTeleportation(confirm) => {
                    trace!("teleport {} confirmed", confirm.teleport_id);
                    Ok(())
                }
                ServerboundPlay::KeepAlive(echo) => {
                    acknowledge_keep_alive(state, echo.id);
                    Ok(())
                }
                ServerboundPlay::SetHeldItem(held) => {
                    if (0..=8).contains(&held.slot) {
                        ctx.world.set_held_slot(player, held.slot as u8);
                    } else {
                        debug!("held slot {} out of range", held.slot);
                    }
                    Ok(())
                }
                ServerboundPlay::SetCreativeModeSlot(set) => {
                    let hotbar = set.slot - HOTBAR_SLOT_BASE;
                    if !(0..9).contains(&hotbar) {
                        trace!("creative slot {} outside the hotbar", set.slot);
                        return Ok(());
                    }
                    let state_id = match set.clicked_item.item {
                        None => 0,
                        Some(item) => match catalog().item_to_block(item.item_id as u32) {
                            Some(kind) => catalog().default_id(kind),
                            None => {
                                debug!("item {} is not placeable", item.item_id);
                                return Ok(());
                            }
                        },
                    };
                    ctx.world.set_hotbar_slot(player, hotbar as usize, state_id);
                    Ok(())
                }
                // Everything else is simulation input.
                other => {
                    ctx.world.submit(player, other);
                    Ok(())
                }
            }
        }

        Phase::CloseConnection => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Keep-alive
// ---------------------------------------------------------------------------

/// Issue a keep-alive every interval; close the session when an outstanding
/// id goes unanswered past the timeout. Exits as soon as it observes
/// `CloseConnection`.
async fn keep_alive_loop(
    state: Arc<Mutex<SessionState>>,
    outbound: OutboundSender,
    timings: KeepAliveTimings,
    close: Arc<Notify>,
) {
    loop {
        tokio::time::sleep(timings.interval).await;
        let frame = {
            let mut s = state.lock().unwrap();
            if s.phase == Phase::CloseConnection {
                return;
            }
            let now = Instant::now();
            if s.keep_alive
                .iter()
                .flatten()
                .any(|slot| now.duration_since(slot.issued) > timings.timeout)
            {
                s.timed_out = true;
                s.phase = Phase::CloseConnection;
                warn!("keep-alive unanswered past {:?}", timings.timeout);
                let _ = outbound.send(Outbound::Close);
                close.notify_one();
                return;
            }

            let id = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as i64;
            let slot = KeepAliveSlot { id, issued: now };
            match s.keep_alive.iter_mut().find(|entry| entry.is_none()) {
                Some(free) => *free = Some(slot),
                // Both outstanding but neither overdue; reuse the older.
                None => s.keep_alive[0] = Some(slot),
            }

            let mut payload = BytesMut::new();
            KeepAlive { id }.proto_encode(&mut payload);
            frame::encode_frame(KeepAlive::CLIENTBOUND_ID, &payload, None)
        };
        if outbound.send(Outbound::Frame(frame)).is_err() {
            return;
        }
    }
}

/// Match an echo against the outstanding slots by exact id. No match — both
/// slots empty included — is benign.
fn acknowledge_keep_alive(state: &Arc<Mutex<SessionState>>, id: i64) {
    let mut s = state.lock().unwrap();
    for slot in &mut s.keep_alive {
        if slot.is_some_and(|entry| entry.id == id) {
            *slot = None;
            return;
        }
    }
    trace!("keep-alive echo {id} matches no outstanding id");
}

// ---------------------------------------------------------------------------
// Plumbing
// ---------------------------------------------------------------------------

async fn read_varint(
    reader: &mut OwnedReadHalf,
    first: Option<u8>,
) -> Result<i32, SessionError> {
    let mut pending = first;
    let mut result: u32 = 0;
    for i in 0..5u32 {
        let byte = match pending.take() {
            Some(b) => b,
            None => reader.read_u8().await?,
        };
        result |= ((byte & 0x7F) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(result as i32);
        }
    }
    Err(ProtoError::VarIntTooBig.into())
}

fn send_status(outbound: &OutboundSender, packet: &ClientboundStatus) {
    let mut payload = BytesMut::new();
    packet.proto_encode(&mut payload);
    let _ = outbound.send(Outbound::Frame(frame::encode_frame(packet.id(), &payload, None)));
}

fn send_login(outbound: &OutboundSender, packet: &ClientboundLogin) {
    let mut payload = BytesMut::new();
    packet.proto_encode(&mut payload);
    let _ = outbound.send(Outbound::Frame(frame::encode_frame(packet.id(), &payload, None)));
}

// ===========================================================================
// Tests — the end-to-end protocol scenarios
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BufMut;
    use jcraft_proto::codec::{read_string, write_string, ProtoDecode};
    use jcraft_proto::packets::BlockUpdate;
    use jcraft_proto::types::{Position, Slot, VarInt};
    use jcraft_world::flat::generate_flat_chunk;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    async fn spawn_test_server(timings: KeepAliveTimings) -> SocketAddr {
        let world = Arc::new(WorldManager::new(
            generate_flat_chunk(0, 0, catalog()),
            20,
            70.0,
        ));
        let ctx = Arc::new(SessionContext {
            world: Arc::clone(&world),
            config: Arc::new(ServerConfig::default()),
            timings,
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(run_connection(stream, Arc::clone(&ctx)));
            }
        });
        tokio::spawn(async move {
            loop {
                world.tick();
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        });
        addr
    }

    async fn write_frame(stream: &mut TcpStream, id: i32, payload: &[u8]) {
        stream
            .write_all(&frame::encode_frame(id, payload, None))
            .await
            .unwrap();
    }

    /// Read one frame; `None` on a closed connection.
    async fn read_frame(stream: &mut TcpStream) -> Option<(i32, Bytes)> {
        let mut length: u32 = 0;
        for i in 0..5u32 {
            let mut byte = [0u8; 1];
            if stream.read_exact(&mut byte).await.is_err() {
                return None;
            }
            length |= ((byte[0] & 0x7F) as u32) << (7 * i);
            if byte[0] & 0x80 == 0 {
                break;
            }
        }
        let mut body = vec![0u8; length as usize];
        stream.read_exact(&mut body).await.ok()?;
        Some(frame::decode_frame_body(Bytes::from(body), false).unwrap())
    }

    /// Read frames until `wanted` shows up, skipping keep-alives and other
    /// interleaved traffic.
    async fn read_until(stream: &mut TcpStream, wanted: i32) -> Bytes {
        loop {
            let (id, payload) = read_frame(stream)
                .await
                .unwrap_or_else(|| panic!("connection closed awaiting 0x{wanted:02X}"));
            if id == wanted {
                return payload;
            }
        }
    }

    async fn send_handshake(stream: &mut TcpStream, next_state: i32) {
        let mut payload = BytesMut::new();
        VarInt(jcraft_proto::PROTOCOL_VERSION).proto_encode(&mut payload);
        write_string(&mut payload, "localhost");
        payload.put_u16(25565);
        VarInt(next_state).proto_encode(&mut payload);
        write_frame(stream, 0x00, &payload).await;
    }

    /// Handshake + login and consume the join sequence.
    async fn login(stream: &mut TcpStream, name: &str) {
        send_handshake(stream, 2).await;
        let mut payload = BytesMut::new();
        write_string(&mut payload, name);
        write_frame(stream, 0x00, &payload).await;

        let body = read_until(stream, 0x02).await; // login success
        let mut body = body;
        let _uuid = Uuid::proto_decode(&mut body).unwrap();
        assert_eq!(read_string(&mut body).unwrap(), name);

        read_until(stream, 0x26).await; // join game
        read_until(stream, 0x22).await; // chunk data
        read_until(stream, 0x38).await; // synchronize position
    }

    // Scenario 1: handshake + status + ping.
    #[tokio::test]
    async fn handshake_and_status() {
        let addr = spawn_test_server(KeepAliveTimings::default()).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        send_handshake(&mut stream, 1).await;
        write_frame(&mut stream, 0x00, &[]).await;

        let (id, body) = read_frame(&mut stream).await.unwrap();
        assert_eq!(id, 0x00);
        let json = read_string(&mut body.clone()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"]["protocol"], 758);
        assert_eq!(value["players"]["max"], 20);
        assert_eq!(value["description"]["text"], "A jcraft server");

        let mut payload = BytesMut::new();
        payload.put_i64(0x01020304);
        write_frame(&mut stream, 0x01, &payload).await;
        let (id, body) = read_frame(&mut stream).await.unwrap();
        assert_eq!(id, 0x01);
        assert_eq!(&body[..], &0x01020304i64.to_be_bytes());

        // The server hangs up after the pong.
        assert!(read_frame(&mut stream).await.is_none());
    }

    // Scenario 2: legacy server-list ping.
    #[tokio::test]
    async fn legacy_ping() {
        let addr = spawn_test_server(KeepAliveTimings::default()).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        stream.write_all(&[0xFE]).await.unwrap();
        let mut reply = vec![0u8; LEGACY_KICK.len()];
        stream.read_exact(&mut reply).await.unwrap();
        assert_eq!(reply, LEGACY_KICK);
        assert_eq!(
            &reply[..9],
            &[0xFF, 0x00, 0x0C, 0x00, 0xA7, 0x00, 0x31, 0x00, 0x00]
        );
        // Then the connection closes.
        assert_eq!(stream.read(&mut [0u8; 1]).await.unwrap(), 0);
    }

    // Scenario 3: login + join sequence.
    #[tokio::test]
    async fn login_and_join() {
        let addr = spawn_test_server(KeepAliveTimings::default()).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        send_handshake(&mut stream, 2).await;
        let mut payload = BytesMut::new();
        write_string(&mut payload, "tester");
        write_frame(&mut stream, 0x00, &payload).await;

        let mut body = read_until(&mut stream, 0x02).await;
        let _uuid = Uuid::proto_decode(&mut body).unwrap();
        assert_eq!(read_string(&mut body).unwrap(), "tester");

        use bytes::Buf;
        let mut join = read_until(&mut stream, 0x26).await;
        assert_eq!(join.get_i32(), 0, "first player is entity 0");
        assert_eq!(join.get_u8(), 0, "not hardcore");
        assert_eq!(join.get_u8(), 1, "creative");

        let mut chunk = read_until(&mut stream, 0x22).await;
        assert_eq!(chunk.get_i32(), 0);
        assert_eq!(chunk.get_i32(), 0);

        let mut sync = read_until(&mut stream, 0x38).await;
        assert_eq!(sync.get_f64(), 0.0);
        assert_eq!(sync.get_f64(), 70.0);
        assert_eq!(sync.get_f64(), 0.0);
    }

    // Scenarios 4 and 5: place a stone block, then dig it back out.
    #[tokio::test]
    async fn place_then_dig() {
        let addr = spawn_test_server(KeepAliveTimings::default()).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        login(&mut stream, "builder").await;

        // Stone (item id 1) into hotbar slot 0 (window slot 36), held slot 0.
        let mut payload = BytesMut::new();
        payload.put_i16(36);
        Slot::filled(1, 1).proto_encode(&mut payload);
        write_frame(&mut stream, 0x28, &payload).await;

        let mut payload = BytesMut::new();
        payload.put_i16(0);
        write_frame(&mut stream, 0x25, &payload).await;

        // Click the grass top at (0, 64, 0), face +Y.
        let mut payload = BytesMut::new();
        VarInt(0).proto_encode(&mut payload);
        Position::new(0, 64, 0).proto_encode(&mut payload);
        VarInt(1).proto_encode(&mut payload);
        payload.put_f32(0.5);
        payload.put_f32(1.0);
        payload.put_f32(0.5);
        payload.put_u8(0);
        write_frame(&mut stream, 0x2E, &payload).await;

        let body = read_until(&mut stream, 0x0C).await;
        let update = BlockUpdate::proto_decode(&mut body.clone()).unwrap();
        assert_eq!(update.location, Position::new(0, 65, 0));
        assert_eq!(update.block_id, 1, "stone's state id");

        // Dig the placed block: status 0 at (0, 65, 0).
        let mut payload = BytesMut::new();
        VarInt(0).proto_encode(&mut payload);
        Position::new(0, 65, 0).proto_encode(&mut payload);
        payload.put_i8(1);
        write_frame(&mut stream, 0x1A, &payload).await;

        let body = read_until(&mut stream, 0x0C).await;
        let update = BlockUpdate::proto_decode(&mut body.clone()).unwrap();
        assert_eq!(update.location, Position::new(0, 65, 0));
        assert_eq!(update.block_id, 0, "air");
    }

    // An unknown play packet id is skipped, not fatal.
    #[tokio::test]
    async fn unknown_play_packet_is_skipped() {
        let addr = spawn_test_server(KeepAliveTimings::default()).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        login(&mut stream, "curious").await;

        write_frame(&mut stream, 0x7F, &[1, 2, 3, 4]).await;

        // The session is still alive and processing input.
        let mut payload = BytesMut::new();
        VarInt(0).proto_encode(&mut payload);
        Position::new(2, 64, 2).proto_encode(&mut payload);
        payload.put_i8(1);
        write_frame(&mut stream, 0x1A, &payload).await;

        let body = read_until(&mut stream, 0x0C).await;
        let update = BlockUpdate::proto_decode(&mut body.clone()).unwrap();
        assert_eq!(update.location, Position::new(2, 64, 2));
    }

    // Scenario 6: a silent client is disconnected by the keep-alive timer.
    // Shortened timings: issue every 100 ms, expire after 150 ms.
    #[tokio::test]
    async fn keep_alive_timeout_closes_the_session() {
        let timings = KeepAliveTimings {
            interval: Duration::from_millis(100),
            timeout: Duration::from_millis(150),
        };
        let addr = spawn_test_server(timings).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        login(&mut stream, "sleeper").await;

        let started = Instant::now();
        let mut saw_keep_alive = false;
        loop {
            match read_frame(&mut stream).await {
                Some((id, _)) => {
                    if id == KeepAlive::CLIENTBOUND_ID {
                        saw_keep_alive = true;
                    }
                }
                None => break, // server hung up
            }
            assert!(
                started.elapsed() < Duration::from_secs(5),
                "server never closed the silent session"
            );
        }
        assert!(saw_keep_alive, "at least one keep-alive was issued");
        // Issue at ~100 ms, second at ~200 ms, expiry observed at ~300 ms.
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    // A client that echoes keep-alives survives past the timeout horizon.
    #[tokio::test]
    async fn echoing_client_survives() {
        let timings = KeepAliveTimings {
            interval: Duration::from_millis(100),
            timeout: Duration::from_millis(150),
        };
        let addr = spawn_test_server(timings).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        login(&mut stream, "alive").await;

        // Echo every keep-alive across several timeout windows.
        let mut echoed = 0;
        let deadline = Instant::now() + Duration::from_millis(700);
        while Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(200), read_frame(&mut stream)).await {
                Err(_) => {} // no traffic this window
                Ok(None) => panic!("server closed an echoing session"),
                Ok(Some((id, payload))) => {
                    if id == KeepAlive::CLIENTBOUND_ID {
                        let echo = KeepAlive::proto_decode(&mut payload.clone()).unwrap();
                        let mut body = BytesMut::new();
                        echo.proto_encode(&mut body);
                        write_frame(&mut stream, KeepAlive::SERVERBOUND_ID, &body).await;
                        echoed += 1;
                    }
                }
            }
        }
        assert!(echoed >= 3, "several keep-alives were exchanged ({echoed})");
    }
}
