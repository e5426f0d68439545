mod config;
mod session;
mod status;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use config::ServerConfig;
use jcraft_game::WorldManager;
use jcraft_world::catalog;
use jcraft_world::flat::generate_flat_chunk;
use jcraft_world::region::RegionFile;
use jcraft_world::Chunk;
use session::{KeepAliveTimings, SessionContext};

/// One world tick.
const TICK_DURATION: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() {
    let config = Arc::new(match ServerConfig::load_or_default("server.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load server.toml: {e}");
            std::process::exit(1);
        }
    });

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "jcraft server v{} starting on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.server.address,
        config.server.port
    );
    info!("MOTD: {}", config.server.motd);
    info!("Max players: {}", config.server.max_players);
    info!("Online mode: {}", config.server.online_mode);

    let bootstrap = load_bootstrap_chunk(&config);
    let world = Arc::new(WorldManager::new(
        bootstrap,
        config.server.max_players as i32,
        config.world.spawn_y,
    ));

    let bind_addr = format!("{}:{}", config.server.address, config.server.port);
    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            warn!("failed to bind {bind_addr}: {e}");
            std::process::exit(1);
        }
    };
    info!("Listening on {bind_addr}");

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    // World tick task: fixed 50 ms cadence; an overrun skips the sleep.
    let tick_world = Arc::clone(&world);
    let mut tick_shutdown = shutdown_rx.clone();
    tokio::spawn(async move {
        loop {
            let started = Instant::now();
            tick_world.tick();
            let elapsed = started.elapsed();
            if elapsed >= TICK_DURATION {
                debug!("tick {} overran: {elapsed:?}", tick_world.current_tick());
                continue;
            }
            tokio::select! {
                _ = tokio::time::sleep(TICK_DURATION - elapsed) => {}
                _ = tick_shutdown.changed() => {
                    if *tick_shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    });

    let ctx = Arc::new(SessionContext {
        world,
        config,
        timings: KeepAliveTimings::default(),
    });
    let mut accept_shutdown = shutdown_rx;
    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    debug!("connection from {addr}");
                    tokio::spawn(session::run_connection(stream, Arc::clone(&ctx)));
                }
                Err(e) => warn!("accept failed: {e}"),
            },
            _ = accept_shutdown.changed() => {
                if *accept_shutdown.borrow() {
                    break;
                }
            }
        }
    }
    info!("Server shut down.");
}

/// Chunk (0, 0) from the configured region directory, or flat terrain.
fn load_bootstrap_chunk(config: &ServerConfig) -> Chunk {
    if let Some(dir) = &config.world.region_dir {
        let path = Path::new(dir).join("r.0.0.mca");
        match RegionFile::open(&path).and_then(|region| region.read_chunk(0, 0, catalog())) {
            Ok(Some(chunk)) => {
                info!("Loaded chunk (0, 0) from {}", path.display());
                return chunk;
            }
            Ok(None) => warn!(
                "{} holds no chunk (0, 0); generating flat terrain",
                path.display()
            ),
            Err(e) => warn!(
                "failed to read {}: {e}; generating flat terrain",
                path.display()
            ),
        }
    }
    generate_flat_chunk(0, 0, catalog())
}
