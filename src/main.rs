use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::{error, info, warn};

mod api;
mod config;
mod entity;
mod error;
mod event;
mod game_object;
mod game_state;
mod geometry;
mod map_generator;
mod mask;
mod message;
mod world;

use api::SharedState;
use config::GameConfig;
use game_state::GameState;

const CONFIG_PATH: &str = "game_config.toml";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,meadow=debug".into()),
        )
        .init();

    let config = match GameConfig::load(CONFIG_PATH) {
        Ok(cfg) => {
            info!("Loaded game config from {}", CONFIG_PATH);
            cfg
        }
        Err(error::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("{} not found, writing defaults", CONFIG_PATH);
            let default_config = GameConfig::default();
            if let Err(e) = default_config.save(CONFIG_PATH) {
                warn!(error = %e, "could not write default config");
            }
            default_config
        }
        Err(e) => {
            error!(error = %e, "could not load {}", CONFIG_PATH);
            std::process::exit(1);
        }
    };

    let game = match GameState::new(&config) {
        Ok(game) => game,
        Err(e) => {
            error!(error = %e, "could not start game");
            std::process::exit(1);
        }
    };
    let state: SharedState = Arc::new(Mutex::new(game));
    let (tx, _rx) = broadcast::channel(100);

    let app = api::router(state.clone(), tx.clone());

    let port = config.server.port;
    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            error!("Port {} is already in use. Stop the existing server or change [server] port.", port);
            std::process::exit(1);
        }
        Err(e) => {
            error!(error = %e, "Failed to bind to port {}", port);
            std::process::exit(1);
        }
    };

    state.lock().unwrap_or_else(|p| p.into_inner()).start();
    let ticker = tokio::spawn(api::run_ticks(state.clone(), tx, config.movement.tick_rate));

    info!("Server running on http://localhost:{}", port);
    let shutdown_state = state.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            shutdown_state.lock().unwrap_or_else(|p| p.into_inner()).quit();
        })
        .await;
    if let Err(e) = served {
        error!(error = %e, "server error");
    }

    state.lock().unwrap_or_else(|p| p.into_inner()).quit();
    let _ = ticker.await;
}
