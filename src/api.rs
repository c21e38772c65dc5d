use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::{Html, Json, Response},
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

use crate::entity::{EntityController, EntityId};
use crate::game_state::GameState;
use crate::message::{GameMessage, PlayerCommand};

pub type SharedState = Arc<Mutex<GameState>>;
pub type Tx = broadcast::Sender<String>;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SpriteData {
    pub id: EntityId,
    pub object_id: String,  // Reference to GameObject (e.g., "tree", "player")
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub color: String,
    pub controller: EntityController,
    pub collidable: bool,
    pub blocking: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GameUpdate {
    pub width: u32,
    pub height: u32,
    pub frame: u64,
    pub player_id: EntityId,
    pub sprites: Vec<SpriteData>,  // In draw order
    pub messages: Vec<GameMessage>,
}

/// Snapshot the world for drawing. Messages are left for the caller to fill in.
pub fn game_state_to_update(game: &GameState) -> GameUpdate {
    let sprites = game
        .world
        .sprites()
        .iter()
        .map(|entity| SpriteData {
            id: entity.id,
            object_id: entity.object_id.clone(),
            x: entity.rect.x,
            y: entity.rect.y,
            width: entity.rect.width,
            height: entity.rect.height,
            color: entity.color.clone(),
            controller: entity.controller,
            collidable: entity.collidable,
            blocking: entity.blocking,
        })
        .collect();

    GameUpdate {
        width: game.screen.width,
        height: game.screen.height,
        frame: game.frame,
        player_id: game.player_id,
        sprites,
        messages: Vec::new(),
    }
}

/// Snapshot plus any queued messages, serialized for the wire.
pub fn drain_update(game: &mut GameState) -> serde_json::Result<String> {
    let mut update = game_state_to_update(game);
    update.messages = game.take_messages();
    serde_json::to_string(&update)
}

fn lock(state: &SharedState) -> MutexGuard<'_, GameState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Advance the game one frame. Returns the update to broadcast, or `None` when
/// the frame neither moved anything nor queued a message.
pub fn tick_update(state: &SharedState) -> Option<String> {
    let mut game = lock(state);
    if !game.tick() && !game.has_pending_messages() {
        return None;
    }
    match drain_update(&mut game) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(error = %e, "could not serialize tick update");
            None
        }
    }
}

/// Fixed-rate game loop: tick while running, broadcast when the world changed.
pub async fn run_ticks(state: SharedState, tx: Tx, tick_rate: u32) {
    let mut interval = tokio::time::interval(Duration::from_secs(1) / tick_rate.max(1));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        if !lock(&state).is_running() {
            break;
        }
        if let Some(text) = tick_update(&state) {
            // No receivers just means nobody is watching.
            let _ = tx.send(text);
        }
    }
    debug!("tick loop stopped");
}

/// Parse one client frame, apply it, and broadcast the result to every client.
/// Returns whether an update was sent.
pub fn dispatch_command(state: &SharedState, tx: &Tx, connection_id: u64, text: &str) -> bool {
    let cmd = match serde_json::from_str::<PlayerCommand>(text) {
        Ok(cmd) => cmd,
        Err(e) => {
            debug!(connection_id, error = %e, "malformed command");
            return false;
        }
    };

    let update = {
        let mut game = lock(state);
        if !game.handle_command(&cmd) && !game.has_pending_messages() {
            return false;
        }
        drain_update(&mut game)
    };
    match update {
        Ok(text) => {
            let _ = tx.send(text);
            true
        }
        Err(e) => {
            warn!(connection_id, error = %e, "could not serialize update");
            false
        }
    }
}

pub fn router(state: SharedState, tx: Tx) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ws", get(websocket_handler))
        .route("/api/state", get(state_endpoint))
        .nest_service("/assets", ServeDir::new("assets"))
        .with_state((state, tx))
}

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../client/index.html"))
}

pub async fn state_endpoint(State((state, _tx)): State<(SharedState, Tx)>) -> Json<GameUpdate> {
    let game = lock(&state);
    Json(game_state_to_update(&game))
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State((state, tx)): State<(SharedState, Tx)>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state, tx))
}

async fn handle_socket(socket: WebSocket, state: SharedState, tx: Tx) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = tx.subscribe();

    use std::sync::atomic::{AtomicU64, Ordering};
    static CONNECTION_COUNTER: AtomicU64 = AtomicU64::new(0);
    let connection_id = CONNECTION_COUNTER.fetch_add(1, Ordering::Relaxed);
    info!(connection_id, "client connected");

    // Send initial game state
    let initial_state = {
        let mut game = lock(&state);
        game.push_message(GameMessage::system(format!("Wanderer {} joined", connection_id)));
        serde_json::to_string(&game_state_to_update(&game))
    };
    match initial_state {
        Ok(text) => {
            if sender.send(Message::Text(text)).await.is_err() {
                return;
            }
        }
        Err(e) => {
            warn!(connection_id, error = %e, "could not serialize initial state");
            return;
        }
    }

    // Spawn task to send updates to client
    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(msg) => {
                    if sender.send(Message::Text(msg)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(connection_id, skipped, "client lagging, dropped updates");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Spawn task to receive messages from client
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) => {
                    dispatch_command(&state, &tx, connection_id, &text);
                }
                Message::Close(_) => break,
                _ => continue,
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };
    info!(connection_id, "client disconnected");
}
