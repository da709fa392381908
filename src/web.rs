use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::coord::Coordinate;
use crate::game::{GameState, Move};
use crate::piece::Color;
use crate::rules::legal_destinations;
use crate::stats::{Stats, summarize};

#[derive(Clone)]
pub struct AppState {
    game: Arc<Mutex<GameState>>,
}

#[derive(Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Coordinate,
    pub to: Coordinate,
}

#[derive(Serialize, Deserialize)]
pub struct CellQuery {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[derive(Serialize)]
pub struct CellResponse {
    coord: Coordinate,
    symbol: char,
}

#[derive(Serialize)]
pub struct GameResponse {
    active: Color,
    pieces: Vec<CellResponse>,
    last_move: Option<Move>,
    move_count: usize,
    transition_count: usize,
    message: String,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            game: Arc::new(Mutex::new(GameState::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameState> {
        self.game.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn error_response(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn game_response(game: &GameState, message: String) -> GameResponse {
    let pieces = game
        .board()
        .pieces()
        .map(|p| CellResponse {
            coord: p.position(),
            symbol: p.symbol(),
        })
        .collect();

    GameResponse {
        active: game.active_color(),
        pieces,
        last_move: game.history().last().cloned(),
        move_count: game.move_count(),
        transition_count: game.transition_count(),
        message,
    }
}

#[axum::debug_handler]
async fn new_game(State(app_state): State<AppState>) -> Json<GameResponse> {
    let mut game = app_state.lock();
    *game = GameState::new();
    Json(game_response(&game, "White to move".to_string()))
}

#[axum::debug_handler]
async fn make_move(State(app_state): State<AppState>, Json(req): Json<MoveRequest>) -> Response {
    let mut game = app_state.lock();

    match game.apply_move(req.from, req.to) {
        Ok(mv) => {
            let message = format!("Played {}", mv);
            Json(game_response(&game, message)).into_response()
        }
        Err(e) => error_response(e.to_string()),
    }
}

async fn get_game_state(State(app_state): State<AppState>) -> Json<GameResponse> {
    let game = app_state.lock();
    Json(game_response(&game, String::new()))
}

async fn get_stats(State(app_state): State<AppState>) -> Json<Stats> {
    let game = app_state.lock();
    Json(summarize(&game))
}

async fn get_legal_moves(State(app_state): State<AppState>, Query(q): Query<CellQuery>) -> Response {
    let from = match Coordinate::new(q.x, q.y, q.z) {
        Ok(c) => c,
        Err(e) => return error_response(e.to_string()),
    };

    let game = app_state.lock();
    Json(legal_destinations(game.board(), from)).into_response()
}

pub fn router(app_state: AppState, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .route("/api/new-game", post(new_game))
        .route("/api/move", post(make_move))
        .route("/api/game-state", get(get_game_state))
        .route("/api/stats", get(get_stats))
        .route("/api/legal-moves", get(get_legal_moves));

    if let Some(dir) = &config.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http()).with_state(app_state)
}

pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(AppState::new(), &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "web server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
