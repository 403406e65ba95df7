//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, DATA_DIR, DEFAULT_WINNING_SCORE.

use actix_files::Files;
use actix_web::{
    delete, get, post,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use ron_scorekeeper_web::{
    history_to_csv, AppConfig, FileStore, GameController, GameError, GameSession, PlayerId, Score,
    SessionStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// The one game in progress, shared by all requests. The write lock serializes every action.
type AppState = Data<RwLock<GameController<FileStore>>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct StartGameBody {
    player_names: Vec<String>,
    winning_score: Option<Score>,
}

#[derive(Deserialize)]
struct AddRoundBody {
    scores: HashMap<PlayerId, Score>,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    /// Defaults to the suggested score (average total rounded to 5).
    initial_score: Option<Score>,
}

/// Path segment: completed game id (e.g. /api/stats/games/{id})
#[derive(Deserialize)]
struct GamePath {
    id: String,
}

#[derive(Serialize)]
struct StandingView<'a> {
    id: &'a str,
    name: &'a str,
    total_score: Score,
    points_remaining: Score,
}

/// Session snapshot plus derived values for display.
#[derive(Serialize)]
struct GameView<'a> {
    #[serde(flatten)]
    session: &'a GameSession,
    status: SessionStatus,
    standings: Vec<StandingView<'a>>,
    suggested_initial_score: Score,
}

impl<'a> GameView<'a> {
    fn new(session: &'a GameSession) -> Self {
        let standings = session
            .standings()
            .into_iter()
            .map(|p| StandingView {
                id: &p.id,
                name: &p.name,
                total_score: p.total_score,
                points_remaining: session.points_remaining(&p.id).unwrap_or_default(),
            })
            .collect();
        Self {
            session,
            status: session.status(),
            standings,
            suggested_initial_score: session.suggested_initial_score(),
        }
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn no_game() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No game in progress" }))
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Response for a game action: the new session, or 204 when the game ended.
fn game_result(result: Result<Option<&GameSession>, GameError>) -> HttpResponse {
    match result {
        Ok(Some(session)) => HttpResponse::Ok().json(GameView::new(session)),
        Ok(None) => HttpResponse::NoContent().finish(),
        Err(e) => bad_request(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "ron-scorekeeper-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Current game (404 if none).
#[get("/api/game")]
async fn api_get_game(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.session() {
        Some(session) => HttpResponse::Ok().json(GameView::new(session)),
        None => no_game(),
    }
}

/// Start a new game (replaces any game in progress).
#[post("/api/game")]
async fn api_start_game(
    state: AppState,
    config: Data<AppConfig>,
    body: Json<StartGameBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    let winning_score = body
        .winning_score
        .unwrap_or(config.default_winning_score);
    game_result(g.start_new_game(body.player_names, winning_score))
}

/// Record a round: map of player id to points.
#[post("/api/game/rounds")]
async fn api_add_round(state: AppState, body: Json<AddRoundBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if g.session().is_none() {
        return no_game();
    }
    game_result(g.add_round(body.into_inner().scores))
}

/// Undo the most recent round.
#[delete("/api/game/rounds/last")]
async fn api_undo_round(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if g.session().is_none() {
        return no_game();
    }
    game_result(g.undo_last_round())
}

/// Add a player to the game in progress.
#[post("/api/game/players")]
async fn api_add_player(state: AppState, body: Json<AddPlayerBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let Some(suggested) = g.session().map(|s| s.suggested_initial_score()) else {
        return no_game();
    };
    let body = body.into_inner();
    game_result(g.add_player(body.name, body.initial_score.unwrap_or(suggested)))
}

/// Suggested starting score for a late joiner.
#[get("/api/game/players/suggested-score")]
async fn api_suggested_score(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.session() {
        Some(s) => HttpResponse::Ok()
            .json(serde_json::json!({ "initial_score": s.suggested_initial_score() })),
        None => no_game(),
    }
}

/// Finish now: leader wins, game goes to the history.
#[post("/api/game/finish")]
async fn api_finish_game(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if g.session().is_none() {
        return no_game();
    }
    match g.finish_game() {
        Ok(()) => HttpResponse::Ok().json(g.stats()),
        Err(e) => bad_request(e),
    }
}

/// Discard the current game.
#[post("/api/game/reset")]
async fn api_reset_game(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.reset();
    HttpResponse::NoContent().finish()
}

/// Whether a saved game can be resumed.
#[get("/api/game/saved")]
async fn api_has_saved_game(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(serde_json::json!({ "exists": g.has_saved_game() }))
}

/// Resume the saved game.
#[post("/api/game/load")]
async fn api_load_game(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.load_saved_game() {
        Ok(Some(session)) => HttpResponse::Ok().json(GameView::new(session)),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No saved game" })),
        Err(e) => bad_request(e),
    }
}

#[get("/api/stats")]
async fn api_get_stats(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.stats())
}

#[delete("/api/stats")]
async fn api_clear_stats(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.clear_stats() {
        Ok(()) => HttpResponse::Ok().json(g.stats()),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Delete one completed game from the history.
#[delete("/api/stats/games/{id}")]
async fn api_delete_game(state: AppState, path: Path<GamePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.delete_game(&path.id) {
        Ok(true) => HttpResponse::Ok().json(g.stats()),
        Ok(false) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No such game" })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Game history as CSV.
#[get("/api/stats/export.csv")]
async fn api_export_stats(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match history_to_csv(&g.stats()) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(("Content-Disposition", "attachment; filename=\"history.csv\""))
            .body(csv),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// Register all API routes (shared by the server and the tests).
fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(favicon)
        .service(api_get_game)
        .service(api_start_game)
        .service(api_add_round)
        .service(api_undo_round)
        .service(api_suggested_score)
        .service(api_add_player)
        .service(api_finish_game)
        .service(api_reset_game)
        .service(api_has_saved_game)
        .service(api_load_game)
        .service(api_export_stats)
        .service(api_get_stats)
        .service(api_clear_stats)
        .service(api_delete_game);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!("Saving games under {}", config.data_dir.display());

    let controller = GameController::new(FileStore::new(config.data_dir.clone()));
    if controller.has_saved_game() {
        log::info!("A saved game is available to resume");
    }
    let state = Data::new(RwLock::new(controller));
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .route("/", web::get().to(serve_index_async))
            .configure(api_routes)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
