pub mod actions;
pub mod fights;
pub mod health;
pub mod replays;
pub mod rounds;

use crate::config::Config;
use crate::orchestration::MatchService;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub service: MatchService,
    pub config: Config,
}

impl AppState {
    pub fn new(service: MatchService, config: Config) -> Self {
        Self { service, config }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/fights", post(fights::create_fight))
        .route("/v1/fights/:id", get(fights::get_fight))
        .route("/v1/fights/:id/sync", post(fights::sync_fight))
        .route("/v1/fights/:id/rounds", post(rounds::start_round))
        .route("/v1/fights/:id/rounds/end", post(rounds::end_round))
        .route(
            "/v1/fights/:id/rounds/:round_number/decision",
            post(rounds::redecide_round),
        )
        .route("/v1/fights/:id/pause", post(rounds::pause))
        .route("/v1/fights/:id/actions", post(actions::record_action))
        .route("/v1/fights/:id/actions/undo", post(actions::undo_last))
        .route(
            "/v1/fights/:id/actions/:action_id",
            delete(actions::delete_action),
        )
        .route("/v1/fights/:id/penalties/undo", post(actions::undo_penalty))
        .route("/v1/fights/:id/score", get(actions::get_score))
        .route(
            "/v1/fights/:id/video-replays",
            post(replays::request_video_replay),
        )
        .layer(cors)
        .with_state(state)
}
