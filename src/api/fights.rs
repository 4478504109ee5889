use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{Fight, FightId, FighterId};
use crate::error::AppError;
use crate::orchestration::FightSnapshot;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFightRequest {
    pub blue_fighter_id: String,
    pub red_fighter_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub synced_rounds: Vec<u32>,
}

pub async fn create_fight(
    State(state): State<AppState>,
    Json(body): Json<CreateFightRequest>,
) -> Result<(StatusCode, Json<Fight>), AppError> {
    let blue = body.blue_fighter_id.trim();
    let red = body.red_fighter_id.trim();
    if blue.is_empty() || red.is_empty() {
        return Err(AppError::BadRequest(
            "blueFighterId and redFighterId are required".to_string(),
        ));
    }
    if blue == red {
        return Err(AppError::BadRequest(
            "a fighter cannot face themselves".to_string(),
        ));
    }

    let fight = state
        .service
        .create_fight(FighterId::new(blue), FighterId::new(red))
        .await?;
    Ok((StatusCode::CREATED, Json(fight)))
}

pub async fn get_fight(
    Path(id): Path<FightId>,
    State(state): State<AppState>,
) -> Result<Json<FightSnapshot>, AppError> {
    Ok(Json(state.service.snapshot(id).await?))
}

pub async fn sync_fight(
    Path(id): Path<FightId>,
    State(state): State<AppState>,
) -> Result<Json<SyncResponse>, AppError> {
    let synced_rounds = state.service.sync(id).await?;
    Ok(Json(SyncResponse { synced_rounds }))
}
