use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{Action, ActionDraft, ActionId, FightId, FighterColor, Seconds};
use crate::engine::{DeactivateOutcome, ScoreBoard};
use crate::error::AppError;
use crate::video::ManualVideoClock;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordActionRequest {
    #[serde(flatten)]
    pub draft: ActionDraft,
    pub video_timestamp: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordActionResponse {
    pub action: Action,
    pub score: ScoreBoard,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoPenaltyRequest {
    pub fighter_color: FighterColor,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateResponse {
    pub outcome: DeactivateOutcome,
    pub score: ScoreBoard,
}

pub async fn record_action(
    Path(id): Path<FightId>,
    State(state): State<AppState>,
    Json(body): Json<RecordActionRequest>,
) -> Result<Json<RecordActionResponse>, AppError> {
    let clock = ManualVideoClock::at(Seconds::new(body.video_timestamp));
    let (action, score) = state.service.record_action(id, body.draft, &clock).await?;
    Ok(Json(RecordActionResponse { action, score }))
}

pub async fn undo_last(
    Path(id): Path<FightId>,
    State(state): State<AppState>,
) -> Result<Json<DeactivateResponse>, AppError> {
    let outcome = state.service.undo_last(id).await?;
    deactivated(&state, id, outcome).await
}

pub async fn delete_action(
    Path((id, action_id)): Path<(FightId, ActionId)>,
    State(state): State<AppState>,
) -> Result<Json<DeactivateResponse>, AppError> {
    let outcome = state.service.delete_action(id, action_id).await?;
    deactivated(&state, id, outcome).await
}

pub async fn undo_penalty(
    Path(id): Path<FightId>,
    State(state): State<AppState>,
    Json(body): Json<UndoPenaltyRequest>,
) -> Result<Json<DeactivateResponse>, AppError> {
    let outcome = state.service.undo_penalty(id, body.fighter_color).await?;
    deactivated(&state, id, outcome).await
}

pub async fn get_score(
    Path(id): Path<FightId>,
    State(state): State<AppState>,
) -> Result<Json<ScoreBoard>, AppError> {
    Ok(Json(state.service.live_score(id).await?))
}

async fn deactivated(
    state: &AppState,
    id: FightId,
    outcome: DeactivateOutcome,
) -> Result<Json<DeactivateResponse>, AppError> {
    let score = state.service.live_score(id).await?;
    Ok(Json(DeactivateResponse { outcome, score }))
}
