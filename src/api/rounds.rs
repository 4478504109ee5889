use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{FightId, FighterColor, Round, Seconds, VictoryDecision};
use crate::error::AppError;
use crate::operator::{HitCounts, ScriptedOperator};
use crate::session::RoundConclusion;
use crate::video::ManualVideoClock;

/// Absent fields are dismissed prompts.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRoundRequest {
    pub time_limit_secs: Option<u32>,
    pub start_time: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndRoundRequest {
    pub video_timestamp: f64,
    pub ended_by_time: Option<bool>,
    pub hits: Option<HitCounts>,
    pub referee_winner: Option<FighterColor>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseRequest {
    pub pause_secs: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseResponse {
    pub paused_secs: Seconds,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedecideRequest {
    pub winner: Option<FighterColor>,
    pub decision: VictoryDecision,
}

pub async fn start_round(
    Path(id): Path<FightId>,
    State(state): State<AppState>,
    Json(body): Json<StartRoundRequest>,
) -> Result<Json<Round>, AppError> {
    let mut operator = ScriptedOperator::new();
    if let Some(secs) = body.time_limit_secs {
        operator = operator.with_round_secs(secs);
    }
    let round = state
        .service
        .start_round(id, &operator, body.start_time.map(Seconds::new))
        .await?;
    Ok(Json(round))
}

pub async fn end_round(
    Path(id): Path<FightId>,
    State(state): State<AppState>,
    Json(body): Json<EndRoundRequest>,
) -> Result<Json<RoundConclusion>, AppError> {
    let mut operator = ScriptedOperator::new();
    if let Some(ended) = body.ended_by_time {
        operator = operator.with_ended_by_time(ended);
    }
    if let Some(hits) = body.hits {
        operator = operator.with_hits(hits.blue, hits.red);
    }
    if let Some(color) = body.referee_winner {
        operator = operator.with_referee_winner(color);
    }
    let clock = ManualVideoClock::at(Seconds::new(body.video_timestamp));

    let conclusion = state.service.end_round(id, &operator, &clock).await?;
    Ok(Json(conclusion))
}

pub async fn pause(
    Path(id): Path<FightId>,
    State(state): State<AppState>,
    Json(body): Json<PauseRequest>,
) -> Result<Json<PauseResponse>, AppError> {
    let mut operator = ScriptedOperator::new();
    if let Some(secs) = body.pause_secs {
        if !secs.is_finite() || secs < 0.0 {
            return Err(AppError::BadRequest(
                "pauseSecs must be a non-negative number".to_string(),
            ));
        }
        operator = operator.with_pause(Seconds::new(secs));
    }
    let paused_secs = state.service.pause(id, &operator).await?;
    Ok(Json(PauseResponse { paused_secs }))
}

pub async fn redecide_round(
    Path((id, round_number)): Path<(FightId, u32)>,
    State(state): State<AppState>,
    Json(body): Json<RedecideRequest>,
) -> Result<Json<RoundConclusion>, AppError> {
    let conclusion = state
        .service
        .redecide_round(id, round_number, body.winner, body.decision)
        .await?;
    Ok(Json(conclusion))
}
