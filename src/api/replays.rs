use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{FightId, FighterColor, Seconds, VideoReplay};
use crate::error::AppError;
use crate::operator::ScriptedOperator;
use crate::video::ManualVideoClock;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoReplayRequest {
    pub fighter_color: FighterColor,
    pub video_timestamp: f64,
    /// Absent when the operator dismissed the outcome prompt.
    pub accepted: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoReplayResponse {
    pub withdrawn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replay: Option<VideoReplay>,
}

pub async fn request_video_replay(
    Path(id): Path<FightId>,
    State(state): State<AppState>,
    Json(body): Json<VideoReplayRequest>,
) -> Result<Json<VideoReplayResponse>, AppError> {
    let mut operator = ScriptedOperator::new();
    if let Some(accepted) = body.accepted {
        operator = operator.with_replay_accepted(accepted);
    }
    let clock = ManualVideoClock::at(Seconds::new(body.video_timestamp));

    let replay = state
        .service
        .request_video_replay(id, body.fighter_color, &operator, &clock)
        .await?;
    Ok(Json(VideoReplayResponse {
        withdrawn: replay.is_none(),
        replay,
    }))
}
