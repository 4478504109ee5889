//! Fight operations for the repository.

use super::{enum_from_sql, enum_to_sql, Repository};
use crate::db::store::StoreError;
use crate::domain::{Fight, FightId, FightMethod, FightResult, FighterId};
use sqlx::Row;

impl Repository {
    /// Insert or update a fight row.
    ///
    /// # Errors
    /// Returns an error if the upsert fails.
    pub async fn upsert_fight(&self, fight: &Fight) -> Result<(), StoreError> {
        let round_ids = serde_json::to_string(&fight.round_ids)?;
        let result = fight.fight_result.as_ref();
        let method = result.map(|r| enum_to_sql(&r.method)).transpose()?;

        sqlx::query(
            r#"
            INSERT INTO fights (
                id, blue_fighter_id, red_fighter_id, round_ids,
                winner_fighter_id, method, blue_total_score, red_total_score,
                blue_video_replay_used, red_video_replay_used, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                round_ids = excluded.round_ids,
                winner_fighter_id = excluded.winner_fighter_id,
                method = excluded.method,
                blue_total_score = excluded.blue_total_score,
                red_total_score = excluded.red_total_score,
                blue_video_replay_used = excluded.blue_video_replay_used,
                red_video_replay_used = excluded.red_video_replay_used,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(fight.id.to_string())
        .bind(fight.blue_fighter_id.as_str())
        .bind(fight.red_fighter_id.as_str())
        .bind(round_ids)
        .bind(result.and_then(|r| r.winner_fighter_id.as_ref().map(|w| w.as_str().to_string())))
        .bind(method)
        .bind(result.map(|r| r.blue_total_score as i64))
        .bind(result.map(|r| r.red_total_score as i64))
        .bind(fight.blue_video_replay_used)
        .bind(fight.red_video_replay_used)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Load a fight by id.
    ///
    /// # Errors
    /// Returns an error if the query fails or the row cannot be decoded.
    pub async fn query_fight(&self, id: FightId) -> Result<Option<Fight>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, blue_fighter_id, red_fighter_id, round_ids,
                   winner_fighter_id, method, blue_total_score, red_total_score,
                   blue_video_replay_used, red_video_replay_used
            FROM fights
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let round_ids: String = row.get("round_ids");
        let method: Option<String> = row.get("method");
        let winner: Option<String> = row.get("winner_fighter_id");
        let fight_result = match method {
            Some(method) => Some(FightResult {
                winner_fighter_id: winner.map(FighterId::new),
                method: enum_from_sql::<FightMethod>("method", &method)?,
                blue_total_score: row.get::<Option<i64>, _>("blue_total_score").unwrap_or(0) as u32,
                red_total_score: row.get::<Option<i64>, _>("red_total_score").unwrap_or(0) as u32,
            }),
            None => None,
        };

        Ok(Some(Fight {
            id,
            blue_fighter_id: FighterId::new(row.get::<String, _>("blue_fighter_id")),
            red_fighter_id: FighterId::new(row.get::<String, _>("red_fighter_id")),
            round_ids: serde_json::from_str(&round_ids)?,
            fight_result,
            blue_video_replay_used: row.get("blue_video_replay_used"),
            red_video_replay_used: row.get("red_video_replay_used"),
        }))
    }
}
