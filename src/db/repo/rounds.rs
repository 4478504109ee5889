//! Round, ledger and replay operations for the repository.

use super::{enum_from_sql, enum_to_sql, opt_enum_from_sql, opt_enum_to_sql, Repository};
use crate::db::store::StoreError;
use crate::domain::{Action, ActionId, FightId, FighterId, Round, Seconds, VideoReplay};
use crate::engine::ActionLedger;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use tracing::debug;

impl Repository {
    /// Insert or update a round and rewrite its ledger and replays in one
    /// transaction.
    ///
    /// # Errors
    /// Returns an error if any statement fails; nothing is written then.
    pub async fn upsert_round(&self, round: &Round) -> Result<(), StoreError> {
        let fight_id = round.fight_id.to_string();
        let round_number = round.round_number as i64;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO rounds (
                fight_id, round_number, round_time_limit, blue_hits, red_hits,
                victory_decision, winner_fighter_id, start_time, end_time,
                paused_secs, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(fight_id, round_number) DO UPDATE SET
                round_time_limit = excluded.round_time_limit,
                blue_hits = excluded.blue_hits,
                red_hits = excluded.red_hits,
                victory_decision = excluded.victory_decision,
                winner_fighter_id = excluded.winner_fighter_id,
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                paused_secs = excluded.paused_secs,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&fight_id)
        .bind(round_number)
        .bind(round.round_time_limit.as_f64())
        .bind(round.blue_hits as i64)
        .bind(round.red_hits as i64)
        .bind(opt_enum_to_sql(round.victory_decision.as_ref())?)
        .bind(round.round_winner_fighter_id.as_ref().map(|w| w.as_str().to_string()))
        .bind(round.start_time.as_f64())
        .bind(round.end_time.map(|t| t.as_f64()))
        .bind(round.paused_secs.as_f64())
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM actions WHERE fight_id = ? AND round_number = ?")
            .bind(&fight_id)
            .bind(round_number)
            .execute(&mut *tx)
            .await?;

        for (seq, action) in round.actions.entries().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO actions (
                    id, fight_id, round_number, seq, fighter_color, action_type,
                    technique, limb_used, zone, situation, penalty_type,
                    match_clock_timestamp, video_timestamp, active
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(action.id.to_string())
            .bind(&fight_id)
            .bind(round_number)
            .bind(seq as i64)
            .bind(enum_to_sql(&action.fighter_color)?)
            .bind(enum_to_sql(&action.action_type)?)
            .bind(opt_enum_to_sql(action.technique.as_ref())?)
            .bind(opt_enum_to_sql(action.limb_used.as_ref())?)
            .bind(opt_enum_to_sql(action.zone.as_ref())?)
            .bind(opt_enum_to_sql(action.situation.as_ref())?)
            .bind(opt_enum_to_sql(action.penalty_type.as_ref())?)
            .bind(action.match_clock_timestamp.as_f64())
            .bind(action.video_timestamp.as_f64())
            .bind(action.active)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM video_replays WHERE fight_id = ? AND round_number = ?")
            .bind(&fight_id)
            .bind(round_number)
            .execute(&mut *tx)
            .await?;

        for (seq, replay) in round.video_replays.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO video_replays (
                    fight_id, round_number, seq, requested_by_color,
                    match_clock_timestamp, was_accepted
                ) VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&fight_id)
            .bind(round_number)
            .bind(seq as i64)
            .bind(enum_to_sql(&replay.requested_by_color)?)
            .bind(replay.match_clock_timestamp.as_f64())
            .bind(replay.was_accepted)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(
            fight_id = %round.fight_id,
            round_number = round.round_number,
            actions = round.actions.len(),
            "Round persisted"
        );
        Ok(())
    }

    /// Load every round of a fight with its ledger, ordered by round number.
    ///
    /// # Errors
    /// Returns an error if a query fails or a stored value cannot be decoded.
    pub async fn query_rounds(&self, fight_id: FightId) -> Result<Vec<Round>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT round_number, round_time_limit, blue_hits, red_hits,
                   victory_decision, winner_fighter_id, start_time, end_time, paused_secs
            FROM rounds
            WHERE fight_id = ?
            ORDER BY round_number ASC
            "#,
        )
        .bind(fight_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let mut rounds = Vec::with_capacity(rows.len());
        for row in rows {
            let round_number = row.get::<i64, _>("round_number") as u32;
            let actions = self.query_actions(fight_id, round_number).await?;
            let video_replays = self.query_video_replays(fight_id, round_number).await?;
            rounds.push(Round {
                fight_id,
                round_number,
                round_time_limit: Seconds::new(row.get("round_time_limit")),
                actions: ActionLedger::from_entries(actions),
                blue_hits: row.get::<i64, _>("blue_hits") as u32,
                red_hits: row.get::<i64, _>("red_hits") as u32,
                victory_decision: opt_enum_from_sql(
                    "victory_decision",
                    row.get("victory_decision"),
                )?,
                round_winner_fighter_id: row
                    .get::<Option<String>, _>("winner_fighter_id")
                    .map(FighterId::new),
                start_time: Seconds::new(row.get("start_time")),
                end_time: row.get::<Option<f64>, _>("end_time").map(Seconds::new),
                paused_secs: Seconds::new(row.get("paused_secs")),
                video_replays,
                is_synced: true,
                revision: 0,
            });
        }

        Ok(rounds)
    }

    async fn query_actions(&self, fight_id: FightId, round_number: u32) -> Result<Vec<Action>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, fighter_color, action_type, technique, limb_used, zone,
                   situation, penalty_type, match_clock_timestamp, video_timestamp, active
            FROM actions
            WHERE fight_id = ? AND round_number = ?
            ORDER BY seq ASC
            "#,
        )
        .bind(fight_id.to_string())
        .bind(round_number as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(action_from_row).collect()
    }

    async fn query_video_replays(
        &self,
        fight_id: FightId,
        round_number: u32,
    ) -> Result<Vec<VideoReplay>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT requested_by_color, match_clock_timestamp, was_accepted
            FROM video_replays
            WHERE fight_id = ? AND round_number = ?
            ORDER BY seq ASC
            "#,
        )
        .bind(fight_id.to_string())
        .bind(round_number as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let color: String = row.get("requested_by_color");
                Ok(VideoReplay {
                    requested_by_color: enum_from_sql("requested_by_color", &color)?,
                    match_clock_timestamp: Seconds::new(row.get("match_clock_timestamp")),
                    was_accepted: row.get("was_accepted"),
                })
            })
            .collect()
    }

    /// End time of the most recent ended round of a fight.
    pub async fn query_last_round_end_time(&self, fight_id: FightId) -> Result<Option<Seconds>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT end_time
            FROM rounds
            WHERE fight_id = ? AND end_time IS NOT NULL
            ORDER BY round_number DESC
            LIMIT 1
            "#,
        )
        .bind(fight_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Seconds::new(r.get::<f64, _>("end_time"))))
    }
}

fn action_from_row(row: &SqliteRow) -> Result<Action, StoreError> {
    let id: String = row.get("id");
    let color: String = row.get("fighter_color");
    let action_type: String = row.get("action_type");

    Ok(Action {
        id: ActionId::from_str(&id).map_err(|e| StoreError::Corrupt(format!("action id {}: {}", id, e)))?,
        fighter_color: enum_from_sql("fighter_color", &color)?,
        action_type: enum_from_sql("action_type", &action_type)?,
        technique: opt_enum_from_sql("technique", row.get("technique"))?,
        limb_used: opt_enum_from_sql("limb_used", row.get("limb_used"))?,
        zone: opt_enum_from_sql("zone", row.get("zone"))?,
        situation: opt_enum_from_sql("situation", row.get("situation"))?,
        penalty_type: opt_enum_from_sql("penalty_type", row.get("penalty_type"))?,
        match_clock_timestamp: Seconds::new(row.get("match_clock_timestamp")),
        video_timestamp: Seconds::new(row.get("video_timestamp")),
        active: row.get("active"),
    })
}
