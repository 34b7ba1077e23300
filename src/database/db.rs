use std::sync::Arc;

use postgres_types::ToSql;
use thiserror::Error;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{error, info};

use super::db_structs::{timestamp_now, BeatmapKey, Player, PlayerRating, Score, ScoreSubmission};
use crate::{
    model::{
        performance::performance_points,
        submission::{evaluate_submission, SubmissionOutcome}
    },
    utils::progress_utils::progress_bar
};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("player {0} not found")]
    PlayerNotFound(i32)
}

#[derive(Clone)]
pub struct DbClient {
    client: Arc<Client>
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> Result<Self, DbError> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient {
            client: Arc::new(client)
        })
    }

    /// Fetches all players with their scores eagerly loaded. Players without
    /// submissions are included; they rate 0 and rank last.
    ///
    /// A single statement reads one MVCC snapshot, so an aggregator pass
    /// never sees a half-applied submission.
    pub async fn get_players(&self) -> Result<Vec<Player>, DbError> {
        info!("Fetching players...");
        let rows = self
            .client
            .query(
                "SELECT u.id AS player_id, u.screen_name AS screen_name, \
                 s.id AS score_id, s.folder AS folder, s.filename AS filename, s.level AS level, \
                 s.score AS score, s.combo AS combo, \
                 s.judge_0 AS judge_0, s.judge_1 AS judge_1, s.judge_2 AS judge_2, \
                 s.judge_3 AS judge_3, s.judge_4 AS judge_4, \
                 s.submitted_on AS submitted_on, s.performance_point AS performance_point \
                 FROM users u \
                 LEFT JOIN scores s ON s.player_id = u.id \
                 ORDER BY u.id, s.id",
                &[]
            )
            .await?;

        let mut players: Vec<Player> = Vec::new();
        for row in &rows {
            let player_id = row.get::<_, i32>("player_id");

            if players.last().map(|p| p.id) != Some(player_id) {
                players.push(Player {
                    id: player_id,
                    screen_name: row.get("screen_name"),
                    scores: Vec::new()
                });
            }

            // Score columns are NULL for players without submissions
            if row.get::<_, Option<i32>>("score_id").is_some() {
                if let Some(player) = players.last_mut() {
                    player.scores.push(Self::score_from_row(row));
                }
            }
        }

        info!("Fetched {} players", players.len());
        Ok(players)
    }

    /// Fetches the stored score for a (player, beatmap) pair, if any.
    pub async fn get_score(&self, player_id: i32, beatmap: &BeatmapKey) -> Result<Option<Score>, DbError> {
        let row = self
            .client
            .query_opt(
                "SELECT id AS score_id, player_id, folder, filename, level, score, combo, \
                 judge_0, judge_1, judge_2, judge_3, judge_4, submitted_on, performance_point \
                 FROM scores WHERE player_id = $1 AND folder = $2 AND filename = $3",
                &[&player_id, &beatmap.folder, &beatmap.filename]
            )
            .await?;

        Ok(row.as_ref().map(Self::score_from_row))
    }

    /// All stored scores on one beatmap, best performance point first.
    pub async fn get_scores_by_beatmap(&self, beatmap: &BeatmapKey) -> Result<Vec<Score>, DbError> {
        let rows = self
            .client
            .query(
                "SELECT id AS score_id, player_id, folder, filename, level, score, combo, \
                 judge_0, judge_1, judge_2, judge_3, judge_4, submitted_on, performance_point \
                 FROM scores WHERE folder = $1 AND filename = $2 \
                 ORDER BY performance_point DESC, player_id",
                &[&beatmap.folder, &beatmap.filename]
            )
            .await?;

        Ok(rows.iter().map(Self::score_from_row).collect())
    }

    /// Creates or updates the single score row for a (player, beatmap) pair.
    ///
    /// The performance point is computed here on create and on a qualifying
    /// resubmission. A submission below the stored raw score returns the
    /// stored row untouched.
    pub async fn submit_score(&self, player_id: i32, submission: &ScoreSubmission) -> Result<Score, DbError> {
        let player_row = self
            .client
            .query_opt("SELECT id FROM users WHERE id = $1", &[&player_id])
            .await?;
        if player_row.is_none() {
            return Err(DbError::PlayerNotFound(player_id));
        }

        let beatmap = submission.beatmap();

        match self.get_score(player_id, &beatmap).await? {
            Some(stored) => match evaluate_submission(Some(&stored), submission.score) {
                SubmissionOutcome::Keep => Ok(stored),
                _ => self.update_score(player_id, submission).await
            },
            None => self.create_score(player_id, submission).await
        }
    }

    async fn create_score(&self, player_id: i32, submission: &ScoreSubmission) -> Result<Score, DbError> {
        let performance_point = performance_points(submission.score, submission.level);
        let submitted_on = timestamp_now();

        let values: &[&(dyn ToSql + Sync)] = &[
            &player_id,
            &submission.folder,
            &submission.filename,
            &submission.level,
            &submission.score,
            &submission.combo,
            &submission.judge_0,
            &submission.judge_1,
            &submission.judge_2,
            &submission.judge_3,
            &submission.judge_4,
            &submitted_on,
            &performance_point,
        ];

        let row = self
            .client
            .query_one(
                "INSERT INTO scores (player_id, folder, filename, level, score, combo, \
                 judge_0, judge_1, judge_2, judge_3, judge_4, submitted_on, performance_point) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
                 RETURNING id",
                values
            )
            .await?;

        Ok(Self::score_from_submission(
            row.get("id"),
            player_id,
            submission,
            submitted_on,
            performance_point
        ))
    }

    async fn update_score(&self, player_id: i32, submission: &ScoreSubmission) -> Result<Score, DbError> {
        let performance_point = performance_points(submission.score, submission.level);
        let submitted_on = timestamp_now();

        let values: &[&(dyn ToSql + Sync)] = &[
            &submission.level,
            &submission.score,
            &submission.combo,
            &submission.judge_0,
            &submission.judge_1,
            &submission.judge_2,
            &submission.judge_3,
            &submission.judge_4,
            &submitted_on,
            &performance_point,
            &player_id,
            &submission.folder,
            &submission.filename,
        ];

        let row = self
            .client
            .query_one(
                "UPDATE scores SET level = $1, score = $2, combo = $3, \
                 judge_0 = $4, judge_1 = $5, judge_2 = $6, judge_3 = $7, judge_4 = $8, \
                 submitted_on = $9, performance_point = $10 \
                 WHERE player_id = $11 AND folder = $12 AND filename = $13 \
                 RETURNING id",
                values
            )
            .await?;

        Ok(Self::score_from_submission(
            row.get("id"),
            player_id,
            submission,
            submitted_on,
            performance_point
        ))
    }

    /// Persists a full rating batch as one transaction so a partially ranked
    /// population is never observably committed. On failure nothing is
    /// applied; the recomputation is simply rerun.
    pub async fn save_ratings(&self, ratings: &[PlayerRating]) -> Result<(), DbError> {
        if ratings.is_empty() {
            info!("No ratings to persist, skipping");
            return Ok(());
        }

        let p_bar = progress_bar(ratings.len() as u64, "Building rating update batch".to_string());

        let mut statements = vec!["BEGIN;".to_string()];
        for rating in ratings {
            statements.push(format!(
                "UPDATE users SET performance_point = {}, rank = {}, rated_at = '{}' WHERE id = {};",
                rating.rating,
                rating.rank,
                rating.rated_at.format("%Y-%m-%d %H:%M:%S%:z"),
                rating.player_id
            ));

            if let Some(bar) = &p_bar {
                bar.inc(1);
            }
        }
        statements.push("COMMIT;".to_string());

        if let Some(bar) = &p_bar {
            bar.finish_with_message("Rating update batch ready");
        }

        self.client.batch_execute(statements.join("\n").as_str()).await?;

        info!("Persisted ratings and ranks for {} players", ratings.len());
        Ok(())
    }

    fn score_from_row(row: &Row) -> Score {
        Score {
            id: row.get("score_id"),
            player_id: row.get("player_id"),
            folder: row.get("folder"),
            filename: row.get("filename"),
            level: row.get("level"),
            score: row.get("score"),
            combo: row.get("combo"),
            judge_0: row.get("judge_0"),
            judge_1: row.get("judge_1"),
            judge_2: row.get("judge_2"),
            judge_3: row.get("judge_3"),
            judge_4: row.get("judge_4"),
            submitted_on: row.get("submitted_on"),
            performance_point: row.get("performance_point")
        }
    }

    fn score_from_submission(
        id: i32,
        player_id: i32,
        submission: &ScoreSubmission,
        submitted_on: chrono::DateTime<chrono::FixedOffset>,
        performance_point: f64
    ) -> Score {
        Score {
            id,
            player_id,
            folder: submission.folder.clone(),
            filename: submission.filename.clone(),
            level: submission.level,
            score: submission.score,
            combo: submission.combo,
            judge_0: submission.judge_0,
            judge_1: submission.judge_1,
            judge_2: submission.judge_2,
            judge_3: submission.judge_3,
            judge_4: submission.judge_4,
            submitted_on,
            performance_point
        }
    }

    // Access the underlying Client
    pub fn client(&self) -> Arc<Client> {
        Arc::clone(&self.client)
    }
}
