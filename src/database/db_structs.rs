use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::model::constants::STORED_TIME_UTC_OFFSET_SECONDS;

#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub id: i32,
    pub screen_name: String,
    /// Eagerly loaded by the batch fetch; empty for players without submissions
    pub scores: Vec<Score>
}

/// Beatmaps are identified by a folder/filename pair rather than a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeatmapKey {
    pub folder: String,
    pub filename: String
}

/// One submission attempt by one player on one beatmap. At most one row
/// exists per (player, beatmap) pair; qualifying resubmissions overwrite the
/// row in place.
#[derive(Debug, Clone, Serialize)]
pub struct Score {
    pub id: i32,
    pub player_id: i32,
    pub folder: String,
    pub filename: String,
    pub level: i32,
    /// Raw score percentage; values above 100 are the overscore regime
    pub score: f64,
    pub combo: i32,
    pub judge_0: i32,
    pub judge_1: i32,
    pub judge_2: i32,
    pub judge_3: i32,
    pub judge_4: i32,
    pub submitted_on: DateTime<FixedOffset>,
    pub performance_point: f64
}

/// An already-validated submission handed over by the request layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub folder: String,
    pub filename: String,
    pub score: f64,
    pub level: i32,
    pub combo: i32,
    pub judge_0: i32,
    pub judge_1: i32,
    pub judge_2: i32,
    pub judge_3: i32,
    pub judge_4: i32
}

impl ScoreSubmission {
    pub fn beatmap(&self) -> BeatmapKey {
        BeatmapKey {
            folder: self.folder.clone(),
            filename: self.filename.clone()
        }
    }
}

/// A player's aggregate rating and rank as of one aggregator run. Stale
/// between runs; only the batch recomputation ever rewrites these values.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRating {
    pub player_id: i32,
    pub rating: f64,
    /// 1 = best; assigned once per batch by the rating tracker
    pub rank: i32,
    /// When this snapshot was computed
    pub rated_at: DateTime<FixedOffset>
}

/// Current time in the fixed UTC+9 offset used for every stored timestamp.
pub fn timestamp_now() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(STORED_TIME_UTC_OFFSET_SECONDS).expect("UTC+9 is a valid offset");
    Utc::now().with_timezone(&offset)
}
