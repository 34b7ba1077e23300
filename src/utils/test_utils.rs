use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    database::db_structs::{timestamp_now, Player, PlayerRating, Score},
    model::performance::performance_points
};

pub fn generate_player(id: i32, scores: Vec<Score>) -> Player {
    Player {
        id,
        screen_name: format!("player_{}", id),
        scores
    }
}

pub fn generate_score(player_id: i32, folder: &str, filename: &str, raw_score: f64, level: i32) -> Score {
    Score {
        id: 0,
        player_id,
        folder: folder.to_string(),
        filename: filename.to_string(),
        level,
        score: raw_score,
        combo: 0,
        judge_0: 0,
        judge_1: 0,
        judge_2: 0,
        judge_3: 0,
        judge_4: 0,
        submitted_on: timestamp_now(),
        performance_point: performance_points(raw_score, level)
    }
}

/// Scores with fixed performance points, for aggregation tests where the
/// curve itself is irrelevant.
pub fn generate_scores_with_pp(player_id: i32, pps: &[f64]) -> Vec<Score> {
    pps.iter()
        .enumerate()
        .map(|(i, pp)| {
            let mut score = generate_score(player_id, "songs", &format!("chart_{}.bms", i), 0.0, 0);
            score.performance_point = *pp;
            score
        })
        .collect()
}

pub fn generate_rating(player_id: i32, rating: f64) -> PlayerRating {
    PlayerRating {
        player_id,
        rating,
        rank: 0,
        rated_at: timestamp_now()
    }
}

/// A reproducible population: `n_players` players with up to `max_scores`
/// random submissions each. Seeded RNG so runs are identical.
pub fn generate_population(n_players: i32, max_scores: usize) -> Vec<Player> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut players = Vec::new();

    for id in 1..=n_players {
        let n_scores = rng.random_range(0..=max_scores);
        let mut scores = Vec::with_capacity(n_scores);

        for i in 0..n_scores {
            let raw_score = rng.random_range(0.0..=105.0);
            let level = rng.random_range(1..=12);
            scores.push(generate_score(id, "songs", &format!("chart_{}.bms", i), raw_score, level));
        }

        players.push(generate_player(id, scores));
    }

    players
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_score_carries_its_performance_point() {
        let score = generate_score(1, "songs", "chart.bms", 100.0, 50);
        assert_eq!(score.performance_point, performance_points(100.0, 50));
    }

    #[test]
    fn generated_population_is_reproducible() {
        let first = generate_population(10, 20);
        let second = generate_population(10, 20);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.scores.len(), b.scores.len());
            for (sa, sb) in a.scores.iter().zip(b.scores.iter()) {
                assert_eq!(sa.score, sb.score);
                assert_eq!(sa.level, sb.level);
            }
        }
    }
}
