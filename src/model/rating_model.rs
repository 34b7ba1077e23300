use itertools::Itertools;
use rayon::prelude::*;

use crate::{
    database::db_structs::{timestamp_now, Player, PlayerRating, Score},
    model::{
        constants::{BEST_SCORE_COUNT, WEIGHT_DECAY_BASE},
        rating_tracker::RatingTracker
    }
};

pub struct RatingModel {
    pub rating_tracker: RatingTracker
}

impl Default for RatingModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingModel {
    pub fn new() -> RatingModel {
        RatingModel {
            rating_tracker: RatingTracker::new()
        }
    }

    /// Full batch recomputation over the player population.
    ///
    /// Every player's rating and rank is overwritten on every run; there is
    /// no incremental update. Given an unchanged snapshot the output is
    /// identical run to run, so an interrupted pass can simply be restarted.
    ///
    /// The per-player rating is pure arithmetic over that player's own
    /// scores, so it runs in parallel; ranking happens once afterwards.
    pub fn recompute(&mut self, players: &[Player]) -> Vec<PlayerRating> {
        let rated_at = timestamp_now();

        let ratings: Vec<PlayerRating> = players
            .par_iter()
            .map(|player| PlayerRating {
                player_id: player.id,
                rating: weighted_rating(&player.scores),
                // Assigned by the tracker once the whole batch is in
                rank: 0,
                rated_at
            })
            .collect();

        self.rating_tracker.insert_or_update(&ratings);
        self.rating_tracker.ratings()
    }
}

/// Weighted sum of a player's best scores. The i-th best performance point
/// (0-indexed) contributes `pp * 100^(-i/30)`, and only the top 30 scores
/// count, so the rating is dominated by a handful of top plays rather than
/// sheer volume of submissions. Fewer than 30 scores is fine; none at all
/// rates 0.
pub fn weighted_rating(scores: &[Score]) -> f64 {
    scores
        .iter()
        .map(|s| s.performance_point)
        .sorted_by(|a, b| b.total_cmp(a))
        .take(BEST_SCORE_COUNT)
        .enumerate()
        .map(|(i, pp)| pp * WEIGHT_DECAY_BASE.powf(-(i as f64) / BEST_SCORE_COUNT as f64))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{generate_player, generate_scores_with_pp};
    use approx::assert_abs_diff_eq;

    #[test]
    fn weighted_rating_single_score_has_full_weight() {
        let scores = generate_scores_with_pp(1, &[250.0]);
        assert_abs_diff_eq!(weighted_rating(&scores), 250.0, epsilon = 1e-9);
    }

    #[test]
    fn weighted_rating_decays_geometrically() {
        let scores = generate_scores_with_pp(1, &[100.0, 200.0]);
        let expected = 200.0 + 100.0 * WEIGHT_DECAY_BASE.powf(-1.0 / 30.0);

        assert_abs_diff_eq!(weighted_rating(&scores), expected, epsilon = 1e-9);
    }

    #[test]
    fn weighted_rating_uses_only_best_thirty() {
        let pps = vec![100.0; 35];
        let scores = generate_scores_with_pp(1, &pps);

        let expected: f64 = (0..BEST_SCORE_COUNT)
            .map(|i| 100.0 * WEIGHT_DECAY_BASE.powf(-(i as f64) / BEST_SCORE_COUNT as f64))
            .sum();

        assert_abs_diff_eq!(weighted_rating(&scores), expected, epsilon = 1e-9);
    }

    #[test]
    fn weighted_rating_empty_is_zero() {
        assert_eq!(weighted_rating(&[]), 0.0);
    }

    #[test]
    fn recompute_assigns_rank_one_to_highest_rating() {
        let players = vec![
            generate_player(1, generate_scores_with_pp(1, &[100.0])),
            generate_player(2, generate_scores_with_pp(2, &[400.0])),
        ];

        let mut model = RatingModel::new();
        model.recompute(&players);

        assert_eq!(model.rating_tracker.get_rating(2).unwrap().rank, 1);
        assert_eq!(model.rating_tracker.get_rating(1).unwrap().rank, 2);
    }

    #[test]
    fn recompute_rates_scoreless_player_zero_and_last() {
        let players = vec![
            generate_player(1, generate_scores_with_pp(1, &[100.0])),
            generate_player(2, Vec::new()),
        ];

        let mut model = RatingModel::new();
        model.recompute(&players);

        let scoreless = model.rating_tracker.get_rating(2).unwrap();
        assert_eq!(scoreless.rating, 0.0);
        assert_eq!(scoreless.rank, 2);
    }
}
