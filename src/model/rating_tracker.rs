use indexmap::IndexMap;

use crate::database::db_structs::PlayerRating;

/// Global leaderboard. Ratings are inserted in batches; each batch re-sorts
/// the board and rewrites every player's rank.
pub struct RatingTracker {
    leaderboard: IndexMap<i32, PlayerRating>
}

impl Default for RatingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingTracker {
    pub fn new() -> RatingTracker {
        RatingTracker {
            leaderboard: IndexMap::new()
        }
    }

    /// Inserts or updates a set of player ratings, then re-sorts the
    /// leaderboard and reassigns all ranks.
    pub fn insert_or_update(&mut self, ratings: &[PlayerRating]) {
        for rating in ratings {
            self.leaderboard.insert(rating.player_id, rating.clone());
        }

        self.sort();
    }

    /// Returns the current rating value for the player.
    pub fn get_rating(&self, player_id: i32) -> Option<&PlayerRating> {
        self.leaderboard.get(&player_id)
    }

    /// Ratings in leaderboard order (rank 1 first).
    pub fn ratings(&self) -> Vec<PlayerRating> {
        self.leaderboard.values().cloned().collect()
    }

    /// Sorts by rating descending and updates the rank values. Ties break on
    /// ascending player id, so the ordering is deterministic regardless of
    /// insertion order.
    fn sort(&mut self) {
        self.leaderboard
            .sort_by(|k1, v1, k2, v2| v2.rating.total_cmp(&v1.rating).then_with(|| k1.cmp(k2)));

        for (i, (_, rating)) in self.leaderboard.iter_mut().enumerate() {
            rating.rank = i as i32 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::generate_rating;

    #[test]
    fn sort_orders_by_rating_descending() {
        let mut tracker = RatingTracker::new();
        tracker.insert_or_update(&[
            generate_rating(1, 100.0),
            generate_rating(2, 300.0),
            generate_rating(3, 200.0),
        ]);

        assert_eq!(tracker.get_rating(2).unwrap().rank, 1);
        assert_eq!(tracker.get_rating(3).unwrap().rank, 2);
        assert_eq!(tracker.get_rating(1).unwrap().rank, 3);
    }

    #[test]
    fn equal_ratings_break_ties_by_ascending_player_id() {
        let mut tracker = RatingTracker::new();
        tracker.insert_or_update(&[
            generate_rating(7, 0.0),
            generate_rating(3, 0.0),
            generate_rating(5, 150.0),
        ]);

        assert_eq!(tracker.get_rating(5).unwrap().rank, 1);
        assert_eq!(tracker.get_rating(3).unwrap().rank, 2);
        assert_eq!(tracker.get_rating(7).unwrap().rank, 3);
    }

    #[test]
    fn insert_or_update_overwrites_previous_batch() {
        let mut tracker = RatingTracker::new();
        tracker.insert_or_update(&[generate_rating(1, 100.0), generate_rating(2, 200.0)]);

        assert_eq!(tracker.get_rating(1).unwrap().rank, 2);

        // Player 1 overtakes player 2
        tracker.insert_or_update(&[generate_rating(1, 300.0), generate_rating(2, 200.0)]);

        assert_eq!(tracker.get_rating(1).unwrap().rank, 1);
        assert_eq!(tracker.get_rating(1).unwrap().rating, 300.0);
        assert_eq!(tracker.get_rating(2).unwrap().rank, 2);
    }

    #[test]
    fn ranks_are_contiguous_from_one() {
        let mut tracker = RatingTracker::new();
        let ratings: Vec<_> = (1..=10).map(|id| generate_rating(id, id as f64 * 10.0)).collect();
        tracker.insert_or_update(&ratings);

        let ranks: Vec<i32> = tracker.ratings().iter().map(|r| r.rank).collect();
        assert_eq!(ranks, (1..=10).collect::<Vec<i32>>());
    }
}
