use crate::database::db_structs::Score;

/// What to do with an incoming submission for a (player, beatmap) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// No stored score for this pair yet
    Create,
    /// Incoming raw score is at least the stored one; overwrite in place
    Replace,
    /// Stale submission; the stored row stays untouched
    Keep
}

/// A resubmission replaces the stored row only when the new raw score is
/// greater than or equal to the stored one. Equal scores replace so the
/// submission timestamp refreshes. A stale submission is a defined outcome,
/// not an error.
pub fn evaluate_submission(existing: Option<&Score>, incoming_raw_score: f64) -> SubmissionOutcome {
    match existing {
        None => SubmissionOutcome::Create,
        Some(stored) if stored.score <= incoming_raw_score => SubmissionOutcome::Replace,
        Some(_) => SubmissionOutcome::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::generate_score;

    #[test]
    fn first_submission_creates() {
        assert_eq!(evaluate_submission(None, 50.0), SubmissionOutcome::Create);
    }

    #[test]
    fn higher_score_replaces() {
        let stored = generate_score(1, "songs", "chart.bms", 80.0, 5);
        assert_eq!(evaluate_submission(Some(&stored), 90.0), SubmissionOutcome::Replace);
    }

    #[test]
    fn equal_score_replaces() {
        let stored = generate_score(1, "songs", "chart.bms", 80.0, 5);
        assert_eq!(evaluate_submission(Some(&stored), 80.0), SubmissionOutcome::Replace);
    }

    #[test]
    fn lower_score_is_kept() {
        let stored = generate_score(1, "songs", "chart.bms", 80.0, 5);
        assert_eq!(evaluate_submission(Some(&stored), 79.9), SubmissionOutcome::Keep);
    }
}
