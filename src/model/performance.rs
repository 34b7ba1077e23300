use crate::model::constants::{
    LEVEL_MULTIPLIER, LINEAR_SLOPE, LOGISTIC_CEILING, LOGISTIC_CUTOFF, LOGISTIC_OFFSET, LOGISTIC_STEEPNESS
};

/// Maps a raw score percentage and a beatmap difficulty level to a
/// performance-point value.
///
/// The curve has two pieces. Up to the cutoff, a logistic segment keeps
/// mediocre scores near-worthless and ramps up sharply around its inflection
/// at 92.5. Past the cutoff, a linear tail takes over so near-perfect and
/// over-100 play keeps scaling instead of saturating at the logistic ceiling.
/// Both pieces evaluate to the same ratio at the cutoff.
///
/// Pure arithmetic; callers are responsible for keeping inputs finite and
/// `level` non-negative.
pub fn performance_points(score: f64, level: i32) -> f64 {
    let ratio = if score <= LOGISTIC_CUTOFF {
        LOGISTIC_CEILING / (1.0 + (-LOGISTIC_STEEPNESS * score + LOGISTIC_OFFSET).exp())
    } else {
        LINEAR_SLOPE * (score - 100.0) + 1.0
    };

    ratio * level as f64 * LEVEL_MULTIPLIER
}
