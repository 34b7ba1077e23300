// Performance-point curve constants
pub const LOGISTIC_CUTOFF: f64 = 95.371;
pub const LOGISTIC_STEEPNESS: f64 = 0.8;
pub const LOGISTIC_OFFSET: f64 = 74.0;
pub const LOGISTIC_CEILING: f64 = 0.8;
pub const LINEAR_SLOPE: f64 = 0.059;
pub const LEVEL_MULTIPLIER: f64 = 50.0;

// Rating aggregation constants
pub const BEST_SCORE_COUNT: usize = 30;
pub const WEIGHT_DECAY_BASE: f64 = 100.0;

// All stored timestamps use a fixed UTC+9 offset, independent of the host
// timezone, to keep historical ordering stable across deployments.
pub const STORED_TIME_UTC_OFFSET_SECONDS: i32 = 9 * 3600;
