pub mod constants;
pub mod performance;
pub mod rating_model;
pub mod rating_tracker;
pub mod submission;
