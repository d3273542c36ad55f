pub mod tracker;

pub use tracker::{MetricsTracker, ScoreHistory};
