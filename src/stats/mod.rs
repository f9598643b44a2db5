//! Timing and statistics primitives

pub mod robust_statistics;
pub mod timer;
pub mod trial_series;

pub use robust_statistics::RobustStatistics;
pub use timer::Timer;
pub use trial_series::{TrialSeries, TrialSummary};
