//! Terminal output: report lines, summary table, host block

pub mod report;
pub mod system_info;

pub use report::TimeUnit;
