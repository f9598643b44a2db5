//! Settings and exports

pub mod config;
pub mod export;

pub use config::Settings;
