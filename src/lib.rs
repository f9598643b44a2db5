//! Cross-Language Call Benchmark Library
//!
//! Measures the cost of calling into a foreign worker library: a monotonic
//! timer, a warm-up + timed-loop runner, a repeated-trial aggregator, the
//! worker adapter traits (native C and mock) and the report formatter.

pub mod core;
pub mod error;
pub mod logging;
pub mod stats;
pub mod ui;
pub mod utils;
pub mod worker;

pub use crate::core::{run_benchmark, run_benchmark_with, BenchmarkReport};
pub use crate::error::{HarnessError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
