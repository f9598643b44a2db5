//! Worker library adapter
//!
//! The harness only sees the worker through these two traits. The native
//! adapter crosses into the bundled C library; the mock stays in Rust and is
//! used to test the harness itself.

pub mod mock;
pub mod native;

use serde::Serialize;

use crate::error::{HarnessError, Result};

pub use mock::MockWorker;
pub use native::NativeWorker;

/// A constructed worker instance the harness can call methods on.
pub trait WorkerInstance {
    /// Numeric method that appends to the instance's history
    fn numeric_method(&mut self, a: f64, b: f64) -> Result<f64>;

    /// Same computation without touching the history
    fn numeric_method_pure(&self, a: f64, b: f64) -> Result<f64>;

    fn history_count(&self) -> u64;

    fn clear_history(&mut self);
}

/// The operations under test.
///
/// Results are never interpreted by the harness beyond finiteness checks and
/// the history-count smoke check.
pub trait WorkerLibrary {
    /// Copied by value, no identity
    type Value: WorkerInstance + Copy;
    /// Reached through an owned handle with identity
    type Reference: WorkerInstance;
    /// Two-field value type built from arguments
    type Point: Copy;

    /// Short name for reports
    fn name(&self) -> &str;

    /// Free-form description (toolchain, runtime) for the system block
    fn describe(&self) -> String {
        self.name().to_string()
    }

    /// Process-wide initialization. Must be idempotent.
    fn initialize(&self) -> Result<()>;

    fn is_initialized(&self) -> bool;

    fn construct_value(&self, initial: f64) -> Result<Self::Value>;

    fn construct_reference(&self) -> Result<Self::Reference>;

    fn construct_point(&self, x: f64, y: f64) -> Result<Self::Point>;

    /// Accessor call on a point, made across the boundary
    fn point_x(&self, point: Self::Point) -> Result<f64>;

    fn string_roundtrip(&self, text: &str) -> Result<String>;

    fn array_aggregate(&self, values: &[f64]) -> Result<f64>;

    /// NaN when `b` is zero
    fn safe_divide(&self, a: f64, b: f64) -> Result<f64>;

    fn fibonacci(&self, n: u32) -> Result<f64>;
}

/// Whether a scenario reused one worker instance or built one per iteration.
///
/// The two measure different costs, so every result records which it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceReuse {
    Shared,
    PerIteration,
    NotApplicable,
}

impl InstanceReuse {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceReuse::Shared => "shared",
            InstanceReuse::PerIteration => "per-iteration",
            InstanceReuse::NotApplicable => "n/a",
        }
    }
}

/// Smoke check: the instance saw exactly `expected` recorded calls.
pub fn verify_history<I: WorkerInstance>(label: &str, instance: &I, expected: u64) -> Result<()> {
    let actual = instance.history_count();
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::Consistency {
            label: label.to_string(),
            expected,
            actual,
        })
    }
}
