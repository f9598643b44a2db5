//! Error type shared by the runner, the aggregator and the worker adapters.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// Zero iterations or trials, an empty sample set, or a bad settings value.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The worker library reported a failure. Never retried.
    #[error("worker operation `{operation}` failed: {reason}")]
    WorkerInvocation {
        operation: &'static str,
        reason: String,
    },

    /// The worker returned NaN or infinity where a finite value was promised.
    #[error("worker operation `{operation}` returned a non-finite result ({value})")]
    ArithmeticDegenerate { operation: &'static str, value: f64 },

    /// History-count smoke check after repeated calls.
    #[error("consistency check failed for {label}: expected history count {expected}, found {actual}")]
    Consistency {
        label: String,
        expected: u64,
        actual: u64,
    },

    #[error("failed to load settings from {}: {source}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl HarnessError {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        HarnessError::InvalidConfiguration(message.into())
    }

    pub fn worker(operation: &'static str, reason: impl Into<String>) -> Self {
        HarnessError::WorkerInvocation {
            operation,
            reason: reason.into(),
        }
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, HarnessError::InvalidConfiguration(_))
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, HarnessError::ArithmeticDegenerate { .. })
    }
}

/// Pass a finite worker result through, flag NaN/infinity as degenerate.
#[inline]
pub fn check_finite(operation: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(HarnessError::ArithmeticDegenerate { operation, value })
    }
}

/// Turn an expected degenerate outcome into success.
///
/// Used for edge cases where the worker is supposed to answer NaN (division
/// by zero, averaging an empty array). A finite answer is the failure here.
pub fn expect_degenerate(operation: &'static str, value: f64) -> Result<f64> {
    match check_finite(operation, value) {
        Err(HarnessError::ArithmeticDegenerate { value, .. }) => Ok(value),
        Ok(finite) => Err(HarnessError::worker(
            operation,
            format!("expected a non-finite result, got {}", finite),
        )),
        Err(other) => Err(other),
    }
}
