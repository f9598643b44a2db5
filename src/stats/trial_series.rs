//! Per-trial samples and their reduction to average/min/max.

use serde::Serialize;

use crate::error::{HarnessError, Result};
use crate::stats::robust_statistics::RobustStatistics;

/// Elapsed time of each trial for one labeled operation.
///
/// Grows by one `push` per trial and is consumed by `reduce`.
#[derive(Debug, Clone)]
pub struct TrialSeries {
    pub label: String,
    pub trial_elapsed_ns: Vec<f64>,
    pub count: u32,
}

/// Reduced statistics of a finished series, all in nanoseconds
#[derive(Debug, Clone, Serialize)]
pub struct TrialSummary {
    pub label: String,
    pub trials: u32,
    pub average_ns: f64,
    pub min_ns: f64,
    pub max_ns: f64,
    pub spread: RobustStatistics,
}

impl TrialSeries {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_capacity(label, 0)
    }

    pub fn with_capacity(label: impl Into<String>, trials: usize) -> Self {
        Self {
            label: label.into(),
            trial_elapsed_ns: Vec::with_capacity(trials),
            count: 0,
        }
    }

    pub fn push(&mut self, elapsed_ns: f64) {
        self.trial_elapsed_ns.push(elapsed_ns);
        self.count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.trial_elapsed_ns.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.trial_elapsed_ns
    }

    /// Mean (sum then divide, clamped into `[min, max]`), exact min and max
    /// by linear scan.
    pub fn reduce(self) -> Result<TrialSummary> {
        if self.is_empty() {
            return Err(HarnessError::invalid_configuration(format!(
                "trial series `{}` has no samples",
                self.label
            )));
        }

        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &sample in &self.trial_elapsed_ns {
            if !sample.is_finite() {
                return Err(HarnessError::invalid_configuration(format!(
                    "trial series `{}` holds a non-finite sample ({})",
                    self.label, sample
                )));
            }
            sum += sample;
            if sample < min {
                min = sample;
            }
            if sample > max {
                max = sample;
            }
        }
        // summation rounding can land an ulp outside the sample range
        let average = (sum / self.trial_elapsed_ns.len() as f64).clamp(min, max);
        let spread = RobustStatistics::from_samples(&self.trial_elapsed_ns)?;

        Ok(TrialSummary {
            label: self.label,
            trials: self.count,
            average_ns: average,
            min_ns: min,
            max_ns: max,
            spread,
        })
    }
}
