//! Robust statistics over trial samples
//!
//! These complement the plain average/min/max of a trial series with
//! distribution-aware numbers: median, MAD, percentiles and a mean computed
//! after dropping MAD outliers. They never replace the arithmetic mean.

use serde::Serialize;

use crate::error::{HarnessError, Result};

/// MAD multiplier for outlier detection (~3 sigma for normal data)
const OUTLIER_K: f64 = 3.5;

#[derive(Debug, Clone, Serialize)]
pub struct RobustStatistics {
    pub median: f64,
    pub stdev: f64,            // population standard deviation over all samples
    pub mad: f64,              // median absolute deviation
    pub p95: f64,
    pub p99: f64,
    pub trimmed_mean: f64,     // mean after dropping samples beyond K * MAD
    pub outliers_removed: usize,
    pub confidence_interval_95: (f64, f64),
}

impl RobustStatistics {
    pub fn from_samples(samples: &[f64]) -> Result<Self> {
        if samples.is_empty() {
            return Err(HarnessError::invalid_configuration(
                "cannot compute statistics from zero samples",
            ));
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let median = Self::percentile(&sorted, 50.0);

        let mut deviations: Vec<f64> = sorted.iter().map(|&x| (x - median).abs()).collect();
        deviations.sort_by(f64::total_cmp);
        let mad = Self::percentile(&deviations, 50.0);

        // MAD of zero means at least half the samples are identical; keep everything
        let threshold = OUTLIER_K * mad;
        let clean: Vec<f64> = if mad > 0.0 {
            sorted
                .iter()
                .copied()
                .filter(|&x| (x - median).abs() <= threshold)
                .collect()
        } else {
            sorted.clone()
        };
        let outliers_removed = sorted.len() - clean.len();
        let trimmed_mean = clean.iter().sum::<f64>() / clean.len() as f64;

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let stdev = variance.sqrt();

        let se = stdev / n.sqrt();
        let margin = 1.96 * se;

        Ok(Self {
            median,
            stdev,
            mad,
            p95: Self::percentile(&sorted, 95.0),
            p99: Self::percentile(&sorted, 99.0),
            trimmed_mean,
            outliers_removed,
            confidence_interval_95: (mean - margin, mean + margin),
        })
    }

    /// Nearest-rank percentile of already sorted data
    fn percentile(sorted_data: &[f64], p: f64) -> f64 {
        let idx = (p / 100.0 * (sorted_data.len() - 1) as f64).round() as usize;
        sorted_data[idx.min(sorted_data.len() - 1)]
    }

    /// Coefficient of variation in percent, relative to the median.
    pub fn relative_spread(&self) -> f64 {
        if self.median == 0.0 {
            0.0
        } else {
            self.stdev / self.median * 100.0
        }
    }
}
