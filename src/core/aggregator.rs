//! Repeated-trial aggregator
//!
//! Each trial runs a fixed batch of work under its own timer, which exposes
//! run-to-run variance (scheduling jitter, cache state) that a single long
//! measurement would hide.

use std::hint::black_box;

use crate::error::{HarnessError, Result};
use crate::logging::{log_trial, log_worker_failure};
use crate::stats::timer::Timer;
use crate::stats::trial_series::{TrialSeries, TrialSummary};

/// Run `op` `trials` times, one fresh timer per trial.
pub fn run_trials<T, F>(label: &str, trials: u32, mut op: F) -> Result<TrialSeries>
where
    F: FnMut() -> Result<T>,
{
    if trials == 0 {
        return Err(HarnessError::invalid_configuration(
            "trial count must be at least 1",
        ));
    }

    let mut series = TrialSeries::with_capacity(label, trials as usize);
    for trial in 0..trials {
        let mut timer = Timer::new();
        timer.start();
        let outcome = op();
        let elapsed_ns = timer.elapsed_nanoseconds() as f64;
        timer.stop();

        match outcome {
            Ok(value) => {
                black_box(value);
            }
            Err(e) => {
                log_worker_failure(label, "trial", &e);
                return Err(e);
            }
        }

        log_trial(label, trial + 1, elapsed_ns);
        series.push(elapsed_ns);
    }

    Ok(series)
}

/// `run_trials` followed by `TrialSeries::reduce`
pub fn aggregate<T, F>(label: &str, trials: u32, op: F) -> Result<TrialSummary>
where
    F: FnMut() -> Result<T>,
{
    run_trials(label, trials, op)?.reduce()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_trials_is_rejected() {
        let err = run_trials("none", 0, || Ok(())).unwrap_err();
        assert!(err.is_invalid_configuration());
    }

    #[test]
    fn one_sample_per_trial() {
        let mut batches = 0;
        let series = run_trials("batches", 4, || {
            batches += 1;
            Ok((0..100u64).sum::<u64>())
        })
        .unwrap();
        assert_eq!(batches, 4);
        assert_eq!(series.count, 4);
        assert_eq!(series.samples().len(), 4);
    }

    #[test]
    fn failing_trial_stops_the_series() {
        let mut calls = 0;
        let err = aggregate("fail", 5, || {
            calls += 1;
            if calls == 2 {
                Err(HarnessError::worker("numeric_method", "boom"))
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert!(matches!(err, HarnessError::WorkerInvocation { .. }));
        assert_eq!(calls, 2);
    }

    #[test]
    fn summary_is_ordered() {
        let summary = aggregate("ordered", 6, || Ok(std::hint::black_box(7u64).pow(3))).unwrap();
        assert_eq!(summary.trials, 6);
        assert!(summary.min_ns <= summary.average_ns);
        assert!(summary.average_ns <= summary.max_ns);
    }
}
