//! Single-operation benchmark runner: warm-up, then one timed loop.

use std::hint::black_box;

use serde::Serialize;

use crate::error::{HarnessError, Result};
use crate::logging::{log_measurement, log_worker_failure};
use crate::stats::timer::Timer;
use crate::worker::InstanceReuse;

/// Iteration counts for one measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunPlan {
    pub warmup: u64,
    pub iterations: u64,
    pub instance: InstanceReuse,
}

impl RunPlan {
    pub fn new(iterations: u64, warmup: u64) -> Self {
        Self {
            warmup,
            iterations,
            instance: InstanceReuse::NotApplicable,
        }
    }

    pub fn with_instance(mut self, instance: InstanceReuse) -> Self {
        self.instance = instance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(HarnessError::invalid_configuration(
                "measured iteration count must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Outcome of one timed loop. Only the measured iterations are in the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult {
    pub label: String,
    pub iterations: u64,
    pub warmup: u64,
    pub total_elapsed_ns: u64,
    pub per_call_ns: f64,
    pub instance: InstanceReuse,
}

/// Run `op` `plan.warmup` times untimed, then exactly `plan.iterations` times
/// under one timer.
///
/// `op` receives the iteration index (restarting at zero for the measured
/// loop). The first error aborts the run and is returned as is; nothing is
/// retried and no partial result is produced.
pub fn measure<T, F>(label: &str, plan: &RunPlan, mut op: F) -> Result<OperationResult>
where
    F: FnMut(u64) -> Result<T>,
{
    plan.validate()?;

    for i in 0..plan.warmup {
        match op(i) {
            Ok(value) => {
                black_box(value);
            }
            Err(e) => {
                log_worker_failure(label, "warm-up", &e);
                return Err(e);
            }
        }
    }

    let mut timer = Timer::new();
    timer.start();
    for i in 0..plan.iterations {
        match op(i) {
            Ok(value) => {
                black_box(value);
            }
            Err(e) => {
                timer.stop();
                log_worker_failure(label, "measurement", &e);
                return Err(e);
            }
        }
    }
    let total_elapsed_ns = timer.elapsed_nanoseconds();
    timer.stop();

    let per_call_ns = total_elapsed_ns as f64 / plan.iterations as f64;
    log_measurement(label, plan.iterations, total_elapsed_ns, per_call_ns);

    Ok(OperationResult {
        label: label.to_string(),
        iterations: plan.iterations,
        warmup: plan.warmup,
        total_elapsed_ns,
        per_call_ns,
        instance: plan.instance,
    })
}
