//! Logging setup for the benchmark binary
//!
//! Events go to stderr so they never interleave with the report on stdout.
//! Nothing is logged from inside a timed loop.

pub use tracing::{debug, error, info, trace, warn};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise debug builds log at DEBUG and release
/// builds at INFO.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        {
            EnvFilter::new("interop_bench=debug")
        }
        #[cfg(not(debug_assertions))]
        {
            EnvFilter::new("interop_bench=info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok(); // already installed
}

/// Record one finished measurement
#[inline]
pub fn log_measurement(label: &str, iterations: u64, total_elapsed_ns: u64, per_call_ns: f64) {
    debug!(
        target: "interop_bench::runner",
        label,
        iterations,
        total_elapsed_ns,
        per_call_ns,
        "measurement complete"
    );
}

/// Record one finished trial
#[inline]
pub fn log_trial(label: &str, trial: u32, elapsed_ns: f64) {
    trace!(
        target: "interop_bench::aggregator",
        label,
        trial,
        elapsed_ns,
        "trial complete"
    );
}

/// Record a worker failure before it propagates
#[inline]
pub fn log_worker_failure(label: &str, phase: &'static str, error: &dyn std::error::Error) {
    error!(
        target: "interop_bench::runner",
        label,
        phase,
        error = %error,
        "worker invocation failed"
    );
}
