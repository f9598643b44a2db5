//! Benchmark driver
//!
//! Opens a session on the worker, runs the scenario table, the consistency
//! trials and the edge-case checks in that order, and writes the report.

pub mod aggregator;
pub mod runner;
pub mod scenario;
pub mod session;

use std::io::{self, Write};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::ui::report::{
    format_check, format_history_check, format_operation, format_trial_header,
    format_trial_summary, section_header, summary_table,
};
use crate::ui::system_info::SystemInfo;
use crate::utils::config::Settings;
use crate::utils::export::export_report;
use crate::worker::{NativeWorker, WorkerLibrary};

pub use runner::{measure, OperationResult, RunPlan};
pub use scenario::{CheckOutcome, Scenario, ScenarioKind, TrialOutcome, TrialScenario};
pub use session::Session;

/// Everything one run produced
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub version: &'static str,
    pub system: SystemInfo,
    pub operations: Vec<OperationResult>,
    pub trials: Vec<TrialOutcome>,
    pub checks: Vec<CheckOutcome>,
}

/// Entry point of the binary: native worker, settings from the environment,
/// report on stdout.
pub fn run_benchmark() -> Result<()> {
    let settings = Settings::load_from_env()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = run_benchmark_with(NativeWorker::new(), &settings, &mut out)?;
    export_report(&report, &settings)?;
    Ok(())
}

pub fn run_benchmark_with<W, O>(worker: W, settings: &Settings, out: &mut O) -> Result<BenchmarkReport>
where
    W: WorkerLibrary,
    O: Write,
{
    settings.validate()?;
    let unit = settings.time_unit;

    let separator = "=".repeat(60);
    writeln!(out, "{}", separator)?;
    writeln!(
        out,
        "{:^60}",
        "Cross-Language Interop Performance Benchmark".bold().cyan()
    )?;
    writeln!(out, "{}\n", separator)?;

    // Initialize before anything is measured
    let session = Session::open(worker)?;

    let system = SystemInfo::collect(session.worker().describe());
    system.write_to(out)?;

    // ========================================================================
    // SINGLE-OPERATION SCENARIOS
    // ========================================================================
    let scenarios = scenario::default_scenarios(settings);
    let pb = progress_bar(settings.show_progress, scenarios.len() as u64);

    let mut operations = Vec::with_capacity(scenarios.len());
    let mut current_section = "";
    for sc in &scenarios {
        pb.set_message(sc.label.clone());
        debug!(label = %sc.label, iterations = sc.plan.iterations, warmup = sc.plan.warmup, "running scenario");

        let result = scenario::run_scenario(&session, sc)?;

        let new_section = sc.section != current_section;
        pb.suspend(|| -> io::Result<()> {
            if new_section {
                writeln!(out)?;
                writeln!(
                    out,
                    "{}",
                    section_header(&format!("{} ({} iterations)", sc.section, sc.plan.iterations))
                )?;
            }
            writeln!(out, "{}", format_operation(&result, unit))
        })?;
        current_section = sc.section;

        operations.push(result);
        pb.inc(1);
    }
    pb.finish_and_clear();

    // ========================================================================
    // CONSISTENCY TRIALS
    // ========================================================================
    writeln!(out)?;
    writeln!(out, "{}", section_header("Consistency Tests (Multiple Runs)"))?;

    let mut trials = Vec::new();
    for ts in scenario::default_trial_scenarios(settings) {
        let outcome = scenario::run_trial_scenario(&session, &ts)?;
        writeln!(out, "{}", format_trial_header(&outcome.summary))?;
        writeln!(out, "{}", format_trial_summary(&outcome.summary, unit))?;
        writeln!(out, "{}", format_history_check(&outcome))?;
        trials.push(outcome);
    }

    // ========================================================================
    // EDGE CASES
    // ========================================================================
    writeln!(out)?;
    writeln!(out, "{}", section_header("Edge Case Checks"))?;
    let checks = scenario::run_edge_checks(&session)?;
    for check in &checks {
        writeln!(out, "{}", format_check(check))?;
    }

    writeln!(out)?;
    writeln!(out, "{}", section_header("Summary"))?;
    writeln!(out, "{}", summary_table(&operations, &trials, unit))?;

    writeln!(out)?;
    writeln!(out, "{}", section_header("Benchmark Complete"))?;
    out.flush()?;

    info!(
        worker = session.worker().name(),
        operations = operations.len(),
        trial_series = trials.len(),
        "benchmark complete"
    );

    Ok(BenchmarkReport {
        version: crate::VERSION,
        system,
        operations,
        trials,
        checks,
    })
}

fn progress_bar(visible: bool, len: u64) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-"),
    );
    pb
}
