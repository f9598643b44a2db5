//! Text rendering of measurement results
//!
//! The `format_*` functions are pure and uncolored; only section headers and
//! check markers carry color.

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use serde::{Deserialize, Serialize};

use crate::core::runner::OperationResult;
use crate::core::scenario::{CheckOutcome, TrialOutcome};
use crate::stats::trial_series::TrialSummary;

/// Unit used when printing elapsed times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum TimeUnit {
    #[serde(rename = "ns")]
    Nanoseconds,
    #[serde(rename = "us", alias = "μs")]
    Microseconds,
    #[serde(rename = "ms")]
    Milliseconds,
}

impl TimeUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "μs",
            TimeUnit::Milliseconds => "ms",
        }
    }

    pub fn from_ns(&self, ns: f64) -> f64 {
        match self {
            TimeUnit::Nanoseconds => ns,
            TimeUnit::Microseconds => ns / 1_000.0,
            TimeUnit::Milliseconds => ns / 1_000_000.0,
        }
    }
}

/// `<label>: <iterations> calls in <total> <unit> (<per_call> <unit> per call)`
pub fn format_operation(result: &OperationResult, unit: TimeUnit) -> String {
    format!(
        "{}: {} calls in {:.2} {} ({:.2} {} per call)",
        result.label,
        result.iterations,
        unit.from_ns(result.total_elapsed_ns as f64),
        unit.symbol(),
        unit.from_ns(result.per_call_ns),
        unit.symbol(),
    )
}

pub fn format_trial_header(summary: &TrialSummary) -> String {
    format!("{} - {} runs:", summary.label, summary.trials)
}

/// Exactly three lines: average, min, max
pub fn format_trial_summary(summary: &TrialSummary, unit: TimeUnit) -> String {
    let sym = unit.symbol();
    format!(
        "  Average: {:.2} {}\n  Min: {:.2} {}\n  Max: {:.2} {}",
        unit.from_ns(summary.average_ns),
        sym,
        unit.from_ns(summary.min_ns),
        sym,
        unit.from_ns(summary.max_ns),
        sym,
    )
}

pub fn section_header(title: &str) -> String {
    format!("=== {} ===", title).bold().cyan().to_string()
}

pub fn format_check(check: &CheckOutcome) -> String {
    format!("  {} {} = {}", "✓".green(), check.label, check.detail)
}

pub fn format_history_check(outcome: &TrialOutcome) -> String {
    format!(
        "  {} history count {} after {} × {} calls",
        "✓".green(),
        outcome.history_count,
        outcome.summary.trials,
        outcome.calls_per_trial
    )
}

/// Summary table over every measurement and trial series
pub fn summary_table(
    operations: &[OperationResult],
    trials: &[TrialOutcome],
    unit: TimeUnit,
) -> Table {
    let sym = unit.symbol();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Benchmark"),
            Cell::new("Instance"),
            Cell::new("Calls"),
            Cell::new(format!("Total ({})", sym)),
            Cell::new(format!("Per call ({})", sym)),
        ]);

    for result in operations {
        table.add_row(vec![
            Cell::new(&result.label),
            Cell::new(result.instance.as_str()),
            Cell::new(result.iterations).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", unit.from_ns(result.total_elapsed_ns as f64)))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", unit.from_ns(result.per_call_ns)))
                .set_alignment(CellAlignment::Right),
        ]);
    }

    for outcome in trials {
        let summary = &outcome.summary;
        let calls = u64::from(summary.trials) * outcome.calls_per_trial;
        let total: f64 = summary.average_ns * f64::from(summary.trials);
        table.add_row(vec![
            Cell::new(format!(
                "{} (median {:.2} {}, ±{:.1}%)",
                summary.label,
                unit.from_ns(summary.spread.median),
                sym,
                summary.spread.relative_spread()
            )),
            Cell::new(outcome.instance.as_str()),
            Cell::new(calls).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", unit.from_ns(total))).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", unit.from_ns(total / calls as f64)))
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scenario::TrialTarget;
    use crate::stats::trial_series::TrialSeries;
    use crate::worker::InstanceReuse;

    fn result() -> OperationResult {
        OperationResult {
            label: "Class function calls".to_string(),
            iterations: 10_000,
            warmup: 100,
            total_elapsed_ns: 1_234_567,
            per_call_ns: 123.4567,
            instance: InstanceReuse::Shared,
        }
    }

    #[test]
    fn operation_line_in_microseconds() {
        assert_eq!(
            format_operation(&result(), TimeUnit::Microseconds),
            "Class function calls: 10000 calls in 1234.57 μs (0.12 μs per call)"
        );
    }

    #[test]
    fn operation_line_in_nanoseconds() {
        assert_eq!(
            format_operation(&result(), TimeUnit::Nanoseconds),
            "Class function calls: 10000 calls in 1234567.00 ns (123.46 ns per call)"
        );
    }

    #[test]
    fn trial_summary_is_three_lines() {
        let mut series = TrialSeries::new("Class function calls (1000 each)");
        for ns in [10_000.0, 20_000.0, 30_000.0] {
            series.push(ns);
        }
        let summary = series.reduce().unwrap();

        assert_eq!(
            format_trial_header(&summary),
            "Class function calls (1000 each) - 3 runs:"
        );
        let text = format_trial_summary(&summary, TimeUnit::Microseconds);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["  Average: 20.00 μs", "  Min: 10.00 μs", "  Max: 30.00 μs"]
        );
    }

    #[test]
    fn table_has_a_row_per_result() {
        let table = summary_table(&[result(), result()], &[], TimeUnit::Milliseconds);
        assert_eq!(table.row_iter().count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("Per call (ms)"));
        assert!(rendered.contains("shared"));
    }

    #[test]
    fn trial_rows_show_recorded_reuse() {
        let mut series = TrialSeries::new("Class function calls (10 each)");
        for sample in [100.0, 200.0] {
            series.push(sample);
        }
        let outcome = TrialOutcome {
            summary: series.reduce().unwrap(),
            target: TrialTarget::Reference,
            instance: InstanceReuse::PerIteration,
            calls_per_trial: 10,
            history_count: 20,
        };

        let rendered = summary_table(&[], &[outcome], TimeUnit::Nanoseconds).to_string();
        assert!(rendered.contains("per-iteration"));
        assert!(!rendered.contains("shared"));
    }
}
