//! Scenario table and the generic scenario runners
//!
//! Each benchmark is a record (label, section, kind, plan) instead of bespoke
//! code; `run_scenario` turns the kind into the operation handed to the
//! runner.

use serde::Serialize;

use crate::core::aggregator::aggregate;
use crate::core::runner::{measure, OperationResult, RunPlan};
use crate::core::session::Session;
use crate::error::{check_finite, expect_degenerate, Result};
use crate::stats::trial_series::TrialSummary;
use crate::utils::config::Settings;
use crate::worker::{verify_history, InstanceReuse, WorkerInstance, WorkerLibrary};

/// Payload for string round-trips
pub const STRING_PAYLOAD: &str = "Bench";

/// Payload for array aggregation
pub const ARRAY_PAYLOAD: [f64; 10] = [1.5, 2.7, 3.9, 4.1, 5.3, 6.8, 7.2, 8.4, 9.6, 10.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Numeric method on one shared reference instance
    ReferenceMethod,
    /// Numeric method on one value instance
    ValueMethod,
    /// Construct a reference instance every iteration
    ReferenceConstruct,
    /// Construct a value instance every iteration
    ValueConstruct,
    /// Two-argument value construction plus one accessor call, every iteration
    ValueConstructAccess,
    StringRoundtrip,
    ArrayAggregate,
    /// fibonacci(i % 20 + 1)
    MathFunction,
}

impl ScenarioKind {
    pub fn instance_reuse(&self) -> InstanceReuse {
        match self {
            ScenarioKind::ReferenceMethod | ScenarioKind::ValueMethod => InstanceReuse::Shared,
            ScenarioKind::ReferenceConstruct
            | ScenarioKind::ValueConstruct
            | ScenarioKind::ValueConstructAccess => InstanceReuse::PerIteration,
            ScenarioKind::StringRoundtrip
            | ScenarioKind::ArrayAggregate
            | ScenarioKind::MathFunction => InstanceReuse::NotApplicable,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub label: String,
    pub section: &'static str,
    pub kind: ScenarioKind,
    pub plan: RunPlan,
}

impl Scenario {
    pub fn new(
        label: impl Into<String>,
        section: &'static str,
        kind: ScenarioKind,
        iterations: u64,
        warmup: u64,
    ) -> Self {
        Self {
            label: label.into(),
            section,
            kind,
            plan: RunPlan::new(iterations, warmup).with_instance(kind.instance_reuse()),
        }
    }
}

/// The fixed scenario sequence, in execution order.
pub fn default_scenarios(settings: &Settings) -> Vec<Scenario> {
    let warmup = settings.warmup_iterations;
    vec![
        Scenario::new(
            "Class function calls",
            "Function Call Benchmark",
            ScenarioKind::ReferenceMethod,
            settings.call_iterations,
            warmup,
        ),
        Scenario::new(
            "Struct function calls",
            "Struct Function Call Benchmark",
            ScenarioKind::ValueMethod,
            settings.struct_call_iterations,
            warmup,
        ),
        Scenario::new(
            "Class creation",
            "Object Creation Benchmark",
            ScenarioKind::ReferenceConstruct,
            settings.creation_iterations,
            warmup,
        ),
        Scenario::new(
            "Struct creation",
            "Object Creation Benchmark",
            ScenarioKind::ValueConstruct,
            settings.creation_iterations,
            warmup,
        ),
        Scenario::new(
            "Point struct creation",
            "Object Creation Benchmark",
            ScenarioKind::ValueConstructAccess,
            settings.creation_iterations,
            warmup,
        ),
        Scenario::new(
            "String operations",
            "String Operations Benchmark",
            ScenarioKind::StringRoundtrip,
            settings.string_iterations,
            warmup,
        ),
        Scenario::new(
            "Math operations",
            "Math Operations Benchmark",
            ScenarioKind::MathFunction,
            settings.math_iterations,
            warmup,
        ),
        Scenario::new(
            "Array operations",
            "Array Operations Benchmark",
            ScenarioKind::ArrayAggregate,
            settings.array_iterations,
            warmup,
        ),
    ]
}

/// Run one scenario against an initialized worker.
pub fn run_scenario<W: WorkerLibrary>(
    session: &Session<W>,
    scenario: &Scenario,
) -> Result<OperationResult> {
    let worker = session.worker();
    let label = scenario.label.as_str();
    let plan = &scenario.plan;

    match scenario.kind {
        ScenarioKind::ReferenceMethod => {
            let calc = worker.construct_reference()?;
            measure(label, plan, |i| {
                let a = i as f64;
                check_finite("numeric_method", calc.numeric_method_pure(a, a + 1.0)?)
            })
        }
        ScenarioKind::ValueMethod => {
            let calc = worker.construct_value(0.0)?;
            measure(label, plan, |i| {
                let a = i as f64;
                check_finite("numeric_method", calc.numeric_method_pure(a, a + 1.0)?)
            })
        }
        ScenarioKind::ReferenceConstruct => measure(label, plan, |_| worker.construct_reference()),
        ScenarioKind::ValueConstruct => measure(label, plan, |i| worker.construct_value(i as f64)),
        ScenarioKind::ValueConstructAccess => measure(label, plan, |i| {
            let x = i as f64;
            let point = worker.construct_point(x, x + 1.0)?;
            worker.point_x(point)
        }),
        ScenarioKind::StringRoundtrip => {
            measure(label, plan, |_| worker.string_roundtrip(STRING_PAYLOAD))
        }
        ScenarioKind::ArrayAggregate => measure(label, plan, |_| {
            check_finite("array_aggregate", worker.array_aggregate(&ARRAY_PAYLOAD)?)
        }),
        ScenarioKind::MathFunction => measure(label, plan, |i| {
            let n = (i % 20) as u32 + 1;
            check_finite("fibonacci", worker.fibonacci(n)?)
        }),
    }
}

/// Which instance the consistency trials call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialTarget {
    Reference,
    Value,
}

#[derive(Debug, Clone)]
pub struct TrialScenario {
    pub label: String,
    pub target: TrialTarget,
    pub trials: u32,
    pub calls_per_trial: u64,
}

/// Reduced trial statistics plus the history count seen afterwards
#[derive(Debug, Clone, Serialize)]
pub struct TrialOutcome {
    pub summary: TrialSummary,
    pub target: TrialTarget,
    /// Trials call one instance built up front
    pub instance: InstanceReuse,
    pub calls_per_trial: u64,
    pub history_count: u64,
}

pub fn default_trial_scenarios(settings: &Settings) -> Vec<TrialScenario> {
    let calls = settings.calls_per_trial;
    vec![
        TrialScenario {
            label: format!("Class function calls ({} each)", calls),
            target: TrialTarget::Reference,
            trials: settings.consistency_trials,
            calls_per_trial: calls,
        },
        TrialScenario {
            label: format!("Struct function calls ({} each)", calls),
            target: TrialTarget::Value,
            trials: settings.consistency_trials,
            calls_per_trial: calls,
        },
    ]
}

/// Repeated trials of history-recording calls on one fresh instance, then
/// the history-count smoke check.
pub fn run_trial_scenario<W: WorkerLibrary>(
    session: &Session<W>,
    scenario: &TrialScenario,
) -> Result<TrialOutcome> {
    let worker = session.worker();
    match scenario.target {
        TrialTarget::Reference => {
            let mut calc = worker.construct_reference()?;
            run_trials_on(scenario, &mut calc)
        }
        TrialTarget::Value => {
            let mut calc = worker.construct_value(0.0)?;
            run_trials_on(scenario, &mut calc)
        }
    }
}

fn run_trials_on<I: WorkerInstance>(scenario: &TrialScenario, calc: &mut I) -> Result<TrialOutcome> {
    let calls = scenario.calls_per_trial;
    let summary = aggregate(&scenario.label, scenario.trials, || {
        for i in 0..calls {
            let a = i as f64;
            calc.numeric_method(a, a + 1.0)?;
        }
        Ok(())
    })?;

    let expected = u64::from(scenario.trials) * calls;
    verify_history(&scenario.label, &*calc, expected)?;

    Ok(TrialOutcome {
        summary,
        target: scenario.target,
        instance: InstanceReuse::Shared,
        calls_per_trial: calls,
        history_count: calc.history_count(),
    })
}

/// One passed edge-case check
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub label: String,
    pub detail: String,
}

/// Edge cases where the worker's answer itself is asserted.
///
/// Degenerate results are expected for division by zero and for averaging an
/// empty array; any other outcome is returned as an error.
pub fn run_edge_checks<W: WorkerLibrary>(session: &Session<W>) -> Result<Vec<CheckOutcome>> {
    let worker = session.worker();
    let mut checks = Vec::new();

    let quotient = check_finite("safe_divide", worker.safe_divide(10.0, 3.0)?)?;
    checks.push(CheckOutcome {
        label: "safe_divide(10, 3)".to_string(),
        detail: format!("{:.2}", quotient),
    });

    let nan = expect_degenerate("safe_divide", worker.safe_divide(10.0, 0.0)?)?;
    checks.push(CheckOutcome {
        label: "safe_divide(10, 0)".to_string(),
        detail: format!("{} (division by zero handled)", nan),
    });

    let empty = expect_degenerate("array_aggregate", worker.array_aggregate(&[])?)?;
    checks.push(CheckOutcome {
        label: "array_aggregate([])".to_string(),
        detail: format!("{} (empty input handled)", empty),
    });

    let greeting = worker.string_roundtrip(STRING_PAYLOAD)?;
    checks.push(CheckOutcome {
        label: format!("string_roundtrip({:?})", STRING_PAYLOAD),
        detail: format!("{:?}", greeting),
    });

    Ok(checks)
}
