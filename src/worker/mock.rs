//! In-process stand-in for the worker library.
//!
//! No boundary is crossed. The mock counts every invocation so tests can
//! check exactly how many calls the harness made, and it can be told to fail
//! after a number of calls to exercise error propagation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::{HarnessError, Result};
use crate::worker::{WorkerInstance, WorkerLibrary};

#[derive(Debug, Default)]
struct Counters {
    invocations: Cell<u64>,
    init_calls: Cell<u32>,
    fail_after: Cell<Option<u64>>,
}

impl Counters {
    fn record(&self, operation: &'static str) -> Result<()> {
        let seen = self.invocations.get();
        if let Some(limit) = self.fail_after.get() {
            if seen >= limit {
                return Err(HarnessError::worker(
                    operation,
                    format!("injected failure after {} calls", limit),
                ));
            }
        }
        self.invocations.set(seen + 1);
        Ok(())
    }
}

/// Single-threaded mock worker; cheap to clone, clones share counters.
#[derive(Debug, Clone, Default)]
pub struct MockWorker {
    counters: Rc<Counters>,
}

impl MockWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call after the first `calls` successful ones fails.
    pub fn failing_after(calls: u64) -> Self {
        let worker = Self::new();
        worker.counters.fail_after.set(Some(calls));
        worker
    }

    /// Successful operations so far. Reference methods count, value methods
    /// do not (a `Copy` value carries no link back to the worker).
    pub fn invocations(&self) -> u64 {
        self.counters.invocations.get()
    }

    pub fn init_calls(&self) -> u32 {
        self.counters.init_calls.get()
    }

    pub fn reset_invocations(&self) {
        self.counters.invocations.set(0);
    }
}

/// Value-typed mock calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct MockValue {
    last_result: f64,
    history: u64,
}

impl WorkerInstance for MockValue {
    fn numeric_method(&mut self, a: f64, b: f64) -> Result<f64> {
        self.last_result = a + b;
        self.history += 1;
        Ok(self.last_result)
    }

    fn numeric_method_pure(&self, a: f64, b: f64) -> Result<f64> {
        Ok(a + b)
    }

    fn history_count(&self) -> u64 {
        self.history
    }

    fn clear_history(&mut self) {
        self.history = 0;
    }
}

/// Mock point; plain data, accessor calls go through the worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockPoint {
    pub x: f64,
    pub y: f64,
}

/// Reference-typed mock calculator; clones alias the same history.
#[derive(Debug, Clone)]
pub struct MockReference {
    counters: Rc<Counters>,
    history: Rc<RefCell<Vec<f64>>>,
}

impl MockReference {
    pub fn same_instance(&self, other: &MockReference) -> bool {
        Rc::ptr_eq(&self.history, &other.history)
    }
}

impl WorkerInstance for MockReference {
    fn numeric_method(&mut self, a: f64, b: f64) -> Result<f64> {
        self.counters.record("numeric_method")?;
        let result = a + b;
        self.history.borrow_mut().push(result);
        Ok(result)
    }

    fn numeric_method_pure(&self, a: f64, b: f64) -> Result<f64> {
        self.counters.record("numeric_method_pure")?;
        Ok(a + b)
    }

    fn history_count(&self) -> u64 {
        self.history.borrow().len() as u64
    }

    fn clear_history(&mut self) {
        self.history.borrow_mut().clear();
    }
}

impl WorkerLibrary for MockWorker {
    type Value = MockValue;
    type Reference = MockReference;
    type Point = MockPoint;

    fn name(&self) -> &str {
        "mock"
    }

    fn describe(&self) -> String {
        "in-process mock worker".to_string()
    }

    fn initialize(&self) -> Result<()> {
        self.counters.init_calls.set(self.counters.init_calls.get() + 1);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.counters.init_calls.get() > 0
    }

    fn construct_value(&self, initial: f64) -> Result<MockValue> {
        self.counters.record("construct_value")?;
        Ok(MockValue {
            last_result: initial,
            history: 0,
        })
    }

    fn construct_reference(&self) -> Result<MockReference> {
        self.counters.record("construct_reference")?;
        Ok(MockReference {
            counters: Rc::clone(&self.counters),
            history: Rc::new(RefCell::new(Vec::new())),
        })
    }

    fn construct_point(&self, x: f64, y: f64) -> Result<MockPoint> {
        self.counters.record("construct_point")?;
        Ok(MockPoint { x, y })
    }

    fn point_x(&self, point: MockPoint) -> Result<f64> {
        self.counters.record("point_x")?;
        Ok(point.x)
    }

    fn string_roundtrip(&self, text: &str) -> Result<String> {
        self.counters.record("string_roundtrip")?;
        Ok(text.to_owned())
    }

    fn array_aggregate(&self, values: &[f64]) -> Result<f64> {
        self.counters.record("array_aggregate")?;
        if values.is_empty() {
            return Ok(f64::NAN);
        }
        Ok(values.iter().sum::<f64>() / values.len() as f64)
    }

    fn safe_divide(&self, a: f64, b: f64) -> Result<f64> {
        self.counters.record("safe_divide")?;
        Ok(if b == 0.0 { f64::NAN } else { a / b })
    }

    fn fibonacci(&self, n: u32) -> Result<f64> {
        self.counters.record("fibonacci")?;
        let (mut prev, mut curr) = (0.0_f64, 1.0_f64);
        if n == 0 {
            return Ok(0.0);
        }
        for _ in 1..n {
            let next = prev + curr;
            prev = curr;
            curr = next;
        }
        Ok(curr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_operation() {
        let worker = MockWorker::new();
        let mut calc = worker.construct_reference().unwrap();
        calc.numeric_method(1.0, 2.0).unwrap();
        calc.numeric_method_pure(1.0, 2.0).unwrap();
        worker.string_roundtrip("x").unwrap();
        worker.array_aggregate(&[1.0, 3.0]).unwrap();
        assert_eq!(worker.invocations(), 5);

        worker.reset_invocations();
        assert_eq!(worker.invocations(), 0);
    }

    #[test]
    fn injected_failure_stops_counting() {
        let worker = MockWorker::failing_after(2);
        worker.string_roundtrip("a").unwrap();
        worker.string_roundtrip("b").unwrap();
        let err = worker.string_roundtrip("c").unwrap_err();
        assert!(matches!(err, HarnessError::WorkerInvocation { operation: "string_roundtrip", .. }));
        assert_eq!(worker.invocations(), 2);
    }

    #[test]
    fn reference_clones_alias() {
        let worker = MockWorker::new();
        let mut a = worker.construct_reference().unwrap();
        let b = a.clone();
        let c = worker.construct_reference().unwrap();
        a.numeric_method(1.0, 1.0).unwrap();
        assert!(a.same_instance(&b));
        assert!(!a.same_instance(&c));
        assert_eq!(b.history_count(), 1);
        assert_eq!(c.history_count(), 0);
    }

    #[test]
    fn value_copies_are_independent() {
        let worker = MockWorker::new();
        let mut a = worker.construct_value(0.0).unwrap();
        let b = a;
        a.numeric_method(2.0, 3.0).unwrap();
        assert_eq!(a.history_count(), 1);
        assert_eq!(b.history_count(), 0);
    }

    #[test]
    fn point_construction_and_access_both_count() {
        let worker = MockWorker::new();
        let point = worker.construct_point(2.0, 3.0).unwrap();
        assert_eq!(point, MockPoint { x: 2.0, y: 3.0 });
        assert_eq!(worker.point_x(point).unwrap(), 2.0);
        assert_eq!(worker.invocations(), 2);
    }

    #[test]
    fn fibonacci_matches_native_definition() {
        let worker = MockWorker::new();
        let expected = [0.0, 1.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0, 55.0];
        for (n, want) in expected.iter().enumerate() {
            assert_eq!(worker.fibonacci(n as u32).unwrap(), *want);
        }
    }

    #[test]
    fn initialize_is_counted() {
        let worker = MockWorker::new();
        assert!(!worker.is_initialized());
        worker.initialize().unwrap();
        assert!(worker.is_initialized());
        assert_eq!(worker.init_calls(), 1);
    }
}
