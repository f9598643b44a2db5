//! Production adapter over the bundled C worker (`native/worker.c`).
//!
//! Every call here crosses the Rust/C boundary. Strings are marshalled through
//! `CString`/`CStr`; the reference calculator is an opaque heap object owned
//! by the C side and freed on drop.
//!
//! Unless noted otherwise, every `unsafe` block below calls a C function that
//! only reads its scalar arguments, or a handle this module obtained from the
//! library and still owns.

use std::ffi::{CStr, CString};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use tracing::info;

use crate::error::{HarnessError, Result};
use crate::worker::{WorkerInstance, WorkerLibrary};

#[allow(non_camel_case_types)]
mod ffi {
    use std::ffi::{c_char, c_int};

    pub const WK_OK: c_int = 0;
    pub const WK_ERR_ALLOC: c_int = -1;
    pub const WK_ERR_NULL: c_int = -2;

    #[repr(C)]
    #[derive(Debug, Clone, Copy)]
    pub struct wk_calculator_value {
        pub last_result: f64,
        pub history_count: u64,
    }

    #[repr(C)]
    #[derive(Debug, Clone, Copy)]
    pub struct wk_point {
        pub x: f64,
        pub y: f64,
    }

    #[repr(C)]
    pub struct wk_calculator {
        _private: [u8; 0],
    }

    extern "C" {
        pub fn wk_initialize();
        pub fn wk_is_initialized() -> c_int;
        pub fn wk_compiler_name() -> *const c_char;

        pub fn wk_value_new(initial: f64) -> wk_calculator_value;
        pub fn wk_value_add(this: *mut wk_calculator_value, a: f64, b: f64) -> f64;
        pub fn wk_value_add_only(this: wk_calculator_value, a: f64, b: f64) -> f64;

        pub fn wk_point_new(x: f64, y: f64) -> wk_point;
        pub fn wk_point_x(this: wk_point) -> f64;
        pub fn wk_point_y(this: wk_point) -> f64;

        pub fn wk_calculator_new() -> *mut wk_calculator;
        pub fn wk_calculator_free(this: *mut wk_calculator);
        pub fn wk_calculator_add(this: *mut wk_calculator, a: f64, b: f64, out: *mut f64) -> c_int;
        pub fn wk_calculator_add_only(this: *const wk_calculator, a: f64, b: f64) -> f64;
        pub fn wk_calculator_history_count(this: *const wk_calculator) -> usize;
        pub fn wk_calculator_clear_history(this: *mut wk_calculator);

        pub fn wk_greet(name: *const c_char) -> *mut c_char;
        pub fn wk_string_free(text: *mut c_char);
        pub fn wk_array_average(values: *const f64, len: usize) -> f64;
        pub fn wk_safe_divide(a: f64, b: f64) -> f64;
        pub fn wk_fibonacci(n: u32) -> f64;
    }
}

static INIT: Once = Once::new();
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Handle to the C worker library. Stateless; library state is process-wide.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeWorker;

impl NativeWorker {
    pub fn new() -> Self {
        NativeWorker
    }

    fn compiler_name() -> String {
        // SAFETY: returns a pointer to a static NUL-terminated literal
        unsafe { CStr::from_ptr(ffi::wk_compiler_name()) }
            .to_string_lossy()
            .into_owned()
    }
}

/// Value calculator living in Rust memory, handed to C by pointer or by copy.
#[derive(Debug, Clone, Copy)]
pub struct NativeValue(ffi::wk_calculator_value);

impl NativeValue {
    pub fn last_result(&self) -> f64 {
        self.0.last_result
    }
}

impl WorkerInstance for NativeValue {
    fn numeric_method(&mut self, a: f64, b: f64) -> Result<f64> {
        // SAFETY: `self.0` is a live, exclusively borrowed repr(C) struct
        Ok(unsafe { ffi::wk_value_add(&mut self.0, a, b) })
    }

    fn numeric_method_pure(&self, a: f64, b: f64) -> Result<f64> {
        Ok(unsafe { ffi::wk_value_add_only(self.0, a, b) })
    }

    fn history_count(&self) -> u64 {
        self.0.history_count
    }

    fn clear_history(&mut self) {
        self.0.history_count = 0;
    }
}

/// Point struct built by the C side and returned by value.
#[derive(Debug, Clone, Copy)]
pub struct NativePoint(ffi::wk_point);

impl NativePoint {
    pub fn x(&self) -> f64 {
        unsafe { ffi::wk_point_x(self.0) }
    }

    pub fn y(&self) -> f64 {
        unsafe { ffi::wk_point_y(self.0) }
    }
}

/// Owned handle to a C-allocated calculator. Never inspected, only passed back.
#[derive(Debug)]
pub struct NativeReference {
    ptr: NonNull<ffi::wk_calculator>,
}

impl WorkerInstance for NativeReference {
    fn numeric_method(&mut self, a: f64, b: f64) -> Result<f64> {
        let mut out = 0.0;
        // SAFETY: `ptr` is non-null and owned; `out` outlives the call
        let status = unsafe { ffi::wk_calculator_add(self.ptr.as_ptr(), a, b, &mut out) };
        match status {
            ffi::WK_OK => Ok(out),
            ffi::WK_ERR_ALLOC => Err(HarnessError::worker(
                "numeric_method",
                "history allocation failed",
            )),
            ffi::WK_ERR_NULL => Err(HarnessError::worker("numeric_method", "null handle")),
            other => Err(HarnessError::worker(
                "numeric_method",
                format!("unknown status {}", other),
            )),
        }
    }

    fn numeric_method_pure(&self, a: f64, b: f64) -> Result<f64> {
        Ok(unsafe { ffi::wk_calculator_add_only(self.ptr.as_ptr(), a, b) })
    }

    fn history_count(&self) -> u64 {
        unsafe { ffi::wk_calculator_history_count(self.ptr.as_ptr()) as u64 }
    }

    fn clear_history(&mut self) {
        unsafe { ffi::wk_calculator_clear_history(self.ptr.as_ptr()) }
    }
}

impl Drop for NativeReference {
    fn drop(&mut self) {
        // SAFETY: the pointer came from wk_calculator_new and is freed exactly once
        unsafe { ffi::wk_calculator_free(self.ptr.as_ptr()) }
    }
}

impl WorkerLibrary for NativeWorker {
    type Value = NativeValue;
    type Reference = NativeReference;
    type Point = NativePoint;

    fn name(&self) -> &str {
        "native-c"
    }

    fn describe(&self) -> String {
        format!("C worker library (compiled with {})", Self::compiler_name())
    }

    fn initialize(&self) -> Result<()> {
        INIT.call_once(|| {
            unsafe { ffi::wk_initialize() };
            INITIALIZED.store(true, Ordering::Relaxed);
            info!(compiler = %Self::compiler_name(), "C worker library initialized");
        });

        if INITIALIZED.load(Ordering::Relaxed) && self.is_initialized() {
            Ok(())
        } else {
            Err(HarnessError::worker(
                "initialize",
                "library did not report ready after initialization",
            ))
        }
    }

    fn is_initialized(&self) -> bool {
        unsafe { ffi::wk_is_initialized() != 0 }
    }

    fn construct_value(&self, initial: f64) -> Result<NativeValue> {
        Ok(NativeValue(unsafe { ffi::wk_value_new(initial) }))
    }

    fn construct_reference(&self) -> Result<NativeReference> {
        let raw = unsafe { ffi::wk_calculator_new() };
        NonNull::new(raw)
            .map(|ptr| NativeReference { ptr })
            .ok_or_else(|| HarnessError::worker("construct_reference", "allocation failed"))
    }

    fn construct_point(&self, x: f64, y: f64) -> Result<NativePoint> {
        Ok(NativePoint(unsafe { ffi::wk_point_new(x, y) }))
    }

    fn point_x(&self, point: NativePoint) -> Result<f64> {
        Ok(point.x())
    }

    fn string_roundtrip(&self, text: &str) -> Result<String> {
        let input = CString::new(text).map_err(|_| {
            HarnessError::worker("string_roundtrip", "input contains an interior NUL byte")
        })?;

        // SAFETY: `input` is NUL-terminated and alive for the whole call
        let raw = unsafe { ffi::wk_greet(input.as_ptr()) };
        if raw.is_null() {
            return Err(HarnessError::worker("string_roundtrip", "worker returned null"));
        }

        // Copy out before handing the buffer back to the C allocator.
        // SAFETY: `raw` is a non-null, NUL-terminated buffer from wk_greet,
        // freed exactly once below and not touched afterwards
        let decoded = unsafe { CStr::from_ptr(raw) }
            .to_str()
            .map(str::to_owned)
            .map_err(|e| HarnessError::worker("string_roundtrip", e.to_string()));
        unsafe { ffi::wk_string_free(raw) };
        decoded
    }

    fn array_aggregate(&self, values: &[f64]) -> Result<f64> {
        // SAFETY: pointer and length come from one live slice; C only reads
        Ok(unsafe { ffi::wk_array_average(values.as_ptr(), values.len()) })
    }

    fn safe_divide(&self, a: f64, b: f64) -> Result<f64> {
        Ok(unsafe { ffi::wk_safe_divide(a, b) })
    }

    fn fibonacci(&self, n: u32) -> Result<f64> {
        Ok(unsafe { ffi::wk_fibonacci(n) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::verify_history;

    fn worker() -> NativeWorker {
        let worker = NativeWorker::new();
        worker.initialize().unwrap();
        worker
    }

    #[test]
    fn initialize_is_idempotent() {
        let worker = worker();
        worker.initialize().unwrap();
        assert!(worker.is_initialized());
    }

    #[test]
    fn reference_calculator_records_history() {
        let worker = worker();
        let mut calc = worker.construct_reference().unwrap();
        assert_eq!(calc.numeric_method(15.5, 24.3).unwrap(), 15.5 + 24.3);
        for i in 0..1_000 {
            calc.numeric_method(i as f64, (i + 1) as f64).unwrap();
        }
        verify_history("native reference", &calc, 1_001).unwrap();

        assert_eq!(calc.numeric_method_pure(1.0, 2.0).unwrap(), 3.0);
        assert_eq!(calc.history_count(), 1_001);

        calc.clear_history();
        assert_eq!(calc.history_count(), 0);
    }

    #[test]
    fn value_calculator_is_copied() {
        let worker = worker();
        let mut original = worker.construct_value(0.0).unwrap();
        original.numeric_method(1.0, 2.0).unwrap();

        let mut copy = original;
        copy.numeric_method(3.0, 4.0).unwrap();

        assert_eq!(original.history_count(), 1);
        assert_eq!(original.last_result(), 3.0);
        assert_eq!(copy.history_count(), 2);
        assert_eq!(copy.last_result(), 7.0);
    }

    #[test]
    fn point_is_built_and_read_back() {
        let worker = worker();
        let point = worker.construct_point(3.0, 4.0).unwrap();
        assert_eq!(worker.point_x(point).unwrap(), 3.0);
        assert_eq!(point.y(), 4.0);
    }

    #[test]
    fn greeting_crosses_both_ways() {
        let worker = worker();
        assert_eq!(worker.string_roundtrip("Bench").unwrap(), "Hello, Bench!");
        assert_eq!(worker.string_roundtrip("").unwrap(), "Hello, !");

        let err = worker.string_roundtrip("bad\0input").unwrap_err();
        assert!(matches!(err, HarnessError::WorkerInvocation { operation: "string_roundtrip", .. }));
    }

    #[test]
    fn arrays_and_math() {
        let worker = worker();
        let numbers = [1.5, 2.7, 3.9, 4.1, 5.3, 6.8, 7.2, 8.4, 9.6, 10.0];
        let average = worker.array_aggregate(&numbers).unwrap();
        assert!((average - 5.95).abs() < 1e-9);
        assert!(worker.array_aggregate(&[]).unwrap().is_nan());

        assert!((worker.safe_divide(10.0, 4.0).unwrap() - 2.5).abs() < 1e-12);
        assert!(worker.safe_divide(10.0, 0.0).unwrap().is_nan());

        assert_eq!(worker.fibonacci(0).unwrap(), 0.0);
        assert_eq!(worker.fibonacci(1).unwrap(), 1.0);
        assert_eq!(worker.fibonacci(10).unwrap(), 55.0);
        assert_eq!(worker.fibonacci(20).unwrap(), 6765.0);
    }

    #[test]
    fn description_names_the_compiler() {
        assert!(worker().describe().starts_with("C worker library"));
    }
}
