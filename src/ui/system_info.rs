//! Host description printed above the results.
//!
//! Collected once, before the worker is measured.

use std::io::{self, Write};

use colored::*;
use serde::Serialize;
use sysinfo::System;

#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub os: String,
    pub cpu: String,
    pub logical_cpus: usize,
    pub total_memory_mb: u64,
    pub worker: String,
    pub clock: &'static str,
    pub build: &'static str,
}

impl SystemInfo {
    pub fn collect(worker: String) -> Self {
        let sys = System::new_all();
        let os = os_info::get();

        Self {
            os: format!("{} {} ({})", os.os_type(), os.version(), os.bitness()),
            cpu: cpu_brand(&sys),
            logical_cpus: sys.cpus().len(),
            total_memory_mb: sys.total_memory() / (1024 * 1024),
            worker,
            clock: "monotonic (std::time::Instant)",
            build: if cfg!(debug_assertions) { "debug" } else { "release" },
        }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", "System Information".bold().yellow())?;
        writeln!(out, "━━━━━━━━━━━━━━━━━━━")?;
        writeln!(out, "OS:       {}", self.os)?;
        writeln!(out, "CPU:      {} ({} logical)", self.cpu, self.logical_cpus)?;
        writeln!(out, "Memory:   {} MB", self.total_memory_mb)?;
        writeln!(out, "Worker:   {}", self.worker)?;
        writeln!(out, "Clock:    {}", self.clock)?;
        writeln!(out, "Build:    {}", self.build)?;
        Ok(())
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn cpu_brand(sys: &System) -> String {
    let cpuid = raw_cpuid::CpuId::new();
    match cpuid.get_processor_brand_string() {
        Some(brand) => brand.as_str().trim().to_string(),
        None => fallback_brand(sys),
    }
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn cpu_brand(sys: &System) -> String {
    fallback_brand(sys)
}

fn fallback_brand(sys: &System) -> String {
    sys.cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}
