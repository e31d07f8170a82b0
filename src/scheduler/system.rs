//! Host resource sampling.

use sysinfo::System;

/// CPU and memory usage as percentages, rounded to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystemUsage {
    /// One-minute load average per logical core.
    pub cpu_percent: f64,
    /// Used memory over total memory.
    pub memory_percent: f64,
}

/// Source of host resource readings.
pub trait ResourceSampler: Send {
    fn sample(&mut self) -> SystemUsage;
}

/// Reads the real host through `sysinfo`.
pub struct HostSampler {
    sys: System,
}

impl HostSampler {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        Self { sys }
    }
}

impl Default for HostSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceSampler for HostSampler {
    fn sample(&mut self) -> SystemUsage {
        self.sys.refresh_memory();

        let load = System::load_average().one;
        let cores = self.sys.cpus().len();

        SystemUsage {
            cpu_percent: percent(load, cores as f64),
            memory_percent: percent(self.sys.used_memory() as f64, self.sys.total_memory() as f64),
        }
    }
}

/// `part / whole` as a two-decimal percentage; 0 when `whole` is not positive.
pub fn percent(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 || !part.is_finite() {
        return 0.0;
    }
    round2(part / whole * 100.0)
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
