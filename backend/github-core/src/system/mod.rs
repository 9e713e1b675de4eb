//! Local host metrics. No network access.

use log::debug;
use serde::Serialize;
use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, ProcessesToUpdate, System};
use tokio::time::sleep as TokioSleep;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub host_name: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub kernel_version: Option<String>,
    pub uptime_secs: u64,
    pub cpu_count: usize,
    pub cpu_brand: Option<String>,
    /// Average usage across all CPUs, 0-100.
    pub cpu_usage_percent: f32,
    pub load_average: LoadAverage,
    pub total_memory_bytes: u64,
    pub used_memory_bytes: u64,
    pub available_memory_bytes: u64,
    pub total_swap_bytes: u64,
    pub used_swap_bytes: u64,
    pub process_count: usize,
}

impl SystemSnapshot {
    pub fn memory_usage_percent(&self) -> f64 {
        percent(self.used_memory_bytes, self.total_memory_bytes)
    }

    pub fn swap_usage_percent(&self) -> f64 {
        percent(self.used_swap_bytes, self.total_swap_bytes)
    }
}

pub(crate) fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    ((part as f64 / whole as f64) * 1000.0).round() / 10.0
}

/// Take a snapshot of the local machine.
///
/// CPU usage needs two samples, so this waits
/// [`MINIMUM_CPU_UPDATE_INTERVAL`] between refreshes.
pub async fn probe() -> SystemSnapshot {
    let mut sys = System::new();

    sys.refresh_cpu_usage();
    TokioSleep(MINIMUM_CPU_UPDATE_INTERVAL).await;
    sys.refresh_cpu_usage();
    sys.refresh_memory();
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let load = System::load_average();
    let cpu_brand = sys
        .cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty());

    let snapshot = SystemSnapshot {
        host_name: System::host_name(),
        os_name: System::name(),
        os_version: System::os_version(),
        kernel_version: System::kernel_version(),
        uptime_secs: System::uptime(),
        cpu_count: sys.cpus().len(),
        cpu_brand,
        cpu_usage_percent: sys.global_cpu_usage(),
        load_average: LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        },
        total_memory_bytes: sys.total_memory(),
        used_memory_bytes: sys.used_memory(),
        available_memory_bytes: sys.available_memory(),
        total_swap_bytes: sys.total_swap(),
        used_swap_bytes: sys.used_swap(),
        process_count: sys.processes().len(),
    };

    debug!(
        "System snapshot: {} CPUs, {} processes",
        snapshot.cpu_count, snapshot.process_count
    );

    snapshot
}
