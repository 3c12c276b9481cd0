//! System page resources and selectors.

use nasdash_api_models::{CpuUsage, DiskUsage, MemoryUsage};

use crate::core::backend::{SharedBackend, fetcher, paths};
use crate::core::format::ChartPoint;
use crate::core::poll::{PollGroup, Resource};

/// Shown when any system endpoint fails.
pub const FAILURE_MESSAGE: &str = "获取系统数据失败";

/// Resource key for CPU.
pub const CPU: &str = "cpu";
/// Resource key for memory.
pub const MEMORY: &str = "memory";
/// Resource key for disk usage.
pub const DISKS: &str = "disks";

/// Handles to everything the system page renders.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemResources {
    /// CPU utilisation.
    pub cpu: Resource<CpuUsage>,
    /// RAM and swap.
    pub memory: Resource<MemoryUsage>,
    /// One entry per mount.
    pub disks: Resource<Vec<DiskUsage>>,
}

impl SystemResources {
    /// Bind the system endpoints to `backend`.
    #[must_use]
    pub fn new(backend: &SharedBackend) -> Self {
        Self {
            cpu: Resource::new(CPU, fetcher(backend, paths::SYSTEM_CPU)),
            memory: Resource::new(MEMORY, fetcher(backend, paths::SYSTEM_MEMORY)),
            disks: Resource::new(DISKS, fetcher(backend, paths::SYSTEM_DISK)),
        }
    }

    /// Best-effort group over all three resources.
    #[must_use]
    pub fn group(&self, failure_message: &str) -> PollGroup {
        PollGroup::builder("system")
            .resource(&self.cpu)
            .resource(&self.memory)
            .resource(&self.disks)
            .failure_message(failure_message)
            .build()
    }
}

/// Usage percent per mount point.
#[must_use]
pub fn disk_series(disks: &[DiskUsage]) -> Vec<ChartPoint> {
    disks
        .iter()
        .map(|disk| ChartPoint::new(disk.mountpoint.clone(), disk.percent))
        .collect()
}

/// Logical and physical core counts as display text; unknown counts render `-`.
#[must_use]
pub fn core_counts(cpu: &CpuUsage) -> (String, String) {
    let show = |count: Option<u32>| count.map_or_else(|| "-".to_string(), |n| n.to_string());
    (show(cpu.cpu_count.physical), show(cpu.cpu_count.logical))
}
