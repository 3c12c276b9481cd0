//! Dashboard resources and chart selectors.

use nasdash_api_models::{CpuUsage, MemoryUsage, NetworkTraffic, SystemStatus};

use crate::core::backend::{SharedBackend, fetcher, paths};
use crate::core::format::{ChartPoint, bytes_to_mb, round2};
use crate::core::poll::{PollGroup, Resource};

/// Shown when any dashboard endpoint fails.
pub const FAILURE_MESSAGE: &str = "获取数据失败，请检查后端服务是否正常运行";

/// Resource key for host identity.
pub const STATUS: &str = "status";
/// Resource key for CPU.
pub const CPU: &str = "cpu";
/// Resource key for memory.
pub const MEMORY: &str = "memory";
/// Resource key for traffic counters.
pub const TRAFFIC: &str = "traffic";

/// Handles to everything the dashboard renders.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardResources {
    /// Host identity.
    pub status: Resource<SystemStatus>,
    /// CPU utilisation.
    pub cpu: Resource<CpuUsage>,
    /// RAM and swap.
    pub memory: Resource<MemoryUsage>,
    /// Network counters.
    pub traffic: Resource<NetworkTraffic>,
}

impl DashboardResources {
    /// Bind the dashboard endpoints to `backend`.
    #[must_use]
    pub fn new(backend: &SharedBackend) -> Self {
        Self {
            status: Resource::new(STATUS, fetcher(backend, paths::SYSTEM_STATUS)),
            cpu: Resource::new(CPU, fetcher(backend, paths::SYSTEM_CPU)),
            memory: Resource::new(MEMORY, fetcher(backend, paths::SYSTEM_MEMORY)),
            traffic: Resource::new(TRAFFIC, fetcher(backend, paths::NETWORK_TRAFFIC)),
        }
    }

    /// Best-effort group over all four resources.
    #[must_use]
    pub fn group(&self, failure_message: &str) -> PollGroup {
        PollGroup::builder("dashboard")
            .resource(&self.status)
            .resource(&self.cpu)
            .resource(&self.memory)
            .resource(&self.traffic)
            .failure_message(failure_message)
            .build()
    }
}

/// One bar per logical core, labelled `"{prefix} {n}"` from 1.
#[must_use]
pub fn core_series(cpu: &CpuUsage, prefix: &str) -> Vec<ChartPoint> {
    cpu.per_core_usage
        .iter()
        .enumerate()
        .map(|(index, usage)| ChartPoint::new(format!("{prefix} {}", index + 1), *usage))
        .collect()
}

/// Sent and received totals in MB.
#[must_use]
pub fn traffic_series(traffic: &NetworkTraffic, sent: &str, received: &str) -> Vec<ChartPoint> {
    vec![
        ChartPoint::new(sent, round2(bytes_to_mb(traffic.bytes_sent))),
        ChartPoint::new(received, round2(bytes_to_mb(traffic.bytes_recv))),
    ]
}

/// Used versus available memory in MB.
#[must_use]
pub fn memory_series(memory: &MemoryUsage, used: &str, available: &str) -> Vec<ChartPoint> {
    vec![
        ChartPoint::new(used, round2(bytes_to_mb(memory.memory.used))),
        ChartPoint::new(available, round2(bytes_to_mb(memory.memory.available))),
    ]
}
