//! I/O page resources and selectors.

use nasdash_api_models::{DiskIo, SystemIo};

use crate::core::backend::{SharedBackend, fetcher, paths};
use crate::core::format::{ChartPoint, as_f64, bytes_to_mb, round2};
use crate::core::poll::{Aggregation, PollGroup, Resource};

/// Shown when the I/O batch fails.
pub const FAILURE_MESSAGE: &str = "获取 IO 数据失败";

/// Resource key for per-disk counters.
pub const DISKS: &str = "disks";
/// Resource key for host-wide counters.
pub const SYSTEM: &str = "system";

/// Handles to everything the I/O page renders.
#[derive(Clone, Debug, PartialEq)]
pub struct IoResources {
    /// One entry per block device.
    pub disks: Resource<Vec<DiskIo>>,
    /// Totals across devices.
    pub system: Resource<SystemIo>,
}

impl IoResources {
    /// Bind the I/O endpoints to `backend`.
    #[must_use]
    pub fn new(backend: &SharedBackend) -> Self {
        Self {
            disks: Resource::new(DISKS, fetcher(backend, paths::IO_DISK)),
            system: Resource::new(SYSTEM, fetcher(backend, paths::IO_SYSTEM)),
        }
    }

    /// All-or-nothing group over both resources.
    #[must_use]
    pub fn group(&self, failure_message: &str) -> PollGroup {
        PollGroup::builder("io")
            .resource(&self.disks)
            .resource(&self.system)
            .aggregation(Aggregation::AllOrNothing)
            .failure_message(failure_message)
            .build()
    }
}

/// Read and write totals per disk in MB, as two parallel series.
#[must_use]
pub fn throughput_series(disks: &[DiskIo]) -> (Vec<ChartPoint>, Vec<ChartPoint>) {
    disks
        .iter()
        .map(|disk| {
            (
                ChartPoint::new(disk.disk_name.clone(), round2(bytes_to_mb(disk.read_bytes))),
                ChartPoint::new(disk.disk_name.clone(), round2(bytes_to_mb(disk.write_bytes))),
            )
        })
        .unzip()
}

/// Mean service time in milliseconds per operation; zero when idle.
#[must_use]
pub fn average_latency_ms(total_time_ms: u64, operations: u64) -> f64 {
    if operations == 0 {
        return 0.0;
    }
    round2(as_f64(total_time_ms) / as_f64(operations))
}
