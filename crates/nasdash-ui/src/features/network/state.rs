//! Network page resources and selectors.

use nasdash_api_models::{NetworkInterface, NetworkTraffic};

use crate::core::backend::{SharedBackend, fetcher, paths};
use crate::core::format::{ChartPoint, as_f64};
use crate::core::poll::{PollGroup, Resource};

/// Shown when any network endpoint fails.
pub const FAILURE_MESSAGE: &str = "获取网络数据失败";

/// Resource key for traffic counters.
pub const TRAFFIC: &str = "traffic";
/// Resource key for the interface list.
pub const INTERFACES: &str = "interfaces";

/// Handles to everything the network page renders.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkResources {
    /// Counters since boot.
    pub traffic: Resource<NetworkTraffic>,
    /// Interfaces with their addresses.
    pub interfaces: Resource<Vec<NetworkInterface>>,
}

impl NetworkResources {
    /// Bind the network endpoints to `backend`.
    #[must_use]
    pub fn new(backend: &SharedBackend) -> Self {
        Self {
            traffic: Resource::new(TRAFFIC, fetcher(backend, paths::NETWORK_TRAFFIC)),
            interfaces: Resource::new(INTERFACES, fetcher(backend, paths::NETWORK_INTERFACES)),
        }
    }

    /// Best-effort group over both resources.
    #[must_use]
    pub fn group(&self, failure_message: &str) -> PollGroup {
        PollGroup::builder("network")
            .resource(&self.traffic)
            .resource(&self.interfaces)
            .failure_message(failure_message)
            .build()
    }
}

/// Packet counters as a chart: sent, received, errors in/out, drops in/out.
#[must_use]
pub fn packet_series(traffic: &NetworkTraffic, labels: [&str; 6]) -> Vec<ChartPoint> {
    let values = [
        traffic.packets_sent,
        traffic.packets_recv,
        traffic.errin,
        traffic.errout,
        traffic.dropin,
        traffic.dropout,
    ];
    labels
        .iter()
        .zip(values)
        .map(|(label, value)| ChartPoint::new(*label, as_f64(value)))
        .collect()
}

/// First IPv4 address of the interface, else the first address of any family.
#[must_use]
pub fn primary_address(interface: &NetworkInterface) -> Option<&str> {
    interface
        .ip_addresses
        .iter()
        .find(|address| address.ip.contains('.'))
        .or_else(|| interface.ip_addresses.first())
        .map(|address| address.ip.as_str())
}

/// Link speed as `"{n} Mbps"`; zero means the driver did not report one.
#[must_use]
pub fn link_speed(interface: &NetworkInterface) -> String {
    if interface.speed == 0 {
        "-".to_string()
    } else {
        format!("{} Mbps", interface.speed)
    }
}

/// Interfaces with up links first, then by name.
#[must_use]
pub fn sorted_interfaces(interfaces: &[NetworkInterface]) -> Vec<NetworkInterface> {
    let mut sorted = interfaces.to_vec();
    sorted.sort_by(|left, right| {
        right
            .is_up
            .cmp(&left.is_up)
            .then_with(|| left.name.cmp(&right.name))
    });
    sorted
}
