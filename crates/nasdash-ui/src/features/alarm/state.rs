//! Alarm tabs, resources, mutations, and severity presentation.

use nasdash_api_models::{
    AccessIp, AlarmConfig, AlarmConfigUpdate, AlarmRecord, AlarmStatistics, AlarmStatus,
    AlarmStatusUpdate, IpStatusUpdate, Severity,
};

use crate::core::backend::{Method, SharedBackend, fetcher, paths, send};
use crate::core::http::encode_segment;
use crate::core::poll::{FetchFuture, PollGroup, Resource, ViewStore};

/// Shown when an alarm endpoint fails.
pub const FAILURE_MESSAGE: &str = "获取告警数据失败";

/// Resource key for alarm records.
pub const RECORDS: &str = "records";
/// Resource key for alarm rules.
pub const CONFIGS: &str = "configs";
/// Resource key for access IPs.
pub const ACCESS_IPS: &str = "access_ips";
/// Resource key for the summary counters.
pub const STATISTICS: &str = "statistics";

/// Tabs of the alarm page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlarmTab {
    /// Raised alarms.
    #[default]
    Records,
    /// Alarm rules.
    Configs,
    /// Client addresses.
    AccessIps,
}

impl AlarmTab {
    /// Tabs in display order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Records, Self::Configs, Self::AccessIps]
    }

    /// Translation key of the tab title.
    #[must_use]
    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Records => "alarm.tabs.records",
            Self::Configs => "alarm.tabs.configs",
            Self::AccessIps => "alarm.tabs.access_ips",
        }
    }

    /// Title used when the bundle has no entry.
    #[must_use]
    pub const fn default_label(self) -> &'static str {
        match self {
            Self::Records => "告警记录",
            Self::Configs => "告警配置",
            Self::AccessIps => "访问IP管理",
        }
    }

    /// Resource polled while the tab is active.
    #[must_use]
    pub const fn resource_key(self) -> &'static str {
        match self {
            Self::Records => RECORDS,
            Self::Configs => CONFIGS,
            Self::AccessIps => ACCESS_IPS,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Records => 0,
            Self::Configs => 1,
            Self::AccessIps => 2,
        }
    }
}

/// Colour family used for a severity badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// Red.
    Error,
    /// Yellow.
    Warn,
    /// Blue.
    Info,
    /// Gray.
    Subtle,
}

impl Tone {
    /// CSS modifier class.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Error => "tone-error",
            Self::Warn => "tone-warn",
            Self::Info => "tone-info",
            Self::Subtle => "tone-subtle",
        }
    }
}

/// Badge tone for a raw severity string; unknown severities are subtle.
#[must_use]
pub fn severity_tone(raw: &str) -> Tone {
    match Severity::parse(raw) {
        Some(Severity::Critical) => Tone::Error,
        Some(Severity::Warning) => Tone::Warn,
        Some(Severity::Info) => Tone::Info,
        None => Tone::Subtle,
    }
}

/// Handles to every alarm list plus one view state per tab.
#[derive(Clone, Debug, PartialEq)]
pub struct AlarmResources {
    /// Raised alarms.
    pub records: Resource<Vec<AlarmRecord>>,
    /// Alarm rules.
    pub configs: Resource<Vec<AlarmConfig>>,
    /// Observed addresses.
    pub access_ips: Resource<Vec<AccessIp>>,
    /// Summary counters.
    pub statistics: Resource<AlarmStatistics>,
    views: [ViewStore; 3],
}

impl AlarmResources {
    /// Bind the alarm endpoints to `backend`.
    #[must_use]
    pub fn new(backend: &SharedBackend) -> Self {
        Self {
            records: Resource::new(RECORDS, fetcher(backend, paths::ALARM_RECORDS)),
            configs: Resource::new(CONFIGS, fetcher(backend, paths::ALARM_CONFIGS)),
            access_ips: Resource::new(ACCESS_IPS, fetcher(backend, paths::ALARM_ACCESS_IPS)),
            statistics: Resource::new(STATISTICS, fetcher(backend, paths::ALARM_STATISTICS)),
            views: [ViewStore::new(), ViewStore::new(), ViewStore::new()],
        }
    }

    /// View state of `tab`.
    #[must_use]
    pub fn view(&self, tab: AlarmTab) -> ViewStore {
        self.views[tab.index()].clone()
    }

    /// Best-effort group for the active tab and the statistics summary.
    #[must_use]
    pub fn group(&self, tab: AlarmTab, failure_message: &str) -> PollGroup {
        let builder = PollGroup::builder(format!("alarm.{}", tab.resource_key()));
        let builder = match tab {
            AlarmTab::Records => builder.resource(&self.records),
            AlarmTab::Configs => builder.resource(&self.configs),
            AlarmTab::AccessIps => builder.resource(&self.access_ips),
        };
        builder
            .resource(&self.statistics)
            .failure_message(failure_message)
            .store(self.view(tab))
            .build()
    }
}

/// Records newest first.
#[must_use]
pub fn sorted_records(records: &[AlarmRecord]) -> Vec<AlarmRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
    sorted
}

/// Records still waiting for an operator.
#[must_use]
pub fn unprocessed_count(records: &[AlarmRecord]) -> usize {
    records
        .iter()
        .filter(|record| record.status() == Some(AlarmStatus::Unprocessed))
        .count()
}

/// Mark a record processed or ignored.
pub fn update_record_status(
    backend: &SharedBackend,
    record_id: &str,
    status: AlarmStatus,
    processed_by: Option<String>,
) -> FetchFuture<AlarmRecord> {
    let path = format!("{}/{}", paths::ALARM_RECORDS, encode_segment(record_id));
    send(
        backend,
        Method::Put,
        &path,
        &AlarmStatusUpdate {
            status,
            processed_by,
        },
    )
}

/// Enable or disable an alarm rule.
pub fn set_config_enabled(
    backend: &SharedBackend,
    config_id: &str,
    enabled: bool,
) -> FetchFuture<AlarmConfig> {
    let path = format!("{}/{}", paths::ALARM_CONFIGS, encode_segment(config_id));
    let update = AlarmConfigUpdate {
        enabled: Some(enabled),
        ..AlarmConfigUpdate::default()
    };
    send(backend, Method::Put, &path, &update)
}

/// Block or unblock a client address.
pub fn set_blacklisted(
    backend: &SharedBackend,
    ip_address: &str,
    is_blacklisted: bool,
) -> FetchFuture<AccessIp> {
    let path = format!("{}/{}", paths::ALARM_ACCESS_IPS, encode_segment(ip_address));
    send(backend, Method::Put, &path, &IpStatusUpdate { is_blacklisted })
}

/// Resources to refetch after a mutation on `tab`.
#[must_use]
pub const fn affected_by(tab: AlarmTab) -> &'static [&'static str] {
    match tab {
        AlarmTab::Records => &[RECORDS, STATISTICS],
        AlarmTab::Configs => &[CONFIGS],
        AlarmTab::AccessIps => &[ACCESS_IPS],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::testing::ScriptedBackend;
    use crate::core::poll::ManualScheduler;
    use serde_json::{Value, json};
    use std::rc::Rc;

    fn record(id: &str, timestamp: &str, status: &str) -> Value {
        json!({
            "id": id, "alarm_type": "system", "sub_type": "cpu_high", "severity": "warning",
            "message": "CPU above threshold", "details": {}, "timestamp": timestamp,
            "status": status, "processed_at": null, "processed_by": null
        })
    }

    #[test]
    fn severity_maps_to_tones() {
        assert_eq!(severity_tone("critical"), Tone::Error);
        assert_eq!(severity_tone("warning"), Tone::Warn);
        assert_eq!(severity_tone("INFO"), Tone::Info);
        assert_eq!(severity_tone("debug"), Tone::Subtle);
        assert_eq!(Tone::Error.class(), "tone-error");
    }

    #[test]
    fn records_sort_newest_first_and_count_open() {
        let records: Vec<AlarmRecord> = serde_json::from_value(json!([
            record("a", "2024-05-01T08:00:00", "processed"),
            record("b", "2024-05-02T08:00:00", "unprocessed"),
        ]))
        .expect("records");
        let sorted = sorted_records(&records);
        assert_eq!(sorted[0].id, "b");
        assert_eq!(unprocessed_count(&records), 1);
    }

    #[test]
    fn group_polls_active_tab_and_statistics() {
        let backend = ScriptedBackend::new();
        let resources = AlarmResources::new(&backend.shared());
        let group = resources.group(AlarmTab::Configs, FAILURE_MESSAGE);
        assert_eq!(group.keys(), vec![CONFIGS, STATISTICS]);
        assert_eq!(group.view(), resources.view(AlarmTab::Configs));
        assert_ne!(group.view(), resources.view(AlarmTab::Records));
    }

    #[test]
    fn tab_state_survives_switching() {
        let backend = ScriptedBackend::new();
        backend.ok(paths::ALARM_RECORDS, json!([record("a", "2024-05-01T08:00:00", "unprocessed")]));
        backend.ok(paths::ALARM_STATISTICS, json!({"total": 1}));
        backend.ok(paths::ALARM_CONFIGS, json!([]));
        let resources = AlarmResources::new(&backend.shared());
        let scheduler = ManualScheduler::new();

        let records = resources
            .group(AlarmTab::Records, FAILURE_MESSAGE)
            .start(Rc::new(scheduler.clone()));
        scheduler.run_until_stalled();
        drop(records);

        let configs = resources
            .group(AlarmTab::Configs, FAILURE_MESSAGE)
            .start(Rc::new(scheduler.clone()));
        scheduler.run_until_stalled();
        drop(configs);

        assert!(!resources.view(AlarmTab::Records).loading());
        assert!(!resources.view(AlarmTab::Configs).loading());
        assert!(resources.view(AlarmTab::AccessIps).loading());
        assert_eq!(resources.records.current().map(|list| list.len()), Some(1));
    }

    #[tokio::test]
    async fn mutations_target_item_paths() {
        let backend = ScriptedBackend::new();
        let shared = backend.shared();
        let _ = update_record_status(&shared, "r-1", AlarmStatus::Ignored, None).await;
        let _ = set_config_enabled(&shared, "c-1", false).await;
        let _ = set_blacklisted(&shared, "10.0.0.7", true).await;
        let calls = backend.calls();
        assert_eq!(calls[0].path, "/alarm/records/r-1");
        assert_eq!(calls[0].body, Some(json!({"status": "ignored"})));
        assert_eq!(calls[1].body, Some(json!({"enabled": false})));
        assert_eq!(calls[2].path, "/alarm/access-ips/10.0.0.7");
        assert!(calls.iter().all(|call| call.method == Method::Put));
    }

    #[test]
    fn record_mutations_refresh_statistics() {
        assert_eq!(affected_by(AlarmTab::Records), &[RECORDS, STATISTICS]);
        assert_eq!(affected_by(AlarmTab::AccessIps), &[ACCESS_IPS]);
    }
}
