#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! HTTP DTOs for the NAS monitoring backend.
//!
//! Every payload the dashboard polls or submits lives here so the UI crate and
//! its tests decode the same shapes. Fields mirror the backend JSON one-to-one;
//! derived values (percentages, labels) are computed in the UI layer instead.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by the backend on non-success responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Either a plain message or a list of validation issues.
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

/// Payload of the `detail` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Human-readable message.
    Message(String),
    /// Request validation failures.
    Validation(Vec<ValidationIssue>),
}

/// Single request validation failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Location of the offending value (`["body", "username"]`).
    #[serde(default)]
    pub loc: Vec<Value>,
    /// Validation message.
    pub msg: String,
    #[serde(rename = "type", default)]
    /// Machine-readable error class.
    pub kind: String,
}

impl ErrorBody {
    /// Flatten the detail into one display string.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            ErrorDetail::Message(message) if message.trim().is_empty() => None,
            ErrorDetail::Message(message) => Some(message.clone()),
            ErrorDetail::Validation(issues) if issues.is_empty() => None,
            ErrorDetail::Validation(issues) => Some(
                issues
                    .iter()
                    .map(ValidationIssue::describe)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
        }
    }
}

impl ValidationIssue {
    /// `field: message` using the last location segment.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.loc.last() {
            Some(Value::String(field)) => format!("{field}: {}", self.msg),
            Some(Value::Number(index)) => format!("{index}: {}", self.msg),
            _ => self.msg.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Form fields posted to `/auth/login`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginForm {
    /// Account name.
    pub username: String,
    /// Plain-text password, sent once over the login form.
    pub password: String,
}

/// Token issued by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    /// Bearer token attached to subsequent requests.
    pub access_token: String,
    /// Token scheme (always `bearer`).
    #[serde(default)]
    pub token_type: String,
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// Host identity and uptime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemStatus {
    /// Host name.
    pub hostname: String,
    /// Operating system family.
    pub os: String,
    /// Kernel or OS build string.
    pub os_version: String,
    /// CPU architecture.
    pub architecture: String,
    /// Boot timestamp formatted by the backend.
    pub boot_time: String,
    /// Uptime formatted by the backend.
    pub uptime: String,
}

/// CPU utilisation snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CpuUsage {
    /// Aggregate utilisation percentage.
    pub total_usage: f64,
    /// Per-core utilisation percentages.
    #[serde(default)]
    pub per_core_usage: Vec<f64>,
    /// Core counts.
    pub cpu_count: CpuCount,
}

/// Physical and logical core counts; either may be unknown.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CpuCount {
    /// Physical cores.
    #[serde(default)]
    pub physical: Option<u32>,
    /// Logical cores.
    #[serde(default)]
    pub logical: Option<u32>,
}

/// RAM and swap usage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryUsage {
    /// Physical memory.
    pub memory: MemoryStats,
    /// Swap space.
    pub swap: SwapStats,
}

/// Physical memory counters in bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MemoryStats {
    /// Installed bytes.
    pub total: u64,
    /// Bytes available for new allocations.
    pub available: u64,
    /// Bytes in use.
    pub used: u64,
    /// Used percentage.
    pub percent: f64,
}

/// Swap counters in bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SwapStats {
    /// Configured swap bytes.
    pub total: u64,
    /// Swap bytes in use.
    pub used: u64,
    /// Free swap bytes.
    pub free: u64,
    /// Used percentage.
    pub percent: f64,
}

/// Usage of one mounted filesystem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiskUsage {
    /// Block device path.
    pub device: String,
    /// Mount point.
    pub mountpoint: String,
    /// Filesystem type.
    pub fstype: String,
    /// Capacity in bytes.
    pub total: u64,
    /// Used bytes.
    pub used: u64,
    /// Free bytes.
    pub free: u64,
    /// Used percentage.
    pub percent: f64,
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Cumulative network counters since boot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkTraffic {
    /// Bytes transmitted.
    pub bytes_sent: u64,
    /// Bytes received.
    pub bytes_recv: u64,
    /// Packets transmitted.
    pub packets_sent: u64,
    /// Packets received.
    pub packets_recv: u64,
    /// Inbound errors.
    pub errin: u64,
    /// Outbound errors.
    pub errout: u64,
    /// Inbound drops.
    pub dropin: u64,
    /// Outbound drops.
    pub dropout: u64,
    /// Connected WiFi SSID, when the host has one.
    #[serde(default)]
    pub wifi_name: Option<String>,
}

/// One network interface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkInterface {
    /// Interface name (`eth0`).
    pub name: String,
    /// Hardware address.
    #[serde(default)]
    pub mac_address: Option<String>,
    /// Bound addresses.
    #[serde(default)]
    pub ip_addresses: Vec<IpAddressInfo>,
    /// Link state.
    pub is_up: bool,
    /// Link speed in Mbit/s (0 when unknown).
    #[serde(default)]
    pub speed: u64,
    /// MTU in bytes.
    #[serde(default)]
    pub mtu: u32,
}

/// Address bound to an interface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IpAddressInfo {
    /// Address literal.
    pub ip: String,
    /// Netmask literal.
    #[serde(default)]
    pub netmask: Option<String>,
    /// Broadcast address for IPv4.
    #[serde(default)]
    pub broadcast: Option<String>,
}

// ---------------------------------------------------------------------------
// Disk I/O
// ---------------------------------------------------------------------------

/// Cumulative I/O counters for one disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiskIo {
    /// Disk name (`sda`).
    pub disk_name: String,
    /// Bytes read.
    pub read_bytes: u64,
    /// Bytes written.
    pub write_bytes: u64,
    /// Read operations.
    pub read_count: u64,
    /// Write operations.
    pub write_count: u64,
    /// Milliseconds spent reading.
    pub read_time: u64,
    /// Milliseconds spent writing.
    pub write_time: u64,
}

/// Host-wide I/O counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemIo {
    /// Bytes read.
    pub total_read_bytes: u64,
    /// Bytes written.
    pub total_write_bytes: u64,
    /// Read operations.
    pub total_read_count: u64,
    /// Write operations.
    pub total_write_count: u64,
    /// Milliseconds spent reading.
    pub total_read_time: u64,
    /// Milliseconds spent writing.
    pub total_write_time: u64,
}

// ---------------------------------------------------------------------------
// Docker
// ---------------------------------------------------------------------------

/// Container summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Container {
    /// Full container id.
    pub id: String,
    /// Container name.
    pub name: String,
    /// Engine status (`running`, `exited`).
    pub status: String,
    /// Image tag or id.
    pub image: String,
    /// Creation timestamp as reported by the engine.
    pub created: String,
    /// Raw port bindings.
    #[serde(default)]
    pub ports: Value,
    /// Entrypoint command.
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

impl Container {
    /// Whether the engine reports the container as running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}

/// Resource usage of one container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainerStats {
    /// Container name.
    pub name: String,
    /// Cumulative CPU time in nanoseconds.
    pub cpu_usage: u64,
    /// Resident memory in bytes.
    pub memory_usage: u64,
    /// Memory limit in bytes.
    pub memory_limit: u64,
    /// Raw per-network counters.
    #[serde(default)]
    pub network: Value,
    /// Raw block I/O counters.
    #[serde(default)]
    pub blkio: Value,
}

/// Local image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    /// Image id (`sha256:...`).
    pub id: String,
    /// Repository tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp as reported by the engine.
    pub created: String,
    /// Size in bytes.
    pub size: u64,
    /// Virtual size in bytes; newer engines omit it.
    #[serde(default)]
    pub virtual_size: Option<u64>,
}

/// Body for `POST /docker/images/pull`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImagePullRequest {
    /// Image reference (`nginx:latest`).
    pub image_name: String,
}

// ---------------------------------------------------------------------------
// Alarms
// ---------------------------------------------------------------------------

/// Raised alarm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlarmRecord {
    /// Record id.
    pub id: String,
    /// Alarm family (`system`, `network`, `docker`).
    pub alarm_type: String,
    /// Alarm subtype (`cpu_high`).
    pub sub_type: String,
    /// Severity string.
    pub severity: String,
    /// Summary message.
    pub message: String,
    /// Free-form details.
    #[serde(default)]
    pub details: Value,
    /// When the alarm fired.
    pub timestamp: NaiveDateTime,
    /// Processing status string.
    pub status: String,
    /// When the alarm was handled.
    #[serde(default)]
    pub processed_at: Option<NaiveDateTime>,
    /// Who handled the alarm.
    #[serde(default)]
    pub processed_by: Option<String>,
}

impl AlarmRecord {
    /// Parsed processing status.
    #[must_use]
    pub fn status(&self) -> Option<AlarmStatus> {
        AlarmStatus::parse(&self.status)
    }

    /// Parsed severity.
    #[must_use]
    pub fn severity(&self) -> Option<Severity> {
        Severity::parse(&self.severity)
    }
}

/// Processing status of an alarm record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmStatus {
    /// Not yet handled.
    Unprocessed,
    /// Acknowledged and handled.
    Processed,
    /// Dismissed.
    Ignored,
}

impl AlarmStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unprocessed => "unprocessed",
            Self::Processed => "processed",
            Self::Ignored => "ignored",
        }
    }

    /// Parse the wire representation, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "unprocessed" => Some(Self::Unprocessed),
            "processed" => Some(Self::Processed),
            "ignored" => Some(Self::Ignored),
            _ => None,
        }
    }
}

/// Alarm severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Info,
    /// Needs attention.
    Warning,
    /// Needs immediate action.
    Critical,
}

impl Severity {
    /// Parse the wire representation, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Body for `PUT /alarm/records/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlarmStatusUpdate {
    /// New status.
    pub status: AlarmStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Operator name.
    pub processed_by: Option<String>,
}

/// Alarm rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlarmConfig {
    /// Rule id.
    pub id: String,
    /// Alarm family.
    pub alarm_type: String,
    /// Alarm subtype.
    pub sub_type: String,
    /// Whether the rule is active.
    pub enabled: bool,
    /// Trigger threshold.
    pub threshold: f64,
    /// Seconds the threshold must be exceeded.
    pub duration: u32,
    /// Severity string.
    pub severity: String,
    /// Notification channels.
    #[serde(default)]
    pub push_methods: Vec<String>,
    /// Creation time.
    pub created_at: NaiveDateTime,
    /// Last modification time.
    pub updated_at: NaiveDateTime,
}

/// Body for `PUT /alarm/configs/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlarmConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Toggle the rule.
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New threshold.
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New duration in seconds.
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New severity.
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New notification channels.
    pub push_methods: Option<Vec<String>>,
}

/// Client address seen by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessIp {
    /// Record id.
    pub id: String,
    /// Address literal.
    pub ip_address: String,
    /// Geolocated country.
    #[serde(default)]
    pub country: String,
    /// Geolocated region.
    #[serde(default)]
    pub region: String,
    /// Geolocated city.
    #[serde(default)]
    pub city: String,
    /// Whether the address is blocked.
    pub is_blacklisted: bool,
    /// First request time.
    pub first_seen: NaiveDateTime,
    /// Most recent request time.
    pub last_seen: NaiveDateTime,
    /// Requests served.
    pub total_requests: u64,
}

/// Body for `PUT /alarm/access-ips/{ip}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IpStatusUpdate {
    /// Block or unblock.
    pub is_blacklisted: bool,
}

/// Aggregate alarm counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlarmStatistics {
    /// All records.
    pub total: u64,
    /// Counts keyed by severity.
    #[serde(default)]
    pub by_severity: BTreeMap<String, u64>,
    /// Counts keyed by alarm family.
    #[serde(default)]
    pub by_type: BTreeMap<String, u64>,
    /// Records raised in the last 24 hours.
    #[serde(default)]
    pub recent: u64,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Account as listed by `/user/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Account id.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Whether login is blocked.
    #[serde(default)]
    pub disabled: bool,
    /// Creation time.
    pub created_at: NaiveDateTime,
    /// Last modification time.
    pub updated_at: NaiveDateTime,
}

/// Body for `POST /user/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCreate {
    /// Login name.
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Create the account blocked.
    pub disabled: bool,
}

/// Body for `PUT /user/{username}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserUpdate {
    /// Login name.
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Replacement password; unchanged when absent.
    pub password: Option<String>,
    /// Blocked flag.
    pub disabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_body_reads_plain_detail() {
        let body: ErrorBody =
            serde_json::from_value(json!({"detail": "镜像不存在"})).expect("decode");
        assert_eq!(body.message().as_deref(), Some("镜像不存在"));
    }

    #[test]
    fn error_body_flattens_validation_detail() {
        let body: ErrorBody = serde_json::from_value(json!({
            "detail": [
                {"loc": ["body", "username"], "msg": "field required", "type": "value_error.missing"},
                {"loc": ["body", "password"], "msg": "field required", "type": "value_error.missing"}
            ]
        }))
        .expect("decode");
        assert_eq!(
            body.message().as_deref(),
            Some("username: field required; password: field required")
        );
    }

    #[test]
    fn error_body_without_detail_has_no_message() {
        let body: ErrorBody = serde_json::from_value(json!({})).expect("decode");
        assert!(body.message().is_none());
        let blank: ErrorBody = serde_json::from_value(json!({"detail": "  "})).expect("decode");
        assert!(blank.message().is_none());
    }

    #[test]
    fn cpu_usage_tolerates_unknown_core_counts() {
        let cpu: CpuUsage = serde_json::from_value(json!({
            "total_usage": 42.0,
            "per_core_usage": [40.5, 43.5],
            "cpu_count": {"physical": null, "logical": 8}
        }))
        .expect("decode");
        assert_eq!(cpu.cpu_count.physical, None);
        assert_eq!(cpu.cpu_count.logical, Some(8));
        assert_eq!(cpu.per_core_usage.len(), 2);
    }

    #[test]
    fn network_interface_defaults_optional_fields() {
        let iface: NetworkInterface = serde_json::from_value(json!({
            "name": "eth0",
            "is_up": true,
            "ip_addresses": [{"ip": "192.168.1.10", "netmask": "255.255.255.0"}]
        }))
        .expect("decode");
        assert_eq!(iface.mac_address, None);
        assert_eq!(iface.speed, 0);
        assert_eq!(iface.ip_addresses[0].broadcast, None);
    }

    #[test]
    fn traffic_wifi_name_is_optional() {
        let traffic: NetworkTraffic = serde_json::from_value(json!({
            "bytes_sent": 1, "bytes_recv": 2, "packets_sent": 3, "packets_recv": 4,
            "errin": 0, "errout": 0, "dropin": 0, "dropout": 0
        }))
        .expect("decode");
        assert!(traffic.wifi_name.is_none());
    }

    #[test]
    fn container_command_may_be_null() {
        let container: Container = serde_json::from_value(json!({
            "id": "abc", "name": "web", "status": "running", "image": "nginx:latest",
            "created": "2024-03-01T10:00:00.123456789Z", "ports": {}, "command": null
        }))
        .expect("decode");
        assert!(container.is_running());
        assert!(container.command.is_none());
    }

    #[test]
    fn alarm_record_parses_naive_timestamps() {
        let record: AlarmRecord = serde_json::from_value(json!({
            "id": "1", "alarm_type": "system", "sub_type": "cpu_high",
            "severity": "Critical", "message": "CPU high", "details": {"value": 97},
            "timestamp": "2024-03-01T10:00:00.5", "status": "unprocessed"
        }))
        .expect("decode");
        assert_eq!(record.status(), Some(AlarmStatus::Unprocessed));
        assert_eq!(record.severity(), Some(Severity::Critical));
        assert!(record.processed_at.is_none());
    }

    #[test]
    fn status_update_omits_missing_operator() {
        let body = serde_json::to_value(AlarmStatusUpdate {
            status: AlarmStatus::Ignored,
            processed_by: None,
        })
        .expect("encode");
        assert_eq!(body, json!({"status": "ignored"}));
    }

    #[test]
    fn config_update_serialises_only_set_fields() {
        let body = serde_json::to_value(AlarmConfigUpdate {
            enabled: Some(false),
            ..AlarmConfigUpdate::default()
        })
        .expect("encode");
        assert_eq!(body, json!({"enabled": false}));
    }

    #[test]
    fn user_update_skips_empty_password() {
        let body = serde_json::to_value(UserUpdate {
            username: "ops".to_string(),
            password: None,
            disabled: true,
        })
        .expect("encode");
        assert_eq!(body, json!({"username": "ops", "disabled": true}));
    }
}
