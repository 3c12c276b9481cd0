use futures_util::future;
use nasdash_ui::core::backend::{Backend, Method, SharedBackend};
use nasdash_ui::core::error::ApiError;
use nasdash_ui::core::poll::{
    ChangeDetector, FetchFuture, ManualScheduler, PollGroup, Resource, StructuralEq,
};
use nasdash_ui::features::dashboard::state::{DashboardResources, FAILURE_MESSAGE};
use nasdash_ui::features::io::state::IoResources;
use nasdash_ui::features::network::state::NetworkResources;
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::oneshot;

const PERIOD: Duration = Duration::from_millis(5_000);

/// Backend answering each path from a queue; the last answer repeats.
#[derive(Default)]
struct QueuedBackend {
    answers: RefCell<HashMap<String, VecDeque<Result<Value, ApiError>>>>,
    hits: RefCell<HashMap<String, usize>>,
}

impl QueuedBackend {
    fn push(&self, path: &str, answer: Result<Value, ApiError>) {
        self.answers
            .borrow_mut()
            .entry(path.to_string())
            .or_default()
            .push_back(answer);
    }

    fn hits(&self, path: &str) -> usize {
        self.hits.borrow().get(path).copied().unwrap_or(0)
    }
}

impl Backend for QueuedBackend {
    fn request(&self, _method: Method, path: &str, _body: Option<Value>) -> FetchFuture<Value> {
        *self.hits.borrow_mut().entry(path.to_string()).or_default() += 1;
        let mut answers = self.answers.borrow_mut();
        let queue = answers.entry(path.to_string()).or_default();
        let answer = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        let answer = answer.unwrap_or(Err(ApiError::Application {
            status: 404,
            detail: Some(format!("no answer for {path}")),
        }));
        Box::pin(future::ready(answer))
    }

    fn post_form(&self, path: &str, _fields: &[(&str, &str)]) -> FetchFuture<Value> {
        self.request(Method::Post, path, None)
    }
}

fn shared(backend: &Rc<QueuedBackend>) -> SharedBackend {
    Rc::clone(backend) as SharedBackend
}

/// Resource whose every fetch waits on a oneshot handed out through `pending`.
fn deferred(
    key: &'static str,
) -> (
    Resource<Value>,
    Rc<RefCell<VecDeque<oneshot::Sender<Result<Value, ApiError>>>>>,
) {
    let pending = Rc::new(RefCell::new(VecDeque::new()));
    let senders = Rc::clone(&pending);
    let resource = Resource::new(key, move || {
        let (tx, rx) = oneshot::channel();
        senders.borrow_mut().push_back(tx);
        let fetch: FetchFuture<Value> = Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(ApiError::transport("request dropped")))
        });
        fetch
    });
    (resource, pending)
}

fn cpu_payload() -> Value {
    json!({
        "total_usage": 42.0,
        "per_core_usage": [40.0, 44.0],
        "cpu_count": {"physical": 4, "logical": 8}
    })
}

fn memory_payload(percent: f64) -> Value {
    json!({
        "memory": {"total": 8_000_000_000_u64, "available": 3_600_000_000_u64, "used": 4_400_000_000_u64, "percent": percent},
        "swap": {"total": 0, "used": 0, "free": 0, "percent": 0.0}
    })
}

fn traffic_payload(sent: u64) -> Value {
    json!({
        "bytes_sent": sent, "bytes_recv": 2048,
        "packets_sent": 10, "packets_recv": 20,
        "errin": 0, "errout": 0, "dropin": 0, "dropout": 0
    })
}

#[test]
fn identical_payload_keeps_reference_and_skips_render() {
    let backend = Rc::new(QueuedBackend::default());
    backend.push("/system/cpu", Ok(cpu_payload()));
    let resource: Resource<Value> = Resource::new("cpu", {
        let backend = shared(&backend);
        move || backend.request(Method::Get, "/system/cpu", None)
    });
    let group = PollGroup::builder("cpu").resource(&resource).build();
    let view = group.view();
    let renders = Rc::new(Cell::new(0_u32));
    let _subscription = view.subscribe({
        let renders = Rc::clone(&renders);
        move || renders.set(renders.get() + 1)
    });

    let scheduler = ManualScheduler::new();
    let _session = group.start(Rc::new(scheduler.clone()));
    scheduler.run_until_stalled();
    let first = resource.current().expect("first payload");
    let renders_after_first = renders.get();

    scheduler.advance(PERIOD);
    scheduler.run_until_stalled();

    assert_eq!(backend.hits("/system/cpu"), 2);
    let second = resource.current().expect("payload kept");
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(resource.version(), 1);
    assert_eq!(renders.get(), renders_after_first);
}

#[test]
fn identical_cpu_instance_is_not_a_change() {
    let stored: Value = cpu_payload();
    let fresh: Value = serde_json::from_str(&cpu_payload().to_string()).expect("valid json");
    assert!(!StructuralEq.has_changed(Some(&stored), Some(&fresh)));
}

#[test]
fn changed_leaf_replaces_value_exactly() {
    let backend = Rc::new(QueuedBackend::default());
    backend.push("/system/memory", Ok(json!({"memory": {"percent": 55}})));
    backend.push("/system/memory", Ok(json!({"memory": {"percent": 56}})));
    let resource: Resource<Value> = Resource::new("memory", {
        let backend = shared(&backend);
        move || backend.request(Method::Get, "/system/memory", None)
    });
    let group = PollGroup::builder("memory").resource(&resource).build();
    let scheduler = ManualScheduler::new();
    let _session = group.start(Rc::new(scheduler.clone()));
    scheduler.run_until_stalled();
    let before = resource.current().expect("first payload");
    assert!(StructuralEq.has_changed(Some(&*before), Some(&json!({"memory": {"percent": 56}}))));

    scheduler.advance(PERIOD);
    scheduler.run_until_stalled();

    let after = resource.current().expect("second payload");
    assert!(!Rc::ptr_eq(&before, &after));
    assert_eq!(*after, json!({"memory": {"percent": 56}}));
    assert_eq!(resource.version(), 2);
}

#[test]
fn loading_clears_once_and_failures_keep_last_values() {
    let backend = Rc::new(QueuedBackend::default());
    backend.push("/system/status", Ok(json!({
        "hostname": "nas", "os": "Linux", "os_version": "6.1",
        "architecture": "x86_64", "boot_time": "2024-01-01 00:00:00", "uptime": "1 day"
    })));
    backend.push("/system/cpu", Ok(cpu_payload()));
    backend.push("/system/memory", Ok(memory_payload(55.0)));
    backend.push("/network/traffic", Ok(traffic_payload(1024)));
    for path in ["/system/status", "/system/cpu", "/system/memory", "/network/traffic"] {
        backend.push(path, Err(ApiError::transport("connection refused")));
    }

    let resources = DashboardResources::new(&shared(&backend));
    let group = resources.group(FAILURE_MESSAGE);
    let view = group.view();
    assert!(view.loading());

    let scheduler = ManualScheduler::new();
    let _session = group.start(Rc::new(scheduler.clone()));
    scheduler.run_until_stalled();
    assert!(!view.loading());
    assert!(view.error().is_none());
    let memory = resources.memory.current().expect("memory loaded");

    for _ in 0..3 {
        scheduler.advance(PERIOD);
        scheduler.run_until_stalled();
        assert!(!view.loading());
    }

    let error = view.error().expect("error after failed tick");
    assert_eq!(error.message, FAILURE_MESSAGE);
    assert_eq!(error.sources, vec!["cpu", "memory", "status", "traffic"]);
    let kept = resources.memory.current().expect("memory still shown");
    assert!(Rc::ptr_eq(&memory, &kept));
    assert_eq!(kept.memory.percent, 55.0);
}

#[test]
fn failing_sibling_does_not_block_or_clear_the_other() {
    let backend = Rc::new(QueuedBackend::default());
    backend.push("/network/traffic", Ok(traffic_payload(1024)));
    backend.push("/network/traffic", Err(ApiError::transport("connection reset")));
    backend.push("/network/interfaces", Ok(json!([])));
    backend.push(
        "/network/interfaces",
        Ok(json!([{"name": "eth0", "mac_address": "aa:bb:cc:dd:ee:ff", "ip_addresses": [], "is_up": true, "speed": 1000, "mtu": 1500}])),
    );

    let resources = NetworkResources::new(&shared(&backend));
    let group = resources.group("获取网络数据失败");
    let view = group.view();
    let scheduler = ManualScheduler::new();
    let _session = group.start(Rc::new(scheduler.clone()));
    scheduler.run_until_stalled();
    let traffic = resources.traffic.current().expect("traffic loaded");
    assert!(resources.interfaces.current().is_some_and(|list| list.is_empty()));

    scheduler.advance(PERIOD);
    scheduler.run_until_stalled();

    let interfaces = resources.interfaces.current().expect("interfaces updated");
    assert_eq!(interfaces.len(), 1);
    assert_eq!(interfaces[0].name, "eth0");
    assert!(interfaces[0].is_up);
    let kept = resources.traffic.current().expect("traffic kept");
    assert!(Rc::ptr_eq(&traffic, &kept));
    let error = view.error().expect("traffic failure reported");
    assert_eq!(error.sources, vec!["traffic"]);
}

#[test]
fn stop_discards_in_flight_results_and_silences_timer() {
    let (resource, pending) = deferred("status");
    let group = PollGroup::builder("status").resource(&resource).build();
    let view = group.view();
    let scheduler = ManualScheduler::new();
    let session = group.start(Rc::new(scheduler.clone()));
    scheduler.run_until_stalled();
    assert_eq!(pending.borrow().len(), 1);

    session.stop();
    let sender = pending.borrow_mut().pop_front().expect("fetch started");
    assert!(sender.send(Ok(json!({"hostname": "nas"}))).is_ok());
    scheduler.run_until_stalled();

    assert!(resource.current().is_none());
    assert!(view.loading());
    assert_eq!(view.notifications(), 0);

    scheduler.advance(PERIOD * 4);
    scheduler.run_until_stalled();
    assert_eq!(session.ticks_fired(), 1);
    assert!(pending.borrow().is_empty());
    assert_eq!(scheduler.active_timers(), 0);
}

#[test]
fn dropping_the_session_tears_it_down() {
    let (resource, pending) = deferred("cpu");
    let group = PollGroup::builder("cpu").resource(&resource).build();
    let scheduler = ManualScheduler::new();
    let session = group.start(Rc::new(scheduler.clone()));
    scheduler.run_until_stalled();
    drop(session);

    let sender = pending.borrow_mut().pop_front().expect("fetch started");
    assert!(sender.send(Ok(cpu_payload())).is_ok());
    scheduler.run_until_stalled();
    scheduler.advance(PERIOD);
    scheduler.run_until_stalled();

    assert!(resource.current().is_none());
    assert!(pending.borrow().is_empty());
}

#[test]
fn slow_tick_is_skipped_not_stacked() {
    let (resource, pending) = deferred("traffic");
    let group = PollGroup::builder("traffic").resource(&resource).build();
    let scheduler = ManualScheduler::new();
    let session = group.start(Rc::new(scheduler.clone()));
    scheduler.run_until_stalled();

    scheduler.advance(PERIOD);
    scheduler.run_until_stalled();
    assert_eq!(pending.borrow().len(), 1);
    assert_eq!(session.in_flight(), 1);

    let sender = pending.borrow_mut().pop_front().expect("fetch started");
    assert!(sender.send(Ok(traffic_payload(1))).is_ok());
    scheduler.run_until_stalled();
    assert_eq!(session.in_flight(), 0);

    scheduler.advance(PERIOD);
    scheduler.run_until_stalled();
    assert_eq!(pending.borrow().len(), 1);
}

#[test]
fn older_response_never_overwrites_newer_one() {
    let (resource, pending) = deferred("memory");
    let group = PollGroup::builder("memory").resource(&resource).build();
    let scheduler = ManualScheduler::new();
    let session = group.start(Rc::new(scheduler.clone()));
    scheduler.run_until_stalled();
    session.refetch();
    scheduler.run_until_stalled();
    assert_eq!(pending.borrow().len(), 2);

    let older = pending.borrow_mut().pop_front().expect("first fetch");
    let newer = pending.borrow_mut().pop_front().expect("second fetch");
    assert!(newer.send(Ok(memory_payload(60.0))).is_ok());
    scheduler.run_until_stalled();
    assert!(older.send(Ok(memory_payload(50.0))).is_ok());
    scheduler.run_until_stalled();

    let current = resource.current().expect("newer payload applied");
    assert_eq!(current["memory"]["percent"], json!(60.0));
    assert_eq!(resource.version(), 1);
}

#[test]
fn all_or_nothing_keeps_every_value_on_one_failure() {
    let backend = Rc::new(QueuedBackend::default());
    backend.push("/io/disk", Ok(json!([])));
    backend.push("/io/disk", Ok(json!([{"disk_name": "sda", "read_bytes": 1, "write_bytes": 2, "read_count": 3, "write_count": 4, "read_time": 5, "write_time": 6}])));
    backend.push("/io/system", Ok(json!({"total_read_bytes": 1, "total_write_bytes": 2, "total_read_count": 3, "total_write_count": 4, "total_read_time": 5, "total_write_time": 6})));
    backend.push("/io/system", Err(ApiError::transport("timeout")));

    let resources = IoResources::new(&shared(&backend));
    let group = resources.group("获取 IO 数据失败");
    let view = group.view();
    let scheduler = ManualScheduler::new();
    let _session = group.start(Rc::new(scheduler.clone()));
    scheduler.run_until_stalled();
    let disks = resources.disks.current().expect("disks loaded");

    scheduler.advance(PERIOD);
    scheduler.run_until_stalled();

    assert!(Rc::ptr_eq(&disks, &resources.disks.current().expect("disks kept")));
    assert!(disks.is_empty());
    assert_eq!(view.error().expect("tick failed").sources, vec!["system"]);
}

#[test]
fn credential_failures_stay_out_of_the_banner() {
    let backend = Rc::new(QueuedBackend::default());
    backend.push("/system/cpu", Ok(cpu_payload()));
    backend.push("/system/cpu", Err(ApiError::Unauthorized));
    let resource: Resource<Value> = Resource::new("cpu", {
        let backend = shared(&backend);
        move || backend.request(Method::Get, "/system/cpu", None)
    });
    let group = PollGroup::builder("cpu").resource(&resource).build();
    let view = group.view();
    let scheduler = ManualScheduler::new();
    let _session = group.start(Rc::new(scheduler.clone()));
    scheduler.run_until_stalled();
    scheduler.advance(PERIOD);
    scheduler.run_until_stalled();

    assert!(view.error().is_none());
    assert!(resource.current().is_some());
}

#[test]
fn manual_refetch_does_not_swallow_a_slower_scheduled_failure() {
    let (containers, pending) = deferred("containers");
    let images: Resource<Value> = Resource::new("images", || {
        Box::pin(future::ready(Ok(json!([{"id": "sha256:1", "tags": ["nginx:latest"]}]))))
    });
    let group = PollGroup::builder("docker")
        .resource(&containers)
        .resource(&images)
        .failure_message("获取Docker数据失败")
        .build();
    let view = group.view();
    let scheduler = ManualScheduler::new();
    let session = group.start(Rc::new(scheduler.clone()));
    scheduler.run_until_stalled();
    assert_eq!(pending.borrow().len(), 1);

    assert!(session.refetch_only(&["images"]).is_some());
    scheduler.run_until_stalled();
    assert!(!view.loading());
    assert!(view.error().is_none());

    let slow = pending.borrow_mut().pop_front().expect("scheduled containers fetch");
    assert!(slow.send(Err(ApiError::transport("docker down"))).is_ok());
    scheduler.run_until_stalled();

    let error = view.error().expect("scheduled failure shown");
    assert_eq!(error.message, "获取Docker数据失败");
    assert_eq!(error.sources, vec!["containers".to_string()]);
    assert_eq!(error.detail.as_deref(), Some("network request failed: docker down"));
    assert!(containers.last_error().is_some());
    assert!(images.current().is_some());
}
