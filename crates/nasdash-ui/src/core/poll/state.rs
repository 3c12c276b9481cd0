//! Per-view loading/error state and change notification.
//!
//! # Design
//! - `loading` is one-shot: it starts true and the first settled tick clears it
//!   for good, whatever that tick's outcome.
//! - A failed tick never touches resource values; it only sets the error.
//! - The error is rebuilt from the errors the bound resources currently hold,
//!   so ticks may settle in any order and a narrow refetch cannot hide or
//!   clear a sibling's failure.
//! - Credential failures are left to the global interceptor and never shown here.
//! - Listeners run only when a resource reference or the view state actually changed.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::error::ApiError;

/// Coarse lifecycle of a view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No resource has loaded yet.
    #[default]
    Initializing,
    /// At least one resource has loaded once.
    Ready,
}

/// Error surfaced for a view's most recent tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewError {
    /// Localised message configured for the view.
    pub message: String,
    /// Resources whose fetch failed, sorted.
    pub sources: Vec<String>,
    /// HTTP status of the first failure, when a response was received.
    pub status: Option<u16>,
    /// Backend detail or transport description of the first failure.
    pub detail: Option<String>,
}

/// Loading and error flags for one view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    phase: Phase,
    loading: bool,
    error: Option<ViewError>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: Phase::Initializing,
            loading: true,
            error: None,
        }
    }
}

impl ViewState {
    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the initial loading placeholder should render.
    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    /// Error from the latest settled tick.
    #[must_use]
    pub const fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }
}

/// Resource state gathered after a tick, handed to [`settle_tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Sequence number of the tick that just finished.
    pub seq: u64,
    /// Bound resources whose latest applied fetch failed.
    pub failures: Vec<(String, ApiError)>,
    /// Whether any resource of the view has ever loaded.
    pub any_loaded: bool,
}

/// Apply a finished tick to the view state. Returns whether anything changed.
pub fn settle_tick(state: &mut ViewState, report: &TickReport, message: &str) -> bool {
    let before = state.clone();
    state.loading = false;
    if report.any_loaded {
        state.phase = Phase::Ready;
    }

    let mut visible: Vec<&(String, ApiError)> = report
        .failures
        .iter()
        .filter(|(_, err)| !err.is_unauthorized())
        .collect();
    if visible.is_empty() {
        if report.failures.is_empty() {
            state.error = None;
        }
    } else {
        visible.sort_by(|a, b| a.0.cmp(&b.0));
        let (_, first) = visible[0];
        state.error = Some(ViewError {
            message: message.to_string(),
            sources: visible.iter().map(|(key, _)| key.clone()).collect(),
            status: first.status(),
            detail: Some(first.detail().map_or_else(|| first.to_string(), str::to_string)),
        });
    }
    *state != before
}

type Listener = Rc<dyn Fn()>;

struct StoreInner {
    state: RefCell<ViewState>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
    notifications: Cell<u64>,
}

/// Shared, observable [`ViewState`] for one view.
#[derive(Clone)]
pub struct ViewStore {
    inner: Rc<StoreInner>,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(ViewState::default()),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
                notifications: Cell::new(0),
            }),
        }
    }
}

impl PartialEq for ViewStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ViewStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewStore")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl ViewStore {
    /// Fresh store in the `Initializing` phase with `loading` set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// See [`ViewState::loading`].
    #[must_use]
    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// See [`ViewState::error`].
    #[must_use]
    pub fn error(&self) -> Option<ViewError> {
        self.inner.state.borrow().error.clone()
    }

    /// See [`ViewState::phase`].
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase
    }

    /// Number of change notifications delivered so far.
    #[must_use]
    pub fn notifications(&self) -> u64 {
        self.inner.notifications.get()
    }

    /// Register a change listener; dropping the guard unregisters it.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Tell listeners that a bound resource was replaced.
    pub fn notify(&self) {
        self.inner
            .notifications
            .set(self.inner.notifications.get() + 1);
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    /// Settle a finished tick.
    ///
    /// Returns whether the state changed (listeners were notified).
    pub fn settle(&self, report: &TickReport, message: &str) -> bool {
        let changed = settle_tick(&mut self.inner.state.borrow_mut(), report, message);
        if changed {
            self.notify();
        }
        changed
    }
}

/// Listener registration returned by [`ViewStore::subscribe`].
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .listeners
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &str = "获取数据失败，请检查后端服务是否正常运行";

    fn report(seq: u64, failures: Vec<(&str, ApiError)>, any_loaded: bool) -> TickReport {
        TickReport {
            seq,
            failures: failures
                .into_iter()
                .map(|(key, err)| (key.to_string(), err))
                .collect(),
            any_loaded,
        }
    }

    #[test]
    fn fresh_state_is_loading() {
        let state = ViewState::default();
        assert!(state.loading());
        assert_eq!(state.phase(), Phase::Initializing);
        assert!(state.error().is_none());
    }

    #[test]
    fn first_success_becomes_ready() {
        let mut state = ViewState::default();
        assert!(settle_tick(&mut state, &report(1, vec![], true), MESSAGE));
        assert!(!state.loading());
        assert_eq!(state.phase(), Phase::Ready);
    }

    #[test]
    fn failed_first_tick_still_clears_loading() {
        let mut state = ViewState::default();
        settle_tick(
            &mut state,
            &report(1, vec![("cpu", ApiError::transport("offline"))], false),
            MESSAGE,
        );
        assert!(!state.loading());
        assert_eq!(state.phase(), Phase::Initializing);
        let error = state.error().expect("error set");
        assert_eq!(error.message, MESSAGE);
        assert_eq!(error.sources, vec!["cpu".to_string()]);
    }

    #[test]
    fn loading_never_returns() {
        let mut state = ViewState::default();
        settle_tick(&mut state, &report(1, vec![], true), MESSAGE);
        for seq in 2..6 {
            settle_tick(
                &mut state,
                &report(seq, vec![("cpu", ApiError::Timeout { after_ms: 10_000 })], true),
                MESSAGE,
            );
            assert!(!state.loading());
        }
    }

    #[test]
    fn success_clears_previous_error() {
        let mut state = ViewState::default();
        settle_tick(
            &mut state,
            &report(1, vec![("cpu", ApiError::transport("offline"))], false),
            MESSAGE,
        );
        settle_tick(&mut state, &report(2, vec![], true), MESSAGE);
        assert!(state.error().is_none());
    }

    #[test]
    fn credential_failures_are_not_surfaced() {
        let mut state = ViewState::default();
        settle_tick(
            &mut state,
            &report(1, vec![("cpu", ApiError::Unauthorized)], false),
            MESSAGE,
        );
        assert!(state.error().is_none());
        assert!(!state.loading());
    }

    #[test]
    fn error_names_sorted_visible_sources() {
        let mut state = ViewState::default();
        settle_tick(
            &mut state,
            &report(
                1,
                vec![
                    ("traffic", ApiError::transport("reset")),
                    (
                        "interfaces",
                        ApiError::Application {
                            status: 500,
                            detail: Some("psutil failed".to_string()),
                        },
                    ),
                    ("status", ApiError::Unauthorized),
                ],
                true,
            ),
            MESSAGE,
        );
        let error = state.error().expect("error");
        assert_eq!(error.sources, vec!["interfaces".to_string(), "traffic".to_string()]);
        assert_eq!(error.status, Some(500));
        assert_eq!(error.detail.as_deref(), Some("psutil failed"));
    }

    #[test]
    fn store_notifies_only_on_change() {
        let store = ViewStore::new();
        let calls = Rc::new(Cell::new(0_u32));
        let seen = Rc::clone(&calls);
        let _sub = store.subscribe(move || seen.set(seen.get() + 1));
        assert!(store.settle(&report(1, vec![], true), MESSAGE));
        assert!(!store.settle(&report(2, vec![], true), MESSAGE));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn late_tick_failure_still_reaches_the_store() {
        let store = ViewStore::new();
        store.settle(&report(3, vec![], true), MESSAGE);
        assert!(store.settle(
            &report(2, vec![("containers", ApiError::transport("docker down"))], true),
            MESSAGE
        ));
        let error = store.error().expect("late failure shown");
        assert_eq!(error.sources, vec!["containers".to_string()]);
        assert_eq!(error.detail.as_deref(), Some("network request failed: docker down"));
    }

    #[test]
    fn dropping_subscription_unregisters() {
        let store = ViewStore::new();
        let calls = Rc::new(Cell::new(0_u32));
        let seen = Rc::clone(&calls);
        let sub = store.subscribe(move || seen.set(seen.get() + 1));
        store.notify();
        drop(sub);
        store.notify();
        assert_eq!(calls.get(), 1);
        assert_eq!(store.notifications(), 2);
    }
}
