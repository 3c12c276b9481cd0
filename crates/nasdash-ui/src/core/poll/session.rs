//! Recurring tick driver with deterministic teardown.
//!
//! # Design
//! - The session owns its timer through a [`TimerGuard`]; stopping or dropping
//!   the session cancels it synchronously.
//! - Every tick carries a sequence number and the session's [`SessionToken`];
//!   results are applied only while the token is active, so late responses
//!   after teardown are dropped.
//! - Sequence numbers come from one per-thread counter, so they keep
//!   increasing when a view restarts its session over the same resources.
//! - Scheduled ticks are skipped while an earlier tick is still in flight.
//!   Manual refetches always run and win through their higher sequence number.
//! - Timers and task spawning are injected so the same code runs in the
//!   browser and under [`crate::core::poll::manual::ManualScheduler`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use futures_util::future::LocalBoxFuture;
use tracing::{debug, info};

use crate::core::config::DEFAULT_POLL_INTERVAL_MS;

thread_local! {
    static LAST_SEQ: Cell<u64> = const { Cell::new(0) };
}

fn next_seq() -> u64 {
    LAST_SEQ.with(|last| {
        let seq = last.get() + 1;
        last.set(seq);
        seq
    })
}

/// Timer and task primitives supplied by the host environment.
pub trait Scheduler {
    /// Invoke `tick` every `period` until the returned guard is dropped.
    fn every(&self, period: Duration, tick: Box<dyn FnMut()>) -> TimerGuard;
    /// Run a future to completion on the current thread.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Owned timer registration; dropping it cancels the timer.
pub struct TimerGuard {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TimerGuard {
    /// Wrap the host's cancel action.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TimerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerGuard")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// How often a session ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cadence {
    /// Immediate tick, then one every period.
    Every(Duration),
    /// A single immediate tick; later ticks only through refetch.
    Once,
}

impl Default for Cadence {
    fn default() -> Self {
        Self::every_ms(DEFAULT_POLL_INTERVAL_MS)
    }
}

impl Cadence {
    /// Recurring cadence in milliseconds.
    #[must_use]
    pub fn every_ms(ms: u32) -> Self {
        Self::Every(Duration::from_millis(u64::from(ms)))
    }
}

/// Behaviour when a scheduled tick fires while an earlier one is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Skip the scheduled tick.
    #[default]
    Skip,
    /// Start it anyway; ordering is still enforced by sequence numbers.
    Allow,
}

/// Static session settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Name used in logs.
    pub name: String,
    /// Tick cadence.
    pub cadence: Cadence,
    /// Overlap handling for scheduled ticks.
    pub overlap: OverlapPolicy,
}

/// Liveness flag shared by a session and its in-flight ticks.
#[derive(Clone, Debug)]
pub struct SessionToken(Rc<Cell<bool>>);

impl SessionToken {
    fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    /// Whether the owning session is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.get()
    }

    fn revoke(&self) {
        self.0.set(false);
    }
}

/// What started a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Immediate start or the recurring timer.
    Scheduled,
    /// Explicit refetch after a mutation.
    Manual,
}

/// One fetch-and-reconcile pass.
#[derive(Clone, Debug)]
pub struct Tick {
    /// Sequence number, increasing per session.
    pub seq: u64,
    /// Origin of the tick.
    pub trigger: Trigger,
    /// Restrict the pass to these resource keys.
    pub only: Option<Rc<[String]>>,
    token: SessionToken,
}

impl Tick {
    /// Whether results of this tick may still be applied.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.token.is_active()
    }

    /// Whether `key` takes part in this tick.
    #[must_use]
    pub fn includes(&self, key: &str) -> bool {
        self.only
            .as_ref()
            .is_none_or(|keys| keys.iter().any(|candidate| candidate == key))
    }
}

type TickHandler = Rc<dyn Fn(Tick) -> LocalBoxFuture<'static, ()>>;

struct SessionInner {
    name: String,
    scheduler: Rc<dyn Scheduler>,
    on_tick: TickHandler,
    overlap: OverlapPolicy,
    token: SessionToken,
    timer: RefCell<Option<TimerGuard>>,
    last_seq: Cell<u64>,
    fired: Cell<u64>,
    in_flight: Rc<Cell<usize>>,
}

impl SessionInner {
    fn fire(&self, trigger: Trigger, only: Option<Rc<[String]>>) -> Option<u64> {
        if !self.token.is_active() {
            return None;
        }
        if trigger == Trigger::Scheduled
            && self.overlap == OverlapPolicy::Skip
            && self.in_flight.get() > 0
        {
            debug!(session = %self.name, in_flight = self.in_flight.get(), "previous tick still running; skipping");
            return None;
        }
        let seq = next_seq();
        self.last_seq.set(seq);
        self.fired.set(self.fired.get() + 1);
        self.in_flight.set(self.in_flight.get() + 1);

        let task = (self.on_tick)(Tick {
            seq,
            trigger,
            only,
            token: self.token.clone(),
        });
        let in_flight = Rc::clone(&self.in_flight);
        self.scheduler.spawn(Box::pin(async move {
            task.await;
            in_flight.set(in_flight.get().saturating_sub(1));
        }));
        Some(seq)
    }
}

/// Active recurring-fetch cycle for one view.
pub struct PollSession {
    inner: Rc<SessionInner>,
}

impl fmt::Debug for PollSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollSession")
            .field("name", &self.inner.name)
            .field("running", &self.is_running())
            .field("last_seq", &self.inner.last_seq.get())
            .field("in_flight", &self.inner.in_flight.get())
            .finish()
    }
}

impl PollSession {
    /// Arm the timer, then fire the first tick immediately.
    pub fn start<F>(scheduler: Rc<dyn Scheduler>, config: SessionConfig, on_tick: F) -> Self
    where
        F: Fn(Tick) -> LocalBoxFuture<'static, ()> + 'static,
    {
        let inner = Rc::new(SessionInner {
            name: config.name,
            scheduler: Rc::clone(&scheduler),
            on_tick: Rc::new(on_tick),
            overlap: config.overlap,
            token: SessionToken::new(),
            timer: RefCell::new(None),
            last_seq: Cell::new(0),
            fired: Cell::new(0),
            in_flight: Rc::new(Cell::new(0)),
        });

        if let Cadence::Every(period) = config.cadence {
            let weak = Rc::downgrade(&inner);
            let guard = scheduler.every(
                period,
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.fire(Trigger::Scheduled, None);
                    }
                }),
            );
            *inner.timer.borrow_mut() = Some(guard);
        }
        info!(session = %inner.name, cadence = ?config.cadence, "poll session started");

        let session = Self { inner };
        session.inner.fire(Trigger::Scheduled, None);
        session
    }

    /// Cancel the timer and invalidate in-flight ticks. Safe to call repeatedly.
    pub fn stop(&self) {
        if !self.inner.token.is_active() {
            return;
        }
        self.inner.token.revoke();
        let timer = self.inner.timer.borrow_mut().take();
        drop(timer);
        info!(session = %self.inner.name, ticks = self.inner.fired.get(), "poll session stopped");
    }

    /// Whether the session still accepts ticks.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.token.is_active()
    }

    /// Run an out-of-band tick over every resource.
    pub fn refetch(&self) -> Option<u64> {
        self.inner.fire(Trigger::Manual, None)
    }

    /// Run an out-of-band tick over the named resources.
    pub fn refetch_only(&self, keys: &[&str]) -> Option<u64> {
        let keys: Rc<[String]> = keys.iter().map(|key| (*key).to_string()).collect();
        self.inner.fire(Trigger::Manual, Some(keys))
    }

    /// Ticks started so far.
    #[must_use]
    pub fn ticks_fired(&self) -> u64 {
        self.inner.fired.get()
    }

    /// Ticks started but not yet finished.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.get()
    }

    /// Token shared with this session's ticks.
    #[must_use]
    pub fn token(&self) -> SessionToken {
        self.inner.token.clone()
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.stop();
    }
}
