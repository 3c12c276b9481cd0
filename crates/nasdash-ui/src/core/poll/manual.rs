//! Deterministic single-threaded scheduler.
//!
//! Time only moves when [`ManualScheduler::advance`] is called and spawned
//! tasks only run inside [`ManualScheduler::run_until_stalled`]. Used to drive
//! poll sessions natively, where no browser event loop exists.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::mem;
use std::rc::Rc;
use std::task::Context;
use std::time::Duration;

use futures_util::future::LocalBoxFuture;
use futures_util::task::noop_waker_ref;

use crate::core::poll::session::{Scheduler, TimerGuard};

type Callback = Rc<RefCell<Box<dyn FnMut()>>>;

struct ManualTimer {
    id: u64,
    period: Duration,
    next_due: Duration,
    callback: Callback,
}

#[derive(Default)]
struct ManualInner {
    now: Cell<Duration>,
    next_timer: Cell<u64>,
    timers: RefCell<Vec<ManualTimer>>,
    tasks: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
}

/// Scheduler with a virtual clock and an explicit task queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<ManualInner>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now())
            .field("timers", &self.active_timers())
            .field("tasks", &self.pending_tasks())
            .finish()
    }
}

impl ManualScheduler {
    /// Scheduler at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.now.get()
    }

    /// Timers that have not been cancelled.
    #[must_use]
    pub fn active_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    /// Spawned tasks that have not completed.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.inner.tasks.borrow().len()
    }

    /// Move the clock forward, firing due timers in deadline order.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let due = {
                let mut timers = self.inner.timers.borrow_mut();
                timers
                    .iter_mut()
                    .filter(|timer| timer.next_due <= target)
                    .min_by_key(|timer| timer.next_due)
                    .map(|timer| {
                        let at = timer.next_due;
                        timer.next_due += timer.period;
                        (at, Rc::clone(&timer.callback))
                    })
            };
            let Some((at, callback)) = due else {
                break;
            };
            self.inner.now.set(at);
            let mut tick = callback.borrow_mut();
            (*tick)();
        }
        self.inner.now.set(target);
    }

    /// Poll spawned tasks until none of them can make progress.
    pub fn run_until_stalled(&self) {
        let mut cx = Context::from_waker(noop_waker_ref());
        loop {
            let batch = mem::take(&mut *self.inner.tasks.borrow_mut());
            if batch.is_empty() {
                break;
            }
            let mut progressed = false;
            let mut pending = Vec::with_capacity(batch.len());
            for mut task in batch {
                if task.as_mut().poll(&mut cx).is_ready() {
                    progressed = true;
                } else {
                    pending.push(task);
                }
            }
            let mut tasks = self.inner.tasks.borrow_mut();
            let spawned = mem::take(&mut *tasks);
            let grew = !spawned.is_empty();
            *tasks = pending;
            tasks.extend(spawned);
            if !progressed && !grew {
                break;
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn every(&self, period: Duration, tick: Box<dyn FnMut()>) -> TimerGuard {
        let id = self.inner.next_timer.get();
        self.inner.next_timer.set(id + 1);
        self.inner.timers.borrow_mut().push(ManualTimer {
            id,
            period,
            next_due: self.now() + period,
            callback: Rc::new(RefCell::new(tick)),
        });
        let weak = Rc::downgrade(&self.inner);
        TimerGuard::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.timers.borrow_mut().retain(|timer| timer.id != id);
            }
        })
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.inner.tasks.borrow_mut().push(task);
    }
}
