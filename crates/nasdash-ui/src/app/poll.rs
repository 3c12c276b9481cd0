//! Browser scheduler and the hook that binds a poll group to a component.
//!
//! # Design
//! - Timers are `gloo` intervals and ticks run on the Yew local executor.
//! - The session lives exactly as long as the component (or until its deps
//!   change); teardown drops it, which cancels the interval and revokes the
//!   session token.
//! - The view re-renders when its store notifies, not on every tick.

use crate::core::poll::{PollGroup, PollSession, Scheduler, TimerGuard, ViewState, ViewStore};
use futures_util::future::LocalBoxFuture;
use gloo_timers::callback::Interval;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use yew::prelude::*;

/// [`Scheduler`] backed by browser timers.
pub(crate) struct GlooScheduler;

impl Scheduler for GlooScheduler {
    fn every(&self, period: Duration, mut tick: Box<dyn FnMut()>) -> TimerGuard {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        let interval = Interval::new(millis, move || tick());
        TimerGuard::new(move || drop(interval))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        yew::platform::spawn_local(task);
    }
}

struct Prepared {
    view: ViewStore,
    group: RefCell<Option<PollGroup>>,
}

/// Handle returned by [`use_poll`].
#[derive(Clone)]
pub(crate) struct PollHandle {
    view: ViewStore,
    session: Rc<RefCell<Option<PollSession>>>,
}

impl PollHandle {
    /// Current loading/error flags.
    pub(crate) fn state(&self) -> ViewState {
        self.view.snapshot()
    }

    /// One out-of-band tick over the named resources, after a mutation.
    pub(crate) fn refetch_only(&self, keys: &[&str]) {
        if let Some(session) = self.session.borrow().as_ref() {
            session.refetch_only(keys);
        }
    }

    /// One out-of-band tick over every resource.
    pub(crate) fn refetch(&self) {
        if let Some(session) = self.session.borrow().as_ref() {
            session.refetch();
        }
    }
}

/// Build a poll group for `deps` and keep it running while mounted.
#[hook]
pub(crate) fn use_poll<D, F>(deps: D, build: F) -> PollHandle
where
    D: Clone + PartialEq + 'static,
    F: FnOnce(&D) -> PollGroup,
{
    let force = use_force_update();
    let prepared = use_memo(
        |deps| {
            let group = build(deps);
            Prepared {
                view: group.view(),
                group: RefCell::new(Some(group)),
            }
        },
        deps.clone(),
    );
    let session = use_mut_ref(|| None as Option<PollSession>);
    {
        let prepared = prepared.clone();
        let session = session.clone();
        use_effect_with_deps(
            move |_| {
                let subscription = prepared.view.subscribe(move || force.force_update());
                if let Some(group) = prepared.group.borrow_mut().take() {
                    *session.borrow_mut() = Some(group.start(Rc::new(GlooScheduler)));
                }
                move || {
                    session.borrow_mut().take();
                    drop(subscription);
                }
            },
            deps,
        );
    }
    PollHandle {
        view: prepared.view.clone(),
        session,
    }
}
