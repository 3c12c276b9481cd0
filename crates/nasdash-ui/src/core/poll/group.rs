//! Named set of resources polled together by one view.
//!
//! A view describes its resources, aggregation policy, cadence, and failure
//! message once; the group turns that into ticks, commits payloads through
//! each resource's detector, and settles the shared [`ViewStore`] from the
//! errors its resources hold once the tick is applied.

use std::fmt;
use std::rc::Rc;

use futures_util::stream::StreamExt;
use tracing::{debug, warn};

use crate::core::error::ApiError;
use crate::core::poll::batch::{Aggregation, BatchError, fetch_all, fetch_each};
use crate::core::poll::resource::{Acceptance, Pollable, Resource};
use crate::core::poll::session::{
    Cadence, OverlapPolicy, PollSession, Scheduler, SessionConfig, Tick,
};
use crate::core::poll::state::{TickReport, ViewStore};

/// Configured resources plus the view state they feed.
pub struct PollGroup {
    name: Rc<str>,
    resources: Vec<Rc<dyn Pollable>>,
    aggregation: Aggregation,
    cadence: Cadence,
    overlap: OverlapPolicy,
    failure_message: Rc<str>,
    view: ViewStore,
}

impl fmt::Debug for PollGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollGroup")
            .field("name", &self.name)
            .field("resources", &self.keys())
            .field("aggregation", &self.aggregation)
            .field("cadence", &self.cadence)
            .finish_non_exhaustive()
    }
}

/// Builder returned by [`PollGroup::builder`].
pub struct PollGroupBuilder {
    group: PollGroup,
}

impl PollGroup {
    /// Start describing a group; `name` is used in logs.
    pub fn builder(name: impl Into<Rc<str>>) -> PollGroupBuilder {
        let name = name.into();
        PollGroupBuilder {
            group: Self {
                failure_message: Rc::clone(&name),
                name,
                resources: Vec::new(),
                aggregation: Aggregation::default(),
                cadence: Cadence::default(),
                overlap: OverlapPolicy::default(),
                view: ViewStore::new(),
            },
        }
    }

    /// Observable view state fed by this group.
    #[must_use]
    pub fn view(&self) -> ViewStore {
        self.view.clone()
    }

    /// Keys of the bound resources in declaration order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.resources.iter().map(|resource| resource.key()).collect()
    }

    /// Begin polling; the returned session owns the timer.
    pub fn start(self, scheduler: Rc<dyn Scheduler>) -> PollSession {
        let config = SessionConfig {
            name: self.name.to_string(),
            cadence: self.cadence,
            overlap: self.overlap,
        };
        let group = Rc::new(self);
        PollSession::start(scheduler, config, move |tick| {
            let group = Rc::clone(&group);
            Box::pin(async move { group.run_tick(tick).await })
        })
    }

    /// Fetch and reconcile the resources selected by `tick`.
    pub async fn run_tick(&self, tick: Tick) {
        if !tick.is_current() {
            return;
        }
        let selected: Vec<Rc<dyn Pollable>> = self
            .resources
            .iter()
            .filter(|resource| tick.includes(resource.key()))
            .cloned()
            .collect();
        if selected.is_empty() {
            return;
        }

        let applied = match self.aggregation {
            Aggregation::BestEffort => self.reconcile_each(&selected, &tick).await,
            Aggregation::AllOrNothing => self.reconcile_joined(&selected, &tick).await,
        };
        if applied.is_none() {
            debug!(view = %self.name, seq = tick.seq, "session stopped; results dropped");
            return;
        }
        self.view.settle(&self.report(tick.seq), &self.failure_message);
    }

    fn report(&self, seq: u64) -> TickReport {
        TickReport {
            seq,
            failures: self
                .resources
                .iter()
                .filter_map(|resource| {
                    resource
                        .last_error()
                        .map(|err| (resource.key().to_string(), err))
                })
                .collect(),
            any_loaded: self.resources.iter().any(|resource| resource.has_loaded_once()),
        }
    }

    async fn reconcile_each(
        &self,
        selected: &[Rc<dyn Pollable>],
        tick: &Tick,
    ) -> Option<()> {
        let mut completions = fetch_each(selected);
        while let Some((key, result)) = completions.next().await {
            if !tick.is_current() {
                return None;
            }
            match result {
                Ok(staged) => {
                    if staged.commit(tick.seq) == Acceptance::Replaced {
                        self.view.notify();
                    }
                }
                Err(err) => {
                    warn!(view = %self.name, resource = %key, error = %err, "fetch failed");
                    record_failure(selected, &key, tick.seq, err);
                }
            }
        }
        Some(())
    }

    async fn reconcile_joined(
        &self,
        selected: &[Rc<dyn Pollable>],
        tick: &Tick,
    ) -> Option<()> {
        let outcome = fetch_all(selected, Aggregation::AllOrNothing).await;
        if !tick.is_current() {
            return None;
        }
        match outcome {
            Ok(outcome) => {
                let mut replaced = false;
                for staged in outcome.succeeded.into_values() {
                    replaced |= staged.commit(tick.seq) == Acceptance::Replaced;
                }
                if replaced {
                    self.view.notify();
                }
            }
            Err(BatchError { key, source }) => {
                record_failure(selected, &key, tick.seq, source);
            }
        }
        Some(())
    }
}

fn record_failure(selected: &[Rc<dyn Pollable>], key: &str, seq: u64, error: ApiError) {
    if let Some(resource) = selected.iter().find(|resource| resource.key() == key) {
        resource.record_failure(seq, error);
    }
}

impl PollGroupBuilder {
    /// Bind a resource; its handle stays usable for reads.
    #[must_use]
    pub fn resource<T: 'static>(mut self, resource: &Resource<T>) -> Self {
        self.group.resources.push(Rc::new(resource.clone()));
        self
    }

    /// Failure aggregation; defaults to best-effort.
    #[must_use]
    pub fn aggregation(mut self, aggregation: Aggregation) -> Self {
        self.group.aggregation = aggregation;
        self
    }

    /// Tick cadence; defaults to every 5 seconds.
    #[must_use]
    pub fn cadence(mut self, cadence: Cadence) -> Self {
        self.group.cadence = cadence;
        self
    }

    /// Overlap policy; defaults to skipping.
    #[must_use]
    pub fn overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.group.overlap = overlap;
        self
    }

    /// Message shown when a tick fails.
    #[must_use]
    pub fn failure_message(mut self, message: impl Into<Rc<str>>) -> Self {
        self.group.failure_message = message.into();
        self
    }

    /// Feed an existing store instead of a fresh one.
    #[must_use]
    pub fn store(mut self, view: ViewStore) -> Self {
        self.group.view = view;
        self
    }

    /// Finish the description.
    #[must_use]
    pub fn build(self) -> PollGroup {
        self.group
    }
}
