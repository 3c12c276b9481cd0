//! Concurrent fan-out of one tick's fetches.
//!
//! # Design
//! - Fetches for a tick run concurrently on the single UI thread; completions
//!   are yielded in arrival order, not declaration order.
//! - Best-effort keeps every source independent. All-or-nothing joins the whole
//!   batch and yields the first failure with no staged payloads.

use std::collections::BTreeMap;
use std::rc::Rc;

use futures_util::future::{LocalBoxFuture, try_join_all};
use futures_util::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;
use tracing::warn;

use crate::core::error::ApiError;
use crate::core::poll::resource::{Pollable, Staged};

/// How failures inside one batch affect its siblings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Aggregation {
    /// Each source succeeds or fails on its own.
    #[default]
    BestEffort,
    /// Any failure discards the whole batch.
    AllOrNothing,
}

/// One completed fetch inside a batch.
pub type Completion = (String, Result<Staged, ApiError>);

/// Per-source results of a best-effort batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Staged payloads keyed by resource.
    pub succeeded: BTreeMap<String, Staged>,
    /// Failures keyed by resource.
    pub failed: BTreeMap<String, ApiError>,
}

impl BatchOutcome {
    /// Whether every source succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// First failure of an all-or-nothing batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{key} fetch failed: {source}")]
pub struct BatchError {
    /// Resource whose fetch failed.
    pub key: String,
    /// Underlying request failure.
    #[source]
    pub source: ApiError,
}

/// Start every fetch and yield completions as they arrive.
#[must_use]
pub fn fetch_each(
    resources: &[Rc<dyn Pollable>],
) -> FuturesUnordered<LocalBoxFuture<'static, Completion>> {
    resources
        .iter()
        .map(|resource| {
            let key = resource.key().to_string();
            let pending = resource.fetch_staged();
            Box::pin(async move { (key, pending.await) }) as LocalBoxFuture<'static, Completion>
        })
        .collect()
}

/// Fetch every resource once under the given aggregation policy.
///
/// # Errors
///
/// Under [`Aggregation::AllOrNothing`], returns the first failure and drops
/// the remaining fetches. Best-effort batches never fail as a whole.
pub async fn fetch_all(
    resources: &[Rc<dyn Pollable>],
    aggregation: Aggregation,
) -> Result<BatchOutcome, BatchError> {
    match aggregation {
        Aggregation::BestEffort => {
            let mut outcome = BatchOutcome::default();
            let mut completions = fetch_each(resources);
            while let Some((key, result)) = completions.next().await {
                match result {
                    Ok(staged) => {
                        outcome.succeeded.insert(key, staged);
                    }
                    Err(err) => {
                        warn!(resource = %key, error = %err, "fetch failed");
                        outcome.failed.insert(key, err);
                    }
                }
            }
            Ok(outcome)
        }
        Aggregation::AllOrNothing => {
            let pending = resources.iter().map(|resource| {
                let key = resource.key().to_string();
                let fetch = resource.fetch_staged();
                async move {
                    match fetch.await {
                        Ok(staged) => Ok((key, staged)),
                        Err(source) => Err(BatchError { key, source }),
                    }
                }
            });
            let staged = try_join_all(pending).await.inspect_err(|err| {
                warn!(resource = %err.key, error = %err.source, "batch aborted");
            })?;
            Ok(BatchOutcome {
                succeeded: staged.into_iter().collect(),
                failed: BTreeMap::new(),
            })
        }
    }
}
