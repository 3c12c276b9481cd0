//! Named pollable data sources and their last accepted payloads.
//!
//! # Design
//! - A `Resource` handle is cheap to clone; all clones share one slot.
//! - The slot is mutated only through `accept`/`record_failure`, which enforce
//!   sequence ordering so an older response never overwrites a newer one.
//! - Payloads are stored behind `Rc`; the reference only changes when the
//!   detector reports a real change, so renderers can compare by pointer.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::core::error::ApiError;
use crate::core::poll::detect::{ChangeDetector, StructuralEq};

/// Future returned by a resource's fetch function.
pub type FetchFuture<T> = LocalBoxFuture<'static, Result<T, ApiError>>;

/// Result of offering a payload to a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acceptance {
    /// The stored reference was replaced with the new payload.
    Replaced,
    /// The payload equals the stored one; nothing changed.
    Unchanged,
    /// A newer result was already applied; the payload was discarded.
    Stale,
}

struct Slot<T> {
    value: Option<Rc<T>>,
    last_error: Option<ApiError>,
    has_loaded_once: bool,
    applied_seq: u64,
    version: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: None,
            last_error: None,
            has_loaded_once: false,
            applied_seq: 0,
            version: 0,
        }
    }
}

/// Independently pollable data source bound to one endpoint.
pub struct Resource<T> {
    key: Rc<str>,
    fetch: Rc<dyn Fn() -> FetchFuture<T>>,
    detector: Rc<dyn ChangeDetector<T>>,
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            key: Rc::clone(&self.key),
            fetch: Rc::clone(&self.fetch),
            detector: Rc::clone(&self.detector),
            slot: Rc::clone(&self.slot),
        }
    }
}

/// Handles are equal when they share one slot.
impl<T> PartialEq for Resource<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("Resource")
            .field("key", &self.key)
            .field("loaded", &slot.has_loaded_once)
            .field("version", &slot.version)
            .field("applied_seq", &slot.applied_seq)
            .field("last_error", &slot.last_error)
            .finish()
    }
}

impl<T: PartialEq + 'static> Resource<T> {
    /// Resource compared with [`StructuralEq`].
    pub fn new<F>(key: impl Into<Rc<str>>, fetch: F) -> Self
    where
        F: Fn() -> FetchFuture<T> + 'static,
    {
        Self::with_detector(key, fetch, StructuralEq)
    }
}

impl<T: 'static> Resource<T> {
    /// Resource compared with a caller-chosen detector.
    pub fn with_detector<F, D>(key: impl Into<Rc<str>>, fetch: F, detector: D) -> Self
    where
        F: Fn() -> FetchFuture<T> + 'static,
        D: ChangeDetector<T> + 'static,
    {
        Self {
            key: key.into(),
            fetch: Rc::new(fetch),
            detector: Rc::new(detector),
            slot: Rc::new(RefCell::new(Slot::default())),
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Last accepted payload.
    #[must_use]
    pub fn current(&self) -> Option<Rc<T>> {
        self.slot.borrow().value.clone()
    }

    /// Number of times the stored reference has been replaced.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.slot.borrow().version
    }

    /// Whether any fetch has ever succeeded.
    #[must_use]
    pub fn has_loaded_once(&self) -> bool {
        self.slot.borrow().has_loaded_once
    }

    /// Error from the most recent applied tick, cleared on success.
    #[must_use]
    pub fn last_error(&self) -> Option<ApiError> {
        self.slot.borrow().last_error.clone()
    }

    /// Highest tick sequence applied so far.
    #[must_use]
    pub fn applied_seq(&self) -> u64 {
        self.slot.borrow().applied_seq
    }

    /// Issue one fetch.
    #[must_use]
    pub fn fetch(&self) -> FetchFuture<T> {
        (self.fetch)()
    }

    /// Offer a fetched payload produced by tick `seq`.
    pub fn accept(&self, seq: u64, payload: T) -> Acceptance {
        let mut slot = self.slot.borrow_mut();
        if seq <= slot.applied_seq {
            debug!(resource = %self.key, seq, applied = slot.applied_seq, "discarding stale payload");
            return Acceptance::Stale;
        }
        slot.applied_seq = seq;
        slot.last_error = None;
        slot.has_loaded_once = true;
        if self
            .detector
            .has_changed(slot.value.as_deref(), Some(&payload))
        {
            slot.value = Some(Rc::new(payload));
            slot.version += 1;
            Acceptance::Replaced
        } else {
            Acceptance::Unchanged
        }
    }

    /// Record a failed fetch from tick `seq`; the stored payload is kept.
    ///
    /// Returns `false` when a newer tick has already been applied.
    pub fn record_failure(&self, seq: u64, error: ApiError) -> bool {
        let mut slot = self.slot.borrow_mut();
        if seq <= slot.applied_seq {
            debug!(resource = %self.key, seq, applied = slot.applied_seq, "discarding stale failure");
            return false;
        }
        slot.applied_seq = seq;
        slot.last_error = Some(error);
        true
    }
}

/// A fetched payload waiting to be committed under a tick sequence.
pub struct Staged {
    key: Rc<str>,
    commit: Box<dyn FnOnce(u64) -> Acceptance>,
}

impl Staged {
    /// Key of the resource that produced this payload.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Offer the payload to its resource.
    pub fn commit(self, seq: u64) -> Acceptance {
        (self.commit)(seq)
    }
}

impl fmt::Debug for Staged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Staged").field("key", &self.key).finish_non_exhaustive()
    }
}

/// Type-erased view of a [`Resource`] used by batch fetching.
pub trait Pollable {
    /// Stable identifier.
    fn key(&self) -> &str;
    /// Fetch and stage the payload without applying it.
    fn fetch_staged(&self) -> LocalBoxFuture<'static, Result<Staged, ApiError>>;
    /// See [`Resource::record_failure`].
    fn record_failure(&self, seq: u64, error: ApiError) -> bool;
    /// See [`Resource::has_loaded_once`].
    fn has_loaded_once(&self) -> bool;
    /// See [`Resource::last_error`].
    fn last_error(&self) -> Option<ApiError>;
}

impl<T: 'static> Pollable for Resource<T> {
    fn key(&self) -> &str {
        Self::key(self)
    }

    fn fetch_staged(&self) -> LocalBoxFuture<'static, Result<Staged, ApiError>> {
        let pending = self.fetch();
        let handle = self.clone();
        Box::pin(async move {
            let payload = pending.await?;
            Ok(Staged {
                key: Rc::clone(&handle.key),
                commit: Box::new(move |seq| handle.accept(seq, payload)),
            })
        })
    }

    fn record_failure(&self, seq: u64, error: ApiError) -> bool {
        Self::record_failure(self, seq, error)
    }

    fn has_loaded_once(&self) -> bool {
        Self::has_loaded_once(self)
    }

    fn last_error(&self) -> Option<ApiError> {
        Self::last_error(self)
    }
}
