//! Types specific to the dependency resolver.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use apk_types::Package;

/// A package paired with the label of the index it came from.
///
/// The pin identifies the candidate's provenance for filtering and
/// comparison; candidates from unlabeled indexes carry an empty pin. The
/// `id` is unique per package within one resolver and serves as the
/// candidate's identity: the same package registered under several names
/// (via its provider tokens) shares one `id`.
#[derive(Clone, Debug)]
pub(crate) struct PinnedPackage {
    /// The candidate's identity within its resolver.
    pub(crate) id: usize,
    /// The package metadata.
    pub(crate) package: Arc<Package>,
    /// The label of the index the package came from.
    pub(crate) pin: String,
}

/// The candidates eliminated during one resolution, with the reason each
/// was eliminated.
///
/// Disqualification is permanent for the lifetime of the set: once a
/// candidate is recorded it is invisible to every subsequent filter pass,
/// and its reason is never overwritten.
#[derive(Debug, Default)]
pub struct Disqualified {
    reasons: HashMap<usize, String>,
}

impl Disqualified {
    /// Creates a new, empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `reason` for a candidate, unless one is already recorded.
    ///
    /// The first reason wins; all writes go through this method.
    pub(crate) fn insert(&mut self, id: usize, reason: String) {
        self.reasons.entry(id).or_insert(reason);
    }

    /// Returns `true` if the candidate has been disqualified.
    pub(crate) fn contains(&self, id: usize) -> bool {
        self.reasons.contains_key(&id)
    }

    /// Returns the reason the candidate was disqualified, if any.
    pub(crate) fn reason(&self, id: usize) -> Option<&str> {
        self.reasons.get(&id).map(String::as_str)
    }

    /// Returns the number of disqualified candidates.
    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    /// Returns `true` if no candidate has been disqualified.
    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }
}

/// A handle to cancel an ongoing resolution.
///
/// The handle is cheap to clone and may be triggered from another thread;
/// the resolver checks it opportunistically before long candidate scans and
/// fails with [`crate::Error::Cancelled`] once it fires.
///
/// ## Examples
/// ```
/// use apk_solve::Cancellation;
///
/// let cancellation = Cancellation::new();
/// assert!(!cancellation.is_cancelled());
///
/// cancellation.cancel();
/// assert!(cancellation.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    cancelled: Arc<AtomicBool>,
}

impl Cancellation {
    /// Creates a new handle that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every resolution holding this handle.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns `true` if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
