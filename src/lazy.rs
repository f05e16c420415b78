//! Lazy module cache: single-flight memoization of lazy view loads.
//!
//! Entries are keyed by [`RouteId`] and move monotonically:
//!
//! ```text
//! (absent) ──load──▶ InFlight ──ok──▶ Resolved   (permanent)
//!                        │
//!                        └──err──▶ Failed ──next load──▶ InFlight
//! ```
//!
//! Concurrent callers for the same route share the in-flight future instead
//! of starting a duplicate load. A failure is remembered only until the next
//! call, which retries. A completion never overwrites a resolved entry, nor a
//! newer in-flight retry started after it.
//!
//! Nothing here cancels a load: when the navigation that started it is
//! superseded, the load still finishes and populates the cache for whoever
//! asks next.

use crate::error::LoadError;
use crate::route::{LazyLoader, RouteId, ViewFn};
use crate::{debug_log, trace_log, warn_log};
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

type SharedLoad<V> = Shared<LocalBoxFuture<'static, Result<ViewFn<V>, LoadError>>>;

enum Entry<V> {
    InFlight { generation: u64, load: SharedLoad<V> },
    Resolved(ViewFn<V>),
    Failed(LoadError),
}

/// Observable state of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Never requested.
    NotStarted,
    /// A load is running.
    InFlight,
    /// Loaded; will never load again.
    Resolved,
    /// The last load failed; the next request retries.
    Failed(LoadError),
}

/// Memoizes lazy loads per route.
pub struct LazyCache<V> {
    entries: RefCell<HashMap<RouteId, Entry<V>>>,
    generation: Cell<u64>,
}

impl<V: 'static> LazyCache<V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            generation: Cell::new(0),
        }
    }

    /// Load the view for `id`, starting `loader` only if nothing is resolved
    /// or in flight.
    pub async fn load(&self, id: &RouteId, loader: &LazyLoader<V>) -> Result<ViewFn<V>, LoadError> {
        let (generation, load) = match self.join_or_start(id, loader) {
            Ok(view) => return Ok(view),
            Err(pending) => pending,
        };

        let result = load.await;
        self.settle(id, generation, &result);
        result
    }

    /// Either a resolved view, or the in-flight load to await.
    fn join_or_start(
        &self,
        id: &RouteId,
        loader: &LazyLoader<V>,
    ) -> Result<ViewFn<V>, (u64, SharedLoad<V>)> {
        let mut entries = self.entries.borrow_mut();

        match entries.get(id) {
            Some(Entry::Resolved(view)) => {
                trace_log!("Lazy route '{}' already resolved", id);
                return Ok(view.clone());
            }
            Some(Entry::InFlight { generation, load }) => {
                debug_log!("Joining in-flight load for lazy route '{}'", id);
                return Err((*generation, load.clone()));
            }
            Some(Entry::Failed(err)) => {
                debug_log!("Retrying lazy route '{}' after failure: {}", id, err);
            }
            None => {
                debug_log!("Starting load for lazy route '{}'", id);
            }
        }

        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        let load = loader().shared();
        entries.insert(
            id.clone(),
            Entry::InFlight {
                generation,
                load: load.clone(),
            },
        );
        Err((generation, load))
    }

    /// Record a finished load, unless a later transition already happened.
    fn settle(&self, id: &RouteId, generation: u64, result: &Result<ViewFn<V>, LoadError>) {
        let mut entries = self.entries.borrow_mut();

        let current = matches!(
            entries.get(id),
            Some(Entry::InFlight { generation: g, .. }) if *g == generation
        );
        if !current {
            trace_log!("Stale completion for lazy route '{}' ignored", id);
            return;
        }

        match result {
            Ok(view) => {
                debug_log!("Lazy route '{}' resolved", id);
                entries.insert(id.clone(), Entry::Resolved(view.clone()));
            }
            Err(err) => {
                warn_log!("Lazy route '{}' failed to load: {}", id, err);
                entries.insert(id.clone(), Entry::Failed(err.clone()));
            }
        }
    }

    /// Current state of an entry.
    pub fn state(&self, id: &RouteId) -> LoadState {
        match self.entries.borrow().get(id) {
            None => LoadState::NotStarted,
            Some(Entry::InFlight { .. }) => LoadState::InFlight,
            Some(Entry::Resolved(_)) => LoadState::Resolved,
            Some(Entry::Failed(err)) => LoadState::Failed(err.clone()),
        }
    }

    /// Number of routes with an entry in any state.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether no lazy route has been requested yet.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<V: 'static> Default for LazyCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for LazyCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCache")
            .field("entries", &self.entries.borrow().len())
            .finish_non_exhaustive()
    }
}
