//! Per-logical-query fetch controller.
//!
//! A `FetchOrchestrator` owns one logical query (the member list of a view,
//! or the member shown on a detail page). For every request it:
//!
//! 1. cancels the request still outstanding for this logical query, if any
//! 2. serves a fresh cache entry synchronously, skipping the network
//! 3. otherwise publishes `Loading` and calls the transport with a new token
//! 4. on completion, writes the cache and publishes the result, unless the
//!    request was superseded or cancelled in the meantime
//!
//! Steps 1, 2 and 4 run under the slot lock with no await in between, so a
//! cancelled request can never reach the cache or the subscribers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{FetchError, Transport};
use crate::cache::{CacheKey, QueryCache};

use super::query::{Payload, Query};
use super::state::{QueryPhase, QueryState};

struct ActiveRequest {
    id: u64,
    key: CacheKey,
    token: CancellationToken,
}

#[derive(Default)]
struct Slot {
    query: Option<Query>,
    phase: QueryPhase,
    active: Option<ActiveRequest>,
    issued: u64,
}

/// A request that missed the cache and is about to hit the network.
struct Pending {
    id: u64,
    key: CacheKey,
    token: CancellationToken,
    query: Query,
}

/// Abandons its request when dropped; forgotten once the request completes.
struct InFlightGuard<'a, T: Transport> {
    orchestrator: &'a FetchOrchestrator<T>,
    id: u64,
}

impl<T: Transport> Drop for InFlightGuard<'_, T> {
    fn drop(&mut self) {
        self.orchestrator.abandon(self.id);
    }
}

struct Shared<T> {
    transport: Arc<T>,
    cache: Arc<QueryCache<Payload>>,
    slot: Mutex<Slot>,
    state_tx: watch::Sender<QueryState>,
}

/// Clone is cheap; clones drive the same logical query.
pub struct FetchOrchestrator<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for FetchOrchestrator<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Transport> FetchOrchestrator<T> {
    pub fn new(transport: Arc<T>, cache: Arc<QueryCache<Payload>>) -> Self {
        let (state_tx, _) = watch::channel(QueryState::default());
        Self {
            shared: Arc::new(Shared {
                transport,
                cache,
                slot: Mutex::new(Slot::default()),
                state_tx,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.shared.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: QueryState) {
        self.shared.state_tx.send_replace(state);
    }

    /// Receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.shared.state_tx.subscribe()
    }

    /// Latest published state.
    pub fn state(&self) -> QueryState {
        self.shared.state_tx.borrow().clone()
    }

    /// Internal phase. The published state only shows `Aborted` after a
    /// request future was dropped mid-flight.
    pub fn phase(&self) -> QueryPhase {
        self.lock().phase
    }

    /// The query most recently requested.
    pub fn current_query(&self) -> Option<Query> {
        self.lock().query.clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().active.is_some()
    }

    /// Resolve `query`, from cache when possible, and publish the outcome.
    ///
    /// Any request still outstanding for this logical query is cancelled
    /// first. The returned future completes once this request has settled,
    /// been superseded, or been cancelled.
    ///
    /// Dropping the returned future before it completes (a `timeout`, a losing
    /// `select!` arm, an aborted task) cancels the request and leaves the
    /// phase `Aborted` instead of `Loading`.
    pub async fn request(&self, query: Query) {
        let Some(pending) = self.begin(query) else {
            return;
        };
        let guard = InFlightGuard {
            orchestrator: self,
            id: pending.id,
        };
        let result = pending
            .query
            .run(self.shared.transport.as_ref(), &pending.token)
            .await;
        std::mem::forget(guard);
        self.finish(pending, result);
    }

    /// Drop the cached result of the current query and fetch it again.
    pub async fn refetch(&self) {
        let Some(query) = self.current_query() else {
            debug!("Refetch requested before any query");
            return;
        };
        if let Some(key) = query.cache_key() {
            self.shared.cache.delete(&key);
        }
        self.request(query).await;
    }

    /// Cancel the outstanding request, if any, without publishing.
    /// This is the teardown path for a consumer that goes away.
    pub fn cancel(&self) {
        let mut slot = self.lock();
        if let Some(active) = slot.active.take() {
            debug!(key = %active.key, "Cancelling in-flight request");
            active.token.cancel();
            slot.phase = QueryPhase::Aborted;
        }
    }

    fn begin(&self, query: Query) -> Option<Pending> {
        let mut slot = self.lock();

        if let Some(previous) = slot.active.take() {
            debug!(key = %previous.key, "Cancelling superseded request");
            previous.token.cancel();
        }
        slot.query = Some(query.clone());

        let Some(key) = query.cache_key() else {
            debug!("Query has nothing to fetch");
            slot.phase = QueryPhase::Settled;
            self.publish(QueryState::empty());
            return None;
        };

        if let Some(entry) = self
            .shared
            .cache
            .get(&key)
            .filter(|entry| query.accepts(&entry.payload))
        {
            debug!(key = %key, "Cache hit");
            slot.phase = QueryPhase::Settled;
            self.publish(QueryState::settled(entry.payload));
            return None;
        }

        debug!(key = %key, "Cache miss, fetching");
        slot.issued += 1;
        let id = slot.issued;
        let token = CancellationToken::new();
        slot.active = Some(ActiveRequest {
            id,
            key: key.clone(),
            token: token.clone(),
        });
        slot.phase = QueryPhase::Loading;

        let previous = self
            .shared
            .state_tx
            .borrow()
            .payload
            .clone()
            .filter(|payload| query.accepts(payload));
        self.publish(QueryState::loading(previous));

        Some(Pending {
            id,
            key,
            token,
            query,
        })
    }

    /// The future driving request `id` was dropped before `finish` ran.
    fn abandon(&self, id: u64) {
        let mut slot = self.lock();
        if !slot.active.as_ref().is_some_and(|a| a.id == id) {
            return;
        }
        if let Some(active) = slot.active.take() {
            debug!(key = %active.key, "Request dropped before completion");
            active.token.cancel();
        }
        slot.phase = QueryPhase::Aborted;
        self.shared.state_tx.send_if_modified(|state| {
            if !state.is_loading() {
                return false;
            }
            state.phase = QueryPhase::Aborted;
            true
        });
    }

    fn finish(&self, pending: Pending, result: Result<Payload, FetchError>) {
        let mut slot = self.lock();

        let is_current = slot.active.as_ref().is_some_and(|a| a.id == pending.id);
        if !is_current || pending.token.is_cancelled() {
            debug!(key = %pending.key, "Discarding result of superseded request");
            return;
        }
        slot.active = None;

        match result {
            Ok(payload) => {
                self.shared.cache.set(pending.key, payload.clone());
                slot.phase = QueryPhase::Settled;
                self.publish(QueryState::settled(payload));
            }
            Err(FetchError::Aborted) => {
                debug!(key = %pending.key, "Request aborted by transport");
                slot.phase = QueryPhase::Aborted;
            }
            Err(error) => {
                warn!(key = %pending.key, error = %error, "Fetch failed");
                slot.phase = QueryPhase::Settled;
                self.publish(QueryState::failed(error));
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
