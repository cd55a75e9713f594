//! The cache store: entry table, subscriber counts, and in-flight
//! deduplication of concurrent fetches for the same key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::broadcast;

use crate::retry::{run_with_retry, RetryPolicy};
use crate::transport::RequestError;

use super::clock::{Clock, SystemClock};
use super::entry::CacheEntry;
use super::key::QueryKey;

type FetchResult = Result<Value, RequestError>;

/// Entry lifetimes applied to every key in a cache instance.
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    /// How long a stored value is served without a network request.
    pub stale_after: Duration,
    /// How long an unsubscribed entry survives before it is purged.
    pub evict_after: Duration,
}

impl CachePolicy {
    /// Builds a policy, clamping the eviction window so that
    /// `stale_after <= evict_after` holds.
    pub fn new(stale_after: Duration, evict_after: Duration) -> Self {
        Self {
            stale_after,
            evict_after: evict_after.max(stale_after),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(5 * 60),
            evict_after: Duration::from_secs(10 * 60),
        }
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    subscribers: HashMap<QueryKey, usize>,
    in_flight: HashMap<QueryKey, broadcast::Sender<FetchResult>>,
}

impl CacheState {
    fn purge_expired(&mut self, now: Instant) {
        let subscribers = &self.subscribers;
        self.entries
            .retain(|key, entry| !entry.is_expired(now) || subscribers.contains_key(key));
    }

    fn store(&mut self, key: QueryKey, value: Value, now: Instant, policy: &CachePolicy) {
        if let Some(previous) = self.entries.get(&key) {
            let age = now.saturating_duration_since(previous.stored_at);
            tracing::debug!(%key, age_secs = age.as_secs(), "cache entry refreshed");
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
                stale_at: now + policy.stale_after,
                evict_at: now + policy.evict_after,
            },
        );
    }
}

/// Process-wide query cache shared by all consumers.
///
/// Cheap to clone; clones share the same entry table. Values are whole JSON
/// payloads and updates always replace the entire value.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Mutex<CacheState>>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
}

impl QueryCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    /// Constructor with an explicit clock, used by tests to control time.
    pub fn with_clock(policy: CachePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheState::default())),
            clock,
            policy,
        }
    }

    /// Returns the cached value for `key` if still fresh; otherwise drives
    /// `fetch` through `retry` and caches a successful result.
    ///
    /// Concurrent callers for the same key share a single in-flight fetch:
    /// one caller becomes the leader and performs the request, the rest wait
    /// for its settled outcome. Failures are never cached.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &QueryKey,
        retry: &RetryPolicy,
        fetch: F,
    ) -> FetchResult
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = FetchResult>,
    {
        enum Role {
            Waiter(broadcast::Receiver<FetchResult>),
            Leader,
        }

        let role = {
            let mut state = self.inner.lock().unwrap();
            let now = self.clock.now();
            state.purge_expired(now);
            if let Some(entry) = state.entries.get(key) {
                if entry.is_fresh(now) {
                    tracing::trace!(%key, "cache hit");
                    return Ok(entry.value.clone());
                }
            }
            match state.in_flight.get(key) {
                Some(tx) => Role::Waiter(tx.subscribe()),
                None => {
                    let (tx, _) = broadcast::channel(1);
                    state.in_flight.insert(key.clone(), tx);
                    Role::Leader
                }
            }
        };

        match role {
            Role::Waiter(mut rx) => {
                tracing::trace!(%key, "attaching to in-flight fetch");
                match rx.recv().await {
                    Ok(result) => result,
                    // Leader dropped before settling (caller torn down).
                    Err(_) => Err(RequestError::message("in-flight request abandoned")),
                }
            }
            Role::Leader => {
                let mut guard = InFlightGuard {
                    state: Arc::clone(&self.inner),
                    key: key.clone(),
                    armed: true,
                };
                let result = run_with_retry(retry, fetch).await;
                let sender = {
                    let mut state = self.inner.lock().unwrap();
                    let sender = state.in_flight.remove(key);
                    if let Ok(value) = &result {
                        let now = self.clock.now();
                        state.store(key.clone(), value.clone(), now, &self.policy);
                    }
                    sender
                };
                guard.armed = false;
                if let Some(tx) = sender {
                    // No receivers is fine: nobody attached to this fetch.
                    let _ = tx.send(result.clone());
                }
                result
            }
        }
    }

    /// Marks `key` as actively watched; the entry is exempt from eviction
    /// until the returned handle is dropped.
    pub fn subscribe(&self, key: &QueryKey) -> CacheSubscription {
        let mut state = self.inner.lock().unwrap();
        *state.subscribers.entry(key.clone()).or_insert(0) += 1;
        CacheSubscription {
            state: Arc::clone(&self.inner),
            key: key.clone(),
        }
    }

    /// Drops the entry for `key`; the next read fetches from the network.
    pub fn invalidate(&self, key: &QueryKey) {
        self.inner.lock().unwrap().entries.remove(key);
    }

    /// Removes entries past their eviction window with no active subscriber.
    pub fn purge_expired(&self) {
        let now = self.clock.now();
        self.inner.lock().unwrap().purge_expired(now);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Removes the in-flight marker if the leading fetch is cancelled mid-way,
/// so waiters see the channel close instead of hanging.
struct InFlightGuard {
    state: Arc<Mutex<CacheState>>,
    key: QueryKey,
    armed: bool,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.armed {
            self.state.lock().unwrap().in_flight.remove(&self.key);
        }
    }
}

/// Subscriber handle returned by [`QueryCache::subscribe`].
pub struct CacheSubscription {
    state: Arc<Mutex<CacheState>>,
    key: QueryKey,
}

impl Drop for CacheSubscription {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap();
        if let Some(count) = state.subscribers.get_mut(&self.key) {
            *count -= 1;
            if *count == 0 {
                state.subscribers.remove(&self.key);
            }
        }
    }
}
