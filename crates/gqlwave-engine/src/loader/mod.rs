//! The batch/cache layer: keyed resolver loads raised during one
//! execution wave are coalesced into a single dispatch per loader
//! identity, and results are memoized for the lifetime of the request.
//!
//! # Wave barrier
//!
//! The engine counts runnable resolver tasks through
//! [`LoaderHandle::begin_task`] / [`LoaderHandle::finish_task`]. A
//! call to [`LoaderHandle::load`] parks its caller; when the count of
//! runnable tasks reaches zero — no more synchronous work remains in
//! the wave — the last task to park (or finish) yields once to let any
//! not-yet-started siblings begin, then flushes every pending batch
//! group. Each group's batch function runs exactly once per wave with
//! the deduplicated key set, and results fan back out to every parked
//! caller by key.

mod batch_loader;

pub use batch_loader::BatchError;
pub use batch_loader::BatchLoader;
pub use batch_loader::Loaders;

use crate::Json;
use crate::response::FieldError;
use futures_util::future::Either;
use futures_util::future::select;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::pin::pin;
use std::sync::Arc;
use std::sync::Mutex;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// A cloneable, per-request handle to the batch/cache layer.
///
/// Exposed to resolvers through the resolver context. All clones share
/// one request-scoped state: pending batch groups, the memoization
/// cache, and the runnable-task counter.
#[derive(Clone)]
pub struct LoaderHandle {
    inner: Arc<LoaderShared>,
}

struct LoaderShared {
    loaders: Arc<Loaders>,
    cancellation: CancellationToken,
    state: Mutex<BatchState>,
}

/// Mutable per-request batching state. The mutex is never held across
/// an await point.
struct BatchState {
    /// Number of resolver tasks currently runnable (not parked on a
    /// load).
    active_tasks: usize,

    /// Pending batch groups by loader identity, accumulated during the
    /// current wave.
    pending: IndexMap<String, PendingGroup>,

    /// Request-scoped memoization: (loader identity, canonical key)
    /// to the settled per-key result.
    cache: HashMap<(String, String), Result<Json, FieldError>>,
}

/// The keys raised for one loader identity during the current wave.
#[derive(Default)]
struct PendingGroup {
    /// Deduplicated keys in first-seen order, keyed by canonical JSON
    /// encoding, each with the callers awaiting it.
    keys: IndexMap<String, PendingKey>,
}

struct PendingKey {
    key: Json,
    waiters: Vec<oneshot::Sender<Result<Json, FieldError>>>,
}

impl LoaderHandle {
    /// Creates the batch/cache layer for one request.
    pub fn new(loaders: Arc<Loaders>, cancellation: CancellationToken) -> Self {
        Self {
            inner: Arc::new(LoaderShared {
                loaders,
                cancellation,
                state: Mutex::new(BatchState {
                    active_tasks: 0,
                    pending: IndexMap::new(),
                    cache: HashMap::new(),
                }),
            }),
        }
    }

    /// Marks one resolver task as runnable. The engine calls this
    /// before invoking a resolver.
    pub fn begin_task(&self) {
        let mut state = self.inner.state.lock().unwrap();
        state.active_tasks += 1;
    }

    /// Marks one resolver task as done. The engine calls this after a
    /// resolver future completes; if it was the last runnable task and
    /// loads are pending, the wave's batches are flushed.
    pub async fn finish_task(&self) {
        let should_flush = {
            let mut state = self.inner.state.lock().unwrap();
            state.active_tasks = state.active_tasks.saturating_sub(1);
            state.active_tasks == 0 && !state.pending.is_empty()
        };
        if should_flush {
            self.flush_when_idle().await;
        }
    }

    /// Loads one key through the named loader.
    ///
    /// Calls for the same loader identity issued during the same wave
    /// are coalesced into one batch dispatch; a key already settled
    /// earlier in the request is served from the cache without another
    /// dispatch.
    pub async fn load(&self, loader: &str, key: Json) -> Result<Json, FieldError> {
        let mut results = self.load_many(loader, vec![key]).await;
        results.pop().expect("load_many returns one result per key")
    }

    /// Loads several keys through the named loader; the returned list
    /// is aligned 1:1 with `keys`.
    pub async fn load_many(&self, loader: &str, keys: Vec<Json>) -> Vec<Result<Json, FieldError>> {
        enum Slot {
            Ready(Result<Json, FieldError>),
            Parked(oneshot::Receiver<Result<Json, FieldError>>),
        }

        let (slots, should_flush) = {
            let mut state = self.inner.state.lock().unwrap();

            if self.inner.loaders.get(loader).is_none() {
                let error = FieldError::new(format!("no batch loader registered as `{loader}`"));
                return keys.iter().map(|_| Err(error.clone())).collect();
            }

            let mut parked_any = false;
            let slots: Vec<Slot> = keys
                .into_iter()
                .map(|key| {
                    let canonical = canonical_key(&key);
                    let cache_key = (loader.to_string(), canonical.clone());
                    if let Some(settled) = state.cache.get(&cache_key) {
                        return Slot::Ready(settled.clone());
                    }
                    let (sender, receiver) = oneshot::channel();
                    let group = state.pending.entry(loader.to_string()).or_default();
                    let pending_key = group
                        .keys
                        .entry(canonical)
                        .or_insert_with(|| PendingKey {
                            key,
                            waiters: Vec::new(),
                        });
                    pending_key.waiters.push(sender);
                    parked_any = true;
                    Slot::Parked(receiver)
                })
                .collect();

            let should_flush = if parked_any {
                // This task is about to park on its receivers.
                state.active_tasks = state.active_tasks.saturating_sub(1);
                state.active_tasks == 0
            } else {
                false
            };
            (slots, should_flush)
        };

        if should_flush {
            self.flush_when_idle().await;
        }

        let mut results = Vec::with_capacity(slots.len());
        let mut parked_any = false;
        for slot in slots {
            match slot {
                Slot::Ready(result) => results.push(result),
                Slot::Parked(receiver) => {
                    parked_any = true;
                    let result = receiver.await.unwrap_or_else(|_| {
                        Err(FieldError::new("request was cancelled while loading"))
                    });
                    results.push(result);
                }
            }
        }

        if parked_any {
            let mut state = self.inner.state.lock().unwrap();
            state.active_tasks += 1;
        }

        results
    }

    /// Seeds the request cache for a key, preventing a future dispatch
    /// for it.
    pub fn prime(&self, loader: &str, key: &Json, value: Json) {
        let mut state = self.inner.state.lock().unwrap();
        state
            .cache
            .insert((loader.to_string(), canonical_key(key)), Ok(value));
    }

    /// Evicts a key from the request cache; the next load dispatches
    /// again.
    pub fn evict(&self, loader: &str, key: &Json) {
        let mut state = self.inner.state.lock().unwrap();
        state.cache.remove(&(loader.to_string(), canonical_key(key)));
    }

    /// Flushes all pending batch groups once the wave has actually
    /// drained.
    ///
    /// The single yield is the cooperative scheduling point: it lets
    /// sibling resolver futures that are queued but not yet started
    /// run first. If one of them became runnable in the meantime, the
    /// flush is skipped — that task (or a later parker) triggers it
    /// when the wave truly drains.
    async fn flush_when_idle(&self) {
        tokio::task::yield_now().await;

        loop {
            let groups: Vec<(String, Vec<(String, Json, Vec<oneshot::Sender<Result<Json, FieldError>>>)>)> = {
                let mut state = self.inner.state.lock().unwrap();
                if state.active_tasks > 0 || state.pending.is_empty() {
                    return;
                }
                std::mem::take(&mut state.pending)
                    .into_iter()
                    .map(|(loader, group)| {
                        let keys = group
                            .keys
                            .into_iter()
                            .map(|(canonical, pending)| (canonical, pending.key, pending.waiters))
                            .collect();
                        (loader, keys)
                    })
                    .collect()
            };

            for (loader_name, keys) in groups {
                self.dispatch_group(loader_name, keys).await;
            }
            // Callers woken mid-flush may have parked new loads while
            // later groups were dispatching; loop to re-check before
            // returning.
        }
    }

    /// Dispatches one batch group and fans results out by key.
    async fn dispatch_group(
        &self,
        loader_name: String,
        keys: Vec<(String, Json, Vec<oneshot::Sender<Result<Json, FieldError>>>)>,
    ) {
        let loader = self
            .inner
            .loaders
            .get(&loader_name)
            .expect("loader existence checked at enqueue time");

        let key_values: Vec<Json> = keys.iter().map(|(_, key, _)| key.clone()).collect();
        let key_count = key_values.len();
        tracing::trace!(loader = %loader_name, keys = key_count, "dispatching batch group");

        // A cancelled request must not leave parked callers blocked on
        // a batch that will never settle.
        let outcome = {
            let batch = pin!(loader.load(key_values));
            let cancelled = pin!(self.inner.cancellation.cancelled());
            match select(batch, cancelled).await {
                Either::Left((result, _)) => result,
                Either::Right(((), _)) => {
                    Err(BatchError::new("request was cancelled during batch dispatch"))
                }
            }
        };

        let mut state = self.inner.state.lock().unwrap();
        match outcome {
            Ok(results) if results.len() == key_count => {
                for ((canonical, _, waiters), result) in keys.into_iter().zip(results) {
                    state
                        .cache
                        .insert((loader_name.clone(), canonical), result.clone());
                    for waiter in waiters {
                        let _ = waiter.send(result.clone());
                    }
                }
            }
            Ok(results) => {
                // A misaligned response is a configuration error for
                // the whole batch.
                let error = FieldError::new(format!(
                    "batch loader `{loader_name}` returned {} results for {key_count} keys",
                    results.len()
                ));
                for (canonical, _, waiters) in keys {
                    state
                        .cache
                        .insert((loader_name.clone(), canonical), Err(error.clone()));
                    for waiter in waiters {
                        let _ = waiter.send(Err(error.clone()));
                    }
                }
            }
            Err(batch_error) => {
                let error = FieldError::new(format!(
                    "batch loader `{loader_name}` failed: {batch_error}"
                ));
                for (canonical, _, waiters) in keys {
                    state
                        .cache
                        .insert((loader_name.clone(), canonical), Err(error.clone()));
                    for waiter in waiters {
                        let _ = waiter.send(Err(error.clone()));
                    }
                }
            }
        }
    }
}

/// Canonical encoding of a key value, used for deduplication and
/// cache lookup.
fn canonical_key(key: &Json) -> String {
    key.to_string()
}
