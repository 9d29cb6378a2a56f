//! Read-through cache of resolved entity details
//!
//! Entries are keyed by numeric id, with a secondary name index. Each miss
//! starts exactly one fetch per key; callers arriving while it is in flight
//! await the same shared future and observe the same outcome. Entries are
//! never evicted or overwritten.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{EntityDetail, EntityRef};
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::transport::JsonFetcher;

pub type DetailResult = Result<Arc<EntityDetail>, CatalogError>;

type SharedFetch = Shared<BoxFuture<'static, DetailResult>>;

/// What a caller asks the cache to resolve
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DetailKey {
    Id(u32),
    Ref(EntityRef),
    /// Already normalized (trimmed, lower-case)
    Name(String),
}

impl From<u32> for DetailKey {
    fn from(id: u32) -> Self {
        DetailKey::Id(id)
    }
}

impl From<EntityRef> for DetailKey {
    fn from(entity_ref: EntityRef) -> Self {
        DetailKey::Ref(entity_ref)
    }
}

impl From<&EntityRef> for DetailKey {
    fn from(entity_ref: &EntityRef) -> Self {
        DetailKey::Ref(entity_ref.clone())
    }
}

/// Identity of an in-flight fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum FlightKey {
    Id(u32),
    Name(String),
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<u32, Arc<EntityDetail>>,
    names: HashMap<String, u32>,
    in_flight: HashMap<FlightKey, SharedFetch>,
}

impl CacheState {
    fn lookup(&self, key: &DetailKey) -> Option<Arc<EntityDetail>> {
        let id = match key {
            DetailKey::Id(id) => Some(*id),
            DetailKey::Ref(entity_ref) => entity_ref
                .id_hint()
                .or_else(|| self.names.get(&entity_ref.name.to_lowercase()).copied()),
            DetailKey::Name(name) => self.names.get(name).copied(),
        }?;
        self.entries.get(&id).cloned()
    }

    /// First write for an id wins
    fn store(&mut self, detail: Arc<EntityDetail>) -> Arc<EntityDetail> {
        let stored = Arc::clone(self.entries.entry(detail.id).or_insert(detail));
        self.names.insert(stored.name.to_lowercase(), stored.id);
        stored
    }
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub in_flight: usize,
    /// Fetches started since creation
    pub fetches: usize,
}

/// Memoizes entity details for the lifetime of the process
pub struct DetailCache {
    fetcher: Arc<dyn JsonFetcher>,
    config: CatalogConfig,
    state: Arc<Mutex<CacheState>>,
    fetches: AtomicUsize,
}

impl DetailCache {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: CatalogConfig) -> Self {
        Self {
            fetcher,
            config,
            state: Arc::new(Mutex::new(CacheState::default())),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Resolve a ref, id or name to its detail, fetching at most once per key
    pub async fn resolve(&self, key: impl Into<DetailKey>) -> DetailResult {
        let key = key.into();

        let fetch = {
            let mut state = self.state.lock().await;

            if let Some(hit) = state.lookup(&key) {
                debug!("Detail cache hit for {:?} (id {})", key, hit.id);
                return Ok(hit);
            }

            let (flight, url) = self.flight_for(&key);
            match state.in_flight.get(&flight) {
                Some(existing) => {
                    debug!("Joining in-flight fetch for {:?}", flight);
                    existing.clone()
                }
                None => {
                    let fetch = self.start_fetch(flight.clone(), url);
                    state.in_flight.insert(flight, fetch.clone());
                    fetch
                }
            }
        };

        fetch.await
    }

    /// Cached detail for `id`, without touching the network
    pub async fn get(&self, id: u32) -> Option<Arc<EntityDetail>> {
        self.state.lock().await.entries.get(&id).cloned()
    }

    /// Cached detail for a normalized name, without touching the network
    pub async fn get_by_name(&self, name: &str) -> Option<Arc<EntityDetail>> {
        self.state.lock().await.lookup(&DetailKey::Name(name.to_string()))
    }

    /// Number of cached details
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        CacheStats {
            entries: state.entries.len(),
            in_flight: state.in_flight.len(),
            fetches: self.fetches.load(Ordering::Relaxed),
        }
    }

    fn flight_for(&self, key: &DetailKey) -> (FlightKey, String) {
        match key {
            DetailKey::Id(id) => (FlightKey::Id(*id), self.config.entity_url(*id)),
            DetailKey::Ref(entity_ref) => {
                let flight = match entity_ref.id_hint() {
                    Some(id) => FlightKey::Id(id),
                    None => FlightKey::Name(entity_ref.name.to_lowercase()),
                };
                (flight, entity_ref.detail_url.clone())
            }
            DetailKey::Name(name) => (FlightKey::Name(name.clone()), self.config.name_url(name)),
        }
    }

    /// Spawn the fetch so it completes and populates the cache even if every
    /// requester is dropped first
    fn start_fetch(&self, flight: FlightKey, url: String) -> SharedFetch {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        debug!("Detail cache miss, fetching {}", url);

        let fetcher = Arc::clone(&self.fetcher);
        let state = Arc::clone(&self.state);
        let task_url = url.clone();

        let task = tokio::spawn(async move {
            let result = match fetcher.fetch_json(&task_url).await {
                Ok(value) => EntityDetail::from_json(&task_url, &value).map(Arc::new),
                Err(err) => Err(CatalogError::from_http(&task_url, err)),
            };

            let mut state = state.lock().await;
            state.in_flight.remove(&flight);

            match result {
                Ok(detail) => Ok(state.store(detail)),
                Err(err) => {
                    if !err.is_not_found() {
                        warn!("Failed to resolve {}: {}", task_url, err);
                    }
                    Err(err)
                }
            }
        });

        async move {
            task.await.unwrap_or_else(|e| {
                Err(CatalogError::Network {
                    url,
                    message: format!("fetch task failed: {e}"),
                })
            })
        }
        .boxed()
        .shared()
    }
}
