//! Records service: cached loading, refresh, and leaderboard queries.
//!
//! `Records` owns the current decoded snapshot of every discipline. Loading
//! consults the offline cache first and only goes to the network when
//! nothing is cached. Stale cached data is served immediately while a
//! background task refreshes it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{DocumentSource, FetchError};
use crate::cache::{is_stale_at, CacheManager, KeyValueStore};
use crate::models::{Dataset, Discipline};
use crate::query::{self, Leaderboard, LeaderboardRequest};

// ============================================================================
// Errors and outcomes
// ============================================================================

#[derive(Error, Debug)]
pub enum RecordsError {
    /// Nothing cached and the fetch failed: there is no data to show.
    #[error("No {discipline} data available: {source}")]
    Unavailable {
        discipline: Discipline,
        #[source]
        source: FetchError,
    },

    #[error("{0} data has not been loaded")]
    NotLoaded(Discipline),
}

/// Handle to a refresh running in the background.
#[derive(Debug)]
pub struct BackgroundRefresh {
    handle: JoinHandle<Option<Arc<Dataset>>>,
}

impl BackgroundRefresh {
    /// Wait for the refresh. Returns the new snapshot on success, `None`
    /// when it failed and the cached data stayed in place.
    pub async fn finished(self) -> Option<Arc<Dataset>> {
        self.handle.await.ok().flatten()
    }
}

/// Where the data returned by `ensure_loaded` came from.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing was cached; fetched from the network.
    Fetched,
    /// Served from a fresh cache entry, or from a stale one while offline.
    Cached,
    /// Served from a stale cache entry; a refresh is running.
    CachedRefreshing(BackgroundRefresh),
}

#[derive(Debug)]
pub struct Loaded {
    pub dataset: Arc<Dataset>,
    pub outcome: LoadOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshStatus {
    Refreshed { records: usize },
    Failed(String),
    SkippedOffline,
}

/// Per-discipline results of `refresh_all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub results: Vec<(Discipline, RefreshStatus)>,
}

impl RefreshReport {
    pub fn status(&self, discipline: Discipline) -> Option<&RefreshStatus> {
        self.results
            .iter()
            .find(|(d, _)| *d == discipline)
            .map(|(_, status)| status)
    }

    pub fn all_refreshed(&self) -> bool {
        self.results
            .iter()
            .all(|(_, status)| matches!(status, RefreshStatus::Refreshed { .. }))
    }

    pub fn failures(&self) -> Vec<Discipline> {
        self.results
            .iter()
            .filter(|(_, status)| matches!(status, RefreshStatus::Failed(_)))
            .map(|(d, _)| *d)
            .collect()
    }
}

// ============================================================================
// Connectivity
// ============================================================================

/// Shared online/offline flag. Opportunistic refreshes only run online.
#[derive(Debug, Clone)]
pub struct Connectivity(Arc<AtomicBool>);

impl Connectivity {
    pub fn new(online: bool) -> Self {
        Self(Arc::new(AtomicBool::new(online)))
    }

    pub fn is_online(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set_online(&self, online: bool) {
        self.0.store(online, Ordering::Relaxed);
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

// ============================================================================
// Service
// ============================================================================

struct Inner {
    cache: CacheManager,
    source: Arc<dyn DocumentSource>,
    connectivity: Connectivity,
    datasets: RwLock<HashMap<Discipline, Arc<Dataset>>>,
}

/// Clone is cheap - all state is behind one Arc.
#[derive(Clone)]
pub struct Records {
    inner: Arc<Inner>,
}

impl Records {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        source: Arc<dyn DocumentSource>,
        connectivity: Connectivity,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                cache: CacheManager::new(store),
                source,
                connectivity,
                datasets: RwLock::new(HashMap::new()),
            }),
        }
    }

    pub fn cache(&self) -> &CacheManager {
        &self.inner.cache
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.inner.connectivity
    }

    /// Current snapshot for a discipline, if one has been loaded.
    pub async fn dataset(&self, discipline: Discipline) -> Option<Arc<Dataset>> {
        self.inner.datasets.read().await.get(&discipline).cloned()
    }

    /// Swap in a fully decoded snapshot. Other disciplines are untouched.
    async fn install(&self, dataset: Dataset) -> Arc<Dataset> {
        let discipline = dataset.discipline;
        let dataset = Arc::new(dataset);
        self.inner
            .datasets
            .write()
            .await
            .insert(discipline, Arc::clone(&dataset));
        dataset
    }

    /// Make a discipline's data available, preferring the offline cache.
    ///
    /// A cache hit is returned immediately; if it is stale and we are
    /// online, a background refresh is started whose failure is ignored.
    /// A cache miss requires a successful fetch.
    pub async fn ensure_loaded(&self, discipline: Discipline) -> Result<Loaded, RecordsError> {
        match self.inner.cache.load(discipline).await {
            Ok(Some(cached)) => {
                let dataset = self
                    .install(Dataset::decode(discipline, &cached.text, cached.fetched_at))
                    .await;

                let outcome = if cached.is_stale() && self.inner.connectivity.is_online() {
                    info!(discipline = %discipline, age = %cached.age_display(), "Cached data is stale, refreshing in background");
                    LoadOutcome::CachedRefreshing(self.spawn_refresh(discipline))
                } else {
                    debug!(discipline = %discipline, "Serving cached data");
                    LoadOutcome::Cached
                };
                return Ok(Loaded { dataset, outcome });
            }
            Ok(None) => {}
            Err(e) => {
                warn!(discipline = %discipline, error = %e, "Failed to read cache, fetching instead");
            }
        }

        let dataset = self
            .refresh_one(discipline)
            .await
            .map_err(|source| RecordsError::Unavailable { discipline, source })?;

        Ok(Loaded {
            dataset,
            outcome: LoadOutcome::Fetched,
        })
    }

    /// `ensure_loaded` for every discipline, concurrently.
    pub async fn ensure_all_loaded(&self) -> Vec<(Discipline, Result<Loaded, RecordsError>)> {
        join_all(
            Discipline::ALL
                .map(|discipline| async move { (discipline, self.ensure_loaded(discipline).await) }),
        )
        .await
    }

    fn spawn_refresh(&self, discipline: Discipline) -> BackgroundRefresh {
        let records = self.clone();
        let handle = tokio::spawn(async move {
            match records.refresh_one(discipline).await {
                Ok(dataset) => Some(dataset),
                Err(e) => {
                    warn!(discipline = %discipline, error = %e, "Background refresh failed, keeping cached data");
                    None
                }
            }
        });
        BackgroundRefresh { handle }
    }

    /// Fetch a discipline unconditionally, update the cache, and install the
    /// new snapshot.
    ///
    /// A cache write failure is logged; the fetched data is still installed.
    pub async fn refresh_one(&self, discipline: Discipline) -> Result<Arc<Dataset>, FetchError> {
        info!(discipline = %discipline, "Refreshing");
        let text = self.inner.source.fetch_document(discipline).await?;
        let fetched_at = Utc::now();

        if let Err(e) = self.inner.cache.save(discipline, &text, fetched_at).await {
            warn!(discipline = %discipline, error = %e, "Failed to write cache");
        }

        let dataset = self
            .install(Dataset::decode(discipline, &text, Some(fetched_at)))
            .await;
        info!(discipline = %discipline, count = dataset.len(), "Refresh complete");
        Ok(dataset)
    }

    /// Refresh every discipline independently. Never fails; one discipline's
    /// failure leaves its previous data in place and does not affect others.
    pub async fn refresh_all(&self) -> RefreshReport {
        if !self.inner.connectivity.is_online() {
            info!("Offline, skipping refresh");
            return RefreshReport {
                results: Discipline::ALL
                    .into_iter()
                    .map(|d| (d, RefreshStatus::SkippedOffline))
                    .collect(),
            };
        }

        let results = join_all(Discipline::ALL.map(|discipline| async move {
            let status = match self.refresh_one(discipline).await {
                Ok(dataset) => RefreshStatus::Refreshed {
                    records: dataset.len(),
                },
                Err(e) => {
                    warn!(discipline = %discipline, error = %e, "Refresh failed, keeping cached data");
                    RefreshStatus::Failed(e.to_string())
                }
            };
            (discipline, status)
        }))
        .await;

        RefreshReport { results }
    }

    /// Refresh everything when online and the newest cached sheet is missing
    /// or older than the staleness window. Returns `None` when no refresh
    /// was needed or possible.
    pub async fn refresh_all_if_stale(&self) -> Option<RefreshReport> {
        if !self.inner.connectivity.is_online() {
            return None;
        }
        if !is_stale_at(self.last_updated().await) {
            debug!("Cache is fresh, no refresh needed");
            return None;
        }
        Some(self.refresh_all().await)
    }

    /// Most recent successful fetch across all disciplines.
    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        match self.inner.cache.latest_fetched_at().await {
            Ok(latest) => latest,
            Err(e) => {
                warn!(error = %e, "Failed to read cache timestamps");
                None
            }
        }
    }

    /// Rank the loaded snapshot for the request's discipline.
    ///
    /// `Err(NotLoaded)` means there is no data at all; `Ok` with zero rows
    /// means the leaderboard is genuinely empty.
    pub async fn leaderboard(&self, request: &LeaderboardRequest) -> Result<Leaderboard, RecordsError> {
        let dataset = self.loaded(request.discipline).await?;
        Ok(query::leaderboard(&dataset.records, request))
    }

    pub async fn available_events(&self, discipline: Discipline) -> Result<Vec<String>, RecordsError> {
        let dataset = self.loaded(discipline).await?;
        Ok(query::available_events(&dataset.records))
    }

    pub async fn available_years(&self, request: &LeaderboardRequest) -> Result<Vec<String>, RecordsError> {
        let dataset = self.loaded(request.discipline).await?;
        Ok(query::available_years(&dataset.records, request))
    }

    async fn loaded(&self, discipline: Discipline) -> Result<Arc<Dataset>, RecordsError> {
        self.dataset(discipline)
            .await
            .ok_or(RecordsError::NotLoaded(discipline))
    }
}

// ============================================================================
// Tests
// ============================================================================
