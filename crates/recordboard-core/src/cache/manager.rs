use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::debug;

use super::KeyValueStore;
use crate::models::Discipline;

/// Consider cached sheets stale after 24 hours.
pub const CACHE_STALE_HOURS: i64 = 24;

fn text_key(discipline: Discipline) -> String {
    format!("csv_{}", discipline.key())
}

fn timestamp_key(discipline: Discipline) -> String {
    format!("csv_ts_{}", discipline.key())
}

/// Human-friendly age: "just now", "5m ago", "3h ago", "2d ago".
pub fn age_display(minutes: i64) -> String {
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        let remaining_mins = minutes % 60;
        if remaining_mins >= 30 {
            // Round up: 1h 30m+ becomes 2h
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        let remaining_hours = (minutes % 1440) / 60;
        if remaining_hours >= 12 {
            // Round up: 1d 12h+ becomes 2d
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

/// True when `fetched_at` is unknown or older than the staleness window.
pub fn is_stale_at(fetched_at: Option<DateTime<Utc>>) -> bool {
    match fetched_at {
        Some(at) => Utc::now() - at > Duration::hours(CACHE_STALE_HOURS),
        None => true,
    }
}

/// A cached sheet export and when it was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedDocument {
    pub text: String,
    /// `None` when the timestamp entry is missing or unreadable.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl CachedDocument {
    pub fn age_minutes(&self) -> Option<i64> {
        self.fetched_at.map(|at| (Utc::now() - at).num_minutes())
    }

    pub fn age_display(&self) -> String {
        self.age_minutes()
            .map(age_display)
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn is_stale(&self) -> bool {
        is_stale_at(self.fetched_at)
    }
}

/// Per-discipline sheet cache on top of a durable key-value store.
///
/// Each discipline uses two keys: `csv_<key>` holds the raw document and
/// `csv_ts_<key>` the fetch time in epoch milliseconds.
#[derive(Clone)]
pub struct CacheManager {
    store: Arc<dyn KeyValueStore>,
}

impl CacheManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, discipline: Discipline) -> Result<Option<CachedDocument>> {
        let Some(text) = self.store.get(&text_key(discipline)).await? else {
            debug!(discipline = %discipline, "Cache miss");
            return Ok(None);
        };
        let fetched_at = self.fetched_at(discipline).await?;
        debug!(discipline = %discipline, bytes = text.len(), "Cache hit");
        Ok(Some(CachedDocument { text, fetched_at }))
    }

    /// Store a freshly fetched document, replacing any previous entry.
    pub async fn save(&self, discipline: Discipline, text: &str, at: DateTime<Utc>) -> Result<()> {
        self.store.put(&text_key(discipline), text).await?;
        self.store
            .put(&timestamp_key(discipline), &at.timestamp_millis().to_string())
            .await?;
        Ok(())
    }

    pub async fn clear(&self, discipline: Discipline) -> Result<()> {
        self.store.delete(&text_key(discipline)).await?;
        self.store.delete(&timestamp_key(discipline)).await?;
        Ok(())
    }

    pub async fn fetched_at(&self, discipline: Discipline) -> Result<Option<DateTime<Utc>>> {
        let raw = self.store.get(&timestamp_key(discipline)).await?;
        Ok(raw.and_then(|s| parse_millis(&s)))
    }

    /// Most recent fetch time across all disciplines.
    pub async fn latest_fetched_at(&self) -> Result<Option<DateTime<Utc>>> {
        let mut latest = None;
        for discipline in Discipline::ALL {
            latest = latest.max(self.fetched_at(discipline).await?);
        }
        Ok(latest)
    }

    /// Cache age per discipline, for status display. Read errors show as
    /// "never" rather than failing.
    pub async fn get_cache_ages(&self) -> CacheAges {
        let mut ages = CacheAges::default();
        for discipline in Discipline::ALL {
            let age = match self.fetched_at(discipline).await {
                Ok(at) => at.map(|at| age_display((Utc::now() - at).num_minutes())),
                Err(e) => {
                    debug!(discipline = %discipline, error = %e, "Failed to load cache for age display");
                    None
                }
            };
            match discipline {
                Discipline::Competition => ages.competition = age,
                Discipline::Training => ages.training = age,
                Discipline::CrossCountry => ages.xc = age,
            }
        }
        ages
    }
}

fn parse_millis(raw: &str) -> Option<DateTime<Utc>> {
    let millis = raw.trim().parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheAges {
    pub competition: Option<String>,
    pub training: Option<String>,
    pub xc: Option<String>,
}

impl CacheAges {
    pub fn for_discipline(&self, discipline: Discipline) -> String {
        let age = match discipline {
            Discipline::Competition => &self.competition,
            Discipline::Training => &self.training,
            Discipline::CrossCountry => &self.xc,
        };
        age.clone().unwrap_or_else(|| "never".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
