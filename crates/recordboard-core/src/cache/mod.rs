//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing and retrieving the
//! raw sheet export of each discipline together with its fetch time. Data
//! is considered stale after 24 hours.
//!
//! Storage goes through the `KeyValueStore` trait:
//! - `FileStore`: one JSON file per key, survives restarts
//! - `MemoryStore`: in-process only, used by tests

pub mod manager;
pub mod store;

pub use manager::{age_display, is_stale_at, CacheAges, CacheManager, CachedDocument, CACHE_STALE_HOURS};
pub use store::{FileStore, KeyValueStore, MemoryStore};
