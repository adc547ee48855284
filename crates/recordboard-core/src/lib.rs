//! Core library for recordboard.
//!
//! Decodes published record sheets for three disciplines (competition,
//! training and cross-country), ranks them into leaderboards, and keeps an
//! offline cache of every sheet so leaderboards render without a network.
//!
//! Front ends build a [`Records`] service over a [`KeyValueStore`] and a
//! [`DocumentSource`], then ask it for [`Leaderboard`]s.

pub mod api;
pub mod cache;
pub mod classify;
pub mod config;
pub mod marks;
pub mod models;
pub mod query;
pub mod records;
pub mod table;

pub use api::{DocumentSource, FetchError, SheetClient};
pub use cache::{CacheManager, FileStore, KeyValueStore, MemoryStore};
pub use classify::SortDirection;
pub use config::Config;
pub use models::{Dataset, Discipline, Gender, Performance, Record};
pub use query::{Board, Leaderboard, LeaderboardRequest, Limit, Medal, RankedEntry, YearScope, YearSection};
pub use records::{Connectivity, LoadOutcome, Loaded, Records, RecordsError, RefreshReport, RefreshStatus};
