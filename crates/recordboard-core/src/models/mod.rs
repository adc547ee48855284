//! Data models for track, field, and cross-country records.
//!
//! This module contains the data structures decoded from the record sheets:
//!
//! - `Discipline`: which sheet (and column layout) a record came from
//! - `Gender`: normalized gender bucket
//! - `Record`, `CompetitionRecord`, `SoloRecord`: one observed performance
//! - `Performance`: capabilities shared by every record variant
//! - `Dataset`: an immutable, fully decoded snapshot of one sheet

pub mod dataset;
pub mod discipline;
pub mod record;

pub use dataset::Dataset;
pub use discipline::{Discipline, Gender};
pub use record::{CompetitionRecord, Details, Leg, Performance, Record, SoloRecord};
