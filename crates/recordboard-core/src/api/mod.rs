//! Transport for record sheets.
//!
//! This module provides the `DocumentSource` seam the records service
//! fetches through, and `SheetClient`, which downloads the published CSV
//! export of each discipline's sheet over HTTP.

pub mod client;
pub mod error;

pub use client::{DocumentSource, SheetClient};
pub use error::FetchError;
