//! tzdb-import - TimeZoneDB reference-data importer
//!
//! Imports the TimeZoneDB zone list and per-zone UTC-offset transition
//! windows into a SQLite database: fetch the full list, fetch details for
//! each zone under the API's request-rate ceiling, then merge new detail
//! rows without duplicating existing ones.

pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{Error, Result};
