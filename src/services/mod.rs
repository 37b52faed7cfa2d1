//! Fetch and orchestration services

pub mod batch_fetcher;
pub mod import_orchestrator;
pub mod timezonedb_client;
