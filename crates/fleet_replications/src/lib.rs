//! Replication driver for the fleet simulation: input ingestion, demand
//! synthesis, per-day runs, metrics extraction, and columnar export.

pub mod demand;
pub mod export;
pub mod inputs;
pub mod logging;
pub mod metrics;
pub mod runner;
