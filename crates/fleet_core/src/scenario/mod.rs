//! Scenario assembly: parameters plus world construction.

mod build;
mod params;

pub use build::build_scenario;
pub use params::{ArrivalRecord, DriverSpec, ScenarioParams};
