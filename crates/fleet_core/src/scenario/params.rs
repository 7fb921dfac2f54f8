use serde::{Deserialize, Serialize};

use crate::shifts::Shift;
use crate::zones::{OdMatrix, ZoneId};

/// One row of the arrival table: a passenger request with a pre-sampled ride
/// duration. Field names match the input table columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrivalRecord {
    /// Request time in minutes from midnight.
    pub time: f64,
    /// Pickup zone.
    pub pulocationid: ZoneId,
    /// Drop-off zone.
    pub dolocationid: ZoneId,
    /// On-board ride duration in minutes.
    pub service: f64,
}

/// A rostered driver: a start zone plus a work interval.
#[derive(Debug, Clone, Copy)]
pub struct DriverSpec {
    pub start_zone: ZoneId,
    pub shift: Shift,
}

/// Parameters for building one simulated day.
#[derive(Debug, Clone)]
pub struct ScenarioParams {
    pub od_matrix: OdMatrix,
    /// Passenger requests, sorted by time.
    pub arrivals: Vec<ArrivalRecord>,
    pub drivers: Vec<DriverSpec>,
}
