//! Telemetry / KPIs: records served passengers for analysis.

use bevy_ecs::prelude::{Entity, Resource};

/// One served passenger, recorded when the driver reaches the drop-off zone.
#[derive(Debug, Clone, Copy)]
pub struct ServedTripRecord {
    pub passenger: Entity,
    pub driver: Entity,
    pub completed_at: f64,
    pub waiting_time: f64,
}

/// Collects simulation telemetry. Insert as a resource to record drop-offs.
#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    pub served_trips: Vec<ServedTripRecord>,
    /// Passengers spawned into the run.
    pub passengers_spawned: usize,
    /// Arrivals that found no dispatchable driver and were backlogged.
    pub backlogged_total: u64,
}
