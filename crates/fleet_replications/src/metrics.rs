//! Per-replication diagnostics extracted from a completed world.

use std::collections::BTreeMap;

use bevy_ecs::prelude::World;

use fleet_core::clock::SimulationClock;
use fleet_core::ecs::Passenger;
use fleet_core::fleet_index::UnservedBacklog;
use fleet_core::profiling::EventMetrics;
use fleet_core::shifts::ShiftPlan;
use fleet_core::telemetry::SimTelemetry;

/// Aggregated metrics from a single replication.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReplicationMetrics {
    pub replication: usize,
    pub passengers_total: usize,
    pub passengers_served: usize,
    /// Residual backlog at end of day; nonzero values are surfaced as a warning.
    pub passengers_unserved: usize,
    pub mean_waiting_time: f64,
    pub median_waiting_time: f64,
    pub drivers_total: usize,
    /// Worst per-minute staffing shortfall the shift plan left behind.
    pub shift_shortfall: i64,
    pub shift_target_met: bool,
    pub events_processed: u64,
    pub events_per_second: f64,
    pub queue_inserts: u64,
    pub queue_pops: u64,
    pub events_by_kind: BTreeMap<String, u64>,
}

/// Mean and median of a sample; zeros when empty.
fn waiting_stats(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
    let median = if sorted.len() % 2 == 0 {
        (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2.0
    } else {
        sorted[sorted.len() / 2]
    };
    (mean, median)
}

/// Extract metrics from a completed replication world.
pub fn extract_metrics(
    world: &mut World,
    replication: usize,
    drivers_total: usize,
    plan: &ShiftPlan,
) -> ReplicationMetrics {
    let waits: Vec<f64> = world
        .query::<&Passenger>()
        .iter(world)
        .filter_map(|p| p.waiting_time())
        .collect();
    let (mean_waiting_time, median_waiting_time) = waiting_stats(&waits);

    let telemetry = world.resource::<SimTelemetry>();
    let backlog = world.resource::<UnservedBacklog>();
    let event_metrics = world.resource::<EventMetrics>();
    let op_counts = world.resource::<SimulationClock>().op_counts();

    ReplicationMetrics {
        replication,
        passengers_total: telemetry.passengers_spawned,
        passengers_served: telemetry.served_trips.len(),
        passengers_unserved: backlog.len(),
        mean_waiting_time,
        median_waiting_time,
        drivers_total,
        shift_shortfall: plan.shortfall,
        shift_target_met: plan.met_target,
        events_processed: event_metrics.events_processed,
        events_per_second: event_metrics.events_per_second(),
        queue_inserts: op_counts.inserts,
        queue_pops: op_counts.pops,
        events_by_kind: event_metrics
            .events_by_kind
            .iter()
            .map(|(label, count)| (label.to_string(), *count))
            .collect(),
    }
}
