//! Invariant checks shared by the integration suites.

use bevy_ecs::prelude::{Entity, World};

use fleet_core::ecs::{Driver, DriverStatus, MovementRecord, Passenger, MAX_PICKUP_QUEUE};
use fleet_core::fleet_index::{StatusIndex, UnservedBacklog, ZoneIndex};
use fleet_core::telemetry::SimTelemetry;
use fleet_core::zones::ZoneId;

/// Status partition, zone presence, and queue bound, checked at an event
/// boundary.
pub fn assert_fleet_invariants(world: &mut World) {
    let drivers: Vec<(Entity, ZoneId, usize, bool)> = world
        .query::<(Entity, &Driver)>()
        .iter(world)
        .map(|(entity, driver)| {
            (
                entity,
                driver.last_location,
                driver.queue_len(),
                driver.is_moving(),
            )
        })
        .collect();

    let statuses = world.resource::<StatusIndex>();
    let zones = world.resource::<ZoneIndex>();

    // The five buckets partition the driver set.
    let bucket_total: usize = DriverStatus::ALL.iter().map(|&s| statuses.count(s)).sum();
    assert_eq!(bucket_total, drivers.len(), "status buckets must partition the fleet");
    assert_eq!(statuses.driver_count(), drivers.len());

    let mut free_seen = 0;
    for &(entity, last_location, queue_len, is_moving) in &drivers {
        let status = statuses
            .status_of(entity)
            .expect("every driver is registered");
        assert!(queue_len <= MAX_PICKUP_QUEUE, "pickup queue exceeds its cap");

        let in_zone_index = zones.contains(last_location, entity);
        assert_eq!(
            in_zone_index,
            status == DriverStatus::Free,
            "driver {entity:?} zone presence disagrees with status {status:?}"
        );
        let working = matches!(
            status,
            DriverStatus::Busy | DriverStatus::MaxQueue | DriverStatus::MarkedForDeparture
        );
        assert_eq!(
            is_moving, working,
            "driver {entity:?} movement state disagrees with status {status:?}"
        );
        if status == DriverStatus::Free {
            free_seen += 1;
        }
    }
    assert_eq!(zones.total(), free_seen, "zone index holds exactly the free drivers");
}

/// Movement-history consistency for one driver: alternation, chained
/// non-decreasing timestamps, passengers only aboard on trip legs, and each
/// pause flowing into its trip from the same zone.
pub fn assert_movement_history_consistent(driver: &Driver) {
    let history = &driver.movement_history;
    for (index, record) in history.iter().enumerate() {
        assert_eq!(
            record.is_moving,
            index % 2 == 1,
            "records must alternate pause/trip"
        );
        assert!(record.start_time <= record.end_time);
        if index > 0 {
            assert_eq!(record.start_time, history[index - 1].end_time);
        }
        if !record.is_moving {
            assert!(!record.has_passenger, "pause records never carry a passenger");
        }
    }
    for pair in history.chunks(2) {
        if let [pause, trip] = pair {
            assert_eq!(pause.start_zone, trip.start_zone);
        }
    }
}

/// Replay property: each trip leg ends where the next pause begins, unless
/// the driver was re-activated at its start zone in between.
pub fn assert_replay_consistent(driver: &Driver) {
    let trips: Vec<&MovementRecord> = driver
        .movement_history
        .iter()
        .filter(|record| record.is_moving)
        .collect();
    let pauses: Vec<&MovementRecord> = driver
        .movement_history
        .iter()
        .filter(|record| !record.is_moving)
        .collect();

    for (trip, next_pause) in trips.iter().zip(pauses.iter().skip(1)) {
        assert!(
            next_pause.start_zone == trip.end_zone
                || next_pause.start_zone == driver.start_zone,
            "pause after a trip must resume at the drop-off zone or the shift start zone"
        );
    }
}

/// Conservation at end of run: every spawned passenger was either served
/// exactly once or sits in the backlog.
pub fn assert_conservation(world: &mut World) {
    let passengers: Vec<(Entity, Option<f64>)> = world
        .query::<(Entity, &Passenger)>()
        .iter(world)
        .map(|(entity, passenger)| (entity, passenger.departure_time))
        .collect();
    let served = passengers
        .iter()
        .filter(|(_, departure)| departure.is_some())
        .count();

    let telemetry = world.resource::<SimTelemetry>();
    let backlog = world.resource::<UnservedBacklog>();

    assert_eq!(
        served + backlog.len(),
        telemetry.passengers_spawned,
        "every arrival is served or backlogged"
    );
    assert_eq!(telemetry.served_trips.len(), served);

    let mut served_entities: Vec<Entity> =
        telemetry.served_trips.iter().map(|t| t.passenger).collect();
    served_entities.sort();
    served_entities.dedup();
    assert_eq!(served_entities.len(), served, "no passenger is served twice");
}

/// Waiting times are non-negative for every served passenger.
pub fn assert_waiting_times_non_negative(world: &mut World) {
    let violations: Vec<f64> = world
        .query::<&Passenger>()
        .iter(world)
        .filter_map(|p| p.waiting_time())
        .filter(|&w| w < 0.0)
        .collect();
    assert!(violations.is_empty(), "negative waiting times: {violations:?}");
}
