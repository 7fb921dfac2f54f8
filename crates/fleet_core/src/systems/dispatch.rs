//! Shared dispatch helpers used by several event handlers.

use bevy_ecs::prelude::Entity;

use crate::clock::{EventKind, SimulationClock};
use crate::ecs::{Driver, DriverStatus};
use crate::fleet_index::{StatusIndex, ZoneIndex};
use crate::rng::SimRng;
use crate::travel_time::TravelTimeOracle;
use crate::zones::ZoneId;

/// How many of the closest zones are searched before falling back to any
/// free driver anywhere.
pub const NEARBY_ZONE_LIMIT: usize = 5;

/// Send a free driver toward a passenger's pickup zone.
///
/// The driver leaves the zone index, shifts Free → Busy, queues the
/// passenger, and a reposition leg of sampled duration is scheduled from the
/// driver's current zone. A driver already in the pickup zone still incurs a
/// sampled intra-zone leg before the trip begins.
#[allow(clippy::too_many_arguments)]
pub fn dispatch_free_driver(
    clock: &mut SimulationClock,
    zones: &mut ZoneIndex,
    statuses: &mut StatusIndex,
    oracle: &TravelTimeOracle,
    rng: &mut SimRng,
    driver_entity: Entity,
    driver: &mut Driver,
    passenger_entity: Entity,
    pickup_zone: ZoneId,
) {
    let from = driver.last_location;
    zones.remove(from, driver_entity);
    statuses.shift(driver_entity, DriverStatus::Free, DriverStatus::Busy);
    driver.enqueue(passenger_entity);
    driver.record_start_of_movement(clock.now(), pickup_zone);

    let travel = oracle.sample(&mut rng.0, from, pickup_zone);
    clock.schedule_in(
        travel,
        EventKind::MovementCompleted {
            driver: driver_entity,
            from,
            to: pickup_zone,
        },
    );
}

/// Departures are never scheduled in the past: `time = max(issued, shift end)`.
pub fn schedule_driver_departure(
    clock: &mut SimulationClock,
    driver_entity: Entity,
    schedule_end: u32,
    issued_at: f64,
) {
    let at = issued_at.max(f64::from(schedule_end));
    clock.schedule_at(at, EventKind::DriverDeparture(driver_entity));
}
