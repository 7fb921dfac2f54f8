//! Handler for completed reposition legs: the driver picks up the queue head
//! and the trip itself begins.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{Driver, DriverStatus, Passenger};
use crate::fleet_index::StatusIndex;

pub fn movement_completed_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut statuses: ResMut<StatusIndex>,
    mut drivers: Query<&mut Driver>,
    passengers: Query<&Passenger>,
) {
    let EventKind::MovementCompleted {
        driver: driver_entity,
        to,
        ..
    } = event.0.kind
    else {
        return;
    };
    let now = event.0.time;

    let mut driver = drivers
        .get_mut(driver_entity)
        .expect("moving driver exists");
    let passenger_entity = driver
        .pop_queue()
        .expect("a completed movement implies a queued pickup");

    // Popping below the cap makes the driver eligible for new queueing again.
    if statuses.contains(driver_entity, DriverStatus::MaxQueue) && !driver.at_max_queue() {
        statuses.shift(driver_entity, DriverStatus::MaxQueue, DriverStatus::Busy);
    }

    // Arrival at the pickup point and trip start are back-to-back.
    driver.record_end_of_movement(now, to, None);
    driver.record_start_of_movement(now, to);
    driver.passenger = Some(passenger_entity);

    let passenger = passengers
        .get(passenger_entity)
        .expect("queued passenger exists");
    clock.schedule_in(
        passenger.service_duration,
        EventKind::TripCompleted {
            driver: driver_entity,
            passenger: passenger_entity,
        },
    );
}
