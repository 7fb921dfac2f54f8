//! Handler for drop-offs: record the passenger's departure, then release or
//! re-task the driver.
//!
//! With an empty queue the driver idles in the drop-off zone; a pending
//! departure mark converts to a fresh departure request, an expired shift
//! triggers one, and otherwise a backlogged passenger is served if any
//! waits. With a nonempty queue the driver heads straight for the next
//! pickup.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{Driver, DriverStatus, Passenger};
use crate::fleet_index::{StatusIndex, UnservedBacklog, ZoneIndex};
use crate::rng::SimRng;
use crate::systems::dispatch::{dispatch_free_driver, schedule_driver_departure};
use crate::telemetry::{ServedTripRecord, SimTelemetry};
use crate::travel_time::TravelTimeOracle;

#[allow(clippy::too_many_arguments)]
pub fn trip_completed_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut zones: ResMut<ZoneIndex>,
    mut statuses: ResMut<StatusIndex>,
    mut backlog: ResMut<UnservedBacklog>,
    mut telemetry: ResMut<SimTelemetry>,
    oracle: Res<TravelTimeOracle>,
    mut rng: ResMut<SimRng>,
    mut drivers: Query<&mut Driver>,
    mut passengers: Query<&mut Passenger>,
) {
    let EventKind::TripCompleted {
        driver: driver_entity,
        passenger: passenger_entity,
    } = event.0.kind
    else {
        return;
    };
    let now = event.0.time;

    let dropoff = {
        let mut passenger = passengers
            .get_mut(passenger_entity)
            .expect("on-board passenger exists");
        passenger.departure_time = Some(now);
        telemetry.served_trips.push(ServedTripRecord {
            passenger: passenger_entity,
            driver: driver_entity,
            completed_at: now,
            waiting_time: passenger.waiting_time().unwrap_or_default(),
        });
        passenger.end_zone
    };

    let mut driver = drivers
        .get_mut(driver_entity)
        .expect("trip driver exists");
    driver.passenger = None;
    driver.record_end_of_movement(now, dropoff, Some(passenger_entity));

    if driver.peek_queue().is_none() {
        zones.add(dropoff, driver_entity);

        if statuses.contains(driver_entity, DriverStatus::MarkedForDeparture) {
            statuses.shift(
                driver_entity,
                DriverStatus::MarkedForDeparture,
                DriverStatus::Free,
            );
            schedule_driver_departure(&mut clock, driver_entity, driver.schedule_end, now);
            return;
        }
        statuses.shift(driver_entity, DriverStatus::Busy, DriverStatus::Free);

        if driver.out_of_schedule(now) {
            schedule_driver_departure(&mut clock, driver_entity, driver.schedule_end, now);
        } else if let Some(unserved_entity) = backlog.pop_front() {
            let pickup = passengers
                .get(unserved_entity)
                .expect("backlogged passenger exists")
                .start_zone;
            dispatch_free_driver(
                &mut clock,
                &mut zones,
                &mut statuses,
                &oracle,
                &mut rng,
                driver_entity,
                &mut driver,
                unserved_entity,
                pickup,
            );
        }
    } else {
        driver.record_start_of_movement(now, dropoff);
        let next_entity = driver.peek_queue().expect("queue is nonempty");
        let next_pickup = passengers
            .get(next_entity)
            .expect("queued passenger exists")
            .start_zone;
        let travel = oracle.sample(&mut rng.0, dropoff, next_pickup);
        clock.schedule_in(
            travel,
            EventKind::MovementCompleted {
                driver: driver_entity,
                from: dropoff,
                to: next_pickup,
            },
        );
    }
}
