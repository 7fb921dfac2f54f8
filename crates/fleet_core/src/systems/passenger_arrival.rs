//! Handler for passenger arrivals: match a driver or backlog the request.
//!
//! Selection order: a free driver in the pickup zone, then a free driver in
//! one of the closest zones (any free driver as a last resort), then the
//! queue of any busy driver. Drivers at the queue cap or marked for
//! departure are not eligible; with nobody dispatchable the passenger goes
//! to the unserved backlog.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{Driver, DriverStatus, Passenger};
use crate::fleet_index::{StatusIndex, UnservedBacklog, ZoneIndex};
use crate::rng::SimRng;
use crate::systems::dispatch::{dispatch_free_driver, NEARBY_ZONE_LIMIT};
use crate::telemetry::SimTelemetry;
use crate::travel_time::TravelTimeOracle;

#[allow(clippy::too_many_arguments)]
pub fn passenger_arrival_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut zones: ResMut<ZoneIndex>,
    mut statuses: ResMut<StatusIndex>,
    mut backlog: ResMut<UnservedBacklog>,
    mut telemetry: ResMut<SimTelemetry>,
    oracle: Res<TravelTimeOracle>,
    mut rng: ResMut<SimRng>,
    mut drivers: Query<&mut Driver>,
    passengers: Query<&Passenger>,
) {
    let EventKind::PassengerArrival(passenger_entity) = event.0.kind else {
        return;
    };
    let passenger = passengers
        .get(passenger_entity)
        .expect("arriving passenger exists");
    let pickup = passenger.start_zone;

    // A free driver already waiting in the pickup zone.
    if let Some(driver_entity) = zones.any(pickup) {
        let mut driver = drivers
            .get_mut(driver_entity)
            .expect("indexed driver exists");
        dispatch_free_driver(
            &mut clock,
            &mut zones,
            &mut statuses,
            &oracle,
            &mut rng,
            driver_entity,
            &mut driver,
            passenger_entity,
            pickup,
        );
        return;
    }

    // A free driver elsewhere: try the closest zones first, else anyone free.
    if statuses.count(DriverStatus::Free) > 0 {
        let nearby = oracle
            .closest_zones(pickup)
            .iter()
            .copied()
            .take(NEARBY_ZONE_LIMIT);
        let driver_entity = zones
            .any_of(nearby)
            .map(|(_, driver)| driver)
            .or_else(|| statuses.any(DriverStatus::Free))
            .expect("free bucket is nonempty");
        let mut driver = drivers
            .get_mut(driver_entity)
            .expect("free driver exists");
        dispatch_free_driver(
            &mut clock,
            &mut zones,
            &mut statuses,
            &oracle,
            &mut rng,
            driver_entity,
            &mut driver,
            passenger_entity,
            pickup,
        );
        return;
    }

    // No idle capacity: queue onto a working driver below the cap.
    if let Some(driver_entity) = statuses.any(DriverStatus::Busy) {
        let mut driver = drivers
            .get_mut(driver_entity)
            .expect("busy driver exists");
        driver.enqueue(passenger_entity);
        if driver.at_max_queue() {
            statuses.shift(driver_entity, DriverStatus::Busy, DriverStatus::MaxQueue);
        }
        return;
    }

    backlog.push_back(passenger_entity);
    telemetry.backlogged_total += 1;
}
