//! Handler for shift starts: activate the driver at its start zone and
//! drain one backlogged request if any waits.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{Driver, DriverStatus, Passenger};
use crate::fleet_index::{StatusIndex, UnservedBacklog, ZoneIndex};
use crate::rng::SimRng;
use crate::systems::dispatch::dispatch_free_driver;
use crate::travel_time::TravelTimeOracle;

#[allow(clippy::too_many_arguments)]
pub fn driver_arrival_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut zones: ResMut<ZoneIndex>,
    mut statuses: ResMut<StatusIndex>,
    mut backlog: ResMut<UnservedBacklog>,
    oracle: Res<TravelTimeOracle>,
    mut rng: ResMut<SimRng>,
    mut drivers: Query<&mut Driver>,
    passengers: Query<&Passenger>,
) {
    let EventKind::DriverArrival(driver_entity) = event.0.kind else {
        return;
    };
    // Already on duty: shifts that were active at time 0 get their arrival
    // event anyway, and it must not re-activate them.
    if !statuses.contains(driver_entity, DriverStatus::Inactive) {
        return;
    }

    let mut driver = drivers
        .get_mut(driver_entity)
        .expect("arriving driver exists");
    driver.last_location = driver.start_zone;
    statuses.shift(driver_entity, DriverStatus::Inactive, DriverStatus::Free);
    zones.add(driver.start_zone, driver_entity);

    if let Some(unserved_entity) = backlog.pop_front() {
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
}
