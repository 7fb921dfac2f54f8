//! Handler for shift-end requests: idle drivers retire immediately, working
//! drivers are marked and retire at their next empty-queue drop-off.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind};
use crate::ecs::{Driver, DriverStatus};
use crate::fleet_index::{StatusIndex, ZoneIndex};

pub fn driver_departure_system(
    event: Res<CurrentEvent>,
    mut zones: ResMut<ZoneIndex>,
    mut statuses: ResMut<StatusIndex>,
    drivers: Query<&Driver>,
) {
    let EventKind::DriverDeparture(driver_entity) = event.0.kind else {
        return;
    };

    match statuses.status_of(driver_entity) {
        Some(DriverStatus::Free) => {
            let driver = drivers.get(driver_entity).expect("departing driver exists");
            zones.remove(driver.last_location, driver_entity);
            statuses.shift(driver_entity, DriverStatus::Free, DriverStatus::Inactive);
        }
        Some(DriverStatus::Busy) => {
            statuses.shift(
                driver_entity,
                DriverStatus::Busy,
                DriverStatus::MarkedForDeparture,
            );
        }
        Some(DriverStatus::MaxQueue) => {
            statuses.shift(
                driver_entity,
                DriverStatus::MaxQueue,
                DriverStatus::MarkedForDeparture,
            );
        }
        // Already inactive or marked: nothing to do.
        _ => {}
    }
}
