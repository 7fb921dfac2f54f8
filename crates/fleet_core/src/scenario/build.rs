use bevy_ecs::prelude::World;
use rand::rngs::StdRng;

use crate::clock::{EventKind, SimulationClock};
use crate::ecs::{Driver, DriverStatus, Passenger};
use crate::fleet_index::{StatusIndex, UnservedBacklog, ZoneIndex};
use crate::profiling::EventMetrics;
use crate::rng::SimRng;
use crate::scenario::params::ScenarioParams;
use crate::telemetry::SimTelemetry;
use crate::travel_time::TravelTimeOracle;

/// Builds one simulated day into `world`: inserts every resource, spawns
/// passengers and drivers, and seeds the event queue.
///
/// `rng` becomes the run's single generator; pass it in already advanced if
/// demand or shift planning drew from it first.
pub fn build_scenario(world: &mut World, params: ScenarioParams, rng: StdRng) {
    let oracle = TravelTimeOracle::new(params.od_matrix);
    let zone_count = oracle.zone_count();

    let mut clock = SimulationClock::default();
    let mut zones = ZoneIndex::new(zone_count);
    let mut statuses = StatusIndex::default();
    let mut telemetry = SimTelemetry::default();

    // Passengers first so entity ids follow arrival order.
    for record in &params.arrivals {
        let entity = world
            .spawn(Passenger::new(
                record.time,
                record.pulocationid,
                record.dolocationid,
                record.service,
            ))
            .id();
        clock.schedule_at(record.time, EventKind::PassengerArrival(entity));
    }
    telemetry.passengers_spawned = params.arrivals.len();

    for (index, spec) in params.drivers.iter().enumerate() {
        let driver = Driver::new(index as u32, spec.start_zone, spec.shift.start, spec.shift.end);
        let on_duty_at_zero = !driver.out_of_schedule(0.0);
        let entity = world.spawn(driver).id();

        // An empty window never activates; skip its events entirely.
        if spec.shift.start == spec.shift.end {
            statuses.register(entity, DriverStatus::Inactive);
            continue;
        }

        if on_duty_at_zero {
            statuses.register(entity, DriverStatus::Free);
            zones.add(spec.start_zone, entity);
        } else {
            statuses.register(entity, DriverStatus::Inactive);
        }
        clock.schedule_at(f64::from(spec.shift.start), EventKind::DriverArrival(entity));
        // Departure issued at time 0: fires at the shift end.
        clock.schedule_at(f64::from(spec.shift.end), EventKind::DriverDeparture(entity));
    }

    world.insert_resource(clock);
    world.insert_resource(zones);
    world.insert_resource(statuses);
    world.insert_resource(oracle);
    world.insert_resource(telemetry);
    world.insert_resource(UnservedBacklog::default());
    world.insert_resource(EventMetrics::default());
    world.insert_resource(SimRng::from(rng));
}
