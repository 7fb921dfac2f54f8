//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each
//! step pops the next event from [SimulationClock], inserts it as
//! [CurrentEvent], then runs the schedule.

use bevy_ecs::prelude::Res;
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::profiling::EventMetrics;
use crate::systems::{
    driver_arrival::driver_arrival_system, driver_departure::driver_departure_system,
    movement_completed::movement_completed_system, passenger_arrival::passenger_arrival_system,
    trip_completed::trip_completed_system,
};

// Condition functions for each event kind
fn is_passenger_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::PassengerArrival(_)))
        .unwrap_or(false)
}

fn is_driver_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::DriverArrival(_)))
        .unwrap_or(false)
}

fn is_driver_departure(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::DriverDeparture(_)))
        .unwrap_or(false)
}

fn is_movement_completed(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::MovementCompleted { .. }))
        .unwrap_or(false)
}

fn is_trip_completed(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::TripCompleted { .. }))
        .unwrap_or(false)
}

/// Runs one simulation step: pops the next event, inserts it as
/// [CurrentEvent], then runs the schedule. Returns `true` if an event was
/// processed, `false` if the clock was empty.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));

    // Track event metrics if the EventMetrics resource exists
    if let Some(mut metrics) = world.get_resource_mut::<EventMetrics>() {
        metrics.record_event(&event.kind);
    }

    schedule.run(world);
    true
}

/// Runs simulation steps until the event queue is empty or `max_steps` is
/// reached. Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Builds the default simulation schedule: one handler per event kind,
/// gated by run conditions so only the matching handler does work.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.add_systems((
        passenger_arrival_system.run_if(is_passenger_arrival),
        driver_arrival_system.run_if(is_driver_arrival),
        driver_departure_system.run_if(is_driver_departure),
        movement_completed_system.run_if(is_movement_completed),
        trip_completed_system.run_if(is_trip_completed),
    ));

    schedule
}
