//! Builders for small dispatch scenarios.

use bevy_ecs::prelude::{Schedule, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use fleet_core::runner::{run_next_event, run_until_empty, simulation_schedule};
use fleet_core::scenario::{build_scenario, ArrivalRecord, DriverSpec, ScenarioParams};
use fleet_core::shifts::Shift;
use fleet_core::zones::{OdCell, OdMatrix, ZoneId};

use super::invariants::assert_fleet_invariants;

pub const MAX_STEPS: usize = 1_000_000;

/// Matrix where every pair (including intra-zone) is deterministic:
/// mean = min_clip = `minutes`, stdev = 0.
pub fn uniform_matrix(zone_count: usize, minutes: f64) -> OdMatrix {
    let mut od = OdMatrix::new(zone_count);
    let zones: Vec<ZoneId> = od.zones().collect();
    for &origin in &zones {
        for &destination in &zones {
            od.set(origin, destination, OdCell::new(minutes, 0.0, minutes, 1.0));
        }
    }
    od
}

pub fn arrival(time: f64, from: u16, to: u16, service: f64) -> ArrivalRecord {
    ArrivalRecord {
        time,
        pulocationid: ZoneId(from),
        dolocationid: ZoneId(to),
        service,
    }
}

pub fn driver(zone: u16, start: u32, end: u32) -> DriverSpec {
    DriverSpec {
        start_zone: ZoneId(zone),
        shift: Shift { start, end },
    }
}

pub fn build(
    od_matrix: OdMatrix,
    arrivals: Vec<ArrivalRecord>,
    drivers: Vec<DriverSpec>,
    seed: u64,
) -> (World, Schedule) {
    let mut world = World::new();
    build_scenario(
        &mut world,
        ScenarioParams {
            od_matrix,
            arrivals,
            drivers,
        },
        StdRng::seed_from_u64(seed),
    );
    (world, simulation_schedule())
}

/// Run to event-queue exhaustion.
pub fn drain(world: &mut World, schedule: &mut Schedule) -> usize {
    run_until_empty(world, schedule, MAX_STEPS)
}

/// Run to exhaustion, asserting the fleet invariants at every event boundary
/// and that popped event times never decrease.
pub fn drain_checked(world: &mut World, schedule: &mut Schedule) -> usize {
    let mut steps = 0;
    let mut last_time = f64::NEG_INFINITY;
    while run_next_event(world, schedule) {
        steps += 1;
        assert!(steps <= MAX_STEPS, "simulation did not terminate");

        let now = world
            .resource::<fleet_core::clock::SimulationClock>()
            .now();
        assert!(now >= last_time, "event times regressed: {last_time} -> {now}");
        last_time = now;

        assert_fleet_invariants(world);
    }
    steps
}
