mod support;

use bevy_ecs::prelude::World;

use fleet_core::ecs::{Driver, DriverStatus, Passenger};
use fleet_core::fleet_index::{StatusIndex, UnservedBacklog};
use fleet_core::telemetry::SimTelemetry;
use fleet_core::zones::{OdCell, OdMatrix, ZoneId};

use support::world::{arrival, build, drain, driver, uniform_matrix};

fn waiting_times(world: &mut World) -> Vec<f64> {
    world
        .query::<&Passenger>()
        .iter(world)
        .map(|p| p.waiting_time().expect("passenger served"))
        .collect()
}

fn only_driver_status(world: &mut World) -> DriverStatus {
    let entity = world
        .query::<(bevy_ecs::prelude::Entity, &Driver)>()
        .iter(world)
        .map(|(entity, _)| entity)
        .next()
        .expect("one driver");
    world
        .resource::<StatusIndex>()
        .status_of(entity)
        .expect("driver registered")
}

#[test]
fn single_passenger_same_zone_goes_through_an_intra_zone_leg() {
    // Zone 1 has no intra-zone data, so the reposition leg is an
    // exponential draw with the default time into zone 1.
    let mut od = OdMatrix::new(2);
    od.set(ZoneId(1), ZoneId(2), OdCell::new(3.0, 0.0, 3.0, 100.0));
    od.set(ZoneId(2), ZoneId(1), OdCell::new(0.1, 0.0, 0.1, 10.0));

    let (mut world, mut schedule) = build(
        od,
        vec![arrival(10.0, 1, 2, 5.0)],
        vec![driver(1, 0, 1439)],
        42,
    );
    drain(&mut world, &mut schedule);

    let waits = waiting_times(&mut world);
    assert_eq!(waits.len(), 1);
    // The wait is exactly the sampled intra-zone leg: small but positive.
    assert!(waits[0] >= 0.0);
    assert!(waits[0] < 10.0);

    let telemetry = world.resource::<SimTelemetry>();
    assert_eq!(telemetry.served_trips.len(), 1);
    assert_eq!(telemetry.backlogged_total, 0);
    assert_eq!(only_driver_status(&mut world), DriverStatus::Inactive);
}

#[test]
fn second_passenger_queues_on_the_busy_driver() {
    let (mut world, mut schedule) = build(
        uniform_matrix(3, 2.0),
        vec![arrival(10.0, 1, 2, 5.0), arrival(11.0, 1, 3, 4.0)],
        vec![driver(1, 0, 1439)],
        7,
    );
    drain(&mut world, &mut schedule);

    // p1: intra-zone leg 10→12, trip 12→17. p2: reposition 17→19, trip 19→23.
    let waits = waiting_times(&mut world);
    assert_eq!(waits, vec![2.0, 8.0]);

    let history = {
        let mut query = world.query::<&Driver>();
        query.iter(&world).next().expect("driver").movement_history.clone()
    };
    assert_eq!(history.len(), 8);
    let trips: Vec<_> = history.iter().filter(|r| r.is_moving).collect();
    assert_eq!(trips.len(), 4);
    assert!(trips[1].has_passenger && trips[3].has_passenger);
    assert_eq!(trips[1].end_zone, ZoneId(2));
    assert_eq!(trips[3].end_zone, ZoneId(3));
    assert_eq!((trips[2].start_time, trips[2].end_time), (17.0, 19.0));
}

#[test]
fn departure_while_busy_defers_until_drop_off() {
    let (mut world, mut schedule) = build(
        uniform_matrix(2, 2.0),
        vec![arrival(55.0, 1, 2, 30.0)],
        vec![driver(1, 0, 60)],
        3,
    );
    drain(&mut world, &mut schedule);

    // Departure fires at t=60 mid-trip; the driver is marked, finishes at
    // t=87, flips to free, and a fresh departure retires it immediately.
    let waits = waiting_times(&mut world);
    assert_eq!(waits, vec![2.0]);
    assert_eq!(only_driver_status(&mut world), DriverStatus::Inactive);
    assert!(world.resource::<UnservedBacklog>().is_empty());
}

#[test]
fn backlogged_passenger_is_served_when_a_shift_starts() {
    let (mut world, mut schedule) = build(
        uniform_matrix(2, 2.0),
        vec![arrival(20.0, 1, 2, 5.0)],
        vec![driver(1, 30, 1000)],
        5,
    );
    drain(&mut world, &mut schedule);

    // Nobody is on duty at t=20: backlogged, then picked up by the t=30
    // shift start (reposition 30→32, trip 32→37).
    let telemetry = world.resource::<SimTelemetry>();
    assert_eq!(telemetry.backlogged_total, 1);
    assert_eq!(telemetry.served_trips.len(), 1);
    assert!(world.resource::<UnservedBacklog>().is_empty());
    assert_eq!(waiting_times(&mut world), vec![12.0]);
}

#[test]
fn full_queue_routes_new_arrivals_to_the_backlog() {
    // Intra-zone legs take 5 minutes so the first pickup is still pending
    // while the queue fills.
    let mut od = uniform_matrix(2, 2.0);
    od.set(ZoneId(1), ZoneId(1), OdCell::new(5.0, 0.0, 5.0, 1.0));

    let arrivals = (0..4).map(|i| arrival(f64::from(i), 1, 2, 1.0)).collect();
    let (mut world, mut schedule) = build(od, arrivals, vec![driver(1, 0, 1439)], 11);
    drain(&mut world, &mut schedule);

    // The driver holds p1 plus a full queue after t=2; the fourth arrival
    // finds no busy-status driver (the only one is at max queue) and is
    // backlogged, then served once the queue drains.
    let telemetry = world.resource::<SimTelemetry>();
    assert_eq!(telemetry.backlogged_total, 1);
    assert_eq!(telemetry.served_trips.len(), 4);
    assert!(world.resource::<UnservedBacklog>().is_empty());

    let waits = waiting_times(&mut world);
    assert_eq!(waits, vec![5.0, 7.0, 9.0, 11.0]);
}

#[test]
fn closest_zone_search_prefers_the_nearest_free_driver() {
    // Zone 1 has no free driver; zone 3 is nearer to it than zone 2.
    let mut od = uniform_matrix(3, 2.0);
    od.set(ZoneId(1), ZoneId(3), OdCell::new(1.0, 0.0, 1.0, 1.0));
    od.set(ZoneId(1), ZoneId(2), OdCell::new(9.0, 0.0, 9.0, 1.0));

    let (mut world, mut schedule) = build(
        od,
        vec![arrival(10.0, 1, 2, 5.0)],
        vec![driver(2, 0, 1439), driver(3, 0, 1439)],
        13,
    );
    drain(&mut world, &mut schedule);

    let histories: Vec<(u32, usize)> = world
        .query::<&Driver>()
        .iter(&world)
        .map(|d| (d.id, d.movement_history.len()))
        .collect();
    // Driver 1 (zone 3) did the job; driver 0 (zone 2) never moved.
    assert_eq!(histories, vec![(0, 0), (1, 4)]);
}
