//! Performance benchmarks for fleet_core using Criterion.rs.

use bevy_ecs::prelude::{Entity, World};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use fleet_core::clock::{EventKind, SimulationClock};
use fleet_core::runner::{run_until_empty, simulation_schedule};
use fleet_core::scenario::{build_scenario, ArrivalRecord, DriverSpec, ScenarioParams};
use fleet_core::shifts::Shift;
use fleet_core::zones::{OdCell, OdMatrix, ZoneId};

fn bench_event_queue(c: &mut Criterion) {
    c.bench_function("event_queue_10k_schedule_and_pop", |b| {
        b.iter(|| {
            let mut clock = SimulationClock::default();
            for i in 0..10_000u32 {
                let at = f64::from(i % 1440);
                clock.schedule_at(at, EventKind::PassengerArrival(Entity::from_raw(i)));
            }
            while let Some(event) = clock.pop_next() {
                black_box(event);
            }
        });
    });
}

fn day_params(zone_count: u16, arrivals: usize, drivers: usize) -> ScenarioParams {
    let mut od = OdMatrix::new(zone_count as usize);
    for origin in 1..=zone_count {
        for destination in 1..=zone_count {
            let mean = 2.0 + f64::from((origin + destination) % 7);
            od.set(
                ZoneId(origin),
                ZoneId(destination),
                OdCell::new(mean, 1.0, 0.5, 10.0),
            );
        }
    }

    let arrivals = (0..arrivals)
        .map(|i| ArrivalRecord {
            time: (i as f64 * 1440.0) / arrivals as f64,
            pulocationid: ZoneId((i % zone_count as usize) as u16 + 1),
            dolocationid: ZoneId(((i + 3) % zone_count as usize) as u16 + 1),
            service: 3.0 + (i % 9) as f64,
        })
        .collect();

    let drivers = (0..drivers)
        .map(|i| DriverSpec {
            start_zone: ZoneId((i % zone_count as usize) as u16 + 1),
            shift: Shift {
                start: ((i * 97) % 1440) as u32,
                end: ((i * 97 + 480) % 1440) as u32,
            },
        })
        .collect();

    ScenarioParams {
        od_matrix: od,
        arrivals,
        drivers,
    }
}

fn bench_simulation_run(c: &mut Criterion) {
    let scenarios = vec![("small", 200, 10), ("medium", 2_000, 60)];

    let mut group = c.benchmark_group("simulation_run");
    for (name, arrivals, drivers) in scenarios {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(arrivals, drivers),
            |b, &(arrivals, drivers)| {
                b.iter(|| {
                    let mut world = World::new();
                    build_scenario(
                        &mut world,
                        day_params(12, arrivals, drivers),
                        StdRng::seed_from_u64(42),
                    );
                    let mut schedule = simulation_schedule();
                    black_box(run_until_empty(&mut world, &mut schedule, 1_000_000));
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_event_queue, bench_simulation_run);
criterion_main!(benches);
