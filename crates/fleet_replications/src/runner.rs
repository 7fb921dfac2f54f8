//! Replication execution: build a world per day, run it to event-queue
//! exhaustion, and extract results. Replications run on a rayon pool with a
//! progress bar; results are collected in replication order so the output
//! tables are deterministic for a given master seed.

use bevy_ecs::prelude::World;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use fleet_core::ecs::{Driver, MovementRecord, Passenger};
use fleet_core::runner::{run_until_empty, simulation_schedule};
use fleet_core::scenario::{build_scenario, DriverSpec, ScenarioParams};
use fleet_core::shifts::{distribute_start_zones, plan_shifts, ShiftPlanConfig};
use fleet_core::travel_time::TravelTimeOracle;
use fleet_core::zones::ZoneId;

use crate::demand::{arrival_counts_per_zone, synthesize_arrivals};
use crate::inputs::SimulationInputs;
use crate::metrics::{extract_metrics, ReplicationMetrics};

/// Backstop for runaway event loops; a day's run is far below this.
const MAX_STEPS: usize = 10_000_000;

#[derive(Debug, Clone)]
pub struct ReplicationConfig {
    pub replications: usize,
    /// Replication `i` runs with seed `master_seed + i`.
    pub master_seed: u64,
    pub shift_plan: ShiftPlanConfig,
    /// Worker threads; `None` uses rayon's default.
    pub threads: Option<usize>,
    pub show_progress: bool,
}

/// One row of the served-passenger table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassengerRow {
    pub arrival_time: f64,
    pub start_zone: ZoneId,
    pub end_zone: ZoneId,
    pub service_duration: f64,
    pub waiting_time: Option<f64>,
}

/// One movement record of one driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverHistoryRow {
    pub driver_id: u32,
    pub record: MovementRecord,
}

#[derive(Debug, Clone)]
pub struct ReplicationOutput {
    pub index: usize,
    pub passengers: Vec<PassengerRow>,
    pub driver_histories: Vec<DriverHistoryRow>,
    pub metrics: ReplicationMetrics,
}

/// Run one replication: synthesize demand, plan shifts, simulate the day.
///
/// Every stochastic step draws from the one generator seeded for this
/// replication, in a fixed order, so the run is reproducible.
pub fn run_replication(
    inputs: &SimulationInputs,
    shift_config: &ShiftPlanConfig,
    seed: u64,
    index: usize,
) -> ReplicationOutput {
    let mut rng = StdRng::seed_from_u64(seed);
    let oracle = TravelTimeOracle::new(inputs.od_matrix.clone());

    let arrivals = synthesize_arrivals(&mut rng, &oracle, &inputs.hourly_rates);
    let plan = plan_shifts(&mut rng, &inputs.preferred_staffing, shift_config);

    let counts = arrival_counts_per_zone(&arrivals, inputs.od_matrix.zone_count());
    let start_zones = distribute_start_zones(&mut rng, &counts, plan.shifts.len());
    let drivers: Vec<DriverSpec> = plan
        .shifts
        .iter()
        .zip(start_zones)
        .map(|(&shift, start_zone)| DriverSpec { start_zone, shift })
        .collect();
    let drivers_total = drivers.len();

    let mut world = World::new();
    build_scenario(
        &mut world,
        ScenarioParams {
            od_matrix: inputs.od_matrix.clone(),
            arrivals,
            drivers,
        },
        rng,
    );
    let mut schedule = simulation_schedule();
    run_until_empty(&mut world, &mut schedule, MAX_STEPS);

    let metrics = extract_metrics(&mut world, index, drivers_total, &plan);
    ReplicationOutput {
        index,
        passengers: collect_passengers(&mut world),
        driver_histories: collect_driver_histories(&mut world),
        metrics,
    }
}

fn collect_passengers(world: &mut World) -> Vec<PassengerRow> {
    world
        .query::<&Passenger>()
        .iter(world)
        .map(|p| PassengerRow {
            arrival_time: p.arrival_time,
            start_zone: p.start_zone,
            end_zone: p.end_zone,
            service_duration: p.service_duration,
            waiting_time: p.waiting_time(),
        })
        .collect()
}

fn collect_driver_histories(world: &mut World) -> Vec<DriverHistoryRow> {
    let mut drivers: Vec<(u32, Vec<MovementRecord>)> = world
        .query::<&Driver>()
        .iter(world)
        .map(|d| (d.id, d.movement_history.clone()))
        .collect();
    drivers.sort_by_key(|(id, _)| *id);

    drivers
        .into_iter()
        .flat_map(|(driver_id, history)| {
            history
                .into_iter()
                .map(move |record| DriverHistoryRow { driver_id, record })
        })
        .collect()
}

/// Run all replications, in parallel when configured, preserving order.
pub fn run_replications(
    inputs: &SimulationInputs,
    config: &ReplicationConfig,
) -> Vec<ReplicationOutput> {
    let total = config.replications;
    let progress = if config.show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .expect("progress template is valid")
                .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.unwrap_or(0))
        .build()
        .expect("failed to create thread pool");

    let progress_clone = progress.clone();
    let outputs = pool.install(|| {
        (0..total)
            .into_par_iter()
            .map(|index| {
                let seed = config.master_seed.wrapping_add(index as u64);
                let output = run_replication(inputs, &config.shift_plan, seed, index);
                if let Some(ref bar) = progress_clone {
                    bar.inc(1);
                }
                output
            })
            .collect()
    });

    if let Some(ref bar) = progress {
        bar.finish_and_clear();
    }

    outputs
}
