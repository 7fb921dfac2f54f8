//! `fleet_sim`: run day-long fleet replications and export the results.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::Parser;
use tracing::{info, warn};

use fleet_core::shifts::ShiftPlanConfig;
use fleet_replications::export::{
    write_driver_histories, write_metrics_json, write_passenger_results,
};
use fleet_replications::inputs::load_inputs;
use fleet_replications::logging::init_logging;
use fleet_replications::runner::{run_replications, ReplicationConfig};

#[derive(Parser)]
#[command(
    name = "fleet_sim",
    about = "Discrete-event simulation of an on-demand ride-hailing fleet over a zoned city"
)]
struct Cli {
    /// Number of day-long replications to run
    replications: usize,
    /// Output folder; must not already contain files
    output_folder: PathBuf,
    /// Folder with od_matrix.csv, hourly_rates.csv and staffing_curve.csv
    #[arg(long, default_value = "inputs")]
    inputs: PathBuf,
    /// Master RNG seed; replication i runs with seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Worker threads for replications (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,
    /// Largest per-minute staffing shortfall the shift planner may leave
    #[arg(long, default_value_t = ShiftPlanConfig::default().tolerated_under_preferred)]
    staffing_tolerance: i64,
}

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    prepare_output_dir(&cli.output_folder)?;
    init_logging(&cli.output_folder)?;

    info!(
        "running {} replication(s), seed {}, inputs from {}",
        cli.replications,
        cli.seed,
        cli.inputs.display()
    );
    let inputs = load_inputs(&cli.inputs)?;
    info!(
        "inputs loaded: {} zones, staffing curve peak {}",
        inputs.od_matrix.zone_count(),
        inputs.preferred_staffing.iter().max().copied().unwrap_or(0)
    );

    let config = ReplicationConfig {
        replications: cli.replications,
        master_seed: cli.seed,
        shift_plan: ShiftPlanConfig {
            tolerated_under_preferred: cli.staffing_tolerance,
            ..ShiftPlanConfig::default()
        },
        threads: cli.threads,
        show_progress: true,
    };
    let outputs = run_replications(&inputs, &config);

    for output in &outputs {
        let m = &output.metrics;
        info!(
            "replication {}: {} drivers, {}/{} passengers served, waiting time mean {:.3} min / median {:.3} min",
            m.replication,
            m.drivers_total,
            m.passengers_served,
            m.passengers_total,
            m.mean_waiting_time,
            m.median_waiting_time
        );
        info!(
            "replication {}: {} events ({:.0}/s), queue inserts {}, pops {}",
            m.replication, m.events_processed, m.events_per_second, m.queue_inserts, m.queue_pops
        );
        if !m.shift_target_met {
            warn!(
                "replication {}: shift plan missed the staffing target, residual shortfall {}",
                m.replication, m.shift_shortfall
            );
        }
        if m.passengers_unserved > 0 {
            warn!(
                "replication {}: {} passengers left unserved in the backlog",
                m.replication, m.passengers_unserved
            );
        }
    }

    let passenger_path = cli.output_folder.join("passenger_results.parquet");
    write_passenger_results(&passenger_path, &outputs)?;

    // Histories are heavy; keep the last replication only.
    if let Some(last) = outputs.last() {
        let histories_path = cli.output_folder.join("driver_histories.parquet");
        write_driver_histories(&histories_path, last)?;
    }

    let metrics: Vec<_> = outputs.iter().map(|o| o.metrics.clone()).collect();
    write_metrics_json(&cli.output_folder.join("replication_metrics.json"), &metrics)?;

    info!("results written to {}", cli.output_folder.display());
    Ok(())
}

/// The output folder must be fresh: create it, or reuse it only when empty.
fn prepare_output_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    if path.exists() {
        if fs::read_dir(path)?.next().is_some() {
            return Err(format!(
                "output folder {} already exists and is not empty",
                path.display()
            )
            .into());
        }
        return Ok(());
    }
    fs::create_dir_all(path)?;
    Ok(())
}
