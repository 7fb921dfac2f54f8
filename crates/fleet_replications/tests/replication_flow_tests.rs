use std::fs::File;
use std::io::Write;
use std::path::Path;

use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use fleet_core::shifts::{ShiftPlanConfig, MINUTES_PER_DAY};
use fleet_replications::export::{
    write_driver_histories, write_metrics_json, write_passenger_results,
};
use fleet_replications::inputs::{
    load_inputs, HOURLY_RATES_FILE, OD_MATRIX_FILE, STAFFING_CURVE_FILE,
};
use fleet_replications::runner::{run_replications, ReplicationConfig};

fn write_file(dir: &Path, name: &str, contents: &str) {
    let mut file = File::create(dir.join(name)).expect("create file");
    file.write_all(contents.as_bytes()).expect("write file");
}

fn write_inputs(dir: &Path) {
    let mut od = String::from("origin,destination,mean,stdev,min_clip,count\n");
    for origin in 1..=3 {
        for destination in 1..=3 {
            od.push_str(&format!(
                "{origin},{destination},{}.0,0.5,1.0,10\n",
                2 + (origin + destination) % 3
            ));
        }
    }
    write_file(dir, OD_MATRIX_FILE, &od);

    let mut rates = String::from("zone,hour,rate\n");
    for zone in 1..=3 {
        for hour in 0..24 {
            rates.push_str(&format!("{zone},{hour},{}\n", 3 + zone));
        }
    }
    write_file(dir, HOURLY_RATES_FILE, &rates);

    let mut staffing = String::from("minute,preferred\n");
    for minute in 0..MINUTES_PER_DAY {
        staffing.push_str(&format!("{minute},2\n"));
    }
    write_file(dir, STAFFING_CURVE_FILE, &staffing);
}

fn config() -> ReplicationConfig {
    ReplicationConfig {
        replications: 2,
        master_seed: 5,
        shift_plan: ShiftPlanConfig {
            tolerated_under_preferred: 1,
            acceptable_overlap: 60,
            chunk_size: 2_000,
            max_chunks: 10,
        },
        threads: Some(2),
        show_progress: false,
    }
}

fn parquet_row_count(path: &Path) -> usize {
    let file = File::open(path).expect("open parquet");
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .expect("parquet reader")
        .build()
        .expect("reader builds");
    reader.map(|batch| batch.expect("batch").num_rows()).sum()
}

#[test]
fn end_to_end_run_writes_all_artifacts() {
    let inputs_dir = tempfile::tempdir().expect("inputs dir");
    write_inputs(inputs_dir.path());
    let inputs = load_inputs(inputs_dir.path()).expect("inputs load");

    let outputs = run_replications(&inputs, &config());
    assert_eq!(outputs.len(), 2);

    let out_dir = tempfile::tempdir().expect("output dir");
    let passengers = out_dir.path().join("passenger_results.parquet");
    let histories = out_dir.path().join("driver_histories.parquet");
    let metrics = out_dir.path().join("replication_metrics.json");

    write_passenger_results(&passengers, &outputs).expect("passenger export");
    write_driver_histories(&histories, outputs.last().expect("last run")).expect("history export");
    let all_metrics: Vec<_> = outputs.iter().map(|o| o.metrics.clone()).collect();
    write_metrics_json(&metrics, &all_metrics).expect("metrics export");

    let served: usize = outputs
        .iter()
        .map(|o| o.metrics.passengers_served)
        .sum();
    assert!(served > 0);
    assert_eq!(parquet_row_count(&passengers), served);
    assert_eq!(
        parquet_row_count(&histories),
        outputs.last().expect("last run").driver_histories.len()
    );

    let parsed: serde_json::Value =
        serde_json::from_reader(File::open(&metrics).expect("metrics file"))
            .expect("metrics json parses");
    assert_eq!(parsed.as_array().map(Vec::len), Some(2));
}

#[test]
fn reruns_with_the_same_seed_are_reproducible() {
    let inputs_dir = tempfile::tempdir().expect("inputs dir");
    write_inputs(inputs_dir.path());
    let inputs = load_inputs(inputs_dir.path()).expect("inputs load");

    let first = run_replications(&inputs, &config());
    let second = run_replications(&inputs, &config());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.passengers, b.passengers);
        assert_eq!(a.driver_histories, b.driver_histories);
    }
}
