//! Columnar export of replication results.

mod writer_utils;

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, UInt16Array, UInt32Array};
use arrow::datatypes::Schema;

use crate::metrics::ReplicationMetrics;
use crate::runner::ReplicationOutput;

use writer_utils::{bool_field, f64_field, u16_field, u32_field, write_record_batch};

/// One row per served passenger across all replications.
pub fn write_passenger_results(
    path: &Path,
    outputs: &[ReplicationOutput],
) -> Result<(), Box<dyn Error>> {
    let mut arrival_time = Vec::new();
    let mut start_zone = Vec::new();
    let mut end_zone = Vec::new();
    let mut service_duration = Vec::new();
    let mut waiting_time = Vec::new();
    let mut replication = Vec::new();

    for output in outputs {
        for row in &output.passengers {
            let Some(wait) = row.waiting_time else {
                continue;
            };
            arrival_time.push(row.arrival_time);
            start_zone.push(row.start_zone.0);
            end_zone.push(row.end_zone.0);
            service_duration.push(row.service_duration);
            waiting_time.push(wait);
            replication.push(output.index as u32);
        }
    }

    let schema = Schema::new(vec![
        f64_field("arrival_time"),
        u16_field("start_zone"),
        u16_field("end_zone"),
        f64_field("service_duration"),
        f64_field("waiting_time"),
        u32_field("replication_index"),
    ]);
    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(arrival_time)),
        Arc::new(UInt16Array::from(start_zone)),
        Arc::new(UInt16Array::from(end_zone)),
        Arc::new(Float64Array::from(service_duration)),
        Arc::new(Float64Array::from(waiting_time)),
        Arc::new(UInt32Array::from(replication)),
    ];
    write_record_batch(path, schema, arrays)
}

/// All drivers' movement logs, concatenated with a `driver_id` column.
/// Histories grow large, so only one replication (the last) is persisted.
pub fn write_driver_histories(
    path: &Path,
    output: &ReplicationOutput,
) -> Result<(), Box<dyn Error>> {
    let rows = &output.driver_histories;
    let mut driver_id = Vec::with_capacity(rows.len());
    let mut start_time = Vec::with_capacity(rows.len());
    let mut end_time = Vec::with_capacity(rows.len());
    let mut start_zone = Vec::with_capacity(rows.len());
    let mut end_zone = Vec::with_capacity(rows.len());
    let mut is_moving = Vec::with_capacity(rows.len());
    let mut has_passenger = Vec::with_capacity(rows.len());

    for row in rows {
        driver_id.push(row.driver_id);
        start_time.push(row.record.start_time);
        end_time.push(row.record.end_time);
        start_zone.push(row.record.start_zone.0);
        end_zone.push(row.record.end_zone.0);
        is_moving.push(row.record.is_moving);
        has_passenger.push(row.record.has_passenger);
    }

    let schema = Schema::new(vec![
        u32_field("driver_id"),
        f64_field("start_time"),
        f64_field("end_time"),
        u16_field("start_zone"),
        u16_field("end_zone"),
        bool_field("is_moving"),
        bool_field("has_passenger"),
    ]);
    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt32Array::from(driver_id)),
        Arc::new(Float64Array::from(start_time)),
        Arc::new(Float64Array::from(end_time)),
        Arc::new(UInt16Array::from(start_zone)),
        Arc::new(UInt16Array::from(end_zone)),
        Arc::new(BooleanArray::from(is_moving)),
        Arc::new(BooleanArray::from(has_passenger)),
    ];
    write_record_batch(path, schema, arrays)
}

/// Per-replication diagnostics as pretty-printed json.
pub fn write_metrics_json(
    path: &Path,
    metrics: &[ReplicationMetrics],
) -> Result<(), Box<dyn Error>> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, metrics)?;
    Ok(())
}
