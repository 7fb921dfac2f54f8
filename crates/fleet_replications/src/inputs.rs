//! Input ingestion: the OD matrix, per-zone hourly arrival rates, and the
//! preferred staffing curve.
//!
//! All three files are csv. Validation fails fast with a descriptive error:
//! a malformed cell, a zone id outside the OD matrix, or a staffing curve
//! that does not cover every minute of the day aborts the run before any
//! simulation starts.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use fleet_core::shifts::MINUTES_PER_DAY;
use fleet_core::zones::{OdCell, OdMatrix, ZoneId};

pub const OD_MATRIX_FILE: &str = "od_matrix.csv";
pub const HOURLY_RATES_FILE: &str = "hourly_rates.csv";
pub const STAFFING_CURVE_FILE: &str = "staffing_curve.csv";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("missing input file {0}")]
    MissingFile(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed row in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("od matrix cell ({origin}, {destination}) is invalid: {reason}")]
    BadOdCell {
        origin: u16,
        destination: u16,
        reason: String,
    },
    #[error("od matrix has no usable cells")]
    EmptyOdMatrix,
    #[error("hourly rates reference zone {zone} outside the od matrix (zone count {zone_count})")]
    ZoneMismatch { zone: u16, zone_count: usize },
    #[error("hourly rate for zone {zone} hour {hour} is invalid: {reason}")]
    BadRate {
        zone: u16,
        hour: u32,
        reason: String,
    },
    #[error("staffing curve must cover minutes 0-1439 exactly once, got {got} distinct minutes")]
    BadStaffingCurve { got: usize },
    #[error("staffing curve minute {minute} is out of range")]
    BadStaffingMinute { minute: u32 },
}

/// Everything a run needs, validated and cross-checked.
#[derive(Debug, Clone)]
pub struct SimulationInputs {
    pub od_matrix: OdMatrix,
    /// Arrivals per hour for each zone, indexed by zone index then hour.
    pub hourly_rates: Vec<[f64; 24]>,
    /// Desired on-duty drivers for each minute of the day.
    pub preferred_staffing: Vec<u32>,
}

pub fn load_inputs(dir: &Path) -> Result<SimulationInputs, InputError> {
    let od_matrix = load_od_matrix(&dir.join(OD_MATRIX_FILE))?;
    let hourly_rates = load_hourly_rates(&dir.join(HOURLY_RATES_FILE), od_matrix.zone_count())?;
    let preferred_staffing = load_staffing_curve(&dir.join(STAFFING_CURVE_FILE))?;
    Ok(SimulationInputs {
        od_matrix,
        hourly_rates,
        preferred_staffing,
    })
}

fn open(path: &Path) -> Result<File, InputError> {
    if !path.exists() {
        return Err(InputError::MissingFile(path.to_path_buf()));
    }
    File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Deserialize)]
struct OdRow {
    origin: u16,
    destination: u16,
    mean: f64,
    stdev: f64,
    min_clip: f64,
    count: f64,
}

fn load_od_matrix(path: &Path) -> Result<OdMatrix, InputError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let mut rows = Vec::new();
    for row in reader.deserialize::<OdRow>() {
        let row = row.map_err(|source| InputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        validate_od_row(&row)?;
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(InputError::EmptyOdMatrix);
    }

    let zone_count = rows
        .iter()
        .map(|row| row.origin.max(row.destination))
        .max()
        .unwrap_or(0) as usize;
    let mut od = OdMatrix::new(zone_count);
    for row in rows {
        od.set(
            ZoneId(row.origin),
            ZoneId(row.destination),
            OdCell::new(row.mean, row.stdev, row.min_clip, row.count),
        );
    }
    Ok(od)
}

fn validate_od_row(row: &OdRow) -> Result<(), InputError> {
    let bad = |reason: &str| InputError::BadOdCell {
        origin: row.origin,
        destination: row.destination,
        reason: reason.to_string(),
    };
    if row.origin == 0 || row.destination == 0 {
        return Err(bad("zone ids are 1-based"));
    }
    for (name, value) in [
        ("mean", row.mean),
        ("stdev", row.stdev),
        ("min_clip", row.min_clip),
        ("count", row.count),
    ] {
        if !value.is_finite() {
            return Err(bad(&format!("{name} is not finite")));
        }
    }
    if row.mean < 0.0 || row.stdev < 0.0 || row.count < 0.0 {
        return Err(bad("mean, stdev and count must be non-negative"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct RateRow {
    zone: u16,
    hour: u32,
    rate: f64,
}

fn load_hourly_rates(path: &Path, zone_count: usize) -> Result<Vec<[f64; 24]>, InputError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let mut rates = vec![[0.0f64; 24]; zone_count];
    for row in reader.deserialize::<RateRow>() {
        let row = row.map_err(|source| InputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if row.zone == 0 || row.zone as usize > zone_count {
            return Err(InputError::ZoneMismatch {
                zone: row.zone,
                zone_count,
            });
        }
        if row.hour >= 24 {
            return Err(InputError::BadRate {
                zone: row.zone,
                hour: row.hour,
                reason: "hour must be in 0-23".to_string(),
            });
        }
        if !row.rate.is_finite() || row.rate < 0.0 {
            return Err(InputError::BadRate {
                zone: row.zone,
                hour: row.hour,
                reason: "rate must be finite and non-negative".to_string(),
            });
        }
        rates[ZoneId(row.zone).index()][row.hour as usize] = row.rate;
    }
    Ok(rates)
}

#[derive(Debug, Deserialize)]
struct StaffingRow {
    minute: u32,
    preferred: u32,
}

fn load_staffing_curve(path: &Path) -> Result<Vec<u32>, InputError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let mut curve = vec![0u32; MINUTES_PER_DAY];
    let mut seen = HashSet::new();
    for row in reader.deserialize::<StaffingRow>() {
        let row = row.map_err(|source| InputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if row.minute as usize >= MINUTES_PER_DAY {
            return Err(InputError::BadStaffingMinute { minute: row.minute });
        }
        curve[row.minute as usize] = row.preferred;
        seen.insert(row.minute);
    }
    if seen.len() != MINUTES_PER_DAY {
        return Err(InputError::BadStaffingCurve { got: seen.len() });
    }
    Ok(curve)
}
