//! Stochastic zone-to-zone travel times sampled from the OD matrix.
//!
//! Cells with data yield `max(Normal(mean, stdev), min_clip)` draws. Empty
//! cells fall back to an exponential draw whose mean is a per-destination
//! default computed from the rest of the matrix, so the oracle never returns
//! NaN even for sparse inputs.

use bevy_ecs::prelude::Resource;
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};

use crate::zones::{OdMatrix, ZoneId};

/// Floor applied to per-destination default times so the exponential
/// fallback stays well-defined for degenerate columns.
const DEFAULT_TIME_FLOOR: f64 = 1e-6;

/// Samples movement durations between zones from the OD matrix.
#[derive(Debug, Resource)]
pub struct TravelTimeOracle {
    od: OdMatrix,
    default_time: Vec<f64>,
    closest_zones: Vec<Vec<ZoneId>>,
}

impl TravelTimeOracle {
    pub fn new(od: OdMatrix) -> Self {
        let default_time = compute_default_times(&od);
        let closest_zones = compute_closest_zones(&od);
        Self {
            od,
            default_time,
            closest_zones,
        }
    }

    pub fn od(&self) -> &OdMatrix {
        &self.od
    }

    pub fn zone_count(&self) -> usize {
        self.od.zone_count()
    }

    /// Mean trip time used for empty cells ending in `destination`.
    pub fn default_time(&self, destination: ZoneId) -> f64 {
        self.default_time[destination.index()]
    }

    /// Zone ids sorted ascending by mean trip time from `origin`, with
    /// `origin` itself and no-data pairs removed.
    pub fn closest_zones(&self, origin: ZoneId) -> &[ZoneId] {
        &self.closest_zones[origin.index()]
    }

    /// Sample a movement duration in minutes for `origin → destination`.
    pub fn sample<R: Rng>(&self, rng: &mut R, origin: ZoneId, destination: ZoneId) -> f64 {
        let cell = self.od.get(origin, destination);
        if cell.is_empty() {
            let mean = self.default_time[destination.index()];
            let exp = Exp::new(1.0 / mean).expect("default times are positive");
            exp.sample(rng)
        } else {
            let normal =
                Normal::new(cell.mean, cell.stdev).expect("od cells are validated at ingestion");
            normal.sample(rng).max(cell.min_clip)
        }
    }
}

/// Weighted-mean trip time into each zone: Σ(mean·count)/Σ(count) over all
/// origins; falls back to the outgoing row, then to the mean of the defaults
/// computed so far.
fn compute_default_times(od: &OdMatrix) -> Vec<f64> {
    let mut defaults = Vec::with_capacity(od.zone_count());
    for zone in od.zones() {
        let incoming = weighted_mean(od.zones().map(|origin| od.get(origin, zone)));
        let outgoing = || weighted_mean(od.zones().map(|destination| od.get(zone, destination)));
        let value = incoming.or_else(outgoing).unwrap_or_else(|| {
            if defaults.is_empty() {
                1.0
            } else {
                defaults.iter().sum::<f64>() / defaults.len() as f64
            }
        });
        defaults.push(value.max(DEFAULT_TIME_FLOOR));
    }
    defaults
}

fn weighted_mean<'a>(cells: impl Iterator<Item = &'a crate::zones::OdCell>) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut total_count = 0.0;
    for cell in cells.filter(|cell| !cell.is_empty() && cell.count > 0.0) {
        weighted_sum += cell.mean * cell.count;
        total_count += cell.count;
    }
    (total_count > 0.0).then(|| weighted_sum / total_count)
}

fn compute_closest_zones(od: &OdMatrix) -> Vec<Vec<ZoneId>> {
    od.zones()
        .map(|origin| {
            let mut ordered: Vec<ZoneId> = od
                .zones()
                .filter(|&destination| {
                    destination != origin && !od.get(origin, destination).is_empty()
                })
                .collect();
            ordered.sort_by(|&a, &b| {
                od.get(origin, a)
                    .mean
                    .total_cmp(&od.get(origin, b).mean)
            });
            ordered
        })
        .collect()
}
