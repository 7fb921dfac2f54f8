//! Shift planning: pack sampled work intervals against a preferred-staffing
//! curve, then spread drivers across start zones.
//!
//! Candidates are drawn in large chunks as (center, length) pairs and placed
//! longest-first. A candidate is accepted unless it would spend more than
//! `acceptable_overlap` minutes on top of minutes that are already staffed
//! at or above the preferred level. Planning stops once no minute is
//! understaffed by more than `tolerated_under_preferred`, or after
//! `max_chunks` chunks with the best-achieved shortfall reported.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::zones::ZoneId;

/// Minutes in a planning day.
pub const MINUTES_PER_DAY: usize = 1440;

const MIN_SHIFT_MINUTES: u32 = 120;
const MAX_SHIFT_MINUTES: u32 = 600;
/// Shift lengths are weighted toward a standard 8-hour shift.
const PREFERRED_SHIFT_MINUTES: f64 = 480.0;
const LENGTH_WEIGHT_SOFTENING: f64 = 15.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftPlanConfig {
    /// Largest per-minute staffing shortfall the plan may leave behind.
    pub tolerated_under_preferred: i64,
    /// Minutes a candidate may overlap already-satisfied staffing.
    pub acceptable_overlap: usize,
    /// Candidates drawn per chunk.
    pub chunk_size: usize,
    /// Chunk budget before planning gives up and reports the shortfall.
    pub max_chunks: usize,
}

impl Default for ShiftPlanConfig {
    fn default() -> Self {
        Self {
            tolerated_under_preferred: 3000,
            acceptable_overlap: 60,
            chunk_size: 100_000,
            max_chunks: 50,
        }
    }
}

/// One accepted work interval in minute-of-day; may wrap midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub start: u32,
    pub end: u32,
}

/// Outcome of shift planning.
#[derive(Debug, Clone)]
pub struct ShiftPlan {
    pub shifts: Vec<Shift>,
    /// Worst remaining per-minute shortfall, `max(preferred − availability)`,
    /// floored at zero.
    pub shortfall: i64,
    /// Whether the shortfall target was met within the chunk budget.
    pub met_target: bool,
}

/// Pack shifts against `preferred` (length [MINUTES_PER_DAY], desired
/// on-duty drivers per minute).
pub fn plan_shifts<R: Rng>(rng: &mut R, preferred: &[u32], config: &ShiftPlanConfig) -> ShiftPlan {
    assert_eq!(
        preferred.len(),
        MINUTES_PER_DAY,
        "preferred staffing curve must cover every minute of the day"
    );

    let lengths: Vec<u32> = (MIN_SHIFT_MINUTES..=MAX_SHIFT_MINUTES).step_by(2).collect();
    let weights: Vec<f64> = lengths
        .iter()
        .map(|&len| 1.0 / ((f64::from(len) - PREFERRED_SHIFT_MINUTES).abs() + LENGTH_WEIGHT_SOFTENING))
        .collect();
    let length_dist = WeightedIndex::new(&weights).expect("length weights are positive");

    let mut availability = vec![0i64; MINUTES_PER_DAY];
    let mut shifts = Vec::new();
    let mut met_target = worst_shortfall(preferred, &availability) < config.tolerated_under_preferred;

    for _ in 0..config.max_chunks {
        if met_target {
            break;
        }

        let mut candidates: Vec<(u32, u32)> = (0..config.chunk_size)
            .map(|_| {
                let center = rng.gen_range(0..MINUTES_PER_DAY as u32);
                let length = lengths[length_dist.sample(rng)];
                (center, length)
            })
            .collect();
        // Longest first; the stable sort keeps draw order among equal lengths.
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        for (center, length) in candidates {
            let lo = i64::from(center) - i64::from(length / 2);
            let overlap = (0..i64::from(length))
                .filter(|offset| {
                    let minute = (lo + offset).rem_euclid(MINUTES_PER_DAY as i64) as usize;
                    availability[minute] >= i64::from(preferred[minute])
                })
                .count();
            if overlap > config.acceptable_overlap {
                continue;
            }

            for offset in 0..i64::from(length) {
                let minute = (lo + offset).rem_euclid(MINUTES_PER_DAY as i64) as usize;
                availability[minute] += 1;
            }
            shifts.push(Shift {
                start: lo.rem_euclid(MINUTES_PER_DAY as i64) as u32,
                end: (lo + i64::from(length)).rem_euclid(MINUTES_PER_DAY as i64) as u32,
            });

            if worst_shortfall(preferred, &availability) < config.tolerated_under_preferred {
                met_target = true;
                break;
            }
        }
    }

    ShiftPlan {
        shifts,
        shortfall: worst_shortfall(preferred, &availability).max(0),
        met_target,
    }
}

fn worst_shortfall(preferred: &[u32], availability: &[i64]) -> i64 {
    preferred
        .iter()
        .zip(availability)
        .map(|(&want, &have)| i64::from(want) - have)
        .max()
        .unwrap_or(0)
}

/// Spread `count` drivers across zones proportionally to per-zone arrival
/// volume (floored), assigning the remainder uniformly at random.
pub fn distribute_start_zones<R: Rng>(
    rng: &mut R,
    arrival_counts: &[u64],
    count: usize,
) -> Vec<ZoneId> {
    let zone_count = arrival_counts.len();
    let total: u64 = arrival_counts.iter().sum();
    let mut zones = Vec::with_capacity(count);

    if total > 0 {
        for (index, &arrivals) in arrival_counts.iter().enumerate() {
            let share = (count as f64 * arrivals as f64 / total as f64).floor() as usize;
            for _ in 0..share {
                zones.push(ZoneId::from_index(index));
            }
        }
    }
    while zones.len() < count {
        zones.push(ZoneId::from_index(rng.gen_range(0..zone_count)));
    }
    zones.truncate(count);
    zones
}
