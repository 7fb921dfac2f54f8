//! Demand synthesis: one day of passenger arrivals per zone.
//!
//! Arrivals follow a non-homogeneous Poisson process: exponential
//! inter-arrival draws at each zone's peak hourly rate, thinned against the
//! hourly-rate step function. Destinations are drawn from the OD matrix's
//! historical trip counts (uniform when a row has none), and the on-board
//! ride duration comes from the same oracle formula the dispatcher uses for
//! travel times, clipped at zero.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_distr::Exp;

use fleet_core::clock::ONE_DAY_MIN;
use fleet_core::scenario::ArrivalRecord;
use fleet_core::travel_time::TravelTimeOracle;
use fleet_core::zones::ZoneId;

/// Generate one day's arrival table, sorted by time.
pub fn synthesize_arrivals<R: Rng>(
    rng: &mut R,
    oracle: &TravelTimeOracle,
    hourly_rates: &[[f64; 24]],
) -> Vec<ArrivalRecord> {
    let mut arrivals = Vec::new();
    for (zone_index, rates) in hourly_rates.iter().enumerate() {
        let origin = ZoneId::from_index(zone_index);
        let max_rate = rates.iter().cloned().fold(0.0f64, f64::max);
        if max_rate <= 0.0 {
            continue;
        }
        // Peak-rate exponential inter-arrivals, in minutes.
        let inter_arrival = Exp::new(max_rate / 60.0).expect("positive peak rate");

        let mut t: f64 = inter_arrival.sample(rng);
        while t <= ONE_DAY_MIN {
            let hour = ((t / 60.0) as usize).min(23);
            let keep: f64 = rng.gen();
            if keep <= rates[hour] / max_rate {
                let destination = sample_destination(rng, oracle, origin);
                let service = oracle.sample(rng, origin, destination).max(0.0);
                arrivals.push(ArrivalRecord {
                    time: t,
                    pulocationid: origin,
                    dolocationid: destination,
                    service,
                });
            }
            t += inter_arrival.sample(rng);
        }
    }
    arrivals.sort_by(|a, b| a.time.total_cmp(&b.time));
    arrivals
}

/// Drop-off zone weighted by historical trip counts out of `origin`;
/// uniform when the row has no data.
fn sample_destination<R: Rng>(rng: &mut R, oracle: &TravelTimeOracle, origin: ZoneId) -> ZoneId {
    let od = oracle.od();
    let weights: Vec<f64> = od
        .zones()
        .map(|destination| od.get(origin, destination).count.max(0.0))
        .collect();
    match WeightedIndex::new(&weights) {
        Ok(dist) => ZoneId::from_index(dist.sample(rng)),
        Err(_) => ZoneId::from_index(rng.gen_range(0..od.zone_count())),
    }
}

/// Arrivals per zone, used to spread drivers proportionally to demand.
pub fn arrival_counts_per_zone(arrivals: &[ArrivalRecord], zone_count: usize) -> Vec<u64> {
    let mut counts = vec![0u64; zone_count];
    for record in arrivals {
        counts[record.pulocationid.index()] += 1;
    }
    counts
}
