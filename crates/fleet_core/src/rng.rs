//! Run-level randomness: one seeded generator drives every sample in a run.
//!
//! Determinism depends on all draws (travel times, demand, shift planning)
//! coming from this generator in a fixed order; the clock's FIFO event
//! ordering guarantees the order.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Resource)]
pub struct SimRng(pub StdRng);

impl SimRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl From<StdRng> for SimRng {
    fn from(rng: StdRng) -> Self {
        Self(rng)
    }
}
