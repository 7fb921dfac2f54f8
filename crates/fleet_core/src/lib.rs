//! # Zoned Fleet Simulation Core
//!
//! A discrete-event simulation engine for an on-demand ride-hailing fleet
//! operating over a zoned city.
//!
//! ## Overview
//!
//! This crate provides the core simulation engine, including:
//!
//! - **Event Scheduling**: Float-minute discrete event queue with FIFO
//!   ordering among equal-time events
//! - **ECS State**: Drivers and passengers as entities, fleet indices and
//!   the clock as resources
//! - **Dispatch**: Per-event systems that match drivers to passengers,
//!   enforce driver shift lifecycles, and maintain the unserved backlog
//! - **Travel Times**: Stochastic zone-to-zone durations sampled from an
//!   origin-destination matrix with fallbacks
//! - **Shift Planning**: Work-interval packing against a preferred-staffing
//!   curve
//!
//! ## Key Concepts
//!
//! - **Discrete Events**: All simulation progress happens through scheduled
//!   events; a run ends when the queue is exhausted
//! - **Deterministic**: One seeded RNG per run plus FIFO tie-breaks ensure
//!   reproducible results
//! - **Single-threaded**: The event loop is the sole mutator of fleet state
//!
//! ## Example
//!
//! ```rust,no_run
//! use bevy_ecs::prelude::World;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use fleet_core::scenario::{build_scenario, ScenarioParams};
//! use fleet_core::runner::{run_until_empty, simulation_schedule};
//! use fleet_core::zones::OdMatrix;
//!
//! let mut world = World::new();
//! let params = ScenarioParams {
//!     od_matrix: OdMatrix::new(4),
//!     arrivals: Vec::new(),
//!     drivers: Vec::new(),
//! };
//! build_scenario(&mut world, params, StdRng::seed_from_u64(42));
//!
//! let mut schedule = simulation_schedule();
//! let steps = run_until_empty(&mut world, &mut schedule, 1_000_000);
//! ```

pub mod clock;
pub mod ecs;
pub mod fleet_index;
pub mod profiling;
pub mod rng;
pub mod runner;
pub mod scenario;
pub mod shifts;
pub mod systems;
pub mod telemetry;
pub mod travel_time;
pub mod zones;
