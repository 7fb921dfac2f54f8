//! Event handlers. Each system reacts to one [crate::clock::EventKind],
//! mutates fleet state, and schedules at most one successor event.

pub mod dispatch;
pub mod driver_arrival;
pub mod driver_departure;
pub mod movement_completed;
pub mod passenger_arrival;
pub mod trip_completed;
