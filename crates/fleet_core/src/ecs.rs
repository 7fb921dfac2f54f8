//! Entity components: drivers and passengers.
//!
//! Drivers carry their shift window, pickup queue, and an append-only
//! movement history of alternating pause/trip records. Passengers carry the
//! request plus the pre-sampled on-board ride duration; the departure time
//! is filled in at drop-off.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Component, Entity};

use crate::zones::ZoneId;

/// Maximum number of assigned-but-not-yet-picked-up passengers per driver.
pub const MAX_PICKUP_QUEUE: usize = 3;

/// Availability lifecycle of a driver. Exactly one status applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverStatus {
    /// Off shift; not dispatchable.
    Inactive,
    /// On shift and idle in a zone.
    Free,
    /// Serving or heading to a passenger.
    Busy,
    /// Busy with a full pickup queue; not eligible for new assignments.
    MaxQueue,
    /// Shift ended while working; retires at the next empty-queue drop-off.
    MarkedForDeparture,
}

impl DriverStatus {
    pub const ALL: [DriverStatus; 5] = [
        DriverStatus::Inactive,
        DriverStatus::Free,
        DriverStatus::Busy,
        DriverStatus::MaxQueue,
        DriverStatus::MarkedForDeparture,
    ];
}

/// One row of a driver's movement history.
///
/// Pause records (`is_moving == false`) cover the interval the driver sat at
/// `start_zone` before heading toward `end_zone`; trip records
/// (`is_moving == true`) cover the leg itself. Records alternate and their
/// timestamps are non-decreasing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementRecord {
    pub start_time: f64,
    pub end_time: f64,
    pub start_zone: ZoneId,
    pub end_zone: ZoneId,
    pub is_moving: bool,
    pub has_passenger: bool,
}

#[derive(Debug, Component)]
pub struct Driver {
    /// Roster index; stable across the run and used in exported histories.
    pub id: u32,
    pub start_zone: ZoneId,
    /// Shift window in minute-of-day; may wrap midnight (`end < start`).
    pub schedule_start: u32,
    pub schedule_end: u32,
    /// Current zone for idle drivers, last-visited zone while en route.
    pub last_location: ZoneId,
    /// Simulation time at which `last_location` was entered.
    pub last_time: f64,
    /// On-board passenger, if any.
    pub passenger: Option<Entity>,
    queue: VecDeque<Entity>,
    pub movement_history: Vec<MovementRecord>,
}

impl Driver {
    pub fn new(id: u32, start_zone: ZoneId, schedule_start: u32, schedule_end: u32) -> Self {
        Self {
            id,
            start_zone,
            schedule_start,
            schedule_end,
            last_location: start_zone,
            last_time: 0.0,
            passenger: None,
            queue: VecDeque::new(),
            movement_history: Vec::new(),
        }
    }

    pub fn enqueue(&mut self, passenger: Entity) {
        assert!(
            self.queue.len() < MAX_PICKUP_QUEUE,
            "driver {} pickup queue already at capacity",
            self.id
        );
        self.queue.push_back(passenger);
    }

    pub fn pop_queue(&mut self) -> Option<Entity> {
        self.queue.pop_front()
    }

    pub fn peek_queue(&self) -> Option<Entity> {
        self.queue.front().copied()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn at_max_queue(&self) -> bool {
        self.queue.len() >= MAX_PICKUP_QUEUE
    }

    /// A driver with an on-board passenger or a nonempty pickup queue is moving.
    pub fn is_moving(&self) -> bool {
        self.passenger.is_some() || !self.queue.is_empty()
    }

    /// Close the pause that ends now and mark the start of a leg toward `toward`.
    pub fn record_start_of_movement(&mut self, start_time: f64, toward: ZoneId) {
        self.movement_history.push(MovementRecord {
            start_time: self.last_time,
            end_time: start_time,
            start_zone: self.last_location,
            end_zone: toward,
            is_moving: false,
            has_passenger: false,
        });
        self.last_time = start_time;
    }

    /// Close the leg that ends now at `end`, noting whether a passenger was aboard.
    pub fn record_end_of_movement(&mut self, end_time: f64, end: ZoneId, passenger: Option<Entity>) {
        self.movement_history.push(MovementRecord {
            start_time: self.last_time,
            end_time,
            start_zone: self.last_location,
            end_zone: end,
            is_moving: true,
            has_passenger: passenger.is_some(),
        });
        self.last_time = end_time;
        self.last_location = end;
    }

    /// Wrap-aware shift membership: a window with `end < start` spans
    /// midnight, and an empty window (`start == end`) is never active.
    pub fn out_of_schedule(&self, t: f64) -> bool {
        let start = f64::from(self.schedule_start);
        let end = f64::from(self.schedule_end);
        if start < end {
            t > end || t < start
        } else if start > end {
            t > end && t < start
        } else {
            true
        }
    }
}

#[derive(Debug, Clone, Copy, Component)]
pub struct Passenger {
    /// Request time in simulation minutes.
    pub arrival_time: f64,
    pub start_zone: ZoneId,
    pub end_zone: ZoneId,
    /// Pre-sampled on-board ride duration in minutes.
    pub service_duration: f64,
    /// Drop-off time; `None` until served.
    pub departure_time: Option<f64>,
}

impl Passenger {
    pub fn new(arrival_time: f64, start_zone: ZoneId, end_zone: ZoneId, service_duration: f64) -> Self {
        Self {
            arrival_time,
            start_zone,
            end_zone,
            service_duration,
            departure_time: None,
        }
    }

    /// Time spent waiting for pickup: departure minus ride minus arrival.
    pub fn waiting_time(&self) -> Option<f64> {
        self.departure_time
            .map(|departure| departure - self.service_duration - self.arrival_time)
    }
}
