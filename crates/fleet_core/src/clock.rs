//! Simulation time: a float-minute timeline advanced by popping scheduled events.
//!
//! All timestamps and `clock.now()` are in **simulation minutes**. Each
//! scheduled event carries a monotonically increasing sequence number and the
//! queue orders by `(time, seq)` ascending, so equal-time events pop in
//! insertion order. That FIFO tie-break is load-bearing: it makes runs
//! deterministic under a fixed seed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

use crate::zones::ZoneId;

/// Minutes in a simulated day.
pub const ONE_DAY_MIN: f64 = 1440.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A passenger enters the system and requests a ride.
    PassengerArrival(Entity),
    /// A driver's shift begins.
    DriverArrival(Entity),
    /// A driver is asked to go off shift.
    DriverDeparture(Entity),
    /// A driver finishes an empty reposition leg toward a pickup zone.
    MovementCompleted {
        driver: Entity,
        from: ZoneId,
        to: ZoneId,
    },
    /// A driver drops off the on-board passenger.
    TripCompleted { driver: Entity, passenger: Entity },
}

impl EventKind {
    /// Short name for diagnostics, independent of the event payload.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::PassengerArrival(_) => "passenger_arrival",
            EventKind::DriverArrival(_) => "driver_arrival",
            EventKind::DriverDeparture(_) => "driver_departure",
            EventKind::MovementCompleted { .. } => "movement_completed",
            EventKind::TripCompleted { .. } => "trip_completed",
        }
    }
}

/// Simulation event. `time` is in **minutes** (simulation time).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub time: f64,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Clone, Copy)]
struct ScheduledEvent {
    seq: u64,
    event: Event,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by (time, seq): earliest first, FIFO among equal times.
        other
            .event
            .time
            .total_cmp(&self.event.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Counts of queue operations, surfaced in run diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueOpCounts {
    pub inserts: u64,
    pub pops: u64,
}

/// Simulation clock: time in **minutes**, advances to the next scheduled event.
#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    /// Current simulation time in minutes (updated when an event is popped).
    now: f64,
    next_seq: u64,
    events: BinaryHeap<ScheduledEvent>,
    op_counts: QueueOpCounts,
}

impl SimulationClock {
    /// Current simulation time in minutes.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule an event at a specific simulation timestamp (minutes).
    pub fn schedule_at(&mut self, at: f64, kind: EventKind) {
        debug_assert!(at >= self.now, "event timestamp must be >= current time");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.op_counts.inserts += 1;
        self.events.push(ScheduledEvent {
            seq,
            event: Event { time: at, kind },
        });
    }

    /// Schedule an event at `now + delta` minutes.
    pub fn schedule_in(&mut self, delta: f64, kind: EventKind) {
        self.schedule_at(self.now + delta, kind);
    }

    /// Pop the next event (earliest time; FIFO among equal times).
    /// Advances `now` to that timestamp.
    pub fn pop_next(&mut self) -> Option<Event> {
        let scheduled = self.events.pop()?;
        self.op_counts.pops += 1;
        self.now = scheduled.event.time;
        Some(scheduled.event)
    }

    /// Timestamp of the next scheduled event without popping it.
    pub fn next_event_time(&self) -> Option<f64> {
        self.events.peek().map(|scheduled| scheduled.event.time)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events still in the queue (for tests and scenario validation).
    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    pub fn op_counts(&self) -> QueueOpCounts {
        self.op_counts
    }
}
