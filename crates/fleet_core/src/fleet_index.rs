//! Fleet state indices: free drivers per zone, drivers per status, and the
//! unserved-passenger backlog.
//!
//! The sets are ordered so that "pick any" is deterministic under a fixed
//! seed. Membership violations are programmer errors and abort with context.

use std::collections::{BTreeSet, HashMap, VecDeque};

use bevy_ecs::prelude::{Entity, Resource};

use crate::ecs::DriverStatus;
use crate::zones::ZoneId;

/// Free drivers currently present in each zone.
///
/// A driver appears here iff its status is [DriverStatus::Free].
#[derive(Debug, Resource)]
pub struct ZoneIndex {
    by_zone: Vec<BTreeSet<Entity>>,
}

impl ZoneIndex {
    pub fn new(zone_count: usize) -> Self {
        Self {
            by_zone: vec![BTreeSet::new(); zone_count],
        }
    }

    pub fn add(&mut self, zone: ZoneId, driver: Entity) {
        let inserted = self.by_zone[zone.index()].insert(driver);
        assert!(inserted, "driver {driver:?} already present in zone {zone}");
    }

    pub fn remove(&mut self, zone: ZoneId, driver: Entity) {
        let removed = self.by_zone[zone.index()].remove(&driver);
        assert!(removed, "driver {driver:?} not present in zone {zone}");
    }

    /// Any free driver in `zone`, lowest entity id first for determinism.
    pub fn any(&self, zone: ZoneId) -> Option<Entity> {
        self.by_zone[zone.index()].iter().next().copied()
    }

    /// First zone in `zones` that holds a free driver, with that driver.
    pub fn any_of(&self, zones: impl IntoIterator<Item = ZoneId>) -> Option<(ZoneId, Entity)> {
        zones
            .into_iter()
            .find_map(|zone| self.any(zone).map(|driver| (zone, driver)))
    }

    pub fn contains(&self, zone: ZoneId, driver: Entity) -> bool {
        self.by_zone[zone.index()].contains(&driver)
    }

    pub fn count(&self, zone: ZoneId) -> usize {
        self.by_zone[zone.index()].len()
    }

    /// Total free drivers across all zones.
    pub fn total(&self) -> usize {
        self.by_zone.iter().map(BTreeSet::len).sum()
    }
}

/// Status buckets over the whole fleet; exactly one bucket holds each driver.
#[derive(Debug, Default, Resource)]
pub struct StatusIndex {
    buckets: [BTreeSet<Entity>; 5],
    current: HashMap<Entity, DriverStatus>,
}

fn slot(status: DriverStatus) -> usize {
    match status {
        DriverStatus::Inactive => 0,
        DriverStatus::Free => 1,
        DriverStatus::Busy => 2,
        DriverStatus::MaxQueue => 3,
        DriverStatus::MarkedForDeparture => 4,
    }
}

impl StatusIndex {
    /// Place a driver in its initial bucket. Each driver registers once.
    pub fn register(&mut self, driver: Entity, status: DriverStatus) {
        let previous = self.current.insert(driver, status);
        assert!(
            previous.is_none(),
            "driver {driver:?} already registered with status {previous:?}"
        );
        self.buckets[slot(status)].insert(driver);
    }

    /// Move a driver between buckets; panics unless it is currently in `from`.
    pub fn shift(&mut self, driver: Entity, from: DriverStatus, to: DriverStatus) {
        let current = self.current.get(&driver).copied();
        assert_eq!(
            current,
            Some(from),
            "driver {driver:?} expected in status {from:?}, found {current:?}"
        );
        self.buckets[slot(from)].remove(&driver);
        self.buckets[slot(to)].insert(driver);
        self.current.insert(driver, to);
    }

    pub fn status_of(&self, driver: Entity) -> Option<DriverStatus> {
        self.current.get(&driver).copied()
    }

    pub fn contains(&self, driver: Entity, status: DriverStatus) -> bool {
        self.status_of(driver) == Some(status)
    }

    /// Any driver in `status`, lowest entity id first for determinism.
    pub fn any(&self, status: DriverStatus) -> Option<Entity> {
        self.buckets[slot(status)].iter().next().copied()
    }

    pub fn count(&self, status: DriverStatus) -> usize {
        self.buckets[slot(status)].len()
    }

    /// Number of registered drivers.
    pub fn driver_count(&self) -> usize {
        self.current.len()
    }
}

/// FIFO of passengers for whom no driver was available at arrival time.
#[derive(Debug, Default, Resource)]
pub struct UnservedBacklog {
    passengers: VecDeque<Entity>,
}

impl UnservedBacklog {
    pub fn push_back(&mut self, passenger: Entity) {
        self.passengers.push_back(passenger);
    }

    pub fn pop_front(&mut self) -> Option<Entity> {
        self.passengers.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }
}
