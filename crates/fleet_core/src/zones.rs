//! Zone identifiers and the origin-destination trip-time matrix.

use serde::{Deserialize, Serialize};

/// A city zone. Ids are 1-based and dense in `[1, zone_count]`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ZoneId(pub u16);

impl ZoneId {
    /// Zero-based index into per-zone arrays.
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn from_index(index: usize) -> Self {
        ZoneId(index as u16 + 1)
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Aggregated historical trip-time statistics for one origin-destination pair.
///
/// An all-zero cell means "no data for this pair"; the travel-time oracle
/// falls back to a per-destination default in that case.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OdCell {
    /// Mean trip time in minutes.
    pub mean: f64,
    /// Standard deviation of the trip time in minutes.
    pub stdev: f64,
    /// Lower clip applied to sampled trip times.
    pub min_clip: f64,
    /// Number of historical trips behind this cell.
    pub count: f64,
}

impl OdCell {
    pub fn new(mean: f64, stdev: f64, min_clip: f64, count: f64) -> Self {
        Self {
            mean,
            stdev,
            min_clip,
            count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mean == 0.0 && self.stdev == 0.0 && self.min_clip == 0.0 && self.count == 0.0
    }
}

/// Dense (origin, destination) matrix of [OdCell]s over `[1, zone_count]²`.
#[derive(Debug, Clone)]
pub struct OdMatrix {
    zone_count: usize,
    cells: Vec<OdCell>,
}

impl OdMatrix {
    pub fn new(zone_count: usize) -> Self {
        Self {
            zone_count,
            cells: vec![OdCell::default(); zone_count * zone_count],
        }
    }

    pub fn zone_count(&self) -> usize {
        self.zone_count
    }

    /// All zone ids, ascending.
    pub fn zones(&self) -> impl Iterator<Item = ZoneId> {
        (0..self.zone_count).map(ZoneId::from_index)
    }

    pub fn get(&self, origin: ZoneId, destination: ZoneId) -> &OdCell {
        &self.cells[self.cell_index(origin, destination)]
    }

    pub fn set(&mut self, origin: ZoneId, destination: ZoneId, cell: OdCell) {
        let index = self.cell_index(origin, destination);
        self.cells[index] = cell;
    }

    fn cell_index(&self, origin: ZoneId, destination: ZoneId) -> usize {
        origin.index() * self.zone_count + destination.index()
    }
}
