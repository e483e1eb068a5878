//! Batch placement result representation.

use crate::error::PlacementError;
use crate::geometry::ItemId;
use crate::placement::{Placement, PlacementStats};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a batch placement.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatchResult {
    /// Placements of every item that found a slot, in processing order.
    pub placed: Vec<Placement>,

    /// Items that could not be placed, with the reason.
    pub failed: Vec<(ItemId, PlacementError)>,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,
}

impl BatchResult {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if every item was placed.
    pub fn all_placed(&self) -> bool {
        self.failed.is_empty()
    }

    /// Returns the number of placed items.
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Returns the number of failed items.
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Returns the placement for an item, if it was placed.
    pub fn placement_of(&self, item_id: &str) -> Option<&Placement> {
        self.placed.iter().find(|p| p.item_id == item_id)
    }

    /// Returns the failure for an item, if it failed.
    pub fn failure_of(&self, item_id: &str) -> Option<&PlacementError> {
        self.failed
            .iter()
            .find(|(id, _)| id == item_id)
            .map(|(_, err)| err)
    }

    /// Computes placement statistics.
    pub fn placement_stats(&self) -> PlacementStats {
        PlacementStats::from_placements(&self.placed)
    }
}

/// Summary statistics for a batch result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatchSummary {
    /// Total items requested.
    pub total_requested: usize,
    /// Total items placed.
    pub total_placed: usize,
    /// Total items rotated away from their declared orientation.
    pub total_rotated: usize,
    /// Number of containers receiving at least one item.
    pub containers_used: usize,
    /// Computation time in milliseconds.
    pub time_ms: u64,
}

impl From<&BatchResult> for BatchSummary {
    fn from(result: &BatchResult) -> Self {
        let stats = result.placement_stats();
        Self {
            total_requested: result.placed.len() + result.failed.len(),
            total_placed: result.placed.len(),
            total_rotated: stats.rotated_count,
            containers_used: stats.containers_used(),
            time_ms: result.computation_time_ms,
        }
    }
}
