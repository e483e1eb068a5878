//! Placement records for stowed items.

use crate::geometry::{Box3, ContainerId, ItemId, Position, Region};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Records where an item sits: container, region and the orientation used.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// The ID of the placed item.
    pub item_id: ItemId,

    /// The container holding the item.
    pub container_id: ContainerId,

    /// Occupied volume inside the container.
    pub region: Region,

    /// Index into the item's allowed orientations (0 = as declared).
    pub orientation: usize,
}

impl Placement {
    /// Creates a new placement in the declared orientation.
    pub fn new(
        item_id: impl Into<ItemId>,
        container_id: impl Into<ContainerId>,
        region: Region,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            container_id: container_id.into(),
            region,
            orientation: 0,
        }
    }

    /// Sets the orientation index.
    pub fn with_orientation(mut self, index: usize) -> Self {
        self.orientation = index;
        self
    }

    /// Returns the minimum corner.
    pub fn position(&self) -> Position {
        self.region.position
    }

    /// Returns the dimensions after orientation.
    pub fn dims(&self) -> Box3 {
        self.region.dims
    }

    /// Returns true if the item was rotated away from its declared orientation.
    pub fn is_rotated(&self) -> bool {
        self.orientation != 0
    }
}

/// Placement statistics for a set of placements.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementStats {
    /// Total number of placements.
    pub count: usize,
    /// Number of rotated placements.
    pub rotated_count: usize,
    /// Total stowed volume.
    pub total_volume: u128,
    /// Distribution of orientation indices used.
    pub orientation_distribution: HashMap<usize, usize>,
    /// Distribution of placements per container.
    pub container_distribution: HashMap<ContainerId, usize>,
}

impl PlacementStats {
    /// Computes statistics from a set of placements.
    pub fn from_placements(placements: &[Placement]) -> Self {
        let mut stats = Self {
            count: placements.len(),
            ..Default::default()
        };

        for p in placements {
            if p.is_rotated() {
                stats.rotated_count += 1;
            }
            stats.total_volume += p.region.volume();

            *stats
                .orientation_distribution
                .entry(p.orientation)
                .or_insert(0) += 1;

            *stats
                .container_distribution
                .entry(p.container_id.clone())
                .or_insert(0) += 1;
        }

        stats
    }

    /// Number of distinct containers used.
    pub fn containers_used(&self) -> usize {
        self.container_distribution.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(x: u32, w: u32) -> Region {
        Region::new(Position::new(x, 0, 0), Box3::new(w, 2, 2))
    }

    #[test]
    fn test_placement_accessors() {
        let p = Placement::new("I1", "C1", region(3, 4)).with_orientation(2);
        assert_eq!(p.position(), Position::new(3, 0, 0));
        assert_eq!(p.dims(), Box3::new(4, 2, 2));
        assert!(p.is_rotated());
    }

    #[test]
    fn test_placement_stats() {
        let placements = vec![
            Placement::new("a", "C1", region(0, 2)),
            Placement::new("b", "C1", region(2, 2)).with_orientation(1),
            Placement::new("c", "C2", region(0, 3)),
        ];

        let stats = PlacementStats::from_placements(&placements);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.rotated_count, 1);
        assert_eq!(stats.total_volume, 8 + 8 + 12);
        assert_eq!(stats.orientation_distribution.get(&0), Some(&2));
        assert_eq!(stats.container_distribution.get("C1"), Some(&2));
        assert_eq!(stats.containers_used(), 2);
    }
}
