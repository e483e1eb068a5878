//! Container space model built on the corner-point heuristic.
//!
//! # Algorithm Overview
//!
//! Each container keeps the list of its occupied regions, sorted by their
//! coordinate along the access axis. Candidate anchor points for a new box are
//! the container origin plus, for every occupied region, its three far corners
//! projected on the three axes. A candidate is valid when the box placed there
//! stays inside the interior and intersects no occupied region.
//!
//! Candidates are tried shallowest first (minimum depth, then height, then
//! width) so that new items end up close to the access face and are cheap to
//! retrieve later.

use crate::container::Container;
use u_stowage_core::geometry::{Box3, ItemId, Position, Region, ACCESS_AXIS};
use u_stowage_core::PlacementError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A region held by an item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OccupiedRegion {
    /// Item occupying the region.
    pub item_id: ItemId,
    /// Occupied volume.
    pub region: Region,
}

impl OccupiedRegion {
    fn sort_key(&self) -> (u64, u32, u32, &str) {
        (
            self.region.min(ACCESS_AXIS),
            self.region.position.z(),
            self.region.position.x(),
            self.item_id.as_str(),
        )
    }
}

/// Occupied regions of one container.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContainerSpace {
    /// The container.
    container: Container,
    /// Occupied regions, sorted front to back.
    regions: Vec<OccupiedRegion>,
}

impl ContainerSpace {
    /// Creates an empty space for a container.
    pub fn new(container: Container) -> Self {
        Self {
            container,
            regions: Vec::new(),
        }
    }

    /// Returns the container.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Returns the occupied regions, front to back.
    pub fn regions(&self) -> &[OccupiedRegion] {
        &self.regions
    }

    /// Returns the number of occupied regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns true if nothing is stowed.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Returns total occupied volume.
    pub fn occupied_volume(&self) -> u128 {
        self.regions.iter().map(|r| r.region.volume()).sum()
    }

    /// Returns the occupied fraction of the interior (0.0 - 1.0).
    pub fn fill_ratio(&self) -> f64 {
        self.occupied_volume() as f64 / self.container.volume() as f64
    }

    /// Returns the region held by an item.
    pub fn region_of(&self, item_id: &str) -> Option<&Region> {
        self.regions
            .iter()
            .find(|r| r.item_id == item_id)
            .map(|r| &r.region)
    }

    /// Returns true if the region is inside the interior and touches no occupied volume.
    pub fn is_free(&self, region: &Region) -> bool {
        region.contained_in(self.container.interior())
            && !self.regions.iter().any(|r| r.region.intersects(region))
    }

    /// Candidate anchor points, shallowest first, without duplicates.
    pub fn candidate_positions(&self) -> Vec<Position> {
        let mut candidates = Vec::with_capacity(1 + 3 * self.regions.len());
        candidates.push(Position::origin());
        for occupied in &self.regions {
            candidates.extend(occupied.region.far_corners());
        }
        candidates.sort_by_key(|p| p.access_key());
        candidates.dedup();
        candidates
    }

    /// Finds the first candidate position where `dims` fits.
    pub fn find_position(&self, dims: &Box3) -> Option<Position> {
        if !dims.fits_within(self.container.interior()) {
            return None;
        }
        self.candidate_positions()
            .into_iter()
            .find(|&position| self.is_free(&Region::new(position, *dims)))
    }

    /// Adds an occupied region, keeping front-to-back order.
    ///
    /// Fails if the item is already present or the region is not free.
    pub fn insert(&mut self, item_id: ItemId, region: Region) -> Result<(), PlacementError> {
        if self.region_of(&item_id).is_some() {
            return Err(PlacementError::DuplicateItem(item_id));
        }
        if !self.is_free(&region) {
            return Err(PlacementError::PositionUnavailable {
                item_id,
                container_id: self.container.id().clone(),
            });
        }
        let occupied = OccupiedRegion { item_id, region };
        let idx = self
            .regions
            .partition_point(|r| r.sort_key() < occupied.sort_key());
        self.regions.insert(idx, occupied);
        Ok(())
    }

    /// Removes an item's region and returns it.
    pub fn remove(&mut self, item_id: &str) -> Option<Region> {
        let idx = self.regions.iter().position(|r| r.item_id == item_id)?;
        Some(self.regions.remove(idx).region)
    }

    /// Items that directly block `item_id`, front to back.
    pub fn direct_blockers(&self, item_id: &str) -> Vec<&OccupiedRegion> {
        let Some(target) = self.region_of(item_id) else {
            return Vec::new();
        };
        self.regions
            .iter()
            .filter(|r| r.item_id != item_id && r.region.blocks(target))
            .collect()
    }

    /// Items that block `item_id` directly or through another blocker,
    /// ordered so that every item comes after everything blocking it.
    pub fn blocking_chain(&self, item_id: &str) -> Vec<&OccupiedRegion> {
        let Some(target) = self.region_of(item_id) else {
            return Vec::new();
        };

        // Everything in the chain sits in front of the target, so one
        // back-to-front sweep over the sorted regions reaches a fixed point.
        let mut in_chain = vec![false; self.regions.len()];
        let mut frontier: Vec<Region> = vec![*target];
        for (idx, occupied) in self.regions.iter().enumerate().rev() {
            if occupied.item_id == item_id {
                continue;
            }
            if frontier.iter().any(|f| occupied.region.blocks(f)) {
                in_chain[idx] = true;
                frontier.push(occupied.region);
            }
        }

        self.regions
            .iter()
            .zip(in_chain)
            .filter_map(|(r, keep)| keep.then_some(r))
            .collect()
    }

    /// Checks that regions are inside the interior and pairwise disjoint.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (i, a) in self.regions.iter().enumerate() {
            if !a.region.contained_in(self.container.interior()) {
                return Err(format!(
                    "{} leaves container {}",
                    a.item_id,
                    self.container.id()
                ));
            }
            for b in &self.regions[i + 1..] {
                if a.region.intersects(&b.region) {
                    return Err(format!(
                        "{} and {} overlap in container {}",
                        a.item_id,
                        b.item_id,
                        self.container.id()
                    ));
                }
            }
        }
        if self
            .regions
            .windows(2)
            .any(|w| w[0].sort_key() > w[1].sort_key())
        {
            return Err(format!(
                "regions of container {} are out of order",
                self.container.id()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn space(w: u32, d: u32, h: u32) -> ContainerSpace {
        ContainerSpace::new(Container::new("C1", "A", w, d, h))
    }

    fn region(x: u32, y: u32, z: u32, w: u32, d: u32, h: u32) -> Region {
        Region::new(Position::new(x, y, z), Box3::new(w, d, h))
    }

    #[test]
    fn test_empty_space_uses_origin() {
        let s = space(10, 10, 10);
        assert_eq!(s.candidate_positions(), vec![Position::origin()]);
        assert_eq!(
            s.find_position(&Box3::new(4, 4, 4)),
            Some(Position::origin())
        );
        assert_eq!(s.find_position(&Box3::new(11, 1, 1)), None);
    }

    #[test]
    fn test_second_box_goes_beside_not_behind() {
        let mut s = space(10, 10, 10);
        s.insert("I1".into(), region(0, 0, 0, 4, 4, 4)).unwrap();

        // (4,0,0) and (0,0,4) are both at depth 0; height breaks the tie.
        assert_eq!(
            s.find_position(&Box3::new(4, 4, 4)),
            Some(Position::new(4, 0, 0))
        );
    }

    #[test]
    fn test_candidates_sorted_by_depth_height_width() {
        let mut s = space(10, 10, 10);
        s.insert("I1".into(), region(0, 0, 0, 4, 4, 4)).unwrap();
        assert_eq!(
            s.candidate_positions(),
            vec![
                Position::new(0, 0, 0),
                Position::new(4, 0, 0),
                Position::new(0, 0, 4),
                Position::new(0, 4, 0),
            ]
        );
    }

    #[test]
    fn test_insert_rejects_overlap_and_overflow() {
        let mut s = space(10, 10, 10);
        s.insert("I1".into(), region(0, 0, 0, 4, 4, 4)).unwrap();

        let overlap = s.insert("I2".into(), region(2, 2, 2, 4, 4, 4));
        assert!(matches!(
            overlap,
            Err(PlacementError::PositionUnavailable { .. })
        ));

        let outside = s.insert("I3".into(), region(8, 0, 0, 4, 4, 4));
        assert!(outside.is_err());

        let duplicate = s.insert("I1".into(), region(5, 5, 5, 1, 1, 1));
        assert_eq!(duplicate, Err(PlacementError::DuplicateItem("I1".into())));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_remove_frees_space() {
        let mut s = space(4, 4, 4);
        s.insert("I1".into(), region(0, 0, 0, 4, 4, 4)).unwrap();
        assert_eq!(s.find_position(&Box3::new(1, 1, 1)), None);

        assert_eq!(s.remove("I1"), Some(region(0, 0, 0, 4, 4, 4)));
        assert_eq!(s.remove("I1"), None);
        assert_eq!(
            s.find_position(&Box3::new(4, 4, 4)),
            Some(Position::origin())
        );
    }

    #[test]
    fn test_fill_ratio() {
        let mut s = space(10, 10, 10);
        s.insert("I1".into(), region(0, 0, 0, 5, 10, 10)).unwrap();
        assert_relative_eq!(s.fill_ratio(), 0.5, epsilon = 1e-12);
        assert_eq!(s.occupied_volume(), 500);
    }

    #[test]
    fn test_regions_kept_front_to_back() {
        let mut s = space(10, 10, 10);
        s.insert("back".into(), region(0, 6, 0, 2, 2, 2)).unwrap();
        s.insert("front".into(), region(0, 0, 0, 2, 2, 2)).unwrap();
        s.insert("middle".into(), region(0, 3, 0, 2, 2, 2)).unwrap();

        let order: Vec<&str> = s.regions().iter().map(|r| r.item_id.as_str()).collect();
        assert_eq!(order, vec!["front", "middle", "back"]);
        assert!(s.check_invariants().is_ok());
    }

    #[test]
    fn test_blocking_chain_is_transitive() {
        let mut s = space(10, 10, 10);
        s.insert("target".into(), region(0, 6, 0, 2, 2, 2)).unwrap();
        // Directly in front of the target.
        s.insert("direct".into(), region(1, 3, 0, 2, 2, 2)).unwrap();
        // Blocks "direct" but not the target (no width overlap with it).
        s.insert("indirect".into(), region(2, 0, 0, 2, 2, 2)).unwrap();
        // Off to the side, blocks nothing.
        s.insert("aside".into(), region(6, 0, 0, 2, 2, 2)).unwrap();
        // Behind the target.
        s.insert("behind".into(), region(0, 8, 0, 2, 2, 2)).unwrap();

        let direct: Vec<&str> = s
            .direct_blockers("target")
            .iter()
            .map(|r| r.item_id.as_str())
            .collect();
        assert_eq!(direct, vec!["direct"]);

        let chain: Vec<&str> = s
            .blocking_chain("target")
            .iter()
            .map(|r| r.item_id.as_str())
            .collect();
        assert_eq!(chain, vec!["indirect", "direct"]);
    }

    #[test]
    fn test_blocking_chain_of_front_item_is_empty() {
        let mut s = space(10, 10, 10);
        s.insert("front".into(), region(0, 0, 0, 2, 2, 2)).unwrap();
        s.insert("back".into(), region(0, 2, 0, 2, 2, 2)).unwrap();
        assert!(s.blocking_chain("front").is_empty());
        assert_eq!(s.blocking_chain("back").len(), 1);
        assert!(s.blocking_chain("missing").is_empty());
    }
}
