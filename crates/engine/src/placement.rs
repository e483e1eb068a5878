//! Placement engine: container, orientation and position selection.

use crate::catalog::Catalog;
use crate::item::Item;
use crate::space::ContainerSpace;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::Instant;
use u_stowage_core::geometry::{Box3, Region};
use u_stowage_core::{BatchResult, Error, Placement, PlacementError, Result, StowageConfig};

/// Chooses where incoming items go.
///
/// Containers are ranked by exact zone match, then by ascending fill ratio,
/// then by id. Inside each container, orientations are tried in the item's
/// order (declared first) and the shallowest free corner point wins.
#[derive(Debug, Clone)]
pub struct Placer {
    allow_rotation: bool,
}

impl Placer {
    /// Creates a placer for the given configuration.
    pub fn new(config: &StowageConfig) -> Self {
        Self {
            allow_rotation: config.allow_rotation,
        }
    }

    /// Orientations the placer will try for an item.
    pub fn orientations(&self, item: &Item) -> Vec<Box3> {
        let mut orientations = item.orientations();
        if !self.allow_rotation {
            orientations.truncate(1);
        }
        orientations
    }

    /// Ranks candidate containers for an item.
    pub fn rank_containers<'a>(&self, item: &Item, catalog: &'a Catalog) -> Vec<&'a ContainerSpace> {
        let mut spaces: Vec<&ContainerSpace> = catalog.spaces().collect();
        spaces.sort_by(|a, b| {
            let a_match = a.container().in_zone(item.preferred_zone());
            let b_match = b.container().in_zone(item.preferred_zone());
            b_match
                .cmp(&a_match)
                .then_with(|| compare_fill(a, b))
                .then_with(|| a.container().id().cmp(b.container().id()))
        });
        spaces
    }

    /// Finds a slot for an item inside one container.
    pub fn find_in(&self, item: &Item, space: &ContainerSpace) -> Option<Placement> {
        self.orientations(item)
            .iter()
            .enumerate()
            .find_map(|(orientation, dims)| {
                space.find_position(dims).map(|position| {
                    Placement::new(
                        item.id().clone(),
                        space.container().id().clone(),
                        Region::new(position, *dims),
                    )
                    .with_orientation(orientation)
                })
            })
    }

    /// Finds a slot for an item without modifying the catalog.
    pub fn plan(&self, item: &Item, catalog: &Catalog) -> std::result::Result<Placement, PlacementError> {
        for space in self.rank_containers(item, catalog) {
            if let Some(placement) = self.find_in(item, space) {
                log::debug!(
                    "item {} -> container {} at ({}, {}, {}) orientation {}",
                    item.id(),
                    placement.container_id,
                    placement.position().x(),
                    placement.position().y(),
                    placement.position().z(),
                    placement.orientation
                );
                return Ok(placement);
            }
        }
        Err(PlacementError::NoSpace(item.id().clone()))
    }

    /// Places a single item and records it in the catalog.
    ///
    /// The item is registered even when no slot is found, so it stays
    /// searchable and can be retried later.
    pub fn place(&self, item: Item, catalog: &mut Catalog) -> std::result::Result<Placement, PlacementError> {
        if catalog.entry(item.id()).is_some_and(|e| e.is_reclaimed()) {
            return Err(PlacementError::Reclaimed(item.id().clone()));
        }
        if catalog.entry(item.id()).is_some_and(|e| e.is_stowed()) {
            return Err(PlacementError::DuplicateItem(item.id().clone()));
        }
        let planned = self.plan(&item, catalog);
        let id = item.id().clone();
        catalog.upsert_unstowed(item);
        let placement = planned?;
        catalog
            .commit_placement(placement.clone())
            .map_err(|_| PlacementError::NoSpace(id))?;
        Ok(placement)
    }

    /// Places a batch of items in placement order.
    ///
    /// Every item is validated before anything is committed; a single invalid
    /// item rejects the whole batch. Items that do not fit are reported in
    /// [`BatchResult::failed`] and do not stop the rest of the batch.
    pub fn place_batch(&self, items: Vec<Item>, catalog: &mut Catalog) -> Result<BatchResult> {
        let start = Instant::now();
        for item in &items {
            item.validate()?;
        }

        let mut order = items;
        order.sort_by(|a, b| a.placement_order(b));

        let mut result = BatchResult::new();
        let mut seen = HashSet::new();
        for item in order {
            if !seen.insert(item.id().clone()) {
                result.failed.push((
                    item.id().clone(),
                    PlacementError::DuplicateItem(item.id().clone()),
                ));
                continue;
            }
            let id = item.id().clone();
            match self.place(item, catalog) {
                Ok(placement) => result.placed.push(placement),
                Err(err) => {
                    log::warn!("could not place item {}: {}", id, err);
                    result.failed.push((id, err));
                }
            }
        }

        result.computation_time_ms = start.elapsed().as_millis() as u64;
        log::info!(
            "placed {} of {} items",
            result.placed_count(),
            result.placed_count() + result.failed_count()
        );
        Ok(result)
    }

    /// Places an unstowed item at an explicit region of a container.
    pub fn place_at(
        &self,
        item_id: &str,
        container_id: &str,
        region: Region,
        catalog: &mut Catalog,
    ) -> std::result::Result<Placement, PlacementError> {
        let entry = catalog
            .entry(item_id)
            .ok_or_else(|| PlacementError::UnknownItem(item_id.to_string()))?;
        if entry.is_reclaimed() {
            return Err(PlacementError::Reclaimed(item_id.to_string()));
        }
        if entry.is_stowed() {
            return Err(PlacementError::DuplicateItem(item_id.to_string()));
        }
        let orientation = self
            .orientations(entry.item())
            .iter()
            .position(|dims| *dims == region.dims)
            .ok_or_else(|| PlacementError::InvalidOrientation(item_id.to_string()))?;
        let space = catalog
            .space(container_id)
            .ok_or_else(|| PlacementError::UnknownContainer(container_id.to_string()))?;
        if !space.is_free(&region) {
            return Err(PlacementError::PositionUnavailable {
                item_id: item_id.to_string(),
                container_id: container_id.to_string(),
            });
        }

        let placement = Placement::new(item_id, container_id, region).with_orientation(orientation);
        catalog
            .commit_placement(placement.clone())
            .map_err(|err| match err {
                Error::Placement(inner) => inner,
                _ => PlacementError::PositionUnavailable {
                    item_id: item_id.to_string(),
                    container_id: container_id.to_string(),
                },
            })?;
        Ok(placement)
    }
}

/// Orders two spaces by ascending fill ratio using exact integer arithmetic.
fn compare_fill(a: &ContainerSpace, b: &ContainerSpace) -> Ordering {
    compare_ratio(
        a.occupied_volume(),
        a.container().volume(),
        b.occupied_volume(),
        b.container().volume(),
    )
}

/// Compares `an / ad` with `bn / bd` by continued-fraction expansion, so no
/// cross product is formed. Both denominators must be positive.
fn compare_ratio(mut an: u128, mut ad: u128, mut bn: u128, mut bd: u128) -> Ordering {
    loop {
        let (qa, qb) = (an / ad, bn / bd);
        if qa != qb {
            return qa.cmp(&qb);
        }
        let (ra, rb) = (an % ad, bn % bd);
        match (ra, rb) {
            (0, 0) => return Ordering::Equal,
            (0, _) => return Ordering::Less,
            (_, 0) => return Ordering::Greater,
            // ra/ad < rb/bd exactly when bd/rb < ad/ra.
            _ => (an, ad, bn, bd) = (bd, rb, ad, ra),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use crate::item::RotationPolicy;
    use u_stowage_core::geometry::Position;

    fn catalog_with(containers: &[Container]) -> Catalog {
        let mut catalog = Catalog::new();
        for c in containers {
            catalog.add_container(c.clone()).unwrap();
        }
        catalog
    }

    fn placer() -> Placer {
        Placer::new(&StowageConfig::default())
    }

    #[test]
    fn test_simple_batch() {
        let mut catalog = catalog_with(&[Container::new("C1", "A", 10, 10, 10)]);
        let items = vec![
            Item::new("I1", "a", 4, 4, 4).with_priority(5).with_zone("A"),
            Item::new("I2", "b", 4, 4, 4).with_priority(3).with_zone("A"),
            Item::new("I3", "c", 10, 10, 10).with_priority(1).with_zone("A"),
        ];

        let result = placer().place_batch(items, &mut catalog).unwrap();

        assert_eq!(result.placed_count(), 2);
        assert_eq!(
            result.placement_of("I1").unwrap().position(),
            Position::origin()
        );
        assert_eq!(
            result.placement_of("I2").unwrap().position(),
            Position::new(4, 0, 0)
        );
        assert_eq!(
            result.failure_of("I3"),
            Some(&PlacementError::NoSpace("I3".into()))
        );
        assert!(catalog.entry("I3").is_some());
        assert!(catalog.check_invariants().is_ok());
    }

    #[test]
    fn test_zone_preference() {
        let mut catalog = catalog_with(&[
            Container::new("C1", "A", 10, 10, 10),
            Container::new("C2", "B", 10, 10, 10),
        ]);
        let placement = placer()
            .place(Item::new("I1", "a", 2, 2, 2).with_zone("B"), &mut catalog)
            .unwrap();
        assert_eq!(placement.container_id, "C2");
    }

    #[test]
    fn test_falls_back_to_other_zone() {
        let mut catalog = catalog_with(&[
            Container::new("C1", "A", 2, 2, 2),
            Container::new("C2", "B", 10, 10, 10),
        ]);
        let placement = placer()
            .place(Item::new("I1", "a", 5, 5, 5).with_zone("A"), &mut catalog)
            .unwrap();
        assert_eq!(placement.container_id, "C2");
    }

    #[test]
    fn test_prefers_emptier_container() {
        let mut catalog = catalog_with(&[
            Container::new("C1", "A", 10, 10, 10),
            Container::new("C2", "A", 10, 10, 10),
        ]);
        let p = placer();
        let first = p.place(Item::new("I1", "a", 5, 5, 5).with_zone("A"), &mut catalog).unwrap();
        let second = p.place(Item::new("I2", "b", 5, 5, 5).with_zone("A"), &mut catalog).unwrap();
        assert_eq!(first.container_id, "C1");
        assert_eq!(second.container_id, "C2");
    }

    #[test]
    fn test_rotation_used_when_needed() {
        let mut catalog = catalog_with(&[Container::new("C1", "A", 10, 2, 2)]);
        let placement = placer()
            .place(Item::new("I1", "pole", 2, 10, 2), &mut catalog)
            .unwrap();
        assert_eq!(placement.dims(), Box3::new(10, 2, 2));
        assert!(placement.is_rotated());

        let fixed = placer().place(
            Item::new("I2", "pole", 2, 10, 2).with_rotation(RotationPolicy::Fixed),
            &mut catalog,
        );
        assert_eq!(fixed, Err(PlacementError::NoSpace("I2".into())));
    }

    #[test]
    fn test_rotation_disabled_by_config() {
        let mut catalog = catalog_with(&[Container::new("C1", "A", 10, 2, 2)]);
        let placer = Placer::new(&StowageConfig::default().with_rotation(false));
        let result = placer.place(Item::new("I1", "pole", 2, 10, 2), &mut catalog);
        assert_eq!(result, Err(PlacementError::NoSpace("I1".into())));
    }

    #[test]
    fn test_batch_rejects_invalid_geometry_before_commit() {
        let mut catalog = catalog_with(&[Container::new("C1", "A", 10, 10, 10)]);
        let items = vec![
            Item::new("I1", "ok", 1, 1, 1),
            Item::new("I2", "flat", 1, 0, 1),
        ];
        let result = placer().place_batch(items, &mut catalog);
        assert!(matches!(result, Err(Error::InvalidGeometry(_))));
        assert_eq!(catalog.item_count(), 0);
    }

    #[test]
    fn test_batch_duplicate_ids() {
        let mut catalog = catalog_with(&[Container::new("C1", "A", 10, 10, 10)]);
        let items = vec![Item::new("I1", "a", 1, 1, 1), Item::new("I1", "b", 1, 1, 1)];
        let result = placer().place_batch(items, &mut catalog).unwrap();
        assert_eq!(result.placed_count(), 1);
        assert_eq!(
            result.failure_of("I1"),
            Some(&PlacementError::DuplicateItem("I1".into()))
        );
    }

    #[test]
    fn test_unplaced_item_can_be_retried() {
        let mut catalog = catalog_with(&[Container::new("C1", "A", 4, 4, 4)]);
        let p = placer();
        p.place(Item::new("I1", "a", 4, 4, 4), &mut catalog).unwrap();
        assert!(p.place(Item::new("I2", "b", 4, 4, 4), &mut catalog).is_err());

        catalog.add_container(Container::new("C2", "A", 4, 4, 4)).unwrap();
        let retry = p.place(Item::new("I2", "b", 4, 4, 4), &mut catalog).unwrap();
        assert_eq!(retry.container_id, "C2");
    }

    #[test]
    fn test_place_at() {
        let mut catalog = catalog_with(&[Container::new("C1", "A", 10, 10, 10)]);
        let p = placer();
        p.place(Item::new("I1", "a", 4, 4, 4), &mut catalog).unwrap();
        catalog.upsert_unstowed(Item::new("I2", "b", 2, 3, 4));

        let taken = Region::new(Position::new(2, 0, 0), Box3::new(2, 3, 4));
        assert!(matches!(
            p.place_at("I2", "C1", taken, &mut catalog),
            Err(PlacementError::PositionUnavailable { .. })
        ));

        let wrong = Region::new(Position::new(5, 5, 5), Box3::new(2, 2, 2));
        assert_eq!(
            p.place_at("I2", "C1", wrong, &mut catalog),
            Err(PlacementError::InvalidOrientation("I2".into()))
        );

        let rotated = Region::new(Position::new(5, 5, 5), Box3::new(4, 3, 2));
        let placed = p.place_at("I2", "C1", rotated, &mut catalog).unwrap();
        assert!(placed.is_rotated());
        assert!(catalog.check_invariants().is_ok());
    }
    #[test]
    fn test_compare_ratio() {
        assert_eq!(compare_ratio(1, 2, 2, 4), Ordering::Equal);
        assert_eq!(compare_ratio(0, 7, 0, 3), Ordering::Equal);
        assert_eq!(compare_ratio(1, 3, 1, 2), Ordering::Less);
        assert_eq!(compare_ratio(5, 4, 9, 8), Ordering::Greater);
        assert_eq!(compare_ratio(0, 5, 1, u128::MAX), Ordering::Less);

        let big = u128::from(u32::MAX).pow(3);
        assert_eq!(compare_ratio(big - 1, big, big - 2, big - 1), Ordering::Greater);
        assert_eq!(compare_ratio(big / 3, big, 1, 3), Ordering::Equal);
        assert_eq!(compare_ratio(1, big, 1, big - 1), Ordering::Less);
    }

    #[test]
    fn test_huge_containers() {
        let side = 5_000_000;
        let mut catalog = catalog_with(&[
            Container::new("C1", "A", side, side, side),
            Container::new("C2", "A", side, side, side),
        ]);
        let p = placer();
        let first = p.place(Item::new("I1", "a", 1, 1, 1).with_zone("A"), &mut catalog).unwrap();
        let second = p.place(Item::new("I2", "b", 1, 1, 1).with_zone("A"), &mut catalog).unwrap();
        assert_eq!(first.container_id, "C1");
        assert_eq!(second.container_id, "C2");

        let full = Container::new("C3", "A", u32::MAX, u32::MAX, u32::MAX);
        let mut catalog = catalog_with(&[full]);
        let result = p
            .place_batch(vec![Item::new("I1", "a", u32::MAX, u32::MAX, u32::MAX)], &mut catalog)
            .unwrap();
        assert_eq!(result.placed_count(), 1);
        assert_eq!(
            catalog.space("C3").unwrap().occupied_volume(),
            catalog.space("C3").unwrap().container().volume()
        );
    }
}
