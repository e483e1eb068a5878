//! In-memory registry of items and containers.
//!
//! The catalog is the single source of truth: every stowed item has exactly
//! one placement, and that placement's region is present in the space of the
//! container it names.

use crate::container::Container;
use crate::item::Item;
use crate::space::ContainerSpace;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use u_stowage_core::geometry::{ContainerId, ItemId};
use u_stowage_core::{Error, Placement, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where an item currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ItemLocation {
    /// Known but outside every container (never placed, or retrieved).
    Unstowed,
    /// Inside a container.
    Stowed(Placement),
    /// Reclaimed as waste; permanently inert.
    Reclaimed,
}

/// Catalog entry for one item.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemEntry {
    item: Item,
    sequence: u64,
    location: ItemLocation,
}

impl ItemEntry {
    /// Returns the item.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Insertion order, starting at 0.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the location.
    pub fn location(&self) -> &ItemLocation {
        &self.location
    }

    /// Returns the placement if the item is stowed.
    pub fn placement(&self) -> Option<&Placement> {
        match &self.location {
            ItemLocation::Stowed(p) => Some(p),
            _ => None,
        }
    }

    /// Returns true if the item is inside a container.
    pub fn is_stowed(&self) -> bool {
        matches!(self.location, ItemLocation::Stowed(_))
    }

    /// Returns true if the item was reclaimed.
    pub fn is_reclaimed(&self) -> bool {
        matches!(self.location, ItemLocation::Reclaimed)
    }

    /// Returns true if the item is active waste on `today`.
    pub fn is_waste(&self, today: NaiveDate) -> bool {
        !self.is_reclaimed() && self.item.is_waste(today)
    }
}

/// Registry of items and containers.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Catalog {
    items: BTreeMap<ItemId, ItemEntry>,
    spaces: BTreeMap<ContainerId, ContainerSpace>,
    next_sequence: u64,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a container.
    ///
    /// Registering the same container again is a no-op; registering a
    /// different shape or zone under an existing id fails.
    pub fn add_container(&mut self, container: Container) -> Result<()> {
        container.validate()?;
        if let Some(existing) = self.spaces.get(container.id()) {
            if existing.container() != &container {
                return Err(Error::InvalidContainer(format!(
                    "Container '{}' is already registered with a different shape or zone",
                    container.id()
                )));
            }
            return Ok(());
        }
        log::debug!(
            "registered container {} ({}x{}x{}, zone {:?})",
            container.id(),
            container.interior().width(),
            container.interior().depth(),
            container.interior().height(),
            container.zone()
        );
        self.spaces
            .insert(container.id().clone(), ContainerSpace::new(container));
        Ok(())
    }

    /// Returns a container.
    pub fn container(&self, id: &str) -> Option<&Container> {
        self.spaces.get(id).map(|s| s.container())
    }

    /// Returns the space of a container.
    pub fn space(&self, id: &str) -> Option<&ContainerSpace> {
        self.spaces.get(id)
    }

    /// Iterates container spaces in id order.
    pub fn spaces(&self) -> impl Iterator<Item = &ContainerSpace> {
        self.spaces.values()
    }

    /// Number of containers.
    pub fn container_count(&self) -> usize {
        self.spaces.len()
    }

    /// Returns an item entry.
    pub fn entry(&self, id: &str) -> Option<&ItemEntry> {
        self.items.get(id)
    }

    /// Returns an item.
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id).map(|e| &e.item)
    }

    /// Iterates item entries in id order.
    pub fn entries(&self) -> impl Iterator<Item = &ItemEntry> {
        self.items.values()
    }

    /// Number of items, including reclaimed ones.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the placement of a stowed item.
    pub fn placement(&self, id: &str) -> Option<&Placement> {
        self.items.get(id).and_then(|e| e.placement())
    }

    /// Finds the first item whose name matches case-insensitively, in id order.
    pub fn find_by_name(&self, name: &str) -> Option<&ItemEntry> {
        let wanted = name.to_lowercase();
        self.items
            .values()
            .find(|e| e.item.name().to_lowercase() == wanted)
    }

    /// Adds a new item or replaces the record of an unstowed one. Returns
    /// false if the id is taken by a stowed or reclaimed item.
    pub(crate) fn upsert_unstowed(&mut self, item: Item) -> bool {
        match self.items.get_mut(item.id()) {
            Some(entry) if entry.location == ItemLocation::Unstowed => {
                entry.item = item;
                true
            }
            Some(_) => false,
            None => {
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                self.items.insert(
                    item.id().clone(),
                    ItemEntry {
                        item,
                        sequence,
                        location: ItemLocation::Unstowed,
                    },
                );
                true
            }
        }
    }

    /// Records a placement for an unstowed item and occupies its region.
    pub(crate) fn commit_placement(&mut self, placement: Placement) -> Result<()> {
        let entry = self
            .items
            .get_mut(&placement.item_id)
            .ok_or_else(|| Error::NotFound(placement.item_id.clone()))?;
        if entry.location != ItemLocation::Unstowed {
            return Err(Error::Internal(format!(
                "Item {} is not unstowed",
                placement.item_id
            )));
        }
        let space = self
            .spaces
            .get_mut(&placement.container_id)
            .ok_or_else(|| Error::NotFound(placement.container_id.clone()))?;
        space.insert(placement.item_id.clone(), placement.region)?;
        entry.location = ItemLocation::Stowed(placement);
        Ok(())
    }

    /// Swaps in a rearranged container space and updates the locations of
    /// the items that moved. All ids must be known.
    pub(crate) fn commit_rearrangement(
        &mut self,
        space: ContainerSpace,
        locations: Vec<(ItemId, ItemLocation)>,
    ) -> Result<()> {
        if !self.spaces.contains_key(space.container().id()) {
            return Err(Error::NotFound(space.container().id().clone()));
        }
        if let Some((missing, _)) = locations.iter().find(|(id, _)| !self.items.contains_key(id)) {
            return Err(Error::NotFound(missing.clone()));
        }
        self.spaces.insert(space.container().id().clone(), space);
        for (id, location) in locations {
            if let Some(entry) = self.items.get_mut(&id) {
                entry.location = location;
            }
        }
        Ok(())
    }

    /// Marks an unstowed item as reclaimed.
    pub(crate) fn mark_reclaimed(&mut self, id: &str) -> Result<()> {
        let entry = self
            .items
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        if entry.is_stowed() {
            return Err(Error::Internal(format!("Item {} is still stowed", id)));
        }
        entry.location = ItemLocation::Reclaimed;
        Ok(())
    }

    /// Gives mutable access to an item's usage and expiry state.
    pub(crate) fn item_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items.get_mut(id).map(|e| &mut e.item)
    }

    /// Iterates mutable items that are not reclaimed.
    pub(crate) fn active_items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.items
            .values_mut()
            .filter(|e| !e.is_reclaimed())
            .map(|e| &mut e.item)
    }

    /// Verifies the catalog invariants.
    pub fn check_invariants(&self) -> Result<()> {
        for space in self.spaces.values() {
            space.check_invariants().map_err(Error::Internal)?;
            for occupied in space.regions() {
                let placement = self.placement(&occupied.item_id).ok_or_else(|| {
                    Error::Internal(format!(
                        "{} occupies container {} but is not stowed",
                        occupied.item_id,
                        space.container().id()
                    ))
                })?;
                if &placement.container_id != space.container().id()
                    || placement.region != occupied.region
                {
                    return Err(Error::Internal(format!(
                        "{} placement disagrees with container {}",
                        occupied.item_id,
                        space.container().id()
                    )));
                }
            }
        }
        for entry in self.items.values() {
            if let Some(placement) = entry.placement() {
                let space = self.spaces.get(&placement.container_id).ok_or_else(|| {
                    Error::Internal(format!(
                        "{} references unknown container {}",
                        placement.item_id, placement.container_id
                    ))
                })?;
                if space.region_of(&placement.item_id) != Some(&placement.region) {
                    return Err(Error::Internal(format!(
                        "{} is missing from container {}",
                        placement.item_id, placement.container_id
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_stowage_core::geometry::{Box3, Position, Region};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add_container(Container::new("C1", "A", 10, 10, 10))
            .unwrap();
        catalog
    }

    fn placement(id: &str, x: u32) -> Placement {
        Placement::new(
            id,
            "C1",
            Region::new(Position::new(x, 0, 0), Box3::new(4, 4, 4)),
        )
    }

    #[test]
    fn test_add_container_is_idempotent() {
        let mut catalog = catalog();
        assert!(catalog
            .add_container(Container::new("C1", "A", 10, 10, 10))
            .is_ok());
        assert!(matches!(
            catalog.add_container(Container::new("C1", "B", 10, 10, 10)),
            Err(Error::InvalidContainer(_))
        ));
        assert_eq!(catalog.container_count(), 1);
    }

    #[test]
    fn test_commit_placement() {
        let mut catalog = catalog();
        assert!(catalog.upsert_unstowed(Item::new("I1", "Wrench", 4, 4, 4)));
        catalog.commit_placement(placement("I1", 0)).unwrap();

        assert!(catalog.entry("I1").unwrap().is_stowed());
        assert_eq!(catalog.space("C1").unwrap().len(), 1);
        assert!(catalog.check_invariants().is_ok());

        // A stowed id cannot be re-registered.
        assert!(!catalog.upsert_unstowed(Item::new("I1", "Other", 1, 1, 1)));
    }

    #[test]
    fn test_commit_placement_rejects_overlap() {
        let mut catalog = catalog();
        catalog.upsert_unstowed(Item::new("I1", "a", 4, 4, 4));
        catalog.upsert_unstowed(Item::new("I2", "b", 4, 4, 4));
        catalog.commit_placement(placement("I1", 0)).unwrap();

        assert!(catalog.commit_placement(placement("I2", 2)).is_err());
        assert!(!catalog.entry("I2").unwrap().is_stowed());
        assert!(catalog.check_invariants().is_ok());
    }

    #[test]
    fn test_find_by_name_case_insensitive() {
        let mut catalog = catalog();
        catalog.upsert_unstowed(Item::new("I2", "Food Packet", 1, 1, 1));
        catalog.upsert_unstowed(Item::new("I1", "food packet", 1, 1, 1));
        assert_eq!(
            catalog.find_by_name("FOOD PACKET").map(|e| e.item().id().as_str()),
            Some("I1")
        );
        assert!(catalog.find_by_name("water").is_none());
        assert_eq!(catalog.entry("I2").unwrap().sequence(), 0);
    }

    #[test]
    fn test_reclaimed_is_inert() {
        let mut catalog = catalog();
        catalog.upsert_unstowed(Item::new("I1", "a", 1, 1, 1));
        catalog.mark_reclaimed("I1").unwrap();
        assert!(catalog.entry("I1").unwrap().is_reclaimed());
        assert!(!catalog.upsert_unstowed(Item::new("I1", "a", 1, 1, 1)));
        assert_eq!(catalog.active_items_mut().count(), 0);
    }
}
