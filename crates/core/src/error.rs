//! Error types for U-Stowage.

use crate::geometry::{ContainerId, ItemId};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result type alias for U-Stowage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while placing an item. Reported per item; a failed item
/// never aborts the rest of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlacementError {
    /// No container, orientation and position could take the item.
    #[error("No space for item {0}")]
    NoSpace(ItemId),

    /// The item is already stowed or was submitted twice.
    #[error("Item {0} is already stowed")]
    DuplicateItem(ItemId),

    /// The item is not known to the catalog.
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// The container is not known to the catalog.
    #[error("Unknown container: {0}")]
    UnknownContainer(ContainerId),

    /// The requested region is outside the container or already occupied.
    #[error("Position in container {container_id} is unavailable for item {item_id}")]
    PositionUnavailable {
        /// Item that was being placed.
        item_id: ItemId,
        /// Target container.
        container_id: ContainerId,
    },

    /// The requested dimensions are not an allowed orientation of the item.
    #[error("Orientation not allowed for item {0}")]
    InvalidOrientation(ItemId),

    /// The item was reclaimed as waste and can no longer be placed.
    #[error("Item {0} was reclaimed as waste")]
    Reclaimed(ItemId),
}

/// Errors raised while planning or applying a retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RetrievalError {
    /// Unknown id, not currently stowed, or waste.
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// A displaced item could not be put back into its container.
    #[error("Could not restore item {item_id} into container {container_id}")]
    RestoreFailed {
        /// Displaced item.
        item_id: ItemId,
        /// Container being rearranged.
        container_id: ContainerId,
    },
}

/// Errors raised by waste reclamation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WasteError {
    /// Unknown id or already reclaimed.
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// The item is neither expired nor out of uses.
    #[error("Item {0} is not waste")]
    NotWaste(ItemId),

    /// Freeing the item's region failed.
    #[error(transparent)]
    Removal(#[from] RetrievalError),
}

/// Errors that can occur during stowage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An argument was rejected before any state was touched.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid item geometry provided.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Invalid container provided.
    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    /// Lookup found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Placement failed.
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// Retrieval failed.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// Waste reclamation failed.
    #[error(transparent)]
    Waste(#[from] WasteError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
