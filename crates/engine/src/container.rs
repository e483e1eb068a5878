//! Storage containers.

use u_stowage_core::geometry::{Box3, ContainerId};
use u_stowage_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A storage container with a fixed interior and a zone label.
///
/// Items enter and leave through the face at `depth = 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Container {
    /// Unique identifier.
    id: ContainerId,

    /// Zone label.
    zone: String,

    /// Interior dimensions (width, depth, height).
    interior: Box3,
}

impl Container {
    /// Creates a container.
    pub fn new(
        id: impl Into<ContainerId>,
        zone: impl Into<String>,
        width: u32,
        depth: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            zone: zone.into(),
            interior: Box3::new(width, depth, height),
        }
    }

    /// Returns the ID.
    pub fn id(&self) -> &ContainerId {
        &self.id
    }

    /// Returns the zone label.
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Returns the interior dimensions.
    pub fn interior(&self) -> &Box3 {
        &self.interior
    }

    /// Returns the interior volume.
    pub fn volume(&self) -> u128 {
        self.interior.volume()
    }

    /// Returns true if the zone label matches exactly.
    pub fn in_zone(&self, zone: &str) -> bool {
        self.zone == zone
    }

    /// Validates the container.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidContainer("Container id must not be empty".into()));
        }
        if !self.interior.is_valid() {
            return Err(Error::InvalidContainer(format!(
                "All dimensions of '{}' must be positive",
                self.id
            )));
        }
        Ok(())
    }
}
