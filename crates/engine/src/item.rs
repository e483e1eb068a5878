//! Cargo items.

use chrono::NaiveDate;
use std::cmp::Ordering;
use u_stowage_core::geometry::{orientations_from, Box3, ItemId, ORIENTATION_PERMUTATIONS};
use u_stowage_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which orientations an item may be stowed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotationPolicy {
    /// Any of the six axis-aligned orientations.
    #[default]
    Any,
    /// Height stays vertical (original and 90° around the height axis).
    Upright,
    /// Declared orientation only.
    Fixed,
}

impl RotationPolicy {
    /// Returns the allowed axis permutations, original first.
    pub fn permutations(self) -> &'static [(usize, usize, usize)] {
        match self {
            RotationPolicy::Any => &ORIENTATION_PERMUTATIONS,
            RotationPolicy::Upright => &UPRIGHT_PERMUTATIONS,
            RotationPolicy::Fixed => &FIXED_PERMUTATIONS,
        }
    }
}

const UPRIGHT_PERMUTATIONS: [(usize, usize, usize); 2] = [(0, 1, 2), (1, 0, 2)];
const FIXED_PERMUTATIONS: [(usize, usize, usize); 1] = [(0, 1, 2)];

/// A piece of cargo.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    /// Unique identifier.
    id: ItemId,

    /// Human-readable name.
    name: String,

    /// Declared dimensions (width, depth, height).
    dims: Box3,

    /// Higher is more important.
    priority: i32,

    /// Date after which the item is waste.
    expiry_date: Option<NaiveDate>,

    /// Remaining uses; `None` means unlimited.
    usage_limit: Option<u32>,

    /// Zone label matched against container zones.
    preferred_zone: String,

    /// Allowed orientations.
    rotation: RotationPolicy,
}

impl Item {
    /// Creates an item with default priority, no expiry, unlimited uses and no zone.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        width: u32,
        depth: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dims: Box3::new(width, depth, height),
            priority: 0,
            expiry_date: None,
            usage_limit: None,
            preferred_zone: String::new(),
            rotation: RotationPolicy::default(),
        }
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the expiry date.
    pub fn with_expiry(mut self, date: NaiveDate) -> Self {
        self.expiry_date = Some(date);
        self
    }

    /// Sets the number of remaining uses.
    pub fn with_usage_limit(mut self, uses: u32) -> Self {
        self.usage_limit = Some(uses);
        self
    }

    /// Sets the preferred zone.
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.preferred_zone = zone.into();
        self
    }

    /// Sets the rotation policy.
    pub fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns the ID.
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared dimensions.
    pub fn dims(&self) -> &Box3 {
        &self.dims
    }

    /// Returns the priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the expiry date.
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        self.expiry_date
    }

    /// Returns the remaining uses.
    pub fn usage_limit(&self) -> Option<u32> {
        self.usage_limit
    }

    /// Returns the preferred zone.
    pub fn preferred_zone(&self) -> &str {
        &self.preferred_zone
    }

    /// Returns the rotation policy.
    pub fn rotation(&self) -> RotationPolicy {
        self.rotation
    }

    /// Returns the distinct orientations allowed for this item, declared first.
    pub fn orientations(&self) -> Vec<Box3> {
        orientations_from(&self.dims, self.rotation.permutations())
    }

    /// Returns true if the item is expired on `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry < today)
    }

    /// Returns true if the item has no uses left.
    pub fn is_exhausted(&self) -> bool {
        self.usage_limit == Some(0)
    }

    /// Returns true if the item is waste on `today`.
    pub fn is_waste(&self, today: NaiveDate) -> bool {
        self.is_exhausted() || self.is_expired(today)
    }

    /// Consumes one use. Unlimited items are unaffected; the count never goes below zero.
    pub fn consume_use(&mut self) {
        if let Some(uses) = self.usage_limit.as_mut() {
            *uses = uses.saturating_sub(1);
        }
    }

    /// Marks the item as having no uses left.
    pub fn exhaust(&mut self) {
        self.usage_limit = Some(0);
    }

    /// Ordering for placement: higher priority first, then earlier expiry
    /// (items without expiry last), then ascending id.
    pub fn placement_order(&self, other: &Item) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| match (self.expiry_date, other.expiry_date) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Validates the item.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidArgument("Item id must not be empty".into()));
        }
        self.dims.validate().map_err(|_| {
            Error::InvalidGeometry(format!(
                "All dimensions for '{}' must be positive",
                self.id
            ))
        })
    }
}
