//! # U-Stowage
//!
//! Cargo stowage engine for rectangular containers with a single access face.
//!
//! This crate provides:
//! - **Placement**: ranked container, orientation and corner-point position search
//! - **Retrieval**: minimal move-aside plans through the access face
//! - **Waste tracking**: simulated time, expiry, usage limits and reclamation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use u_stowage::engine::{Container, Item, Stowage};
//! use u_stowage::core::StowageConfig;
//!
//! let mut stowage = Stowage::new(StowageConfig::default());
//! let result = stowage.place_batch(
//!     vec![Item::new("I1", "Wrench", 4, 4, 4).with_priority(5)],
//!     vec![Container::new("C1", "A", 10, 10, 10)],
//! )?;
//! let plan = stowage.retrieve("I1")?;
//! ```
//!
//! ## Feature Flags
//!
//! - `engine` (default): placement, retrieval and waste engines
//! - `serde`: Serialization support

/// Core types: geometry kernel, errors, clock and event log.
pub use u_stowage_core as core;

/// Placement, retrieval and waste engines.
#[cfg(feature = "engine")]
pub use u_stowage_engine as engine;

// Re-export commonly used types at root level
pub use u_stowage_core::{Error, Placement, Result, StowageConfig};

#[cfg(feature = "engine")]
pub use u_stowage_engine::{Container, Item, SearchCriteria, SharedStowage, Stowage};
