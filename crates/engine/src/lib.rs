//! # U-Stowage Engine
//!
//! 3D placement, retrieval and waste handling for cargo stowed in
//! rectangular containers with a single access face.
//!
//! ## Core Components
//!
//! - [`ContainerSpace`]: occupied regions of one container, ordered by depth,
//!   with corner-point position search and the blocking relation
//! - [`Catalog`]: items, containers and placements
//! - [`Placer`]: ranked container, orientation and position selection
//! - [`Retriever`]: minimal move-aside plans for extracting an item
//! - [`WasteManager`]: simulated time, expiry and waste reclamation
//! - [`Stowage`]: the service facade owning catalog, clock and event log
//! - [`SharedStowage`]: thread-safe handle serializing whole operations
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod catalog;
pub mod container;
pub mod item;
pub mod placement;
pub mod retrieval;
pub mod shared;
pub mod space;
pub mod stowage;
pub mod waste;

// Re-exports
pub use catalog::{Catalog, ItemEntry, ItemLocation};
pub use container::Container;
pub use item::{Item, RotationPolicy};
pub use placement::Placer;
pub use retrieval::{MoveAside, PlanStep, Restore, RetrievalPlan, Retriever};
pub use shared::SharedStowage;
pub use space::{ContainerSpace, OccupiedRegion};
pub use stowage::{SearchCriteria, SearchHit, Stowage};
pub use u_stowage_core::{Error, Placement, Result, StowageConfig};
pub use waste::{SimReport, WasteManager, WasteReclamation};
