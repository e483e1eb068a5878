//! # U-Stowage Core
//!
//! Core types shared by the U-Stowage cargo stowage engine.
//!
//! ## Core Components
//!
//! - **Geometry kernel**: integer boxes, positions and regions with
//!   closed-open overlap and containment tests, orientation enumeration
//! - **Placement records** and batch results
//! - **Errors**: per-operation error enums and a crate-wide [`Error`]
//! - **Simulated clock** and the append-only **event log**
//! - **Configuration** for the engine
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod placement;
pub mod result;

// Re-exports
pub use clock::{format_date, parse_date, ClockSource, FixedClock, SimClock, SystemClock};
pub use config::{RestorePolicy, StowageConfig};
pub use error::{Error, PlacementError, Result, RetrievalError, WasteError};
pub use event::{EventKind, EventLog, EventOutcome, EventRecord};
pub use geometry::{
    contained_in, fits, intersects, orientations, Axis, Box3, ContainerId, ItemId, Position,
    Region, ACCESS_AXIS,
};
pub use placement::{Placement, PlacementStats};
pub use result::{BatchResult, BatchSummary};
