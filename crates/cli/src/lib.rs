//! Scenario driver for the U-Stowage engine.
//!
//! This crate provides:
//! - A JSON scenario format in the shape of the stowage HTTP API
//! - A parser that rejects malformed geometry before the engine
//! - A runner that places a scenario and executes its follow-up steps
//! - JSON responses for placement, search, retrieval, waste and logs

mod parser;
mod report;
mod runner;
mod scenario;

pub use parser::{ScenarioError, ScenarioParser};
pub use report::{
    Coordinates, FailureView, ItemView, LogsResponse, PlacementResponse, PlacementView,
    RetrieveResponse, SearchResponse, SimulateResponse, StepView, WasteResponse, WasteView,
};
pub use runner::{Loaded, RunnerConfig, ScenarioRunner, StepOutcome};
pub use scenario::{Scenario, ScenarioContainer, ScenarioItem, Step};
