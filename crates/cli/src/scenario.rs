//! Scenario file types.
//!
//! Field names follow the camelCase shape of the stowage HTTP API.

use serde::{Deserialize, Serialize};

/// A stowage scenario: a placement request plus optional follow-up steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Initial simulated date (`YYYY-MM-DD`); today's date when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Containers to register.
    #[serde(default)]
    pub containers: Vec<ScenarioContainer>,
    /// Items to place.
    #[serde(default)]
    pub items: Vec<ScenarioItem>,
    /// Operations run after placement, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
}

/// A container as declared in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioContainer {
    /// Container ID
    pub container_id: String,
    /// Zone label
    pub zone: String,
    /// Interior width
    pub width: i64,
    /// Interior depth (access axis)
    pub depth: i64,
    /// Interior height
    pub height: i64,
}

/// An item as declared in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioItem {
    /// Item ID
    pub item_id: String,
    /// Display name
    pub name: String,
    /// Declared width
    pub width: i64,
    /// Declared depth
    pub depth: i64,
    /// Declared height
    pub height: i64,
    /// Higher is placed first
    #[serde(default)]
    pub priority: i32,
    /// Expiry date (`YYYY-MM-DD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    /// Remaining uses; unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<i64>,
    /// Preferred zone
    #[serde(default)]
    pub preferred_zone: String,
}

/// A follow-up operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Step {
    /// Retrieve one item.
    #[serde(rename_all = "camelCase")]
    Retrieve { item_id: String },
    /// Advance the simulated date.
    #[serde(rename_all = "camelCase")]
    Simulate { num_of_days: i64 },
    /// Reclaim one waste item.
    #[serde(rename_all = "camelCase")]
    Reclaim { item_id: String },
    /// Reclaim all waste.
    ReclaimAll,
}
