//! Scenario parser.
//!
//! Malformed geometry, dates and usage limits are rejected here, before
//! anything reaches the engine.

use crate::scenario::{Scenario, ScenarioContainer, ScenarioItem};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use thiserror::Error;
use u_stowage_core::parse_date;
use u_stowage_engine::{Container, Item};

/// Errors that can occur when reading scenarios.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid dimensions for {id}: {width}x{depth}x{height}")]
    InvalidDimensions {
        id: String,
        width: i64,
        depth: i64,
        height: i64,
    },

    #[error("Invalid date '{value}' for {field}")]
    InvalidDate { field: String, value: String },

    #[error("Invalid usage limit {value} for {id}")]
    InvalidUsageLimit { id: String, value: i64 },

    #[error(transparent)]
    Engine(#[from] u_stowage_core::Error),
}

/// Parser for scenario files.
#[derive(Debug, Default)]
pub struct ScenarioParser;

impl ScenarioParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses a scenario from a JSON file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Scenario, ScenarioError> {
        let content = fs::read_to_string(path)?;
        self.parse_json(&content)
    }

    /// Parses a scenario from a JSON string.
    pub fn parse_json(&self, json: &str) -> Result<Scenario, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts the scenario start date.
    pub fn start_date(&self, scenario: &Scenario) -> Result<Option<NaiveDate>, ScenarioError> {
        scenario
            .start_date
            .as_deref()
            .map(|value| convert_date("startDate", value))
            .transpose()
    }

    /// Converts the scenario containers to engine containers.
    pub fn containers(&self, scenario: &Scenario) -> Result<Vec<Container>, ScenarioError> {
        scenario.containers.iter().map(convert_container).collect()
    }

    /// Converts the scenario items to engine items.
    pub fn items(&self, scenario: &Scenario) -> Result<Vec<Item>, ScenarioError> {
        scenario.items.iter().map(convert_item).collect()
    }
}

fn convert_container(raw: &ScenarioContainer) -> Result<Container, ScenarioError> {
    let (width, depth, height) = convert_dims(&raw.container_id, raw.width, raw.depth, raw.height)?;
    Ok(Container::new(
        raw.container_id.clone(),
        raw.zone.clone(),
        width,
        depth,
        height,
    ))
}

fn convert_item(raw: &ScenarioItem) -> Result<Item, ScenarioError> {
    let (width, depth, height) = convert_dims(&raw.item_id, raw.width, raw.depth, raw.height)?;
    let mut item = Item::new(raw.item_id.clone(), raw.name.clone(), width, depth, height)
        .with_priority(raw.priority)
        .with_zone(raw.preferred_zone.clone());

    if let Some(value) = raw.expiry_date.as_deref() {
        let field = format!("{}.expiryDate", raw.item_id);
        item = item.with_expiry(convert_date(&field, value)?);
    }
    if let Some(value) = raw.usage_limit {
        let uses = u32::try_from(value).map_err(|_| ScenarioError::InvalidUsageLimit {
            id: raw.item_id.clone(),
            value,
        })?;
        item = item.with_usage_limit(uses);
    }
    Ok(item)
}

fn convert_dims(id: &str, width: i64, depth: i64, height: i64) -> Result<(u32, u32, u32), ScenarioError> {
    let positive = |v: i64| u32::try_from(v).ok().filter(|&v| v > 0);
    match (positive(width), positive(depth), positive(height)) {
        (Some(w), Some(d), Some(h)) => Ok((w, d, h)),
        _ => Err(ScenarioError::InvalidDimensions {
            id: id.to_string(),
            width,
            depth,
            height,
        }),
    }
}

fn convert_date(field: &str, value: &str) -> Result<NaiveDate, ScenarioError> {
    parse_date(value).map_err(|_| ScenarioError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}
