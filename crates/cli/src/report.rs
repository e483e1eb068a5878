//! JSON responses printed by the CLI.

use chrono::NaiveDate;
use serde::Serialize;
use u_stowage_core::{format_date, BatchResult, EventRecord, Placement};
use u_stowage_engine::{Item, ItemLocation, PlanStep, RetrievalPlan, SearchHit, SimReport};

/// Coordinates along the three container axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coordinates {
    pub width: u32,
    pub depth: u32,
    pub height: u32,
}

/// A committed placement.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementView {
    pub item_id: String,
    pub container_id: String,
    pub position: Coordinates,
    pub dimensions: Coordinates,
    pub rotated: bool,
}

impl From<&Placement> for PlacementView {
    fn from(p: &Placement) -> Self {
        let position = p.position();
        let dims = p.dims();
        Self {
            item_id: p.item_id.clone(),
            container_id: p.container_id.clone(),
            position: Coordinates {
                width: position.x(),
                depth: position.y(),
                height: position.z(),
            },
            dimensions: Coordinates {
                width: dims.width(),
                depth: dims.depth(),
                height: dims.height(),
            },
            rotated: p.is_rotated(),
        }
    }
}

/// An item that could not be placed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureView {
    pub item_id: String,
    pub reason: String,
}

/// Response to a placement request.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementResponse {
    pub success: bool,
    pub placements: Vec<PlacementView>,
    pub failed: Vec<FailureView>,
}

impl From<&BatchResult> for PlacementResponse {
    fn from(result: &BatchResult) -> Self {
        Self {
            success: result.all_placed(),
            placements: result.placed.iter().map(PlacementView::from).collect(),
            failed: result
                .failed
                .iter()
                .map(|(id, err)| FailureView {
                    item_id: id.clone(),
                    reason: err.to_string(),
                })
                .collect(),
        }
    }
}

/// An item with its current location.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub item_id: String,
    pub name: String,
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    pub preferred_zone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<PlacementView>,
    pub reclaimed: bool,
}

impl ItemView {
    /// Builds a view of an item at a location.
    pub fn new(item: &Item, location: &ItemLocation) -> Self {
        let placement = match location {
            ItemLocation::Stowed(p) => Some(PlacementView::from(p)),
            _ => None,
        };
        Self {
            item_id: item.id().clone(),
            name: item.name().to_string(),
            priority: item.priority(),
            expiry_date: item.expiry_date().map(format_date),
            usage_limit: item.usage_limit(),
            preferred_zone: item.preferred_zone().to_string(),
            placement,
            reclaimed: matches!(location, ItemLocation::Reclaimed),
        }
    }
}

/// Response to a search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemView>,
    /// Number of items to move aside before the item can be taken out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_cost: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResponse {
    /// A successful search.
    pub fn found(hit: &SearchHit) -> Self {
        Self {
            success: true,
            found: true,
            item: Some(ItemView::new(&hit.item, &hit.location)),
            retrieval_cost: Some(hit.blocker_count),
            message: None,
        }
    }

    /// A search that found nothing.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            success: false,
            found: false,
            item: None,
            retrieval_cost: None,
            message: Some(message.into()),
        }
    }
}

/// One step of a retrieval, numbered from 1.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub step: usize,
    pub action: &'static str,
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<PlacementView>,
}

/// Response to a retrieval.
#[derive(Debug, Clone, Serialize)]
pub struct RetrieveResponse {
    pub success: bool,
    pub message: String,
    pub steps: Vec<StepView>,
}

impl RetrieveResponse {
    /// A successful retrieval.
    pub fn retrieved(plan: &RetrievalPlan) -> Self {
        let steps = plan
            .steps()
            .into_iter()
            .enumerate()
            .map(|(i, step)| {
                let (action, item_id, to) = match step {
                    PlanStep::MoveAside(m) => ("remove", m.item_id, None),
                    PlanStep::Extract(p) => ("retrieve", p.item_id, None),
                    PlanStep::Restore(r) => {
                        let to = PlacementView::from(&r.to);
                        ("placeBack", r.item_id, Some(to))
                    }
                };
                StepView {
                    step: i + 1,
                    action,
                    item_id,
                    to,
                }
            })
            .collect();
        Self {
            success: true,
            message: format!("Retrieved item {}", plan.target),
            steps,
        }
    }

    /// A failed retrieval.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            steps: Vec::new(),
        }
    }
}

/// A waste item and why it is waste.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteView {
    pub item_id: String,
    pub name: String,
    pub reason: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<PlacementView>,
}

impl WasteView {
    /// Builds a view of a waste item on `today`.
    pub fn new(item: &Item, placement: Option<&Placement>, today: NaiveDate) -> Self {
        let reason = if item.is_expired(today) {
            "Expired"
        } else {
            "Out of Uses"
        };
        Self {
            item_id: item.id().clone(),
            name: item.name().to_string(),
            reason,
            placement: placement.map(PlacementView::from),
        }
    }
}

/// Response listing waste.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteResponse {
    pub success: bool,
    pub waste_items: Vec<WasteView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reclaimed: Vec<String>,
}

/// Response to a time advance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    pub success: bool,
    pub new_date: String,
    pub items_expired: Vec<String>,
    pub waste_items: Vec<String>,
}

impl From<&SimReport> for SimulateResponse {
    fn from(report: &SimReport) -> Self {
        Self {
            success: true,
            new_date: format_date(report.new_date),
            items_expired: report.newly_expired.clone(),
            waste_items: report.waste.clone(),
        }
    }
}

/// Response listing the event log.
#[derive(Debug, Clone, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<EventRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_stowage_core::geometry::{Box3, Position, Region};
    use u_stowage_core::PlacementError;

    #[test]
    fn test_placement_response_shape() {
        let mut result = BatchResult::new();
        result.placed.push(Placement::new(
            "I1",
            "C1",
            Region::new(Position::new(4, 0, 0), Box3::new(4, 4, 4)),
        ));
        result
            .failed
            .push(("I3".into(), PlacementError::NoSpace("I3".into())));

        let json = serde_json::to_value(PlacementResponse::from(&result)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["placements"][0]["itemId"], "I1");
        assert_eq!(json["placements"][0]["containerId"], "C1");
        assert_eq!(json["placements"][0]["position"]["width"], 4);
        assert_eq!(json["failed"][0]["reason"], "No space for item I3");
    }

    #[test]
    fn test_waste_reason() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        let expired = Item::new("I1", "Ration", 1, 1, 1)
            .with_expiry(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        let used = Item::new("I2", "Filter", 1, 1, 1).with_usage_limit(0);

        assert_eq!(WasteView::new(&expired, None, today).reason, "Expired");
        assert_eq!(WasteView::new(&used, None, today).reason, "Out of Uses");
    }
}
