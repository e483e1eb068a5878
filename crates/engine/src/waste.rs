//! Waste and time engine.
//!
//! An item is waste once it has no uses left or its expiry date lies strictly
//! before the simulated date. Waste stays where it is until reclaimed;
//! reclamation frees its region through the retrieval machinery and leaves
//! the item permanently inert.

use crate::catalog::Catalog;
use crate::retrieval::{RetrievalPlan, Retriever};
use chrono::NaiveDate;
use u_stowage_core::geometry::ItemId;
use u_stowage_core::{Result, SimClock, StowageConfig, WasteError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of a time advance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimReport {
    /// Date before the advance.
    pub previous_date: NaiveDate,
    /// Date after the advance.
    pub new_date: NaiveDate,
    /// Items that expired during the advance, in id order.
    pub newly_expired: Vec<ItemId>,
    /// All waste on the new date, in id order.
    pub waste: Vec<ItemId>,
}

/// Outcome of reclaiming one waste item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WasteReclamation {
    /// Reclaimed item.
    pub item_id: ItemId,
    /// Plan used to take it out of its container, if it was stowed.
    pub plan: Option<RetrievalPlan>,
}

impl WasteReclamation {
    /// Number of items displaced to free the waste item.
    pub fn cost(&self) -> usize {
        self.plan.as_ref().map_or(0, RetrievalPlan::cost)
    }
}

/// Identifies, ages and reclaims waste.
#[derive(Debug, Clone)]
pub struct WasteManager {
    retriever: Retriever,
}

impl WasteManager {
    /// Creates a waste manager for the given configuration.
    pub fn new(config: &StowageConfig) -> Self {
        Self {
            retriever: Retriever::new(config),
        }
    }

    /// Lists waste items on `today` in id order. Reclaimed items are excluded.
    pub fn identify_waste(&self, catalog: &Catalog, today: NaiveDate) -> Vec<ItemId> {
        catalog
            .entries()
            .filter(|e| e.is_waste(today))
            .map(|e| e.item().id().clone())
            .collect()
    }

    /// Advances the clock by `days` and exhausts every item that is expired
    /// on the new date.
    ///
    /// `days` must be positive; otherwise nothing changes.
    pub fn advance_time(
        &self,
        catalog: &mut Catalog,
        clock: &mut SimClock,
        days: i64,
    ) -> Result<SimReport> {
        let previous_date = clock.today();
        let new_date = clock.advanced_by(days)?;

        let mut newly_expired = Vec::new();
        for item in catalog.active_items_mut() {
            if item.is_expired(new_date) {
                if !item.is_expired(previous_date) {
                    newly_expired.push(item.id().clone());
                }
                item.exhaust();
            }
        }
        clock.set(new_date)?;

        let waste = self.identify_waste(catalog, new_date);
        log::info!(
            "advanced {} day(s) to {}: {} newly expired, {} waste",
            days,
            new_date,
            newly_expired.len(),
            waste.len()
        );
        Ok(SimReport {
            previous_date,
            new_date,
            newly_expired,
            waste,
        })
    }

    /// Plans the removal of a waste item without changing the catalog.
    ///
    /// Returns `None` for waste that is already out of its container.
    pub fn plan_removal(
        &self,
        catalog: &Catalog,
        item_id: &str,
        today: NaiveDate,
    ) -> std::result::Result<Option<RetrievalPlan>, WasteError> {
        let entry = catalog
            .entry(item_id)
            .filter(|e| !e.is_reclaimed())
            .ok_or_else(|| WasteError::NotFound(item_id.to_string()))?;
        if !entry.is_waste(today) {
            return Err(WasteError::NotWaste(item_id.to_string()));
        }
        if !entry.is_stowed() {
            return Ok(None);
        }
        let (plan, _) = self.retriever.plan_extraction(catalog, item_id)?;
        Ok(Some(plan))
    }

    /// Reclaims a waste item.
    pub fn reclaim(
        &self,
        catalog: &mut Catalog,
        item_id: &str,
        today: NaiveDate,
    ) -> std::result::Result<WasteReclamation, WasteError> {
        let planned = self.plan_removal(catalog, item_id, today)?;
        let plan = match planned {
            Some(_) => Some(self.retriever.extract(catalog, item_id)?),
            None => None,
        };
        catalog
            .mark_reclaimed(item_id)
            .map_err(|_| WasteError::NotFound(item_id.to_string()))?;
        let reclamation = WasteReclamation {
            item_id: item_id.to_string(),
            plan,
        };
        log::info!(
            "reclaimed waste {} displacing {} item(s)",
            item_id,
            reclamation.cost()
        );
        Ok(reclamation)
    }

    /// Reclaims several items as one unit. Either every item is reclaimed or
    /// the catalog is left exactly as it was.
    pub fn reclaim_many<S: AsRef<str>>(
        &self,
        catalog: &mut Catalog,
        item_ids: &[S],
        today: NaiveDate,
    ) -> std::result::Result<Vec<WasteReclamation>, WasteError> {
        let mut scratch = catalog.clone();
        let reclaimed = item_ids
            .iter()
            .map(|id| self.reclaim(&mut scratch, id.as_ref(), today))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        *catalog = scratch;
        Ok(reclaimed)
    }

    /// Reclaims every waste item, front-most first so that waste blocking
    /// other waste is removed rather than displaced. Nothing is reclaimed
    /// unless everything is.
    pub fn reclaim_all(
        &self,
        catalog: &mut Catalog,
        today: NaiveDate,
    ) -> std::result::Result<Vec<WasteReclamation>, WasteError> {
        let mut order: Vec<(Option<(u32, u32, u32)>, ItemId)> = catalog
            .entries()
            .filter(|e| e.is_waste(today))
            .map(|e| {
                let key = e.placement().map(|p| p.position().access_key());
                (key, e.item().id().clone())
            })
            .collect();
        // Stowed items first by depth, then unstowed ones.
        order.sort_by(|a, b| match (&a.0, &b.0) {
            (Some(x), Some(y)) => x.cmp(y).then_with(|| a.1.cmp(&b.1)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.1.cmp(&b.1),
        });

        let ids: Vec<ItemId> = order.into_iter().map(|(_, id)| id).collect();
        self.reclaim_many(catalog, &ids, today)
    }
}
