//! Retrieval engine: extraction plans and their application.
//!
//! To pull an item out through the access face, everything lying in its path
//! must be moved aside first, and everything lying in the path of those items
//! as well. That set is exactly the transitive closure of the blocking
//! relation, so displacing it is both necessary and sufficient and the plan
//! cost (number of displaced items) is minimal.

use crate::catalog::{Catalog, ItemLocation};
use crate::placement::Placer;
use crate::space::ContainerSpace;
use chrono::NaiveDate;
use u_stowage_core::geometry::{ContainerId, ItemId};
use u_stowage_core::{Placement, RestorePolicy, RetrievalError, StowageConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Moves a blocking item out of the container into a staging slot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveAside {
    /// Blocking item.
    pub item_id: ItemId,
    /// Where it was.
    pub from: Placement,
    /// Temporary staging slot outside the container, 0-based.
    pub staging_slot: usize,
}

/// Puts a displaced item back into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Restore {
    /// Displaced item.
    pub item_id: ItemId,
    /// Staging slot it comes from.
    pub staging_slot: usize,
    /// Where it goes.
    pub to: Placement,
    /// True if `to` differs from the original placement.
    pub relocated: bool,
}

/// One step of a plan, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlanStep {
    /// Move a blocker aside.
    MoveAside(MoveAside),
    /// Take the target out of the container.
    Extract(Placement),
    /// Put a blocker back.
    Restore(Restore),
}

/// Ordered steps needed to take one item out of its container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RetrievalPlan {
    /// Item being extracted.
    pub target: ItemId,
    /// Container holding the target.
    pub container_id: ContainerId,
    /// Blockers to move aside, front to back.
    pub move_aside: Vec<MoveAside>,
    /// The target's placement before extraction.
    pub extraction: Placement,
    /// Blockers to put back, back to front.
    pub restore: Vec<Restore>,
}

impl RetrievalPlan {
    /// Number of displaced items.
    pub fn cost(&self) -> usize {
        self.move_aside.len()
    }

    /// Returns true if nothing has to be moved.
    pub fn is_direct(&self) -> bool {
        self.move_aside.is_empty()
    }

    /// All steps in execution order.
    pub fn steps(&self) -> Vec<PlanStep> {
        let mut steps = Vec::with_capacity(self.move_aside.len() * 2 + 1);
        steps.extend(self.move_aside.iter().cloned().map(PlanStep::MoveAside));
        steps.push(PlanStep::Extract(self.extraction.clone()));
        steps.extend(self.restore.iter().cloned().map(PlanStep::Restore));
        steps
    }

    /// Ids of the displaced items.
    pub fn displaced(&self) -> impl Iterator<Item = &ItemId> {
        self.move_aside.iter().map(|m| &m.item_id)
    }
}

/// Plans and applies extractions.
#[derive(Debug, Clone)]
pub struct Retriever {
    restore_policy: RestorePolicy,
    placer: Placer,
}

impl Retriever {
    /// Creates a retriever for the given configuration.
    pub fn new(config: &StowageConfig) -> Self {
        Self {
            restore_policy: config.restore_policy,
            placer: Placer::new(config),
        }
    }

    /// Plans the retrieval of a usable item.
    ///
    /// Fails with [`RetrievalError::NotFound`] if the item is unknown, not
    /// stowed, or waste on `today`.
    pub fn plan(
        &self,
        catalog: &Catalog,
        item_id: &str,
        today: NaiveDate,
    ) -> Result<RetrievalPlan, RetrievalError> {
        ensure_usable(catalog, item_id, today)?;
        self.plan_extraction(catalog, item_id)
            .map(|(plan, _)| plan)
    }

    /// Retrieves a usable item: applies its plan, consumes one use and
    /// leaves the item outside the container.
    pub fn retrieve(
        &self,
        catalog: &mut Catalog,
        item_id: &str,
        today: NaiveDate,
    ) -> Result<RetrievalPlan, RetrievalError> {
        ensure_usable(catalog, item_id, today)?;
        let plan = self.extract(catalog, item_id)?;
        if let Some(item) = catalog.item_mut(item_id) {
            item.consume_use();
        }
        log::info!(
            "retrieved {} from {} displacing {} item(s)",
            plan.target,
            plan.container_id,
            plan.cost()
        );
        Ok(plan)
    }

    /// Takes any stowed item out of its container, moving and restoring its
    /// blockers. Usage counters are not touched.
    pub fn extract(
        &self,
        catalog: &mut Catalog,
        item_id: &str,
    ) -> Result<RetrievalPlan, RetrievalError> {
        let (plan, space) = self.plan_extraction(catalog, item_id)?;

        let mut locations: Vec<(ItemId, ItemLocation)> = plan
            .restore
            .iter()
            .map(|r| (r.item_id.clone(), ItemLocation::Stowed(r.to.clone())))
            .collect();
        locations.push((plan.target.clone(), ItemLocation::Unstowed));

        catalog
            .commit_rearrangement(space, locations)
            .map_err(|_| RetrievalError::NotFound(item_id.to_string()))?;
        Ok(plan)
    }

    /// Builds a plan for any stowed item along with the container space as
    /// it will look once the plan has run.
    pub fn plan_extraction(
        &self,
        catalog: &Catalog,
        item_id: &str,
    ) -> Result<(RetrievalPlan, ContainerSpace), RetrievalError> {
        let not_found = || RetrievalError::NotFound(item_id.to_string());
        let extraction = catalog.placement(item_id).ok_or_else(not_found)?.clone();
        let space = catalog
            .space(&extraction.container_id)
            .ok_or_else(not_found)?;

        let mut move_aside = Vec::new();
        for (staging_slot, blocker) in space.blocking_chain(item_id).into_iter().enumerate() {
            let from = catalog
                .placement(&blocker.item_id)
                .cloned()
                .ok_or_else(|| RetrievalError::NotFound(blocker.item_id.clone()))?;
            move_aside.push(MoveAside {
                item_id: blocker.item_id.clone(),
                from,
                staging_slot,
            });
        }

        // Slots are chosen one displaced item at a time. The target and the
        // items still waiting keep their regions until then, so nothing is
        // put back into volume that is about to be vacated.
        let mut after = space.clone();
        let mut restore = Vec::with_capacity(move_aside.len());
        for step in self.restore_order(catalog, &move_aside) {
            after.remove(&step.item_id);
            let to = self.restore_slot(catalog, &after, step)?;
            after
                .insert(step.item_id.clone(), to.region)
                .map_err(|_| RetrievalError::RestoreFailed {
                    item_id: step.item_id.clone(),
                    container_id: extraction.container_id.clone(),
                })?;
            let relocated = to != step.from;
            if relocated {
                log::warn!(
                    "item {} relocated inside {} while retrieving {}",
                    step.item_id,
                    extraction.container_id,
                    item_id
                );
            }
            restore.push(Restore {
                item_id: step.item_id.clone(),
                staging_slot: step.staging_slot,
                to,
                relocated,
            });
        }
        after.remove(item_id);

        log::debug!(
            "retrieval plan for {}: {} blocker(s) in {}",
            item_id,
            move_aside.len(),
            extraction.container_id
        );

        let plan = RetrievalPlan {
            target: item_id.to_string(),
            container_id: extraction.container_id.clone(),
            move_aside,
            extraction,
            restore,
        };
        Ok((plan, after))
    }

    /// Order in which displaced items go back.
    fn restore_order<'a>(&self, catalog: &Catalog, moved: &'a [MoveAside]) -> Vec<&'a MoveAside> {
        let mut order: Vec<&MoveAside> = moved.iter().rev().collect();
        if self.restore_policy == RestorePolicy::Shallowest {
            order.sort_by(|a, b| match (catalog.item(&a.item_id), catalog.item(&b.item_id)) {
                (Some(x), Some(y)) => x.placement_order(y),
                _ => a.item_id.cmp(&b.item_id),
            });
        }
        order
    }

    /// Chooses where a displaced item goes back.
    fn restore_slot(
        &self,
        catalog: &Catalog,
        space: &ContainerSpace,
        step: &MoveAside,
    ) -> Result<Placement, RetrievalError> {
        let original_free = space.is_free(&step.from.region);
        let searched = || {
            catalog
                .item(&step.item_id)
                .and_then(|item| self.placer.find_in(item, space))
        };
        let chosen = match self.restore_policy {
            RestorePolicy::Original if original_free => Some(step.from.clone()),
            RestorePolicy::Original => searched(),
            RestorePolicy::Shallowest => {
                searched().or_else(|| original_free.then(|| step.from.clone()))
            }
        };
        chosen.ok_or_else(|| RetrievalError::RestoreFailed {
            item_id: step.item_id.clone(),
            container_id: step.from.container_id.clone(),
        })
    }
}

fn ensure_usable(catalog: &Catalog, item_id: &str, today: NaiveDate) -> Result<(), RetrievalError> {
    let usable = catalog
        .entry(item_id)
        .is_some_and(|e| e.is_stowed() && !e.is_waste(today));
    if usable {
        Ok(())
    } else {
        Err(RetrievalError::NotFound(item_id.to_string()))
    }
}
