//! Stowage service: the single owner of catalog, clock and event log.

use crate::catalog::{Catalog, ItemLocation};
use crate::container::Container;
use crate::item::Item;
use crate::placement::Placer;
use crate::retrieval::{RetrievalPlan, Retriever};
use crate::waste::{SimReport, WasteManager, WasteReclamation};
use chrono::NaiveDate;
use std::collections::HashMap;
use u_stowage_core::geometry::{ItemId, Region};
use u_stowage_core::{
    BatchResult, ClockSource, Error, EventKind, EventLog, EventOutcome, EventRecord, Placement,
    PlacementError, Result, RetrievalError, SimClock, StowageConfig, SystemClock, WasteError,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lookup by id or by name. The id wins when both are given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchCriteria {
    /// Exact item id.
    pub item_id: Option<ItemId>,
    /// Item name, matched case-insensitively.
    pub name: Option<String>,
}

impl SearchCriteria {
    /// Searches by id.
    pub fn by_id(id: impl Into<ItemId>) -> Self {
        Self {
            item_id: Some(id.into()),
            name: None,
        }
    }

    /// Searches by name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            item_id: None,
            name: Some(name.into()),
        }
    }
}

/// Result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchHit {
    /// The item found.
    pub item: Item,
    /// Where it is.
    pub location: ItemLocation,
    /// Number of items that would have to be moved to retrieve it.
    pub blocker_count: usize,
}

impl SearchHit {
    /// Returns the placement if the item is stowed.
    pub fn placement(&self) -> Option<&Placement> {
        match &self.location {
            ItemLocation::Stowed(p) => Some(p),
            _ => None,
        }
    }
}

/// Cargo stowage service.
///
/// Every mutating operation takes `&mut self`, runs to completion and appends
/// exactly one record to the event log, whether it succeeded or not.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use u_stowage_core::StowageConfig;
/// use u_stowage_engine::{Container, Item, Stowage};
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let mut stowage = Stowage::new(StowageConfig::default().with_start_date(start));
///
/// let result = stowage
///     .place_batch(
///         vec![Item::new("I1", "Wrench", 4, 4, 4).with_priority(5)],
///         vec![Container::new("C1", "A", 10, 10, 10)],
///     )
///     .unwrap();
/// assert!(result.all_placed());
///
/// let plan = stowage.retrieve("I1").unwrap();
/// assert_eq!(plan.cost(), 0);
/// assert_eq!(stowage.logs().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Stowage {
    config: StowageConfig,
    catalog: Catalog,
    clock: SimClock,
    log: EventLog,
    placer: Placer,
    retriever: Retriever,
    waste: WasteManager,
}

impl Stowage {
    /// Creates a service. The simulated date starts at the configured start
    /// date, or today's local date.
    pub fn new(config: StowageConfig) -> Self {
        Self::with_clock(config, &SystemClock)
    }

    /// Creates a service reading the initial date from `source` when the
    /// configuration has no start date.
    pub fn with_clock(config: StowageConfig, source: &dyn ClockSource) -> Self {
        let clock = match config.start_date {
            Some(date) => SimClock::new(date),
            None => SimClock::from_source(source),
        };
        Self {
            placer: Placer::new(&config),
            retriever: Retriever::new(&config),
            waste: WasteManager::new(&config),
            config,
            catalog: Catalog::new(),
            clock,
            log: EventLog::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &StowageConfig {
        &self.config
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the simulated date.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Registers containers. Either all are registered or none.
    pub fn add_containers(&mut self, containers: Vec<Container>) -> Result<()> {
        let mut seen: HashMap<&str, &Container> = HashMap::new();
        for container in &containers {
            container.validate()?;
            let existing = self
                .catalog
                .container(container.id())
                .or_else(|| seen.get(container.id().as_str()).copied());
            if existing.is_some_and(|e| e != container) {
                return Err(Error::InvalidContainer(format!(
                    "Container '{}' is declared with conflicting shapes or zones",
                    container.id()
                )));
            }
            seen.insert(container.id(), container);
        }
        for container in containers {
            self.catalog.add_container(container)?;
        }
        Ok(())
    }

    /// Registers containers and places a batch of items.
    ///
    /// Invalid geometry anywhere in the request rejects it before any state
    /// changes. Items that do not fit are reported per item.
    pub fn place_batch(
        &mut self,
        items: Vec<Item>,
        containers: Vec<Container>,
    ) -> Result<BatchResult> {
        let requested: Vec<String> = items.iter().map(|i| i.id().clone()).collect();
        let outcome = items
            .iter()
            .try_for_each(Item::validate)
            .and_then(|_| self.add_containers(containers))
            .and_then(|_| self.placer.place_batch(items, &mut self.catalog));

        match outcome {
            Ok(result) => {
                let outcome = if result.all_placed() {
                    EventOutcome::Success
                } else {
                    EventOutcome::Partial {
                        failed: result.failed_count(),
                    }
                };
                self.record(EventKind::Placement, requested, outcome);
                Ok(result)
            }
            Err(err) => {
                self.record(EventKind::Placement, requested, failed(&err));
                Err(err)
            }
        }
    }

    /// Puts an unstowed item at an explicit region of a container.
    pub fn place_at(
        &mut self,
        item_id: &str,
        container_id: &str,
        region: Region,
    ) -> std::result::Result<Placement, PlacementError> {
        let result = self
            .placer
            .place_at(item_id, container_id, region, &mut self.catalog);
        let affected = vec![item_id.to_string(), container_id.to_string()];
        let outcome = match &result {
            Ok(_) => EventOutcome::Success,
            Err(err) => failed(err),
        };
        self.record(EventKind::Replacement, affected, outcome);
        result
    }

    /// Looks an item up by id or name.
    pub fn search(&self, criteria: &SearchCriteria) -> Result<SearchHit> {
        if criteria.item_id.is_none() && criteria.name.is_none() {
            return Err(Error::InvalidArgument(
                "Search needs an item id or a name".into(),
            ));
        }
        // An id miss falls back to the name when both are given.
        let entry = criteria
            .item_id
            .as_deref()
            .and_then(|id| self.catalog.entry(id))
            .or_else(|| {
                criteria
                    .name
                    .as_deref()
                    .and_then(|name| self.catalog.find_by_name(name))
            });
        let entry = entry.ok_or_else(|| {
            Error::NotFound(
                criteria
                    .item_id
                    .clone()
                    .or_else(|| criteria.name.clone())
                    .unwrap_or_default(),
            )
        })?;

        let blocker_count = entry
            .placement()
            .and_then(|p| self.catalog.space(&p.container_id))
            .map_or(0, |space| space.blocking_chain(entry.item().id()).len());
        Ok(SearchHit {
            item: entry.item().clone(),
            location: entry.location().clone(),
            blocker_count,
        })
    }

    /// Plans a retrieval without changing anything.
    pub fn plan_retrieval(&self, item_id: &str) -> std::result::Result<RetrievalPlan, RetrievalError> {
        self.retriever.plan(&self.catalog, item_id, self.today())
    }

    /// Retrieves an item: moves its blockers aside, takes it out, restores
    /// the blockers and consumes one use.
    pub fn retrieve(&mut self, item_id: &str) -> std::result::Result<RetrievalPlan, RetrievalError> {
        let today = self.today();
        let result = self.retriever.retrieve(&mut self.catalog, item_id, today);
        let (affected, outcome) = match &result {
            Ok(plan) => {
                let mut affected = vec![plan.target.clone()];
                affected.extend(plan.displaced().cloned());
                (affected, EventOutcome::Success)
            }
            Err(err) => (vec![item_id.to_string()], failed(err)),
        };
        self.record(EventKind::Retrieval, affected, outcome);
        result
    }

    /// Lists waste items on the simulated date, in id order.
    pub fn identify_waste(&self) -> Vec<&Item> {
        self.waste
            .identify_waste(&self.catalog, self.today())
            .iter()
            .filter_map(|id| self.catalog.item(id))
            .collect()
    }

    /// Advances the simulated date by `days`.
    pub fn advance_time(&mut self, days: i64) -> Result<SimReport> {
        let result = self
            .waste
            .advance_time(&mut self.catalog, &mut self.clock, days);
        let (affected, outcome) = match &result {
            Ok(report) => (report.newly_expired.clone(), EventOutcome::Success),
            Err(err) => (Vec::new(), failed(err)),
        };
        self.record(EventKind::TimeAdvance, affected, outcome);
        result
    }

    /// Plans the removal of a waste item without changing anything.
    pub fn plan_waste_removal(
        &self,
        item_id: &str,
    ) -> std::result::Result<Option<RetrievalPlan>, WasteError> {
        self.waste.plan_removal(&self.catalog, item_id, self.today())
    }

    /// Reclaims one waste item.
    pub fn reclaim_waste(&mut self, item_id: &str) -> std::result::Result<WasteReclamation, WasteError> {
        let today = self.today();
        let result = self.waste.reclaim(&mut self.catalog, item_id, today);
        let (affected, outcome) = match &result {
            Ok(reclamation) => {
                let mut affected = vec![reclamation.item_id.clone()];
                if let Some(plan) = &reclamation.plan {
                    affected.extend(plan.displaced().cloned());
                }
                (affected, EventOutcome::Success)
            }
            Err(err) => (vec![item_id.to_string()], failed(err)),
        };
        self.record(EventKind::WasteReclaim, affected, outcome);
        result
    }

    /// Reclaims all waste, front-most first.
    pub fn reclaim_all_waste(
        &mut self,
    ) -> std::result::Result<Vec<WasteReclamation>, WasteError> {
        let today = self.today();
        let result = self.waste.reclaim_all(&mut self.catalog, today);
        let (affected, outcome) = match &result {
            Ok(reclaimed) => (
                reclaimed.iter().map(|r| r.item_id.clone()).collect(),
                EventOutcome::Success,
            ),
            Err(err) => (Vec::new(), failed(err)),
        };
        self.record(EventKind::WasteReclaim, affected, outcome);
        result
    }

    /// Returns the event log.
    pub fn logs(&self) -> &[EventRecord] {
        self.log.records()
    }

    /// Returns the events that mention `id`.
    pub fn logs_for<'a>(&'a self, id: &'a str) -> Vec<&'a EventRecord> {
        self.log.for_id(id).collect()
    }

    /// Returns the events of one kind.
    pub fn logs_of_kind(&self, kind: EventKind) -> Vec<&EventRecord> {
        self.log.of_kind(kind).collect()
    }

    /// Verifies the catalog invariants.
    pub fn check_invariants(&self) -> Result<()> {
        self.catalog.check_invariants()
    }

    fn record(&mut self, kind: EventKind, affected: Vec<String>, outcome: EventOutcome) {
        let date = self.clock.today();
        self.log.append(kind, date, affected, outcome);
    }
}

fn failed(err: &impl std::fmt::Display) -> EventOutcome {
    EventOutcome::Failed(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_stowage_core::geometry::{Box3, Position};
    use u_stowage_core::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stowage() -> Stowage {
        Stowage::new(StowageConfig::default().with_start_date(date(2025, 1, 1)))
    }

    fn containers() -> Vec<Container> {
        vec![Container::new("C1", "A", 10, 10, 10)]
    }

    #[test]
    fn test_clock_source_used_without_start_date() {
        let stowage = Stowage::with_clock(StowageConfig::default(), &FixedClock(date(2030, 6, 1)));
        assert_eq!(stowage.today(), date(2030, 6, 1));

        let stowage = Stowage::with_clock(
            StowageConfig::default().with_start_date(date(2025, 1, 1)),
            &FixedClock(date(2030, 6, 1)),
        );
        assert_eq!(stowage.today(), date(2025, 1, 1));
    }

    #[test]
    fn test_place_batch_records_one_event() {
        let mut stowage = stowage();
        let result = stowage
            .place_batch(
                vec![
                    Item::new("I1", "a", 4, 4, 4),
                    Item::new("I2", "b", 11, 11, 11),
                ],
                containers(),
            )
            .unwrap();
        assert_eq!(result.placed_count(), 1);

        assert_eq!(stowage.logs().len(), 1);
        let record = &stowage.logs()[0];
        assert_eq!(record.kind, EventKind::Placement);
        assert_eq!(record.outcome, EventOutcome::Partial { failed: 1 });
        assert_eq!(record.date, date(2025, 1, 1));
    }

    #[test]
    fn test_invalid_batch_changes_nothing() {
        let mut stowage = stowage();
        let err = stowage
            .place_batch(
                vec![Item::new("I1", "a", 4, 4, 4), Item::new("I2", "b", 0, 4, 4)],
                containers(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
        assert_eq!(stowage.catalog().item_count(), 0);
        assert_eq!(stowage.catalog().container_count(), 0);
        assert!(matches!(
            stowage.logs()[0].outcome,
            EventOutcome::Failed(_)
        ));
    }

    #[test]
    fn test_conflicting_containers_rejected() {
        let mut stowage = stowage();
        let err = stowage
            .add_containers(vec![
                Container::new("C1", "A", 10, 10, 10),
                Container::new("C1", "B", 10, 10, 10),
            ])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidContainer(_)));
        assert_eq!(stowage.catalog().container_count(), 0);
    }

    #[test]
    fn test_search_by_id_and_name() {
        let mut stowage = stowage();
        stowage
            .place_batch(
                vec![
                    Item::new("I1", "Oxygen Tank", 10, 4, 10).with_priority(2),
                    Item::new("I2", "Food Packet", 10, 4, 10).with_priority(1),
                ],
                containers(),
            )
            .unwrap();

        let hit = stowage.search(&SearchCriteria::by_id("I2")).unwrap();
        assert_eq!(hit.blocker_count, 1);
        assert_eq!(hit.placement().unwrap().position(), Position::new(0, 4, 0));

        let hit = stowage.search(&SearchCriteria::by_name("oxygen tank")).unwrap();
        assert_eq!(hit.item.id(), "I1");
        assert_eq!(hit.blocker_count, 0);

        assert!(matches!(
            stowage.search(&SearchCriteria::by_name("water")),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            stowage.search(&SearchCriteria::default()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_search_falls_back_to_name() {
        let mut stowage = stowage();
        stowage
            .place_batch(vec![Item::new("I1", "Oxygen Tank", 4, 4, 4)], containers())
            .unwrap();

        let both = SearchCriteria {
            item_id: Some("ghost".into()),
            name: Some("oxygen tank".into()),
        };
        assert_eq!(stowage.search(&both).unwrap().item.id(), "I1");

        let id_wins = SearchCriteria {
            item_id: Some("I1".into()),
            name: Some("water".into()),
        };
        assert_eq!(stowage.search(&id_wins).unwrap().item.id(), "I1");

        let neither = SearchCriteria {
            item_id: Some("ghost".into()),
            name: Some("water".into()),
        };
        assert_eq!(
            stowage.search(&neither).map(|hit| hit.item.id().clone()),
            Err(Error::NotFound("ghost".into()))
        );
    }

    #[test]
    fn test_retrieve_and_place_back() {
        let mut stowage = stowage();
        stowage
            .place_batch(vec![Item::new("I1", "a", 4, 4, 4)], containers())
            .unwrap();
        let region = stowage.catalog().placement("I1").unwrap().region;

        stowage.retrieve("I1").unwrap();
        assert!(stowage.catalog().placement("I1").is_none());

        let placement = stowage.place_at("I1", "C1", region).unwrap();
        assert_eq!(placement.region, region);
        assert!(stowage.check_invariants().is_ok());

        let kinds: Vec<EventKind> = stowage.logs().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Placement, EventKind::Retrieval, EventKind::Replacement]
        );
        assert_eq!(stowage.logs_for("I1").len(), 3);
    }

    #[test]
    fn test_failed_operations_are_logged() {
        let mut stowage = stowage();
        assert!(stowage.retrieve("ghost").is_err());
        assert!(stowage.advance_time(0).is_err());
        assert!(stowage
            .place_at(
                "ghost",
                "C1",
                Region::new(Position::origin(), Box3::new(1, 1, 1))
            )
            .is_err());
        assert_eq!(stowage.logs().len(), 3);
        assert!(stowage.logs().iter().all(|r| !r.outcome.is_success()));
        assert_eq!(stowage.today(), date(2025, 1, 1));
    }

    #[test]
    fn test_waste_lifecycle() {
        let mut stowage = stowage();
        stowage
            .place_batch(
                vec![
                    Item::new("I1", "a", 4, 4, 4).with_usage_limit(1),
                    Item::new("I2", "b", 4, 4, 4).with_expiry(date(2025, 1, 3)),
                ],
                containers(),
            )
            .unwrap();

        stowage.retrieve("I1").unwrap();
        let waste: Vec<&str> = stowage.identify_waste().iter().map(|i| i.id().as_str()).collect();
        assert_eq!(waste, vec!["I1"]);

        let report = stowage.advance_time(3).unwrap();
        assert_eq!(report.new_date, date(2025, 1, 4));
        assert_eq!(stowage.identify_waste().len(), 2);
        assert_eq!(
            stowage.retrieve("I2"),
            Err(RetrievalError::NotFound("I2".into()))
        );

        let reclaimed = stowage.reclaim_all_waste().unwrap();
        assert_eq!(reclaimed.len(), 2);
        assert!(stowage.identify_waste().is_empty());
        assert!(stowage.catalog().space("C1").unwrap().is_empty());
        assert_eq!(stowage.logs_of_kind(EventKind::WasteReclaim).len(), 1);
    }
}
