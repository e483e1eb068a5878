//! Append-only record of mutating operations.

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of operation recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EventKind {
    /// Batch placement.
    Placement,
    /// Placement at an explicit position.
    Replacement,
    /// Retrieval of a single item.
    Retrieval,
    /// Simulated time advance.
    TimeAdvance,
    /// Waste reclamation.
    WasteReclaim,
}

/// Outcome of a recorded operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EventOutcome {
    /// Everything succeeded.
    Success,
    /// Some items failed; the rest were committed.
    Partial {
        /// Number of failed items.
        failed: usize,
    },
    /// Nothing was committed.
    Failed(String),
}

impl EventOutcome {
    /// Returns true for [`EventOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, EventOutcome::Success)
    }
}

/// One entry of the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventRecord {
    /// Position in the log, starting at 0.
    pub sequence: u64,
    /// Operation kind.
    pub kind: EventKind,
    /// Simulated date when the operation ran.
    pub date: NaiveDate,
    /// Item and container ids touched by the operation.
    pub affected: Vec<String>,
    /// Outcome.
    pub outcome: EventOutcome,
}

/// Append-only event log.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and returns it.
    pub fn append(
        &mut self,
        kind: EventKind,
        date: NaiveDate,
        affected: Vec<String>,
        outcome: EventOutcome,
    ) -> &EventRecord {
        let sequence = self.records.len() as u64;
        log::trace!("event #{} {:?} {:?}", sequence, kind, outcome);
        self.records.push(EventRecord {
            sequence,
            kind,
            date,
            affected,
            outcome,
        });
        &self.records[self.records.len() - 1]
    }

    /// Returns all records in order.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Returns the records that mention `id`.
    pub fn for_id<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a EventRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.affected.iter().any(|a| a == id))
    }

    /// Returns the records of one kind.
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &EventRecord> + '_ {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
