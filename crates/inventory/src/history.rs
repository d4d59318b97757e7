//! Chronological log of stock movements (read model).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockkeeper_events::{Event, EventEnvelope, Projection};

use crate::inventory::InventoryEvent;
use crate::item::{ItemName, Quantity};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryAction {
    Added,
    Removed,
}

impl core::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HistoryAction::Added => f.write_str("Added"),
            HistoryAction::Removed => f.write_str("Removed"),
        }
    }
}

/// One recorded movement. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    action: HistoryAction,
    name: ItemName,
    quantity: Quantity,
    timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(
        action: HistoryAction,
        name: ItemName,
        quantity: Quantity,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            action,
            name,
            quantity,
            timestamp,
        }
    }

    pub fn action(&self) -> HistoryAction {
        self.action
    }

    pub fn name(&self) -> &ItemName {
        &self.name
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl From<&InventoryEvent> for HistoryEntry {
    fn from(event: &InventoryEvent) -> Self {
        let action = match event {
            InventoryEvent::StockAdded(_) => HistoryAction::Added,
            InventoryEvent::StockRemoved(_) => HistoryAction::Removed,
        };
        Self::new(action, event.name().clone(), event.quantity(), event.occurred_at())
    }
}

/// Append-only history, oldest entry first. Unbounded for the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Projection for HistoryLog {
    type Ev = InventoryEvent;

    fn apply(&mut self, envelope: &EventEnvelope<InventoryEvent>) {
        self.append(HistoryEntry::from(envelope.payload()));
    }
}
