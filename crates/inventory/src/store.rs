//! Inventory store: the aggregate plus its history, driven together.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use stockkeeper_core::{Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult};
use stockkeeper_events::{Event, EventEnvelope, ProjectionRunner};

use crate::history::{HistoryEntry, HistoryLog};
use crate::inventory::{AddItem, Inventory, InventoryCommand, InventoryEvent, InventoryId, RemoveItem};
use crate::item::StockItem;

pub const AGGREGATE_TYPE: &str = "inventory";

/// Session-scoped inventory with its history log.
///
/// Every accepted command is applied to the aggregate, wrapped in an
/// envelope (sequence = aggregate version) and projected into the history.
/// No-ops and rejected commands leave both untouched.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    inventory: Inventory,
    history: ProjectionRunner<HistoryLog>,
}

/// Serializable view of the whole store.
#[derive(Debug, Serialize)]
pub struct InventorySnapshot<'a> {
    pub items: &'a [StockItem],
    pub total_stock: i64,
    pub history: &'a [HistoryEntry],
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::with_id(InventoryId::new(AggregateId::new()))
    }

    pub fn with_id(id: InventoryId) -> Self {
        Self {
            inventory: Inventory::empty(id),
            history: ProjectionRunner::new(HistoryLog::new()),
        }
    }

    pub fn id(&self) -> InventoryId {
        self.inventory.id_typed()
    }

    /// Add `quantity` (raw text) of `name`, merging into an existing row.
    pub fn add(
        &mut self,
        name: &str,
        quantity: &str,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Vec<InventoryEvent>> {
        let command = InventoryCommand::AddItem(AddItem {
            inventory_id: self.id(),
            name: name.to_string(),
            quantity: quantity.to_string(),
            occurred_at,
        });
        self.handle(&command)
    }

    /// Take `quantity` (raw text) of `name` out; the row disappears at zero.
    pub fn remove(
        &mut self,
        name: &str,
        quantity: &str,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Vec<InventoryEvent>> {
        let command = InventoryCommand::RemoveItem(RemoveItem {
            inventory_id: self.id(),
            name: name.to_string(),
            quantity: quantity.to_string(),
            occurred_at,
        });
        self.handle(&command)
    }

    /// Decide and record a command. Returns the recorded events; an empty
    /// list means the command was a no-op.
    ///
    /// Nothing is mutated until the envelopes are known to continue the
    /// history stream, so the inventory and its history always move together.
    pub fn handle(&mut self, command: &InventoryCommand) -> DomainResult<Vec<InventoryEvent>> {
        let events = self.inventory.handle(command)?;
        if events.is_empty() {
            tracing::debug!(?command, "inventory command changed nothing");
            return Ok(events);
        }

        let base_version = self.inventory.version();
        if let Some(cursor) = self.history.cursor() {
            if cursor.last_sequence_number() > base_version {
                return Err(DomainError::invariant(format!(
                    "history is ahead of the inventory (history at {}, inventory at {base_version})",
                    cursor.last_sequence_number()
                )));
            }
        }

        let envelopes: Vec<EventEnvelope<InventoryEvent>> = events
            .iter()
            .enumerate()
            .map(|(offset, event)| {
                EventEnvelope::new(
                    Uuid::now_v7(),
                    self.inventory.id_typed().0,
                    AGGREGATE_TYPE,
                    base_version + offset as u64 + 1,
                    event.clone(),
                )
            })
            .collect();

        for envelope in &envelopes {
            self.inventory.apply(envelope.payload());
            // Sequences start above the cursor checked above and rise by one.
            self.history
                .apply(envelope)
                .map_err(|e| DomainError::invariant(e.to_string()))?;

            let event = envelope.payload();
            tracing::info!(
                event_id = %envelope.event_id(),
                aggregate = %envelope.aggregate_id(),
                aggregate_type = envelope.aggregate_type(),
                sequence = envelope.sequence_number(),
                event_type = event.event_type(),
                item = %event.name(),
                quantity = event.quantity().get(),
                total_stock = self.inventory.total_stock(),
                "stock movement recorded"
            );
        }

        Ok(events)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn items(&self) -> &[StockItem] {
        self.inventory.items()
    }

    pub fn total_stock(&self) -> i64 {
        self.inventory.total_stock()
    }

    pub fn history(&self) -> &HistoryLog {
        self.history.projection()
    }

    pub fn snapshot(&self) -> InventorySnapshot<'_> {
        InventorySnapshot {
            items: self.items(),
            total_stock: self.total_stock(),
            history: self.history().entries(),
        }
    }
}
