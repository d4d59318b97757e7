use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockkeeper_core::{Aggregate, AggregateId, AggregateRoot, DomainError};
use stockkeeper_events::Event;

use crate::item::{ItemName, Quantity, StockItem};

/// Inventory identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryId(pub AggregateId);

impl InventoryId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InventoryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: the ordered list of stock items, unique by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    id: InventoryId,
    items: Vec<StockItem>,
    version: u64,
}

impl Inventory {
    pub fn empty(id: InventoryId) -> Self {
        Self {
            id,
            items: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> InventoryId {
        self.id
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    pub fn get(&self, name: &ItemName) -> Option<&StockItem> {
        self.items.iter().find(|item| item.name() == name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all current items.
    pub fn total_stock(&self) -> i64 {
        self.items.iter().map(StockItem::quantity).sum()
    }
}

impl AggregateRoot for Inventory {
    type Id = InventoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem. Quantity is the raw text the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub inventory_id: InventoryId,
    pub name: String,
    pub quantity: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem. Quantity is the raw text the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub inventory_id: InventoryId,
    pub name: String,
    pub quantity: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCommand {
    AddItem(AddItem),
    RemoveItem(RemoveItem),
}

/// Event: StockAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdded {
    pub inventory_id: InventoryId,
    pub name: ItemName,
    pub quantity: Quantity,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockRemoved. `quantity` is what was asked for, which may exceed
/// the stock that was on hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRemoved {
    pub inventory_id: InventoryId,
    pub name: ItemName,
    pub quantity: Quantity,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    StockAdded(StockAdded),
    StockRemoved(StockRemoved),
}

impl InventoryEvent {
    pub fn name(&self) -> &ItemName {
        match self {
            InventoryEvent::StockAdded(e) => &e.name,
            InventoryEvent::StockRemoved(e) => &e.name,
        }
    }

    pub fn quantity(&self) -> Quantity {
        match self {
            InventoryEvent::StockAdded(e) => e.quantity,
            InventoryEvent::StockRemoved(e) => e.quantity,
        }
    }
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::StockAdded(_) => "inventory.stock.added",
            InventoryEvent::StockRemoved(_) => "inventory.stock.removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::StockAdded(e) => e.occurred_at,
            InventoryEvent::StockRemoved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Inventory {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::StockAdded(e) => {
                let amount = e.quantity.get();
                self.items = if self.get(&e.name).is_some() {
                    self.items
                        .iter()
                        .map(|item| {
                            if item.name() == &e.name {
                                item.with_quantity(item.quantity().saturating_add(amount))
                            } else {
                                item.clone()
                            }
                        })
                        .collect()
                } else {
                    self.items
                        .iter()
                        .cloned()
                        .chain(core::iter::once(StockItem::new(e.name.clone(), amount)))
                        .collect()
                };
            }
            InventoryEvent::StockRemoved(e) => {
                let remaining = self
                    .get(&e.name)
                    .map(|item| item.quantity().saturating_sub(e.quantity.get()));

                match remaining {
                    Some(left) if left > 0 => {
                        self.items = self
                            .items
                            .iter()
                            .map(|item| {
                                if item.name() == &e.name {
                                    item.with_quantity(left)
                                } else {
                                    item.clone()
                                }
                            })
                            .collect();
                    }
                    Some(_) => {
                        self.items = self
                            .items
                            .iter()
                            .filter(|item| item.name() != &e.name)
                            .cloned()
                            .collect();
                    }
                    None => {}
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::AddItem(cmd) => self.handle_add(cmd),
            InventoryCommand::RemoveItem(cmd) => self.handle_remove(cmd),
        }
    }
}

impl Inventory {
    fn ensure_inventory_id(&self, inventory_id: InventoryId) -> Result<(), DomainError> {
        if self.id != inventory_id {
            return Err(DomainError::invariant("inventory_id mismatch"));
        }
        Ok(())
    }

    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_inventory_id(cmd.inventory_id)?;

        let Some(name) = ItemName::parse(&cmd.name) else {
            return Ok(vec![]);
        };
        if cmd.quantity.trim().is_empty() {
            return Ok(vec![]);
        }

        let quantity = Quantity::parse(&cmd.quantity)?;
        if self.total_stock().checked_add(quantity.get()).is_none() {
            return Err(DomainError::invariant("total stock would overflow"));
        }

        Ok(vec![InventoryEvent::StockAdded(StockAdded {
            inventory_id: cmd.inventory_id,
            name,
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_inventory_id(cmd.inventory_id)?;

        if cmd.quantity.trim().is_empty() {
            return Ok(vec![]);
        }
        let Some(item) = ItemName::parse(&cmd.name).and_then(|name| self.get(&name)) else {
            return Ok(vec![]);
        };

        let quantity = Quantity::parse(&cmd.quantity)?;

        Ok(vec![InventoryEvent::StockRemoved(StockRemoved {
            inventory_id: cmd.inventory_id,
            name: item.name().clone(),
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockkeeper_events::execute;

    fn test_inventory_id() -> InventoryId {
        InventoryId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn add(id: InventoryId, name: &str, quantity: &str) -> InventoryCommand {
        InventoryCommand::AddItem(AddItem {
            inventory_id: id,
            name: name.to_string(),
            quantity: quantity.to_string(),
            occurred_at: test_time(),
        })
    }

    fn remove(id: InventoryId, name: &str, quantity: &str) -> InventoryCommand {
        InventoryCommand::RemoveItem(RemoveItem {
            inventory_id: id,
            name: name.to_string(),
            quantity: quantity.to_string(),
            occurred_at: test_time(),
        })
    }

    fn stocked(entries: &[(&str, &str)]) -> Inventory {
        let id = test_inventory_id();
        let mut inventory = Inventory::empty(id);
        for (name, quantity) in entries {
            execute(&mut inventory, &add(id, name, quantity)).unwrap();
        }
        inventory
    }

    fn snapshot(inventory: &Inventory) -> Vec<(String, i64)> {
        inventory
            .items()
            .iter()
            .map(|item| (item.name().to_string(), item.quantity()))
            .collect()
    }

    #[test]
    fn add_item_emits_stock_added_event() {
        let id = test_inventory_id();
        let inventory = Inventory::empty(id);

        let events = inventory.handle(&add(id, "Rice", "10")).unwrap();
        assert_eq!(events.len(), 1);

        match &events[0] {
            InventoryEvent::StockAdded(e) => {
                assert_eq!(e.inventory_id, id);
                assert_eq!(e.name.as_str(), "Rice");
                assert_eq!(e.quantity.get(), 10);
            }
            _ => panic!("Expected StockAdded event"),
        }
        assert_eq!(events[0].event_type(), "inventory.stock.added");
    }

    #[test]
    fn add_item_appends_new_names_in_order() {
        let inventory = stocked(&[("Rice", "10"), ("Beans", "3"), ("Oil", "1")]);
        assert_eq!(
            snapshot(&inventory),
            vec![("Rice".to_string(), 10), ("Beans".to_string(), 3), ("Oil".to_string(), 1)]
        );
        assert_eq!(inventory.version(), 3);
    }

    #[test]
    fn add_item_merges_existing_name_in_place() {
        let inventory = stocked(&[("Rice", "10"), ("Beans", "3"), ("Rice", "5")]);
        assert_eq!(
            snapshot(&inventory),
            vec![("Rice".to_string(), 15), ("Beans".to_string(), 3)]
        );
        assert_eq!(inventory.total_stock(), 18);
    }

    #[test]
    fn add_item_trims_name_before_merging() {
        let inventory = stocked(&[("Rice", "10"), ("  Rice  ", "2")]);
        assert_eq!(snapshot(&inventory), vec![("Rice".to_string(), 12)]);
    }

    #[test]
    fn add_item_with_blank_name_or_quantity_is_a_no_op() {
        let id = test_inventory_id();
        let inventory = Inventory::empty(id);

        assert!(inventory.handle(&add(id, "", "10")).unwrap().is_empty());
        assert!(inventory.handle(&add(id, "   ", "10")).unwrap().is_empty());
        assert!(inventory.handle(&add(id, "Rice", "")).unwrap().is_empty());
        assert!(inventory.handle(&add(id, "Rice", "   ")).unwrap().is_empty());
    }

    #[test]
    fn add_item_rejects_malformed_quantity() {
        let id = test_inventory_id();
        let inventory = Inventory::empty(id);

        let err = inventory.handle(&add(id, "Rice", "ten")).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for non-numeric quantity"),
        }
    }

    #[test]
    fn add_item_rejects_total_overflow() {
        let id = test_inventory_id();
        let mut inventory = Inventory::empty(id);
        execute(&mut inventory, &add(id, "Rice", &i64::MAX.to_string())).unwrap();

        let err = inventory.handle(&add(id, "Beans", "1")).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn command_for_other_inventory_is_rejected() {
        let inventory = Inventory::empty(test_inventory_id());
        let err = inventory
            .handle(&add(test_inventory_id(), "Rice", "1"))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn remove_item_partially_keeps_remainder() {
        let mut inventory = stocked(&[("Rice", "10"), ("Beans", "3")]);
        let id = inventory.id_typed();

        execute(&mut inventory, &remove(id, "Rice", "4")).unwrap();
        assert_eq!(
            snapshot(&inventory),
            vec![("Rice".to_string(), 6), ("Beans".to_string(), 3)]
        );
    }

    #[test]
    fn remove_item_drops_row_when_exhausted() {
        let mut inventory = stocked(&[("Rice", "10"), ("Beans", "3")]);
        let id = inventory.id_typed();

        let events = execute(&mut inventory, &remove(id, "Rice", "10")).unwrap();
        assert_eq!(events[0].quantity().get(), 10);
        assert_eq!(snapshot(&inventory), vec![("Beans".to_string(), 3)]);
    }

    #[test]
    fn remove_item_records_requested_amount_when_over_removing() {
        let mut inventory = stocked(&[("Rice", "15")]);
        let id = inventory.id_typed();

        let events = execute(&mut inventory, &remove(id, "Rice", "20")).unwrap();
        match &events[0] {
            InventoryEvent::StockRemoved(e) => assert_eq!(e.quantity.get(), 20),
            _ => panic!("Expected StockRemoved event"),
        }
        assert!(inventory.is_empty());
        assert_eq!(inventory.total_stock(), 0);
    }

    #[test]
    fn remove_item_with_empty_quantity_or_unknown_name_is_a_no_op() {
        let inventory = stocked(&[("Rice", "10")]);
        let id = inventory.id_typed();

        assert!(inventory.handle(&remove(id, "Rice", "")).unwrap().is_empty());
        assert!(inventory.handle(&remove(id, "Rice", "   ")).unwrap().is_empty());
        assert!(inventory.handle(&remove(id, "Flour", "3")).unwrap().is_empty());
        // The unknown-name check wins over quantity parsing.
        assert!(inventory.handle(&remove(id, "Flour", "abc")).unwrap().is_empty());
    }

    #[test]
    fn remove_item_rejects_malformed_quantity() {
        let inventory = stocked(&[("Rice", "10")]);
        let id = inventory.id_typed();

        let err = inventory.handle(&remove(id, "Rice", "-2")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let inventory = stocked(&[("Rice", "10")]);
        let before = inventory.clone();
        let id = inventory.id_typed();

        let _ = inventory.handle(&add(id, "Rice", "5"));
        let _ = inventory.handle(&remove(id, "Rice", "5"));
        assert_eq!(inventory, before);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a single add on an empty inventory yields exactly that item.
            #[test]
            fn single_add_on_empty_inventory(
                name in "[A-Za-z][A-Za-z0-9 ]{0,30}",
                qty in 1i64..1_000_000
            ) {
                let qty_text = qty.to_string();
                let inventory = stocked(&[(name.as_str(), qty_text.as_str())]);
                prop_assert_eq!(inventory.total_stock(), qty);
                prop_assert_eq!(snapshot(&inventory), vec![(name.trim().to_string(), qty)]);
            }

            /// Property: adding the same name twice merges into one row.
            #[test]
            fn repeated_add_merges(
                q1 in 1i64..1_000_000,
                q2 in 1i64..1_000_000
            ) {
                let (t1, t2) = (q1.to_string(), q2.to_string());
                let inventory = stocked(&[("Rice", t1.as_str()), ("Rice", t2.as_str())]);
                prop_assert_eq!(snapshot(&inventory), vec![("Rice".to_string(), q1 + q2)]);
            }

            /// Property: removal never leaves a row at zero or below.
            #[test]
            fn remove_keeps_quantities_positive(
                start in 1i64..1_000,
                take in 1i64..2_000
            ) {
                let start_text = start.to_string();
                let mut inventory = stocked(&[("Rice", start_text.as_str()), ("Beans", "7")]);
                let id = inventory.id_typed();
                execute(&mut inventory, &remove(id, "Rice", &take.to_string())).unwrap();

                prop_assert!(inventory.items().iter().all(|item| item.quantity() > 0));
                if take >= start {
                    prop_assert_eq!(inventory.total_stock(), 7);
                    prop_assert!(inventory.get(&ItemName::parse("Rice").unwrap()).is_none());
                } else {
                    prop_assert_eq!(inventory.total_stock(), 7 + start - take);
                }
            }

            /// Property: apply is deterministic (same events = same final state).
            #[test]
            fn apply_is_deterministic(
                amounts in proptest::collection::vec(1i64..500, 1..20)
            ) {
                let id = test_inventory_id();
                let events: Vec<InventoryEvent> = amounts
                    .iter()
                    .enumerate()
                    .map(|(i, amount)| {
                        let name = ItemName::parse(if i % 2 == 0 { "Rice" } else { "Beans" }).unwrap();
                        let quantity = Quantity::new(*amount).unwrap();
                        if i % 3 == 2 {
                            InventoryEvent::StockRemoved(StockRemoved {
                                inventory_id: id, name, quantity, occurred_at: test_time(),
                            })
                        } else {
                            InventoryEvent::StockAdded(StockAdded {
                                inventory_id: id, name, quantity, occurred_at: test_time(),
                            })
                        }
                    })
                    .collect();

                let mut first = Inventory::empty(id);
                let mut second = Inventory::empty(id);
                for event in &events {
                    first.apply(event);
                    second.apply(event);
                }
                prop_assert_eq!(&first, &second);
                prop_assert_eq!(first.version(), events.len() as u64);
            }
        }
    }
}
