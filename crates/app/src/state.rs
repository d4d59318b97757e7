//! Application state and its reducer.

use chrono::{DateTime, Utc};

use stockkeeper_inventory::InventoryStore;

/// Everything the screen can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetItemName(String),
    SetItemQuantity(String),
    SetRemoveQuantity(String),
    /// "Add" button: add the item name/quantity fields.
    AddItem,
    /// Per-row "Remove" button, using the shared remove-quantity field.
    RemoveItem(String),
}

/// The whole screen state: form fields plus the inventory and its history.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    item_name: String,
    item_quantity: String,
    remove_quantity: String,
    store: InventoryStore,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn item_quantity(&self) -> &str {
        &self.item_quantity
    }

    pub fn remove_quantity(&self) -> &str {
        &self.remove_quantity
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Fold one action into the state.
    ///
    /// Rejected input is logged and leaves the form as typed so it can be
    /// corrected; nothing is surfaced on screen.
    pub fn reduce(mut self, action: Action, now: DateTime<Utc>) -> Self {
        match action {
            Action::SetItemName(text) => self.item_name = text,
            Action::SetItemQuantity(text) => self.item_quantity = text,
            Action::SetRemoveQuantity(text) => self.remove_quantity = text,
            Action::AddItem => {
                match self.store.add(&self.item_name, &self.item_quantity, now) {
                    Ok(events) if !events.is_empty() => {
                        self.item_name.clear();
                        self.item_quantity.clear();
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(
                        error = %e,
                        name = %self.item_name,
                        quantity = %self.item_quantity,
                        "add rejected"
                    ),
                }
            }
            Action::RemoveItem(name) => {
                if self.remove_quantity.is_empty() {
                    return self;
                }
                match self.store.remove(&name, &self.remove_quantity, now) {
                    Ok(_) => self.remove_quantity.clear(),
                    Err(e) => tracing::warn!(
                        error = %e,
                        name = %name,
                        quantity = %self.remove_quantity,
                        "remove rejected"
                    ),
                }
            }
        }
        self
    }
}
