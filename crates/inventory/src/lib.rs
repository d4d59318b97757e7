//! Inventory domain module (event-sourced).
//!
//! Business rules for stock items and their movement history, implemented
//! as deterministic domain logic (no IO, no presentation).

pub mod history;
pub mod inventory;
pub mod item;
pub mod store;

pub use history::{HistoryAction, HistoryEntry, HistoryLog};
pub use inventory::{
    AddItem, Inventory, InventoryCommand, InventoryEvent, InventoryId, RemoveItem, StockAdded,
    StockRemoved,
};
pub use item::{ItemName, Quantity, StockItem};
pub use store::{InventorySnapshot, InventoryStore};
