//! Plain-text rendering of the screen.

use chrono::{DateTime, Local, Utc};

use stockkeeper_inventory::HistoryEntry;

use crate::state::AppState;

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TimeZoneChoice {
    #[default]
    Local,
    Utc,
}

/// How history timestamps are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeDisplay {
    format: String,
    zone: TimeZoneChoice,
}

impl Default for TimeDisplay {
    fn default() -> Self {
        Self {
            format: DEFAULT_TIME_FORMAT.to_string(),
            zone: TimeZoneChoice::Local,
        }
    }
}

impl TimeDisplay {
    /// `format` must be a valid strftime pattern (see `config::valid_time_format`).
    pub fn new(format: impl Into<String>, zone: TimeZoneChoice) -> Self {
        Self {
            format: format.into(),
            zone,
        }
    }

    pub fn format(&self, timestamp: DateTime<Utc>) -> String {
        match self.zone {
            TimeZoneChoice::Utc => timestamp.format(&self.format).to_string(),
            TimeZoneChoice::Local => timestamp
                .with_timezone(&Local)
                .format(&self.format)
                .to_string(),
        }
    }
}

/// `"{action} {name}: {quantity} at {timestamp}"`
pub fn history_line(entry: &HistoryEntry, time: &TimeDisplay) -> String {
    format!(
        "{} {}: {} at {}",
        entry.action(),
        entry.name(),
        entry.quantity(),
        time.format(entry.timestamp())
    )
}

pub fn render(state: &AppState, time: &TimeDisplay) -> String {
    let store = state.store();
    let mut lines = vec![
        "Stock Control".to_string(),
        "=============".to_string(),
        format!("Item name: {}", state.item_name()),
        format!("Quantity to add: {}", state.item_quantity()),
        format!("Total stock: {}", store.total_stock()),
        String::new(),
        "Items".to_string(),
    ];

    if store.items().is_empty() {
        lines.push("  (no items)".to_string());
    }
    lines.extend(
        store
            .items()
            .iter()
            .map(|item| format!("  {}: {}", item.name(), item.quantity())),
    );
    lines.push(format!("Quantity to remove: {}", state.remove_quantity()));

    lines.push(String::new());
    lines.push("History".to_string());
    if store.history().is_empty() {
        lines.push("  (no history)".to_string());
    }
    lines.extend(
        store
            .history()
            .entries()
            .iter()
            .map(|entry| format!("  {}", history_line(entry, time))),
    );

    let mut screen = lines.join("\n");
    screen.push('\n');
    screen
}
