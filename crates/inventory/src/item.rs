use serde::{Deserialize, Serialize};

use stockkeeper_core::{DomainError, DomainResult, Entity, ValueObject};

/// Name of a stock item: trimmed, never blank. Items are keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Trim `raw`; blank input has no name.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ItemName {}

impl TryFrom<String> for ItemName {
    type Error = DomainError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| DomainError::validation("item name cannot be empty"))
    }
}

impl From<ItemName> for String {
    fn from(name: ItemName) -> Self {
        name.0
    }
}

impl core::fmt::Display for ItemName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A strictly positive amount of stock moved in or out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(i64);

impl Quantity {
    pub fn new(value: i64) -> DomainResult<Self> {
        if value <= 0 {
            return Err(DomainError::validation(format!(
                "quantity must be positive, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Parse user-entered text (surrounding whitespace allowed).
    pub fn parse(text: &str) -> DomainResult<Self> {
        let text = text.trim();
        let value = text.parse::<i64>().map_err(|_| {
            DomainError::validation(format!("quantity {text:?} is not a whole number"))
        })?;
        Self::new(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl ValueObject for Quantity {}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One row of the inventory. Immutable; changes produce a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    name: ItemName,
    quantity: i64,
}

impl StockItem {
    pub fn new(name: ItemName, quantity: i64) -> Self {
        Self { name, quantity }
    }

    pub fn name(&self) -> &ItemName {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn with_quantity(&self, quantity: i64) -> Self {
        Self {
            name: self.name.clone(),
            quantity,
        }
    }
}

impl Entity for StockItem {
    type Id = ItemName;

    fn id(&self) -> &Self::Id {
        &self.name
    }
}
