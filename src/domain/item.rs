use super::ReasonCode;

/// An inventory record on a shared shelf.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub expiry_date: Option<String>,
    /// Every accepted consumption, oldest first.
    pub consumption_log: Vec<ConsumptionRecord>,
}

/// Payload for creating a new inventory item.
#[derive(Debug, Clone)]
pub struct InventoryItemCreate {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub expiry_date: Option<String>,
}

/// Payload for correcting an existing inventory item.
#[derive(Debug, Clone, Default)]
pub struct InventoryItemPatch {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub expiry_date: Option<String>,
}

/// What the inventory service stored for one accepted consume call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionRecord {
    pub quantity: f64,
    pub reason: ReasonCode,
    pub note: String,
}

impl InventoryItemCreate {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
            expiry_date: None,
        }
    }

    pub fn expiring(mut self, date: impl Into<String>) -> Self {
        self.expiry_date = Some(date.into());
        self
    }
}
