use std::fmt;

use crate::inventory_actor::InventoryError;

/// Acknowledgement from the inventory service for one consume call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumeReceipt {
    pub item_id: String,
    pub consumed: f64,
    /// On-hand quantity right after the decrement, as reported by the service.
    pub remaining: f64,
}

/// Result of one item's consume call within a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutcome {
    pub item_id: String,
    pub item_name: String,
    pub result: Result<ConsumeReceipt, InventoryError>,
}

impl ItemOutcome {
    pub fn new(
        item_id: impl Into<String>,
        item_name: impl Into<String>,
        result: Result<ConsumeReceipt, InventoryError>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            item_name: item_name.into(),
            result,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error_cause(&self) -> Option<String> {
        self.result.as_ref().err().map(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overall {
    Success,
    Partial,
    Failed,
}

impl fmt::Display for Overall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Overall::Success => "success",
            Overall::Partial => "partial",
            Overall::Failed => "failed",
        })
    }
}

/// Settled results of one submission attempt.
///
/// A failure never hides a sibling's success: every submitted item has its own
/// entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub per_item: Vec<ItemOutcome>,
    /// Zero-quantity items that were not sent.
    pub skipped: Vec<String>,
}

impl BatchOutcome {
    pub fn new(per_item: Vec<ItemOutcome>, skipped: Vec<String>) -> Self {
        Self { per_item, skipped }
    }

    #[cfg(test)]
    pub fn get(&self, item_id: &str) -> Option<&ItemOutcome> {
        self.per_item.iter().find(|o| o.item_id == item_id)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.per_item.iter().filter(|o| o.succeeded())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.per_item.iter().filter(|o| !o.succeeded())
    }

    pub fn overall(&self) -> Overall {
        let ok = self.succeeded().count();
        if ok == self.per_item.len() {
            Overall::Success
        } else if ok > 0 {
            Overall::Partial
        } else {
            Overall::Failed
        }
    }
}
