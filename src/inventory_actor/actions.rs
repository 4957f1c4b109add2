use crate::domain::{ConsumeReceipt, ReasonCode};

/// Custom actions for inventory items.
///
/// These go beyond plain CRUD and carry the shelf's business rules.
#[derive(Debug, Clone)]
pub enum InventoryAction {
    /// Reads the on-hand quantity without modifying it.
    CheckQuantity,
    /// Decrements the on-hand quantity.
    ///
    /// # Errors
    /// Fails if the quantity is not positive, exceeds what is on hand,
    /// or the note is longer than the service accepts.
    Consume(ConsumeRequest),
}

/// Body of the consume mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumeRequest {
    pub quantity: f64,
    pub reason: ReasonCode,
    pub note: String,
}

/// Results from InventoryActions - variants match 1:1 with InventoryAction
#[derive(Debug, Clone)]
pub enum InventoryActionResult {
    CheckQuantity(f64),
    Consume(ConsumeReceipt),
}
