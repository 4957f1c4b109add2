use tracing::{debug, warn};

use super::actions::{ConsumeRequest, InventoryAction, InventoryActionResult};
use super::error::InventoryError;
use crate::actor_framework::Entity;
use crate::domain::{ConsumeReceipt, ConsumptionRecord, InventoryItem, InventoryItemCreate, InventoryItemPatch};

/// Longest note the inventory service stores.
pub const NOTE_MAX_CHARS: usize = 200;

impl Entity for InventoryItem {
    type Id = String;
    type CreateParams = InventoryItemCreate;
    type Patch = InventoryItemPatch;
    type Action = InventoryAction;
    type ActionResult = InventoryActionResult;
    type Error = InventoryError;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: InventoryItemCreate) -> Result<Self, InventoryError> {
        check_stock_level(params.quantity)?;
        Ok(Self {
            id,
            name: params.name,
            quantity: params.quantity,
            unit: params.unit,
            expiry_date: params.expiry_date,
            consumption_log: Vec::new(),
        })
    }

    /// Corrects name, quantity or expiry. Used for manual recounts.
    fn on_update(&mut self, patch: InventoryItemPatch) -> Result<(), InventoryError> {
        if let Some(quantity) = patch.quantity {
            check_stock_level(quantity)?;
            self.quantity = quantity;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(date) = patch.expiry_date {
            self.expiry_date = Some(date);
        }
        Ok(())
    }

    /// # Actions
    /// - `CheckQuantity`: Returns the current on-hand quantity
    /// - `Consume(request)`: Blind decrement, no version check
    fn handle_action(&mut self, action: InventoryAction) -> Result<InventoryActionResult, InventoryError> {
        match action {
            InventoryAction::CheckQuantity => Ok(InventoryActionResult::CheckQuantity(self.quantity)),
            InventoryAction::Consume(request) => self.consume(request).map(InventoryActionResult::Consume),
        }
    }
}

impl InventoryItem {
    fn consume(&mut self, request: ConsumeRequest) -> Result<ConsumeReceipt, InventoryError> {
        if !request.quantity.is_finite() || request.quantity <= 0.0 {
            return Err(InventoryError::InvalidQuantity(request.quantity));
        }
        let len = request.note.chars().count();
        if len > NOTE_MAX_CHARS {
            return Err(InventoryError::NoteTooLong { len, max: NOTE_MAX_CHARS });
        }
        if request.quantity > self.quantity {
            warn!(item_id = %self.id, requested = request.quantity, available = self.quantity, "Insufficient quantity");
            return Err(InventoryError::InsufficientQuantity {
                requested: request.quantity,
                available: self.quantity,
            });
        }

        self.quantity -= request.quantity;
        debug!(item_id = %self.id, remaining = self.quantity, reason = %request.reason, "Item consumed");
        self.consumption_log.push(ConsumptionRecord {
            quantity: request.quantity,
            reason: request.reason,
            note: request.note,
        });
        Ok(ConsumeReceipt {
            item_id: self.id.clone(),
            consumed: request.quantity,
            remaining: self.quantity,
        })
    }
}

fn check_stock_level(quantity: f64) -> Result<(), InventoryError> {
    if quantity.is_finite() && quantity >= 0.0 {
        Ok(())
    } else {
        Err(InventoryError::InvalidQuantity(quantity))
    }
}
