use super::{InventoryItem, ReasonTag, ValidationError};

/// One inventory item staged for consumption.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionCandidate {
    pub item_id: String,
    pub item_name: String,
    /// Quantity as shown where the action started (recipe line or shelf).
    pub original_quantity: String,
    pub consumed_quantity: f64,
    pub unit: String,
    pub expiry_date: Option<String>,
    pub selected_reasons: Vec<ReasonTag>,
    pub custom_reason_text: Option<String>,
}

/// A partial edit to a single candidate. Unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct CandidatePatch {
    /// Absolute quantity. Negative values are rejected.
    pub consumed_quantity: Option<f64>,
    /// Stepper-style change. The result clamps at zero.
    pub quantity_delta: Option<f64>,
    pub selected_reasons: Option<Vec<ReasonTag>>,
    /// `Some("")` clears the text.
    pub custom_reason_text: Option<String>,
}

impl ConsumptionCandidate {
    /// Candidate derived from a recipe ingredient line.
    pub fn new(
        item_id: impl Into<String>,
        item_name: impl Into<String>,
        original_quantity: impl Into<String>,
        consumed_quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            item_name: item_name.into(),
            original_quantity: original_quantity.into(),
            consumed_quantity,
            unit: unit.into(),
            expiry_date: None,
            selected_reasons: Vec::new(),
            custom_reason_text: None,
        }
    }

    /// Candidate that uses up everything on hand, with no reasons yet.
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            original_quantity: format!("{} {}", item.quantity, item.unit),
            consumed_quantity: item.quantity,
            unit: item.unit.clone(),
            expiry_date: item.expiry_date.clone(),
            selected_reasons: Vec::new(),
            custom_reason_text: None,
        }
    }

    pub fn with_reasons(mut self, reasons: impl IntoIterator<Item = ReasonTag>) -> Self {
        self.selected_reasons = reasons.into_iter().collect();
        self
    }

    pub fn with_custom_text(mut self, text: impl Into<String>) -> Self {
        self.custom_reason_text = Some(text.into());
        self
    }

    pub fn has_reason(&self, reason: ReasonTag) -> bool {
        self.selected_reasons.contains(&reason)
    }

    /// Checks every field invariant of a candidate on its own.
    pub fn validate(&self, custom_reason_max_chars: usize) -> Result<(), ValidationError> {
        if self.item_id.trim().is_empty() {
            return Err(ValidationError::MissingItemId);
        }
        if !self.consumed_quantity.is_finite() || self.consumed_quantity < 0.0 {
            return Err(ValidationError::InvalidQuantity {
                item_id: self.item_id.clone(),
                quantity: self.consumed_quantity,
            });
        }
        for (i, reason) in self.selected_reasons.iter().enumerate() {
            if self.selected_reasons[..i].contains(reason) {
                return Err(ValidationError::DuplicateReason {
                    item_id: self.item_id.clone(),
                    reason: *reason,
                });
            }
        }
        if let Some(text) = &self.custom_reason_text {
            if !self.has_reason(ReasonTag::Custom) {
                return Err(ValidationError::CustomTextWithoutCustomReason(self.item_id.clone()));
            }
            let len = text.chars().count();
            if len > custom_reason_max_chars {
                return Err(ValidationError::CustomTextTooLong {
                    item_id: self.item_id.clone(),
                    len,
                    max: custom_reason_max_chars,
                });
            }
        }
        Ok(())
    }

    /// Applies `patch` all-or-nothing: on error `self` is unchanged.
    pub fn apply(&mut self, patch: CandidatePatch, custom_reason_max_chars: usize) -> Result<(), ValidationError> {
        let mut next = self.clone();

        if let Some(quantity) = patch.consumed_quantity {
            next.consumed_quantity = quantity;
        }
        if let Some(delta) = patch.quantity_delta {
            next.consumed_quantity = (next.consumed_quantity + delta).max(0.0);
        }
        if let Some(reasons) = patch.selected_reasons {
            next.selected_reasons = reasons;
            if !next.has_reason(ReasonTag::Custom) {
                next.custom_reason_text = None;
            }
        }
        if let Some(text) = patch.custom_reason_text {
            next.custom_reason_text = if text.is_empty() { None } else { Some(text) };
        }

        next.validate(custom_reason_max_chars)?;
        *self = next;
        Ok(())
    }
}
