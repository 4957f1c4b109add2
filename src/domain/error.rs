use thiserror::Error;

use super::ReasonTag;

/// Rejections raised before anything reaches the inventory service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("A consumption session needs at least one item")]
    EmptySession,
    #[error("Candidate is missing an item id")]
    MissingItemId,
    #[error("Item {0} appears more than once")]
    DuplicateItem(String),
    #[error("Item {0} is not part of this session")]
    UnknownItem(String),
    #[error("Quantity for {item_id} must be a finite, non-negative number, got {quantity}")]
    InvalidQuantity { item_id: String, quantity: f64 },
    #[error("Reason {reason} selected twice for {item_id}")]
    DuplicateReason { item_id: String, reason: ReasonTag },
    #[error("Custom reason for {item_id} is {len} characters, limit is {max}")]
    CustomTextTooLong { item_id: String, len: usize, max: usize },
    #[error("Custom reason text for {0} requires the custom reason to be selected")]
    CustomTextWithoutCustomReason(String),
    #[error("Edited items do not match the session's items")]
    CandidateSetChanged,
    #[error("Every remaining item has a zero quantity")]
    NothingToConsume,
}
