use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors a consume call (or any inventory request) can end in.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Insufficient quantity: requested {requested}, available {available}")]
    InsufficientQuantity { requested: f64, available: f64 },
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(f64),
    #[error("Note is {len} characters, limit is {max}")]
    NoteTooLong { len: usize, max: usize },
    #[error("timeout")]
    Timeout,
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl InventoryError {
    /// Network-like failures that may succeed when tried again.
    pub fn is_transient(&self) -> bool {
        matches!(self, InventoryError::Timeout | InventoryError::ActorCommunicationError(_))
    }
}

impl From<FrameworkError> for InventoryError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => InventoryError::NotFound(id),
            other => InventoryError::ActorCommunicationError(other.to_string()),
        }
    }
}
