use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{ConsumeReceipt, InventoryItem, InventoryItemCreate, InventoryItemPatch};
use crate::inventory_actor::{ConsumeRequest, InventoryAction, InventoryActionResult, InventoryError};

/// Client for the shelf inventory actor.
#[derive(Clone)]
pub struct InventoryClient {
    inner: ResourceClient<InventoryItem>,
}

crate::impl_basic_client!(InventoryClient, InventoryItem, InventoryError, item);

impl InventoryClient {
    #[instrument(skip(self), fields(name = %params.name))]
    pub async fn create_item(&self, params: InventoryItemCreate) -> Result<String, InventoryError> {
        debug!("Sending request");
        self.inner.create(params).await
    }

    #[instrument(skip(self, patch))]
    pub async fn recount_item(&self, id: String, patch: InventoryItemPatch) -> Result<InventoryItem, InventoryError> {
        debug!("Sending request");
        self.inner.update(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn check_quantity(&self, id: String) -> Result<f64, InventoryError> {
        debug!("Sending request");
        match self.inner.perform_action(id, InventoryAction::CheckQuantity).await? {
            InventoryActionResult::CheckQuantity(quantity) => Ok(quantity),
            other => Err(unexpected(other)),
        }
    }

    /// The consume mutation. No version token is sent: this is a blind
    /// decrement against whatever is on hand when the request lands.
    #[instrument(skip(self, request), fields(quantity = request.quantity, reason = %request.reason))]
    pub async fn consume(&self, id: String, request: ConsumeRequest) -> Result<ConsumeReceipt, InventoryError> {
        debug!("Sending request");
        match self.inner.perform_action(id, InventoryAction::Consume(request)).await? {
            InventoryActionResult::Consume(receipt) => Ok(receipt),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: InventoryActionResult) -> InventoryError {
    InventoryError::ActorCommunicationError(format!("Unexpected result: {:?}", result))
}
