//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_get`] or [`expect_action`] to take the next
//! request together with its responder. Answering, failing, delaying or never
//! answering is up to the test.

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, ResourceClient, ResourceRequest};
use crate::app_system::Settings;
use crate::batch_submitter::BatchSubmitter;
use crate::clients::{InventoryClient, WorkflowClient};
use crate::domain::InventoryItem;
use crate::workflow::WorkflowService;

pub type Responder<R, T> = oneshot::Sender<Result<R, <T as Entity>::Error>>;

/// Creates a client whose requests land on the returned receiver instead of
/// a running `ResourceActor`.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Responder<Option<T>, T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Responder<T::ActionResult, T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Starts a workflow service whose inventory calls land on the returned
/// receiver. `item_timeout_ms` bounds each consume call.
pub fn spawn_workflow_with_mock_inventory(
    item_timeout_ms: u64,
) -> (WorkflowClient, mpsc::Receiver<ResourceRequest<InventoryItem>>) {
    let (inner, receiver) = create_mock_client::<InventoryItem>(16);
    let settings = Settings { item_timeout_ms, ..Settings::default() };
    let submitter = BatchSubmitter::new(
        InventoryClient::new(inner),
        settings.item_timeout(),
        settings.default_note.clone(),
    );
    let (service, client) = WorkflowService::new(submitter, &settings);
    tokio::spawn(service.run());
    (client, receiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory_actor::{InventoryAction, InventoryActionResult};

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<InventoryItem>(10);
        let client = InventoryClient::new(inner);

        let lookup = {
            let client = client.clone();
            tokio::spawn(async move { client.get_item("item_1".to_string()).await })
        };
        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, "item_1");
        let item = InventoryItem {
            id: "item_1".into(),
            name: "Butter".into(),
            quantity: 250.0,
            unit: "g".into(),
            expiry_date: None,
            consumption_log: vec![],
        };
        responder.send(Ok(Some(item.clone()))).unwrap();
        assert_eq!(lookup.await.unwrap(), Ok(Some(item)));

        let check = tokio::spawn(async move { client.check_quantity("item_1".to_string()).await });
        let (_, action, responder) = expect_action(&mut receiver).await.expect("Expected Action request");
        assert!(matches!(action, InventoryAction::CheckQuantity));
        responder.send(Ok(InventoryActionResult::CheckQuantity(250.0))).unwrap();
        assert_eq!(check.await.unwrap(), Ok(250.0));
    }
}
