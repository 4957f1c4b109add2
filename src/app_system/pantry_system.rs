use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{error, info, instrument};

use super::Settings;
use crate::actor_framework::ResourceActor;
use crate::batch_submitter::BatchSubmitter;
use crate::clients::{InventoryClient, WorkflowClient};
use crate::domain::InventoryItem;
use crate::workflow::WorkflowService;

/// Starts the inventory actor and the workflow service and wires them together.
pub struct PantrySystem {
    pub inventory_client: InventoryClient,
    pub workflow_client: WorkflowClient,
    workflow_handle: tokio::task::JoinHandle<()>,
    inventory_handle: tokio::task::JoinHandle<()>,
}

impl PantrySystem {
    #[instrument(name = "pantry_system", skip(settings))]
    pub fn new(settings: &Settings) -> Self {
        info!("Starting pantry system");

        let item_counter = Arc::new(AtomicU64::new(1));
        let next_item_id = move || format!("item_{}", item_counter.fetch_add(1, Ordering::SeqCst));
        let (inventory_actor, inventory_inner) = ResourceActor::<InventoryItem>::new(settings.channel_buffer, next_item_id);
        let inventory_client = InventoryClient::new(inventory_inner);
        let inventory_handle = tokio::spawn(inventory_actor.run());

        let submitter = BatchSubmitter::new(
            inventory_client.clone(),
            settings.item_timeout(),
            settings.default_note.clone(),
        );
        let (workflow_service, workflow_client) = WorkflowService::new(submitter, settings);
        let workflow_handle = tokio::spawn(workflow_service.run());

        info!("Pantry system started");
        Self {
            inventory_client,
            workflow_client,
            workflow_handle,
            inventory_handle,
        }
    }

    /// Stops the workflow first (it holds an inventory client), then the
    /// inventory actor once every client is gone.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down pantry system");
        let Self {
            inventory_client,
            workflow_client,
            workflow_handle,
            inventory_handle,
        } = self;

        if let Err(e) = workflow_client.shutdown().await {
            error!(error = %e, "Workflow shutdown request failed");
        }
        drop(workflow_client);
        if let Err(e) = workflow_handle.await {
            error!(error = ?e, "Workflow service task failed");
            return Err(format!("Workflow service task failed: {:?}", e));
        }

        drop(inventory_client);
        if let Err(e) = inventory_handle.await {
            error!(error = ?e, "Inventory actor task failed");
            return Err(format!("Inventory actor task failed: {:?}", e));
        }

        info!("Pantry system shutdown complete");
        Ok(())
    }
}
