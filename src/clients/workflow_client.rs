use tokio::sync::{broadcast, mpsc};
use tracing::{debug, instrument};

use crate::domain::{CandidatePatch, ConsumptionCandidate};
use crate::messages::WorkflowRequest;
use crate::workflow::{ConsumedItem, InventoryChanged, SessionSnapshot, SubmissionReport, WorkflowError};

/// Handle the presentation layer uses to drive the consumption workflow.
#[derive(Clone)]
pub struct WorkflowClient {
    sender: mpsc::Sender<WorkflowRequest>,
    refresh: broadcast::Sender<InventoryChanged>,
}

impl WorkflowClient {
    pub fn new(sender: mpsc::Sender<WorkflowRequest>, refresh: broadcast::Sender<InventoryChanged>) -> Self {
        Self { sender, refresh }
    }

    /// Receives a signal whenever a submission lands at least one decrement.
    pub fn subscribe(&self) -> broadcast::Receiver<InventoryChanged> {
        self.refresh.subscribe()
    }

    /// Asks the service to stop. An in-flight batch still settles first.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), WorkflowError> {
        debug!("Sending shutdown request");
        self.sender
            .send(WorkflowRequest::Shutdown)
            .await
            .map_err(|e| WorkflowError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(WorkflowClient => fn open(candidates: Vec<ConsumptionCandidate>) -> SessionSnapshot as WorkflowRequest::Open, Error = WorkflowError);
client_method!(WorkflowClient => fn update_candidate(item_id: String, patch: CandidatePatch) -> ConsumptionCandidate as WorkflowRequest::UpdateCandidate, Error = WorkflowError);
client_method!(WorkflowClient => fn remove_candidate(item_id: String) -> SessionSnapshot as WorkflowRequest::RemoveCandidate, Error = WorkflowError);
client_method!(WorkflowClient => fn edit_reasons() -> Vec<ConsumptionCandidate> as WorkflowRequest::EditReasons, Error = WorkflowError);
client_method!(WorkflowClient => fn confirm_edits(edited: Vec<ConsumptionCandidate>) -> SessionSnapshot as WorkflowRequest::ConfirmEdits, Error = WorkflowError);
client_method!(WorkflowClient => fn discard_edits() -> SessionSnapshot as WorkflowRequest::DiscardEdits, Error = WorkflowError);
client_method!(WorkflowClient => fn submit() -> SubmissionReport as WorkflowRequest::Submit, Error = WorkflowError);
client_method!(WorkflowClient => fn retry_failed() -> SubmissionReport as WorkflowRequest::RetryFailed, Error = WorkflowError);
client_method!(WorkflowClient => fn acknowledge() -> Vec<ConsumedItem> as WorkflowRequest::Acknowledge, Error = WorkflowError);
client_method!(WorkflowClient => fn cancel() -> () as WorkflowRequest::Cancel, Error = WorkflowError);
client_method!(WorkflowClient => fn snapshot() -> SessionSnapshot as WorkflowRequest::Snapshot, Error = WorkflowError);
