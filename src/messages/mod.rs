use tokio::sync::oneshot;

use crate::domain::{CandidatePatch, ConsumptionCandidate};
use crate::workflow::{ConsumedItem, SessionSnapshot, SubmissionReport, WorkflowError};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Commands accepted by the workflow service. Each variant carries its
/// parameters and a oneshot channel for the reply.
#[derive(Debug)]
pub enum WorkflowRequest {
    Open {
        candidates: Vec<ConsumptionCandidate>,
        respond_to: ServiceResponse<SessionSnapshot, WorkflowError>,
    },
    UpdateCandidate {
        item_id: String,
        patch: CandidatePatch,
        respond_to: ServiceResponse<ConsumptionCandidate, WorkflowError>,
    },
    RemoveCandidate {
        item_id: String,
        respond_to: ServiceResponse<SessionSnapshot, WorkflowError>,
    },
    EditReasons {
        respond_to: ServiceResponse<Vec<ConsumptionCandidate>, WorkflowError>,
    },
    ConfirmEdits {
        edited: Vec<ConsumptionCandidate>,
        respond_to: ServiceResponse<SessionSnapshot, WorkflowError>,
    },
    DiscardEdits {
        respond_to: ServiceResponse<SessionSnapshot, WorkflowError>,
    },
    Submit {
        respond_to: ServiceResponse<SubmissionReport, WorkflowError>,
    },
    RetryFailed {
        respond_to: ServiceResponse<SubmissionReport, WorkflowError>,
    },
    Acknowledge {
        respond_to: ServiceResponse<Vec<ConsumedItem>, WorkflowError>,
    },
    Cancel {
        respond_to: ServiceResponse<(), WorkflowError>,
    },
    Snapshot {
        respond_to: ServiceResponse<SessionSnapshot, WorkflowError>,
    },
    Shutdown,
}
