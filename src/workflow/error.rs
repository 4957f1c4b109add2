use thiserror::Error;

use super::{Command, Phase};
use crate::domain::ValidationError;

/// Errors returned by workflow commands.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("{command} is not allowed while {phase}")]
    InvalidState { command: Command, phase: Phase },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Submission aborted: {0}")]
    SubmissionAborted(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
