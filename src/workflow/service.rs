use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, instrument, warn, Instrument};

use super::{Command, ConsumedItem, InventoryChanged, Phase, SessionSnapshot, SubmissionReport, WorkflowError};
use crate::app_system::Settings;
use crate::batch_submitter::BatchSubmitter;
use crate::clients::WorkflowClient;
use crate::domain::{BatchOutcome, CandidatePatch, ConsumptionCandidate, ConsumptionSession, Overall};
use crate::messages::{ServiceResponse, WorkflowRequest};

/// Macro for clean error response handling
macro_rules! send_error {
    ($respond_to:expr, $error:expr) => {{
        let _ = $respond_to.send(Err($error));
        return;
    }};
}

/// A batch that finished in the background, routed back into the actor loop.
struct Settlement {
    result: Result<BatchOutcome, String>,
    respond_to: ServiceResponse<SubmissionReport, WorkflowError>,
}

/// Owns the consumption session and is the only caller of [`BatchSubmitter`].
///
/// Commands are handled one at a time. While a batch is out the loop keeps
/// answering, so repeated `submit`, `cancel` and edits are rejected instead of
/// queued behind the batch.
pub struct WorkflowService {
    receiver: mpsc::Receiver<WorkflowRequest>,
    settled_tx: mpsc::Sender<Settlement>,
    settled_rx: mpsc::Receiver<Settlement>,
    submitter: BatchSubmitter,
    refresh: broadcast::Sender<InventoryChanged>,
    custom_reason_max_chars: usize,
    phase: Phase,
    session: Option<ConsumptionSession>,
}

impl WorkflowService {
    pub fn new(submitter: BatchSubmitter, settings: &Settings) -> (Self, WorkflowClient) {
        let (sender, receiver) = mpsc::channel(settings.channel_buffer);
        let (settled_tx, settled_rx) = mpsc::channel(1);
        let (refresh, _) = broadcast::channel(settings.refresh_buffer);
        let service = Self {
            receiver,
            settled_tx,
            settled_rx,
            submitter,
            refresh: refresh.clone(),
            custom_reason_max_chars: settings.custom_reason_max_chars,
            phase: Phase::Idle,
            session: None,
        };
        (service, WorkflowClient::new(sender, refresh))
    }

    #[instrument(name = "workflow_service", skip(self))]
    pub async fn run(mut self) {
        info!("WorkflowService starting");

        loop {
            tokio::select! {
                Some(settlement) = self.settled_rx.recv() => self.handle_settlement(settlement),
                msg = self.receiver.recv() => match msg {
                    Some(WorkflowRequest::Shutdown) | None => break,
                    Some(request) => self.dispatch(request),
                },
            }
        }

        if self.phase == Phase::Submitting {
            info!("Waiting for in-flight batch before stopping");
            if let Some(settlement) = self.settled_rx.recv().await {
                self.handle_settlement(settlement);
            }
        }
        info!("WorkflowService stopped");
    }

    fn dispatch(&mut self, request: WorkflowRequest) {
        match request {
            WorkflowRequest::Open { candidates, respond_to } => {
                let _ = respond_to.send(self.handle_open(candidates));
            }
            WorkflowRequest::UpdateCandidate { item_id, patch, respond_to } => {
                let _ = respond_to.send(self.handle_update_candidate(item_id, patch));
            }
            WorkflowRequest::RemoveCandidate { item_id, respond_to } => {
                let _ = respond_to.send(self.handle_remove_candidate(item_id));
            }
            WorkflowRequest::EditReasons { respond_to } => {
                let _ = respond_to.send(self.handle_edit_reasons());
            }
            WorkflowRequest::ConfirmEdits { edited, respond_to } => {
                let _ = respond_to.send(self.handle_confirm_edits(edited));
            }
            WorkflowRequest::DiscardEdits { respond_to } => {
                let _ = respond_to.send(self.handle_discard_edits());
            }
            WorkflowRequest::Submit { respond_to } => self.handle_submit(Command::Submit, respond_to),
            WorkflowRequest::RetryFailed { respond_to } => self.handle_submit(Command::RetryFailed, respond_to),
            WorkflowRequest::Acknowledge { respond_to } => {
                let _ = respond_to.send(self.handle_acknowledge());
            }
            WorkflowRequest::Cancel { respond_to } => {
                let _ = respond_to.send(self.handle_cancel());
            }
            WorkflowRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(Ok(self.snapshot()));
            }
            WorkflowRequest::Shutdown => {}
        }
    }

    // -------------------------------------------------------------------------
    // Guards and views
    // -------------------------------------------------------------------------

    fn guard(&self, command: Command) -> Result<(), WorkflowError> {
        if self.phase.allows(command) && (command == Command::Open || self.session.is_some()) {
            Ok(())
        } else {
            warn!(%command, phase = %self.phase, "Command rejected");
            Err(WorkflowError::InvalidState { command, phase: self.phase })
        }
    }

    /// Session access for commands that already passed [`Self::guard`].
    fn session_mut(&mut self, command: Command) -> Result<&mut ConsumptionSession, WorkflowError> {
        let phase = self.phase;
        self.session.as_mut().ok_or(WorkflowError::InvalidState { command, phase })
    }

    fn transition(&mut self, next: Phase) {
        info!(from = %self.phase, to = %next, "Phase changed");
        self.phase = next;
    }

    fn close(&mut self) {
        self.session = None;
        self.transition(Phase::Closed);
    }

    fn snapshot(&self) -> SessionSnapshot {
        match &self.session {
            Some(session) => SessionSnapshot {
                phase: self.phase,
                candidates: session.candidates().to_vec(),
                settled: session.receipts(),
                failed: session.failures(),
            },
            None => SessionSnapshot {
                phase: self.phase,
                candidates: Vec::new(),
                settled: Vec::new(),
                failed: Vec::new(),
            },
        }
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    #[instrument(skip(self, candidates), fields(items = candidates.len()))]
    fn handle_open(&mut self, candidates: Vec<ConsumptionCandidate>) -> Result<SessionSnapshot, WorkflowError> {
        self.guard(Command::Open)?;
        let session = ConsumptionSession::new(candidates, self.custom_reason_max_chars)?;
        self.session = Some(session);
        self.transition(Phase::Reviewing);
        Ok(self.snapshot())
    }

    #[instrument(skip(self, patch), fields(item_id = %item_id))]
    fn handle_update_candidate(
        &mut self,
        item_id: String,
        patch: CandidatePatch,
    ) -> Result<ConsumptionCandidate, WorkflowError> {
        self.guard(Command::UpdateCandidate)?;
        let session = self.session_mut(Command::UpdateCandidate)?;
        let updated = session.update(&item_id, patch)?.clone();
        debug!(quantity = updated.consumed_quantity, reasons = updated.selected_reasons.len(), "Candidate updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(item_id = %item_id))]
    fn handle_remove_candidate(&mut self, item_id: String) -> Result<SessionSnapshot, WorkflowError> {
        self.guard(Command::RemoveCandidate)?;
        let remaining = self.session_mut(Command::RemoveCandidate)?.remove(&item_id)?;
        if remaining == 0 {
            info!("Last item removed, session cancelled");
            self.close();
        }
        Ok(self.snapshot())
    }

    /// Hands out a copy for the reason editor; the session is untouched
    /// until the edits are confirmed.
    #[instrument(skip(self))]
    fn handle_edit_reasons(&mut self) -> Result<Vec<ConsumptionCandidate>, WorkflowError> {
        self.guard(Command::EditReasons)?;
        let copy = self.session_mut(Command::EditReasons)?.candidates().to_vec();
        self.transition(Phase::EditingReasons);
        Ok(copy)
    }

    #[instrument(skip(self, edited), fields(items = edited.len()))]
    fn handle_confirm_edits(&mut self, edited: Vec<ConsumptionCandidate>) -> Result<SessionSnapshot, WorkflowError> {
        self.guard(Command::ConfirmEdits)?;
        self.session_mut(Command::ConfirmEdits)?.replace_all(edited)?;
        self.transition(Phase::Reviewing);
        Ok(self.snapshot())
    }

    #[instrument(skip(self))]
    fn handle_discard_edits(&mut self) -> Result<SessionSnapshot, WorkflowError> {
        self.guard(Command::DiscardEdits)?;
        self.transition(Phase::Reviewing);
        Ok(self.snapshot())
    }

    #[instrument(skip(self))]
    fn handle_cancel(&mut self) -> Result<(), WorkflowError> {
        self.guard(Command::Cancel)?;
        info!("Session cancelled without contacting inventory");
        self.close();
        Ok(())
    }

    #[instrument(skip(self))]
    fn handle_acknowledge(&mut self) -> Result<Vec<ConsumedItem>, WorkflowError> {
        self.guard(Command::Acknowledge)?;
        let session = self.session_mut(Command::Acknowledge)?;
        let consumed: Vec<ConsumedItem> = session
            .receipts()
            .iter()
            .filter_map(|r| session.candidate(&r.item_id).map(|c| ConsumedItem::from_receipt(r, c)))
            .collect();
        info!(consumed = consumed.len(), "Session acknowledged");
        self.close();
        Ok(consumed)
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    fn prepare_batch(&mut self, command: Command) -> Result<Vec<ConsumptionCandidate>, WorkflowError> {
        self.guard(command)?;
        Ok(self.session_mut(command)?.unsettled()?)
    }

    /// Snapshots the unsettled candidates and runs the batch in the
    /// background. The reply is sent once the batch settles.
    #[instrument(skip(self, respond_to), fields(phase = %self.phase))]
    fn handle_submit(&mut self, command: Command, respond_to: ServiceResponse<SubmissionReport, WorkflowError>) {
        let batch = match self.prepare_batch(command) {
            Ok(batch) => batch,
            Err(e) => send_error!(respond_to, e),
        };

        self.transition(Phase::Submitting);
        info!(items = batch.len(), "Submitting batch");

        let submitter = self.submitter.clone();
        let settled_tx = self.settled_tx.clone();
        tokio::spawn(
            async move {
                let result = tokio::spawn(async move { submitter.submit(batch).await }.in_current_span())
                    .await
                    .map_err(|e| e.to_string());
                let _ = settled_tx.send(Settlement { result, respond_to }).await;
            }
            .in_current_span(),
        );
    }

    #[instrument(skip(self, settlement))]
    fn handle_settlement(&mut self, settlement: Settlement) {
        let Settlement { result, respond_to } = settlement;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Batch task aborted");
                self.transition(Phase::Reviewing);
                send_error!(respond_to, WorkflowError::SubmissionAborted(e));
            }
        };

        let Some(session) = self.session.as_mut() else {
            error!("Batch settled without a session");
            self.transition(Phase::Idle);
            send_error!(respond_to, WorkflowError::SubmissionAborted("session missing".into()));
        };

        session.record(&outcome);
        let next = if session.is_fully_settled() {
            Phase::Success
        } else if session.has_settled() {
            Phase::PartialFailure
        } else {
            Phase::Reviewing
        };

        let changed: Vec<ConsumedItem> = outcome
            .succeeded()
            .filter_map(|o| {
                let receipt = o.result.as_ref().ok()?;
                session.candidate(&o.item_id).map(|c| ConsumedItem::from_receipt(receipt, c))
            })
            .collect();
        let failed = session.failures();

        match outcome.overall() {
            Overall::Success => info!("All items consumed"),
            Overall::Partial => warn!(failed = failed.len(), "Some items failed"),
            Overall::Failed => error!(failed = failed.len(), "No item was consumed"),
        }
        self.transition(next);

        if !changed.is_empty() {
            if self.refresh.send(InventoryChanged { items: changed }).is_err() {
                debug!("No refresh subscribers");
            }
        }

        let _ = respond_to.send(Ok(SubmissionReport {
            phase: self.phase,
            outcome,
            failed,
        }));
    }
}
