use super::Phase;
use crate::domain::{BatchOutcome, ConsumeReceipt, ConsumptionCandidate, FailedItem, Overall};

/// Read-only view of the workflow for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub candidates: Vec<ConsumptionCandidate>,
    pub settled: Vec<ConsumeReceipt>,
    pub failed: Vec<FailedItem>,
}

/// Reply to `submit` and `retry_failed`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    /// Phase after the batch settled.
    pub phase: Phase,
    /// Results of this attempt only.
    pub outcome: BatchOutcome,
    /// Every item still failing across attempts.
    pub failed: Vec<FailedItem>,
}

impl SubmissionReport {
    pub fn overall(&self) -> Overall {
        self.outcome.overall()
    }
}

/// One item the inventory service accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumedItem {
    pub item_id: String,
    pub item_name: String,
    pub consumed: f64,
    pub remaining: f64,
    pub unit: String,
}

/// Refresh signal: on-hand quantities changed, refetch them.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryChanged {
    pub items: Vec<ConsumedItem>,
}

impl ConsumedItem {
    pub fn from_receipt(receipt: &ConsumeReceipt, candidate: &ConsumptionCandidate) -> Self {
        Self {
            item_id: receipt.item_id.clone(),
            item_name: candidate.item_name.clone(),
            consumed: receipt.consumed,
            remaining: receipt.remaining,
            unit: candidate.unit.clone(),
        }
    }
}
