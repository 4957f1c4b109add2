use std::collections::{HashMap, HashSet};

use super::{BatchOutcome, CandidatePatch, ConsumeReceipt, ConsumptionCandidate, ValidationError};
use crate::inventory_actor::InventoryError;

/// The working set of one consume action, owned by the workflow service.
///
/// Besides the candidates it remembers which items the inventory service has
/// already accepted, so a retry never decrements the same item twice.
#[derive(Debug, Clone)]
pub struct ConsumptionSession {
    candidates: Vec<ConsumptionCandidate>,
    settled: HashMap<String, ConsumeReceipt>,
    failures: HashMap<String, InventoryError>,
    custom_reason_max_chars: usize,
}

/// An item whose latest consume call failed.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedItem {
    pub item_id: String,
    pub item_name: String,
    pub cause: InventoryError,
}

impl ConsumptionSession {
    pub fn new(candidates: Vec<ConsumptionCandidate>, custom_reason_max_chars: usize) -> Result<Self, ValidationError> {
        check_candidate_set(&candidates, custom_reason_max_chars)?;
        Ok(Self {
            candidates,
            settled: HashMap::new(),
            failures: HashMap::new(),
            custom_reason_max_chars,
        })
    }

    pub fn candidates(&self) -> &[ConsumptionCandidate] {
        &self.candidates
    }

    pub fn candidate(&self, item_id: &str) -> Option<&ConsumptionCandidate> {
        self.candidates.iter().find(|c| c.item_id == item_id)
    }

    pub fn update(&mut self, item_id: &str, patch: CandidatePatch) -> Result<&ConsumptionCandidate, ValidationError> {
        let max = self.custom_reason_max_chars;
        let candidate = self
            .candidates
            .iter_mut()
            .find(|c| c.item_id == item_id)
            .ok_or_else(|| ValidationError::UnknownItem(item_id.to_string()))?;
        candidate.apply(patch, max)?;
        Ok(candidate)
    }

    /// Removes a candidate and returns how many are left.
    pub fn remove(&mut self, item_id: &str) -> Result<usize, ValidationError> {
        let index = self
            .candidates
            .iter()
            .position(|c| c.item_id == item_id)
            .ok_or_else(|| ValidationError::UnknownItem(item_id.to_string()))?;
        self.candidates.remove(index);
        Ok(self.candidates.len())
    }

    /// Merges an edited copy back in. Either every edit lands or none does.
    ///
    /// The edited set must contain exactly the session's items; order follows
    /// the session, not the editor.
    pub fn replace_all(&mut self, edited: Vec<ConsumptionCandidate>) -> Result<(), ValidationError> {
        check_candidate_set(&edited, self.custom_reason_max_chars)?;
        let current: HashSet<&str> = self.candidates.iter().map(|c| c.item_id.as_str()).collect();
        let incoming: HashSet<&str> = edited.iter().map(|c| c.item_id.as_str()).collect();
        if current != incoming {
            return Err(ValidationError::CandidateSetChanged);
        }

        let mut by_id: HashMap<String, ConsumptionCandidate> =
            edited.into_iter().map(|c| (c.item_id.clone(), c)).collect();
        for slot in self.candidates.iter_mut() {
            if let Some(mut next) = by_id.remove(&slot.item_id) {
                // Identity fields are not editable.
                next.item_name = slot.item_name.clone();
                next.original_quantity = slot.original_quantity.clone();
                next.unit = slot.unit.clone();
                next.expiry_date = slot.expiry_date.clone();
                *slot = next;
            }
        }
        Ok(())
    }

    /// Candidates the inventory service has not yet accepted.
    ///
    /// Zero-quantity candidates are included so the submitter can report them
    /// as skipped, but at least one must carry a positive quantity.
    pub fn unsettled(&self) -> Result<Vec<ConsumptionCandidate>, ValidationError> {
        let batch: Vec<ConsumptionCandidate> = self
            .candidates
            .iter()
            .filter(|c| !self.settled.contains_key(&c.item_id))
            .cloned()
            .collect();
        if batch.iter().all(|c| c.consumed_quantity <= 0.0) {
            return Err(ValidationError::NothingToConsume);
        }
        Ok(batch)
    }

    /// Folds one submission's results into the session.
    pub fn record(&mut self, outcome: &BatchOutcome) {
        for item in &outcome.per_item {
            match &item.result {
                Ok(receipt) => {
                    self.failures.remove(&item.item_id);
                    self.settled.insert(item.item_id.clone(), receipt.clone());
                }
                Err(cause) => {
                    self.failures.insert(item.item_id.clone(), cause.clone());
                }
            }
        }
        // Skipped items were not attempted, so an older failure no longer applies.
        for item_id in &outcome.skipped {
            self.failures.remove(item_id);
        }
    }

    pub fn has_settled(&self) -> bool {
        !self.settled.is_empty()
    }

    /// True once every item with something to consume has been accepted.
    pub fn is_fully_settled(&self) -> bool {
        self.candidates
            .iter()
            .filter(|c| c.consumed_quantity > 0.0)
            .all(|c| self.settled.contains_key(&c.item_id))
    }

    /// Accepted consumptions, in candidate order.
    pub fn receipts(&self) -> Vec<ConsumeReceipt> {
        self.candidates
            .iter()
            .filter_map(|c| self.settled.get(&c.item_id).cloned())
            .collect()
    }

    /// Items whose most recent attempt failed and that still have something
    /// to consume, in candidate order.
    pub fn failures(&self) -> Vec<FailedItem> {
        self.candidates
            .iter()
            .filter(|c| c.consumed_quantity > 0.0)
            .filter_map(|c| {
                self.failures.get(&c.item_id).map(|cause| FailedItem {
                    item_id: c.item_id.clone(),
                    item_name: c.item_name.clone(),
                    cause: cause.clone(),
                })
            })
            .collect()
    }
}

fn check_candidate_set(candidates: &[ConsumptionCandidate], custom_reason_max_chars: usize) -> Result<(), ValidationError> {
    if candidates.is_empty() {
        return Err(ValidationError::EmptySession);
    }
    let mut seen = HashSet::new();
    for candidate in candidates {
        candidate.validate(custom_reason_max_chars)?;
        if !seen.insert(candidate.item_id.as_str()) {
            return Err(ValidationError::DuplicateItem(candidate.item_id.clone()));
        }
    }
    Ok(())
}
