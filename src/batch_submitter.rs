use std::time::Duration;

use futures::future::join_all;
use tracing::{error, info, instrument, warn};

use crate::clients::InventoryClient;
use crate::domain::{BatchOutcome, ConsumptionCandidate, ItemOutcome};
use crate::inventory_actor::{ConsumeRequest, InventoryError};
use crate::reason_mapper::map_reasons_or;

/// Sends one consume call per candidate and settles them all.
///
/// Calls run concurrently on the current task and are awaited to the last one,
/// so a failed sibling never cancels or hides another item's success. Each
/// call is bounded by `item_timeout`. No retries happen here.
#[derive(Clone)]
pub struct BatchSubmitter {
    inventory: InventoryClient,
    item_timeout: Duration,
    default_note: String,
}

impl BatchSubmitter {
    pub fn new(inventory: InventoryClient, item_timeout: Duration, default_note: impl Into<String>) -> Self {
        Self {
            inventory,
            item_timeout,
            default_note: default_note.into(),
        }
    }

    #[instrument(skip(self, candidates), fields(batch_size = candidates.len()))]
    pub async fn submit(&self, candidates: Vec<ConsumptionCandidate>) -> BatchOutcome {
        let (to_send, zero): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|c| c.consumed_quantity > 0.0);
        let skipped: Vec<String> = zero.into_iter().map(|c| c.item_id).collect();
        if !skipped.is_empty() {
            warn!(skipped = ?skipped, "Skipping zero-quantity items");
        }

        let per_item = join_all(to_send.into_iter().map(|c| self.submit_one(c))).await;
        let outcome = BatchOutcome::new(per_item, skipped);

        info!(
            overall = %outcome.overall(),
            succeeded = outcome.succeeded().count(),
            failed = outcome.failed().count(),
            "Batch settled"
        );
        outcome
    }

    #[instrument(skip(self, candidate), fields(item_id = %candidate.item_id, quantity = candidate.consumed_quantity))]
    async fn submit_one(&self, candidate: ConsumptionCandidate) -> ItemOutcome {
        let mapped = map_reasons_or(
            &candidate.selected_reasons,
            candidate.custom_reason_text.as_deref(),
            &self.default_note,
        );
        let request = ConsumeRequest {
            quantity: candidate.consumed_quantity,
            reason: mapped.backend_code,
            note: mapped.note,
        };

        let call = self.inventory.consume(candidate.item_id.clone(), request);
        let result = match tokio::time::timeout(self.item_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(InventoryError::Timeout),
        };

        match &result {
            Ok(receipt) => info!(remaining = receipt.remaining, "Item consumed"),
            Err(e) => error!(error = %e, transient = e.is_transient(), "Consume failed"),
        }
        ItemOutcome::new(candidate.item_id, candidate.item_name, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConsumeReceipt, InventoryItem, Overall, ReasonCode, ReasonTag};
    use crate::inventory_actor::{InventoryAction, InventoryActionResult};
    use crate::mock_framework::{create_mock_client, expect_action};

    fn candidate(id: &str, quantity: f64) -> ConsumptionCandidate {
        ConsumptionCandidate::new(id, format!("Name of {}", id), quantity.to_string(), quantity, "pcs")
    }

    fn receipt(id: &str, consumed: f64) -> InventoryActionResult {
        InventoryActionResult::Consume(ConsumeReceipt { item_id: id.into(), consumed, remaining: 10.0 - consumed })
    }

    #[tokio::test]
    async fn test_single_item_sends_mapped_reason() {
        let (inner, mut rx) = create_mock_client::<InventoryItem>(10);
        let submitter = BatchSubmitter::new(InventoryClient::new(inner), Duration::from_secs(1), "Consuming item");

        let task = tokio::spawn(async move {
            submitter.submit(vec![candidate("item_1", 3.0).with_reasons([ReasonTag::Duplicate])]).await
        });

        let (id, action, responder) = expect_action(&mut rx).await.expect("Expected consume action");
        assert_eq!(id, "item_1");
        match action {
            InventoryAction::Consume(request) => {
                assert_eq!(
                    request,
                    ConsumeRequest { quantity: 3.0, reason: ReasonCode::Other, note: "duplicate".into() }
                );
            }
            other => panic!("Unexpected action: {:?}", other),
        }
        responder.send(Ok(receipt("item_1", 3.0))).unwrap();

        let outcome = task.await.unwrap();
        assert_eq!(outcome.overall(), Overall::Success);
    }

    #[tokio::test]
    async fn test_middle_failure_keeps_sibling_successes() {
        let (inner, mut rx) = create_mock_client::<InventoryItem>(10);
        let submitter = BatchSubmitter::new(InventoryClient::new(inner), Duration::from_secs(1), "Consuming item");

        let task = tokio::spawn(async move {
            submitter
                .submit(vec![candidate("item_1", 1.0), candidate("item_2", 2.0), candidate("item_3", 3.0)])
                .await
        });

        for _ in 0..3 {
            let (id, _, responder) = expect_action(&mut rx).await.expect("Expected consume action");
            let reply = if id == "item_2" {
                Err(InventoryError::InsufficientQuantity { requested: 2.0, available: 1.0 })
            } else {
                Ok(receipt(&id, 1.0))
            };
            responder.send(reply).unwrap();
        }

        let outcome = task.await.unwrap();
        assert_eq!(outcome.overall(), Overall::Partial);
        assert!(outcome.get("item_1").unwrap().succeeded());
        assert!(outcome.get("item_3").unwrap().succeeded());
        let failed = outcome.get("item_2").unwrap();
        assert!(!failed.succeeded());
        assert_eq!(
            failed.error_cause().as_deref(),
            Some("Insufficient quantity: requested 2, available 1")
        );
    }

    #[tokio::test]
    async fn test_silent_service_times_out_per_item() {
        let (inner, mut rx) = create_mock_client::<InventoryItem>(10);
        let submitter = BatchSubmitter::new(InventoryClient::new(inner), Duration::from_millis(50), "Consuming item");

        let task = tokio::spawn(async move {
            submitter.submit(vec![candidate("item_1", 1.0), candidate("item_2", 1.0)]).await
        });

        let mut held = Vec::new();
        for _ in 0..2 {
            let (id, _, responder) = expect_action(&mut rx).await.expect("Expected consume action");
            if id == "item_1" {
                responder.send(Ok(receipt(&id, 1.0))).unwrap();
            } else {
                // Keep the responder alive so the call hangs instead of failing.
                held.push(responder);
            }
        }

        let outcome = task.await.unwrap();
        assert_eq!(outcome.overall(), Overall::Partial);
        assert_eq!(outcome.get("item_2").unwrap().error_cause().as_deref(), Some("timeout"));
        drop(held);
    }

    #[tokio::test]
    async fn test_zero_quantity_items_are_not_sent() {
        let (inner, mut rx) = create_mock_client::<InventoryItem>(10);
        let submitter = BatchSubmitter::new(InventoryClient::new(inner), Duration::from_secs(1), "Consuming item");

        let task = tokio::spawn(async move {
            submitter.submit(vec![candidate("item_1", 0.0), candidate("item_2", 1.0)]).await
        });

        let (id, _, responder) = expect_action(&mut rx).await.expect("Expected consume action");
        assert_eq!(id, "item_2");
        responder.send(Ok(receipt(&id, 1.0))).unwrap();

        let outcome = task.await.unwrap();
        assert_eq!(outcome.skipped, vec!["item_1".to_string()]);
        assert_eq!(outcome.per_item.len(), 1);
        assert!(rx.try_recv().is_err());
    }
}
