mod actor_framework;
mod app_system;
mod batch_submitter;
mod clients;
mod domain;
mod inventory_actor;
mod messages;
mod reason_mapper;
mod workflow;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod mock_framework;

use tracing::{info, warn, Instrument};

use crate::app_system::{load_settings, setup_tracing, PantrySystem};
use crate::domain::{CandidatePatch, ConsumptionCandidate, InventoryItemCreate, InventoryItemPatch, ReasonTag};
use crate::reason_mapper::map_reasons;
use crate::workflow::WorkflowError;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let settings = load_settings();

    info!(timeout_ms = settings.item_timeout_ms, "Starting consumption demo");
    let system = PantrySystem::new(&settings);
    let inventory = &system.inventory_client;
    let workflow = &system.workflow_client;

    let eggs = inventory
        .create_item(InventoryItemCreate::new("Eggs", 6.0, "pcs"))
        .await
        .map_err(|e| e.to_string())?;
    let flour = inventory
        .create_item(InventoryItemCreate::new("Flour", 1000.0, "g").expiring("2026-12-01"))
        .await
        .map_err(|e| e.to_string())?;
    let milk = inventory
        .create_item(InventoryItemCreate::new("Milk", 1.0, "l").expiring("2026-10-18"))
        .await
        .map_err(|e| e.to_string())?;

    let mut refresh = workflow.subscribe();

    // Recipe-derived session: two ingredients, reasons attached in the editor.
    async {
        workflow
            .open(vec![
                ConsumptionCandidate::new(eggs.clone(), "Eggs", "3 pcs", 3.0, "pcs"),
                ConsumptionCandidate::new(flour.clone(), "Flour", "250 g", 250.0, "g"),
            ])
            .await?;

        // The cook only used two eggs.
        let patch = CandidatePatch { quantity_delta: Some(-1.0), ..Default::default() };
        let updated = workflow.update_candidate(eggs.clone(), patch).await?;
        info!(item_id = %updated.item_id, quantity = updated.consumed_quantity, "Candidate adjusted");

        // Opened the editor, then backed out.
        workflow.edit_reasons().await?;
        workflow.discard_edits().await?;

        let mut edited = workflow.edit_reasons().await?;
        for candidate in edited.iter_mut() {
            candidate.selected_reasons = vec![ReasonTag::RecipeConsumption];
        }
        edited[1].selected_reasons.push(ReasonTag::Custom);
        edited[1].custom_reason_text = Some("pancakes".into());
        for candidate in &edited {
            let preview = map_reasons(&candidate.selected_reasons, candidate.custom_reason_text.as_deref());
            info!(item_id = %candidate.item_id, code = %preview.backend_code, note = %preview.note, "Reason preview");
        }
        workflow.confirm_edits(edited).await?;

        let report = workflow.submit().await?;
        info!(overall = %report.overall(), phase = %report.phase, "Submission finished");
        for item in workflow.acknowledge().await? {
            info!(
                item_id = %item.item_id,
                item_name = %item.item_name,
                consumed = item.consumed,
                remaining = item.remaining,
                unit = %item.unit,
                "Consumed"
            );
        }
        Ok::<_, WorkflowError>(())
    }
    .instrument(tracing::info_span!("recipe_consumption"))
    .await
    .map_err(|e| e.to_string())?;

    // Spoiled milk plus more eggs than are left: ends in a partial failure.
    let milk_item = inventory
        .get_item(milk.clone())
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("missing item {}", milk))?;
    async {
        workflow
            .open(vec![
                ConsumptionCandidate::from_item(&milk_item).with_reasons([ReasonTag::ShortShelf]),
                ConsumptionCandidate::new(eggs.clone(), "Eggs", "10 pcs", 10.0, "pcs"),
                ConsumptionCandidate::new(flour.clone(), "Flour", "100 g", 100.0, "g"),
            ])
            .await?;
        // Flour was staged by mistake.
        workflow.remove_candidate(flour.clone()).await?;

        let report = workflow.submit().await?;
        info!(overall = %report.overall(), phase = %report.phase, "Submission finished");
        for failed in report.outcome.failed() {
            warn!(
                item_id = %failed.item_id,
                item_name = %failed.item_name,
                cause = ?failed.error_cause(),
                "Item not consumed"
            );
        }

        let snapshot = workflow.snapshot().await?;
        info!(
            phase = %snapshot.phase,
            candidates = snapshot.candidates.len(),
            settled = snapshot.settled.len(),
            failed = snapshot.failed.len(),
            "Session state"
        );
        Ok::<_, WorkflowError>(())
    }
    .instrument(tracing::info_span!("spoilage_cleanup"))
    .await
    .map_err(|e| e.to_string())?;

    // A neighbour restocks the eggs, then only the failed item goes out again.
    let patch = InventoryItemPatch { quantity: Some(12.0), ..Default::default() };
    inventory.recount_item(eggs.clone(), patch).await.map_err(|e| e.to_string())?;
    async {
        let report = workflow.retry_failed().await?;
        info!(overall = %report.overall(), phase = %report.phase, "Retry finished");
        for failed in &report.failed {
            warn!(item_id = %failed.item_id, item_name = %failed.item_name, cause = %failed.cause, "Item not consumed");
        }
        workflow.acknowledge().await?;
        Ok::<_, WorkflowError>(())
    }
    .instrument(tracing::info_span!("spoilage_retry"))
    .await
    .map_err(|e| e.to_string())?;

    // Staged as a gift, then called off before anything was sent.
    async {
        workflow
            .open(vec![ConsumptionCandidate::new(flour.clone(), "Flour", "500 g", 500.0, "g")
                .with_reasons([ReasonTag::Custom])
                .with_custom_text("gift")])
            .await?;
        workflow.cancel().await
    }
    .instrument(tracing::info_span!("cancelled_gift"))
    .await
    .map_err(|e| e.to_string())?;

    while let Ok(changed) = refresh.try_recv() {
        for item in changed.items {
            info!(item_id = %item.item_id, remaining = item.remaining, unit = %item.unit, "Refresh signal");
        }
    }

    for item in inventory.list_items().await.map_err(|e| e.to_string())? {
        let quantity = inventory.check_quantity(item.id.clone()).await.map_err(|e| e.to_string())?;
        info!(item_id = %item.id, name = %item.name, quantity, unit = %item.unit, "On hand");
        for record in &item.consumption_log {
            info!(item_id = %item.id, quantity = record.quantity, reason = %record.reason, note = %record.note, "Logged consumption");
        }
    }

    system.shutdown().await?;
    info!("Demo completed");
    Ok(())
}
