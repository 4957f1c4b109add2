#[cfg(test)]
mod tests {
    use crate::app_system::{PantrySystem, Settings};
    use crate::domain::{ConsumptionCandidate, ConsumptionRecord, InventoryItemCreate, InventoryItemPatch, Overall, ReasonCode, ReasonTag};
    use crate::inventory_actor::InventoryError;
    use crate::workflow::Phase;

    #[tokio::test]
    async fn test_single_duplicate_consumption_flow() {
        let system = PantrySystem::new(&Settings::default());
        let mut refresh = system.workflow_client.subscribe();

        let id = system
            .inventory_client
            .create_item(InventoryItemCreate::new("Yogurt", 5.0, "cups"))
            .await
            .unwrap();
        let item = system.inventory_client.get_item(id.clone()).await.unwrap().unwrap();

        let mut candidate = ConsumptionCandidate::from_item(&item).with_reasons([ReasonTag::Duplicate]);
        candidate.consumed_quantity = 3.0;
        system.workflow_client.open(vec![candidate]).await.unwrap();

        let report = system.workflow_client.submit().await.unwrap();
        assert_eq!(report.overall(), Overall::Success);
        assert_eq!(report.phase, Phase::Success);

        let changed = refresh.recv().await.unwrap();
        assert_eq!(changed.items[0].remaining, 2.0);
        assert_eq!(changed.items[0].unit, "cups");

        let item = system.inventory_client.get_item(id.clone()).await.unwrap().unwrap();
        assert_eq!(item.quantity, 2.0);
        assert_eq!(
            item.consumption_log,
            vec![ConsumptionRecord { quantity: 3.0, reason: ReasonCode::Other, note: "duplicate".into() }]
        );

        let consumed = system.workflow_client.acknowledge().await.unwrap();
        assert_eq!(consumed.len(), 1);
        assert_eq!(consumed[0].item_name, "Yogurt");

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_insufficient_stock_then_recount_and_retry() {
        let system = PantrySystem::new(&Settings::default());
        let inventory = &system.inventory_client;
        let workflow = &system.workflow_client;

        let bread = inventory.create_item(InventoryItemCreate::new("Bread", 1.0, "loaf")).await.unwrap();
        let cheese = inventory
            .create_item(InventoryItemCreate::new("Cheese", 200.0, "g").expiring("2026-10-20"))
            .await
            .unwrap();

        workflow
            .open(vec![
                ConsumptionCandidate::new(bread.clone(), "Bread", "2 loaf", 2.0, "loaf"),
                ConsumptionCandidate::new(cheese.clone(), "Cheese", "200 g", 200.0, "g")
                    .with_reasons([ReasonTag::ShortShelf]),
            ])
            .await
            .unwrap();

        let report = workflow.submit().await.unwrap();
        assert_eq!(report.phase, Phase::PartialFailure);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].item_name, "Bread");
        assert_eq!(
            report.failed[0].cause,
            InventoryError::InsufficientQuantity { requested: 2.0, available: 1.0 }
        );

        let cheese_item = inventory.get_item(cheese.clone()).await.unwrap().unwrap();
        assert_eq!(cheese_item.quantity, 0.0);
        assert_eq!(cheese_item.consumption_log[0].reason, ReasonCode::Expired);

        // Someone restocks the shelf; only the failed item goes out again.
        let patch = InventoryItemPatch { quantity: Some(3.0), ..Default::default() };
        inventory.recount_item(bread.clone(), patch).await.unwrap();

        let report = workflow.retry_failed().await.unwrap();
        assert_eq!(report.phase, Phase::Success);
        assert_eq!(report.outcome.per_item.len(), 1);

        assert_eq!(inventory.check_quantity(bread).await.unwrap(), 1.0);
        let cheese_item = inventory.get_item(cheese).await.unwrap().unwrap();
        assert_eq!(cheese_item.consumption_log.len(), 1);

        let consumed = workflow.acknowledge().await.unwrap();
        assert_eq!(consumed.len(), 2);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_item_is_reported_as_not_found() {
        let system = PantrySystem::new(&Settings::default());
        let workflow = &system.workflow_client;

        workflow
            .open(vec![ConsumptionCandidate::new("item_404", "Ghost", "1", 1.0, "pcs")])
            .await
            .unwrap();
        let report = workflow.submit().await.unwrap();

        assert_eq!(report.overall(), Overall::Failed);
        assert_eq!(report.phase, Phase::Reviewing);
        assert_eq!(report.failed[0].cause, InventoryError::NotFound("item_404".into()));
        assert!(!report.failed[0].cause.is_transient());

        workflow.cancel().await.unwrap();
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_listing_reflects_consumption() {
        let system = PantrySystem::new(&Settings::default());
        let inventory = &system.inventory_client;

        let rice = inventory.create_item(InventoryItemCreate::new("Rice", 900.0, "g")).await.unwrap();
        let item = inventory.get_item(rice).await.unwrap().unwrap();

        let mut candidate = ConsumptionCandidate::from_item(&item)
            .with_reasons([ReasonTag::BoughtTooMuch, ReasonTag::Custom])
            .with_custom_text("donated");
        candidate.consumed_quantity = 400.0;
        system.workflow_client.open(vec![candidate]).await.unwrap();
        system.workflow_client.submit().await.unwrap();

        let items = inventory.list_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 500.0);
        assert_eq!(items[0].consumption_log[0].note, "bought_too_much, custom, donated");

        system.workflow_client.acknowledge().await.unwrap();
        system.shutdown().await.unwrap();
    }
}
