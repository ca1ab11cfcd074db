//! End-to-end tests for the cart context over the in-memory store.

use std::sync::Arc;

use chronicle_cart::application::command_handlers::handle_cart_command;
use chronicle_cart::application::query_handlers::CartItemsQuery;
use chronicle_cart::domain::commands::CartCommand;
use chronicle_core::error::DomainError;
use chronicle_core::store::EventStore;
use chronicle_event_store::MemoryEventStore;
use chronicle_test_support::collecting_subscriber;

#[tokio::test]
async fn test_cart_business_rule_scenario() {
    // Create a cart, add three items, and verify the fourth add is
    // rejected while the projection still shows exactly three units.
    let store: Arc<dyn EventStore> = Arc::new(MemoryEventStore::new());

    let created = handle_cart_command(
        CartCommand::CreateCart { cart_id: None },
        Arc::clone(&store),
    )
    .await
    .unwrap();
    let cart_id = created.cart_id;

    for item in ["sword", "shield", "potion"] {
        handle_cart_command(
            CartCommand::AddItem {
                cart_id: cart_id.clone(),
                item_id: item.into(),
            },
            Arc::clone(&store),
        )
        .await
        .unwrap();
    }

    let rejected = handle_cart_command(
        CartCommand::AddItem {
            cart_id: cart_id.clone(),
            item_id: "helmet".into(),
        },
        Arc::clone(&store),
    )
    .await;
    assert!(matches!(
        rejected.unwrap_err(),
        DomainError::InvalidCommand(_)
    ));

    let view = CartItemsQuery::new(cart_id.clone(), Arc::clone(&store))
        .execute()
        .await
        .unwrap();
    assert_eq!(view.total_quantity, 3);
    assert_eq!(view.items.len(), 3);
    assert!(!view.items.contains_key("helmet"));

    // The rejected command appended nothing.
    assert_eq!(store.get_stream_version(&cart_id).await, 4);
}

#[tokio::test]
async fn test_subscribers_observe_the_cart_stream() {
    let store: Arc<dyn EventStore> = Arc::new(MemoryEventStore::new());

    let created = handle_cart_command(
        CartCommand::CreateCart {
            cart_id: Some("cart-observed".into()),
        },
        Arc::clone(&store),
    )
    .await
    .unwrap();

    let (subscriber, received) = collecting_subscriber();
    store.subscribe_to_stream(&created.cart_id, subscriber).await;

    handle_cart_command(
        CartCommand::AddItem {
            cart_id: created.cart_id.clone(),
            item_id: "sword".into(),
        },
        Arc::clone(&store),
    )
    .await
    .unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].event_type, "ItemAdded");
    assert_eq!(received[0].version, 2);
}

#[tokio::test]
async fn test_projection_and_aggregate_agree_after_removals() {
    let store: Arc<dyn EventStore> = Arc::new(MemoryEventStore::new());

    let created = handle_cart_command(
        CartCommand::CreateCart { cart_id: None },
        Arc::clone(&store),
    )
    .await
    .unwrap();
    let cart_id = created.cart_id;

    for command in [
        CartCommand::AddItem {
            cart_id: cart_id.clone(),
            item_id: "sword".into(),
        },
        CartCommand::AddItem {
            cart_id: cart_id.clone(),
            item_id: "sword".into(),
        },
        CartCommand::RemoveItem {
            cart_id: cart_id.clone(),
            item_id: "sword".into(),
        },
    ] {
        handle_cart_command(command, Arc::clone(&store))
            .await
            .unwrap();
    }

    let view = CartItemsQuery::new(cart_id, Arc::clone(&store))
        .execute()
        .await
        .unwrap();
    assert_eq!(view.items.get("sword"), Some(&1));
    assert_eq!(view.total_quantity, 1);
}
