//! Query handlers for the shopping cart context.
//!
//! The read side of the contract: projections replay the same stream the
//! aggregate writes, into an independently shaped view.

use std::collections::BTreeMap;
use std::sync::Arc;

use chronicle_core::error::DomainError;
use chronicle_core::event::RecordedEvent;
use chronicle_core::store::EventStore;
use serde::Serialize;

use crate::domain::events::{
    CART_CLEARED_EVENT_TYPE, CART_CREATED_EVENT_TYPE, ITEM_ADDED_EVENT_TYPE,
    ITEM_REMOVED_EVENT_TYPE, ItemAdded, ItemRemoved,
};

/// Read model of a cart, rebuilt from its stream on every execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartView {
    /// The cart's stream id.
    pub cart_id: String,
    /// Unit quantities by item id (sorted for determinism).
    pub items: BTreeMap<String, u32>,
    /// Total unit quantity across all items.
    pub total_quantity: u32,
}

/// Projects cart state from an event stream.
///
/// `execute` rebuilds the view from scratch each call, so repeated
/// executions are idempotent. Unknown event types fail loudly with
/// [`DomainError::UnhandledEventType`], so schema drift is caught early.
pub struct CartItemsQuery {
    stream_id: String,
    store: Arc<dyn EventStore>,
}

impl CartItemsQuery {
    /// Creates a query over the given cart stream.
    #[must_use]
    pub fn new(stream_id: impl Into<String>, store: Arc<dyn EventStore>) -> Self {
        Self {
            stream_id: stream_id.into(),
            store,
        }
    }

    /// Replays the stream and returns the projected view. An unknown
    /// stream projects to the default (empty) view.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnhandledEventType`] when the stream holds an
    /// event this projection has no case for, or
    /// [`DomainError::Infrastructure`] when a payload fails to deserialize.
    pub async fn execute(&self) -> Result<CartView, DomainError> {
        let mut view = CartView::default();
        let events = self.store.get_stream(&self.stream_id).await?;
        for event in &events {
            Self::on(&mut view, event)?;
        }
        view.total_quantity = view.items.values().sum();
        Ok(view)
    }

    fn on(view: &mut CartView, event: &RecordedEvent) -> Result<(), DomainError> {
        match event.event_type.as_str() {
            CART_CREATED_EVENT_TYPE => {
                view.cart_id.clone_from(&event.stream_id);
            }
            ITEM_ADDED_EVENT_TYPE => {
                let payload: ItemAdded = decode(event)?;
                *view.items.entry(payload.item_id).or_insert(0) += 1;
            }
            ITEM_REMOVED_EVENT_TYPE => {
                let payload: ItemRemoved = decode(event)?;
                if let Some(quantity) = view.items.get_mut(&payload.item_id) {
                    *quantity -= 1;
                    if *quantity == 0 {
                        view.items.remove(&payload.item_id);
                    }
                }
            }
            CART_CLEARED_EVENT_TYPE => {
                view.items.clear();
            }
            other => return Err(DomainError::UnhandledEventType(other.to_owned())),
        }
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(event: &RecordedEvent) -> Result<T, DomainError> {
    serde_json::from_value(event.data.clone())
        .map_err(|e| DomainError::Infrastructure(format!("event deserialization failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_core::event::NewEvent;
    use chronicle_event_store::MemoryEventStore;
    use serde_json::json;

    async fn seed_cart(store: &dyn EventStore, cart_id: &str, items: &[&str]) {
        store
            .append(cart_id, NewEvent::new(CART_CREATED_EVENT_TYPE, json!({})))
            .await
            .unwrap();
        for item in items {
            store
                .append(
                    cart_id,
                    NewEvent::new(ITEM_ADDED_EVENT_TYPE, json!({ "item_id": item })),
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_execute_projects_quantities() {
        // Arrange
        let store: Arc<dyn EventStore> = Arc::new(MemoryEventStore::new());
        seed_cart(store.as_ref(), "cart-1", &["sword", "sword", "potion"]).await;
        let query = CartItemsQuery::new("cart-1", Arc::clone(&store));

        // Act
        let view = query.execute().await.unwrap();

        // Assert
        assert_eq!(view.cart_id, "cart-1");
        assert_eq!(view.items.get("sword"), Some(&2));
        assert_eq!(view.items.get("potion"), Some(&1));
        assert_eq!(view.total_quantity, 3);
    }

    #[tokio::test]
    async fn test_execute_is_idempotent_across_calls() {
        // Arrange
        let store: Arc<dyn EventStore> = Arc::new(MemoryEventStore::new());
        seed_cart(store.as_ref(), "cart-1", &["sword"]).await;
        let query = CartItemsQuery::new("cart-1", Arc::clone(&store));

        // Act
        let first = query.execute().await.unwrap();
        let second = query.execute().await.unwrap();

        // Assert
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_execute_yields_empty_view_for_unknown_stream() {
        // Arrange
        let store: Arc<dyn EventStore> = Arc::new(MemoryEventStore::new());
        let query = CartItemsQuery::new("nowhere", store);

        // Act
        let view = query.execute().await.unwrap();

        // Assert
        assert_eq!(view, CartView::default());
    }

    #[tokio::test]
    async fn test_execute_fails_on_unknown_event_type() {
        // Arrange
        let store: Arc<dyn EventStore> = Arc::new(MemoryEventStore::new());
        seed_cart(store.as_ref(), "cart-1", &[]).await;
        store
            .append("cart-1", NewEvent::new("CartRenamed", json!({})))
            .await
            .unwrap();
        let query = CartItemsQuery::new("cart-1", Arc::clone(&store));

        // Act
        let result = query.execute().await;

        // Assert
        match result.unwrap_err() {
            DomainError::UnhandledEventType(event_type) => {
                assert_eq!(event_type, "CartRenamed");
            }
            other => panic!("expected UnhandledEventType, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remove_and_clear_shape_the_view() {
        // Arrange
        let store: Arc<dyn EventStore> = Arc::new(MemoryEventStore::new());
        seed_cart(store.as_ref(), "cart-1", &["sword", "potion"]).await;
        store
            .append(
                "cart-1",
                NewEvent::new(ITEM_REMOVED_EVENT_TYPE, json!({ "item_id": "sword" })),
            )
            .await
            .unwrap();
        let query = CartItemsQuery::new("cart-1", Arc::clone(&store));

        // Act
        let after_remove = query.execute().await.unwrap();
        store
            .append("cart-1", NewEvent::new(CART_CLEARED_EVENT_TYPE, json!({})))
            .await
            .unwrap();
        let after_clear = query.execute().await.unwrap();

        // Assert
        assert_eq!(after_remove.items.get("potion"), Some(&1));
        assert!(!after_remove.items.contains_key("sword"));
        assert_eq!(after_remove.total_quantity, 1);
        assert!(after_clear.items.is_empty());
        assert_eq!(after_clear.total_quantity, 0);
    }
}
