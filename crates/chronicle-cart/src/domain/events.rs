//! Domain events for the shopping cart context.
//!
//! Events are routed by their string type through `RecordedEvent.data`,
//! so projections built by other consumers can replay the same stream.

use chronicle_core::event::NewEvent;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Event type emitted when a cart is created.
pub const CART_CREATED_EVENT_TYPE: &str = "CartCreated";
/// Event type emitted when an item is added to a cart.
pub const ITEM_ADDED_EVENT_TYPE: &str = "ItemAdded";
/// Event type emitted when an item is removed from a cart.
pub const ITEM_REMOVED_EVENT_TYPE: &str = "ItemRemoved";
/// Event type emitted when a cart is cleared.
pub const CART_CLEARED_EVENT_TYPE: &str = "CartCleared";

/// Payload of an `ItemAdded` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemAdded {
    /// The item added to the cart.
    pub item_id: String,
}

/// Payload of an `ItemRemoved` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRemoved {
    /// The item removed from the cart.
    pub item_id: String,
}

/// Builds a proposed `CartCreated` event.
#[must_use]
pub fn cart_created() -> NewEvent {
    NewEvent::new(CART_CREATED_EVENT_TYPE, json!({}))
}

/// Builds a proposed `ItemAdded` event.
#[must_use]
pub fn item_added(item_id: &str) -> NewEvent {
    NewEvent::new(ITEM_ADDED_EVENT_TYPE, json!({ "item_id": item_id }))
}

/// Builds a proposed `ItemRemoved` event.
#[must_use]
pub fn item_removed(item_id: &str) -> NewEvent {
    NewEvent::new(ITEM_REMOVED_EVENT_TYPE, json!({ "item_id": item_id }))
}

/// Builds a proposed `CartCleared` event.
#[must_use]
pub fn cart_cleared() -> NewEvent {
    NewEvent::new(CART_CLEARED_EVENT_TYPE, json!({}))
}
