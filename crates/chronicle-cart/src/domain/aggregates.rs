//! The cart aggregate root.

use std::collections::BTreeMap;
use std::sync::Arc;

use chronicle_core::aggregate::{AggregateRoot, Lifecycle, hydrate};
use chronicle_core::command::Command;
use chronicle_core::error::DomainError;
use chronicle_core::event::{NewEvent, RecordedEvent};
use chronicle_core::store::EventStore;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::commands::CartCommand;
use super::events::{
    CART_CLEARED_EVENT_TYPE, CART_CREATED_EVENT_TYPE, ITEM_ADDED_EVENT_TYPE,
    ITEM_REMOVED_EVENT_TYPE, ItemAdded, ItemRemoved, cart_cleared, cart_created, item_added,
    item_removed,
};

/// Maximum total unit quantity a cart may hold.
const MAX_ITEMS: u32 = 3;

fn decode<T: DeserializeOwned>(event: &RecordedEvent) -> Result<T, DomainError> {
    serde_json::from_value(event.data.clone())
        .map_err(|e| DomainError::Infrastructure(format!("event deserialization failed: {e}")))
}

/// An event-sourced shopping cart.
///
/// Validates commands against state rebuilt from its event stream, appends
/// the resulting events with optimistic concurrency, and mirrors each
/// appended event into its in-memory state. On a
/// [`DomainError::ConcurrencyConflict`] local state is untouched; retry
/// with a freshly hydrated instance.
pub struct CartAggregate {
    lifecycle: Lifecycle,
    /// Item id to unit quantity.
    items: BTreeMap<String, u32>,
    created: bool,
    store: Arc<dyn EventStore>,
}

impl CartAggregate {
    /// Creates a not-yet-hydrated cart attached to a store.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            lifecycle: Lifecycle::default(),
            items: BTreeMap::new(),
            created: false,
            store,
        }
    }

    /// The cart's stream id, once hydrated.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.lifecycle.id()
    }

    /// The version of the last applied event.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.lifecycle.version()
    }

    /// Whether the initial replay has completed.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.lifecycle.is_live()
    }

    /// The items currently in the cart, by unit quantity.
    #[must_use]
    pub fn items(&self) -> &BTreeMap<String, u32> {
        &self.items
    }

    /// Handles a command: hydrates on first use (synthesizing a stream id
    /// for creation commands), validates against current state, and appends
    /// the resulting event.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidCommand`] when a business rule is
    /// violated (no event is appended), or
    /// [`DomainError::ConcurrencyConflict`] when another writer moved the
    /// stream since hydration.
    pub async fn handle(&mut self, command: CartCommand) -> Result<RecordedEvent, DomainError> {
        if !self.lifecycle.is_live() {
            let id = command
                .stream_id()
                .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned);
            let store = Arc::clone(&self.store);
            hydrate(self, &id, store.as_ref()).await?;
        }

        match &command {
            CartCommand::CreateCart { .. } => self.create_cart().await,
            CartCommand::AddItem { item_id, .. } => self.add_item(item_id).await,
            CartCommand::RemoveItem { item_id, .. } => self.remove_item(item_id).await,
            CartCommand::ClearCart { .. } => self.clear_cart().await,
        }
    }

    async fn create_cart(&mut self) -> Result<RecordedEvent, DomainError> {
        if self.created {
            return Err(DomainError::InvalidCommand("cart already exists".into()));
        }
        self.persist(cart_created()).await
    }

    async fn add_item(&mut self, item_id: &str) -> Result<RecordedEvent, DomainError> {
        if !self.created {
            return Err(DomainError::InvalidCommand("cart not initialized".into()));
        }
        let total: u32 = self.items.values().sum();
        if total >= MAX_ITEMS {
            return Err(DomainError::InvalidCommand("too many items in cart".into()));
        }
        self.persist(item_added(item_id)).await
    }

    async fn remove_item(&mut self, item_id: &str) -> Result<RecordedEvent, DomainError> {
        if !self.created {
            return Err(DomainError::InvalidCommand("cart not initialized".into()));
        }
        if !self.items.contains_key(item_id) {
            return Err(DomainError::InvalidCommand(format!(
                "item {item_id} is not in the cart"
            )));
        }
        self.persist(item_removed(item_id)).await
    }

    async fn clear_cart(&mut self) -> Result<RecordedEvent, DomainError> {
        if !self.created {
            return Err(DomainError::InvalidCommand("cart not initialized".into()));
        }
        self.persist(cart_cleared()).await
    }

    /// Appends the event at the aggregate's current version and mirrors the
    /// finalized event into local state.
    async fn persist(&mut self, event: NewEvent) -> Result<RecordedEvent, DomainError> {
        let stream_id = self
            .lifecycle
            .id()
            .ok_or_else(|| DomainError::InvalidCommand("cart has no stream id".into()))?
            .to_owned();
        let recorded = self
            .store
            .append_with_expected_version(&stream_id, event, self.lifecycle.version())
            .await?;
        self.apply(&recorded)?;
        self.lifecycle.set_version(recorded.version);
        Ok(recorded)
    }
}

impl AggregateRoot for CartAggregate {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn apply(&mut self, event: &RecordedEvent) -> Result<(), DomainError> {
        match event.event_type.as_str() {
            CART_CREATED_EVENT_TYPE => {
                self.created = true;
            }
            ITEM_ADDED_EVENT_TYPE => {
                let payload: ItemAdded = decode(event)?;
                *self.items.entry(payload.item_id).or_insert(0) += 1;
            }
            ITEM_REMOVED_EVENT_TYPE => {
                let payload: ItemRemoved = decode(event)?;
                if let Some(quantity) = self.items.get_mut(&payload.item_id) {
                    *quantity -= 1;
                    if *quantity == 0 {
                        self.items.remove(&payload.item_id);
                    }
                }
            }
            CART_CLEARED_EVENT_TYPE => {
                self.items.clear();
            }
            other => return Err(DomainError::UnhandledEventType(other.to_owned())),
        }
        Ok(())
    }
}

impl std::fmt::Debug for CartAggregate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartAggregate")
            .field("lifecycle", &self.lifecycle)
            .field("items", &self.items)
            .field("created", &self.created)
            .finish_non_exhaustive()
    }
}
