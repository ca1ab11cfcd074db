//! Command handlers for the shopping cart context.
//!
//! Each invocation hydrates a fresh aggregate, so callers never reuse a
//! stale instance across commands.

use std::sync::Arc;

use chronicle_core::command::Command;
use chronicle_core::error::DomainError;
use chronicle_core::event::RecordedEvent;
use chronicle_core::store::EventStore;

use crate::domain::aggregates::CartAggregate;
use crate::domain::commands::CartCommand;

/// Result of a successfully handled cart command.
#[derive(Debug)]
pub struct CartCommandResult {
    /// The cart affected by the command.
    pub cart_id: String,
    /// The event produced and appended.
    pub event: RecordedEvent,
}

/// Handles a cart command against the store.
///
/// # Errors
///
/// Returns [`DomainError::InvalidCommand`] on a business-rule violation and
/// [`DomainError::ConcurrencyConflict`] when another writer got there first;
/// both leave the stream unmodified, so retrying is safe.
pub async fn handle_cart_command(
    command: CartCommand,
    store: Arc<dyn EventStore>,
) -> Result<CartCommandResult, DomainError> {
    let command_type = command.command_type();
    let mut cart = CartAggregate::new(store);
    let event = cart.handle(command).await?;
    tracing::debug!(
        command_type,
        cart_id = %event.stream_id,
        version = event.version,
        "handled cart command"
    );
    Ok(CartCommandResult {
        cart_id: event.stream_id.clone(),
        event,
    })
}
