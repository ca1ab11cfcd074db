//! Commands for the shopping cart context.
//!
//! A closed enum dispatched by exhaustive matching, so the compiler
//! enforces that every command variant is handled.

use chronicle_core::command::Command;

/// Commands a cart aggregate can handle.
#[derive(Debug, Clone)]
pub enum CartCommand {
    /// Create a new cart. When `cart_id` is `None` the aggregate
    /// synthesizes a fresh stream id.
    CreateCart {
        /// Optional caller-chosen cart id.
        cart_id: Option<String>,
    },
    /// Add one unit of an item to the cart.
    AddItem {
        /// The cart to add to.
        cart_id: String,
        /// The item to add.
        item_id: String,
    },
    /// Remove one unit of an item from the cart.
    RemoveItem {
        /// The cart to remove from.
        cart_id: String,
        /// The item to remove.
        item_id: String,
    },
    /// Remove all items from the cart.
    ClearCart {
        /// The cart to clear.
        cart_id: String,
    },
}

impl Command for CartCommand {
    fn command_type(&self) -> &'static str {
        match self {
            Self::CreateCart { .. } => "cart.create",
            Self::AddItem { .. } => "cart.add_item",
            Self::RemoveItem { .. } => "cart.remove_item",
            Self::ClearCart { .. } => "cart.clear",
        }
    }

    fn stream_id(&self) -> Option<&str> {
        match self {
            Self::CreateCart { cart_id } => cart_id.as_deref(),
            Self::AddItem { cart_id, .. }
            | Self::RemoveItem { cart_id, .. }
            | Self::ClearCart { cart_id } => Some(cart_id),
        }
    }
}
