//! Application layer for the shopping cart context.

pub mod command_handlers;
pub mod query_handlers;
